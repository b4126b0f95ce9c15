//! Switch attribute schema.

use saisim_attrs::attribute_message;
use saisim_types::MacAddress;

attribute_message! {
    /// SAI_SWITCH_ATTR_*.
    pub struct SwitchAttrs for Switch {
        NUMBER_OF_ACTIVE_PORTS = 1 => number_of_active_ports: u32,
        MAX_NUMBER_OF_SUPPORTED_PORTS = 2 => max_number_of_supported_ports: u32,
        PORT_LIST = 3 => port_list: Vec<u64>,
        PORT_MAX_MTU = 4 => port_max_mtu: u32,
        CPU_PORT = 5 => cpu_port: u64,
        MAX_VIRTUAL_ROUTERS = 6 => max_virtual_routers: u32,
        FDB_TABLE_SIZE = 7 => fdb_table_size: u32,
        L3_NEIGHBOR_TABLE_SIZE = 8 => l3_neighbor_table_size: u32,
        L3_ROUTE_TABLE_SIZE = 9 => l3_route_table_size: u32,
        LAG_MEMBERS = 10 => lag_members: u32,
        NUMBER_OF_LAGS = 11 => number_of_lags: u32,
        ECMP_MEMBERS = 12 => ecmp_members: u32,
        NUMBER_OF_ECMP_GROUPS = 13 => number_of_ecmp_groups: u32,
        NUMBER_OF_UNICAST_QUEUES = 14 => number_of_unicast_queues: u32,
        NUMBER_OF_MULTICAST_QUEUES = 15 => number_of_multicast_queues: u32,
        NUMBER_OF_QUEUES = 16 => number_of_queues: u32,
        NUMBER_OF_CPU_QUEUES = 17 => number_of_cpu_queues: u32,
        ACL_TABLE_MINIMUM_PRIORITY = 18 => acl_table_minimum_priority: u32,
        ACL_TABLE_MAXIMUM_PRIORITY = 19 => acl_table_maximum_priority: u32,
        ACL_ENTRY_MINIMUM_PRIORITY = 20 => acl_entry_minimum_priority: u32,
        ACL_ENTRY_MAXIMUM_PRIORITY = 21 => acl_entry_maximum_priority: u32,
        DEFAULT_VLAN_ID = 22 => default_vlan_id: u64,
        DEFAULT_STP_INST_ID = 23 => default_stp_inst_id: u64,
        MAX_STP_INSTANCE = 24 => max_stp_instance: u32,
        DEFAULT_VIRTUAL_ROUTER_ID = 25 => default_virtual_router_id: u64,
        DEFAULT_1Q_BRIDGE_ID = 26 => default_1q_bridge_id: u64,
        DEFAULT_TRAP_GROUP = 27 => default_trap_group: u64,
        ECMP_HASH = 28 => ecmp_hash: u64,
        LAG_HASH = 29 => lag_hash: u64,
        RESTART_WARM = 30 => restart_warm: bool,
        SRC_MAC_ADDRESS = 31 => src_mac_address: MacAddress,
        ECMP_DEFAULT_HASH_SEED = 32 => ecmp_default_hash_seed: u32,
        LAG_DEFAULT_HASH_SEED = 33 => lag_default_hash_seed: u32,
        PRE_INGRESS_ACL = 34 => pre_ingress_acl: u64,
        INGRESS_ACL = 35 => ingress_acl: u64,
        EGRESS_ACL = 36 => egress_acl: u64,
        INIT_SWITCH = 37 => init_switch: bool,
        MAX_ACL_ACTION_COUNT = 38 => max_acl_action_count: u32,
        AVAILABLE_IPV4_ROUTE_ENTRY = 39 => available_ipv4_route_entry: u32,
        AVAILABLE_IPV6_ROUTE_ENTRY = 40 => available_ipv6_route_entry: u32,
    }
}

attribute_message! {
    /// SAI_HASH_ATTR_*.
    pub struct HashAttrs for Hash {
        NATIVE_HASH_FIELD_LIST = 1 => native_hash_field_list: Vec<i32>,
        UDF_GROUP_LIST = 2 => udf_group_list: Vec<u64>,
    }
}

saisim_attrs::attr_enum! {
    pub enum NativeHashField {
        SrcIp = 0,
        DstIp = 1,
        InnerSrcIp = 2,
        InnerDstIp = 3,
        VlanId = 4,
        IpProtocol = 5,
        EthernetType = 6,
        L4SrcPort = 7,
        L4DstPort = 8,
        SrcMac = 9,
        DstMac = 10,
        InPort = 11,
    }
}
