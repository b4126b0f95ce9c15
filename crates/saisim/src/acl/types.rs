//! ACL schemas.

use crate::common::PacketAction;
use saisim_attrs::{attr_enum, attribute_message, AclField, UdfField};
use saisim_types::Oid;

attr_enum! {
    pub enum AclStage {
        Ingress = 0,
        Egress = 1,
        IngressMacsec = 2,
        EgressMacsec = 3,
        PreIngress = 4,
    }
}

attr_enum! {
    pub enum AclTableGroupType {
        Sequential = 0,
        Parallel = 1,
    }
}

attr_enum! {
    pub enum AclIpType {
        Any = 0,
        Ip = 1,
        NonIp = 2,
        Ipv4any = 3,
        NonIpv4 = 4,
        Ipv6any = 5,
        NonIpv6 = 6,
        Arp = 7,
        ArpRequest = 8,
        ArpReply = 9,
    }
}

attribute_message! {
    /// SAI_ACL_TABLE_GROUP_ATTR_*.
    pub struct AclTableGroupAttrs for AclTableGroup {
        ACL_STAGE = 1 => acl_stage: AclStage,
        ACL_BIND_POINT_TYPE_LIST = 2 => acl_bind_point_type_list: Vec<i32>,
        TYPE = 3 => group_type: AclTableGroupType,
        MEMBER_LIST = 4 => member_list: Vec<u64>,
    }
}

attribute_message! {
    /// SAI_ACL_TABLE_GROUP_MEMBER_ATTR_*.
    pub struct AclTableGroupMemberAttrs for AclTableGroupMember {
        ACL_TABLE_GROUP_ID = 1 => acl_table_group_id: u64,
        ACL_TABLE_ID = 2 => acl_table_id: u64,
        PRIORITY = 3 => priority: u32,
    }
}

attribute_message! {
    /// SAI_ACL_TABLE_ATTR_*. FIELD_* flags declare which matches entries may use.
    pub struct AclTableAttrs for AclTable {
        ACL_STAGE = 1 => acl_stage: AclStage,
        ACL_BIND_POINT_TYPE_LIST = 2 => acl_bind_point_type_list: Vec<i32>,
        SIZE = 3 => size: u32,
        ACL_ACTION_TYPE_LIST = 4 => acl_action_type_list: Vec<i32>,
        FIELD_SRC_IPV6 = 5 => field_src_ipv6: bool,
        FIELD_DST_IPV6 = 6 => field_dst_ipv6: bool,
        FIELD_SRC_MAC = 7 => field_src_mac: bool,
        FIELD_DST_MAC = 8 => field_dst_mac: bool,
        FIELD_SRC_IP = 9 => field_src_ip: bool,
        FIELD_DST_IP = 10 => field_dst_ip: bool,
        FIELD_IN_PORT = 11 => field_in_port: bool,
        FIELD_L4_DST_PORT = 12 => field_l4_dst_port: bool,
        FIELD_ETHER_TYPE = 13 => field_ether_type: bool,
        FIELD_IP_PROTOCOL = 14 => field_ip_protocol: bool,
        FIELD_DSCP = 15 => field_dscp: bool,
        FIELD_TTL = 16 => field_ttl: bool,
        FIELD_ICMPV6_TYPE = 17 => field_icmpv6_type: bool,
        FIELD_ACL_IP_TYPE = 18 => field_acl_ip_type: bool,
        FIELD_DST_IPV6_WORD3 = 19 => field_dst_ipv6_word3: bool,
        FIELD_DST_IPV6_WORD2 = 20 => field_dst_ipv6_word2: bool,
        UDF_GROUP_LIST = 21 => udf_group_list: Vec<u64>,
        ENTRY_LIST = 22 => entry_list: Vec<u64>,
    }
}

attribute_message! {
    /// SAI_ACL_ENTRY_ATTR_*.
    pub struct AclEntryAttrs for AclEntry {
        TABLE_ID = 1 => table_id: u64,
        PRIORITY = 2 => priority: u32,
        ADMIN_STATE = 3 => admin_state: bool,
        FIELD_SRC_IPV6 = 4 => field_src_ipv6: AclField,
        FIELD_DST_IPV6 = 5 => field_dst_ipv6: AclField,
        FIELD_SRC_MAC = 6 => field_src_mac: AclField,
        FIELD_DST_MAC = 7 => field_dst_mac: AclField,
        FIELD_SRC_IP = 8 => field_src_ip: AclField,
        FIELD_DST_IP = 9 => field_dst_ip: AclField,
        FIELD_IN_PORT = 10 => field_in_port: u64,
        FIELD_L4_DST_PORT = 11 => field_l4_dst_port: AclField,
        FIELD_ETHER_TYPE = 12 => field_ether_type: AclField,
        FIELD_IP_PROTOCOL = 13 => field_ip_protocol: AclField,
        FIELD_DSCP = 14 => field_dscp: AclField,
        FIELD_TTL = 15 => field_ttl: AclField,
        FIELD_ICMPV6_TYPE = 16 => field_icmpv6_type: AclField,
        FIELD_ACL_IP_TYPE = 17 => field_acl_ip_type: AclIpType,
        FIELD_DST_IPV6_WORD3 = 18 => field_dst_ipv6_word3: AclField,
        FIELD_DST_IPV6_WORD2 = 19 => field_dst_ipv6_word2: AclField,
        USER_DEFINED_FIELD_GROUP = 20 => user_defined_field_group: Vec<UdfField>,
        ACTION_REDIRECT = 21 => action_redirect: u64,
        ACTION_PACKET_ACTION = 22 => action_packet_action: PacketAction,
        ACTION_COUNTER = 23 => action_counter: u64,
        ACTION_SET_POLICER = 24 => action_set_policer: u64,
        ACTION_SET_USER_TRAP_ID = 25 => action_set_user_trap_id: u64,
        ACTION_SET_VRF = 26 => action_set_vrf: u64,
    }
}

attribute_message! {
    /// SAI_ACL_COUNTER_ATTR_*.
    pub struct AclCounterAttrs for AclCounter {
        TABLE_ID = 1 => table_id: u64,
        ENABLE_PACKET_COUNT = 2 => enable_packet_count: bool,
        ENABLE_BYTE_COUNT = 3 => enable_byte_count: bool,
        PACKETS = 4 => packets: u64,
        BYTES = 5 => bytes: u64,
    }
}

/// Where an ACL table lives: a bank of its group's flow table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLocation {
    pub group: Oid,
    pub bank: u32,
    pub member: Oid,
}
