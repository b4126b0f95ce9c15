//! Schemas of objects that are stored but never programmed into the
//! forwarding engine.

use saisim_attrs::attribute_message;
use saisim_types::MacAddress;
use std::net::IpAddr;

attribute_message! {
    /// SAI_VIRTUAL_ROUTER_ATTR_*.
    pub struct VirtualRouterAttrs for VirtualRouter {
        ADMIN_V4_STATE = 1 => admin_v4_state: bool,
        ADMIN_V6_STATE = 2 => admin_v6_state: bool,
        SRC_MAC_ADDRESS = 3 => src_mac_address: MacAddress,
        VIOLATION_TTL1_PACKET_ACTION = 4 => violation_ttl1_packet_action: i32,
        VIOLATION_IP_OPTIONS_PACKET_ACTION = 5 => violation_ip_options_packet_action: i32,
        UNKNOWN_L3_MULTICAST_PACKET_ACTION = 6 => unknown_l3_multicast_packet_action: i32,
    }
}

attribute_message! {
    /// SAI_POLICER_ATTR_*.
    pub struct PolicerAttrs for Policer {
        METER_TYPE = 1 => meter_type: i32,
        MODE = 2 => mode: i32,
        COLOR_SOURCE = 3 => color_source: i32,
        CBS = 4 => cbs: u64,
        CIR = 5 => cir: u64,
        PBS = 6 => pbs: u64,
        PIR = 7 => pir: u64,
        GREEN_PACKET_ACTION = 8 => green_packet_action: i32,
        YELLOW_PACKET_ACTION = 9 => yellow_packet_action: i32,
        RED_PACKET_ACTION = 10 => red_packet_action: i32,
    }
}

attribute_message! {
    /// SAI_MIRROR_SESSION_ATTR_*.
    pub struct MirrorSessionAttrs for MirrorSession {
        TYPE = 1 => session_type: i32,
        MONITOR_PORT = 2 => monitor_port: u64,
        TRUNCATE_SIZE = 3 => truncate_size: u16,
        TC = 4 => tc: u8,
        SRC_IP_ADDRESS = 5 => src_ip_address: IpAddr,
        DST_IP_ADDRESS = 6 => dst_ip_address: IpAddr,
        SRC_MAC_ADDRESS = 7 => src_mac_address: MacAddress,
        DST_MAC_ADDRESS = 8 => dst_mac_address: MacAddress,
        GRE_PROTOCOL_TYPE = 9 => gre_protocol_type: u16,
        TTL = 10 => ttl: u8,
    }
}

attribute_message! {
    /// SAI_SCHEDULER_ATTR_*.
    pub struct SchedulerAttrs for Scheduler {
        SCHEDULING_TYPE = 1 => scheduling_type: i32,
        SCHEDULING_WEIGHT = 2 => scheduling_weight: u8,
        METER_TYPE = 3 => meter_type: i32,
        MIN_BANDWIDTH_RATE = 4 => min_bandwidth_rate: u64,
        MAX_BANDWIDTH_RATE = 5 => max_bandwidth_rate: u64,
    }
}

attribute_message! {
    /// SAI_WRED_ATTR_*.
    pub struct WredAttrs for Wred {
        GREEN_ENABLE = 1 => green_enable: bool,
        GREEN_MIN_THRESHOLD = 2 => green_min_threshold: u32,
        GREEN_MAX_THRESHOLD = 3 => green_max_threshold: u32,
        GREEN_DROP_PROBABILITY = 4 => green_drop_probability: u32,
        ECN_MARK_MODE = 5 => ecn_mark_mode: i32,
    }
}

attribute_message! {
    /// SAI_QOS_MAP_ATTR_*. Map entries are flattened key/value pairs.
    pub struct QosMapAttrs for QosMap {
        TYPE = 1 => map_type: i32,
        MAP_TO_VALUE_LIST = 2 => map_to_value_list: Vec<u32>,
    }
}

attribute_message! {
    /// SAI_BUFFER_POOL_ATTR_*.
    pub struct BufferPoolAttrs for BufferPool {
        SHARED_SIZE = 1 => shared_size: u64,
        TYPE = 2 => pool_type: i32,
        SIZE = 3 => size: u64,
        THRESHOLD_MODE = 4 => threshold_mode: i32,
        XOFF_SIZE = 5 => xoff_size: u64,
    }
}

attribute_message! {
    /// SAI_BUFFER_PROFILE_ATTR_*.
    pub struct BufferProfileAttrs for BufferProfile {
        POOL_ID = 1 => pool_id: u64,
        RESERVED_BUFFER_SIZE = 2 => reserved_buffer_size: u64,
        THRESHOLD_MODE = 3 => threshold_mode: i32,
        SHARED_DYNAMIC_TH = 4 => shared_dynamic_th: i32,
        SHARED_STATIC_TH = 5 => shared_static_th: u64,
        XOFF_TH = 6 => xoff_th: u64,
        XON_TH = 7 => xon_th: u64,
    }
}

attribute_message! {
    /// SAI_SAMPLEPACKET_ATTR_*.
    pub struct SamplepacketAttrs for Samplepacket {
        SAMPLE_RATE = 1 => sample_rate: u32,
        TYPE = 2 => sample_type: i32,
        MODE = 3 => mode: i32,
    }
}

attribute_message! {
    /// SAI_ISOLATION_GROUP_ATTR_*.
    pub struct IsolationGroupAttrs for IsolationGroup {
        TYPE = 1 => group_type: i32,
        ISOLATION_MEMBER_LIST = 2 => isolation_member_list: Vec<u64>,
    }
}

attribute_message! {
    /// SAI_ISOLATION_GROUP_MEMBER_ATTR_*.
    pub struct IsolationGroupMemberAttrs for IsolationGroupMember {
        ISOLATION_GROUP_ID = 1 => isolation_group_id: u64,
        ISOLATION_OBJECT = 2 => isolation_object: u64,
    }
}

attribute_message! {
    /// SAI_L2MC_GROUP_ATTR_*.
    pub struct L2mcGroupAttrs for L2mcGroup {
        L2MC_OUTPUT_COUNT = 1 => l2mc_output_count: u32,
        L2MC_MEMBER_LIST = 2 => l2mc_member_list: Vec<u64>,
    }
}

attribute_message! {
    /// SAI_L2MC_GROUP_MEMBER_ATTR_*.
    pub struct L2mcGroupMemberAttrs for L2mcGroupMember {
        L2MC_GROUP_ID = 1 => l2mc_group_id: u64,
        L2MC_OUTPUT_ID = 2 => l2mc_output_id: u64,
    }
}
