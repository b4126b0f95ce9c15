//! Port, queue, scheduler-group and LAG schemas.

use saisim_attrs::{attr_enum, attribute_message};

attr_enum! {
    pub enum PortType {
        Logical = 0,
        Cpu = 1,
    }
}

attr_enum! {
    pub enum PortOperStatus {
        Unknown = 0,
        Up = 1,
        Down = 2,
        Testing = 3,
        NotPresent = 4,
    }
}

attr_enum! {
    pub enum PortFecMode {
        None = 0,
        Rs = 1,
        Fc = 2,
        Auto = 3,
    }
}

attribute_message! {
    /// SAI_PORT_ATTR_*.
    pub struct PortAttrs for Port {
        TYPE = 1 => port_type: PortType,
        OPER_STATUS = 2 => oper_status: PortOperStatus,
        HW_LANE_LIST = 3 => hw_lane_list: Vec<u32>,
        SPEED = 4 => speed: u32,
        ADMIN_STATE = 5 => admin_state: bool,
        MTU = 6 => mtu: u32,
        QOS_NUMBER_OF_QUEUES = 7 => qos_number_of_queues: u32,
        QOS_QUEUE_LIST = 8 => qos_queue_list: Vec<u64>,
        QOS_NUMBER_OF_SCHEDULER_GROUPS = 9 => qos_number_of_scheduler_groups: u32,
        QOS_SCHEDULER_GROUP_LIST = 10 => qos_scheduler_group_list: Vec<u64>,
        NUMBER_OF_INGRESS_PRIORITY_GROUPS = 11 => number_of_ingress_priority_groups: u32,
        INGRESS_PRIORITY_GROUP_LIST = 12 => ingress_priority_group_list: Vec<u64>,
        PORT_VLAN_ID = 13 => port_vlan_id: u16,
        FEC_MODE = 14 => fec_mode: PortFecMode,
        AUTO_NEG_MODE = 15 => auto_neg_mode: bool,
        SUPPORTED_SPEED = 16 => supported_speed: Vec<u32>,
        OPER_SPEED = 17 => oper_speed: u32,
        INGRESS_ACL = 18 => ingress_acl: u64,
        EGRESS_ACL = 19 => egress_acl: u64,
        PRIORITY_FLOW_CONTROL = 20 => priority_flow_control: u8,
        QOS_DEFAULT_TC = 21 => qos_default_tc: u8,
    }
}

attr_enum! {
    pub enum QueueType {
        All = 0,
        Unicast = 1,
        Multicast = 2,
    }
}

attribute_message! {
    /// SAI_QUEUE_ATTR_*.
    pub struct QueueAttrs for Queue {
        TYPE = 1 => queue_type: QueueType,
        PORT = 2 => port: u64,
        INDEX = 3 => index: u8,
        PARENT_SCHEDULER_NODE = 4 => parent_scheduler_node: u64,
        WRED_PROFILE_ID = 5 => wred_profile_id: u64,
        BUFFER_PROFILE_ID = 6 => buffer_profile_id: u64,
        SCHEDULER_PROFILE_ID = 7 => scheduler_profile_id: u64,
    }
}

attribute_message! {
    /// SAI_SCHEDULER_GROUP_ATTR_*.
    pub struct SchedulerGroupAttrs for SchedulerGroup {
        CHILD_COUNT = 1 => child_count: u32,
        CHILD_LIST = 2 => child_list: Vec<u64>,
        PORT_ID = 3 => port_id: u64,
        LEVEL = 4 => level: u8,
        MAX_CHILDS = 5 => max_childs: u8,
        SCHEDULER_PROFILE_ID = 6 => scheduler_profile_id: u64,
        PARENT_NODE = 7 => parent_node: u64,
    }
}

attribute_message! {
    /// SAI_LAG_ATTR_*.
    pub struct LagAttrs for Lag {
        PORT_LIST = 1 => port_list: Vec<u64>,
        INGRESS_ACL = 2 => ingress_acl: u64,
        EGRESS_ACL = 3 => egress_acl: u64,
        PORT_VLAN_ID = 4 => port_vlan_id: u16,
        DEFAULT_VLAN_PRIORITY = 5 => default_vlan_priority: u8,
        DROP_UNTAGGED = 6 => drop_untagged: bool,
        DROP_TAGGED = 7 => drop_tagged: bool,
        LABEL = 8 => label: String,
    }
}

attribute_message! {
    /// SAI_LAG_MEMBER_ATTR_*.
    pub struct LagMemberAttrs for LagMember {
        LAG_ID = 1 => lag_id: u64,
        PORT_ID = 2 => port_id: u64,
        EGRESS_DISABLE = 3 => egress_disable: bool,
        INGRESS_DISABLE = 4 => ingress_disable: bool,
    }
}
