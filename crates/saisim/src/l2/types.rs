//! VLAN, bridge and STP schemas.

use saisim_attrs::{attr_enum, attribute_message};

attribute_message! {
    /// SAI_VLAN_ATTR_*.
    pub struct VlanAttrs for Vlan {
        VLAN_ID = 1 => vlan_id: u16,
        MEMBER_LIST = 2 => member_list: Vec<u64>,
        MAX_LEARNED_ADDRESSES = 3 => max_learned_addresses: u32,
        STP_INSTANCE = 4 => stp_instance: u64,
        LEARN_DISABLE = 5 => learn_disable: bool,
    }
}

attr_enum! {
    pub enum VlanTaggingMode {
        Untagged = 0,
        Tagged = 1,
        PriorityTagged = 2,
    }
}

attribute_message! {
    /// SAI_VLAN_MEMBER_ATTR_*.
    pub struct VlanMemberAttrs for VlanMember {
        VLAN_ID = 1 => vlan_id: u64,
        BRIDGE_PORT_ID = 2 => bridge_port_id: u64,
        VLAN_TAGGING_MODE = 3 => vlan_tagging_mode: VlanTaggingMode,
    }
}

attr_enum! {
    pub enum BridgeType {
        OneQ = 0,
        OneD = 1,
    }
}

attribute_message! {
    /// SAI_BRIDGE_ATTR_*.
    pub struct BridgeAttrs for Bridge {
        TYPE = 1 => bridge_type: BridgeType,
        PORT_LIST = 2 => port_list: Vec<u64>,
        MAX_LEARNED_ADDRESSES = 3 => max_learned_addresses: u32,
        LEARN_DISABLE = 4 => learn_disable: bool,
    }
}

attr_enum! {
    pub enum BridgePortType {
        Port = 0,
        SubPort = 1,
        OneQRouter = 2,
        OneDRouter = 3,
        Tunnel = 4,
    }
}

attribute_message! {
    /// SAI_BRIDGE_PORT_ATTR_*.
    pub struct BridgePortAttrs for BridgePort {
        TYPE = 1 => bridge_port_type: BridgePortType,
        PORT_ID = 2 => port_id: u64,
        VLAN_ID = 3 => vlan_id: u16,
        RIF_ID = 4 => rif_id: u64,
        TUNNEL_ID = 5 => tunnel_id: u64,
        BRIDGE_ID = 6 => bridge_id: u64,
        ADMIN_STATE = 7 => admin_state: bool,
    }
}

attribute_message! {
    /// SAI_STP_ATTR_*.
    pub struct StpAttrs for Stp {
        VLAN_LIST = 1 => vlan_list: Vec<u32>,
        BRIDGE_ID = 2 => bridge_id: u64,
        PORT_LIST = 3 => port_list: Vec<u64>,
    }
}
