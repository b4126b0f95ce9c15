//! Next hop, next-hop-group and group-member schemas.

use saisim_attrs::{attr_enum, attribute_message};
use saisim_types::MacAddress;
use std::net::IpAddr;

attr_enum! {
    pub enum NextHopType {
        Ip = 0,
        Mpls = 1,
        TunnelEncap = 2,
        Srv6Sidlist = 3,
    }
}

attribute_message! {
    /// SAI_NEXT_HOP_ATTR_*.
    pub struct NextHopAttrs for NextHop {
        TYPE = 1 => next_hop_type: NextHopType,
        IP = 2 => ip: IpAddr,
        ROUTER_INTERFACE_ID = 3 => router_interface_id: u64,
        TUNNEL_ID = 4 => tunnel_id: u64,
        TUNNEL_VNI = 5 => tunnel_vni: u32,
        TUNNEL_MAC = 6 => tunnel_mac: MacAddress,
    }
}

attr_enum! {
    pub enum NextHopGroupType {
        DynamicUnorderedEcmp = 0,
        DynamicOrderedEcmp = 1,
        FineGrainEcmp = 2,
        ProtectionPath = 3,
    }
}

attribute_message! {
    /// SAI_NEXT_HOP_GROUP_ATTR_*.
    pub struct NextHopGroupAttrs for NextHopGroup {
        NEXT_HOP_COUNT = 1 => next_hop_count: u32,
        NEXT_HOP_MEMBER_LIST = 2 => next_hop_member_list: Vec<u64>,
        TYPE = 3 => group_type: NextHopGroupType,
        CONFIGURED_SIZE = 4 => configured_size: u32,
    }
}

attribute_message! {
    /// SAI_NEXT_HOP_GROUP_MEMBER_ATTR_*.
    pub struct NextHopGroupMemberAttrs for NextHopGroupMember {
        NEXT_HOP_GROUP_ID = 1 => next_hop_group_id: u64,
        NEXT_HOP_ID = 2 => next_hop_id: u64,
        WEIGHT = 3 => weight: u32,
        SEQUENCE_ID = 4 => sequence_id: u32,
    }
}
