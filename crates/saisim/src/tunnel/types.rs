//! Tunnel, tunnel-termination and tunnel-map schemas.

use saisim_attrs::{attr_enum, attribute_message};
use std::net::IpAddr;

attr_enum! {
    pub enum TunnelType {
        Ipinip = 0,
        IpinipGre = 1,
        Vxlan = 2,
        Mpls = 3,
    }
}

attr_enum! {
    pub enum TunnelPeerMode {
        P2p = 0,
        P2mp = 1,
    }
}

attr_enum! {
    /// Shared by the TTL and DSCP mode attributes.
    pub enum TunnelQosMode {
        UniformModel = 0,
        PipeModel = 1,
    }
}

attribute_message! {
    /// SAI_TUNNEL_ATTR_*.
    pub struct TunnelAttrs for Tunnel {
        TYPE = 1 => tunnel_type: TunnelType,
        UNDERLAY_INTERFACE = 2 => underlay_interface: u64,
        OVERLAY_INTERFACE = 3 => overlay_interface: u64,
        ENCAP_SRC_IP = 4 => encap_src_ip: IpAddr,
        ENCAP_TTL_MODE = 5 => encap_ttl_mode: TunnelQosMode,
        ENCAP_DSCP_MODE = 6 => encap_dscp_mode: TunnelQosMode,
        ENCAP_MAPPERS = 7 => encap_mappers: Vec<u64>,
        DECAP_MAPPERS = 8 => decap_mappers: Vec<u64>,
        DECAP_TTL_MODE = 9 => decap_ttl_mode: TunnelQosMode,
        DECAP_DSCP_MODE = 10 => decap_dscp_mode: TunnelQosMode,
        PEER_MODE = 11 => peer_mode: TunnelPeerMode,
        ENCAP_DST_IP = 12 => encap_dst_ip: IpAddr,
    }
}

attr_enum! {
    pub enum TunnelTermTableEntryType {
        P2p = 0,
        P2mp = 1,
        Mp2p = 2,
        Mp2mp = 3,
    }
}

attribute_message! {
    /// SAI_TUNNEL_TERM_TABLE_ENTRY_ATTR_*.
    pub struct TunnelTermTableEntryAttrs for TunnelTermTableEntry {
        VR_ID = 1 => vr_id: u64,
        TYPE = 2 => entry_type: TunnelTermTableEntryType,
        DST_IP = 3 => dst_ip: IpAddr,
        DST_IP_MASK = 4 => dst_ip_mask: IpAddr,
        SRC_IP = 5 => src_ip: IpAddr,
        SRC_IP_MASK = 6 => src_ip_mask: IpAddr,
        TUNNEL_TYPE = 7 => tunnel_type: TunnelType,
        ACTION_TUNNEL_ID = 8 => action_tunnel_id: u64,
    }
}

attribute_message! {
    /// SAI_TUNNEL_MAP_ATTR_*.
    pub struct TunnelMapAttrs for TunnelMap {
        TYPE = 1 => map_type: i32,
        ENTRY_LIST = 2 => entry_list: Vec<u64>,
    }
}

attribute_message! {
    /// SAI_TUNNEL_MAP_ENTRY_ATTR_*.
    pub struct TunnelMapEntryAttrs for TunnelMapEntry {
        TUNNEL_MAP_TYPE = 1 => tunnel_map_type: i32,
        TUNNEL_MAP = 2 => tunnel_map: u64,
        VLAN_ID_KEY = 3 => vlan_id_key: u16,
        VNI_ID_VALUE = 4 => vni_id_value: u32,
        VNI_ID_KEY = 5 => vni_id_key: u32,
        VLAN_ID_VALUE = 6 => vlan_id_value: u16,
    }
}
