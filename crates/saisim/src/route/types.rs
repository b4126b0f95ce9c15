//! Route, router interface and neighbor schemas.

use crate::common::PacketAction;
use saisim_attrs::{attr_enum, attribute_message};
use saisim_types::{IpPrefix, MacAddress, Oid};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Identity of a route: the switch, the VRF and the destination prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteEntryKey {
    pub switch_id: Oid,
    pub vr_id: Oid,
    pub destination: IpPrefix,
}

attribute_message! {
    /// SAI_ROUTE_ENTRY_ATTR_*.
    pub struct RouteEntryAttrs for RouteEntry {
        PACKET_ACTION = 1 => packet_action: PacketAction,
        USER_TRAP_ID = 2 => user_trap_id: u64,
        NEXT_HOP_ID = 3 => next_hop_id: u64,
        META_DATA = 4 => meta_data: u32,
        COUNTER_ID = 5 => counter_id: u64,
    }
}

attr_enum! {
    pub enum RouterInterfaceType {
        Port = 0,
        Vlan = 1,
        Loopback = 2,
        MplsRouter = 3,
        SubPort = 4,
        Bridge = 5,
        Qinq = 6,
    }
}

attribute_message! {
    /// SAI_ROUTER_INTERFACE_ATTR_*.
    pub struct RouterInterfaceAttrs for RouterInterface {
        VIRTUAL_ROUTER_ID = 1 => virtual_router_id: u64,
        TYPE = 2 => rif_type: RouterInterfaceType,
        PORT_ID = 3 => port_id: u64,
        VLAN_ID = 4 => vlan_id: u64,
        SRC_MAC_ADDRESS = 5 => src_mac_address: MacAddress,
        ADMIN_V4_STATE = 6 => admin_v4_state: bool,
        ADMIN_V6_STATE = 7 => admin_v6_state: bool,
        MTU = 8 => mtu: u32,
        OUTER_VLAN_ID = 9 => outer_vlan_id: u16,
    }
}

/// Identity of a neighbor: the router interface it was learned on and
/// its IP address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeighborEntryKey {
    pub switch_id: Oid,
    pub rif_id: Oid,
    pub ip_address: IpAddr,
}

attribute_message! {
    /// SAI_NEIGHBOR_ENTRY_ATTR_*.
    pub struct NeighborEntryAttrs for NeighborEntry {
        DST_MAC_ADDRESS = 1 => dst_mac_address: MacAddress,
        PACKET_ACTION = 2 => packet_action: PacketAction,
        USER_TRAP_ID = 3 => user_trap_id: u64,
        NO_HOST_ROUTE = 4 => no_host_route: bool,
        META_DATA = 5 => meta_data: u32,
    }
}
