//! Host interface, trap and trap-group schemas.

use crate::common::PacketAction;
use saisim_attrs::{attr_enum, attribute_message};

attr_enum! {
    pub enum HostifType {
        Netdev = 0,
        Fd = 1,
        Genetlink = 2,
    }
}

attr_enum! {
    pub enum HostifVlanTag {
        Strip = 0,
        Keep = 1,
        Original = 2,
    }
}

attribute_message! {
    /// SAI_HOSTIF_ATTR_*.
    pub struct HostifAttrs for Hostif {
        TYPE = 1 => hostif_type: HostifType,
        OBJ_ID = 2 => obj_id: u64,
        NAME = 3 => name: String,
        OPER_STATUS = 4 => oper_status: bool,
        QUEUE = 5 => queue: u32,
        VLAN_TAG = 6 => vlan_tag: HostifVlanTag,
        GENETLINK_MCGRP_NAME = 7 => genetlink_mcgrp_name: String,
    }
}

attr_enum! {
    /// Trap types with a built-in match in the trap table. Other SAI trap
    /// types are accepted and stored as raw values.
    pub enum HostifTrapType {
        Stp = 0x0,
        Lacp = 0x1,
        Eapol = 0x2,
        Lldp = 0x3,
        Udld = 0xb,
        ArpRequest = 0x2000,
        ArpResponse = 0x2001,
        Dhcp = 0x2002,
        Ospf = 0x2003,
        Dhcpv6 = 0x2006,
        Ipv6NeighborDiscovery = 0x2009,
        Ip2me = 0x4000,
        Ssh = 0x4001,
        Snmp = 0x4002,
        Bgp = 0x4003,
        Bgpv6 = 0x4004,
        TtlError = 0x6001,
    }
}

attribute_message! {
    /// SAI_HOSTIF_TRAP_ATTR_*. TRAP_TYPE is kept as a raw value.
    pub struct HostifTrapAttrs for HostifTrap {
        TRAP_TYPE = 1 => trap_type: i32,
        PACKET_ACTION = 2 => packet_action: PacketAction,
        TRAP_PRIORITY = 3 => trap_priority: u32,
        EXCLUDE_PORT_LIST = 4 => exclude_port_list: Vec<u64>,
        TRAP_GROUP = 5 => trap_group: u64,
    }
}

attribute_message! {
    /// SAI_HOSTIF_TRAP_GROUP_ATTR_*.
    pub struct HostifTrapGroupAttrs for HostifTrapGroup {
        ADMIN_STATE = 1 => admin_state: bool,
        QUEUE = 2 => queue: u32,
        POLICER = 3 => policer: u64,
    }
}

attr_enum! {
    pub enum HostifTableEntryType {
        Port = 0,
        Lag = 1,
        Vlan = 2,
        TrapId = 3,
        Wildcard = 4,
    }
}

attr_enum! {
    pub enum HostifTableEntryChannelType {
        Cb = 0,
        Fd = 1,
        NetdevPhysicalPort = 2,
        NetdevLogicalPort = 3,
        NetdevL3 = 4,
        Genetlink = 5,
    }
}

attribute_message! {
    /// SAI_HOSTIF_TABLE_ENTRY_ATTR_*.
    pub struct HostifTableEntryAttrs for HostifTableEntry {
        TYPE = 1 => entry_type: HostifTableEntryType,
        OBJ_ID = 2 => obj_id: u64,
        TRAP_ID = 3 => trap_id: u64,
        CHANNEL_TYPE = 4 => channel_type: HostifTableEntryChannelType,
        HOST_IF = 5 => host_if: u64,
    }
}

attribute_message! {
    /// SAI_HOSTIF_USER_DEFINED_TRAP_ATTR_*.
    pub struct HostifUserDefinedTrapAttrs for HostifUserDefinedTrap {
        TYPE = 1 => trap_type: i32,
        TRAP_PRIORITY = 2 => trap_priority: u32,
        TRAP_GROUP = 3 => trap_group: u64,
    }
}
