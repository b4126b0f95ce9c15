//! Object identifiers and object types.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw 64-bit object identifier handed out to SAI callers.
pub type Oid = u64;

/// The null object ID (SAI_NULL_OBJECT_ID).
pub const NULL_OID: Oid = 0;

macro_rules! object_types {
    ($($variant:ident = $value:literal => $name:literal),* $(,)?) => {
        /// SAI object types, numbered as in `sai_object_type_t`.
        #[repr(i32)]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum ObjectType {
            #[default]
            $($variant = $value,)*
        }

        impl ObjectType {
            /// Converts a raw `sai_object_type_t` value.
            pub fn from_i32(value: i32) -> Result<Self, ParseError> {
                match value {
                    $($value => Ok(ObjectType::$variant),)*
                    other => Err(ParseError::InvalidObjectType(other)),
                }
            }

            /// Returns the SAI name of the object type.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(ObjectType::$variant => $name,)*
                }
            }
        }
    };
}

object_types! {
    Null = 0 => "SAI_OBJECT_TYPE_NULL",
    Port = 1 => "SAI_OBJECT_TYPE_PORT",
    Lag = 2 => "SAI_OBJECT_TYPE_LAG",
    VirtualRouter = 3 => "SAI_OBJECT_TYPE_VIRTUAL_ROUTER",
    NextHop = 4 => "SAI_OBJECT_TYPE_NEXT_HOP",
    NextHopGroup = 5 => "SAI_OBJECT_TYPE_NEXT_HOP_GROUP",
    RouterInterface = 6 => "SAI_OBJECT_TYPE_ROUTER_INTERFACE",
    AclTable = 7 => "SAI_OBJECT_TYPE_ACL_TABLE",
    AclEntry = 8 => "SAI_OBJECT_TYPE_ACL_ENTRY",
    AclCounter = 9 => "SAI_OBJECT_TYPE_ACL_COUNTER",
    AclRange = 10 => "SAI_OBJECT_TYPE_ACL_RANGE",
    AclTableGroup = 11 => "SAI_OBJECT_TYPE_ACL_TABLE_GROUP",
    AclTableGroupMember = 12 => "SAI_OBJECT_TYPE_ACL_TABLE_GROUP_MEMBER",
    Hostif = 13 => "SAI_OBJECT_TYPE_HOSTIF",
    MirrorSession = 14 => "SAI_OBJECT_TYPE_MIRROR_SESSION",
    Samplepacket = 15 => "SAI_OBJECT_TYPE_SAMPLEPACKET",
    Stp = 16 => "SAI_OBJECT_TYPE_STP",
    HostifTrapGroup = 17 => "SAI_OBJECT_TYPE_HOSTIF_TRAP_GROUP",
    Policer = 18 => "SAI_OBJECT_TYPE_POLICER",
    Wred = 19 => "SAI_OBJECT_TYPE_WRED",
    QosMap = 20 => "SAI_OBJECT_TYPE_QOS_MAP",
    Queue = 21 => "SAI_OBJECT_TYPE_QUEUE",
    Scheduler = 22 => "SAI_OBJECT_TYPE_SCHEDULER",
    SchedulerGroup = 23 => "SAI_OBJECT_TYPE_SCHEDULER_GROUP",
    BufferPool = 24 => "SAI_OBJECT_TYPE_BUFFER_POOL",
    BufferProfile = 25 => "SAI_OBJECT_TYPE_BUFFER_PROFILE",
    IngressPriorityGroup = 26 => "SAI_OBJECT_TYPE_INGRESS_PRIORITY_GROUP",
    LagMember = 27 => "SAI_OBJECT_TYPE_LAG_MEMBER",
    Hash = 28 => "SAI_OBJECT_TYPE_HASH",
    Udf = 29 => "SAI_OBJECT_TYPE_UDF",
    UdfMatch = 30 => "SAI_OBJECT_TYPE_UDF_MATCH",
    UdfGroup = 31 => "SAI_OBJECT_TYPE_UDF_GROUP",
    FdbEntry = 32 => "SAI_OBJECT_TYPE_FDB_ENTRY",
    Switch = 33 => "SAI_OBJECT_TYPE_SWITCH",
    HostifTrap = 34 => "SAI_OBJECT_TYPE_HOSTIF_TRAP",
    HostifTableEntry = 35 => "SAI_OBJECT_TYPE_HOSTIF_TABLE_ENTRY",
    NeighborEntry = 36 => "SAI_OBJECT_TYPE_NEIGHBOR_ENTRY",
    RouteEntry = 37 => "SAI_OBJECT_TYPE_ROUTE_ENTRY",
    Vlan = 38 => "SAI_OBJECT_TYPE_VLAN",
    VlanMember = 39 => "SAI_OBJECT_TYPE_VLAN_MEMBER",
    HostifPacket = 40 => "SAI_OBJECT_TYPE_HOSTIF_PACKET",
    TunnelMap = 41 => "SAI_OBJECT_TYPE_TUNNEL_MAP",
    Tunnel = 42 => "SAI_OBJECT_TYPE_TUNNEL",
    TunnelTermTableEntry = 43 => "SAI_OBJECT_TYPE_TUNNEL_TERM_TABLE_ENTRY",
    FdbFlush = 44 => "SAI_OBJECT_TYPE_FDB_FLUSH",
    NextHopGroupMember = 45 => "SAI_OBJECT_TYPE_NEXT_HOP_GROUP_MEMBER",
    StpPort = 46 => "SAI_OBJECT_TYPE_STP_PORT",
    L2mcGroup = 49 => "SAI_OBJECT_TYPE_L2MC_GROUP",
    L2mcGroupMember = 50 => "SAI_OBJECT_TYPE_L2MC_GROUP_MEMBER",
    HostifUserDefinedTrap = 56 => "SAI_OBJECT_TYPE_HOSTIF_USER_DEFINED_TRAP",
    Bridge = 57 => "SAI_OBJECT_TYPE_BRIDGE",
    BridgePort = 58 => "SAI_OBJECT_TYPE_BRIDGE_PORT",
    TunnelMapEntry = 59 => "SAI_OBJECT_TYPE_TUNNEL_MAP_ENTRY",
    IsolationGroup = 70 => "SAI_OBJECT_TYPE_ISOLATION_GROUP",
    IsolationGroupMember = 71 => "SAI_OBJECT_TYPE_ISOLATION_GROUP_MEMBER",
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_i32() {
        assert_eq!(ObjectType::from_i32(1).unwrap(), ObjectType::Port);
        assert_eq!(ObjectType::from_i32(33).unwrap(), ObjectType::Switch);
        assert_eq!(ObjectType::from_i32(45).unwrap(), ObjectType::NextHopGroupMember);
        assert!(ObjectType::from_i32(47).is_err());
    }

    #[test]
    fn test_default_is_null() {
        assert_eq!(ObjectType::default(), ObjectType::Null);
        assert_eq!(ObjectType::Null as i32, 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(ObjectType::RouteEntry.to_string(), "SAI_OBJECT_TYPE_ROUTE_ENTRY");
    }
}
