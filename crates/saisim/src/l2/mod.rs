//! L2Orch - VLANs, VLAN members, bridges and STP.
//!
//! Only VLAN membership reaches the forwarding engine. Bridges, bridge
//! ports and STP instances are stored objects the VLAN code reads from.

mod orch;
mod types;

pub use orch::L2Orch;
pub use types::{
    BridgeAttrs, BridgePortAttrs, BridgePortType, BridgeType, StpAttrs, VlanAttrs,
    VlanMemberAttrs, VlanTaggingMode,
};
