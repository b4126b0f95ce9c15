//! HostifOrch - host interfaces and the CPU punt path.
//!
//! NETDEV host interfaces are tap ports in the engine cross-connected with
//! their front-panel port. Traps become prioritized flow entries in the
//! trap table that tag packets with the trap id and send them to the CPU.

mod orch;
mod types;

pub use orch::{trap_fields, HostifOrch};
pub use types::{
    HostifAttrs, HostifTableEntryAttrs, HostifTableEntryChannelType, HostifTableEntryType,
    HostifTrapAttrs, HostifTrapGroupAttrs, HostifTrapType, HostifType,
    HostifUserDefinedTrapAttrs, HostifVlanTag,
};
