//! TunnelOrch - IP-in-IP encapsulation and termination.

mod orch;
mod types;

pub use orch::{term_program, TunnelOrch};
pub use types::{
    TunnelAttrs, TunnelMapAttrs, TunnelMapEntryAttrs, TunnelPeerMode, TunnelQosMode,
    TunnelTermTableEntryAttrs, TunnelTermTableEntryType, TunnelType,
};
