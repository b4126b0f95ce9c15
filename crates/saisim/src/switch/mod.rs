//! SwitchOrch - switch object lifecycle.
//!
//! Creating the switch lays down the fixed table topology and the default
//! objects every other orchestrator depends on (CPU port, VLAN 1, default
//! virtual router, 1Q bridge, trap group, ECMP/LAG hashes).

mod orch;
pub mod topology;
mod types;

pub use orch::{SwitchOrch, SwitchOrchStats};
pub use types::{HashAttrs, NativeHashField, SwitchAttrs};
