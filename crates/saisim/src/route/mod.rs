//! RouteOrch, RifOrch and NeighOrch - the L3 forwarding objects.
//!
//! Routes land in the FIB of their address family keyed by VRF and
//! destination prefix. Router interfaces bind ports to VRFs and source
//! MACs, and neighbors resolve (interface, next-hop IP) to a destination MAC.

mod neigh;
mod orch;
mod rif;
mod types;

pub use neigh::{neighbor_key, NeighOrch};
pub use orch::{fib_table, RouteOrch, RouteProgram};
pub use rif::RifOrch;
pub use types::{
    NeighborEntryAttrs, NeighborEntryKey, RouteEntryAttrs, RouteEntryKey, RouterInterfaceAttrs,
    RouterInterfaceType,
};
