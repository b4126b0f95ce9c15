//! saisim - a SAI control plane over a table/action forwarding engine.
//!
//! Callers create, modify, query and remove switch objects (ports, VLANs,
//! LAGs, router interfaces, routes, next hops, next hop groups, ACLs, host
//! interfaces, tunnels) through [`server::SaiServer`]. Each object family
//! has an orchestrator that compiles object state into match/action
//! entries in the fixed table topology laid down at switch creation.
//!
//! ```text
//! SaiServer ──> Pipeline ──> XOrch handler ──> ForwardingEngine
//!                  │
//!                  └──> AttributeStore (attributes, types, OIDs)
//! ```
//!
//! # Key Components
//!
//! - [`switch::SwitchOrch`]: bootstrap, warm recovery, ACL stage binding
//! - [`ports::PortsOrch`] / [`ports::LagOrch`]: ports, queues, LAGs
//! - [`acl::AclOrch`]: ACL groups as banked flow tables
//! - [`nhg::NextHopOrch`]: next hops and weighted ECMP groups
//! - [`route::RouteOrch`]: FIB and CPU-trap routes

pub mod acl;
pub mod audit;
pub mod common;
pub mod config;
pub mod context;
pub mod hostif;
pub mod l2;
pub mod nhg;
pub mod ports;
pub mod route;
pub mod server;
pub mod stubs;
pub mod switch;
pub mod tables;
pub mod tunnel;
pub mod udf;

pub use config::{ConfigError, SaisimConfig};
pub use server::SaiServer;
