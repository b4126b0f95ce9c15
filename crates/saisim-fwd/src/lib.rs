//! Forwarding engine contract for saisim.
//!
//! The control plane never forwards packets itself. It describes a fixed
//! topology of match/action tables and programs entries into them through
//! the [`ForwardingEngine`] trait. This crate holds:
//!
//! - [`types`]: tables, match fields, actions, ports and events
//! - [`engine`]: the [`ForwardingEngine`] trait
//! - [`memory`]: [`MemoryEngine`], an in-process engine that records every
//!   table and entry so behavior can be inspected

pub mod engine;
pub mod error;
pub mod memory;
pub mod types;

pub use engine::ForwardingEngine;
pub use error::{FwdError, FwdResult};
pub use memory::{MemoryEngine, PortRecord};
pub use types::{
    Action, Entry, EntryKey, Event, FieldId, FlowCounterData, HashAlgorithm, HeaderId,
    MatchField, ObjectAttribute, PacketField, PortDesc, PortKind, PortStatus, PortUpdate,
    TableDesc, TableKind, WeightedActions,
};
