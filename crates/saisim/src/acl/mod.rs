//! AclOrch - ACL table groups, tables, entries and counters.
//!
//! Each PARALLEL table group is one flow table in the engine. Every member
//! table gets its own bank of that flow table, and entries are compiled into
//! masked flow entries in their table's bank.

mod compile;
mod orch;
mod types;

pub use compile::{compile_entry, CompiledEntry, EntryResolver};
pub use orch::{AclOrch, AclOrchStats};
pub use types::{
    AclCounterAttrs, AclEntryAttrs, AclIpType, AclStage, AclTableAttrs, AclTableGroupAttrs,
    AclTableGroupMemberAttrs, AclTableGroupType, TableLocation,
};
