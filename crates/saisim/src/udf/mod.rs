//! UdfOrch - user-defined fields.
//!
//! A UDF names a byte range relative to a packet header. ACL entries match
//! UDF groups; each UDF in the group contributes one masked byte match.

mod orch;
mod types;

pub use orch::UdfOrch;
pub use types::{UdfAttrs, UdfBase, UdfGroupAttrs, UdfGroupType, UdfMatchAttrs};
