//! NextHopOrch - next hops, next hop groups and group members.
//!
//! A group is programmed as a single exact entry holding a CRC32 select
//! over one weighted branch per member. Every membership change rebuilds
//! that entry from the complete member set.

mod orch;
mod types;

pub use orch::{group_actions, group_key, next_hop_key, GroupMember, NextHopOrch};
pub use types::{
    NextHopAttrs, NextHopGroupAttrs, NextHopGroupMemberAttrs, NextHopGroupType, NextHopType,
};
