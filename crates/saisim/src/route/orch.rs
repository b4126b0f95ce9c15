//! Route entries.
//!
//! A route compiles to exactly one engine entry, either in the FIB of its
//! address family or, for routes pointing at the CPU port, in the trap
//! table. Which table holds it depends only on the route key, the packet
//! action and whether NEXT_HOP_ID is the CPU port, so removal can locate the
//! entry after the next hop itself is gone.

use super::types::{RouteEntryAttrs, RouteEntryKey};
use crate::common::{engine_id, merge_attrs, oid_bytes, PacketAction};
use crate::context::OrchContext;
use crate::tables;
use log::debug;
use saisim_attrs::{CreateEntryRequest, ObjectKey, RemoveEntryRequest, SetEntryRequest};
use saisim_fwd::{Action, EntryKey, MatchField, PacketField};
use saisim_types::{ObjectType, SaiError, SaiResult};

/// Where and how a route is programmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteProgram {
    pub table: &'static str,
    pub key: EntryKey,
    pub actions: Vec<Action>,
}

fn destination_fields(key: &RouteEntryKey) -> Vec<MatchField> {
    vec![
        MatchField::exact(PacketField::PacketVrf, oid_bytes(key.vr_id)),
        MatchField::masked(
            PacketField::IpAddrDst,
            key.destination.network_octets(),
            key.destination.mask_octets(),
        ),
    ]
}

/// Longer prefixes get numerically lower, i.e. stronger, priorities.
fn trap_key(key: &RouteEntryKey) -> EntryKey {
    EntryKey::Flow {
        priority: u32::MAX - key.destination.prefix_len(),
        bank: 0,
        fields: destination_fields(key),
    }
}

pub fn fib_table(key: &RouteEntryKey) -> &'static str {
    if key.destination.is_ipv4() {
        tables::FIB_V4
    } else {
        tables::FIB_V6
    }
}

pub struct RouteOrch {
    ctx: OrchContext,
}

impl RouteOrch {
    pub fn new(ctx: OrchContext) -> Self {
        Self { ctx }
    }

    /// Compiles a route into its engine entry.
    pub fn program(&self, key: &RouteEntryKey, attrs: &RouteEntryAttrs) -> SaiResult<RouteProgram> {
        let fib = |actions| RouteProgram {
            table: fib_table(key),
            key: EntryKey::Prefix(destination_fields(key)),
            actions,
        };

        let action = attrs.packet_action.unwrap_or(PacketAction::Forward);
        if action.is_drop_like() {
            return Ok(fib(vec![Action::Drop]));
        }

        let next_hop = attrs.next_hop_id.ok_or_else(|| {
            SaiError::invalid_argument(format!("route {}: NEXT_HOP_ID is mandatory", key.destination))
        })?;
        let actions = match self.ctx.object_type(next_hop) {
            ObjectType::NextHop => vec![
                Action::set(PacketField::PacketNextHopId, oid_bytes(next_hop)),
                Action::lookup(tables::NEXT_HOP),
            ],
            ObjectType::NextHopGroup => vec![
                Action::set(PacketField::PacketNextHopGroupId, oid_bytes(next_hop)),
                Action::lookup(tables::NEXT_HOP_GROUP),
            ],
            ObjectType::RouterInterface => vec![
                Action::copy(PacketField::PacketNextHopIp, PacketField::IpAddrDst),
                Action::set(PacketField::PacketOutputIface, oid_bytes(next_hop)),
                Action::lookup(tables::NEXT_HOP_ACTION),
            ],
            ObjectType::Port if next_hop == self.ctx.cpu_port()? => {
                return Ok(RouteProgram {
                    table: tables::TRAP,
                    key: trap_key(key),
                    actions: vec![Action::Transmit {
                        port: engine_id(next_hop),
                        immediate: true,
                    }],
                });
            }
            ObjectType::Port => vec![
                Action::copy(PacketField::PacketNextHopIp, PacketField::IpAddrDst),
                Action::Transmit {
                    port: engine_id(next_hop),
                    immediate: false,
                },
            ],
            other => {
                return Err(SaiError::invalid_argument(format!(
                    "route {}: unsupported next hop {:#x} of type {}",
                    key.destination, next_hop, other
                )))
            }
        };
        Ok(fib(actions))
    }

    /// Table and key an installed route occupies. Unlike `program` this never
    /// resolves the next hop, which may have been removed since.
    fn placement(
        &self,
        key: &RouteEntryKey,
        attrs: &RouteEntryAttrs,
    ) -> (&'static str, EntryKey) {
        let forwards = !attrs
            .packet_action
            .unwrap_or(PacketAction::Forward)
            .is_drop_like();
        let to_cpu = match (attrs.next_hop_id, self.ctx.cpu_port()) {
            (Some(next_hop), Ok(cpu)) => next_hop == cpu,
            _ => false,
        };
        if forwards && to_cpu {
            (tables::TRAP, trap_key(key))
        } else {
            (fib_table(key), EntryKey::Prefix(destination_fields(key)))
        }
    }

    pub fn create_route(
        &self,
        req: &CreateEntryRequest<RouteEntryKey, RouteEntryAttrs>,
    ) -> SaiResult<()> {
        let program = self.program(&req.entry, &req.attrs)?;
        debug!("route {} -> {}", req.entry.destination, program.table);
        self.ctx.add_entry(program.table, program.key, program.actions)
    }

    fn stored(&self, entry: &RouteEntryKey) -> SaiResult<RouteEntryAttrs> {
        let key = ObjectKey::entry(entry)?;
        if self.ctx.store.key_type(&key) != ObjectType::RouteEntry {
            return Err(SaiError::not_found(format!("route {}", entry.destination)));
        }
        self.ctx.store.load(&key)
    }

    pub fn remove_route(&self, req: &RemoveEntryRequest<RouteEntryKey>) -> SaiResult<()> {
        let attrs = self.stored(&req.entry)?;
        let (table, key) = self.placement(&req.entry, &attrs);
        self.ctx.remove_entry(table, key)
    }

    /// Reprograms with the merged attributes. A route moving between the
    /// FIB and the trap table has its old entry removed first.
    pub fn set_route(&self, req: &SetEntryRequest<RouteEntryKey, RouteEntryAttrs>) -> SaiResult<()> {
        let old = self.stored(&req.entry)?;
        let mut new = old.clone();
        merge_attrs(&mut new, &req.attrs)?;

        let (table, key) = self.placement(&req.entry, &old);
        let after = self.program(&req.entry, &new)?;
        if table != after.table || key != after.key {
            self.ctx.remove_entry(table, key)?;
        }
        self.ctx.add_entry(after.table, after.key, after.actions)
    }
}
