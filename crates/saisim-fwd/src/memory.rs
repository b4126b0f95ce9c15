//! In-memory forwarding engine.
//!
//! Records tables, entries, ports and counters exactly as programmed. The
//! simulator binary runs on it, and tests use its query helpers to check
//! what the control plane installed.

use crate::engine::ForwardingEngine;
use crate::error::{FwdError, FwdResult};
use crate::types::{
    Action, Entry, EntryKey, Event, FlowCounterData, ObjectAttribute, PortDesc, PortKind,
    PortStatus, PortUpdate, TableDesc, TableKind,
};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Snapshot of an engine port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRecord {
    pub desc: PortDesc,
    pub nid: u64,
    pub admin_up: bool,
    /// Physical link state, independent of admin state.
    pub link_up: bool,
    pub input_actions: Vec<Action>,
    pub output_actions: Vec<Action>,
    pub members: Vec<String>,
    pub attributes: Vec<ObjectAttribute>,
}

impl PortRecord {
    fn status(&self) -> PortStatus {
        PortStatus {
            admin_up: self.admin_up,
            oper_up: self.admin_up && self.link_up,
        }
    }
}

#[derive(Debug)]
struct TableState {
    desc: TableDesc,
    entries: Vec<Entry>,
}

#[derive(Default)]
struct EngineState {
    tables: BTreeMap<String, TableState>,
    ports: BTreeMap<String, PortRecord>,
    counters: HashMap<String, FlowCounterData>,
    next_nid: u64,
    subscribers: Vec<UnboundedSender<Event>>,
}

impl EngineState {
    fn table_mut(&mut self, table: &str) -> FwdResult<&mut TableState> {
        self.tables
            .get_mut(table)
            .ok_or_else(|| FwdError::TableNotFound(table.to_string()))
    }

    fn port_mut(&mut self, port: &str) -> FwdResult<&mut PortRecord> {
        self.ports
            .get_mut(port)
            .ok_or_else(|| FwdError::ObjectNotFound(port.to_string()))
    }

    fn notify(&mut self, event: Event) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Forwarding engine that keeps all state in process memory.
#[derive(Default)]
pub struct MemoryEngine {
    state: Mutex<EngineState>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entries of a table in installation order.
    pub fn entries(&self, table: &str) -> Vec<Entry> {
        self.lock()
            .tables
            .get(table)
            .map(|t| t.entries.clone())
            .unwrap_or_default()
    }

    pub fn table(&self, table: &str) -> Option<TableDesc> {
        self.lock().tables.get(table).map(|t| t.desc.clone())
    }

    pub fn table_ids(&self) -> Vec<String> {
        self.lock().tables.keys().cloned().collect()
    }

    pub fn port(&self, port: &str) -> Option<PortRecord> {
        self.lock().ports.get(port).cloned()
    }

    /// Adds to a flow counter, as traffic would.
    pub fn count(&self, counter: &str, packets: u64, bytes: u64) -> FwdResult<()> {
        let mut state = self.lock();
        let data = state
            .counters
            .get_mut(counter)
            .ok_or_else(|| FwdError::ObjectNotFound(counter.to_string()))?;
        data.packets += packets;
        data.bytes += bytes;
        Ok(())
    }

    /// Changes the physical link state of a port and notifies subscribers
    /// when the operational state changes.
    pub fn set_link_state(&self, port: &str, link_up: bool) -> FwdResult<()> {
        let mut state = self.lock();
        let record = state.port_mut(port)?;
        let before = record.status().oper_up;
        record.link_up = link_up;
        let after = record.status().oper_up;
        if before != after {
            state.notify(Event::PortState {
                port: port.to_string(),
                oper_up: after,
            });
        }
        Ok(())
    }
}

fn key_matches_table(kind: &TableKind, key: &EntryKey) -> bool {
    matches!(
        (kind, key),
        (TableKind::Exact { .. }, EntryKey::Exact(_))
            | (TableKind::Prefix { .. }, EntryKey::Prefix(_))
            | (TableKind::Flow { .. }, EntryKey::Flow { .. })
            | (TableKind::Action, EntryKey::Action { .. })
    )
}

impl ForwardingEngine for MemoryEngine {
    fn table_create(&self, desc: TableDesc) -> FwdResult<()> {
        let mut state = self.lock();
        if state.tables.contains_key(&desc.id) {
            return Err(FwdError::TableExists(desc.id));
        }
        debug!("table_create: {} {:?}", desc.id, desc.kind);
        state.tables.insert(
            desc.id.clone(),
            TableState {
                desc,
                entries: Vec::new(),
            },
        );
        Ok(())
    }

    fn table_delete(&self, table: &str) -> FwdResult<()> {
        let mut state = self.lock();
        state
            .tables
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| FwdError::TableNotFound(table.to_string()))
    }

    fn table_entry_add(&self, table: &str, entry: Entry) -> FwdResult<()> {
        let mut state = self.lock();
        let t = state.table_mut(table)?;
        if !key_matches_table(&t.desc.kind, &entry.key) {
            return Err(FwdError::InvalidEntry {
                table: table.to_string(),
                reason: format!("key {:?} does not fit table kind", entry.key),
            });
        }
        if let (TableKind::Flow { banks }, EntryKey::Flow { bank, .. }) =
            (&mut t.desc.kind, &entry.key)
        {
            if *bank >= *banks {
                debug!("table {}: growing to {} banks", table, bank + 1);
                *banks = bank + 1;
            }
        }
        match t.entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => t.entries.push(entry),
        }
        Ok(())
    }

    fn table_entry_remove(&self, table: &str, entry: &Entry) -> FwdResult<()> {
        let mut state = self.lock();
        let t = state.table_mut(table)?;
        let before = t.entries.len();
        t.entries.retain(|e| e.key != entry.key);
        if t.entries.len() == before {
            return Err(FwdError::EntryNotFound {
                table: table.to_string(),
            });
        }
        Ok(())
    }

    fn port_create(&self, desc: PortDesc) -> FwdResult<()> {
        let mut state = self.lock();
        if state.ports.contains_key(&desc.id) {
            return Err(FwdError::ObjectExists(desc.id));
        }
        state.next_nid += 1;
        let nid = state.next_nid;
        let link_up = !matches!(desc.kind, PortKind::Fake);
        debug!("port_create: {} {:?} nid={}", desc.id, desc.kind, nid);
        state.ports.insert(
            desc.id.clone(),
            PortRecord {
                desc,
                nid,
                admin_up: false,
                link_up,
                input_actions: Vec::new(),
                output_actions: Vec::new(),
                members: Vec::new(),
                attributes: Vec::new(),
            },
        );
        Ok(())
    }

    fn port_update(&self, port: &str, update: PortUpdate) -> FwdResult<()> {
        let mut state = self.lock();
        if let PortUpdate::AggregateAdd { member } | PortUpdate::AggregateRemove { member } =
            &update
        {
            if !state.ports.contains_key(member) {
                return Err(FwdError::ObjectNotFound(member.clone()));
            }
        }
        let record = state.port_mut(port)?;
        match update {
            PortUpdate::Actions { input, output } => {
                record.input_actions = input;
                record.output_actions = output;
            }
            PortUpdate::AggregateAdd { member } => {
                if !record.members.contains(&member) {
                    record.members.push(member);
                }
            }
            PortUpdate::AggregateRemove { member } => {
                record.members.retain(|m| *m != member);
            }
        }
        Ok(())
    }

    fn port_state(&self, port: &str, admin_up: Option<bool>) -> FwdResult<PortStatus> {
        let mut state = self.lock();
        let record = state.port_mut(port)?;
        let before = record.status();
        if let Some(admin_up) = admin_up {
            record.admin_up = admin_up;
        }
        let after = record.status();
        if before.oper_up != after.oper_up {
            state.notify(Event::PortState {
                port: port.to_string(),
                oper_up: after.oper_up,
            });
        }
        Ok(after)
    }

    fn object_nid(&self, id: &str) -> FwdResult<u64> {
        self.lock()
            .ports
            .get(id)
            .map(|p| p.nid)
            .ok_or_else(|| FwdError::ObjectNotFound(id.to_string()))
    }

    fn attribute_update(&self, id: &str, attr: ObjectAttribute) -> FwdResult<()> {
        let mut state = self.lock();
        let record = state.port_mut(id)?;
        record
            .attributes
            .retain(|a| std::mem::discriminant(a) != std::mem::discriminant(&attr));
        record.attributes.push(attr);
        Ok(())
    }

    fn object_delete(&self, id: &str) -> FwdResult<()> {
        let mut state = self.lock();
        if state.ports.remove(id).is_some() {
            for port in state.ports.values_mut() {
                port.members.retain(|m| m != id);
            }
            return Ok(());
        }
        if state.counters.remove(id).is_some() {
            return Ok(());
        }
        warn!("object_delete: unknown object {}", id);
        Err(FwdError::ObjectNotFound(id.to_string()))
    }

    fn flow_counter_create(&self, id: &str) -> FwdResult<()> {
        let mut state = self.lock();
        if state.counters.contains_key(id) {
            return Err(FwdError::ObjectExists(id.to_string()));
        }
        state
            .counters
            .insert(id.to_string(), FlowCounterData::default());
        Ok(())
    }

    fn flow_counter_query(&self, id: &str) -> FwdResult<FlowCounterData> {
        self.lock()
            .counters
            .get(id)
            .copied()
            .ok_or_else(|| FwdError::ObjectNotFound(id.to_string()))
    }

    fn notify_subscribe(&self) -> FwdResult<UnboundedReceiver<Event>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldId, MatchField, PacketField};
    use pretty_assertions::assert_eq;

    fn exact_table(engine: &MemoryEngine, id: &str) {
        engine
            .table_create(TableDesc::new(
                id,
                TableKind::Exact {
                    key: vec![FieldId::packet(PacketField::PacketNextHopId)],
                },
            ))
            .unwrap();
    }

    fn nh_entry(id: u8, actions: Vec<Action>) -> Entry {
        Entry {
            key: EntryKey::Exact(vec![MatchField::exact(
                PacketField::PacketNextHopId,
                vec![0, 0, 0, 0, 0, 0, 0, id],
            )]),
            actions,
        }
    }

    #[test]
    fn test_entry_add_replaces_same_key() {
        let engine = MemoryEngine::new();
        exact_table(&engine, "nh");
        engine.table_entry_add("nh", nh_entry(1, vec![Action::Drop])).unwrap();
        engine
            .table_entry_add("nh", nh_entry(1, vec![Action::Continue]))
            .unwrap();
        engine.table_entry_add("nh", nh_entry(2, vec![Action::Drop])).unwrap();

        let entries = engine.entries("nh");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].actions, vec![Action::Continue]);
    }

    #[test]
    fn test_entry_remove_missing() {
        let engine = MemoryEngine::new();
        exact_table(&engine, "nh");
        let err = engine.table_entry_remove("nh", &nh_entry(1, vec![])).unwrap_err();
        assert_eq!(
            err,
            FwdError::EntryNotFound {
                table: "nh".to_string()
            }
        );
    }

    #[test]
    fn test_key_kind_mismatch() {
        let engine = MemoryEngine::new();
        exact_table(&engine, "nh");
        let entry = Entry {
            key: EntryKey::Action { id: 0 },
            actions: vec![],
        };
        assert!(matches!(
            engine.table_entry_add("nh", entry),
            Err(FwdError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn test_duplicate_table() {
        let engine = MemoryEngine::new();
        exact_table(&engine, "nh");
        assert_eq!(
            engine.table_create(TableDesc::new("nh", TableKind::Action)),
            Err(FwdError::TableExists("nh".to_string()))
        );
    }

    #[test]
    fn test_flow_table_grows_banks() {
        let engine = MemoryEngine::new();
        engine
            .table_create(TableDesc::new("acl", TableKind::Flow { banks: 1 }))
            .unwrap();
        engine
            .table_entry_add(
                "acl",
                Entry {
                    key: EntryKey::Flow {
                        priority: 1,
                        bank: 2,
                        fields: vec![],
                    },
                    actions: vec![Action::Drop],
                },
            )
            .unwrap();
        assert_eq!(
            engine.table("acl").unwrap().kind,
            TableKind::Flow { banks: 3 }
        );
    }

    #[test]
    fn test_port_nids_are_distinct() {
        let engine = MemoryEngine::new();
        for id in ["p1", "p2"] {
            engine
                .port_create(PortDesc {
                    id: id.to_string(),
                    kind: PortKind::Kernel {
                        device: "eth1".to_string(),
                    },
                })
                .unwrap();
        }
        assert_ne!(engine.object_nid("p1").unwrap(), engine.object_nid("p2").unwrap());
        assert!(engine.object_nid("p3").is_err());
    }

    #[test]
    fn test_fake_port_never_comes_up() {
        let engine = MemoryEngine::new();
        engine
            .port_create(PortDesc {
                id: "p".to_string(),
                kind: PortKind::Fake,
            })
            .unwrap();
        let status = engine.port_state("p", Some(true)).unwrap();
        assert_eq!(
            status,
            PortStatus {
                admin_up: true,
                oper_up: false
            }
        );
    }

    #[tokio::test]
    async fn test_link_events() {
        let engine = MemoryEngine::new();
        let mut rx = engine.notify_subscribe().unwrap();
        engine
            .port_create(PortDesc {
                id: "p".to_string(),
                kind: PortKind::Cpu,
            })
            .unwrap();
        engine.port_state("p", Some(true)).unwrap();
        engine.set_link_state("p", false).unwrap();

        assert_eq!(
            rx.recv().await,
            Some(Event::PortState {
                port: "p".to_string(),
                oper_up: true
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(Event::PortState {
                port: "p".to_string(),
                oper_up: false
            })
        );
    }

    #[test]
    fn test_flow_counters() {
        let engine = MemoryEngine::new();
        engine.flow_counter_create("c").unwrap();
        engine.count("c", 3, 300).unwrap();
        assert_eq!(
            engine.flow_counter_query("c").unwrap(),
            FlowCounterData {
                packets: 3,
                bytes: 300
            }
        );
        engine.object_delete("c").unwrap();
        assert!(engine.flow_counter_query("c").is_err());
    }
}
