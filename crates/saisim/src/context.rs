//! Handles shared by every orchestrator.

use crate::common::engine_id;
use crate::config::SaisimConfig;
use crate::switch::SwitchAttrs;
use log::debug;
use saisim_attrs::{AttributeStore, ObjectKey};
use saisim_fwd::{Action, Entry, EntryKey, ForwardingEngine};
use saisim_types::{ObjectType, Oid, SaiError, SaiResult, NULL_OID};
use std::sync::Arc;

#[derive(Clone)]
pub struct OrchContext {
    pub store: Arc<AttributeStore>,
    pub engine: Arc<dyn ForwardingEngine>,
    pub config: Arc<SaisimConfig>,
}

impl OrchContext {
    pub fn new(
        store: Arc<AttributeStore>,
        engine: Arc<dyn ForwardingEngine>,
        config: Arc<SaisimConfig>,
    ) -> Self {
        Self {
            store,
            engine,
            config,
        }
    }

    pub fn switch_id(&self) -> SaiResult<Oid> {
        match self.store.switch_id() {
            NULL_OID => Err(SaiError::failed_precondition("switch has not been created")),
            oid => Ok(oid),
        }
    }

    pub fn cpu_port(&self) -> SaiResult<Oid> {
        let switch = self.switch_id()?;
        self.store.get(&ObjectKey::Oid(switch), SwitchAttrs::CPU_PORT)
    }

    pub fn object_type(&self, oid: Oid) -> ObjectType {
        self.store.get_type(oid)
    }

    /// Fails with `FailedPrecondition` unless `oid` is a live object of `expected` type.
    pub fn require_type(&self, oid: Oid, expected: ObjectType) -> SaiResult<()> {
        let actual = self.object_type(oid);
        if actual != expected {
            return Err(SaiError::failed_precondition(format!(
                "{:#x} is {}, expected {}",
                oid, actual, expected
            )));
        }
        Ok(())
    }

    /// Engine numeric id of a port-like object.
    pub fn nid(&self, oid: Oid) -> SaiResult<u64> {
        Ok(self.engine.object_nid(&engine_id(oid))?)
    }

    pub fn nid_bytes(&self, oid: Oid) -> SaiResult<Vec<u8>> {
        Ok(self.nid(oid)?.to_be_bytes().to_vec())
    }

    pub fn add_entry(&self, table: &str, key: EntryKey, actions: Vec<Action>) -> SaiResult<()> {
        debug!("{}: add {:?} -> {:?}", table, key, actions);
        Ok(self.engine.table_entry_add(table, Entry { key, actions })?)
    }

    pub fn remove_entry(&self, table: &str, key: EntryKey) -> SaiResult<()> {
        debug!("{}: remove {:?}", table, key);
        let entry = Entry {
            key,
            actions: Vec::new(),
        };
        Ok(self.engine.table_entry_remove(table, &entry)?)
    }
}
