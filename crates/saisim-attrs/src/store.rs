//! Object arena and ID allocator.
//!
//! One mutex guards the attribute maps, the type map and the cached switch
//! id. It is held only for the duration of a single store operation, never
//! across handler logic or forwarding-engine calls.

use crate::message::AttributeMessage;
use crate::value::{AttrId, AttrType, AttrValue};
use log::debug;
use saisim_types::{ObjectType, Oid, SaiError, SaiResult, NULL_OID};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Identity of a stored object.
///
/// Most objects are addressed by OID; entry objects such as routes and
/// neighbors are addressed by the serialized bytes of their key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKey {
    Oid(Oid),
    Entry(Vec<u8>),
}

impl ObjectKey {
    pub fn entry<K: Serialize>(key: &K) -> SaiResult<Self> {
        serde_json::to_vec(key)
            .map(ObjectKey::Entry)
            .map_err(|e| SaiError::internal(format!("failed to serialize entry key: {}", e)))
    }
}

impl From<Oid> for ObjectKey {
    fn from(oid: Oid) -> Self {
        ObjectKey::Oid(oid)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKey::Oid(oid) => write!(f, "{:#x}", oid),
            ObjectKey::Entry(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
        }
    }
}

/// Monotonic 64-bit object id source. The first id handed out is 1.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: AtomicU64,
}

impl IdAllocator {
    pub fn next_id(&self) -> Oid {
        self.last.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn reset(&self) {
        self.last.store(0, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
struct StoreState {
    attrs: HashMap<ObjectKey, BTreeMap<AttrId, AttrValue>>,
    types: HashMap<ObjectKey, ObjectType>,
    switch_id: Oid,
}

/// Attribute and type storage for every object of the switch.
#[derive(Debug, Default)]
pub struct AttributeStore {
    ids: IdAllocator,
    state: Mutex<StoreState>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn next_id(&self) -> Oid {
        self.ids.next_id()
    }

    /// Records the type of an object. Recording a switch caches its id.
    pub fn set_type(&self, key: &ObjectKey, object_type: ObjectType) {
        let mut state = self.lock();
        if let (ObjectKey::Oid(oid), ObjectType::Switch) = (key, object_type) {
            state.switch_id = *oid;
        }
        state.types.insert(key.clone(), object_type);
    }

    /// Type of an OID; [`ObjectType::Null`] when unknown.
    pub fn get_type(&self, oid: Oid) -> ObjectType {
        self.key_type(&ObjectKey::Oid(oid))
    }

    pub fn key_type(&self, key: &ObjectKey) -> ObjectType {
        self.lock().types.get(key).copied().unwrap_or_default()
    }

    pub fn object_exists(&self, key: &ObjectKey) -> bool {
        self.lock().types.contains_key(key)
    }

    /// Cached switch id, or the null OID before a switch exists.
    pub fn switch_id(&self) -> Oid {
        self.lock().switch_id
    }

    /// All OIDs of a type, in ascending order.
    pub fn objects_of_type(&self, object_type: ObjectType) -> Vec<Oid> {
        let state = self.lock();
        let mut oids: Vec<Oid> = state
            .types
            .iter()
            .filter_map(|(key, ty)| match key {
                ObjectKey::Oid(oid) if *ty == object_type => Some(*oid),
                _ => None,
            })
            .collect();
        oids.sort_unstable();
        oids
    }

    /// Stores every present field of `message`, including empty lists.
    pub fn store_attributes<M: AttributeMessage>(&self, key: &ObjectKey, message: &M) {
        self.store_values(key, message.attributes());
    }

    pub fn store_values(&self, key: &ObjectKey, values: Vec<(AttrId, AttrValue)>) {
        if values.is_empty() {
            return;
        }
        let mut state = self.lock();
        let attrs = state.attrs.entry(key.clone()).or_default();
        for (id, value) in values {
            attrs.insert(id, value);
        }
    }

    pub fn store_attribute<T: AttrType>(&self, key: &ObjectKey, id: AttrId, value: T) {
        self.store_values(key, vec![(id, value.into_value())]);
    }

    pub fn get_value(&self, key: &ObjectKey, id: AttrId) -> Option<AttrValue> {
        self.lock()
            .attrs
            .get(key)
            .and_then(|attrs| attrs.get(&id))
            .cloned()
    }

    /// Typed read of one attribute; `NotFound` if it was never stored.
    pub fn get<T: AttrType>(&self, key: &ObjectKey, id: AttrId) -> SaiResult<T> {
        let value = self
            .get_value(key, id)
            .ok_or_else(|| SaiError::not_found(format!("attribute {} of {}", id, key)))?;
        T::from_value(&value).ok_or_else(|| {
            SaiError::internal(format!(
                "attribute {} of {} has unexpected value {:?}",
                id, key, value
            ))
        })
    }

    /// Copies the requested attributes into `message`.
    ///
    /// Fails with `NotFound` on the first id that was never stored.
    pub fn populate_attributes<M: AttributeMessage>(
        &self,
        key: &ObjectKey,
        ids: &[AttrId],
        message: &mut M,
    ) -> SaiResult<()> {
        let stored = self.lock().attrs.get(key).cloned().unwrap_or_default();
        for id in ids {
            let value = stored
                .get(id)
                .ok_or_else(|| SaiError::not_found(format!("attribute {} of {}", id, key)))?;
            if !message.set_attribute(*id, value)? {
                return Err(SaiError::invalid_argument(format!(
                    "attribute {} is not defined for {}",
                    id,
                    M::OBJECT_TYPE
                )));
            }
        }
        Ok(())
    }

    /// Copies every stored attribute the message schema knows about.
    pub fn populate_all_attributes<M: AttributeMessage>(
        &self,
        key: &ObjectKey,
        message: &mut M,
    ) -> SaiResult<()> {
        let stored = self.lock().attrs.get(key).cloned().unwrap_or_default();
        for (id, value) in &stored {
            message.set_attribute(*id, value)?;
        }
        Ok(())
    }

    /// Convenience for rebuilding a full schema value from storage.
    pub fn load<M: AttributeMessage>(&self, key: &ObjectKey) -> SaiResult<M> {
        let mut message = M::default();
        self.populate_all_attributes(key, &mut message)?;
        Ok(message)
    }

    /// Forgets an object's attributes and type.
    pub fn delete_object(&self, key: &ObjectKey) {
        let mut state = self.lock();
        state.attrs.remove(key);
        state.types.remove(key);
        if *key == ObjectKey::Oid(state.switch_id) {
            state.switch_id = NULL_OID;
        }
    }

    /// Clears every object and restarts the ID counter at zero.
    pub fn reset(&self) {
        let mut state = self.lock();
        debug!(
            "resetting attribute store ({} objects)",
            state.types.len()
        );
        *state = StoreState::default();
        self.ids.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use saisim_types::Code;

    crate::attribute_message! {
        struct PortAttrs for Port {
            SPEED = 1 => speed: u32,
            QUEUE_LIST = 2 => queue_list: Vec<u64>,
            ADMIN_STATE = 3 => admin_state: bool,
        }
    }

    #[test]
    fn test_ids_are_monotonic() {
        let store = AttributeStore::new();
        let ids: Vec<Oid> = (0..5).map(|_| store.next_id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_reset_restarts_ids() {
        let store = AttributeStore::new();
        let oid = store.next_id();
        store.set_type(&oid.into(), ObjectType::Switch);
        store.reset();
        assert_eq!(store.switch_id(), NULL_OID);
        assert_eq!(store.get_type(oid), ObjectType::Null);
        assert_eq!(store.next_id(), 1);
    }

    #[test]
    fn test_switch_id_cached() {
        let store = AttributeStore::new();
        let port = store.next_id();
        let switch = store.next_id();
        store.set_type(&port.into(), ObjectType::Port);
        store.set_type(&switch.into(), ObjectType::Switch);
        assert_eq!(store.switch_id(), switch);
        assert_eq!(store.get_type(port), ObjectType::Port);
        assert_eq!(store.get_type(999), ObjectType::Null);
    }

    #[test]
    fn test_round_trip_and_not_found() {
        let store = AttributeStore::new();
        let key = ObjectKey::Oid(store.next_id());
        store.store_attributes(
            &key,
            &PortAttrs {
                speed: Some(100_000),
                ..Default::default()
            },
        );

        assert_eq!(store.get::<u32>(&key, PortAttrs::SPEED).unwrap(), 100_000);
        let err = store.get::<bool>(&key, PortAttrs::ADMIN_STATE).unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
    }

    #[test]
    fn test_empty_list_differs_from_unset() {
        let store = AttributeStore::new();
        let set = ObjectKey::Oid(store.next_id());
        let unset = ObjectKey::Oid(store.next_id());
        store.store_attributes(
            &set,
            &PortAttrs {
                queue_list: Some(vec![]),
                ..Default::default()
            },
        );
        store.store_attributes(&unset, &PortAttrs::default());

        let mut resp = PortAttrs::default();
        store
            .populate_attributes(&set, &[PortAttrs::QUEUE_LIST], &mut resp)
            .unwrap();
        assert_eq!(resp.queue_list, Some(vec![]));

        let mut resp = PortAttrs::default();
        let err = store
            .populate_attributes(&unset, &[PortAttrs::QUEUE_LIST], &mut resp)
            .unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
    }

    #[test]
    fn test_populate_all_skips_unset() {
        let store = AttributeStore::new();
        let key = ObjectKey::Oid(store.next_id());
        store.store_attribute(&key, PortAttrs::ADMIN_STATE, true);
        // Ids outside the schema are ignored.
        store.store_attribute(&key, 42, 7u8);

        let attrs: PortAttrs = store.load(&key).unwrap();
        assert_eq!(
            attrs,
            PortAttrs {
                admin_state: Some(true),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_set_upserts() {
        let store = AttributeStore::new();
        let key = ObjectKey::Oid(store.next_id());
        store.store_attribute(&key, PortAttrs::SPEED, 10u32);
        store.store_attribute(&key, PortAttrs::ADMIN_STATE, false);
        store.store_attribute(&key, PortAttrs::SPEED, 25u32);
        assert_eq!(store.get::<u32>(&key, PortAttrs::SPEED).unwrap(), 25);
        assert!(!store.get::<bool>(&key, PortAttrs::ADMIN_STATE).unwrap());
    }

    #[test]
    fn test_entry_keys() {
        #[derive(Serialize)]
        struct Key {
            vr: u64,
            prefix: &'static str,
        }
        let store = AttributeStore::new();
        let a = ObjectKey::entry(&Key { vr: 1, prefix: "10.0.0.0/8" }).unwrap();
        let b = ObjectKey::entry(&Key { vr: 2, prefix: "10.0.0.0/8" }).unwrap();
        store.store_attribute(&a, 1, 5u32);
        assert_eq!(store.get::<u32>(&a, 1).unwrap(), 5);
        assert!(store.get::<u32>(&b, 1).is_err());
    }

    #[test]
    fn test_delete_object() {
        let store = AttributeStore::new();
        let oid = store.next_id();
        let key = ObjectKey::Oid(oid);
        store.set_type(&key, ObjectType::Port);
        store.store_attribute(&key, PortAttrs::SPEED, 1u32);
        store.delete_object(&key);
        assert_eq!(store.get_type(oid), ObjectType::Null);
        assert!(store.get_value(&key, PortAttrs::SPEED).is_none());
    }
}
