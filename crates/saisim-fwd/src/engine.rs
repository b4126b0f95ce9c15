//! The forwarding engine trait.

use crate::error::FwdResult;
use crate::types::{
    Entry, Event, FlowCounterData, ObjectAttribute, PortDesc, PortStatus, PortUpdate, TableDesc,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Table store and port model the control plane programs.
///
/// All calls address the single forwarding context owned by the switch
/// instance. Calls are synchronous and are never retried by callers.
pub trait ForwardingEngine: Send + Sync {
    fn table_create(&self, desc: TableDesc) -> FwdResult<()>;

    /// Deletes a table and all of its entries.
    fn table_delete(&self, table: &str) -> FwdResult<()>;

    /// Installs an entry; an existing entry with the same key is replaced.
    fn table_entry_add(&self, table: &str, entry: Entry) -> FwdResult<()>;

    /// Removes the entry whose key equals `entry.key`.
    fn table_entry_remove(&self, table: &str, entry: &Entry) -> FwdResult<()>;

    fn port_create(&self, desc: PortDesc) -> FwdResult<()>;

    fn port_update(&self, port: &str, update: PortUpdate) -> FwdResult<()>;

    /// Optionally changes the admin state, then reports the current state.
    fn port_state(&self, port: &str, admin_up: Option<bool>) -> FwdResult<PortStatus>;

    /// Engine-internal numeric id of an object.
    fn object_nid(&self, id: &str) -> FwdResult<u64>;

    fn attribute_update(&self, id: &str, attr: ObjectAttribute) -> FwdResult<()>;

    fn object_delete(&self, id: &str) -> FwdResult<()>;

    fn flow_counter_create(&self, id: &str) -> FwdResult<()>;

    fn flow_counter_query(&self, id: &str) -> FwdResult<FlowCounterData>;

    /// Stream of asynchronous events such as port state changes.
    fn notify_subscribe(&self) -> FwdResult<UnboundedReceiver<Event>>;
}
