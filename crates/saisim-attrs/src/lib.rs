//! Generic per-object attribute persistence for saisim.
//!
//! Every SAI object is a bag of typed attributes keyed by a small integer
//! id. This crate provides:
//!
//! - [`AttrValue`] / [`AttrType`]: the tagged value union and typed access
//! - [`attribute_message!`] / [`attr_enum!`]: declarative schemas mapping
//!   attribute ids to struct fields, replacing runtime reflection
//! - [`AttributeStore`]: the single-lock object arena plus the ID allocator
//! - [`Pipeline`]: the per-RPC-kind stages that persist request attributes
//!   and populate Get responses around each object handler
//!
//! # Example
//!
//! ```
//! use saisim_attrs::{attribute_message, AttributeStore, ObjectKey};
//!
//! attribute_message! {
//!     pub struct DemoAttrs for Vlan {
//!         VLAN_ID = 1 => vlan_id: u16,
//!         MEMBER_LIST = 2 => member_list: Vec<u64>,
//!     }
//! }
//!
//! let store = AttributeStore::new();
//! let oid = store.next_id();
//! let attrs = DemoAttrs { vlan_id: Some(10), member_list: Some(vec![]) };
//! store.store_attributes(&ObjectKey::Oid(oid), &attrs);
//! assert_eq!(store.get::<Vec<u64>>(&ObjectKey::Oid(oid), DemoAttrs::MEMBER_LIST).unwrap(), Vec::<u64>::new());
//! ```

mod message;
mod pipeline;
mod rpc;
mod store;
mod value;

pub use message::AttributeMessage;
pub use pipeline::{Pipeline, RpcKind, Stage};
pub use rpc::{
    CreateEntryRequest, CreateRequest, CreateResponse, GetEntryRequest, GetRequest, GetResponse,
    RemoveEntryRequest, RemoveRequest, SetEntryRequest, SetRequest,
};
pub use store::{AttributeStore, IdAllocator, ObjectKey};
pub use value::{AclField, AttrId, AttrType, AttrValue, UdfField};

/// Re-export so schema macros resolve type paths from any crate.
pub use saisim_types as types;
