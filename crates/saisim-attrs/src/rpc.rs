//! Request and response shapes shared by every object type.

use crate::value::AttrId;
use saisim_types::Oid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateRequest<A> {
    pub switch: Oid,
    pub attrs: A,
}

impl<A> CreateRequest<A> {
    pub fn new(switch: Oid, attrs: A) -> Self {
        Self { switch, attrs }
    }
}

/// Handlers may leave `oid` null; the pipeline then allocates one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateResponse {
    pub oid: Oid,
}

impl CreateResponse {
    pub fn new(oid: Oid) -> Self {
        Self { oid }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateEntryRequest<K, A> {
    pub entry: K,
    pub attrs: A,
}

impl<K, A> CreateEntryRequest<K, A> {
    pub fn new(entry: K, attrs: A) -> Self {
        Self { entry, attrs }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetRequest<A> {
    pub oid: Oid,
    pub attrs: A,
}

impl<A> SetRequest<A> {
    pub fn new(oid: Oid, attrs: A) -> Self {
        Self { oid, attrs }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetEntryRequest<K, A> {
    pub entry: K,
    pub attrs: A,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetRequest {
    pub oid: Oid,
    pub attr_ids: Vec<AttrId>,
}

impl GetRequest {
    pub fn new(oid: Oid, attr_ids: Vec<AttrId>) -> Self {
        Self { oid, attr_ids }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetEntryRequest<K> {
    pub entry: K,
    pub attr_ids: Vec<AttrId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetResponse<A> {
    pub attrs: A,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveRequest {
    pub oid: Oid,
}

impl RemoveRequest {
    pub fn new(oid: Oid) -> Self {
        Self { oid }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoveEntryRequest<K> {
    pub entry: K,
}
