//! User-defined-field index consulted by ACL compilation.

use super::types::{UdfAttrs, UdfBase, UdfGroupAttrs};
use crate::context::OrchContext;
use log::debug;
use saisim_attrs::{CreateRequest, CreateResponse, ObjectKey};
use saisim_fwd::FieldId;
use saisim_types::{ObjectType, Oid, SaiError, SaiResult};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UdfPlacement {
    base: UdfBase,
    offset: u16,
}

type UdfIndex = BTreeMap<Oid, BTreeMap<Oid, UdfPlacement>>;

pub struct UdfOrch {
    ctx: OrchContext,
    groups: Mutex<UdfIndex>,
}

impl UdfOrch {
    pub fn new(ctx: OrchContext) -> Self {
        Self {
            ctx,
            groups: Mutex::new(BTreeMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, UdfIndex> {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset(&self) {
        self.lock().clear();
    }

    fn store_udf_list(&self, group: Oid, udfs: &BTreeMap<Oid, UdfPlacement>) {
        let list: Vec<u64> = udfs.keys().copied().collect();
        self.ctx
            .store
            .store_attribute(&ObjectKey::Oid(group), UdfGroupAttrs::UDF_LIST, list);
    }

    pub fn create_group(&self, _req: &CreateRequest<UdfGroupAttrs>) -> SaiResult<CreateResponse> {
        let oid = self.ctx.store.next_id();
        let empty = BTreeMap::new();
        self.store_udf_list(oid, &empty);
        self.lock().insert(oid, empty);
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_group(&self, oid: Oid) -> SaiResult<()> {
        let mut groups = self.lock();
        match groups.get(&oid) {
            None => Err(SaiError::failed_precondition(format!(
                "UDF group {:#x} not found",
                oid
            ))),
            Some(udfs) if !udfs.is_empty() => Err(SaiError::failed_precondition(format!(
                "UDF group {:#x} still has {} UDFs",
                oid,
                udfs.len()
            ))),
            Some(_) => {
                groups.remove(&oid);
                Ok(())
            }
        }
    }

    pub fn create_udf(&self, req: &CreateRequest<UdfAttrs>) -> SaiResult<CreateResponse> {
        let group = req
            .attrs
            .group_id
            .ok_or_else(|| SaiError::invalid_argument("GROUP_ID is mandatory"))?;
        let offset = req
            .attrs
            .offset
            .ok_or_else(|| SaiError::invalid_argument("OFFSET is mandatory"))?;
        let placement = UdfPlacement {
            base: req.attrs.base.unwrap_or(UdfBase::L2),
            offset,
        };

        let mut groups = self.lock();
        let udfs = groups
            .get_mut(&group)
            .ok_or_else(|| SaiError::failed_precondition(format!("UDF group {:#x} not found", group)))?;
        let oid = self.ctx.store.next_id();
        udfs.insert(oid, placement);
        self.store_udf_list(group, udfs);
        debug!("UDF {:#x} at {:?} in group {:#x}", oid, placement, group);
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_udf(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::Udf)?;
        let mut groups = self.lock();
        for (group, udfs) in groups.iter_mut() {
            if udfs.remove(&oid).is_some() {
                self.store_udf_list(*group, udfs);
                return Ok(());
            }
        }
        Err(SaiError::failed_precondition(format!("UDF {:#x} is not indexed", oid)))
    }

    /// Byte ranges matched by a UDF group, one per member UDF.
    pub fn fields(&self, group: Oid) -> SaiResult<Vec<FieldId>> {
        let length: u16 = self
            .ctx
            .store
            .get(&ObjectKey::Oid(group), UdfGroupAttrs::LENGTH)
            .map_err(|_| {
                SaiError::invalid_argument(format!("UDF group {:#x} has no LENGTH", group))
            })?;
        let groups = self.lock();
        let udfs = groups
            .get(&group)
            .ok_or_else(|| SaiError::failed_precondition(format!("UDF group {:#x} not found", group)))?;
        Ok(udfs
            .values()
            .map(|p| FieldId::bytes(p.base.header(), u32::from(p.offset), u32::from(length)))
            .collect())
    }
}
