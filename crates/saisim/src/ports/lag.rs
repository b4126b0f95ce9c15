//! Link aggregation groups backed by aggregate engine ports.

use super::types::{LagAttrs, LagMemberAttrs};
use crate::common::engine_id;
use crate::context::OrchContext;
use log::info;
use saisim_attrs::{CreateRequest, CreateResponse, ObjectKey};
use saisim_fwd::{PortDesc, PortKind, PortUpdate};
use saisim_types::{ObjectType, Oid, SaiError, SaiResult};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LagMember {
    member: Oid,
    port: Oid,
}

pub struct LagOrch {
    ctx: OrchContext,
    lags: Mutex<HashMap<Oid, Vec<LagMember>>>,
}

impl LagOrch {
    pub fn new(ctx: OrchContext) -> Self {
        Self {
            ctx,
            lags: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Oid, Vec<LagMember>>> {
        self.lags.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Member ports of a LAG, in join order.
    pub fn ports(&self, lag: Oid) -> Option<Vec<Oid>> {
        self.lock()
            .get(&lag)
            .map(|members| members.iter().map(|m| m.port).collect())
    }

    fn store_port_list(&self, lag: Oid, members: &[LagMember]) {
        let ports: Vec<u64> = members.iter().map(|m| m.port).collect();
        self.ctx
            .store
            .store_attribute(&ObjectKey::Oid(lag), LagAttrs::PORT_LIST, ports);
    }

    pub fn create_lag(&self, _req: &CreateRequest<LagAttrs>) -> SaiResult<CreateResponse> {
        let oid = self.ctx.store.next_id();
        self.ctx.engine.port_create(PortDesc {
            id: engine_id(oid),
            kind: PortKind::Aggregate,
        })?;
        self.lock().insert(oid, Vec::new());
        self.store_port_list(oid, &[]);
        info!("created LAG {:#x}", oid);
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_lag(&self, oid: Oid) -> SaiResult<()> {
        let mut lags = self.lock();
        let members = lags
            .get(&oid)
            .ok_or_else(|| SaiError::failed_precondition(format!("LAG {:#x} not found", oid)))?;
        if !members.is_empty() {
            return Err(SaiError::failed_precondition(format!(
                "LAG {:#x} still has {} members",
                oid,
                members.len()
            )));
        }
        self.ctx.engine.object_delete(&engine_id(oid))?;
        lags.remove(&oid);
        Ok(())
    }

    pub fn create_lag_member(
        &self,
        req: &CreateRequest<LagMemberAttrs>,
    ) -> SaiResult<CreateResponse> {
        let lag = req
            .attrs
            .lag_id
            .ok_or_else(|| SaiError::invalid_argument("LAG_ID is mandatory"))?;
        let port = req
            .attrs
            .port_id
            .ok_or_else(|| SaiError::invalid_argument("PORT_ID is mandatory"))?;
        self.ctx.require_type(port, ObjectType::Port)?;

        let mut lags = self.lock();
        let members = lags
            .get_mut(&lag)
            .ok_or_else(|| SaiError::failed_precondition(format!("LAG {:#x} not found", lag)))?;
        if members.iter().any(|m| m.port == port) {
            return Err(SaiError::failed_precondition(format!(
                "port {:#x} is already a member of LAG {:#x}",
                port, lag
            )));
        }
        self.ctx.engine.port_update(
            &engine_id(lag),
            PortUpdate::AggregateAdd {
                member: engine_id(port),
            },
        )?;
        let oid = self.ctx.store.next_id();
        members.push(LagMember { member: oid, port });
        self.store_port_list(lag, members);
        info!("port {:#x} joined LAG {:#x}", port, lag);
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_lag_member(&self, oid: Oid) -> SaiResult<()> {
        let mut lags = self.lock();
        let (lag, members, index) = lags
            .iter_mut()
            .find_map(|(lag, members)| match members.iter().position(|m| m.member == oid) {
                Some(index) => Some((*lag, members, index)),
                None => None,
            })
            .ok_or_else(|| {
                SaiError::failed_precondition(format!("LAG member {:#x} not found", oid))
            })?;
        let removed = members.remove(index);
        self.ctx.engine.port_update(
            &engine_id(lag),
            PortUpdate::AggregateRemove {
                member: engine_id(removed.port),
            },
        )?;
        self.store_port_list(lag, members);
        info!("port {:#x} left LAG {:#x}", removed.port, lag);
        Ok(())
    }
}
