//! SaiServer - the RPC surface.
//!
//! One Create/Set/Get/Remove family per object type. Every call runs
//! through the [`Pipeline`], which persists request attributes after the
//! object handler succeeds and answers Get calls from the store for
//! anything the handler does not compute. Object lifecycle calls are
//! audited.

mod acl;
mod hostif;
mod ports;
mod routing;
mod stubs;

use crate::acl::AclOrch;
use crate::audit::{AuditCategory, AuditRecord};
use crate::audit_log;
use crate::config::SaisimConfig;
use crate::context::OrchContext;
use crate::hostif::HostifOrch;
use crate::l2::L2Orch;
use crate::nhg::NextHopOrch;
use crate::ports::{HostDevices, LagOrch, PortsOrch};
use crate::route::{NeighOrch, RifOrch, RouteOrch};
use crate::switch::{SwitchAttrs, SwitchOrch};
use crate::tunnel::TunnelOrch;
use crate::udf::UdfOrch;
use log::{info, warn};
use saisim_attrs::{
    AttributeMessage, AttributeStore, CreateRequest, CreateResponse, GetEntryRequest, GetRequest,
    GetResponse, Pipeline, RemoveRequest, SetRequest,
};
use saisim_fwd::{Event, ForwardingEngine};
use saisim_types::{ObjectType, Oid, SaiError, SaiResult};
use std::sync::Arc;

pub struct SaiServer {
    pipeline: Pipeline,
    ctx: OrchContext,
    switch: SwitchOrch,
    ports: Arc<PortsOrch>,
    lags: LagOrch,
    l2: L2Orch,
    udf: Arc<UdfOrch>,
    acl: AclOrch,
    next_hops: NextHopOrch,
    routes: RouteOrch,
    rifs: RifOrch,
    neighbors: NeighOrch,
    hostif: HostifOrch,
    tunnels: TunnelOrch,
}

/// Get handler for objects without computed attributes.
fn from_store<A: AttributeMessage>(_req: &GetRequest) -> SaiResult<GetResponse<A>> {
    Err(SaiError::unimplemented("computed attributes"))
}

fn from_store_entry<K, A: AttributeMessage>(
    _req: &GetEntryRequest<K>,
) -> SaiResult<GetResponse<A>> {
    Err(SaiError::unimplemented("computed attributes"))
}

/// Runs `f` on every element and collects one result per element.
fn bulk<T, R>(rpc: &str, items: Vec<T>, f: impl FnMut(T) -> SaiResult<R>) -> Vec<SaiResult<R>> {
    let results: Vec<SaiResult<R>> = items.into_iter().map(f).collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!("{}: {} of {} elements failed", rpc, failed, results.len());
    }
    results
}

impl SaiServer {
    pub fn new(
        engine: Arc<dyn ForwardingEngine>,
        config: SaisimConfig,
        host: Arc<dyn HostDevices>,
    ) -> Self {
        let store = Arc::new(AttributeStore::new());
        let ctx = OrchContext::new(store.clone(), engine, Arc::new(config));
        let ports = Arc::new(PortsOrch::new(ctx.clone(), host));
        let udf = Arc::new(UdfOrch::new(ctx.clone()));
        Self {
            pipeline: Pipeline::new(store, SwitchAttrs::RESTART_WARM),
            switch: SwitchOrch::new(ctx.clone(), ports.clone()),
            ports,
            lags: LagOrch::new(ctx.clone()),
            l2: L2Orch::new(ctx.clone()),
            acl: AclOrch::new(ctx.clone(), udf.clone()),
            udf,
            next_hops: NextHopOrch::new(ctx.clone()),
            routes: RouteOrch::new(ctx.clone()),
            rifs: RifOrch::new(ctx.clone()),
            neighbors: NeighOrch::new(ctx.clone()),
            hostif: HostifOrch::new(ctx.clone()),
            tunnels: TunnelOrch::new(ctx.clone()),
            ctx,
        }
    }

    pub fn context(&self) -> &OrchContext {
        &self.ctx
    }

    pub fn switch_orch(&self) -> &SwitchOrch {
        &self.switch
    }

    pub fn acl_orch(&self) -> &AclOrch {
        &self.acl
    }

    pub fn next_hop_orch(&self) -> &NextHopOrch {
        &self.next_hops
    }

    pub fn lag_orch(&self) -> &LagOrch {
        &self.lags
    }

    pub fn object_type_query(&self, oid: Oid) -> ObjectType {
        self.ctx.object_type(oid)
    }

    /// Forgets every object and all orchestrator state.
    pub fn reset(&self) {
        self.ctx.store.reset();
        self.switch.reset();
        self.ports.reset();
        self.lags.reset();
        self.udf.reset();
        self.acl.reset();
        self.next_hops.reset();
        info!("switch state reset");
    }

    /// Applies an asynchronous engine event.
    pub fn handle_event(&self, event: &Event) {
        if let Some(port) = self.ports.handle_event(event) {
            audit_log!(AuditRecord::new(
                AuditCategory::ResourceModify,
                "PortsOrch",
                "port_state_change"
            )
            .with_object(port, ObjectType::Port)
            .with_details(serde_json::json!({ "event": format!("{:?}", event) })));
        }
    }

    fn audit_create(&self, rpc: &str, object_type: ObjectType, result: &SaiResult<CreateResponse>) {
        let record = AuditRecord::new(AuditCategory::ResourceCreate, "SaiServer", rpc);
        audit_log!(match result {
            Ok(resp) => record.with_object(resp.oid, object_type),
            Err(e) => record.with_object_type(object_type).with_error(e.to_string()),
        });
    }

    fn audit_remove(&self, rpc: &str, oid: Oid, object_type: ObjectType, result: &SaiResult<()>) {
        let record = AuditRecord::new(AuditCategory::ResourceDelete, "SaiServer", rpc)
            .with_object(oid, object_type);
        audit_log!(match result {
            Ok(()) => record,
            Err(e) => record.with_error(e.to_string()),
        });
    }

    /// Create through the pipeline, audited.
    fn create<A, H>(&self, rpc: &str, req: CreateRequest<A>, handler: H) -> SaiResult<Oid>
    where
        A: AttributeMessage,
        H: FnOnce(&CreateRequest<A>) -> SaiResult<CreateResponse>,
    {
        let result = self.pipeline.create(rpc, req, handler);
        self.audit_create(rpc, A::OBJECT_TYPE, &result);
        result.map(|resp| resp.oid)
    }

    /// Remove through the pipeline after checking the object's type, audited.
    fn remove<H>(&self, rpc: &str, oid: Oid, object_type: ObjectType, handler: H) -> SaiResult<()>
    where
        H: FnOnce(&RemoveRequest) -> SaiResult<()>,
    {
        let result = self
            .ctx
            .require_type(oid, object_type)
            .and_then(|()| self.pipeline.remove(rpc, RemoveRequest::new(oid), handler));
        self.audit_remove(rpc, oid, object_type, &result);
        result
    }

    fn set<A, H>(&self, rpc: &str, req: SetRequest<A>, handler: H) -> SaiResult<()>
    where
        A: AttributeMessage,
        H: FnOnce(&SetRequest<A>) -> SaiResult<()>,
    {
        self.ctx.require_type(req.oid, A::OBJECT_TYPE)?;
        self.pipeline.set(rpc, req, handler)
    }

    fn get<A, H>(&self, rpc: &str, req: GetRequest, handler: H) -> SaiResult<GetResponse<A>>
    where
        A: AttributeMessage,
        H: FnOnce(&GetRequest) -> SaiResult<GetResponse<A>>,
    {
        self.ctx.require_type(req.oid, A::OBJECT_TYPE)?;
        self.pipeline.get(rpc, req, handler)
    }
}
