//! Request pipeline wrapped around every object handler.
//!
//! Each RPC kind has a fixed list of stages. The handler runs in the
//! `Handle` stage; the remaining stages move attributes between the request
//! or response and the [`AttributeStore`], so handlers rarely touch storage
//! directly.

use crate::message::AttributeMessage;
use crate::rpc::{
    CreateEntryRequest, CreateRequest, CreateResponse, GetEntryRequest, GetRequest, GetResponse,
    RemoveEntryRequest, RemoveRequest, SetEntryRequest, SetRequest,
};
use crate::store::{AttributeStore, ObjectKey};
use crate::value::AttrId;
use log::debug;
use saisim_types::{Code, ObjectType, SaiError, SaiResult, NULL_OID};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcKind {
    Create,
    Set,
    Get,
    Remove,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Run the object handler.
    Handle,
    /// Resolve the object id and store the request attributes.
    Persist,
    /// Fill requested attributes the handler did not compute.
    Populate,
    /// Delete the object's attributes and type.
    Forget,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Handle => "handle",
            Stage::Persist => "persist",
            Stage::Populate => "populate",
            Stage::Forget => "forget",
        };
        f.write_str(s)
    }
}

impl RpcKind {
    pub const fn stages(&self) -> &'static [Stage] {
        match self {
            RpcKind::Create | RpcKind::Set => &[Stage::Handle, Stage::Persist],
            RpcKind::Get => &[Stage::Handle, Stage::Populate],
            RpcKind::Remove => &[Stage::Handle, Stage::Forget],
            RpcKind::Other => &[Stage::Handle],
        }
    }

    /// Get handlers may decline with `Unimplemented` and let the store answer.
    pub const fn tolerates_unimplemented(&self) -> bool {
        matches!(self, RpcKind::Get)
    }
}

pub struct Pipeline {
    store: Arc<AttributeStore>,
    restart_warm: AttrId,
}

impl Pipeline {
    /// `restart_warm` is the switch attribute that, when true, keeps the
    /// switch's state across its removal.
    pub fn new(store: Arc<AttributeStore>, restart_warm: AttrId) -> Self {
        Self {
            store,
            restart_warm,
        }
    }

    pub fn store(&self) -> &Arc<AttributeStore> {
        &self.store
    }

    fn run<Req, Resp, H, S>(
        &self,
        kind: RpcKind,
        rpc: &str,
        req: &Req,
        handler: H,
        mut stage: S,
    ) -> SaiResult<Resp>
    where
        Resp: Default,
        H: FnOnce(&Req) -> SaiResult<Resp>,
        S: FnMut(Stage, &mut Resp) -> SaiResult<()>,
    {
        let mut handler = Some(handler);
        let mut resp = Resp::default();
        for &current in kind.stages() {
            debug!("{} [{}]", rpc, current);
            match current {
                Stage::Handle => {
                    let handler = handler
                        .take()
                        .ok_or_else(|| SaiError::internal(format!("{}: handler ran twice", rpc)))?;
                    resp = match handler(req) {
                        Ok(resp) => resp,
                        Err(e) if kind.tolerates_unimplemented() && e.code() == Code::Unimplemented => {
                            debug!("{}: {}, answering from store", rpc, e);
                            Resp::default()
                        }
                        Err(e) => return Err(e),
                    };
                }
                other => stage(other, &mut resp)?,
            }
        }
        Ok(resp)
    }

    pub fn create<A, H>(
        &self,
        rpc: &str,
        req: CreateRequest<A>,
        handler: H,
    ) -> SaiResult<CreateResponse>
    where
        A: AttributeMessage,
        H: FnOnce(&CreateRequest<A>) -> SaiResult<CreateResponse>,
    {
        self.run(RpcKind::Create, rpc, &req, handler, |stage, resp| {
            if stage == Stage::Persist {
                if resp.oid == NULL_OID {
                    resp.oid = self.store.next_id();
                }
                let key = ObjectKey::Oid(resp.oid);
                self.store.set_type(&key, A::OBJECT_TYPE);
                self.store.store_attributes(&key, &req.attrs);
            }
            Ok(())
        })
    }

    pub fn create_entry<K, A, H>(
        &self,
        rpc: &str,
        req: CreateEntryRequest<K, A>,
        handler: H,
    ) -> SaiResult<()>
    where
        K: Serialize,
        A: AttributeMessage,
        H: FnOnce(&CreateEntryRequest<K, A>) -> SaiResult<()>,
    {
        let key = ObjectKey::entry(&req.entry)?;
        self.run(RpcKind::Create, rpc, &req, handler, |stage, _| {
            if stage == Stage::Persist {
                self.store.set_type(&key, A::OBJECT_TYPE);
                self.store.store_attributes(&key, &req.attrs);
            }
            Ok(())
        })
    }

    pub fn set<A, H>(&self, rpc: &str, req: SetRequest<A>, handler: H) -> SaiResult<()>
    where
        A: AttributeMessage,
        H: FnOnce(&SetRequest<A>) -> SaiResult<()>,
    {
        let key = ObjectKey::Oid(req.oid);
        self.run(RpcKind::Set, rpc, &req, handler, |stage, _| {
            if stage == Stage::Persist {
                self.store.store_attributes(&key, &req.attrs);
            }
            Ok(())
        })
    }

    pub fn set_entry<K, A, H>(
        &self,
        rpc: &str,
        req: SetEntryRequest<K, A>,
        handler: H,
    ) -> SaiResult<()>
    where
        K: Serialize,
        A: AttributeMessage,
        H: FnOnce(&SetEntryRequest<K, A>) -> SaiResult<()>,
    {
        let key = ObjectKey::entry(&req.entry)?;
        self.run(RpcKind::Set, rpc, &req, handler, |stage, _| {
            if stage == Stage::Persist {
                self.store.store_attributes(&key, &req.attrs);
            }
            Ok(())
        })
    }

    pub fn get<A, H>(&self, rpc: &str, req: GetRequest, handler: H) -> SaiResult<GetResponse<A>>
    where
        A: AttributeMessage,
        H: FnOnce(&GetRequest) -> SaiResult<GetResponse<A>>,
    {
        let key = ObjectKey::Oid(req.oid);
        self.run(RpcKind::Get, rpc, &req, handler, |stage, resp| {
            if stage == Stage::Populate {
                self.populate(&key, &req.attr_ids, &mut resp.attrs)?;
            }
            Ok(())
        })
    }

    pub fn get_entry<K, A, H>(
        &self,
        rpc: &str,
        req: GetEntryRequest<K>,
        handler: H,
    ) -> SaiResult<GetResponse<A>>
    where
        K: Serialize,
        A: AttributeMessage,
        H: FnOnce(&GetEntryRequest<K>) -> SaiResult<GetResponse<A>>,
    {
        let key = ObjectKey::entry(&req.entry)?;
        self.run(RpcKind::Get, rpc, &req, handler, |stage, resp| {
            if stage == Stage::Populate {
                self.populate(&key, &req.attr_ids, &mut resp.attrs)?;
            }
            Ok(())
        })
    }

    /// Handler-computed values win over stored ones.
    fn populate<A: AttributeMessage>(
        &self,
        key: &ObjectKey,
        ids: &[AttrId],
        attrs: &mut A,
    ) -> SaiResult<()> {
        let missing: Vec<AttrId> = ids
            .iter()
            .copied()
            .filter(|id| attrs.attribute(*id).is_none())
            .collect();
        self.store.populate_attributes(key, &missing, attrs)
    }

    pub fn remove<H>(&self, rpc: &str, req: RemoveRequest, handler: H) -> SaiResult<()>
    where
        H: FnOnce(&RemoveRequest) -> SaiResult<()>,
    {
        let key = ObjectKey::Oid(req.oid);
        self.run(RpcKind::Remove, rpc, &req, handler, |stage, _| {
            if stage == Stage::Forget {
                if self.keeps_state(&key) {
                    debug!("{}: warm restart requested, keeping {}", rpc, key);
                } else {
                    self.store.delete_object(&key);
                }
            }
            Ok(())
        })
    }

    pub fn remove_entry<K, H>(
        &self,
        rpc: &str,
        req: RemoveEntryRequest<K>,
        handler: H,
    ) -> SaiResult<()>
    where
        K: Serialize,
        H: FnOnce(&RemoveEntryRequest<K>) -> SaiResult<()>,
    {
        let key = ObjectKey::entry(&req.entry)?;
        self.run(RpcKind::Remove, rpc, &req, handler, |stage, _| {
            if stage == Stage::Forget {
                self.store.delete_object(&key);
            }
            Ok(())
        })
    }

    /// Calls outside the Create/Set/Get/Remove families pass straight through.
    pub fn other<Req, Resp, H>(&self, rpc: &str, req: &Req, handler: H) -> SaiResult<Resp>
    where
        Resp: Default,
        H: FnOnce(&Req) -> SaiResult<Resp>,
    {
        self.run(RpcKind::Other, rpc, req, handler, |_, _| Ok(()))
    }

    fn keeps_state(&self, key: &ObjectKey) -> bool {
        self.store.key_type(key) == ObjectType::Switch
            && self
                .store
                .get::<bool>(key, self.restart_warm)
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttributeMessage;
    use pretty_assertions::assert_eq;
    use saisim_types::Oid;

    crate::attribute_message! {
        struct SwitchAttrs for Switch {
            RESTART_WARM = 1 => restart_warm: bool,
            SRC_MAC = 2 => label: String,
        }
    }

    crate::attribute_message! {
        struct NhAttrs for NextHop {
            IP = 1 => ip: std::net::IpAddr,
            RIF = 2 => rif: u64,
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::new(Arc::new(AttributeStore::new()), SwitchAttrs::RESTART_WARM)
    }

    fn create_nh(p: &Pipeline, rif: u64) -> Oid {
        let req = CreateRequest::new(
            0,
            NhAttrs {
                rif: Some(rif),
                ..Default::default()
            },
        );
        p.create("CreateNextHop", req, |_| Ok(CreateResponse::default()))
            .unwrap()
            .oid
    }

    #[test]
    fn test_stage_lists() {
        assert_eq!(RpcKind::Create.stages(), &[Stage::Handle, Stage::Persist]);
        assert_eq!(RpcKind::Get.stages(), &[Stage::Handle, Stage::Populate]);
        assert_eq!(RpcKind::Remove.stages(), &[Stage::Handle, Stage::Forget]);
        assert_eq!(RpcKind::Other.stages(), &[Stage::Handle]);
    }

    #[test]
    fn test_create_allocates_and_persists() {
        let p = pipeline();
        let a = create_nh(&p, 7);
        let b = create_nh(&p, 8);
        assert!(b > a);
        assert_eq!(p.store().get_type(a), ObjectType::NextHop);
        assert_eq!(p.store().get::<u64>(&a.into(), NhAttrs::RIF).unwrap(), 7);
    }

    #[test]
    fn test_create_keeps_handler_oid() {
        let p = pipeline();
        let oid = p.store().next_id();
        let resp = p
            .create("CreateNextHop", CreateRequest::new(0, NhAttrs::default()), |_| {
                Ok(CreateResponse::new(oid))
            })
            .unwrap();
        assert_eq!(resp.oid, oid);
        assert_eq!(p.store().get_type(oid), ObjectType::NextHop);
    }

    #[test]
    fn test_failed_create_stores_nothing() {
        let p = pipeline();
        let err = p
            .create(
                "CreateNextHop",
                CreateRequest::new(0, NhAttrs::default()),
                |_| Err(SaiError::invalid_argument("bad type")),
            )
            .unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
        assert_eq!(p.store().objects_of_type(ObjectType::NextHop), Vec::<Oid>::new());
    }

    #[test]
    fn test_get_tolerates_unimplemented() {
        let p = pipeline();
        let oid = create_nh(&p, 3);
        let resp: GetResponse<NhAttrs> = p
            .get("GetNextHopAttribute", GetRequest::new(oid, vec![NhAttrs::RIF]), |_| {
                Err(SaiError::unimplemented("GetNextHopAttribute"))
            })
            .unwrap();
        assert_eq!(resp.attrs.rif, Some(3));
    }

    #[test]
    fn test_get_other_errors_propagate() {
        let p = pipeline();
        let oid = create_nh(&p, 3);
        let err = p
            .get::<NhAttrs, _>("GetNextHopAttribute", GetRequest::new(oid, vec![NhAttrs::RIF]), |_| {
                Err(SaiError::internal("boom"))
            })
            .unwrap_err();
        assert_eq!(err.code(), Code::Internal);
    }

    #[test]
    fn test_get_handler_values_win() {
        let p = pipeline();
        let oid = create_nh(&p, 3);
        let resp: GetResponse<NhAttrs> = p
            .get("GetNextHopAttribute", GetRequest::new(oid, vec![NhAttrs::RIF]), |_| {
                Ok(GetResponse {
                    attrs: NhAttrs {
                        rif: Some(99),
                        ..Default::default()
                    },
                })
            })
            .unwrap();
        assert_eq!(resp.attrs.rif, Some(99));
    }

    #[test]
    fn test_get_never_set_is_not_found() {
        let p = pipeline();
        let oid = create_nh(&p, 3);
        let err = p
            .get::<NhAttrs, _>("GetNextHopAttribute", GetRequest::new(oid, vec![NhAttrs::IP]), |_| {
                Ok(GetResponse::default())
            })
            .unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
    }

    #[test]
    fn test_remove_forgets_object() {
        let p = pipeline();
        let oid = create_nh(&p, 3);
        p.remove("RemoveNextHop", RemoveRequest::new(oid), |_| Ok(()))
            .unwrap();
        assert_eq!(p.store().get_type(oid), ObjectType::Null);
        assert!(p.store().get::<u64>(&oid.into(), NhAttrs::RIF).is_err());
    }

    #[test]
    fn test_remove_warm_switch_keeps_state() {
        let p = pipeline();
        let resp = p
            .create(
                "CreateSwitch",
                CreateRequest::new(
                    0,
                    SwitchAttrs {
                        restart_warm: Some(true),
                        ..Default::default()
                    },
                ),
                |_| Ok(CreateResponse::default()),
            )
            .unwrap();
        p.remove("RemoveSwitch", RemoveRequest::new(resp.oid), |_| Ok(()))
            .unwrap();
        assert_eq!(p.store().get_type(resp.oid), ObjectType::Switch);
        assert_eq!(p.store().switch_id(), resp.oid);
    }

    #[test]
    fn test_remove_cold_switch() {
        let p = pipeline();
        let resp = p
            .create(
                "CreateSwitch",
                CreateRequest::new(0, SwitchAttrs::default()),
                |_| Ok(CreateResponse::default()),
            )
            .unwrap();
        p.remove("RemoveSwitch", RemoveRequest::new(resp.oid), |_| Ok(()))
            .unwrap();
        assert_eq!(p.store().get_type(resp.oid), ObjectType::Null);
    }

    #[test]
    fn test_entry_objects() {
        #[derive(Serialize, Clone)]
        struct Key {
            vr: u64,
        }
        let p = pipeline();
        p.create_entry(
            "CreateRouteEntry",
            CreateEntryRequest::new(
                Key { vr: 1 },
                NhAttrs {
                    rif: Some(4),
                    ..Default::default()
                },
            ),
            |_| Ok(()),
        )
        .unwrap();
        let resp: GetResponse<NhAttrs> = p
            .get_entry(
                "GetRouteEntryAttribute",
                GetEntryRequest {
                    entry: Key { vr: 1 },
                    attr_ids: vec![NhAttrs::RIF],
                },
                |_| Err(SaiError::unimplemented("GetRouteEntryAttribute")),
            )
            .unwrap();
        assert_eq!(resp.attrs.rif, Some(4));

        p.remove_entry(
            "RemoveRouteEntry",
            RemoveEntryRequest { entry: Key { vr: 1 } },
            |_| Ok(()),
        )
        .unwrap();
        let key = ObjectKey::entry(&Key { vr: 1 }).unwrap();
        assert!(!p.store().object_exists(&key));
    }

    #[test]
    fn test_other_passes_through() {
        let p = pipeline();
        let n: u32 = p.other("ObjectTypeQuery", &5u32, |v| Ok(v + 1)).unwrap();
        assert_eq!(n, 6);
        assert!(NhAttrs::has_attribute(NhAttrs::IP));
    }
}
