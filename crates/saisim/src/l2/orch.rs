//! VLAN and VLAN membership.

use super::types::{BridgePortAttrs, VlanAttrs, VlanMemberAttrs, VlanTaggingMode};
use crate::context::OrchContext;
use crate::switch::topology::vlan_key;
use crate::tables;
use log::{debug, info};
use saisim_attrs::{CreateRequest, CreateResponse, ObjectKey};
use saisim_fwd::{Action, EntryKey, PacketField};
use saisim_types::{ObjectType, Oid, SaiError, SaiResult};

const MAX_VLAN_ID: u16 = 4094;

pub struct L2Orch {
    ctx: OrchContext,
}

impl L2Orch {
    pub fn new(ctx: OrchContext) -> Self {
        Self { ctx }
    }

    fn vlan_in_use(&self, vid: u16) -> bool {
        self.ctx
            .store
            .objects_of_type(ObjectType::Vlan)
            .into_iter()
            .any(|oid| {
                self.ctx.store.get::<u16>(&ObjectKey::Oid(oid), VlanAttrs::VLAN_ID).ok() == Some(vid)
            })
    }

    pub fn create_vlan(&self, req: &CreateRequest<VlanAttrs>) -> SaiResult<CreateResponse> {
        let vid = req
            .attrs
            .vlan_id
            .ok_or_else(|| SaiError::invalid_argument("VLAN_ID is mandatory"))?;
        if vid == 0 || vid > MAX_VLAN_ID {
            return Err(SaiError::invalid_argument(format!("VLAN id {} out of range", vid)));
        }
        if self.vlan_in_use(vid) {
            return Err(SaiError::failed_precondition(format!("VLAN {} already exists", vid)));
        }
        let oid = self.ctx.store.next_id();
        self.ctx
            .store
            .store_attribute(&ObjectKey::Oid(oid), VlanAttrs::MEMBER_LIST, Vec::<u64>::new());
        debug!("created VLAN {} as {:#x}", vid, oid);
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_vlan(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::Vlan)?;
        let members: Vec<u64> = self
            .ctx
            .store
            .get(&ObjectKey::Oid(oid), VlanAttrs::MEMBER_LIST)
            .unwrap_or_default();
        if !members.is_empty() {
            return Err(SaiError::failed_precondition(format!(
                "VLAN {:#x} still has {} members",
                oid,
                members.len()
            )));
        }
        Ok(())
    }

    /// VLAN table key and VLAN id for a member; a pure function of its attributes.
    fn member_entry(&self, attrs: &VlanMemberAttrs) -> SaiResult<(EntryKey, u16)> {
        let vlan = attrs
            .vlan_id
            .ok_or_else(|| SaiError::invalid_argument("VLAN_ID is mandatory"))?;
        let bridge_port = attrs
            .bridge_port_id
            .ok_or_else(|| SaiError::invalid_argument("BRIDGE_PORT_ID is mandatory"))?;
        self.ctx.require_type(vlan, ObjectType::Vlan)?;
        self.ctx.require_type(bridge_port, ObjectType::BridgePort)?;

        let vid: u16 = self.ctx.store.get(&ObjectKey::Oid(vlan), VlanAttrs::VLAN_ID)?;
        let port: Oid = self
            .ctx
            .store
            .get(&ObjectKey::Oid(bridge_port), BridgePortAttrs::PORT_ID)
            .map_err(|_| {
                SaiError::failed_precondition(format!(
                    "bridge port {:#x} is not bound to a port",
                    bridge_port
                ))
            })?;
        let tag = match attrs.vlan_tagging_mode.unwrap_or(VlanTaggingMode::Untagged) {
            VlanTaggingMode::Untagged => 0,
            VlanTaggingMode::Tagged | VlanTaggingMode::PriorityTagged => vid,
        };
        Ok((vlan_key(self.ctx.nid(port)?, tag), vid))
    }

    fn update_members(&self, vlan: Oid, f: impl FnOnce(&mut Vec<u64>)) {
        let key = ObjectKey::Oid(vlan);
        let mut members: Vec<u64> = self
            .ctx
            .store
            .get(&key, VlanAttrs::MEMBER_LIST)
            .unwrap_or_default();
        f(&mut members);
        self.ctx
            .store
            .store_attribute(&key, VlanAttrs::MEMBER_LIST, members);
    }

    pub fn create_vlan_member(
        &self,
        req: &CreateRequest<VlanMemberAttrs>,
    ) -> SaiResult<CreateResponse> {
        let (key, vid) = self.member_entry(&req.attrs)?;
        self.ctx.add_entry(
            tables::VLAN,
            key,
            vec![Action::set(PacketField::PacketVlanId, vid.to_be_bytes().to_vec())],
        )?;
        let oid = self.ctx.store.next_id();
        if let Some(vlan) = req.attrs.vlan_id {
            self.update_members(vlan, |members| members.push(oid));
        }
        info!("VLAN {} gained member {:#x}", vid, oid);
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_vlan_member(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::VlanMember)?;
        let attrs: VlanMemberAttrs = self.ctx.store.load(&ObjectKey::Oid(oid))?;
        let (key, vid) = self.member_entry(&attrs)?;
        self.ctx.remove_entry(tables::VLAN, key)?;
        if let Some(vlan) = attrs.vlan_id {
            self.update_members(vlan, |members| members.retain(|m| *m != oid));
        }
        info!("VLAN {} lost member {:#x}", vid, oid);
        Ok(())
    }
}
