//! ACL groups, bank allocation, entries and counters.

use super::compile::{compile_entry, CompiledEntry, EntryResolver};
use super::types::{
    AclCounterAttrs, AclEntryAttrs, AclStage, AclTableAttrs, AclTableGroupAttrs,
    AclTableGroupMemberAttrs, AclTableGroupType, TableLocation,
};
use crate::common::{engine_id, merge_attrs};
use crate::context::OrchContext;
use crate::udf::UdfOrch;
use log::{debug, info};
use saisim_attrs::{
    CreateRequest, CreateResponse, GetRequest, GetResponse, ObjectKey, SetRequest,
};
use saisim_fwd::{EntryKey, FieldId, TableDesc, TableKind};
use saisim_types::{ObjectType, Oid, SaiError, SaiResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Resolves entry references against live switch state.
struct SwitchResolver<'a> {
    ctx: &'a OrchContext,
    udf: &'a UdfOrch,
}

impl EntryResolver for SwitchResolver<'_> {
    fn port_nid(&self, port: Oid) -> SaiResult<u64> {
        self.ctx.nid(port)
    }

    fn cpu_port(&self) -> SaiResult<Oid> {
        self.ctx.cpu_port()
    }

    fn object_type(&self, oid: Oid) -> ObjectType {
        self.ctx.object_type(oid)
    }

    fn udf_fields(&self, group: Oid) -> SaiResult<Vec<FieldId>> {
        self.udf.fields(group)
    }
}

/// Where an ACL entry sits in the engine, kept so removal does not depend
/// on the table membership or ports the entry was compiled against.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InstalledEntry {
    table: Oid,
    group: Oid,
    key: EntryKey,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AclOrchStats {
    pub entries_created: u64,
    pub entries_removed: u64,
}

pub struct AclOrch {
    ctx: OrchContext,
    udf: Arc<UdfOrch>,
    /// Next free bank per group.
    banks: Mutex<HashMap<Oid, u32>>,
    /// ACL table to its place in a group.
    locations: Mutex<HashMap<Oid, TableLocation>>,
    installed: Mutex<HashMap<Oid, InstalledEntry>>,
    stats: Mutex<AclOrchStats>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AclOrch {
    pub fn new(ctx: OrchContext, udf: Arc<UdfOrch>) -> Self {
        Self {
            ctx,
            udf,
            banks: Mutex::new(HashMap::new()),
            locations: Mutex::new(HashMap::new()),
            installed: Mutex::new(HashMap::new()),
            stats: Mutex::new(AclOrchStats::default()),
        }
    }

    pub fn reset(&self) {
        lock(&self.banks).clear();
        lock(&self.locations).clear();
        lock(&self.installed).clear();
    }

    pub fn stats(&self) -> AclOrchStats {
        *lock(&self.stats)
    }

    pub fn location(&self, table: Oid) -> Option<TableLocation> {
        lock(&self.locations).get(&table).copied()
    }

    fn resolver(&self) -> SwitchResolver<'_> {
        SwitchResolver {
            ctx: &self.ctx,
            udf: &self.udf,
        }
    }

    pub fn create_table(&self, req: &CreateRequest<AclTableAttrs>) -> SaiResult<CreateResponse> {
        if req.attrs.acl_stage.is_none() {
            return Err(SaiError::invalid_argument("ACL_STAGE is mandatory"));
        }
        Ok(CreateResponse::default())
    }

    pub fn remove_table(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::AclTable)?;
        if let Some(location) = self.location(oid) {
            return Err(SaiError::failed_precondition(format!(
                "ACL table {:#x} is still a member of group {:#x}",
                oid, location.group
            )));
        }
        Ok(())
    }

    pub fn create_group(
        &self,
        req: &CreateRequest<AclTableGroupAttrs>,
    ) -> SaiResult<CreateResponse> {
        match req.attrs.acl_stage {
            Some(AclStage::Ingress | AclStage::Egress | AclStage::PreIngress) => {}
            other => {
                return Err(SaiError::invalid_argument(format!(
                    "unsupported ACL group stage {:?}",
                    other
                )))
            }
        }
        if req.attrs.group_type != Some(AclTableGroupType::Parallel) {
            return Err(SaiError::invalid_argument(format!(
                "unsupported ACL group type {:?}",
                req.attrs.group_type
            )));
        }

        let oid = self.ctx.store.next_id();
        self.ctx.engine.table_create(TableDesc::new(
            engine_id(oid),
            TableKind::Flow { banks: 1 },
        ))?;
        lock(&self.banks).insert(oid, 0);
        self.ctx.store.store_attribute(
            &ObjectKey::Oid(oid),
            AclTableGroupAttrs::MEMBER_LIST,
            Vec::<u64>::new(),
        );
        info!("created ACL group {:#x} ({:?})", oid, req.attrs.acl_stage);
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_group(&self, oid: Oid) -> SaiResult<()> {
        let mut banks = lock(&self.banks);
        if !banks.contains_key(&oid) {
            return Err(SaiError::failed_precondition(format!(
                "ACL group {:#x} not found",
                oid
            )));
        }
        if lock(&self.locations).values().any(|l| l.group == oid) {
            return Err(SaiError::failed_precondition(format!(
                "ACL group {:#x} still has members",
                oid
            )));
        }
        self.ctx.engine.table_delete(&engine_id(oid))?;
        banks.remove(&oid);
        Ok(())
    }

    fn update_member_list(&self, group: Oid, f: impl FnOnce(&mut Vec<u64>)) {
        let key = ObjectKey::Oid(group);
        let mut members: Vec<u64> = self
            .ctx
            .store
            .get(&key, AclTableGroupAttrs::MEMBER_LIST)
            .unwrap_or_default();
        f(&mut members);
        self.ctx
            .store
            .store_attribute(&key, AclTableGroupAttrs::MEMBER_LIST, members);
    }

    /// Places the member's table in the group's next free bank. Banks are
    /// handed out 0, 1, 2, ... and never reused.
    pub fn create_member(
        &self,
        req: &CreateRequest<AclTableGroupMemberAttrs>,
    ) -> SaiResult<CreateResponse> {
        let group = req
            .attrs
            .acl_table_group_id
            .ok_or_else(|| SaiError::invalid_argument("ACL_TABLE_GROUP_ID is mandatory"))?;
        let table = req
            .attrs
            .acl_table_id
            .ok_or_else(|| SaiError::invalid_argument("ACL_TABLE_ID is mandatory"))?;
        self.ctx.require_type(table, ObjectType::AclTable)?;
        if let Some(location) = self.location(table) {
            return Err(SaiError::failed_precondition(format!(
                "ACL table {:#x} is already in group {:#x}",
                table, location.group
            )));
        }

        let bank = {
            let mut banks = lock(&self.banks);
            let next = banks.get_mut(&group).ok_or_else(|| {
                SaiError::failed_precondition(format!("ACL group {:#x} not found", group))
            })?;
            let bank = *next;
            *next += 1;
            bank
        };

        let member = self.ctx.store.next_id();
        lock(&self.locations).insert(
            table,
            TableLocation {
                group,
                bank,
                member,
            },
        );
        self.update_member_list(group, |members| members.push(member));
        debug!("ACL table {:#x} -> group {:#x} bank {}", table, group, bank);
        Ok(CreateResponse::new(member))
    }

    /// Refused while entries are still installed in the member's table.
    pub fn remove_member(&self, oid: Oid) -> SaiResult<()> {
        let location = {
            let mut locations = lock(&self.locations);
            let table = locations
                .iter()
                .find(|(_, l)| l.member == oid)
                .map(|(table, _)| *table)
                .ok_or_else(|| {
                    SaiError::failed_precondition(format!("ACL group member {:#x} not found", oid))
                })?;
            let entries = lock(&self.installed)
                .values()
                .filter(|e| e.table == table)
                .count();
            if entries > 0 {
                return Err(SaiError::failed_precondition(format!(
                    "ACL table {:#x} still has {} entries",
                    table, entries
                )));
            }
            locations.remove(&table)
        };
        if let Some(location) = location {
            self.update_member_list(location.group, |members| members.retain(|m| *m != oid));
        }
        Ok(())
    }

    fn compile(&self, attrs: &AclEntryAttrs) -> SaiResult<(InstalledEntry, CompiledEntry)> {
        let table = attrs
            .table_id
            .ok_or_else(|| SaiError::invalid_argument("TABLE_ID is mandatory"))?;
        let location = self.location(table).ok_or_else(|| {
            SaiError::failed_precondition(format!(
                "ACL table {:#x} is not a member of any group",
                table
            ))
        })?;
        let compiled = compile_entry(attrs, location, &self.resolver())?;
        let installed = InstalledEntry {
            table,
            group: location.group,
            key: compiled.key.clone(),
        };
        Ok((installed, compiled))
    }

    fn installed_entry(&self, oid: Oid) -> SaiResult<InstalledEntry> {
        self.ctx.require_type(oid, ObjectType::AclEntry)?;
        lock(&self.installed).get(&oid).cloned().ok_or_else(|| {
            SaiError::internal(format!("ACL entry {:#x} is not installed", oid))
        })
    }

    pub fn create_entry(&self, req: &CreateRequest<AclEntryAttrs>) -> SaiResult<CreateResponse> {
        let (installed, compiled) = self.compile(&req.attrs)?;
        self.ctx
            .add_entry(&engine_id(installed.group), compiled.key, compiled.actions)?;
        let oid = self.ctx.store.next_id();
        lock(&self.installed).insert(oid, installed);
        lock(&self.stats).entries_created += 1;
        Ok(CreateResponse::new(oid))
    }

    /// Compiles the merged attributes and swaps the result in for the
    /// installed entry.
    pub fn set_entry(&self, req: &SetRequest<AclEntryAttrs>) -> SaiResult<()> {
        let old = self.installed_entry(req.oid)?;
        let mut attrs: AclEntryAttrs = self.ctx.store.load(&ObjectKey::Oid(req.oid))?;
        merge_attrs(&mut attrs, &req.attrs)?;

        let (new, compiled) = self.compile(&attrs)?;
        if old.group != new.group || old.key != new.key {
            self.ctx.remove_entry(&engine_id(old.group), old.key)?;
        }
        self.ctx
            .add_entry(&engine_id(new.group), compiled.key, compiled.actions)?;
        lock(&self.installed).insert(req.oid, new);
        Ok(())
    }

    pub fn remove_entry(&self, oid: Oid) -> SaiResult<()> {
        let installed = self.installed_entry(oid)?;
        self.ctx
            .remove_entry(&engine_id(installed.group), installed.key)?;
        lock(&self.installed).remove(&oid);
        lock(&self.stats).entries_removed += 1;
        Ok(())
    }

    pub fn create_counter(
        &self,
        req: &CreateRequest<AclCounterAttrs>,
    ) -> SaiResult<CreateResponse> {
        let table = req
            .attrs
            .table_id
            .ok_or_else(|| SaiError::invalid_argument("TABLE_ID is mandatory"))?;
        self.ctx.require_type(table, ObjectType::AclTable)?;
        let oid = self.ctx.store.next_id();
        self.ctx.engine.flow_counter_create(&engine_id(oid))?;
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_counter(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::AclCounter)?;
        Ok(self.ctx.engine.object_delete(&engine_id(oid))?)
    }

    /// Reads PACKETS and BYTES live from the engine.
    pub fn get_counter(&self, req: &GetRequest) -> SaiResult<GetResponse<AclCounterAttrs>> {
        let mut resp = GetResponse::<AclCounterAttrs>::default();
        let wants_packets = req.attr_ids.contains(&AclCounterAttrs::PACKETS);
        let wants_bytes = req.attr_ids.contains(&AclCounterAttrs::BYTES);
        if wants_packets || wants_bytes {
            let data = self.ctx.engine.flow_counter_query(&engine_id(req.oid))?;
            if wants_packets {
                resp.attrs.packets = Some(data.packets);
            }
            if wants_bytes {
                resp.attrs.bytes = Some(data.bytes);
            }
        }
        Ok(resp)
    }
}
