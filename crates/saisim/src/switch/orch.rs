//! Switch bootstrap, warm recovery and pipeline-stage ACL binding.

use super::topology::{self, ACTION_CHAINS};
use super::types::{HashAttrs, NativeHashField, SwitchAttrs};
use crate::audit::{AuditCategory, AuditRecord};
use crate::audit_log;
use crate::common::engine_id;
use crate::context::OrchContext;
use crate::hostif::HostifTrapGroupAttrs;
use crate::l2::{BridgeAttrs, BridgeType, StpAttrs, VlanAttrs};
use crate::ports::PortsOrch;
use crate::stubs::VirtualRouterAttrs;
use crate::tables;
use log::{debug, info, warn};
use saisim_attrs::{AttributeMessage, CreateRequest, CreateResponse, ObjectKey, SetRequest};
use saisim_fwd::{Action, EntryKey};
use saisim_types::{MacAddress, ObjectType, Oid, SaiError, SaiResult, NULL_OID};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Next free entry id per action table, and the ACL group bound to each
/// pipeline stage.
#[derive(Debug, Default)]
struct ActionSlots {
    next: HashMap<&'static str, u32>,
    bound: HashMap<&'static str, (u32, Oid)>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwitchOrchStats {
    pub cold_boots: u64,
    pub warm_recoveries: u64,
}

pub struct SwitchOrch {
    ctx: OrchContext,
    ports: Arc<PortsOrch>,
    slots: Mutex<ActionSlots>,
    stats: Mutex<SwitchOrchStats>,
}

const DEFAULT_HASH_FIELDS: [NativeHashField; 5] = [
    NativeHashField::SrcIp,
    NativeHashField::DstIp,
    NativeHashField::IpProtocol,
    NativeHashField::L4SrcPort,
    NativeHashField::L4DstPort,
];

impl SwitchOrch {
    pub fn new(ctx: OrchContext, ports: Arc<PortsOrch>) -> Self {
        Self {
            ctx,
            ports,
            slots: Mutex::new(ActionSlots::default()),
            stats: Mutex::new(SwitchOrchStats::default()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, ActionSlots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stats(&self) -> SwitchOrchStats {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset(&self) {
        *self.slots() = ActionSlots::default();
    }

    /// Allocates an OID for a default object and stores its attributes.
    fn create_default<M: AttributeMessage>(&self, attrs: M) -> Oid {
        let oid = self.ctx.store.next_id();
        let key = ObjectKey::Oid(oid);
        self.ctx.store.set_type(&key, M::OBJECT_TYPE);
        self.ctx.store.store_attributes(&key, &attrs);
        debug!("created default {} {:#x}", M::OBJECT_TYPE, oid);
        oid
    }

    pub fn create_switch(&self, req: &CreateRequest<SwitchAttrs>) -> SaiResult<CreateResponse> {
        let existing = self.ctx.store.switch_id();
        if existing != NULL_OID {
            return self.recover(existing);
        }

        let oid = self.ctx.store.next_id();
        self.ctx
            .store
            .set_type(&ObjectKey::Oid(oid), ObjectType::Switch);

        let mac = req.attrs.src_mac_address.unwrap_or(self.ctx.config.switch_mac);
        self.install_topology(mac)?;
        let cpu_port = self.ports.create_cpu_port()?;

        let stp = self.create_default(StpAttrs {
            vlan_list: Some(vec![1]),
            port_list: Some(vec![]),
            ..Default::default()
        });
        let vlan = self.create_default(VlanAttrs {
            vlan_id: Some(1),
            member_list: Some(vec![]),
            stp_instance: Some(stp),
            ..Default::default()
        });
        let vr = self.create_default(VirtualRouterAttrs {
            admin_v4_state: Some(true),
            admin_v6_state: Some(true),
            src_mac_address: Some(mac),
            ..Default::default()
        });
        let bridge = self.create_default(BridgeAttrs {
            bridge_type: Some(BridgeType::OneQ),
            port_list: Some(vec![]),
            ..Default::default()
        });
        let trap_group = self.create_default(HostifTrapGroupAttrs {
            admin_state: Some(true),
            queue: Some(0),
            ..Default::default()
        });
        let hash_fields: Vec<i32> = DEFAULT_HASH_FIELDS.iter().map(|f| *f as i32).collect();
        let ecmp_hash = self.create_default(HashAttrs {
            native_hash_field_list: Some(hash_fields.clone()),
            udf_group_list: Some(vec![]),
        });
        let lag_hash = self.create_default(HashAttrs {
            native_hash_field_list: Some(hash_fields),
            udf_group_list: Some(vec![]),
        });

        let capabilities = SwitchAttrs {
            number_of_active_ports: Some(0),
            max_number_of_supported_ports: Some(256),
            port_list: Some(vec![]),
            port_max_mtu: Some(9216),
            cpu_port: Some(cpu_port),
            max_virtual_routers: Some(1024),
            fdb_table_size: Some(16_384),
            l3_neighbor_table_size: Some(8192),
            l3_route_table_size: Some(65_536),
            lag_members: Some(64),
            number_of_lags: Some(256),
            ecmp_members: Some(64),
            number_of_ecmp_groups: Some(1024),
            number_of_unicast_queues: Some(8),
            number_of_multicast_queues: Some(4),
            number_of_queues: Some(self.ctx.config.queues_per_port),
            number_of_cpu_queues: Some(self.ctx.config.queues_per_port),
            acl_table_minimum_priority: Some(0),
            acl_table_maximum_priority: Some(u32::MAX),
            acl_entry_minimum_priority: Some(0),
            acl_entry_maximum_priority: Some(u32::MAX),
            default_vlan_id: Some(vlan),
            default_stp_inst_id: Some(stp),
            max_stp_instance: Some(1),
            default_virtual_router_id: Some(vr),
            default_1q_bridge_id: Some(bridge),
            default_trap_group: Some(trap_group),
            ecmp_hash: Some(ecmp_hash),
            lag_hash: Some(lag_hash),
            restart_warm: Some(false),
            src_mac_address: Some(mac),
            ecmp_default_hash_seed: Some(0),
            lag_default_hash_seed: Some(0),
            init_switch: Some(true),
            max_acl_action_count: Some(32),
            available_ipv4_route_entry: Some(65_536),
            available_ipv6_route_entry: Some(65_536),
            ..Default::default()
        };
        self.ctx
            .store
            .store_attributes(&ObjectKey::Oid(oid), &capabilities);

        self.stats.lock().unwrap_or_else(PoisonError::into_inner).cold_boots += 1;
        info!("switch {:#x} created, CPU port {:#x}", oid, cpu_port);
        audit_log!(AuditRecord::new(
            AuditCategory::SystemLifecycle,
            "SwitchOrch",
            "create_switch"
        )
        .with_object(oid, ObjectType::Switch)
        .with_details(serde_json::json!({
            "cpu_port": engine_id(cpu_port),
            "src_mac": mac.to_string(),
        })));
        Ok(CreateResponse::new(oid))
    }

    /// A switch survives only a warm removal; any other existing switch
    /// blocks creation.
    fn recover(&self, existing: Oid) -> SaiResult<CreateResponse> {
        let key = ObjectKey::Oid(existing);
        let warm = self
            .ctx
            .store
            .get::<bool>(&key, SwitchAttrs::RESTART_WARM)
            .unwrap_or(false);
        if !warm {
            return Err(SaiError::failed_precondition(format!(
                "switch {:#x} already exists",
                existing
            )));
        }
        self.ctx
            .store
            .store_attribute(&key, SwitchAttrs::RESTART_WARM, false);
        self.stats.lock().unwrap_or_else(PoisonError::into_inner).warm_recoveries += 1;
        info!("recovered switch {:#x} after warm restart", existing);
        audit_log!(AuditRecord::new(
            AuditCategory::WarmRestart,
            "SwitchOrch",
            "recover_switch"
        )
        .with_object(existing, ObjectType::Switch));
        Ok(CreateResponse::new(existing))
    }

    fn install_topology(&self, mac: MacAddress) -> SaiResult<()> {
        for desc in topology::table_descs() {
            self.ctx.engine.table_create(desc)?;
        }
        for (table, entry) in topology::fixed_entries(mac) {
            self.ctx.add_entry(table, entry.key, entry.actions)?;
        }
        let mut slots = self.slots();
        for (table, steps) in ACTION_CHAINS {
            slots
                .next
                .insert(table, u32::try_from(steps.len()).unwrap_or(u32::MAX));
        }
        Ok(())
    }

    pub fn set_switch(&self, req: &SetRequest<SwitchAttrs>) -> SaiResult<()> {
        self.ctx.require_type(req.oid, ObjectType::Switch)?;
        let bindings = [
            (tables::PRE_INGRESS, req.attrs.pre_ingress_acl),
            (tables::INGRESS, req.attrs.ingress_acl),
            (tables::EGRESS, req.attrs.egress_acl),
        ];
        for (table, group) in bindings {
            if let Some(group) = group {
                self.bind_acl(table, group)?;
            }
        }
        if let Some(mac) = req.attrs.src_mac_address {
            let key = ObjectKey::Oid(req.oid);
            let old = self
                .ctx
                .store
                .get(&key, SwitchAttrs::SRC_MAC_ADDRESS)
                .unwrap_or(self.ctx.config.switch_mac);
            if old != mac {
                self.ctx.remove_entry(tables::MY_MAC, topology::my_mac_key(old))?;
                self.ctx
                    .add_entry(tables::MY_MAC, topology::my_mac_key(mac), vec![Action::Continue])?;
            }
        }
        Ok(())
    }

    /// Points a pipeline stage at an ACL table group; the null OID unbinds.
    fn bind_acl(&self, table: &'static str, group: Oid) -> SaiResult<()> {
        if group != NULL_OID {
            self.ctx.require_type(group, ObjectType::AclTableGroup)?;
        }
        let mut slots = self.slots();
        if let Some((id, old)) = slots.bound.remove(table) {
            debug!("{}: unbinding ACL group {:#x}", table, old);
            self.ctx.remove_entry(table, EntryKey::Action { id })?;
        }
        if group == NULL_OID {
            return Ok(());
        }
        let slot = slots.next.entry(table).or_insert(0);
        let id = *slot;
        *slot += 1;
        self.ctx.add_entry(
            table,
            EntryKey::Action { id },
            vec![Action::lookup(engine_id(group))],
        )?;
        slots.bound.insert(table, (id, group));
        info!("{}: bound ACL group {:#x} at slot {}", table, group, id);
        Ok(())
    }

    /// Cold removal tears down the topology, ACL group tables, counters and
    /// every engine port; warm removal keeps everything.
    pub fn remove_switch(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::Switch)?;
        let key = ObjectKey::Oid(oid);
        if self
            .ctx
            .store
            .get::<bool>(&key, SwitchAttrs::RESTART_WARM)
            .unwrap_or(false)
        {
            info!("switch {:#x} removed for warm restart, keeping state", oid);
            audit_log!(AuditRecord::new(
                AuditCategory::WarmRestart,
                "SwitchOrch",
                "remove_switch"
            )
            .with_object(oid, ObjectType::Switch));
            return Ok(());
        }

        for desc in topology::table_descs() {
            if let Err(e) = self.ctx.engine.table_delete(&desc.id) {
                warn!("failed to delete table {}: {}", desc.id, e);
            }
        }
        for group in self.ctx.store.objects_of_type(ObjectType::AclTableGroup) {
            if let Err(e) = self.ctx.engine.table_delete(&engine_id(group)) {
                warn!("failed to delete ACL group table {:#x}: {}", group, e);
            }
        }
        for object_type in [
            ObjectType::AclCounter,
            ObjectType::Hostif,
            ObjectType::Lag,
            ObjectType::Port,
        ] {
            for oid in self.ctx.store.objects_of_type(object_type) {
                if let Err(e) = self.ctx.engine.object_delete(&engine_id(oid)) {
                    warn!("failed to delete {} {:#x}: {}", object_type, oid, e);
                }
            }
        }
        self.reset();
        audit_log!(AuditRecord::new(
            AuditCategory::SystemLifecycle,
            "SwitchOrch",
            "remove_switch"
        )
        .with_object(oid, ObjectType::Switch));
        Ok(())
    }
}
