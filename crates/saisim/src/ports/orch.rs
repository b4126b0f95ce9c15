//! Port provisioning.
//!
//! A port is never refused because its backing device is missing: the OID,
//! queues, scheduler groups and attribute set are created as usual, the
//! engine gets a placeholder port, and OPER_STATUS reads NOT_PRESENT.

use super::naming::{self, HostDevices};
use super::types::{
    PortAttrs, PortOperStatus, PortType, QueueAttrs, QueueType, SchedulerGroupAttrs,
};
use crate::common::engine_id;
use crate::context::OrchContext;
use crate::switch::SwitchAttrs;
use log::{debug, info, warn};
use saisim_attrs::{
    CreateRequest, CreateResponse, GetRequest, GetResponse, ObjectKey, SetRequest,
};
use saisim_fwd::{Event, ObjectAttribute, PortDesc, PortKind, PortStatus};
use saisim_types::{ObjectType, Oid, SaiError, SaiResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct PortsState {
    /// Port OID to host device name.
    devices: HashMap<Oid, String>,
    /// Logical ports in creation order.
    ports: Vec<Oid>,
    not_present: HashSet<Oid>,
    next_index: u32,
}

/// Queue and scheduler-group OIDs provisioned for one port.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortQos {
    pub queues: Vec<Oid>,
    pub scheduler_groups: Vec<Oid>,
}

pub struct PortsOrch {
    ctx: OrchContext,
    host: Arc<dyn HostDevices>,
    state: Mutex<PortsState>,
}

fn oper_status(status: PortStatus) -> PortOperStatus {
    if status.oper_up {
        PortOperStatus::Up
    } else {
        PortOperStatus::Down
    }
}

impl PortsOrch {
    pub fn new(ctx: OrchContext, host: Arc<dyn HostDevices>) -> Self {
        Self {
            ctx,
            host,
            state: Mutex::new(PortsState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PortsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Device backing a port, if the port is known.
    pub fn device(&self, port: Oid) -> Option<String> {
        self.lock().devices.get(&port).cloned()
    }

    pub fn reset(&self) {
        *self.lock() = PortsState::default();
    }

    /// Allocates queue OIDs, then scheduler-group OIDs, right after the port.
    fn provision_qos(&self, port: Oid) -> PortQos {
        let store = &self.ctx.store;
        let mut qos = PortQos::default();
        for index in 0..self.ctx.config.queues_per_port {
            let queue = store.next_id();
            let key = ObjectKey::Oid(queue);
            store.set_type(&key, ObjectType::Queue);
            store.store_attributes(
                &key,
                &QueueAttrs {
                    queue_type: Some(QueueType::All),
                    port: Some(port),
                    index: u8::try_from(index).ok(),
                    ..Default::default()
                },
            );
            qos.queues.push(queue);
        }
        for _ in 0..self.ctx.config.scheduler_groups_per_port {
            let group = store.next_id();
            let key = ObjectKey::Oid(group);
            store.set_type(&key, ObjectType::SchedulerGroup);
            store.store_attributes(
                &key,
                &SchedulerGroupAttrs {
                    child_count: Some(0),
                    child_list: Some(vec![]),
                    port_id: Some(port),
                    level: Some(0),
                    max_childs: Some(0),
                    ..Default::default()
                },
            );
            qos.scheduler_groups.push(group);
        }
        qos
    }

    fn qos_attrs(qos: &PortQos) -> PortAttrs {
        PortAttrs {
            qos_number_of_queues: u32::try_from(qos.queues.len()).ok(),
            qos_queue_list: Some(qos.queues.clone()),
            qos_number_of_scheduler_groups: u32::try_from(qos.scheduler_groups.len()).ok(),
            qos_scheduler_group_list: Some(qos.scheduler_groups.clone()),
            number_of_ingress_priority_groups: Some(0),
            ingress_priority_group_list: Some(vec![]),
            ..Default::default()
        }
    }

    /// Creates the CPU port during switch bootstrap.
    pub fn create_cpu_port(&self) -> SaiResult<Oid> {
        let oid = self.ctx.store.next_id();
        let id = engine_id(oid);
        self.ctx.engine.port_create(PortDesc {
            id: id.clone(),
            kind: PortKind::Cpu,
        })?;
        let status = self.ctx.engine.port_state(&id, Some(true))?;
        let qos = self.provision_qos(oid);

        let key = ObjectKey::Oid(oid);
        self.ctx.store.set_type(&key, ObjectType::Port);
        self.ctx.store.store_attributes(
            &key,
            &PortAttrs {
                port_type: Some(PortType::Cpu),
                oper_status: Some(oper_status(status)),
                admin_state: Some(true),
                hw_lane_list: Some(vec![]),
                ..Self::qos_attrs(&qos)
            },
        );
        debug!("created CPU port {:#x}", oid);
        Ok(oid)
    }

    pub fn create_port(&self, req: &CreateRequest<PortAttrs>) -> SaiResult<CreateResponse> {
        let lanes = req
            .attrs
            .hw_lane_list
            .clone()
            .ok_or_else(|| SaiError::invalid_argument("HW_LANE_LIST is mandatory"))?;

        let oid = self.ctx.store.next_id();
        let index = {
            let mut state = self.lock();
            state.next_index += 1;
            state.next_index
        };
        let device = naming::device_name(&self.ctx.config, index, &lanes)?;
        let present = !self.ctx.config.check_devices || self.host.exists(&device);
        let kind = if present {
            PortKind::Kernel {
                device: device.clone(),
            }
        } else {
            warn!(
                "device {} for port {:#x} does not exist, creating placeholder",
                device, oid
            );
            PortKind::Fake
        };

        let id = engine_id(oid);
        self.ctx.engine.port_create(PortDesc {
            id: id.clone(),
            kind,
        })?;
        let status = self
            .ctx
            .engine
            .port_state(&id, Some(req.attrs.admin_state.unwrap_or(false)))?;
        if let Some(mtu) = req.attrs.mtu {
            self.ctx.engine.attribute_update(&id, ObjectAttribute::Mtu(mtu))?;
        }
        if let Some(speed) = req.attrs.speed {
            self.ctx.engine.attribute_update(&id, ObjectAttribute::Speed(speed))?;
        }

        let qos = self.provision_qos(oid);
        let speed = req.attrs.speed.unwrap_or(0);
        self.ctx.store.store_attributes(
            &ObjectKey::Oid(oid),
            &PortAttrs {
                port_type: Some(PortType::Logical),
                oper_status: Some(if present {
                    oper_status(status)
                } else {
                    PortOperStatus::NotPresent
                }),
                admin_state: Some(status.admin_up),
                supported_speed: Some(vec![speed]),
                oper_speed: Some(speed),
                ..Self::qos_attrs(&qos)
            },
        );

        let ports = {
            let mut state = self.lock();
            state.devices.insert(oid, device.clone());
            state.ports.push(oid);
            if !present {
                state.not_present.insert(oid);
            }
            state.ports.clone()
        };
        self.sync_switch_ports(ports)?;
        info!("created port {:#x} on {} lanes {:?}", oid, device, lanes);
        Ok(CreateResponse::new(oid))
    }

    fn sync_switch_ports(&self, ports: Vec<Oid>) -> SaiResult<()> {
        let switch = ObjectKey::Oid(self.ctx.switch_id()?);
        self.ctx.store.store_attribute(
            &switch,
            SwitchAttrs::NUMBER_OF_ACTIVE_PORTS,
            u32::try_from(ports.len()).unwrap_or(u32::MAX),
        );
        self.ctx
            .store
            .store_attribute(&switch, SwitchAttrs::PORT_LIST, ports);
        Ok(())
    }

    fn is_present(&self, port: Oid) -> bool {
        !self.lock().not_present.contains(&port)
    }

    pub fn set_port(&self, req: &SetRequest<PortAttrs>) -> SaiResult<()> {
        self.ctx.require_type(req.oid, ObjectType::Port)?;
        let id = engine_id(req.oid);
        if let Some(admin) = req.attrs.admin_state {
            let status = self.ctx.engine.port_state(&id, Some(admin))?;
            if self.is_present(req.oid) {
                self.ctx.store.store_attribute(
                    &ObjectKey::Oid(req.oid),
                    PortAttrs::OPER_STATUS,
                    oper_status(status),
                );
            }
        }
        if let Some(mtu) = req.attrs.mtu {
            self.ctx.engine.attribute_update(&id, ObjectAttribute::Mtu(mtu))?;
        }
        if let Some(speed) = req.attrs.speed {
            self.ctx.engine.attribute_update(&id, ObjectAttribute::Speed(speed))?;
            self.ctx
                .store
                .store_attribute(&ObjectKey::Oid(req.oid), PortAttrs::OPER_SPEED, speed);
        }
        Ok(())
    }

    /// Reports live OPER_STATUS from the engine; everything else comes from the store.
    pub fn get_port(&self, req: &GetRequest) -> SaiResult<GetResponse<PortAttrs>> {
        let mut resp = GetResponse::<PortAttrs>::default();
        if req.attr_ids.contains(&PortAttrs::OPER_STATUS) && self.is_present(req.oid) {
            let status = self.ctx.engine.port_state(&engine_id(req.oid), None)?;
            resp.attrs.oper_status = Some(oper_status(status));
        }
        Ok(resp)
    }

    pub fn remove_port(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::Port)?;
        self.ctx.engine.object_delete(&engine_id(oid))?;

        let attrs: PortAttrs = self.ctx.store.load(&ObjectKey::Oid(oid))?;
        for child in attrs
            .qos_queue_list
            .unwrap_or_default()
            .into_iter()
            .chain(attrs.qos_scheduler_group_list.unwrap_or_default())
        {
            self.ctx.store.delete_object(&ObjectKey::Oid(child));
        }

        let ports = {
            let mut state = self.lock();
            state.devices.remove(&oid);
            state.not_present.remove(&oid);
            state.ports.retain(|p| *p != oid);
            state.ports.clone()
        };
        self.sync_switch_ports(ports)
    }

    /// Applies an engine event; returns the port whose status changed.
    pub fn handle_event(&self, event: &Event) -> Option<Oid> {
        let Event::PortState { port, oper_up } = event;
        let oid = Oid::from_str_radix(port.trim_start_matches("0x"), 16).ok()?;
        if self.ctx.object_type(oid) != ObjectType::Port || !self.is_present(oid) {
            return None;
        }
        let status = if *oper_up {
            PortOperStatus::Up
        } else {
            PortOperStatus::Down
        };
        self.ctx
            .store
            .store_attribute(&ObjectKey::Oid(oid), PortAttrs::OPER_STATUS, status);
        info!("port {:#x} is now {:?}", oid, status);
        Some(oid)
    }
}
