//! Router interfaces.

use super::types::{RouterInterfaceAttrs, RouterInterfaceType};
use crate::common::{engine_id, oid_bytes};
use crate::context::OrchContext;
use crate::switch::SwitchAttrs;
use crate::tables;
use log::{info, warn};
use saisim_attrs::{CreateRequest, CreateResponse, ObjectKey, SetRequest};
use saisim_fwd::{Action, EntryKey, MatchField, PacketField};
use saisim_types::{MacAddress, ObjectType, Oid, SaiError, SaiResult};

fn rif_key(field: PacketField, rif: Oid) -> EntryKey {
    EntryKey::Exact(vec![MatchField::exact(field, oid_bytes(rif))])
}

fn port_mac_actions(mac: MacAddress) -> Vec<Action> {
    vec![Action::set(PacketField::EthernetMacSrc, mac.as_bytes().to_vec())]
}

pub struct RifOrch {
    ctx: OrchContext,
}

impl RifOrch {
    pub fn new(ctx: OrchContext) -> Self {
        Self { ctx }
    }

    /// Request MAC, else the switch MAC, else the configured default.
    fn source_mac(&self, requested: Option<MacAddress>) -> SaiResult<MacAddress> {
        if let Some(mac) = requested {
            return Ok(mac);
        }
        let switch = ObjectKey::Oid(self.ctx.switch_id()?);
        Ok(self
            .ctx
            .store
            .get(&switch, SwitchAttrs::SRC_MAC_ADDRESS)
            .unwrap_or(self.ctx.config.switch_mac))
    }

    fn virtual_router(&self, requested: Option<Oid>) -> SaiResult<Oid> {
        match requested {
            Some(vr) => Ok(vr),
            None => {
                let switch = ObjectKey::Oid(self.ctx.switch_id()?);
                self.ctx
                    .store
                    .get(&switch, SwitchAttrs::DEFAULT_VIRTUAL_ROUTER_ID)
            }
        }
    }

    /// The four entries that make a port RIF routable, as (table, key, actions).
    fn port_entries(
        &self,
        rif: Oid,
        port: Oid,
        vr: Oid,
        mac: MacAddress,
    ) -> SaiResult<Vec<(&'static str, EntryKey, Vec<Action>)>> {
        let port_nid = self.ctx.nid_bytes(port)?;
        Ok(vec![
            (
                tables::INPUT_IFACE,
                EntryKey::Exact(vec![MatchField::exact(PacketField::PacketPortInput, port_nid)]),
                vec![Action::set(PacketField::PacketInputIface, oid_bytes(rif))],
            ),
            (
                tables::OUTPUT_IFACE,
                rif_key(PacketField::PacketOutputIface, rif),
                vec![Action::Transmit {
                    port: engine_id(port),
                    immediate: false,
                }],
            ),
            (
                tables::INGRESS_VRF,
                rif_key(PacketField::PacketInputIface, rif),
                vec![Action::set(PacketField::PacketVrf, oid_bytes(vr))],
            ),
            (
                tables::PORT_MAC,
                rif_key(PacketField::PacketOutputIface, rif),
                port_mac_actions(mac),
            ),
        ])
    }

    pub fn create_rif(
        &self,
        req: &CreateRequest<RouterInterfaceAttrs>,
    ) -> SaiResult<CreateResponse> {
        match req.attrs.rif_type {
            Some(RouterInterfaceType::Port) => {}
            Some(RouterInterfaceType::Loopback) => {
                warn!("loopback router interfaces are not programmed");
                return Ok(CreateResponse::new(self.ctx.store.next_id()));
            }
            other => {
                return Err(SaiError::invalid_argument(format!(
                    "unsupported router interface type {:?}",
                    other
                )))
            }
        }
        let port = req
            .attrs
            .port_id
            .ok_or_else(|| SaiError::invalid_argument("PORT_ID is mandatory"))?;
        let vr = self.virtual_router(req.attrs.virtual_router_id)?;
        let mac = self.source_mac(req.attrs.src_mac_address)?;

        let oid = self.ctx.store.next_id();
        for (table, key, actions) in self.port_entries(oid, port, vr, mac)? {
            self.ctx.add_entry(table, key, actions)?;
        }
        let key = ObjectKey::Oid(oid);
        self.ctx
            .store
            .store_attribute(&key, RouterInterfaceAttrs::SRC_MAC_ADDRESS, mac);
        self.ctx
            .store
            .store_attribute(&key, RouterInterfaceAttrs::VIRTUAL_ROUTER_ID, vr);
        info!("router interface {:#x} on port {:#x} vrf {:#x}", oid, port, vr);
        Ok(CreateResponse::new(oid))
    }

    fn load(&self, oid: Oid) -> SaiResult<RouterInterfaceAttrs> {
        self.ctx.require_type(oid, ObjectType::RouterInterface)?;
        self.ctx.store.load(&ObjectKey::Oid(oid))
    }

    pub fn remove_rif(&self, oid: Oid) -> SaiResult<()> {
        let attrs = self.load(oid)?;
        if attrs.rif_type != Some(RouterInterfaceType::Port) {
            return Ok(());
        }
        let (Some(port), Some(vr), Some(mac)) =
            (attrs.port_id, attrs.virtual_router_id, attrs.src_mac_address)
        else {
            return Err(SaiError::internal(format!(
                "router interface {:#x} is missing stored attributes",
                oid
            )));
        };
        for (table, key, _) in self.port_entries(oid, port, vr, mac)? {
            self.ctx.remove_entry(table, key)?;
        }
        Ok(())
    }

    /// SRC_MAC_ADDRESS rewrites the port-MAC entry; other attributes are
    /// only stored.
    pub fn set_rif(&self, req: &SetRequest<RouterInterfaceAttrs>) -> SaiResult<()> {
        let attrs = self.load(req.oid)?;
        if let Some(mac) = req.attrs.src_mac_address {
            if attrs.rif_type == Some(RouterInterfaceType::Port) {
                self.ctx.add_entry(
                    tables::PORT_MAC,
                    rif_key(PacketField::PacketOutputIface, req.oid),
                    port_mac_actions(mac),
                )?;
            }
        }
        Ok(())
    }
}
