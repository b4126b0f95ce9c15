//! Host interfaces, traps and hostif table entries.

use super::types::{
    HostifAttrs, HostifTableEntryAttrs, HostifTableEntryType, HostifTrapAttrs, HostifTrapType,
    HostifType,
};
use crate::common::{engine_id, merge_attrs, oid_bytes, u16_bytes, PacketAction};
use crate::context::OrchContext;
use crate::tables;
use log::{debug, info, warn};
use saisim_attrs::{CreateRequest, CreateResponse, ObjectKey, SetRequest};
use saisim_fwd::{
    Action, EntryKey, FieldId, HeaderId, MatchField, PacketField, PortDesc, PortKind,
};
use saisim_types::{ObjectType, Oid, SaiError, SaiResult};

const ETHERTYPE_ARP: u16 = 0x0806;
const ETHERTYPE_LACP: u16 = 0x8809;
const ETHERTYPE_LLDP: u16 = 0x88cc;
const ETHERTYPE_EAPOL: u16 = 0x888e;
const STP_MAC: [u8; 6] = [0x01, 0x80, 0xc2, 0x00, 0x00, 0x00];
const UDLD_MAC: [u8; 6] = [0x01, 0x00, 0x0c, 0xcc, 0xcc, 0xcc];
const IPPROTO_TCP: u8 = 6;
const IPPROTO_UDP: u8 = 17;
const IPPROTO_ICMPV6: u8 = 58;
const IPPROTO_OSPF: u8 = 89;
const PORT_DHCP_SERVER: u16 = 67;
const PORT_DHCPV6_SERVER: u16 = 547;
const PORT_BGP: u16 = 179;
/// ARP opcode, relative to the start of the ARP header.
const ARP_OPCODE: FieldId = FieldId::bytes(HeaderId::L3, 6, 2);

fn ether_type(value: u16) -> MatchField {
    MatchField::exact(PacketField::EthernetType, u16_bytes(value))
}

fn ip(version: u8, proto: u8) -> [MatchField; 2] {
    [
        MatchField::exact(PacketField::IpVersion, vec![version]),
        MatchField::exact(PacketField::IpProto, vec![proto]),
    ]
}

fn bgp(version: u8) -> Vec<MatchField> {
    let mut fields = ip(version, IPPROTO_TCP).to_vec();
    fields.push(MatchField::exact(PacketField::L4PortDst, u16_bytes(PORT_BGP)));
    fields
}

/// Trap-table match for a trap type; `None` for types without one.
pub fn trap_fields(trap_type: i32) -> Option<Vec<MatchField>> {
    use HostifTrapType::*;
    let fields = match HostifTrapType::from_i32(trap_type)? {
        Stp => vec![MatchField::exact(PacketField::EthernetMacDst, STP_MAC.to_vec())],
        Lacp => vec![ether_type(ETHERTYPE_LACP)],
        Eapol => vec![ether_type(ETHERTYPE_EAPOL)],
        Lldp => vec![ether_type(ETHERTYPE_LLDP)],
        Udld => vec![MatchField::exact(PacketField::EthernetMacDst, UDLD_MAC.to_vec())],
        ArpRequest => vec![ether_type(ETHERTYPE_ARP), MatchField::exact(ARP_OPCODE, u16_bytes(1))],
        ArpResponse => vec![ether_type(ETHERTYPE_ARP), MatchField::exact(ARP_OPCODE, u16_bytes(2))],
        Dhcp => {
            let mut fields = ip(4, IPPROTO_UDP).to_vec();
            fields.push(MatchField::exact(PacketField::L4PortDst, u16_bytes(PORT_DHCP_SERVER)));
            fields
        }
        Dhcpv6 => {
            let mut fields = ip(6, IPPROTO_UDP).to_vec();
            fields.push(MatchField::exact(PacketField::L4PortDst, u16_bytes(PORT_DHCPV6_SERVER)));
            fields
        }
        Ospf => vec![MatchField::exact(PacketField::IpProto, vec![IPPROTO_OSPF])],
        Ipv6NeighborDiscovery => ip(6, IPPROTO_ICMPV6).to_vec(),
        Bgp => bgp(4),
        Bgpv6 => bgp(6),
        Ip2me | Ssh | Snmp | TtlError => return None,
    };
    Some(fields)
}

pub struct HostifOrch {
    ctx: OrchContext,
}

impl HostifOrch {
    pub fn new(ctx: OrchContext) -> Self {
        Self { ctx }
    }

    /// hostif -> port and port -> hostif, both transmitting immediately.
    fn port_entries(
        &self,
        hostif: Oid,
        port: Oid,
    ) -> SaiResult<[(&'static str, EntryKey, Vec<Action>); 2]> {
        let key = |nid: Vec<u8>| {
            EntryKey::Exact(vec![MatchField::exact(PacketField::PacketPortInput, nid)])
        };
        Ok([
            (
                tables::HOSTIF_TO_PORT,
                key(self.ctx.nid_bytes(hostif)?),
                vec![Action::Transmit {
                    port: engine_id(port),
                    immediate: true,
                }],
            ),
            (
                tables::PORT_TO_HOSTIF,
                key(self.ctx.nid_bytes(port)?),
                vec![Action::Transmit {
                    port: engine_id(hostif),
                    immediate: true,
                }],
            ),
        ])
    }

    pub fn create_hostif(&self, req: &CreateRequest<HostifAttrs>) -> SaiResult<CreateResponse> {
        match req.attrs.hostif_type {
            Some(HostifType::Netdev) => {}
            Some(HostifType::Genetlink) => {
                warn!(
                    "genetlink host interface {:?} is not backed by the engine",
                    req.attrs.name
                );
                return Ok(CreateResponse::default());
            }
            other => {
                return Err(SaiError::invalid_argument(format!(
                    "unsupported host interface type {:?}",
                    other
                )))
            }
        }
        let name = req
            .attrs
            .name
            .clone()
            .ok_or_else(|| SaiError::invalid_argument("NAME is mandatory"))?;
        let port = req
            .attrs
            .obj_id
            .ok_or_else(|| SaiError::invalid_argument("OBJ_ID is mandatory"))?;

        let oid = self.ctx.store.next_id();
        self.ctx.engine.port_create(PortDesc {
            id: engine_id(oid),
            kind: PortKind::Tap {
                device: name.clone(),
            },
        })?;
        for (table, key, actions) in self.port_entries(oid, port)? {
            self.ctx.add_entry(table, key, actions)?;
        }
        if let Some(up) = req.attrs.oper_status {
            self.ctx.engine.port_state(&engine_id(oid), Some(up))?;
        }
        info!("host interface {} ({:#x}) for port {:#x}", name, oid, port);
        Ok(CreateResponse::new(oid))
    }

    fn load_hostif(&self, oid: Oid) -> SaiResult<HostifAttrs> {
        self.ctx.require_type(oid, ObjectType::Hostif)?;
        self.ctx.store.load(&ObjectKey::Oid(oid))
    }

    pub fn set_hostif(&self, req: &SetRequest<HostifAttrs>) -> SaiResult<()> {
        let attrs = self.load_hostif(req.oid)?;
        if attrs.hostif_type != Some(HostifType::Netdev) {
            return Ok(());
        }
        if let Some(up) = req.attrs.oper_status {
            let status = self.ctx.engine.port_state(&engine_id(req.oid), Some(up))?;
            debug!("host interface {:#x} -> {:?}", req.oid, status);
        }
        Ok(())
    }

    pub fn remove_hostif(&self, oid: Oid) -> SaiResult<()> {
        let attrs = self.load_hostif(oid)?;
        if attrs.hostif_type != Some(HostifType::Netdev) {
            return Ok(());
        }
        let port = attrs
            .obj_id
            .ok_or_else(|| SaiError::internal(format!("host interface {:#x} has no port", oid)))?;
        for (table, key, _) in self.port_entries(oid, port)? {
            self.ctx.remove_entry(table, key)?;
        }
        Ok(self.ctx.engine.object_delete(&engine_id(oid))?)
    }

    /// Trap-table entry for a trap, or `None` for trap types that are only
    /// recorded.
    fn trap_program(
        &self,
        trap: Oid,
        attrs: &HostifTrapAttrs,
    ) -> SaiResult<Option<(EntryKey, Vec<Action>)>> {
        let trap_type = attrs
            .trap_type
            .ok_or_else(|| SaiError::invalid_argument("TRAP_TYPE is mandatory"))?;
        let Some(fields) = trap_fields(trap_type) else {
            return Ok(None);
        };
        let actions = match attrs.packet_action.unwrap_or(PacketAction::Trap) {
            PacketAction::Trap | PacketAction::Copy => vec![
                Action::set(PacketField::PacketTrapId, oid_bytes(trap)),
                Action::Transmit {
                    port: engine_id(self.ctx.cpu_port()?),
                    immediate: true,
                },
            ],
            PacketAction::Drop => vec![Action::Drop],
            PacketAction::Forward => vec![Action::Continue],
            other => {
                return Err(SaiError::invalid_argument(format!(
                    "unsupported trap action {:?}",
                    other
                )))
            }
        };
        let key = EntryKey::Flow {
            priority: attrs.trap_priority.unwrap_or_default(),
            bank: 0,
            fields,
        };
        Ok(Some((key, actions)))
    }

    pub fn create_trap(&self, req: &CreateRequest<HostifTrapAttrs>) -> SaiResult<CreateResponse> {
        let oid = self.ctx.store.next_id();
        match self.trap_program(oid, &req.attrs)? {
            Some((key, actions)) => self.ctx.add_entry(tables::TRAP, key, actions)?,
            None => debug!("trap type {:?} has no trap-table match", req.attrs.trap_type),
        }
        Ok(CreateResponse::new(oid))
    }

    fn load_trap(&self, oid: Oid) -> SaiResult<HostifTrapAttrs> {
        self.ctx.require_type(oid, ObjectType::HostifTrap)?;
        self.ctx.store.load(&ObjectKey::Oid(oid))
    }

    pub fn set_trap(&self, req: &SetRequest<HostifTrapAttrs>) -> SaiResult<()> {
        let old = self.load_trap(req.oid)?;
        let mut new = old.clone();
        merge_attrs(&mut new, &req.attrs)?;
        let before = self.trap_program(req.oid, &old)?;
        let after = self.trap_program(req.oid, &new)?;
        if let Some((old_key, _)) = &before {
            if after.as_ref().map(|(key, _)| key) != Some(old_key) {
                self.ctx.remove_entry(tables::TRAP, old_key.clone())?;
            }
        }
        if let Some((key, actions)) = after {
            self.ctx.add_entry(tables::TRAP, key, actions)?;
        }
        Ok(())
    }

    pub fn remove_trap(&self, oid: Oid) -> SaiResult<()> {
        let attrs = self.load_trap(oid)?;
        if let Some((key, _)) = self.trap_program(oid, &attrs)? {
            self.ctx.remove_entry(tables::TRAP, key)?;
        }
        Ok(())
    }

    fn trap_id_key(trap: Oid) -> EntryKey {
        EntryKey::Exact(vec![MatchField::exact(PacketField::PacketTrapId, oid_bytes(trap))])
    }

    /// Only TRAP_ID entries are programmed; packets carrying the trap id are
    /// sent to the named host interface.
    pub fn create_table_entry(
        &self,
        req: &CreateRequest<HostifTableEntryAttrs>,
    ) -> SaiResult<CreateResponse> {
        if req.attrs.entry_type != Some(HostifTableEntryType::TrapId) {
            return Ok(CreateResponse::default());
        }
        let trap = req
            .attrs
            .trap_id
            .ok_or_else(|| SaiError::invalid_argument("TRAP_ID is mandatory"))?;
        let actions = match req.attrs.host_if {
            Some(hostif) => vec![Action::Transmit {
                port: engine_id(hostif),
                immediate: true,
            }],
            None => vec![Action::Continue],
        };
        self.ctx
            .add_entry(tables::TRAP_ID_TO_HOSTIF, Self::trap_id_key(trap), actions)?;
        Ok(CreateResponse::default())
    }

    pub fn remove_table_entry(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::HostifTableEntry)?;
        let attrs: HostifTableEntryAttrs = self.ctx.store.load(&ObjectKey::Oid(oid))?;
        match (attrs.entry_type, attrs.trap_id) {
            (Some(HostifTableEntryType::TrapId), Some(trap)) => self
                .ctx
                .remove_entry(tables::TRAP_ID_TO_HOSTIF, Self::trap_id_key(trap)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lldp_matches_ether_type() {
        let fields = trap_fields(HostifTrapType::Lldp as i32).unwrap();
        assert_eq!(fields, vec![ether_type(0x88cc)]);
    }

    #[test]
    fn test_arp_matches_opcode() {
        let fields = trap_fields(HostifTrapType::ArpResponse as i32).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].field, ARP_OPCODE);
        assert_eq!(fields[1].bytes, vec![0, 2]);
    }

    #[test]
    fn test_bgp_family() {
        let v4 = trap_fields(HostifTrapType::Bgp as i32).unwrap();
        let v6 = trap_fields(HostifTrapType::Bgpv6 as i32).unwrap();
        assert_eq!(v4[0].bytes, vec![4]);
        assert_eq!(v6[0].bytes, vec![6]);
        assert_eq!(v4[2].bytes, u16_bytes(179));
    }

    #[test]
    fn test_unmapped_types() {
        assert_eq!(trap_fields(HostifTrapType::Ssh as i32), None);
        assert_eq!(trap_fields(0x7777), None);
    }
}
