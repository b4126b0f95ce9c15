//! IP-in-IP tunnels and tunnel termination.

use super::types::{TunnelAttrs, TunnelTermTableEntryAttrs, TunnelTermTableEntryType};
use crate::common::oid_bytes;
use crate::context::OrchContext;
use crate::tables;
use log::info;
use saisim_attrs::{CreateRequest, CreateResponse, ObjectKey};
use saisim_fwd::{Action, EntryKey, HeaderId, MatchField, PacketField};
use saisim_types::{ip_octets, IpPrefix, ObjectType, Oid, SaiError, SaiResult};
use std::net::IpAddr;

/// Point-to-point terminations are more specific and win over the rest.
const P2P_PRIORITY: u32 = 1;
const MP_PRIORITY: u32 = 2;

fn tunnel_key(tunnel: Oid) -> EntryKey {
    EntryKey::Exact(vec![MatchField::exact(PacketField::PacketTunnelId, oid_bytes(tunnel))])
}

fn masked(field: PacketField, addr: IpAddr, mask: Option<IpAddr>) -> SaiResult<MatchField> {
    let mask = match mask {
        Some(mask) if mask.is_ipv4() != addr.is_ipv4() => {
            return Err(SaiError::invalid_argument(format!(
                "mask {} does not match address {}",
                mask, addr
            )))
        }
        Some(mask) => mask,
        None => IpPrefix::host(addr).mask,
    };
    let prefix = IpPrefix { addr, mask };
    Ok(MatchField::masked(field, prefix.network_octets(), prefix.mask_octets()))
}

fn header(addr: &IpAddr) -> HeaderId {
    match addr {
        IpAddr::V4(_) => HeaderId::Ipv4,
        IpAddr::V6(_) => HeaderId::Ipv6,
    }
}

/// Compiles a termination entry into its tunnel-term flow entry.
pub fn term_program(attrs: &TunnelTermTableEntryAttrs) -> SaiResult<(EntryKey, Vec<Action>)> {
    let dst = attrs
        .dst_ip
        .ok_or_else(|| SaiError::invalid_argument("DST_IP is mandatory"))?;
    let vr = attrs
        .vr_id
        .ok_or_else(|| SaiError::invalid_argument("VR_ID is mandatory"))?;
    let mut fields = vec![masked(PacketField::IpAddrDst, dst, attrs.dst_ip_mask)?];
    let priority = match attrs.entry_type {
        Some(TunnelTermTableEntryType::P2p) => {
            let src = attrs
                .src_ip
                .ok_or_else(|| SaiError::invalid_argument("SRC_IP is mandatory for P2P"))?;
            fields.push(masked(PacketField::IpAddrSrc, src, attrs.src_ip_mask)?);
            P2P_PRIORITY
        }
        _ => MP_PRIORITY,
    };

    let mut actions = vec![
        Action::Decap {
            header: header(&dst),
        },
        Action::set(PacketField::PacketVrf, oid_bytes(vr)),
    ];
    if let Some(tunnel) = attrs.action_tunnel_id {
        actions.push(Action::set(PacketField::PacketTunnelId, oid_bytes(tunnel)));
    }
    let key = EntryKey::Flow {
        priority,
        bank: 0,
        fields,
    };
    Ok((key, actions))
}

pub struct TunnelOrch {
    ctx: OrchContext,
}

impl TunnelOrch {
    pub fn new(ctx: OrchContext) -> Self {
        Self { ctx }
    }

    /// Tunnels with an encap source get a tunnel-encap entry that fills the
    /// outer header and re-enters FIB selection for the underlay.
    pub fn create_tunnel(&self, req: &CreateRequest<TunnelAttrs>) -> SaiResult<CreateResponse> {
        let oid = self.ctx.store.next_id();
        if let Some(src) = req.attrs.encap_src_ip {
            self.ctx.add_entry(
                tables::TUNNEL_ENCAP,
                tunnel_key(oid),
                vec![
                    Action::set(PacketField::IpAddrSrc, ip_octets(&src)),
                    Action::copy(PacketField::IpAddrDst, PacketField::PacketNextHopIp),
                    Action::lookup(tables::FIB_SELECTOR),
                ],
            )?;
            info!("tunnel {:#x} encapsulates from {}", oid, src);
        }
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_tunnel(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::Tunnel)?;
        let attrs: TunnelAttrs = self.ctx.store.load(&ObjectKey::Oid(oid))?;
        if attrs.encap_src_ip.is_some() {
            self.ctx.remove_entry(tables::TUNNEL_ENCAP, tunnel_key(oid))?;
        }
        Ok(())
    }

    pub fn create_term_entry(
        &self,
        req: &CreateRequest<TunnelTermTableEntryAttrs>,
    ) -> SaiResult<CreateResponse> {
        let (key, actions) = term_program(&req.attrs)?;
        self.ctx.add_entry(tables::TUNNEL_TERM, key, actions)?;
        Ok(CreateResponse::default())
    }

    pub fn remove_term_entry(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::TunnelTermTableEntry)?;
        let attrs: TunnelTermTableEntryAttrs = self.ctx.store.load(&ObjectKey::Oid(oid))?;
        let (key, _) = term_program(&attrs)?;
        self.ctx.remove_entry(tables::TUNNEL_TERM, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(entry_type: TunnelTermTableEntryType) -> TunnelTermTableEntryAttrs {
        TunnelTermTableEntryAttrs {
            vr_id: Some(7),
            entry_type: Some(entry_type),
            dst_ip: Some("10.1.0.32".parse().unwrap()),
            src_ip: Some("10.1.0.33".parse().unwrap()),
            ..Default::default()
        }
    }

    #[test]
    fn test_p2p_matches_source() {
        let (key, actions) = term_program(&entry(TunnelTermTableEntryType::P2p)).unwrap();
        let EntryKey::Flow {
            priority, fields, ..
        } = key
        else {
            panic!("expected flow key");
        };
        assert_eq!(priority, P2P_PRIORITY);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].masks, vec![0xff; 4]);
        assert_eq!(
            actions[0],
            Action::Decap {
                header: HeaderId::Ipv4
            }
        );
    }

    #[test]
    fn test_p2mp_ignores_source() {
        let (key, _) = term_program(&entry(TunnelTermTableEntryType::P2mp)).unwrap();
        let EntryKey::Flow {
            priority, fields, ..
        } = key
        else {
            panic!("expected flow key");
        };
        assert_eq!(priority, MP_PRIORITY);
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_mask_family_mismatch() {
        let mut attrs = entry(TunnelTermTableEntryType::P2mp);
        attrs.dst_ip_mask = Some("ffff::".parse().unwrap());
        assert!(term_program(&attrs).is_err());
    }
}
