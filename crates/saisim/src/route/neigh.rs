//! Neighbor entries.

use super::types::{NeighborEntryAttrs, NeighborEntryKey};
use crate::common::{merge_attrs, oid_bytes, PacketAction};
use crate::context::OrchContext;
use crate::tables;
use saisim_attrs::{CreateEntryRequest, ObjectKey, RemoveEntryRequest, SetEntryRequest};
use saisim_fwd::{Action, EntryKey, MatchField, PacketField};
use saisim_types::{ip_octets, ObjectType, SaiError, SaiResult};

pub fn neighbor_key(entry: &NeighborEntryKey) -> EntryKey {
    EntryKey::Exact(vec![
        MatchField::exact(PacketField::PacketOutputIface, oid_bytes(entry.rif_id)),
        MatchField::exact(PacketField::PacketNextHopIp, ip_octets(&entry.ip_address)),
    ])
}

fn neighbor_actions(entry: &NeighborEntryKey, attrs: &NeighborEntryAttrs) -> SaiResult<Vec<Action>> {
    if attrs
        .packet_action
        .is_some_and(|action| action.is_drop_like())
    {
        return Ok(vec![Action::Drop]);
    }
    let mac = attrs.dst_mac_address.ok_or_else(|| {
        SaiError::invalid_argument(format!(
            "neighbor {}: DST_MAC_ADDRESS is mandatory",
            entry.ip_address
        ))
    })?;
    Ok(vec![Action::set(
        PacketField::EthernetMacDst,
        mac.as_bytes().to_vec(),
    )])
}

pub struct NeighOrch {
    ctx: OrchContext,
}

impl NeighOrch {
    pub fn new(ctx: OrchContext) -> Self {
        Self { ctx }
    }

    pub fn create_neighbor(
        &self,
        req: &CreateEntryRequest<NeighborEntryKey, NeighborEntryAttrs>,
    ) -> SaiResult<()> {
        self.ctx.require_type(req.entry.rif_id, ObjectType::RouterInterface)?;
        let actions = neighbor_actions(&req.entry, &req.attrs)?;
        self.ctx
            .add_entry(tables::NEIGHBOR, neighbor_key(&req.entry), actions)
    }

    fn stored(&self, entry: &NeighborEntryKey) -> SaiResult<NeighborEntryAttrs> {
        let key = ObjectKey::entry(entry)?;
        if self.ctx.store.key_type(&key) != ObjectType::NeighborEntry {
            return Err(SaiError::not_found(format!("neighbor {}", entry.ip_address)));
        }
        self.ctx.store.load(&key)
    }

    pub fn set_neighbor(
        &self,
        req: &SetEntryRequest<NeighborEntryKey, NeighborEntryAttrs>,
    ) -> SaiResult<()> {
        let mut attrs = self.stored(&req.entry)?;
        merge_attrs(&mut attrs, &req.attrs)?;
        let actions = neighbor_actions(&req.entry, &attrs)?;
        self.ctx
            .add_entry(tables::NEIGHBOR, neighbor_key(&req.entry), actions)
    }

    pub fn remove_neighbor(&self, req: &RemoveEntryRequest<NeighborEntryKey>) -> SaiResult<()> {
        self.stored(&req.entry)?;
        self.ctx
            .remove_entry(tables::NEIGHBOR, neighbor_key(&req.entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use saisim_types::MacAddress;

    fn entry() -> NeighborEntryKey {
        NeighborEntryKey {
            switch_id: 1,
            rif_id: 0x20,
            ip_address: "10.0.0.2".parse().unwrap(),
        }
    }

    #[test]
    fn test_neighbor_actions() {
        let mac: MacAddress = "00:11:22:33:44:55".parse().unwrap();
        let attrs = NeighborEntryAttrs {
            dst_mac_address: Some(mac),
            ..Default::default()
        };
        assert_eq!(
            neighbor_actions(&entry(), &attrs).unwrap(),
            vec![Action::set(
                PacketField::EthernetMacDst,
                vec![0x00, 0x11, 0x22, 0x33, 0x44, 0x55]
            )]
        );

        let attrs = NeighborEntryAttrs {
            packet_action: Some(PacketAction::Drop),
            ..Default::default()
        };
        assert_eq!(neighbor_actions(&entry(), &attrs).unwrap(), vec![Action::Drop]);
        assert!(neighbor_actions(&entry(), &NeighborEntryAttrs::default()).is_err());
    }

    #[test]
    fn test_neighbor_key_fields() {
        let EntryKey::Exact(fields) = neighbor_key(&entry()) else {
            panic!("expected exact key");
        };
        assert_eq!(fields[1].bytes, vec![10, 0, 0, 2]);
    }
}
