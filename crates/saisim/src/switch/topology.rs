//! Fixed table layout installed when the switch is created.
//!
//! Packets walk the action tables in order: pre-ingress (VLAN, input
//! interface, VRF, trap), ingress (my-MAC, FIB by IP version), then the FIB
//! result chains through next-hop/group tables into the next-hop-action
//! table (neighbor, output interface) and finally egress (port MAC).

use crate::common::u16_bytes;
use crate::tables;
use saisim_fwd::{Action, Entry, EntryKey, FieldId, MatchField, PacketField, TableDesc, TableKind};
use saisim_types::MacAddress;

fn exact(fields: &[PacketField]) -> TableKind {
    TableKind::Exact {
        key: fields.iter().copied().map(FieldId::packet).collect(),
    }
}

fn prefix(fields: &[PacketField]) -> TableKind {
    TableKind::Prefix {
        key: fields.iter().copied().map(FieldId::packet).collect(),
    }
}

/// Every fixed table, in creation order.
pub fn table_descs() -> Vec<TableDesc> {
    use PacketField::*;
    vec![
        TableDesc::new(tables::INGRESS_VRF, exact(&[PacketInputIface])),
        TableDesc::new(tables::FIB_V4, prefix(&[PacketVrf, IpAddrDst]))
            .with_default(vec![Action::Drop]),
        TableDesc::new(tables::FIB_V6, prefix(&[PacketVrf, IpAddrDst]))
            .with_default(vec![Action::Drop]),
        TableDesc::new(tables::PORT_MAC, exact(&[PacketOutputIface])),
        TableDesc::new(tables::VLAN, exact(&[PacketPortInput, EthernetVlanTag])),
        TableDesc::new(tables::MY_MAC, exact(&[EthernetMacDst])),
        TableDesc::new(tables::NEIGHBOR, exact(&[PacketOutputIface, PacketNextHopIp]))
            .with_default(vec![Action::Drop]),
        TableDesc::new(tables::NEXT_HOP, exact(&[PacketNextHopId])),
        TableDesc::new(tables::NEXT_HOP_GROUP, exact(&[PacketNextHopGroupId])),
        TableDesc::new(tables::FIB_SELECTOR, exact(&[IpVersion])),
        TableDesc::new(tables::PRE_INGRESS, TableKind::Action),
        TableDesc::new(tables::INGRESS, TableKind::Action),
        TableDesc::new(tables::EGRESS, TableKind::Action),
        TableDesc::new(tables::NEXT_HOP_ACTION, TableKind::Action),
        TableDesc::new(tables::TRAP, TableKind::Flow { banks: 1 }),
        TableDesc::new(tables::IP2ME, prefix(&[PacketVrf, IpAddrDst])),
        TableDesc::new(tables::TRAP_ID_TO_HOSTIF, exact(&[PacketTrapId])),
        TableDesc::new(tables::INPUT_IFACE, exact(&[PacketPortInput])),
        TableDesc::new(tables::OUTPUT_IFACE, exact(&[PacketOutputIface])),
        TableDesc::new(tables::TUNNEL_ENCAP, exact(&[PacketTunnelId])),
        TableDesc::new(tables::HOSTIF_TO_PORT, exact(&[PacketPortInput])),
        TableDesc::new(tables::PORT_TO_HOSTIF, exact(&[PacketPortInput])),
        TableDesc::new(tables::TUNNEL_TERM, TableKind::Flow { banks: 1 }),
    ]
}

/// Lookups chained from each action table at bootstrap. Later bindings
/// (ACL groups) are appended after these.
pub const ACTION_CHAINS: [(&str, &[&str]); 4] = [
    (
        tables::PRE_INGRESS,
        &[tables::VLAN, tables::INPUT_IFACE, tables::INGRESS_VRF, tables::TRAP],
    ),
    (tables::INGRESS, &[tables::MY_MAC, tables::FIB_SELECTOR]),
    (tables::EGRESS, &[tables::PORT_MAC]),
    (tables::NEXT_HOP_ACTION, &[tables::NEIGHBOR, tables::OUTPUT_IFACE]),
];

pub fn my_mac_key(mac: MacAddress) -> EntryKey {
    EntryKey::Exact(vec![MatchField::exact(
        PacketField::EthernetMacDst,
        mac.as_bytes().to_vec(),
    )])
}

/// Entries installed right after the tables: action chains, FIB selection
/// and the switch's own MAC.
pub fn fixed_entries(switch_mac: MacAddress) -> Vec<(&'static str, Entry)> {
    let mut entries = Vec::new();
    for (table, steps) in ACTION_CHAINS {
        for (id, step) in (0u32..).zip(steps.iter()) {
            entries.push((
                table,
                Entry {
                    key: EntryKey::Action { id },
                    actions: vec![Action::lookup(*step)],
                },
            ));
        }
    }
    for (version, fib) in [(4u8, tables::FIB_V4), (6u8, tables::FIB_V6)] {
        entries.push((
            tables::FIB_SELECTOR,
            Entry {
                key: EntryKey::Exact(vec![MatchField::exact(PacketField::IpVersion, vec![version])]),
                actions: vec![Action::lookup(fib)],
            },
        ));
    }
    entries.push((
        tables::MY_MAC,
        Entry {
            key: my_mac_key(switch_mac),
            actions: vec![Action::Continue],
        },
    ));
    entries
}

/// VLAN table key for traffic arriving on `port_nid` with `tag` (0 = untagged).
pub fn vlan_key(port_nid: u64, tag: u16) -> EntryKey {
    EntryKey::Exact(vec![
        MatchField::exact(PacketField::PacketPortInput, port_nid.to_be_bytes().to_vec()),
        MatchField::exact(PacketField::EthernetVlanTag, u16_bytes(tag)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_order() {
        let ids: Vec<String> = table_descs().into_iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 23);
        assert_eq!(ids.first().map(String::as_str), Some(tables::INGRESS_VRF));
        assert_eq!(ids.last().map(String::as_str), Some(tables::TUNNEL_TERM));
    }

    #[test]
    fn test_trap_is_last_pre_ingress_step() {
        let pre: Vec<Entry> = fixed_entries(MacAddress::ZERO)
            .into_iter()
            .filter(|(table, _)| *table == tables::PRE_INGRESS)
            .map(|(_, entry)| entry)
            .collect();
        assert_eq!(pre.len(), 4);
        assert_eq!(pre[3].key, EntryKey::Action { id: 3 });
        assert_eq!(pre[3].actions, vec![Action::lookup(tables::TRAP)]);
    }

    #[test]
    fn test_fib_selector() {
        let selector: Vec<Entry> = fixed_entries(MacAddress::ZERO)
            .into_iter()
            .filter(|(table, _)| *table == tables::FIB_SELECTOR)
            .map(|(_, entry)| entry)
            .collect();
        assert_eq!(selector.len(), 2);
        assert_eq!(selector[1].actions, vec![Action::lookup(tables::FIB_V6)]);
    }
}
