//! Translation of an ACL entry's attributes into a flow-table entry.
//!
//! Compilation is a pure function of the stored attributes and the
//! resolver, so removing an entry recompiles it and removes the identical
//! key.

use super::types::{AclEntryAttrs, AclIpType, TableLocation};
use crate::common::{engine_id, oid_bytes, PacketAction};
use saisim_attrs::AclField;
use saisim_fwd::{Action, EntryKey, FieldId, HeaderId, MatchField, PacketField};
use saisim_types::{ObjectType, Oid, SaiError, SaiResult};

const ETHERTYPE_ARP: [u8; 2] = [0x08, 0x06];
/// Offsets of IPv6 destination address words 3 (bits 127:96) and 2 in the L3 header.
const IPV6_DST_WORD3_OFFSET: u32 = 24;
const IPV6_DST_WORD2_OFFSET: u32 = 28;

/// Lookups an ACL entry needs from the rest of the switch.
pub trait EntryResolver {
    fn port_nid(&self, port: Oid) -> SaiResult<u64>;
    fn cpu_port(&self) -> SaiResult<Oid>;
    fn object_type(&self, oid: Oid) -> ObjectType;
    /// Byte ranges of every UDF in a UDF group, in OID order.
    fn udf_fields(&self, group: Oid) -> SaiResult<Vec<FieldId>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledEntry {
    pub key: EntryKey,
    pub actions: Vec<Action>,
}

fn masked(field: impl Into<FieldId>, acl: &AclField) -> MatchField {
    MatchField::masked(field, acl.data.clone(), acl.mask.clone())
}

fn l3_word(offset: u32, acl: &AclField) -> MatchField {
    masked(FieldId::bytes(HeaderId::L3, offset, 4), acl)
}

fn ip_type_field(ip_type: AclIpType) -> SaiResult<Option<MatchField>> {
    match ip_type {
        AclIpType::Any | AclIpType::Ip => Ok(None),
        AclIpType::Ipv4any => Ok(Some(MatchField::exact(PacketField::IpVersion, vec![4]))),
        AclIpType::Ipv6any => Ok(Some(MatchField::exact(PacketField::IpVersion, vec![6]))),
        AclIpType::Arp | AclIpType::ArpRequest | AclIpType::ArpReply => Ok(Some(
            MatchField::exact(PacketField::EthernetType, ETHERTYPE_ARP.to_vec()),
        )),
        other => Err(SaiError::invalid_argument(format!(
            "unsupported ACL IP type {:?}",
            other
        ))),
    }
}

/// DSCP is the upper six bits of the TOS byte.
fn dscp_field(acl: &AclField) -> MatchField {
    let shift = |bytes: &[u8]| vec![bytes.first().copied().unwrap_or(0) << 2];
    MatchField::masked(PacketField::IpQos, shift(&acl.data), shift(&acl.mask))
}

pub fn compile_fields(
    attrs: &AclEntryAttrs,
    resolver: &dyn EntryResolver,
) -> SaiResult<Vec<MatchField>> {
    use PacketField::*;

    let mut fields = Vec::new();
    if let Some(f) = &attrs.field_dst_ip {
        fields.push(masked(IpAddrDst, f));
    }
    if let Some(f) = &attrs.field_src_ip {
        fields.push(masked(IpAddrSrc, f));
    }
    if let Some(f) = &attrs.field_dst_ipv6 {
        fields.push(masked(IpAddrDst, f));
    }
    if let Some(f) = &attrs.field_src_ipv6 {
        fields.push(masked(IpAddrSrc, f));
    }
    if let Some(port) = attrs.field_in_port {
        let nid = resolver.port_nid(port)?;
        fields.push(MatchField::exact(PacketPortInput, nid.to_be_bytes().to_vec()));
    }
    if let Some(ip_type) = attrs.field_acl_ip_type {
        fields.extend(ip_type_field(ip_type)?);
    }
    if let Some(f) = &attrs.field_dscp {
        fields.push(dscp_field(f));
    }
    if let Some(f) = &attrs.field_dst_ipv6_word3 {
        fields.push(l3_word(IPV6_DST_WORD3_OFFSET, f));
    }
    if let Some(f) = &attrs.field_dst_ipv6_word2 {
        fields.push(l3_word(IPV6_DST_WORD2_OFFSET, f));
    }
    if let Some(f) = &attrs.field_src_mac {
        fields.push(masked(EthernetMacSrc, f));
    }
    if let Some(f) = &attrs.field_dst_mac {
        fields.push(masked(EthernetMacDst, f));
    }
    if let Some(f) = &attrs.field_ether_type {
        fields.push(masked(EthernetType, f));
    }
    if let Some(f) = &attrs.field_icmpv6_type {
        fields.push(masked(IcmpType, f));
    }
    if let Some(f) = &attrs.field_ip_protocol {
        fields.push(masked(IpProto, f));
    }
    if let Some(f) = &attrs.field_l4_dst_port {
        fields.push(masked(L4PortDst, f));
    }
    if let Some(f) = &attrs.field_ttl {
        fields.push(masked(IpHop, f));
    }
    for udf in attrs.user_defined_field_group.iter().flatten() {
        for field in resolver.udf_fields(udf.group)? {
            fields.push(MatchField::masked(field, udf.data.clone(), udf.mask.clone()));
        }
    }
    Ok(fields)
}

pub fn compile_actions(
    attrs: &AclEntryAttrs,
    resolver: &dyn EntryResolver,
) -> SaiResult<Vec<Action>> {
    let mut actions = Vec::new();
    if let Some(vrf) = attrs.action_set_vrf {
        actions.push(Action::set(PacketField::PacketVrf, oid_bytes(vrf)));
    }
    if let Some(trap) = attrs.action_set_user_trap_id {
        actions.push(Action::set(PacketField::PacketTrapId, oid_bytes(trap)));
    }
    if let Some(counter) = attrs.action_counter {
        actions.push(Action::FlowCounter {
            counter: engine_id(counter),
        });
    }
    if let Some(target) = attrs.action_redirect {
        match resolver.object_type(target) {
            ObjectType::L2mcGroup => {
                actions.push(Action::set(PacketField::PacketL2mcGroupId, oid_bytes(target)))
            }
            other => {
                return Err(SaiError::invalid_argument(format!(
                    "ACL redirect to {} is not supported",
                    other
                )))
            }
        }
    }
    if let Some(policer) = attrs.action_set_policer {
        actions.push(Action::Policer {
            policer: engine_id(policer),
        });
    }
    if let Some(action) = attrs.action_packet_action {
        actions.push(match action {
            PacketAction::Drop | PacketAction::Deny => Action::Drop,
            PacketAction::Trap | PacketAction::Copy => Action::Transmit {
                port: engine_id(resolver.cpu_port()?),
                immediate: true,
            },
            PacketAction::Forward
            | PacketAction::Log
            | PacketAction::Transit
            | PacketAction::CopyCancel => Action::Continue,
        });
    }
    Ok(actions)
}

/// Compiles an entry placed at `location`. SAI priorities grow with
/// precedence; the engine's shrink, hence the inversion.
pub fn compile_entry(
    attrs: &AclEntryAttrs,
    location: TableLocation,
    resolver: &dyn EntryResolver,
) -> SaiResult<CompiledEntry> {
    let fields = compile_fields(attrs, resolver)?;
    if fields.is_empty() {
        return Err(SaiError::invalid_argument("ACL entry has no match fields"));
    }
    let actions = compile_actions(attrs, resolver)?;
    Ok(CompiledEntry {
        key: EntryKey::Flow {
            priority: u32::MAX - attrs.priority.unwrap_or(0),
            bank: location.bank,
            fields,
        },
        actions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use saisim_types::Code;

    struct FakeResolver;

    impl EntryResolver for FakeResolver {
        fn port_nid(&self, port: Oid) -> SaiResult<u64> {
            Ok(port + 100)
        }

        fn cpu_port(&self) -> SaiResult<Oid> {
            Ok(2)
        }

        fn object_type(&self, oid: Oid) -> ObjectType {
            if oid == 50 {
                ObjectType::L2mcGroup
            } else {
                ObjectType::Port
            }
        }

        fn udf_fields(&self, _group: Oid) -> SaiResult<Vec<FieldId>> {
            Ok(vec![
                FieldId::bytes(HeaderId::L3, 9, 2),
                FieldId::bytes(HeaderId::L4, 0, 2),
            ])
        }
    }

    const LOCATION: TableLocation = TableLocation {
        group: 10,
        bank: 3,
        member: 11,
    };

    #[test]
    fn test_field_order_and_priority() {
        let attrs = AclEntryAttrs {
            priority: Some(10),
            field_ip_protocol: Some(AclField::exact(vec![6])),
            field_dst_ip: Some(AclField::new(vec![10, 0, 0, 0], vec![255, 0, 0, 0])),
            field_in_port: Some(7),
            ..Default::default()
        };
        let compiled = compile_entry(&attrs, LOCATION, &FakeResolver).unwrap();
        let EntryKey::Flow {
            priority,
            bank,
            fields,
        } = compiled.key
        else {
            panic!("expected flow key");
        };
        assert_eq!(priority, u32::MAX - 10);
        assert_eq!(bank, 3);
        assert_eq!(
            fields,
            vec![
                MatchField::masked(PacketField::IpAddrDst, vec![10, 0, 0, 0], vec![255, 0, 0, 0]),
                MatchField::exact(PacketField::PacketPortInput, 107u64.to_be_bytes().to_vec()),
                MatchField::exact(PacketField::IpProto, vec![6]),
            ]
        );
    }

    #[test]
    fn test_empty_match_rejected() {
        let attrs = AclEntryAttrs {
            action_packet_action: Some(PacketAction::Drop),
            ..Default::default()
        };
        let err = compile_entry(&attrs, LOCATION, &FakeResolver).unwrap_err();
        assert_eq!(err.code(), Code::InvalidArgument);
    }

    #[test]
    fn test_ip_type() {
        assert_eq!(ip_type_field(AclIpType::Any).unwrap(), None);
        assert_eq!(
            ip_type_field(AclIpType::ArpReply).unwrap(),
            Some(MatchField::exact(PacketField::EthernetType, vec![0x08, 0x06]))
        );
        assert_eq!(
            ip_type_field(AclIpType::NonIpv4).unwrap_err().code(),
            Code::InvalidArgument
        );
    }

    #[test]
    fn test_dscp_shifted_into_tos() {
        let field = dscp_field(&AclField::new(vec![46], vec![0x3f]));
        assert_eq!(field.bytes, vec![46 << 2]);
        assert_eq!(field.masks, vec![0xfc]);
    }

    #[test]
    fn test_udf_expands_per_udf() {
        let attrs = AclEntryAttrs {
            user_defined_field_group: Some(vec![saisim_attrs::UdfField {
                group: 40,
                data: vec![1, 2],
                mask: vec![0xff, 0xff],
            }]),
            ..Default::default()
        };
        let fields = compile_fields(&attrs, &FakeResolver).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].field, FieldId::bytes(HeaderId::L4, 0, 2));
    }

    #[test]
    fn test_actions() {
        let attrs = AclEntryAttrs {
            action_set_vrf: Some(5),
            action_redirect: Some(50),
            action_packet_action: Some(PacketAction::Trap),
            ..Default::default()
        };
        assert_eq!(
            compile_actions(&attrs, &FakeResolver).unwrap(),
            vec![
                Action::set(PacketField::PacketVrf, oid_bytes(5)),
                Action::set(PacketField::PacketL2mcGroupId, oid_bytes(50)),
                Action::Transmit {
                    port: "0x2".to_string(),
                    immediate: true,
                },
            ]
        );

        let bad = AclEntryAttrs {
            action_redirect: Some(7),
            ..Default::default()
        };
        assert_eq!(
            compile_actions(&bad, &FakeResolver).unwrap_err().code(),
            Code::InvalidArgument
        );
    }
}
