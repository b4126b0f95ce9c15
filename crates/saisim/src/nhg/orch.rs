//! Next hops and weighted ECMP groups.

use super::types::{
    NextHopAttrs, NextHopGroupAttrs, NextHopGroupMemberAttrs, NextHopGroupType, NextHopType,
};
use crate::common::oid_bytes;
use crate::context::OrchContext;
use crate::tables;
use log::{debug, info};
use saisim_attrs::{CreateRequest, CreateResponse, ObjectKey, SetRequest};
use saisim_fwd::{
    Action, EntryKey, FieldId, HashAlgorithm, HeaderId, MatchField, PacketField, WeightedActions,
};
use saisim_types::{ip_octets, ObjectType, Oid, SaiError, SaiResult};
use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Fields hashed to pick a group member.
const ECMP_HASH_FIELDS: [PacketField; 5] = [
    PacketField::IpProto,
    PacketField::IpAddrSrc,
    PacketField::IpAddrDst,
    PacketField::L4PortSrc,
    PacketField::L4PortDst,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMember {
    pub next_hop: Oid,
    pub weight: u32,
}

/// Members keyed by member OID so the programmed order is stable.
type Members = BTreeMap<Oid, GroupMember>;

pub struct NextHopOrch {
    ctx: OrchContext,
    groups: Mutex<HashMap<Oid, Members>>,
}

pub fn next_hop_key(oid: Oid) -> EntryKey {
    EntryKey::Exact(vec![MatchField::exact(PacketField::PacketNextHopId, oid_bytes(oid))])
}

pub fn group_key(oid: Oid) -> EntryKey {
    EntryKey::Exact(vec![MatchField::exact(
        PacketField::PacketNextHopGroupId,
        oid_bytes(oid),
    )])
}

/// The complete group action for the current membership.
pub fn group_actions(members: &Members) -> Vec<Action> {
    let lists = members
        .values()
        .map(|m| WeightedActions {
            weight: m.weight,
            actions: vec![Action::set(PacketField::PacketNextHopId, oid_bytes(m.next_hop))],
        })
        .collect();
    vec![
        Action::Select {
            algorithm: HashAlgorithm::Crc32,
            hash_fields: ECMP_HASH_FIELDS.iter().copied().map(FieldId::packet).collect(),
            lists,
        },
        Action::lookup(tables::NEXT_HOP),
    ]
}

fn encap_header(ip: &IpAddr) -> HeaderId {
    match ip {
        IpAddr::V4(_) => HeaderId::Ipv4,
        IpAddr::V6(_) => HeaderId::Ipv6,
    }
}

impl NextHopOrch {
    pub fn new(ctx: OrchContext) -> Self {
        Self {
            ctx,
            groups: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Oid, Members>> {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Current members of a group, if the group exists.
    pub fn members(&self, group: Oid) -> Option<Vec<GroupMember>> {
        self.lock().get(&group).map(|m| m.values().copied().collect())
    }

    fn next_hop_actions(attrs: &NextHopAttrs) -> SaiResult<Vec<Action>> {
        let ip = attrs
            .ip
            .ok_or_else(|| SaiError::invalid_argument("next hop IP is mandatory"))?;
        match attrs.next_hop_type {
            Some(NextHopType::Ip) => {
                let rif = attrs.router_interface_id.ok_or_else(|| {
                    SaiError::invalid_argument("ROUTER_INTERFACE_ID is mandatory")
                })?;
                Ok(vec![
                    Action::set(PacketField::PacketOutputIface, oid_bytes(rif)),
                    Action::set(PacketField::PacketNextHopIp, ip_octets(&ip)),
                    Action::lookup(tables::NEXT_HOP_ACTION),
                ])
            }
            Some(NextHopType::TunnelEncap) => {
                let tunnel = attrs
                    .tunnel_id
                    .ok_or_else(|| SaiError::invalid_argument("TUNNEL_ID is mandatory"))?;
                Ok(vec![
                    Action::set(PacketField::PacketNextHopIp, ip_octets(&ip)),
                    Action::set(PacketField::PacketTunnelId, oid_bytes(tunnel)),
                    Action::Encap {
                        header: encap_header(&ip),
                    },
                    Action::lookup(tables::TUNNEL_ENCAP),
                ])
            }
            other => Err(SaiError::invalid_argument(format!(
                "unsupported next hop type {:?}",
                other
            ))),
        }
    }

    pub fn create_next_hop(&self, req: &CreateRequest<NextHopAttrs>) -> SaiResult<CreateResponse> {
        let actions = Self::next_hop_actions(&req.attrs)?;
        let oid = self.ctx.store.next_id();
        self.ctx.add_entry(tables::NEXT_HOP, next_hop_key(oid), actions)?;
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_next_hop(&self, oid: Oid) -> SaiResult<()> {
        self.ctx.require_type(oid, ObjectType::NextHop)?;
        let in_use = self
            .lock()
            .values()
            .any(|members| members.values().any(|m| m.next_hop == oid));
        if in_use {
            return Err(SaiError::failed_precondition(format!(
                "next hop {:#x} is still a group member",
                oid
            )));
        }
        self.ctx.remove_entry(tables::NEXT_HOP, next_hop_key(oid))
    }

    pub fn create_group(
        &self,
        req: &CreateRequest<NextHopGroupAttrs>,
    ) -> SaiResult<CreateResponse> {
        if req.attrs.group_type != Some(NextHopGroupType::DynamicUnorderedEcmp) {
            return Err(SaiError::invalid_argument(format!(
                "unsupported next hop group type {:?}",
                req.attrs.group_type
            )));
        }
        let oid = self.ctx.store.next_id();
        let members = Members::new();
        self.store_membership(oid, &members);
        self.lock().insert(oid, members);
        Ok(CreateResponse::new(oid))
    }

    pub fn remove_group(&self, oid: Oid) -> SaiResult<()> {
        let mut groups = self.lock();
        let members = groups.get(&oid).ok_or_else(|| {
            SaiError::failed_precondition(format!("next hop group {:#x} not found", oid))
        })?;
        if !members.is_empty() {
            return Err(SaiError::failed_precondition(format!(
                "next hop group {:#x} still has {} members",
                oid,
                members.len()
            )));
        }
        groups.remove(&oid);
        Ok(())
    }

    fn store_membership(&self, group: Oid, members: &Members) {
        let key = ObjectKey::Oid(group);
        self.ctx.store.store_attribute(
            &key,
            NextHopGroupAttrs::NEXT_HOP_COUNT,
            u32::try_from(members.len()).unwrap_or(u32::MAX),
        );
        self.ctx.store.store_attribute(
            &key,
            NextHopGroupAttrs::NEXT_HOP_MEMBER_LIST,
            members.keys().copied().collect::<Vec<u64>>(),
        );
    }

    /// Applies `mutate` to the group's members and reprograms the group
    /// from the full resulting set.
    fn mutate_group(
        &self,
        group: Oid,
        mutate: impl FnOnce(&mut Members) -> SaiResult<()>,
    ) -> SaiResult<()> {
        let mut groups = self.lock();
        let members = groups.get_mut(&group).ok_or_else(|| {
            SaiError::failed_precondition(format!("next hop group {:#x} not found", group))
        })?;
        let was_programmed = !members.is_empty();
        mutate(members)?;

        if members.is_empty() {
            if was_programmed {
                self.ctx.remove_entry(tables::NEXT_HOP_GROUP, group_key(group))?;
            }
        } else {
            self.ctx
                .add_entry(tables::NEXT_HOP_GROUP, group_key(group), group_actions(members))?;
        }
        self.store_membership(group, members);
        debug!("next hop group {:#x} now has {} members", group, members.len());
        Ok(())
    }

    pub fn create_member(
        &self,
        req: &CreateRequest<NextHopGroupMemberAttrs>,
    ) -> SaiResult<CreateResponse> {
        let group = req
            .attrs
            .next_hop_group_id
            .ok_or_else(|| SaiError::invalid_argument("NEXT_HOP_GROUP_ID is mandatory"))?;
        let next_hop = req
            .attrs
            .next_hop_id
            .ok_or_else(|| SaiError::invalid_argument("NEXT_HOP_ID is mandatory"))?;
        self.ctx.require_type(next_hop, ObjectType::NextHop)?;
        let member = GroupMember {
            next_hop,
            weight: req.attrs.weight.unwrap_or(1),
        };

        let mut oid = 0;
        self.mutate_group(group, |members| {
            oid = self.ctx.store.next_id();
            members.insert(oid, member);
            Ok(())
        })?;
        info!(
            "next hop {:#x} joined group {:#x} with weight {}",
            next_hop, group, member.weight
        );
        Ok(CreateResponse::new(oid))
    }

    /// Owning group of a member; no reverse index is kept.
    fn find_group(&self, member: Oid) -> SaiResult<Oid> {
        self.lock()
            .iter()
            .find(|(_, members)| members.contains_key(&member))
            .map(|(group, _)| *group)
            .ok_or_else(|| {
                SaiError::failed_precondition(format!(
                    "next hop group member {:#x} not found",
                    member
                ))
            })
    }

    pub fn remove_member(&self, oid: Oid) -> SaiResult<()> {
        let group = self.find_group(oid)?;
        self.mutate_group(group, |members| {
            members.remove(&oid);
            Ok(())
        })
    }

    /// Only WEIGHT changes the programmed group.
    pub fn set_member(&self, req: &SetRequest<NextHopGroupMemberAttrs>) -> SaiResult<()> {
        let Some(weight) = req.attrs.weight else {
            return Ok(());
        };
        let group = self.find_group(req.oid)?;
        self.mutate_group(group, |members| {
            let member = members.get_mut(&req.oid).ok_or_else(|| {
                SaiError::failed_precondition(format!(
                    "next hop group member {:#x} not found",
                    req.oid
                ))
            })?;
            member.weight = weight;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_group_actions_one_branch_per_member() {
        let mut members = Members::new();
        members.insert(
            20,
            GroupMember {
                next_hop: 5,
                weight: 6,
            },
        );
        members.insert(
            10,
            GroupMember {
                next_hop: 4,
                weight: 3,
            },
        );
        let actions = group_actions(&members);
        assert_eq!(actions.len(), 2);
        let Action::Select {
            algorithm, lists, ..
        } = &actions[0]
        else {
            panic!("expected select action");
        };
        assert_eq!(*algorithm, HashAlgorithm::Crc32);
        let weights: Vec<u32> = lists.iter().map(|l| l.weight).collect();
        assert_eq!(weights, vec![3, 6]);
        assert_eq!(
            lists[0].actions,
            vec![Action::set(PacketField::PacketNextHopId, oid_bytes(4))]
        );
        assert_eq!(actions[1], Action::lookup(tables::NEXT_HOP));
    }

    #[test]
    fn test_next_hop_actions() {
        let attrs = NextHopAttrs {
            next_hop_type: Some(NextHopType::Mpls),
            ip: Some("10.0.0.1".parse().unwrap()),
            ..Default::default()
        };
        assert!(NextHopOrch::next_hop_actions(&attrs).is_err());

        let attrs = NextHopAttrs {
            next_hop_type: Some(NextHopType::TunnelEncap),
            ip: Some("2001:db8::1".parse().unwrap()),
            tunnel_id: Some(9),
            ..Default::default()
        };
        let actions = NextHopOrch::next_hop_actions(&attrs).unwrap();
        assert_eq!(
            actions[2],
            Action::Encap {
                header: HeaderId::Ipv6
            }
        );
        assert_eq!(actions[3], Action::lookup(tables::TUNNEL_ENCAP));
    }
}
