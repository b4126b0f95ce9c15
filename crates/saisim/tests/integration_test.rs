//! End-to-end tests driving the RPC surface against the in-memory engine.

use pretty_assertions::assert_eq;
use saisim::acl::{
    AclCounterAttrs, AclEntryAttrs, AclStage, AclTableAttrs, AclTableGroupAttrs, AclTableGroupMemberAttrs,
    AclTableGroupType,
};
use saisim::common::{engine_id, PacketAction};
use saisim::hostif::{HostifAttrs, HostifTrapAttrs, HostifTrapType, HostifType};
use saisim::l2::{BridgePortAttrs, BridgePortType, VlanAttrs, VlanMemberAttrs, VlanTaggingMode};
use saisim::nhg::{
    group_key, NextHopAttrs, NextHopGroupAttrs, NextHopGroupMemberAttrs, NextHopGroupType,
    NextHopType,
};
use saisim::ports::{
    LagAttrs, LagMemberAttrs, PortAttrs, PortOperStatus, QueueAttrs, StaticDevices,
};
use saisim::route::{RouteEntryAttrs, RouteEntryKey, RouterInterfaceAttrs, RouterInterfaceType};
use saisim::switch::SwitchAttrs;
use saisim::tables;
use saisim::{SaiServer, SaisimConfig};
use saisim_attrs::{AclField, GetEntryRequest, GetRequest};
use saisim_fwd::{Action, EntryKey, ForwardingEngine, MemoryEngine, PortKind};
use saisim_types::{Code, IpPrefix, ObjectType, Oid, SaiResult};
use std::sync::Arc;

struct Harness {
    engine: Arc<MemoryEngine>,
    server: SaiServer,
    switch: Oid,
}

fn harness() -> Harness {
    let engine = Arc::new(MemoryEngine::new());
    let server = SaiServer::new(
        engine.clone(),
        SaisimConfig::default(),
        Arc::new(StaticDevices::all()),
    );
    let switch = server
        .create_switch(SwitchAttrs {
            init_switch: Some(true),
            ..Default::default()
        })
        .unwrap();
    Harness {
        engine,
        server,
        switch,
    }
}

impl Harness {
    fn port(&self, lane: u32) -> Oid {
        self.server
            .create_port(
                self.switch,
                PortAttrs {
                    hw_lane_list: Some(vec![lane]),
                    speed: Some(100_000),
                    admin_state: Some(true),
                    ..Default::default()
                },
            )
            .unwrap()
    }

    fn rif(&self, port: Oid) -> Oid {
        self.server
            .create_router_interface(
                self.switch,
                RouterInterfaceAttrs {
                    rif_type: Some(RouterInterfaceType::Port),
                    port_id: Some(port),
                    ..Default::default()
                },
            )
            .unwrap()
    }

    fn next_hop(&self, rif: Oid, ip: &str) -> Oid {
        self.server
            .create_next_hop(
                self.switch,
                NextHopAttrs {
                    next_hop_type: Some(NextHopType::Ip),
                    ip: Some(ip.parse().unwrap()),
                    router_interface_id: Some(rif),
                    ..Default::default()
                },
            )
            .unwrap()
    }

    fn acl_group(&self) -> SaiResult<Oid> {
        self.server.create_acl_table_group(
            self.switch,
            AclTableGroupAttrs {
                acl_stage: Some(AclStage::Ingress),
                group_type: Some(AclTableGroupType::Parallel),
                ..Default::default()
            },
        )
    }

    fn acl_table(&self) -> Oid {
        self.server
            .create_acl_table(
                self.switch,
                AclTableAttrs {
                    acl_stage: Some(AclStage::Ingress),
                    ..Default::default()
                },
            )
            .unwrap()
    }

    fn acl_counter(&self, table: Oid) -> SaiResult<Oid> {
        self.server.create_acl_counter(
            self.switch,
            AclCounterAttrs {
                table_id: Some(table),
                ..Default::default()
            },
        )
    }

    fn switch_attr(&self, id: i32) -> SwitchAttrs {
        self.server
            .get_switch_attribute(GetRequest::new(self.switch, vec![id]))
            .unwrap()
            .attrs
    }

    fn default_vr(&self) -> Oid {
        self.switch_attr(SwitchAttrs::DEFAULT_VIRTUAL_ROUTER_ID)
            .default_virtual_router_id
            .unwrap()
    }

    fn cpu_port(&self) -> Oid {
        self.switch_attr(SwitchAttrs::CPU_PORT).cpu_port.unwrap()
    }

    fn route_key(&self, prefix: &str) -> RouteEntryKey {
        RouteEntryKey {
            switch_id: self.switch,
            vr_id: self.default_vr(),
            destination: prefix.parse::<IpPrefix>().unwrap(),
        }
    }

    fn entries(&self, table: &str) -> usize {
        self.engine.entries(table).len()
    }
}

#[test]
fn test_object_ids_increase_monotonically() {
    let h = harness();
    let a = h.port(1);
    let b = h.port(2);
    let lag = h.server.create_lag(h.switch, LagAttrs::default()).unwrap();
    assert!(h.switch < a);
    assert!(a < b);
    assert!(b < lag);
    assert_eq!(h.server.object_type_query(lag), ObjectType::Lag);
}

#[test]
fn test_port_queues_follow_port_oid() {
    let h = harness();
    let port = h.port(1);
    let attrs = h
        .server
        .get_port_attribute(GetRequest::new(
            port,
            vec![PortAttrs::QOS_NUMBER_OF_QUEUES, PortAttrs::QOS_QUEUE_LIST],
        ))
        .unwrap()
        .attrs;
    let expected: Vec<Oid> = (port + 1..=port + 12).collect();
    assert_eq!(attrs.qos_number_of_queues, Some(12));
    assert_eq!(attrs.qos_queue_list, Some(expected));

    let queue = h
        .server
        .get_queue_attribute(GetRequest::new(port + 3, vec![QueueAttrs::PORT, QueueAttrs::INDEX]))
        .unwrap()
        .attrs;
    assert_eq!(queue.port, Some(port));
    assert_eq!(queue.index, Some(2));

    let ports = h.switch_attr(SwitchAttrs::PORT_LIST).port_list.unwrap();
    assert_eq!(ports, vec![port]);
}

#[test]
fn test_attributes_round_trip_and_missing_ids() {
    let h = harness();
    let port = h.port(1);
    h.server
        .set_port_attribute(
            port,
            PortAttrs {
                mtu: Some(9100),
                ..Default::default()
            },
        )
        .unwrap();
    let attrs = h
        .server
        .get_port_attribute(GetRequest::new(port, vec![PortAttrs::MTU, PortAttrs::SPEED]))
        .unwrap()
        .attrs;
    assert_eq!(attrs.mtu, Some(9100));
    assert_eq!(attrs.speed, Some(100_000));

    let err = h
        .server
        .get_port_attribute(GetRequest::new(port, vec![PortAttrs::FEC_MODE]))
        .unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
}

#[test]
fn test_empty_list_differs_from_unset() {
    let h = harness();
    let lag = h.server.create_lag(h.switch, LagAttrs::default()).unwrap();
    let attrs = h
        .server
        .get_lag_attribute(GetRequest::new(lag, vec![LagAttrs::PORT_LIST]))
        .unwrap()
        .attrs;
    assert_eq!(attrs.port_list, Some(vec![]));

    let err = h
        .server
        .get_lag_attribute(GetRequest::new(lag, vec![LagAttrs::INGRESS_ACL]))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_calls_on_wrong_object_type_fail() {
    let h = harness();
    let lag = h.server.create_lag(h.switch, LagAttrs::default()).unwrap();
    let err = h.server.remove_port(lag).unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);
    let err = h
        .server
        .get_port_attribute(GetRequest::new(0xdead, vec![PortAttrs::MTU]))
        .unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);
}

#[test]
fn test_second_cold_switch_is_refused() {
    let h = harness();
    let err = h.server.create_switch(SwitchAttrs::default()).unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);
}

#[test]
fn test_warm_restart_keeps_switch_and_objects() {
    let h = harness();
    let port = h.port(1);
    h.server
        .set_switch_attribute(
            h.switch,
            SwitchAttrs {
                restart_warm: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    h.server.remove_switch(h.switch).unwrap();
    assert_eq!(h.server.object_type_query(h.switch), ObjectType::Switch);
    assert_eq!(h.server.object_type_query(port), ObjectType::Port);

    let recovered = h.server.create_switch(SwitchAttrs::default()).unwrap();
    assert_eq!(recovered, h.switch);
    assert_eq!(h.server.switch_orch().stats().warm_recoveries, 1);
    let warm = h.switch_attr(SwitchAttrs::RESTART_WARM).restart_warm;
    assert_eq!(warm, Some(false));
}

#[test]
fn test_cold_removal_forgets_everything() {
    let h = harness();
    let port = h.port(1);
    let group = h.acl_group().unwrap();
    let table = h.acl_table();
    let counter = h.acl_counter(table).unwrap();
    h.server.remove_switch(h.switch).unwrap();
    assert_eq!(h.server.object_type_query(h.switch), ObjectType::Null);
    assert_eq!(h.server.object_type_query(port), ObjectType::Null);
    assert!(h.engine.table(tables::FIB_V4).is_none());
    assert!(h.engine.port(&engine_id(port)).is_none());
    assert!(h.engine.table(&engine_id(group)).is_none());

    let switch = h
        .server
        .create_switch(SwitchAttrs {
            init_switch: Some(true),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(switch, h.switch);
    assert_eq!(h.server.object_type_query(switch), ObjectType::Switch);
    assert!(h.engine.table(tables::FIB_V4).is_some());

    // The id counter restarted, so the same ids come back.
    assert_eq!(h.port(1), port);
    assert_eq!(h.acl_group().unwrap(), group);
    let table = h.acl_table();
    assert_eq!(h.acl_counter(table).unwrap(), counter);
}

#[test]
fn test_acl_tables_get_consecutive_banks() {
    let h = harness();
    let group = h
        .server
        .create_acl_table_group(
            h.switch,
            AclTableGroupAttrs {
                acl_stage: Some(AclStage::Ingress),
                group_type: Some(AclTableGroupType::Parallel),
                ..Default::default()
            },
        )
        .unwrap();

    let mut tables_in_group = Vec::new();
    for _ in 0..3 {
        let table = h
            .server
            .create_acl_table(
                h.switch,
                AclTableAttrs {
                    acl_stage: Some(AclStage::Ingress),
                    ..Default::default()
                },
            )
            .unwrap();
        h.server
            .create_acl_table_group_member(
                h.switch,
                AclTableGroupMemberAttrs {
                    acl_table_group_id: Some(group),
                    acl_table_id: Some(table),
                    ..Default::default()
                },
            )
            .unwrap();
        tables_in_group.push(table);
    }
    let banks: Vec<u32> = tables_in_group
        .iter()
        .map(|t| h.server.acl_orch().location(*t).unwrap().bank)
        .collect();
    assert_eq!(banks, vec![0, 1, 2]);

    let entry = h
        .server
        .create_acl_entry(
            h.switch,
            AclEntryAttrs {
                table_id: Some(tables_in_group[1]),
                priority: Some(10),
                field_dst_ip: Some(AclField::new(vec![10, 0, 0, 1], vec![0xff; 4])),
                action_packet_action: Some(PacketAction::Drop),
                ..Default::default()
            },
        )
        .unwrap();
    let installed = h.engine.entries(&engine_id(group));
    assert_eq!(installed.len(), 1);
    match &installed[0].key {
        EntryKey::Flow { priority, bank, .. } => {
            assert_eq!(*bank, 1);
            assert_eq!(*priority, u32::MAX - 10);
        }
        other => panic!("unexpected key {:?}", other),
    }

    let err = h.server.remove_acl_table_group(group).unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);

    h.server.remove_acl_entry(entry).unwrap();
    assert!(h.engine.entries(&engine_id(group)).is_empty());
    assert_eq!(h.server.acl_orch().stats().entries_removed, 1);
}

#[test]
fn test_acl_entry_needs_grouped_table() {
    let h = harness();
    let table = h
        .server
        .create_acl_table(
            h.switch,
            AclTableAttrs {
                acl_stage: Some(AclStage::Ingress),
                ..Default::default()
            },
        )
        .unwrap();
    let err = h
        .server
        .create_acl_entry(
            h.switch,
            AclEntryAttrs {
                table_id: Some(table),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);

    let err = h
        .server
        .create_acl_table_group(
            h.switch,
            AclTableGroupAttrs {
                acl_stage: Some(AclStage::Ingress),
                group_type: Some(AclTableGroupType::Sequential),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), Code::InvalidArgument);
}

#[test]
fn test_acl_member_with_entries_stays_until_entries_go() {
    let h = harness();
    let port = h.port(1);
    let group = h.acl_group().unwrap();
    let table = h.acl_table();
    let member = h
        .server
        .create_acl_table_group_member(
            h.switch,
            AclTableGroupMemberAttrs {
                acl_table_group_id: Some(group),
                acl_table_id: Some(table),
                ..Default::default()
            },
        )
        .unwrap();
    let entry = h
        .server
        .create_acl_entry(
            h.switch,
            AclEntryAttrs {
                table_id: Some(table),
                priority: Some(5),
                field_in_port: Some(port),
                action_packet_action: Some(PacketAction::Drop),
                ..Default::default()
            },
        )
        .unwrap();

    let err = h.server.remove_acl_table_group_member(member).unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);
    assert!(h.server.acl_orch().location(table).is_some());

    // The entry stays removable after the port it matched on is gone.
    h.server.remove_port(port).unwrap();
    h.server.remove_acl_entry(entry).unwrap();
    assert!(h.engine.entries(&engine_id(group)).is_empty());

    h.server.remove_acl_table_group_member(member).unwrap();
    assert!(h.server.acl_orch().location(table).is_none());
    h.server.remove_acl_table_group(group).unwrap();
}

fn select_weights(actions: &[Action]) -> Vec<u32> {
    match actions.first() {
        Some(Action::Select { lists, .. }) => lists.iter().map(|l| l.weight).collect(),
        other => panic!("expected select, got {:?}", other),
    }
}

#[test]
fn test_group_membership_rewrites_whole_entry() {
    let h = harness();
    let rif = h.rif(h.port(1));
    let nh1 = h.next_hop(rif, "10.0.0.1");
    let nh2 = h.next_hop(rif, "10.0.0.2");
    let group = h
        .server
        .create_next_hop_group(
            h.switch,
            NextHopGroupAttrs {
                group_type: Some(NextHopGroupType::DynamicUnorderedEcmp),
                ..Default::default()
            },
        )
        .unwrap();
    let member = |nh: Oid, weight: u32| {
        h.server
            .create_next_hop_group_member(
                h.switch,
                NextHopGroupMemberAttrs {
                    next_hop_group_id: Some(group),
                    next_hop_id: Some(nh),
                    weight: Some(weight),
                    ..Default::default()
                },
            )
            .unwrap()
    };
    let m1 = member(nh1, 3);
    let m2 = member(nh2, 6);

    let group_entry = || {
        h.engine
            .entries(tables::NEXT_HOP_GROUP)
            .into_iter()
            .find(|e| e.key == group_key(group))
    };
    let entry = group_entry().unwrap();
    assert_eq!(select_weights(&entry.actions), vec![3, 6]);
    assert_eq!(entry.actions[1], Action::lookup(tables::NEXT_HOP));

    let err = h.server.remove_next_hop(nh1).unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);

    h.server
        .set_next_hop_group_member_attribute(
            m2,
            NextHopGroupMemberAttrs {
                weight: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(select_weights(&group_entry().unwrap().actions), vec![3, 1]);

    let err = h.server.remove_next_hop_group(group).unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);

    h.server.remove_next_hop_group_member(m1).unwrap();
    assert_eq!(select_weights(&group_entry().unwrap().actions), vec![1]);
    let count = h
        .server
        .get_next_hop_group_attribute(GetRequest::new(group, vec![NextHopGroupAttrs::NEXT_HOP_COUNT]))
        .unwrap()
        .attrs
        .next_hop_count;
    assert_eq!(count, Some(1));

    h.server.remove_next_hop_group_member(m2).unwrap();
    assert!(group_entry().is_none());
    h.server.remove_next_hop_group(group).unwrap();
    h.server.remove_next_hop(nh1).unwrap();
}

#[test]
fn test_routes_dispatch_on_next_hop_type() {
    let h = harness();
    let rif = h.rif(h.port(1));
    let nh = h.next_hop(rif, "10.0.0.1");
    let fib_before = h.entries(tables::FIB_V4);

    let key = h.route_key("192.168.0.0/16");
    h.server
        .create_route_entry(
            key,
            RouteEntryAttrs {
                next_hop_id: Some(nh),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(h.entries(tables::FIB_V4), fib_before + 1);
    let installed = h.engine.entries(tables::FIB_V4);
    let last = installed.last().unwrap();
    assert_eq!(last.actions.last(), Some(&Action::lookup(tables::NEXT_HOP)));

    let stored = h
        .server
        .get_route_entry_attribute(GetEntryRequest {
            entry: key,
            attr_ids: vec![RouteEntryAttrs::NEXT_HOP_ID],
        })
        .unwrap()
        .attrs;
    assert_eq!(stored.next_hop_id, Some(nh));

    h.server
        .set_route_entry_attribute(
            key,
            RouteEntryAttrs {
                packet_action: Some(PacketAction::Drop),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(h.entries(tables::FIB_V4), fib_before + 1);
    assert_eq!(
        h.engine.entries(tables::FIB_V4).last().unwrap().actions,
        vec![Action::Drop]
    );

    h.server.remove_route_entry(key).unwrap();
    assert_eq!(h.entries(tables::FIB_V4), fib_before);
    let err = h.server.remove_route_entry(key).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_cpu_route_lands_in_trap_table() {
    let h = harness();
    let cpu = h.cpu_port();
    let fib_before = h.entries(tables::FIB_V4);
    let trap_before = h.entries(tables::TRAP);

    let key = h.route_key("10.1.1.1/32");
    h.server
        .create_route_entry(
            key,
            RouteEntryAttrs {
                next_hop_id: Some(cpu),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(h.entries(tables::FIB_V4), fib_before);
    assert_eq!(h.entries(tables::TRAP), trap_before + 1);

    let entry = h.engine.entries(tables::TRAP).pop().unwrap();
    match entry.key {
        EntryKey::Flow { priority, bank, .. } => {
            assert_eq!(priority, u32::MAX - 32);
            assert_eq!(bank, 0);
        }
        other => panic!("unexpected key {:?}", other),
    }
    assert_eq!(
        entry.actions,
        vec![Action::Transmit {
            port: engine_id(cpu),
            immediate: true
        }]
    );

    h.server.remove_route_entry(key).unwrap();
    assert_eq!(h.entries(tables::TRAP), trap_before);
}

#[test]
fn test_route_removal_survives_removed_next_hop() {
    let h = harness();
    let rif = h.rif(h.port(1));
    let nh = h.next_hop(rif, "10.0.0.1");
    let fib_before = h.entries(tables::FIB_V4);

    let key = h.route_key("192.168.0.0/16");
    h.server
        .create_route_entry(
            key,
            RouteEntryAttrs {
                next_hop_id: Some(nh),
                ..Default::default()
            },
        )
        .unwrap();
    h.server.remove_next_hop(nh).unwrap();
    assert_eq!(h.entries(tables::FIB_V4), fib_before + 1);

    h.server.remove_route_entry(key).unwrap();
    assert_eq!(h.entries(tables::FIB_V4), fib_before);
    assert!(h.server.remove_route_entry(key).unwrap_err().is_not_found());
}

#[test]
fn test_bulk_routes_report_each_element() {
    let h = harness();
    let rif = h.rif(h.port(1));
    let nh = h.next_hop(rif, "10.0.0.1");
    let results = h.server.create_route_entries(vec![
        (
            h.route_key("172.16.0.0/12"),
            RouteEntryAttrs {
                next_hop_id: Some(nh),
                ..Default::default()
            },
        ),
        (h.route_key("172.32.0.0/12"), RouteEntryAttrs::default()),
        (
            h.route_key("2001:db8::/32"),
            RouteEntryAttrs {
                next_hop_id: Some(nh),
                ..Default::default()
            },
        ),
    ]);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1].as_ref().unwrap_err().code(),
        Code::InvalidArgument
    );
    assert!(results[2].is_ok());

    let removed = h
        .server
        .remove_route_entries(vec![h.route_key("172.16.0.0/12"), h.route_key("172.32.0.0/12")]);
    assert!(removed[0].is_ok());
    assert!(removed[1].as_ref().unwrap_err().is_not_found());
}

#[test]
fn test_port_rif_programs_four_entries() {
    let h = harness();
    let port = h.port(1);
    let watched = [
        tables::INPUT_IFACE,
        tables::OUTPUT_IFACE,
        tables::INGRESS_VRF,
        tables::PORT_MAC,
    ];
    let before: Vec<usize> = watched.iter().map(|t| h.entries(t)).collect();
    let rif = h.rif(port);
    let after: Vec<usize> = watched.iter().map(|t| h.entries(t)).collect();
    let added: Vec<usize> = after.iter().zip(&before).map(|(a, b)| a - b).collect();
    assert_eq!(added, vec![1, 1, 1, 1]);

    let vr = h
        .server
        .get_router_interface_attribute(GetRequest::new(
            rif,
            vec![RouterInterfaceAttrs::VIRTUAL_ROUTER_ID],
        ))
        .unwrap()
        .attrs
        .virtual_router_id;
    assert_eq!(vr, Some(h.default_vr()));

    h.server.remove_router_interface(rif).unwrap();
    let after: Vec<usize> = watched.iter().map(|t| h.entries(t)).collect();
    assert_eq!(after, before);
}

#[test]
fn test_hostif_and_trap() {
    let h = harness();
    let port = h.port(1);
    let hostif = h
        .server
        .create_hostif(
            h.switch,
            HostifAttrs {
                hostif_type: Some(HostifType::Netdev),
                name: Some("Ethernet0".to_string()),
                obj_id: Some(port),
                ..Default::default()
            },
        )
        .unwrap();
    let record = h.engine.port(&engine_id(hostif)).unwrap();
    assert_eq!(
        record.desc.kind,
        PortKind::Tap {
            device: "Ethernet0".to_string()
        }
    );
    assert_eq!(h.entries(tables::HOSTIF_TO_PORT), 1);
    assert_eq!(h.entries(tables::PORT_TO_HOSTIF), 1);

    let trap_before = h.entries(tables::TRAP);
    let trap = h
        .server
        .create_hostif_trap(
            h.switch,
            HostifTrapAttrs {
                trap_type: Some(HostifTrapType::Lldp as i32),
                packet_action: Some(PacketAction::Trap),
                trap_priority: Some(5),
                ..Default::default()
            },
        )
        .unwrap();
    let entry = h.engine.entries(tables::TRAP).pop().unwrap();
    assert!(matches!(entry.key, EntryKey::Flow { priority: 5, .. }));
    assert_eq!(
        entry.actions.last(),
        Some(&Action::Transmit {
            port: engine_id(h.cpu_port()),
            immediate: true
        })
    );

    h.server.remove_hostif_trap(trap).unwrap();
    assert_eq!(h.entries(tables::TRAP), trap_before);
    h.server.remove_hostif(hostif).unwrap();
    assert!(h.engine.port(&engine_id(hostif)).is_none());
    assert_eq!(h.entries(tables::HOSTIF_TO_PORT), 0);
}

#[test]
fn test_lag_membership() {
    let h = harness();
    let port = h.port(1);
    let lag = h.server.create_lag(h.switch, LagAttrs::default()).unwrap();
    let member = h
        .server
        .create_lag_member(
            h.switch,
            LagMemberAttrs {
                lag_id: Some(lag),
                port_id: Some(port),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(
        h.engine.port(&engine_id(lag)).unwrap().members,
        vec![engine_id(port)]
    );
    assert_eq!(h.server.lag_orch().ports(lag), Some(vec![port]));

    let err = h.server.remove_lag(lag).unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);

    h.server.remove_lag_member(member).unwrap();
    assert!(h.engine.port(&engine_id(lag)).unwrap().members.is_empty());
    h.server.remove_lag(lag).unwrap();
    assert!(h.engine.port(&engine_id(lag)).is_none());
}

#[test]
fn test_vlan_member_programs_vlan_table() {
    let h = harness();
    let port = h.port(1);
    let vlan = h
        .server
        .create_vlan(
            h.switch,
            VlanAttrs {
                vlan_id: Some(100),
                ..Default::default()
            },
        )
        .unwrap();
    let bridge_port = h
        .server
        .create_bridge_port(
            h.switch,
            BridgePortAttrs {
                bridge_port_type: Some(BridgePortType::Port),
                port_id: Some(port),
                ..Default::default()
            },
        )
        .unwrap();
    let before = h.entries(tables::VLAN);
    let member = h
        .server
        .create_vlan_member(
            h.switch,
            VlanMemberAttrs {
                vlan_id: Some(vlan),
                bridge_port_id: Some(bridge_port),
                vlan_tagging_mode: Some(VlanTaggingMode::Tagged),
            },
        )
        .unwrap();
    assert_eq!(h.entries(tables::VLAN), before + 1);
    let members = h
        .server
        .get_vlan_attribute(GetRequest::new(vlan, vec![VlanAttrs::MEMBER_LIST]))
        .unwrap()
        .attrs
        .member_list;
    assert_eq!(members, Some(vec![member]));

    let err = h.server.remove_vlan(vlan).unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);

    h.server.remove_vlan_member(member).unwrap();
    assert_eq!(h.entries(tables::VLAN), before);
    h.server.remove_vlan(vlan).unwrap();

    let err = h
        .server
        .create_vlan(
            h.switch,
            VlanAttrs {
                vlan_id: Some(1),
                ..Default::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);
}

#[tokio::test]
async fn test_link_events_update_oper_status() {
    let h = harness();
    let port = h.port(1);
    let mut events = h.engine.notify_subscribe().unwrap();

    h.engine.set_link_state(&engine_id(port), false).unwrap();
    let event = events.recv().await.unwrap();
    h.server.handle_event(&event);

    let status = h
        .server
        .get_port_attribute(GetRequest::new(port, vec![PortAttrs::OPER_STATUS]))
        .unwrap()
        .attrs
        .oper_status;
    assert_eq!(status, Some(PortOperStatus::Down));

    h.engine.set_link_state(&engine_id(port), true).unwrap();
    let event = events.recv().await.unwrap();
    h.server.handle_event(&event);
    let stored: PortOperStatus = h
        .server
        .context()
        .store
        .get(&saisim_attrs::ObjectKey::Oid(port), PortAttrs::OPER_STATUS)
        .unwrap();
    assert_eq!(stored, PortOperStatus::Up);
}
