//! Objects that are stored and validated but never reach the engine.

use super::{from_store, SaiServer};
use crate::hostif::{HostifTrapGroupAttrs, HostifUserDefinedTrapAttrs};
use crate::l2::{BridgeAttrs, BridgePortAttrs, StpAttrs};
use crate::ports::{QueueAttrs, SchedulerGroupAttrs};
use crate::stubs::{
    BufferPoolAttrs, BufferProfileAttrs, IsolationGroupAttrs, IsolationGroupMemberAttrs,
    L2mcGroupAttrs, L2mcGroupMemberAttrs, MirrorSessionAttrs, PolicerAttrs, QosMapAttrs,
    SamplepacketAttrs, SchedulerAttrs, VirtualRouterAttrs, WredAttrs,
};
use crate::switch::HashAttrs;
use crate::tunnel::{TunnelMapAttrs, TunnelMapEntryAttrs};
use crate::udf::UdfMatchAttrs;
use saisim_attrs::{
    AttributeMessage, CreateRequest, CreateResponse, GetRequest, GetResponse, SetRequest,
};
use saisim_types::{Oid, SaiResult};

macro_rules! stub_objects {
    ($($name:literal => $attrs:ty {
        $create:ident, $set:ident, $get:ident, $remove:ident
    })*) => {
        impl SaiServer {
            $(
                pub fn $create(&self, switch: Oid, attrs: $attrs) -> SaiResult<Oid> {
                    self.create(
                        concat!("Create", $name),
                        CreateRequest::new(switch, attrs),
                        |_| Ok(CreateResponse::default()),
                    )
                }

                pub fn $set(&self, oid: Oid, attrs: $attrs) -> SaiResult<()> {
                    self.set(
                        concat!("Set", $name, "Attribute"),
                        SetRequest::new(oid, attrs),
                        |_| Ok(()),
                    )
                }

                pub fn $get(&self, req: GetRequest) -> SaiResult<GetResponse<$attrs>> {
                    self.get(concat!("Get", $name, "Attribute"), req, from_store)
                }

                pub fn $remove(&self, oid: Oid) -> SaiResult<()> {
                    self.remove(
                        concat!("Remove", $name),
                        oid,
                        <$attrs as AttributeMessage>::OBJECT_TYPE,
                        |_| Ok(()),
                    )
                }
            )*
        }
    };
}

stub_objects! {
    "VirtualRouter" => VirtualRouterAttrs {
        create_virtual_router, set_virtual_router_attribute,
        get_virtual_router_attribute, remove_virtual_router
    }
    "Policer" => PolicerAttrs {
        create_policer, set_policer_attribute, get_policer_attribute, remove_policer
    }
    "MirrorSession" => MirrorSessionAttrs {
        create_mirror_session, set_mirror_session_attribute,
        get_mirror_session_attribute, remove_mirror_session
    }
    "Scheduler" => SchedulerAttrs {
        create_scheduler, set_scheduler_attribute, get_scheduler_attribute, remove_scheduler
    }
    "SchedulerGroup" => SchedulerGroupAttrs {
        create_scheduler_group, set_scheduler_group_attribute,
        get_scheduler_group_attribute, remove_scheduler_group
    }
    "Queue" => QueueAttrs {
        create_queue, set_queue_attribute, get_queue_attribute, remove_queue
    }
    "Wred" => WredAttrs {
        create_wred, set_wred_attribute, get_wred_attribute, remove_wred
    }
    "QosMap" => QosMapAttrs {
        create_qos_map, set_qos_map_attribute, get_qos_map_attribute, remove_qos_map
    }
    "BufferPool" => BufferPoolAttrs {
        create_buffer_pool, set_buffer_pool_attribute,
        get_buffer_pool_attribute, remove_buffer_pool
    }
    "BufferProfile" => BufferProfileAttrs {
        create_buffer_profile, set_buffer_profile_attribute,
        get_buffer_profile_attribute, remove_buffer_profile
    }
    "Samplepacket" => SamplepacketAttrs {
        create_samplepacket, set_samplepacket_attribute,
        get_samplepacket_attribute, remove_samplepacket
    }
    "IsolationGroup" => IsolationGroupAttrs {
        create_isolation_group, set_isolation_group_attribute,
        get_isolation_group_attribute, remove_isolation_group
    }
    "IsolationGroupMember" => IsolationGroupMemberAttrs {
        create_isolation_group_member, set_isolation_group_member_attribute,
        get_isolation_group_member_attribute, remove_isolation_group_member
    }
    "L2mcGroup" => L2mcGroupAttrs {
        create_l2mc_group, set_l2mc_group_attribute,
        get_l2mc_group_attribute, remove_l2mc_group
    }
    "L2mcGroupMember" => L2mcGroupMemberAttrs {
        create_l2mc_group_member, set_l2mc_group_member_attribute,
        get_l2mc_group_member_attribute, remove_l2mc_group_member
    }
    "Hash" => HashAttrs {
        create_hash, set_hash_attribute, get_hash_attribute, remove_hash
    }
    "Bridge" => BridgeAttrs {
        create_bridge, set_bridge_attribute, get_bridge_attribute, remove_bridge
    }
    "BridgePort" => BridgePortAttrs {
        create_bridge_port, set_bridge_port_attribute,
        get_bridge_port_attribute, remove_bridge_port
    }
    "Stp" => StpAttrs {
        create_stp, set_stp_attribute, get_stp_attribute, remove_stp
    }
    "HostifTrapGroup" => HostifTrapGroupAttrs {
        create_hostif_trap_group, set_hostif_trap_group_attribute,
        get_hostif_trap_group_attribute, remove_hostif_trap_group
    }
    "HostifUserDefinedTrap" => HostifUserDefinedTrapAttrs {
        create_hostif_user_defined_trap, set_hostif_user_defined_trap_attribute,
        get_hostif_user_defined_trap_attribute, remove_hostif_user_defined_trap
    }
    "TunnelMap" => TunnelMapAttrs {
        create_tunnel_map, set_tunnel_map_attribute,
        get_tunnel_map_attribute, remove_tunnel_map
    }
    "TunnelMapEntry" => TunnelMapEntryAttrs {
        create_tunnel_map_entry, set_tunnel_map_entry_attribute,
        get_tunnel_map_entry_attribute, remove_tunnel_map_entry
    }
    "UdfMatch" => UdfMatchAttrs {
        create_udf_match, set_udf_match_attribute,
        get_udf_match_attribute, remove_udf_match
    }
}
