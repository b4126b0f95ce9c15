//! Switch, port, LAG and VLAN calls.

use super::{bulk, from_store, SaiServer};
use crate::l2::{VlanAttrs, VlanMemberAttrs};
use crate::ports::{LagAttrs, LagMemberAttrs, PortAttrs};
use crate::switch::SwitchAttrs;
use saisim_attrs::{CreateRequest, GetRequest, GetResponse, SetRequest};
use saisim_types::{ObjectType, Oid, SaiResult, NULL_OID};

impl SaiServer {
    pub fn create_switch(&self, attrs: SwitchAttrs) -> SaiResult<Oid> {
        self.create("CreateSwitch", CreateRequest::new(NULL_OID, attrs), |req| {
            self.switch.create_switch(req)
        })
    }

    pub fn set_switch_attribute(&self, oid: Oid, attrs: SwitchAttrs) -> SaiResult<()> {
        self.set("SetSwitchAttribute", SetRequest::new(oid, attrs), |req| {
            self.switch.set_switch(req)
        })
    }

    pub fn get_switch_attribute(
        &self,
        req: GetRequest,
    ) -> SaiResult<GetResponse<SwitchAttrs>> {
        self.get("GetSwitchAttribute", req, from_store)
    }

    /// A cold removal also drops every remaining object; a warm removal
    /// leaves the store intact for recovery.
    pub fn remove_switch(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveSwitch", oid, ObjectType::Switch, |req| {
            self.switch.remove_switch(req.oid)
        })?;
        if self.ctx.store.switch_id() == NULL_OID {
            self.reset();
        }
        Ok(())
    }

    pub fn create_port(&self, switch: Oid, attrs: PortAttrs) -> SaiResult<Oid> {
        self.create("CreatePort", CreateRequest::new(switch, attrs), |req| {
            self.ports.create_port(req)
        })
    }

    pub fn create_ports(&self, switch: Oid, attrs: Vec<PortAttrs>) -> Vec<SaiResult<Oid>> {
        bulk("CreatePorts", attrs, |attrs| self.create_port(switch, attrs))
    }

    pub fn set_port_attribute(&self, oid: Oid, attrs: PortAttrs) -> SaiResult<()> {
        self.set("SetPortAttribute", SetRequest::new(oid, attrs), |req| {
            self.ports.set_port(req)
        })
    }

    pub fn get_port_attribute(&self, req: GetRequest) -> SaiResult<GetResponse<PortAttrs>> {
        self.get("GetPortAttribute", req, |req| self.ports.get_port(req))
    }

    pub fn remove_port(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemovePort", oid, ObjectType::Port, |req| {
            self.ports.remove_port(req.oid)
        })
    }

    pub fn create_lag(&self, switch: Oid, attrs: LagAttrs) -> SaiResult<Oid> {
        self.create("CreateLag", CreateRequest::new(switch, attrs), |req| {
            self.lags.create_lag(req)
        })
    }

    pub fn get_lag_attribute(&self, req: GetRequest) -> SaiResult<GetResponse<LagAttrs>> {
        self.get("GetLagAttribute", req, from_store)
    }

    pub fn remove_lag(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveLag", oid, ObjectType::Lag, |req| {
            self.lags.remove_lag(req.oid)
        })
    }

    pub fn create_lag_member(&self, switch: Oid, attrs: LagMemberAttrs) -> SaiResult<Oid> {
        self.create("CreateLagMember", CreateRequest::new(switch, attrs), |req| {
            self.lags.create_lag_member(req)
        })
    }

    pub fn remove_lag_member(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveLagMember", oid, ObjectType::LagMember, |req| {
            self.lags.remove_lag_member(req.oid)
        })
    }

    pub fn create_vlan(&self, switch: Oid, attrs: VlanAttrs) -> SaiResult<Oid> {
        self.create("CreateVlan", CreateRequest::new(switch, attrs), |req| {
            self.l2.create_vlan(req)
        })
    }

    pub fn set_vlan_attribute(&self, oid: Oid, attrs: VlanAttrs) -> SaiResult<()> {
        self.set("SetVlanAttribute", SetRequest::new(oid, attrs), |_| Ok(()))
    }

    pub fn get_vlan_attribute(&self, req: GetRequest) -> SaiResult<GetResponse<VlanAttrs>> {
        self.get("GetVlanAttribute", req, from_store)
    }

    pub fn remove_vlan(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveVlan", oid, ObjectType::Vlan, |req| {
            self.l2.remove_vlan(req.oid)
        })
    }

    pub fn create_vlan_member(&self, switch: Oid, attrs: VlanMemberAttrs) -> SaiResult<Oid> {
        self.create("CreateVlanMember", CreateRequest::new(switch, attrs), |req| {
            self.l2.create_vlan_member(req)
        })
    }

    pub fn get_vlan_member_attribute(
        &self,
        req: GetRequest,
    ) -> SaiResult<GetResponse<VlanMemberAttrs>> {
        self.get("GetVlanMemberAttribute", req, from_store)
    }

    pub fn remove_vlan_member(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveVlanMember", oid, ObjectType::VlanMember, |req| {
            self.l2.remove_vlan_member(req.oid)
        })
    }
}
