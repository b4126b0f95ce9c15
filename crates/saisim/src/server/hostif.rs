//! Host interface, trap and hostif table entry calls.

use super::{from_store, SaiServer};
use crate::hostif::{HostifAttrs, HostifTableEntryAttrs, HostifTrapAttrs};
use saisim_attrs::{CreateRequest, GetRequest, GetResponse, SetRequest};
use saisim_types::{ObjectType, Oid, SaiResult};

impl SaiServer {
    pub fn create_hostif(&self, switch: Oid, attrs: HostifAttrs) -> SaiResult<Oid> {
        self.create("CreateHostif", CreateRequest::new(switch, attrs), |req| {
            self.hostif.create_hostif(req)
        })
    }

    pub fn set_hostif_attribute(&self, oid: Oid, attrs: HostifAttrs) -> SaiResult<()> {
        self.set("SetHostifAttribute", SetRequest::new(oid, attrs), |req| {
            self.hostif.set_hostif(req)
        })
    }

    pub fn get_hostif_attribute(&self, req: GetRequest) -> SaiResult<GetResponse<HostifAttrs>> {
        self.get("GetHostifAttribute", req, from_store)
    }

    pub fn remove_hostif(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveHostif", oid, ObjectType::Hostif, |req| {
            self.hostif.remove_hostif(req.oid)
        })
    }

    pub fn create_hostif_trap(&self, switch: Oid, attrs: HostifTrapAttrs) -> SaiResult<Oid> {
        self.create("CreateHostifTrap", CreateRequest::new(switch, attrs), |req| {
            self.hostif.create_trap(req)
        })
    }

    pub fn set_hostif_trap_attribute(&self, oid: Oid, attrs: HostifTrapAttrs) -> SaiResult<()> {
        self.set("SetHostifTrapAttribute", SetRequest::new(oid, attrs), |req| {
            self.hostif.set_trap(req)
        })
    }

    pub fn get_hostif_trap_attribute(
        &self,
        req: GetRequest,
    ) -> SaiResult<GetResponse<HostifTrapAttrs>> {
        self.get("GetHostifTrapAttribute", req, from_store)
    }

    pub fn remove_hostif_trap(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveHostifTrap", oid, ObjectType::HostifTrap, |req| {
            self.hostif.remove_trap(req.oid)
        })
    }

    pub fn create_hostif_table_entry(
        &self,
        switch: Oid,
        attrs: HostifTableEntryAttrs,
    ) -> SaiResult<Oid> {
        self.create(
            "CreateHostifTableEntry",
            CreateRequest::new(switch, attrs),
            |req| self.hostif.create_table_entry(req),
        )
    }

    pub fn remove_hostif_table_entry(&self, oid: Oid) -> SaiResult<()> {
        self.remove(
            "RemoveHostifTableEntry",
            oid,
            ObjectType::HostifTableEntry,
            |req| self.hostif.remove_table_entry(req.oid),
        )
    }
}
