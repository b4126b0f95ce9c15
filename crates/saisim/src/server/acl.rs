//! ACL and UDF calls.

use super::{from_store, SaiServer};
use crate::acl::{
    AclCounterAttrs, AclEntryAttrs, AclTableAttrs, AclTableGroupAttrs, AclTableGroupMemberAttrs,
};
use crate::udf::{UdfAttrs, UdfGroupAttrs};
use saisim_attrs::{CreateRequest, GetRequest, GetResponse, SetRequest};
use saisim_types::{ObjectType, Oid, SaiResult};

impl SaiServer {
    pub fn create_acl_table(&self, switch: Oid, attrs: AclTableAttrs) -> SaiResult<Oid> {
        self.create("CreateAclTable", CreateRequest::new(switch, attrs), |req| {
            self.acl.create_table(req)
        })
    }

    pub fn get_acl_table_attribute(
        &self,
        req: GetRequest,
    ) -> SaiResult<GetResponse<AclTableAttrs>> {
        self.get("GetAclTableAttribute", req, from_store)
    }

    pub fn remove_acl_table(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveAclTable", oid, ObjectType::AclTable, |req| {
            self.acl.remove_table(req.oid)
        })
    }

    pub fn create_acl_table_group(
        &self,
        switch: Oid,
        attrs: AclTableGroupAttrs,
    ) -> SaiResult<Oid> {
        self.create("CreateAclTableGroup", CreateRequest::new(switch, attrs), |req| {
            self.acl.create_group(req)
        })
    }

    pub fn get_acl_table_group_attribute(
        &self,
        req: GetRequest,
    ) -> SaiResult<GetResponse<AclTableGroupAttrs>> {
        self.get("GetAclTableGroupAttribute", req, from_store)
    }

    pub fn remove_acl_table_group(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveAclTableGroup", oid, ObjectType::AclTableGroup, |req| {
            self.acl.remove_group(req.oid)
        })
    }

    pub fn create_acl_table_group_member(
        &self,
        switch: Oid,
        attrs: AclTableGroupMemberAttrs,
    ) -> SaiResult<Oid> {
        self.create(
            "CreateAclTableGroupMember",
            CreateRequest::new(switch, attrs),
            |req| self.acl.create_member(req),
        )
    }

    pub fn remove_acl_table_group_member(&self, oid: Oid) -> SaiResult<()> {
        self.remove(
            "RemoveAclTableGroupMember",
            oid,
            ObjectType::AclTableGroupMember,
            |req| self.acl.remove_member(req.oid),
        )
    }

    pub fn create_acl_entry(&self, switch: Oid, attrs: AclEntryAttrs) -> SaiResult<Oid> {
        self.create("CreateAclEntry", CreateRequest::new(switch, attrs), |req| {
            self.acl.create_entry(req)
        })
    }

    pub fn set_acl_entry_attribute(&self, oid: Oid, attrs: AclEntryAttrs) -> SaiResult<()> {
        self.set("SetAclEntryAttribute", SetRequest::new(oid, attrs), |req| {
            self.acl.set_entry(req)
        })
    }

    pub fn get_acl_entry_attribute(
        &self,
        req: GetRequest,
    ) -> SaiResult<GetResponse<AclEntryAttrs>> {
        self.get("GetAclEntryAttribute", req, from_store)
    }

    pub fn remove_acl_entry(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveAclEntry", oid, ObjectType::AclEntry, |req| {
            self.acl.remove_entry(req.oid)
        })
    }

    pub fn create_acl_counter(&self, switch: Oid, attrs: AclCounterAttrs) -> SaiResult<Oid> {
        self.create("CreateAclCounter", CreateRequest::new(switch, attrs), |req| {
            self.acl.create_counter(req)
        })
    }

    /// PACKETS and BYTES are read live from the engine.
    pub fn get_acl_counter_attribute(
        &self,
        req: GetRequest,
    ) -> SaiResult<GetResponse<AclCounterAttrs>> {
        self.get("GetAclCounterAttribute", req, |req| self.acl.get_counter(req))
    }

    pub fn remove_acl_counter(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveAclCounter", oid, ObjectType::AclCounter, |req| {
            self.acl.remove_counter(req.oid)
        })
    }

    pub fn create_udf_group(&self, switch: Oid, attrs: UdfGroupAttrs) -> SaiResult<Oid> {
        self.create("CreateUdfGroup", CreateRequest::new(switch, attrs), |req| {
            self.udf.create_group(req)
        })
    }

    pub fn remove_udf_group(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveUdfGroup", oid, ObjectType::UdfGroup, |req| {
            self.udf.remove_group(req.oid)
        })
    }

    pub fn create_udf(&self, switch: Oid, attrs: UdfAttrs) -> SaiResult<Oid> {
        self.create("CreateUdf", CreateRequest::new(switch, attrs), |req| {
            self.udf.create_udf(req)
        })
    }

    pub fn get_udf_attribute(&self, req: GetRequest) -> SaiResult<GetResponse<UdfAttrs>> {
        self.get("GetUdfAttribute", req, from_store)
    }

    pub fn remove_udf(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveUdf", oid, ObjectType::Udf, |req| {
            self.udf.remove_udf(req.oid)
        })
    }
}
