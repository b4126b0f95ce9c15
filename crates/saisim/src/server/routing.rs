//! Next hop, group, route, router interface, neighbor and tunnel calls.

use super::{bulk, from_store, from_store_entry, SaiServer};
use crate::audit::{AuditCategory, AuditRecord};
use crate::audit_log;
use crate::nhg::{NextHopAttrs, NextHopGroupAttrs, NextHopGroupMemberAttrs};
use crate::route::{
    NeighborEntryAttrs, NeighborEntryKey, RouteEntryAttrs, RouteEntryKey, RouterInterfaceAttrs,
};
use crate::tunnel::{TunnelAttrs, TunnelTermTableEntryAttrs};
use saisim_attrs::{
    CreateEntryRequest, CreateRequest, GetEntryRequest, GetRequest, GetResponse, RemoveEntryRequest,
    SetEntryRequest, SetRequest,
};
use saisim_types::{ObjectType, Oid, SaiResult};

impl SaiServer {
    fn audit_entry(
        &self,
        category: AuditCategory,
        rpc: &str,
        object_type: ObjectType,
        entry: serde_json::Value,
        result: &SaiResult<()>,
    ) {
        let record = AuditRecord::new(category, "SaiServer", rpc)
            .with_object_type(object_type)
            .with_details(entry);
        audit_log!(match result {
            Ok(()) => record,
            Err(e) => record.with_error(e.to_string()),
        });
    }

    pub fn create_next_hop(&self, switch: Oid, attrs: NextHopAttrs) -> SaiResult<Oid> {
        self.create("CreateNextHop", CreateRequest::new(switch, attrs), |req| {
            self.next_hops.create_next_hop(req)
        })
    }

    pub fn create_next_hops(&self, switch: Oid, attrs: Vec<NextHopAttrs>) -> Vec<SaiResult<Oid>> {
        bulk("CreateNextHops", attrs, |attrs| self.create_next_hop(switch, attrs))
    }

    pub fn get_next_hop_attribute(
        &self,
        req: GetRequest,
    ) -> SaiResult<GetResponse<NextHopAttrs>> {
        self.get("GetNextHopAttribute", req, from_store)
    }

    pub fn remove_next_hop(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveNextHop", oid, ObjectType::NextHop, |req| {
            self.next_hops.remove_next_hop(req.oid)
        })
    }

    pub fn create_next_hop_group(&self, switch: Oid, attrs: NextHopGroupAttrs) -> SaiResult<Oid> {
        self.create("CreateNextHopGroup", CreateRequest::new(switch, attrs), |req| {
            self.next_hops.create_group(req)
        })
    }

    pub fn get_next_hop_group_attribute(
        &self,
        req: GetRequest,
    ) -> SaiResult<GetResponse<NextHopGroupAttrs>> {
        self.get("GetNextHopGroupAttribute", req, from_store)
    }

    pub fn remove_next_hop_group(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveNextHopGroup", oid, ObjectType::NextHopGroup, |req| {
            self.next_hops.remove_group(req.oid)
        })
    }

    pub fn create_next_hop_group_member(
        &self,
        switch: Oid,
        attrs: NextHopGroupMemberAttrs,
    ) -> SaiResult<Oid> {
        self.create(
            "CreateNextHopGroupMember",
            CreateRequest::new(switch, attrs),
            |req| self.next_hops.create_member(req),
        )
    }

    pub fn set_next_hop_group_member_attribute(
        &self,
        oid: Oid,
        attrs: NextHopGroupMemberAttrs,
    ) -> SaiResult<()> {
        self.set(
            "SetNextHopGroupMemberAttribute",
            SetRequest::new(oid, attrs),
            |req| self.next_hops.set_member(req),
        )
    }

    pub fn remove_next_hop_group_member(&self, oid: Oid) -> SaiResult<()> {
        self.remove(
            "RemoveNextHopGroupMember",
            oid,
            ObjectType::NextHopGroupMember,
            |req| self.next_hops.remove_member(req.oid),
        )
    }

    pub fn create_route_entry(&self, entry: RouteEntryKey, attrs: RouteEntryAttrs) -> SaiResult<()> {
        let details = serde_json::json!({ "destination": entry.destination.to_string() });
        let result = self.pipeline.create_entry(
            "CreateRouteEntry",
            CreateEntryRequest::new(entry, attrs),
            |req| self.routes.create_route(req),
        );
        self.audit_entry(
            AuditCategory::ResourceCreate,
            "CreateRouteEntry",
            ObjectType::RouteEntry,
            details,
            &result,
        );
        result
    }

    pub fn create_route_entries(
        &self,
        entries: Vec<(RouteEntryKey, RouteEntryAttrs)>,
    ) -> Vec<SaiResult<()>> {
        bulk("CreateRouteEntries", entries, |(entry, attrs)| {
            self.create_route_entry(entry, attrs)
        })
    }

    pub fn set_route_entry_attribute(
        &self,
        entry: RouteEntryKey,
        attrs: RouteEntryAttrs,
    ) -> SaiResult<()> {
        self.pipeline.set_entry(
            "SetRouteEntryAttribute",
            SetEntryRequest { entry, attrs },
            |req| self.routes.set_route(req),
        )
    }

    pub fn get_route_entry_attribute(
        &self,
        req: GetEntryRequest<RouteEntryKey>,
    ) -> SaiResult<GetResponse<RouteEntryAttrs>> {
        self.pipeline
            .get_entry("GetRouteEntryAttribute", req, from_store_entry)
    }

    pub fn remove_route_entry(&self, entry: RouteEntryKey) -> SaiResult<()> {
        let details = serde_json::json!({ "destination": entry.destination.to_string() });
        let result = self.pipeline.remove_entry(
            "RemoveRouteEntry",
            RemoveEntryRequest { entry },
            |req| self.routes.remove_route(req),
        );
        self.audit_entry(
            AuditCategory::ResourceDelete,
            "RemoveRouteEntry",
            ObjectType::RouteEntry,
            details,
            &result,
        );
        result
    }

    pub fn remove_route_entries(&self, entries: Vec<RouteEntryKey>) -> Vec<SaiResult<()>> {
        bulk("RemoveRouteEntries", entries, |entry| {
            self.remove_route_entry(entry)
        })
    }

    pub fn create_router_interface(
        &self,
        switch: Oid,
        attrs: RouterInterfaceAttrs,
    ) -> SaiResult<Oid> {
        self.create("CreateRouterInterface", CreateRequest::new(switch, attrs), |req| {
            self.rifs.create_rif(req)
        })
    }

    pub fn set_router_interface_attribute(
        &self,
        oid: Oid,
        attrs: RouterInterfaceAttrs,
    ) -> SaiResult<()> {
        self.set(
            "SetRouterInterfaceAttribute",
            SetRequest::new(oid, attrs),
            |req| self.rifs.set_rif(req),
        )
    }

    pub fn get_router_interface_attribute(
        &self,
        req: GetRequest,
    ) -> SaiResult<GetResponse<RouterInterfaceAttrs>> {
        self.get("GetRouterInterfaceAttribute", req, from_store)
    }

    pub fn remove_router_interface(&self, oid: Oid) -> SaiResult<()> {
        self.remove(
            "RemoveRouterInterface",
            oid,
            ObjectType::RouterInterface,
            |req| self.rifs.remove_rif(req.oid),
        )
    }

    pub fn create_neighbor_entry(
        &self,
        entry: NeighborEntryKey,
        attrs: NeighborEntryAttrs,
    ) -> SaiResult<()> {
        let details = serde_json::json!({ "ip": entry.ip_address, "rif": entry.rif_id });
        let result = self.pipeline.create_entry(
            "CreateNeighborEntry",
            CreateEntryRequest::new(entry, attrs),
            |req| self.neighbors.create_neighbor(req),
        );
        self.audit_entry(
            AuditCategory::ResourceCreate,
            "CreateNeighborEntry",
            ObjectType::NeighborEntry,
            details,
            &result,
        );
        result
    }

    pub fn create_neighbor_entries(
        &self,
        entries: Vec<(NeighborEntryKey, NeighborEntryAttrs)>,
    ) -> Vec<SaiResult<()>> {
        bulk("CreateNeighborEntries", entries, |(entry, attrs)| {
            self.create_neighbor_entry(entry, attrs)
        })
    }

    pub fn set_neighbor_entry_attribute(
        &self,
        entry: NeighborEntryKey,
        attrs: NeighborEntryAttrs,
    ) -> SaiResult<()> {
        self.pipeline.set_entry(
            "SetNeighborEntryAttribute",
            SetEntryRequest { entry, attrs },
            |req| self.neighbors.set_neighbor(req),
        )
    }

    pub fn get_neighbor_entry_attribute(
        &self,
        req: GetEntryRequest<NeighborEntryKey>,
    ) -> SaiResult<GetResponse<NeighborEntryAttrs>> {
        self.pipeline
            .get_entry("GetNeighborEntryAttribute", req, from_store_entry)
    }

    pub fn remove_neighbor_entry(&self, entry: NeighborEntryKey) -> SaiResult<()> {
        let details = serde_json::json!({ "ip": entry.ip_address, "rif": entry.rif_id });
        let result = self.pipeline.remove_entry(
            "RemoveNeighborEntry",
            RemoveEntryRequest { entry },
            |req| self.neighbors.remove_neighbor(req),
        );
        self.audit_entry(
            AuditCategory::ResourceDelete,
            "RemoveNeighborEntry",
            ObjectType::NeighborEntry,
            details,
            &result,
        );
        result
    }

    pub fn create_tunnel(&self, switch: Oid, attrs: TunnelAttrs) -> SaiResult<Oid> {
        self.create("CreateTunnel", CreateRequest::new(switch, attrs), |req| {
            self.tunnels.create_tunnel(req)
        })
    }

    pub fn get_tunnel_attribute(&self, req: GetRequest) -> SaiResult<GetResponse<TunnelAttrs>> {
        self.get("GetTunnelAttribute", req, from_store)
    }

    pub fn remove_tunnel(&self, oid: Oid) -> SaiResult<()> {
        self.remove("RemoveTunnel", oid, ObjectType::Tunnel, |req| {
            self.tunnels.remove_tunnel(req.oid)
        })
    }

    pub fn create_tunnel_term_table_entry(
        &self,
        switch: Oid,
        attrs: TunnelTermTableEntryAttrs,
    ) -> SaiResult<Oid> {
        self.create(
            "CreateTunnelTermTableEntry",
            CreateRequest::new(switch, attrs),
            |req| self.tunnels.create_term_entry(req),
        )
    }

    pub fn remove_tunnel_term_table_entry(&self, oid: Oid) -> SaiResult<()> {
        self.remove(
            "RemoveTunnelTermTableEntry",
            oid,
            ObjectType::TunnelTermTableEntry,
            |req| self.tunnels.remove_term_entry(req.oid),
        )
    }
}
