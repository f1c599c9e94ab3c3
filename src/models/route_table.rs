//! Route tables, routes and their associations.

use serde::{Deserialize, Serialize};

/// A single routing rule.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Route {
    /// IPv4 destination block (None for prefix-list or IPv6 routes).
    pub destination: Option<String>,
    /// Target id: internet gateway, NAT gateway, peering connection, ...
    pub gateway: Option<String>,
}

impl Route {
    pub fn new(destination: &str, gateway: &str) -> Route {
        Route {
            destination: Some(destination.to_string()),
            gateway: Some(gateway.to_string()),
        }
    }
}

/// Binds a route table to its VPC (main) or to one subnet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Association {
    /// True for the VPC's main (default) route table.
    #[serde(default)]
    pub main: bool,
    /// Explicitly associated subnet.
    pub subnet_id: Option<String>,
}

impl Association {
    pub fn main() -> Association {
        Association {
            main: true,
            subnet_id: None,
        }
    }

    pub fn subnet(subnet_id: &str) -> Association {
        Association {
            main: false,
            subnet_id: Some(subnet_id.to_string()),
        }
    }
}

/// An ordered set of routes plus the associations that apply it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RouteTable {
    pub id: String,
    /// Id of the owning VPC.
    pub network_id: String,
    pub routes: Vec<Route>,
    pub associations: Vec<Association>,
}

impl RouteTable {
    pub fn new(id: &str, network_id: &str) -> RouteTable {
        RouteTable {
            id: id.to_string(),
            network_id: network_id.to_string(),
            routes: vec![],
            associations: vec![],
        }
    }

    pub fn with_route(mut self, destination: &str, gateway: &str) -> RouteTable {
        self.routes.push(Route::new(destination, gateway));
        self
    }

    pub fn with_association(mut self, association: Association) -> RouteTable {
        self.associations.push(association);
        self
    }
}
