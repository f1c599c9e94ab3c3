//! Non-fatal findings reported while classifying and assembling.

use serde::Serialize;
use std::fmt;

/// Something odd in the scanned data. Never aborts classification.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Route table claims a different VPC than the one being classified.
    ForeignRouteTable {
        route_table_id: String,
        network_id: String,
    },
    /// Association names a subnet that is not part of the VPC.
    UnknownSubnetAssociation {
        route_table_id: String,
        subnet_id: String,
    },
    /// More than one route table is marked main; the first one is used.
    DuplicateMainTable {
        route_table_id: String,
        kept_route_table_id: String,
    },
    /// Subnet explicitly associated twice; the first association is used.
    DuplicateSubnetAssociation {
        subnet_id: String,
        route_table_id: String,
        kept_route_table_id: String,
    },
    /// Route target id is not of the form `<prefix>-<id>`.
    MalformedGateway {
        route_table_id: String,
        gateway: String,
    },
    /// Subnet block lies outside every block of its VPC.
    SubnetOutsideNetwork { subnet_id: String, cidr: String },
    /// No main route table; unassociated subnets were set to PrivateImplicit.
    NoMainRouteTable {
        network_id: String,
        implicit_subnets: usize,
    },
    /// Resource references a subnet the VPC does not have.
    OrphanResource {
        resource_id: String,
        subnet_id: String,
    },
}

impl Diagnostic {
    /// Short condition name used in the diagnostics sheet.
    pub fn condition(&self) -> &'static str {
        match self {
            Diagnostic::NoMainRouteTable { .. } => "AmbiguousDefault",
            _ => "MalformedInput",
        }
    }

    /// Id of the record the diagnostic is about.
    pub fn subject(&self) -> &str {
        match self {
            Diagnostic::ForeignRouteTable { route_table_id, .. }
            | Diagnostic::UnknownSubnetAssociation { route_table_id, .. }
            | Diagnostic::DuplicateMainTable { route_table_id, .. }
            | Diagnostic::MalformedGateway { route_table_id, .. } => route_table_id,
            Diagnostic::DuplicateSubnetAssociation { subnet_id, .. }
            | Diagnostic::SubnetOutsideNetwork { subnet_id, .. } => subnet_id,
            Diagnostic::NoMainRouteTable { network_id, .. } => network_id,
            Diagnostic::OrphanResource { resource_id, .. } => resource_id,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ForeignRouteTable {
                route_table_id,
                network_id,
            } => write!(
                f,
                "route table {route_table_id} belongs to {network_id}, skipped"
            ),
            Diagnostic::UnknownSubnetAssociation {
                route_table_id,
                subnet_id,
            } => write!(
                f,
                "route table {route_table_id} is associated with unknown subnet {subnet_id}, association skipped"
            ),
            Diagnostic::DuplicateMainTable {
                route_table_id,
                kept_route_table_id,
            } => write!(
                f,
                "route table {route_table_id} is also marked main, keeping {kept_route_table_id}"
            ),
            Diagnostic::DuplicateSubnetAssociation {
                subnet_id,
                route_table_id,
                kept_route_table_id,
            } => write!(
                f,
                "subnet {subnet_id} is also associated with {route_table_id}, keeping {kept_route_table_id}"
            ),
            Diagnostic::MalformedGateway {
                route_table_id,
                gateway,
            } => write!(
                f,
                "route table {route_table_id} has malformed gateway '{gateway}', route ignored"
            ),
            Diagnostic::SubnetOutsideNetwork { subnet_id, cidr } => {
                write!(f, "subnet {subnet_id} block {cidr} is outside its VPC")
            }
            Diagnostic::NoMainRouteTable {
                network_id,
                implicit_subnets,
            } => write!(
                f,
                "{network_id} has no main route table, {implicit_subnets} subnet(s) marked Private (Implicit)"
            ),
            Diagnostic::OrphanResource {
                resource_id,
                subnet_id,
            } => write!(
                f,
                "resource {resource_id} references unknown subnet {subnet_id}"
            ),
        }
    }
}
