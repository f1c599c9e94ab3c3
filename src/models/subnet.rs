//! AWS subnet data model.

use super::Ipv4;
use serde::{Deserialize, Serialize};

/// Represents an AWS subnet with its placement and addressing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Subnet {
    /// Subnet id, e.g. `subnet-0a1b2c3d`.
    pub id: String,
    /// Value of the `Name` tag, if any.
    pub name: Option<String>,
    /// IPv4 block (None for IPv6-only subnets).
    pub cidr: Option<Ipv4>,
    /// Availability zone, e.g. `us-east-1a`.
    pub availability_zone: String,
    /// Id of the owning VPC.
    pub network_id: String,
}

impl Subnet {
    pub fn new(id: &str, network_id: &str, cidr: Option<Ipv4>, availability_zone: &str) -> Subnet {
        Subnet {
            id: id.to_string(),
            name: None,
            cidr,
            availability_zone: availability_zone.to_string(),
            network_id: network_id.to_string(),
        }
    }

    /// Name tag, or the id when the subnet is untagged.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

