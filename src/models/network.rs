//! AWS Virtual Private Cloud (VPC) data model.

use super::Ipv4;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An isolated virtual network as seen at scan time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Network {
    /// VPC id, e.g. `vpc-0a1b2c3d`.
    pub id: String,
    /// Value of the `Name` tag, if any.
    pub name: Option<String>,
    /// Region the network lives in.
    pub region: String,
    /// Address blocks; the first is the primary CIDR.
    pub cidrs: Vec<Ipv4>,
}

impl Network {
    pub fn new(id: &str, region: &str, cidr: Ipv4) -> Network {
        Network {
            id: id.to_string(),
            name: None,
            region: region.to_string(),
            cidrs: vec![cidr],
        }
    }

    /// Name tag, or the id when the network is untagged.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// True if `cidr` fits inside one of the network's blocks.
    pub fn covers(&self, cidr: &Ipv4) -> bool {
        self.cidrs.iter().any(|block| block.covers(cidr))
    }

    /// Comma separated list of the network's blocks.
    pub fn cidrs_to_string(&self) -> String {
        self.cidrs
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<String>>()
            .join(",")
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' [{}] ({})",
            self.id,
            self.name.as_deref().unwrap_or(""),
            self.cidrs_to_string(),
            self.region
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_covers_secondary_block() {
        let mut vpc = Network::new("vpc-1", "us-east-1", Ipv4::new("10.0.0.0/16").unwrap());
        vpc.cidrs.push(Ipv4::new("100.64.0.0/16").unwrap());
        assert!(vpc.covers(&Ipv4::new("100.64.3.0/24").unwrap()));
        assert!(!vpc.covers(&Ipv4::new("172.16.0.0/24").unwrap()));
        assert_eq!(vpc.cidrs_to_string(), "10.0.0.0/16,100.64.0.0/16");
        assert_eq!(vpc.display_name(), "vpc-1");
    }
}
