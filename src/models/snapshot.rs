//! Serializable result of one account scan.

use super::{AttachedResource, Network, RouteTable, ServiceRecord, Subnet};
use serde::{Deserialize, Serialize};

/// A network together with everything needed to classify it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NetworkScan {
    pub network: Network,
    #[serde(default)]
    pub route_tables: Vec<RouteTable>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
}

/// Everything found in one region.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RegionScan {
    pub region: String,
    #[serde(default)]
    pub networks: Vec<NetworkScan>,
    /// Region-wide attached resources; joined to networks by the report.
    #[serde(default)]
    pub resources: Vec<AttachedResource>,
    #[serde(default)]
    pub services: Vec<ServiceRecord>,
}

impl RegionScan {
    pub fn new(region: &str) -> RegionScan {
        RegionScan {
            region: region.to_string(),
            ..Default::default()
        }
    }

    pub fn subnet_count(&self) -> usize {
        self.networks.iter().map(|n| n.subnets.len()).sum()
    }
}

/// Full scan of an account, as written to the cache file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ScanSnapshot {
    /// RFC 3339 timestamp of the scan.
    pub scanned_at: String,
    pub regions: Vec<RegionScan>,
    #[serde(default)]
    pub global: Vec<ServiceRecord>,
}

impl ScanSnapshot {
    pub fn network_count(&self) -> usize {
        self.regions.iter().map(|r| r.networks.len()).sum()
    }

    pub fn subnet_count(&self) -> usize {
        self.regions.iter().map(|r| r.subnet_count()).sum()
    }

    pub fn resource_count(&self) -> usize {
        self.regions.iter().map(|r| r.resources.len()).sum()
    }
}
