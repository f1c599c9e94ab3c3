//! Resources attached to subnets or VPCs, and non-network service records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Free-form display values keyed by column name.
pub type Details = BTreeMap<String, String>;

/// Kind of a resource that lives inside a VPC.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    ComputeInstance,
    ManagedDatabase,
    ServerlessFunction,
    LoadBalancer,
    NetworkInterface,
}

impl ResourceKind {
    /// Every kind, in scan order.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::ComputeInstance,
        ResourceKind::ManagedDatabase,
        ResourceKind::ServerlessFunction,
        ResourceKind::LoadBalancer,
        ResourceKind::NetworkInterface,
    ];

    /// Ordered detail columns every resource of this kind carries.
    pub fn detail_columns(&self) -> &'static [&'static str] {
        match self {
            ResourceKind::ComputeInstance => &[
                "Instance Name",
                "Instance Type",
                "Private IP",
                "Public IP",
                "State",
                "EBS Volumes",
            ],
            ResourceKind::ManagedDatabase => &[
                "DB Instance ARN",
                "Engine",
                "DB Instance Class",
                "Multi-AZ",
            ],
            ResourceKind::ServerlessFunction => &[
                "Lambda Function ARN",
                "Runtime",
                "Security Group IDs",
            ],
            ResourceKind::LoadBalancer => &["Service", "Type", "Scheme", "DNS", "Targets"],
            ResourceKind::NetworkInterface => &[
                "Resource Type",
                "Status",
                "Private IPs",
                "Attached Instance",
                "Description",
            ],
        }
    }

    /// Sheet the kind's inventory is written to.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            ResourceKind::ComputeInstance => "Compute Resources",
            ResourceKind::ManagedDatabase => "Database Resources",
            ResourceKind::ServerlessFunction => "Lambdas",
            ResourceKind::LoadBalancer => "Load Balancers",
            ResourceKind::NetworkInterface => "Network Interfaces",
        }
    }

    /// Header of the resource id column in the kind's sheet.
    pub fn id_column(&self) -> &'static str {
        match self {
            ResourceKind::ComputeInstance => "Instance ID",
            ResourceKind::ManagedDatabase => "DB Instance Identifier",
            ResourceKind::ServerlessFunction => "Lambda Function Name",
            ResourceKind::LoadBalancer => "Load Balancer Name",
            ResourceKind::NetworkInterface => "Interface ID",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::ComputeInstance => "EC2 Instance",
            ResourceKind::ManagedDatabase => "RDS Instance",
            ResourceKind::ServerlessFunction => "Lambda Function",
            ResourceKind::LoadBalancer => "Load Balancer",
            ResourceKind::NetworkInterface => "Network Interface",
        };
        write!(f, "{label}")
    }
}

/// Something bound to one or more subnets, or to a VPC as a whole.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttachedResource {
    pub id: String,
    pub kind: ResourceKind,
    /// Subnets the resource is placed in, in the order the API returned them.
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    /// Owning VPC, when known.
    pub network_id: Option<String>,
    #[serde(default)]
    pub details: Details,
}

impl AttachedResource {
    pub fn new(id: &str, kind: ResourceKind) -> AttachedResource {
        AttachedResource {
            id: id.to_string(),
            kind,
            subnet_ids: vec![],
            network_id: None,
            details: Details::new(),
        }
    }

    pub fn in_subnet(mut self, subnet_id: &str) -> AttachedResource {
        self.subnet_ids.push(subnet_id.to_string());
        self
    }

    pub fn in_network(mut self, network_id: &str) -> AttachedResource {
        self.network_id = Some(network_id.to_string());
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> AttachedResource {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Display value for a detail column, `-` when missing or blank.
    pub fn detail(&self, key: &str) -> &str {
        match self.details.get(key) {
            Some(value) if !value.trim().is_empty() => value,
            _ => "-",
        }
    }

    /// Label used in topology rows; interfaces report their inferred type.
    pub fn type_label(&self) -> String {
        match self.kind {
            ResourceKind::NetworkInterface => match self.details.get("Resource Type") {
                Some(label) if !label.is_empty() => label.clone(),
                _ => self.kind.to_string(),
            },
            _ => self.kind.to_string(),
        }
    }
}

/// A resource that is not placed in a VPC: regional services and global
/// resources such as IAM users or S3 buckets.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceRecord {
    /// Region name, or `Global`.
    pub region: String,
    pub category: String,
    pub service: String,
    pub name: String,
    pub details: String,
}
