//! Join classified subnets with the resources placed in them.

use super::{ClassifiedSubnet, Diagnostic};
use crate::models::{AttachedResource, Network, Reachability, Subnet};
use std::collections::HashMap;
use std::fmt;

/// What a topology row stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// Subnet with at least one resource.
    Subnet,
    /// Subnet with no resources.
    EmptySubnet,
    /// Resource attached to the VPC but to none of its subnets.
    NoSubnet,
    /// VPC without subnets.
    EmptyNetwork,
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RowKind::Subnet => "Subnet",
            RowKind::EmptySubnet => "Empty Subnet",
            RowKind::NoSubnet => "No Subnet",
            RowKind::EmptyNetwork => "Empty Network",
        };
        write!(f, "{label}")
    }
}

/// One row of the topology sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyRow<'a> {
    pub kind: RowKind,
    pub network: &'a Network,
    pub subnet: Option<&'a Subnet>,
    pub class: Option<Reachability>,
    /// Resources joined to the row, in input order.
    pub resources: Vec<&'a AttachedResource>,
}

/// Rows for one VPC plus anything odd found while joining.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly<'a> {
    pub rows: Vec<TopologyRow<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Left outer join of a VPC's subnets against resources.
///
/// - every subnet yields exactly one row, listing all resources placed in it
/// - a resource that names this VPC but none of its subnets gets its own
///   `NoSubnet` row, after the subnet rows
/// - a VPC with no subnets yields one `EmptyNetwork` row
/// - resources that reference neither the VPC nor its subnets are ignored
///
/// So `rows.len() == max(1, subnets.len()) + network level resources`.
/// Input order is kept everywhere.
pub fn assemble_rows<'a, I>(
    network: &'a Network,
    subnets: &[ClassifiedSubnet<'a>],
    resources: I,
) -> Assembly<'a>
where
    I: IntoIterator<Item = &'a AttachedResource>,
{
    let mut diagnostics = Vec::new();

    let mut index: HashMap<&str, usize> = HashMap::new();
    for (i, classified) in subnets.iter().enumerate() {
        index.entry(classified.subnet.id.as_str()).or_insert(i);
    }

    let mut attached: Vec<Vec<&'a AttachedResource>> = vec![Vec::new(); subnets.len()];
    let mut network_level: Vec<&'a AttachedResource> = Vec::new();

    for resource in resources {
        let mut matched = false;
        let mut unknown: Vec<&str> = Vec::new();
        for subnet_id in &resource.subnet_ids {
            match index.get(subnet_id.as_str()) {
                Some(&i) => {
                    if !attached[i].iter().any(|r| std::ptr::eq(*r, resource)) {
                        attached[i].push(resource);
                    }
                    matched = true;
                }
                None => unknown.push(subnet_id.as_str()),
            }
        }

        let in_network = resource.network_id.as_deref() == Some(network.id.as_str());
        if !matched && !in_network {
            continue;
        }
        for subnet_id in unknown {
            diagnostics.push(Diagnostic::OrphanResource {
                resource_id: resource.id.clone(),
                subnet_id: subnet_id.to_string(),
            });
        }
        if !matched {
            network_level.push(resource);
        }
    }

    let mut rows = Vec::with_capacity(subnets.len().max(1) + network_level.len());

    if subnets.is_empty() {
        rows.push(TopologyRow {
            kind: RowKind::EmptyNetwork,
            network,
            subnet: None,
            class: None,
            resources: vec![],
        });
    }

    for (classified, resources) in subnets.iter().zip(attached) {
        rows.push(TopologyRow {
            kind: if resources.is_empty() {
                RowKind::EmptySubnet
            } else {
                RowKind::Subnet
            },
            network,
            subnet: Some(classified.subnet),
            class: Some(classified.class),
            resources,
        });
    }

    for resource in network_level {
        rows.push(TopologyRow {
            kind: RowKind::NoSubnet,
            network,
            subnet: None,
            class: None,
            resources: vec![resource],
        });
    }

    Assembly { rows, diagnostics }
}
