//! Classify every VPC of a scan and join its resources.

use super::{assemble_rows, classify_network, Classification, Diagnostic, TopologyRow};
use crate::models::{AttachedResource, Network, Reachability, ResourceKind, ScanSnapshot};
use std::collections::{HashMap, HashSet};

/// Interface types already covered by their own resource kind.
const ATTRIBUTED_INTERFACE_TYPES: &[&str] = &[
    "EC2 Instance",
    "RDS Instance",
    "Lambda Function",
    "Load Balancer",
];

/// A diagnostic together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedDiagnostic {
    pub region: String,
    pub network_id: String,
    pub diagnostic: Diagnostic,
}

/// Classification and topology rows of one VPC.
#[derive(Debug)]
pub struct NetworkReport<'a> {
    pub region: &'a str,
    pub network: &'a Network,
    pub classification: Classification,
    pub rows: Vec<TopologyRow<'a>>,
}

/// Everything the sheets are built from.
#[derive(Debug)]
pub struct Report<'a> {
    pub snapshot: &'a ScanSnapshot,
    pub networks: Vec<NetworkReport<'a>>,
    pub diagnostics: Vec<LocatedDiagnostic>,
    /// region -> subnet id -> class
    classes: HashMap<&'a str, HashMap<&'a str, Reachability>>,
}

impl<'a> Report<'a> {
    /// Class of a subnet in a region, if the subnet was scanned.
    pub fn subnet_class(&self, region: &str, subnet_id: &str) -> Option<Reachability> {
        self.classes
            .get(region)
            .and_then(|subnets| subnets.get(subnet_id))
            .copied()
    }

    /// Total (public, private, implicit) subnet counts.
    pub fn class_counts(&self) -> (usize, usize, usize) {
        self.networks.iter().fold((0, 0, 0), |acc, n| {
            let (p, q, r) = n.classification.counts();
            (acc.0 + p, acc.1 + q, acc.2 + r)
        })
    }

    /// All resources of one kind, with their region, in scan order.
    pub fn resources_of(&self, kind: ResourceKind) -> Vec<(&'a str, &'a AttachedResource)> {
        let snapshot: &'a ScanSnapshot = self.snapshot;
        snapshot
            .regions
            .iter()
            .flat_map(|region| {
                region
                    .resources
                    .iter()
                    .filter(move |r| r.kind == kind)
                    .map(move |r| (region.region.as_str(), r))
            })
            .collect()
    }
}

/// (subnet id, type label) of every non-interface resource placed in a subnet.
fn placed_owners(resources: &[AttachedResource]) -> HashSet<(&str, String)> {
    resources
        .iter()
        .filter(|r| r.kind != ResourceKind::NetworkInterface)
        .flat_map(|r| {
            let label = r.kind.to_string();
            r.subnet_ids
                .iter()
                .map(move |subnet_id| (subnet_id.as_str(), label.clone()))
        })
        .collect()
}

/// True if the resource should be joined into the topology sheet.
///
/// An interface that belongs to an instance, database, function or load
/// balancer is left out only when a resource of that kind already sits in
/// each of its subnets. A Multi-AZ database is placed at VPC level, so its
/// interface still marks the subnet it lives in.
fn joins_topology(resource: &AttachedResource, owners: &HashSet<(&str, String)>) -> bool {
    if resource.kind != ResourceKind::NetworkInterface {
        return true;
    }
    let label = resource.type_label();
    if !ATTRIBUTED_INTERFACE_TYPES.contains(&label.as_str()) {
        return true;
    }
    resource
        .subnet_ids
        .iter()
        .any(|subnet_id| !owners.contains(&(subnet_id.as_str(), label.clone())))
}

/// Classify and assemble every VPC in the snapshot.
pub fn build_report(snapshot: &ScanSnapshot) -> Report<'_> {
    log::info!(
        "#Start build_report() regions={} vpcs={} subnets={} resources={}",
        snapshot.regions.len(),
        snapshot.network_count(),
        snapshot.subnet_count(),
        snapshot.resource_count()
    );

    let mut networks = Vec::new();
    let mut diagnostics = Vec::new();
    let mut classes = HashMap::new();

    for region in &snapshot.regions {
        let owners = placed_owners(&region.resources);
        let joinable: Vec<&AttachedResource> = region
            .resources
            .iter()
            .filter(|r| joins_topology(r, &owners))
            .collect();

        for scan in &region.networks {
            let classification =
                classify_network(&scan.network, &scan.route_tables, &scan.subnets);
            let classified = classification.classified(&scan.subnets);
            let assembly = assemble_rows(&scan.network, &classified, joinable.iter().copied());

            for subnet in &scan.subnets {
                if let Some(class) = classification.get(&subnet.id) {
                    classes
                        .entry(region.region.as_str())
                        .or_insert_with(HashMap::new)
                        .insert(subnet.id.as_str(), class);
                }
            }

            for diagnostic in classification
                .diagnostics
                .iter()
                .chain(assembly.diagnostics.iter())
            {
                log::warn!(
                    "{region} {vpc}: {diagnostic}",
                    region = region.region,
                    vpc = scan.network.id
                );
                diagnostics.push(LocatedDiagnostic {
                    region: region.region.clone(),
                    network_id: scan.network.id.clone(),
                    diagnostic: diagnostic.clone(),
                });
            }

            log::debug!(
                "{} {} -> {} topology rows",
                region.region,
                scan.network.id,
                assembly.rows.len()
            );

            networks.push(NetworkReport {
                region: &region.region,
                network: &scan.network,
                classification,
                rows: assembly.rows,
            });
        }
    }

    Report {
        snapshot,
        networks,
        diagnostics,
        classes,
    }
}
