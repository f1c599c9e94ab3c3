//! Where scanned resources come from.
//!
//! [`ResourceLister`] is the seam between the scanner and the account; the
//! [`AwsCli`] implementation shells out to the `aws` CLI, tests use fakes.

use super::cli::run_json;
use super::describe::{
    DescribeClassicLoadBalancers, DescribeDbInstances, DescribeInstances,
    DescribeLoadBalancers, DescribeNetworkInterfaces, DescribeRegions, DescribeRouteTables,
    DescribeSubnets, DescribeTargetGroups, DescribeVpcs, ListFunctions, RouteTableItem,
    SubnetItem,
};
use super::services::{map_items, ServiceScan, GLOBAL_REGION, GLOBAL_SERVICES, REGIONAL_SERVICES};
use crate::models::{AttachedResource, Network, ResourceKind, RouteTable, ServiceRecord, Subnet};
use serde_json::Value;
use std::error::Error;

/// Read-only view of an AWS account.
///
/// Every call is independent; a failing call says nothing about the others.
pub trait ResourceLister {
    /// Regions enabled for the account.
    fn regions(&self) -> Result<Vec<String>, Box<dyn Error>>;

    fn networks(&self, region: &str) -> Result<Vec<Network>, Box<dyn Error>>;

    fn route_tables(&self, region: &str, network_id: &str)
        -> Result<Vec<RouteTable>, Box<dyn Error>>;

    fn subnets(&self, region: &str, network_id: &str) -> Result<Vec<Subnet>, Box<dyn Error>>;

    /// Resources of one kind across every VPC of the region.
    fn resources(
        &self,
        region: &str,
        kind: ResourceKind,
    ) -> Result<Vec<AttachedResource>, Box<dyn Error>>;

    /// Regional services that are not placed in a VPC.
    fn regional_services(&self, region: &str) -> Result<Vec<ServiceRecord>, Box<dyn Error>>;

    /// Account-wide resources, labelled with region `Global`.
    fn global_resources(&self) -> Result<Vec<ServiceRecord>, Box<dyn Error>>;
}

/// [`ResourceLister`] backed by the AWS CLI.
///
/// Credentials, profile and pagination are left to the CLI itself.
#[derive(Debug, Clone)]
pub struct AwsCli {
    /// Executable to run, `aws` unless configured otherwise.
    pub bin: String,
}

impl AwsCli {
    pub fn new(bin: &str) -> AwsCli {
        AwsCli {
            bin: bin.to_string(),
        }
    }

    fn command(&self, args: &str, region: Option<&str>) -> String {
        match region {
            Some(region) => format!("{} {args} --region {region} --output json", self.bin),
            None => format!("{} {args} --output json", self.bin),
        }
    }

    fn service_records(
        &self,
        scan: &ServiceScan,
        region: Option<&str>,
        label: &str,
    ) -> Result<Vec<ServiceRecord>, Box<dyn Error>> {
        let response: Value = run_json(&self.command(scan.command, region))?;
        Ok(map_items(scan, label, &response))
    }

    fn load_balancers(&self, region: &str) -> Result<Vec<AttachedResource>, Box<dyn Error>> {
        let described: DescribeLoadBalancers =
            run_json(&self.command("elbv2 describe-load-balancers", Some(region)))?;

        let mut resources = Vec::new();
        for lb in described.load_balancers {
            let args = format!(
                "elbv2 describe-target-groups --load-balancer-arn {}",
                lb.load_balancer_arn
            );
            let listed: Result<DescribeTargetGroups, _> =
                run_json(&self.command(&args, Some(region)));
            let target_groups = match listed {
                Ok(groups) => Some(
                    groups
                        .target_groups
                        .into_iter()
                        .map(|g| g.target_group_name)
                        .collect(),
                ),
                Err(e) => {
                    log::warn!("{region}: target groups of {}: {e}", lb.load_balancer_name);
                    None
                }
            };
            resources.push(lb.into_resource(target_groups));
        }

        match run_json::<DescribeClassicLoadBalancers>(
            &self.command("elb describe-load-balancers", Some(region)),
        ) {
            Ok(classic) => resources.extend(classic.into_resources()),
            Err(e) => log::warn!("{region}: classic load balancers: {e}"),
        }
        Ok(resources)
    }
}

impl ResourceLister for AwsCli {
    fn regions(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let described: DescribeRegions = run_json(&self.command("ec2 describe-regions", None))?;
        Ok(described
            .regions
            .into_iter()
            .map(|r| r.region_name)
            .collect())
    }

    fn networks(&self, region: &str) -> Result<Vec<Network>, Box<dyn Error>> {
        let described: DescribeVpcs = run_json(&self.command("ec2 describe-vpcs", Some(region)))?;
        Ok(described
            .vpcs
            .into_iter()
            .map(|vpc| vpc.into_network(region))
            .collect())
    }

    fn route_tables(
        &self,
        region: &str,
        network_id: &str,
    ) -> Result<Vec<RouteTable>, Box<dyn Error>> {
        let args = format!("ec2 describe-route-tables --filters Name=vpc-id,Values={network_id}");
        let described: DescribeRouteTables = run_json(&self.command(&args, Some(region)))?;
        Ok(described
            .route_tables
            .into_iter()
            .map(RouteTableItem::into_route_table)
            .collect())
    }

    fn subnets(&self, region: &str, network_id: &str) -> Result<Vec<Subnet>, Box<dyn Error>> {
        let args = format!("ec2 describe-subnets --filters Name=vpc-id,Values={network_id}");
        let described: DescribeSubnets = run_json(&self.command(&args, Some(region)))?;
        Ok(described
            .subnets
            .into_iter()
            .map(SubnetItem::into_subnet)
            .collect())
    }

    fn resources(
        &self,
        region: &str,
        kind: ResourceKind,
    ) -> Result<Vec<AttachedResource>, Box<dyn Error>> {
        let scoped = Some(region);
        match kind {
            ResourceKind::ComputeInstance => {
                let described: DescribeInstances =
                    run_json(&self.command("ec2 describe-instances", scoped))?;
                Ok(described.into_resources())
            }
            ResourceKind::ManagedDatabase => {
                let described: DescribeDbInstances =
                    run_json(&self.command("rds describe-db-instances", scoped))?;
                Ok(described.into_resources())
            }
            ResourceKind::ServerlessFunction => {
                let listed: ListFunctions = run_json(&self.command("lambda list-functions", scoped))?;
                Ok(listed.into_resources())
            }
            ResourceKind::LoadBalancer => self.load_balancers(region),
            ResourceKind::NetworkInterface => {
                let described: DescribeNetworkInterfaces =
                    run_json(&self.command("ec2 describe-network-interfaces", scoped))?;
                Ok(described.into_resources())
            }
        }
    }

    fn regional_services(&self, region: &str) -> Result<Vec<ServiceRecord>, Box<dyn Error>> {
        let mut records = Vec::new();
        for scan in REGIONAL_SERVICES {
            match self.service_records(scan, Some(region), region) {
                Ok(found) => records.extend(found),
                Err(e) => log::warn!("{region}: {} scan failed: {e}", scan.service),
            }
        }
        Ok(records)
    }

    fn global_resources(&self) -> Result<Vec<ServiceRecord>, Box<dyn Error>> {
        let mut records = Vec::new();
        for scan in GLOBAL_SERVICES {
            match self.service_records(scan, scan.region, GLOBAL_REGION) {
                Ok(found) => records.extend(found),
                Err(e) => log::warn!("{} scan failed: {e}", scan.service),
            }
        }
        Ok(records)
    }
}
