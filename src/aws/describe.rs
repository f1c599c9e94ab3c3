//! JSON shapes of the AWS CLI `describe-*` / `list-*` responses, and their
//! conversion into the domain models.
//!
//! Only the fields the report needs are declared; everything else is ignored.

use crate::models::{
    AttachedResource, Association, Ipv4, Network, ResourceKind, Route, RouteTable, Subnet,
};
use crate::processing::infer_interface_type;
use serde::Deserialize;

/// Key/value tag attached to most EC2 resources.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// Value of the `Name` tag, if present and not blank.
pub fn name_tag(tags: &[Tag]) -> Option<String> {
    tags.iter()
        .find(|t| t.key == "Name")
        .map(|t| t.value.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn dash_if_empty(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

// ---------------------------------------------------------------- regions

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeRegions {
    #[serde(default)]
    pub regions: Vec<RegionItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct RegionItem {
    pub region_name: String,
}

// ------------------------------------------------------------------- vpcs

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeVpcs {
    #[serde(default)]
    pub vpcs: Vec<VpcItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct VpcItem {
    pub vpc_id: String,
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub cidr_block_association_set: Vec<CidrBlockAssociation>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct CidrBlockAssociation {
    pub cidr_block: String,
    pub cidr_block_state: Option<CidrBlockState>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct CidrBlockState {
    pub state: String,
}

impl VpcItem {
    pub fn into_network(self, region: &str) -> Network {
        let mut cidrs: Vec<Ipv4> = Vec::new();
        let associated = self
            .cidr_block_association_set
            .iter()
            .filter(|a| {
                a.cidr_block_state
                    .as_ref()
                    .map(|s| s.state == "associated")
                    .unwrap_or(true)
            })
            .map(|a| a.cidr_block.as_str());
        for block in self.cidr_block.as_deref().into_iter().chain(associated) {
            match Ipv4::new(block) {
                Ok(cidr) if !cidrs.contains(&cidr) => cidrs.push(cidr),
                Ok(_) => {}
                Err(e) => log::warn!("{}: ignoring CIDR '{block}': {e}", self.vpc_id),
            }
        }
        Network {
            name: name_tag(&self.tags),
            id: self.vpc_id,
            region: region.to_string(),
            cidrs,
        }
    }
}

// ---------------------------------------------------------------- subnets

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeSubnets {
    #[serde(default)]
    pub subnets: Vec<SubnetItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetItem {
    pub subnet_id: String,
    pub vpc_id: String,
    pub cidr_block: Option<String>,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl SubnetItem {
    pub fn into_subnet(self) -> Subnet {
        let cidr = self.cidr_block.as_deref().and_then(|block| {
            Ipv4::new(block)
                .map_err(|e| log::warn!("{}: ignoring CIDR '{block}': {e}", self.subnet_id))
                .ok()
        });
        Subnet {
            name: name_tag(&self.tags),
            id: self.subnet_id,
            cidr,
            availability_zone: self.availability_zone,
            network_id: self.vpc_id,
        }
    }
}

// ----------------------------------------------------------- route tables

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeRouteTables {
    #[serde(default)]
    pub route_tables: Vec<RouteTableItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTableItem {
    pub route_table_id: String,
    pub vpc_id: String,
    #[serde(default)]
    pub routes: Vec<RouteItem>,
    #[serde(default)]
    pub associations: Vec<AssociationItem>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct RouteItem {
    pub destination_cidr_block: Option<String>,
    pub gateway_id: Option<String>,
    pub nat_gateway_id: Option<String>,
    pub transit_gateway_id: Option<String>,
    pub vpc_peering_connection_id: Option<String>,
    pub egress_only_internet_gateway_id: Option<String>,
    pub network_interface_id: Option<String>,
    pub instance_id: Option<String>,
    pub local_gateway_id: Option<String>,
    pub carrier_gateway_id: Option<String>,
}

impl RouteItem {
    /// First target id present; the CLI only fills in the one in use.
    fn target(&self) -> Option<String> {
        [
            &self.gateway_id,
            &self.nat_gateway_id,
            &self.transit_gateway_id,
            &self.vpc_peering_connection_id,
            &self.egress_only_internet_gateway_id,
            &self.network_interface_id,
            &self.instance_id,
            &self.local_gateway_id,
            &self.carrier_gateway_id,
        ]
        .into_iter()
        .find_map(|t| t.clone())
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct AssociationItem {
    #[serde(default)]
    pub main: bool,
    pub subnet_id: Option<String>,
}

impl RouteTableItem {
    pub fn into_route_table(self) -> RouteTable {
        RouteTable {
            id: self.route_table_id,
            network_id: self.vpc_id,
            routes: self
                .routes
                .iter()
                .map(|r| Route {
                    destination: r.destination_cidr_block.clone(),
                    gateway: r.target(),
                })
                .collect(),
            associations: self
                .associations
                .into_iter()
                // Edge associations (gateway route tables) name neither.
                .filter(|a| a.main || a.subnet_id.is_some())
                .map(|a| Association {
                    main: a.main,
                    subnet_id: a.subnet_id,
                })
                .collect(),
        }
    }
}

// -------------------------------------------------------------- instances

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeInstances {
    #[serde(default)]
    pub reservations: Vec<Reservation>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct Reservation {
    #[serde(default)]
    pub instances: Vec<InstanceItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceItem {
    pub instance_id: String,
    #[serde(default)]
    pub instance_type: String,
    pub private_ip_address: Option<String>,
    pub public_ip_address: Option<String>,
    pub state: Option<InstanceState>,
    pub subnet_id: Option<String>,
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub block_device_mappings: Vec<BlockDeviceMapping>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceState {
    pub name: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct BlockDeviceMapping {
    pub ebs: Option<EbsDevice>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct EbsDevice {
    pub volume_id: String,
}

impl DescribeInstances {
    /// Instances placed in a VPC. Terminated instances have no subnet and are dropped.
    pub fn into_resources(self) -> Vec<AttachedResource> {
        self.reservations
            .into_iter()
            .flat_map(|r| r.instances)
            .filter_map(InstanceItem::into_resource)
            .collect()
    }
}

impl InstanceItem {
    fn into_resource(self) -> Option<AttachedResource> {
        let subnet_id = self.subnet_id.clone()?;
        let volumes: Vec<String> = self
            .block_device_mappings
            .iter()
            .filter_map(|m| m.ebs.as_ref().map(|e| e.volume_id.clone()))
            .collect();
        let mut resource = AttachedResource::new(&self.instance_id, ResourceKind::ComputeInstance)
            .in_subnet(&subnet_id)
            .with_detail("Instance Name", name_tag(&self.tags).unwrap_or_default())
            .with_detail("Instance Type", self.instance_type.clone())
            .with_detail("Private IP", dash_if_empty(self.private_ip_address.as_deref()))
            .with_detail("Public IP", dash_if_empty(self.public_ip_address.as_deref()))
            .with_detail(
                "State",
                dash_if_empty(self.state.as_ref().map(|s| s.name.as_str())),
            )
            .with_detail("EBS Volumes", join_or_dash(&volumes));
        resource.network_id = self.vpc_id;
        Some(resource)
    }
}

// -------------------------------------------------------------- functions

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ListFunctions {
    #[serde(default)]
    pub functions: Vec<FunctionItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionItem {
    pub function_name: String,
    #[serde(default)]
    pub function_arn: String,
    pub runtime: Option<String>,
    pub vpc_config: Option<VpcConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct VpcConfig {
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}

impl ListFunctions {
    /// Functions connected to a VPC; others have an empty `VpcId`.
    pub fn into_resources(self) -> Vec<AttachedResource> {
        self.functions
            .into_iter()
            .filter_map(|f| {
                let vpc = f.vpc_config?;
                let vpc_id = vpc.vpc_id.filter(|id| !id.is_empty())?;
                let mut resource =
                    AttachedResource::new(&f.function_name, ResourceKind::ServerlessFunction)
                        .in_network(&vpc_id)
                        .with_detail("Lambda Function ARN", f.function_arn)
                        .with_detail("Runtime", dash_if_empty(f.runtime.as_deref()))
                        .with_detail("Security Group IDs", join_or_dash(&vpc.security_group_ids));
                resource.subnet_ids = vpc.subnet_ids;
                Some(resource)
            })
            .collect()
    }
}

// -------------------------------------------------------------- databases

#[derive(Deserialize, Debug, Default)]
pub struct DescribeDbInstances {
    #[serde(rename = "DBInstances", default)]
    pub db_instances: Vec<DbInstanceItem>,
}

#[derive(Deserialize, Debug)]
pub struct DbInstanceItem {
    #[serde(rename = "DBInstanceIdentifier")]
    pub identifier: String,
    #[serde(rename = "DBInstanceArn", default)]
    pub arn: String,
    #[serde(rename = "Engine", default)]
    pub engine: String,
    #[serde(rename = "DBInstanceClass", default)]
    pub class: String,
    #[serde(rename = "MultiAZ", default)]
    pub multi_az: bool,
    #[serde(rename = "AvailabilityZone")]
    pub availability_zone: Option<String>,
    #[serde(rename = "DBSubnetGroup")]
    pub subnet_group: Option<DbSubnetGroup>,
}

#[derive(Deserialize, Debug)]
pub struct DbSubnetGroup {
    #[serde(rename = "VpcId")]
    pub vpc_id: Option<String>,
    #[serde(rename = "Subnets", default)]
    pub subnets: Vec<DbSubnet>,
}

#[derive(Deserialize, Debug)]
pub struct DbSubnet {
    #[serde(rename = "SubnetIdentifier")]
    pub subnet_identifier: String,
    #[serde(rename = "SubnetAvailabilityZone")]
    pub availability_zone: Option<DbAvailabilityZone>,
}

#[derive(Deserialize, Debug)]
pub struct DbAvailabilityZone {
    #[serde(rename = "Name")]
    pub name: String,
}

impl DescribeDbInstances {
    /// Databases in a VPC, placed in the subnet-group subnet of their zone.
    ///
    /// Multi-AZ instances and instances whose zone matches no subnet of the
    /// group stay at VPC level.
    pub fn into_resources(self) -> Vec<AttachedResource> {
        self.db_instances
            .into_iter()
            .filter_map(|db| {
                let group = db.subnet_group?;
                let vpc_id = group.vpc_id.filter(|id| !id.is_empty())?;
                let mut resource =
                    AttachedResource::new(&db.identifier, ResourceKind::ManagedDatabase)
                        .in_network(&vpc_id)
                        .with_detail("DB Instance ARN", db.arn)
                        .with_detail("Engine", db.engine)
                        .with_detail("DB Instance Class", db.class)
                        .with_detail("Multi-AZ", db.multi_az.to_string());
                if !db.multi_az {
                    if let Some(zone) = db.availability_zone.as_deref() {
                        resource.subnet_ids = group
                            .subnets
                            .iter()
                            .filter(|s| {
                                s.availability_zone.as_ref().map(|z| z.name.as_str()) == Some(zone)
                            })
                            .map(|s| s.subnet_identifier.clone())
                            .collect();
                    }
                }
                Some(resource)
            })
            .collect()
    }
}

// --------------------------------------------------------- load balancers

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeLoadBalancers {
    #[serde(default)]
    pub load_balancers: Vec<LoadBalancerItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancerItem {
    pub load_balancer_arn: String,
    pub load_balancer_name: String,
    #[serde(rename = "Type", default)]
    pub lb_type: String,
    #[serde(default)]
    pub scheme: String,
    #[serde(rename = "DNSName", default)]
    pub dns_name: String,
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub availability_zones: Vec<LoadBalancerZone>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancerZone {
    pub subnet_id: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeTargetGroups {
    #[serde(default)]
    pub target_groups: Vec<TargetGroupItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct TargetGroupItem {
    pub target_group_name: String,
}

impl LoadBalancerItem {
    /// `target_groups` is `None` when they could not be listed.
    pub fn into_resource(self, target_groups: Option<Vec<String>>) -> AttachedResource {
        let targets = match target_groups {
            Some(names) => join_or_dash(&names),
            None => "-".to_string(),
        };
        let mut resource =
            AttachedResource::new(&self.load_balancer_name, ResourceKind::LoadBalancer)
                .with_detail("Service", "Load Balancer")
                .with_detail("Type", self.lb_type)
                .with_detail("Scheme", self.scheme)
                .with_detail("DNS", self.dns_name)
                .with_detail("Targets", targets);
        resource.network_id = self.vpc_id;
        resource.subnet_ids = self
            .availability_zones
            .into_iter()
            .filter_map(|z| z.subnet_id)
            .collect();
        resource
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeClassicLoadBalancers {
    #[serde(default)]
    pub load_balancer_descriptions: Vec<ClassicLoadBalancerItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct ClassicLoadBalancerItem {
    pub load_balancer_name: String,
    #[serde(default)]
    pub scheme: String,
    #[serde(rename = "DNSName", default)]
    pub dns_name: String,
    #[serde(rename = "VPCId")]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub subnets: Vec<String>,
    #[serde(default)]
    pub instances: Vec<ClassicInstance>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct ClassicInstance {
    pub instance_id: String,
}

impl DescribeClassicLoadBalancers {
    pub fn into_resources(self) -> Vec<AttachedResource> {
        self.load_balancer_descriptions
            .into_iter()
            .map(|lb| {
                let instances: Vec<String> =
                    lb.instances.into_iter().map(|i| i.instance_id).collect();
                let mut resource =
                    AttachedResource::new(&lb.load_balancer_name, ResourceKind::LoadBalancer)
                        .with_detail("Service", "Classic Load Balancer")
                        .with_detail("Type", "classic")
                        .with_detail("Scheme", lb.scheme)
                        .with_detail("DNS", lb.dns_name)
                        .with_detail("Targets", join_or_dash(&instances));
                resource.network_id = lb.vpc_id;
                resource.subnet_ids = lb.subnets;
                resource
            })
            .collect()
    }
}

// ----------------------------------------------------- network interfaces

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeNetworkInterfaces {
    #[serde(default)]
    pub network_interfaces: Vec<NetworkInterfaceItem>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkInterfaceItem {
    pub network_interface_id: String,
    pub subnet_id: Option<String>,
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub private_ip_addresses: Vec<PrivateIpAddress>,
    pub attachment: Option<InterfaceAttachment>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct PrivateIpAddress {
    pub private_ip_address: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct InterfaceAttachment {
    pub instance_id: Option<String>,
}

impl DescribeNetworkInterfaces {
    pub fn into_resources(self) -> Vec<AttachedResource> {
        self.network_interfaces
            .into_iter()
            .map(|eni| {
                let instance_id = eni.attachment.and_then(|a| a.instance_id);
                let ips: Vec<String> = eni
                    .private_ip_addresses
                    .into_iter()
                    .map(|ip| ip.private_ip_address)
                    .collect();
                let mut resource =
                    AttachedResource::new(&eni.network_interface_id, ResourceKind::NetworkInterface)
                        .with_detail(
                            "Resource Type",
                            infer_interface_type(&eni.description, instance_id.as_deref()),
                        )
                        .with_detail("Status", eni.status)
                        .with_detail("Private IPs", join_or_dash(&ips))
                        .with_detail("Attached Instance", dash_if_empty(instance_id.as_deref()))
                        .with_detail("Description", eni.description);
                resource.network_id = eni.vpc_id;
                resource.subnet_ids = eni.subnet_id.into_iter().collect();
                resource
            })
            .collect()
    }
}
