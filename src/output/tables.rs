//! Turn a [`Report`] into the sheets of the workbook.

use super::table::Table;
use crate::models::{AttachedResource, ResourceKind, ServiceRecord};
use crate::processing::{Report, TopologyRow};
use itertools::Itertools;

pub const TOPOLOGY_SHEET: &str = "VPC Topology";
pub const REGIONAL_SERVICES_SHEET: &str = "Regional Services";
pub const GLOBAL_RESOURCES_SHEET: &str = "Global Resources";
pub const DIAGNOSTICS_SHEET: &str = "Diagnostics";

const TOPOLOGY_COLUMNS: &[&str] = &[
    "Region",
    "VPC ID",
    "VPC Name",
    "VPC CIDR",
    "Subnet ID",
    "Subnet Name",
    "Subnet CIDR",
    "Subnet AZ",
    "Subnet Type",
    "Usable Hosts",
    "Row Type",
    "Resource Count",
    "Resource Types",
    "Resource IDs",
];

const SERVICE_COLUMNS: &[&str] = &["Region", "Category", "Service", "Name/ID", "Details"];

const DIAGNOSTIC_COLUMNS: &[&str] = &["Region", "VPC ID", "Condition", "Subject", "Message"];

/// Sheet order of the per-kind inventories.
const INVENTORY_ORDER: [ResourceKind; 5] = [
    ResourceKind::ComputeInstance,
    ResourceKind::ServerlessFunction,
    ResourceKind::LoadBalancer,
    ResourceKind::ManagedDatabase,
    ResourceKind::NetworkInterface,
];

fn dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn topology_row(region: &str, row: &TopologyRow) -> Vec<String> {
    let network = row.network;
    let (subnet_id, subnet_name, subnet_cidr, subnet_az, hosts) = match row.subnet {
        Some(subnet) => (
            subnet.id.clone(),
            subnet.display_name().to_string(),
            subnet.cidr.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
            dash(&subnet.availability_zone),
            subnet
                .cidr
                .and_then(|c| c.usable_hosts())
                .map(|h| h.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        None => (
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
        ),
    };
    let (types, ids) = if row.resources.is_empty() {
        ("-".to_string(), "-".to_string())
    } else {
        (
            row.resources.iter().map(|r| r.type_label()).unique().join(", "),
            row.resources.iter().map(|r| r.id.as_str()).join(", "),
        )
    };

    vec![
        region.to_string(),
        network.id.clone(),
        network.display_name().to_string(),
        dash(&network.cidrs_to_string()),
        subnet_id,
        subnet_name,
        subnet_cidr,
        subnet_az,
        row.class.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
        hosts,
        row.kind.to_string(),
        row.resources.len().to_string(),
        types,
        ids,
    ]
}

/// The topology sheet: every assembled row of every VPC, in scan order.
pub fn topology_table(report: &Report) -> Table {
    let mut table = Table::new(TOPOLOGY_SHEET, TOPOLOGY_COLUMNS);
    for network in &report.networks {
        for row in &network.rows {
            table.push_row(topology_row(network.region, row));
        }
    }
    table
}

/// Subnet type of a resource: the distinct classes of its subnets.
fn resource_subnet_type(report: &Report, region: &str, resource: &AttachedResource) -> String {
    let classes = resource
        .subnet_ids
        .iter()
        .filter_map(|id| report.subnet_class(region, id))
        .map(|c| c.to_string())
        .unique()
        .join(", ");
    dash(&classes)
}

/// Inventory sheet of one resource kind.
pub fn inventory_table(report: &Report, kind: ResourceKind) -> Table {
    let mut columns = vec!["Region", "VPC ID", kind.id_column(), "Subnet IDs", "Subnet Type"];
    columns.extend(kind.detail_columns());
    let mut table = Table::new(kind.sheet_name(), &columns);

    for (region, resource) in report.resources_of(kind) {
        let mut row = vec![
            region.to_string(),
            dash(resource.network_id.as_deref().unwrap_or_default()),
            resource.id.clone(),
            dash(&resource.subnet_ids.join(", ")),
            resource_subnet_type(report, region, resource),
        ];
        row.extend(
            kind.detail_columns()
                .iter()
                .map(|col| resource.detail(col).to_string()),
        );
        table.push_row(row);
    }
    table
}

fn service_table<'a, I>(name: &str, records: I) -> Table
where
    I: IntoIterator<Item = &'a ServiceRecord>,
{
    let mut table = Table::new(name, SERVICE_COLUMNS);
    for record in records {
        table.push_row(vec![
            record.region.clone(),
            record.category.clone(),
            record.service.clone(),
            dash(&record.name),
            dash(&record.details),
        ]);
    }
    table
}

pub fn diagnostics_table(report: &Report) -> Table {
    let mut table = Table::new(DIAGNOSTICS_SHEET, DIAGNOSTIC_COLUMNS);
    for located in &report.diagnostics {
        table.push_row(vec![
            located.region.clone(),
            located.network_id.clone(),
            located.diagnostic.condition().to_string(),
            located.diagnostic.subject().to_string(),
            located.diagnostic.to_string(),
        ]);
    }
    table
}

/// All sheets of the report, in workbook order.
///
/// Every table is produced even when it has no rows, so the workbook
/// layout does not depend on what the account contains.
pub fn report_tables(report: &Report) -> Vec<Table> {
    let mut tables = vec![topology_table(report)];
    tables.extend(INVENTORY_ORDER.iter().map(|kind| inventory_table(report, *kind)));
    tables.push(service_table(
        REGIONAL_SERVICES_SHEET,
        report.snapshot.regions.iter().flat_map(|r| &r.services),
    ));
    tables.push(service_table(GLOBAL_RESOURCES_SHEET, &report.snapshot.global));
    tables.push(diagnostics_table(report));
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Association, Ipv4, Network, NetworkScan, RegionScan, RouteTable, ScanSnapshot, Subnet,
    };
    use crate::processing::build_report;

    fn snapshot() -> ScanSnapshot {
        let mut region = RegionScan::new("us-east-1");
        region.networks.push(NetworkScan {
            network: Network::new("vpc-1", "us-east-1", Ipv4::new("10.0.0.0/16").unwrap()),
            route_tables: vec![
                RouteTable::new("rtb-main", "vpc-1").with_association(Association::main()),
                RouteTable::new("rtb-pub", "vpc-1")
                    .with_route("0.0.0.0/0", "igw-1")
                    .with_association(Association::subnet("subnet-a")),
            ],
            subnets: vec![
                Subnet::new("subnet-a", "vpc-1", Ipv4::new("10.0.1.0/24").ok(), "us-east-1a"),
                Subnet::new("subnet-b", "vpc-1", Ipv4::new("10.0.2.0/24").ok(), "us-east-1b"),
            ],
        });
        region.networks.push(NetworkScan {
            network: Network::new("vpc-2", "us-east-1", Ipv4::new("10.9.0.0/16").unwrap()),
            route_tables: vec![],
            subnets: vec![],
        });
        region.resources = vec![
            AttachedResource::new("i-1", ResourceKind::ComputeInstance)
                .in_subnet("subnet-a")
                .in_network("vpc-1")
                .with_detail("Instance Type", "t3.micro"),
            AttachedResource::new("fn-1", ResourceKind::ServerlessFunction)
                .in_subnet("subnet-a")
                .in_subnet("subnet-b")
                .in_network("vpc-1"),
            AttachedResource::new("db-1", ResourceKind::ManagedDatabase).in_network("vpc-1"),
        ];
        region.services = vec![ServiceRecord {
            region: "us-east-1".to_string(),
            category: "Messaging".to_string(),
            service: "SQS Queue".to_string(),
            name: "orders".to_string(),
            details: "N/A".to_string(),
        }];
        ScanSnapshot {
            scanned_at: "now".to_string(),
            regions: vec![region],
            global: vec![],
        }
    }

    #[test]
    fn test_sheet_order_and_headers() {
        let snapshot = snapshot();
        let report = build_report(&snapshot);
        let tables = report_tables(&report);
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "VPC Topology",
                "Compute Resources",
                "Lambdas",
                "Load Balancers",
                "Database Resources",
                "Network Interfaces",
                "Regional Services",
                "Global Resources",
                "Diagnostics",
            ]
        );
        for table in &tables {
            assert!(table.rows.iter().all(|r| r.len() == table.columns.len()));
        }
        assert_eq!(
            tables[1].columns[..5],
            ["Region", "VPC ID", "Instance ID", "Subnet IDs", "Subnet Type"]
        );
    }

    #[test]
    fn test_topology_rows() {
        let snapshot = snapshot();
        let report = build_report(&snapshot);
        let table = topology_table(&report);

        // vpc-1: 2 subnets + db-1 at VPC level; vpc-2: one empty network row
        assert_eq!(table.len(), 4);
        let a = &table.rows[0];
        assert_eq!(a[4], "subnet-a");
        assert_eq!(a[8], "Public");
        assert_eq!(a[9], "251");
        assert_eq!(a[10], "Subnet");
        assert_eq!(a[11], "2");
        assert_eq!(a[12], "EC2 Instance, Lambda Function");
        assert_eq!(a[13], "i-1, fn-1");
        assert_eq!(table.rows[1][8], "Private");
        assert_eq!(table.rows[2][10], "No Subnet");
        assert_eq!(table.rows[2][13], "db-1");
        assert_eq!(table.rows[3][1], "vpc-2");
        assert_eq!(table.rows[3][10], "Empty Network");
        assert_eq!(table.rows[3][11], "0");
    }

    #[test]
    fn test_inventory_subnet_type() {
        let snapshot = snapshot();
        let report = build_report(&snapshot);

        let lambdas = inventory_table(&report, ResourceKind::ServerlessFunction);
        assert_eq!(lambdas.rows[0][3], "subnet-a, subnet-b");
        assert_eq!(lambdas.rows[0][4], "Public, Private");

        let compute = inventory_table(&report, ResourceKind::ComputeInstance);
        assert_eq!(compute.rows[0][5], "-"); // no Instance Name tag
        assert_eq!(compute.rows[0][6], "t3.micro");

        let dbs = inventory_table(&report, ResourceKind::ManagedDatabase);
        assert_eq!(dbs.rows[0][3], "-");
        assert_eq!(dbs.rows[0][4], "-");
    }

    #[test]
    fn test_services_and_diagnostics() {
        let snapshot = snapshot();
        let report = build_report(&snapshot);
        let tables = report_tables(&report);

        assert_eq!(tables[6].rows[0][3], "orders");
        assert!(tables[7].is_empty());
        // vpc-2 has no subnets, so no implicit subnets and no diagnostics
        assert!(tables[8].is_empty());
    }
}
