// cargo watch -x 'fmt' -x 'run'

pub mod aws;
pub mod config;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;

use aws::{read_scan_cache, AwsCli};
use config::{AuditConfig, OutputFormat};
use models::ScanSnapshot;
use output::{report_tables, CsvSink, ReportSink, XlsxSink};
use processing::Report;
use std::collections::HashSet;
use std::error::Error;

/// Snapshot of the account: from the cache file, or scanned with the AWS CLI.
///
/// # Arguments
/// * `config` - `cache_file` selects a specific snapshot, `aws_bin` the CLI
pub fn get_scan_snapshot(config: &AuditConfig) -> Result<ScanSnapshot, Box<dyn Error>> {
    let lister = AwsCli::new(&config.aws_bin);
    read_scan_cache(config.cache_file.as_deref(), &lister, config)
}

/// Return an error if a region holds the same VPC or subnet id twice.
pub fn check_for_duplicate_ids(snapshot: &ScanSnapshot) -> Result<(), Box<dyn Error>> {
    for region in &snapshot.regions {
        let mut seen = HashSet::new();
        for scan in &region.networks {
            if !seen.insert(scan.network.id.as_str()) {
                return Err(format!("Duplicate VPC {} in {}", scan.network.id, region.region).into());
            }
            for subnet in &scan.subnets {
                if !seen.insert(subnet.id.as_str()) {
                    return Err(
                        format!("Duplicate subnet {} in {}", subnet.id, region.region).into(),
                    );
                }
            }
        }
    }
    Ok(())
}

/// Write the report tables in the configured format.
pub fn write_report(report: &Report, config: &AuditConfig) -> Result<(), Box<dyn Error>> {
    let tables = report_tables(report);
    log::info!(
        "#Start write_report() format={:?} tables={}",
        config.output_format,
        tables.len()
    );
    match config.output_format {
        OutputFormat::Xlsx => XlsxSink::new(&config.output_file).write_tables(&tables),
        OutputFormat::Csv => CsvSink::stdout().write_tables(&tables),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Ipv4, Network, NetworkScan, RegionScan, Subnet};

    fn region_with(network_ids: &[&str], subnet_ids: &[&str]) -> RegionScan {
        let mut region = RegionScan::new("us-east-1");
        for id in network_ids {
            region.networks.push(NetworkScan {
                network: Network::new(id, "us-east-1", Ipv4::new("10.0.0.0/16").unwrap()),
                route_tables: vec![],
                subnets: subnet_ids
                    .iter()
                    .map(|s| Subnet::new(s, id, None, "us-east-1a"))
                    .collect(),
            });
        }
        region
    }

    #[test]
    fn test_check_for_duplicate_ids() {
        let ok = ScanSnapshot {
            regions: vec![region_with(&["vpc-1"], &["subnet-a", "subnet-b"])],
            ..Default::default()
        };
        assert!(check_for_duplicate_ids(&ok).is_ok());

        let dup = ScanSnapshot {
            regions: vec![region_with(&["vpc-1", "vpc-2"], &["subnet-a"])],
            ..Default::default()
        };
        let err = check_for_duplicate_ids(&dup).unwrap_err();
        assert_eq!(err.to_string(), "Duplicate subnet subnet-a in us-east-1");
    }

    #[test]
    fn test_same_ids_in_other_regions_are_fine() {
        let mut other = region_with(&["vpc-1"], &["subnet-a"]);
        other.region = "eu-west-1".to_string();
        let snapshot = ScanSnapshot {
            regions: vec![region_with(&["vpc-1"], &["subnet-a"]), other],
            ..Default::default()
        };
        assert!(check_for_duplicate_ids(&snapshot).is_ok());
    }
}
