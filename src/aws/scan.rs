//! Walk the account region by region and collect a [`ScanSnapshot`].

use super::ResourceLister;
use crate::config::{AuditConfig, FALLBACK_REGION};
use crate::models::{NetworkScan, RegionScan, ResourceKind, ScanSnapshot};
use colored::Colorize;
use std::error::Error;

/// Keep the items of a successful call, log a failed one and go on empty.
fn or_empty<T>(what: &str, result: Result<Vec<T>, Box<dyn Error>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            log::warn!("{} {what}: {e}", "skipped".on_red());
            vec![]
        }
    }
}

/// Regions to scan: the configured list, else the account's active regions,
/// else [`FALLBACK_REGION`].
fn regions_to_scan(lister: &dyn ResourceLister, config: &AuditConfig) -> Vec<String> {
    if let Some(regions) = &config.regions {
        return regions.clone();
    }
    match lister.regions() {
        Ok(regions) if !regions.is_empty() => regions,
        Ok(_) => {
            log::warn!("No active regions returned, using {FALLBACK_REGION}");
            vec![FALLBACK_REGION.to_string()]
        }
        Err(e) => {
            log::warn!("Region discovery failed, using {FALLBACK_REGION}: {e}");
            vec![FALLBACK_REGION.to_string()]
        }
    }
}

/// Scan one region. Never fails; missing pieces are logged and left empty.
pub fn scan_region(lister: &dyn ResourceLister, region: &str) -> RegionScan {
    log::info!("Scanning region {}", region.on_blue());
    let mut scan = RegionScan::new(region);

    for network in or_empty(&format!("{region} networks"), lister.networks(region)) {
        let route_tables = or_empty(
            &format!("{region}/{} route tables", network.id),
            lister.route_tables(region, &network.id),
        );
        let subnets = or_empty(
            &format!("{region}/{} subnets", network.id),
            lister.subnets(region, &network.id),
        );
        log::debug!(
            "{region}/{}: {} route tables, {} subnets",
            network.id,
            route_tables.len(),
            subnets.len()
        );
        scan.networks.push(NetworkScan {
            network,
            route_tables,
            subnets,
        });
    }

    for kind in ResourceKind::ALL {
        let found = or_empty(&format!("{region} {kind}"), lister.resources(region, kind));
        log::debug!("{region}: {} x {kind}", found.len());
        scan.resources.extend(found);
    }

    scan.services = or_empty(
        &format!("{region} regional services"),
        lister.regional_services(region),
    );

    log::info!(
        "{region}: {} VPCs, {} subnets, {} resources, {} services",
        scan.networks.len(),
        scan.subnet_count(),
        scan.resources.len(),
        scan.services.len()
    );
    scan
}

/// Scan every region and, unless disabled, the global resources.
///
/// Strictly sequential: one region after the other, one call at a time.
///
/// # Arguments
/// * `lister` - Source of the account's resources
/// * `config` - Regions to scan and whether to skip global resources
/// * `scanned_at` - Timestamp recorded in the snapshot
pub fn scan_account(
    lister: &dyn ResourceLister,
    config: &AuditConfig,
    scanned_at: &str,
) -> ScanSnapshot {
    let regions = regions_to_scan(lister, config);
    log::info!("Scanning {} regions: {}", regions.len(), regions.join(","));

    let regions = regions
        .iter()
        .map(|region| scan_region(lister, region))
        .collect();

    let global = if config.skip_global {
        log::info!("Skipping global resources");
        vec![]
    } else {
        or_empty("global resources", lister.global_resources())
    };

    ScanSnapshot {
        scanned_at: scanned_at.to_string(),
        regions,
        global,
    }
}
