//! Cache management for scan snapshots.
//!
//! A full scan runs hundreds of CLI calls; the result is kept in a dated
//! JSON file and reused for the rest of the day.

use super::{scan_account, ResourceLister};
use crate::config::AuditConfig;
use crate::models::ScanSnapshot;
use std::error::Error;
use std::path::Path;

/// Default cache file name for the given date (`YYYY-MM-DD`).
pub fn default_cache_file(date: &str) -> String {
    format!("scan_cache_{date}.json")
}

/// Parse a snapshot from a cache file.
pub fn load_snapshot(cache_file: &str) -> Result<ScanSnapshot, Box<dyn Error>> {
    let json = std::fs::read_to_string(cache_file)
        .map_err(|e| format!("Error reading cache file {cache_file}: {e}"))?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing cache JSON {cache_file}: path={} error={}",
            e.path(),
            e
        )
        .into()
    })
}

/// Read the scan snapshot from cache, or scan the account and cache it.
///
/// # Arguments
/// * `cache_file` - Optional path to a specific cache file. If None, uses the
///   dated default, which is created when missing.
/// * `lister` - Used only when the cache has to be filled
/// * `config` - Scan settings and the time zone for the date and timestamp
///
/// # Returns
/// * `Ok(ScanSnapshot)` - The snapshot from cache or a fresh scan
/// * `Err` - If a given cache file doesn't exist, or the cache can't be read or written
pub fn read_scan_cache(
    cache_file: Option<&str>,
    lister: &dyn ResourceLister,
    config: &AuditConfig,
) -> Result<ScanSnapshot, Box<dyn Error>> {
    let now = config.now();

    let cache_file = match cache_file {
        Some(file) => {
            if !Path::new(file).exists() {
                return Err(format!("Cache file does not exist: {file}").into());
            }
            log::info!("Using provided cache file: {file}");
            file.to_string()
        }
        None => default_cache_file(&now.format("%Y-%m-%d").to_string()),
    };

    if Path::new(&cache_file).exists() {
        log::info!("Reading from cache file: {cache_file}");
        return load_snapshot(&cache_file);
    }

    log::warn!("Cache file not found: {cache_file}");
    let snapshot = scan_account(lister, config, &now.to_rfc3339());
    log::info!(
        "Scanned {} VPCs, {} subnets, {} resources",
        snapshot.network_count(),
        snapshot.subnet_count(),
        snapshot.resource_count()
    );

    let json =
        serde_json::to_string_pretty(&snapshot).map_err(|e| format!("Error serializing JSON: {e}"))?;
    log::warn!("Writing data to cache file: {cache_file}");
    std::fs::write(&cache_file, json)
        .map_err(|e| format!("Error writing cache file {cache_file}: {e}"))?;

    Ok(snapshot)
}
