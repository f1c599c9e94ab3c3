//! Runtime configuration.
//!
//! Settings come from the environment, optionally loaded from a `.env` file
//! by `dotenv` in `main`.

use chrono::DateTime;
use chrono_tz::Tz;
use std::error::Error;
use std::str::FromStr;

/// Region used when the active region list cannot be fetched.
pub const FALLBACK_REGION: &str = "us-east-1";
/// Workbook written when `AUDIT_OUTPUT_FILE` is not set.
pub const DEFAULT_OUTPUT_FILE: &str = "aws_architecture_report.xlsx";
/// AWS CLI executable.
pub const DEFAULT_AWS_BIN: &str = "aws";
/// log4rs config file looked up in the working directory.
pub const LOG_CONFIG_FILE: &str = "log4rs.yml";
/// Largest CLI response accepted, in bytes.
pub const MAX_CLI_OUTPUT_BYTES: usize = 64 * 1024 * 1024;

/// How the report is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One workbook, one worksheet per table.
    Xlsx,
    /// Quoted CSV on stdout, one block per table.
    Csv,
}

impl FromStr for OutputFormat {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format '{other}', expected xlsx or csv").into()),
        }
    }
}

/// Settings for one audit run.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Regions to scan; `None` discovers the active regions.
    pub regions: Option<Vec<String>>,
    pub output_file: String,
    pub output_format: OutputFormat,
    /// Snapshot to read instead of the dated default cache file.
    pub cache_file: Option<String>,
    /// Skip IAM, S3, CloudFront, Route 53 and Global Accelerator.
    pub skip_global: bool,
    /// Zone used for the scan timestamp and the cache file date.
    pub timezone: Tz,
    pub aws_bin: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            regions: None,
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            output_format: OutputFormat::Xlsx,
            cache_file: None,
            skip_global: false,
            timezone: Tz::UTC,
            aws_bin: DEFAULT_AWS_BIN.to_string(),
        }
    }
}

impl AuditConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<AuditConfig, Box<dyn Error>> {
        AuditConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `AUDIT_REGIONS` | comma separated regions, empty = discover |
    /// | `AUDIT_OUTPUT_FILE` | workbook path |
    /// | `AUDIT_OUTPUT_FORMAT` | `xlsx` or `csv` |
    /// | `AUDIT_CACHE_FILE` | snapshot file to reuse |
    /// | `AUDIT_SKIP_GLOBAL` | `true` to skip global resources |
    /// | `AUDIT_TIMEZONE` | IANA zone name, default `UTC` |
    /// | `AUDIT_AWS_BIN` | AWS CLI executable |
    pub fn from_lookup<F>(lookup: F) -> Result<AuditConfig, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AuditConfig::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(regions) = value("AUDIT_REGIONS") {
            let regions: Vec<String> = regions
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect();
            if !regions.is_empty() {
                config.regions = Some(regions);
            }
        }
        if let Some(file) = value("AUDIT_OUTPUT_FILE") {
            config.output_file = file.trim().to_string();
        }
        if let Some(format) = value("AUDIT_OUTPUT_FORMAT") {
            config.output_format = format.parse()?;
        }
        config.cache_file = value("AUDIT_CACHE_FILE").map(|f| f.trim().to_string());
        if let Some(skip) = value("AUDIT_SKIP_GLOBAL") {
            config.skip_global = parse_bool(&skip)
                .ok_or_else(|| format!("Invalid AUDIT_SKIP_GLOBAL '{skip}'"))?;
        }
        if let Some(tz) = value("AUDIT_TIMEZONE") {
            config.timezone = tz
                .trim()
                .parse::<Tz>()
                .map_err(|e| format!("Invalid AUDIT_TIMEZONE '{tz}': {e}"))?;
        }
        if let Some(bin) = value("AUDIT_AWS_BIN") {
            config.aws_bin = bin.trim().to_string();
        }

        log::debug!("config={config:?}");
        Ok(config)
    }

    /// Current time in the configured zone.
    pub fn now(&self) -> DateTime<Tz> {
        chrono::Utc::now().with_timezone(&self.timezone)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AuditConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.regions, None);
        assert_eq!(config.output_file, DEFAULT_OUTPUT_FILE);
        assert_eq!(config.output_format, OutputFormat::Xlsx);
        assert_eq!(config.timezone, Tz::UTC);
        assert!(!config.skip_global);
        assert_eq!(config.aws_bin, "aws");
    }

    #[test]
    fn test_all_settings() {
        let config = AuditConfig::from_lookup(lookup(&[
            ("AUDIT_REGIONS", "us-east-1, eu-west-1,,"),
            ("AUDIT_OUTPUT_FILE", "out.xlsx"),
            ("AUDIT_OUTPUT_FORMAT", "CSV"),
            ("AUDIT_CACHE_FILE", "scan.json"),
            ("AUDIT_SKIP_GLOBAL", "yes"),
            ("AUDIT_TIMEZONE", "Pacific/Auckland"),
            ("AUDIT_AWS_BIN", "/usr/local/bin/aws"),
        ]))
        .unwrap();
        assert_eq!(
            config.regions,
            Some(vec!["us-east-1".to_string(), "eu-west-1".to_string()])
        );
        assert_eq!(config.output_file, "out.xlsx");
        assert_eq!(config.output_format, OutputFormat::Csv);
        assert_eq!(config.cache_file.as_deref(), Some("scan.json"));
        assert!(config.skip_global);
        assert_eq!(config.timezone, chrono_tz::Pacific::Auckland);
        assert_eq!(config.aws_bin, "/usr/local/bin/aws");
    }

    #[test]
    fn test_blank_regions_mean_discover() {
        let config = AuditConfig::from_lookup(lookup(&[("AUDIT_REGIONS", " , ")])).unwrap();
        assert_eq!(config.regions, None);
    }

    #[test]
    fn test_invalid_values() {
        assert!(AuditConfig::from_lookup(lookup(&[("AUDIT_OUTPUT_FORMAT", "pdf")])).is_err());
        assert!(AuditConfig::from_lookup(lookup(&[("AUDIT_TIMEZONE", "Mars/Base")])).is_err());
        assert!(AuditConfig::from_lookup(lookup(&[("AUDIT_SKIP_GLOBAL", "maybe")])).is_err());
    }
}
