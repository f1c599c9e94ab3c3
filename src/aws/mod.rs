//! AWS account access.
//!
//! This module handles all AWS-related operations:
//! - [`cli`] - Command execution for the AWS CLI
//! - [`describe`] - JSON shapes of the CLI responses
//! - [`services`] - Table-driven regional and global service listings
//! - [`lister`] - The [`ResourceLister`] seam and its CLI implementation
//! - [`scan`] - Sequential scan of a whole account
//! - [`cache`] - Caching of scan snapshots

mod cache;
mod cli;
mod describe;
mod lister;
mod scan;
mod services;

// Re-export public types and functions
pub use cache::{default_cache_file, load_snapshot, read_scan_cache};
pub use cli::{parse_json, run, run_json};
pub use lister::{AwsCli, ResourceLister};
pub use scan::{scan_account, scan_region};
pub use services::{map_items, ServiceScan, GLOBAL_REGION, GLOBAL_SERVICES, REGIONAL_SERVICES};
