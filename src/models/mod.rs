//! Domain models for the AWS topology audit.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Ipv4`] - IPv4 address with CIDR notation support
//! - [`Network`], [`Subnet`], [`RouteTable`] - VPC topology as scanned
//! - [`AttachedResource`] and [`ServiceRecord`] - resources found in the account
//! - [`Reachability`] - derived public/private class of a subnet
//! - [`ScanSnapshot`] - one full scan, as cached on disk

mod ipv4;
mod network;
mod reachability;
mod resource;
mod route_table;
mod snapshot;
mod subnet;

// Re-export public types
pub use ipv4::{
    get_cidr_mask, num_aws_hosts, Ipv4, DEFAULT_ROUTE, MAX_LENGTH,
};
pub use network::Network;
pub use reachability::Reachability;
pub use resource::{AttachedResource, Details, ResourceKind, ServiceRecord};
pub use route_table::{Association, Route, RouteTable};
pub use snapshot::{NetworkScan, RegionScan, ScanSnapshot};
pub use subnet::Subnet;
