//! Topology processing logic.
//!
//! This module contains the business logic applied to a scan:
//! - [`classify`] - public/private classification of subnets
//! - [`assemble`] - joining subnets with their resources
//! - [`interface`] - inferring what a network interface belongs to
//! - [`report`] - running both over a whole scan snapshot

mod assemble;
mod classify;
mod diagnostic;
mod interface;
mod report;

// Re-export public functions
pub use assemble::{assemble_rows, Assembly, RowKind, TopologyRow};
pub use classify::{
    classify_network, is_internet_route, is_public_route_table, Classification,
    ClassifiedSubnet, GatewayRef,
};
pub use diagnostic::Diagnostic;
pub use interface::{infer_interface_type, UNKNOWN_INTERFACE};
pub use report::{build_report, LocatedDiagnostic, NetworkReport, Report};
