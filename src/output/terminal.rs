//! Terminal output utilities.
//!
//! Provides formatting helpers and the run summary printed after a scan.

use crate::processing::Report;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// One summary line per VPC: region, id, blocks and subnet counts by class.
pub fn summary_lines(report: &Report) -> Vec<String> {
    report
        .networks
        .iter()
        .map(|n| {
            let (public, private, implicit) = n.classification.counts();
            format!(
                "{region},{vpc},{cidrs},{public},{private},{implicit},{rows}",
                region = format_field(n.region, 16),
                vpc = format_field(&n.network.id, 24),
                cidrs = format_field(n.network.cidrs_to_string(), 20),
                public = format_field(format!("{public}_pub"), 9),
                private = format_field(format!("{private}_priv"), 10),
                implicit = format_field(format!("{implicit}_impl"), 10),
                rows = format_field(format!("{}_rows", n.rows.len()), 10),
            )
        })
        .collect()
}

/// Print the per-VPC summary and totals to stdout.
pub fn print_summary(report: &Report) {
    for line in summary_lines(report) {
        println!("{line}");
    }
    let (public, private, implicit) = report.class_counts();
    println!(
        "#{}# scanned_at={} vpcs={} subnets: {} public, {} private, {} implicit",
        "SUMMARY".on_blue(),
        report.snapshot.scanned_at,
        report.networks.len(),
        public.to_string().green(),
        private,
        implicit.to_string().yellow()
    );
    if !report.diagnostics.is_empty() {
        println!(
            "#{}# {} diagnostics, see the Diagnostics sheet",
            "NOTE".on_red(),
            report.diagnostics.len()
        );
    }
}
