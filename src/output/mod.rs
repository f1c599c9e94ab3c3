//! Output of the audit report.
//!
//! This module handles turning a report into tables and persisting them:
//! - [`tables`] - The report sheets, built from a [`crate::processing::Report`]
//! - [`table`] - The [`Table`] type and the [`ReportSink`] trait
//! - [`xlsx`] - Excel workbook output
//! - [`csv`] - CSV output
//! - [`terminal`] - Terminal output with colors

mod csv;
mod table;
mod tables;
mod terminal;
mod xlsx;

pub use csv::{quote_csv_field, CsvSink};
pub use table::{sanitize_sheet_name, ReportSink, Table, MAX_SHEET_NAME_LEN};
pub use tables::{
    diagnostics_table, inventory_table, report_tables, topology_table, DIAGNOSTICS_SHEET,
    GLOBAL_RESOURCES_SHEET, REGIONAL_SERVICES_SHEET, TOPOLOGY_SHEET,
};
pub use terminal::{format_field, print_summary, summary_lines};
pub use xlsx::XlsxSink;
