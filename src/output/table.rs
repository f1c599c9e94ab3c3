//! Named tables and the sinks that persist them.

use std::error::Error;

/// Longest worksheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const SHEET_NAME_FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// One sheet of the report: a fixed header and string rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: &str, columns: &[&str]) -> Table {
        Table {
            name: name.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: vec![],
        }
    }

    /// Append a row. Short rows are padded with blanks, long rows truncated,
    /// so every row has exactly one cell per column.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        debug_assert!(
            row.len() <= self.columns.len(),
            "row wider than table {}",
            self.name
        );
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Destination for the report tables.
pub trait ReportSink {
    /// Persist all tables, in order.
    fn write_tables(&mut self, tables: &[Table]) -> Result<(), Box<dyn Error>>;
}

/// Make a worksheet name Excel will accept.
///
/// Forbidden characters become `_`, the name is cut to 31 characters and an
/// empty name becomes `Sheet`.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if SHEET_NAME_FORBIDDEN.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    // Excel also rejects names starting or ending with an apostrophe.
    let cleaned = cleaned.trim().trim_matches('\'').to_string();
    if cleaned.is_empty() {
        "Sheet".to_string()
    } else {
        cleaned
    }
}
