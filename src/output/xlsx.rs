//! Excel workbook output.

use super::table::{sanitize_sheet_name, ReportSink, Table, MAX_SHEET_NAME_LEN};
use rust_xlsxwriter::{Format, Workbook};
use std::borrow::Cow;
use std::collections::HashSet;
use std::error::Error;

/// Rows a worksheet can hold, header included.
const MAX_SHEET_ROWS: usize = 1_048_576;

/// Characters a single cell can hold.
const MAX_CELL_CHARS: usize = 32_767;

/// Separator of list-valued cells.
const LIST_SEPARATOR: &str = ", ";

/// Writes every table as a worksheet of one `.xlsx` file.
#[derive(Debug, Clone)]
pub struct XlsxSink {
    pub path: String,
}

impl XlsxSink {
    pub fn new(path: &str) -> XlsxSink {
        XlsxSink {
            path: path.to_string(),
        }
    }
}

/// Sanitized name that is not in `used` yet; clashes get a `~N` suffix.
fn unique_sheet_name(name: &str, used: &mut HashSet<String>) -> String {
    let base = sanitize_sheet_name(name);
    let mut candidate = base.clone();
    let mut n = 1;
    while used.contains(&candidate.to_lowercase()) {
        n += 1;
        let suffix = format!("~{n}");
        let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
        candidate = format!("{}{suffix}", base.chars().take(keep).collect::<String>());
    }
    used.insert(candidate.to_lowercase());
    candidate
}

/// Value cut to fit one cell.
///
/// List cells are cut after the last whole item and end with `… (+N more)`,
/// anything else ends with `… (truncated)`.
fn fit_cell(value: &str) -> Cow<'_, str> {
    if value.chars().count() <= MAX_CELL_CHARS {
        return Cow::Borrowed(value);
    }
    // Room for the suffix.
    let keep = MAX_CELL_CHARS - 32;
    let cut = value
        .char_indices()
        .nth(keep)
        .map(|(i, _)| i)
        .unwrap_or(value.len());

    let fitted = match value[..cut].rfind(LIST_SEPARATOR) {
        Some(end) => {
            let dropped = value[end + LIST_SEPARATOR.len()..]
                .split(LIST_SEPARATOR)
                .count();
            format!("{} … (+{dropped} more)", &value[..end])
        }
        None => format!("{} … (truncated)", &value[..cut]),
    };
    Cow::Owned(fitted)
}

impl ReportSink for XlsxSink {
    fn write_tables(&mut self, tables: &[Table]) -> Result<(), Box<dyn Error>> {
        log::info!("#Start XlsxSink::write_tables() {} -> {}", tables.len(), self.path);

        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let mut used = HashSet::new();

        for table in tables {
            if table.rows.len() >= MAX_SHEET_ROWS {
                return Err(format!(
                    "Table {} has {} rows, more than a worksheet holds",
                    table.name,
                    table.rows.len()
                )
                .into());
            }

            let worksheet = workbook.add_worksheet();
            worksheet.set_name(unique_sheet_name(&table.name, &mut used))?;

            for (col, column) in table.columns.iter().enumerate() {
                worksheet.write_string_with_format(0, col as u16, column, &header)?;
            }
            for (i, row) in table.rows.iter().enumerate() {
                for (col, value) in row.iter().enumerate() {
                    let cell = fit_cell(value);
                    if matches!(cell, Cow::Owned(_)) {
                        log::warn!(
                            "{} row {} column {}: {} characters cut to fit a cell",
                            table.name,
                            i + 1,
                            table.columns.get(col).map(String::as_str).unwrap_or("-"),
                            value.chars().count()
                        );
                    }
                    worksheet.write_string(i as u32 + 1, col as u16, cell.as_ref())?;
                }
            }
            worksheet.set_freeze_panes(1, 0)?;
            worksheet.autofit();
            log::debug!("sheet {} rows={}", table.name, table.rows.len());
        }

        workbook
            .save(&self.path)
            .map_err(|e| format!("Error writing workbook {}: {e}", self.path))?;
        log::info!("Wrote {}", self.path);
        Ok(())
    }
}
