//! CSV output of the report tables.

use super::table::{ReportSink, Table};
use std::error::Error;
use std::io::Write;

/// Quote a field, doubling any embedded double quotes.
///
/// Every field is quoted so commas, quotes and line breaks survive, and
/// there are no spaces after the separating comma (Excel dislikes them).
pub fn quote_csv_field(input: &str) -> String {
    format!("\"{}\"", input.replace('"', "\"\""))
}

fn csv_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| quote_csv_field(f))
        .collect::<Vec<String>>()
        .join(",")
}

/// Writes each table as a `# <name>` line, a header and its rows, with a
/// blank line between tables.
pub struct CsvSink<W: Write> {
    out: W,
}

impl CsvSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        CsvSink {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        CsvSink { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for CsvSink<W> {
    fn write_tables(&mut self, tables: &[Table]) -> Result<(), Box<dyn Error>> {
        log::info!("#Start CsvSink::write_tables() tables={}", tables.len());
        for (i, table) in tables.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            writeln!(self.out, "# {}", table.name)?;
            writeln!(self.out, "{}", csv_line(&table.columns))?;
            for row in &table.rows {
                writeln!(self.out, "{}", csv_line(row))?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
