//! Comma-separated feature table reader and writer.
//!
//! The engine reads exactly four columns by header name: `Trend`, `Speed`,
//! `Speed_Norm` and `Event`. Other columns (dates, raw prices) are ignored.
//! `Speed` is nullable: empty or NaN cells read as 0.

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{SpecError, SpecResult};
use crate::record::{DailyFeatureRecord, FeatureTable};

/// Header of the trend column.
pub const TREND_COLUMN: &str = "Trend";
/// Header of the speed column.
pub const SPEED_COLUMN: &str = "Speed";
/// Header of the normalized speed column.
pub const SPEED_NORM_COLUMN: &str = "Speed_Norm";
/// Header of the event flag column.
pub const EVENT_COLUMN: &str = "Event";

/// Columns the engine requires, in output order.
pub const REQUIRED_COLUMNS: [&str; 4] = [TREND_COLUMN, SPEED_COLUMN, SPEED_NORM_COLUMN, EVENT_COLUMN];

/// A parsed header plus raw data rows.
#[derive(Debug, Clone)]
pub struct DelimitedTable {
    header: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
}

impl DelimitedTable {
    /// Parses comma-separated text with a header line.
    ///
    /// Blank lines are skipped. Cells are trimmed and surrounding double
    /// quotes are removed.
    pub fn parse(text: &str) -> SpecResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header_line) = lines
            .next()
            .ok_or_else(|| SpecError::invalid_input("table", "no header line"))?;
        let header = split_row(header_line);

        let rows = lines
            .map(|(idx, line)| (idx + 1, split_row(line)))
            .collect();

        Ok(Self { header, rows })
    }

    /// Column headers in file order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Finds a column by exact header name.
    pub fn column_index(&self, name: &str) -> SpecResult<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| SpecError::missing_column(name))
    }

    /// Iterates `(line_number, cell)` pairs for one column. Short rows yield
    /// an empty cell.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.rows.iter().map(move |(line, cells)| {
            let cell = cells.get(index).map(String::as_str).unwrap_or("");
            (*line, cell)
        })
    }
}

fn split_row(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().trim_matches('"').to_string())
        .collect()
}

/// Parses a float cell; empty cells become `None`.
pub(crate) fn parse_float_cell(line: usize, column: &str, cell: &str) -> SpecResult<Option<f64>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|e| SpecError::Parse {
            line,
            column: column.to_string(),
            message: format!("'{}' is not a number: {}", cell, e),
        })
}

fn parse_event_cell(line: usize, cell: &str) -> SpecResult<bool> {
    match cell.to_ascii_lowercase().as_str() {
        "" | "0" | "false" => Ok(false),
        "1" | "true" => Ok(true),
        other => match other.parse::<f64>() {
            Ok(v) if v == 0.0 => Ok(false),
            Ok(v) if v == 1.0 => Ok(true),
            _ => Err(SpecError::Parse {
                line,
                column: EVENT_COLUMN.to_string(),
                message: format!("'{}' is not an event flag (expected 0 or 1)", cell),
            }),
        },
    }
}

impl FeatureTable {
    /// Reads a feature table from comma-separated text.
    ///
    /// # Errors
    /// - [`SpecError::MissingColumn`] if any of the four required headers is absent
    /// - [`SpecError::Parse`] if a cell cannot be read
    pub fn from_csv_str(text: &str) -> SpecResult<Self> {
        let table = DelimitedTable::parse(text)?;

        // Resolve every column before reading rows so a missing header is
        // reported even when the table has no data.
        let trend_idx = table.column_index(TREND_COLUMN)?;
        let speed_idx = table.column_index(SPEED_COLUMN)?;
        let norm_idx = table.column_index(SPEED_NORM_COLUMN)?;
        let event_idx = table.column_index(EVENT_COLUMN)?;

        let mut records = Vec::with_capacity(table.row_count());
        for (line, cells) in &table.rows {
            let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or("");

            let trend = parse_float_cell(*line, TREND_COLUMN, cell(trend_idx))?.unwrap_or(f64::NAN);
            let speed = parse_float_cell(*line, SPEED_COLUMN, cell(speed_idx))?
                .filter(|v| !v.is_nan())
                .unwrap_or(0.0);
            let speed_norm =
                parse_float_cell(*line, SPEED_NORM_COLUMN, cell(norm_idx))?.unwrap_or(f64::NAN);
            let event = parse_event_cell(*line, cell(event_idx))?;

            records.push(DailyFeatureRecord::new(trend, speed, speed_norm, event));
        }

        tracing::debug!(days = records.len(), "parsed feature table");
        Ok(FeatureTable::new(records))
    }

    /// Reads a feature table from a file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> SpecResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_csv_str(&text)
    }

    /// Serializes the four feature columns as comma-separated text.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(32 * (self.len() + 1));
        out.push_str(&REQUIRED_COLUMNS.join(","));
        out.push('\n');
        for r in self.records() {
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "{},{},{},{}",
                r.trend,
                r.speed,
                r.speed_norm,
                u8::from(r.event)
            );
        }
        out
    }

    /// Writes the table to a file.
    pub fn write_csv_path(&self, path: impl AsRef<Path>) -> SpecResult<()> {
        std::fs::write(path.as_ref(), self.to_csv())?;
        Ok(())
    }
}
