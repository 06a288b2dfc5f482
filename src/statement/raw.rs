use super::utils::clean_str;
use super::{Result, StatementError};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// One attribute row of the source file, cells kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub attribute: String,
    /// One cell per period; always `periods.len()` long.
    pub cells: Vec<String>,
}

/// A statement exactly as uploaded: attributes down, periods across.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatement {
    /// Period labels from the header row, left to right.
    pub periods: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawStatement {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(bytes)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    /// Parse a CSV whose header row holds the period labels (first header
    /// cell is the index label and is dropped) and whose first column holds
    /// the attribute names.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(StatementError::MalformedInput(
                "the file is empty or has no header row".into(),
            ));
        }
        let periods: Vec<String> = headers.iter().skip(1).map(clean_str).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            if record.iter().all(|f| f.is_empty()) {
                debug!(line = ?record.position().map(|p| p.line()), "skipping blank record");
                continue;
            }
            if record.len() > width {
                let line = record.position().map(|p| p.line()).unwrap_or_default();
                return Err(StatementError::MalformedInput(format!(
                    "line {}: expected {} fields, found {}",
                    line,
                    width,
                    record.len()
                )));
            }

            let mut fields = record.iter();
            let attribute = fields.next().unwrap_or_default().to_string();
            let mut cells: Vec<String> = fields.map(str::to_string).collect();
            cells.resize(periods.len(), String::new());
            rows.push(RawRow { attribute, cells });
        }

        debug!(periods = periods.len(), attributes = rows.len(), "parsed raw statement");
        Ok(RawStatement { periods, rows })
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }
}
