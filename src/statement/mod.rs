pub mod arrow;
pub mod metrics;
pub mod raw;
pub mod table;
pub mod utils;

pub use metrics::{KeyMetrics, REQUIRED_ATTRIBUTES};
pub use raw::{RawRow, RawStatement};
pub use table::{latest, Column, NormalizedStatement};
pub use utils::{canonical_name, coerce_numeric};

use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Arrow error: {0}")]
    Arrow(#[from] ::arrow::error::ArrowError),
}

/// Input that cannot be read as CSV at all is malformed input, same as a
/// statement missing its required rows.
impl From<csv::Error> for StatementError {
    fn from(err: csv::Error) -> Self {
        StatementError::MalformedInput(format!("not a readable CSV file: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, StatementError>;

/// Turn an attribute-by-period statement into a period-by-attribute table
/// with canonical column names, numeric cells, and the derived ratios.
///
/// Fails only when an attribute the ratios depend on is absent.
#[instrument(level = "debug", skip(raw), fields(periods = raw.periods.len(), attributes = raw.rows.len()))]
pub fn normalize(raw: &RawStatement) -> Result<NormalizedStatement> {
    let mut table = NormalizedStatement::new(raw.periods.clone());

    for row in &raw.rows {
        let values = row.cells.iter().map(|c| coerce_numeric(c)).collect();
        table.insert_column(canonical_name(&row.attribute), values);
    }

    let missing: Vec<&str> = REQUIRED_ATTRIBUTES
        .iter()
        .copied()
        .filter(|name| !table.contains(name))
        .collect();
    if !missing.is_empty() {
        return Err(StatementError::MalformedInput(format!(
            "required attribute rows not found: {}",
            missing.join(", ")
        )));
    }

    metrics::append_derived_metrics(&mut table);

    info!(
        periods = table.len(),
        columns = table.columns().len(),
        "statement normalized"
    );
    Ok(table)
}

/// Parse and normalize in one go.
pub fn normalize_csv(bytes: &[u8]) -> Result<NormalizedStatement> {
    let raw = RawStatement::from_bytes(bytes)?;
    normalize(&raw)
}

#[cfg(test)]
mod tests {
    use super::metrics::{NET_PROFIT_MARGIN, TAX_RATE};
    use super::*;

    const SAMPLE: &str = "\
Particulars,2022,2023
Total Revenue,100,120
Tax Expense,10,12
Profit Before Tax,30,36
Profit After Tax,20,24
Balance at the end of the year,5,9
";

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map(|a| (a - b).abs() < 0.01).unwrap_or(false)
    }

    #[test]
    fn normalizes_sample_statement() {
        let t = normalize_csv(SAMPLE.as_bytes()).unwrap();

        assert_eq!(t.periods(), &["2022", "2023"]);
        assert_eq!(
            t.column_names().collect::<Vec<_>>(),
            vec![
                "total_revenue",
                "tax_expense",
                "profit_before_tax",
                "profit_after_tax",
                "balance_at_the_end_of_the_year",
                TAX_RATE,
                NET_PROFIT_MARGIN,
            ]
        );

        let tax = t.column(TAX_RATE).unwrap();
        assert!(close(tax[0], 33.33));
        assert!(close(tax[1], 33.33));
        assert_eq!(t.column(NET_PROFIT_MARGIN).unwrap(), &[Some(20.0), Some(20.0)]);
        assert_eq!(latest(&t, "total_revenue"), Some(120.0));
        assert_eq!(latest(&t, "balance_at_the_end_of_the_year"), Some(9.0));
    }

    #[test]
    fn row_count_matches_period_count() {
        let csv = "Item,FY19,FY20,FY21\n\
                   Total Revenue,1,2,3\n\
                   Tax Expense,1,1,1\n\
                   Profit Before Tax,2,2,2\n\
                   Profit After Tax,1,1,1\n";
        let t = normalize_csv(csv.as_bytes()).unwrap();
        assert_eq!(t.len(), 3);
        for column in t.columns() {
            assert_eq!(column.values.len(), 3);
        }
    }

    #[test]
    fn zero_profit_before_tax_gives_missing_tax_rate() {
        let csv = SAMPLE.replace("Profit Before Tax,30,36", "Profit Before Tax,0,36");
        let t = normalize_csv(csv.as_bytes()).unwrap();
        let tax = t.column(TAX_RATE).unwrap();
        assert_eq!(tax[0], None);
        assert!(close(tax[1], 33.33));
    }

    #[test]
    fn non_numeric_cell_becomes_missing() {
        let csv = SAMPLE.replace("Total Revenue,100,120", "Total Revenue,N/A,120");
        let t = normalize_csv(csv.as_bytes()).unwrap();

        assert_eq!(t.column("total_revenue").unwrap(), &[None, Some(120.0)]);
        assert_eq!(t.column(NET_PROFIT_MARGIN).unwrap(), &[None, Some(20.0)]);
        assert!(close(t.column(TAX_RATE).unwrap()[0], 33.33));
    }

    #[test]
    fn missing_required_rows_are_reported() {
        let csv = "Item,2022\nTotal Revenue,100\nTax Expense,10\n";
        let err = normalize_csv(csv.as_bytes()).unwrap_err();
        match err {
            StatementError::MalformedInput(msg) => {
                assert!(msg.contains("profit_before_tax"));
                assert!(msg.contains("profit_after_tax"));
                assert!(!msg.contains("total_revenue"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn colliding_names_keep_last_values() {
        let csv = format!("{SAMPLE}total revenue ,999,888\n");
        let t = normalize_csv(csv.as_bytes()).unwrap();

        assert_eq!(t.column("total_revenue").unwrap(), &[Some(999.0), Some(888.0)]);
        assert_eq!(t.column_names().filter(|n| *n == "total_revenue").count(), 1);
    }

    #[test]
    fn zero_periods_normalize_to_empty_table() {
        let csv = "Item\nTotal Revenue\nTax Expense\nProfit Before Tax\nProfit After Tax\n";
        let t = normalize_csv(csv.as_bytes()).unwrap();
        assert!(t.is_empty());
        assert_eq!(latest(&t, "total_revenue"), None);
        assert_eq!(latest(&t, TAX_RATE), None);
    }
}
