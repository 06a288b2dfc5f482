use super::table::{latest, NormalizedStatement};
use serde::Serialize;
use tracing::debug;

pub const TOTAL_REVENUE: &str = "total_revenue";
pub const TAX_EXPENSE: &str = "tax_expense";
pub const PROFIT_BEFORE_TAX: &str = "profit_before_tax";
pub const PROFIT_AFTER_TAX: &str = "profit_after_tax";
pub const RETAINED_EARNINGS: &str = "balance_at_the_end_of_the_year";

pub const TAX_RATE: &str = "tax_rate";
pub const NET_PROFIT_MARGIN: &str = "net_profit_margin";

/// Attributes the derived metrics read from.
pub const REQUIRED_ATTRIBUTES: [&str; 4] =
    [TAX_EXPENSE, PROFIT_BEFORE_TAX, PROFIT_AFTER_TAX, TOTAL_REVENUE];

/// `numerator / denominator * 100`, missing when either side is missing or the
/// denominator is zero.
pub fn percentage(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d * 100.0).filter(|v| v.is_finite()),
        _ => None,
    }
}

fn ratio_column(table: &NormalizedStatement, numerator: &str, denominator: &str) -> Vec<Option<f64>> {
    (0..table.len())
        .map(|row| percentage(table.value(row, numerator), table.value(row, denominator)))
        .collect()
}

/// Append `tax_rate` and `net_profit_margin`. Absent inputs simply produce
/// missing cells; the caller is responsible for rejecting such tables first.
pub fn append_derived_metrics(table: &mut NormalizedStatement) {
    let tax_rate = ratio_column(table, TAX_EXPENSE, PROFIT_BEFORE_TAX);
    let margin = ratio_column(table, PROFIT_AFTER_TAX, TOTAL_REVENUE);

    debug!(
        tax_rate_missing = tax_rate.iter().filter(|v| v.is_none()).count(),
        margin_missing = margin.iter().filter(|v| v.is_none()).count(),
        "derived metrics computed"
    );

    table.insert_column(TAX_RATE, tax_rate);
    table.insert_column(NET_PROFIT_MARGIN, margin);
}

/// Latest-period headline figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_revenue: Option<f64>,
    pub profit_before_tax: Option<f64>,
    pub profit_after_tax: Option<f64>,
    pub retained_earnings: Option<f64>,
}

impl KeyMetrics {
    pub fn from_statement(table: &NormalizedStatement) -> Self {
        Self {
            total_revenue: latest(table, TOTAL_REVENUE),
            profit_before_tax: latest(table, PROFIT_BEFORE_TAX),
            profit_after_tax: latest(table, PROFIT_AFTER_TAX),
            retained_earnings: latest(table, RETAINED_EARNINGS),
        }
    }

    /// `(label, value)` pairs in display order.
    pub fn labelled(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("Latest Revenue", self.total_revenue),
            ("Latest Profit Before Tax", self.profit_before_tax),
            ("Latest Profit After Tax", self.profit_after_tax),
            ("Retained Earnings", self.retained_earnings),
        ]
    }
}
