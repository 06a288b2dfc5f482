/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

/// Canonical column name: trimmed, lowercased, each space replaced by `_`.
///
/// Only the ASCII space is replaced, so `"a  b"` becomes `"a__b"`. Applying it
/// twice yields the same string.
pub fn canonical_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Coerce a raw cell into a number. Anything that is not a finite `f64`
/// (blank, `N/A`, `NaN`, `inf`, ...) is missing.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    clean_str(raw)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_str_strips_quotes_and_whitespace() {
        assert_eq!(clean_str("  \"2022\" "), "2022");
        assert_eq!(clean_str("\""), "\"");
        assert_eq!(clean_str(" plain "), "plain");
    }

    #[test]
    fn canonical_name_lowercases_and_underscores() {
        assert_eq!(canonical_name("  Total Revenue "), "total_revenue");
        assert_eq!(
            canonical_name("Balance at the end of the year"),
            "balance_at_the_end_of_the_year"
        );
        assert_eq!(canonical_name("Profit  Before"), "profit__before");
    }

    #[test]
    fn canonical_name_is_idempotent() {
        for name in ["Total Revenue", " Tax Expense ", "already_canonical", "Mixed CASE x"] {
            let once = canonical_name(name);
            assert_eq!(canonical_name(&once), once);
        }
    }

    #[test]
    fn coerce_numeric_handles_junk() {
        assert_eq!(coerce_numeric("120"), Some(120.0));
        assert_eq!(coerce_numeric(" -3.5 "), Some(-3.5));
        assert_eq!(coerce_numeric("1e3"), Some(1000.0));
        assert_eq!(coerce_numeric("N/A"), None);
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("NaN"), None);
        assert_eq!(coerce_numeric("inf"), None);
        assert_eq!(coerce_numeric("1,000"), None);
    }
}
