/// Placeholder shown for a missing figure.
pub const MISSING: &str = "-";

/// Human figure with thousands separators: integral values without decimals,
/// everything else with two.
pub fn format_figure(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let plain = if v.fract() == 0.0 {
                format!("{v:.0}")
            } else {
                format!("{v:.2}")
            };
            group_thousands(&plain)
        }
        _ => MISSING.to_string(),
    }
}

/// `"-1234567.50"` → `"-1,234,567.50"`.
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
