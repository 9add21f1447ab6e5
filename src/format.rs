//! Display formatting. Pure functions of their inputs: formatting a value
//! twice always yields the same string, and missing or non-finite values
//! render as a fixed placeholder rather than "0" or "NaN".

/// Rendered wherever a value is missing or not a number.
pub const PLACEHOLDER: &str = "--";

/// Instruments whose prices always render with exactly 2 decimal places.
const MAJOR_INSTRUMENTS: &[&str] = &["BTC", "ETH", "BNB"];

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render with at most `max_frac` decimals, trimming trailing zeros down to
/// `min_frac`, with thousands grouping in the integer part.
fn format_decimal(value: f64, min_frac: usize, max_frac: usize) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let rendered = format!("{:.*}", max_frac, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (rendered, String::new()),
    };

    let mut frac = frac_part;
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }

    let sign = if value < 0.0 && (int_part != "0" || !frac.chars().all(|c| c == '0')) {
        "-"
    } else {
        ""
    };
    let grouped = group_thousands(&int_part);
    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}

/// USD amount with 2 decimal places and a dollar sign.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if value < 0.0 {
        format!("-${}", format_decimal(value.abs(), 2, 2))
    } else {
        format!("${}", format_decimal(value, 2, 2))
    }
}

/// Signed USD amount; non-negative values carry an explicit "+".
pub fn format_signed_usd(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let sign = if value < 0.0 { "-" } else { "+" };
    format!("{}${}", sign, format_decimal(value.abs(), 2, 2))
}

/// Price with instrument-class-sensitive precision: majors get exactly 2
/// decimals, everything else gets 2-4 (magnitude >= 1) or 4-6 (< 1).
pub fn format_price(value: f64, product: &str) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if MAJOR_INSTRUMENTS.contains(&product) {
        return format_decimal(value, 2, 2);
    }
    if value.abs() >= 1.0 {
        format_decimal(value, 2, 4)
    } else {
        format_decimal(value, 4, 6)
    }
}

/// Position or order size, magnitude-based precision split.
pub fn format_size(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    if value.abs() >= 1.0 {
        format_decimal(value, 2, 4)
    } else {
        format_decimal(value, 4, 6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usd_has_two_decimals_and_grouping() {
        assert_eq!(format_usd(20000.0), "$20,000.00");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn usd_placeholder_for_nan() {
        assert_eq!(format_usd(f64::NAN), PLACEHOLDER);
        assert_eq!(format_usd(f64::INFINITY), PLACEHOLDER);
    }

    #[test]
    fn signed_usd_marks_both_directions() {
        assert_eq!(format_signed_usd(20.0), "+$20.00");
        assert_eq!(format_signed_usd(-20.0), "-$20.00");
        assert_eq!(format_signed_usd(0.0), "+$0.00");
    }

    #[test]
    fn major_prices_are_two_decimals() {
        assert_eq!(format_price(60123.456, "BTC"), "60,123.46");
        assert_eq!(format_price(3000.1, "ETH"), "3,000.10");
    }

    #[test]
    fn minor_prices_split_on_magnitude() {
        assert_eq!(format_price(1.23456, "SOL"), "1.2346");
        assert_eq!(format_price(150.5, "SOL"), "150.50");
        assert_eq!(format_price(0.123456789, "DOGE"), "0.123457");
        assert_eq!(format_price(0.1, "DOGE"), "0.1000");
    }

    #[test]
    fn size_follows_magnitude_split() {
        assert_eq!(format_size(2.5), "2.50");
        assert_eq!(format_size(0.001), "0.0010");
        assert_eq!(format_size(-1.5), "-1.50");
    }

    #[test]
    fn formatting_is_idempotent_on_inputs() {
        for v in [0.0, 1.5, -42.42, 123456.789, 0.000123] {
            assert_eq!(format_usd(v), format_usd(v));
            assert_eq!(format_price(v, "SOL"), format_price(v, "SOL"));
            assert_eq!(format_size(v), format_size(v));
        }
    }
}
