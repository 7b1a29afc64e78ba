use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Thousands grouped with dots, Indonesian style: 1234567 -> "1.234.567"
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// Whole-rupiah amount for log lines, e.g. "Rp -1.250"
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let whole = rounded.to_i64().unwrap_or_default();
    format!("Rp {}", format_number(whole))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(42), "42");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.000");
        assert_eq!(format_number(1234567), "1.234.567");
        assert_eq!(format_number(-1234), "-1.234");
    }

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(dec!(8000)), "Rp 8.000");
        assert_eq!(format_rupiah(dec!(1250.5)), "Rp 1.251");
        assert_eq!(format_rupiah(dec!(-2500)), "Rp -2.500");
    }
}
