use contracts::dashboards::d402_sales_report::{saturating_sum, ReportRow};
use rust_decimal::Decimal;

/// Round to one decimal place, halves rounded up (towards +inf)
pub fn round1(value: Decimal) -> Decimal {
    let ten = Decimal::TEN;
    value
        .saturating_mul(ten)
        .saturating_add(Decimal::new(5, 1))
        .floor()
        / ten
}

/// Fill `percentage` of every row with its share of the net total.
///
/// The denominator is the unrounded sum of row revenues. With a zero or
/// negative total every percentage is 0. Values are not clamped: a row may
/// exceed 100 or go negative when other rows are net-negative.
pub fn apply_percentages<U>(rows: &mut [ReportRow<U>]) -> Decimal {
    let total_net_revenue = saturating_sum(rows.iter().map(|r| r.revenue));

    for row in rows.iter_mut() {
        row.percentage = if total_net_revenue > Decimal::ZERO {
            round1(share(row.revenue, total_net_revenue).saturating_mul(Decimal::ONE_HUNDRED))
        } else {
            Decimal::ZERO
        };
    }

    total_net_revenue
}

/// revenue / total, pinned to the decimal bounds when the quotient does not fit
fn share(revenue: Decimal, total: Decimal) -> Decimal {
    revenue.checked_div(total).unwrap_or(if revenue.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d402_sales_report::NoUnits;
    use contracts::enums::transaction_type::TransactionType;
    use rust_decimal_macros::dec;

    fn make_rows(revenues: &[Decimal]) -> Vec<ReportRow<NoUnits>> {
        revenues
            .iter()
            .enumerate()
            .map(|(i, revenue)| ReportRow {
                key: format!("row-{}", i),
                transaction_count: 1,
                units: NoUnits {},
                revenue: *revenue,
                percentage: Decimal::ZERO,
                note: None,
                transaction_type: TransactionType::Normal,
            })
            .collect()
    }

    #[test]
    fn test_round1_half_up() {
        assert_eq!(round1(dec!(33.333)), dec!(33.3));
        assert_eq!(round1(dec!(66.65)), dec!(66.7));
        assert_eq!(round1(dec!(12.34)), dec!(12.3));
        assert_eq!(round1(dec!(-2.25)), dec!(-2.2));
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        let mut rows = make_rows(&[dec!(1000), dec!(1000), dec!(1000)]);
        let total = apply_percentages(&mut rows);

        assert_eq!(total, dec!(3000));
        let sum: Decimal = rows.iter().map(|r| r.percentage).sum();
        assert!((sum - dec!(100)).abs() <= dec!(0.5));
        assert_eq!(rows[0].percentage, dec!(33.3));
    }

    #[test]
    fn test_non_positive_total_gives_zero() {
        let mut rows = make_rows(&[dec!(500), dec!(-800)]);
        let total = apply_percentages(&mut rows);

        assert_eq!(total, dec!(-300));
        assert!(rows.iter().all(|r| r.percentage == Decimal::ZERO));

        let mut flat = make_rows(&[Decimal::ZERO]);
        assert_eq!(apply_percentages(&mut flat), Decimal::ZERO);
        assert_eq!(flat[0].percentage, Decimal::ZERO);
    }

    #[test]
    fn test_percentages_are_not_clamped() {
        let mut rows = make_rows(&[dec!(1500), dec!(-500)]);
        apply_percentages(&mut rows);

        assert_eq!(rows[0].percentage, dec!(150));
        assert_eq!(rows[1].percentage, dec!(-50));
    }

    #[test]
    fn test_saturated_total_does_not_panic() {
        let mut rows = make_rows(&[Decimal::MAX, Decimal::MAX]);
        let total = apply_percentages(&mut rows);

        assert_eq!(total, Decimal::MAX);
        assert_eq!(rows[0].percentage, dec!(100));
        assert_eq!(round1(Decimal::MAX), Decimal::MAX.floor() / Decimal::TEN);
    }
}
