use contracts::dashboards::d402_sales_report::{
    ReportRow, TransactionRecord, UnitMeasure, KEY_SEPARATOR,
};
use contracts::enums::report_dimension::ReportDimension;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Group label of a record for the given dimension
pub fn group_key(record: &TransactionRecord, dimension: ReportDimension) -> String {
    match dimension {
        ReportDimension::Product => record.product_label().to_string(),
        ReportDimension::Salesperson => record.salesperson_label().to_string(),
        ReportDimension::Route => record.route_label().to_string(),
        ReportDimension::Period => record.period_label().to_string(),
        ReportDimension::Week | ReportDimension::WeekSalesperson => format!(
            "{}{}{}",
            record.week_label(),
            KEY_SEPARATOR,
            record.salesperson_label()
        ),
        ReportDimension::ProductSalesperson => format!(
            "{}{}{}",
            record.product_label(),
            KEY_SEPARATOR,
            record.salesperson_label()
        ),
    }
}

/// Fold the subset into one row per group key.
///
/// NORMAL lines add one to `transaction_count` and add their quantity and
/// line value. RETURN and BS lines leave the count alone and subtract; they
/// may create a group on their own, which then starts at count 0 with
/// negative units and revenue. The creating record provides `note` and
/// `transaction_type`. Rows come back in first-seen order with percentage 0.
pub fn aggregate<U: UnitMeasure>(
    subset: &[&TransactionRecord],
    dimension: ReportDimension,
) -> Vec<ReportRow<U>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<ReportRow<U>> = Vec::new();

    for record in subset {
        let kind = record.kind();
        let key = group_key(record, dimension);

        let position = *index.entry(key.clone()).or_insert_with(|| {
            rows.push(ReportRow {
                key,
                transaction_count: 0,
                units: U::default(),
                revenue: Decimal::ZERO,
                percentage: Decimal::ZERO,
                note: record.note.clone(),
                transaction_type: kind,
            });
            rows.len() - 1
        });

        let row = &mut rows[position];
        if !kind.is_reversal() {
            row.transaction_count = row.transaction_count.saturating_add(1);
        }
        row.units.apply(record.signed_quantity());
        row.revenue = row.revenue.saturating_add(record.signed_line_value());
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d402_sales_report::{NamedRef, NoUnits, UnitTotals, UNKNOWN_LABEL};
    use contracts::enums::transaction_type::TransactionType;
    use rust_decimal_macros::dec;

    fn line(
        product: Option<&str>,
        salesperson: Option<&str>,
        qty: i64,
        price: Decimal,
        kind: &str,
    ) -> TransactionRecord {
        TransactionRecord {
            id: format!("{:?}-{}-{}", product, qty, kind),
            product: product.map(|p| NamedRef::new(p.to_lowercase(), p)),
            salesperson: salesperson.map(|s| NamedRef::new(s.to_lowercase(), s)),
            route: None,
            period: None,
            week: Some(NamedRef::new("w1", "Minggu 1")),
            quantity: Some(qty),
            unit_amount: Some(price),
            transaction_type: Some(kind.to_string()),
            transaction_date: None,
            note: Some(format!("{} x{}", kind, qty)),
        }
    }

    #[test]
    fn test_sale_minus_return() {
        let records = vec![
            line(Some("Kopi"), None, 10, dec!(1000), "PENJUALAN"),
            line(Some("Kopi"), None, 2, dec!(1000), "RETURN"),
        ];
        let subset: Vec<_> = records.iter().collect();
        let rows = aggregate::<UnitTotals>(&subset, ReportDimension::Product);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, "Kopi");
        assert_eq!(rows[0].transaction_count, 1);
        assert_eq!(rows[0].units.total_units, 8);
        assert_eq!(rows[0].revenue, dec!(8000));
    }

    #[test]
    fn test_group_created_by_return_only() {
        let records = vec![line(Some("Gula"), None, 3, dec!(1000), "RETURN")];
        let subset: Vec<_> = records.iter().collect();
        let rows = aggregate::<UnitTotals>(&subset, ReportDimension::Product);

        assert_eq!(rows[0].revenue, dec!(-3000));
        assert_eq!(rows[0].units.total_units, -3);
        assert_eq!(rows[0].transaction_count, 0);
        assert_eq!(rows[0].transaction_type, TransactionType::Return);
    }

    #[test]
    fn test_spoilage_exceeding_sales_stays_negative() {
        let records = vec![
            line(Some("Teh"), None, 1, dec!(500), "PENJUALAN"),
            line(Some("Teh"), None, 4, dec!(500), "BS"),
        ];
        let subset: Vec<_> = records.iter().collect();
        let rows = aggregate::<UnitTotals>(&subset, ReportDimension::Product);

        assert_eq!(rows[0].units.total_units, -3);
        assert_eq!(rows[0].revenue, dec!(-1500));
    }

    #[test]
    fn test_missing_product_groups_under_unknown() {
        let records = vec![
            line(None, Some("Budi"), 1, dec!(100), ""),
            line(Some("Kopi"), Some("Budi"), 1, dec!(100), ""),
            line(None, Some("Ani"), 2, dec!(100), ""),
        ];
        let subset: Vec<_> = records.iter().collect();
        let rows = aggregate::<UnitTotals>(&subset, ReportDimension::Product);

        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec![UNKNOWN_LABEL, "Kopi"]);
        assert_eq!(rows[0].units.total_units, 3);
    }

    #[test]
    fn test_composite_keys() {
        let records = vec![line(Some("Kopi"), Some("Budi"), 1, dec!(100), "")];

        assert_eq!(group_key(&records[0], ReportDimension::ProductSalesperson), "Kopi - Budi");
        assert_eq!(group_key(&records[0], ReportDimension::WeekSalesperson), "Minggu 1 - Budi");
        assert_eq!(group_key(&records[0], ReportDimension::Week), "Minggu 1 - Budi");
        assert_eq!(group_key(&records[0], ReportDimension::Route), UNKNOWN_LABEL);
    }

    #[test]
    fn test_note_is_first_write_wins() {
        let records = vec![
            line(Some("Kopi"), None, 1, dec!(100), "PENJUALAN"),
            line(Some("Kopi"), None, 5, dec!(100), "PENJUALAN"),
        ];
        let subset: Vec<_> = records.iter().collect();
        let rows = aggregate::<NoUnits>(&subset, ReportDimension::Product);

        assert_eq!(rows[0].note.as_deref(), Some("PENJUALAN x1"));
        assert_eq!(rows[0].units.total_units(), None);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let records = vec![
            line(Some("Kopi"), Some("Budi"), 2, dec!(1500), "PENJUALAN"),
            line(Some("Teh"), Some("Ani"), 1, dec!(800), "BS"),
            line(Some("Kopi"), Some("Ani"), 3, dec!(1500), "RETURN"),
        ];
        let subset: Vec<_> = records.iter().collect();
        let first = aggregate::<UnitTotals>(&subset, ReportDimension::ProductSalesperson);
        let second = aggregate::<UnitTotals>(&subset, ReportDimension::ProductSalesperson);
        assert_eq!(first, second);
    }

    #[test]
    fn test_revenue_is_conserved_for_every_dimension() {
        let records = vec![
            line(Some("Kopi"), Some("Budi"), 2, dec!(1500), "PENJUALAN"),
            line(Some("Teh"), Some("Ani"), 1, dec!(800), "BS"),
            line(None, Some("Ani"), 3, dec!(1500), "RETURN"),
            line(Some("Gula"), None, 7, dec!(12.5), "TUKAR"),
        ];
        let subset: Vec<_> = records.iter().collect();
        let expected: Decimal = records.iter().map(|r| r.signed_line_value()).sum();

        let dimensions = [
            ReportDimension::Product,
            ReportDimension::Salesperson,
            ReportDimension::Route,
            ReportDimension::Period,
            ReportDimension::Week,
            ReportDimension::WeekSalesperson,
            ReportDimension::ProductSalesperson,
        ];
        for dimension in dimensions {
            let rows = aggregate::<NoUnits>(&subset, dimension);
            let total: Decimal = rows.iter().map(|r| r.revenue).sum();
            assert_eq!(total, expected, "dimension {}", dimension);
        }
    }
}
