use chrono::Datelike;
use contracts::dashboards::d402_sales_report::{NamedRef, PeriodFilter, TransactionRecord};
use contracts::enums::report_dimension::ReportDimension;

/// Year of a record: transaction date first, then a 4-digit year in the period name
pub fn record_year(record: &TransactionRecord) -> Option<i32> {
    if let Some(date) = record.transaction_date {
        return Some(date.year());
    }
    record
        .period
        .as_ref()
        .and_then(|period| year_in_label(&period.name))
}

/// First standalone run of exactly four digits, e.g. "MEI 2025" -> 2025
pub fn year_in_label(label: &str) -> Option<i32> {
    label
        .split(|c: char| !c.is_ascii_digit())
        .find(|token| token.len() == 4)
        .and_then(|token| token.parse().ok())
}

fn ref_matches(reference: Option<&NamedRef>, id: &str) -> bool {
    reference.map(|r| r.id == id).unwrap_or(false)
}

/// Empty set means "no filter", not "exclude all"
fn ref_in_set(reference: Option<&NamedRef>, ids: &[String]) -> bool {
    if ids.is_empty() {
        return true;
    }
    reference
        .map(|r| ids.iter().any(|id| *id == r.id))
        .unwrap_or(false)
}

/// Period mode: year, then period, then product/salesperson sets
/// (product+salesperson dimension only), then week. Order is preserved.
pub fn filter_by_period<'a>(
    records: &'a [TransactionRecord],
    filter: &PeriodFilter,
    dimension: ReportDimension,
) -> Vec<&'a TransactionRecord> {
    let mut subset: Vec<&TransactionRecord> = records.iter().collect();

    if let Some(year) = filter.year {
        subset.retain(|r| record_year(r) == Some(year));
        tracing::debug!("D402 filter: year {} keeps {} records", year, subset.len());
    }

    if let Some(ref period_id) = filter.period_id {
        subset.retain(|r| ref_matches(r.period.as_ref(), period_id));
        tracing::debug!(
            "D402 filter: period {} keeps {} records",
            period_id,
            subset.len()
        );
    }

    if dimension.accepts_id_filters() {
        subset = narrow_by_ids(subset, &filter.product_ids, &filter.salesperson_ids);
    }

    if let Some(ref week_id) = filter.week_id {
        subset.retain(|r| ref_matches(r.week.as_ref(), week_id));
        tracing::debug!("D402 filter: week {} keeps {} records", week_id, subset.len());
    }

    subset
}

/// Product/salesperson id narrowing used after a date-range fetch
pub fn filter_by_ids<'a>(
    records: &'a [TransactionRecord],
    product_ids: &[String],
    salesperson_ids: &[String],
) -> Vec<&'a TransactionRecord> {
    narrow_by_ids(records.iter().collect(), product_ids, salesperson_ids)
}

fn narrow_by_ids<'a>(
    mut subset: Vec<&'a TransactionRecord>,
    product_ids: &[String],
    salesperson_ids: &[String],
) -> Vec<&'a TransactionRecord> {
    if product_ids.is_empty() && salesperson_ids.is_empty() {
        return subset;
    }
    subset.retain(|r| {
        ref_in_set(r.product.as_ref(), product_ids)
            && ref_in_set(r.salesperson.as_ref(), salesperson_ids)
    });
    tracing::debug!(
        "D402 filter: {} product ids, {} salesperson ids keep {} records",
        product_ids.len(),
        salesperson_ids.len(),
        subset.len()
    );
    subset
}
