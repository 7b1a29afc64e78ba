use contracts::dashboards::d402_sales_report::{
    DetailRow, FilterOptions, NamedRef, ReportFilter, ReportSummary, TransactionRecord,
};
use contracts::enums::transaction_type::TransactionType;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashSet};

use super::filter::record_year;
use super::period::sort_chronologically;

const SUMMARY_SEPARATOR: &str = " · ";

/// Totals of the working subset
pub fn report_summary(subset: &[&TransactionRecord]) -> ReportSummary {
    let mut summary = ReportSummary::default();

    for record in subset {
        summary.total_revenue = summary.total_revenue.saturating_add(record.signed_line_value());
        summary.total_quantity = summary.total_quantity.saturating_add(record.signed_quantity());
        match record.kind() {
            TransactionType::Normal => {
                summary.transaction_count = summary.transaction_count.saturating_add(1)
            }
            TransactionType::Return => {
                summary.return_value = summary.return_value.saturating_add(record.line_value())
            }
            TransactionType::Spoilage => {
                summary.spoilage_value = summary.spoilage_value.saturating_add(record.line_value())
            }
        }
    }

    summary
}

/// Individual RETURN and BS lines in input order
pub fn collect_detail_rows(subset: &[&TransactionRecord]) -> Vec<DetailRow> {
    subset
        .iter()
        .filter(|r| r.kind().is_reversal())
        .map(|r| DetailRow {
            transaction_type: r.kind(),
            product: r.product_label().to_string(),
            salesperson: r.salesperson_label().to_string(),
            quantity: r.quantity(),
            unit_amount: r.unit_amount(),
            line_value: r.line_value(),
            transaction_date: r.transaction_date,
            note: r.note.clone(),
        })
        .collect()
}

/// Distinct values for the filter controls, taken from the full feed
pub fn filter_options(records: &[TransactionRecord]) -> FilterOptions {
    let years: BTreeSet<i32> = records.iter().filter_map(record_year).collect();

    let mut periods = distinct_refs(records.iter().filter_map(|r| r.period.as_ref()));
    sort_chronologically(&mut periods, |p| p.name.as_str());

    FilterOptions {
        years: years.into_iter().collect(),
        periods,
        weeks: sorted_by_name(distinct_refs(records.iter().filter_map(|r| r.week.as_ref()))),
        products: sorted_by_name(distinct_refs(
            records.iter().filter_map(|r| r.product.as_ref()),
        )),
        salespeople: sorted_by_name(distinct_refs(
            records.iter().filter_map(|r| r.salesperson.as_ref()),
        )),
    }
}

/// First occurrence of every id wins
fn distinct_refs<'a>(refs: impl Iterator<Item = &'a NamedRef>) -> Vec<NamedRef> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for r in refs {
        if seen.insert(r.id.as_str()) {
            out.push(r.clone());
        }
    }
    out
}

fn sorted_by_name(mut refs: Vec<NamedRef>) -> Vec<NamedRef> {
    refs.sort_by(|a, b| a.name.cmp(&b.name));
    refs
}

/// Name of a reference id as seen in the feed, falling back to the id itself
fn ref_name<'a, F>(records: &'a [TransactionRecord], id: &'a str, pick: F) -> &'a str
where
    F: Fn(&'a TransactionRecord) -> Option<&'a NamedRef>,
{
    records
        .iter()
        .filter_map(pick)
        .find(|r| r.id == id && !r.name.trim().is_empty())
        .map(|r| r.name.as_str())
        .unwrap_or(id)
}

/// Human-readable description of the active filter.
///
/// Primary text covers the time window ("Tahun 2025 · Periode MEI 2025 ·
/// Minggu 2"); secondary text lists product and salesperson selections.
/// Names are looked up in `records`.
pub fn describe_filter(filter: &ReportFilter, records: &[TransactionRecord]) -> (String, String) {
    let (primary, product_ids, salesperson_ids) = match filter {
        ReportFilter::Period(p) => {
            let mut parts: Vec<String> = Vec::new();
            if let Some(year) = p.year {
                parts.push(format!("Tahun {}", year));
            }
            if let Some(ref id) = p.period_id {
                parts.push(format!(
                    "Periode {}",
                    ref_name(records, id, |r| r.period.as_ref())
                ));
            }
            if let Some(ref id) = p.week_id {
                parts.push(format!("Minggu {}", ref_name(records, id, |r| r.week.as_ref())));
            }

            let primary = if parts.is_empty() {
                "Semua Periode".to_string()
            } else {
                parts.join(SUMMARY_SEPARATOR)
            };
            (primary, &p.product_ids, &p.salesperson_ids)
        }
        ReportFilter::DateRange(range) => (
            format!(
                "Tanggal {} s/d {}",
                range.start_date.format("%d/%m/%Y"),
                range.end_date.format("%d/%m/%Y")
            ),
            &range.product_ids,
            &range.salesperson_ids,
        ),
    };

    let mut secondary: Vec<String> = Vec::new();
    if !product_ids.is_empty() {
        let names: Vec<&str> = product_ids
            .iter()
            .map(|id| ref_name(records, id, |r| r.product.as_ref()))
            .collect();
        secondary.push(format!("Produk: {}", names.join(", ")));
    }
    if !salesperson_ids.is_empty() {
        let names: Vec<&str> = salesperson_ids
            .iter()
            .map(|id| ref_name(records, id, |r| r.salesperson.as_ref()))
            .collect();
        secondary.push(format!("Sales: {}", names.join(", ")));
    }

    (primary, secondary.join(SUMMARY_SEPARATOR))
}

/// Gross value of reversal lines, used in log lines
pub fn reversal_value(summary: &ReportSummary) -> Decimal {
    summary.return_value.saturating_add(summary.spoilage_value)
}
