use contracts::dashboards::d402_sales_report::{ReportRow, UnitMeasure};
use contracts::enums::report_dimension::{ReportDimension, SortFamily};

/// Order rows by the rule of the dimension. Both rules use a stable sort,
/// so equal rows keep their insertion order.
pub fn sort_rows<U: UnitMeasure>(rows: &mut [ReportRow<U>], dimension: ReportDimension) {
    match dimension.sort_family() {
        SortFamily::RevenueDescending => sort_by_revenue(rows),
        SortFamily::SecondaryKey => sort_by_secondary_key(rows),
    }
}

/// Revenue descending
pub fn sort_by_revenue<U>(rows: &mut [ReportRow<U>]) {
    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));
}

/// Secondary key (salesperson after " - ") ascending, then revenue descending
pub fn sort_by_secondary_key<U: UnitMeasure>(rows: &mut [ReportRow<U>]) {
    rows.sort_by(|a, b| {
        a.secondary_key()
            .cmp(b.secondary_key())
            .then_with(|| b.revenue.cmp(&a.revenue))
    });
}
