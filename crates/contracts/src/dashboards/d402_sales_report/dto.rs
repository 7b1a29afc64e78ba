use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::enums::report_dimension::ReportDimension;
use crate::enums::transaction_type::TransactionType;

/// Label used for rows whose reference is missing
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Separator of composite keys, e.g. "Kopi - Budi"
pub const KEY_SEPARATOR: &str = " - ";

/// Master-data ids arrive as strings or numbers depending on the feed
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
    })
}

/// Sum that sticks at the decimal bounds instead of overflowing
pub fn saturating_sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// Reference to a master-data entry (product, salesperson, route, period, week)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl NamedRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Resolved display label of an optional reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefLabel<'a> {
    Named(&'a str),
    Unknown,
}

impl<'a> RefLabel<'a> {
    /// Resolve an optional reference; absent references and blank names are `Unknown`
    pub fn resolve(reference: Option<&'a NamedRef>) -> Self {
        match reference {
            Some(r) if !r.name.trim().is_empty() => RefLabel::Named(r.name.as_str()),
            _ => RefLabel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'a str {
        match self {
            RefLabel::Named(name) => name,
            RefLabel::Unknown => UNKNOWN_LABEL,
        }
    }
}

/// One transaction line as delivered by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub product: Option<NamedRef>,
    #[serde(default)]
    pub salesperson: Option<NamedRef>,
    /// Distribution route ("jalur")
    #[serde(default)]
    pub route: Option<NamedRef>,
    /// Calendar month bucket, named like "MEI 2025"
    #[serde(default)]
    pub period: Option<NamedRef>,
    /// Sub-period bucket ("minggu")
    #[serde(default)]
    pub week: Option<NamedRef>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub unit_amount: Option<Decimal>,
    /// Raw type code: "PENJUALAN", "RETURN", "BS" or blank
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
}

impl TransactionRecord {
    /// Quantity, 1 when absent
    pub fn quantity(&self) -> i64 {
        self.quantity.unwrap_or(1)
    }

    /// Price per unit, 0 when absent
    pub fn unit_amount(&self) -> Decimal {
        self.unit_amount.unwrap_or(Decimal::ZERO)
    }

    /// quantity * unit_amount, saturating at the decimal bounds
    pub fn line_value(&self) -> Decimal {
        Decimal::from(self.quantity()).saturating_mul(self.unit_amount())
    }

    pub fn kind(&self) -> TransactionType {
        TransactionType::parse(self.transaction_type.as_deref())
    }

    /// Line value with the sign of its category (negative for RETURN and BS)
    pub fn signed_line_value(&self) -> Decimal {
        Decimal::from(self.kind().sign()).saturating_mul(self.line_value())
    }

    /// Quantity with the sign of its category
    pub fn signed_quantity(&self) -> i64 {
        self.kind().sign().saturating_mul(self.quantity())
    }

    pub fn product_label(&self) -> &str {
        RefLabel::resolve(self.product.as_ref()).as_str()
    }

    pub fn salesperson_label(&self) -> &str {
        RefLabel::resolve(self.salesperson.as_ref()).as_str()
    }

    pub fn route_label(&self) -> &str {
        RefLabel::resolve(self.route.as_ref()).as_str()
    }

    pub fn period_label(&self) -> &str {
        RefLabel::resolve(self.period.as_ref()).as_str()
    }

    pub fn week_label(&self) -> &str {
        RefLabel::resolve(self.week.as_ref()).as_str()
    }
}

// ---------------------------------------------------------------------------
// Report rows
// ---------------------------------------------------------------------------

/// Unit bookkeeping carried by a report row
pub trait UnitMeasure: Clone + Default {
    /// Apply a signed quantity (negative for RETURN and BS)
    fn apply(&mut self, signed_quantity: i64);

    fn total_units(&self) -> Option<i64>;
}

/// Units tracked (product and product+salesperson dimensions)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTotals {
    pub total_units: i64,
}

impl UnitMeasure for UnitTotals {
    fn apply(&mut self, signed_quantity: i64) {
        self.total_units = self.total_units.saturating_add(signed_quantity);
    }

    fn total_units(&self) -> Option<i64> {
        Some(self.total_units)
    }
}

/// Units not tracked by the dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoUnits {}

impl UnitMeasure for NoUnits {
    fn apply(&mut self, _signed_quantity: i64) {}

    fn total_units(&self) -> Option<i64> {
        None
    }
}

/// One aggregated group of a report run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow<U> {
    /// Group label, possibly composite ("Kopi - Budi")
    pub key: String,
    /// Number of NORMAL lines in the group
    pub transaction_count: u64,
    #[serde(flatten)]
    pub units: U,
    /// Net revenue; negative when reversals outweigh sales
    pub revenue: Decimal,
    /// Share of total net revenue, one decimal
    pub percentage: Decimal,
    /// Note of the record that created the group
    pub note: Option<String>,
    /// Type of the record that created the group (informational)
    pub transaction_type: TransactionType,
}

impl<U: UnitMeasure> ReportRow<U> {
    /// Secondary part of a composite key (text after the first " - ")
    pub fn secondary_key(&self) -> &str {
        match self.key.split_once(KEY_SEPARATOR) {
            Some((_, secondary)) => secondary,
            None => &self.key,
        }
    }
}

impl ReportRow<UnitTotals> {
    /// Revenue per unit, 0 when the group has no positive units
    pub fn avg_per_unit(&self) -> Decimal {
        if self.units.total_units > 0 {
            self.revenue
                .checked_div(Decimal::from(self.units.total_units))
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }
}

/// Rows of one report run; the variant tells whether units are present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum SalesReport {
    WithUnits(Vec<ReportRow<UnitTotals>>),
    RevenueOnly(Vec<ReportRow<NoUnits>>),
}

impl SalesReport {
    pub fn len(&self) -> usize {
        match self {
            SalesReport::WithUnits(rows) => rows.len(),
            SalesReport::RevenueOnly(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn keys(&self) -> Vec<&str> {
        match self {
            SalesReport::WithUnits(rows) => rows.iter().map(|r| r.key.as_str()).collect(),
            SalesReport::RevenueOnly(rows) => rows.iter().map(|r| r.key.as_str()).collect(),
        }
    }

    /// Sum of row units, `None` for dimensions without unit tracking
    pub fn total_units(&self) -> Option<i64> {
        match self {
            SalesReport::WithUnits(rows) => Some(
                rows.iter()
                    .fold(0i64, |acc, r| acc.saturating_add(r.units.total_units)),
            ),
            SalesReport::RevenueOnly(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Filters and requests
// ---------------------------------------------------------------------------

/// Year / period / week selection; `None` means "all"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFilter {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub period_id: Option<String>,
    #[serde(default)]
    pub week_id: Option<String>,
    /// Applied only for the product+salesperson dimension; empty = no filter
    #[serde(default)]
    pub product_ids: Vec<String>,
    /// Applied only for the product+salesperson dimension; empty = no filter
    #[serde(default)]
    pub salesperson_ids: Vec<String>,
}

/// Explicit inclusive date range, fetched directly from the data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub salesperson_ids: Vec<String>,
}

/// Filter mode of one report run; the two modes are mutually exclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReportFilter {
    Period(PeriodFilter),
    DateRange(DateRangeFilter),
}

impl Default for ReportFilter {
    fn default() -> Self {
        ReportFilter::Period(PeriodFilter::default())
    }
}

/// Request for a sales report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReportRequest {
    pub dimension: ReportDimension,
    #[serde(default)]
    pub filter: ReportFilter,
}

/// Totals shown under the table and in exports
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Net revenue of the working subset
    pub total_revenue: Decimal,
    /// Net signed quantity of the working subset
    pub total_quantity: i64,
    /// Number of NORMAL lines
    pub transaction_count: u64,
    /// Gross value of RETURN lines
    pub return_value: Decimal,
    /// Gross value of BS lines
    pub spoilage_value: Decimal,
}

/// Response for a sales report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReportResponse {
    pub dimension: ReportDimension,
    pub dimension_label: String,
    pub tracks_units: bool,
    pub report: SalesReport,
    pub total_net_revenue: Decimal,
    pub summary: ReportSummary,
    pub filter_summary_primary: String,
    pub filter_summary_secondary: String,
}

/// One point of the chronological monthly chart series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeriesPoint {
    /// Period label, e.g. "MEI 2025"
    pub period: String,
    pub revenue: Decimal,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySeriesResponse {
    pub points: Vec<MonthlySeriesPoint>,
    pub filter_summary_primary: String,
}

/// Values available for the filter controls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub periods: Vec<NamedRef>,
    pub weeks: Vec<NamedRef>,
    pub products: Vec<NamedRef>,
    pub salespeople: Vec<NamedRef>,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Summary table only, every applicable column
    Spreadsheet,
    /// Selected columns plus RETURN/BS detail sections
    Pdf,
}

/// Exportable column of the main report table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportColumn {
    Key,
    TransactionCount,
    TotalUnits,
    Revenue,
    AvgPerUnit,
    Percentage,
    Note,
    TransactionType,
}

impl ExportColumn {
    pub fn all() -> Vec<ExportColumn> {
        vec![
            ExportColumn::Key,
            ExportColumn::TransactionCount,
            ExportColumn::TotalUnits,
            ExportColumn::Revenue,
            ExportColumn::AvgPerUnit,
            ExportColumn::Percentage,
            ExportColumn::Note,
            ExportColumn::TransactionType,
        ]
    }

    /// Column exists only for unit-tracking dimensions
    pub fn requires_units(&self) -> bool {
        matches!(self, ExportColumn::TotalUnits | ExportColumn::AvgPerUnit)
    }
}

fn default_true() -> bool {
    true
}

/// Which main-table columns the PDF export includes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection {
    #[serde(default = "default_true")]
    pub key: bool,
    #[serde(default = "default_true")]
    pub transaction_count: bool,
    #[serde(default = "default_true")]
    pub total_units: bool,
    #[serde(default = "default_true")]
    pub revenue: bool,
    #[serde(default = "default_true")]
    pub avg_per_unit: bool,
    #[serde(default = "default_true")]
    pub percentage: bool,
    #[serde(default = "default_true")]
    pub note: bool,
    #[serde(default = "default_true")]
    pub transaction_type: bool,
}

impl Default for ColumnSelection {
    fn default() -> Self {
        Self::all(true)
    }
}

impl ColumnSelection {
    pub fn all(value: bool) -> Self {
        Self {
            key: value,
            transaction_count: value,
            total_units: value,
            revenue: value,
            avg_per_unit: value,
            percentage: value,
            note: value,
            transaction_type: value,
        }
    }

    pub fn is_selected(&self, column: ExportColumn) -> bool {
        match column {
            ExportColumn::Key => self.key,
            ExportColumn::TransactionCount => self.transaction_count,
            ExportColumn::TotalUnits => self.total_units,
            ExportColumn::Revenue => self.revenue,
            ExportColumn::AvgPerUnit => self.avg_per_unit,
            ExportColumn::Percentage => self.percentage,
            ExportColumn::Note => self.note,
            ExportColumn::TransactionType => self.transaction_type,
        }
    }

    pub fn none_selected(&self) -> bool {
        ExportColumn::all().into_iter().all(|c| !self.is_selected(c))
    }
}

/// Individual RETURN or BS line listed in the PDF detail sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub transaction_type: TransactionType,
    pub product: String,
    pub salesperson: String,
    pub quantity: i64,
    pub unit_amount: Decimal,
    pub line_value: Decimal,
    pub transaction_date: Option<NaiveDate>,
    pub note: Option<String>,
}

/// Totals printed at the bottom of an export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub total_revenue: Decimal,
    pub total_quantity: i64,
}

/// Request for an export file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesExportRequest {
    pub dimension: ReportDimension,
    #[serde(default)]
    pub filter: ReportFilter,
    pub format: ExportFormat,
    #[serde(default)]
    pub columns: ColumnSelection,
}

/// One titled table of an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSection {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Tabular payload handed to a file writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPayload {
    pub title: String,
    pub format: ExportFormat,
    pub dimension_label: String,
    pub filter_summary_primary: String,
    pub filter_summary_secondary: String,
    pub sections: Vec<ExportSection>,
    pub summary: ExportSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(json: &str) -> TransactionRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_record_defaults() {
        let r = record(r#"{"id": 7}"#);
        assert_eq!(r.id, "7");
        assert_eq!(r.quantity(), 1);
        assert_eq!(r.unit_amount(), Decimal::ZERO);
        assert_eq!(r.kind(), TransactionType::Normal);
        assert_eq!(r.product_label(), UNKNOWN_LABEL);
    }

    #[test]
    fn test_signed_line_value() {
        let r = record(
            r#"{"id": "a1", "quantity": 3, "unit_amount": 1000, "transaction_type": "return"}"#,
        );
        assert_eq!(r.line_value(), dec!(3000));
        assert_eq!(r.signed_line_value(), dec!(-3000));
        assert_eq!(r.signed_quantity(), -3);
    }

    #[test]
    fn test_oversized_line_saturates() {
        let r = record(
            r#"{"id": 9, "quantity": 9000000000000000000, "unit_amount": 100000000000, "transaction_type": "BS"}"#,
        );
        assert_eq!(r.line_value(), Decimal::MAX);
        assert_eq!(r.signed_line_value(), Decimal::MIN);
        assert_eq!(r.signed_quantity(), -9_000_000_000_000_000_000);

        let mut units = UnitTotals { total_units: i64::MAX };
        units.apply(5);
        assert_eq!(units.total_units, i64::MAX);
    }

    #[test]
    fn test_blank_name_resolves_unknown() {
        let r = record(r#"{"id": 1, "product": {"id": 5, "name": "  "}}"#);
        assert_eq!(r.product_label(), UNKNOWN_LABEL);
        let r = record(r#"{"id": 1, "product": {"id": 5, "name": "Kopi"}}"#);
        assert_eq!(r.product_label(), "Kopi");
    }

    #[test]
    fn test_avg_per_unit() {
        let row = ReportRow {
            key: "Kopi".to_string(),
            transaction_count: 1,
            units: UnitTotals { total_units: 4 },
            revenue: dec!(10000),
            percentage: dec!(100),
            note: None,
            transaction_type: TransactionType::Normal,
        };
        assert_eq!(row.avg_per_unit(), dec!(2500));

        let empty = ReportRow {
            units: UnitTotals { total_units: 0 },
            ..row
        };
        assert_eq!(empty.avg_per_unit(), Decimal::ZERO);
    }

    #[test]
    fn test_report_filter_tagged_by_mode() {
        let filter: ReportFilter = serde_json::from_str(
            r#"{"mode": "date_range", "start_date": "2025-05-01", "end_date": "2025-05-31"}"#,
        )
        .unwrap();
        match filter {
            ReportFilter::DateRange(range) => {
                assert!(range.product_ids.is_empty());
                assert_eq!(range.end_date, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
            }
            other => panic!("unexpected filter {:?}", other),
        }
    }

    #[test]
    fn test_column_selection_defaults_and_none() {
        let partial: ColumnSelection = serde_json::from_str(r#"{"note": false}"#).unwrap();
        assert!(partial.key);
        assert!(!partial.note);
        assert!(!partial.none_selected());
        assert!(ColumnSelection::all(false).none_selected());
    }
}
