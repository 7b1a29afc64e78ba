use contracts::dashboards::d402_sales_report::{
    ColumnSelection, DetailRow, ExportColumn, ExportFormat, ExportPayload, ExportSection,
    ExportSummary, NoUnits, ReportRow, SalesReport, UnitTotals,
};
use contracts::enums::report_dimension::ReportDimension;
use contracts::enums::transaction_type::TransactionType;
use rust_decimal::Decimal;

use super::error::ReportError;

/// Format-specific part of an export request
#[derive(Debug, Clone, Copy)]
pub enum ExportVariant<'a> {
    /// Main table with every applicable column
    Spreadsheet,
    /// Selected columns plus individual RETURN/BS lines
    Pdf {
        detail_rows: &'a [DetailRow],
        columns: &'a ColumnSelection,
    },
}

/// Everything the adapter needs to build a payload
pub struct ExportInput<'a> {
    pub report: &'a SalesReport,
    pub dimension: ReportDimension,
    pub filter_summary_primary: &'a str,
    pub filter_summary_secondary: &'a str,
    pub summary: ExportSummary,
    pub variant: ExportVariant<'a>,
}

/// Build the tabular payload handed to a file writer.
///
/// Rejects an empty report and a column selection with nothing ticked
/// before any writer gets involved.
pub fn build_export_payload(input: ExportInput<'_>) -> Result<ExportPayload, ReportError> {
    if input.report.is_empty() {
        return Err(ReportError::NothingToExport);
    }

    let tracks_units = input.dimension.tracks_units();
    let (format, columns) = match input.variant {
        ExportVariant::Spreadsheet => (
            ExportFormat::Spreadsheet,
            applicable_columns(&ColumnSelection::all(true), tracks_units),
        ),
        ExportVariant::Pdf { columns, .. } => {
            if columns.none_selected() {
                return Err(ReportError::NoColumnsSelected);
            }
            (ExportFormat::Pdf, applicable_columns(columns, tracks_units))
        }
    };

    // Only unit columns ticked for a dimension without units
    if columns.is_empty() {
        return Err(ReportError::NoColumnsSelected);
    }

    let dimension_label = input.dimension.display_name().to_string();
    let mut sections = vec![ExportSection {
        title: format!("Laporan per {}", dimension_label),
        headers: columns
            .iter()
            .map(|c| column_header(*c, &dimension_label))
            .collect(),
        rows: main_rows(input.report, &columns),
    }];

    if let ExportVariant::Pdf { detail_rows, .. } = input.variant {
        sections.push(detail_section(detail_rows, TransactionType::Return));
        sections.push(detail_section(detail_rows, TransactionType::Spoilage));
    }

    Ok(ExportPayload {
        title: format!("Laporan Penjualan - {}", dimension_label),
        format,
        dimension_label,
        filter_summary_primary: input.filter_summary_primary.to_string(),
        filter_summary_secondary: input.filter_summary_secondary.to_string(),
        sections,
        summary: input.summary,
    })
}

fn applicable_columns(selection: &ColumnSelection, tracks_units: bool) -> Vec<ExportColumn> {
    ExportColumn::all()
        .into_iter()
        .filter(|c| selection.is_selected(*c))
        .filter(|c| tracks_units || !c.requires_units())
        .collect()
}

fn column_header(column: ExportColumn, dimension_label: &str) -> String {
    match column {
        ExportColumn::Key => dimension_label.to_string(),
        ExportColumn::TransactionCount => "Jumlah Transaksi".to_string(),
        ExportColumn::TotalUnits => "Total Unit".to_string(),
        ExportColumn::Revenue => "Pendapatan".to_string(),
        ExportColumn::AvgPerUnit => "Rata-rata per Unit".to_string(),
        ExportColumn::Percentage => "Persentase (%)".to_string(),
        ExportColumn::Note => "Keterangan".to_string(),
        ExportColumn::TransactionType => "Jenis".to_string(),
    }
}

fn money(value: Decimal) -> String {
    value.round_dp(2).normalize().to_string()
}

/// Cell values shared by both row shapes
fn common_cell<U>(row: &ReportRow<U>, column: ExportColumn) -> Option<String> {
    match column {
        ExportColumn::Key => Some(row.key.clone()),
        ExportColumn::TransactionCount => Some(row.transaction_count.to_string()),
        ExportColumn::Revenue => Some(money(row.revenue)),
        ExportColumn::Percentage => Some(row.percentage.round_dp(1).to_string()),
        ExportColumn::Note => Some(row.note.clone().unwrap_or_default()),
        ExportColumn::TransactionType => Some(row.transaction_type.display_name().to_string()),
        ExportColumn::TotalUnits | ExportColumn::AvgPerUnit => None,
    }
}

fn unit_row_cells(row: &ReportRow<UnitTotals>, columns: &[ExportColumn]) -> Vec<String> {
    columns
        .iter()
        .map(|c| match c {
            ExportColumn::TotalUnits => row.units.total_units.to_string(),
            ExportColumn::AvgPerUnit => money(row.avg_per_unit()),
            other => common_cell(row, *other).unwrap_or_default(),
        })
        .collect()
}

fn revenue_row_cells(row: &ReportRow<NoUnits>, columns: &[ExportColumn]) -> Vec<String> {
    columns
        .iter()
        .map(|c| common_cell(row, *c).unwrap_or_default())
        .collect()
}

fn main_rows(report: &SalesReport, columns: &[ExportColumn]) -> Vec<Vec<String>> {
    match report {
        SalesReport::WithUnits(rows) => rows.iter().map(|r| unit_row_cells(r, columns)).collect(),
        SalesReport::RevenueOnly(rows) => {
            rows.iter().map(|r| revenue_row_cells(r, columns)).collect()
        }
    }
}

/// One line per individual transaction of the given type, never grouped
fn detail_section(detail_rows: &[DetailRow], kind: TransactionType) -> ExportSection {
    let title = match kind {
        TransactionType::Spoilage => "Detail BS".to_string(),
        _ => format!("Detail {}", kind.display_name()),
    };

    ExportSection {
        title,
        headers: vec![
            "Produk".to_string(),
            "Sales".to_string(),
            "Jumlah".to_string(),
            "Harga Satuan".to_string(),
            "Nilai".to_string(),
            "Tanggal".to_string(),
            "Keterangan".to_string(),
        ],
        rows: detail_rows
            .iter()
            .filter(|d| d.transaction_type == kind)
            .map(|d| {
                vec![
                    d.product.clone(),
                    d.salesperson.clone(),
                    d.quantity.to_string(),
                    money(d.unit_amount),
                    money(d.line_value),
                    d.transaction_date
                        .map(|date| date.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    d.note.clone().unwrap_or_default(),
                ]
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn unit_report() -> SalesReport {
        SalesReport::WithUnits(vec![ReportRow {
            key: "Kopi".to_string(),
            transaction_count: 1,
            units: UnitTotals { total_units: 8 },
            revenue: dec!(8000),
            percentage: dec!(100),
            note: Some("promo".to_string()),
            transaction_type: TransactionType::Normal,
        }])
    }

    fn detail(kind: TransactionType, product: &str, qty: i64) -> DetailRow {
        DetailRow {
            transaction_type: kind,
            product: product.to_string(),
            salesperson: "Budi".to_string(),
            quantity: qty,
            unit_amount: dec!(1000),
            line_value: Decimal::from(qty) * dec!(1000),
            transaction_date: NaiveDate::from_ymd_opt(2025, 5, 10),
            note: None,
        }
    }

    fn input<'a>(
        report: &'a SalesReport,
        dimension: ReportDimension,
        variant: ExportVariant<'a>,
    ) -> ExportInput<'a> {
        ExportInput {
            report,
            dimension,
            filter_summary_primary: "Tahun 2025",
            filter_summary_secondary: "",
            summary: ExportSummary {
                total_revenue: dec!(8000),
                total_quantity: 8,
            },
            variant,
        }
    }

    #[test]
    fn test_empty_report_is_rejected() {
        let report = SalesReport::RevenueOnly(vec![]);
        let result = build_export_payload(input(
            &report,
            ReportDimension::Route,
            ExportVariant::Spreadsheet,
        ));
        assert!(matches!(result, Err(ReportError::NothingToExport)));
    }

    #[test]
    fn test_no_columns_is_rejected() {
        let report = unit_report();
        let columns = ColumnSelection::all(false);
        let variant = ExportVariant::Pdf {
            detail_rows: &[],
            columns: &columns,
        };
        let result = build_export_payload(input(&report, ReportDimension::Product, variant));
        assert!(matches!(result, Err(ReportError::NoColumnsSelected)));
    }

    #[test]
    fn test_spreadsheet_has_unit_columns_for_product() {
        let report = unit_report();
        let payload = build_export_payload(input(
            &report,
            ReportDimension::Product,
            ExportVariant::Spreadsheet,
        ))
        .unwrap();

        assert_eq!(payload.sections.len(), 1);
        let main = &payload.sections[0];
        assert_eq!(main.headers[0], "Produk");
        assert!(main.headers.contains(&"Total Unit".to_string()));
        assert_eq!(main.rows[0][0], "Kopi");
        assert_eq!(main.rows[0][2], "8");
        assert_eq!(main.rows[0][4], "1000");
    }

    #[test]
    fn test_revenue_only_dimension_drops_unit_columns() {
        let report = SalesReport::RevenueOnly(vec![ReportRow {
            key: "Jalur Utara".to_string(),
            transaction_count: 3,
            units: NoUnits {},
            revenue: dec!(1250.5),
            percentage: dec!(100),
            note: None,
            transaction_type: TransactionType::Normal,
        }]);
        let payload = build_export_payload(input(
            &report,
            ReportDimension::Route,
            ExportVariant::Spreadsheet,
        ))
        .unwrap();

        let main = &payload.sections[0];
        assert!(!main.headers.contains(&"Total Unit".to_string()));
        assert_eq!(main.headers.len(), main.rows[0].len());
        assert_eq!(main.rows[0][2], "1250.5");
    }

    #[test]
    fn test_pdf_lists_every_detail_line_separately() {
        let report = unit_report();
        let details = vec![
            detail(TransactionType::Return, "Kopi", 1),
            detail(TransactionType::Return, "Kopi", 1),
            detail(TransactionType::Spoilage, "Kopi", 2),
        ];
        let columns = ColumnSelection {
            note: false,
            transaction_type: false,
            ..ColumnSelection::default()
        };
        let variant = ExportVariant::Pdf {
            detail_rows: &details,
            columns: &columns,
        };
        let payload =
            build_export_payload(input(&report, ReportDimension::Product, variant)).unwrap();

        assert_eq!(payload.format, ExportFormat::Pdf);
        assert_eq!(payload.sections.len(), 3);
        assert_eq!(payload.sections[0].headers.len(), 6);
        assert_eq!(payload.sections[1].title, "Detail Retur");
        assert_eq!(payload.sections[1].rows.len(), 2);
        assert_eq!(payload.sections[2].title, "Detail BS");
        assert_eq!(payload.sections[2].rows[0][4], "2000");
    }

    #[test]
    fn test_only_unit_columns_for_revenue_dimension_is_rejected() {
        let report = SalesReport::RevenueOnly(vec![ReportRow {
            key: "Budi".to_string(),
            transaction_count: 1,
            units: NoUnits {},
            revenue: dec!(10),
            percentage: dec!(100),
            note: None,
            transaction_type: TransactionType::Normal,
        }]);
        let columns = ColumnSelection {
            total_units: true,
            ..ColumnSelection::all(false)
        };
        let variant = ExportVariant::Pdf {
            detail_rows: &[],
            columns: &columns,
        };
        let result = build_export_payload(input(&report, ReportDimension::Salesperson, variant));
        assert!(matches!(result, Err(ReportError::NoColumnsSelected)));
    }
}
