use contracts::dashboards::d402_sales_report::{
    ExportFormat, ExportSummary, FilterOptions, MonthlySeriesPoint, MonthlySeriesResponse,
    NoUnits, ReportFilter, ReportRow, SalesExportRequest, SalesReport, SalesReportRequest,
    SalesReportResponse, TransactionRecord, UnitMeasure, UnitTotals,
};
use contracts::enums::report_dimension::ReportDimension;
use rust_decimal::Decimal;

use super::aggregator::aggregate;
use super::error::ReportError;
use super::export::{build_export_payload, ExportInput, ExportVariant};
use super::filter::{filter_by_ids, filter_by_period};
use super::percentage::apply_percentages;
use super::period::sort_chronologically;
use super::sorter::sort_rows;
use super::summary::{
    collect_detail_rows, describe_filter, filter_options, report_summary, reversal_value,
};
use super::writer::ExportWriter;
use crate::shared::data::transaction_source::TransactionSource;
use crate::shared::format::format_rupiah;

/// Aggregate, compute shares and sort one row shape
fn run_pipeline<U: UnitMeasure>(
    subset: &[&TransactionRecord],
    dimension: ReportDimension,
) -> (Vec<ReportRow<U>>, Decimal) {
    let mut rows = aggregate::<U>(subset, dimension);
    let total = apply_percentages(&mut rows);
    sort_rows(&mut rows, dimension);
    (rows, total)
}

/// Report rows and total net revenue of an already filtered subset
pub fn compute_report(
    subset: &[&TransactionRecord],
    dimension: ReportDimension,
) -> (SalesReport, Decimal) {
    if dimension.tracks_units() {
        let (rows, total) = run_pipeline::<UnitTotals>(subset, dimension);
        (SalesReport::WithUnits(rows), total)
    } else {
        let (rows, total) = run_pipeline::<NoUnits>(subset, dimension);
        (SalesReport::RevenueOnly(rows), total)
    }
}

/// Revenue per period in calendar order, for the chart
pub fn build_monthly_series(subset: &[&TransactionRecord]) -> Vec<MonthlySeriesPoint> {
    let mut points: Vec<MonthlySeriesPoint> = aggregate::<NoUnits>(subset, ReportDimension::Period)
        .into_iter()
        .map(|row| MonthlySeriesPoint {
            period: row.key,
            revenue: row.revenue,
            transaction_count: row.transaction_count,
        })
        .collect();
    sort_chronologically(&mut points, |p| p.period.as_str());
    points
}

/// Records the filter mode draws from: the full feed in period mode,
/// the inclusive date window otherwise
async fn fetch_records(
    source: &dyn TransactionSource,
    filter: &ReportFilter,
) -> Result<Vec<TransactionRecord>, ReportError> {
    match filter {
        ReportFilter::Period(_) => source.fetch_all().await.map_err(|e| {
            tracing::error!("D402: failed to load transactions: {}", e);
            ReportError::SourceUnavailable(e.to_string())
        }),
        ReportFilter::DateRange(range) => {
            if range.start_date > range.end_date {
                tracing::warn!(
                    "D402: rejected date range {} > {}",
                    range.start_date,
                    range.end_date
                );
                return Err(ReportError::InvalidDateRange {
                    start: range.start_date,
                    end: range.end_date,
                });
            }
            source
                .fetch_by_date_range(range.start_date, range.end_date)
                .await
                .map_err(|e| {
                    tracing::error!("D402: failed to load date-range data: {}", e);
                    ReportError::DateRangeFetchFailed(e.to_string())
                })
        }
    }
}

/// Working subset of the fetched records
fn select<'a>(
    records: &'a [TransactionRecord],
    filter: &ReportFilter,
    dimension: ReportDimension,
) -> Vec<&'a TransactionRecord> {
    match filter {
        ReportFilter::Period(period) => filter_by_period(records, period, dimension),
        ReportFilter::DateRange(range) => {
            filter_by_ids(records, &range.product_ids, &range.salesperson_ids)
        }
    }
}

pub async fn get_sales_report(
    source: &dyn TransactionSource,
    request: SalesReportRequest,
) -> Result<SalesReportResponse, ReportError> {
    let dimension = request.dimension;
    let records = fetch_records(source, &request.filter).await?;
    let subset = select(&records, &request.filter, dimension);

    let (report, total_net_revenue) = compute_report(&subset, dimension);
    let summary = report_summary(&subset);
    let (filter_summary_primary, filter_summary_secondary) =
        describe_filter(&request.filter, &records);

    tracing::info!(
        "D402 Sales report: dimension={}, records={}, subset={}, rows={}, net={}, reversals={}",
        dimension,
        records.len(),
        subset.len(),
        report.len(),
        format_rupiah(total_net_revenue),
        format_rupiah(reversal_value(&summary))
    );
    tracing::debug!("D402 Sales report keys: {:?}", report.keys());

    Ok(SalesReportResponse {
        dimension,
        dimension_label: dimension.display_name().to_string(),
        tracks_units: dimension.tracks_units(),
        report,
        total_net_revenue,
        summary,
        filter_summary_primary,
        filter_summary_secondary,
    })
}

pub async fn get_monthly_series(
    source: &dyn TransactionSource,
    filter: ReportFilter,
) -> Result<MonthlySeriesResponse, ReportError> {
    let records = fetch_records(source, &filter).await?;
    let subset = select(&records, &filter, ReportDimension::Period);
    let points = build_monthly_series(&subset);
    let (filter_summary_primary, _) = describe_filter(&filter, &records);

    tracing::info!("D402 Monthly series: {} points", points.len());

    Ok(MonthlySeriesResponse {
        points,
        filter_summary_primary,
    })
}

/// Build the export file. The writer runs only after the payload guards pass.
pub async fn export_report(
    source: &dyn TransactionSource,
    request: SalesExportRequest,
    writer: &dyn ExportWriter,
) -> Result<Vec<u8>, ReportError> {
    let dimension = request.dimension;
    let records = fetch_records(source, &request.filter).await?;
    let subset = select(&records, &request.filter, dimension);

    let (report, _) = compute_report(&subset, dimension);
    let summary = report_summary(&subset);
    let (primary, secondary) = describe_filter(&request.filter, &records);
    let detail_rows = match request.format {
        ExportFormat::Pdf => collect_detail_rows(&subset),
        ExportFormat::Spreadsheet => Vec::new(),
    };

    let variant = match request.format {
        ExportFormat::Spreadsheet => ExportVariant::Spreadsheet,
        ExportFormat::Pdf => ExportVariant::Pdf {
            detail_rows: &detail_rows,
            columns: &request.columns,
        },
    };

    let payload = build_export_payload(ExportInput {
        report: &report,
        dimension,
        filter_summary_primary: &primary,
        filter_summary_secondary: &secondary,
        summary: ExportSummary {
            total_revenue: summary.total_revenue,
            total_quantity: report.total_units().unwrap_or(summary.total_quantity),
        },
        variant,
    })
    .map_err(|e| {
        tracing::warn!("D402 Export rejected: {}", e);
        e
    })?;

    let bytes = writer.write(&payload).map_err(|e| {
        tracing::error!("D402 Export writer failed: {}", e);
        ReportError::ExportWrite(e.to_string())
    })?;

    tracing::info!(
        "D402 Export: dimension={}, sections={}, bytes={}",
        dimension,
        payload.sections.len(),
        bytes.len()
    );

    Ok(bytes)
}

pub async fn get_filter_options(
    source: &dyn TransactionSource,
) -> Result<FilterOptions, ReportError> {
    let records = fetch_records(source, &ReportFilter::default()).await?;
    Ok(filter_options(&records))
}
