use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use contracts::dashboards::d402_sales_report::{
    FilterOptions, MonthlySeriesResponse, ReportFilter, SalesExportRequest, SalesReportRequest,
    SalesReportResponse,
};
use std::sync::Arc;

use crate::dashboards::d402_sales_report::service;
use crate::dashboards::d402_sales_report::writer::{CsvExportWriter, ExportWriter};
use crate::dashboards::d402_sales_report::ReportError;
use crate::shared::data::transaction_source::{get_source, TransactionSource};

fn source() -> Result<Arc<dyn TransactionSource>, ReportError> {
    get_source().ok_or_else(|| {
        tracing::error!("D402 Dashboard: transaction source is not initialized");
        ReportError::SourceUnavailable("transaction source is not initialized".to_string())
    })
}

/// POST /api/d402/sales_report
pub async fn get_sales_report(
    Json(request): Json<SalesReportRequest>,
) -> Result<Json<SalesReportResponse>, ReportError> {
    tracing::info!(
        "D402 Dashboard: Getting sales report by {} ({:?})",
        request.dimension,
        request.filter
    );

    let source = source()?;
    let response = service::get_sales_report(source.as_ref(), request).await?;

    tracing::info!(
        "D402 Dashboard: Returning {} rows, net revenue {}",
        response.report.len(),
        response.total_net_revenue
    );
    Ok(Json(response))
}

/// POST /api/d402/sales_report/monthly_series
pub async fn get_monthly_series(
    Json(filter): Json<ReportFilter>,
) -> Result<Json<MonthlySeriesResponse>, ReportError> {
    let source = source()?;
    let response = service::get_monthly_series(source.as_ref(), filter).await?;
    Ok(Json(response))
}

/// POST /api/d402/sales_report/export
pub async fn export_sales_report(
    Json(request): Json<SalesExportRequest>,
) -> Result<impl IntoResponse, ReportError> {
    tracing::info!(
        "D402 Dashboard: Exporting {:?} report by {}",
        request.format,
        request.dimension
    );

    let source = source()?;
    let writer = CsvExportWriter::default();
    let file_name = format!(
        "attachment; filename=\"laporan_penjualan_{}.{}\"",
        request.dimension.code(),
        writer.file_extension()
    );

    let bytes = service::export_report(source.as_ref(), request, &writer).await?;

    Ok((
        [
            (header::CONTENT_TYPE, writer.content_type().to_string()),
            (header::CONTENT_DISPOSITION, file_name),
        ],
        bytes,
    ))
}

/// GET /api/d402/filter_options
pub async fn get_filter_options() -> Result<Json<FilterOptions>, ReportError> {
    let source = source()?;
    let options = service::get_filter_options(source.as_ref()).await?;

    tracing::info!(
        "D402 Dashboard: Returning filter options ({} periods, {} products)",
        options.periods.len(),
        options.products.len()
    );
    Ok(Json(options))
}
