use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;

/// All application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D402 SALES REPORT
        // ========================================
        .route(
            "/api/d402/sales_report",
            post(handlers::d402_sales_report::get_sales_report),
        )
        .route(
            "/api/d402/sales_report/monthly_series",
            post(handlers::d402_sales_report::get_monthly_series),
        )
        .route(
            "/api/d402/sales_report/export",
            post(handlers::d402_sales_report::export_sales_report),
        )
        .route(
            "/api/d402/filter_options",
            get(handlers::d402_sales_report::get_filter_options),
        )
}
