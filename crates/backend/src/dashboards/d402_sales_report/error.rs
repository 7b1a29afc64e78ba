use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors of the sales report engine
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Could not load transactions: {0}")]
    SourceUnavailable(String),

    #[error("Could not load date-range data: {0}")]
    DateRangeFetchFailed(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Nothing to export: the report has no rows")]
    NothingToExport,

    #[error("Nothing to export: no columns selected")]
    NoColumnsSelected,

    #[error("Export writer failed: {0}")]
    ExportWrite(String),
}

impl ReportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ReportError::SourceUnavailable(_) | ReportError::DateRangeFetchFailed(_) => {
                StatusCode::BAD_GATEWAY
            }
            ReportError::InvalidDateRange { .. } => StatusCode::BAD_REQUEST,
            ReportError::NothingToExport | ReportError::NoColumnsSelected => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ReportError::ExportWrite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}
