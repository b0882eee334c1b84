//! Route modules for the API server
//!
//! - export: full CSV export over every upstream page
//! - spending: interactive table feed and single-page CSV export
//! - summary: per-account totals
//! - upload: uploaded CSV summaries

pub mod export;
pub mod spending;
pub mod summary;
pub mod upload;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use spendboard_core::CsvDownload;

/// Turn a CSV document into a file download response
pub fn csv_response(download: CsvDownload) -> Response {
    let disposition = download.content_disposition();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(download.body),
    )
        .into_response()
}
