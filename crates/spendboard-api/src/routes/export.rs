//! Full CSV export
//!
//! `GET /api/export-csv` sweeps the spending feed page by page and answers
//! with the whole document as an attachment. Any failed page turns into a
//! 500 with a generic body; no partial CSV is ever sent.

use axum::extract::State;
use axum::response::Response;
use spendboard_core::{export_all, DefaultErrorLogger, ErrorContext, ErrorLogger, EXPORT_PAGE_SIZE};
use std::time::Duration;

use super::csv_response;
use crate::{ApiError, AppState};

pub async fn api_export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let deadline = Duration::from_secs(state.config.export.deadline_secs);

    match export_all(state.export_source.as_ref(), &state.config.export.filename, deadline).await {
        Ok(download) => {
            log::info!(
                "CSV export ready: {} ({} bytes)",
                download.filename,
                download.body.len()
            );
            Ok(csv_response(download))
        }
        Err(e) => {
            let context = ErrorContext::new("export_csv")
                .with_data("source", serde_json::json!(state.export_source.name()))
                .with_data("page_size", serde_json::json!(EXPORT_PAGE_SIZE))
                .with_data("failed_page", serde_json::json!(e.failed_page()));
            DefaultErrorLogger.log_error(&e, &context);
            Err(ApiError::ExportFailed)
        }
    }
}
