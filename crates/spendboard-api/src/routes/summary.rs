//! Per-account spending totals over the full spending feed

use axum::extract::State;
use axum::Json;
use spendboard_core::{collect_records_within, summarize, AccountSummary, EXPORT_PAGE_SIZE};
use std::time::Duration;

use crate::{ApiError, AppState};

pub async fn api_summary(State(state): State<AppState>) -> Result<Json<AccountSummary>, ApiError> {
    let deadline = Duration::from_secs(state.config.export.deadline_secs);
    let records = collect_records_within(state.export_source.as_ref(), EXPORT_PAGE_SIZE, deadline)
        .await
        .map_err(|e| {
            log::error!("Summary sweep over {} failed: {}", state.export_source.name(), e);
            ApiError::from(e)
        })?;

    Ok(Json(summarize(&records)))
}
