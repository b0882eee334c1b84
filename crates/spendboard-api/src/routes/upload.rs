//! Uploaded CSV summaries
//!
//! `POST /api/upload-csv` takes the raw CSV text as the request body and
//! answers with the dashboard figures. `category` and `date` query
//! parameters narrow the filtered total.

use axum::extract::Query;
use axum::Json;
use serde::Deserialize;
use spendboard_core::{parse_upload, summarize_upload, UploadFilter, UploadSummary};

use crate::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct UploadParams {
    pub category: Option<String>,
    pub date: Option<String>,
}

pub async fn api_upload_csv(
    Query(params): Query<UploadParams>,
    body: String,
) -> Result<Json<UploadSummary>, ApiError> {
    let rows = parse_upload(&body).map_err(|e| ApiError::BadRequest {
        message: format!("Invalid CSV upload: {}", e),
    })?;
    log::debug!("Parsed {} uploaded rows", rows.len());

    let filter = UploadFilter {
        category: params.category,
        date: params.date,
    };
    Ok(Json(summarize_upload(&rows, &filter)))
}
