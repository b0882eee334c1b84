//! Spending table feed
//!
//! Endpoints:
//! - api_spending: one table page as JSON
//! - api_spending_export: the same page as `spending_page_<n>.csv`
//!
//! Each request builds its own `TableView` from the query string; nothing
//! about the selected page or account lives in server-wide state.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use spendboard_config::Config;
use spendboard_core::{LoadStatus, Record, TableQuery, TableView};

use super::csv_response;
use crate::{ApiError, AppState};

/// Query string of the table endpoints
#[derive(Debug, Default, Deserialize)]
pub struct SpendingParams {
    pub page: Option<u32>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<u32>,
    #[serde(rename = "AccountName")]
    pub account: Option<String>,
}

impl SpendingParams {
    pub fn to_query(&self, config: &Config) -> Result<TableQuery, ApiError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(ApiError::BadRequest {
                message: "page must be at least 1".to_string(),
            });
        }

        let max = config.pagination.max_page_size;
        let page_size = self
            .page_size
            .unwrap_or(config.pagination.default_page_size as u32);
        if page_size == 0 || page_size as usize > max {
            return Err(ApiError::BadRequest {
                message: format!("pageSize must be between 1 and {}", max),
            });
        }

        Ok(TableQuery {
            page,
            page_size,
            account: self.account.clone().filter(|a| !a.is_empty()),
        })
    }
}

/// JSON shape of one table page
#[derive(Debug, Serialize)]
pub struct SpendingPageResponse {
    pub data: Vec<Record>,
    #[serde(rename = "totalCount")]
    pub total_count: u64,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    pub status: LoadStatus,
}

async fn load_view(state: &AppState, params: &SpendingParams) -> Result<TableView, ApiError> {
    let mut view = TableView::new(params.to_query(&state.config)?);
    view.refresh(state.table_source.as_ref()).await?;
    Ok(view)
}

/// Get one page of the spending table (JSON API)
pub async fn api_spending(
    State(state): State<AppState>,
    Query(params): Query<SpendingParams>,
) -> Result<Json<SpendingPageResponse>, ApiError> {
    let view = load_view(&state, &params).await?;

    Ok(Json(SpendingPageResponse {
        total_count: view.total_count,
        page: view.query.page,
        page_size: view.query.page_size,
        total_pages: view.total_pages,
        status: view.status,
        data: view.rows,
    }))
}

/// Download one page of the spending table as CSV; 204 when it is empty
pub async fn api_spending_export(
    State(state): State<AppState>,
    Query(params): Query<SpendingParams>,
) -> Result<Response, ApiError> {
    let view = load_view(&state, &params).await?;

    match view.export_page()? {
        Some(download) => Ok(csv_response(download)),
        None => {
            log::debug!("Page {} has no rows, nothing to export", view.query.page);
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_defaults() {
        let config = Config::default();
        let query = SpendingParams::default().to_query(&config).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 25);
        assert_eq!(query.account, None);
    }

    #[test]
    fn test_params_validation() {
        let config = Config::default();
        let zero_page = SpendingParams { page: Some(0), ..SpendingParams::default() };
        assert!(zero_page.to_query(&config).is_err());

        let too_big = SpendingParams { page_size: Some(20000), ..SpendingParams::default() };
        assert!(too_big.to_query(&config).is_err());

        let empty_account = SpendingParams { account: Some(String::new()), ..SpendingParams::default() };
        assert_eq!(empty_account.to_query(&config).unwrap().account, None);
    }
}
