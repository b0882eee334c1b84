//! Interactive spending table state
//!
//! A [`TableView`] belongs to one viewer session. It remembers the
//! selected page, page size and account filter together with the rows of
//! the last successful load. A failed refresh keeps whatever was shown
//! before; only a successful zero-row answer moves the view to
//! [`LoadStatus::Empty`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::csv_export::{page_filename, serialize, CsvDownload};
use crate::error::CoreResult;
use crate::models::{PageRequest, Record, PAGE_COLUMNS};
use crate::projector::project_all;
use crate::source::SpendingSource;

/// Default rows per page of the table
pub const DEFAULT_TABLE_PAGE_SIZE: u32 = 25;

/// What the table currently holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing fetched yet
    NotLoaded,
    /// Last successful fetch returned rows
    Loaded,
    /// Last successful fetch returned no rows
    Empty,
}

/// Selected page, size and account filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableQuery {
    pub page: u32,
    pub page_size: u32,
    pub account: Option<String>,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_TABLE_PAGE_SIZE,
            account: None,
        }
    }
}

impl TableQuery {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size).with_account(self.account.clone())
    }
}

/// Session-scoped table view
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub query: TableQuery,
    pub rows: Vec<Record>,
    pub total_count: u64,
    pub total_pages: u32,
    pub status: LoadStatus,
    pub last_error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new(TableQuery::default())
    }
}

impl TableView {
    pub fn new(query: TableQuery) -> Self {
        Self {
            query,
            rows: Vec::new(),
            total_count: 0,
            total_pages: 0,
            status: LoadStatus::NotLoaded,
            last_error: None,
            loaded_at: None,
        }
    }

    /// Fetch the current query's page.
    ///
    /// On failure the previously loaded rows, totals and status stay as
    /// they were; the error is remembered and returned.
    pub async fn refresh(&mut self, source: &dyn SpendingSource) -> CoreResult<()> {
        match source.fetch(&self.query.to_request()).await {
            Ok(page) => {
                self.total_count = page.total_count.unwrap_or(page.records.len() as u64);
                self.total_pages = page.total_pages;
                self.status = if page.records.is_empty() {
                    LoadStatus::Empty
                } else {
                    LoadStatus::Loaded
                };
                self.rows = page.records;
                self.last_error = None;
                self.loaded_at = Some(Utc::now());
                Ok(())
            }
            Err(e) => {
                log::warn!(
                    "{}: table refresh failed for page {}: {}",
                    source.name(),
                    self.query.page,
                    e
                );
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Select an account; `None` or an empty name clears the filter
    pub fn set_account(&mut self, account: Option<String>) {
        self.query.account = account.filter(|a| !a.is_empty());
        self.query.page = 1;
    }

    /// Change the page size and go back to the first page
    pub fn set_page_size(&mut self, page_size: u32) {
        self.query.page_size = page_size.max(1);
        self.query.page = 1;
    }

    pub fn next_page(&mut self) {
        if self.query.page < self.total_pages {
            self.query.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.query.page = self.query.page.saturating_sub(1).max(1);
    }

    /// Export the loaded page; `None` when there is nothing to export
    pub fn export_page(&self) -> CoreResult<Option<CsvDownload>> {
        if self.rows.is_empty() {
            return Ok(None);
        }
        let body = serialize(&PAGE_COLUMNS, &project_all(&self.rows))?;
        Ok(Some(CsvDownload::new(page_filename(self.query.page), body)))
    }
}
