//! Spending data aggregation and CSV export
//!
//! - `source`: paginated upstream sources (`SpendingSource`, reqwest impl)
//! - `projector`: upstream record to flat export row
//! - `aggregate`: sequential sweep over every upstream page
//! - `csv_export`: always-quoted, CRLF-joined CSV documents
//! - `table`: session-scoped table view with page export
//! - `summary`: per-account totals
//! - `upload`: uploaded CSV parsing and dashboard figures

pub mod error;
pub mod models;
pub mod source;
pub mod projector;
pub mod aggregate;
pub mod csv_export;
pub mod table;
pub mod summary;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorLogger, ErrorSeverity};
pub use models::{Account, Column, CsvFields, CsvRow, Page, PageRequest, Record, EXPORT_COLUMNS, PAGE_COLUMNS};
pub use source::{HttpSpendingSource, SourceKind, SourceRef, SpendingSource};
pub use projector::{project, project_all};
pub use aggregate::{collect_all, collect_all_within, collect_records, collect_records_within, EXPORT_PAGE_SIZE};
pub use csv_export::{page_filename, serialize, CsvDownload};
pub use table::{LoadStatus, TableQuery, TableView};
pub use summary::{account_sums, summarize, AccountSummary, AccountTotal};
pub use upload::{parse_upload, summarize_upload, UploadFilter, UploadRow, UploadSummary};

/// Sweep every page of `source` and build the full export document
pub async fn export_all(
    source: &dyn SpendingSource,
    filename: &str,
    deadline: Duration,
) -> CoreResult<CsvDownload> {
    let rows = collect_all_within(source, EXPORT_PAGE_SIZE, deadline).await?;
    let body = serialize(&EXPORT_COLUMNS, &rows)?;
    Ok(CsvDownload::new(filename, body))
}
