//! Aggregation sweep over a paginated source
//!
//! Pages are fetched strictly one after another. The page count is read
//! from page 1 and frozen for the rest of the sweep; the first failing
//! page aborts everything, so callers never see a truncated result.

use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::models::{CsvRow, PageRequest, Record};
use crate::projector::project;
use crate::source::SpendingSource;

/// Page size used by the full export sweep
pub const EXPORT_PAGE_SIZE: u32 = 10000;

async fn sweep<F>(source: &dyn SpendingSource, page_size: u32, mut sink: F) -> CoreResult<u32>
where
    F: FnMut(Vec<Record>),
{
    let first = fetch_page(source, 1, page_size).await?;
    let total_pages = first.total_pages;
    log::debug!(
        "{}: page 1/{} returned {} records",
        source.name(),
        total_pages,
        first.records.len()
    );
    sink(first.records);

    for page in 2..=total_pages {
        let next = fetch_page(source, page, page_size).await?;
        log::debug!(
            "{}: page {}/{} returned {} records",
            source.name(),
            page,
            total_pages,
            next.records.len()
        );
        sink(next.records);
    }

    Ok(total_pages.max(1))
}

async fn fetch_page(
    source: &dyn SpendingSource,
    page: u32,
    page_size: u32,
) -> CoreResult<crate::models::Page> {
    source
        .fetch(&PageRequest::new(page, page_size))
        .await
        .map_err(|e| CoreError::PageFetch { page, source: Box::new(e) })
}

/// Collect every upstream record across all pages, in page order
pub async fn collect_records(source: &dyn SpendingSource, page_size: u32) -> CoreResult<Vec<Record>> {
    let mut records = Vec::new();
    let pages = sweep(source, page_size, |batch| records.extend(batch)).await?;
    log::info!("{}: collected {} records from {} page(s)", source.name(), records.len(), pages);
    Ok(records)
}

/// Collect every record projected into export rows, in page order
pub async fn collect_all(source: &dyn SpendingSource, page_size: u32) -> CoreResult<Vec<CsvRow>> {
    let mut rows = Vec::new();
    let pages = sweep(source, page_size, |batch| rows.extend(batch.iter().map(project))).await?;
    log::info!("{}: collected {} rows from {} page(s)", source.name(), rows.len(), pages);
    Ok(rows)
}

/// [`collect_all`] bounded by an overall deadline
pub async fn collect_all_within(
    source: &dyn SpendingSource,
    page_size: u32,
    deadline: Duration,
) -> CoreResult<Vec<CsvRow>> {
    within(deadline, collect_all(source, page_size)).await
}

/// [`collect_records`] bounded by an overall deadline
pub async fn collect_records_within(
    source: &dyn SpendingSource,
    page_size: u32,
    deadline: Duration,
) -> CoreResult<Vec<Record>> {
    within(deadline, collect_records(source, page_size)).await
}

async fn within<T, F>(deadline: Duration, fut: F) -> CoreResult<T>
where
    F: std::future::Future<Output = CoreResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(CoreError::DeadlineExceeded { seconds: deadline.as_secs() }),
    }
}
