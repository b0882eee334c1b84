//! In-memory sources for unit tests

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::models::{Account, Page, PageRequest, Record};
use crate::source::SpendingSource;

/// Scripted answer for one page
pub enum Reply {
    Page { records: Vec<Record>, total_pages: u32, total_count: Option<u64> },
    Status(u16),
    Slow(Duration),
}

/// Source answering page `n` with `replies[n - 1]` and recording every call
pub struct ScriptedSource {
    replies: Vec<Reply>,
    calls: Mutex<Vec<PageRequest>>,
}

impl ScriptedSource {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self { replies, calls: Mutex::new(Vec::new()) }
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().iter().map(|r| r.page).collect()
    }

    pub fn requests(&self) -> Vec<PageRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpendingSource for ScriptedSource {
    async fn fetch(&self, request: &PageRequest) -> CoreResult<Page> {
        self.calls.lock().unwrap().push(request.clone());
        match self.replies.get(request.page as usize - 1) {
            Some(Reply::Page { records, total_pages, total_count }) => Ok(Page {
                records: records.clone(),
                page: request.page,
                page_size: request.page_size,
                total_pages: *total_pages,
                total_count: *total_count,
            }),
            Some(Reply::Status(status)) => Err(CoreError::UpstreamStatus { status: *status }),
            Some(Reply::Slow(delay)) => {
                tokio::time::sleep(*delay).await;
                Err(CoreError::UpstreamUnreachable { message: "slow".to_string() })
            }
            None => Err(CoreError::UpstreamStatus { status: 404 }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn page(ids: &[&str], total_pages: u32) -> Reply {
    Reply::Page {
        records: ids.iter().map(|id| record(id, "1.00", Some("Meals"))).collect(),
        total_pages,
        total_count: None,
    }
}

pub fn record(id: &str, amount: &str, account: Option<&str>) -> Record {
    Record {
        spending_id: id.to_string(),
        amount: amount.to_string(),
        description: format!("item {}", id),
        spend_date: "2024-01-31".to_string(),
        account: account.map(|name| Account {
            account_id: format!("A-{}", name),
            account_code: "6100".to_string(),
            account_name: name.to_string(),
            account_type: "Expense".to_string(),
        }),
    }
}
