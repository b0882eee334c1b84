//! Uploaded transaction CSV parsing and summaries
//!
//! Uploads carry a header row with at least `Date`, `Category` and
//! `Amount`. Header names are trimmed, blank lines skipped and short
//! rows padded with empty values.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

const INCOME_CATEGORIES: [&str; 3] = ["Salary", "Bonus", "Side Income"];
const EXPENSE_CATEGORY: &str = "Expense";
const LOAN_CATEGORY: &str = "Loans";
const INVESTMENT_CATEGORY: &str = "Investments";

/// One uploaded row, keyed by header name in file order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRow {
    pub fields: Vec<(String, String)>,
}

impl UploadRow {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn category(&self) -> &str {
        self.get("Category").unwrap_or("")
    }

    pub fn date(&self) -> &str {
        self.get("Date").map(str::trim).unwrap_or("")
    }

    /// Parsed amount, `None` when missing or not a number
    pub fn amount(&self) -> Option<Decimal> {
        self.get("Amount").and_then(|a| Decimal::from_str(a.trim()).ok())
    }
}

/// Parse an uploaded CSV document
pub fn parse_upload(text: &str) -> CoreResult<Vec<UploadRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CoreError::ValidationError {
            message: "uploaded CSV has no header row".to_string(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, header)| (header.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(UploadRow { fields });
    }

    Ok(rows)
}

/// Optional category/date selection; `"All"` means no filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFilter {
    pub category: Option<String>,
    pub date: Option<String>,
}

impl UploadFilter {
    fn normalized(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.is_empty() && *v != "All")
    }

    pub fn matches(&self, row: &UploadRow) -> bool {
        let category_ok = Self::normalized(&self.category).map_or(true, |c| row.category() == c);
        let date_ok = Self::normalized(&self.date).map_or(true, |d| row.date() == d);
        category_ok && date_ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTotal {
    pub date: String,
    pub total: Decimal,
}

/// Dashboard figures computed from an upload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadSummary {
    pub row_count: usize,
    pub categories: Vec<String>,
    pub dates: Vec<String>,
    pub totals_by_date: Vec<DateTotal>,
    pub income: Decimal,
    pub expenses: Decimal,
    pub loans: Decimal,
    pub investments: Decimal,
    pub savings: Decimal,
    /// Expenses as a percentage of income; absent without income
    pub financial_score: Option<Decimal>,
    pub filtered_count: usize,
    pub filtered_total: Decimal,
}

fn sum_where<F>(rows: &[UploadRow], predicate: F) -> Decimal
where
    F: Fn(&UploadRow) -> bool,
{
    rows.iter()
        .filter(|row| predicate(row))
        .filter_map(UploadRow::amount)
        .sum()
}

/// Compute the upload summary
pub fn summarize_upload(rows: &[UploadRow], filter: &UploadFilter) -> UploadSummary {
    let mut categories: Vec<String> = Vec::new();
    for row in rows {
        let category = row.category();
        if !category.is_empty() && !categories.iter().any(|c| c == category) {
            categories.push(category.to_string());
        }
    }

    let mut by_date: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in rows {
        let date = row.date();
        if date.is_empty() {
            continue;
        }
        if let Some(amount) = row.amount() {
            *by_date.entry(date.to_string()).or_insert(Decimal::ZERO) += amount;
        }
    }

    let dates: Vec<String> = rows
        .iter()
        .map(|r| r.date())
        .filter(|d| !d.is_empty())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let income = sum_where(rows, |r| INCOME_CATEGORIES.contains(&r.category()));
    let expenses = sum_where(rows, |r| r.category() == EXPENSE_CATEGORY);
    let loans = sum_where(rows, |r| r.category() == LOAN_CATEGORY);
    let investments = sum_where(rows, |r| r.category() == INVESTMENT_CATEGORY);

    let financial_score = if income.is_zero() {
        None
    } else {
        expenses
            .checked_div(income)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .map(|score| score.round_dp(2))
    };

    let filtered: Vec<&UploadRow> = rows.iter().filter(|r| filter.matches(r)).collect();

    UploadSummary {
        row_count: rows.len(),
        categories,
        dates,
        totals_by_date: by_date
            .into_iter()
            .map(|(date, total)| DateTotal { date, total })
            .collect(),
        income,
        expenses,
        loans,
        investments,
        savings: income - expenses,
        financial_score,
        filtered_count: filtered.len(),
        filtered_total: filtered.iter().filter_map(|r| r.amount()).sum(),
    }
}
