//! Upstream record shapes and the flat row written to CSV

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Account reference nested inside a spending record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "AccountID", default, deserialize_with = "lenient_text")]
    pub account_id: String,
    #[serde(rename = "AccountCode", default, deserialize_with = "lenient_text")]
    pub account_code: String,
    #[serde(rename = "AccountName", default, deserialize_with = "lenient_text")]
    pub account_name: String,
    #[serde(rename = "AccountType", default, deserialize_with = "lenient_text")]
    pub account_type: String,
}

/// One spending entry as the upstream API returns it
///
/// Amount and date are kept as the exact upstream text; nothing here
/// parses or reformats them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "SpendingID", default, deserialize_with = "lenient_text")]
    pub spending_id: String,
    #[serde(rename = "Amount", default, deserialize_with = "lenient_text")]
    pub amount: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(rename = "SpendDate", default, deserialize_with = "lenient_text")]
    pub spend_date: String,
    #[serde(rename = "Account", default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

/// One decoded upstream page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub records: Vec<Record>,
    /// 1-based index of this page
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    /// Reported by table feeds only
    pub total_count: Option<u64>,
}

/// Parameters of a single page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
    /// Account name filter, honored by table feeds
    pub account: Option<String>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            account: None,
        }
    }

    pub fn with_account(mut self, account: Option<String>) -> Self {
        self.account = account.filter(|a| !a.is_empty());
        self
    }

    /// Check `page >= 1` and `page_size >= 1`
    pub fn validate(&self) -> Result<(), crate::CoreError> {
        if self.page == 0 {
            return Err(crate::CoreError::ValidationError {
                message: "page index must be at least 1".to_string(),
            });
        }
        if self.page_size == 0 {
            return Err(crate::CoreError::ValidationError {
                message: "page size must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Flat export row, one per [`Record`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CsvRow {
    pub spending_id: String,
    pub amount: String,
    pub description: String,
    pub spend_date: String,
    pub account_code: String,
    pub account_name: String,
    pub account_type: String,
}

/// Lookup of a field value by column key
pub trait CsvFields {
    fn field(&self, key: &str) -> Option<&str>;
}

impl CsvFields for CsvRow {
    fn field(&self, key: &str) -> Option<&str> {
        let value = match key {
            "SpendingID" => &self.spending_id,
            "Amount" => &self.amount,
            "Description" => &self.description,
            "SpendDate" => &self.spend_date,
            "AccountCode" => &self.account_code,
            "AccountName" => &self.account_name,
            "AccountType" => &self.account_type,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// A `(key, header label)` pair of a CSV layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

const fn column(key: &'static str, label: &'static str) -> Column {
    Column { key, label }
}

/// Layout of the full export
pub const EXPORT_COLUMNS: [Column; 7] = [
    column("SpendingID", "Spending ID"),
    column("Amount", "Amount"),
    column("Description", "Description"),
    column("SpendDate", "Spend Date"),
    column("AccountCode", "Account Code"),
    column("AccountName", "Account Name"),
    column("AccountType", "Account Type"),
];

/// Layout of the single-page export, matching the table columns
pub const PAGE_COLUMNS: [Column; 6] = [
    column("SpendingID", "ID"),
    column("Description", "Description"),
    column("Amount", "Amount"),
    column("SpendDate", "Date"),
    column("AccountName", "Account"),
    column("AccountType", "Type"),
];

/// Accept strings, numbers, booleans and null as text.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}

/// Non-negative whole numbers only, so `3.0` counts but `2.5` does not
fn whole_count(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then(|| f as u64)
}

/// Accept a count sent either as a JSON number or as a numeric string.
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                return Ok(Some(v));
            }
            n.as_f64()
                .and_then(whole_count)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid count: {}", n)))
        }
        Some(Value::String(s)) => {
            let text = s.trim();
            if let Ok(v) = text.parse::<u64>() {
                return Ok(Some(v));
            }
            text.parse::<f64>()
                .ok()
                .and_then(whole_count)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid count: {:?}", s)))
        }
        Some(other) => Err(D::Error::custom(format!("invalid count: {}", other))),
    }
}
