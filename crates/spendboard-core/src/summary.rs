//! Per-account spending totals

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

use crate::models::Record;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountTotal {
    pub account_name: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    pub accounts: Vec<AccountTotal>,
    pub grand_total: Decimal,
    pub record_count: usize,
}

/// Parse an amount string; anything unparseable counts as zero
pub fn parse_amount(amount: &str) -> Decimal {
    Decimal::from_str(amount.trim()).unwrap_or(Decimal::ZERO)
}

/// Sum amounts by account name, in first-seen order.
///
/// Records without an account name are left out.
pub fn account_sums(records: &[Record]) -> Vec<AccountTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<AccountTotal> = Vec::new();

    for record in records {
        let name = match record.account.as_ref().map(|a| a.account_name.as_str()) {
            Some(name) if !name.is_empty() => name,
            _ => continue,
        };
        let amount = parse_amount(&record.amount);
        match index.get(name) {
            Some(&i) => totals[i].total += amount,
            None => {
                index.insert(name, totals.len());
                totals.push(AccountTotal { account_name: name.to_string(), total: amount });
            }
        }
    }

    totals
}

/// Account totals plus the grand total over every record
pub fn summarize(records: &[Record]) -> AccountSummary {
    AccountSummary {
        accounts: account_sums(records),
        grand_total: records.iter().map(|r| parse_amount(&r.amount)).sum(),
        record_count: records.len(),
    }
}
