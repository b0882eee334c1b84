//! Record projection into export rows

use crate::models::{CsvRow, Record};

/// Flatten a record into a [`CsvRow`].
///
/// Never fails. A missing account yields empty account columns and the
/// row is kept.
pub fn project(record: &Record) -> CsvRow {
    let (account_code, account_name, account_type) = match &record.account {
        Some(account) => (
            account.account_code.clone(),
            account.account_name.clone(),
            account.account_type.clone(),
        ),
        None => (String::new(), String::new(), String::new()),
    };

    CsvRow {
        spending_id: record.spending_id.clone(),
        amount: record.amount.clone(),
        description: record.description.clone(),
        spend_date: record.spend_date.clone(),
        account_code,
        account_name,
        account_type,
    }
}

/// Project a batch, preserving order
pub fn project_all(records: &[Record]) -> Vec<CsvRow> {
    records.iter().map(project).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Account;

    #[test]
    fn test_project_with_account() {
        let record = Record {
            spending_id: "S-1".to_string(),
            amount: "1,000.10".to_string(),
            description: "Rent".to_string(),
            spend_date: "01/02/2024".to_string(),
            account: Some(Account {
                account_id: "A-1".to_string(),
                account_code: "5000".to_string(),
                account_name: "Housing".to_string(),
                account_type: "Expense".to_string(),
            }),
        };

        let row = project(&record);
        assert_eq!(row.amount, "1,000.10");
        assert_eq!(row.spend_date, "01/02/2024");
        assert_eq!(row.account_code, "5000");
        assert_eq!(row.account_name, "Housing");
        assert_eq!(row.account_type, "Expense");
    }

    #[test]
    fn test_project_without_account() {
        let record = Record {
            spending_id: "S-2".to_string(),
            amount: "3.00".to_string(),
            description: "Coffee".to_string(),
            spend_date: "2024-02-02".to_string(),
            account: None,
        };

        let row = project(&record);
        assert_eq!(row.spending_id, "S-2");
        assert_eq!(row.account_code, "");
        assert_eq!(row.account_name, "");
        assert_eq!(row.account_type, "");
    }

    #[test]
    fn test_project_all_keeps_order() {
        let records: Vec<Record> = (1..=3)
            .map(|i| Record { spending_id: format!("S-{}", i), ..Record::default() })
            .collect();
        let ids: Vec<String> = project_all(&records).into_iter().map(|r| r.spending_id).collect();
        assert_eq!(ids, vec!["S-1", "S-2", "S-3"]);
    }
}
