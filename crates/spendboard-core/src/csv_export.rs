//! CSV serialization
//!
//! Every field is quoted, inner quotes are doubled and lines are joined
//! with CRLF. The document carries no trailing line terminator.

use crate::error::{CoreError, CoreResult};
use crate::models::{Column, CsvFields};

/// Serialize `rows` under the given column layout.
///
/// The header line comes first; an empty `rows` yields the header only.
/// Keys a row does not know are written as empty fields so no column is
/// ever dropped.
pub fn serialize<R: CsvFields>(columns: &[Column], rows: &[R]) -> CoreResult<String> {
    if columns.is_empty() {
        return Err(CoreError::ValidationError {
            message: "CSV layout needs at least one column".to_string(),
        });
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .double_quote(true)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|c| c.label))?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| row.field(c.key).unwrap_or("")))?;
    }

    let bytes = writer.into_inner().map_err(|e| CoreError::Csv { message: e.to_string() })?;
    let mut text = String::from_utf8(bytes).map_err(|e| CoreError::Csv { message: e.to_string() })?;
    if text.ends_with("\r\n") {
        text.truncate(text.len() - 2);
    }
    Ok(text)
}

/// A CSV document ready to be handed out as a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDownload {
    pub filename: String,
    pub body: String,
}

impl CsvDownload {
    pub fn new(filename: impl Into<String>, body: String) -> Self {
        Self { filename: filename.into(), body }
    }

    /// `Content-Disposition` header value
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

/// Filename of the single-page export
pub fn page_filename(page: u32) -> String {
    format!("spending_page_{}.csv", page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CsvRow, EXPORT_COLUMNS, PAGE_COLUMNS};

    fn row(id: &str, description: &str) -> CsvRow {
        CsvRow {
            spending_id: id.to_string(),
            amount: "10.00".to_string(),
            description: description.to_string(),
            spend_date: "2024-05-01".to_string(),
            account_code: "6100".to_string(),
            account_name: "Meals".to_string(),
            account_type: "Expense".to_string(),
        }
    }

    #[test]
    fn test_header_only_for_empty_rows() {
        let rows: Vec<CsvRow> = vec![];
        let text = serialize(&EXPORT_COLUMNS, &rows).unwrap();
        assert_eq!(
            text,
            r#""Spending ID","Amount","Description","Spend Date","Account Code","Account Name","Account Type""#
        );
    }

    #[test]
    fn test_rows_joined_by_crlf() {
        let rows = vec![row("1", "Lunch"), row("2", "Taxi")];
        let text = serialize(&EXPORT_COLUMNS, &rows).unwrap();

        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], r#""1","10.00","Lunch","2024-05-01","6100","Meals","Expense""#);
        assert!(!text.ends_with("\r\n"));
    }

    #[test]
    fn test_embedded_quotes_doubled() {
        let rows = vec![row("1", r#"He said "hi""#)];
        let text = serialize(&EXPORT_COLUMNS, &rows).unwrap();
        assert!(text.contains(r#","He said ""hi""","#));
    }

    #[test]
    fn test_empty_fields_still_quoted() {
        let rows = vec![CsvRow { spending_id: "7".to_string(), ..CsvRow::default() }];
        let text = serialize(&EXPORT_COLUMNS, &rows).unwrap();
        let last = text.split("\r\n").last().unwrap();
        assert_eq!(last, r#""7","","","","","","""#);
    }

    #[test]
    fn test_page_layout_order() {
        let rows = vec![row("9", "Books")];
        let text = serialize(&PAGE_COLUMNS, &rows).unwrap();
        assert_eq!(
            text,
            "\"ID\",\"Description\",\"Amount\",\"Date\",\"Account\",\"Type\"\r\n\"9\",\"Books\",\"10.00\",\"2024-05-01\",\"Meals\",\"Expense\""
        );
    }

    #[test]
    fn test_values_not_reformatted() {
        let mut r = row("1", "x");
        r.amount = "1,234.5000".to_string();
        r.spend_date = "31/12/2024".to_string();
        let text = serialize(&EXPORT_COLUMNS, &[r]).unwrap();
        assert!(text.contains(r#""1,234.5000","x","31/12/2024""#));
    }

    #[test]
    fn test_line_count_matches_rows() {
        for n in [0usize, 1, 5, 40] {
            let rows: Vec<CsvRow> = (0..n).map(|i| row(&i.to_string(), "plain")).collect();
            let text = serialize(&EXPORT_COLUMNS, &rows).unwrap();
            assert_eq!(text.split("\r\n").count(), n + 1);
        }
    }

    #[test]
    fn test_round_trip_through_reader() {
        let tricky = [
            r#"He said "hi""#,
            "comma, inside",
            "line\nbreak",
            "\"\"",
            "",
            "trailing space ",
        ];
        let rows: Vec<CsvRow> = tricky.iter().enumerate().map(|(i, d)| row(&i.to_string(), d)).collect();
        let text = serialize(&EXPORT_COLUMNS, &rows).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), EXPORT_COLUMNS.len());
        assert_eq!(&headers[0], "Spending ID");

        let decoded: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(decoded.len(), rows.len());
        for (record, original) in decoded.iter().zip(&rows) {
            for (i, column) in EXPORT_COLUMNS.iter().enumerate() {
                assert_eq!(&record[i], original.field(column.key).unwrap());
            }
        }
    }

    #[test]
    fn test_unknown_key_written_empty() {
        let columns = [Column { key: "SpendingID", label: "ID" }, Column { key: "Memo", label: "Memo" }];
        let text = serialize(&columns, &[row("3", "x")]).unwrap();
        assert_eq!(text, "\"ID\",\"Memo\"\r\n\"3\",\"\"");
    }

    #[test]
    fn test_empty_layout_rejected() {
        let rows = vec![row("1", "x")];
        assert!(serialize(&[], &rows).is_err());
    }

    #[test]
    fn test_download_metadata() {
        let download = CsvDownload::new(page_filename(4), String::new());
        assert_eq!(download.filename, "spending_page_4.csv");
        assert_eq!(download.content_disposition(), "attachment; filename=\"spending_page_4.csv\"");
    }
}
