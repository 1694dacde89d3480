use crate::error::{AppError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, ParseError};
use std::fmt::Write;

/// One logged row of the time sheet: date, project, task and a duration or note.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntry {
    pub date: NaiveDateTime,
    pub project: String,
    pub task: String,
    pub value: String,
}

impl TimeEntry {
    pub fn new(
        date: NaiveDateTime,
        project: impl Into<String>,
        task: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            date,
            project: project.into(),
            task: task.into(),
            value: value.into(),
        }
    }
}

pub trait FromSheetRows: Sized {
    /// Convert data rows (no header row) to a list of entries, parsing dates with `date_format`.
    fn from_sheet_rows(rows: &[Vec<String>], date_format: &str) -> Result<Vec<Self>>;
}

pub trait ToSheetRows {
    /// Convert a list of entries to rows of cells, rendering dates with `date_format`.
    fn to_sheet_rows(&self, date_format: &str) -> Result<Vec<Vec<String>>>;
}

impl FromSheetRows for TimeEntry {
    fn from_sheet_rows(rows: &[Vec<String>], date_format: &str) -> Result<Vec<Self>> {
        let mut entries = Vec::with_capacity(rows.len());

        for (idx, row) in rows.iter().enumerate() {
            let date_cell = row.first().ok_or_else(|| {
                AppError::Format(format!("Row {} has no date cell", idx + 1))
            })?;
            let date = parse_date(date_cell, date_format).map_err(|e| {
                AppError::Format(format!(
                    "Row {}: {}",
                    idx + 1,
                    mismatch_message(date_cell, date_format, e)
                ))
            })?;

            // The API drops trailing empty cells
            let cell = |i: usize| row.get(i).cloned().unwrap_or_default();

            entries.push(TimeEntry {
                date,
                project: cell(1),
                task: cell(2),
                value: cell(3),
            });
        }

        Ok(entries)
    }
}

impl ToSheetRows for [TimeEntry] {
    fn to_sheet_rows(&self, date_format: &str) -> Result<Vec<Vec<String>>> {
        self.iter()
            .map(|entry| {
                Ok(vec![
                    format_sheet_date(&entry.date, date_format)?,
                    entry.project.clone(),
                    entry.task.clone(),
                    entry.value.clone(),
                ])
            })
            .collect()
    }
}

/// Parse a date cell into a timestamp. Formats without a time component yield midnight.
pub fn parse_sheet_date(cell: &str, date_format: &str) -> Result<NaiveDateTime> {
    parse_date(cell, date_format)
        .map_err(|e| AppError::Format(mismatch_message(cell, date_format, e)))
}

fn parse_date(cell: &str, date_format: &str) -> std::result::Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(cell, date_format).or_else(|_| {
        NaiveDate::parse_from_str(cell, date_format).map(|date| date.and_time(NaiveTime::MIN))
    })
}

fn mismatch_message(cell: &str, date_format: &str, err: ParseError) -> String {
    format!(
        "'{}' does not match date format '{}': {}",
        cell, date_format, err
    )
}

/// Render a timestamp with the sheet date format.
pub fn format_sheet_date(date: &NaiveDateTime, date_format: &str) -> Result<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", date.format(date_format))
        .map_err(|_| AppError::Format(format!("Invalid date format '{}'", date_format)))?;
    Ok(rendered)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_sheet_rows_with_data() {
        let rows = vec![
            row(&["23/11/2024", "Acme", "Support", "7.5"]),
            row(&["24/11/2024", "Initech", "Reports", "holiday"]),
        ];

        let entries = TimeEntry::from_sheet_rows(&rows, "%d/%m/%Y").unwrap();
        let expected = vec![
            test_helpers::mock_entry(2024, 11, 23, "7.5"),
            TimeEntry::new(
                test_helpers::mock_date(2024, 11, 24),
                "Initech",
                "Reports",
                "holiday",
            ),
        ];
        assert_eq!(entries, expected);
    }

    #[test]
    fn test_from_sheet_rows_pads_missing_cells() {
        let rows = vec![row(&["23/11/2024", "Acme"])];

        let entries = TimeEntry::from_sheet_rows(&rows, "%d/%m/%Y").unwrap();
        assert_eq!(entries[0].project, "Acme");
        assert_eq!(entries[0].task, "");
        assert_eq!(entries[0].value, "");
    }

    #[test]
    fn test_from_sheet_rows_empty() {
        let entries = TimeEntry::from_sheet_rows(&[], "%d/%m/%Y").unwrap();
        assert_eq!(entries, vec![]);
    }

    #[test]
    fn test_from_sheet_rows_rejects_mismatched_date() {
        let rows = vec![
            row(&["23/11/2024", "Acme", "Support", "7.5"]),
            row(&["2024-11-24", "Acme", "Support", "7.5"]),
        ];

        let err = TimeEntry::from_sheet_rows(&rows, "%d/%m/%Y").unwrap_err();
        match err {
            AppError::Format(msg) => {
                assert!(msg.starts_with("Row 2: '2024-11-24'"), "got: {msg}");
                assert!(!msg.contains("Date format error"), "got: {msg}");
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_sheet_rows_rejects_empty_row() {
        let rows = vec![vec![]];
        let result = TimeEntry::from_sheet_rows(&rows, "%d/%m/%Y");
        assert!(matches!(result, Err(AppError::Format(_))));
    }

    #[test]
    fn test_parse_sheet_date_with_time() {
        let date = parse_sheet_date("2024-11-23 09:30", "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(date.to_string(), "2024-11-23 09:30:00");
    }

    #[test]
    fn test_parse_sheet_date_date_only_is_midnight() {
        let date = parse_sheet_date("23/11/2024", "%d/%m/%Y").unwrap();
        assert_eq!(date, test_helpers::mock_date(2024, 11, 23));
    }

    #[test]
    fn test_parse_sheet_date_rejects_trailing_text() {
        for cell in ["23/11/2024   ", "23/11/2024 extra"] {
            let result = parse_sheet_date(cell, "%d/%m/%Y");
            assert!(matches!(result, Err(AppError::Format(_))), "accepted {cell:?}");
        }
    }

    #[test]
    fn test_parse_sheet_date_error_names_cell_once() {
        let err = parse_sheet_date("x", "%d/%m/%Y").unwrap_err();
        assert_eq!(err.to_string().matches("Date format error").count(), 1);
        assert!(err.to_string().contains("'x' does not match date format '%d/%m/%Y'"));
    }

    #[test]
    fn test_to_sheet_rows_renders_format() {
        let entries = vec![test_helpers::mock_entry(2024, 1, 5, "8")];
        let rows = entries.as_slice().to_sheet_rows("%d/%m/%Y").unwrap();
        assert_eq!(rows, vec![vec!["05/01/2024", "Acme", "Support", "8"]]);
    }

    #[test]
    fn test_to_sheet_rows_rejects_invalid_format() {
        let entries = vec![test_helpers::mock_entry(2024, 1, 5, "8")];
        let result = entries.as_slice().to_sheet_rows("%Q");
        assert!(matches!(result, Err(AppError::Format(_))));
    }

    #[test]
    fn test_written_date_reads_back_to_same_timestamp() {
        let entry = TimeEntry::new(
            parse_sheet_date("2024-02-29 17:45", "%Y-%m-%d %H:%M").unwrap(),
            "Acme",
            "Support",
            "1",
        );
        let rows = vec![entry.clone()]
            .as_slice()
            .to_sheet_rows("%Y-%m-%d %H:%M")
            .unwrap();
        let reread = TimeEntry::from_sheet_rows(&rows, "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(reread, vec![entry]);
    }
}
