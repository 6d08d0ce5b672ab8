//! Spreadsheet references (`.csv`, `.xlsx`, `.xls`) summarized as text.
//!
//! The summary lists the columns, the row count, the first rows and basic
//! statistics for numeric columns.

use calamine::{Reader, Xls, Xlsx};
use deck_core::{Error, Result};
use std::fmt::Write as _;
use std::io::Cursor;

/// Rows shown under "Sample data".
const SAMPLE_ROWS: usize = 5;

/// A header row plus data rows, every cell as text.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn from_csv(bytes: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let columns = reader
            .headers()
            .map_err(spreadsheet_error)?
            .iter()
            .map(|cell| cell.trim().to_string())
            .collect();
        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(|cell| cell.trim().to_string()).collect::<Vec<String>>())
                    .map_err(spreadsheet_error)
            })
            .collect::<Result<Vec<Vec<String>>>>()?;

        Ok(Self { columns, rows })
    }

    /// First worksheet of an `.xlsx` or (legacy) `.xls` workbook.
    pub fn from_workbook(bytes: &[u8], legacy: bool) -> Result<Self> {
        let cursor = Cursor::new(bytes);
        let sheets = if legacy {
            Xls::new(cursor).map_err(spreadsheet_error)?.worksheets()
        } else {
            Xlsx::new(cursor).map_err(spreadsheet_error)?.worksheets()
        };

        let mut rows = sheets
            .into_iter()
            .next()
            .map(|(_, range)| {
                range
                    .rows()
                    .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
                    .collect::<Vec<Vec<String>>>()
            })
            .unwrap_or_default()
            .into_iter();

        let columns = rows.next().unwrap_or_default();
        Ok(Self {
            columns,
            rows: rows.collect(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(String::is_empty))
    }

    /// Text summary headed by the file name.
    pub fn summary(&self, filename: &str) -> String {
        let mut text = format!("File summary: {}\n\n", filename);
        let _ = writeln!(text, "Columns: {}", self.columns.join(", "));
        let _ = writeln!(text, "Rows: {}\n", self.rows.len());

        let _ = writeln!(text, "Sample data (first {} rows):", SAMPLE_ROWS);
        let _ = writeln!(text, "{}", self.columns.join(" | "));
        for row in self.rows.iter().take(SAMPLE_ROWS) {
            let _ = writeln!(text, "{}", row.join(" | "));
        }

        let stats: Vec<String> = (0..self.columns.len())
            .filter_map(|col| self.column_stats(col))
            .collect();
        if !stats.is_empty() {
            text.push_str("\nStatistical summary:\n");
            text.push_str(&stats.join("\n"));
        }

        text.trim_end().to_string()
    }

    /// Stats line for a column whose non-empty cells are all numbers.
    fn column_stats(&self, col: usize) -> Option<String> {
        let cells: Vec<&str> = self
            .rows
            .iter()
            .filter_map(|row| row.get(col).map(String::as_str))
            .filter(|cell| !cell.is_empty())
            .collect();
        if cells.is_empty() {
            return None;
        }

        let values = cells
            .iter()
            .map(|cell| cell.parse::<f64>().ok())
            .collect::<Option<Vec<f64>>>()?;
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(format!(
            "{}: count {}, mean {:.2}, min {}, max {}",
            self.columns[col], count, mean, min, max
        ))
    }
}

fn spreadsheet_error(e: impl std::fmt::Display) -> Error {
    Error::ContentExtraction(format!(
        "Error processing spreadsheet: {}. Make sure it's a valid file.",
        e
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_csv_rows() {
        let t = Table::from_csv(b"Region, Sales\nNorth,120\nSouth,80,extra\n").unwrap();
        assert_eq!(t.columns, vec!["Region", "Sales"]);
        assert_eq!(t.rows[1], vec!["South", "80", "extra"]);
    }

    #[test]
    fn test_summary_sample_limited_and_numeric_stats() {
        let t = table(
            &["Month", "Visitors"],
            &[&["Jan", "10"], &["Feb", "20"], &["Mar", ""], &["Apr", "30"], &["May", "40"], &["Jun", "50"]],
        );
        let text = t.summary("visits.csv");

        assert!(text.starts_with("File summary: visits.csv\n\nColumns: Month, Visitors\nRows: 6\n"));
        assert!(text.contains("Month | Visitors\nJan | 10\n"));
        assert!(text.contains("May | 40"));
        assert!(!text.contains("Jun | 50"));
        assert!(text.ends_with("Statistical summary:\nVisitors: count 5, mean 30.00, min 10, max 50"));
        assert!(!text.contains("Month: count"));
    }

    #[test]
    fn test_empty_table() {
        assert!(Table::from_csv(b"a,b\n").unwrap().is_empty());
        assert!(table(&["a"], &[&[""]]).is_empty());
        assert!(!table(&["a"], &[&["1"]]).is_empty());
    }

    #[test]
    fn test_bad_workbook() {
        let err = Table::from_workbook(b"not a workbook", false).unwrap_err();
        assert!(matches!(err, Error::ContentExtraction(_)));
        let err = Table::from_workbook(b"not a workbook", true).unwrap_err();
        assert!(err.to_string().contains("Error processing spreadsheet"));
    }
}
