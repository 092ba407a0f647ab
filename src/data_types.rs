// src/data_types.rs
use std::time::Duration;

use chrono::{DateTime, Local};

pub const SPREADSHEET_ID: &str = "1fa4HLFfjIFKHjHBuxW_ymHkahVPzeoB_XlHNJMaNCg8";
pub const WORKSHEET_NAME: &str = "Chevrolet Preços";
pub const CACHE_TTL: Duration = Duration::from_secs(600);

/// Identifies the remote table the panel shows. Fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub spreadsheet_id: String,
    pub worksheet_name: String,
    pub ttl: Duration,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            spreadsheet_id: SPREADSHEET_ID.to_string(),
            worksheet_name: WORKSHEET_NAME.to_string(),
            ttl: CACHE_TTL,
        }
    }
}

/// One fetched worksheet. Cells are kept exactly as the sheet formats them.
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub fetched_at: DateTime<Local>,
}

impl TableSnapshot {
    pub fn empty() -> Self {
        TableSnapshot {
            headers: Vec::new(),
            rows: Vec::new(),
            fetched_at: Local::now(),
        }
    }

    /// Builds a snapshot from a row-major grid whose first row holds the headers.
    ///
    /// Rows shorter than the widest row (header row included) are padded with
    /// empty cells, so every row ends up with `headers.len()` cells.
    pub fn from_grid(grid: Vec<Vec<String>>) -> Self {
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut padded = grid.into_iter().map(|mut row| {
            row.resize(width, String::new());
            row
        });

        let headers = padded.next().unwrap_or_default();
        let rows = padded.collect();

        TableSnapshot {
            headers,
            rows,
            fetched_at: Local::now(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows, even if a header row was fetched.
    pub fn has_no_rows(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn first_row_becomes_headers() {
        let snapshot = TableSnapshot::from_grid(grid(&[&["A", "B"], &["1", "2"], &["3", "4"]]));

        assert_eq!(snapshot.headers, vec!["A", "B"]);
        assert_eq!(snapshot.rows, grid(&[&["1", "2"], &["3", "4"]]));
        assert_eq!(snapshot.row_count(), 2);
    }

    #[test]
    fn values_are_not_coerced() {
        let snapshot = TableSnapshot::from_grid(grid(&[
            &["Modelo", "Preço"],
            &["Onix", "R$ 89.990,00"],
            &["Tracker", "0123"],
        ]));

        assert_eq!(snapshot.rows[0][1], "R$ 89.990,00");
        assert_eq!(snapshot.rows[1][1], "0123");
    }

    #[test]
    fn empty_grid_gives_empty_snapshot() {
        let snapshot = TableSnapshot::from_grid(Vec::new());

        assert!(snapshot.headers.is_empty());
        assert!(snapshot.rows.is_empty());
        assert!(snapshot.has_no_rows());
    }

    #[test]
    fn header_only_grid_has_no_rows() {
        let snapshot = TableSnapshot::from_grid(grid(&[&["Modelo", "Preço"]]));

        assert_eq!(snapshot.headers, vec!["Modelo", "Preço"]);
        assert!(snapshot.has_no_rows());
    }

    #[test]
    fn ragged_rows_are_padded_to_widest_row() {
        let snapshot = TableSnapshot::from_grid(grid(&[
            &["A", "B"],
            &["1"],
            &["2", "3", "4"],
        ]));

        assert_eq!(snapshot.headers, vec!["A", "B", ""]);
        assert_eq!(snapshot.rows, grid(&[&["1", "", ""], &["2", "3", "4"]]));
    }

    #[test]
    fn default_config_points_at_price_sheet() {
        let config = LoaderConfig::default();

        assert_eq!(config.worksheet_name, "Chevrolet Preços");
        assert_eq!(config.ttl, Duration::from_secs(600));
    }
}
