// src/export.rs
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task;
use tracing::info;

use crate::data_types::TableSnapshot;
use crate::error::ExportError;

/// Writes the header row (when there is one) followed by every data row.
pub fn write_csv<W: Write>(snapshot: &TableSnapshot, writer: W) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(writer);

    if !snapshot.headers.is_empty() {
        writer.write_record(&snapshot.headers)?;
    }
    for row in &snapshot.rows {
        writer.write_record(row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Saves the snapshot as CSV on a blocking thread and returns the written path.
pub async fn export_csv(
    snapshot: Arc<TableSnapshot>,
    path: PathBuf,
) -> Result<PathBuf, ExportError> {
    let written = task::spawn_blocking(move || -> Result<PathBuf, ExportError> {
        let file = File::create(&path)?;
        write_csv(&snapshot, file)?;
        info!(path = %path.display(), rows = snapshot.row_count(), "exported worksheet");
        Ok(path)
    })
    .await??;

    Ok(written)
}

/// Default file name offered in the save dialog.
pub fn suggested_file_name(worksheet: &str, snapshot: &TableSnapshot) -> String {
    let stem: String = worksheet
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}.csv", stem, snapshot.fetched_at.format("%Y%m%d_%H%M"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(headers: &[&str], rows: &[&[&str]]) -> TableSnapshot {
        TableSnapshot {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
            ..TableSnapshot::empty()
        }
    }

    #[test]
    fn writes_headers_then_rows() {
        let table = snapshot(
            &["Modelo", "Preço"],
            &[&["Onix", "R$ 89.990,00"], &["Spin, 7 lugares", "R$ 120.000,00"]],
        );
        let mut out = Vec::new();

        write_csv(&table, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Modelo,Preço\nOnix,\"R$ 89.990,00\"\n\"Spin, 7 lugares\",\"R$ 120.000,00\"\n"
        );
    }

    #[test]
    fn empty_snapshot_writes_nothing() {
        let mut out = Vec::new();

        write_csv(&TableSnapshot::empty(), &mut out).unwrap();

        assert!(out.is_empty());
    }

    #[test]
    fn file_name_is_filesystem_safe() {
        let table = snapshot(&["A"], &[]);
        let name = suggested_file_name("Chevrolet Preços", &table);

        assert!(name.starts_with("Chevrolet_Preços_"));
        assert!(name.ends_with(".csv"));
    }

    #[tokio::test]
    async fn export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("precos.csv");
        let table = Arc::new(snapshot(&["A", "B"], &[&["1", "2"]]));

        let written = export_csv(table, path.clone()).await.unwrap();
        let contents = std::fs::read_to_string(&written).unwrap();

        assert_eq!(written, path);
        assert_eq!(contents, "A,B\n1,2\n");
    }
}
