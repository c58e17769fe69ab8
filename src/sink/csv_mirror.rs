use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

use crate::{error::StoreError, models::OrderRow};

/// Append-only CSV copy of the flattened order rows.
#[derive(Debug, Clone)]
pub struct CsvMirror {
    path: PathBuf,
}

impl CsvMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `rows`, writing the header first when the file is new or empty.
    pub async fn append(&self, rows: Vec<OrderRow>) -> Result<(), StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_rows(&path, &rows))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
    }

    pub async fn read_all(&self) -> Result<Vec<OrderRow>, StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_rows(&path))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::other(e)))?
    }
}

fn write_rows(path: &Path, rows: &[OrderRow]) -> Result<(), StoreError> {
    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<OrderRow>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use crate::models::TIMESTAMP_FORMAT;

    use super::*;

    fn row(order_id: i64) -> OrderRow {
        OrderRow {
            timestamp: NaiveDateTime::parse_from_str("2025-02-03T04:05:06", TIMESTAMP_FORMAT).unwrap(),
            order_id,
            customer_name: "Ada, Lagos".into(),
            phone: "0803".into(),
            order_type: "Pickup at Café".into(),
            notes: "less sugar | extra cup".into(),
            item_name: "Tea".into(),
            quantity: 2,
            unit_price: 1500,
            line_total: 3000,
            order_total: 3000,
        }
    }

    #[tokio::test]
    async fn header_written_once_and_rows_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = CsvMirror::new(dir.path().join("orders.csv"));

        mirror.append(vec![row(1)]).await.unwrap();
        mirror.append(vec![row(2)]).await.unwrap();

        let text = std::fs::read_to_string(mirror.path()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("timestamp,order_id,customer_name,phone,order_type,notes,item_name,qty,price_ngn,line_total_ngn,order_total_ngn")
        );
        assert_eq!(text.matches("timestamp").count(), 1);

        let rows = mirror.read_all().await.unwrap();
        assert_eq!(rows, vec![row(1), row(2)]);
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = CsvMirror::new(dir.path().join("absent.csv"));
        assert!(mirror.read_all().await.unwrap().is_empty());
    }
}
