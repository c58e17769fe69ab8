//! Durable order stores.
//!
//! Every backend flattens an [`Order`] into one [`OrderRow`] per line and
//! numbers it. Callers only see the [`OrderSink`] trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::BackendConfig,
    error::StoreError,
    models::{Order, OrderReceipt, OrderRow},
};

pub mod csv_mirror;
pub mod google;
pub mod relational;
pub mod sheet;

pub use csv_mirror::CsvMirror;
pub use google::{GoogleSheetsClient, ServiceAccountKey};
pub use relational::SqliteOrderSink;
pub use sheet::{InMemorySheet, SheetClient, SheetOrderSink};

#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Persists `order` and returns the id the store assigned to it.
    ///
    /// Nothing is retried; a failure leaves it to the caller to resubmit.
    async fn append(&self, order: &Order) -> Result<OrderReceipt, StoreError>;

    /// Every stored row, in store order.
    async fn load_all(&self) -> Result<Vec<OrderRow>, StoreError>;
}

/// Opens the backend selected in configuration.
pub async fn open_sink(backend: &BackendConfig) -> Result<Arc<dyn OrderSink>, StoreError> {
    let sink: Arc<dyn OrderSink> = match backend {
        BackendConfig::Memory => {
            tracing::warn!("orders are kept in memory and lost on restart");
            Arc::new(SheetOrderSink::new(InMemorySheet::new(), "Orders"))
        }
        BackendConfig::Sheet {
            spreadsheet_id,
            worksheet,
            credentials_path,
        } => {
            let key = ServiceAccountKey::from_file(credentials_path).await?;
            let client = GoogleSheetsClient::new(spreadsheet_id.as_str(), key)?;
            Arc::new(SheetOrderSink::new(client, worksheet.as_str()))
        }
        BackendConfig::Sqlite {
            database_url,
            csv_mirror,
        } => {
            let mirror = csv_mirror.as_ref().map(CsvMirror::new);
            Arc::new(SqliteOrderSink::connect(database_url, mirror).await?)
        }
    };
    Ok(sink)
}
