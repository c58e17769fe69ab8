use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::{Value, json};
use tokio::sync::{Mutex, OnceCell};

use crate::{
    error::StoreError,
    models::{ORDER_ROW_HEADER, Order, OrderReceipt, OrderRow, TIMESTAMP_FORMAT},
    sink::OrderSink,
};

/// The handful of spreadsheet operations the sheet sink needs.
#[async_trait]
pub trait SheetClient: Send + Sync {
    /// Creates `worksheet` with `header` as its first row, unless it already exists.
    async fn ensure_worksheet(&self, worksheet: &str, header: &[&str]) -> Result<(), StoreError>;

    /// Every row of `worksheet`, header included, cells rendered as text.
    async fn read_rows(&self, worksheet: &str) -> Result<Vec<Vec<String>>, StoreError>;

    async fn append_row(&self, worksheet: &str, row: Vec<Value>) -> Result<(), StoreError>;
}

#[async_trait]
impl<C: SheetClient + ?Sized> SheetClient for Arc<C> {
    async fn ensure_worksheet(&self, worksheet: &str, header: &[&str]) -> Result<(), StoreError> {
        (**self).ensure_worksheet(worksheet, header).await
    }

    async fn read_rows(&self, worksheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        (**self).read_rows(worksheet).await
    }

    async fn append_row(&self, worksheet: &str, row: Vec<Value>) -> Result<(), StoreError> {
        (**self).append_row(worksheet, row).await
    }
}

/// Append-only spreadsheet store, one denormalized row per order line.
///
/// Order ids are derived from the orders already in the sheet, read before
/// writing. Two writers that read the same count hand out the same id; the
/// sheet offers nothing to serialize them.
#[derive(Debug)]
pub struct SheetOrderSink<C> {
    client: C,
    worksheet: String,
    ready: OnceCell<()>,
}

impl<C: SheetClient> SheetOrderSink<C> {
    pub fn new(client: C, worksheet: impl Into<String>) -> Self {
        Self {
            client,
            worksheet: worksheet.into(),
            ready: OnceCell::new(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    async fn ensure_ready(&self) -> Result<(), StoreError> {
        self.ready
            .get_or_try_init(|| async {
                self.client
                    .ensure_worksheet(&self.worksheet, &ORDER_ROW_HEADER)
                    .await
            })
            .await?;
        Ok(())
    }

    /// Number of distinct orders already stored, plus one.
    pub async fn next_order_id(&self) -> Result<i64, StoreError> {
        self.ensure_ready().await?;
        let rows = self.client.read_rows(&self.worksheet).await?;
        let stored: HashSet<&str> = rows
            .iter()
            .skip(1)
            .filter_map(|cells| cells.get(1))
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect();
        Ok(i64::try_from(stored.len()).unwrap_or(i64::MAX) + 1)
    }

    /// Writes `order` under an id obtained from [`Self::next_order_id`].
    ///
    /// Rows go out one append at a time; a failure part-way leaves the earlier
    /// rows of the order in the sheet.
    pub async fn write_rows(&self, order_id: i64, order: &Order) -> Result<OrderReceipt, StoreError> {
        self.ensure_ready().await?;
        let rows = order.to_rows(order_id);
        for (written, row) in rows.iter().enumerate() {
            if let Err(err) = self.client.append_row(&self.worksheet, row_values(row)).await {
                tracing::warn!(order_id, written, total = rows.len(), error = %err, "sheet append interrupted");
                return Err(err);
            }
        }
        tracing::debug!(order_id, lines = rows.len(), worksheet = %self.worksheet, "order rows appended");
        Ok(OrderReceipt {
            order_id,
            created_at: order.created_at(),
        })
    }
}

#[async_trait]
impl<C: SheetClient> OrderSink for SheetOrderSink<C> {
    async fn append(&self, order: &Order) -> Result<OrderReceipt, StoreError> {
        let order_id = self.next_order_id().await?;
        self.write_rows(order_id, order).await
    }

    async fn load_all(&self) -> Result<Vec<OrderRow>, StoreError> {
        self.ensure_ready().await?;
        let rows = self.client.read_rows(&self.worksheet).await?;
        rows.iter()
            .enumerate()
            .skip(1)
            .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
            .map(|(index, cells)| parse_row(index + 1, cells))
            .collect()
    }
}

fn row_values(row: &OrderRow) -> Vec<Value> {
    vec![
        json!(row.timestamp.format(TIMESTAMP_FORMAT).to_string()),
        json!(row.order_id),
        json!(row.customer_name),
        json!(row.phone),
        json!(row.order_type),
        json!(row.notes),
        json!(row.item_name),
        json!(row.quantity),
        json!(row.unit_price),
        json!(row.line_total),
        json!(row.order_total),
    ]
}

fn parse_row(row_number: usize, cells: &[String]) -> Result<OrderRow, StoreError> {
    // Text cells come back verbatim; only parsed cells are trimmed.
    let text = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");
    let cell = |i: usize| text(i).trim();
    let malformed = |reason: String| StoreError::MalformedRow {
        row: row_number,
        reason,
    };

    let timestamp = NaiveDateTime::parse_from_str(cell(0), TIMESTAMP_FORMAT)
        .map_err(|e| malformed(format!("timestamp {:?}: {e}", cell(0))))?;
    let int = |i: usize| -> Result<i64, StoreError> {
        parse_int(cell(i)).ok_or_else(|| malformed(format!("{} {:?}", ORDER_ROW_HEADER[i], cell(i))))
    };
    let quantity = u32::try_from(int(7)?).map_err(|e| malformed(format!("qty: {e}")))?;

    Ok(OrderRow {
        timestamp,
        order_id: int(1)?,
        customer_name: text(2).to_string(),
        phone: text(3).to_string(),
        order_type: text(4).to_string(),
        notes: text(5).to_string(),
        item_name: text(6).to_string(),
        quantity,
        unit_price: int(8)?,
        line_total: int(9)?,
        order_total: int(10)?,
    })
}

/// Accepts `3000`, `3,000` and `3000.0`, the shapes a sheet may render.
fn parse_int(raw: &str) -> Option<i64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<i64>().ok().or_else(|| {
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

/// Process-local worksheets. Used for development and tests.
#[derive(Debug, Default)]
pub struct InMemorySheet {
    worksheets: Mutex<HashMap<String, Vec<Vec<String>>>>,
}

impl InMemorySheet {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SheetClient for InMemorySheet {
    async fn ensure_worksheet(&self, worksheet: &str, header: &[&str]) -> Result<(), StoreError> {
        let mut worksheets = self.worksheets.lock().await;
        worksheets
            .entry(worksheet.to_string())
            .or_insert_with(|| vec![header.iter().map(|h| h.to_string()).collect()]);
        Ok(())
    }

    async fn read_rows(&self, worksheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let worksheets = self.worksheets.lock().await;
        Ok(worksheets.get(worksheet).cloned().unwrap_or_default())
    }

    async fn append_row(&self, worksheet: &str, row: Vec<Value>) -> Result<(), StoreError> {
        let cells = row
            .into_iter()
            .map(|value| match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect();
        self.worksheets
            .lock()
            .await
            .entry(worksheet.to_string())
            .or_default()
            .push(cells);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        num::NonZeroU32,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use crate::{
        assembler::{Checkout, assemble},
        cart::Cart,
        catalog::{Catalog, CatalogItem},
        models::OrderType,
    };

    use super::*;

    fn order(entries: &[(&str, u32)]) -> Order {
        let catalog = Catalog::new(vec![
            CatalogItem::new("tea", "Herbal Tea", "Tea", "", 1500),
            CatalogItem::new("spice", "Spices", "Spice", "", 1000),
        ]);
        let mut cart = Cart::new();
        for (id, qty) in entries {
            cart.add(&catalog, id, NonZeroU32::new(*qty).unwrap()).unwrap();
        }
        assemble(&cart, Checkout::new("Ada", "0803", OrderType::Pickup)).unwrap()
    }

    #[tokio::test]
    async fn header_is_written_once() {
        let sheet = Arc::new(InMemorySheet::new());
        let sink = SheetOrderSink::new(sheet.clone(), "Orders");

        assert!(sink.load_all().await.unwrap().is_empty());
        sink.append(&order(&[("tea", 1)])).await.unwrap();
        let second = SheetOrderSink::new(sheet.clone(), "Orders");
        second.append(&order(&[("tea", 1)])).await.unwrap();

        let rows = sheet.read_rows("Orders").await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "timestamp");
        assert_eq!(rows[0][10], "order_total_ngn");
    }

    #[tokio::test]
    async fn ids_count_orders_not_rows() {
        let sink = SheetOrderSink::new(InMemorySheet::new(), "Orders");

        let first = sink.append(&order(&[("tea", 1), ("spice", 2)])).await.unwrap();
        let second = sink.append(&order(&[("spice", 1)])).await.unwrap();

        assert_eq!(first.order_id, 1);
        assert_eq!(second.order_id, 2);
        assert_eq!(sink.load_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn rows_read_back_as_written() {
        let catalog = Catalog::new(vec![CatalogItem::new("tea", "Herbal Tea", "Tea", "", 1500)]);
        let mut cart = Cart::new();
        cart.add(&catalog, "tea", NonZeroU32::new(2).unwrap()).unwrap();
        let placed = assemble(
            &cart,
            Checkout::new("Ada", "0803", OrderType::Delivery)
                .notes("  less sugar\n")
                .delivery(800, Some("Ikeja".into())),
        )
        .unwrap();

        let sink = SheetOrderSink::new(InMemorySheet::new(), "Orders");
        let receipt = sink.append(&placed).await.unwrap();

        let rows = sink.load_all().await.unwrap();
        assert_eq!(rows, placed.to_rows(receipt.order_id));
        assert!(rows[0].notes.starts_with("  less sugar\n | "));
    }

    #[test]
    fn parses_padded_numeric_cells() {
        let cells: Vec<String> = [
            " 2025-01-02T10:00:00 ", " 1", "Ada", "0803", "Pickup at Café", " no ice ", "Tea", "2 ",
            "1,500", "3000.0", " 3000",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        let row = parse_row(2, &cells).unwrap();
        assert_eq!(row.order_id, 1);
        assert_eq!(row.quantity, 2);
        assert_eq!(row.unit_price, 1500);
        assert_eq!(row.notes, " no ice ");
    }

    #[test]
    fn parses_rendered_numbers() {
        assert_eq!(parse_int("3000"), Some(3000));
        assert_eq!(parse_int("3,000"), Some(3000));
        assert_eq!(parse_int("3000.0"), Some(3000));
        assert_eq!(parse_int("3000.5"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn rejects_malformed_rows() {
        let cells: Vec<String> = vec!["yesterday".into(), "1".into()];
        let err = parse_row(2, &cells).unwrap_err();
        assert!(matches!(err, StoreError::MalformedRow { row: 2, .. }));
    }

    /// Fails every append after the first `allowed`.
    struct FlakySheet {
        inner: InMemorySheet,
        allowed: usize,
        appended: AtomicUsize,
    }

    #[async_trait]
    impl SheetClient for FlakySheet {
        async fn ensure_worksheet(&self, worksheet: &str, header: &[&str]) -> Result<(), StoreError> {
            self.inner.ensure_worksheet(worksheet, header).await
        }

        async fn read_rows(&self, worksheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
            self.inner.read_rows(worksheet).await
        }

        async fn append_row(&self, worksheet: &str, row: Vec<Value>) -> Result<(), StoreError> {
            if self.appended.fetch_add(1, Ordering::SeqCst) >= self.allowed {
                return Err(StoreError::SheetApi {
                    status: 503,
                    body: "backend error".into(),
                });
            }
            self.inner.append_row(worksheet, row).await
        }
    }

    #[tokio::test]
    async fn interrupted_append_leaves_earlier_rows() {
        let sink = SheetOrderSink::new(
            FlakySheet {
                inner: InMemorySheet::new(),
                allowed: 1,
                appended: AtomicUsize::new(0),
            },
            "Orders",
        );

        let err = sink.append(&order(&[("tea", 1), ("spice", 1)])).await.unwrap_err();
        assert!(matches!(err, StoreError::SheetApi { status: 503, .. }));

        let rows = sink.load_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_name, "Tea");
    }
}
