use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set, TransactionTrait};
use sqlx::FromRow;
use tokio::sync::OnceCell;

use crate::{
    db::{DbPool, OrmConn, create_pool, orm_from_pool, run_migrations},
    entity::{order_items::ActiveModel as OrderItemActive, orders::ActiveModel as OrderActive},
    error::StoreError,
    models::{Order, OrderReceipt, OrderRow, OrderType, compose_row_notes},
    sink::{CsvMirror, OrderSink},
};

/// Local SQLite store with normalized `orders` / `order_items` tables.
///
/// Ids come from the `orders` autoincrement key, so concurrent writers never
/// share one. Each committed order is also appended to the CSV mirror, if set.
#[derive(Debug)]
pub struct SqliteOrderSink {
    pool: DbPool,
    orm: OrmConn,
    mirror: Option<CsvMirror>,
    ready: OnceCell<()>,
}

#[derive(Debug, FromRow)]
struct OrderItemJoinRow {
    created_at: NaiveDateTime,
    order_id: i64,
    customer_name: String,
    phone: String,
    order_type: String,
    notes: String,
    delivery_fee: i64,
    delivery_address: Option<String>,
    item_name: String,
    qty: i64,
    unit_price: i64,
    line_total: i64,
    total_amount: i64,
}

impl SqliteOrderSink {
    pub fn new(pool: DbPool, mirror: Option<CsvMirror>) -> Self {
        Self {
            orm: orm_from_pool(pool.clone()),
            pool,
            mirror,
            ready: OnceCell::new(),
        }
    }

    pub async fn connect(database_url: &str, mirror: Option<CsvMirror>) -> Result<Self, StoreError> {
        let pool = create_pool(database_url).await?;
        Ok(Self::new(pool, mirror))
    }

    pub fn mirror(&self) -> Option<&CsvMirror> {
        self.mirror.as_ref()
    }

    async fn ensure_ready(&self) -> Result<(), StoreError> {
        self.ready
            .get_or_try_init(|| async { run_migrations(&self.orm).await })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OrderSink for SqliteOrderSink {
    async fn append(&self, order: &Order) -> Result<OrderReceipt, StoreError> {
        self.ensure_ready().await?;
        let txn = self.orm.begin().await?;

        let saved = OrderActive {
            id: NotSet,
            customer_name: Set(order.customer_name().to_string()),
            phone: Set(order.phone().to_string()),
            order_type: Set(order.order_type().to_string()),
            notes: Set(order.notes().to_string()),
            delivery_fee: Set(order.delivery_fee()),
            delivery_address: Set(order.delivery_address().map(str::to_string)),
            total_amount: Set(order.grand_total()),
            created_at: Set(order.created_at()),
        }
        .insert(&txn)
        .await?;

        for line in order.lines() {
            OrderItemActive {
                id: NotSet,
                order_id: Set(saved.id),
                item_name: Set(line.name().to_string()),
                qty: Set(i64::from(line.quantity())),
                unit_price: Set(line.unit_price()),
                line_total: Set(line.line_total()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        tracing::debug!(order_id = saved.id, lines = order.lines().len(), "order committed");

        if let Some(mirror) = &self.mirror {
            if let Err(err) = mirror.append(order.to_rows(saved.id)).await {
                tracing::warn!(order_id = saved.id, error = %err, "csv mirror write failed");
            }
        }

        Ok(OrderReceipt {
            order_id: saved.id,
            created_at: order.created_at(),
        })
    }

    async fn load_all(&self) -> Result<Vec<OrderRow>, StoreError> {
        self.ensure_ready().await?;
        let rows = sqlx::query_as::<_, OrderItemJoinRow>(
            r#"
            SELECT o.created_at, o.id AS order_id, o.customer_name, o.phone, o.order_type,
                   o.notes, o.delivery_fee, o.delivery_address,
                   i.item_name, i.qty, i.unit_price, i.line_total, o.total_amount
            FROM order_items i
            JOIN orders o ON o.id = i.order_id
            ORDER BY o.id, i.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let delivery_label = OrderType::Delivery.to_string();
        rows.into_iter()
            .map(|row| -> Result<OrderRow, StoreError> {
                let notes = compose_row_notes(
                    &row.notes,
                    row.order_type == delivery_label,
                    row.delivery_fee,
                    row.delivery_address.as_deref(),
                );
                let quantity = u32::try_from(row.qty).map_err(|e| StoreError::MalformedRow {
                    row: usize::try_from(row.order_id).unwrap_or_default(),
                    reason: format!("qty {}: {e}", row.qty),
                })?;
                Ok(OrderRow {
                    timestamp: row.created_at,
                    order_id: row.order_id,
                    customer_name: row.customer_name,
                    phone: row.phone,
                    order_type: row.order_type,
                    notes,
                    item_name: row.item_name,
                    quantity,
                    unit_price: row.unit_price,
                    line_total: row.line_total,
                    order_total: row.total_amount,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use crate::{
        assembler::{Checkout, assemble},
        cart::Cart,
        catalog::{Catalog, CatalogItem},
    };

    use super::*;

    fn order(customer: &str) -> Order {
        let catalog = Catalog::new(vec![
            CatalogItem::new("tea", "Herbal Tea", "Tea", "", 1500),
            CatalogItem::new("spice", "Spices", "Spice", "", 1000),
        ]);
        let mut cart = Cart::new();
        cart.add(&catalog, "tea", NonZeroU32::new(2).unwrap()).unwrap();
        cart.add(&catalog, "spice", NonZeroU32::new(1).unwrap()).unwrap();
        assemble(
            &cart,
            Checkout::new(customer, "0803", OrderType::Delivery)
                .delivery(800, Some("Ikeja".into())),
        )
        .unwrap()
    }

    async fn sink(dir: &tempfile::TempDir) -> SqliteOrderSink {
        let url = format!("sqlite://{}", dir.path().join("orders.db").display());
        SqliteOrderSink::connect(&url, Some(CsvMirror::new(dir.path().join("orders.csv"))))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn empty_store_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(sink(&dir).await.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ids_autoincrement_from_one() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(&dir).await;

        for expected in 1..=3 {
            let receipt = sink.append(&order("Ada")).await.unwrap();
            assert_eq!(receipt.order_id, expected);
        }
    }

    #[tokio::test]
    async fn rows_and_mirror_agree() {
        let dir = tempfile::tempdir().unwrap();
        let sink = sink(&dir).await;
        let placed = order("Ada");
        let receipt = sink.append(&placed).await.unwrap();

        let rows = sink.load_all().await.unwrap();
        assert_eq!(rows, placed.to_rows(receipt.order_id));
        assert_eq!(rows[0].notes, "Delivery fee: ₦800 | Address: Ikeja");

        let mirrored = sink.mirror().unwrap().read_all().await.unwrap();
        assert_eq!(mirrored, rows);
    }

    #[tokio::test]
    async fn schema_setup_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        sink(&dir).await.append(&order("Ada")).await.unwrap();

        let reopened = sink(&dir).await;
        let receipt = reopened.append(&order("Bola")).await.unwrap();
        assert_eq!(receipt.order_id, 2);
        assert_eq!(reopened.load_all().await.unwrap().len(), 4);
    }
}
