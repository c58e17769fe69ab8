#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;
use bubulizer_orders::{
    catalog::{Catalog, CatalogItem},
    config::{AppConfig, BackendConfig},
    error::StoreError,
    middleware::auth::AuthUser,
    models::{Order, OrderReceipt, OrderRow},
    share::ContactNumber,
    sink::{InMemorySheet, OrderSink, SheetOrderSink},
    state::AppState,
};

pub const WHATSAPP: &str = "2348023808592";

pub fn config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        app_name: "BUBULIZER Herbal Café".into(),
        currency: "NGN".into(),
        whatsapp_number: ContactNumber::parse(WHATSAPP).expect("contact"),
        delivery_fee: 800,
        jwt_secret: "test-secret".into(),
        staff: Vec::new(),
        backend: BackendConfig::Memory,
    }
}

pub fn catalog() -> Catalog {
    Catalog::new(vec![
        CatalogItem::new("tea", "Teas", "Tea", "Herbal tea", 1500),
        CatalogItem::new("spice", "Spices", "Pepper Soup Spice", "", 1000),
    ])
}

pub fn state_with(sink: Arc<dyn OrderSink>) -> AppState {
    AppState::new(config(), catalog(), sink)
}

pub fn memory_state() -> AppState {
    state_with(Arc::new(SheetOrderSink::new(InMemorySheet::new(), "Orders")))
}

pub fn cashier() -> AuthUser {
    AuthUser {
        username: "cashier".into(),
        role: "cashier".into(),
    }
}

/// Store that is always down.
pub struct UnavailableSink;

#[async_trait]
impl OrderSink for UnavailableSink {
    async fn append(&self, _order: &Order) -> Result<OrderReceipt, StoreError> {
        Err(StoreError::SheetApi {
            status: 503,
            body: "backend unavailable".into(),
        })
    }

    async fn load_all(&self) -> Result<Vec<OrderRow>, StoreError> {
        Err(StoreError::SheetApi {
            status: 503,
            body: "backend unavailable".into(),
        })
    }
}

/// In-memory sheet store whose `append` waits for `release` after signalling
/// `entered`.
pub struct PausingSink {
    inner: SheetOrderSink<InMemorySheet>,
    pub entered: Notify,
    pub release: Notify,
}

impl PausingSink {
    pub fn new() -> Self {
        Self {
            inner: SheetOrderSink::new(InMemorySheet::new(), "Orders"),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl OrderSink for PausingSink {
    async fn append(&self, order: &Order) -> Result<OrderReceipt, StoreError> {
        self.entered.notify_one();
        self.release.notified().await;
        self.inner.append(order).await
    }

    async fn load_all(&self) -> Result<Vec<OrderRow>, StoreError> {
        self.inner.load_all().await
    }
}
