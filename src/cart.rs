//! Session carts.

use std::{
    collections::HashMap,
    num::NonZeroU32,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use serde::Serialize;
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    catalog::Catalog,
    error::{AppError, AppResult},
};

/// One distinct item in a cart. The unit price is the one in effect when the
/// item was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CartLine {
    item_id: String,
    name: String,
    category: String,
    unit_price: i64,
    quantity: u32,
    line_total: i64,
}

impl CartLine {
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit_price(&self) -> i64 {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total(&self) -> i64 {
        self.line_total
    }

    fn bump(&mut self, quantity: NonZeroU32) -> AppResult<()> {
        let total = self
            .quantity
            .checked_add(quantity.get())
            .ok_or_else(|| AppError::BadRequest(format!("quantity of {} is too large", self.name)))?;
        self.line_total = line_total(total, self.unit_price)?;
        self.quantity = total;
        Ok(())
    }
}

fn line_total(quantity: u32, unit_price: i64) -> AppResult<i64> {
    i64::from(quantity)
        .checked_mul(unit_price)
        .ok_or_else(|| AppError::BadRequest("line total is too large".into()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of `item_id`, merging into an existing line when present.
    ///
    /// An id missing from the catalog, or a quantity that would overflow,
    /// leaves the cart untouched. Merged lines keep their captured price.
    pub fn add(&mut self, catalog: &Catalog, item_id: &str, quantity: NonZeroU32) -> AppResult<()> {
        let item = catalog.get(item_id)?;
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            return line.bump(quantity);
        }

        self.lines.push(CartLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            unit_price: item.unit_price,
            quantity: quantity.get(),
            line_total: line_total(quantity.get(), item.unit_price)?,
        });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn to_sequence(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line totals, before any delivery fee.
    pub fn subtotal(&self) -> i64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

#[derive(Debug, Default)]
struct CartSlot {
    cart: Cart,
    checking_out: Arc<AtomicBool>,
}

impl CartSlot {
    fn ensure_idle(&self) -> AppResult<()> {
        if self.checking_out.load(Ordering::Acquire) {
            return Err(AppError::CheckoutInProgress);
        }
        Ok(())
    }
}

/// Held while a cart's order is being saved. Adds, clears and further
/// checkouts of that cart are refused until it is dropped.
#[derive(Debug)]
pub struct CheckoutGuard {
    id: Uuid,
    cart: Cart,
    checking_out: Arc<AtomicBool>,
}

impl CheckoutGuard {
    /// The cart as it was when checkout began.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }
}

impl Drop for CheckoutGuard {
    fn drop(&mut self) {
        self.checking_out.store(false, Ordering::Release);
    }
}

/// Carts keyed by session id. Owned by application state.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    carts: Arc<Mutex<HashMap<Uuid, CartSlot>>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.carts.lock().await.insert(id, CartSlot::default());
        id
    }

    pub async fn snapshot(&self, id: Uuid) -> AppResult<Cart> {
        self.carts
            .lock()
            .await
            .get(&id)
            .map(|slot| slot.cart.clone())
            .ok_or(AppError::NotFound)
    }

    pub async fn add(
        &self,
        id: Uuid,
        catalog: &Catalog,
        item_id: &str,
        quantity: NonZeroU32,
    ) -> AppResult<Cart> {
        let mut carts = self.carts.lock().await;
        let slot = carts.get_mut(&id).ok_or(AppError::NotFound)?;
        slot.ensure_idle()?;
        slot.cart.add(catalog, item_id, quantity)?;
        Ok(slot.cart.clone())
    }

    pub async fn clear(&self, id: Uuid) -> AppResult<()> {
        let mut carts = self.carts.lock().await;
        let slot = carts.get_mut(&id).ok_or(AppError::NotFound)?;
        slot.ensure_idle()?;
        slot.cart.clear();
        Ok(())
    }

    /// Freezes the cart and returns its contents.
    pub async fn begin_checkout(&self, id: Uuid) -> AppResult<CheckoutGuard> {
        let carts = self.carts.lock().await;
        let slot = carts.get(&id).ok_or(AppError::NotFound)?;
        slot.ensure_idle()?;
        slot.checking_out.store(true, Ordering::Release);
        Ok(CheckoutGuard {
            id,
            cart: slot.cart.clone(),
            checking_out: slot.checking_out.clone(),
        })
    }

    /// Empties the cart after its order was saved, then releases it.
    pub async fn complete_checkout(&self, guard: CheckoutGuard) -> AppResult<()> {
        let mut carts = self.carts.lock().await;
        let slot = carts.get_mut(&guard.id).ok_or(AppError::NotFound)?;
        slot.cart.clear();
        drop(guard);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::CatalogItem;

    use super::*;

    fn tea_catalog() -> Catalog {
        Catalog::new(vec![
            CatalogItem::new("tea", "Herbal Tea", "Tea", "", 1500),
            CatalogItem::new("spice", "Spices", "Spice", "", 1000),
        ])
    }

    fn qty(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let catalog = tea_catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "tea", qty(2)).unwrap();
        cart.add(&catalog, "tea", qty(3)).unwrap();

        let lines = cart.to_sequence();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity(), 5);
        assert_eq!(lines[0].line_total(), 7500);
    }

    #[test]
    fn lines_keep_insertion_order() {
        let catalog = tea_catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "spice", qty(1)).unwrap();
        cart.add(&catalog, "tea", qty(1)).unwrap();
        cart.add(&catalog, "spice", qty(1)).unwrap();

        let ids: Vec<&str> = cart.lines().iter().map(CartLine::item_id).collect();
        assert_eq!(ids, vec!["spice", "tea"]);
        assert_eq!(cart.subtotal(), 3500);
    }

    #[test]
    fn price_is_captured_at_first_add() {
        let mut cart = Cart::new();
        cart.add(&tea_catalog(), "tea", qty(1)).unwrap();

        let repriced = Catalog::new(vec![CatalogItem::new("tea", "Herbal Tea", "Tea", "", 9999)]);
        cart.add(&repriced, "tea", qty(1)).unwrap();

        assert_eq!(cart.lines()[0].unit_price(), 1500);
        assert_eq!(cart.lines()[0].line_total(), 3000);
    }

    #[test]
    fn unknown_item_leaves_cart_untouched() {
        let catalog = tea_catalog();
        let mut cart = Cart::new();
        cart.add(&catalog, "tea", qty(1)).unwrap();
        let before = cart.clone();

        let err = cart.add(&catalog, "coffee", qty(1)).unwrap_err();
        assert!(matches!(err, AppError::UnknownItem(_)));
        assert_eq!(cart, before);
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new();
        cart.add(&tea_catalog(), "tea", qty(1)).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.to_sequence().is_empty());
    }

    #[test]
    fn merge_rechecks_the_catalog() {
        let mut cart = Cart::new();
        cart.add(&tea_catalog(), "tea", qty(1)).unwrap();
        let before = cart.clone();

        let without_tea = Catalog::new(vec![CatalogItem::new("spice", "Spices", "Spice", "", 1000)]);
        let err = cart.add(&without_tea, "tea", qty(1)).unwrap_err();
        assert!(matches!(err, AppError::UnknownItem(_)));
        assert_eq!(cart, before);
    }

    #[test]
    fn quantity_overflow_is_rejected() {
        let catalog = Catalog::new(vec![CatalogItem::new("free", "Extras", "Water", "", 0)]);
        let mut cart = Cart::new();
        cart.add(&catalog, "free", qty(u32::MAX)).unwrap();
        let before = cart.clone();

        let err = cart.add(&catalog, "free", qty(1)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(cart, before);
    }

    #[tokio::test]
    async fn checkout_freezes_the_cart_until_released() {
        let catalog = tea_catalog();
        let store = CartStore::new();
        let id = store.create().await;
        store.add(id, &catalog, "tea", qty(2)).await.unwrap();

        let guard = store.begin_checkout(id).await.unwrap();
        assert_eq!(guard.cart().subtotal(), 3000);
        assert!(matches!(
            store.add(id, &catalog, "spice", qty(3)).await,
            Err(AppError::CheckoutInProgress)
        ));
        assert!(matches!(store.clear(id).await, Err(AppError::CheckoutInProgress)));
        assert!(matches!(
            store.begin_checkout(id).await,
            Err(AppError::CheckoutInProgress)
        ));

        drop(guard);
        assert_eq!(store.snapshot(id).await.unwrap().subtotal(), 3000);
        store.add(id, &catalog, "spice", qty(1)).await.unwrap();

        let guard = store.begin_checkout(id).await.unwrap();
        store.complete_checkout(guard).await.unwrap();
        assert!(store.snapshot(id).await.unwrap().is_empty());
        store.add(id, &catalog, "tea", qty(1)).await.unwrap();
    }

    #[tokio::test]
    async fn store_isolates_sessions() {
        let catalog = tea_catalog();
        let store = CartStore::new();
        let a = store.create().await;
        let b = store.create().await;

        store.add(a, &catalog, "tea", qty(2)).await.unwrap();

        assert_eq!(store.snapshot(a).await.unwrap().subtotal(), 3000);
        assert!(store.snapshot(b).await.unwrap().is_empty());
        assert!(matches!(
            store.snapshot(Uuid::new_v4()).await,
            Err(AppError::NotFound)
        ));
    }
}
