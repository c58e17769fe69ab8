//! Checkout: cart + customer details into an [`Order`].

use chrono::{Local, NaiveDateTime, Timelike};

use crate::{
    cart::Cart,
    error::{AppError, AppResult},
    models::{Order, OrderType},
};

/// Customer-supplied checkout fields.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub customer_name: String,
    pub phone: String,
    pub order_type: OrderType,
    pub notes: String,
    pub delivery_fee: i64,
    pub delivery_address: Option<String>,
}

impl Checkout {
    pub fn new(customer_name: impl Into<String>, phone: impl Into<String>, order_type: OrderType) -> Self {
        Self {
            customer_name: customer_name.into(),
            phone: phone.into(),
            order_type,
            notes: String::new(),
            delivery_fee: 0,
            delivery_address: None,
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn delivery(mut self, fee: i64, address: Option<String>) -> Self {
        self.delivery_fee = fee;
        self.delivery_address = address;
        self
    }
}

/// Builds an order stamped with the current local time.
pub fn assemble(cart: &Cart, checkout: Checkout) -> AppResult<Order> {
    assemble_at(cart, checkout, now())
}

/// Builds an order stamped with `created_at`, truncated to whole seconds.
pub fn assemble_at(cart: &Cart, checkout: Checkout, created_at: NaiveDateTime) -> AppResult<Order> {
    let Checkout {
        customer_name,
        phone,
        order_type,
        notes,
        delivery_fee,
        delivery_address,
    } = checkout;

    let customer_name = customer_name.trim().to_string();
    let phone = phone.trim().to_string();
    if customer_name.is_empty() || phone.is_empty() {
        return Err(AppError::BadRequest("Name and phone required".into()));
    }
    if delivery_fee < 0 {
        return Err(AppError::BadRequest("delivery fee cannot be negative".into()));
    }
    if cart.is_empty() {
        return Err(AppError::EmptyCart);
    }

    let created_at = created_at.with_nanosecond(0).unwrap_or(created_at);
    let delivery_address = delivery_address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());

    Ok(Order::new(
        created_at,
        customer_name,
        phone,
        order_type,
        notes,
        delivery_fee,
        delivery_address,
        cart.to_sequence(),
    ))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
