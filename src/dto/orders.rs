use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{OrderRow, OrderSummary, PaymentMethod, PlacedOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Fulfilment {
    Pickup,
    Delivery,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub phone: String,
    pub order_type: Fulfilment,
    #[serde(default)]
    pub notes: String,
    /// Used for delivery orders only.
    pub delivery_address: Option<String>,
}

/// Counter sale rung up by staff.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PosCheckoutRequest {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutReceipt {
    pub order: PlacedOrder,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub grand_total: i64,
    /// Prefilled chat message to the café.
    pub share_link: String,
    pub maps_link: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderRowList {
    pub items: Vec<OrderRow>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderSummaryReport {
    pub orders: Vec<OrderSummary>,
    pub order_count: usize,
    pub revenue: i64,
}
