use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cart::{Cart, CartLine};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub item_id: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub id: Uuid,
    pub lines: Vec<CartLine>,
    pub subtotal: i64,
}

impl CartView {
    pub fn new(id: Uuid, cart: &Cart) -> Self {
        Self {
            id,
            lines: cart.to_sequence(),
            subtotal: cart.subtotal(),
        }
    }
}
