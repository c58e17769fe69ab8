use std::num::NonZeroU32;

use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Largest quantity accepted in one add.
pub const MAX_QUANTITY_PER_ADD: i32 = 20;

pub async fn create_cart(state: &AppState) -> ApiResponse<CartView> {
    let id = state.carts.create().await;
    tracing::debug!(cart_id = %id, "cart created");
    ApiResponse::success(
        "Cart created",
        CartView {
            id,
            lines: Vec::new(),
            subtotal: 0,
        },
        Some(Meta::empty()),
    )
}

pub async fn get_cart(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CartView>> {
    let cart = state.carts.snapshot(id).await?;
    Ok(ApiResponse::success(
        "OK",
        CartView::new(id, &cart),
        Some(Meta::count(cart.lines().len())),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    id: Uuid,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    if !(1..=MAX_QUANTITY_PER_ADD).contains(&payload.quantity) {
        return Err(AppError::BadRequest(format!(
            "quantity must be between 1 and {MAX_QUANTITY_PER_ADD}"
        )));
    }
    let quantity = u32::try_from(payload.quantity)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| AppError::BadRequest("quantity must be greater than 0".to_string()))?;

    let cart = state
        .carts
        .add(id, &state.catalog, &payload.item_id, quantity)
        .await?;

    tracing::debug!(cart_id = %id, item_id = %payload.item_id, quantity = payload.quantity, "added to cart");

    Ok(ApiResponse::success(
        "Added to cart",
        CartView::new(id, &cart),
        Some(Meta::count(cart.lines().len())),
    ))
}

pub async fn clear_cart(state: &AppState, id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    state.carts.clear(id).await?;
    Ok(ApiResponse::success(
        "Cart cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
