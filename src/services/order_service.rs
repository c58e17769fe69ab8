use uuid::Uuid;

use crate::{
    assembler::{Checkout, assemble},
    dto::orders::{CheckoutReceipt, CheckoutRequest, Fulfilment, PosCheckoutRequest},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_staff},
    models::OrderType,
    response::{ApiResponse, Meta},
    share::maps_link,
    state::AppState,
};

pub const WALK_IN_CUSTOMER: &str = "Walk-in";
pub const WALK_IN_PHONE: &str = "N/A";

/// Customer checkout of a session cart, for pickup or delivery.
pub async fn checkout(
    state: &AppState,
    cart_id: Uuid,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutReceipt>> {
    let CheckoutRequest {
        customer_name,
        phone,
        order_type,
        notes,
        delivery_address,
    } = payload;

    let checkout = match order_type {
        Fulfilment::Pickup => Checkout::new(customer_name, phone, OrderType::Pickup),
        Fulfilment::Delivery => Checkout::new(customer_name, phone, OrderType::Delivery)
            .delivery(state.config.delivery_fee, delivery_address),
    }
    .notes(notes);

    place_order(state, cart_id, checkout).await
}

/// In-house sale; name and phone are optional at the counter.
pub async fn pos_checkout(
    state: &AppState,
    user: &AuthUser,
    cart_id: Uuid,
    payload: PosCheckoutRequest,
) -> AppResult<ApiResponse<CheckoutReceipt>> {
    ensure_staff(user)?;

    let or_default = |value: Option<String>, default: &str| {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    };
    let checkout = Checkout::new(
        or_default(payload.customer_name, WALK_IN_CUSTOMER),
        or_default(payload.phone, WALK_IN_PHONE),
        OrderType::InPerson(payload.payment_method),
    )
    .notes(payload.notes);

    tracing::debug!(staff = %user.username, cart_id = %cart_id, "pos checkout");
    place_order(state, cart_id, checkout).await
}

/// Freeze the cart, assemble, persist, then empty it. Any failure releases the
/// cart unchanged.
async fn place_order(
    state: &AppState,
    cart_id: Uuid,
    checkout: Checkout,
) -> AppResult<ApiResponse<CheckoutReceipt>> {
    let guard = state.carts.begin_checkout(cart_id).await?;
    let order = assemble(guard.cart(), checkout)?;

    let receipt = state.sink.append(&order).await.inspect_err(|err| {
        tracing::error!(cart_id = %cart_id, error = %err, "order not saved");
    })?;
    let placed = order.place(receipt);

    tracing::info!(
        order_id = placed.order_id,
        total = placed.order.grand_total(),
        lines = placed.order.lines().len(),
        order_type = %placed.order.order_type(),
        "order placed"
    );

    state.carts.complete_checkout(guard).await?;

    let share_link = state
        .share
        .format_link(&placed, &state.config.whatsapp_number);
    let maps = placed.order.delivery_address().and_then(maps_link);

    let data = CheckoutReceipt {
        subtotal: placed.order.subtotal(),
        delivery_fee: placed.order.delivery_fee(),
        grand_total: placed.order.grand_total(),
        share_link,
        maps_link: maps,
        order: placed,
    };
    Ok(ApiResponse::success(
        format!("Order #{} saved", data.order.order_id),
        data,
        Some(Meta::empty()),
    ))
}
