use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutReceipt, CheckoutRequest, PosCheckoutRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn pos_router() -> Router<AppState> {
    Router::new().route("/carts/{id}/checkout", post(pos_checkout))
}

#[utoipa::path(
    post,
    path = "/api/carts/{id}/checkout",
    params(("id" = Uuid, Path, description = "Cart ID")),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order saved", body = ApiResponse<CheckoutReceipt>),
        (status = 400, description = "Empty cart or missing details"),
        (status = 404, description = "Cart not found"),
        (status = 409, description = "Cart is already being checked out"),
        (status = 503, description = "Order store unavailable; cart kept")
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutReceipt>>> {
    let resp = order_service::checkout(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/pos/carts/{id}/checkout",
    params(("id" = Uuid, Path, description = "Cart ID")),
    request_body = PosCheckoutRequest,
    responses(
        (status = 200, description = "In-house order saved", body = ApiResponse<CheckoutReceipt>),
        (status = 400, description = "Empty cart"),
        (status = 403, description = "Staff only"),
        (status = 409, description = "Cart is already being checked out"),
        (status = 503, description = "Order store unavailable; cart kept")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn pos_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PosCheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutReceipt>>> {
    let resp = order_service::pos_checkout(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
