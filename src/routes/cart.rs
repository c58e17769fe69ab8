use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartView},
    error::AppResult,
    response::ApiResponse,
    routes::orders,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_cart))
        .route("/{id}", get(get_cart).delete(clear_cart))
        .route("/{id}/items", post(add_to_cart))
        .route("/{id}/checkout", post(orders::checkout))
}

#[utoipa::path(
    post,
    path = "/api/carts",
    responses(
        (status = 200, description = "New empty cart", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn create_cart(State(state): State<AppState>) -> Json<ApiResponse<CartView>> {
    Json(cart_service::create_cart(&state).await)
}

#[utoipa::path(
    get,
    path = "/api/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart contents", body = ApiResponse<CartView>),
        (status = 404, description = "Cart not found")
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/carts/{id}/items",
    params(("id" = Uuid, Path, description = "Cart ID")),
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item added or merged", body = ApiResponse<CartView>),
        (status = 400, description = "Unknown item or bad quantity"),
        (status = 404, description = "Cart not found"),
        (status = 409, description = "Cart is being checked out")
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::add_to_cart(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/carts/{id}",
    params(("id" = Uuid, Path, description = "Cart ID")),
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Cart not found"),
        (status = 409, description = "Cart is being checked out")
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::clear_cart(&state, id).await?;
    Ok(Json(resp))
}
