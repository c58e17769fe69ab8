use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::orders::{OrderRowList, OrderSummaryReport},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::OrderRowQuery,
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_order_rows))
        .route("/orders/summary", get(order_summary))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(OrderRowQuery),
    responses(
        (status = 200, description = "Stored order rows", body = ApiResponse<OrderRowList>),
        (status = 403, description = "Staff only"),
        (status = 503, description = "Order store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_order_rows(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderRowQuery>,
) -> AppResult<Json<ApiResponse<OrderRowList>>> {
    let resp = admin_service::list_order_rows(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/summary",
    responses(
        (status = 200, description = "Orders regrouped with revenue", body = ApiResponse<OrderSummaryReport>),
        (status = 403, description = "Staff only"),
        (status = 503, description = "Order store unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn order_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderSummaryReport>>> {
    let resp = admin_service::order_summary(&state, &user).await?;
    Ok(Json(resp))
}
