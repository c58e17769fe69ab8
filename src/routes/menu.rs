use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::menu::{CategoryList, MenuList, MenuQuery},
    response::ApiResponse,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_menu))
        .route("/categories", get(list_categories))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    params(MenuQuery),
    responses(
        (status = 200, description = "Menu items", body = ApiResponse<MenuList>)
    ),
    tag = "Menu"
)]
pub async fn list_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> Json<ApiResponse<MenuList>> {
    Json(menu_service::list_menu(&state, query))
}

#[utoipa::path(
    get,
    path = "/api/menu/categories",
    responses(
        (status = 200, description = "Menu categories", body = ApiResponse<CategoryList>)
    ),
    tag = "Menu"
)]
pub async fn list_categories(State(state): State<AppState>) -> Json<ApiResponse<CategoryList>> {
    Json(menu_service::list_categories(&state))
}
