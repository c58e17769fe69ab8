use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod cart;
pub mod doc;
pub mod health;
pub mod menu;
pub mod orders;
pub mod params;

// State is bound once at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/menu", menu::router())
        .nest("/carts", cart::router())
        .nest("/pos", orders::pos_router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
