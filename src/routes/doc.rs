use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::CartLine,
    catalog::CatalogItem,
    dto::{
        auth::{LoginRequest, LoginResponse},
        cart::{AddToCartRequest, CartView},
        menu::{CategoryList, MenuList},
        orders::{
            CheckoutReceipt, CheckoutRequest, Fulfilment, OrderRowList, OrderSummaryReport,
            PosCheckoutRequest,
        },
    },
    models::{Order, OrderRow, OrderSummary, OrderSummaryLine, PaymentMethod, PlacedOrder},
    response::{ApiResponse, Meta},
    routes::{admin, auth, cart, health, menu, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        menu::list_menu,
        menu::list_categories,
        cart::create_cart,
        cart::get_cart,
        cart::add_to_cart,
        cart::clear_cart,
        orders::checkout,
        orders::pos_checkout,
        auth::login,
        admin::list_order_rows,
        admin::order_summary
    ),
    components(
        schemas(
            CatalogItem,
            CartLine,
            Order,
            PlacedOrder,
            PaymentMethod,
            OrderRow,
            OrderSummary,
            OrderSummaryLine,
            MenuList,
            CategoryList,
            AddToCartRequest,
            CartView,
            Fulfilment,
            CheckoutRequest,
            PosCheckoutRequest,
            CheckoutReceipt,
            OrderRowList,
            OrderSummaryReport,
            LoginRequest,
            LoginResponse,
            params::SortOrder,
            params::OrderRowQuery,
            Meta,
            ApiResponse<CartView>,
            ApiResponse<CheckoutReceipt>,
            ApiResponse<OrderRowList>,
            ApiResponse<OrderSummaryReport>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Menu", description = "Café menu"),
        (name = "Cart", description = "Session carts"),
        (name = "Orders", description = "Checkout, online and in-house"),
        (name = "Admin", description = "Stored orders for staff"),
        (name = "Auth", description = "Staff login"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/menu",
            "/api/carts/{id}/items",
            "/api/carts/{id}/checkout",
            "/api/pos/carts/{id}/checkout",
            "/api/admin/orders/summary",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
