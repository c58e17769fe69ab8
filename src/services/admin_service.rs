use std::cmp::Reverse;

use crate::{
    dto::orders::{OrderRowList, OrderSummaryReport},
    error::AppResult,
    middleware::auth::{AuthUser, ensure_staff},
    models::{OrderRow, OrderSummary},
    response::{ApiResponse, Meta},
    routes::params::{OrderRowQuery, SortOrder},
    state::AppState,
};

/// Stored rows, one per order line, paged by row.
pub async fn list_order_rows(
    state: &AppState,
    user: &AuthUser,
    query: OrderRowQuery,
) -> AppResult<ApiResponse<OrderRowList>> {
    ensure_staff(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut rows = state.sink.load_all().await?;
    sort_rows(&mut rows, query.sort_order.unwrap_or_default());

    let total = i64::try_from(rows.len()).unwrap_or(i64::MAX);
    let items = rows
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderRowList { items }, Some(meta)))
}

/// Rows regrouped into orders with a revenue total.
pub async fn order_summary(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderSummaryReport>> {
    ensure_staff(user)?;
    let rows = state.sink.load_all().await?;
    let orders = OrderSummary::from_rows(&rows);
    let revenue = orders.iter().map(|o| o.grand_total).sum();

    let meta = Meta::count(orders.len());
    let report = OrderSummaryReport {
        order_count: orders.len(),
        revenue,
        orders,
    };
    Ok(ApiResponse::success("Order summary", report, Some(meta)))
}

// Stable, so lines of one order keep their stored order.
fn sort_rows(rows: &mut [OrderRow], order: SortOrder) {
    match order {
        SortOrder::Asc => rows.sort_by_key(|r| r.order_id),
        SortOrder::Desc => rows.sort_by_key(|r| Reverse(r.order_id)),
    }
}
