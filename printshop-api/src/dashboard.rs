use axum::{extract::State, Json};
use printshop_catalog::StockLevel;
use printshop_core::ClientStatus;
use printshop_order::{top_products, OrderStatus, PaymentRecordStatus, ProductSales, QuoteStatus};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::documents::client_names;
use crate::error::AppResult;
use crate::orders::OrderResponse;
use crate::params::today;
use crate::state::AppState;

const TOP_PRODUCTS: usize = 5;

#[derive(Debug, Serialize)]
pub struct DashboardCounts {
    pub clients: usize,
    pub active_clients: usize,
    pub products: usize,
    pub low_stock_products: usize,
    pub pending_quotes: usize,
    pub open_orders: usize,
    pub overdue_orders: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub counts: DashboardCounts,
    /// Sum of non-canceled order totals
    pub revenue: Decimal,
    pub received: Decimal,
    pub recent_orders: Vec<OrderResponse>,
    pub top_products: Vec<ProductSales>,
}

/// GET /v1/dashboard
pub async fn get_dashboard(State(state): State<AppState>) -> AppResult<Json<DashboardResponse>> {
    let today = today();
    let fallback = state.business_rules.low_stock_fallback;

    let clients = state.clients.list_clients().await?;
    let products = state.products.list_products().await?;
    let quotes = state.quotes.list_quotes().await?;
    let orders = state.orders.list_orders().await?;
    let names = client_names(&state).await?;

    let counts = DashboardCounts {
        clients: clients.len(),
        active_clients: clients.iter().filter(|c| c.status == ClientStatus::Active).count(),
        products: products.len(),
        low_stock_products: products
            .iter()
            .filter(|p| matches!(p.stock_level(fallback), StockLevel::LowStock | StockLevel::OutOfStock))
            .count(),
        pending_quotes: quotes.iter().filter(|q| q.status == QuoteStatus::Pending).count(),
        open_orders: orders.iter().filter(|o| o.status.is_open()).count(),
        overdue_orders: orders.iter().filter(|o| o.is_overdue(today)).count(),
    };

    let counted = orders.iter().filter(|o| o.status != OrderStatus::Canceled);
    let revenue = counted.clone().fold(Decimal::ZERO, |sum, o| sum.saturating_add(o.total));
    let received = counted
        .flat_map(|o| o.payments.iter())
        .filter(|p| p.status == PaymentRecordStatus::Confirmed)
        .fold(Decimal::ZERO, |sum, p| sum.saturating_add(p.amount));

    let top_products = top_products(&orders, TOP_PRODUCTS);

    // list_orders is newest first
    let recent_orders = orders
        .into_iter()
        .take(state.business_rules.recent_orders_limit)
        .map(|order| {
            let name = names.get(&order.client_id).cloned();
            OrderResponse::new(order, name, today)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(DashboardResponse {
        counts,
        revenue,
        received,
        recent_orders,
        top_products,
    }))
}
