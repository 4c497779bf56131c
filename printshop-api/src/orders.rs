use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use printshop_core::{CoreError, CoreResult};
use printshop_order::changes::coerce_discount;
use printshop_order::{
    ChangeHandler, NumericInput, Order, OrderFilter, OrderStatus, PaymentError, PaymentLedger, PaymentMethod, PaymentStatus,
    PricedDocument, PrintDocument, StatusLabel, TimelineEvent,
};
use printshop_shared::models::events::{DomainEvent, OrderCreatedEvent, OrderStatusChangedEvent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::documents::{build_items, client_names, load_client, print_party, require_client, LineItemRequest};
use crate::error::{AppError, AppResult};
use crate::params::{acting_user, filter_value, today};
use crate::payments;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/orders", get(list_orders).post(create_order))
        .route(
            "/v1/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/v1/orders/{id}/status", put(set_order_status))
        .route("/v1/orders/{id}/payment-status", put(set_payment_status))
        .route(
            "/v1/orders/{id}/payments",
            get(payments::list_payments).post(payments::record_payment),
        )
        .route("/v1/orders/{id}/timeline", get(get_timeline))
        .route("/v1/orders/{id}/notes", post(add_note))
        .route("/v1/orders/{id}/print", get(print_order))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub client_id: Uuid,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    /// Defaults to `date` plus the configured lead time
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
    pub discount: Option<NumericInput>,
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub payment_details: Option<String>,
    pub quote_id: Option<Uuid>,
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub search: Option<String>,
    pub date_range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
    pub user: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentStatusRequest {
    pub status: PaymentStatus,
    pub user: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NoteRequest {
    #[validate(length(min = 1, message = "Note cannot be empty"))]
    pub text: String,
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub client_name: Option<String>,
    pub status_label: &'static str,
    pub payment_status_label: &'static str,
    pub total_paid: Decimal,
    pub balance: Decimal,
    pub overdue: bool,
}

impl OrderResponse {
    pub fn new(order: Order, client_name: Option<String>, today: NaiveDate) -> Result<Self, PaymentError> {
        let summary = PaymentLedger::summarize(order.total, &order.payments)?;
        Ok(Self {
            status_label: order.status.label(),
            payment_status_label: order.payment_status.label(),
            total_paid: summary.total_paid,
            balance: summary.balance,
            overdue: order.is_overdue(today),
            order,
            client_name,
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub(crate) async fn load_order(state: &AppState, id: Uuid) -> AppResult<Order> {
    let order = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Order", id))?;
    Ok(order)
}

async fn respond(state: &AppState, order: Order) -> AppResult<OrderResponse> {
    let client_name = state.clients.get_client(order.client_id).await?.map(|c| c.name);
    Ok(OrderResponse::new(order, client_name, today())?)
}

async fn check_quote(state: &AppState, quote_id: Option<Uuid>) -> AppResult<()> {
    if let Some(quote_id) = quote_id {
        if state.quotes.get_quote(quote_id).await?.is_none() {
            return Err(AppError::ValidationError(format!("Unknown quote: {}", quote_id)));
        }
    }
    Ok(())
}

/// GET /v1/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let filter = OrderFilter {
        status: filter_value("status", params.status.as_deref())?,
        payment_status: filter_value("payment_status", params.payment_status.as_deref())?,
        search: params.search,
        date_range: filter_value("date_range", params.date_range.as_deref())?,
    };
    let names = client_names(&state).await?;
    let today = today();

    let orders = state
        .orders
        .list_orders()
        .await?
        .into_iter()
        .filter_map(|order| {
            let name = names.get(&order.client_id).cloned();
            filter
                .matches(&order, name.as_deref(), today)
                .then(|| OrderResponse::new(order, name, today))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(orders))
}

/// POST /v1/orders
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<OrderRequest>,
) -> AppResult<(StatusCode, Json<OrderResponse>)> {
    let client = require_client(&state, req.client_id).await?;
    check_quote(&state, req.quote_id).await?;
    let user = acting_user(req.user.as_deref());

    let date = req.date.unwrap_or_else(today);
    let deadline = req
        .deadline
        .unwrap_or(date + Duration::days(state.business_rules.order_deadline_days));

    let mut order = Order::new(String::new(), client.id, date, deadline);
    order.notes = req.notes;
    order.payment_method = req.payment_method;
    order.payment_details = req.payment_details;
    order.quote_id = req.quote_id;
    ChangeHandler::replace_items(&mut order, build_items(&state, req.items).await?)?;
    if let Some(discount) = &req.discount {
        ChangeHandler::set_discount(&mut order, discount)?;
    }
    state.manager.open_order(&mut order, &user)?;

    let order = state.orders.create_order(order).await?;
    tracing::info!("Order {} created for {} with total {}", order.number, client.name, order.total);
    state.events.publish(DomainEvent::OrderCreated(OrderCreatedEvent {
        order_id: order.id,
        number: order.number.clone(),
        client_id: order.client_id,
        quote_id: order.quote_id,
        total: order.total,
        timestamp: Utc::now().timestamp(),
    }));

    Ok((StatusCode::CREATED, Json(OrderResponse::new(order, Some(client.name), today())?)))
}

/// GET /v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderResponse>> {
    let order = load_order(&state, id).await?;
    Ok(Json(respond(&state, order).await?))
}

/// PUT /v1/orders/{id}
/// Replaces the editable fields. Status, payments and timeline are kept.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OrderRequest>,
) -> AppResult<Json<OrderResponse>> {
    require_client(&state, req.client_id).await?;
    check_quote(&state, req.quote_id).await?;
    let items = build_items(&state, req.items).await?;
    let lead_days = state.business_rules.order_deadline_days;
    let manager = state.manager;

    let order = state
        .orders
        .update_order(id, Box::new(move |order: &mut Order| -> CoreResult<()> {
            let date = req.date.unwrap_or(order.date);
            let deadline = req.deadline.unwrap_or(date + Duration::days(lead_days));

            order.client_id = req.client_id;
            order.date = date;
            order.deadline = deadline;
            order.notes = req.notes;
            order.payment_method = req.payment_method;
            order.payment_details = req.payment_details;
            order.quote_id = req.quote_id;
            ChangeHandler::replace_items(order, items)?;
            let discount = req.discount.as_ref().map(coerce_discount).unwrap_or_default();
            order.set_discount(discount);
            order.recalculate()?;
            manager.reconcile_payment_status(order)?;
            Ok(())
        }))
        .await?;

    Ok(Json(respond(&state, order).await?))
}

/// DELETE /v1/orders/{id}
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.orders.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/orders/{id}/status
pub async fn set_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<OrderStatusRequest>,
) -> AppResult<Json<OrderResponse>> {
    let manager = state.manager;
    let user = acting_user(req.user.as_deref());
    let next = req.status;
    let mut previous = None;

    let order = state
        .orders
        .update_order(id, Box::new(|order: &mut Order| -> CoreResult<()> {
            previous = Some(manager.set_order_status(order, next, &user)?);
            Ok(())
        }))
        .await?;

    if let Some(previous) = previous.filter(|p| *p != next) {
        tracing::info!("Order {} moved from {} to {}", order.number, previous.as_str(), next.as_str());
        state.events.publish(DomainEvent::OrderStatusChanged(OrderStatusChangedEvent {
            order_id: order.id,
            number: order.number.clone(),
            from: previous.as_str().to_string(),
            to: next.as_str().to_string(),
            timestamp: Utc::now().timestamp(),
        }));
    }

    Ok(Json(respond(&state, order).await?))
}

/// PUT /v1/orders/{id}/payment-status
/// Manual override, e.g. marking a refund
pub async fn set_payment_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PaymentStatusRequest>,
) -> AppResult<Json<OrderResponse>> {
    let manager = state.manager;
    let user = acting_user(req.user.as_deref());
    let next = req.status;

    let order = state
        .orders
        .update_order(id, Box::new(move |order: &mut Order| -> CoreResult<()> {
            manager.set_payment_status(order, next, &user)?;
            Ok(())
        }))
        .await?;

    Ok(Json(respond(&state, order).await?))
}

/// GET /v1/orders/{id}/timeline
/// Newest first
pub async fn get_timeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<TimelineEvent>>> {
    let order = load_order(&state, id).await?;
    let mut timeline = order.timeline;
    timeline.sort_by(|a, b| b.at.cmp(&a.at));
    Ok(Json(timeline))
}

/// POST /v1/orders/{id}/notes
pub async fn add_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<NoteRequest>,
) -> AppResult<(StatusCode, Json<TimelineEvent>)> {
    req.validate()?;
    let manager = state.manager;
    let user = acting_user(req.user.as_deref());
    let text = req.text.trim().to_string();

    let order = state
        .orders
        .update_order(id, Box::new(move |order: &mut Order| -> CoreResult<()> {
            manager.add_note(order, &text, &user);
            Ok(())
        }))
        .await?;

    let note = order
        .timeline
        .last()
        .cloned()
        .ok_or_else(|| AppError::InternalServerError(format!("note missing on order {}", order.number)))?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /v1/orders/{id}/print
pub async fn print_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PrintDocument>> {
    let order = load_order(&state, id).await?;
    let client = load_client(&state, order.client_id).await?;

    let quote_number = match order.quote_id {
        Some(quote_id) => state.quotes.get_quote(quote_id).await?.map(|q| q.number),
        None => None,
    };

    Ok(Json(PrintDocument::for_order(&order, print_party(client), quote_number)?))
}
