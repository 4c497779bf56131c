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
    ChangeHandler, DateRange, NumericInput, Order, PricedDocument, PrintDocument, Quote, QuoteFilter, QuoteStatus,
    StatusLabel,
};
use printshop_shared::models::events::{DomainEvent, OrderCreatedEvent, QuoteStatusChangedEvent};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::documents::{build_items, client_names, load_client, print_party, require_client, LineItemRequest};
use crate::error::{AppError, AppResult};
use crate::params::{acting_user, filter_value, today};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/quotes", get(list_quotes).post(create_quote))
        .route(
            "/v1/quotes/{id}",
            get(get_quote).put(update_quote).delete(delete_quote),
        )
        .route("/v1/quotes/{id}/status", put(set_quote_status))
        .route("/v1/quotes/{id}/print", get(print_quote))
        .route("/v1/quotes/{id}/order", post(convert_to_order))
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub client_id: Uuid,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    /// Defaults to `date` plus the configured validity
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub items: Vec<LineItemRequest>,
    pub discount: Option<NumericInput>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub date_range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteStatusRequest {
    pub status: QuoteStatus,
}

#[derive(Debug, Deserialize)]
pub struct ConvertQuoteRequest {
    pub deadline: Option<NaiveDate>,
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: Quote,
    pub client_name: Option<String>,
    pub status_label: &'static str,
}

impl QuoteResponse {
    fn new(quote: Quote, client_name: Option<String>) -> Self {
        Self {
            status_label: quote.status.label(),
            quote,
            client_name,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn load_quote(state: &AppState, id: Uuid) -> AppResult<Quote> {
    let quote = state
        .quotes
        .get_quote(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Quote", id))?;
    Ok(quote)
}

async fn respond(state: &AppState, quote: Quote) -> AppResult<QuoteResponse> {
    let client_name = state.clients.get_client(quote.client_id).await?.map(|c| c.name);
    Ok(QuoteResponse::new(quote, client_name))
}

fn validity(date: NaiveDate, valid_until: NaiveDate) -> AppResult<()> {
    if valid_until < date {
        return Err(AppError::ValidationError(
            "valid_until cannot be before the quote date".to_string(),
        ));
    }
    Ok(())
}

/// GET /v1/quotes
pub async fn list_quotes(
    State(state): State<AppState>,
    Query(params): Query<QuoteListParams>,
) -> AppResult<Json<Vec<QuoteResponse>>> {
    let date_range = filter_value("date_range", params.date_range.as_deref())?;
    if date_range == Some(DateRange::Overdue) {
        return Err(AppError::ValidationError(
            "The overdue range only applies to orders".to_string(),
        ));
    }

    let filter = QuoteFilter {
        status: filter_value("status", params.status.as_deref())?,
        search: params.search,
        date_range,
    };
    let names = client_names(&state).await?;
    let today = today();

    let quotes = state
        .quotes
        .list_quotes()
        .await?
        .into_iter()
        .filter_map(|quote| {
            let name = names.get(&quote.client_id).cloned();
            filter
                .matches(&quote, name.as_deref(), today)
                .then(|| QuoteResponse::new(quote, name))
        })
        .collect();

    Ok(Json(quotes))
}

/// POST /v1/quotes
pub async fn create_quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> AppResult<(StatusCode, Json<QuoteResponse>)> {
    let client = require_client(&state, req.client_id).await?;

    let date = req.date.unwrap_or_else(today);
    let valid_until = req
        .valid_until
        .unwrap_or(date + Duration::days(state.business_rules.quote_validity_days));
    validity(date, valid_until)?;

    let mut quote = Quote::new(String::new(), client.id, date, valid_until);
    quote.notes = req.notes;
    ChangeHandler::replace_items(&mut quote, build_items(&state, req.items).await?)?;
    if let Some(discount) = &req.discount {
        ChangeHandler::set_discount(&mut quote, discount)?;
    }

    let quote = state.quotes.create_quote(quote).await?;
    tracing::info!("Quote {} created for {} with total {}", quote.number, client.name, quote.total);

    Ok((StatusCode::CREATED, Json(QuoteResponse::new(quote, Some(client.name)))))
}

/// GET /v1/quotes/{id}
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<QuoteResponse>> {
    let quote = load_quote(&state, id).await?;
    Ok(Json(respond(&state, quote).await?))
}

/// PUT /v1/quotes/{id}
/// Replaces the editable fields; the number and status are kept
pub async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<QuoteRequest>,
) -> AppResult<Json<QuoteResponse>> {
    require_client(&state, req.client_id).await?;
    let items = build_items(&state, req.items).await?;
    let validity_days = state.business_rules.quote_validity_days;

    let quote = state
        .quotes
        .update_quote(id, Box::new(move |quote: &mut Quote| -> CoreResult<()> {
            let date = req.date.unwrap_or(quote.date);
            let valid_until = req
                .valid_until
                .unwrap_or(date + Duration::days(validity_days));
            if valid_until < date {
                return Err(CoreError::Validation(
                    "valid_until cannot be before the quote date".to_string(),
                ));
            }

            quote.client_id = req.client_id;
            quote.date = date;
            quote.valid_until = valid_until;
            quote.notes = req.notes;
            ChangeHandler::replace_items(quote, items)?;
            let discount = req.discount.as_ref().map(coerce_discount).unwrap_or_default();
            quote.set_discount(discount);
            quote.recalculate()?;
            Ok(())
        }))
        .await?;

    Ok(Json(respond(&state, quote).await?))
}

/// DELETE /v1/quotes/{id}
pub async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.quotes.delete_quote(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/quotes/{id}/status
pub async fn set_quote_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<QuoteStatusRequest>,
) -> AppResult<Json<QuoteResponse>> {
    let manager = state.manager;
    let next = req.status;
    let mut previous = None;

    let quote = state
        .quotes
        .update_quote(id, Box::new(|quote: &mut Quote| -> CoreResult<()> {
            previous = Some(manager.set_quote_status(quote, next)?);
            Ok(())
        }))
        .await?;

    if let Some(previous) = previous.filter(|p| *p != next) {
        state.events.publish(DomainEvent::QuoteStatusChanged(QuoteStatusChangedEvent {
            quote_id: quote.id,
            number: quote.number.clone(),
            from: previous.as_str().to_string(),
            to: next.as_str().to_string(),
            timestamp: Utc::now().timestamp(),
        }));
    }

    Ok(Json(respond(&state, quote).await?))
}

/// GET /v1/quotes/{id}/print
pub async fn print_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PrintDocument>> {
    let quote = load_quote(&state, id).await?;
    let client = load_client(&state, quote.client_id).await?;
    Ok(Json(PrintDocument::for_quote(&quote, print_party(client))))
}

/// POST /v1/quotes/{id}/order
/// Creates an order from the quote. A pending quote is approved on the way.
pub async fn convert_to_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ConvertQuoteRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let quote = load_quote(&state, id).await?;
    let user = acting_user(req.user.as_deref());

    let date = today();
    let deadline = req
        .deadline
        .unwrap_or(date + Duration::days(state.business_rules.order_deadline_days));
    let order = state.manager.convert_quote(&quote, String::new(), date, deadline, &user)?;
    let order = state.orders.create_order(order).await?;

    if quote.status == QuoteStatus::Pending {
        let manager = state.manager;
        state
            .quotes
            .update_quote(quote.id, Box::new(move |q: &mut Quote| -> CoreResult<()> {
                manager.set_quote_status(q, QuoteStatus::Approved)?;
                Ok(())
            }))
            .await?;
    }

    tracing::info!("Quote {} converted into order {}", quote.number, order.number);
    state.events.publish(DomainEvent::OrderCreated(OrderCreatedEvent {
        order_id: order.id,
        number: order.number.clone(),
        client_id: order.client_id,
        quote_id: order.quote_id,
        total: order.total,
        timestamp: Utc::now().timestamp(),
    }));

    Ok((StatusCode::CREATED, Json(order)))
}
