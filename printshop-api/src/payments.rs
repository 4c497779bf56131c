use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use printshop_core::CoreResult;
use printshop_order::{
    Order, Payment, PaymentError, PaymentLedger, PaymentRecordStatus, PaymentStatus, PaymentSummary, StatusLabel,
};
use printshop_shared::models::events::{DomainEvent, PaymentRecordedEvent};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::orders::load_order;
use crate::params::{acting_user, today};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    pub amount: Decimal,
    #[validate(length(min = 1, message = "Payment method cannot be empty"))]
    pub method: String,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: PaymentRecordStatus,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentsResponse {
    pub payments: Vec<Payment>,
    #[serde(flatten)]
    pub summary: PaymentSummary,
    pub payment_status: PaymentStatus,
}

impl TryFrom<&Order> for PaymentsResponse {
    type Error = PaymentError;

    fn try_from(order: &Order) -> Result<Self, Self::Error> {
        Ok(Self {
            payments: order.payments.clone(),
            summary: PaymentLedger::summarize(order.total, &order.payments)?,
            payment_status: order.payment_status,
        })
    }
}

/// GET /v1/orders/{id}/payments
pub async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<PaymentsResponse>> {
    let order = load_order(&state, id).await?;
    Ok(Json(PaymentsResponse::try_from(&order)?))
}

/// POST /v1/orders/{id}/payments
/// Registers a payment and moves the order's payment status to match
pub async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordPaymentRequest>,
) -> AppResult<(StatusCode, Json<PaymentsResponse>)> {
    req.validate()?;
    let user = acting_user(req.user.as_deref());

    let mut payment = Payment::new(req.date.unwrap_or_else(today), req.amount, req.method.trim(), req.status)?;
    payment.reference = req.reference;
    payment.notes = req.notes;
    let payment_id = payment.id;
    let amount = payment.amount;

    let manager = state.manager;
    let order = state
        .orders
        .update_order(id, Box::new(move |order: &mut Order| -> CoreResult<()> {
            manager.record_payment(order, payment, &user)?;
            Ok(())
        }))
        .await?;

    tracing::info!(
        "Payment {} of {} recorded on order {}, now {}",
        payment_id, amount, order.number, order.payment_status.as_str()
    );
    state.events.publish(DomainEvent::PaymentRecorded(PaymentRecordedEvent {
        order_id: order.id,
        payment_id,
        amount,
        payment_status: order.payment_status.as_str().to_string(),
        timestamp: Utc::now().timestamp(),
    }));

    Ok((StatusCode::CREATED, Json(PaymentsResponse::try_from(&order)?)))
}
