use chrono::NaiveDate;

use crate::changes::ChangeError;
use crate::finance::{Payment, PaymentError, PaymentLedger, PaymentRecordStatus};
use crate::models::{Order, OrderStatus, PaymentStatus, Quote, QuoteStatus};
use crate::status::{StatusLabel, StatusPolicy, TransitionError};
use crate::timeline::TimelineEvent;
use crate::totals::PricedDocument;

/// Status changes, payments and quote conversion for quotes and orders.
///
/// Holds no data itself; callers load the record, hand it in mutably and
/// persist it afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderManager {
    policy: StatusPolicy,
}

impl OrderManager {
    pub fn new(policy: StatusPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Start an order's history with its creation event
    pub fn open_order(&self, order: &mut Order, user: &str) -> Result<(), OrderError> {
        order.recalculate()?;
        order.timeline.push(TimelineEvent::creation(user, order.status.as_str()));
        Ok(())
    }

    /// Returns the previous status
    pub fn set_quote_status(&self, quote: &mut Quote, next: QuoteStatus) -> Result<QuoteStatus, OrderError> {
        let previous = quote.status;
        quote.status = self.policy.select(previous, next)?;
        quote.updated_at = chrono::Utc::now();
        Ok(previous)
    }

    /// Returns the previous status
    pub fn set_order_status(&self, order: &mut Order, next: OrderStatus, user: &str) -> Result<OrderStatus, OrderError> {
        let previous = order.status;
        order.status = self.policy.select(previous, next)?;
        order.updated_at = chrono::Utc::now();

        if previous != next {
            order
                .timeline
                .push(TimelineEvent::status_change(user, next.as_str(), next.label()));
        }
        Ok(previous)
    }

    /// Returns the previous payment status
    pub fn set_payment_status(
        &self,
        order: &mut Order,
        next: PaymentStatus,
        user: &str,
    ) -> Result<PaymentStatus, OrderError> {
        let previous = order.payment_status;
        order.payment_status = self.policy.select(previous, next)?;
        order.updated_at = chrono::Utc::now();

        if previous != next {
            order
                .timeline
                .push(TimelineEvent::payment_status_change(user, next.as_str(), next.label()));
        }
        Ok(previous)
    }

    /// Attach a payment and move the payment status to what the confirmed
    /// total implies. A refunded order keeps its status.
    pub fn record_payment(&self, order: &mut Order, payment: Payment, user: &str) -> Result<PaymentStatus, OrderError> {
        let details = match (&payment.reference, &payment.notes) {
            (_, Some(notes)) => Some(format!("{} via {}", notes, payment.method)),
            (Some(reference), None) => Some(format!("{} ({})", payment.method, reference)),
            (None, None) => Some(payment.method.clone()),
        };
        let confirmed = payment.status == PaymentRecordStatus::Confirmed;
        let amount = payment.amount;

        let mut payments = order.payments.clone();
        payments.push(payment);
        PaymentLedger::summarize(order.total, &payments)?;

        if confirmed {
            order.timeline.push(TimelineEvent::payment(user, amount, details));
        }
        order.payments = payments;
        self.reconcile_payment_status(order)
    }

    /// Move the payment status to what the confirmed total implies, after
    /// a payment or a change to the order total. `Refunded` is kept.
    pub fn reconcile_payment_status(&self, order: &mut Order) -> Result<PaymentStatus, OrderError> {
        let summary = PaymentLedger::summarize(order.total, &order.payments)?;
        if order.payment_status != PaymentStatus::Refunded {
            order.payment_status = summary.suggested_status;
        }
        order.updated_at = chrono::Utc::now();
        Ok(order.payment_status)
    }

    pub fn add_note(&self, order: &mut Order, text: &str, user: &str) {
        order.timeline.push(TimelineEvent::note(user, text));
        order.updated_at = chrono::Utc::now();
    }

    /// Build a new order from a quote: same client, items, discount and
    /// notes, linked back to the quote. Rejected and expired quotes cannot
    /// be converted.
    pub fn convert_quote(
        &self,
        quote: &Quote,
        number: String,
        date: NaiveDate,
        deadline: NaiveDate,
        user: &str,
    ) -> Result<Order, OrderError> {
        if matches!(quote.status, QuoteStatus::Rejected | QuoteStatus::Expired) {
            return Err(OrderError::QuoteNotConvertible {
                number: quote.number.clone(),
                status: quote.status.as_str().to_string(),
            });
        }

        let mut order = Order::new(number, quote.client_id, date, deadline);
        order.items = quote.items.clone();
        order.discount = quote.discount;
        order.notes = quote.notes.clone();
        order.quote_id = Some(quote.id);

        self.open_order(&mut order, user)?;
        Ok(order)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Quote not found: {0}")]
    QuoteNotFound(String),

    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    #[error(transparent)]
    InvalidItems(#[from] ChangeError),

    #[error(transparent)]
    InvalidPayment(#[from] PaymentError),

    #[error("Quote {number} is {status} and cannot become an order")]
    QuoteNotConvertible {
        number: String,
        status: String,
    },
}
