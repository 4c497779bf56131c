use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct QuoteStatusChangedEvent {
    pub quote_id: Uuid,
    pub number: String,
    pub from: String,
    pub to: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderStatusChangedEvent {
    pub order_id: Uuid,
    pub number: String,
    pub from: String,
    pub to: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct OrderCreatedEvent {
    pub order_id: Uuid,
    pub number: String,
    pub client_id: Uuid,
    pub quote_id: Option<Uuid>,
    pub total: Decimal,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct PaymentRecordedEvent {
    pub order_id: Uuid,
    pub payment_id: Uuid,
    pub amount: Decimal,
    pub payment_status: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct StockMovedEvent {
    pub product_id: Uuid,
    pub delta: i64,
    pub stock: i64,
    pub timestamp: i64,
}

/// Everything that goes out on the in-process event bus.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    QuoteStatusChanged(QuoteStatusChangedEvent),
    OrderStatusChanged(OrderStatusChangedEvent),
    OrderCreated(OrderCreatedEvent),
    PaymentRecorded(PaymentRecordedEvent),
    StockMoved(StockMovedEvent),
}

impl DomainEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            DomainEvent::QuoteStatusChanged(_) => "quote.status_changed",
            DomainEvent::OrderStatusChanged(_) => "order.status_changed",
            DomainEvent::OrderCreated(_) => "order.created",
            DomainEvent::PaymentRecorded(_) => "order.payment_recorded",
            DomainEvent::StockMoved(_) => "product.stock_moved",
        }
    }
}
