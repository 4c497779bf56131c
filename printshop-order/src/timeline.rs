use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    Creation,
    Status,
    Payment,
    Note,
}

/// Audit entry on an order's history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEvent {
    pub id: Uuid,
    pub kind: TimelineEventKind,
    pub description: String,
    pub user: String,
    pub details: Option<String>,
    pub amount: Option<Decimal>,
    pub status: Option<String>,
    pub at: DateTime<Utc>,
}

impl TimelineEvent {
    fn new(kind: TimelineEventKind, description: String, user: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            description,
            user: user.to_string(),
            details: None,
            amount: None,
            status: None,
            at: Utc::now(),
        }
    }

    pub fn creation(user: &str, status: &str) -> Self {
        let mut event = Self::new(TimelineEventKind::Creation, "Pedido criado".to_string(), user);
        event.status = Some(status.to_string());
        event
    }

    pub fn status_change(user: &str, status: &str, label: &str) -> Self {
        let mut event = Self::new(TimelineEventKind::Status, format!("Status alterado para {}", label), user);
        event.status = Some(status.to_string());
        event
    }

    pub fn payment_status_change(user: &str, status: &str, label: &str) -> Self {
        let mut event = Self::new(
            TimelineEventKind::Status,
            format!("Status de pagamento alterado para {}", label),
            user,
        );
        event.status = Some(status.to_string());
        event
    }

    pub fn payment(user: &str, amount: Decimal, details: Option<String>) -> Self {
        let mut event = Self::new(TimelineEventKind::Payment, "Pagamento registrado".to_string(), user);
        event.amount = Some(amount);
        event.details = details;
        event
    }

    pub fn note(user: &str, text: impl Into<String>) -> Self {
        let mut event = Self::new(TimelineEventKind::Note, "Nota adicionada".to_string(), user);
        event.details = Some(text.into());
        event
    }
}
