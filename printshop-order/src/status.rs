use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::models::{OrderStatus, PaymentStatus, QuoteStatus};

/// A closed set of status labels an entity can carry
pub trait StatusLabel: Copy + Eq + Debug + Serialize + 'static {
    /// Every value, in selector order
    fn all() -> &'static [Self];

    /// Wire name, e.g. `production`
    fn as_str(&self) -> &'static str;

    /// Label printed on badges and documents
    fn label(&self) -> &'static str;

    /// Statuses reachable from this one under the guarded policy
    fn allowed_next(&self) -> &'static [Self];
}

impl StatusLabel for QuoteStatus {
    fn all() -> &'static [Self] {
        &[QuoteStatus::Pending, QuoteStatus::Approved, QuoteStatus::Rejected, QuoteStatus::Expired]
    }

    fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Approved => "approved",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::Expired => "expired",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "Pendente",
            QuoteStatus::Approved => "Aprovado",
            QuoteStatus::Rejected => "Rejeitado",
            QuoteStatus::Expired => "Expirado",
        }
    }

    fn allowed_next(&self) -> &'static [Self] {
        match self {
            QuoteStatus::Pending => &[QuoteStatus::Approved, QuoteStatus::Rejected, QuoteStatus::Expired],
            QuoteStatus::Approved | QuoteStatus::Rejected | QuoteStatus::Expired => &[],
        }
    }
}

impl StatusLabel for OrderStatus {
    fn all() -> &'static [Self] {
        &[
            OrderStatus::New,
            OrderStatus::Production,
            OrderStatus::Completed,
            OrderStatus::Delivered,
            OrderStatus::Canceled,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::Production => "production",
            OrderStatus::Completed => "completed",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            OrderStatus::New => "Novo",
            OrderStatus::Production => "Em Produção",
            OrderStatus::Completed => "Concluído",
            OrderStatus::Delivered => "Entregue",
            OrderStatus::Canceled => "Cancelado",
        }
    }

    fn allowed_next(&self) -> &'static [Self] {
        match self {
            OrderStatus::New => &[OrderStatus::Production, OrderStatus::Canceled],
            OrderStatus::Production => &[OrderStatus::Completed, OrderStatus::Canceled],
            OrderStatus::Completed => &[OrderStatus::Delivered],
            OrderStatus::Delivered | OrderStatus::Canceled => &[],
        }
    }
}

impl StatusLabel for PaymentStatus {
    fn all() -> &'static [Self] {
        &[PaymentStatus::Pending, PaymentStatus::Partial, PaymentStatus::Paid, PaymentStatus::Refunded]
    }

    fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pendente",
            PaymentStatus::Partial => "Parcial",
            PaymentStatus::Paid => "Pago",
            PaymentStatus::Refunded => "Reembolsado",
        }
    }

    fn allowed_next(&self) -> &'static [Self] {
        match self {
            PaymentStatus::Pending => &[PaymentStatus::Partial, PaymentStatus::Paid],
            PaymentStatus::Partial => &[PaymentStatus::Paid, PaymentStatus::Refunded],
            PaymentStatus::Paid => &[PaymentStatus::Refunded],
            PaymentStatus::Refunded => &[],
        }
    }
}

/// Whether status changes are checked against a transition table.
///
/// `Open` replaces the status with whatever was selected, including moves
/// out of terminal states. `Guarded` only allows the moves listed in
/// [`StatusLabel::allowed_next`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    #[default]
    Open,
    Guarded,
}

impl StatusPolicy {
    /// Check a selection and return the status to store.
    /// Re-selecting the current status is always accepted.
    pub fn select<S: StatusLabel>(self, current: S, next: S) -> Result<S, TransitionError> {
        if self == StatusPolicy::Open || current == next {
            return Ok(next);
        }

        if current.allowed_next().contains(&next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: current.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Invalid status transition from {from} to {to}")]
pub struct TransitionError {
    pub from: String,
    pub to: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_policy_accepts_anything() {
        let policy = StatusPolicy::Open;

        let status = policy.select(OrderStatus::New, OrderStatus::Canceled).unwrap();
        assert_eq!(status, OrderStatus::Canceled);

        let status = policy.select(status, OrderStatus::Production).unwrap();
        assert_eq!(status, OrderStatus::Production);
    }

    #[test]
    fn test_guarded_policy_uses_table() {
        let policy = StatusPolicy::Guarded;

        assert_eq!(
            policy.select(OrderStatus::New, OrderStatus::Production),
            Ok(OrderStatus::Production)
        );

        let err = policy.select(OrderStatus::Canceled, OrderStatus::Production).unwrap_err();
        assert_eq!(err.from, "canceled");
        assert_eq!(err.to, "production");

        assert!(policy.select(QuoteStatus::Rejected, QuoteStatus::Approved).is_err());
        assert!(policy.select(PaymentStatus::Paid, PaymentStatus::Refunded).is_ok());
    }

    #[test]
    fn test_reselect_is_noop() {
        assert_eq!(
            StatusPolicy::Guarded.select(OrderStatus::Delivered, OrderStatus::Delivered),
            Ok(OrderStatus::Delivered)
        );
    }

    #[test]
    fn test_wire_names_match_serde() {
        for status in OrderStatus::all() {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
        }
        for status in QuoteStatus::all() {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
        }
    }
}
