use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PaymentStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRecordStatus {
    #[default]
    Confirmed,
    Pending,
    Canceled,
}

/// Money received (or expected) against one order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: Decimal,
    /// Free text: "PIX", "Cartão de Crédito", "Boleto"...
    pub method: String,
    pub status: PaymentRecordStatus,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

impl Payment {
    pub fn new(date: NaiveDate, amount: Decimal, method: impl Into<String>, status: PaymentRecordStatus) -> Result<Self, PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::InvalidAmount(amount));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            date,
            amount,
            method: method.into(),
            status,
            reference: None,
            notes: None,
        })
    }

    pub fn today(amount: Decimal, method: impl Into<String>) -> Result<Self, PaymentError> {
        Self::new(Utc::now().date_naive(), amount, method, PaymentRecordStatus::Confirmed)
    }
}

/// Payment summary for an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentSummary {
    pub order_total: Decimal,
    pub total_paid: Decimal,
    pub balance: Decimal,
    pub suggested_status: PaymentStatus,
}

/// Arithmetic over an order's payment list
pub struct PaymentLedger;

impl PaymentLedger {
    /// Only confirmed payments count as paid. A sum outside the decimal
    /// range is reported against the payment that pushed it over.
    pub fn total_paid(payments: &[Payment]) -> Result<Decimal, PaymentError> {
        payments
            .iter()
            .filter(|p| p.status == PaymentRecordStatus::Confirmed)
            .try_fold(Decimal::ZERO, |acc, p| {
                acc.checked_add(p.amount).ok_or(PaymentError::InvalidAmount(p.amount))
            })
    }

    /// Remaining amount; negative when the client overpaid
    pub fn balance(order_total: Decimal, payments: &[Payment]) -> Result<Decimal, PaymentError> {
        let paid = Self::total_paid(payments)?;
        order_total.checked_sub(paid).ok_or(PaymentError::InvalidAmount(paid))
    }

    /// Payment status implied by the confirmed amount.
    /// Never suggests `Refunded`; that one is only set by hand.
    pub fn suggest_status(order_total: Decimal, payments: &[Payment]) -> Result<PaymentStatus, PaymentError> {
        let paid = Self::total_paid(payments)?;
        Ok(if paid <= Decimal::ZERO {
            PaymentStatus::Pending
        } else if paid < order_total {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Paid
        })
    }

    pub fn summarize(order_total: Decimal, payments: &[Payment]) -> Result<PaymentSummary, PaymentError> {
        Ok(PaymentSummary {
            order_total,
            total_paid: Self::total_paid(payments)?,
            balance: Self::balance(order_total, payments)?,
            suggested_status: Self::suggest_status(order_total, payments)?,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Payment amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("Payment not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payment(amount: Decimal, status: PaymentRecordStatus) -> Payment {
        let date = NaiveDate::from_ymd_opt(2023, 5, 15).unwrap();
        Payment::new(date, amount, "PIX", status).unwrap()
    }

    #[test]
    fn test_two_confirmed_payments() {
        let payments = vec![
            payment(dec!(250), PaymentRecordStatus::Confirmed),
            payment(dec!(250), PaymentRecordStatus::Confirmed),
        ];
        assert_eq!(PaymentLedger::total_paid(&payments).unwrap(), dec!(500));
        assert_eq!(PaymentLedger::suggest_status(dec!(500), &payments).unwrap(), PaymentStatus::Paid);
    }

    #[test]
    fn test_pending_and_canceled_do_not_count() {
        let payments = vec![
            payment(dec!(250), PaymentRecordStatus::Confirmed),
            payment(dec!(100), PaymentRecordStatus::Pending),
            payment(dec!(150), PaymentRecordStatus::Canceled),
        ];

        let summary = PaymentLedger::summarize(dec!(500), &payments).unwrap();
        assert_eq!(summary.total_paid, dec!(250));
        assert_eq!(summary.balance, dec!(250));
        assert_eq!(summary.suggested_status, PaymentStatus::Partial);
    }

    #[test]
    fn test_no_payments() {
        assert_eq!(PaymentLedger::total_paid(&[]).unwrap(), dec!(0));
        assert_eq!(PaymentLedger::suggest_status(dec!(500), &[]).unwrap(), PaymentStatus::Pending);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        assert!(Payment::today(dec!(0), "PIX").is_err());
        assert!(Payment::today(dec!(-10), "PIX").is_err());
    }

    #[test]
    fn test_sum_out_of_range_is_rejected() {
        let payments = vec![
            payment(dec!(50000000000000000000000000000), PaymentRecordStatus::Confirmed),
            payment(dec!(50000000000000000000000000000), PaymentRecordStatus::Confirmed),
        ];
        assert!(matches!(
            PaymentLedger::total_paid(&payments),
            Err(PaymentError::InvalidAmount(_))
        ));
        assert!(PaymentLedger::summarize(dec!(500), &payments).is_err());
    }
}
