use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderStatus, PaymentStatus, Quote, QuoteStatus};

/// Rolling date windows used by the list filters. Each window ends today
/// and includes it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    Today,
    Week,
    Month,
    Quarter,
    Year,
    /// Orders only: deadline passed while still open
    Overdue,
}

impl DateRange {
    fn window_days(self) -> Option<i64> {
        match self {
            DateRange::Today => Some(1),
            DateRange::Week => Some(7),
            DateRange::Month => Some(30),
            DateRange::Quarter => Some(90),
            DateRange::Year => Some(365),
            DateRange::Overdue => None,
        }
    }

    /// Whether `date` falls inside the window ending on `today`
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.window_days() {
            Some(days) => {
                let start = today - Duration::days(days - 1);
                date >= start && date <= today
            }
            None => false,
        }
    }
}

fn matches_search(term: Option<&str>, fields: &[Option<&str>]) -> bool {
    match term.map(str::trim) {
        Some(term) if !term.is_empty() => {
            let term = term.to_lowercase();
            fields
                .iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&term))
        }
        _ => true,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteFilter {
    pub status: Option<QuoteStatus>,
    pub search: Option<String>,
    pub date_range: Option<DateRange>,
}

impl QuoteFilter {
    /// `client_name` is resolved by the caller; search covers the quote
    /// number, client name and notes.
    pub fn matches(&self, quote: &Quote, client_name: Option<&str>, today: NaiveDate) -> bool {
        if let Some(status) = self.status {
            if quote.status != status {
                return false;
            }
        }

        if let Some(range) = self.date_range {
            if !range.contains(quote.date, today) {
                return false;
            }
        }

        matches_search(
            self.search.as_deref(),
            &[Some(quote.number.as_str()), client_name, quote.notes.as_deref()],
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub search: Option<String>,
    pub date_range: Option<DateRange>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order, client_name: Option<&str>, today: NaiveDate) -> bool {
        if let Some(status) = self.status {
            if order.status != status {
                return false;
            }
        }

        if let Some(payment_status) = self.payment_status {
            if order.payment_status != payment_status {
                return false;
            }
        }

        match self.date_range {
            Some(DateRange::Overdue) => {
                if !order.is_overdue(today) {
                    return false;
                }
            }
            Some(range) => {
                if !range.contains(order.date, today) {
                    return false;
                }
            }
            None => {}
        }

        matches_search(
            self.search.as_deref(),
            &[Some(order.number.as_str()), client_name, order.notes.as_deref()],
        )
    }
}
