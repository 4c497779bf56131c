use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::changes::ChangeError;
use crate::finance::Payment;
use crate::timeline::TimelineEvent;
use crate::totals::{PricedDocument, Totals};

/// Quote status as shown on the status selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

/// Production status of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Production,
    Completed,
    Delivered,
    Canceled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
    Refunded,
}

/// How the client agreed to pay
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Everything up front
    #[default]
    Full,
    /// Part on approval, the rest on delivery
    Split,
    /// Invoiced on credit terms
    Credit,
}

/// One priced row of a quote or order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: Uuid,
    /// Catalog product this row was picked from, if any
    pub product_id: Option<Uuid>,
    pub product: String,
    pub description: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl LineItem {
    pub fn new(product: impl Into<String>, description: impl Into<String>, quantity: i64, unit_price: Decimal) -> Self {
        let mut item = Self {
            id: Uuid::new_v4(),
            product_id: None,
            product: product.into(),
            description: description.into(),
            quantity,
            unit_price,
            total: Decimal::ZERO,
        };
        // an out of range row keeps a zero total; the document recalculation reports it
        item.total = item.line_total().unwrap_or_default();
        item
    }

    /// Empty row added by "add item": quantity 1, no price yet
    pub fn blank() -> Self {
        Self::new("", "", 1, Decimal::ZERO)
    }

    pub fn with_product_id(mut self, product_id: Uuid) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Quantity × unit price, or an error when it leaves the decimal range
    pub fn line_total(&self) -> Result<Decimal, ChangeError> {
        Decimal::from(self.quantity)
            .checked_mul(self.unit_price)
            .ok_or(ChangeError::Overflow)
    }

    pub fn recalculate(&mut self) -> Result<(), ChangeError> {
        self.total = self.line_total()?;
        Ok(())
    }
}

/// A priced proposal sent to a client before work starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub number: String,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    pub items: Vec<LineItem>,
    pub notes: Option<String>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(number: String, client_id: Uuid, date: NaiveDate, valid_until: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            number,
            client_id,
            date,
            valid_until,
            items: Vec::new(),
            notes: None,
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
            status: QuoteStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Still pending after its validity date
    pub fn is_past_validity(&self, today: NaiveDate) -> bool {
        self.status == QuoteStatus::Pending && self.valid_until < today
    }
}

impl PricedDocument for Quote {
    fn items(&self) -> &[LineItem] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<LineItem> {
        &mut self.items
    }

    fn discount(&self) -> Decimal {
        self.discount
    }

    fn set_discount(&mut self, discount: Decimal) {
        self.discount = discount;
    }

    fn apply_totals(&mut self, totals: Totals) {
        self.subtotal = totals.subtotal;
        self.discount = totals.discount;
        self.total = totals.total;
        self.updated_at = Utc::now();
    }
}

/// A confirmed job, optionally born from a quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub number: String,
    pub client_id: Uuid,
    pub date: NaiveDate,
    pub deadline: NaiveDate,
    pub items: Vec<LineItem>,
    pub notes: Option<String>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub payment_details: Option<String>,
    pub quote_id: Option<Uuid>,
    pub payments: Vec<Payment>,
    pub timeline: Vec<TimelineEvent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(number: String, client_id: Uuid, date: NaiveDate, deadline: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            number,
            client_id,
            date,
            deadline,
            items: Vec::new(),
            notes: None,
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            total: Decimal::ZERO,
            status: OrderStatus::New,
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::Full,
            payment_details: None,
            quote_id: None,
            payments: Vec::new(),
            timeline: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Past its deadline and still open
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.deadline < today && self.status.is_open()
    }
}

impl OrderStatus {
    pub fn is_open(self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::Production)
    }
}

impl PricedDocument for Order {
    fn items(&self) -> &[LineItem] {
        &self.items
    }

    fn items_mut(&mut self) -> &mut Vec<LineItem> {
        &mut self.items
    }

    fn discount(&self) -> Decimal {
        self.discount
    }

    fn set_discount(&mut self, discount: Decimal) {
        self.discount = discount;
    }

    fn apply_totals(&mut self, totals: Totals) {
        self.subtotal = totals.subtotal;
        self.discount = totals.discount;
        self.total = totals.total;
        self.updated_at = Utc::now();
    }
}
