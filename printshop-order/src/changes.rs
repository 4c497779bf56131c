use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::models::LineItem;
use crate::totals::{PricedDocument, Totals};

/// A numeric form field as typed by the user: either a JSON number or
/// whatever text was in the input box.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NumericInput {
    Number(Decimal),
    Text(String),
}

impl From<Decimal> for NumericInput {
    fn from(value: Decimal) -> Self {
        NumericInput::Number(value)
    }
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        NumericInput::Number(Decimal::from(value))
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

impl NumericInput {
    /// Longest leading decimal in the input. Accepts a comma as the decimal
    /// separator. Returns `None` when nothing numeric leads the text.
    pub fn parse_decimal(&self) -> Option<Decimal> {
        match self {
            NumericInput::Number(n) => Some(*n),
            NumericInput::Text(raw) => {
                let normalized = raw.trim().replace(',', ".");
                let prefix = numeric_prefix(&normalized, true);
                Decimal::from_str(prefix).ok()
            }
        }
    }

    /// Leading integer, truncating any fraction
    pub fn parse_integer(&self) -> Option<i64> {
        match self {
            NumericInput::Number(n) => n.trunc().to_i64(),
            NumericInput::Text(raw) => numeric_prefix(raw.trim(), false).parse().ok(),
        }
    }
}

fn numeric_prefix(text: &str, allow_fraction: bool) -> &str {
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, ch) in text.char_indices() {
        match ch {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if allow_fraction && !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + ch.len_utf8();
    }

    if !seen_digit {
        return "";
    }
    text[..end].trim_end_matches('.')
}

/// Quantity field: unparsable or zero becomes 1
pub fn coerce_quantity(input: &NumericInput) -> i64 {
    match input.parse_integer() {
        Some(0) | None => 1,
        Some(n) => n,
    }
}

/// Unit price field: unparsable becomes 0
pub fn coerce_unit_price(input: &NumericInput) -> Decimal {
    input.parse_decimal().unwrap_or(Decimal::ZERO)
}

/// Discount field: unparsable becomes 0
pub fn coerce_discount(input: &NumericInput) -> Decimal {
    input.parse_decimal().unwrap_or(Decimal::ZERO)
}

/// Edits to the line items of a quote or order. Every operation leaves the
/// document with freshly recomputed totals, or untouched when it fails.
pub struct ChangeHandler;

impl ChangeHandler {
    /// Append an empty row and return its id
    pub fn add_blank_item<D: PricedDocument>(doc: &mut D) -> Result<Uuid, ChangeError> {
        let item = LineItem::blank();
        let id = item.id;
        Self::add_item(doc, item)?;
        Ok(id)
    }

    pub fn add_item<D: PricedDocument>(doc: &mut D, item: LineItem) -> Result<(), ChangeError> {
        doc.items_mut().push(item);
        if let Err(err) = doc.recalculate() {
            doc.items_mut().pop();
            return Err(err);
        }
        Ok(())
    }

    /// Picking a catalog product fills in its name and current price
    pub fn select_product<D: PricedDocument>(
        doc: &mut D,
        item_id: &Uuid,
        product_id: Option<Uuid>,
        product_name: &str,
        price: Decimal,
    ) -> Result<(), ChangeError> {
        Self::edit_item(doc, item_id, |item| {
            item.product_id = product_id;
            item.product = product_name.to_string();
            item.unit_price = price;
        })
    }

    pub fn set_description<D: PricedDocument>(doc: &mut D, item_id: &Uuid, description: &str) -> Result<(), ChangeError> {
        Self::item_mut(doc, item_id)?.description = description.to_string();
        Ok(())
    }

    pub fn set_quantity<D: PricedDocument>(doc: &mut D, item_id: &Uuid, input: &NumericInput) -> Result<(), ChangeError> {
        let quantity = coerce_quantity(input);
        if quantity < 0 {
            return Err(ChangeError::InvalidQuantity(quantity));
        }
        Self::edit_item(doc, item_id, |item| item.quantity = quantity)
    }

    pub fn set_unit_price<D: PricedDocument>(doc: &mut D, item_id: &Uuid, input: &NumericInput) -> Result<(), ChangeError> {
        let price = coerce_unit_price(input);
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ChangeError::InvalidPrice(price));
        }
        Self::edit_item(doc, item_id, |item| item.unit_price = price)
    }

    /// Any discount is accepted, including one larger than the subtotal
    pub fn set_discount<D: PricedDocument>(doc: &mut D, input: &NumericInput) -> Result<(), ChangeError> {
        let previous = doc.discount();
        doc.set_discount(coerce_discount(input));
        if let Err(err) = doc.recalculate() {
            doc.set_discount(previous);
            return Err(err);
        }
        Ok(())
    }

    pub fn remove_item<D: PricedDocument>(doc: &mut D, item_id: &Uuid) -> Result<LineItem, ChangeError> {
        let index = doc
            .items()
            .iter()
            .position(|i| i.id == *item_id)
            .ok_or_else(|| ChangeError::ItemNotFound(item_id.to_string()))?;

        let removed = doc.items_mut().remove(index);
        if let Err(err) = doc.recalculate() {
            doc.items_mut().insert(index, removed);
            return Err(err);
        }
        Ok(removed)
    }

    /// Swap the whole item list, as a form submission does
    pub fn replace_items<D: PricedDocument>(doc: &mut D, items: Vec<LineItem>) -> Result<(), ChangeError> {
        for item in &items {
            if item.quantity < 0 {
                return Err(ChangeError::InvalidQuantity(item.quantity));
            }
            if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
                return Err(ChangeError::InvalidPrice(item.unit_price));
            }
        }
        Totals::compute(&items, doc.discount())?;

        *doc.items_mut() = items;
        doc.recalculate()
    }

    fn edit_item<D, F>(doc: &mut D, item_id: &Uuid, edit: F) -> Result<(), ChangeError>
    where
        D: PricedDocument,
        F: FnOnce(&mut LineItem),
    {
        let item = Self::item_mut(doc, item_id)?;
        let previous = item.clone();
        edit(item);

        if let Err(err) = doc.recalculate() {
            *Self::item_mut(doc, item_id)? = previous;
            return Err(err);
        }
        Ok(())
    }

    fn item_mut<'a, D: PricedDocument>(doc: &'a mut D, item_id: &Uuid) -> Result<&'a mut LineItem, ChangeError> {
        doc.items_mut()
            .iter_mut()
            .find(|i| i.id == *item_id)
            .ok_or_else(|| ChangeError::ItemNotFound(item_id.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChangeError {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Quantity must not be negative, got {0}")]
    InvalidQuantity(i64),

    #[error("Unit price must not be negative, got {0}")]
    InvalidPrice(Decimal),

    #[error("Amounts are too large to total")]
    Overflow,
}
