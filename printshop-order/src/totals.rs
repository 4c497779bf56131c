use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::changes::ChangeError;
use crate::models::LineItem;

/// Subtotal, discount and grand total of a priced document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Sum every line's quantity × unit price and subtract the discount.
    ///
    /// Line totals are recomputed here rather than trusted. The discount is
    /// not checked against the subtotal, so the total can go negative.
    /// Fails when a line or a sum leaves the decimal range.
    pub fn compute(items: &[LineItem], discount: Decimal) -> Result<Self, ChangeError> {
        let subtotal = items.iter().try_fold(Decimal::ZERO, |acc, item| {
            acc.checked_add(item.line_total()?).ok_or(ChangeError::Overflow)
        })?;
        let total = subtotal.checked_sub(discount).ok_or(ChangeError::Overflow)?;

        Ok(Self {
            subtotal,
            discount,
            total,
        })
    }
}

/// Shared shape of quotes and orders: an ordered list of line items plus a
/// discount, with cached totals that must be refreshed after every edit.
pub trait PricedDocument {
    fn items(&self) -> &[LineItem];

    fn items_mut(&mut self) -> &mut Vec<LineItem>;

    fn discount(&self) -> Decimal;

    fn set_discount(&mut self, discount: Decimal);

    fn apply_totals(&mut self, totals: Totals);

    /// Recompute every line total and the document totals from scratch.
    /// On overflow the document is left as it was.
    fn recalculate(&mut self) -> Result<(), ChangeError> {
        let totals = Totals::compute(self.items(), self.discount())?;
        for item in self.items_mut().iter_mut() {
            item.recalculate()?;
        }
        self.apply_totals(totals);
        Ok(())
    }
}
