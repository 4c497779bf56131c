use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::product::ProductError;

/// Profit as a percentage of the sale price.
///
/// A zero cost is reported as a 100% margin. Cost above price gives a
/// negative margin, which is returned as-is. A zero price with a non-zero
/// cost has no meaningful margin and is reported as 0. Margins outside the
/// decimal range clamp to its bounds.
pub fn margin_percentage(price: Decimal, cost: Decimal) -> Decimal {
    if cost.is_zero() {
        return Decimal::ONE_HUNDRED;
    }
    if price.is_zero() {
        return Decimal::ZERO;
    }

    let margin = price
        .checked_sub(cost)
        .and_then(|profit| profit.checked_div(price))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

    match margin {
        Some(margin) => margin,
        None if cost > price => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Per-product settings for products sold by size (banners, stickers,
/// plates). `base_price` is the price of one unit of `unit`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DimensionalPricing {
    pub width: bool,
    pub height: bool,
    pub unit: String,
    pub base_price: Decimal,
}

impl Default for DimensionalPricing {
    fn default() -> Self {
        Self {
            width: false,
            height: false,
            unit: "m²".to_string(),
            base_price: Decimal::ZERO,
        }
    }
}

/// Result of a size-based price calculation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizedPrice {
    pub price: Decimal,
    /// The measured quantity the base price was multiplied by
    pub measure: Decimal,
    pub description: String,
}

impl DimensionalPricing {
    pub fn is_sized(&self) -> bool {
        self.width || self.height
    }

    /// Price for the given dimensions. Dimensions that are not enabled are
    /// ignored, so a product with neither toggle always costs `base_price`.
    pub fn calculate(&self, width: Decimal, height: Decimal) -> Result<SizedPrice, ProductError> {
        let out_of_range = || ProductError::Invalid("dimensions are too large to price".to_string());

        let (measure, description) = match (self.width, self.height) {
            (true, true) => {
                let area = width.checked_mul(height).ok_or_else(out_of_range)?;
                (area, format!("{} x {} = {:.2} {}", width, height, area, self.unit))
            }
            (true, false) => (width, format!("{} {}", width, self.unit)),
            (false, true) => (height, format!("{} {}", height, self.unit)),
            (false, false) => (Decimal::ONE, String::new()),
        };

        Ok(SizedPrice {
            price: self.base_price.checked_mul(measure).ok_or_else(out_of_range)?,
            measure,
            description,
        })
    }
}
