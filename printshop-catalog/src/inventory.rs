use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock classification shown next to each product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// Services and anything else without a stock count
    NotTracked,
    OutOfStock,
    LowStock,
    InStock,
}

impl StockLevel {
    /// Classify a stock count. `min_stock` is the product's own threshold;
    /// products that never set one (0) fall back to `fallback_threshold`.
    pub fn classify(stock: Option<i64>, min_stock: i64, fallback_threshold: i64) -> Self {
        let Some(stock) = stock else {
            return StockLevel::NotTracked;
        };

        let threshold = if min_stock > 0 { min_stock } else { fallback_threshold };

        if stock <= 0 {
            StockLevel::OutOfStock
        } else if stock < threshold {
            StockLevel::LowStock
        } else {
            StockLevel::InStock
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockMovementKind {
    /// Goods received
    In,
    /// Goods consumed or sold
    Out,
    /// Inventory count; `quantity` becomes the new stock
    Adjustment,
}

/// A single entry in a product's stock history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub kind: StockMovementKind,
    pub quantity: i64,
    pub stock_before: i64,
    pub stock_after: i64,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Apply a movement to the current stock and return the history entry.
    pub fn apply(
        product_id: Uuid,
        current: Option<i64>,
        kind: StockMovementKind,
        quantity: i64,
        reason: Option<String>,
    ) -> Result<Self, InventoryError> {
        let stock_before = current.ok_or_else(|| InventoryError::NotTracked(product_id.to_string()))?;

        if quantity < 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        let stock_after = match kind {
            StockMovementKind::In => stock_before
                .checked_add(quantity)
                .ok_or(InventoryError::InvalidQuantity(quantity))?,
            StockMovementKind::Out => {
                if stock_before < quantity {
                    return Err(InventoryError::InsufficientStock {
                        requested: quantity,
                        available: stock_before,
                    });
                }
                stock_before - quantity
            }
            StockMovementKind::Adjustment => quantity,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            product_id,
            kind,
            quantity,
            stock_before,
            stock_after,
            reason,
            created_at: Utc::now(),
        })
    }

    pub fn delta(&self) -> i64 {
        self.stock_after.saturating_sub(self.stock_before)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Stock is not tracked for product {0}")]
    NotTracked(String),

    #[error("Invalid stock quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        requested: i64,
        available: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(StockLevel::classify(None, 5, 10), StockLevel::NotTracked);
        assert_eq!(StockLevel::classify(Some(0), 5, 10), StockLevel::OutOfStock);
        assert_eq!(StockLevel::classify(Some(-2), 5, 10), StockLevel::OutOfStock);
        assert_eq!(StockLevel::classify(Some(4), 5, 10), StockLevel::LowStock);
        assert_eq!(StockLevel::classify(Some(5), 5, 10), StockLevel::InStock);
    }

    #[test]
    fn test_classify_uses_fallback_threshold() {
        assert_eq!(StockLevel::classify(Some(9), 0, 10), StockLevel::LowStock);
        assert_eq!(StockLevel::classify(Some(10), 0, 10), StockLevel::InStock);
    }

    #[test]
    fn test_stock_movements() {
        let product_id = Uuid::new_v4();

        let received = StockMovement::apply(product_id, Some(20), StockMovementKind::In, 30, None).unwrap();
        assert_eq!(received.stock_after, 50);
        assert_eq!(received.delta(), 30);

        let sold = StockMovement::apply(product_id, Some(50), StockMovementKind::Out, 45, None).unwrap();
        assert_eq!(sold.stock_after, 5);

        let counted = StockMovement::apply(
            product_id,
            Some(5),
            StockMovementKind::Adjustment,
            7,
            Some("Contagem mensal".to_string()),
        )
        .unwrap();
        assert_eq!(counted.stock_after, 7);
        assert_eq!(counted.delta(), 2);
    }

    #[test]
    fn test_out_beyond_stock_rejected() {
        let result = StockMovement::apply(Uuid::new_v4(), Some(3), StockMovementKind::Out, 4, None);
        assert!(matches!(
            result,
            Err(InventoryError::InsufficientStock { requested: 4, available: 3 })
        ));
    }

    #[test]
    fn test_untracked_rejected() {
        let result = StockMovement::apply(Uuid::new_v4(), None, StockMovementKind::In, 1, None);
        assert!(matches!(result, Err(InventoryError::NotTracked(_))));
    }

    #[test]
    fn test_receiving_past_the_counter_limit_rejected() {
        let result = StockMovement::apply(Uuid::new_v4(), Some(1), StockMovementKind::In, i64::MAX, None);
        assert!(matches!(result, Err(InventoryError::InvalidQuantity(i64::MAX))));

        let full = StockMovement::apply(Uuid::new_v4(), Some(0), StockMovementKind::In, i64::MAX, None).unwrap();
        assert_eq!(full.stock_after, i64::MAX);
    }
}
