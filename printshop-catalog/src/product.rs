use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::inventory::StockLevel;
use crate::pricing::{margin_percentage, DimensionalPricing};

/// Physical goods carry stock, services never do
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    Product,
    Service,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

/// A priced sub-SKU of a product, e.g. a specific banner size
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductVariation {
    pub id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub cost: Decimal,
    pub sku: Option<String>,
    pub stock: Option<i64>,
}

impl ProductVariation {
    pub fn new(name: impl Into<String>, price: Decimal, cost: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            price,
            cost,
            sku: None,
            stock: None,
        }
    }

    pub fn margin(&self) -> Decimal {
        margin_percentage(self.price, self.cost)
    }
}

/// Catalog entry for anything the shop sells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub product_type: ProductType,
    pub price: Decimal,
    pub cost: Decimal,
    pub stock: Option<i64>,
    pub min_stock: i64,
    pub supplier_id: Option<String>,
    pub variations: Vec<ProductVariation>,
    pub status: ProductStatus,
    pub images: Vec<String>,
    pub pricing: DimensionalPricing,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        sku: impl Into<String>,
        product_type: ProductType,
        price: Decimal,
        cost: Decimal,
    ) -> Self {
        let now = Utc::now();
        let mut product = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sku: sku.into(),
            description: None,
            category_id: None,
            product_type,
            price,
            cost,
            stock: Some(0),
            min_stock: 0,
            supplier_id: None,
            variations: Vec::new(),
            status: ProductStatus::Active,
            images: Vec::new(),
            pricing: DimensionalPricing::default(),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        product.normalize();
        product
    }

    /// Services have no stock; clear whatever the caller sent.
    pub fn normalize(&mut self) {
        if self.product_type == ProductType::Service {
            self.stock = None;
            self.min_stock = 0;
        }
    }

    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::Invalid("name is required".to_string()));
        }
        if self.sku.trim().is_empty() {
            return Err(ProductError::Invalid("sku is required".to_string()));
        }
        if self.price.is_sign_negative() || self.cost.is_sign_negative() {
            return Err(ProductError::Invalid("price and cost must not be negative".to_string()));
        }
        if self.min_stock < 0 {
            return Err(ProductError::Invalid("min_stock must not be negative".to_string()));
        }
        for variation in &self.variations {
            if variation.name.trim().is_empty() {
                return Err(ProductError::Invalid("variation name is required".to_string()));
            }
            if variation.price.is_sign_negative() || variation.cost.is_sign_negative() {
                return Err(ProductError::Invalid(format!(
                    "variation {} has a negative price or cost",
                    variation.name
                )));
            }
        }
        Ok(())
    }

    pub fn margin(&self) -> Decimal {
        margin_percentage(self.price, self.cost)
    }

    pub fn stock_level(&self, fallback_threshold: i64) -> StockLevel {
        StockLevel::classify(self.stock, self.min_stock, fallback_threshold)
    }

    pub fn has_variations(&self) -> bool {
        !self.variations.is_empty()
    }

    pub fn add_variation(&mut self, variation: ProductVariation) -> Result<(), ProductError> {
        if variation.name.trim().is_empty() {
            return Err(ProductError::Invalid("variation name is required".to_string()));
        }
        self.variations.push(variation);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replace a variation's fields, keeping its id
    pub fn update_variation(&mut self, variation_id: &Uuid, mut update: ProductVariation) -> Result<(), ProductError> {
        let slot = self
            .variations
            .iter_mut()
            .find(|v| v.id == *variation_id)
            .ok_or_else(|| ProductError::VariationNotFound(variation_id.to_string()))?;

        update.id = *variation_id;
        *slot = update;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove_variation(&mut self, variation_id: &Uuid) -> Result<ProductVariation, ProductError> {
        let index = self
            .variations
            .iter()
            .position(|v| v.id == *variation_id)
            .ok_or_else(|| ProductError::VariationNotFound(variation_id.to_string()))?;

        self.updated_at = Utc::now();
        Ok(self.variations.remove(index))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Variation not found: {0}")]
    VariationNotFound(String),

    #[error("Invalid product: {0}")]
    Invalid(String),
}
