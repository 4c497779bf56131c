use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::inventory::StockLevel;
use crate::product::{Product, ProductType};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockFilter {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockFilter {
    fn accepts(self, level: StockLevel) -> bool {
        matches!(
            (self, level),
            (StockFilter::InStock, StockLevel::InStock)
                | (StockFilter::LowStock, StockLevel::LowStock)
                | (StockFilter::OutOfStock, StockLevel::OutOfStock)
        )
    }
}

/// Product list filter. `None` fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilter {
    pub product_type: Option<ProductType>,
    pub stock: Option<StockFilter>,
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product, low_stock_fallback: i64) -> bool {
        if let Some(product_type) = self.product_type {
            if product.product_type != product_type {
                return false;
            }
        }

        if let Some(stock) = self.stock {
            if !stock.accepts(product.stock_level(low_stock_fallback)) {
                return false;
            }
        }

        if let Some(category_id) = self.category_id {
            if product.category_id != Some(category_id) {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                product.name.to_lowercase().contains(&term)
                    || product.sku.to_lowercase().contains(&term)
                    || product
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog() -> Vec<Product> {
        let mut banner = Product::new("Banner Lona 440g", "BAN-440", ProductType::Product, dec!(150), dec!(75));
        banner.stock = Some(0);
        banner.min_stock = 5;

        let mut vinil = Product::new("Adesivo Vinil", "ADV-001", ProductType::Product, dec!(45), dec!(18));
        vinil.stock = Some(3);
        vinil.min_stock = 5;

        let mut cartao = Product::new("Cartão de Visita", "CRT-001", ProductType::Product, dec!(0.5), dec!(0.1));
        cartao.stock = Some(1000);

        let arte = Product::new("Criação de Arte", "SRV-ART", ProductType::Service, dec!(120), dec!(0));

        vec![banner, vinil, cartao, arte]
    }

    fn names(filter: &ProductFilter) -> Vec<String> {
        catalog()
            .into_iter()
            .filter(|p| filter.matches(p, 10))
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn test_empty_filter_matches_all() {
        assert_eq!(names(&ProductFilter::default()).len(), 4);
    }

    #[test]
    fn test_stock_filters() {
        let out = ProductFilter { stock: Some(StockFilter::OutOfStock), ..Default::default() };
        assert_eq!(names(&out), vec!["Banner Lona 440g"]);

        let low = ProductFilter { stock: Some(StockFilter::LowStock), ..Default::default() };
        assert_eq!(names(&low), vec!["Adesivo Vinil"]);

        let in_stock = ProductFilter { stock: Some(StockFilter::InStock), ..Default::default() };
        assert_eq!(names(&in_stock), vec!["Cartão de Visita"]);
    }

    #[test]
    fn test_type_and_search() {
        let services = ProductFilter { product_type: Some(ProductType::Service), ..Default::default() };
        assert_eq!(names(&services), vec!["Criação de Arte"]);

        let search = ProductFilter { search: Some("crt".to_string()), ..Default::default() };
        assert_eq!(names(&search), vec!["Cartão de Visita"]);
    }
}
