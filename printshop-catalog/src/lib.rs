pub mod product;
pub mod pricing;
pub mod inventory;
pub mod category;
pub mod filter;

pub use product::{Product, ProductError, ProductStatus, ProductType, ProductVariation};
pub use pricing::{margin_percentage, DimensionalPricing, SizedPrice};
pub use inventory::{StockLevel, StockMovement, StockMovementKind, InventoryError};
pub use category::{slugify, Category, CategoryError};
pub use filter::{ProductFilter, StockFilter};
