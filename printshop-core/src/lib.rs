pub mod client;
pub mod repository;

pub use client::{Client, ClientFilter, ClientStatus};
pub use repository::{
    CategoryRepository, ClientRepository, Mutation, OrderRepository, ProductRepository, QuoteRepository,
};

use printshop_catalog::{CategoryError, InventoryError, ProductError};
use printshop_order::{ChangeError, OrderError, PaymentError, TransitionError};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal service error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

impl From<ProductError> for CoreError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => CoreError::NotFound { entity: "Product", id },
            ProductError::VariationNotFound(id) => CoreError::NotFound { entity: "Variation", id },
            ProductError::Invalid(msg) => CoreError::Validation(msg),
        }
    }
}

impl From<CategoryError> for CoreError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::Invalid(msg) => CoreError::Validation(msg),
            dup @ CategoryError::DuplicateSlug(_) => CoreError::Conflict(dup.to_string()),
        }
    }
}

impl From<InventoryError> for CoreError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InsufficientStock { .. } => CoreError::Conflict(err.to_string()),
            _ => CoreError::Validation(err.to_string()),
        }
    }
}

impl From<ChangeError> for CoreError {
    fn from(err: ChangeError) -> Self {
        match err {
            ChangeError::ItemNotFound(id) => CoreError::NotFound { entity: "Item", id },
            _ => CoreError::Validation(err.to_string()),
        }
    }
}

impl From<PaymentError> for CoreError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotFound(id) => CoreError::NotFound { entity: "Payment", id },
            PaymentError::InvalidAmount(_) => CoreError::Validation(err.to_string()),
        }
    }
}

impl From<TransitionError> for CoreError {
    fn from(err: TransitionError) -> Self {
        CoreError::Conflict(err.to_string())
    }
}

impl From<OrderError> for CoreError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => CoreError::NotFound { entity: "Order", id },
            OrderError::QuoteNotFound(id) => CoreError::NotFound { entity: "Quote", id },
            OrderError::InvalidTransition(t) => t.into(),
            OrderError::InvalidItems(e) => e.into(),
            OrderError::InvalidPayment(e) => e.into(),
            OrderError::QuoteNotConvertible { .. } => CoreError::Conflict(err.to_string()),
        }
    }
}
