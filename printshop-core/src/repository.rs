use async_trait::async_trait;
use uuid::Uuid;

use printshop_catalog::{Category, Product, StockMovement, StockMovementKind};
use printshop_order::{Order, Quote};

use crate::client::Client;
use crate::CoreResult;

/// In-place change applied to a stored record while the store holds its
/// write lock. An error leaves the record untouched.
pub type Mutation<'a, T> = Box<dyn FnOnce(&mut T) -> CoreResult<()> + Send + 'a>;

/// Repository trait for client records
#[async_trait]
pub trait ClientRepository: Send + Sync {
    async fn create_client(&self, client: Client) -> CoreResult<Client>;

    async fn get_client(&self, id: Uuid) -> CoreResult<Option<Client>>;

    /// Sorted by name
    async fn list_clients(&self) -> CoreResult<Vec<Client>>;

    async fn update_client(&self, id: Uuid, mutation: Mutation<'_, Client>) -> CoreResult<Client>;

    async fn delete_client(&self, id: Uuid) -> CoreResult<()>;
}

/// Repository trait for product categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Fails with a conflict when the slug is taken
    async fn create_category(&self, category: Category) -> CoreResult<Category>;

    async fn list_categories(&self) -> CoreResult<Vec<Category>>;

    async fn get_category(&self, id: Uuid) -> CoreResult<Option<Category>>;
}

/// Repository trait for the product catalog
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(&self, product: Product) -> CoreResult<Product>;

    async fn get_product(&self, id: Uuid) -> CoreResult<Option<Product>>;

    async fn list_products(&self) -> CoreResult<Vec<Product>>;

    async fn update_product(&self, id: Uuid, mutation: Mutation<'_, Product>) -> CoreResult<Product>;

    async fn delete_product(&self, id: Uuid) -> CoreResult<()>;

    /// Applies a movement to the product's current stock and records it
    async fn move_stock(
        &self,
        product_id: Uuid,
        kind: StockMovementKind,
        quantity: i64,
        reason: Option<String>,
    ) -> CoreResult<(Product, StockMovement)>;

    /// Newest first
    async fn list_stock_movements(&self, product_id: Uuid) -> CoreResult<Vec<StockMovement>>;
}

/// Repository trait for quotes
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Assigns the next `ORC-NNN` number
    async fn create_quote(&self, quote: Quote) -> CoreResult<Quote>;

    async fn get_quote(&self, id: Uuid) -> CoreResult<Option<Quote>>;

    /// Newest first
    async fn list_quotes(&self) -> CoreResult<Vec<Quote>>;

    async fn update_quote(&self, id: Uuid, mutation: Mutation<'_, Quote>) -> CoreResult<Quote>;

    async fn delete_quote(&self, id: Uuid) -> CoreResult<()>;
}

/// Repository trait for orders
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Assigns the next `PED-NNN` number
    async fn create_order(&self, order: Order) -> CoreResult<Order>;

    async fn get_order(&self, id: Uuid) -> CoreResult<Option<Order>>;

    /// Newest first
    async fn list_orders(&self) -> CoreResult<Vec<Order>>;

    async fn update_order(&self, id: Uuid, mutation: Mutation<'_, Order>) -> CoreResult<Order>;

    async fn delete_order(&self, id: Uuid) -> CoreResult<()>;
}
