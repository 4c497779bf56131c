use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use printshop_catalog::{Category, CategoryError, Product, StockMovement, StockMovementKind};
use printshop_core::repository::{
    CategoryRepository, ClientRepository, Mutation, OrderRepository, ProductRepository, QuoteRepository,
};
use printshop_core::{Client, CoreError, CoreResult};
use printshop_order::{Order, Quote};

pub const QUOTE_PREFIX: &str = "ORC";
pub const ORDER_PREFIX: &str = "PED";

/// Stored entity with an id and a modification timestamp
trait Record: Clone {
    const ENTITY: &'static str;

    fn id(&self) -> Uuid;

    fn touch(&mut self);
}

impl Record for Client {
    const ENTITY: &'static str = "Client";

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Record for Product {
    const ENTITY: &'static str = "Product";

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Record for Quote {
    const ENTITY: &'static str = "Quote";

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Record for Order {
    const ENTITY: &'static str = "Order";

    fn id(&self) -> Uuid {
        self.id
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn find<T: Record>(records: &[T], id: Uuid) -> Option<T> {
    records.iter().find(|r| r.id() == id).cloned()
}

/// Runs the mutation on a copy and stores it only if it succeeds
fn modify<T: Record>(records: &mut [T], id: Uuid, mutation: Mutation<'_, T>) -> CoreResult<T> {
    let slot = records
        .iter_mut()
        .find(|r| r.id() == id)
        .ok_or_else(|| CoreError::not_found(T::ENTITY, id))?;

    let mut draft = slot.clone();
    mutation(&mut draft)?;
    draft.touch();
    *slot = draft.clone();
    Ok(draft)
}

fn remove<T: Record>(records: &mut Vec<T>, id: Uuid) -> CoreResult<()> {
    let before = records.len();
    records.retain(|r| r.id() != id);
    if records.len() == before {
        return Err(CoreError::not_found(T::ENTITY, id));
    }
    Ok(())
}

/// Next sequential document number, e.g. `ORC-004`. Continues after the
/// highest number in use so deleted documents never free a number up.
pub fn next_number<'a>(prefix: &str, existing: impl Iterator<Item = &'a str>) -> String {
    let highest = existing
        .filter_map(|n| n.strip_prefix(prefix)?.strip_prefix('-')?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}-{:03}", prefix, highest + 1)
}

/// Process-local store backing every repository trait. Each collection has
/// its own lock; a read-modify-write holds that collection's write guard
/// for its whole duration.
#[derive(Default)]
pub struct MemoryStore {
    clients: RwLock<Vec<Client>>,
    categories: RwLock<Vec<Category>>,
    products: RwLock<Vec<Product>>,
    movements: RwLock<Vec<StockMovement>>,
    quotes: RwLock<Vec<Quote>>,
    orders: RwLock<Vec<Order>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRepository for MemoryStore {
    async fn create_client(&self, client: Client) -> CoreResult<Client> {
        client.validate()?;
        let mut clients = self.clients.write().await;
        info!("Creating client {} ({})", client.id, client.name);
        clients.push(client.clone());
        Ok(client)
    }

    async fn get_client(&self, id: Uuid) -> CoreResult<Option<Client>> {
        Ok(find(self.clients.read().await.as_slice(), id))
    }

    async fn list_clients(&self) -> CoreResult<Vec<Client>> {
        let mut clients = self.clients.read().await.clone();
        clients.sort_by_key(|c| c.name.to_lowercase());
        Ok(clients)
    }

    async fn update_client(&self, id: Uuid, mutation: Mutation<'_, Client>) -> CoreResult<Client> {
        let mut clients = self.clients.write().await;
        let updated = modify(clients.as_mut_slice(), id, Box::new(move |client: &mut Client| -> CoreResult<()> {
            mutation(client)?;
            client.validate()
        }))?;
        debug!("Updated client {}", id);
        Ok(updated)
    }

    async fn delete_client(&self, id: Uuid) -> CoreResult<()> {
        remove(&mut *self.clients.write().await, id)?;
        info!("Deleted client {}", id);
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create_category(&self, category: Category) -> CoreResult<Category> {
        let mut categories = self.categories.write().await;
        if categories.iter().any(|c| c.slug == category.slug) {
            return Err(CategoryError::DuplicateSlug(category.slug).into());
        }
        info!("Creating category {} ({})", category.id, category.slug);
        categories.push(category.clone());
        Ok(category)
    }

    async fn list_categories(&self) -> CoreResult<Vec<Category>> {
        let mut categories = self.categories.read().await.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: Uuid) -> CoreResult<Option<Category>> {
        Ok(self.categories.read().await.iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create_product(&self, mut product: Product) -> CoreResult<Product> {
        product.normalize();
        product.validate()?;
        let mut products = self.products.write().await;
        info!("Creating product {} ({})", product.id, product.sku);
        products.push(product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> CoreResult<Option<Product>> {
        Ok(find(self.products.read().await.as_slice(), id))
    }

    async fn list_products(&self) -> CoreResult<Vec<Product>> {
        let mut products = self.products.read().await.clone();
        products.sort_by_key(|p| p.name.to_lowercase());
        Ok(products)
    }

    async fn update_product(&self, id: Uuid, mutation: Mutation<'_, Product>) -> CoreResult<Product> {
        let mut products = self.products.write().await;
        let updated = modify(products.as_mut_slice(), id, Box::new(move |product: &mut Product| -> CoreResult<()> {
            mutation(product)?;
            product.normalize();
            product.validate()?;
            Ok(())
        }))?;
        debug!("Updated product {}", id);
        Ok(updated)
    }

    async fn delete_product(&self, id: Uuid) -> CoreResult<()> {
        remove(&mut *self.products.write().await, id)?;
        self.movements.write().await.retain(|m| m.product_id != id);
        info!("Deleted product {}", id);
        Ok(())
    }

    async fn move_stock(
        &self,
        product_id: Uuid,
        kind: StockMovementKind,
        quantity: i64,
        reason: Option<String>,
    ) -> CoreResult<(Product, StockMovement)> {
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CoreError::not_found("Product", product_id))?;

        let movement = StockMovement::apply(product_id, product.stock, kind, quantity, reason)?;
        product.stock = Some(movement.stock_after);
        product.touch();
        let product = product.clone();

        info!(
            "Stock of {} moved {} -> {}",
            product_id, movement.stock_before, movement.stock_after
        );
        self.movements.write().await.push(movement.clone());
        Ok((product, movement))
    }

    async fn list_stock_movements(&self, product_id: Uuid) -> CoreResult<Vec<StockMovement>> {
        let mut movements: Vec<StockMovement> = self
            .movements
            .read()
            .await
            .iter()
            .filter(|m| m.product_id == product_id)
            .cloned()
            .collect();
        movements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(movements)
    }
}

#[async_trait]
impl QuoteRepository for MemoryStore {
    async fn create_quote(&self, mut quote: Quote) -> CoreResult<Quote> {
        let mut quotes = self.quotes.write().await;
        quote.number = next_number(QUOTE_PREFIX, quotes.iter().map(|q| q.number.as_str()));
        info!("Creating quote {} ({})", quote.number, quote.id);
        quotes.push(quote.clone());
        Ok(quote)
    }

    async fn get_quote(&self, id: Uuid) -> CoreResult<Option<Quote>> {
        Ok(find(self.quotes.read().await.as_slice(), id))
    }

    async fn list_quotes(&self) -> CoreResult<Vec<Quote>> {
        let mut quotes = self.quotes.read().await.clone();
        quotes.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.number.cmp(&a.number)));
        Ok(quotes)
    }

    async fn update_quote(&self, id: Uuid, mutation: Mutation<'_, Quote>) -> CoreResult<Quote> {
        let mut quotes = self.quotes.write().await;
        let updated = modify(quotes.as_mut_slice(), id, mutation)?;
        debug!("Updated quote {}", updated.number);
        Ok(updated)
    }

    async fn delete_quote(&self, id: Uuid) -> CoreResult<()> {
        remove(&mut *self.quotes.write().await, id)?;
        info!("Deleted quote {}", id);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create_order(&self, mut order: Order) -> CoreResult<Order> {
        let mut orders = self.orders.write().await;
        order.number = next_number(ORDER_PREFIX, orders.iter().map(|o| o.number.as_str()));
        info!("Creating order {} ({})", order.number, order.id);
        orders.push(order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: Uuid) -> CoreResult<Option<Order>> {
        Ok(find(self.orders.read().await.as_slice(), id))
    }

    async fn list_orders(&self) -> CoreResult<Vec<Order>> {
        let mut orders = self.orders.read().await.clone();
        orders.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.number.cmp(&a.number)));
        Ok(orders)
    }

    async fn update_order(&self, id: Uuid, mutation: Mutation<'_, Order>) -> CoreResult<Order> {
        let mut orders = self.orders.write().await;
        let updated = modify(orders.as_mut_slice(), id, mutation)?;
        debug!("Updated order {}", updated.number);
        Ok(updated)
    }

    async fn delete_order(&self, id: Uuid) -> CoreResult<()> {
        remove(&mut *self.orders.write().await, id)?;
        info!("Deleted order {}", id);
        Ok(())
    }
}
