use std::sync::Arc;

use printshop_core::repository::{
    CategoryRepository, ClientRepository, OrderRepository, ProductRepository, QuoteRepository,
};
use printshop_order::OrderManager;
use printshop_store::{BusinessRules, EventBus, MemoryStore};

#[derive(Clone)]
pub struct AppState {
    pub clients: Arc<dyn ClientRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub quotes: Arc<dyn QuoteRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub manager: OrderManager,
    pub events: EventBus,
    pub business_rules: BusinessRules,
}

impl AppState {
    /// Every repository backed by the same in-memory store
    pub fn in_memory(store: Arc<MemoryStore>, business_rules: BusinessRules, events: EventBus) -> Self {
        Self {
            clients: store.clone(),
            categories: store.clone(),
            products: store.clone(),
            quotes: store.clone(),
            orders: store,
            manager: OrderManager::new(business_rules.status_policy),
            events,
            business_rules,
        }
    }
}
