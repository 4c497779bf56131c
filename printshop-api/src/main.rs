use std::net::SocketAddr;
use std::sync::Arc;

use printshop_api::{app, worker, AppState};
use printshop_order::OrderManager;
use printshop_store::{seed_sample_data, Config, EventBus, MemoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "printshop_api=debug,printshop_store=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!(
        "Starting print shop API on port {} with {:?} status policy",
        config.server.port,
        config.business_rules.status_policy
    );

    let events = EventBus::new(config.store.event_buffer);
    tokio::spawn(worker::start_event_logger(events.clone()));

    let store = Arc::new(MemoryStore::new());
    if config.store.seed_sample_data {
        let manager = OrderManager::new(config.business_rules.status_policy);
        seed_sample_data(&store, manager, chrono::Local::now().date_naive()).await?;
    }

    let app_state = AppState::in_memory(store, config.business_rules.clone(), events);
    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind");
    axum::serve(listener, app).await?;
    Ok(())
}
