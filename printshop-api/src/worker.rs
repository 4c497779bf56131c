use printshop_shared::models::events::DomainEvent;
use printshop_store::EventBus;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

/// Drains the event bus and writes every domain event to the log as JSON.
/// Runs until the bus is dropped.
pub async fn start_event_logger(bus: EventBus) {
    let mut rx = bus.subscribe();
    info!("Event logger started");

    loop {
        match rx.recv().await {
            Ok(event) => log_event(&event),
            Err(RecvError::Lagged(skipped)) => warn!("Event logger lagged, {} events skipped", skipped),
            Err(RecvError::Closed) => {
                info!("Event bus closed, stopping event logger");
                break;
            }
        }
    }
}

fn log_event(event: &DomainEvent) {
    match serde_json::to_string(event) {
        Ok(payload) => info!(topic = event.topic(), "{}", payload),
        Err(e) => error!("Failed to serialize {} event: {}", event.topic(), e),
    }
}
