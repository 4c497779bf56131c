use printshop_shared::models::events::DomainEvent;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// In-process fan-out for domain events. Publishing never blocks and never
/// fails the caller; with no subscribers the event is dropped.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: DomainEvent) {
        let topic = event.topic();
        match self.sender.send(event) {
            Ok(receivers) => info!("Published {} to {} subscriber(s)", topic, receivers),
            Err(_) => debug!("No subscribers for {}, event dropped", topic),
        }
    }
}
