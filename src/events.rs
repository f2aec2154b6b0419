use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Domain events emitted by the engine.
///
/// Events are published after the owning transaction commits; handlers must
/// never be able to roll a committed sale back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    OrderCompleted {
        order_id: Uuid,
        order_code: String,
        total_amount: Decimal,
    },
    OrderStatusChanged {
        order_id: Uuid,
        old_status: String,
        new_status: String,
    },
    StockDeducted {
        variant_id: Uuid,
        quantity: i32,
    },
    StockRestocked {
        variant_id: Uuid,
        quantity: i32,
    },
    PromotionApplied {
        promotion_id: Uuid,
        order_id: Uuid,
        discount_amount: Decimal,
    },
    ReturnProcessed {
        return_id: Uuid,
        order_id: Uuid,
        refund_amount: Decimal,
    },
    ExchangeCreated {
        order_id: Uuid,
        parent_order_id: Uuid,
        total_amount: Decimal,
    },
}

/// Cloneable handle for publishing events from services.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the receiver is gone.
    /// Event delivery is advisory; a dropped consumer must not fail a request.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!(error = %e, "Event receiver dropped; event discarded");
        }
    }
}

/// Consumes the event channel and records each event.
///
/// Notification delivery, reporting and export pipelines live outside this
/// crate; they subscribe by replacing or wrapping this loop.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match &event {
            Event::OrderCompleted {
                order_id,
                order_code,
                total_amount,
            } => {
                info!(%order_id, %order_code, %total_amount, "Order completed");
            }
            Event::OrderStatusChanged {
                order_id,
                old_status,
                new_status,
            } => {
                info!(%order_id, %old_status, %new_status, "Order status changed");
            }
            Event::StockDeducted { variant_id, quantity } => {
                info!(%variant_id, quantity, "Stock deducted");
            }
            Event::StockRestocked { variant_id, quantity } => {
                info!(%variant_id, quantity, "Stock restocked");
            }
            Event::PromotionApplied {
                promotion_id,
                order_id,
                discount_amount,
            } => {
                info!(%promotion_id, %order_id, %discount_amount, "Promotion applied");
            }
            Event::ReturnProcessed {
                return_id,
                order_id,
                refund_amount,
            } => {
                info!(%return_id, %order_id, %refund_amount, "Return processed");
            }
            Event::ExchangeCreated {
                order_id,
                parent_order_id,
                total_amount,
            } => {
                info!(%order_id, %parent_order_id, %total_amount, "Exchange order created");
            }
        }
    }

    warn!("Event processing loop has ended");
}

/// Convenience constructor wiring a sender/consumer pair.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}
