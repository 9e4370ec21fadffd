//! Post-commit order notifications.
//!
//! Checkout emits an [`OrderPlaced`] event only after its transaction has
//! committed; a background worker consumes the channel and hands the event to
//! the delivery collaborator (here: a structured log line standing in for the
//! mail gateway). A send failure is logged and never affects the committed
//! order.

use orderflow_core::{OrderId, UserId};
use serde::Serialize;
use tokio::sync::mpsc;

/// Event emitted after a basket has been committed into a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderPlaced {
    /// The buyer who placed the order.
    pub buyer_id: UserId,
    /// The placed order.
    pub order_id: OrderId,
}

/// Fire-and-forget sender for order events.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<OrderPlaced>,
}

impl Notifier {
    /// Create a notifier plus the receiving end of its channel.
    ///
    /// Used directly by tests that want to observe emitted events; servers
    /// use [`Notifier::spawn`].
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OrderPlaced>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Create a notifier with a background worker draining the channel.
    #[must_use]
    pub fn spawn() -> Self {
        let (notifier, mut rx) = Self::channel();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                // Delivery itself (email) belongs to the notification
                // collaborator; dispatch is recorded here.
                tracing::info!(
                    buyer_id = %event.buyer_id,
                    order_id = %event.order_id,
                    "order placed, dispatching buyer notification"
                );
            }
        });
        notifier
    }

    /// Emit an [`OrderPlaced`] event. Never fails the caller.
    pub fn order_placed(&self, buyer_id: UserId, order_id: OrderId) {
        let event = OrderPlaced { buyer_id, order_id };
        if self.tx.send(event).is_err() {
            tracing::error!(
                buyer_id = %buyer_id,
                order_id = %order_id,
                "notification channel closed, order event dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (notifier, mut rx) = Notifier::channel();
        notifier.order_placed(UserId::new(1), OrderId::new(10));
        notifier.order_placed(UserId::new(2), OrderId::new(11));

        assert_eq!(
            rx.recv().await,
            Some(OrderPlaced {
                buyer_id: UserId::new(1),
                order_id: OrderId::new(10)
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(OrderPlaced {
                buyer_id: UserId::new(2),
                order_id: OrderId::new(11)
            })
        );
    }

    #[test]
    fn test_send_after_receiver_dropped_does_not_panic() {
        let (notifier, rx) = Notifier::channel();
        drop(rx);
        notifier.order_placed(UserId::new(1), OrderId::new(10));
    }
}
