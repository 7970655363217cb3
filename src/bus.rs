//! Change-notification fan-out.
//!
//! An explicit publish/subscribe registry: each subscriber connection is a
//! resource with its own lifecycle, independent of the watcher's timeline.
//! Delivery is fire-and-forget with no persistence and no replay for
//! subscribers that connect later.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::types::ChangeNotification;

/// Capacity of each subscriber's delivery channel.
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 16;

/// Identifier for a connected subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

/// A subscriber connection: the id plus the delivery channel.
///
/// Dropping the receiver ends the subscription; the registry entry is
/// pruned on the next publish.
#[derive(Debug)]
pub struct Subscriber {
    /// Identifier to pass to [`NotificationBus::unsubscribe`].
    pub id: SubscriberId,
    /// Delivery channel for change events.
    pub receiver: mpsc::Receiver<ChangeNotification>,
}

/// Pure fan-out of change events to currently connected subscribers.
///
/// Delivery is non-blocking per subscriber: a full channel loses the event
/// with a warning, so a slow consumer never stalls the publisher. Cheap to
/// clone; clones share one registry.
#[derive(Debug, Clone, Default)]
pub struct NotificationBus {
    inner: Arc<BusInner>,
}

#[derive(Debug, Default)]
struct BusInner {
    next_id: AtomicU64,
    subscribers: RwLock<BTreeMap<SubscriberId, mpsc::Sender<ChangeNotification>>>,
}

impl NotificationBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a delivery target.
    pub fn subscribe(&self) -> Subscriber {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.subscribers.write().insert(id, tx);
        Subscriber { id, receiver: rx }
    }

    /// Deregister a delivery target. Idempotent.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.inner.subscribers.write().remove(&id);
    }

    /// Number of currently connected subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// Deliver an event to every connected subscriber.
    ///
    /// Returns the number of successful deliveries. Subscribers whose
    /// receiver is gone are pruned from the registry.
    pub fn publish(&self, notification: &ChangeNotification) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        {
            let subscribers = self.inner.subscribers.read();
            for (id, tx) in subscribers.iter() {
                match tx.try_send(notification.clone()) {
                    Ok(()) => delivered += 1,
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::warn!(
                            subscriber = id.0,
                            "subscriber channel full, dropping change event"
                        );
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => closed.push(*id),
                }
            }
        }

        if !closed.is_empty() {
            let mut subscribers = self.inner.subscribers.write();
            for id in closed {
                subscribers.remove(&id);
            }
        }

        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectId;

    fn event(changed: &str) -> ChangeNotification {
        ChangeNotification::new(vec![ProjectId::new(changed)], vec![], vec![])
    }

    #[tokio::test]
    async fn test_fan_out_to_all_subscribers() {
        let bus = NotificationBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.publish(&event("app")), 2);

        assert_eq!(a.receiver.recv().await.unwrap(), event("app"));
        assert_eq!(b.receiver.recv().await.unwrap(), event("app"));
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let bus = NotificationBus::new();
        let a = bus.subscribe();
        let _b = bus.subscribe();

        bus.unsubscribe(a.id);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(bus.publish(&event("app")), 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_loses_events_without_blocking() {
        let bus = NotificationBus::new();
        let mut a = bus.subscribe();

        for _ in 0..SUBSCRIBER_CHANNEL_CAPACITY {
            assert_eq!(bus.publish(&event("fill")), 1);
        }
        // Channel full: the event is dropped, publish does not block
        assert_eq!(bus.publish(&event("overflow")), 0);

        // The buffered events are intact
        assert_eq!(a.receiver.recv().await.unwrap(), event("fill"));
    }

    #[tokio::test]
    async fn test_dropped_receiver_pruned_on_publish() {
        let bus = NotificationBus::new();
        let a = bus.subscribe();
        drop(a.receiver);

        assert_eq!(bus.publish(&event("app")), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_no_replay_for_late_subscribers() {
        let bus = NotificationBus::new();
        bus.publish(&event("early"));

        let mut late = bus.subscribe();
        bus.publish(&event("late"));
        assert_eq!(late.receiver.recv().await.unwrap(), event("late"));
        assert!(late.receiver.try_recv().is_err());
    }
}
