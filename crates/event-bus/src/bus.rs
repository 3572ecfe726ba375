//! Broadcast delivery

use crate::TrackerEvent;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{trace, warn};

/// Events buffered per subscriber before the slowest one starts lagging
pub const DEFAULT_CAPACITY: usize = 256;

/// Multi-consumer event bus.
///
/// Each subscriber sees every event published after it subscribed. A
/// subscriber that falls more than `capacity` events behind skips the
/// oldest ones.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<TrackerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Publish to all current subscribers; returns how many received it
    pub fn publish(&self, event: TrackerEvent) -> usize {
        match self.sender.send(event) {
            Ok(count) => count,
            Err(broadcast::error::SendError(event)) => {
                trace!("No subscribers for {} event", event.name());
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// One subscriber's view of the bus
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<TrackerEvent>,
}

impl Subscription {
    /// Next event, or None once every bus handle is dropped
    pub async fn recv(&mut self) -> Option<TrackerEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next already-published event without waiting
    pub fn try_recv(&mut self) -> Option<TrackerEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Event subscriber lagged, skipped {} events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drain everything currently queued
    pub fn drain(&mut self) -> Vec<TrackerEvent> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(4);
        assert_eq!(bus.publish(TrackerEvent::TrackingStarted), 0);
    }

    #[test]
    fn test_subscribers_are_independent() {
        let bus = EventBus::new(8);
        let mut overlay = bus.subscribe();
        let mut relay = bus.subscribe();

        assert_eq!(bus.publish(TrackerEvent::TrackingStarted), 2);
        assert_eq!(overlay.try_recv(), Some(TrackerEvent::TrackingStarted));

        bus.publish(TrackerEvent::TrackingStopped);
        assert_eq!(overlay.drain(), vec![TrackerEvent::TrackingStopped]);
        assert_eq!(
            relay.drain(),
            vec![TrackerEvent::TrackingStarted, TrackerEvent::TrackingStopped]
        );
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new(8);
        let _early = bus.subscribe();
        bus.publish(TrackerEvent::TrackingStarted);

        let mut late = bus.subscribe();
        assert_eq!(late.try_recv(), None);
    }

    #[test]
    fn test_lagging_subscriber_keeps_newest() {
        let bus = EventBus::new(2);
        let mut slow = bus.subscribe();
        bus.publish(TrackerEvent::TrackingStarted);
        bus.publish(TrackerEvent::CalibrationStarted);
        bus.publish(TrackerEvent::TrackingStopped);

        assert_eq!(
            slow.drain(),
            vec![TrackerEvent::CalibrationStarted, TrackerEvent::TrackingStopped]
        );
    }

    #[tokio::test]
    async fn test_recv_ends_when_bus_dropped() {
        let bus = EventBus::new(4);
        let mut sub = bus.subscribe();
        bus.publish(TrackerEvent::TrackingStarted);
        drop(bus);

        assert_eq!(sub.recv().await, Some(TrackerEvent::TrackingStarted));
        assert_eq!(sub.recv().await, None);
    }
}
