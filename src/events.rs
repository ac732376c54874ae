//! Change notifications for presentation layers
//!
//! The engine publishes an event after every document it rewrites; review
//! queues and inline grading controls subscribe and re-derive their view.
//! Backed by `tokio::sync::broadcast`, so publishing never blocks and works
//! without a running runtime.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::storage::DocumentRef;

/// Default channel capacity
pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    CardUpdated,
    /// Reserved, not published by the engine
    CardCreated,
    /// Reserved, not published by the engine
    CardDeleted,
    SettingsUpdated,
}

impl EventKind {
    /// Stable wire name
    pub fn name(&self) -> &'static str {
        match self {
            Self::CardUpdated => "memmaster:card-updated",
            Self::CardCreated => "memmaster:card-created",
            Self::CardDeleted => "memmaster:card-deleted",
            Self::SettingsUpdated => "memmaster:settings-updated",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEvent {
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentRef>,
    pub timestamp: DateTime<Utc>,
}

impl CardEvent {
    pub fn new(kind: EventKind, document: Option<DocumentRef>) -> Self {
        Self {
            kind,
            document,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for CardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.document {
            Some(doc) => write!(f, "[{}] {} {}", self.timestamp.format("%H:%M:%S"), self.kind.name(), doc),
            None => write!(f, "[{}] {}", self.timestamp.format("%H:%M:%S"), self.kind.name()),
        }
    }
}

/// Fire-and-forget fan-out of [`CardEvent`]s
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CardEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish to all current subscribers.
    ///
    /// Returns the number of subscribers reached; 0 when nobody listens.
    pub fn publish(&self, event: CardEvent) -> usize {
        log::debug!("Publishing {}", event);
        self.tx.send(event).unwrap_or(0)
    }

    pub fn emit(&self, kind: EventKind, document: Option<&DocumentRef>) -> usize {
        self.publish(CardEvent::new(kind, document.cloned()))
    }

    /// Receive all events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<CardEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::default();
        assert_eq!(bus.emit(EventKind::CardUpdated, None), 0);
    }

    #[test]
    fn test_fan_out() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let doc = DocumentRef::new("a.md");
        assert_eq!(bus.emit(EventKind::CardUpdated, Some(&doc)), 2);

        let event = first.try_recv().unwrap();
        assert_eq!(event.kind, EventKind::CardUpdated);
        assert_eq!(event.document, Some(doc));
        assert_eq!(second.try_recv().unwrap().kind, EventKind::CardUpdated);
        assert!(first.try_recv().is_err());
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(EventKind::CardUpdated.name(), "memmaster:card-updated");
        assert_eq!(EventKind::SettingsUpdated.name(), "memmaster:settings-updated");
    }
}
