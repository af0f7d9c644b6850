//! # Event Bus System
//!
//! Broadcasts typed events between the catalog core and the view layer using
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **Event Types**: `QueryEvent` for the list-view query lifecycle and
//!   `CatalogEvent` for mutations made through the REST client
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! ```text
//! ┌─────────────────┐  emit   ┌──────────┐  subscribe  ┌────────────┐
//! │ QueryController ├────────>│          ├────────────>│ List view  │
//! └─────────────────┘         │ EventBus │             └────────────┘
//! ┌─────────────────┐  emit   │          │  subscribe  ┌────────────┐
//! │ CatalogClient   ├────────>│          ├────────────>│ Detail/UI  │
//! └─────────────────┘         └──────────┘             └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CatalogEvent, CoreEvent, EventBus};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Catalog(CatalogEvent::ItemDeleted { item_id: 7 }))
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event.description(), "Media item deleted");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: Subscriber was too slow and missed `n` events.
//!   Non-fatal; a list view should simply re-read `current_results()`.
//! - **`RecvError::Closed`**: All senders have been dropped (shutdown).
//!
//! Emitting with no subscribers returns an error; publishers ignore it.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

pub use crate::config::DEFAULT_EVENT_BUFFER_SIZE;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum published through the event bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// List-view query lifecycle events
    Query(QueryEvent),
    /// Catalog mutation events
    Catalog(CatalogEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Query(e) => e.description(),
            CoreEvent::Catalog(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Query(QueryEvent::FetchFailed { .. }) => EventSeverity::Error,
            CoreEvent::Query(QueryEvent::StaleResponseDiscarded { .. }) => EventSeverity::Debug,
            CoreEvent::Query(QueryEvent::FetchStarted { .. }) => EventSeverity::Debug,
            CoreEvent::Query(QueryEvent::ResultsReady { .. }) => EventSeverity::Info,
            CoreEvent::Catalog(_) => EventSeverity::Info,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Query Events
// ============================================================================

/// Lifecycle of list-view fetches, tagged with the request epoch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum QueryEvent {
    /// A fetch was issued for the given epoch.
    FetchStarted {
        epoch: u64,
        /// Encoded query string sent to the API
        query: String,
    },
    /// The response for the current epoch was applied.
    ResultsReady {
        epoch: u64,
        total_count: u64,
        total_pages: u32,
        page: u32,
    },
    /// The fetch for the current epoch failed.
    FetchFailed { epoch: u64, message: String },
    /// A response arrived for a superseded epoch and was dropped.
    StaleResponseDiscarded { epoch: u64, current_epoch: u64 },
}

impl QueryEvent {
    pub fn description(&self) -> &str {
        match self {
            QueryEvent::FetchStarted { .. } => "Media list fetch started",
            QueryEvent::ResultsReady { .. } => "Media list results ready",
            QueryEvent::FetchFailed { .. } => "Media list fetch failed",
            QueryEvent::StaleResponseDiscarded { .. } => "Stale media list response discarded",
        }
    }

    /// Epoch the event refers to.
    pub fn epoch(&self) -> u64 {
        match self {
            QueryEvent::FetchStarted { epoch, .. }
            | QueryEvent::ResultsReady { epoch, .. }
            | QueryEvent::FetchFailed { epoch, .. }
            | QueryEvent::StaleResponseDiscarded { epoch, .. } => *epoch,
        }
    }
}

// ============================================================================
// Catalog Events
// ============================================================================

/// Mutations performed against the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CatalogEvent {
    ItemCreated { item_id: u64, title: String },
    ItemUpdated { item_id: u64 },
    ItemDeleted { item_id: u64 },
    ListCreated { list_id: u64, name: String },
    ListUpdated { list_id: u64 },
    ListDeleted { list_id: u64 },
    ItemAddedToList { list_id: u64, item_id: u64 },
    ItemRemovedFromList { list_id: u64, item_id: u64 },
}

impl CatalogEvent {
    pub fn description(&self) -> &str {
        match self {
            CatalogEvent::ItemCreated { .. } => "Media item created",
            CatalogEvent::ItemUpdated { .. } => "Media item updated",
            CatalogEvent::ItemDeleted { .. } => "Media item deleted",
            CatalogEvent::ListCreated { .. } => "Custom list created",
            CatalogEvent::ListUpdated { .. } => "Custom list updated",
            CatalogEvent::ListDeleted { .. } => "Custom list deleted",
            CatalogEvent::ItemAddedToList { .. } => "Media item added to custom list",
            CatalogEvent::ItemRemovedFromList { .. } => "Media item removed from custom list",
        }
    }

    /// Whether the event may change what the media list shows.
    pub fn affects_media_list(&self) -> bool {
        matches!(
            self,
            CatalogEvent::ItemCreated { .. }
                | CatalogEvent::ItemUpdated { .. }
                | CatalogEvent::ItemDeleted { .. }
        )
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel.
///
/// Cloning the bus is cheap; all clones publish to the same subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// Subscribers falling behind by more than `capacity` events receive
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are no active subscribers.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    ///
    /// ```rust
    /// use core_runtime::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.subscriber_count(), 0);
    ///
    /// let _subscriber = event_bus.subscribe();
    /// assert_eq!(event_bus.subscriber_count(), 1);
    /// ```
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let event_bus = EventBus::new(100);
/// let query_events = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Query(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`/`try_recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(epoch: u64) -> CoreEvent {
        CoreEvent::Query(QueryEvent::ResultsReady {
            epoch,
            total_count: 23,
            total_pages: 1,
            page: 1,
        })
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);
        let _sub1 = bus.subscribe();
        let _sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(ready(1)).is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = CoreEvent::Catalog(CatalogEvent::ItemCreated {
            item_id: 3,
            title: "Frieren".to_string(),
        });
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream =
            EventStream::new(bus.subscribe()).filter(|event| matches!(event, CoreEvent::Query(_)));

        bus.emit(CoreEvent::Catalog(CatalogEvent::ListDeleted { list_id: 2 }))
            .ok();
        bus.emit(ready(5)).ok();

        assert_eq!(stream.recv().await.unwrap(), ready(5));
        assert!(stream.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for epoch in 0..5 {
            bus.emit(ready(epoch)).ok();
        }

        assert!(matches!(sub.recv().await, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        let failed = CoreEvent::Query(QueryEvent::FetchFailed {
            epoch: 2,
            message: "Network error: Unable to reach the server.".to_string(),
        });
        assert_eq!(failed.severity(), EventSeverity::Error);
        assert_eq!(ready(1).severity(), EventSeverity::Info);

        let stale = CoreEvent::Query(QueryEvent::StaleResponseDiscarded {
            epoch: 1,
            current_epoch: 2,
        });
        assert_eq!(stale.severity(), EventSeverity::Debug);
        assert_eq!(stale.description(), "Stale media list response discarded");
    }

    #[test]
    fn test_query_event_epoch() {
        let started = QueryEvent::FetchStarted {
            epoch: 9,
            query: "?page=1&page_size=24".to_string(),
        };
        assert_eq!(started.epoch(), 9);
    }

    #[test]
    fn test_catalog_event_affects_media_list() {
        assert!(CatalogEvent::ItemDeleted { item_id: 1 }.affects_media_list());
        assert!(!CatalogEvent::ListCreated {
            list_id: 1,
            name: "Favourites".to_string()
        }
        .affects_media_list());
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Catalog(CatalogEvent::ItemAddedToList {
            list_id: 4,
            item_id: 12,
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"Catalog\""));
        assert!(json.contains("\"event\":\"ItemAddedToList\""));

        let deserialized: CoreEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, event);
    }
}
