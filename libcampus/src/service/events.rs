//! Store change notifications
//!
//! The store emits an [`Event`] after every state transition so front ends
//! can refresh the views they render. The bus is a
//! `tokio::sync::broadcast` channel: any number of subscribers, and events
//! are dropped when nobody is listening.
//!
//! # Example
//!
//! ```no_run
//! use libcampus::service::events::{EventBus, Event};
//!
//! # async fn example() {
//! let event_bus = EventBus::new(64);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(Event::SignedOut);
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{InteractionField, PostKind, Trend};

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Event bus for distributing store events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus buffering `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Never blocks. Lagging subscribers lose the oldest events first.
    pub fn emit(&self, event: Event) {
        // send() fails only when there are no receivers
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Events emitted by the store after a state transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SignedIn {
        user_id: String,
        /// False when an existing directory entry was reused
        new_user: bool,
    },

    SignedOut,

    ProfileUpdated { user_id: String },

    PostCreated {
        post_id: String,
        author_id: String,
        kind: PostKind,
    },

    InteractionToggled {
        post_id: String,
        field: InteractionField,
        /// Membership of the current user after the toggle
        active: bool,
        count: usize,
    },

    FollowToggled {
        target_id: String,
        following: bool,
    },

    TrendsUpdated { trends: Vec<Trend> },

    SessionRestored { user_id: String },
}
