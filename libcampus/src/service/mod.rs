//! Services layered around the store
//!
//! - `feed`: timelines, profile tabs, search and post cards
//! - `validation`: form checks run before store commands
//! - `events`: change notifications emitted by the store
//!
//! The store hands these out through [`AppStore::feed`](crate::AppStore::feed),
//! [`AppStore::validation`](crate::AppStore::validation) and
//! [`AppStore::subscribe`](crate::AppStore::subscribe).

pub mod events;
pub mod feed;
pub mod validation;

pub use events::{Event, EventBus, EventReceiver};
pub use feed::{FeedQuery, FeedService, PostView, ProfileTab, ProfileView, SearchResults, Timeline};
pub use validation::{ValidationResponse, ValidationService};
