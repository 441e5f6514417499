//! Campus - local-first state core for a campus social client
//!
//! The crate holds everything the screens of the client need besides
//! rendering: accounts, posts, interactions, follows, trends and the
//! queries that turn them into timelines, profiles and search results.
//! Only the signed-in identity is persisted.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod service;
pub mod storage;
pub mod store;
pub mod trends;
pub mod types;

// Re-export commonly used types
pub use app::{Action, AppState};
pub use config::Config;
pub use error::{CampusError, Result};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::AppStore;
pub use types::{InteractionField, NewPost, Post, PostKind, ProfilePatch, Trend, User};
