//! Application state
//!
//! Plain data owned by the store. All transitions go through
//! [`reduce`](super::reduce).

use std::collections::{BTreeSet, HashMap};

use crate::config::Limits;
use crate::types::{Post, Trend, User};

/// Root application state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Signed-in user, if any
    pub me: Option<User>,

    /// User directory keyed by id
    pub users: HashMap<String, User>,

    /// All posts, newest first
    pub posts: Vec<Post>,

    /// Follower id -> followed ids
    pub follows: HashMap<String, BTreeSet<String>>,

    /// Derived from `posts` on every post creation
    pub trends: Vec<Trend>,

    /// Ids of the most recent announcements, newest first
    pub pinned: Vec<String>,

    pub limits: Limits,
}

impl AppState {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            ..Default::default()
        }
    }

    pub fn me_id(&self) -> Option<&str> {
        self.me.as_ref().map(|u| u.id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.me.is_some()
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Ids followed by `user_id` (empty when they follow nobody)
    pub fn following(&self, user_id: &str) -> BTreeSet<String> {
        self.follows.get(user_id).cloned().unwrap_or_default()
    }

    /// Does the current user follow `target`?
    pub fn is_following(&self, target: &str) -> bool {
        self.me_id()
            .and_then(|me| self.follows.get(me))
            .is_some_and(|set| set.contains(target))
    }

    /// Ids of users following `user_id`
    pub fn followers(&self, user_id: &str) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .follows
            .iter()
            .filter(|(_, set)| set.contains(user_id))
            .map(|(follower, _)| follower.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Pinned announcements resolved against the current post list
    pub fn pinned_announcements(&self) -> Vec<&Post> {
        self.pinned.iter().filter_map(|id| self.post(id)).collect()
    }
}
