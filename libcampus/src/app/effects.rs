//! Persistence effects derived from state transitions
//!
//! Only the authenticated identity is persisted. Posts, follows and trends
//! live in memory for the lifetime of the store.

use super::actions::Action;
use super::state::AppState;
use crate::types::User;

/// Storage key holding the serialized current user
pub const AUTH_KEY: &str = "auth";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistEffect {
    /// Write the user record under [`AUTH_KEY`]
    SaveAuth(User),
    /// Remove [`AUTH_KEY`]
    ClearAuth,
    None,
}

/// Decide what must be written after `action` produced `state`
pub fn persist_effect(action: &Action, state: &AppState) -> PersistEffect {
    match action {
        Action::SignedIn(_) | Action::ProfileUpdated(_) => match &state.me {
            Some(me) => PersistEffect::SaveAuth(me.clone()),
            None => PersistEffect::None,
        },
        Action::SignedOut => PersistEffect::ClearAuth,
        // Restoring reads what is already stored
        Action::SessionRestored(_)
        | Action::PostCreated(_)
        | Action::InteractionToggled { .. }
        | Action::FollowToggled(_) => PersistEffect::None,
    }
}
