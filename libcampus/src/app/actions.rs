//! Actions for the reducer
//!
//! Actions carry fully-formed data: ids, timestamps and resolved user
//! records are produced by the store before dispatch so the reducer stays
//! deterministic.

use crate::types::{InteractionField, Post, ProfilePatch, User};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A login succeeded; the user is either new or the existing directory entry
    SignedIn(User),

    /// The current user signed out
    SignedOut,

    /// Profile fields changed for the current user
    ProfileUpdated(ProfilePatch),

    /// A post was composed by the current user
    PostCreated(Post),

    /// The current user flipped membership in one interaction set
    InteractionToggled {
        post_id: String,
        field: InteractionField,
    },

    /// The current user followed or unfollowed someone
    FollowToggled(String),

    /// The persisted identity was read back at startup
    SessionRestored(User),
}

impl Action {
    /// Short name used in log records
    pub fn name(&self) -> &'static str {
        match self {
            Action::SignedIn(_) => "signed_in",
            Action::SignedOut => "signed_out",
            Action::ProfileUpdated(_) => "profile_updated",
            Action::PostCreated(_) => "post_created",
            Action::InteractionToggled { .. } => "interaction_toggled",
            Action::FollowToggled(_) => "follow_toggled",
            Action::SessionRestored(_) => "session_restored",
        }
    }
}
