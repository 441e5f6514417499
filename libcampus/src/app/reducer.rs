//! Pure reducer function for state transitions
//!
//! `(State, Action) -> State` with no I/O, no clock and no randomness.
//! Commands that need the current user are no-ops when nobody is signed
//! in; the store reports those cases before dispatching where required.

use super::actions::Action;
use super::state::AppState;
use crate::trends::compute_trends;
use crate::types::{InteractionField, Post, ProfilePatch, User};

pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        Action::SignedIn(user) | Action::SessionRestored(user) => sign_in(state, user),

        Action::SignedOut => AppState { me: None, ..state },

        Action::ProfileUpdated(patch) => update_profile(state, &patch),

        Action::PostCreated(post) => create_post(state, post),

        Action::InteractionToggled { post_id, field } => {
            toggle_interaction(state, &post_id, field)
        }

        Action::FollowToggled(target) => toggle_follow(state, target),
    }
}

fn sign_in(mut state: AppState, user: User) -> AppState {
    state.users.insert(user.id.clone(), user.clone());
    AppState {
        me: Some(user),
        ..state
    }
}

fn update_profile(mut state: AppState, patch: &ProfilePatch) -> AppState {
    let Some(me) = state.me.as_ref() else {
        return state;
    };
    let next = patch.apply(me);
    state.users.insert(next.id.clone(), next.clone());
    AppState {
        me: Some(next),
        ..state
    }
}

fn create_post(mut state: AppState, post: Post) -> AppState {
    if state.me.is_none() {
        return state;
    }

    if post.is_announcement() {
        state.pinned.insert(0, post.id.clone());
        state.pinned.truncate(state.limits.pinned_capacity);
    }
    state.posts.insert(0, post);

    let trends = compute_trends(
        &state.posts,
        state.limits.trend_window,
        state.limits.trend_count,
    );
    AppState { trends, ..state }
}

fn toggle_interaction(mut state: AppState, post_id: &str, field: InteractionField) -> AppState {
    let Some(me_id) = state.me_id().map(str::to_string) else {
        return state;
    };
    if let Some(post) = state.posts.iter_mut().find(|p| p.id == post_id) {
        let set = post.interactions_mut(field);
        if !set.remove(&me_id) {
            set.insert(me_id);
        }
    }
    state
}

fn toggle_follow(mut state: AppState, target: String) -> AppState {
    let Some(me_id) = state.me_id().map(str::to_string) else {
        return state;
    };
    let set = state.follows.entry(me_id).or_default();
    if !set.remove(&target) {
        set.insert(target);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::types::{PostKind, User};
    use std::collections::BTreeSet;

    fn signed_in() -> AppState {
        reduce(
            AppState::new(Limits::default()),
            Action::SignedIn(User::from_student_id("1", 0)),
        )
    }

    fn post(id: &str, text: &str, kind: PostKind) -> Post {
        Post {
            id: id.to_string(),
            author_id: "u_1".to_string(),
            text: text.to_string(),
            created_at: 0,
            kind,
            likes: BTreeSet::new(),
            bookmarks: BTreeSet::new(),
            reposts: BTreeSet::new(),
            reply_to: None,
        }
    }

    #[test]
    fn test_reducer_is_pure() {
        let state = signed_in();
        let before = state.clone();

        let next = reduce(state.clone(), Action::FollowToggled("u_2".to_string()));

        assert_eq!(state, before);
        assert!(next.is_following("u_2"));
        assert!(!before.is_following("u_2"));
    }

    #[test]
    fn test_sign_in_registers_user() {
        let state = signed_in();
        assert_eq!(state.me_id(), Some("u_1"));
        assert!(state.user("u_1").is_some());
    }

    #[test]
    fn test_sign_out_keeps_directory() {
        let state = reduce(signed_in(), Action::SignedOut);
        assert!(state.me.is_none());
        assert!(state.user("u_1").is_some());
    }

    #[test]
    fn test_profile_update_updates_me_and_directory() {
        let patch = ProfilePatch {
            display_name: Some("Grace".to_string()),
            ..Default::default()
        };
        let state = reduce(signed_in(), Action::ProfileUpdated(patch));
        assert_eq!(state.me.as_ref().unwrap().display_name, "Grace");
        assert_eq!(state.user("u_1").unwrap().display_name, "Grace");
    }

    #[test]
    fn test_profile_update_without_user_is_noop() {
        let state = AppState::default();
        let patch = ProfilePatch {
            handle: Some("ghost".to_string()),
            ..Default::default()
        };
        assert_eq!(reduce(state.clone(), Action::ProfileUpdated(patch)), state);
    }

    #[test]
    fn test_posts_are_prepended() {
        let mut state = signed_in();
        state = reduce(state, Action::PostCreated(post("p_a", "first", PostKind::Post)));
        state = reduce(state, Action::PostCreated(post("p_b", "second", PostKind::Post)));
        let ids: Vec<&str> = state.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p_b", "p_a"]);
        assert!(state.pinned.is_empty());
    }

    #[test]
    fn test_post_creation_recomputes_trends() {
        let mut state = signed_in();
        state = reduce(state, Action::PostCreated(post("p_a", "foo", PostKind::Post)));
        state = reduce(state, Action::PostCreated(post("p_b", "foo bar", PostKind::Post)));
        assert_eq!(state.trends[0].tag, "foo");
        assert_eq!(state.trends[0].count, 2);
        assert_eq!(state.trends[1].tag, "bar");
    }

    #[test]
    fn test_pinned_capacity() {
        let mut state = signed_in();
        for i in 0..12 {
            let id = format!("p_{}", i);
            state = reduce(state, Action::PostCreated(post(&id, "notice", PostKind::Announcement)));
        }
        assert_eq!(state.pinned.len(), 10);
        assert_eq!(state.pinned[0], "p_11");
        assert_eq!(state.pinned[9], "p_2");
    }

    #[test]
    fn test_toggle_unknown_post_is_noop() {
        let state = signed_in();
        let next = reduce(
            state.clone(),
            Action::InteractionToggled {
                post_id: "p_missing".to_string(),
                field: InteractionField::Likes,
            },
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_toggle_without_user_is_noop() {
        let mut state = signed_in();
        state = reduce(state, Action::PostCreated(post("p_a", "x", PostKind::Post)));
        state = reduce(state, Action::SignedOut);

        let next = reduce(
            state.clone(),
            Action::InteractionToggled {
                post_id: "p_a".to_string(),
                field: InteractionField::Reposts,
            },
        );
        assert!(next.posts[0].reposts.is_empty());
    }

    #[test]
    fn test_follow_toggle_round_trip() {
        let mut state = signed_in();
        state = reduce(state, Action::FollowToggled("u_2".to_string()));
        assert!(state.is_following("u_2"));
        assert_eq!(state.followers("u_2"), vec!["u_1"]);

        state = reduce(state, Action::FollowToggled("u_2".to_string()));
        assert!(!state.is_following("u_2"));
        assert!(state.followers("u_2").is_empty());
    }
}
