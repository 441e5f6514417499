//! The application store
//!
//! [`AppStore`] owns the [`AppState`] and the storage backend. Every
//! command follows the same three steps:
//!
//! 1. validate inputs and stamp ids/timestamps
//! 2. dispatch an [`Action`] through the pure reducer
//! 3. apply the resulting [`PersistEffect`] and emit an [`Event`]
//!
//! The store is passed explicitly to whoever needs it; there is no global
//! instance. Commands take `&mut self`, so two commands never interleave.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use libcampus::{AppStore, MemoryStorage, NewPost, InteractionField};
//! use libcampus::config::Limits;
//!
//! # async fn example() -> libcampus::Result<()> {
//! let mut store = AppStore::new(Arc::new(MemoryStorage::new()), Limits::default());
//! store.login_with_student("2023001", "secret").await?;
//!
//! let post = store.create_post(NewPost::post("Library is open late tonight")).await?;
//! store.toggle(&post.id, InteractionField::Likes).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::app::effects::AUTH_KEY;
use crate::app::{persist_effect, reduce, Action, AppState, PersistEffect};
use crate::config::{Config, Limits};
use crate::error::{CampusError, Result, StorageError};
use crate::service::events::{Event, EventBus, EventReceiver};
use crate::service::feed::FeedService;
use crate::service::validation::ValidationService;
use crate::storage::{load_json, save_json, FileStorage, Storage};
use crate::types::{
    email_user_id, generate_post_id, student_user_id, InteractionField, NewPost, Post,
    ProfilePatch, User,
};

pub struct AppStore {
    state: AppState,
    storage: Arc<dyn Storage>,
    events: EventBus,
    validation: ValidationService,
}

impl AppStore {
    /// Create an empty store over `storage`
    ///
    /// Call [`bootstrap`](Self::bootstrap) to restore a persisted session.
    pub fn new(storage: Arc<dyn Storage>, limits: Limits) -> Self {
        Self {
            state: AppState::new(limits),
            storage,
            events: EventBus::default(),
            validation: ValidationService::new(limits),
        }
    }

    /// Open a file-backed store from configuration and restore the session
    pub async fn open(config: &Config) -> Result<Self> {
        let storage = FileStorage::new(config.storage_dir());
        debug!(dir = %storage.dir().display(), "Opening file storage");

        let mut store = Self::new(Arc::new(storage), config.limits);
        store.bootstrap().await?;
        Ok(store)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn me(&self) -> Option<&User> {
        self.state.me.as_ref()
    }

    /// Read-only queries over the current state
    pub fn feed(&self) -> FeedService<'_> {
        FeedService::new(&self.state)
    }

    pub fn validation(&self) -> &ValidationService {
        &self.validation
    }

    /// Subscribe to events emitted after each command
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Restore the persisted identity, if any
    ///
    /// A record that no longer parses is ignored so a bad file never blocks
    /// startup.
    pub async fn bootstrap(&mut self) -> Result<Option<User>> {
        let user: Option<User> = match load_json(&*self.storage, AUTH_KEY).await {
            Ok(user) => user,
            Err(StorageError::Serialization(e)) => {
                warn!(error = %e, "Ignoring unreadable persisted session");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let Some(user) = user else {
            debug!("No persisted session");
            return Ok(None);
        };

        info!(user_id = %user.id, "Restored session");
        self.commit(Action::SessionRestored(user.clone())).await?;
        self.events.emit(Event::SessionRestored {
            user_id: user.id.clone(),
        });
        Ok(Some(user))
    }

    /// Sign in with a student id and password
    ///
    /// Any non-empty password is accepted; there is no backend to check it
    /// against. Both fields are trimmed first, so a whitespace-only value
    /// counts as missing and `" 42 "` signs in as `u_42`.
    pub async fn login_with_student(&mut self, student_id: &str, password: &str) -> Result<User> {
        let student_id = student_id.trim();
        if student_id.is_empty() || password.trim().is_empty() {
            return Err(CampusError::Validation(
                "Student id and password are required".to_string(),
            ));
        }

        let id = student_user_id(student_id);
        let user = self
            .existing_user(&id)
            .unwrap_or_else(|| User::from_student_id(student_id, now_millis()));
        self.sign_in(user).await
    }

    /// Sign in with an email address and verification code
    ///
    /// Both fields are trimmed first; a whitespace-only value counts as
    /// missing.
    pub async fn login_with_email(&mut self, email: &str, code: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() || code.trim().is_empty() {
            return Err(CampusError::Validation(
                "Email and verification code are required".to_string(),
            ));
        }

        let id = email_user_id(email);
        let user = self
            .existing_user(&id)
            .unwrap_or_else(|| User::from_email(email, now_millis()));
        self.sign_in(user).await
    }

    fn existing_user(&self, id: &str) -> Option<User> {
        self.state.user(id).cloned()
    }

    async fn sign_in(&mut self, user: User) -> Result<User> {
        let new_user = self.state.user(&user.id).is_none();
        info!(user_id = %user.id, new_user, "Signed in");

        self.commit(Action::SignedIn(user.clone())).await?;
        self.events.emit(Event::SignedIn {
            user_id: user.id.clone(),
            new_user,
        });
        Ok(user)
    }

    /// Sign out and forget the persisted identity
    pub async fn logout(&mut self) -> Result<()> {
        if let Some(me) = self.state.me_id() {
            info!(user_id = %me, "Signed out");
        }
        self.commit(Action::SignedOut).await?;
        self.events.emit(Event::SignedOut);
        Ok(())
    }

    /// Merge `patch` into the current user
    ///
    /// Returns the updated user, or `None` when nobody is signed in.
    pub async fn update_profile(&mut self, patch: ProfilePatch) -> Result<Option<User>> {
        if !self.state.is_authenticated() {
            debug!("Profile update ignored: not signed in");
            return Ok(None);
        }

        self.commit(Action::ProfileUpdated(patch)).await?;

        let me = self.state.me.clone();
        if let Some(user) = &me {
            self.events.emit(Event::ProfileUpdated {
                user_id: user.id.clone(),
            });
        }
        Ok(me)
    }

    /// Publish a post as the current user
    ///
    /// Text is trimmed but may end up empty; forms should check
    /// [`ValidationService::validate_post`] first.
    pub async fn create_post(&mut self, new_post: NewPost) -> Result<Post> {
        let author_id = self
            .state
            .me_id()
            .ok_or(CampusError::NotAuthenticated)?
            .to_string();

        let text = new_post.text.trim().to_string();
        let limit = self.state.limits.max_post_chars;
        let char_count = text.chars().count();
        if char_count > limit {
            return Err(CampusError::Validation(format!(
                "Post is {} characters; the limit is {}",
                char_count, limit
            )));
        }

        let created_at = now_millis();
        let mut id = generate_post_id(created_at);
        while self.state.post(&id).is_some() {
            id = generate_post_id(created_at);
        }

        let post = Post {
            id,
            author_id,
            text,
            created_at,
            kind: new_post.kind,
            likes: Default::default(),
            bookmarks: Default::default(),
            reposts: Default::default(),
            reply_to: new_post.reply_to,
        };

        debug!(post_id = %post.id, kind = %post.kind, "Creating post");
        self.commit(Action::PostCreated(post.clone())).await?;

        self.events.emit(Event::PostCreated {
            post_id: post.id.clone(),
            author_id: post.author_id.clone(),
            kind: post.kind,
        });
        self.events.emit(Event::TrendsUpdated {
            trends: self.state.trends.clone(),
        });
        Ok(post)
    }

    /// Flip the current user's membership in one interaction set of a post
    ///
    /// Returns the membership after the flip, or `None` when nobody is
    /// signed in or the post does not exist.
    pub async fn toggle(&mut self, post_id: &str, field: InteractionField) -> Result<Option<bool>> {
        let Some(me) = self.state.me_id().map(str::to_string) else {
            debug!(post_id, %field, "Toggle ignored: not signed in");
            return Ok(None);
        };
        if self.state.post(post_id).is_none() {
            debug!(post_id, %field, "Toggle ignored: unknown post");
            return Ok(None);
        }

        self.commit(Action::InteractionToggled {
            post_id: post_id.to_string(),
            field,
        })
        .await?;

        let Some(set) = self.state.post(post_id).map(|p| p.interactions(field)) else {
            return Ok(None);
        };
        let active = set.contains(&me);
        self.events.emit(Event::InteractionToggled {
            post_id: post_id.to_string(),
            field,
            active,
            count: set.len(),
        });
        Ok(Some(active))
    }

    /// Follow or unfollow `user_id`
    ///
    /// Returns whether the current user follows `user_id` afterwards, or
    /// `None` when nobody is signed in.
    pub async fn follow(&mut self, user_id: &str) -> Result<Option<bool>> {
        if !self.state.is_authenticated() {
            debug!(target_id = user_id, "Follow ignored: not signed in");
            return Ok(None);
        }

        self.commit(Action::FollowToggled(user_id.to_string())).await?;

        let following = self.state.is_following(user_id);
        self.events.emit(Event::FollowToggled {
            target_id: user_id.to_string(),
            following,
        });
        Ok(Some(following))
    }

    /// Reduce `action` into the state, then sync storage
    async fn commit(&mut self, action: Action) -> Result<()> {
        debug!(action = action.name(), "Dispatching");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action.clone());

        let effect = persist_effect(&action, &self.state);
        self.sync(effect).await
    }

    async fn sync(&self, effect: PersistEffect) -> Result<()> {
        match effect {
            PersistEffect::SaveAuth(user) => {
                save_json(&*self.storage, AUTH_KEY, &user).await?;
            }
            PersistEffect::ClearAuth => {
                self.storage.remove_item(AUTH_KEY).await?;
            }
            PersistEffect::None => {}
        }
        Ok(())
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
