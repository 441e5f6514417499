//! Core types for Campus

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A registered account
///
/// Field names serialize in camelCase; this is the shape stored under the
/// `auth` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub handle: String,
    pub display_name: String,
    /// Avatar URI, empty when unset
    #[serde(default)]
    pub avatar: String,
    /// Banner URI, empty when unset
    #[serde(default)]
    pub banner: String,
    /// Milliseconds since the Unix epoch
    pub registered_at: i64,
}

impl User {
    /// Account derived from a student id credential
    pub fn from_student_id(student_id: &str, registered_at: i64) -> Self {
        Self {
            id: student_user_id(student_id),
            handle: format!("s{}", student_id),
            display_name: format!("学号{}", student_id),
            avatar: String::new(),
            banner: String::new(),
            registered_at,
        }
    }

    /// Account derived from an email credential
    pub fn from_email(email: &str, registered_at: i64) -> Self {
        let local_part = email.split('@').next().unwrap_or(email).to_string();
        Self {
            id: email_user_id(email),
            handle: local_part.clone(),
            display_name: local_part,
            avatar: String::new(),
            banner: String::new(),
            registered_at,
        }
    }
}

/// Deterministic user id for a student id login
pub fn student_user_id(student_id: &str) -> String {
    format!("u_{}", student_id)
}

/// Deterministic user id for an email login (case-insensitive)
pub fn email_user_id(email: &str) -> String {
    format!("e_{}", email.to_lowercase())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[default]
    Post,
    Announcement,
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostKind::Post => write!(f, "post"),
            PostKind::Announcement => write!(f, "announcement"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub text: String,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    #[serde(rename = "type")]
    pub kind: PostKind,
    pub likes: BTreeSet<String>,
    pub bookmarks: BTreeSet<String>,
    pub reposts: BTreeSet<String>,
    pub reply_to: Option<String>,
}

impl Post {
    pub fn interactions(&self, field: InteractionField) -> &BTreeSet<String> {
        match field {
            InteractionField::Likes => &self.likes,
            InteractionField::Bookmarks => &self.bookmarks,
            InteractionField::Reposts => &self.reposts,
        }
    }

    pub fn interactions_mut(&mut self, field: InteractionField) -> &mut BTreeSet<String> {
        match field {
            InteractionField::Likes => &mut self.likes,
            InteractionField::Bookmarks => &mut self.bookmarks,
            InteractionField::Reposts => &mut self.reposts,
        }
    }

    pub fn is_announcement(&self) -> bool {
        self.kind == PostKind::Announcement
    }

    pub fn is_reply(&self) -> bool {
        self.reply_to.is_some()
    }
}

/// Generate a post id: `p_` + millisecond timestamp + 4 random base-36 chars
pub fn generate_post_id(now_millis: i64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..4)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("p_{}{}", now_millis, suffix)
}

/// One of the per-post interaction sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionField {
    Likes,
    Bookmarks,
    Reposts,
}

impl InteractionField {
    pub const ALL: [InteractionField; 3] = [
        InteractionField::Likes,
        InteractionField::Bookmarks,
        InteractionField::Reposts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionField::Likes => "likes",
            InteractionField::Bookmarks => "bookmarks",
            InteractionField::Reposts => "reposts",
        }
    }
}

impl fmt::Display for InteractionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "likes" | "like" => Ok(InteractionField::Likes),
            "bookmarks" | "bookmark" => Ok(InteractionField::Bookmarks),
            "reposts" | "repost" => Ok(InteractionField::Reposts),
            _ => Err(format!(
                "Invalid interaction: '{}'. Valid options: likes, bookmarks, reposts",
                s
            )),
        }
    }
}

/// Input for `AppStore::create_post`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPost {
    pub text: String,
    pub kind: PostKind,
    pub reply_to: Option<String>,
}

impl NewPost {
    pub fn post(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn announcement(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: PostKind::Announcement,
            reply_to: None,
        }
    }

    pub fn in_reply_to(mut self, post_id: impl Into<String>) -> Self {
        self.reply_to = Some(post_id.into());
        self
    }
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub handle: Option<String>,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
            && self.display_name.is_none()
            && self.avatar.is_none()
            && self.banner.is_none()
    }

    /// Merge this patch over `user`
    pub fn apply(&self, user: &User) -> User {
        let mut next = user.clone();
        if let Some(handle) = &self.handle {
            next.handle = handle.clone();
        }
        if let Some(display_name) = &self.display_name {
            next.display_name = display_name.clone();
        }
        if let Some(avatar) = &self.avatar {
            next.avatar = avatar.clone();
        }
        if let Some(banner) = &self.banner {
            next.banner = banner.clone();
        }
        next
    }
}

/// A frequently occurring token across recent posts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub tag: String,
    pub count: usize,
}
