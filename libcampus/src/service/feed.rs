//! Read-side projections over the store state
//!
//! Timelines, profile tabs, search and post cards. Everything here is a
//! pure function of [`AppState`]; nothing mutates.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::app::AppState;
use crate::types::{Post, PostKind, Trend, User};

/// Base URL for generated initials avatars
const AVATAR_FALLBACK_BASE: &str = "https://api.dicebear.com/9.x/initials/png?seed=";

/// Label shown for authors missing from the directory
const UNKNOWN_AUTHOR_LABEL: &str = "user";

/// Home screen tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timeline {
    /// Every post, newest first
    #[default]
    Latest,
    /// Posts by accounts the current user follows
    Following,
    /// Announcements first, then everything else
    Clubs,
}

impl FromStr for Timeline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" => Ok(Timeline::Latest),
            "following" => Ok(Timeline::Following),
            "clubs" => Ok(Timeline::Clubs),
            _ => Err(format!(
                "Invalid timeline: '{}'. Valid options: latest, following, clubs",
                s
            )),
        }
    }
}

/// Profile screen tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileTab {
    #[default]
    Posts,
    Replies,
    Likes,
    Bookmarks,
}

impl FromStr for ProfileTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "posts" => Ok(ProfileTab::Posts),
            "replies" => Ok(ProfileTab::Replies),
            "likes" => Ok(ProfileTab::Likes),
            "bookmarks" => Ok(ProfileTab::Bookmarks),
            _ => Err(format!(
                "Invalid profile tab: '{}'. Valid options: posts, replies, likes, bookmarks",
                s
            )),
        }
    }
}

impl fmt::Display for ProfileTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileTab::Posts => "posts",
            ProfileTab::Replies => "replies",
            ProfileTab::Likes => "likes",
            ProfileTab::Bookmarks => "bookmarks",
        };
        f.write_str(name)
    }
}

/// Pagination for list queries
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl FeedQuery {
    pub fn limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    fn apply<'a>(&self, posts: impl Iterator<Item = &'a Post>) -> Vec<&'a Post> {
        posts
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// A post as a card renders it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub post: Post,
    pub author_label: String,
    pub author_handle: String,
    pub avatar_url: String,
    pub is_announcement: bool,
    pub like_count: usize,
    pub bookmark_count: usize,
    pub repost_count: usize,
    pub liked_by_me: bool,
    pub bookmarked_by_me: bool,
    pub reposted_by_me: bool,
}

/// A user profile with one tab of posts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub user: User,
    pub is_me: bool,
    /// Whether the current user follows this profile
    pub followed_by_me: bool,
    pub following_count: usize,
    pub follower_count: usize,
    pub posts: Vec<PostView>,
}

/// Search screen contents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub posts: Vec<PostView>,
    pub announcements: Vec<PostView>,
    pub trends: Vec<Trend>,
}

/// Display label for a user: display name, else handle, else a placeholder
pub fn author_label(user: Option<&User>) -> String {
    user.and_then(|u| {
        [&u.display_name, &u.handle]
            .into_iter()
            .find(|s| !s.is_empty())
            .cloned()
    })
    .unwrap_or_else(|| UNKNOWN_AUTHOR_LABEL.to_string())
}

/// Avatar URI, or a generated initials image when the user has none
pub fn avatar_url(user: Option<&User>) -> String {
    if let Some(avatar) = user.map(|u| &u.avatar).filter(|a| !a.is_empty()) {
        return avatar.clone();
    }
    let seed = user
        .and_then(|u| {
            [&u.display_name, &u.handle]
                .into_iter()
                .find(|s| !s.is_empty())
                .cloned()
        })
        .unwrap_or_else(|| "U".to_string());
    format!("{}{}", AVATAR_FALLBACK_BASE, urlencoding::encode(&seed))
}

/// Read-only queries over a borrowed state
pub struct FeedService<'a> {
    state: &'a AppState,
}

impl<'a> FeedService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Build the card view of `post` for the current user
    pub fn view(&self, post: &Post) -> PostView {
        let author = self.state.user(&post.author_id);
        let me = self.state.me_id();
        let mine = |set: &std::collections::BTreeSet<String>| me.is_some_and(|id| set.contains(id));

        PostView {
            post: post.clone(),
            author_label: author_label(author),
            author_handle: author.map(|u| u.handle.clone()).unwrap_or_default(),
            avatar_url: avatar_url(author),
            is_announcement: post.kind == PostKind::Announcement,
            like_count: post.likes.len(),
            bookmark_count: post.bookmarks.len(),
            repost_count: post.reposts.len(),
            liked_by_me: mine(&post.likes),
            bookmarked_by_me: mine(&post.bookmarks),
            reposted_by_me: mine(&post.reposts),
        }
    }

    fn views(&self, posts: Vec<&Post>) -> Vec<PostView> {
        posts.into_iter().map(|p| self.view(p)).collect()
    }

    /// Home timeline for the current user
    pub fn timeline(&self, timeline: Timeline, query: &FeedQuery) -> Vec<PostView> {
        let posts = &self.state.posts;
        let selected = match timeline {
            Timeline::Latest => query.apply(posts.iter()),
            Timeline::Following => {
                let followed = self
                    .state
                    .me_id()
                    .map(|me| self.state.following(me))
                    .unwrap_or_default();
                query.apply(posts.iter().filter(|p| followed.contains(&p.author_id)))
            }
            Timeline::Clubs => {
                let announcements = posts.iter().filter(|p| p.is_announcement());
                let rest = posts.iter().filter(|p| !p.is_announcement());
                query.apply(announcements.chain(rest))
            }
        };
        self.views(selected)
    }

    /// Profile of `user_id`, falling back to the current user
    ///
    /// Returns `None` when neither resolves.
    pub fn profile(
        &self,
        user_id: Option<&str>,
        tab: ProfileTab,
        query: &FeedQuery,
    ) -> Option<ProfileView> {
        let user = user_id
            .and_then(|id| self.state.user(id))
            .or(self.state.me.as_ref())?;
        let id = user.id.as_str();

        let posts = self.state.posts.iter();
        let selected = match tab {
            ProfileTab::Posts => query.apply(posts.filter(|p| p.author_id == id)),
            ProfileTab::Replies => {
                query.apply(posts.filter(|p| p.author_id == id && p.is_reply()))
            }
            ProfileTab::Likes => query.apply(posts.filter(|p| p.likes.contains(id))),
            ProfileTab::Bookmarks => query.apply(posts.filter(|p| p.bookmarks.contains(id))),
        };

        Some(ProfileView {
            user: user.clone(),
            is_me: self.state.me_id() == Some(id),
            followed_by_me: self.state.is_following(id),
            following_count: self.state.following(id).len(),
            follower_count: self.state.followers(id).len(),
            posts: self.views(selected),
        })
    }

    /// Case-insensitive substring search over post text
    ///
    /// A blank term matches nothing; announcements and trends are always
    /// returned.
    pub fn search(&self, term: &str, query: &FeedQuery) -> SearchResults {
        let needle = term.trim().to_lowercase();
        let posts = if needle.is_empty() {
            Vec::new()
        } else {
            let matches = self
                .state
                .posts
                .iter()
                .filter(|p| p.text.to_lowercase().contains(&needle));
            self.views(query.apply(matches))
        };

        SearchResults {
            posts,
            announcements: self.views(self.state.pinned_announcements()),
            trends: self.state.trends.clone(),
        }
    }

    /// Replies to `post_id`, oldest first
    pub fn replies_to(&self, post_id: &str) -> Vec<PostView> {
        let mut replies: Vec<&Post> = self
            .state
            .posts
            .iter()
            .filter(|p| p.reply_to.as_deref() == Some(post_id))
            .collect();
        replies.reverse();
        self.views(replies)
    }
}
