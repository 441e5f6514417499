//! Command execution against the store
//!
//! A [`Session`] owns the [`AppStore`] for the lifetime of the shell and
//! renders results either as text or as one JSON document per command.

use std::io::Write;

use chrono::{DateTime, Local};
use libcampus::service::{FeedQuery, PostView, ProfileView, SearchResults};
use libcampus::{AppStore, NewPost, ProfilePatch, Trend, User};
use serde_json::json;

use crate::command::{Command, ProfileField, HELP};
use crate::error::{Result, ShellError};

/// Number of posts printed per listing
const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// What the read loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session {
    store: AppStore,
    format: OutputFormat,
}

impl Session {
    pub fn new(store: AppStore, format: OutputFormat) -> Self {
        Self { store, format }
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    /// Prompt showing who is signed in
    pub fn prompt(&self) -> String {
        match self.store.me() {
            Some(me) => format!("@{}> ", me.handle),
            None => "campus> ".to_string(),
        }
    }

    /// Run one command, writing its output to `out`
    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        let query = FeedQuery::limit(PAGE_SIZE);

        match command {
            Command::Empty => {}
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => writeln!(out, "{}", HELP)?,

            Command::LoginStudent { student_id, password } => {
                let user = self.store.login_with_student(&student_id, &password).await?;
                self.write_user(out, &user, "Signed in as")?;
            }
            Command::LoginEmail { email, code } => {
                let user = self.store.login_with_email(&email, &code).await?;
                self.write_user(out, &user, "Signed in as")?;
            }
            Command::Logout => {
                self.store.logout().await?;
                self.write_message(out, "Signed out")?;
            }
            Command::WhoAmI => match self.store.me().cloned() {
                Some(user) => self.write_user(out, &user, "Signed in as")?,
                None => self.write_message(out, "Not signed in")?,
            },

            Command::SetProfile { field, value } => {
                let patch = patch_for(field, value);
                let check = self.store.validation().validate_profile(&patch);
                if !check.valid {
                    return Err(ShellError::Parse(check.errors.join("; ")));
                }
                match self.store.update_profile(patch).await? {
                    Some(user) => self.write_user(out, &user, "Profile updated:")?,
                    None => return Err(libcampus::CampusError::NotAuthenticated.into()),
                }
            }
            Command::Profile { user_id, tab } => {
                let profile = self.store.feed().profile(user_id.as_deref(), tab, &query);
                match profile {
                    Some(profile) => self.write_profile(out, &profile)?,
                    None => self.write_message(out, "User not found")?,
                }
            }

            Command::Post { text } => self.compose(out, NewPost::post(text)).await?,
            Command::Announce { text } => self.compose(out, NewPost::announcement(text)).await?,
            Command::Reply { post_id, text } => {
                if self.store.state().post(&post_id).is_none() {
                    return Err(ShellError::Parse(format!("No post with id '{}'", post_id)));
                }
                self.compose(out, NewPost::post(text).in_reply_to(post_id)).await?
            }

            Command::Toggle { post_id, field } => {
                match self.store.toggle(&post_id, field).await? {
                    Some(active) => {
                        let count = self
                            .store
                            .state()
                            .post(&post_id)
                            .map(|p| p.interactions(field).len())
                            .unwrap_or(0);
                        let verb = if active { "Added to" } else { "Removed from" };
                        self.write_message(
                            out,
                            &format!("{} {} ({} total)", verb, field, count),
                        )?;
                    }
                    None if self.store.me().is_none() => {
                        return Err(libcampus::CampusError::NotAuthenticated.into())
                    }
                    None => {
                        return Err(ShellError::Parse(format!("No post with id '{}'", post_id)))
                    }
                }
            }
            Command::Follow { user_id } => match self.store.follow(&user_id).await? {
                Some(true) => self.write_message(out, &format!("Following {}", user_id))?,
                Some(false) => self.write_message(out, &format!("Unfollowed {}", user_id))?,
                None => return Err(libcampus::CampusError::NotAuthenticated.into()),
            },

            Command::Feed { timeline } => {
                let posts = self.store.feed().timeline(timeline, &query);
                self.write_posts(out, &posts)?;
            }
            Command::Search { term } => {
                let results = self.store.feed().search(&term, &query);
                self.write_search(out, &results)?;
            }
            Command::Trends => {
                let trends = self.store.state().trends.clone();
                self.write_trends(out, &trends)?;
            }
        }

        Ok(Flow::Continue)
    }

    async fn compose<W: Write>(&mut self, out: &mut W, new_post: NewPost) -> Result<()> {
        let check = self.store.validation().validate_post(&new_post.text);
        if !check.valid {
            return Err(ShellError::Parse(check.errors.join("; ")));
        }
        for warning in &check.warnings {
            tracing::info!(%warning, "Compose warning");
        }

        let post = self.store.create_post(new_post).await?;
        let view = self.store.feed().view(&post);
        match self.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&view)?)?,
            OutputFormat::Text => writeln!(out, "Posted {}", post.id)?,
        }
        Ok(())
    }

    fn write_message<W: Write>(&self, out: &mut W, message: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => writeln!(out, "{}", json!({ "message": message }))?,
            OutputFormat::Text => writeln!(out, "{}", message)?,
        }
        Ok(())
    }

    fn write_user<W: Write>(&self, out: &mut W, user: &User, label: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(user)?)?,
            OutputFormat::Text => writeln!(
                out,
                "{} {} (@{}, id {})",
                label, user.display_name, user.handle, user.id
            )?,
        }
        Ok(())
    }

    fn write_posts<W: Write>(&self, out: &mut W, posts: &[PostView]) -> Result<()> {
        if self.format == OutputFormat::Json {
            writeln!(out, "{}", serde_json::to_string(posts)?)?;
            return Ok(());
        }
        if posts.is_empty() {
            writeln!(out, "No posts")?;
        }
        for view in posts {
            write_post_text(out, view)?;
        }
        Ok(())
    }

    fn write_profile<W: Write>(&self, out: &mut W, profile: &ProfileView) -> Result<()> {
        if self.format == OutputFormat::Json {
            writeln!(out, "{}", serde_json::to_string(profile)?)?;
            return Ok(());
        }
        let user = &profile.user;
        let relation = if profile.is_me {
            " (you)"
        } else if profile.followed_by_me {
            " (following)"
        } else {
            ""
        };
        writeln!(out, "{} @{}{}", user.display_name, user.handle, relation)?;
        writeln!(
            out,
            "{} following · {} followers · joined {}",
            profile.following_count,
            profile.follower_count,
            format_time(user.registered_at)
        )?;
        writeln!(out)?;
        self.write_posts(out, &profile.posts)
    }

    fn write_search<W: Write>(&self, out: &mut W, results: &SearchResults) -> Result<()> {
        if self.format == OutputFormat::Json {
            writeln!(out, "{}", serde_json::to_string(results)?)?;
            return Ok(());
        }
        if results.posts.is_empty() {
            writeln!(out, "No matching posts")?;
        }
        for view in &results.posts {
            write_post_text(out, view)?;
        }
        if !results.announcements.is_empty() {
            writeln!(out)?;
            writeln!(out, "Announcements:")?;
            for view in &results.announcements {
                write_post_text(out, view)?;
            }
        }
        if !results.trends.is_empty() {
            writeln!(out)?;
            self.write_trends(out, &results.trends)?;
        }
        Ok(())
    }

    fn write_trends<W: Write>(&self, out: &mut W, trends: &[Trend]) -> Result<()> {
        if self.format == OutputFormat::Json {
            writeln!(out, "{}", serde_json::to_string(trends)?)?;
            return Ok(());
        }
        if trends.is_empty() {
            writeln!(out, "No trends yet")?;
        }
        for (rank, trend) in trends.iter().enumerate() {
            writeln!(out, "{:>2}. {} ({})", rank + 1, trend.tag, trend.count)?;
        }
        Ok(())
    }
}

fn patch_for(field: ProfileField, value: String) -> ProfilePatch {
    let mut patch = ProfilePatch::default();
    match field {
        ProfileField::DisplayName => patch.display_name = Some(value.trim().to_string()),
        ProfileField::Handle => patch.handle = Some(value.trim().to_string()),
        ProfileField::Avatar => patch.avatar = Some(value),
        ProfileField::Banner => patch.banner = Some(value),
    }
    patch
}

fn format_time(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

fn write_post_text<W: Write>(out: &mut W, view: &PostView) -> Result<()> {
    let badge = if view.is_announcement { "[announcement] " } else { "" };
    let mark = |on: bool| if on { "*" } else { "" };

    writeln!(
        out,
        "{} @{} · {} · {}",
        view.author_label,
        view.author_handle,
        format_time(view.post.created_at),
        view.post.id
    )?;
    if let Some(parent) = &view.post.reply_to {
        writeln!(out, "  replying to {}", parent)?;
    }
    writeln!(out, "  {}{}", badge, view.post.text)?;
    writeln!(
        out,
        "  likes {}{} · bookmarks {}{} · reposts {}{}",
        view.like_count,
        mark(view.liked_by_me),
        view.bookmark_count,
        mark(view.bookmarked_by_me),
        view.repost_count,
        mark(view.reposted_by_me)
    )?;
    Ok(())
}
