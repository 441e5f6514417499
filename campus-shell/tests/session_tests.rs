//! Session execution tests
//!
//! Runs parsed commands against an in-memory store and checks what the
//! shell prints.

use std::sync::Arc;

use campus_shell::{load_config, parse, Flow, OutputFormat, Session, ShellError};
use libcampus::config::Limits;
use libcampus::{AppStore, CampusError, MemoryStorage};
use tempfile::TempDir;

fn session(format: OutputFormat) -> Session {
    let store = AppStore::new(Arc::new(MemoryStorage::new()), Limits::default());
    Session::new(store, format)
}

/// Run one line and return its stdout
async fn run(session: &mut Session, line: &str) -> Result<String, ShellError> {
    let mut out = Vec::new();
    let command = parse(line)?;
    session.execute(command, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_login_and_whoami() {
    let mut session = session(OutputFormat::Text);

    let out = run(&mut session, "whoami").await.unwrap();
    assert_eq!(out.trim(), "Not signed in");
    assert_eq!(session.prompt(), "campus> ");

    let out = run(&mut session, "login student 2023001 pw").await.unwrap();
    assert!(out.contains("u_2023001"));
    assert_eq!(session.prompt(), "@s2023001> ");
}

#[tokio::test]
async fn test_login_with_missing_password_fails() {
    let mut session = session(OutputFormat::Text);
    let err = run(&mut session, "login student 2023001").await.unwrap_err();
    assert!(matches!(err, ShellError::Store(CampusError::Validation(_))));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_post_requires_login() {
    let mut session = session(OutputFormat::Text);
    let err = run(&mut session, "post hello").await.unwrap_err();
    assert!(matches!(err, ShellError::Store(CampusError::NotAuthenticated)));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_empty_post_is_refused_before_the_store() {
    let mut session = session(OutputFormat::Text);
    run(&mut session, "login student 1 pw").await.unwrap();

    let err = run(&mut session, "post    ").await.unwrap_err();
    assert!(matches!(err, ShellError::Parse(_)));
    assert!(session.store().state().posts.is_empty());
}

#[tokio::test]
async fn test_post_like_and_feed() {
    let mut session = session(OutputFormat::Text);
    run(&mut session, "login email mei@uni.edu 123456").await.unwrap();
    run(&mut session, "post Study group at 7 #calculus").await.unwrap();

    let post_id = session.store().state().posts[0].id.clone();
    let out = run(&mut session, &format!("like {}", post_id)).await.unwrap();
    assert_eq!(out.trim(), "Added to likes (1 total)");

    let feed = run(&mut session, "feed").await.unwrap();
    assert!(feed.contains("mei @mei"));
    assert!(feed.contains("Study group at 7 #calculus"));
    assert!(feed.contains("likes 1*"));

    let out = run(&mut session, &format!("like {}", post_id)).await.unwrap();
    assert_eq!(out.trim(), "Removed from likes (0 total)");
}

#[tokio::test]
async fn test_toggle_unknown_post() {
    let mut session = session(OutputFormat::Text);
    run(&mut session, "login student 1 pw").await.unwrap();
    let err = run(&mut session, "repost p_missing").await.unwrap_err();
    assert!(err.to_string().contains("p_missing"));
}

#[tokio::test]
async fn test_reply_to_unknown_post() {
    let mut session = session(OutputFormat::Text);
    run(&mut session, "login student 1 pw").await.unwrap();
    assert!(run(&mut session, "reply p_nope hi").await.is_err());
}

#[tokio::test]
async fn test_follow_and_following_feed() {
    let mut session = session(OutputFormat::Text);
    run(&mut session, "login student 2 pw").await.unwrap();
    run(&mut session, "announce Club fair on Friday").await.unwrap();
    run(&mut session, "login student 1 pw").await.unwrap();

    let empty = run(&mut session, "feed following").await.unwrap();
    assert_eq!(empty.trim(), "No posts");

    let out = run(&mut session, "follow u_2").await.unwrap();
    assert_eq!(out.trim(), "Following u_2");

    let feed = run(&mut session, "feed following").await.unwrap();
    assert!(feed.contains("[announcement] Club fair on Friday"));

    let profile = run(&mut session, "profile u_2").await.unwrap();
    assert!(profile.contains("(following)"));
    assert!(profile.contains("0 following · 1 followers"));
}

#[tokio::test]
async fn test_profile_set_and_validation() {
    let mut session = session(OutputFormat::Text);
    run(&mut session, "login student 1 pw").await.unwrap();

    let out = run(&mut session, "profile set name  Ada Lovelace ").await.unwrap();
    assert!(out.contains("Ada Lovelace"));
    assert_eq!(session.store().me().unwrap().display_name, "Ada Lovelace");

    let err = run(&mut session, "profile set name   ").await.unwrap_err();
    assert!(err.to_string().contains("Display name cannot be empty"));
}

#[tokio::test]
async fn test_search_and_trends_json() {
    let mut session = session(OutputFormat::Json);
    run(&mut session, "login student 1 pw").await.unwrap();
    run(&mut session, "post foo bar").await.unwrap();
    run(&mut session, "post foo").await.unwrap();

    let out = run(&mut session, "trends").await.unwrap();
    let trends: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(trends[0]["tag"], "foo");
    assert_eq!(trends[0]["count"], 2);
    assert_eq!(trends[1]["tag"], "bar");

    let out = run(&mut session, "search BAR").await.unwrap();
    let results: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(results["posts"].as_array().unwrap().len(), 1);
    assert_eq!(results["posts"][0]["post"]["text"], "foo bar");
}

#[tokio::test]
async fn test_search_text_lists_announcements() {
    let mut session = session(OutputFormat::Text);
    run(&mut session, "login student 1 pw").await.unwrap();
    run(&mut session, "announce Library closes early today").await.unwrap();
    run(&mut session, "post lunch anyone").await.unwrap();

    let out = run(&mut session, "search lunch").await.unwrap();
    let (matches, pinned) = out.split_once("Announcements:").unwrap();
    assert!(matches.contains("lunch anyone"));
    assert!(!matches.contains("Library closes early today"));
    assert!(pinned.contains("[announcement] Library closes early today"));
}

/// Open a file-backed session the way the binary does
async fn open_session(temp_dir: &TempDir) -> Session {
    let config = load_config(
        Some(&temp_dir.path().join("config.toml")),
        Some(&temp_dir.path().join("data")),
    )
    .unwrap();
    let store = AppStore::open(&config).await.unwrap();
    Session::new(store, OutputFormat::Text)
}

#[tokio::test]
async fn test_identity_survives_shell_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut session = open_session(&temp_dir).await;
        run(&mut session, "login email lin@uni.edu 4242").await.unwrap();
        run(&mut session, "profile set name Lin").await.unwrap();
        run(&mut session, "post gone after restart").await.unwrap();
    }
    assert!(temp_dir.path().join("data").join("auth.json").exists());

    let mut session = open_session(&temp_dir).await;
    assert_eq!(session.prompt(), "@lin> ");
    let out = run(&mut session, "whoami").await.unwrap();
    assert!(out.contains("Signed in as Lin (@lin, id e_lin@uni.edu)"));
    let feed = run(&mut session, "feed").await.unwrap();
    assert_eq!(feed.trim(), "No posts");

    run(&mut session, "logout").await.unwrap();
    drop(session);

    let session = open_session(&temp_dir).await;
    assert_eq!(session.prompt(), "campus> ");
}

#[tokio::test]
async fn test_logout_and_quit() {
    let mut session = session(OutputFormat::Text);
    run(&mut session, "login student 1 pw").await.unwrap();
    let out = run(&mut session, "logout").await.unwrap();
    assert_eq!(out.trim(), "Signed out");
    assert!(session.store().me().is_none());

    let mut sink = Vec::new();
    let flow = session.execute(parse("quit").unwrap(), &mut sink).await.unwrap();
    assert_eq!(flow, Flow::Quit);
}
