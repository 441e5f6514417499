//! Command-line grammar
//!
//! One command per line; the first word selects the command and the rest
//! are arguments. Free text (post bodies, search terms, profile values)
//! takes the remainder of the line verbatim.

use libcampus::service::{ProfileTab, Timeline};
use libcampus::InteractionField;

use crate::error::{Result, ShellError};

pub const HELP: &str = "\
Commands:
  login student <id> <password>     Sign in with a student id
  login email <email> <code>        Sign in with an email and code
  logout                            Sign out
  whoami                            Show the signed-in user
  profile set <field> <value>       Update displayname, handle, avatar or banner
  profile [user-id] [tab]           Show a profile (tabs: posts, replies, likes, bookmarks)
  post <text>                       Publish a post
  announce <text>                   Publish an announcement
  reply <post-id> <text>            Reply to a post
  like|bookmark|repost <post-id>    Toggle an interaction
  follow <user-id>                  Follow or unfollow a user
  feed [latest|following|clubs]     Show a timeline
  search <term>                     Search post text
  trends                            Show trending tokens
  help                              Show this help
  quit                              Leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileField {
    DisplayName,
    Handle,
    Avatar,
    Banner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoginStudent { student_id: String, password: String },
    LoginEmail { email: String, code: String },
    Logout,
    WhoAmI,
    SetProfile { field: ProfileField, value: String },
    Profile { user_id: Option<String>, tab: ProfileTab },
    Post { text: String },
    Announce { text: String },
    Reply { post_id: String, text: String },
    Toggle { post_id: String, field: InteractionField },
    Follow { user_id: String },
    Feed { timeline: Timeline },
    Search { term: String },
    Trends,
    Help,
    Quit,
    /// Blank line
    Empty,
}

/// Split off the first whitespace-delimited word
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.find(char::is_whitespace) {
        Some(i) => (&input[..i], input[i..].trim_start()),
        None => (input, ""),
    }
}

fn require<'a>(word: &'a str, what: &str, usage: &str) -> Result<&'a str> {
    if word.is_empty() {
        Err(ShellError::Parse(format!("Missing {}. Usage: {}", what, usage)))
    } else {
        Ok(word)
    }
}

/// Parse one input line
pub fn parse(line: &str) -> Result<Command> {
    let (name, rest) = split_word(line.trim());

    match name.to_lowercase().as_str() {
        "" => Ok(Command::Empty),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "logout" => Ok(Command::Logout),
        "whoami" => Ok(Command::WhoAmI),
        "trends" => Ok(Command::Trends),
        "login" => parse_login(rest),
        "profile" => parse_profile(rest),
        "post" => Ok(Command::Post {
            text: rest.to_string(),
        }),
        "announce" => Ok(Command::Announce {
            text: rest.to_string(),
        }),
        "reply" => {
            let usage = "reply <post-id> <text>";
            let (post_id, text) = split_word(rest);
            let post_id = require(post_id, "post id", usage)?;
            Ok(Command::Reply {
                post_id: post_id.to_string(),
                text: text.to_string(),
            })
        }
        verb @ ("like" | "bookmark" | "repost") => {
            let usage = format!("{} <post-id>", verb);
            let (post_id, _) = split_word(rest);
            let post_id = require(post_id, "post id", &usage)?;
            let field = verb.parse::<InteractionField>().map_err(ShellError::Parse)?;
            Ok(Command::Toggle {
                post_id: post_id.to_string(),
                field,
            })
        }
        "follow" => {
            let (user_id, _) = split_word(rest);
            let user_id = require(user_id, "user id", "follow <user-id>")?;
            Ok(Command::Follow {
                user_id: user_id.to_string(),
            })
        }
        "feed" => {
            let (which, _) = split_word(rest);
            let timeline = if which.is_empty() {
                Timeline::default()
            } else {
                which.parse().map_err(ShellError::Parse)?
            };
            Ok(Command::Feed { timeline })
        }
        "search" => Ok(Command::Search {
            term: rest.to_string(),
        }),
        other => Err(ShellError::Parse(format!(
            "Unknown command '{}'. Type 'help' for a list of commands.",
            other
        ))),
    }
}

fn parse_login(rest: &str) -> Result<Command> {
    let (method, rest) = split_word(rest);
    let (id, rest) = split_word(rest);
    let (secret, _) = split_word(rest);

    match method.to_lowercase().as_str() {
        "student" => Ok(Command::LoginStudent {
            student_id: id.to_string(),
            password: secret.to_string(),
        }),
        "email" => Ok(Command::LoginEmail {
            email: id.to_string(),
            code: secret.to_string(),
        }),
        _ => Err(ShellError::Parse(
            "Usage: login student <id> <password> | login email <email> <code>".to_string(),
        )),
    }
}

fn parse_profile(rest: &str) -> Result<Command> {
    let (first, tail) = split_word(rest);

    if first.eq_ignore_ascii_case("set") {
        let usage = "profile set <displayname|handle|avatar|banner> <value>";
        let (field, value) = split_word(tail);
        let field = match require(field, "field", usage)?.to_lowercase().as_str() {
            "displayname" | "display_name" | "name" => ProfileField::DisplayName,
            "handle" => ProfileField::Handle,
            "avatar" => ProfileField::Avatar,
            "banner" => ProfileField::Banner,
            other => {
                return Err(ShellError::Parse(format!(
                    "Unknown profile field '{}'. Usage: {}",
                    other, usage
                )))
            }
        };
        return Ok(Command::SetProfile {
            field,
            value: value.to_string(),
        });
    }

    if first.is_empty() {
        return Ok(Command::Profile {
            user_id: None,
            tab: ProfileTab::default(),
        });
    }

    // `profile likes` shows a tab of my own profile
    if let Ok(tab) = first.parse::<ProfileTab>() {
        return Ok(Command::Profile { user_id: None, tab });
    }

    let (tab, _) = split_word(tail);
    let tab = if tab.is_empty() {
        ProfileTab::default()
    } else {
        tab.parse().map_err(ShellError::Parse)?
    };
    Ok(Command::Profile {
        user_id: Some(first.to_string()),
        tab,
    })
}
