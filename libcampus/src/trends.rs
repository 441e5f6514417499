//! Trend computation over recent posts
//!
//! Plain term-frequency counting: recent post text is lower-cased and split
//! into word-like tokens (letters, digits, `#` and `_`, at least two
//! characters long). Ties keep the order in which tokens were first seen.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::{Post, Trend};

fn token_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[\p{L}\p{N}#_]{2,}").expect("Regex should compile"))
}

/// Lower-case `text` and extract its trend tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let folded = text.to_lowercase();
    token_regex()
        .find_iter(&folded)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Rank tokens across the first `window` posts and keep the top `count`
///
/// `posts` is expected newest first, so the window covers the most recent
/// posts.
pub fn compute_trends(posts: &[Post], window: usize, count: usize) -> Vec<Trend> {
    let mut order: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for post in posts.iter().take(window) {
        for token in tokenize(&post.text) {
            match index.get(&token) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(token.clone(), order.len());
                    order.push((token, 1));
                }
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(count);

    order
        .into_iter()
        .map(|(tag, count)| Trend { tag, count })
        .collect()
}
