//! Input validation for compose and settings forms
//!
//! The store only enforces what its data model requires (signed-in author,
//! maximum length). Everything a form should refuse before submitting,
//! such as empty posts or blank display names, is checked here.

use crate::config::Limits;
use crate::types::ProfilePatch;

/// Remaining characters below which a warning is reported
const NEAR_LIMIT_MARGIN: usize = 20;

#[derive(Debug, Clone)]
pub struct ValidationService {
    limits: Limits,
}

/// Result of validating a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
    /// Non-blocking notes
    pub warnings: Vec<String>,
    /// Characters after trimming (compose only, 0 otherwise)
    pub char_count: usize,
}

impl ValidationService {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn max_post_chars(&self) -> usize {
        self.limits.max_post_chars
    }

    /// Validate compose text as the store will see it (trimmed)
    pub fn validate_post(&self, text: &str) -> ValidationResponse {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let trimmed = text.trim();
        let char_count = trimmed.chars().count();
        let limit = self.limits.max_post_chars;

        if trimmed.is_empty() {
            errors.push("Content cannot be empty or whitespace-only".to_string());
        }

        if char_count > limit {
            errors.push(format!(
                "Content length ({} characters) exceeds limit of {} characters",
                char_count, limit
            ));
        } else if limit - char_count <= NEAR_LIMIT_MARGIN && char_count > 0 {
            warnings.push(format!("{} characters remaining", limit - char_count));
        }

        ValidationResponse {
            valid: errors.is_empty(),
            errors,
            warnings,
            char_count,
        }
    }

    /// Validate a settings form before `update_profile`
    pub fn validate_profile(&self, patch: &ProfilePatch) -> ValidationResponse {
        let mut errors = Vec::new();
        let warnings = Vec::new();

        if let Some(display_name) = &patch.display_name {
            if display_name.trim().is_empty() {
                errors.push("Display name cannot be empty".to_string());
            }
        }

        if let Some(handle) = &patch.handle {
            if handle.trim().is_empty() {
                errors.push("Handle cannot be empty".to_string());
            } else if handle.chars().any(char::is_whitespace) {
                errors.push("Handle cannot contain whitespace".to_string());
            }
        }

        ValidationResponse {
            valid: errors.is_empty(),
            errors,
            warnings,
            char_count: 0,
        }
    }

    pub fn is_valid_post(&self, text: &str) -> bool {
        self.validate_post(text).valid
    }
}

impl Default for ValidationService {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}
