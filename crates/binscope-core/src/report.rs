//! Explore inputs and results.

use std::path::Path;
use std::time::Duration;
use std::time::Instant;

/// Borrowed input to a single explore call.
#[derive(Debug, Clone, Copy)]
pub struct ExploreInput<'a> {
    /// File path, used only for its name and extension.
    pub path: &'a Path,

    /// Full file content.
    pub content: &'a [u8],

    /// Caller session identifier. Not consulted by the explorers here.
    pub session_id: Option<&'a str>,
}

impl<'a> ExploreInput<'a> {
    /// Creates an input without a session identifier.
    #[must_use]
    pub const fn new(path: &'a Path, content: &'a [u8]) -> Self {
        Self {
            path,
            content,
            session_id: None,
        }
    }

    /// Returns the final path component, or the whole path if it has none.
    #[must_use]
    pub fn base_name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.to_string_lossy().into_owned(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

/// Per-call context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExploreContext {
    /// Point in time after which subprocesses are abandoned.
    pub deadline: Option<Instant>,
}

impl ExploreContext {
    /// Creates a context that expires after `timeout`.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Returns the time left before the deadline, if one is set.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

/// Output of an explore call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExploreResult {
    /// Plain-text summary.
    pub summary: String,

    /// Tag of the explorer that produced the summary.
    pub explorer: &'static str,

    /// Approximate token count of `summary`.
    pub token_estimate: usize,
}

impl ExploreResult {
    /// Creates a result and computes its token estimate.
    #[must_use]
    pub fn new(summary: String, explorer: &'static str) -> Self {
        let token_estimate = estimate_tokens(&summary);
        Self {
            summary,
            explorer,
            token_estimate,
        }
    }
}

/// Estimates the token count of `text` as `ceil(chars / 4)`.
///
/// # Examples
///
/// ```
/// use binscope_core::estimate_tokens;
///
/// assert_eq!(estimate_tokens(""), 0);
/// assert_eq!(estimate_tokens("abcde"), 2);
/// ```
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}
