//! Bounded structural summaries of archive and executable files.
//!
//! `binscope-core` identifies a file from its name and leading bytes, walks
//! the container structure it recognizes (ZIP, TAR, compressed TAR, `ar`,
//! RPM), optionally asks system tools about native binaries, and renders a
//! short plain-text summary sized for a language model's context window.
//!
//! Malformed or truncated input never fails an explore call: whatever could
//! be read is summarized, and the problem is reported as a summary line.
//!
//! # Examples
//!
//! ```no_run
//! use binscope_core::ExplorerConfig;
//! use binscope_core::explore_file;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let result = explore_file("release.tar.gz", &ExplorerConfig::default())?;
//! println!("{}", result.summary);
//! println!("~{} tokens", result.token_estimate);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod executable;
pub mod formats;
pub mod inspection;
pub mod report;
pub mod summary;
pub mod tools;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::Identification;
pub use api::explore_bytes;
pub use api::explore_file;
pub use api::identify;
pub use archive::ArchiveExplorer;
pub use config::ExplorerConfig;
pub use config::ListLimits;
pub use config::OutputProfile;
pub use config::ToolConfig;
pub use error::ExploreError;
pub use error::Result;
pub use executable::ExecutableExplorer;
pub use formats::ArchiveFamily;
pub use formats::Explorer;
pub use report::ExploreContext;
pub use report::ExploreInput;
pub use report::ExploreResult;
pub use report::estimate_tokens;
pub use summary::format_size;
