//! Common traits for file explorers.

use std::path::Path;

use crate::ExploreContext;
use crate::ExploreInput;
use crate::ExploreResult;
use crate::Result;

/// A format-specific file explorer.
///
/// Explorers are stateless apart from their configuration and may be shared
/// between threads.
pub trait Explorer: Send + Sync {
    /// Returns the explorer tag reported in [`ExploreResult::explorer`].
    fn name(&self) -> &'static str;

    /// Returns `true` if this explorer recognizes the file.
    ///
    /// Must be cheap and must not fail: it is called for every candidate
    /// file.
    fn can_handle(&self, path: &Path, content: &[u8]) -> bool;

    /// Produces a summary for `input`.
    ///
    /// # Errors
    ///
    /// Implementations in this crate always return `Ok` and report failures
    /// inside the summary text.
    fn explore(&self, ctx: &ExploreContext, input: &ExploreInput<'_>) -> Result<ExploreResult>;
}
