//! High-level public API for file inspection.

use std::fmt;
use std::path::Path;

use crate::ArchiveExplorer;
use crate::ExecutableExplorer;
use crate::ExploreContext;
use crate::ExploreError;
use crate::ExploreInput;
use crate::ExploreResult;
use crate::Result;
use crate::config::ExplorerConfig;
use crate::formats::ArchiveFamily;
use crate::formats::Explorer;
use crate::formats::ResolvedExecutable;
use crate::formats::resolve_archive;
use crate::formats::resolve_executable;

/// Format of a file as seen by the explorers, without walking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identification {
    /// Claimed by the archive explorer.
    Archive(ArchiveFamily),

    /// Claimed by the executable explorer.
    Executable(ResolvedExecutable),
}

impl Identification {
    /// Returns the tag of the explorer that handles this format.
    #[must_use]
    pub const fn explorer(&self) -> &'static str {
        match self {
            Self::Archive(_) => ArchiveExplorer::NAME,
            Self::Executable(_) => ExecutableExplorer::NAME,
        }
    }

    /// Returns the format as it appears on the summary `Format:` line.
    #[must_use]
    pub fn format(&self) -> String {
        match self {
            Self::Archive(family) => family.name().to_string(),
            Self::Executable(resolved) => resolved.display_name(),
        }
    }
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.explorer(), self.format())
    }
}

/// Identifies `content` named `path`.
///
/// An executable extension wins over archive resolution, so `libfoo.a`
/// is a static library rather than an `ar` archive. Otherwise archive
/// resolution runs before executable magic bytes.
///
/// # Examples
///
/// ```
/// use binscope_core::identify;
/// use std::path::Path;
///
/// let id = identify(Path::new("backup.tar.gz"), b"").unwrap();
/// assert_eq!(id.to_string(), "archive: tar.gz");
///
/// let id = identify(Path::new("libssl.so"), b"").unwrap();
/// assert_eq!(id.explorer(), "executable");
///
/// assert!(identify(Path::new("notes.txt"), b"plain text").is_none());
/// ```
#[must_use]
pub fn identify(path: &Path, content: &[u8]) -> Option<Identification> {
    let executable = resolve_executable(path, content);
    if executable.family.is_some() {
        return Some(Identification::Executable(executable));
    }

    let family = resolve_archive(path, content);
    if family != ArchiveFamily::Unknown {
        return Some(Identification::Archive(family));
    }

    executable
        .is_recognized()
        .then_some(Identification::Executable(executable))
}

/// Summarizes in-memory `content` named `path`.
///
/// # Errors
///
/// Returns `ExploreError::UnsupportedFormat` if neither explorer claims
/// the file.
pub fn explore_bytes(
    path: &Path,
    content: &[u8],
    config: &ExplorerConfig,
    ctx: &ExploreContext,
) -> Result<ExploreResult> {
    let input = ExploreInput::new(path, content);
    match identify(path, content) {
        Some(Identification::Archive(_)) => {
            ArchiveExplorer::new(config.clone()).explore(ctx, &input)
        }
        Some(Identification::Executable(_)) => {
            ExecutableExplorer::new(config.clone()).explore(ctx, &input)
        }
        None => Err(ExploreError::UnsupportedFormat),
    }
}

/// Reads `path` and summarizes it.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read (`ExploreError::Io`)
/// - No explorer claims the file (`ExploreError::UnsupportedFormat`)
///
/// # Examples
///
/// ```no_run
/// use binscope_core::ExplorerConfig;
/// use binscope_core::explore_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = explore_file("release.tar.gz", &ExplorerConfig::default())?;
/// println!("{}", result.summary);
/// # Ok(())
/// # }
/// ```
pub fn explore_file<P: AsRef<Path>>(path: P, config: &ExplorerConfig) -> Result<ExploreResult> {
    let path = path.as_ref();
    let content = std::fs::read(path)?;
    log::debug!("read {} bytes from {}", content.len(), path.display());
    explore_bytes(path, &content, config, &ExploreContext::default())
}
