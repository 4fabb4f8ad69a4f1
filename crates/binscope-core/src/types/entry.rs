//! Per-member container metadata.

use chrono::DateTime;
use chrono::Utc;

/// Kind of a container member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file (or any type not listed below).
    File,

    /// Directory.
    Directory,

    /// Symbolic link.
    Symlink,

    /// Hard link.
    Hardlink,
}

impl EntryKind {
    /// Returns `true` for symbolic and hard links.
    #[must_use]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::Symlink | Self::Hardlink)
    }
}

/// Metadata of one container member, read from its header.
///
/// Built while walking the container and dropped once folded into the
/// running statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEntry {
    /// Name as stored in the container (slash-separated).
    pub name: String,

    /// Member kind.
    pub kind: EntryKind,

    /// Uncompressed size in bytes.
    pub size: u64,

    /// Stored size in bytes (ZIP).
    pub compressed_size: Option<u64>,

    /// Compression method name (ZIP).
    pub method: Option<String>,

    /// Last modification time.
    pub modified: Option<DateTime<Utc>>,

    /// Permission bits (TAR).
    pub mode: Option<u32>,

    /// Owner name or `uid:<n>` (TAR).
    pub owner: Option<String>,

    /// Encryption flag (ZIP general-purpose bit 0).
    pub encrypted: bool,
}

impl ContainerEntry {
    /// Creates an entry with only a name, kind and size.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: EntryKind, size: u64) -> Self {
        Self {
            name: name.into(),
            kind,
            size,
            compressed_size: None,
            method: None,
            modified: None,
            mode: None,
            owner: None,
            encrypted: false,
        }
    }

    /// Returns the lowercase extension including the dot, e.g. `.rs`.
    ///
    /// Only the final path segment is considered. A leading-dot name is its
    /// own extension, so `.bashrc` buckets as `.bashrc`.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let file_name = self.name.rsplit('/').next().unwrap_or_default();
        let dot = file_name.rfind('.')?;
        Some(file_name[dot..].to_ascii_lowercase())
    }

    /// Returns the first path segment and whether more segments follow.
    #[must_use]
    pub fn first_segment(&self) -> (&str, bool) {
        match self.name.split_once('/') {
            Some((first, _)) => (first, true),
            None => (self.name.as_str(), false),
        }
    }
}
