//! Running statistics for container walks.
//!
//! All accumulators here produce deterministic output regardless of the
//! order they were fed in, except [`LargestEntries`], which keeps
//! first-seen order among equal sizes.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use chrono::DateTime;
use chrono::Utc;

/// Counts per string key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: BTreeMap<String, usize>,
}

impl Histogram {
    /// Creates an empty histogram.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `key`.
    pub fn add(&mut self, key: impl Into<String>) {
        *self.counts.entry(key.into()).or_default() += 1;
    }

    /// Returns the count for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Returns `true` if nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `(key, count)` pairs sorted by count descending, then key
    /// ascending.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut pairs: Vec<(&str, usize)> =
            self.counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        // Map order is already key-ascending; a stable sort keeps it for ties.
        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs
    }
}

/// Bounded list of the largest entries by size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LargestEntries {
    limit: usize,
    entries: Vec<(String, u64)>,
}

impl LargestEntries {
    /// Creates a tracker keeping at most `limit` entries.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            entries: Vec::with_capacity(limit + 1),
        }
    }

    /// Offers an entry.
    ///
    /// An entry is inserted after every retained entry of equal or greater
    /// size, so ties keep first-seen order.
    pub fn offer(&mut self, name: &str, size: u64) {
        let pos = self
            .entries
            .iter()
            .position(|(_, existing)| *existing < size)
            .unwrap_or(self.entries.len());
        if pos >= self.limit {
            return;
        }
        self.entries.insert(pos, (name.to_string(), size));
        self.entries.truncate(self.limit);
    }

    /// Returns retained entries, largest first.
    #[must_use]
    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    /// Returns `true` if no entry is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Earliest and latest modification time seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    bounds: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl TimeRange {
    /// Widens the range to include `time`.
    pub fn observe(&mut self, time: DateTime<Utc>) {
        self.bounds = Some(match self.bounds {
            None => (time, time),
            Some((min, max)) => (min.min(time), max.max(time)),
        });
    }

    /// Returns `(earliest, latest)` if at least one time was seen.
    #[must_use]
    pub const fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.bounds
    }

    /// Returns the bounds only when they differ.
    #[must_use]
    pub fn spread(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.bounds.filter(|(min, max)| min != max)
    }
}

/// Aggregate statistics of one container walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerStats {
    /// Regular files.
    pub files: usize,

    /// Directories.
    pub directories: usize,

    /// Symbolic and hard links.
    pub links: usize,

    /// Sum of uncompressed file sizes.
    pub total_size: u64,

    /// Sum of stored file sizes (ZIP).
    pub total_compressed: u64,

    /// Any member was encrypted.
    pub encrypted: bool,

    /// Top-level names; directories carry a trailing `/`.
    pub top_level: BTreeSet<String>,

    /// Lowercase file extensions including the dot.
    pub extensions: Histogram,

    /// Compression method per file (ZIP).
    pub methods: Histogram,

    /// Owners (TAR).
    pub owners: Histogram,

    /// Permission strings (TAR).
    pub permissions: Histogram,

    /// Largest regular files.
    pub largest: LargestEntries,

    /// Modification time bounds.
    pub times: TimeRange,
}

impl ContainerStats {
    /// Creates empty statistics retaining `largest_limit` largest files.
    #[must_use]
    pub fn new(largest_limit: usize) -> Self {
        Self {
            files: 0,
            directories: 0,
            links: 0,
            total_size: 0,
            total_compressed: 0,
            encrypted: false,
            top_level: BTreeSet::new(),
            extensions: Histogram::new(),
            methods: Histogram::new(),
            owners: Histogram::new(),
            permissions: Histogram::new(),
            largest: LargestEntries::new(largest_limit),
            times: TimeRange::default(),
        }
    }

    /// Total number of members seen.
    #[must_use]
    pub const fn entry_count(&self) -> usize {
        self.files + self.directories + self.links
    }
}

/// Renders the low 9 permission bits as `-rwxr-xr-x`.
#[must_use]
pub fn permission_string(mode: u32) -> String {
    const FLAGS: [char; 3] = ['r', 'w', 'x'];
    let mut out = String::with_capacity(10);
    out.push('-');
    for bit in (0..9).rev() {
        if mode & (1 << bit) == 0 {
            out.push('-');
        } else {
            out.push(FLAGS[2 - bit % 3]);
        }
    }
    out
}
