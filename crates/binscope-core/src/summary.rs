//! Plain-text summary rendering.
//!
//! A summary is a sequence of labelled lines. Sections start with a blank
//! line and a `Title:` label, and list items are written as `  - item`.

use std::fmt::Display;
use std::fmt::Write;

use crate::inspection::stats::ContainerStats;
use crate::inspection::stats::Histogram;

/// Formats a byte count using binary multiples.
///
/// # Examples
///
/// ```
/// use binscope_core::format_size;
///
/// assert_eq!(format_size(512), "512 bytes");
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
/// ```
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;

    let b = bytes as f64;
    if b >= GB {
        format!("{:.1} GB", b / GB)
    } else if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} bytes")
    }
}

/// Incremental summary writer.
#[derive(Debug, Default)]
pub struct SummaryBuilder {
    out: String,
}

impl SummaryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a raw line.
    pub fn line(&mut self, text: impl Display) -> &mut Self {
        let _ = writeln!(self.out, "{text}");
        self
    }

    /// Appends `label: value`.
    pub fn field(&mut self, label: &str, value: impl Display) -> &mut Self {
        let _ = writeln!(self.out, "{label}: {value}");
        self
    }

    /// Appends a section header preceded by a blank line.
    pub fn heading(&mut self, title: &str) -> &mut Self {
        let _ = write!(self.out, "\n{title}:\n");
        self
    }

    /// Appends a `  - item` line.
    pub fn item(&mut self, item: impl Display) -> &mut Self {
        let _ = writeln!(self.out, "  - {item}");
        self
    }

    /// Appends a section listing every item. Empty sections are omitted.
    pub fn section<I>(&mut self, title: &str, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        let mut items = items.into_iter().peekable();
        if items.peek().is_some() {
            self.heading(title);
            for item in items {
                self.item(item);
            }
        }
        self
    }

    /// Appends a section showing at most `limit` items, followed by an
    /// overflow line.
    pub fn capped_section<T: Display>(
        &mut self,
        title: &str,
        items: &[T],
        limit: Option<usize>,
    ) -> &mut Self {
        if items.is_empty() {
            return self;
        }
        let shown = limit.map_or(items.len(), |l| l.min(items.len()));
        self.heading(title);
        for item in &items[..shown] {
            self.item(item);
        }
        if shown < items.len() {
            let _ = writeln!(self.out, "  - ... and {} more", items.len() - shown);
        }
        self
    }

    /// Appends a histogram section as `  - key: n<suffix>`.
    pub fn histogram(&mut self, title: &str, histogram: &Histogram, suffix: &str) -> &mut Self {
        self.section(
            title,
            histogram
                .sorted()
                .into_iter()
                .map(|(key, count)| format!("{key}: {count}{suffix}")),
        )
    }

    /// Appends a section of two-space indented lines without bullets.
    pub fn block(&mut self, title: &str, text: &str) -> &mut Self {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        if let Some(first) = lines.next() {
            self.heading(title);
            let _ = writeln!(self.out, "  {first}");
            for line in lines {
                let _ = writeln!(self.out, "  {line}");
            }
        }
        self
    }

    /// Appends the archive header lines.
    pub fn archive_header(&mut self, base: &str, format: impl Display, size: usize) -> &mut Self {
        self.field("Archive file", base)
            .field("Format", format)
            .field("Size", format_args!("{size} bytes"))
    }

    /// Appends the `Top-level structure:` section.
    pub fn top_level(&mut self, stats: &ContainerStats) -> &mut Self {
        self.section("Top-level structure", &stats.top_level)
    }

    /// Appends the `Largest files:` section.
    pub fn largest(&mut self, stats: &ContainerStats) -> &mut Self {
        self.section(
            "Largest files",
            stats
                .largest
                .entries()
                .iter()
                .map(|(name, size)| format!("{name} ({})", format_size(*size))),
        )
    }

    /// Appends the `Modification time range:` section when the range is not
    /// a single instant.
    pub fn time_range(&mut self, stats: &ContainerStats) -> &mut Self {
        if let Some((earliest, latest)) = stats.times.spread() {
            self.heading("Modification time range")
                .item(format_args!("Earliest: {}", rfc3339(earliest)))
                .item(format_args!("Latest: {}", rfc3339(latest)));
        }
        self
    }

    /// Returns the summary text.
    #[must_use]
    pub fn finish(self) -> String {
        self.out
    }
}

fn rfc3339(time: chrono::DateTime<chrono::Utc>) -> String {
    time.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
