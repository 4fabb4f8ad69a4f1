//! Archive explorer.
//!
//! Resolves the archive family of a file, walks the container with the
//! reader for its layout, and renders the statistics as a summary. Every
//! failure below the format resolver degrades into summary lines.

use std::path::Path;

use crate::ExploreContext;
use crate::ExploreError;
use crate::ExploreInput;
use crate::ExploreResult;
use crate::Result;
use crate::config::ExplorerConfig;
use crate::formats::ArchiveFamily;
use crate::formats::CompressionCodec;
use crate::formats::Explorer;
use crate::formats::Layout;
use crate::formats::detect::archive_magic_name;
use crate::formats::resolve_archive;
use crate::inspection::ContainerStats;
use crate::inspection::StreamContents;
use crate::inspection::ar::read_ar;
use crate::inspection::nested::resolve_stream;
use crate::inspection::rpm::read_rpm_lead;
use crate::inspection::tar::read_compressed_tar;
use crate::inspection::tar::read_tar;
use crate::inspection::zip::read_zip;
use crate::summary::SummaryBuilder;
use crate::summary::format_size;

/// Explorer for ZIP-family, TAR-family, compressed, `ar`, RPM and opaque
/// archive formats.
///
/// # Examples
///
/// ```
/// use binscope_core::{ArchiveExplorer, ExploreContext, ExploreInput, Explorer};
/// use std::path::Path;
///
/// let mut builder = tar::Builder::new(Vec::new());
/// let mut header = tar::Header::new_gnu();
/// header.set_size(5);
/// header.set_mode(0o644);
/// header.set_cksum();
/// builder.append_data(&mut header, "docs/readme.txt", &b"hello"[..]).unwrap();
/// let tar = builder.into_inner().unwrap();
/// let explorer = ArchiveExplorer::default();
/// let input = ExploreInput::new(Path::new("bundle.tar"), &tar);
///
/// let result = explorer.explore(&ExploreContext::default(), &input).unwrap();
/// assert!(result.summary.contains("Format: tar\n"));
/// assert!(result.summary.contains("  - docs/\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveExplorer {
    config: ExplorerConfig,
}

impl ArchiveExplorer {
    /// Explorer tag.
    pub const NAME: &'static str = "archive";

    /// Creates an explorer with `config`.
    #[must_use]
    pub const fn new(config: ExplorerConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Renders the summary for `input`.
    #[must_use]
    pub fn summarize(&self, input: &ExploreInput<'_>) -> String {
        let family = resolve_archive(input.path, input.content);
        let base = input.base_name();
        log::debug!("{base}: archive family {family}");

        match family.layout() {
            Layout::Zip => self.summarize_zip(&base, input.content, family),
            Layout::Tar => {
                let stats = read_tar(input.content, self.config.limits.largest_entries);
                self.render_tar(&base, family.name(), input.content.len(), &stats)
            }
            Layout::CompressedTar(codec) => {
                self.summarize_compressed_tar(&base, input.content, family, codec)
            }
            Layout::Compressed(codec) => self.summarize_stream(&base, input.content, codec),
            Layout::Ar => self.summarize_ar(&base, input.content),
            Layout::Rpm => summarize_rpm(&base, input.content),
            Layout::Opaque => {
                let display = if family == ArchiveFamily::Unknown {
                    archive_magic_name(input.content).unwrap_or("unknown archive")
                } else {
                    family.name()
                };
                opaque_summary(&base, display, input.content.len())
            }
        }
    }

    fn summarize_zip(&self, base: &str, content: &[u8], family: ArchiveFamily) -> String {
        let listing = match read_zip(content, family, self.config.limits.largest_entries) {
            Ok(listing) => listing,
            Err(e) => {
                log::debug!("{base}: {e}");
                let mut summary = SummaryBuilder::new();
                summary.archive_header(base, family, content.len()).field(
                    "Error",
                    format_args!("could not read ZIP contents: {}", reason(&e)),
                );
                return summary.finish();
            }
        };

        let stats = &listing.stats;
        let mut summary = SummaryBuilder::new();
        summary
            .archive_header(base, family, content.len())
            .line(format_args!(
                "Files: {}, Directories: {}",
                stats.files, stats.directories
            ))
            .field("Total uncompressed", format_size(stats.total_size));
        if stats.total_size > 0 && stats.total_compressed > 0 {
            let ratio = stats.total_compressed as f64 / stats.total_size as f64 * 100.0;
            summary.field("Compression ratio", format_args!("{ratio:.1}%"));
        }
        if stats.encrypted {
            summary.field("Encrypted", "yes");
        }

        summary
            .top_level(stats)
            .histogram("Extension histogram", &stats.extensions, "")
            .largest(stats);
        if let Some(manifest) = &listing.manifest {
            summary.block("MANIFEST.MF", manifest);
        }
        if self.config.is_enhanced() {
            summary
                .time_range(stats)
                .histogram("Compression methods", &stats.methods, " files");
        }
        summary.finish()
    }

    fn summarize_compressed_tar(
        &self,
        base: &str,
        content: &[u8],
        family: ArchiveFamily,
        codec: CompressionCodec,
    ) -> String {
        match read_compressed_tar(content, codec, self.config.limits.largest_entries) {
            Ok(stats) => self.render_tar(base, family.name(), content.len(), &stats),
            Err(e) => {
                log::debug!("{base}: {e}");
                let mut summary = SummaryBuilder::new();
                summary
                    .archive_header(base, family, content.len())
                    .field("Error", format_args!("could not decompress: {}", reason(&e)));
                summary.finish()
            }
        }
    }

    fn summarize_stream(&self, base: &str, content: &[u8], codec: CompressionCodec) -> String {
        match resolve_stream(content, codec, self.config.limits.largest_entries) {
            Ok(StreamContents::Tar { family_name, stats }) => {
                self.render_tar(base, family_name, content.len(), &stats)
            }
            Ok(StreamContents::Raw {
                compressed,
                uncompressed,
            }) => {
                let mut summary = SummaryBuilder::new();
                summary
                    .field("Archive file", base)
                    .field("Format", codec)
                    .field("Compressed size", format_args!("{compressed} bytes"))
                    .field("Uncompressed size", format_args!("{uncompressed} bytes"));
                if codec == CompressionCodec::Gzip && uncompressed > 0 {
                    let ratio = compressed as f64 / uncompressed as f64 * 100.0;
                    summary.field("Compression ratio", format_args!("{ratio:.1}%"));
                }
                summary.finish()
            }
            Err(e) => {
                log::debug!("{base}: {e}");
                opaque_summary(base, codec.name(), content.len())
            }
        }
    }

    fn render_tar(&self, base: &str, format: &str, size: usize, stats: &ContainerStats) -> String {
        let mut summary = SummaryBuilder::new();
        summary.archive_header(base, format, size);
        if stats.links > 0 {
            summary.line(format_args!(
                "Files: {}, Directories: {}, Symlinks: {}",
                stats.files, stats.directories, stats.links
            ));
        } else {
            summary.line(format_args!(
                "Files: {}, Directories: {}",
                stats.files, stats.directories
            ));
        }
        summary
            .field("Total uncompressed", format_size(stats.total_size))
            .top_level(stats)
            .histogram("Extension histogram", &stats.extensions, "")
            .histogram("Ownership", &stats.owners, " entries")
            .histogram("Permissions", &stats.permissions, " entries")
            .largest(stats);
        if self.config.is_enhanced() {
            summary.time_range(stats);
        }
        summary.finish()
    }

    fn summarize_ar(&self, base: &str, content: &[u8]) -> String {
        let mut summary = SummaryBuilder::new();
        summary.archive_header(base, "deb (ar archive)", content.len());

        let members = match read_ar(content) {
            Ok(members) => members,
            Err(e) => {
                summary.field("Warning", reason(&e));
                return summary.finish();
            }
        };

        let enhanced = self.config.is_enhanced();
        summary.heading("Members");
        for member in &members {
            if enhanced && member.truncated {
                summary.item(format_args!(
                    "{} ({}) [truncated]",
                    member.name,
                    format_size(member.size)
                ));
            } else {
                summary.item(format_args!("{} ({})", member.name, format_size(member.size)));
            }
        }
        summary.finish()
    }
}

fn summarize_rpm(base: &str, content: &[u8]) -> String {
    let mut summary = SummaryBuilder::new();
    summary.archive_header(base, "RPM package", content.len());

    match read_rpm_lead(content) {
        Ok(lead) => {
            summary
                .field("RPM version", format_args!("{}.{}", lead.major, lead.minor))
                .field("Type", lead.package_type);
            if !lead.name.is_empty() {
                summary.field("Package name", &lead.name);
            }
        }
        Err(e) => {
            summary.field("Warning", reason(&e));
        }
    }
    summary.finish()
}

fn opaque_summary(base: &str, display: &str, size: usize) -> String {
    let mut summary = SummaryBuilder::new();
    summary
        .archive_header(base, display, size)
        .field("Note", "contents cannot be listed without external tools");
    summary.finish()
}

/// Returns the innermost message of `err`.
fn reason(err: &ExploreError) -> String {
    match err {
        ExploreError::InvalidArchive(reason) => reason.clone(),
        ExploreError::Decompression { source, .. } => source.to_string(),
        other => other.to_string(),
    }
}

impl Explorer for ArchiveExplorer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_handle(&self, path: &Path, content: &[u8]) -> bool {
        resolve_archive(path, content) != ArchiveFamily::Unknown
    }

    fn explore(&self, _ctx: &ExploreContext, input: &ExploreInput<'_>) -> Result<ExploreResult> {
        Ok(ExploreResult::new(self.summarize(input), Self::NAME))
    }
}
