//! Archive format detection.
//!
//! Resolution order is compound suffix, then single extension, then magic
//! bytes. A `.gz` suffix alone is ambiguous (plain gzip or a tarball), so
//! compound suffixes must win before the single-extension table is
//! consulted.

use std::fmt;
use std::path::Path;

use super::compression::CompressionCodec;
use super::signatures::ARCHIVE_EXTENSIONS;
use super::signatures::ARCHIVE_MAGIC;
use super::signatures::COMPOUND_EXTENSIONS;
use super::signatures::first_match;
use super::signatures::lookup_extension;

/// Archive family identified for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFamily {
    /// Generic ZIP archive.
    Zip,
    /// Java archive.
    Jar,
    /// Java web application archive.
    War,
    /// Java enterprise archive.
    Ear,
    /// Android package.
    Apk,
    /// iOS application archive.
    Ipa,
    /// NuGet package.
    Nupkg,
    /// Chrome extension.
    Crx,
    /// Firefox extension.
    Xpi,
    /// Visual Studio extension.
    Vsix,
    /// Uncompressed tar archive.
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
    /// Bzip2-compressed tar archive.
    TarBz2,
    /// Zstd-compressed tar archive.
    TarZst,
    /// XZ-compressed tar archive (identified only).
    TarXz,
    /// Lzip-compressed tar archive (identified only).
    TarLz,
    /// LZ4-compressed tar archive (identified only).
    TarLz4,
    /// Standalone gzip stream.
    Gzip,
    /// Standalone bzip2 stream.
    Bzip2,
    /// Standalone zstd stream.
    Zstd,
    /// Unix `ar` archive.
    Ar,
    /// Debian package (an `ar` archive).
    Deb,
    /// RPM package.
    Rpm,
    /// 7-Zip archive.
    SevenZ,
    /// RAR archive.
    Rar,
    /// Standalone XZ stream.
    Xz,
    /// Standalone lzip stream.
    Lz,
    /// Standalone LZ4 stream.
    Lz4,
    /// Microsoft cabinet.
    Cab,
    /// CPIO archive.
    Cpio,
    /// ISO 9660 image.
    Iso,
    /// Apple disk image.
    Dmg,
    /// Windows imaging format.
    Wim,
    /// Nothing matched.
    Unknown,
}

/// How an archive family is inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// ZIP central directory.
    Zip,
    /// Uncompressed tar stream.
    Tar,
    /// Tar stream behind a known codec.
    CompressedTar(CompressionCodec),
    /// Standalone stream that may or may not wrap a tar archive.
    Compressed(CompressionCodec),
    /// `ar` member headers.
    Ar,
    /// RPM lead.
    Rpm,
    /// Identified but not listed.
    Opaque,
}

impl ArchiveFamily {
    /// Returns the display name of this family.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Jar => "jar",
            Self::War => "war",
            Self::Ear => "ear",
            Self::Apk => "apk",
            Self::Ipa => "ipa",
            Self::Nupkg => "nupkg",
            Self::Crx => "crx",
            Self::Xpi => "xpi",
            Self::Vsix => "vsix",
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarZst => "tar.zst",
            Self::TarXz => "tar.xz",
            Self::TarLz => "tar.lz",
            Self::TarLz4 => "tar.lz4",
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Zstd => "zstd",
            Self::Ar => "ar",
            Self::Deb => "deb",
            Self::Rpm => "rpm",
            Self::SevenZ => "7z",
            Self::Rar => "rar",
            Self::Xz => "xz",
            Self::Lz => "lz",
            Self::Lz4 => "lz4",
            Self::Cab => "cab",
            Self::Cpio => "cpio",
            Self::Iso => "iso",
            Self::Dmg => "dmg",
            Self::Wim => "wim",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the inspection layout used for this family.
    #[must_use]
    pub const fn layout(self) -> Layout {
        match self {
            Self::Zip
            | Self::Jar
            | Self::War
            | Self::Ear
            | Self::Apk
            | Self::Ipa
            | Self::Nupkg
            | Self::Crx
            | Self::Xpi
            | Self::Vsix => Layout::Zip,
            Self::Tar => Layout::Tar,
            Self::TarGz => Layout::CompressedTar(CompressionCodec::Gzip),
            Self::TarBz2 => Layout::CompressedTar(CompressionCodec::Bzip2),
            Self::TarZst => Layout::CompressedTar(CompressionCodec::Zstd),
            Self::Gzip => Layout::Compressed(CompressionCodec::Gzip),
            Self::Bzip2 => Layout::Compressed(CompressionCodec::Bzip2),
            Self::Zstd => Layout::Compressed(CompressionCodec::Zstd),
            Self::Ar | Self::Deb => Layout::Ar,
            Self::Rpm => Layout::Rpm,
            Self::TarXz
            | Self::TarLz
            | Self::TarLz4
            | Self::SevenZ
            | Self::Rar
            | Self::Xz
            | Self::Lz
            | Self::Lz4
            | Self::Cab
            | Self::Cpio
            | Self::Iso
            | Self::Dmg
            | Self::Wim
            | Self::Unknown => Layout::Opaque,
        }
    }

    /// Returns `true` if this family carries a Java-style manifest.
    #[must_use]
    pub const fn has_jar_manifest(self) -> bool {
        matches!(self, Self::Jar)
    }
}

impl fmt::Display for ArchiveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the lowercase extension of `path` without the dot.
pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Resolves the archive family of `path` and `content`.
///
/// Total and deterministic: returns [`ArchiveFamily::Unknown`] when nothing
/// matches.
///
/// # Examples
///
/// ```
/// use binscope_core::formats::detect::{ArchiveFamily, resolve_archive};
/// use std::path::Path;
///
/// let gzip_bytes = [0x1f, 0x8b, 0x08, 0x00];
/// assert_eq!(
///     resolve_archive(Path::new("backup.tar.gz"), &gzip_bytes),
///     ArchiveFamily::TarGz
/// );
/// assert_eq!(resolve_archive(Path::new("blob"), &gzip_bytes), ArchiveFamily::Gzip);
/// ```
#[must_use]
pub fn resolve_archive(path: &Path, content: &[u8]) -> ArchiveFamily {
    let lower = path.to_string_lossy().to_ascii_lowercase();
    if let Some((_, family)) = COMPOUND_EXTENSIONS
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
    {
        return *family;
    }

    if let Some(family) =
        lowercase_extension(path).and_then(|ext| lookup_extension(ARCHIVE_EXTENSIONS, &ext))
    {
        return family;
    }

    detect_archive_magic(content).unwrap_or(ArchiveFamily::Unknown)
}

/// Returns the archive family indicated by magic bytes alone.
#[must_use]
pub fn detect_archive_magic(content: &[u8]) -> Option<ArchiveFamily> {
    first_match(ARCHIVE_MAGIC, content).map(|sig| sig.kind)
}

/// Returns the display name of the first archive signature in `content`.
#[must_use]
pub fn archive_magic_name(content: &[u8]) -> Option<&'static str> {
    first_match(ARCHIVE_MAGIC, content).map(|sig| sig.name)
}
