//! ZIP-family central directory walk.

use std::io::Cursor;
use std::io::Read;
use std::io::Seek;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::read::ZipFile;

use super::stats::ContainerStats;
use crate::ExploreError;
use crate::Result;
use crate::formats::ArchiveFamily;
use crate::types::ContainerEntry;
use crate::types::EntryKind;

/// Path of the Java manifest inside a JAR.
pub const JAR_MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Maximum number of manifest bytes read.
pub const MANIFEST_READ_LIMIT: u64 = 8 * 1024;

/// Result of walking a ZIP central directory.
#[derive(Debug, Clone)]
pub struct ZipListing {
    /// Aggregated entry statistics.
    pub stats: ContainerStats,

    /// Manifest text, when the family carries one and it could be read.
    pub manifest: Option<String>,
}

/// Reads the central directory of `content`.
///
/// Entries are opened in raw mode, so encrypted members and unsupported
/// compression methods never abort the walk.
///
/// # Errors
///
/// Returns `ExploreError::InvalidArchive` if the central directory cannot
/// be located or parsed.
pub fn read_zip(content: &[u8], family: ArchiveFamily, largest_limit: usize) -> Result<ZipListing> {
    let mut archive = ZipArchive::new(Cursor::new(content))
        .map_err(|e| ExploreError::InvalidArchive(e.to_string()))?;

    let mut stats = ContainerStats::new(largest_limit);
    let mut manifest_index = None;

    for i in 0..archive.len() {
        let entry = match archive.by_index_raw(i) {
            Ok(entry) => convert_zip_entry(&entry),
            Err(e) => {
                log::debug!("skipping unreadable ZIP entry {i}: {e}");
                continue;
            }
        };

        if family.has_jar_manifest()
            && entry.kind == EntryKind::File
            && entry.name.eq_ignore_ascii_case(JAR_MANIFEST_PATH)
        {
            manifest_index = Some(i);
        }

        fold_zip_entry(&mut stats, &entry);
    }

    let manifest = manifest_index.and_then(|i| read_manifest(&mut archive, i));
    Ok(ZipListing { stats, manifest })
}

/// Folds one central directory record into `stats`.
pub fn fold_zip_entry(stats: &mut ContainerStats, entry: &ContainerEntry) {
    let (first, nested) = entry.first_segment();

    if entry.kind == EntryKind::Directory {
        stats.directories += 1;
        if !first.is_empty() {
            stats.top_level.insert(format!("{first}/"));
        }
        return;
    }

    stats.files += 1;
    stats.total_size += entry.size;
    stats.total_compressed += entry.compressed_size.unwrap_or(0);

    if let Some(ext) = entry.extension() {
        stats.extensions.add(ext);
    }
    if let Some(method) = &entry.method {
        stats.methods.add(method.as_str());
    }

    if !nested {
        stats.top_level.insert(first.to_string());
    } else if !first.is_empty() {
        stats.top_level.insert(format!("{first}/"));
    }

    stats.largest.offer(&entry.name, entry.size);
    stats.encrypted |= entry.encrypted;
    if let Some(modified) = entry.modified {
        stats.times.observe(modified);
    }
}

/// Returns the display name of a ZIP compression method.
#[must_use]
#[allow(unreachable_patterns, deprecated)]
pub fn method_name(method: CompressionMethod) -> String {
    match method {
        CompressionMethod::Stored => "Store".to_string(),
        CompressionMethod::Deflated => "Deflate".to_string(),
        CompressionMethod::Unsupported(code) => format!("Method({code})"),
        other => format!("Method({other:?})"),
    }
}

fn convert_zip_entry<R: Read + Seek>(entry: &ZipFile<'_, R>) -> ContainerEntry {
    const S_IFMT: u32 = 0o170_000;
    const S_IFDIR: u32 = 0o040_000;

    let is_dir = entry.is_dir() || entry.unix_mode().is_some_and(|m| m & S_IFMT == S_IFDIR);
    let kind = if is_dir {
        EntryKind::Directory
    } else {
        EntryKind::File
    };

    ContainerEntry {
        name: entry.name().to_string(),
        kind,
        size: entry.size(),
        compressed_size: Some(entry.compressed_size()),
        method: Some(method_name(entry.compression())),
        modified: entry.last_modified().and_then(zip_time),
        mode: entry.unix_mode(),
        owner: None,
        encrypted: entry.encrypted(),
    }
}

fn zip_time(dt: zip::DateTime) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(
        i32::from(dt.year()),
        u32::from(dt.month()),
        u32::from(dt.day()),
    )?
    .and_hms_opt(
        u32::from(dt.hour()),
        u32::from(dt.minute()),
        u32::from(dt.second()),
    )
    .map(|naive| naive.and_utc())
}

fn read_manifest<R: Read + Seek>(archive: &mut ZipArchive<R>, index: usize) -> Option<String> {
    let entry = archive
        .by_index(index)
        .map_err(|e| log::debug!("cannot open {JAR_MANIFEST_PATH}: {e}"))
        .ok()?;

    let mut data = Vec::new();
    entry
        .take(MANIFEST_READ_LIMIT)
        .read_to_end(&mut data)
        .map_err(|e| log::debug!("cannot read {JAR_MANIFEST_PATH}: {e}"))
        .ok()?;

    Some(String::from_utf8_lossy(&data).into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::ZipTestBuilder;

    #[test]
    fn test_read_zip_counts_and_top_level() {
        let data = ZipTestBuilder::new()
            .directory("src/")
            .file("src/main.rs", b"fn main() {}")
            .file("src/lib.rs", b"pub fn f() {}")
            .file("README.md", b"# readme")
            .build();

        let listing = read_zip(&data, ArchiveFamily::Zip, 5).unwrap();
        let stats = listing.stats;
        assert_eq!(stats.files, 3);
        assert_eq!(stats.directories, 1);
        assert_eq!(stats.total_size, 12 + 13 + 8);
        assert!(stats.top_level.contains("src/"));
        assert!(stats.top_level.contains("README.md"));
        assert_eq!(stats.top_level.len(), 2);
        assert_eq!(stats.extensions.get(".rs"), 2);
        assert_eq!(stats.extensions.get(".md"), 1);
        assert!(!stats.encrypted);
        assert!(listing.manifest.is_none());
    }

    #[test]
    fn test_read_zip_methods() {
        let data = ZipTestBuilder::new()
            .file("a.txt", b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
            .stored_file("b.bin", b"raw")
            .build();

        let stats = read_zip(&data, ArchiveFamily::Zip, 5).unwrap().stats;
        assert_eq!(stats.methods.get("Deflate"), 1);
        assert_eq!(stats.methods.get("Store"), 1);
        assert!(stats.total_compressed > 0);
    }

    #[test]
    fn test_read_zip_jar_manifest() {
        let data = ZipTestBuilder::new()
            .directory("META-INF/")
            .file(
                "META-INF/MANIFEST.MF",
                b"Manifest-Version: 1.0\r\nMain-Class: com.example.App\r\n",
            )
            .file("com/example/App.class", &[0xca, 0xfe, 0xba, 0xbe])
            .build();

        let listing = read_zip(&data, ArchiveFamily::Jar, 5).unwrap();
        let manifest = listing.manifest.unwrap();
        assert!(manifest.contains("Main-Class: com.example.App"));

        let plain = read_zip(&data, ArchiveFamily::Zip, 5).unwrap();
        assert!(plain.manifest.is_none());
    }

    #[test]
    fn test_read_zip_invalid() {
        let result = read_zip(b"PK\x03\x04 definitely not a zip", ArchiveFamily::Zip, 5);
        assert!(matches!(result, Err(ExploreError::InvalidArchive(_))));
    }

    #[test]
    fn test_read_zip_encrypted_flag() {
        let mut data = ZipTestBuilder::new().stored_file("secret.txt", b"x").build();
        ZipTestBuilder::set_encrypted_flag(&mut data);

        let stats = read_zip(&data, ArchiveFamily::Zip, 5).unwrap().stats;
        assert!(stats.encrypted);
        assert_eq!(stats.files, 1);
    }

    #[test]
    #[allow(deprecated)]
    fn test_method_name() {
        assert_eq!(method_name(CompressionMethod::Stored), "Store");
        assert_eq!(method_name(CompressionMethod::Deflated), "Deflate");
        assert_eq!(method_name(CompressionMethod::Unsupported(99)), "Method(99)");
    }

    #[test]
    fn test_fold_nested_directory_only_records_first_segment() {
        let mut stats = ContainerStats::new(5);
        fold_zip_entry(
            &mut stats,
            &ContainerEntry::new("a/b/c/", EntryKind::Directory, 0),
        );
        assert_eq!(stats.top_level.iter().collect::<Vec<_>>(), vec!["a/"]);
    }
}
