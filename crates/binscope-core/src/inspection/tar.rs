//! Sequential TAR header walk.

use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;

use chrono::DateTime;
use chrono::Utc;

use super::stats::ContainerStats;
use super::stats::permission_string;
use crate::ExploreError;
use crate::Result;
use crate::formats::CompressionCodec;
use crate::types::ContainerEntry;
use crate::types::EntryKind;

/// Walks every TAR header readable from `reader`.
///
/// A header that cannot be parsed ends the walk; whatever was read before
/// it is returned.
pub fn read_tar<R: Read>(reader: R, largest_limit: usize) -> ContainerStats {
    let mut stats = ContainerStats::new(largest_limit);
    let mut archive = tar::Archive::new(reader);

    let entries = match archive.entries() {
        Ok(entries) => entries,
        Err(e) => {
            log::debug!("cannot iterate TAR entries: {e}");
            return stats;
        }
    };

    // Advancing the iterator drains the previous entry's body.
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("TAR walk stopped after {} entries: {e}", stats.entry_count());
                break;
            }
        };

        let header = entry.header();
        let kind = match header.entry_type() {
            tar::EntryType::Directory => EntryKind::Directory,
            tar::EntryType::Symlink => EntryKind::Symlink,
            tar::EntryType::Link => EntryKind::Hardlink,
            tar::EntryType::XGlobalHeader => continue,
            _ => EntryKind::File,
        };

        let owner = match header.username() {
            Ok(Some(name)) if !name.is_empty() => Some(name.to_string()),
            _ => header.uid().ok().map(|uid| format!("uid:{uid}")),
        };

        let record = ContainerEntry {
            name: String::from_utf8_lossy(&entry.path_bytes()).into_owned(),
            kind,
            size: entry.size(),
            compressed_size: None,
            method: None,
            modified: header.mtime().ok().and_then(unix_time),
            mode: header.mode().ok(),
            owner,
            encrypted: false,
        };
        fold_tar_entry(&mut stats, &record);
    }

    stats
}

/// Walks a TAR stream behind `codec`.
///
/// # Errors
///
/// Returns `ExploreError::Decompression` if the stream cannot be decoded
/// at all. Corruption after the first block only truncates the walk.
pub fn read_compressed_tar(
    content: &[u8],
    codec: CompressionCodec,
    largest_limit: usize,
) -> Result<ContainerStats> {
    let mut reader = BufReader::new(codec.decoder(content)?);
    reader
        .fill_buf()
        .map_err(|source| ExploreError::Decompression { codec, source })?;
    Ok(read_tar(reader, largest_limit))
}

/// Folds one TAR header into `stats`.
pub fn fold_tar_entry(stats: &mut ContainerStats, entry: &ContainerEntry) {
    let (first, nested) = entry.first_segment();
    if !first.is_empty() {
        if nested || entry.kind == EntryKind::Directory {
            stats.top_level.insert(format!("{first}/"));
        } else {
            stats.top_level.insert(first.to_string());
        }
    }

    match entry.kind {
        EntryKind::Directory => stats.directories += 1,
        EntryKind::Symlink | EntryKind::Hardlink => stats.links += 1,
        EntryKind::File => {
            stats.files += 1;
            stats.total_size += entry.size;
            if let Some(ext) = entry.extension() {
                stats.extensions.add(ext);
            }
            stats.largest.offer(&entry.name, entry.size);
        }
    }

    stats
        .permissions
        .add(permission_string(entry.mode.unwrap_or(0)));
    if let Some(owner) = &entry.owner {
        stats.owners.add(owner.as_str());
    }
    if let Some(modified) = entry.modified {
        stats.times.observe(modified);
    }
}

fn unix_time(secs: u64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(i64::try_from(secs).ok()?, 0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use crate::test_utils::gzip;

    fn sample_tar() -> Vec<u8> {
        TarTestBuilder::new()
            .add_directory("pkg/")
            .add_file("pkg/main.rs", &[0u8; 300])
            .add_file("pkg/util.rs", &[0u8; 100])
            .add_file_with("run.sh", b"#!/bin/sh\n", 0o755, None, 1000, 1_700_000_000)
            .add_symlink("latest", "pkg/main.rs")
            .build()
    }

    #[test]
    fn test_read_tar_counts() {
        let stats = read_tar(sample_tar().as_slice(), 5);
        assert_eq!(stats.files, 3);
        assert_eq!(stats.directories, 1);
        assert_eq!(stats.links, 1);
        assert_eq!(stats.total_size, 300 + 100 + 10);
        assert_eq!(stats.extensions.get(".rs"), 2);
        assert_eq!(stats.extensions.get(".sh"), 1);
    }

    #[test]
    fn test_read_tar_top_level() {
        let stats = read_tar(sample_tar().as_slice(), 5);
        let top: Vec<&str> = stats.top_level.iter().map(String::as_str).collect();
        assert_eq!(top, vec!["latest", "pkg/", "run.sh"]);
    }

    #[test]
    fn test_read_tar_owner_and_permissions() {
        let stats = read_tar(sample_tar().as_slice(), 5);
        assert_eq!(stats.owners.get("root"), 4);
        assert_eq!(stats.owners.get("uid:1000"), 1);
        assert_eq!(stats.permissions.get("-rwxr-xr-x"), 2);
        assert_eq!(stats.permissions.get("-rw-r--r--"), 2);
        assert_eq!(stats.permissions.get("-rwxrwxrwx"), 1);
    }

    #[test]
    fn test_read_tar_largest_files_only() {
        let stats = read_tar(sample_tar().as_slice(), 5);
        let names: Vec<&str> = stats
            .largest
            .entries()
            .iter()
            .map(|(n, _)| n.as_str())
            .collect();
        assert_eq!(names, vec!["pkg/main.rs", "pkg/util.rs", "run.sh"]);
    }

    #[test]
    fn test_read_tar_time_range() {
        let stats = read_tar(sample_tar().as_slice(), 5);
        let (min, max) = stats.times.spread().unwrap();
        assert_eq!(min.timestamp(), 1_600_000_000);
        assert_eq!(max.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_read_tar_truncated_keeps_prefix() {
        let data = TarTestBuilder::new()
            .add_file("a.txt", b"first")
            .add_file("b.txt", &[1u8; 2048])
            .build();
        // First header + its padded block + half of the second header.
        let truncated = &data[..512 + 512 + 256];
        let stats = read_tar(truncated, 5);
        assert_eq!(stats.files, 1);
        assert_eq!(stats.largest.entries()[0].0, "a.txt");
    }

    #[test]
    fn test_read_tar_garbage_is_empty() {
        let stats = read_tar(&b"not a tar archive at all"[..], 5);
        assert_eq!(stats.entry_count(), 0);
    }

    #[test]
    fn test_read_compressed_tar() {
        let stats = read_compressed_tar(&gzip(&sample_tar()), CompressionCodec::Gzip, 5).unwrap();
        assert_eq!(stats.files, 3);
    }

    #[test]
    fn test_read_compressed_tar_bad_stream() {
        let result = read_compressed_tar(b"not gzip", CompressionCodec::Gzip, 5);
        assert!(matches!(
            result,
            Err(ExploreError::Decompression {
                codec: CompressionCodec::Gzip,
                ..
            })
        ));
    }
}
