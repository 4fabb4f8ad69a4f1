//! Test utilities for building in-memory fixtures.
//!
//! Builders for TAR, ZIP, `ar` and RPM-lead containers plus small helpers
//! for compressed streams and executable headers.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

/// Creates an in-memory TAR archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are created with mode 0o644.
///
/// # Examples
///
/// ```
/// use binscope_core::test_utils::create_test_tar;
///
/// let tar_data = create_test_tar(vec![("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// assert_eq!(&tar_data[257..262], b"ustar");
/// ```
#[must_use]
pub fn create_test_tar(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(TarTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Gzip-compresses `data`.
#[must_use]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Bzip2-compresses `data`.
#[must_use]
pub fn bzip2(data: &[u8]) -> Vec<u8> {
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Zstd-compresses `data`.
#[must_use]
pub fn zstd(data: &[u8]) -> Vec<u8> {
    zstd::encode_all(data, 3).unwrap()
}

/// Returns a minimal 64-bit little-endian ELF header followed by padding.
#[must_use]
pub fn elf_header() -> Vec<u8> {
    let mut data = vec![0u8; 128];
    data[..4].copy_from_slice(&[0x7f, b'E', b'L', b'F']);
    data[4] = 2; // ELFCLASS64
    data[5] = 1; // little endian
    data[6] = 1; // EV_CURRENT
    data[16] = 2; // ET_EXEC
    data[18] = 0x3e; // x86-64
    data
}

/// Builds a 96-byte RPM lead.
#[must_use]
pub fn rpm_lead(major: u8, minor: u8, kind: u16, name: &str) -> Vec<u8> {
    let mut lead = vec![0u8; 96];
    lead[..4].copy_from_slice(&[0xed, 0xab, 0xee, 0xdb]);
    lead[4] = major;
    lead[5] = minor;
    lead[6..8].copy_from_slice(&kind.to_be_bytes());
    let name = &name.as_bytes()[..name.len().min(66)];
    lead[10..10 + name.len()].copy_from_slice(name);
    lead
}

/// Builder for creating TAR test archives with various entry types.
///
/// # Examples
///
/// ```
/// use binscope_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_file("file.txt", b"content")
///     .add_directory("dir/")
///     .add_symlink("link", "file.txt")
///     .build();
/// assert!(!tar_data.is_empty());
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file owned by `root` with mode 0o644.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with(path, data, 0o644, Some("root"), 0, 1_600_000_000)
    }

    /// Adds a regular file with explicit metadata.
    #[must_use]
    pub fn add_file_with(
        mut self,
        path: &str,
        data: &[u8],
        mode: u32,
        owner: Option<&str>,
        uid: u64,
        mtime: u64,
    ) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_uid(uid);
        header.set_mtime(mtime);
        if let Some(owner) = owner {
            header.set_username(owner).unwrap();
        }
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory to the archive.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_mtime(1_600_000_000);
        header.set_username("root").unwrap();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symlink to the archive.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_mtime(1_600_000_000);
        header.set_username("root").unwrap();
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a hardlink to the archive.
    #[must_use]
    pub fn add_hardlink(mut self, path: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o644);
        header.set_mtime(1_600_000_000);
        header.set_username("root").unwrap();
        header.set_entry_type(tar::EntryType::Link);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Builds and returns the TAR archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating ZIP test archives.
///
/// # Examples
///
/// ```
/// use binscope_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .file("file.txt", b"content")
///     .directory("dir/")
///     .build();
/// assert_eq!(&zip_data[..4], b"PK\x03\x04");
/// ```
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a deflated file.
    #[must_use]
    pub fn file(self, path: &str, data: &[u8]) -> Self {
        self.add(path, data, zip::CompressionMethod::Deflated, None)
    }

    /// Adds a stored (uncompressed) file.
    #[must_use]
    pub fn stored_file(self, path: &str, data: &[u8]) -> Self {
        self.add(path, data, zip::CompressionMethod::Stored, None)
    }

    /// Adds a deflated file with an explicit modification time.
    #[must_use]
    pub fn file_at(self, path: &str, data: &[u8], modified: (u16, u8, u8, u8, u8, u8)) -> Self {
        let (year, month, day, hour, minute, second) = modified;
        let time =
            zip::DateTime::from_date_and_time(year, month, day, hour, minute, second).unwrap();
        self.add(path, data, zip::CompressionMethod::Deflated, Some(time))
    }

    /// Adds a directory to the archive.
    #[must_use]
    pub fn directory(mut self, path: &str) -> Self {
        use zip::write::SimpleFileOptions;

        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    fn add(
        mut self,
        path: &str,
        data: &[u8],
        method: zip::CompressionMethod,
        modified: Option<zip::DateTime>,
    ) -> Self {
        use zip::write::SimpleFileOptions;

        let mut options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(0o644);
        if let Some(time) = modified {
            options = options.last_modified_time(time);
        }

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Builds and returns the ZIP archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }

    /// Sets general-purpose bit 0 on every local and central header.
    pub fn set_encrypted_flag(data: &mut [u8]) {
        const LOCAL: &[u8] = b"PK\x03\x04";
        const CENTRAL: &[u8] = b"PK\x01\x02";

        let mut i = 0;
        while i + 4 <= data.len() {
            let flag_offset = if &data[i..i + 4] == LOCAL {
                Some(i + 6)
            } else if &data[i..i + 4] == CENTRAL {
                Some(i + 8)
            } else {
                None
            };
            if let Some(offset) = flag_offset.filter(|o| *o < data.len()) {
                data[offset] |= 0x01;
            }
            i += 1;
        }
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for Unix `ar` archives in the GNU layout.
///
/// # Examples
///
/// ```
/// use binscope_core::test_utils::ArTestBuilder;
///
/// let ar = ArTestBuilder::new().member("debian-binary", b"2.0\n").build();
/// assert!(ar.starts_with(b"!<arch>\n"));
/// ```
pub struct ArTestBuilder {
    data: Vec<u8>,
}

impl ArTestBuilder {
    /// Creates a builder holding only the global magic.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: b"!<arch>\n".to_vec(),
        }
    }

    /// Appends a member, padding odd payloads with one `\n`.
    #[must_use]
    pub fn member(mut self, name: &str, payload: &[u8]) -> Self {
        let header = format!(
            "{:<16}{:<12}{:<6}{:<6}{:<8}{:<10}`\n",
            format!("{name}/"),
            0,
            0,
            0,
            100_644,
            payload.len()
        );
        assert_eq!(header.len(), 60);
        self.data.extend_from_slice(header.as_bytes());
        self.data.extend_from_slice(payload);
        if payload.len() % 2 == 1 {
            self.data.push(b'\n');
        }
        self
    }

    /// Returns the archive bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

impl Default for ArTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
