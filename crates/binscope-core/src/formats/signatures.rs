//! Static signature catalog.
//!
//! Extension tables and magic-byte signatures for archive and executable
//! formats. Everything here is `const` data: built at compile time, never
//! mutated, and shared by every resolution call.

use super::detect::ArchiveFamily;
use super::executable::BinaryMagicKind;
use super::executable::ExecutableFamily;

/// A magic-byte pattern expected at a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicSignature<T> {
    /// Human-readable signature name.
    pub name: &'static str,
    /// Byte offset where `pattern` must appear.
    pub offset: usize,
    /// Expected bytes.
    pub pattern: &'static [u8],
    /// Value reported on a match.
    pub kind: T,
}

impl<T> MagicSignature<T> {
    /// Returns `true` if `content` carries this signature.
    #[must_use]
    pub fn matches(&self, content: &[u8]) -> bool {
        content
            .get(self.offset..self.offset + self.pattern.len())
            .is_some_and(|window| window == self.pattern)
    }
}

/// Returns the first signature in `table` matching `content`.
pub fn first_match<'t, T>(
    table: &'t [MagicSignature<T>],
    content: &[u8],
) -> Option<&'t MagicSignature<T>> {
    table.iter().find(|sig| sig.matches(content))
}

/// Byte offset of the `ustar` marker inside a TAR header.
pub const TAR_MAGIC_OFFSET: usize = 257;

/// TAR header marker shared by POSIX ustar and GNU tar.
pub const TAR_MAGIC: &[u8] = b"ustar";

/// Archive magic signatures, checked in order.
pub const ARCHIVE_MAGIC: &[MagicSignature<ArchiveFamily>] = &[
    MagicSignature {
        name: "ZIP",
        offset: 0,
        pattern: b"PK\x03\x04",
        kind: ArchiveFamily::Zip,
    },
    MagicSignature {
        name: "gzip",
        offset: 0,
        pattern: &[0x1f, 0x8b],
        kind: ArchiveFamily::Gzip,
    },
    MagicSignature {
        name: "RAR",
        offset: 0,
        pattern: b"Rar!\x1a\x07",
        kind: ArchiveFamily::Rar,
    },
    MagicSignature {
        name: "7z",
        offset: 0,
        pattern: &[b'7', b'z', 0xbc, 0xaf, 0x27, 0x1c],
        kind: ArchiveFamily::SevenZ,
    },
    MagicSignature {
        name: "XZ",
        offset: 0,
        pattern: &[0xfd, b'7', b'z', b'X', b'Z', 0x00],
        kind: ArchiveFamily::Xz,
    },
    MagicSignature {
        name: "bzip2",
        offset: 0,
        pattern: b"BZ",
        kind: ArchiveFamily::Bzip2,
    },
    MagicSignature {
        name: "LZ4",
        offset: 0,
        pattern: &[0x04, 0x22, 0x4d, 0x18],
        kind: ArchiveFamily::Lz4,
    },
    MagicSignature {
        name: "zstd",
        offset: 0,
        pattern: &[0x28, 0xb5, 0x2f, 0xfd],
        kind: ArchiveFamily::Zstd,
    },
    MagicSignature {
        name: "deb/ar",
        offset: 0,
        pattern: b"!<arch>\n",
        kind: ArchiveFamily::Deb,
    },
    MagicSignature {
        name: "RPM",
        offset: 0,
        pattern: &[0xed, 0xab, 0xee, 0xdb],
        kind: ArchiveFamily::Rpm,
    },
    MagicSignature {
        name: "TAR",
        offset: TAR_MAGIC_OFFSET,
        pattern: TAR_MAGIC,
        kind: ArchiveFamily::Tar,
    },
];

/// Compound archive suffixes, checked before any single extension.
pub const COMPOUND_EXTENSIONS: &[(&str, ArchiveFamily)] = &[
    (".tar.gz", ArchiveFamily::TarGz),
    (".tar.bz2", ArchiveFamily::TarBz2),
    (".tar.xz", ArchiveFamily::TarXz),
    (".tar.lz", ArchiveFamily::TarLz),
    (".tar.lz4", ArchiveFamily::TarLz4),
    (".tar.zst", ArchiveFamily::TarZst),
];

/// Single archive extensions (lowercase, without the dot).
pub const ARCHIVE_EXTENSIONS: &[(&str, ArchiveFamily)] = &[
    ("zip", ArchiveFamily::Zip),
    ("jar", ArchiveFamily::Jar),
    ("war", ArchiveFamily::War),
    ("ear", ArchiveFamily::Ear),
    ("apk", ArchiveFamily::Apk),
    ("ipa", ArchiveFamily::Ipa),
    ("nupkg", ArchiveFamily::Nupkg),
    ("crx", ArchiveFamily::Crx),
    ("xpi", ArchiveFamily::Xpi),
    ("vsix", ArchiveFamily::Vsix),
    ("tar", ArchiveFamily::Tar),
    ("gz", ArchiveFamily::Gzip),
    ("tgz", ArchiveFamily::TarGz),
    ("bz2", ArchiveFamily::Bzip2),
    ("xz", ArchiveFamily::Xz),
    ("lz", ArchiveFamily::Lz),
    ("lz4", ArchiveFamily::Lz4),
    ("zst", ArchiveFamily::Zstd),
    ("7z", ArchiveFamily::SevenZ),
    ("rar", ArchiveFamily::Rar),
    ("cab", ArchiveFamily::Cab),
    ("ar", ArchiveFamily::Ar),
    ("deb", ArchiveFamily::Deb),
    ("rpm", ArchiveFamily::Rpm),
    ("cpio", ArchiveFamily::Cpio),
    ("iso", ArchiveFamily::Iso),
    ("dmg", ArchiveFamily::Dmg),
    ("wim", ArchiveFamily::Wim),
];

/// Executable extensions (lowercase, without the dot).
///
/// `.deb`, `.rpm`, `.dmg` and `.jar` are deliberately absent: they belong to
/// the archive tables.
pub const EXECUTABLE_EXTENSIONS: &[(&str, ExecutableFamily)] = &[
    ("exe", ExecutableFamily::Pe),
    ("dll", ExecutableFamily::Pe),
    ("so", ExecutableFamily::Elf),
    ("dylib", ExecutableFamily::MachO),
    ("a", ExecutableFamily::Static),
    ("lib", ExecutableFamily::Static),
    ("o", ExecutableFamily::Object),
    ("obj", ExecutableFamily::Object),
    ("ko", ExecutableFamily::Elf),
    ("sys", ExecutableFamily::Pe),
    ("com", ExecutableFamily::Dos),
    ("bin", ExecutableFamily::Raw),
    ("elf", ExecutableFamily::Elf),
    ("wasm", ExecutableFamily::Wasm),
    ("class", ExecutableFamily::Java),
    ("pyc", ExecutableFamily::Pyc),
    ("pyo", ExecutableFamily::Pyc),
];

/// Shared 4-byte magic of Mach-O Universal binaries and Java class files.
pub const CAFEBABE: &[u8] = &[0xca, 0xfe, 0xba, 0xbe];

/// Executable magic signatures, checked in order.
///
/// `CAFEBABE` stays last; a match on it needs disambiguation.
pub const EXECUTABLE_MAGIC: &[MagicSignature<BinaryMagicKind>] = &[
    MagicSignature {
        name: "ELF",
        offset: 0,
        pattern: &[0x7f, b'E', b'L', b'F'],
        kind: BinaryMagicKind::Elf,
    },
    MagicSignature {
        name: "PE/MZ",
        offset: 0,
        pattern: b"MZ",
        kind: BinaryMagicKind::Pe,
    },
    MagicSignature {
        name: "Mach-O 32",
        offset: 0,
        pattern: &[0xfe, 0xed, 0xfa, 0xce],
        kind: BinaryMagicKind::MachO32,
    },
    MagicSignature {
        name: "Mach-O 64",
        offset: 0,
        pattern: &[0xfe, 0xed, 0xfa, 0xcf],
        kind: BinaryMagicKind::MachO64,
    },
    MagicSignature {
        name: "WASM",
        offset: 0,
        pattern: b"\x00asm",
        kind: BinaryMagicKind::Wasm,
    },
    MagicSignature {
        name: "CAFEBABE",
        offset: 0,
        pattern: CAFEBABE,
        kind: BinaryMagicKind::Cafebabe,
    },
];

/// Looks up `ext` (already lowercased) in an extension table.
pub fn lookup_extension<T: Copy>(table: &[(&str, T)], ext: &str) -> Option<T> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_matches_at_offset() {
        let mut content = vec![0u8; 300];
        content[257..262].copy_from_slice(b"ustar");
        let sig = ARCHIVE_MAGIC.last().copied();
        assert!(sig.is_some_and(|s| s.matches(&content)));
    }

    #[test]
    fn test_signature_short_content_never_matches() {
        let content = b"usta";
        assert!(first_match(ARCHIVE_MAGIC, content).is_none());
        assert!(first_match(ARCHIVE_MAGIC, &[]).is_none());
    }

    #[test]
    fn test_first_match_respects_order() {
        let found = first_match(ARCHIVE_MAGIC, b"PK\x03\x04rest");
        assert_eq!(found.map(|s| s.name), Some("ZIP"));
    }

    #[test]
    fn test_extension_tables_are_lowercase_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for (ext, _) in ARCHIVE_EXTENSIONS {
            assert_eq!(*ext, ext.to_ascii_lowercase());
            assert!(seen.insert(*ext), "duplicate archive extension {ext}");
        }
        for (ext, _) in EXECUTABLE_EXTENSIONS {
            assert!(
                !seen.contains(ext),
                "extension {ext} claimed by both tables"
            );
        }
    }

    #[test]
    fn test_cafebabe_is_last_executable_signature() {
        assert_eq!(EXECUTABLE_MAGIC.last().map(|s| s.name), Some("CAFEBABE"));
    }

    #[test]
    fn test_lookup_extension() {
        assert_eq!(
            lookup_extension(ARCHIVE_EXTENSIONS, "tgz"),
            Some(ArchiveFamily::TarGz)
        );
        assert_eq!(
            lookup_extension(EXECUTABLE_EXTENSIONS, "pyo"),
            Some(ExecutableFamily::Pyc)
        );
        assert_eq!(lookup_extension(ARCHIVE_EXTENSIONS, "txt"), None);
    }
}
