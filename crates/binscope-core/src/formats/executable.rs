//! Executable format detection.
//!
//! Extension dispatch always runs before magic-byte dispatch. The one
//! signature that needs extra work is `0xCAFEBABE`, shared by Mach-O
//! Universal binaries and Java class files; see [`disambiguate_cafebabe`].

use std::fmt;
use std::path::Path;

use super::detect::lowercase_extension;
use super::signatures::EXECUTABLE_EXTENSIONS;
use super::signatures::EXECUTABLE_MAGIC;
use super::signatures::first_match;
use super::signatures::lookup_extension;

/// Executable family derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutableFamily {
    /// ELF object, shared library or kernel module.
    Elf,
    /// PE/COFF image.
    Pe,
    /// Mach-O dynamic library.
    MachO,
    /// Static library.
    Static,
    /// Relocatable object file.
    Object,
    /// DOS COM program.
    Dos,
    /// Raw binary image.
    Raw,
    /// WebAssembly module.
    Wasm,
    /// Java class file.
    Java,
    /// Python bytecode.
    Pyc,
}

/// Raw signature kind as stored in the magic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryMagicKind {
    /// `7f 45 4c 46`.
    Elf,
    /// `4d 5a`.
    Pe,
    /// `fe ed fa ce`.
    MachO32,
    /// `fe ed fa cf`.
    MachO64,
    /// `00 61 73 6d`.
    Wasm,
    /// `ca fe ba be`, resolved by [`disambiguate_cafebabe`].
    Cafebabe,
}

/// Executable format derived from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryMagic {
    /// ELF.
    Elf,
    /// PE/COFF (MZ stub).
    Pe,
    /// 32-bit Mach-O.
    MachO32,
    /// 64-bit Mach-O.
    MachO64,
    /// WebAssembly module.
    Wasm,
    /// Mach-O Universal (fat) binary.
    MachOUniversal,
    /// Java class file.
    JavaClass,
    /// `0xCAFEBABE` with no decisive version/arch-count field.
    UniversalOrJavaAmbiguous,
}

impl BinaryMagic {
    /// Returns the display name of this format.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Elf => "ELF",
            Self::Pe => "PE/COFF",
            Self::MachO32 => "Mach-O 32-bit",
            Self::MachO64 => "Mach-O 64-bit",
            Self::Wasm => "WebAssembly",
            Self::MachOUniversal => "Mach-O Universal",
            Self::JavaClass => "Java class",
            Self::UniversalOrJavaAmbiguous => "Mach-O Universal or Java class (ambiguous)",
        }
    }
}

impl fmt::Display for BinaryMagic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Tool family selected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolHint {
    /// ELF tooling (`readelf`, `ldd`).
    Elf,
    /// PE tooling (`objdump`).
    Pe,
    /// Mach-O tooling (`otool`).
    MachO,
    /// WebAssembly; no format-specific tooling.
    Wasm,
}

impl ToolHint {
    /// Returns the tool hint for a magic-table kind.
    #[must_use]
    pub const fn from_magic_kind(kind: BinaryMagicKind) -> Self {
        match kind {
            BinaryMagicKind::Elf => Self::Elf,
            BinaryMagicKind::Pe => Self::Pe,
            BinaryMagicKind::MachO32 | BinaryMagicKind::MachO64 | BinaryMagicKind::Cafebabe => {
                Self::MachO
            }
            BinaryMagicKind::Wasm => Self::Wasm,
        }
    }
}

/// Resolves a `0xCAFEBABE` buffer to a Mach-O Universal binary or a Java
/// class file.
///
/// The big-endian `u32` at offset 4 is an architecture count for fat
/// binaries (small) and `minor << 16 | major` for class files (major 45 and
/// up). Values from 20 to 44 are left ambiguous.
///
/// # Examples
///
/// ```
/// use binscope_core::formats::executable::{BinaryMagic, disambiguate_cafebabe};
///
/// let fat = [0xca, 0xfe, 0xba, 0xbe, 0, 0, 0, 2];
/// assert_eq!(disambiguate_cafebabe(&fat), BinaryMagic::MachOUniversal);
///
/// let class = [0xca, 0xfe, 0xba, 0xbe, 0, 0, 0, 0x34];
/// assert_eq!(disambiguate_cafebabe(&class), BinaryMagic::JavaClass);
/// ```
#[must_use]
pub fn disambiguate_cafebabe(content: &[u8]) -> BinaryMagic {
    let Some(field) = content.get(4..8) else {
        return BinaryMagic::UniversalOrJavaAmbiguous;
    };
    let value = u32::from_be_bytes([field[0], field[1], field[2], field[3]]);

    if value < 20 {
        BinaryMagic::MachOUniversal
    } else if value >= 45 {
        BinaryMagic::JavaClass
    } else {
        BinaryMagic::UniversalOrJavaAmbiguous
    }
}

/// Returns the executable format indicated by magic bytes alone.
#[must_use]
pub fn detect_binary_magic(content: &[u8]) -> Option<BinaryMagic> {
    first_match(EXECUTABLE_MAGIC, content).map(|sig| match sig.kind {
        BinaryMagicKind::Elf => BinaryMagic::Elf,
        BinaryMagicKind::Pe => BinaryMagic::Pe,
        BinaryMagicKind::MachO32 => BinaryMagic::MachO32,
        BinaryMagicKind::MachO64 => BinaryMagic::MachO64,
        BinaryMagicKind::Wasm => BinaryMagic::Wasm,
        BinaryMagicKind::Cafebabe => disambiguate_cafebabe(content),
    })
}

/// Returns the tool family for `content`, if its magic bytes name one.
#[must_use]
pub fn detect_tool_hint(content: &[u8]) -> Option<ToolHint> {
    first_match(EXECUTABLE_MAGIC, content).map(|sig| ToolHint::from_magic_kind(sig.kind))
}

/// Result of executable resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecutable {
    /// Lowercase extension without the dot, empty when absent.
    pub extension: String,
    /// Family from the extension table.
    pub family: Option<ExecutableFamily>,
    /// Format from magic bytes.
    pub magic: Option<BinaryMagic>,
    /// Tool family from magic bytes.
    pub tool_hint: Option<ToolHint>,
}

impl ResolvedExecutable {
    /// Returns `true` if either the extension or the magic bytes matched.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        self.family.is_some() || self.magic.is_some()
    }

    /// Returns the human-readable format line.
    #[must_use]
    pub fn display_name(&self) -> String {
        let ext = self.extension.as_str();
        let with_ext = |base: &str| {
            if ext.is_empty() {
                base.to_string()
            } else {
                format!("{base} ({ext})")
            }
        };
        let magic_or = |fallback: &str| {
            self.magic
                .map_or_else(|| fallback.to_string(), |m| m.display_name().to_string())
        };

        match self.family {
            Some(ExecutableFamily::Elf) => with_ext("ELF"),
            Some(ExecutableFamily::Pe) => with_ext("PE/COFF"),
            Some(ExecutableFamily::MachO) => "Mach-O dynamic library".to_string(),
            Some(ExecutableFamily::Static) => with_ext("Static library"),
            Some(ExecutableFamily::Object) => with_ext("Object file"),
            Some(ExecutableFamily::Dos) => "DOS COM".to_string(),
            Some(ExecutableFamily::Raw) => magic_or("Raw binary"),
            Some(ExecutableFamily::Wasm) => "WebAssembly".to_string(),
            Some(ExecutableFamily::Java) => "Java class".to_string(),
            Some(ExecutableFamily::Pyc) => "Python bytecode".to_string(),
            None => magic_or("Unknown executable"),
        }
    }
}

/// Resolves the executable format of `path` and `content`.
#[must_use]
pub fn resolve_executable(path: &Path, content: &[u8]) -> ResolvedExecutable {
    let extension = lowercase_extension(path).unwrap_or_default();
    let family = lookup_extension(EXECUTABLE_EXTENSIONS, &extension);
    ResolvedExecutable {
        extension,
        family,
        magic: detect_binary_magic(content),
        tool_hint: detect_tool_hint(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAFEBABE: [u8; 4] = [0xca, 0xfe, 0xba, 0xbe];

    fn cafebabe_with(value: u32) -> Vec<u8> {
        let mut content = CAFEBABE.to_vec();
        content.extend_from_slice(&value.to_be_bytes());
        content
    }

    fn display(name: &str, content: &[u8]) -> String {
        resolve_executable(Path::new(name), content).display_name()
    }

    #[test]
    fn test_cafebabe_universal() {
        assert_eq!(
            disambiguate_cafebabe(&cafebabe_with(2)),
            BinaryMagic::MachOUniversal
        );
        assert_eq!(
            disambiguate_cafebabe(&cafebabe_with(19)),
            BinaryMagic::MachOUniversal
        );
    }

    #[test]
    fn test_cafebabe_java() {
        assert_eq!(
            disambiguate_cafebabe(&cafebabe_with(0x34)),
            BinaryMagic::JavaClass
        );
        assert_eq!(
            disambiguate_cafebabe(&cafebabe_with(45)),
            BinaryMagic::JavaClass
        );
    }

    #[test]
    fn test_cafebabe_ambiguous() {
        assert_eq!(
            disambiguate_cafebabe(&CAFEBABE),
            BinaryMagic::UniversalOrJavaAmbiguous
        );
        assert_eq!(
            disambiguate_cafebabe(&cafebabe_with(30)),
            BinaryMagic::UniversalOrJavaAmbiguous
        );
        assert_eq!(
            disambiguate_cafebabe(&cafebabe_with(20)),
            BinaryMagic::UniversalOrJavaAmbiguous
        );
        assert_eq!(
            disambiguate_cafebabe(&cafebabe_with(44)),
            BinaryMagic::UniversalOrJavaAmbiguous
        );
    }

    #[test]
    fn test_class_extension_wins_over_fat_magic() {
        assert_eq!(display("Foo.class", &cafebabe_with(2)), "Java class");
        assert_eq!(display("Foo", &cafebabe_with(2)), "Mach-O Universal");
    }

    #[test]
    fn test_display_names_with_extension() {
        assert_eq!(display("libc.so", &[]), "ELF (so)");
        assert_eq!(display("APP.EXE", &[]), "PE/COFF (exe)");
        assert_eq!(display("libm.a", &[]), "Static library (a)");
        assert_eq!(display("main.o", &[]), "Object file (o)");
        assert_eq!(display("libz.dylib", &[]), "Mach-O dynamic library");
        assert_eq!(display("cmd.com", &[]), "DOS COM");
        assert_eq!(display("mod.wasm", &[]), "WebAssembly");
        assert_eq!(display("mod.pyc", &[]), "Python bytecode");
    }

    #[test]
    fn test_raw_uses_magic_when_present() {
        assert_eq!(display("firmware.bin", b"\x7fELF\x02\x01"), "ELF");
        assert_eq!(display("firmware.bin", b"zz"), "Raw binary");
    }

    #[test]
    fn test_no_extension_uses_magic() {
        assert_eq!(display("a.out", b"\x7fELF"), "ELF");
        assert_eq!(display("prog", b"MZ\x90\x00"), "PE/COFF");
        assert_eq!(display("prog", &[0xfe, 0xed, 0xfa, 0xcf]), "Mach-O 64-bit");
        assert_eq!(display("prog", &[0xfe, 0xed, 0xfa, 0xce]), "Mach-O 32-bit");
        assert_eq!(display("prog", b"\x00asm\x01"), "WebAssembly");
        assert_eq!(display("prog", b"plain text"), "Unknown executable");
    }

    #[test]
    fn test_is_recognized() {
        assert!(resolve_executable(Path::new("x.dll"), &[]).is_recognized());
        assert!(resolve_executable(Path::new("x"), b"\x7fELF").is_recognized());
        assert!(!resolve_executable(Path::new("x.txt"), b"hello").is_recognized());
    }

    #[test]
    fn test_tool_hint_from_magic_only() {
        assert_eq!(detect_tool_hint(b"\x7fELF"), Some(ToolHint::Elf));
        assert_eq!(detect_tool_hint(b"MZ"), Some(ToolHint::Pe));
        assert_eq!(detect_tool_hint(&CAFEBABE), Some(ToolHint::MachO));
        assert_eq!(detect_tool_hint(b"\x00asm"), Some(ToolHint::Wasm));
        assert_eq!(
            resolve_executable(Path::new("libc.so"), b"junk").tool_hint,
            None
        );
    }
}
