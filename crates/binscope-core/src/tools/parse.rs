//! Parsers for external tool output.
//!
//! Every parser is total: unrecognized lines are skipped.

use once_cell::sync::Lazy;
use regex::Regex;

/// Dependency lists stop growing at this length.
pub const MAX_DEPENDENCIES: usize = 20;

/// Longer `strings` lines are never reported.
pub const MAX_STRING_LINE_LEN: usize = 160;

/// Minimum run length passed to `strings`.
pub const MIN_STRING_LEN: usize = 6;

#[allow(clippy::expect_used)]
static ELF_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\s*\d+\]\s+(\S+)\s+(\S+)").expect("section regex is valid")
});

#[allow(clippy::expect_used)]
static INTERESTING_STRINGS: Lazy<[Regex; 5]> = Lazy::new(|| {
    [
        r"(?i)^https?://",
        r"^/[a-z]",
        r"(?i)^(error|fatal|warning|warn|panic|fail)",
        r"(?i)^v?\d+\.\d+\.\d+",
        r"(?i)(version|copyright|license|author)",
    ]
    .map(|pattern| Regex::new(pattern).expect("string filter regex is valid"))
});

fn push_capped(deps: &mut Vec<String>, dep: &str) -> bool {
    deps.push(dep.to_string());
    deps.len() >= MAX_DEPENDENCIES
}

/// Extracts `NEEDED` library names from `readelf -d`.
///
/// ```text
///  0x0000000000000001 (NEEDED)             Shared library: [libc.so.6]
/// ```
#[must_use]
pub fn parse_elf_deps(output: &str) -> Vec<String> {
    let mut deps = Vec::new();
    for line in output.lines().filter(|l| l.contains("NEEDED")) {
        let (Some(start), Some(end)) = (line.find('['), line.find(']')) else {
            continue;
        };
        if end > start && push_capped(&mut deps, &line[start + 1..end]) {
            break;
        }
    }
    deps
}

/// Extracts library names from `ldd`, skipping virtual DSOs.
#[must_use]
pub fn parse_ldd_deps(output: &str) -> Vec<String> {
    let mut deps = Vec::new();
    for line in output.lines().map(str::trim) {
        if line.is_empty() || line.contains("linux-vdso") || line.contains("linux-gate") {
            continue;
        }
        if let Some(first) = line.split_whitespace().next()
            && push_capped(&mut deps, first)
        {
            break;
        }
    }
    deps
}

/// Extracts install names from `otool -L`; the first line names the binary
/// itself.
#[must_use]
pub fn parse_macho_deps(output: &str) -> Vec<String> {
    let mut deps = Vec::new();
    for line in output.lines().skip(1).map(str::trim) {
        if line.is_empty() {
            continue;
        }
        let dep = match line.find(" (compatibility").or_else(|| line.find(" (")) {
            Some(idx) if idx > 0 => &line[..idx],
            _ => line,
        };
        if push_capped(&mut deps, dep) {
            break;
        }
    }
    deps
}

/// Extracts imported DLL names from `objdump -p`.
#[must_use]
pub fn parse_pe_deps(output: &str) -> Vec<String> {
    let mut deps = Vec::new();
    for line in output.lines().map(str::trim) {
        let Some(name) = line.strip_prefix("DLL Name:").map(str::trim) else {
            continue;
        };
        if !name.is_empty() && push_capped(&mut deps, name) {
            break;
        }
    }
    deps
}

/// Extracts `name (TYPE)` pairs from `readelf -S`, skipping the `NULL`
/// section.
#[must_use]
pub fn parse_elf_sections(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| ELF_SECTION.captures(line))
        .filter(|caps| &caps[2] != "NULL")
        .map(|caps| format!("{} ({})", &caps[1], &caps[2]))
        .collect()
}

/// Extracts section names from `otool -l`.
#[must_use]
pub fn parse_macho_sections(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("sectname "))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits `nm -g` output into exported and imported symbol names.
///
/// Lines are `type name` (undefined symbols) or `address type name`.
/// `U`/`u` marks an import; any other uppercase type is an export.
#[must_use]
pub fn parse_nm_symbols(output: &str) -> (Vec<String>, Vec<String>) {
    let mut exported = Vec::new();
    let mut imported = Vec::new();

    for line in output.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (sym_type, name) = match fields.as_slice() {
            [sym_type, name] => (*sym_type, *name),
            [_, sym_type, name, ..] => (*sym_type, *name),
            _ => continue,
        };

        if sym_type == "U" || sym_type == "u" {
            imported.push(name.to_string());
        } else if sym_type.starts_with(|c: char| c.is_ascii_uppercase()) {
            exported.push(name.to_string());
        }
    }

    (exported, imported)
}

/// Keeps `strings` lines that look like URLs, absolute paths, diagnostics,
/// versions or metadata, up to `limit` lines.
#[must_use]
pub fn filter_interesting_strings(output: &str, limit: usize) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.len() <= MAX_STRING_LINE_LEN)
        .filter(|line| INTERESTING_STRINGS.iter().any(|re| re.is_match(line)))
        .take(limit)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const READELF_D: &str = "\
Dynamic section at offset 0x2dc8 contains 27 entries:
  Tag        Type                         Name/Value
 0x0000000000000001 (NEEDED)             Shared library: [libssl.so.3]
 0x0000000000000001 (NEEDED)             Shared library: [libc.so.6]
 0x000000000000000c (INIT)               0x1000
";

    const LDD: &str = "\
\tlinux-vdso.so.1 (0x00007ffd5a1f0000)
\tlibc.so.6 => /lib/x86_64-linux-gnu/libc.so.6 (0x00007f0e3c200000)
\t/lib64/ld-linux-x86-64.so.2 (0x00007f0e3c4a0000)
";

    const OTOOL_L: &str = "\
/tmp/binscope-abc:
\t/usr/lib/libSystem.B.dylib (compatibility version 1.0.0, current version 1319.0.0)
\t@rpath/libfoo.dylib (offset 24)
\t/usr/lib/libbare.dylib
";

    const OBJDUMP_P: &str = "\
The Import Tables (interpreted .idata section contents)
\tDLL Name: KERNEL32.dll
\tvma:  Hint/Ord Member-Name Bound-To
\tDLL Name: msvcrt.dll
\tDLL Name:
";

    const READELF_S: &str = "\
Section Headers:
  [Nr] Name              Type             Address           Offset
  [ 0]                   NULL             0000000000000000  00000000
  [ 1] .interp           PROGBITS         0000000000000318  00000318
  [12] .text             PROGBITS         0000000000001040  00001040
  [25] .bss              NOBITS           0000000000004010  00003010
";

    const OTOOL_SECTIONS: &str = "\
Section
  sectname __text
   segname __TEXT
Section
  sectname __cstring
";

    const NM: &str = "\
                 U free
                 U malloc
0000000000001139 T main
0000000000004010 B counter
0000000000001120 t local_helper
                 w __gmon_start__
0000000000002000 R VERSION
";

    #[test]
    fn test_parse_elf_deps() {
        assert_eq!(parse_elf_deps(READELF_D), vec!["libssl.so.3", "libc.so.6"]);
    }

    #[test]
    fn test_parse_elf_deps_capped() {
        let output: String = (0..30)
            .map(|i| format!(" 0x1 (NEEDED) Shared library: [lib{i}.so]\n"))
            .collect();
        assert_eq!(parse_elf_deps(&output).len(), MAX_DEPENDENCIES);
    }

    #[test]
    fn test_parse_ldd_deps() {
        assert_eq!(
            parse_ldd_deps(LDD),
            vec!["libc.so.6", "/lib64/ld-linux-x86-64.so.2"]
        );
    }

    #[test]
    fn test_parse_macho_deps() {
        assert_eq!(
            parse_macho_deps(OTOOL_L),
            vec![
                "/usr/lib/libSystem.B.dylib",
                "@rpath/libfoo.dylib",
                "/usr/lib/libbare.dylib"
            ]
        );
    }

    #[test]
    fn test_parse_pe_deps() {
        assert_eq!(parse_pe_deps(OBJDUMP_P), vec!["KERNEL32.dll", "msvcrt.dll"]);
    }

    #[test]
    fn test_parse_elf_sections() {
        assert_eq!(
            parse_elf_sections(READELF_S),
            vec![".interp (PROGBITS)", ".text (PROGBITS)", ".bss (NOBITS)"]
        );
    }

    #[test]
    fn test_parse_macho_sections() {
        assert_eq!(
            parse_macho_sections(OTOOL_SECTIONS),
            vec!["__text", "__cstring"]
        );
    }

    #[test]
    fn test_parse_nm_symbols() {
        let (exported, imported) = parse_nm_symbols(NM);
        assert_eq!(exported, vec!["main", "counter", "VERSION"]);
        assert_eq!(imported, vec!["free", "malloc"]);
    }

    #[test]
    fn test_filter_interesting_strings() {
        let long = format!("https://{}", "a".repeat(200));
        let output = format!(
            "random\nhttps://example.com/api\n/usr/lib/x86_64\nERROR: boom\n\
             v1.2.3\nCopyright 2024 Example\n  \n{long}\nplainword\n"
        );
        assert_eq!(
            filter_interesting_strings(&output, 30),
            vec![
                "https://example.com/api",
                "/usr/lib/x86_64",
                "ERROR: boom",
                "v1.2.3",
                "Copyright 2024 Example"
            ]
        );
    }

    #[test]
    fn test_filter_interesting_strings_limit() {
        let output = "warning one\nwarning two\nwarning three\n";
        assert_eq!(filter_interesting_strings(output, 2).len(), 2);
    }

    #[test]
    fn test_parsers_tolerate_empty_output() {
        assert!(parse_elf_deps("").is_empty());
        assert!(parse_macho_deps("").is_empty());
        assert!(parse_elf_sections("garbage\n").is_empty());
        assert_eq!(parse_nm_symbols("x\n"), (vec![], vec![]));
    }
}
