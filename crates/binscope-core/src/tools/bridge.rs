//! Best-effort binary analysis through system tools.

use std::path::Path;

use super::parse;
use super::runner::ToolRunner;
use crate::ExploreError;
use crate::Result;
use crate::config::ListLimits;
use crate::formats::ToolHint;

/// Everything the tools reported. Empty fields mean the tool was missing,
/// failed, or found nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolReport {
    /// `file -b` description.
    pub file_type: Option<String>,

    /// Shared-library dependencies, at most 20.
    pub dependencies: Vec<String>,

    /// Section names.
    pub sections: Vec<String>,

    /// Exported symbols, uncapped.
    pub exported: Vec<String>,

    /// Imported symbols, uncapped.
    pub imported: Vec<String>,

    /// Filtered printable strings.
    pub strings: Vec<String>,
}

impl ToolReport {
    /// Returns `true` if no tool contributed anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_type.is_none()
            && self.dependencies.is_empty()
            && self.sections.is_empty()
            && self.exported.is_empty()
            && self.imported.is_empty()
            && self.strings.is_empty()
    }
}

/// One tool invocation and the parser for its output.
#[derive(Debug, Clone, Copy)]
struct ToolStep {
    tool: &'static str,
    flags: &'static [&'static str],
    parse: fn(&str) -> Vec<String>,
}

const ELF_DEPENDENCIES: &[ToolStep] = &[
    ToolStep {
        tool: "readelf",
        flags: &["-d"],
        parse: parse::parse_elf_deps,
    },
    ToolStep {
        tool: "ldd",
        flags: &[],
        parse: parse::parse_ldd_deps,
    },
];

const MACHO_DEPENDENCIES: &[ToolStep] = &[ToolStep {
    tool: "otool",
    flags: &["-L"],
    parse: parse::parse_macho_deps,
}];

const PE_DEPENDENCIES: &[ToolStep] = &[ToolStep {
    tool: "objdump",
    flags: &["-p"],
    parse: parse::parse_pe_deps,
}];

const ELF_SECTIONS: &[ToolStep] = &[ToolStep {
    tool: "readelf",
    flags: &["-S"],
    parse: parse::parse_elf_sections,
}];

const MACHO_SECTIONS: &[ToolStep] = &[ToolStep {
    tool: "otool",
    flags: &["-l"],
    parse: parse::parse_macho_sections,
}];

const fn dependency_steps(hint: Option<ToolHint>) -> &'static [ToolStep] {
    match hint {
        Some(ToolHint::Elf) => ELF_DEPENDENCIES,
        Some(ToolHint::MachO) => MACHO_DEPENDENCIES,
        Some(ToolHint::Pe) => PE_DEPENDENCIES,
        Some(ToolHint::Wasm) | None => &[],
    }
}

const fn section_steps(hint: Option<ToolHint>) -> &'static [ToolStep] {
    match hint {
        Some(ToolHint::Elf) => ELF_SECTIONS,
        Some(ToolHint::MachO) => MACHO_SECTIONS,
        Some(ToolHint::Pe | ToolHint::Wasm) | None => &[],
    }
}

/// Runs the analysis tools against a file on disk.
#[derive(Debug, Clone)]
pub struct ToolBridge {
    runner: ToolRunner,
}

impl ToolBridge {
    /// Creates a bridge around `runner`.
    #[must_use]
    pub const fn new(runner: ToolRunner) -> Self {
        Self { runner }
    }

    /// Analyzes `target`, choosing tools by `hint`.
    ///
    /// Each step is independent; a missing or failing tool leaves its
    /// field empty.
    ///
    /// # Errors
    ///
    /// Returns `ExploreError::Runtime` if the subprocess runtime cannot be
    /// created.
    pub fn analyze(
        &self,
        target: &Path,
        hint: Option<ToolHint>,
        limits: &ListLimits,
    ) -> Result<ToolReport> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ExploreError::Runtime)?;

        Ok(runtime.block_on(self.collect(target, hint, limits.strings)))
    }

    async fn collect(
        &self,
        target: &Path,
        hint: Option<ToolHint>,
        string_limit: usize,
    ) -> ToolReport {
        let mut report = ToolReport::default();

        if let Some(output) = self.runner.run("file", &["-b"], target).await {
            let description = output.trim();
            if !description.is_empty() && description != "data" {
                report.file_type = Some(description.to_string());
            }
        }

        report.dependencies = self.first_match(dependency_steps(hint), target).await;
        report.sections = self.first_match(section_steps(hint), target).await;

        if let Some(output) = self.runner.run("nm", &["-g"], target).await {
            (report.exported, report.imported) = parse::parse_nm_symbols(&output);
        }

        let min_len = format!("-n{}", parse::MIN_STRING_LEN);
        if let Some(output) = self.runner.run("strings", &[min_len.as_str()], target).await {
            report.strings = parse::filter_interesting_strings(&output, string_limit);
        }

        report
    }

    /// Returns the first non-empty parse from `steps`.
    async fn first_match(&self, steps: &[ToolStep], target: &Path) -> Vec<String> {
        for step in steps {
            let Some(output) = self.runner.run(step.tool, step.flags, target).await else {
                continue;
            };
            let parsed = (step.parse)(&output);
            if !parsed.is_empty() {
                return parsed;
            }
            log::debug!("{} produced nothing usable", step.tool);
        }
        Vec::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ExploreContext;
    use crate::config::ToolConfig;
    use std::time::Duration;
    use tempfile::TempDir;

    fn bridge_in(dir: &Path) -> ToolBridge {
        let config = ToolConfig {
            enabled: true,
            timeout: Duration::from_secs(5),
            search_path: Some(dir.as_os_str().to_os_string()),
        };
        ToolBridge::new(ToolRunner::new(&config, &ExploreContext::default()))
    }

    #[cfg(unix)]
    fn install_script(dir: &Path, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_step_tables() {
        assert_eq!(dependency_steps(Some(ToolHint::Elf)).len(), 2);
        assert_eq!(dependency_steps(Some(ToolHint::Elf))[1].tool, "ldd");
        assert!(dependency_steps(Some(ToolHint::Wasm)).is_empty());
        assert!(section_steps(Some(ToolHint::Pe)).is_empty());
        assert_eq!(section_steps(Some(ToolHint::MachO))[0].flags, &["-l"]);
    }

    #[test]
    fn test_analyze_without_tools_is_empty() {
        let dir = TempDir::new().unwrap();
        let report = bridge_in(dir.path())
            .analyze(Path::new("/nonexistent"), Some(ToolHint::Elf), &ListLimits::default())
            .unwrap();
        assert!(report.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_analyze_with_fake_tools() {
        let dir = TempDir::new().unwrap();
        install_script(dir.path(), "file", "echo 'ELF 64-bit LSB executable'");
        install_script(
            dir.path(),
            "readelf",
            "case \"$1\" in\n\
             -d) echo ' 0x0000000000000001 (NEEDED) Shared library: [libfake.so.1]' ;;\n\
             -S) echo '  [ 1] .text PROGBITS 0000000000001000' ;;\n\
             esac",
        );
        install_script(dir.path(), "nm", "echo '                 U puts'; echo '0000000000001139 T main'");
        install_script(dir.path(), "strings", "echo 'GCC: (GNU) 13.2.0'; echo 'https://example.com'");

        let report = bridge_in(dir.path())
            .analyze(Path::new("/bin/true"), Some(ToolHint::Elf), &ListLimits::default())
            .unwrap();

        assert_eq!(report.file_type.as_deref(), Some("ELF 64-bit LSB executable"));
        assert_eq!(report.dependencies, vec!["libfake.so.1"]);
        assert_eq!(report.sections, vec![".text (PROGBITS)"]);
        assert_eq!(report.exported, vec!["main"]);
        assert_eq!(report.imported, vec!["puts"]);
        assert_eq!(report.strings, vec!["https://example.com"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_elf_dependencies_fall_back_to_ldd() {
        let dir = TempDir::new().unwrap();
        install_script(dir.path(), "readelf", "echo 'no dynamic section'");
        install_script(dir.path(), "ldd", "printf '\\tlibm.so.6 => /lib/libm.so.6 (0x1)\\n'");
        install_script(dir.path(), "file", "echo data");

        let report = bridge_in(dir.path())
            .analyze(Path::new("/bin/true"), Some(ToolHint::Elf), &ListLimits::default())
            .unwrap();

        assert_eq!(report.dependencies, vec!["libm.so.6"]);
        assert!(report.file_type.is_none());
    }
}
