//! Executable explorer.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::ExploreContext;
use crate::ExploreError;
use crate::ExploreInput;
use crate::ExploreResult;
use crate::Result;
use crate::config::ExplorerConfig;
use crate::formats::Explorer;
use crate::formats::ResolvedExecutable;
use crate::formats::resolve_executable;
use crate::summary::SummaryBuilder;
use crate::tools::ToolBridge;
use crate::tools::ToolReport;
use crate::tools::ToolRunner;

/// Prefix of the temporary copy handed to the analysis tools.
const TEMP_PREFIX: &str = "binscope-exec-";

/// Explorer for native binaries, bytecode and WebAssembly modules.
///
/// The summary header comes from extension and magic-byte resolution.
/// When tools are enabled, the content is copied to a temporary file
/// and analyzed with whatever tools are installed.
///
/// # Examples
///
/// ```
/// use binscope_core::{ExecutableExplorer, ExploreContext, ExploreInput, Explorer, ExplorerConfig, ToolConfig};
/// use std::path::Path;
///
/// let mut config = ExplorerConfig::default();
/// config.tools = ToolConfig::disabled();
/// let explorer = ExecutableExplorer::new(config);
///
/// let wasm = b"\x00asm\x01\x00\x00\x00";
/// let input = ExploreInput::new(Path::new("module.wasm"), wasm);
/// let result = explorer.explore(&ExploreContext::default(), &input).unwrap();
/// assert_eq!(
///     result.summary,
///     "Executable file: module.wasm\nFormat: WebAssembly\nSize: 8 bytes\n"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExecutableExplorer {
    config: ExplorerConfig,
}

impl ExecutableExplorer {
    /// Explorer tag.
    pub const NAME: &'static str = "executable";

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
    pub fn summarize(&self, ctx: &ExploreContext, input: &ExploreInput<'_>) -> String {
        let resolved = resolve_executable(input.path, input.content);

        let mut summary = SummaryBuilder::new();
        summary
            .field("Executable file", input.base_name())
            .field("Format", resolved.display_name())
            .field("Size", format_args!("{} bytes", input.content.len()));

        if !self.config.tools.enabled {
            return summary.finish();
        }

        match self.analyze(ctx, input.content, &resolved) {
            Ok(report) => self.render_report(&mut summary, &report),
            Err(e) => {
                log::warn!("tool analysis of {} failed: {e}", input.base_name());
                summary.line("").field("Note", format_args!("tool analysis unavailable: {e}"));
            }
        }
        summary.finish()
    }

    fn analyze(
        &self,
        ctx: &ExploreContext,
        content: &[u8],
        resolved: &ResolvedExecutable,
    ) -> Result<ToolReport> {
        // Removed on drop, whichever way this returns.
        let mut temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile()
            .map_err(ExploreError::TempFile)?;
        write_content(&mut temp, content)?;

        let bridge = ToolBridge::new(ToolRunner::new(&self.config.tools, ctx));
        bridge.analyze(temp.path(), resolved.tool_hint, &self.config.limits)
    }

    fn render_report(&self, summary: &mut SummaryBuilder, report: &ToolReport) {
        let limits = &self.config.limits;

        if let Some(file_type) = &report.file_type {
            summary.line("").field("File type", file_type);
        }
        summary
            .capped_section("Dependencies", &report.dependencies, limits.dependencies)
            .capped_section("Sections", &report.sections, limits.sections)
            .capped_section("Exported symbols", &report.exported, limits.exported_symbols)
            .capped_section("Imported symbols", &report.imported, limits.imported_symbols)
            .section("Interesting strings", &report.strings);
    }
}

fn write_content(temp: &mut NamedTempFile, content: &[u8]) -> Result<()> {
    temp.write_all(content).map_err(ExploreError::TempFile)?;
    temp.flush().map_err(ExploreError::TempFile)
}

impl Explorer for ExecutableExplorer {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn can_handle(&self, path: &Path, content: &[u8]) -> bool {
        resolve_executable(path, content).is_recognized()
    }

    fn explore(&self, ctx: &ExploreContext, input: &ExploreInput<'_>) -> Result<ExploreResult> {
        Ok(ExploreResult::new(self.summarize(ctx, input), Self::NAME))
    }
}
