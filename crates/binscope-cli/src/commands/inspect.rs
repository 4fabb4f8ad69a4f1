//! Inspect command implementation.

use crate::cli::InspectArgs;
use crate::error::convert_explore_error;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use binscope_core::explore_file;

/// Summarizes every file, reporting failures without stopping early.
pub fn execute(args: &InspectArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = args.config();
    let mut failed = 0usize;

    for path in &args.files {
        if path.is_dir() {
            formatter.format_warning(&format!("skipping directory {}", path.display()));
            continue;
        }
        log::debug!("inspecting {}", path.display());
        match explore_file(path, &config) {
            Ok(result) => formatter.format_inspection(path, &result)?,
            Err(e) => {
                failed += 1;
                formatter.format_error(&convert_explore_error(e, path));
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} file(s) could not be inspected", args.files.len());
    }
    Ok(())
}
