//! Identify command implementation.

use crate::cli::IdentifyArgs;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use binscope_core::identify;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes read from the head of each file; enough for every magic check.
const HEAD_LEN: u64 = 512;

/// Identifies every file, reporting unreadable ones without stopping early.
pub fn execute(args: &IdentifyArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let mut failed = 0usize;

    for path in &args.files {
        let head = match read_head(path) {
            Ok(head) => head,
            Err(e) => {
                failed += 1;
                formatter.format_error(&e);
                continue;
            }
        };
        let id = identify(path, &head);
        if id.is_none() {
            log::debug!("no explorer claims {}", path.display());
        }
        formatter.format_identification(path, id.as_ref())?;
    }

    if failed > 0 {
        bail!("{failed} of {} file(s) could not be identified", args.files.len());
    }
    Ok(())
}

fn read_head(path: &Path) -> Result<Vec<u8>> {
    let file = File::open(path).with_context(|| format!("Could not open '{}'", path.display()))?;
    let mut head = Vec::new();
    file.take(HEAD_LEN)
        .read_to_end(&mut head)
        .with_context(|| format!("Could not read '{}'", path.display()))?;
    Ok(head)
}
