//! Error conversion utilities for CLI.
//!
//! Converts binscope-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use binscope_core::ExploreError;
use std::path::Path;

/// Converts `ExploreError` to user-friendly anyhow error with context
pub fn convert_explore_error(err: ExploreError, file: &Path) -> anyhow::Error {
    match err {
        ExploreError::Io(io_err) => {
            anyhow!("Could not read '{}': {}", file.display(), io_err)
        }
        ExploreError::UnsupportedFormat => {
            anyhow!(
                "File format not recognized: {}\n\
                 HINT: Supported formats: zip, jar, war, ear, apk, ipa, nupkg, crx, xpi, vsix, tar, \
                 tar.gz, tar.bz2, tar.zst, gz, bz2, zst, deb, ar, rpm, ELF, Mach-O, PE, WebAssembly",
                file.display()
            )
        }
        err if err.is_tool_error() => {
            anyhow!(
                "Tool analysis failed for '{}': {}\n\
                 HINT: Use --no-tools to skip external tool analysis.",
                file.display(),
                err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error inspecting '{}'", file.display())),
    }
}
