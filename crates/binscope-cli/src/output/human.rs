//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use binscope_core::ExploreResult;
use binscope_core::Identification;
use console::Term;
use console::style;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    errors: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            errors: Term::stderr(),
        }
    }

    fn header(&self, path: &Path) -> String {
        let name = path.display().to_string();
        if self.use_colors {
            style(format!("==> {name}")).cyan().bold().to_string()
        } else {
            format!("==> {name}")
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_inspection(&self, path: &Path, result: &ExploreResult) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.term.write_line(&self.header(path))?;
        self.term.write_line(result.summary.trim_end())?;

        if self.verbose {
            let footer = format!(
                "[{} explorer, ~{} tokens]",
                result.explorer, result.token_estimate
            );
            let footer = if self.use_colors {
                style(footer).dim().to_string()
            } else {
                footer
            };
            self.term.write_line(&footer)?;
        }
        self.term.write_line("")?;
        Ok(())
    }

    fn format_identification(&self, path: &Path, id: Option<&Identification>) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let described = match id {
            Some(id) if self.use_colors => style(id.to_string()).green().to_string(),
            Some(id) => id.to_string(),
            None if self.use_colors => style("unsupported").yellow().to_string(),
            None => "unsupported".to_string(),
        };
        self.term
            .write_line(&format!("{}: {described}", path.display()))?;
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .errors
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.errors.write_line(&format!("ERROR: {error:?}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .errors
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.errors.write_line(&format!("Warning: {message}"));
        }
    }
}
