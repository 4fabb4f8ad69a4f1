//! CLI argument parsing using clap.

use binscope_core::ExplorerConfig;
use binscope_core::OutputProfile;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "binscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize archive or executable files
    Inspect(InspectArgs),
    /// Report the detected format without reading structure
    Identify(IdentifyArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Default caps and sections
    #[default]
    Parity,
    /// Larger caps plus time-range and compression-method sections
    Enhancement,
}

impl From<Profile> for OutputProfile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Parity => Self::Parity,
            Profile::Enhancement => Self::Enhancement,
        }
    }
}

#[derive(clap::Args)]
pub struct InspectArgs {
    /// Files to summarize
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Output profile
    #[arg(short, long, value_enum, default_value_t = Profile::Parity)]
    pub profile: Profile,

    /// Timeout per external tool (e.g. 5s, 500ms)
    #[arg(short, long, default_value = "5s", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Skip external tool analysis
    #[arg(long)]
    pub no_tools: bool,

    /// Search path for external tools (default: PATH)
    #[arg(long, value_name = "DIRS")]
    pub tool_path: Option<OsString>,
}

impl InspectArgs {
    /// Builds the explorer configuration from the flags.
    pub fn config(&self) -> ExplorerConfig {
        let mut config = ExplorerConfig::with_profile(self.profile.into());
        config.tools.enabled = !self.no_tools;
        config.tools.timeout = self.timeout;
        config.tools.search_path.clone_from(&self.tool_path);
        config
    }
}

#[derive(clap::Args)]
pub struct IdentifyArgs {
    /// Files to identify
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

/// Parse a duration with optional suffix (ms, s, m). Bare numbers are seconds.
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty timeout".to_string());
    }

    let (num_str, millis_per_unit) = if let Some(stripped) = s.strip_suffix("ms") {
        (stripped, 1)
    } else if let Some(stripped) = s.strip_suffix('s') {
        (stripped, 1000)
    } else if let Some(stripped) = s.strip_suffix('m') {
        (stripped, 60_000)
    } else {
        (s, 1000)
    };

    let millis = num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid timeout: {s}"))
        .and_then(|n| {
            n.checked_mul(millis_per_unit)
                .ok_or_else(|| format!("timeout overflow: {s}"))
        })?;

    if millis == 0 {
        return Err("timeout must be greater than zero".to_string());
    }
    Ok(Duration::from_millis(millis))
}
