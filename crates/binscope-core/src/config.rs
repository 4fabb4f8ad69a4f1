//! Explorer configuration.

use std::ffi::OsString;
use std::time::Duration;

/// Output richness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputProfile {
    /// Default caps and sections.
    #[default]
    Parity,

    /// Larger caps, plus time-range and compression-method sections.
    Enhancement,
}

/// Per-profile list caps.
///
/// `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    /// Shared-library dependencies.
    pub dependencies: Option<usize>,

    /// Section names.
    pub sections: Option<usize>,

    /// Exported symbols.
    pub exported_symbols: Option<usize>,

    /// Imported symbols.
    pub imported_symbols: Option<usize>,

    /// Interesting strings.
    pub strings: usize,

    /// Largest entries shown for a container.
    pub largest_entries: usize,
}

impl ListLimits {
    /// Returns the caps for `profile`.
    #[must_use]
    pub const fn for_profile(profile: OutputProfile) -> Self {
        match profile {
            OutputProfile::Parity => Self {
                dependencies: Some(20),
                sections: Some(20),
                exported_symbols: Some(50),
                imported_symbols: Some(50),
                strings: 30,
                largest_entries: 5,
            },
            OutputProfile::Enhancement => Self {
                dependencies: Some(20),
                sections: None,
                exported_symbols: Some(100),
                imported_symbols: Some(100),
                strings: 50,
                largest_entries: 5,
            },
        }
    }
}

impl Default for ListLimits {
    fn default() -> Self {
        Self::for_profile(OutputProfile::default())
    }
}

/// External tool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Run external tools at all.
    pub enabled: bool,

    /// Upper bound for a single tool invocation.
    pub timeout: Duration,

    /// Directories searched for tools, in `PATH` syntax. `None` uses `PATH`.
    pub search_path: Option<OsString>,
}

impl Default for ToolConfig {
    /// Tools enabled, 5 second timeout, process `PATH`.
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: Duration::from_secs(5),
            search_path: None,
        }
    }
}

impl ToolConfig {
    /// Creates a configuration that never runs external tools.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

/// Configuration shared by the archive and executable explorers.
///
/// # Examples
///
/// ```
/// use binscope_core::{ExplorerConfig, OutputProfile};
/// use std::time::Duration;
///
/// let config = ExplorerConfig::default();
/// assert_eq!(config.profile, OutputProfile::Parity);
///
/// let mut rich = ExplorerConfig::enhancement();
/// rich.tools.timeout = Duration::from_secs(2);
/// assert_eq!(rich.limits.strings, 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplorerConfig {
    /// Output profile.
    pub profile: OutputProfile,

    /// External tool settings.
    pub tools: ToolConfig,

    /// List caps, normally derived from `profile`.
    pub limits: ListLimits,
}

impl ExplorerConfig {
    /// Creates the enhancement preset.
    #[must_use]
    pub fn enhancement() -> Self {
        Self::with_profile(OutputProfile::Enhancement)
    }

    /// Creates a configuration for `profile` with matching limits.
    #[must_use]
    pub fn with_profile(profile: OutputProfile) -> Self {
        Self {
            profile,
            tools: ToolConfig::default(),
            limits: ListLimits::for_profile(profile),
        }
    }

    /// Returns `true` for the enhancement profile.
    #[must_use]
    pub const fn is_enhanced(&self) -> bool {
        matches!(self.profile, OutputProfile::Enhancement)
    }
}
