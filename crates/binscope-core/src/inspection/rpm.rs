//! RPM lead parsing.
//!
//! Only the fixed 96-byte lead is read; signature and header sections are
//! not interpreted.

use std::fmt;

use crate::ExploreError;
use crate::Result;

/// RPM lead magic.
pub const RPM_MAGIC: &[u8] = &[0xed, 0xab, 0xee, 0xdb];

/// Size of the RPM lead.
pub const RPM_LEAD_LEN: usize = 96;

/// Package type from the lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpmPackageType {
    /// Binary package.
    Binary,
    /// Source package.
    Source,
    /// Any other type code.
    Unknown(u16),
}

impl From<u16> for RpmPackageType {
    fn from(code: u16) -> Self {
        match code {
            0 => Self::Binary,
            1 => Self::Source,
            other => Self::Unknown(other),
        }
    }
}

impl fmt::Display for RpmPackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => f.write_str("binary"),
            Self::Source => f.write_str("source"),
            Self::Unknown(code) => write!(f, "unknown ({code})"),
        }
    }
}

/// Decoded RPM lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpmLead {
    /// Format major version.
    pub major: u8,
    /// Format minor version.
    pub minor: u8,
    /// Package type.
    pub package_type: RpmPackageType,
    /// Package name, empty when absent.
    pub name: String,
}

/// Parses the RPM lead at the start of `content`.
///
/// # Errors
///
/// Returns `ExploreError::InvalidArchive` if the input is shorter than the
/// lead or the magic does not match.
pub fn read_rpm_lead(content: &[u8]) -> Result<RpmLead> {
    let Some(lead) = content.get(..RPM_LEAD_LEN) else {
        return Err(ExploreError::InvalidArchive(
            "file too small for RPM lead".to_string(),
        ));
    };
    if !lead.starts_with(RPM_MAGIC) {
        return Err(ExploreError::InvalidArchive("invalid RPM magic".to_string()));
    }

    let name_field = &lead[10..76];
    let name_len = name_field
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(name_field.len());

    Ok(RpmLead {
        major: lead[4],
        minor: lead[5],
        package_type: RpmPackageType::from(u16::from_be_bytes([lead[6], lead[7]])),
        name: String::from_utf8_lossy(&name_field[..name_len]).into_owned(),
    })
}
