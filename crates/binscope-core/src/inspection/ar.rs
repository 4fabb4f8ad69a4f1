//! Unix `ar` member header walk.
//!
//! Layout: an 8-byte global magic, then per member a 60-byte header
//! (name 16, mtime 12, uid 6, gid 6, mode 8, size 10, terminator 2)
//! followed by the payload, padded to an even offset.

use crate::ExploreError;
use crate::Result;

/// Global `ar` magic.
pub const AR_MAGIC: &[u8] = b"!<arch>\n";

/// Size of a member header.
pub const AR_MEMBER_HEADER_LEN: usize = 60;

const NAME_FIELD: std::ops::Range<usize> = 0..16;
const SIZE_FIELD: std::ops::Range<usize> = 48..58;

/// One `ar` member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArMember {
    /// Name with trailing spaces and `/` removed.
    pub name: String,

    /// Declared payload size.
    pub size: u64,

    /// The payload extends past the end of the input.
    pub truncated: bool,
}

/// Lists the members of an `ar` archive.
///
/// The walk stops when fewer than 60 bytes remain, or after a member whose
/// payload runs past the end of the input.
///
/// # Errors
///
/// Returns `ExploreError::InvalidArchive` if the global magic is missing.
pub fn read_ar(content: &[u8]) -> Result<Vec<ArMember>> {
    if !content.starts_with(AR_MAGIC) {
        return Err(ExploreError::InvalidArchive("invalid ar header".to_string()));
    }

    let mut members = Vec::new();
    let mut pos = AR_MAGIC.len();

    while let Some(header) = content.get(pos..pos + AR_MEMBER_HEADER_LEN) {
        let raw_name = String::from_utf8_lossy(&header[NAME_FIELD]);
        let name = raw_name.trim_end_matches(' ').trim_end_matches('/').to_string();
        let size = parse_decimal(&header[SIZE_FIELD]);

        let next = usize::try_from(size)
            .ok()
            .and_then(|len| (pos + AR_MEMBER_HEADER_LEN).checked_add(len));
        let truncated = next.is_none_or(|end| end > content.len());

        members.push(ArMember {
            name,
            size,
            truncated,
        });
        match next {
            Some(end) if !truncated => pos = end + end % 2,
            _ => break,
        }
    }

    Ok(members)
}

/// Parses the leading decimal digits of a space-padded field; anything else
/// reads as 0.
fn parse_decimal(field: &[u8]) -> u64 {
    let text = String::from_utf8_lossy(field);
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
