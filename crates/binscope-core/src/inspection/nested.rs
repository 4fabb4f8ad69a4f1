//! Standalone compressed streams that may wrap a TAR archive.
//!
//! A `.gz`, `.bz2` or `.zst` file without a `.tar.*` suffix is decompressed
//! fully, then each attempt in [`STREAM_ATTEMPTS`] runs in order until one
//! claims the payload.

use super::stats::ContainerStats;
use super::tar::read_tar;
use crate::Result;
use crate::formats::CompressionCodec;
use crate::formats::signatures::TAR_MAGIC;
use crate::formats::signatures::TAR_MAGIC_OFFSET;

/// What a decompressed stream turned out to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamContents {
    /// A TAR archive, labelled with the codec's `tar.*` family name.
    Tar {
        /// `tar.gz`, `tar.bz2` or `tar.zst`.
        family_name: &'static str,
        /// Statistics of the embedded archive.
        stats: ContainerStats,
    },

    /// Arbitrary data.
    Raw {
        /// Size of the compressed input.
        compressed: usize,
        /// Size after decompression.
        uncompressed: usize,
    },
}

/// Decompressed stream handed to each attempt.
#[derive(Debug)]
pub struct StreamPayload<'a> {
    /// Codec of the outer stream.
    pub codec: CompressionCodec,
    /// Compressed bytes.
    pub compressed: &'a [u8],
    /// Decompressed bytes.
    pub data: Vec<u8>,
    /// Largest-entry cap for TAR statistics.
    pub largest_limit: usize,
}

/// One way of interpreting a decompressed stream.
pub type StreamAttempt = fn(&StreamPayload<'_>) -> Option<StreamContents>;

/// Attempts in order; the last one always succeeds.
pub const STREAM_ATTEMPTS: &[(&str, StreamAttempt)] = &[("tar", as_tar), ("raw", as_raw)];

/// Returns `true` if `data` carries the `ustar` marker at offset 257.
#[must_use]
pub fn is_tar(data: &[u8]) -> bool {
    data.get(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len()) == Some(TAR_MAGIC)
}

/// Decompresses `content` and classifies its payload.
///
/// # Errors
///
/// Returns `ExploreError::Decompression` if the stream cannot be fully
/// decoded.
pub fn resolve_stream(
    content: &[u8],
    codec: CompressionCodec,
    largest_limit: usize,
) -> Result<StreamContents> {
    let payload = StreamPayload {
        codec,
        compressed: content,
        data: codec.decompress_all(content)?,
        largest_limit,
    };

    let contents = STREAM_ATTEMPTS
        .iter()
        .find_map(|(label, attempt)| {
            let outcome = attempt(&payload);
            if outcome.is_none() {
                log::debug!("{codec} payload is not {label}");
            }
            outcome
        })
        .unwrap_or_else(|| raw_contents(&payload));
    Ok(contents)
}

fn as_tar(payload: &StreamPayload<'_>) -> Option<StreamContents> {
    is_tar(&payload.data).then(|| StreamContents::Tar {
        family_name: payload.codec.tar_family_name(),
        stats: read_tar(payload.data.as_slice(), payload.largest_limit),
    })
}

fn as_raw(payload: &StreamPayload<'_>) -> Option<StreamContents> {
    Some(raw_contents(payload))
}

fn raw_contents(payload: &StreamPayload<'_>) -> StreamContents {
    StreamContents::Raw {
        compressed: payload.compressed.len(),
        uncompressed: payload.data.len(),
    }
}
