//! Compression codec support for standalone and tar-wrapped streams.
//!
//! # Supported Codecs
//!
//! - **Gzip** (.gz, .tar.gz, .tgz)
//! - **Bzip2** (.bz2, .tar.bz2)
//! - **Zstd** (.zst, .tar.zst)
//!
//! XZ, LZ and LZ4 streams are identified by the resolver but never decoded.

use std::fmt;
use std::io::Read;

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;

use crate::ExploreError;
use crate::Result;

/// Compression codec of a single compressed stream.
///
/// # Examples
///
/// ```
/// use binscope_core::formats::compression::CompressionCodec;
///
/// assert_eq!(CompressionCodec::Gzip.tar_family_name(), "tar.gz");
/// assert_eq!(CompressionCodec::Zstd.name(), "zstd");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,

    /// Bzip2 compression (Burrows-Wheeler algorithm).
    Bzip2,

    /// Zstd compression (Zstandard algorithm).
    Zstd,
}

impl CompressionCodec {
    /// Returns the family name used when the stream wraps a TAR archive.
    #[must_use]
    pub const fn tar_family_name(self) -> &'static str {
        match self {
            Self::Gzip => "tar.gz",
            Self::Bzip2 => "tar.bz2",
            Self::Zstd => "tar.zst",
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Zstd => "zstd",
        }
    }

    /// Wraps `reader` in a streaming decoder for this codec.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder cannot be constructed (zstd reads
    /// and validates the frame header eagerly).
    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> Result<Box<dyn Read + 'a>> {
        match self {
            Self::Gzip => Ok(Box::new(MultiGzDecoder::new(reader))),
            Self::Bzip2 => Ok(Box::new(MultiBzDecoder::new(reader))),
            Self::Zstd => {
                let decoder = zstd::stream::read::Decoder::new(reader)
                    .map_err(|source| ExploreError::Decompression {
                        codec: self,
                        source,
                    })?;
                Ok(Box::new(decoder))
            }
        }
    }

    /// Decompresses `data` fully into memory.
    ///
    /// # Errors
    ///
    /// Returns `ExploreError::Decompression` if the stream is corrupt or
    /// truncated.
    pub fn decompress_all(self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = self.decoder(data)?;
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(|source| ExploreError::Decompression {
                codec: self,
                source,
            })?;
        Ok(out)
    }
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
