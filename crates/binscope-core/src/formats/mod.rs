//! Format identification.
//!
//! Static signature tables, the archive and executable resolvers, and the
//! codecs used for compressed streams.

pub mod compression;
pub mod detect;
pub mod executable;
pub mod signatures;
pub mod traits;

pub use compression::CompressionCodec;
pub use detect::ArchiveFamily;
pub use detect::Layout;
pub use detect::resolve_archive;
pub use executable::BinaryMagic;
pub use executable::ExecutableFamily;
pub use executable::ResolvedExecutable;
pub use executable::ToolHint;
pub use executable::resolve_executable;
pub use traits::Explorer;
