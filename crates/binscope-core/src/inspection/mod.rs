//! Container structure readers.
//!
//! Each reader walks a container's index or headers in a single pass and
//! folds every member into [`ContainerStats`]. Readers never panic on
//! malformed input: they stop early and return what they have.

pub mod ar;
pub mod nested;
pub mod rpm;
pub mod stats;
pub mod tar;
pub mod zip;

pub use ar::ArMember;
pub use ar::read_ar;
pub use nested::StreamContents;
pub use nested::resolve_stream;
pub use rpm::RpmLead;
pub use rpm::RpmPackageType;
pub use rpm::read_rpm_lead;
pub use stats::ContainerStats;
pub use stats::Histogram;
pub use stats::LargestEntries;
pub use stats::TimeRange;
pub use tar::read_compressed_tar;
pub use tar::read_tar;
pub use zip::ZipListing;
pub use zip::read_zip;
