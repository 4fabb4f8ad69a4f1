//! Container entry types.

pub mod entry;

pub use entry::ContainerEntry;
pub use entry::EntryKind;
