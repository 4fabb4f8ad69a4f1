//! Command implementations.

pub mod completion;
pub mod identify;
pub mod inspect;
