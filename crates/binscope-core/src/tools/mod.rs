//! External tool bridge.
//!
//! Runs `file`, `readelf`, `ldd`, `otool`, `objdump`, `nm` and `strings`
//! against a file on disk and parses what they print. Every tool is
//! optional.

pub mod bridge;
pub mod parse;
pub mod runner;

pub use bridge::ToolBridge;
pub use bridge::ToolReport;
pub use runner::ToolRunner;
