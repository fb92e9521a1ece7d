//! Caller-side image I/O around the dispatcher.
//!
//! - **discovery**: find image files in directories
//! - **decode**: load files into intensity planes
//! - **encode**: write results back out as images

pub mod decode;
pub mod discovery;
pub mod encode;

// Re-exports for convenient access
pub use decode::decode_plane;
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use encode::{render, write_result};
