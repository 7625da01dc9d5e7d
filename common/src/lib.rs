//! Shared models, capability traits and OS adapters for `rdpgate`.
//!
//! * [`network`]: interface descriptors, the default-route table and gateway models.
//! * [`console`]: the interactive input/output boundary.
//! * [`files`]: template, temporary and output file operations.
//! * [`launcher`]: starting an external remote-desktop client.
//! * [`config`]: run mode and the well-known file locations.

pub mod config;
pub mod console;
pub mod files;
pub mod launcher;
pub mod network;
pub mod utils;
