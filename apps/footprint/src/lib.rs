//! # footprint
//!
//! Library half of the `footprint` binary: configuration and the JSON loader
//! that turns documents into heap object graphs for `footprint-core`.

pub mod config;
pub mod loader;

pub use config::FootprintConfig;
pub use loader::{JsonLoader, LoadedDocument};
