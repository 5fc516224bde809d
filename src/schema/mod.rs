//! Schema module - Configuration types for the byte-to-raster codec.

mod config;

pub use config::*;
