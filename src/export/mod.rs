//! Export pipeline: configuration, the exporter, and frame-sequence input helpers.

/// Export configuration and recommended defaults.
pub mod config;
/// The frame exporter and its result statistics.
pub mod exporter;
/// Frame-file discovery and decoding.
pub mod sequence;
