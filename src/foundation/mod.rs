//! Shared primitives: frame model and the crate-wide error type.

/// Frame and frame-index primitives.
pub mod core;
/// Crate-wide error and result types.
pub mod error;
