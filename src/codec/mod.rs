//! Image and animation codec capabilities.
//!
//! Codecs are injected into the exporter at construction, so export operations contain no
//! format branching.

/// Animation sink trait and the in-memory test sink.
pub mod animation;
/// Streaming GIF89a sink.
pub mod gif;
/// `ffmpeg`-based MP4 sink (system `ffmpeg`).
#[cfg(feature = "media-ffmpeg")]
pub mod mp4;
/// Still-image encoder trait and the PNG encoder.
pub mod still;
