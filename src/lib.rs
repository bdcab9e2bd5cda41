//! Flipbook is a deterministic frame-sequence export pipeline.
//!
//! It accepts an ordered sequence of in-memory raster frames (or paths to rendered frame
//! files) and supports two sink modes:
//!
//! - Persist each frame as an individual compressed still image ([`FrameExporter::save_still`])
//! - Assemble a decimated subsequence into a looping animation
//!   ([`FrameExporter::assemble_animation`])
//!
//! Codecs are injected capabilities: PNG stills and GIF animations by default, with an
//! optional `ffmpeg`-backed MP4 sink behind the `media-ffmpeg` feature. Rendering frames is
//! an external collaborator's job; this crate only converts finished frames into artifacts.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image and animation codec capabilities.
pub mod codec;
/// Export operations, configuration, and sequence input.
pub mod export;

pub use crate::foundation::core::{Frame, FrameIndex};
pub use crate::foundation::error::{FlipbookError, FlipbookResult};

pub use crate::codec::animation::{AnimationConfig, AnimationSink, InMemorySink};
pub use crate::codec::gif::GifSink;
#[cfg(feature = "media-ffmpeg")]
pub use crate::codec::mp4::Mp4Sink;
pub use crate::codec::still::{PngStillEncoder, StillEncoder, StillOpts};

pub use crate::export::config::{
    DEFAULT_FRAME_DURATION_MS, DEFAULT_STILL_DPI, ExportConfig, LONG_SEQUENCE_THRESHOLD,
    OutputFormat, recommended_policy,
};
pub use crate::export::exporter::{ExportResult, FrameExporter};
pub use crate::export::sequence::{list_frame_files, load_frame};
