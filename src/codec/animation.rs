use crate::foundation::core::{Frame, FrameIndex};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use std::path::{Path, PathBuf};

/// Configuration provided to an [`AnimationSink`] at the start of an assembly.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationConfig {
    /// Frame width in pixels; every pushed frame must match.
    pub width: u32,
    /// Frame height in pixels; every pushed frame must match.
    pub height: u32,
    /// Display duration of each frame in milliseconds.
    pub frame_duration_ms: f64,
    /// Playback repetitions, 0 meaning loop forever.
    pub loop_count: u16,
    /// Spend extra time on palette/compression quality.
    pub optimize: bool,
}

impl AnimationConfig {
    /// Validate dimension and timing tunables.
    pub fn validate(&self) -> FlipbookResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FlipbookError::config(
                "animation width/height must be non-zero",
            ));
        }
        if !self.frame_duration_ms.is_finite() || self.frame_duration_ms <= 0.0 {
            return Err(FlipbookError::config(
                "animation frame_duration_ms must be finite and positive",
            ));
        }
        Ok(())
    }
}

/// Sink contract for consuming retained frames in assembly order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex` values
/// between one `begin`/`end` pair. `begin` resets prior sink state, so one sink value can be
/// reused across assemblies. On failure, `begin` leaves no new artifact behind; failures after
/// `begin` may leave a partial artifact, which the exporter removes.
pub trait AnimationSink: Send {
    /// Called once before any frames are pushed; opens the destination artifact.
    fn begin(&mut self, dest: &Path, cfg: AnimationConfig) -> FlipbookResult<()>;
    /// Push one frame in strictly increasing assembly order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> FlipbookResult<()>;
    /// Called once after the last frame is pushed; finalizes the artifact.
    fn end(&mut self) -> FlipbookResult<()>;
}

/// In-memory sink for tests and debugging. Produces no filesystem artifact.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<AnimationConfig>,
    dest: Option<PathBuf>,
    frames: Vec<(FrameIndex, Frame)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<AnimationConfig> {
        self.cfg.clone()
    }

    /// Return the destination captured in `begin`, if any.
    pub fn dest(&self) -> Option<PathBuf> {
        self.dest.clone()
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, Frame)] {
        &self.frames
    }
}

impl AnimationSink for InMemorySink {
    fn begin(&mut self, dest: &Path, cfg: AnimationConfig) -> FlipbookResult<()> {
        cfg.validate()?;
        self.cfg = Some(cfg);
        self.dest = Some(dest.to_path_buf());
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> FlipbookResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FlipbookResult<()> {
        Ok(())
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> FlipbookResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> AnimationConfig {
        AnimationConfig {
            width: 2,
            height: 2,
            frame_duration_ms: 100.0,
            loop_count: 0,
            optimize: true,
        }
    }

    #[test]
    fn config_rejects_zero_dimensions() {
        let bad = AnimationConfig { width: 0, ..cfg() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn config_rejects_non_finite_duration() {
        let bad = AnimationConfig {
            frame_duration_ms: f64::NAN,
            ..cfg()
        };
        assert!(bad.validate().is_err());
        let bad = AnimationConfig {
            frame_duration_ms: 0.0,
            ..cfg()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn in_memory_sink_begin_resets_prior_frames() {
        let mut sink = InMemorySink::new();
        let frame = Frame::solid(FrameIndex(0), 2, 2, [1, 2, 3, 255]).unwrap();

        sink.begin(Path::new("a.gif"), cfg()).unwrap();
        sink.push_frame(FrameIndex(0), &frame).unwrap();
        sink.end().unwrap();
        assert_eq!(sink.frames().len(), 1);

        sink.begin(Path::new("b.gif"), cfg()).unwrap();
        assert!(sink.frames().is_empty());
        assert_eq!(sink.dest(), Some(PathBuf::from("b.gif")));
    }
}
