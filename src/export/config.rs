use crate::foundation::error::{FlipbookError, FlipbookResult};

/// Default density for final still images, in dots per inch.
pub const DEFAULT_STILL_DPI: u32 = 150;

/// Default per-frame display duration in milliseconds.
pub const DEFAULT_FRAME_DURATION_MS: f64 = 100.0;

/// Frame count above which [`recommended_policy`] decimates animation sequences.
pub const LONG_SEQUENCE_THRESHOLD: u64 = 100;

/// Kind of artifact an export produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputFormat {
    /// One compressed still image per frame.
    StillImage,
    /// One looping animation assembled from many frames.
    AnimatedSequence,
}

/// Tunables for one export operation.
///
/// A config is plain data with no behavior beyond validation; the same value can drive any
/// number of calls. `decimation_stride` is an explicit quality/size trade-off surfaced to the
/// caller rather than applied silently.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportConfig {
    /// Density metadata for still artifacts, in dots per inch. Must be positive.
    pub dpi: u32,
    /// Keep every Nth frame when assembling an animation. Must be >= 1; 1 keeps everything.
    pub decimation_stride: u32,
    /// Spend extra time on compression for smaller artifacts.
    pub compression_optimize: bool,
    /// Display duration of each animation frame in milliseconds. Must be finite and positive.
    pub frame_duration_ms: f64,
    /// Animation repetitions, 0 meaning loop forever.
    pub loop_count: u16,
    /// Kind of artifact this config drives.
    pub output_format: OutputFormat,
}

impl ExportConfig {
    /// Config for a single still image at the given density.
    pub fn still(dpi: u32) -> Self {
        Self {
            dpi,
            decimation_stride: 1,
            compression_optimize: true,
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            loop_count: 0,
            output_format: OutputFormat::StillImage,
        }
    }

    /// Config for a looping animation with the given per-frame duration.
    pub fn animation(frame_duration_ms: f64) -> Self {
        Self {
            dpi: DEFAULT_STILL_DPI / 2,
            decimation_stride: 1,
            compression_optimize: true,
            frame_duration_ms,
            loop_count: 0,
            output_format: OutputFormat::AnimatedSequence,
        }
    }

    /// Set the decimation stride.
    pub fn with_stride(mut self, stride: u32) -> Self {
        self.decimation_stride = stride;
        self
    }

    /// Set the compression-effort flag.
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.compression_optimize = optimize;
        self
    }

    /// Set the animation loop count (0 = infinite).
    pub fn with_loop_count(mut self, loop_count: u16) -> Self {
        self.loop_count = loop_count;
        self
    }

    /// Reject out-of-range tunables.
    pub fn validate(&self) -> FlipbookResult<()> {
        if self.dpi == 0 {
            return Err(FlipbookError::config("dpi must be positive"));
        }
        if self.decimation_stride == 0 {
            return Err(FlipbookError::config("decimation_stride must be >= 1"));
        }
        if !self.frame_duration_ms.is_finite() || self.frame_duration_ms <= 0.0 {
            return Err(FlipbookError::config(
                "frame_duration_ms must be finite and positive",
            ));
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self::still(DEFAULT_STILL_DPI)
    }
}

/// Recommended defaults for a sequence of `frame_count` frames targeting `target_format`.
///
/// Pure and deterministic: stills get full density, animation frames get half density (they
/// are usually previews), and sequences longer than [`LONG_SEQUENCE_THRESHOLD`] are decimated
/// to every second frame to bound artifact size.
pub fn recommended_policy(frame_count: u64, target_format: OutputFormat) -> ExportConfig {
    let dpi = match target_format {
        OutputFormat::StillImage => DEFAULT_STILL_DPI,
        OutputFormat::AnimatedSequence => DEFAULT_STILL_DPI / 2,
    };
    let stride = match target_format {
        OutputFormat::AnimatedSequence if frame_count > LONG_SEQUENCE_THRESHOLD => 2,
        _ => 1,
    };
    ExportConfig {
        dpi,
        decimation_stride: stride,
        compression_optimize: true,
        frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
        loop_count: 0,
        output_format: target_format,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_decimates_long_animation_sequences() {
        let cfg = recommended_policy(500, OutputFormat::AnimatedSequence);
        assert_eq!(cfg.decimation_stride, 2);
        assert_eq!(cfg.dpi, 75);
        assert_eq!(cfg.loop_count, 0);
        cfg.validate().unwrap();
    }

    #[test]
    fn policy_keeps_short_animation_sequences_whole() {
        let cfg = recommended_policy(10, OutputFormat::AnimatedSequence);
        assert_eq!(cfg.decimation_stride, 1);
    }

    #[test]
    fn policy_threshold_is_exclusive() {
        let at = recommended_policy(LONG_SEQUENCE_THRESHOLD, OutputFormat::AnimatedSequence);
        assert_eq!(at.decimation_stride, 1);
        let above = recommended_policy(LONG_SEQUENCE_THRESHOLD + 1, OutputFormat::AnimatedSequence);
        assert_eq!(above.decimation_stride, 2);
    }

    #[test]
    fn policy_never_decimates_stills() {
        let cfg = recommended_policy(100_000, OutputFormat::StillImage);
        assert_eq!(cfg.decimation_stride, 1);
        assert_eq!(cfg.dpi, DEFAULT_STILL_DPI);
    }

    #[test]
    fn validate_rejects_zero_tunables() {
        let mut cfg = ExportConfig::still(0);
        assert!(cfg.validate().is_err());

        cfg = ExportConfig::still(150).with_stride(0);
        assert!(cfg.validate().is_err());

        cfg = ExportConfig::animation(0.0);
        assert!(cfg.validate().is_err());

        cfg = ExportConfig::animation(f64::INFINITY);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn builder_setters_compose() {
        let cfg = ExportConfig::animation(40.0)
            .with_stride(3)
            .with_optimize(false)
            .with_loop_count(2);
        assert_eq!(cfg.decimation_stride, 3);
        assert!(!cfg.compression_optimize);
        assert_eq!(cfg.loop_count, 2);
        cfg.validate().unwrap();
    }

    #[test]
    fn config_round_trips_through_json() {
        let cfg = recommended_policy(500, OutputFormat::AnimatedSequence);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ExportConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
