use crate::codec::animation::{AnimationConfig, AnimationSink, ensure_parent_dir};
use crate::codec::gif::GifSink;
use crate::codec::still::{PngStillEncoder, StillEncoder, StillOpts};
use crate::export::config::{ExportConfig, OutputFormat};
use crate::export::sequence::load_frame;
use crate::foundation::core::{Frame, FrameIndex};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Statistics for one completed export.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExportResult {
    /// Destination the artifact was written to.
    pub artifact_path: PathBuf,
    /// Frames persisted into the artifact (after decimation, for animations).
    pub frames_written: u64,
    /// Wall-clock time spent encoding and writing.
    pub elapsed: Duration,
    /// Size of the artifact in bytes; 0 when the sink produced no filesystem artifact.
    pub bytes_written: u64,
}

/// Converts ordered frame sequences into persisted still and animation artifacts.
///
/// The exporter is generic over its two codec capabilities and holds no state between
/// calls, so concurrent exporters writing distinct destinations do not interact. The
/// default stack is PNG stills and GIF animations.
pub struct FrameExporter<S: StillEncoder = PngStillEncoder, A: AnimationSink = GifSink> {
    still: S,
    anim: A,
}

impl FrameExporter {
    /// Build an exporter with the default PNG still encoder and GIF animation sink.
    pub fn new() -> Self {
        Self {
            still: PngStillEncoder,
            anim: GifSink::new(),
        }
    }
}

impl Default for FrameExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: StillEncoder, A: AnimationSink> FrameExporter<S, A> {
    /// Build an exporter around injected codec capabilities.
    pub fn with_codecs(still: S, anim: A) -> Self {
        Self { still, anim }
    }

    /// Borrow the injected animation sink, mainly useful with test doubles.
    pub fn animation_sink(&self) -> &A {
        &self.anim
    }

    /// Persist one frame as a compressed still image at `destination`.
    ///
    /// The frame is encoded fully in memory and written in one step, overwriting any
    /// existing file. On a write failure the partial file is removed before the error
    /// surfaces. Requires a [`OutputFormat::StillImage`] config.
    pub fn save_still(
        &self,
        frame: &Frame,
        destination: &Path,
        config: &ExportConfig,
    ) -> FlipbookResult<ExportResult> {
        config.validate()?;
        if config.output_format != OutputFormat::StillImage {
            return Err(FlipbookError::config(
                "save_still requires OutputFormat::StillImage",
            ));
        }
        frame.validate()?;

        let start = Instant::now();
        let opts = StillOpts {
            dpi: config.dpi,
            optimize: config.compression_optimize,
        };
        let encoded = self.still.encode(frame, &opts)?;

        ensure_parent_dir(destination)?;
        let mut guard = ArtifactGuard::unarmed();
        guard.arm(destination);
        std::fs::write(destination, &encoded)?;
        guard.disarm();

        let elapsed = start.elapsed();
        tracing::debug!(
            dest = %destination.display(),
            bytes = encoded.len(),
            ?elapsed,
            "still export complete"
        );
        Ok(ExportResult {
            artifact_path: destination.to_path_buf(),
            frames_written: 1,
            elapsed,
            bytes_written: encoded.len() as u64,
        })
    }

    /// Persist every frame as its own still named `{stem}{:03}.{ext}` under `dir`.
    ///
    /// Numbering follows slice position, not the frames' source indices. The first failure
    /// aborts the batch; stills already written are independent artifacts and remain.
    pub fn save_still_sequence(
        &self,
        frames: &[Frame],
        dir: &Path,
        stem: &str,
        config: &ExportConfig,
    ) -> FlipbookResult<Vec<ExportResult>> {
        let ext = self.still.extension();
        let mut results = Vec::with_capacity(frames.len());
        for (k, frame) in frames.iter().enumerate() {
            let destination = dir.join(format!("{stem}{k:03}.{ext}"));
            results.push(self.save_still(frame, &destination, config)?);
        }
        Ok(results)
    }

    /// Assemble a decimated subsequence of `frames` into a looping animation at `destination`.
    ///
    /// Keeps slice positions `0, stride, 2*stride, ..` in order, validates that something
    /// remains and that every retained frame shares the first one's dimensions, then streams
    /// the retained frames into the animation sink. All validation happens before the sink
    /// opens the destination, so contract violations write no file; a sink failure mid-stream
    /// removes the partial artifact. Requires an [`OutputFormat::AnimatedSequence`] config.
    #[tracing::instrument(skip(self, frames))]
    pub fn assemble_animation(
        &mut self,
        frames: &[Frame],
        destination: &Path,
        config: &ExportConfig,
    ) -> FlipbookResult<ExportResult> {
        config.validate()?;
        if config.output_format != OutputFormat::AnimatedSequence {
            return Err(FlipbookError::config(
                "assemble_animation requires OutputFormat::AnimatedSequence",
            ));
        }

        let retained = decimate(frames, config.decimation_stride);
        let Some(first) = retained.first() else {
            return Err(FlipbookError::empty_sequence("no frames to assemble"));
        };
        first.validate()?;
        for frame in &retained[1..] {
            frame.validate()?;
            if frame.width != first.width || frame.height != first.height {
                return Err(FlipbookError::dimension_mismatch(format!(
                    "frame {} is {}x{}, expected {}x{} from frame {}",
                    frame.index.0,
                    frame.width,
                    frame.height,
                    first.width,
                    first.height,
                    first.index.0
                )));
            }
        }

        let start = Instant::now();
        let anim_cfg = AnimationConfig {
            width: first.width,
            height: first.height,
            frame_duration_ms: config.frame_duration_ms,
            loop_count: config.loop_count,
            optimize: config.compression_optimize,
        };
        let mut guard = ArtifactGuard::unarmed();
        self.anim.begin(destination, anim_cfg)?;
        guard.arm(destination);
        for (k, frame) in retained.iter().enumerate() {
            self.anim.push_frame(FrameIndex(k as u64), frame)?;
        }
        self.anim.end()?;
        guard.disarm();

        let frames_written = retained.len() as u64;
        let bytes_written = artifact_size(destination);
        let elapsed = start.elapsed();
        tracing::debug!(
            dest = %destination.display(),
            frames = frames_written,
            bytes = bytes_written,
            ?elapsed,
            "animation assembly complete"
        );
        Ok(ExportResult {
            artifact_path: destination.to_path_buf(),
            frames_written,
            elapsed,
            bytes_written,
        })
    }

    /// Assemble an animation from frame files on disk, decoding one frame at a time.
    ///
    /// The path list is decimated first, so skipped frames are never decoded; at most one
    /// decoded frame is resident per iteration. The first loaded frame fixes the expected
    /// dimensions. Requires an [`OutputFormat::AnimatedSequence`] config.
    pub fn assemble_animation_from_files(
        &mut self,
        paths: &[PathBuf],
        destination: &Path,
        config: &ExportConfig,
    ) -> FlipbookResult<ExportResult> {
        config.validate()?;
        if config.output_format != OutputFormat::AnimatedSequence {
            return Err(FlipbookError::config(
                "assemble_animation_from_files requires OutputFormat::AnimatedSequence",
            ));
        }

        let retained = decimate(paths, config.decimation_stride);
        if retained.is_empty() {
            return Err(FlipbookError::empty_sequence("no frame files to assemble"));
        }

        let start = Instant::now();
        let mut guard = ArtifactGuard::unarmed();
        let mut expected: Option<(u32, u32)> = None;
        for (k, path) in retained.iter().enumerate() {
            let frame = load_frame(path, FrameIndex(k as u64))?;
            match expected {
                None => {
                    let anim_cfg = AnimationConfig {
                        width: frame.width,
                        height: frame.height,
                        frame_duration_ms: config.frame_duration_ms,
                        loop_count: config.loop_count,
                        optimize: config.compression_optimize,
                    };
                    self.anim.begin(destination, anim_cfg)?;
                    guard.arm(destination);
                    expected = Some((frame.width, frame.height));
                }
                Some((w, h)) if frame.width != w || frame.height != h => {
                    return Err(FlipbookError::dimension_mismatch(format!(
                        "'{}' is {}x{}, expected {}x{}",
                        path.display(),
                        frame.width,
                        frame.height,
                        w,
                        h
                    )));
                }
                Some(_) => {}
            }
            self.anim.push_frame(FrameIndex(k as u64), &frame)?;
        }
        self.anim.end()?;
        guard.disarm();

        let frames_written = retained.len() as u64;
        let bytes_written = artifact_size(destination);
        let elapsed = start.elapsed();
        tracing::debug!(
            dest = %destination.display(),
            frames = frames_written,
            bytes = bytes_written,
            ?elapsed,
            "animation assembly from files complete"
        );
        Ok(ExportResult {
            artifact_path: destination.to_path_buf(),
            frames_written,
            elapsed,
            bytes_written,
        })
    }
}

/// Keep slice positions `0, stride, 2*stride, ..` in order.
///
/// Callers validate `stride >= 1` through [`ExportConfig::validate`] first.
fn decimate<T>(items: &[T], stride: u32) -> Vec<&T> {
    items.iter().step_by(stride as usize).collect()
}

fn artifact_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

struct ArtifactGuard(Option<PathBuf>);

impl ArtifactGuard {
    fn unarmed() -> Self {
        Self(None)
    }

    fn arm(&mut self, path: &Path) {
        self.0 = Some(path.to_path_buf());
    }

    fn disarm(&mut self) {
        self.0 = None;
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
