use crate::codec::animation::{AnimationConfig, AnimationSink, ensure_parent_dir};
use crate::foundation::core::{Frame, FrameIndex};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

/// Animation sink that spawns the system `ffmpeg` and streams raw frames to stdin.
///
/// Output is h264 + yuv420p MP4 for broad player compatibility, which requires even
/// dimensions and discards alpha. MP4 has no loop flag, so `loop_count` is ignored;
/// playback looping is a player decision.
pub struct Mp4Sink {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<AnimationConfig>,
    last_idx: Option<FrameIndex>,
}

impl Mp4Sink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new() -> Self {
        Self {
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }
}

impl Default for Mp4Sink {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationSink for Mp4Sink {
    fn begin(&mut self, dest: &Path, cfg: AnimationConfig) -> FlipbookResult<()> {
        self.child = None;
        self.stdin = None;
        self.stderr_drain = None;
        self.cfg = None;
        self.last_idx = None;

        cfg.validate()?;
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(FlipbookError::config(
                "mp4 width/height must be even (required for yuv420p output)",
            ));
        }

        ensure_parent_dir(dest)?;
        if !is_ffmpeg_on_path() {
            return Err(FlipbookError::encode(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let fps = 1000.0 / cfg.frame_duration_ms;
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.args([
            "-y",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{fps:.6}"),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]);
        cmd.arg(dest);

        let mut child = cmd.spawn().map_err(|e| {
            FlipbookError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| FlipbookError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| FlipbookError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> FlipbookResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| FlipbookError::encode("mp4 sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(FlipbookError::encode(
                "mp4 sink received out-of-order frame index",
            ));
        }

        frame.validate()?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(FlipbookError::dimension_mismatch(format!(
                "frame {} is {}x{}, expected {}x{}",
                idx.0, frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(FlipbookError::encode("mp4 sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            FlipbookError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;

        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> FlipbookResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| FlipbookError::encode("mp4 sink not started"))?;

        let status = child.wait().map_err(|e| {
            FlipbookError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| FlipbookError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| FlipbookError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(FlipbookError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        self.last_idx = None;
        Ok(())
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
