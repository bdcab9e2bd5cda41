use crate::codec::animation::{AnimationConfig, AnimationSink, ensure_parent_dir};
use crate::foundation::core::{Frame, FrameIndex};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use std::path::Path;

/// Default animation sink producing a looping GIF89a artifact.
///
/// Frames are quantized one at a time and streamed straight to the destination file, so
/// memory stays proportional to a single frame. GIF stores dimensions as `u16`, so frames
/// larger than 65535 pixels on either axis are rejected in `begin`.
pub struct GifSink {
    encoder: Option<gif::Encoder<std::fs::File>>,
    cfg: Option<AnimationConfig>,
    last_idx: Option<FrameIndex>,
    delay_cs: u16,
    speed: i32,
}

impl GifSink {
    /// Create a new GIF sink.
    pub fn new() -> Self {
        Self {
            encoder: None,
            cfg: None,
            last_idx: None,
            delay_cs: 0,
            speed: 10,
        }
    }
}

impl Default for GifSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationSink for GifSink {
    fn begin(&mut self, dest: &Path, cfg: AnimationConfig) -> FlipbookResult<()> {
        // Drop any encoder left over from an aborted assembly before touching the destination.
        self.encoder = None;
        self.cfg = None;
        self.last_idx = None;

        cfg.validate()?;
        let width = u16::try_from(cfg.width).map_err(|_| {
            FlipbookError::config(format!(
                "gif width {} exceeds the format limit of 65535",
                cfg.width
            ))
        })?;
        let height = u16::try_from(cfg.height).map_err(|_| {
            FlipbookError::config(format!(
                "gif height {} exceeds the format limit of 65535",
                cfg.height
            ))
        })?;

        ensure_parent_dir(dest)?;
        let file = std::fs::File::create(dest)?;
        let mut encoder = match gif::Encoder::new(file, width, height, &[]) {
            Ok(encoder) => encoder,
            Err(e) => {
                let _ = std::fs::remove_file(dest);
                return Err(FlipbookError::encode(format!("create gif encoder: {e}")));
            }
        };

        let repeat = if cfg.loop_count == 0 {
            gif::Repeat::Infinite
        } else {
            gif::Repeat::Finite(cfg.loop_count)
        };
        if let Err(e) = encoder.set_repeat(repeat) {
            drop(encoder);
            let _ = std::fs::remove_file(dest);
            return Err(FlipbookError::encode(format!("set gif repeat: {e}")));
        }

        self.delay_cs = delay_centiseconds(cfg.frame_duration_ms);
        self.speed = if cfg.optimize { 1 } else { 10 };
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> FlipbookResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| FlipbookError::encode("gif sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(FlipbookError::encode(
                "gif sink received out-of-order frame index",
            ));
        }

        frame.validate()?;
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(FlipbookError::dimension_mismatch(format!(
                "frame {} is {}x{}, expected {}x{}",
                idx.0, frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let Some(encoder) = self.encoder.as_mut() else {
            return Err(FlipbookError::encode("gif sink is already finalized"));
        };

        // Palette quantization scribbles over its input, so feed it a copy.
        let mut rgba = frame.data.clone();
        let mut gif_frame =
            gif::Frame::from_rgba_speed(cfg.width as u16, cfg.height as u16, &mut rgba, self.speed);
        gif_frame.delay = self.delay_cs;
        encoder
            .write_frame(&gif_frame)
            .map_err(|e| FlipbookError::encode(format!("write gif frame: {e}")))?;

        self.last_idx = Some(idx);
        Ok(())
    }

    fn end(&mut self) -> FlipbookResult<()> {
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| FlipbookError::encode("gif sink not started"))?;
        // Dropping the encoder writes the GIF trailer.
        drop(encoder);
        self.cfg = None;
        self.last_idx = None;
        Ok(())
    }
}

/// Convert a per-frame duration in milliseconds to the GIF delay unit (centiseconds).
///
/// Delays below the representable minimum clamp to 1cs rather than 0, which many players
/// treat as "as fast as possible".
fn delay_centiseconds(frame_duration_ms: f64) -> u16 {
    let cs = (frame_duration_ms / 10.0).round();
    cs.clamp(1.0, f64::from(u16::MAX)) as u16
}
