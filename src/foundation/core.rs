use crate::foundation::error::{FlipbookError, FlipbookResult};

/// Absolute 0-based frame index in source-sequence space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// One decoded raster frame.
///
/// Pixels are straight (non-premultiplied) RGBA8, tightly packed, row-major. Frames are
/// immutable once constructed; the exporter only ever reads them.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Position of this frame in its source sequence.
    pub index: FrameIndex,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, length exactly `width * height * 4`.
    pub data: Vec<u8>,
}

impl Frame {
    /// Byte length a `width x height` RGBA8 buffer must have.
    pub fn expected_len(width: u32, height: u32) -> u64 {
        u64::from(width) * u64::from(height) * 4
    }

    /// Construct a frame from an existing RGBA8 buffer, validating dimensions and length.
    pub fn from_rgba8(
        index: FrameIndex,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> FlipbookResult<Self> {
        let frame = Self {
            index,
            width,
            height,
            data,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// Construct a single-color frame.
    pub fn solid(index: FrameIndex, width: u32, height: u32, rgba: [u8; 4]) -> FlipbookResult<Self> {
        if width == 0 || height == 0 {
            return Err(FlipbookError::invalid_frame(
                "frame width/height must be non-zero",
            ));
        }
        let pixels = Self::expected_len(width, height) as usize / 4;
        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Ok(Self {
            index,
            width,
            height,
            data,
        })
    }

    /// Re-check the buffer invariants: non-zero area and exact RGBA8 byte length.
    pub fn validate(&self) -> FlipbookResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FlipbookError::invalid_frame(format!(
                "frame {} has zero area ({}x{})",
                self.index.0, self.width, self.height
            )));
        }
        let expected = Self::expected_len(self.width, self.height);
        if self.data.len() as u64 != expected {
            return Err(FlipbookError::invalid_frame(format!(
                "frame {} buffer is {} bytes, expected {} for {}x{} rgba8",
                self.index.0,
                self.data.len(),
                expected,
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_accepts_exact_buffer() {
        let frame = Frame::from_rgba8(FrameIndex(0), 2, 2, vec![0u8; 16]).unwrap();
        assert_eq!(frame.width, 2);
        assert_eq!(frame.height, 2);
        assert_eq!(frame.data.len(), 16);
    }

    #[test]
    fn from_rgba8_rejects_wrong_length() {
        let err = Frame::from_rgba8(FrameIndex(0), 2, 2, vec![0u8; 15]).unwrap_err();
        assert!(err.to_string().contains("invalid frame:"));
    }

    #[test]
    fn from_rgba8_rejects_zero_area() {
        let err = Frame::from_rgba8(FrameIndex(3), 0, 4, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("zero area"));
    }

    #[test]
    fn solid_fills_every_pixel() {
        let frame = Frame::solid(FrameIndex(1), 3, 1, [9, 8, 7, 255]).unwrap();
        assert_eq!(frame.data, vec![9, 8, 7, 255, 9, 8, 7, 255, 9, 8, 7, 255]);
        frame.validate().unwrap();
    }

    #[test]
    fn expected_len_does_not_overflow_u32_math() {
        // 100_000 * 100_000 * 4 overflows u32; the u64 result must not wrap.
        assert_eq!(
            Frame::expected_len(100_000, 100_000),
            40_000_000_000u64
        );
    }
}
