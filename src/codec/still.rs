use crate::foundation::core::Frame;
use crate::foundation::error::{FlipbookError, FlipbookResult};

/// Options passed to a [`StillEncoder`] per encode call.
#[derive(Clone, Copy, Debug)]
pub struct StillOpts {
    /// Target density in dots per inch, embedded as metadata. Pixels are never rescaled.
    pub dpi: u32,
    /// Spend extra time on compression for a smaller artifact.
    pub optimize: bool,
}

/// Image-codec capability for single-frame artifacts.
pub trait StillEncoder: Send {
    /// Encode one frame into a complete image file held in memory.
    fn encode(&self, frame: &Frame, opts: &StillOpts) -> FlipbookResult<Vec<u8>>;
    /// File extension for artifacts produced by this encoder, without the dot.
    fn extension(&self) -> &'static str;
}

/// Default still encoder producing RGBA8 PNG output.
///
/// The requested dpi is written as a `pHYs` chunk; `optimize` selects the slowest
/// compression level, otherwise the fastest.
#[derive(Clone, Copy, Debug, Default)]
pub struct PngStillEncoder;

impl StillEncoder for PngStillEncoder {
    fn encode(&self, frame: &Frame, opts: &StillOpts) -> FlipbookResult<Vec<u8>> {
        frame.validate()?;

        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, frame.width, frame.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_compression(if opts.optimize {
                png::Compression::Best
            } else {
                png::Compression::Fast
            });
            let ppm = dpi_to_pixels_per_metre(opts.dpi);
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder
                .write_header()
                .map_err(|e| FlipbookError::encode(format!("write png header: {e}")))?;
            writer
                .write_image_data(&frame.data)
                .map_err(|e| FlipbookError::encode(format!("write png image data: {e}")))?;
        }
        Ok(out)
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}

/// Convert dots-per-inch to the pixels-per-metre unit the `pHYs` chunk uses.
pub fn dpi_to_pixels_per_metre(dpi: u32) -> u32 {
    // 1 inch = 25.4 mm.
    (f64::from(dpi) * 1000.0 / 25.4).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::FrameIndex;

    #[test]
    fn dpi_conversion_rounds_to_nearest_metre_unit() {
        assert_eq!(dpi_to_pixels_per_metre(150), 5906);
        assert_eq!(dpi_to_pixels_per_metre(72), 2835);
        assert_eq!(dpi_to_pixels_per_metre(300), 11811);
    }

    #[test]
    fn png_roundtrip_preserves_pixels() {
        let data = vec![
            255u8, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 255, 255, // blue
            255, 255, 255, 128, // translucent white
        ];
        let frame = Frame::from_rgba8(FrameIndex(0), 2, 2, data.clone()).unwrap();
        let encoded = PngStillEncoder
            .encode(
                &frame,
                &StillOpts {
                    dpi: 150,
                    optimize: false,
                },
            )
            .unwrap();

        let decoded = image::load_from_memory(&encoded).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.into_raw(), data);
    }

    #[test]
    fn png_carries_phys_metadata() {
        let frame = Frame::solid(FrameIndex(0), 4, 4, [10, 20, 30, 255]).unwrap();
        let encoded = PngStillEncoder
            .encode(
                &frame,
                &StillOpts {
                    dpi: 150,
                    optimize: true,
                },
            )
            .unwrap();

        let decoder = png::Decoder::new(&encoded[..]);
        let reader = decoder.read_info().unwrap();
        let dims = reader.info().pixel_dims.unwrap();
        assert_eq!(dims.xppu, 5906);
        assert_eq!(dims.yppu, 5906);
        assert!(matches!(dims.unit, png::Unit::Meter));
    }

    #[test]
    fn optimize_levels_agree_on_pixels() {
        let frame = Frame::solid(FrameIndex(0), 8, 8, [200, 100, 50, 255]).unwrap();
        let fast = PngStillEncoder
            .encode(
                &frame,
                &StillOpts {
                    dpi: 96,
                    optimize: false,
                },
            )
            .unwrap();
        let best = PngStillEncoder
            .encode(
                &frame,
                &StillOpts {
                    dpi: 96,
                    optimize: true,
                },
            )
            .unwrap();

        let a = image::load_from_memory(&fast).unwrap().to_rgba8();
        let b = image::load_from_memory(&best).unwrap().to_rgba8();
        assert_eq!(a.into_raw(), b.into_raw());
    }

    #[test]
    fn malformed_frame_is_rejected_before_encoding() {
        let frame = Frame {
            index: FrameIndex(0),
            width: 2,
            height: 2,
            data: vec![0u8; 3],
        };
        let err = PngStillEncoder
            .encode(
                &frame,
                &StillOpts {
                    dpi: 150,
                    optimize: false,
                },
            )
            .unwrap_err();
        assert!(err.to_string().contains("invalid frame:"));
    }
}
