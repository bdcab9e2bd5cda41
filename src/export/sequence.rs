use crate::foundation::core::{Frame, FrameIndex};
use crate::foundation::error::FlipbookResult;
use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// List frame files in `dir` with the given extension (without the dot), sorted by file name.
///
/// The scan is non-recursive and the comparison is case-insensitive. Sorting makes the
/// ordering deterministic, so zero-padded names play back in render order.
pub fn list_frame_files(dir: &Path, extension: &str) -> FlipbookResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read frame directory '{}'", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("read frame directory '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Decode one frame image from disk into straight RGBA8, tagged with `index`.
pub fn load_frame(path: &Path, index: FrameIndex) -> FlipbookResult<Frame> {
    let dyn_img =
        image::open(path).with_context(|| format!("decode frame image '{}'", path.display()))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Frame::from_rgba8(index, width, height, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "flipbook_seq_{tag}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
        let mut img = image::RgbaImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgba(rgba);
        }
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(path, buf).unwrap();
    }

    #[test]
    fn listing_is_sorted_and_extension_filtered() {
        let dir = temp_dir("list");
        write_png(&dir.join("frame002.png"), 2, 2, [0, 0, 0, 255]);
        write_png(&dir.join("frame000.png"), 2, 2, [0, 0, 0, 255]);
        write_png(&dir.join("frame001.png"), 2, 2, [0, 0, 0, 255]);
        std::fs::write(dir.join("notes.txt"), b"not a frame").unwrap();

        let files = list_frame_files(&dir, "png").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["frame000.png", "frame001.png", "frame002.png"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn listing_missing_directory_fails() {
        let base = temp_dir("gone");
        assert!(list_frame_files(&base.join("missing"), "png").is_err());
        std::fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn load_frame_decodes_dimensions_and_pixels() {
        let dir = temp_dir("load");
        let path = dir.join("f.png");
        write_png(&path, 3, 2, [9, 8, 7, 255]);

        let frame = load_frame(&path, FrameIndex(4)).unwrap();
        assert_eq!(frame.index, FrameIndex(4));
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(&frame.data[0..4], &[9, 8, 7, 255]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_frame_rejects_non_image_bytes() {
        let dir = temp_dir("junk");
        let path = dir.join("f.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(load_frame(&path, FrameIndex(0)).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
