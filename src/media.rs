//! Frame loading for image modes.
//!
//! All decoding happens here, when a mode is built, so that nothing blocks
//! inside a tick. A source can be a still image, an animated GIF, or a
//! directory of sequentially-numbered frame images
//! (e.g., `images/rain/frame_0001.png`).
//!
//! ## Rust concepts
//! - `fs::read_dir()` for directory traversal
//! - `Path` and `PathBuf` for cross-platform file paths
//! - `thiserror` for an error enum that wraps `io` and `image` errors

use crate::GridSize;
use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, DynamicImage, ImageReader, RgbImage};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("no image frames found in {0}")]
    NoFrames(PathBuf),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> MediaError + '_ {
    move |source| MediaError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn image_error(path: &Path) -> impl FnOnce(image::ImageError) -> MediaError + '_ {
    move |source| MediaError::Image {
        path: path.to_path_buf(),
        source,
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg" | "gif"))
}

fn resize(img: DynamicImage, size: GridSize) -> RgbImage {
    img.resize_exact(size.cols, size.rows, FilterType::Lanczos3)
        .to_rgb8()
}

/// Load every frame of `path`, scaled to `size` (`cols` wide, `rows` high).
pub fn load_frames(path: &Path, size: GridSize) -> Result<Vec<RgbImage>, MediaError> {
    let frames = if path.is_dir() {
        load_frame_paths(path)?
            .iter()
            .map(|frame| load_and_resize_image(frame, size))
            .collect::<Result<Vec<_>, _>>()?
    } else if path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gif"))
    {
        load_gif_frames(path, size)?
    } else {
        vec![load_and_resize_image(path, size)?]
    };

    if frames.is_empty() {
        return Err(MediaError::NoFrames(path.to_path_buf()));
    }
    tracing::info!("Loaded {} frame(s) from {}", frames.len(), path.display());
    Ok(frames)
}

/// Load an image from disk and resize it to the target dimensions.
pub fn load_and_resize_image(path: &Path, size: GridSize) -> Result<RgbImage, MediaError> {
    let img = ImageReader::open(path)
        .map_err(io_error(path))?
        .decode()
        .map_err(image_error(path))?;
    Ok(resize(img, size))
}

/// Decode every frame of an animated GIF, resizing each one.
pub fn load_gif_frames(path: &Path, size: GridSize) -> Result<Vec<RgbImage>, MediaError> {
    let file = File::open(path).map_err(io_error(path))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(image_error(path))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(image_error(path))?;
    Ok(frames
        .into_iter()
        .map(|frame| resize(DynamicImage::ImageRgba8(frame.into_buffer()), size))
        .collect())
}

/// Discover and sort all frame image files in a directory.
pub fn load_frame_paths(dir: &Path) -> Result<Vec<PathBuf>, MediaError> {
    let mut paths = Vec::new();

    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        if path.is_file() && is_frame_file(&path) {
            paths.push(path);
        }
    }

    paths.sort();

    if paths.is_empty() {
        return Err(MediaError::NoFrames(dir.to_path_buf()));
    }

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgb, RgbaImage};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn assert_close(pixel: &Rgb<u8>, expected: [u8; 3]) {
        for (got, want) in pixel.0.iter().zip(expected) {
            assert!(got.abs_diff(want) <= 2, "{pixel:?} is not close to {expected:?}");
        }
    }

    fn save_png(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(4, 2, Rgb(color)).save(&path).unwrap();
        path
    }

    #[test]
    fn still_image_is_resized_to_the_region() {
        let tmp = TempDir::new().unwrap();
        let path = save_png(tmp.path(), "still.png", [255, 0, 0]);

        let frames = load_frames(&path, GridSize::new(8, 16)).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].dimensions(), (16, 8));
        assert_close(frames[0].get_pixel(3, 3), [255, 0, 0]);
    }

    #[test]
    fn directory_frames_load_in_name_order() {
        let tmp = TempDir::new().unwrap();
        save_png(tmp.path(), "frame_0002.png", [0, 255, 0]);
        save_png(tmp.path(), "frame_0001.png", [255, 0, 0]);
        save_png(tmp.path(), "frame_0003.png", [0, 0, 255]);
        std::fs::write(tmp.path().join("notes.txt"), b"not a frame").unwrap();

        let paths = load_frame_paths(tmp.path()).unwrap();
        let names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["frame_0001.png", "frame_0002.png", "frame_0003.png"]);

        let frames = load_frames(tmp.path(), GridSize::new(2, 4)).unwrap();
        assert_eq!(frames.len(), 3);
        assert_close(frames[0].get_pixel(0, 0), [255, 0, 0]);
        assert_close(frames[2].get_pixel(0, 0), [0, 0, 255]);
    }

    #[test]
    fn animated_gif_yields_every_frame() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("anim.gif");
        {
            let file = File::create(&path).unwrap();
            let mut encoder = GifEncoder::new(file);
            let frames = [[255, 0, 0, 255], [0, 0, 255, 255]].map(|px| {
                Frame::from_parts(
                    RgbaImage::from_pixel(2, 2, image::Rgba(px)),
                    0,
                    0,
                    Delay::from_numer_denom_ms(100, 1),
                )
            });
            encoder.encode_frames(frames).unwrap();
        }

        let frames = load_frames(&path, GridSize::new(4, 4)).unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.dimensions() == (4, 4)));
    }

    #[test]
    fn empty_directory_has_no_frames() {
        let tmp = TempDir::new().unwrap();
        let err = load_frames(tmp.path(), GridSize::new(4, 4)).unwrap_err();
        assert!(matches!(err, MediaError::NoFrames(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_frames(&tmp.path().join("missing.png"), GridSize::new(4, 4)).unwrap_err();
        assert!(matches!(err, MediaError::Io { .. }));
    }
}
