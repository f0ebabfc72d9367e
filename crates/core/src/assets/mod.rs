use std::path::Path;

use image::ImageReader;

use crate::{LyricStudioError, Result};

/// Decoded background image held as straight-alpha RGBA bytes.
///
/// Loading is the asynchronous part of the pipeline: a frame composed while
/// the background is still decoding simply leaves that layer empty, and the
/// image is drawn on the first tick after the handle becomes available. A
/// load that lands after state has moved on draws against whatever state is
/// current then; the possibly stale frame is corrected on the next tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl ImageData {
    /// Wraps raw RGBA bytes, validating the buffer length.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(LyricStudioError::invalid_input(format!(
                "image buffer holds {} bytes, expected {expected} for {width}x{height}",
                rgba.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Straight-alpha RGBA bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.rgba
    }
}

/// Decodes a background image from disk. Anything that is not a readable
/// image file is rejected as invalid input, leaving prior state untouched.
pub fn load_background_image(path: &Path) -> Result<ImageData> {
    let decoded = ImageReader::open(path)?
        .decode()
        .map_err(|err| {
            LyricStudioError::invalid_input(format!(
                "please upload a valid image file: {err}"
            ))
        })?
        .to_rgba8();

    let (width, height) = decoded.dimensions();
    ImageData::from_rgba(width, height, decoded.into_raw())
}

/// Checks that an audio path carries the accepted extension before it is
/// handed to the player.
pub fn validate_audio_path(path: &Path) -> Result<()> {
    let is_mp3 = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false);

    if is_mp3 {
        Ok(())
    } else {
        Err(LyricStudioError::invalid_input(
            "please upload a valid MP3 file",
        ))
    }
}
