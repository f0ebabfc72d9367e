use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::LyricStudioError;

/// Smallest font size the style surface accepts.
pub const MIN_FONT_SIZE: u32 = 12;
/// Largest font size the style surface accepts.
pub const MAX_FONT_SIZE: u32 = 72;

/// Straight-alpha RGBA color used across the style surface and the drawing
/// primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with a different alpha channel.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

/// The enumerated set of font families offered by the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Arial,
    Verdana,
    TimesNewRoman,
    Courier,
}

impl FontFamily {
    /// The family name as the host font database knows it.
    pub fn name(self) -> &'static str {
        match self {
            FontFamily::Arial => "Arial",
            FontFamily::Verdana => "Verdana",
            FontFamily::TimesNewRoman => "Times New Roman",
            FontFamily::Courier => "Courier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Mutually exclusive static text effects. Ignored while kinetic typography
/// is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEffect {
    #[default]
    None,
    Glow,
    Outline,
    ThreeD,
}

/// Accepted by the configuration surface but not consumed by any rendering
/// step; the effect/kinetic switch is the only animation control that has an
/// observable result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnimation {
    None,
    #[default]
    Fade,
    Slide,
}

/// Text anchor expressed as percentages of the output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPosition {
    pub x: f64,
    pub y: f64,
}

impl TextPosition {
    /// Builds a position with both axes clamped to [0, 100].
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(0.0, 100.0),
            y: y.clamp(0.0, 100.0),
        }
    }
}

impl Default for TextPosition {
    fn default() -> Self {
        Self { x: 50.0, y: 90.0 }
    }
}

/// Snapshot of the text styling surface, consumed once per composed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub font_family: FontFamily,
    pub font_size: u32,
    pub color: Rgba,
    pub alignment: TextAlignment,
    pub position: TextPosition,
    pub shadow: String,
    pub effect: TextEffect,
    pub animation: TextAnimation,
    pub kinetic_typography: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: FontFamily::default(),
            font_size: 24,
            color: Rgba::WHITE,
            alignment: TextAlignment::default(),
            position: TextPosition::default(),
            shadow: "2px 2px 4px #000000".to_string(),
            effect: TextEffect::default(),
            animation: TextAnimation::default(),
            kinetic_typography: false,
        }
    }
}

impl StyleConfig {
    /// Applies a font size request, clamped to the accepted [12, 72] range.
    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    /// Moves the text anchor, clamping both axes to [0, 100] percent.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = TextPosition::new(x, y);
    }
}

/// Toggles for the informational overlays drawn on top of the text layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub show_timecode: bool,
    pub show_progress_bar: bool,
}

/// Output resolution of the preview surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    Hd720,
    FullHd1080,
    Uhd4k,
    Custom {
        width: u32,
        height: u32,
    },
}

impl Resolution {
    pub fn width(self) -> u32 {
        match self {
            Resolution::Hd720 => 1280,
            Resolution::FullHd1080 => 1920,
            Resolution::Uhd4k => 3840,
            Resolution::Custom { width, .. } => width,
        }
    }

    pub fn height(self) -> u32 {
        match self {
            Resolution::Hd720 => 720,
            Resolution::FullHd1080 => 1080,
            Resolution::Uhd4k => 2160,
            Resolution::Custom { height, .. } => height,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width(), self.height())
    }
}

impl FromStr for Resolution {
    type Err = LyricStudioError;

    /// Parses a `WIDTHxHEIGHT` string, mapping the known presets onto their
    /// named variants.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (width, height) = value
            .split_once('x')
            .ok_or_else(|| LyricStudioError::invalid_input("expected WIDTHxHEIGHT"))?;
        let width: u32 = width
            .trim()
            .parse()
            .map_err(|_| LyricStudioError::invalid_input("resolution width is not a number"))?;
        let height: u32 = height
            .trim()
            .parse()
            .map_err(|_| LyricStudioError::invalid_input("resolution height is not a number"))?;

        if width == 0 || height == 0 {
            return Err(LyricStudioError::invalid_input(
                "resolution must be non-zero in both axes",
            ));
        }

        Ok(match (width, height) {
            (1280, 720) => Resolution::Hd720,
            (1920, 1080) => Resolution::FullHd1080,
            (3840, 2160) => Resolution::Uhd4k,
            (width, height) => Resolution::Custom { width, height },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_is_clamped_to_accepted_range() {
        let mut style = StyleConfig::default();
        style.set_font_size(6);
        assert_eq!(style.font_size, MIN_FONT_SIZE);
        style.set_font_size(400);
        assert_eq!(style.font_size, MAX_FONT_SIZE);
        style.set_font_size(36);
        assert_eq!(style.font_size, 36);
    }

    #[test]
    fn text_position_is_clamped_to_percentages() {
        let position = TextPosition::new(-10.0, 150.0);
        assert_eq!(position.x, 0.0);
        assert_eq!(position.y, 100.0);
    }

    #[test]
    fn resolution_parses_presets_and_custom_sizes() {
        let preset: Resolution = "1920x1080".parse().unwrap();
        assert_eq!(preset, Resolution::FullHd1080);

        let custom: Resolution = "640x360".parse().unwrap();
        assert_eq!(
            custom,
            Resolution::Custom {
                width: 640,
                height: 360
            }
        );
        assert_eq!(custom.to_string(), "640x360");

        assert!("1920".parse::<Resolution>().is_err());
        assert!("0x720".parse::<Resolution>().is_err());
    }
}
