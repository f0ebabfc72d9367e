mod accelerated;
mod raster;

pub use accelerated::AcceleratedSurface;
pub use raster::RasterSurface;

use crate::{
    assets::ImageData,
    config::{FontFamily, Rgba, TextAlignment},
    Result,
};

/// Which backend ended up behind the trait object. Informational only;
/// composition code never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Raster,
    Accelerated,
}

/// Parameters for a single text drawing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub family: FontFamily,
    pub size: f32,
    pub color: Rgba,
    pub alignment: TextAlignment,
    pub bold: bool,
}

/// Capability contract over a drawing target.
///
/// Two backends implement it: the software raster pixmap and the
/// hardware-accelerated offscreen target. A backend is allowed to implement
/// only a subset of the call surface (unsupported primitives return `Ok(())`
/// and draw nothing), so callers must not rely on more than clear producing
/// visible output on every backend.
pub trait RenderSurface {
    fn kind(&self) -> SurfaceKind;
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Resizes the drawing target. Contents are undefined afterwards until
    /// the next clear.
    fn set_viewport(&mut self, width: u32, height: u32) -> Result<()>;

    /// Fills the whole viewport with one color.
    fn clear(&mut self, color: Rgba) -> Result<()>;

    /// Draws a decoded image scaled to fill the viewport.
    fn draw_image(&mut self, image: &ImageData) -> Result<()>;

    /// Fills text anchored at `(x, y)` on the baseline, honoring the style's
    /// alignment relative to `x`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()>;

    /// Strokes the outline of text with the given stroke width.
    fn stroke_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
        stroke_width: f32,
    ) -> Result<()>;

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) -> Result<()>;

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) -> Result<()>;
}

/// Obtains a drawing surface for the given output resolution.
///
/// The accelerated backend is preferred when the host reports a usable
/// adapter; otherwise the raster backend takes over. The decision is made
/// once here, never per frame. Only when neither backend can be built does
/// this fail, with [`SurfaceUnavailable`](crate::LyricStudioError::SurfaceUnavailable).
pub fn acquire(width: u32, height: u32) -> Result<Box<dyn RenderSurface>> {
    match AcceleratedSurface::new(width, height) {
        Ok(surface) => {
            tracing::info!(width, height, "acquired accelerated surface");
            Ok(Box::new(surface))
        }
        Err(err) => {
            tracing::warn!(%err, "accelerated surface unavailable, falling back to raster");
            let surface = RasterSurface::new(width, height)?;
            tracing::info!(width, height, "acquired raster surface");
            Ok(Box::new(surface))
        }
    }
}
