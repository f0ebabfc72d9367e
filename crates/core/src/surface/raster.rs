use tiny_skia::{
    Color, FillRule, FilterQuality, IntSize, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect,
    Stroke, Transform,
};

use crate::{
    assets::ImageData,
    config::{Rgba, TextAlignment},
    LyricStudioError, Result,
};

use super::{RenderSurface, SurfaceKind, TextStyle};

/// Software rendering backend over a CPU pixmap.
///
/// Implements the full primitive set: text is drawn by resolving a system
/// font face and converting glyph outlines into paths.
pub struct RasterSurface {
    pixmap: Pixmap,
    fonts: FontLibrary,
    warned_missing_font: bool,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            LyricStudioError::SurfaceUnavailable(format!(
                "cannot allocate a {width}x{height} raster target"
            ))
        })?;
        Ok(Self {
            pixmap,
            fonts: FontLibrary::new(),
            warned_missing_font: false,
        })
    }

    /// The composited frame as premultiplied RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }

    fn draw_text_path(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
        stroke: Option<f32>,
    ) -> Result<()> {
        let Some(run) = self.fonts.text_run(text, style) else {
            if !self.warned_missing_font {
                tracing::warn!(family = style.family.name(), "no usable font face, skipping text");
                self.warned_missing_font = true;
            }
            return Ok(());
        };
        let Some(path) = run.path else {
            // A face was found but nothing is visible (empty or all-space).
            return Ok(());
        };

        let anchor_x = match style.alignment {
            TextAlignment::Left => x,
            TextAlignment::Center => x - run.advance / 2.0,
            TextAlignment::Right => x - run.advance,
        };
        let transform = Transform::from_translate(anchor_x, y);

        let mut paint = Paint::default();
        paint.set_color(to_skia(style.color));
        paint.anti_alias = true;

        match stroke {
            Some(width) => {
                let stroke = Stroke {
                    width,
                    ..Stroke::default()
                };
                self.pixmap
                    .stroke_path(&path, &paint, &stroke, transform, None);
            }
            None => {
                self.pixmap
                    .fill_path(&path, &paint, FillRule::Winding, transform, None);
            }
        }
        Ok(())
    }
}

impl RenderSurface for RasterSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Raster
    }

    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn set_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        if width == self.width() && height == self.height() {
            return Ok(());
        }
        self.pixmap = Pixmap::new(width, height).ok_or_else(|| {
            LyricStudioError::SurfaceUnavailable(format!(
                "cannot allocate a {width}x{height} raster target"
            ))
        })?;
        Ok(())
    }

    fn clear(&mut self, color: Rgba) -> Result<()> {
        self.pixmap.fill(to_skia(color));
        Ok(())
    }

    fn draw_image(&mut self, image: &ImageData) -> Result<()> {
        let size = IntSize::from_wh(image.width(), image.height())
            .ok_or_else(|| LyricStudioError::invalid_input("background image is zero-sized"))?;

        let mut data = image.data().to_vec();
        premultiply_rgba_in_place(&mut data);
        let source = Pixmap::from_vec(data, size)
            .ok_or_else(|| LyricStudioError::invalid_input("background image buffer mismatch"))?;

        let scale_x = self.width() as f32 / image.width() as f32;
        let scale_y = self.height() as f32 / image.height() as f32;

        let mut paint = PixmapPaint::default();
        paint.quality = FilterQuality::Bilinear;

        self.pixmap.draw_pixmap(
            0,
            0,
            source.as_ref(),
            &paint,
            Transform::from_scale(scale_x, scale_y),
            None,
        );
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()> {
        self.draw_text_path(text, x, y, style, None)
    }

    fn stroke_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
        stroke_width: f32,
    ) -> Result<()> {
        self.draw_text_path(text, x, y, style, Some(stroke_width))
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) -> Result<()> {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            // Degenerate rects (a zero-progress bar, for one) draw nothing.
            return Ok(());
        };
        let mut paint = Paint::default();
        paint.set_color(to_skia(color));
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
        Ok(())
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) -> Result<()> {
        let Some(path) = PathBuilder::from_circle(x, y, radius) else {
            return Ok(());
        };
        let mut paint = Paint::default();
        paint.set_color(to_skia(color));
        paint.anti_alias = true;
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        Ok(())
    }
}

impl std::fmt::Debug for RasterSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .finish()
    }
}

/// System font lookup plus glyph-outline extraction.
struct FontLibrary {
    db: fontdb::Database,
}

impl FontLibrary {
    fn new() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self { db }
    }

    /// Lays `text` out left-to-right and returns the combined glyph path in
    /// baseline coordinates together with the total advance width. `None`
    /// means no usable face exists for the requested family.
    fn text_run(&self, text: &str, style: &TextStyle) -> Option<TextRun> {
        let weight = if style.bold {
            fontdb::Weight::BOLD
        } else {
            fontdb::Weight::NORMAL
        };
        let query = fontdb::Query {
            families: &[
                fontdb::Family::Name(style.family.name()),
                fontdb::Family::SansSerif,
            ],
            weight,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = self.db.query(&query)?;

        self.db.with_face_data(id, |data, face_index| {
            let face = ttf_parser::Face::parse(data, face_index).ok()?;
            let scale = style.size / face.units_per_em() as f32;

            let mut builder = PathBuilder::new();
            let mut pen_x = 0.0f32;
            for ch in text.chars() {
                match face.glyph_index(ch) {
                    Some(glyph) => {
                        let mut outline = GlyphOutline {
                            builder: &mut builder,
                            scale,
                            dx: pen_x,
                        };
                        face.outline_glyph(glyph, &mut outline);
                        pen_x += face.glyph_hor_advance(glyph).unwrap_or(0) as f32 * scale;
                    }
                    // No glyph for this character; advance half an em.
                    None => pen_x += style.size * 0.5,
                }
            }

            Some(TextRun {
                path: builder.finish(),
                advance: pen_x,
            })
        })?
    }
}

/// Laid-out text: the combined glyph path (absent when nothing is visible)
/// and the total advance width.
struct TextRun {
    path: Option<Path>,
    advance: f32,
}

/// Feeds ttf-parser outlines into a tiny-skia path, scaling font units to
/// pixels and flipping the y axis into screen space.
struct GlyphOutline<'a> {
    builder: &'a mut PathBuilder,
    scale: f32,
    dx: f32,
}

impl ttf_parser::OutlineBuilder for GlyphOutline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder
            .move_to(self.dx + x * self.scale, -y * self.scale);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder
            .line_to(self.dx + x * self.scale, -y * self.scale);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.dx + x1 * self.scale,
            -y1 * self.scale,
            self.dx + x * self.scale,
            -y * self.scale,
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.dx + x1 * self.scale,
            -y1 * self.scale,
            self.dx + x2 * self.scale,
            -y2 * self.scale,
            self.dx + x * self.scale,
            -y * self.scale,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

fn to_skia(color: Rgba) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn premultiply_rgba_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        pixel[0] = ((pixel[0] as u16 * alpha) / 255) as u8;
        pixel[1] = ((pixel[1] as u16 * alpha) / 255) as u8;
        pixel[2] = ((pixel[2] as u16 * alpha) / 255) as u8;
    }
}
