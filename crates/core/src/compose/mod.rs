use std::f64::consts::TAU;

use crate::{
    assets::ImageData,
    config::{FontFamily, OverlayConfig, Rgba, StyleConfig, TextAlignment, TextEffect},
    particles::ParticleField,
    surface::{RenderSurface, TextStyle},
    sync::{format_timecode, LyricLine},
    Result,
};

const PARTICLE_SWAY_PX: f32 = 10.0;

const KINETIC_ADVANCE_PX: f32 = 20.0;
const KINETIC_BOB_PX: f64 = 10.0;
const KINETIC_CHAR_PHASE: f64 = 0.1;

const OUTLINE_STROKE_PX: f32 = 2.0;
const THREE_D_LAYERS: u32 = 5;
// Widest pass first so narrower, more opaque rings land on top.
const GLOW_PASSES: [(f32, u8); 3] = [(6.0, 35), (4.0, 60), (2.0, 90)];

const TIMECODE_X: f32 = 10.0;
const TIMECODE_Y: f32 = 20.0;
const TIMECODE_SIZE_PX: f32 = 16.0;

const PROGRESS_BAR_HEIGHT_PX: f32 = 5.0;
const PROGRESS_BAR_COLOR: Rgba = Rgba::new(255, 255, 255, 128);

/// Everything one composed frame reads, captured as a snapshot. The composer
/// never mutates any of it.
#[derive(Debug)]
pub struct FrameInput<'a> {
    pub style: &'a StyleConfig,
    pub track: &'a [LyricLine],
    pub active_index: Option<usize>,
    pub current_time: f64,
    pub duration: f64,
    pub background: Option<&'a ImageData>,
    pub particles: &'a ParticleField,
    pub overlays: OverlayConfig,
}

/// Produces one composited frame per tick of the 30 Hz timer.
///
/// The layer order is fixed: clear, background, particles, text, timecode,
/// progress bar. Each tick fully redraws from the snapshot; nothing carries
/// over between frames except the particle phase, which is a pure function
/// of the current time.
#[derive(Debug, Default)]
pub struct FrameComposer;

impl FrameComposer {
    pub fn new() -> Self {
        Self
    }

    pub fn compose(&self, surface: &mut dyn RenderSurface, input: &FrameInput<'_>) -> Result<()> {
        let width = surface.width() as f32;
        let height = surface.height() as f32;

        surface.clear(Rgba::TRANSPARENT)?;

        if let Some(image) = input.background {
            surface.draw_image(image)?;
        }

        if input.particles.enabled() {
            draw_particles(surface, input.particles, input.current_time)?;
        }

        if let Some(index) = input.active_index {
            if let Some(line) = input.track.get(index) {
                draw_lyric(surface, &line.text, input.style, input.current_time, width, height)?;
            }
        }

        if input.overlays.show_timecode {
            draw_timecode(surface, input.current_time)?;
        }

        if input.overlays.show_progress_bar {
            draw_progress_bar(surface, input.current_time, input.duration, width, height)?;
        }

        Ok(())
    }
}

fn draw_particles(
    surface: &mut dyn RenderSurface,
    field: &ParticleField,
    time: f64,
) -> Result<()> {
    for particle in field.particles() {
        let phase = time * particle.speed as f64;
        let x = particle.x + phase.sin() as f32 * PARTICLE_SWAY_PX;
        let y = particle.y + phase.cos() as f32 * PARTICLE_SWAY_PX;
        surface.fill_circle(x, y, particle.size, particle.color)?;
    }
    Ok(())
}

fn draw_lyric(
    surface: &mut dyn RenderSurface,
    text: &str,
    style: &StyleConfig,
    time: f64,
    width: f32,
    height: f32,
) -> Result<()> {
    let x = (style.position.x / 100.0) as f32 * width;
    let y = (style.position.y / 100.0) as f32 * height;
    let text_style = TextStyle {
        family: style.font_family,
        size: style.font_size as f32,
        color: style.color,
        alignment: style.alignment,
        bold: true,
    };

    if style.kinetic_typography {
        draw_kinetic(surface, text, x, y, time, &text_style)
    } else {
        draw_effect(surface, text, x, y, style.effect, &text_style)
    }
}

/// Per-character layout at a fixed advance, each character bobbing on a sine
/// keyed by global time and character index. Deliberately not keyed to
/// time-since-line-start: the motion is continuous across line changes.
fn draw_kinetic(
    surface: &mut dyn RenderSurface,
    text: &str,
    x: f32,
    y: f32,
    time: f64,
    style: &TextStyle,
) -> Result<()> {
    let mut buf = [0u8; 4];
    for (index, ch) in text.chars().enumerate() {
        let phase = (time + index as f64 * KINETIC_CHAR_PHASE) * TAU;
        let offset = (phase.sin() * KINETIC_BOB_PX) as f32;
        surface.fill_text(
            ch.encode_utf8(&mut buf),
            x + index as f32 * KINETIC_ADVANCE_PX,
            y + offset,
            style,
        )?;
    }
    Ok(())
}

fn draw_effect(
    surface: &mut dyn RenderSurface,
    text: &str,
    x: f32,
    y: f32,
    effect: TextEffect,
    style: &TextStyle,
) -> Result<()> {
    match effect {
        TextEffect::None => surface.fill_text(text, x, y, style)?,
        TextEffect::Glow => {
            // Stand-in for a blurred shadow: concentric translucent strokes
            // widest-first, then the plain fill on top.
            for (stroke_width, alpha) in GLOW_PASSES {
                let halo = TextStyle {
                    color: Rgba::WHITE.with_alpha(alpha),
                    ..*style
                };
                surface.stroke_text(text, x, y, &halo, stroke_width)?;
            }
            surface.fill_text(text, x, y, style)?;
        }
        TextEffect::Outline => {
            let outline = TextStyle {
                color: Rgba::WHITE,
                ..*style
            };
            surface.stroke_text(text, x, y, &outline, OUTLINE_STROKE_PX)?;
            surface.fill_text(text, x, y, style)?;
        }
        TextEffect::ThreeD => {
            for layer in 1..=THREE_D_LAYERS {
                let alpha = (0.2 * layer as f32 * 255.0).min(255.0) as u8;
                let depth = TextStyle {
                    color: Rgba::WHITE.with_alpha(alpha),
                    ..*style
                };
                surface.fill_text(text, x - layer as f32, y - layer as f32, &depth)?;
            }
            let top = TextStyle {
                color: Rgba::WHITE,
                ..*style
            };
            surface.fill_text(text, x, y, &top)?;
        }
    }
    Ok(())
}

fn draw_timecode(surface: &mut dyn RenderSurface, time: f64) -> Result<()> {
    let style = TextStyle {
        family: FontFamily::Arial,
        size: TIMECODE_SIZE_PX,
        color: Rgba::WHITE,
        alignment: TextAlignment::Left,
        bold: true,
    };
    surface.fill_text(&format_timecode(time), TIMECODE_X, TIMECODE_Y, &style)
}

fn draw_progress_bar(
    surface: &mut dyn RenderSurface,
    time: f64,
    duration: f64,
    width: f32,
    height: f32,
) -> Result<()> {
    if duration <= 0.0 {
        return Ok(());
    }
    let progress = (time / duration).clamp(0.0, 1.0) as f32;
    surface.fill_rect(
        0.0,
        height - PROGRESS_BAR_HEIGHT_PX,
        width * progress,
        PROGRESS_BAR_HEIGHT_PX,
        PROGRESS_BAR_COLOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceKind;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear,
        Image,
        Circle { x: f32, y: f32 },
        FillText { text: String, x: f32, y: f32, color: Rgba },
        StrokeText { text: String, width: f32, color: Rgba },
        Rect { x: f32, y: f32, w: f32, h: f32 },
    }

    /// Records every draw call so composition can be asserted without a real
    /// backend.
    struct RecordingSurface {
        width: u32,
        height: u32,
        ops: Vec<Op>,
    }

    impl RecordingSurface {
        fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                ops: Vec::new(),
            }
        }
    }

    impl RenderSurface for RecordingSurface {
        fn kind(&self) -> SurfaceKind {
            SurfaceKind::Raster
        }

        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn set_viewport(&mut self, width: u32, height: u32) -> Result<()> {
            self.width = width;
            self.height = height;
            Ok(())
        }

        fn clear(&mut self, _color: Rgba) -> Result<()> {
            self.ops.push(Op::Clear);
            Ok(())
        }

        fn draw_image(&mut self, _image: &ImageData) -> Result<()> {
            self.ops.push(Op::Image);
            Ok(())
        }

        fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()> {
            self.ops.push(Op::FillText {
                text: text.to_string(),
                x,
                y,
                color: style.color,
            });
            Ok(())
        }

        fn stroke_text(
            &mut self,
            text: &str,
            _x: f32,
            _y: f32,
            style: &TextStyle,
            stroke_width: f32,
        ) -> Result<()> {
            self.ops.push(Op::StrokeText {
                text: text.to_string(),
                width: stroke_width,
                color: style.color,
            });
            Ok(())
        }

        fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, _color: Rgba) -> Result<()> {
            self.ops.push(Op::Rect { x, y, w, h });
            Ok(())
        }

        fn fill_circle(&mut self, x: f32, y: f32, _radius: f32, _color: Rgba) -> Result<()> {
            self.ops.push(Op::Circle { x, y });
            Ok(())
        }
    }

    fn base_input<'a>(
        style: &'a StyleConfig,
        track: &'a [LyricLine],
        particles: &'a ParticleField,
    ) -> FrameInput<'a> {
        FrameInput {
            style,
            track,
            active_index: None,
            current_time: 0.0,
            duration: 0.0,
            background: None,
            particles,
            overlays: OverlayConfig::default(),
        }
    }

    #[test]
    fn layers_are_issued_in_fixed_order() {
        let style = StyleConfig::default();
        let track = vec![LyricLine::new("Hello", 0.0)];
        let mut particles = ParticleField::with_seed(3);
        particles.set_enabled(true, 320, 200);
        let image = ImageData::from_rgba(1, 1, vec![0, 0, 0, 255]).unwrap();

        let mut input = base_input(&style, &track, &particles);
        input.active_index = Some(0);
        input.current_time = 1.0;
        input.duration = 10.0;
        input.background = Some(&image);
        input.overlays = OverlayConfig {
            show_timecode: true,
            show_progress_bar: true,
        };

        let mut surface = RecordingSurface::new(320, 200);
        FrameComposer::new().compose(&mut surface, &input).unwrap();

        assert_eq!(surface.ops[0], Op::Clear);
        assert_eq!(surface.ops[1], Op::Image);

        let circles = 2..2 + crate::particles::PARTICLE_COUNT;
        assert!(surface.ops[circles.clone()]
            .iter()
            .all(|op| matches!(op, Op::Circle { .. })));

        // Lyric text, then the timecode, then the bar as the last op.
        let tail = &surface.ops[circles.end..];
        assert!(matches!(&tail[0], Op::FillText { text, .. } if text == "Hello"));
        assert!(matches!(&tail[1], Op::FillText { text, .. } if text == "00:00:01"));
        assert!(matches!(tail[2], Op::Rect { .. }));
        assert_eq!(tail.len(), 3);
    }

    #[test]
    fn no_text_is_drawn_without_an_active_line() {
        let style = StyleConfig::default();
        let track = vec![LyricLine::new("later", 99.0)];
        let particles = ParticleField::new();

        let input = base_input(&style, &track, &particles);
        let mut surface = RecordingSurface::new(100, 100);
        FrameComposer::new().compose(&mut surface, &input).unwrap();

        assert_eq!(surface.ops, vec![Op::Clear]);
    }

    #[test]
    fn particles_sway_as_a_pure_function_of_time() {
        let style = StyleConfig::default();
        let track = Vec::new();
        let mut particles = ParticleField::with_seed(11);
        particles.set_enabled(true, 640, 480);

        let mut input = base_input(&style, &track, &particles);
        input.current_time = 2.0;

        let mut surface = RecordingSurface::new(640, 480);
        FrameComposer::new().compose(&mut surface, &input).unwrap();

        let circles: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Circle { x, y } => Some((*x, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(circles.len(), crate::particles::PARTICLE_COUNT);

        for (particle, (x, y)) in particles.particles().iter().zip(&circles) {
            let phase = 2.0 * particle.speed as f64;
            assert!((x - (particle.x + phase.sin() as f32 * 10.0)).abs() < 1e-4);
            assert!((y - (particle.y + phase.cos() as f32 * 10.0)).abs() < 1e-4);
        }

        // Same snapshot, same time, same frame: ticks are idempotent.
        let mut again = RecordingSurface::new(640, 480);
        FrameComposer::new().compose(&mut again, &input).unwrap();
        assert_eq!(surface.ops, again.ops);
    }

    #[test]
    fn kinetic_mode_lays_characters_out_at_fixed_advance() {
        let mut style = StyleConfig::default();
        style.kinetic_typography = true;
        style.effect = TextEffect::ThreeD; // must be overridden by kinetic
        let track = vec![LyricLine::new("abc", 0.0)];
        let particles = ParticleField::new();

        let mut input = base_input(&style, &track, &particles);
        input.active_index = Some(0);
        input.current_time = 0.25;

        let mut surface = RecordingSurface::new(1000, 500);
        FrameComposer::new().compose(&mut surface, &input).unwrap();

        let texts: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::FillText { text, x, y, .. } => Some((text.clone(), *x, *y)),
                _ => None,
            })
            .collect();

        assert_eq!(texts.len(), 3);
        assert_eq!(texts[0].0, "a");
        assert_eq!(texts[1].0, "b");
        assert_eq!(texts[2].0, "c");
        assert!((texts[1].1 - texts[0].1 - 20.0).abs() < 1e-4);
        assert!((texts[2].1 - texts[1].1 - 20.0).abs() < 1e-4);

        let base_y = (style.position.y / 100.0) as f32 * 500.0;
        for (index, (_, _, y)) in texts.iter().enumerate() {
            let expected = ((0.25 + index as f64 * 0.1) * TAU).sin() * 10.0;
            assert!((y - base_y - expected as f32).abs() < 1e-3);
        }
    }

    #[test]
    fn three_d_effect_stacks_five_offset_copies_under_a_solid_top() {
        let mut style = StyleConfig::default();
        style.effect = TextEffect::ThreeD;
        let track = vec![LyricLine::new("deep", 0.0)];
        let particles = ParticleField::new();

        let mut input = base_input(&style, &track, &particles);
        input.active_index = Some(0);

        let mut surface = RecordingSurface::new(200, 100);
        FrameComposer::new().compose(&mut surface, &input).unwrap();

        let fills: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::FillText { x, y, color, .. } => Some((*x, *y, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 6);

        let (top_x, top_y, top_color) = fills[5];
        for (layer, &(x, y, color)) in fills[..5].iter().enumerate() {
            let depth = (layer + 1) as f32;
            assert!((top_x - x - depth).abs() < 1e-4);
            assert!((top_y - y - depth).abs() < 1e-4);
            assert_eq!(color.a, (0.2 * depth * 255.0) as u8);
        }
        assert_eq!(top_color, Rgba::WHITE);
    }

    #[test]
    fn outline_effect_strokes_before_filling() {
        let mut style = StyleConfig::default();
        style.effect = TextEffect::Outline;
        let track = vec![LyricLine::new("edge", 0.0)];
        let particles = ParticleField::new();

        let mut input = base_input(&style, &track, &particles);
        input.active_index = Some(0);

        let mut surface = RecordingSurface::new(200, 100);
        FrameComposer::new().compose(&mut surface, &input).unwrap();

        assert!(matches!(
            surface.ops[1],
            Op::StrokeText { ref text, width, .. } if text == "edge" && width == 2.0
        ));
        assert!(matches!(surface.ops[2], Op::FillText { .. }));
    }

    #[test]
    fn progress_bar_fills_in_proportion_to_playback() {
        let style = StyleConfig::default();
        let track = Vec::new();
        let particles = ParticleField::new();

        let mut input = base_input(&style, &track, &particles);
        input.current_time = 30.0;
        input.duration = 120.0;
        input.overlays.show_progress_bar = true;

        let mut surface = RecordingSurface::new(400, 300);
        FrameComposer::new().compose(&mut surface, &input).unwrap();

        assert!(matches!(
            surface.ops[1],
            Op::Rect { x, y, w, h } if x == 0.0 && y == 295.0 && w == 100.0 && h == 5.0
        ));

        // Unknown duration suppresses the bar instead of dividing by zero.
        input.duration = 0.0;
        let mut surface = RecordingSurface::new(400, 300);
        FrameComposer::new().compose(&mut surface, &input).unwrap();
        assert_eq!(surface.ops, vec![Op::Clear]);
    }
}
