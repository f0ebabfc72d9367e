use crate::{
    assets::ImageData,
    config::Rgba,
    LyricStudioError, Result,
};

use super::{RenderSurface, SurfaceKind, TextStyle};

/// Hardware-accelerated backend over a headless wgpu target.
///
/// Intentionally a minimal subset of the call surface: viewport sizing and
/// clear run on the GPU, everything else is a tolerated no-op. The backend
/// exists as the forward-compatible seam for a full shader pipeline, and
/// callers already treat it through the same contract as the raster path.
pub struct AcceleratedSurface {
    device: wgpu::Device,
    queue: wgpu::Queue,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl AcceleratedSurface {
    /// Requests an adapter and device once; failure here routes callers to
    /// the raster fallback.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LyricStudioError::SurfaceUnavailable(format!(
                "cannot build a {width}x{height} accelerated target"
            )));
        }

        let instance = wgpu::Instance::default();
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            compatible_surface: None,
        }))
        .ok_or_else(|| {
            LyricStudioError::SurfaceUnavailable("no compatible GPU adapter".to_string())
        })?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("lyric-studio-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|err| LyricStudioError::SurfaceUnavailable(err.to_string()))?;

        let view = create_target(&device, width, height);

        Ok(Self {
            device,
            queue,
            view,
            width,
            height,
        })
    }
}

impl RenderSurface for AcceleratedSurface {
    fn kind(&self) -> SurfaceKind {
        SurfaceKind::Accelerated
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_viewport(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(LyricStudioError::SurfaceUnavailable(format!(
                "cannot build a {width}x{height} accelerated target"
            )));
        }
        if width == self.width && height == self.height {
            return Ok(());
        }
        self.view = create_target(&self.device, width, height);
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn clear(&mut self, color: Rgba) -> Result<()> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("lyric-studio-clear-encoder"),
            });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lyric-studio-clear-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: color.r as f64 / 255.0,
                        g: color.g as f64 / 255.0,
                        b: color.b as f64 / 255.0,
                        a: color.a as f64 / 255.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn draw_image(&mut self, _image: &ImageData) -> Result<()> {
        Ok(())
    }

    fn fill_text(&mut self, _text: &str, _x: f32, _y: f32, _style: &TextStyle) -> Result<()> {
        Ok(())
    }

    fn stroke_text(
        &mut self,
        _text: &str,
        _x: f32,
        _y: f32,
        _style: &TextStyle,
        _stroke_width: f32,
    ) -> Result<()> {
        Ok(())
    }

    fn fill_rect(
        &mut self,
        _x: f32,
        _y: f32,
        _width: f32,
        _height: f32,
        _color: Rgba,
    ) -> Result<()> {
        Ok(())
    }

    fn fill_circle(&mut self, _x: f32, _y: f32, _radius: f32, _color: Rgba) -> Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for AcceleratedSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcceleratedSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

fn create_target(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("lyric-studio-render-target"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
