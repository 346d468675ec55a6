//! Presents a [`Canvas`] in a window
//!
//! The composited canvas pixels are uploaded into an sRGB texture every
//! frame and stretched over the window surface with a fullscreen-triangle
//! blit pipeline.

use std::fmt;
use std::sync::Arc;

use winit::window::Window;

use crate::canvas::Canvas;

/// Presentation failure
#[derive(Debug)]
pub enum PresentError {
    /// No GPU adapter can drive the window surface
    NoAdapter,
    /// Surface creation or configuration failed
    Surface(String),
    /// Device request failed
    Device(String),
    /// The GPU ran out of memory
    OutOfMemory,
    /// Canvas size differs from the upload texture
    SizeMismatch { expected: (u32, u32), actual: (u32, u32) },
    /// Canvas is larger than the device's largest 2D texture
    TooLarge { size: (u32, u32), max: u32 },
}

impl fmt::Display for PresentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentError::NoAdapter => write!(f, "No suitable GPU adapter"),
            PresentError::Surface(msg) => write!(f, "Surface error: {}", msg),
            PresentError::Device(msg) => write!(f, "Device error: {}", msg),
            PresentError::OutOfMemory => write!(f, "Out of memory"),
            PresentError::SizeMismatch { expected, actual } => write!(
                f,
                "Canvas is {}x{} but presenter expects {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            PresentError::TooLarge { size, max } => write!(
                f,
                "Canvas is {}x{} but the device allows at most {}x{}",
                size.0, size.1, max, max
            ),
        }
    }
}

impl std::error::Error for PresentError {}

/// Reject frame sizes the upload texture cannot hold
fn check_frame_size(size: (u32, u32), max: u32) -> Result<(), PresentError> {
    if size.0 > max || size.1 > max {
        return Err(PresentError::TooLarge { size, max });
    }
    Ok(())
}

/// Window surface plus the blit pipeline for one canvas size
pub struct Presenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    frame_texture: wgpu::Texture,
    frame_size: (u32, u32),
}

impl Presenter {
    /// Create a presenter for a `canvas_width x canvas_height` canvas
    pub async fn new(
        window: Arc<Window>,
        canvas_width: u32,
        canvas_height: u32,
        vsync: bool,
    ) -> Result<Self, PresentError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .map_err(|e| PresentError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(PresentError::NoAdapter)?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Present Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::default(),
                },
                None,
            )
            .await
            .map_err(|e| PresentError::Device(e.to_string()))?;

        let max = device.limits().max_texture_dimension_2d;
        check_frame_size((canvas_width, canvas_height), max).map_err(|e| {
            log::error!("{}", e);
            e
        })?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| PresentError::Surface("surface reports no formats".to_string()))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let frame_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: wgpu::Extent3d {
                width: canvas_width,
                height: canvas_height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let frame_view = frame_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Frame Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Blit Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Blit Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&frame_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Blit Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_group,
            frame_texture,
            frame_size: (canvas_width, canvas_height),
        })
    }

    /// Reconfigure the surface for a new window size
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload `canvas` and show it
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn present(&mut self, canvas: &Canvas) -> Result<(), PresentError> {
        let actual = (canvas.width(), canvas.height());
        if actual != self.frame_size {
            return Err(PresentError::SizeMismatch {
                expected: self.frame_size,
                actual,
            });
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(PresentError::OutOfMemory),
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
                return Ok(());
            }
        };

        let (width, height) = self.frame_size;
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.frame_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &canvas.composited_rgba(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Blit Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_error_display() {
        assert_eq!(format!("{}", PresentError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!(
                "{}",
                PresentError::SizeMismatch {
                    expected: (500, 500),
                    actual: (10, 20)
                }
            ),
            "Canvas is 10x20 but presenter expects 500x500"
        );
    }

    #[test]
    fn test_frame_size_against_texture_limit() {
        // webgl2 downlevel limit
        let max = 2048;
        assert!(check_frame_size((500, 500), max).is_ok());
        assert!(check_frame_size((2048, 2048), max).is_ok());

        let err = check_frame_size((16384, 500), max).unwrap_err();
        assert!(matches!(
            err,
            PresentError::TooLarge {
                size: (16384, 500),
                max: 2048
            }
        ));
        assert_eq!(
            err.to_string(),
            "Canvas is 16384x500 but the device allows at most 2048x2048"
        );
        assert!(check_frame_size((500, 4096), max).is_err());
    }
}
