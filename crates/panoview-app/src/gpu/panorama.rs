//! The player's rendering context: an inward-facing sphere with a
//! video-backed texture, drawn mono or as side-by-side stereo.

use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingResource, BindingType, BufferBindingType, ColorTargetState,
    CommandEncoder, Device, FragmentState, PipelineCompilationOptions, PipelineLayoutDescriptor,
    PrimitiveState, Queue, RenderPipeline, SamplerBindingType, ShaderStages, TextureFormat,
    TextureSampleType, TextureView, TextureViewDimension, VertexState,
};

use bytemuck::{Pod, Zeroable};

use super::camera::{Camera, Eye};
use super::sphere::{self, Vertex};
use crate::media::DecodedFrame;

const PANORAMA_SHADER: &str = include_str!("../../../../assets/shaders/panorama.wgsl");

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CameraUniforms {
    view_proj: [[f32; 4]; 4],
}

pub struct PanoramaRenderer {
    camera: Camera,
    stereo: bool,
    surface_width: u32,
    surface_height: u32,
    media_width: u32,
    media_height: u32,
    frame_texture: wgpu::Texture,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    // One uniform buffer per eye: a single buffer written twice per
    // submission would hold only the second write when the GPU reads it.
    eye_buffers: [wgpu::Buffer; 2],
    eye_bind_groups: [BindGroup; 2],
    texture_bind_group: BindGroup,
    pipeline: RenderPipeline,
}

impl PanoramaRenderer {
    pub fn new(
        device: &Device,
        queue: &Queue,
        format: TextureFormat,
        surface_width: u32,
        surface_height: u32,
        first_frame: &DecodedFrame,
    ) -> Self {
        let (media_width, media_height) = (first_frame.width, first_frame.height);

        // Frame texture (sRGB for auto-conversion on sample)
        let frame_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("panorama-frame"),
            size: wgpu::Extent3d {
                width: media_width,
                height: media_height,
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
        let frame_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("panorama-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            ..Default::default()
        });

        // Sphere geometry
        let mesh = sphere::build();
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("panorama-vertices"),
            size: (mesh.vertices.len() * std::mem::size_of::<Vertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("panorama-indices"),
            size: (mesh.indices.len() * std::mem::size_of::<u32>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&index_buffer, 0, bytemuck::cast_slice(&mesh.indices));

        // Bind group layouts: camera uniform (0), texture + sampler (1)
        let camera_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("panorama-camera-bgl"),
            entries: &[BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: std::num::NonZeroU64::new(
                        std::mem::size_of::<CameraUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });
        let texture_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("panorama-texture-bgl"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let eye_buffers = std::array::from_fn(|i| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(if i == 0 {
                    "panorama-camera-left"
                } else {
                    "panorama-camera-right"
                }),
                size: std::mem::size_of::<CameraUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });
        let eye_bind_groups = std::array::from_fn(|i| {
            device.create_bind_group(&BindGroupDescriptor {
                label: Some("panorama-camera-bg"),
                layout: &camera_layout,
                entries: &[BindGroupEntry {
                    binding: 0,
                    resource: eye_buffers[i].as_entire_binding(),
                }],
            })
        });
        let texture_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("panorama-texture-bg"),
            layout: &texture_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(&frame_view),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(&frame_sampler),
                },
            ],
        });

        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("panorama-shader"),
            source: wgpu::ShaderSource::Wgsl(PANORAMA_SHADER.into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("panorama-layout"),
            bind_group_layouts: &[&camera_layout, &texture_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("panorama-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader_module,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &shader_module,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // Both faces: the camera is inside the mirrored sphere.
                cull_mode: None,
                ..PrimitiveState::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let renderer = Self {
            camera: Camera::new(surface_width, surface_height),
            stereo: false,
            surface_width,
            surface_height,
            media_width,
            media_height,
            frame_texture,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            eye_buffers,
            eye_bind_groups,
            texture_bind_group,
            pipeline,
        };
        renderer.write_camera_uniforms(queue);
        renderer.upload_frame(queue, first_frame);

        log::info!(
            "panorama context created: {}x{} frames, {} indices",
            media_width,
            media_height,
            renderer.index_count
        );

        renderer
    }

    pub fn is_stereo(&self) -> bool {
        self.stereo
    }

    pub fn set_stereo(&mut self, queue: &Queue, stereo: bool) {
        if self.stereo != stereo {
            self.stereo = stereo;
            self.write_camera_uniforms(queue);
        }
    }

    pub fn resize(&mut self, queue: &Queue, width: u32, height: u32) {
        self.surface_width = width.max(1);
        self.surface_height = height.max(1);
        self.camera.set_viewport(self.surface_width, self.surface_height);
        self.write_camera_uniforms(queue);
    }

    fn write_camera_uniforms(&self, queue: &Queue) {
        let eyes = if self.stereo {
            [Eye::Left, Eye::Right]
        } else {
            [Eye::Mono, Eye::Mono]
        };
        for (buffer, eye) in self.eye_buffers.iter().zip(eyes) {
            let uniforms = CameraUniforms {
                view_proj: self.camera.view_proj(eye).to_cols_array_2d(),
            };
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&uniforms));
        }
    }

    /// Upload one decoded frame into the video texture.
    pub fn upload_frame(&self, queue: &Queue, frame: &DecodedFrame) {
        if frame.width != self.media_width || frame.height != self.media_height {
            log::warn!(
                "frame size {}x{} does not match texture {}x{}, skipping upload",
                frame.width,
                frame.height,
                self.media_width,
                self.media_height
            );
            return;
        }
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.frame_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &frame.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.media_width * 4),
                rows_per_image: Some(self.media_height),
            },
            wgpu::Extent3d {
                width: self.media_width,
                height: self.media_height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Draw the sphere into `target`: one full-viewport pass in mono, two
    /// half-viewport passes in stereo.
    pub fn render(&self, encoder: &mut CommandEncoder, target: &TextureView) {
        let w = self.surface_width as f32;
        let h = self.surface_height as f32;
        if self.stereo {
            self.eye_pass(encoder, target, 0, 0.0, w / 2.0, h, true);
            self.eye_pass(encoder, target, 1, w / 2.0, w / 2.0, h, false);
        } else {
            self.eye_pass(encoder, target, 0, 0.0, w, h, true);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn eye_pass(
        &self,
        encoder: &mut CommandEncoder,
        target: &TextureView,
        eye_index: usize,
        viewport_x: f32,
        viewport_w: f32,
        viewport_h: f32,
        clear: bool,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("panorama-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: if clear {
                        wgpu::LoadOp::Clear(wgpu::Color::BLACK)
                    } else {
                        wgpu::LoadOp::Load
                    },
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_viewport(viewport_x, 0.0, viewport_w, viewport_h, 0.0, 1.0);
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.eye_bind_groups[eye_index], &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}
