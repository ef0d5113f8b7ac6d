use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

use crate::pipeline::{DrawUniforms, VertexInput, QUAD_INDICES, UNIT_QUAD};

use super::common::{premul_alpha_blend, vertex_layout, SpriteUniform};
use super::shader::{self, FRAGMENT_ENTRY, TEXTURE_GROUP, UNIFORM_GROUP, VERTEX_ENTRY};
use super::texture::{SpriteTexture, SpriteTextureDesc};
use super::{RenderCtx, RenderTarget};

const QUAD_VERTEX_BYTES: u64 = (4 * std::mem::size_of::<VertexInput>()) as u64;

/// One quad: four host-authored vertices and the uniforms for its draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteDraw {
    pub vertices: [VertexInput; 4],
    pub uniforms: DrawUniforms,
}

impl SpriteDraw {
    #[inline]
    pub const fn new(vertices: [VertexInput; 4], uniforms: DrawUniforms) -> Self {
        Self { vertices, uniforms }
    }

    /// The unit quad with texture coordinates equal to positions.
    #[inline]
    pub const fn unit(uniforms: DrawUniforms) -> Self {
        Self::new(UNIT_QUAD, uniforms)
    }
}

/// Draws textured, tinted quads.
///
/// Every [`SpriteDraw`] is its own draw call with its own `matrix` and
/// `colors`; uniforms for a frame live in one buffer addressed with dynamic
/// offsets. Quads are indexed `0, 1, 2, 2, 3, 0`.
#[derive(Default)]
pub struct SpriteRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    shader_checked: bool,

    uniform_bgl: Option<wgpu::BindGroupLayout>,
    texture_bgl: Option<wgpu::BindGroupLayout>,

    uniform_ubo: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_capacity: usize,
    uniform_stride: u64,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
    ibo: Option<wgpu::Buffer>,
}

impl SpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates the program and builds the pipeline for `ctx.surface_format`.
    ///
    /// Called implicitly by [`render`](Self::render); call it up front to
    /// surface setup errors before the first frame.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        if !self.shader_checked {
            shader::validate_sprite_shader().context("sprite program rejected")?;
            self.shader_checked = true;
        }
        self.ensure_layouts(ctx);
        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);
        Ok(())
    }

    /// Uploads `image` as a texture usable with this renderer.
    pub fn create_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        image: &image::RgbaImage,
        desc: SpriteTextureDesc,
    ) -> Result<SpriteTexture> {
        self.ensure_layouts(ctx);
        let Some(layout) = self.texture_bgl.as_ref() else {
            anyhow::bail!("texture bind group layout unavailable");
        };
        SpriteTexture::new(ctx, layout, image, desc)
    }

    /// Records one draw per entry of `draws`, sampling `texture`.
    ///
    /// An empty `draws` records nothing (a pending clear on `target` is left
    /// for the caller).
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        texture: &SpriteTexture,
        draws: &[SpriteDraw],
    ) -> Result<()> {
        if draws.is_empty() {
            return Ok(());
        }

        self.prepare(ctx)?;
        self.ensure_uniform_capacity(ctx, draws.len());
        self.ensure_vertex_capacity(ctx, draws.len());

        let stride = self.uniform_stride;
        let mut uniform_bytes = vec![0u8; stride as usize * draws.len()];
        for (i, draw) in draws.iter().enumerate() {
            let offset = i * stride as usize;
            let block = SpriteUniform::new(&draw.uniforms);
            uniform_bytes[offset..offset + SpriteUniform::SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&block));
        }
        let vertices: Vec<VertexInput> = draws.iter().flat_map(|d| d.vertices).collect();

        let Some(ubo) = self.uniform_ubo.as_ref() else { return Ok(()) };
        let Some(vbo) = self.vbo.as_ref() else { return Ok(()) };
        ctx.queue.write_buffer(ubo, 0, &uniform_bytes);
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(&vertices));

        let Some(pipeline) = self.pipeline.as_ref() else { return Ok(()) };
        let Some(uniform_bg) = self.uniform_bind_group.as_ref() else { return Ok(()) };
        let Some(ibo) = self.ibo.as_ref() else { return Ok(()) };

        let load = target.take_load_op();
        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("quadtint sprite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(TEXTURE_GROUP, texture.bind_group(), &[]);
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);

        for i in 0..draws.len() {
            let uniform_offset = (i as u64 * stride) as wgpu::DynamicOffset;
            let first = i as u64 * QUAD_VERTEX_BYTES;
            rpass.set_bind_group(UNIFORM_GROUP, uniform_bg, &[uniform_offset]);
            rpass.set_vertex_buffer(0, vbo.slice(first..first + QUAD_VERTEX_BYTES));
            rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
        }

        Ok(())
    }

    fn ensure_layouts(&mut self, ctx: &RenderCtx<'_>) {
        if self.uniform_bgl.is_some() && self.texture_bgl.is_some() {
            return;
        }

        let uniform_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quadtint sprite uniform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: Some(SpriteUniform::min_binding_size()),
                },
                count: None,
            }],
        });

        let texture_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quadtint sprite texture bgl"),
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

        self.uniform_bgl = Some(uniform_bgl);
        self.texture_bgl = Some(texture_bgl);

        // Dependent objects are rebuilt against the new layouts.
        self.pipeline = None;
        self.uniform_bind_group = None;
        self.uniform_ubo = None;
        self.uniform_capacity = 0;
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }
        let Some(uniform_bgl) = self.uniform_bgl.as_ref() else { return };
        let Some(texture_bgl) = self.texture_bgl.as_ref() else { return };

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quadtint sprite shader"),
            source: wgpu::ShaderSource::Wgsl(shader::SPRITE_WGSL.into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quadtint sprite pipeline layout"),
            // Indexed by UNIFORM_GROUP / TEXTURE_GROUP.
            bind_group_layouts: &[uniform_bgl, texture_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quadtint sprite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Host transforms may mirror the quad.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("sprite pipeline built for {:?}", ctx.surface_format);
        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.ibo.is_some() {
            return;
        }
        self.ibo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quadtint sprite quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        }));
    }

    fn ensure_uniform_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.uniform_capacity
            && self.uniform_ubo.is_some()
            && self.uniform_bind_group.is_some()
        {
            return;
        }
        let Some(bgl) = self.uniform_bgl.as_ref() else { return };

        let stride = ctx.uniform_stride(SpriteUniform::SIZE);
        let new_cap = required.next_power_of_two().max(16);

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadtint sprite uniform ubo"),
            size: new_cap as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadtint sprite uniform bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &ubo,
                    offset: 0,
                    size: Some(SpriteUniform::min_binding_size()),
                }),
            }],
        });

        self.uniform_ubo = Some(ubo);
        self.uniform_bind_group = Some(bind_group);
        self.uniform_capacity = new_cap;
        self.uniform_stride = stride;
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required_quads: usize) {
        if required_quads <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }
        let new_cap = required_quads.next_power_of_two().max(16);
        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quadtint sprite vbo"),
            size: new_cap as u64 * QUAD_VERTEX_BYTES,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = new_cap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn unit_draw_uses_unit_quad() {
        let d = SpriteDraw::unit(DrawUniforms::default());
        assert_eq!(d.vertices[2].position, Vec2::new(1.0, 1.0));
        assert_eq!(d.vertices[2].tex_coords, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn quad_vertex_span_is_64_bytes() {
        assert_eq!(QUAD_VERTEX_BYTES, 64);
    }
}
