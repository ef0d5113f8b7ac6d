use anyhow::{ensure, Result};

use crate::texture::{AddressMode, FilterMode, SamplerConfig};

use super::RenderCtx;

/// How a sprite image is uploaded and sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteTextureDesc {
    pub sampler: SamplerConfig,
    /// Upload as `Rgba8UnormSrgb` so sampling returns linear values.
    pub srgb: bool,
}

impl Default for SpriteTextureDesc {
    fn default() -> Self {
        Self {
            sampler: SamplerConfig::default(),
            srgb: true,
        }
    }
}

/// The `tex` binding of a draw: texture, view, sampler and their bind group.
///
/// Created through [`SpriteRenderer::create_texture`](super::SpriteRenderer::create_texture)
/// so the bind group matches the renderer's layout.
pub struct SpriteTexture {
    texture: wgpu::Texture,
    // kept alive for the bind group
    _view: wgpu::TextureView,
    _sampler: wgpu::Sampler,
    bind_group: wgpu::BindGroup,
}

impl SpriteTexture {
    pub(super) fn new(
        ctx: &RenderCtx<'_>,
        layout: &wgpu::BindGroupLayout,
        image: &image::RgbaImage,
        desc: SpriteTextureDesc,
    ) -> Result<Self> {
        let (width, height) = image.dimensions();
        ensure!(width > 0 && height > 0, "sprite image has zero size ({width}x{height})");

        let max = ctx.device.limits().max_texture_dimension_2d;
        ensure!(
            width <= max && height <= max,
            "sprite image {width}x{height} exceeds the device limit of {max}"
        );

        let format = if desc.srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quadtint sprite texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let address = to_wgpu_address(desc.sampler.address_mode);
        let filter = to_wgpu_filter(desc.sampler.filter);
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quadtint sprite sampler"),
            address_mode_u: address,
            address_mode_v: address,
            address_mode_w: address,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quadtint sprite texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let this = Self {
            texture,
            _view: view,
            _sampler: sampler,
            bind_group,
        };
        this.upload(ctx, image);

        log::debug!("sprite texture created: {width}x{height}, {:?}", desc.sampler);
        Ok(this)
    }

    #[inline]
    pub(super) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    fn upload(&self, ctx: &RenderCtx<'_>, image: &image::RgbaImage) {
        let (width, height) = image.dimensions();
        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
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
    }
}

pub(super) fn to_wgpu_address(mode: AddressMode) -> wgpu::AddressMode {
    match mode {
        AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
        AddressMode::Repeat => wgpu::AddressMode::Repeat,
        AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
    }
}

pub(super) fn to_wgpu_filter(mode: FilterMode) -> wgpu::FilterMode {
    match mode {
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
        FilterMode::Linear => wgpu::FilterMode::Linear,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_desc_matches_atlas_setup() {
        let d = SpriteTextureDesc::default();
        assert_eq!(d.sampler.address_mode, AddressMode::ClampToEdge);
        assert_eq!(d.sampler.filter, FilterMode::Linear);
        assert!(d.srgb);
    }

    #[test]
    fn sampler_modes_map_one_to_one() {
        assert_eq!(to_wgpu_address(AddressMode::Repeat), wgpu::AddressMode::Repeat);
        assert_eq!(to_wgpu_address(AddressMode::MirrorRepeat), wgpu::AddressMode::MirrorRepeat);
        assert_eq!(to_wgpu_filter(FilterMode::Nearest), wgpu::FilterMode::Nearest);
    }
}
