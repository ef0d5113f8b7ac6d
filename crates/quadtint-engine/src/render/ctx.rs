use crate::coords::Viewport;
use crate::paint::Color;

/// Device handles and frame parameters a renderer needs to record a draw.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Drawable size in physical pixels.
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }

    /// Stride between per-draw uniform blocks in a dynamically offset buffer.
    pub fn uniform_stride(&self, block_size: u64) -> u64 {
        let align = u64::from(self.device.limits().min_uniform_buffer_offset_alignment).max(1);
        block_size.div_ceil(align) * align
    }
}

/// Encoder and color attachment for the current frame.
///
/// A pending clear is folded into the first render pass that runs; later
/// passes load what is already there.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pending_clear: Option<Color>,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self {
            encoder,
            color_view,
            pending_clear: None,
        }
    }

    /// Requests that the attachment be cleared before anything is drawn.
    #[inline]
    pub fn with_clear(mut self, color: Color) -> Self {
        self.pending_clear = Some(color);
        self
    }

    #[inline]
    pub fn has_pending_clear(&self) -> bool {
        self.pending_clear.is_some()
    }

    /// Load op for the next pass; consumes the pending clear.
    pub fn take_load_op(&mut self) -> wgpu::LoadOp<wgpu::Color> {
        match self.pending_clear.take() {
            Some(c) => wgpu::LoadOp::Clear(wgpu::Color {
                r: c.r as f64,
                g: c.g as f64,
                b: c.b as f64,
                a: c.a as f64,
            }),
            None => wgpu::LoadOp::Load,
        }
    }

    /// Runs an empty pass if a clear is still pending.
    pub fn flush_clear(&mut self, label: &str) {
        if !self.has_pending_clear() {
            return;
        }
        let load = self.take_load_op();
        let _rpass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
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
    }
}
