//! Draws one image as a textured, tinted quad.

mod config;
mod scene;

use anyhow::{Context, Result};
use clap::Parser;
use image::RgbaImage;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use quadtint_engine::core::{App, AppControl, FrameCtx};
use quadtint_engine::device::GpuInit;
use quadtint_engine::logging::{init_logging, LoggingConfig};
use quadtint_engine::paint::Color;
use quadtint_engine::render::{SpriteRenderer, SpriteTexture, SpriteTextureDesc};
use quadtint_engine::window::{Runtime, RuntimeConfig};

use config::ViewerConfig;
use scene::Scene;

const CLEAR: Color = Color::new(0.08, 0.08, 0.09, 1.0);

struct Viewer {
    scene: Scene,
    desc: SpriteTextureDesc,
    /// Decoded image, held until the first frame uploads it.
    pending: Option<RgbaImage>,
    renderer: SpriteRenderer,
    texture: Option<SpriteTexture>,
}

impl App for Viewer {
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        if let Some(image) = self.pending.take() {
            let rctx = ctx.gpu.render_ctx();
            self.renderer
                .prepare(&rctx)
                .context("sprite renderer setup failed")?;
            let texture = self
                .renderer
                .create_texture(&rctx, &image, self.desc)
                .context("texture upload failed")?;
            self.texture = Some(texture);
        }
        let Some(texture) = self.texture.as_ref() else {
            return Ok(AppControl::Exit);
        };

        let draw = self.scene.draw_at(ctx.time.elapsed, ctx.window.viewport());
        let renderer = &mut self.renderer;
        ctx.render(CLEAR, |rctx, target| {
            renderer.render(rctx, target, texture, std::slice::from_ref(&draw))
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = ViewerConfig::parse();

    let image = match &config.image {
        Some(path) => scene::load_image(path)?,
        None => {
            log::info!("no image given, drawing a checkerboard");
            scene::checkerboard(128, 16)
        }
    };

    let viewer = Viewer {
        scene: Scene {
            image_size: image.dimensions(),
            tint: config.tint,
            base_scale: config.base_scale,
            uv_span: scene::uv_span(config.sampler().address_mode),
        },
        desc: SpriteTextureDesc {
            sampler: config.sampler(),
            ..SpriteTextureDesc::default()
        },
        pending: Some(image),
        renderer: SpriteRenderer::new(),
        texture: None,
    };

    let gpu_init = if config.vsync() {
        GpuInit::default()
    } else {
        GpuInit::default().without_vsync()
    };
    let runtime = RuntimeConfig {
        title: config.title,
        initial_size: LogicalSize::new(960.0, 720.0),
        continuous: true,
    };

    Runtime::run(runtime, gpu_init, viewer)
}
