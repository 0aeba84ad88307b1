use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::window::Window;

use crate::catalog::Catalog;
use crate::gpu::{GpuContext, PanoramaRenderer};
use crate::player::{PlayerInfo, PlayerScreen};
use crate::settings::SettingsConfig;
use crate::ui::EguiOverlay;
use crate::ui::panels::catalog_panel::ThumbnailCache;
use crate::ui::theme::ThemeMode;

pub enum Screen {
    Catalog,
    Player(PlayerScreen),
}

pub struct App {
    pub gpu: GpuContext,
    pub egui_overlay: EguiOverlay,
    pub settings: SettingsConfig,
    pub catalog: Catalog,
    pub thumbnails: ThumbnailCache,
    pub screen: Screen,
    pub window: Arc<Window>,
    pub last_frame: Instant,
}

impl App {
    pub fn new(window: Arc<Window>) -> Result<Self> {
        let gpu = GpuContext::new(window.clone())?;
        let settings = SettingsConfig::load();
        let catalog = Catalog::load(&settings.media_dir());
        let egui_overlay = EguiOverlay::new(&gpu.device, gpu.format, &window, settings.theme);

        Ok(Self {
            gpu,
            egui_overlay,
            settings,
            catalog,
            thumbnails: ThumbnailCache::default(),
            screen: Screen::Catalog,
            window,
            last_frame: Instant::now(),
        })
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerScreen> {
        match &mut self.screen {
            Screen::Player(p) => Some(p),
            Screen::Catalog => None,
        }
    }

    pub fn player_info(&self) -> Option<PlayerInfo> {
        match &self.screen {
            Screen::Player(p) => Some(p.info()),
            Screen::Catalog => None,
        }
    }

    /// Navigate catalog → player. Any previous player is detached first, so
    /// at most one rendering context and one decode worker exist at a time.
    pub fn open_player(&mut self, source: PathBuf) {
        if let Screen::Player(p) = &mut self.screen {
            p.detach();
        }
        self.screen = Screen::Player(PlayerScreen::attach(source));
    }

    /// Navigate player → catalog, releasing the player's resources.
    pub fn close_player(&mut self) {
        if let Screen::Player(p) = &mut self.screen {
            p.detach();
            self.screen = Screen::Catalog;
        }
    }

    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.egui_overlay.set_theme(theme);
        self.settings.theme = theme;
        self.settings.save();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        if let Screen::Player(p) = &mut self.screen {
            if let Some(renderer) = p.renderer_mut() {
                renderer.resize(&self.gpu.queue, width, height);
            }
        }
        self.egui_overlay
            .resize(width, height, self.window.scale_factor() as f32);
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        if let Screen::Player(p) = &mut self.screen {
            let became_ready = p.update(now, dt);
            if became_ready {
                // Media is ready: build the one rendering context this
                // player instance owns.
                if let Some(first_frame) = p.clip().and_then(|c| c.frames.first()) {
                    let renderer = PanoramaRenderer::new(
                        &self.gpu.device,
                        &self.gpu.queue,
                        self.gpu.format,
                        self.gpu.surface_config.width,
                        self.gpu.surface_config.height,
                        first_frame,
                    );
                    p.set_renderer(renderer);
                }
            }
        }
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.gpu.surface.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("panoview-encoder"),
            });

        match &mut self.screen {
            Screen::Player(p) => {
                p.upload_if_dirty(&self.gpu.queue);
                match p.renderer() {
                    Some(renderer) => renderer.render(&mut encoder, &surface_view),
                    None => clear_pass(&mut encoder, &surface_view),
                }
            }
            Screen::Catalog => clear_pass(&mut encoder, &surface_view),
        }

        // egui overlay → surface
        self.egui_overlay
            .render(&self.gpu.device, &self.gpu.queue, &mut encoder, &surface_view);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn clear_pass(encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
    let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("clear-pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            depth_slice: None,
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
}
