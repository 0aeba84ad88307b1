mod app;
mod catalog;
mod gpu;
mod media;
mod player;
mod settings;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossbeam_channel::Receiver;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use app::{App, Screen};
use ui::panels::{catalog_panel, controls_panel};
use ui::theme::ThemeMode;

struct PanoviewApp {
    app: Option<App>,
    window: Option<Arc<Window>>,
    file_dialog_rx: Option<Receiver<PathBuf>>,
}

impl PanoviewApp {
    fn new() -> Self {
        Self {
            app: None,
            window: None,
            file_dialog_rx: None,
        }
    }
}

impl ApplicationHandler for PanoviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Panoview")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .expect("Failed to create window"),
        );
        self.window = Some(window.clone());

        match App::new(window) {
            Ok(app) => {
                self.app = Some(app);
                log::info!("Panoview initialized");
            }
            Err(e) => {
                log::error!("Failed to initialize app: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = self.app.as_mut() else {
            return;
        };

        // Let egui handle events first
        let egui_consumed = app.egui_overlay.handle_event(&app.window, &event);

        // Pointer traffic counts as activity for the control overlay even
        // when egui consumed it.
        match &event {
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::Touch(_) => {
                if let Some(p) = app.player_mut() {
                    p.note_activity(Instant::now());
                }
            }
            _ => {}
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } if !egui_consumed || !app.egui_overlay.wants_keyboard() => match key {
                KeyCode::Escape => {
                    if matches!(app.screen, Screen::Player(_)) {
                        app.close_player();
                    } else {
                        event_loop.exit();
                    }
                }
                KeyCode::KeyF => toggle_fullscreen(app),
                KeyCode::Space => {
                    if let Some(p) = app.player_mut() {
                        p.toggle_play_pause();
                    }
                }
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                app.update();

                // Snapshot player state before the UI borrow
                let info = app.player_info();
                let theme = app.egui_overlay.theme;

                app.egui_overlay.begin_frame(&app.window);
                {
                    let ctx = app.egui_overlay.context();
                    match &info {
                        Some(info) => controls_panel::draw_player_overlay(&ctx, info, theme),
                        None => catalog_panel::draw_catalog(
                            &ctx,
                            &app.catalog,
                            &mut app.thumbnails,
                            theme,
                        ),
                    }
                }
                app.egui_overlay.end_frame(&app.window);

                drain_ui_signals(app, &mut self.file_dialog_rx);

                match app.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let w = app.gpu.surface_config.width;
                        let h = app.gpu.surface_config.height;
                        app.resize(w, h);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory");
                        event_loop.exit();
                    }
                    Err(e) => {
                        log::warn!("Surface error: {e}");
                    }
                }

                app.window.request_redraw();
            }
            _ => {}
        }
    }
}

/// Apply everything the panels asked for this frame.
fn drain_ui_signals(app: &mut App, file_dialog_rx: &mut Option<Receiver<PathBuf>>) {
    let ctx = app.egui_overlay.context();

    let open_video: Option<String> = ctx.data_mut(|d| d.remove_temp(egui::Id::new("open_video")));
    if let Some(path) = open_video {
        app.open_player(PathBuf::from(path));
    }

    let navigate_back: Option<bool> =
        ctx.data_mut(|d| d.remove_temp(egui::Id::new("navigate_back")));
    if navigate_back.is_some() {
        app.close_player();
    }

    let play_pause: Option<bool> =
        ctx.data_mut(|d| d.remove_temp(egui::Id::new("player_play_pause")));
    if play_pause.is_some() {
        if let Some(p) = app.player_mut() {
            p.toggle_play_pause();
        }
    }

    let restart: Option<bool> = ctx.data_mut(|d| d.remove_temp(egui::Id::new("player_restart")));
    if restart.is_some() {
        if let Some(p) = app.player_mut() {
            p.restart();
        }
    }

    let seek: Option<f32> = ctx.data_mut(|d| d.remove_temp(egui::Id::new("player_seek")));
    if let Some(percent) = seek {
        if let Some(p) = app.player_mut() {
            p.seek_to_percent(percent);
        }
    }

    let fullscreen: Option<bool> =
        ctx.data_mut(|d| d.remove_temp(egui::Id::new("toggle_fullscreen")));
    if fullscreen.is_some() {
        toggle_fullscreen(app);
    }

    let stereo: Option<bool> = ctx.data_mut(|d| d.remove_temp(egui::Id::new("toggle_stereo")));
    if stereo.is_some() {
        let queue = app.gpu.queue.clone();
        if let Some(renderer) = app.player_mut().and_then(|p| p.renderer_mut()) {
            let next = !renderer.is_stereo();
            renderer.set_stereo(&queue, next);
            log::info!("stereo presentation {}", if next { "on" } else { "off" });
        }
    }

    let set_theme: Option<ThemeMode> = ctx.data_mut(|d| d.remove_temp(egui::Id::new("set_theme")));
    if let Some(theme) = set_theme {
        app.set_theme(theme);
    }

    // "Open file…" runs the native dialog off-thread and hands the pick
    // back through a channel.
    let browse: Option<bool> = ctx.data_mut(|d| d.remove_temp(egui::Id::new("browse_video")));
    if browse.is_some() && file_dialog_rx.is_none() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        *file_dialog_rx = Some(rx);
        std::thread::Builder::new()
            .name("file-dialog".into())
            .spawn(move || {
                let dialog = rfd::FileDialog::new()
                    .add_filter("Video", &["mp4", "mkv", "mov", "webm", "avi"]);
                if let Some(path) = dialog.pick_file() {
                    let _ = tx.send(path);
                }
            })
            .ok();
    }

    // Drain file dialog result (non-blocking)
    if let Some(rx) = file_dialog_rx.as_ref() {
        match rx.try_recv() {
            Ok(path) => {
                app.open_player(path);
                *file_dialog_rx = None;
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                // Dialog was cancelled (sender dropped without sending)
                *file_dialog_rx = None;
            }
            Err(crossbeam_channel::TryRecvError::Empty) => {
                // Still open, keep waiting
            }
        }
    }
}

/// Borderless fullscreen toggle. The player's flag mirrors the request
/// optimistically; the window is not consulted afterwards.
fn toggle_fullscreen(app: &mut App) {
    let window = app.window.clone();
    if window.fullscreen().is_some() {
        window.set_fullscreen(None);
    } else {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    if let Some(p) = app.player_mut() {
        p.fullscreen = !p.fullscreen;
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = PanoviewApp::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
