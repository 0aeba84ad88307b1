//! The player screen: owns the decode worker, the decoded clip and its
//! transport, the control-overlay timing state, and (once media is ready)
//! the panorama rendering context.
//!
//! Attach and detach are explicit and symmetric: everything acquired in
//! [`PlayerScreen::attach`] or on media-ready is released in
//! [`PlayerScreen::detach`]. Leaking any of it across attach/detach cycles
//! is a bug, not a style problem.

pub mod activity;
pub mod loader;

use std::path::PathBuf;
use std::time::Instant;

use activity::{ControlsVisibility, SeekSampler};
use loader::{ClipLoader, LoadOutcome};

use crate::gpu::PanoramaRenderer;
use crate::media::{MediaError, Transport, VideoClip};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Failed,
}

/// Snapshot handed to the UI each frame, collected before the panel borrow.
pub struct PlayerInfo {
    pub phase: Phase,
    pub failure: Option<String>,
    pub playing: bool,
    pub seek_value: f32,
    pub fullscreen: bool,
    /// None until a rendering context exists (hides the stereo control).
    pub stereo: Option<bool>,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub controls_visible: bool,
}

pub struct PlayerScreen {
    pub source: PathBuf,
    pub phase: Phase,
    pub failure: Option<String>,
    pub transport: Transport,
    /// Displayed seek position, 0–100. Refreshed by the sampler and
    /// optimistically on seek.
    pub seek_value: f32,
    /// Mirrored from the fullscreen toggle action, not from the window.
    pub fullscreen: bool,
    pub controls: ControlsVisibility,
    sampler: SeekSampler,
    loader: Option<ClipLoader>,
    clip: Option<VideoClip>,
    renderer: Option<PanoramaRenderer>,
    current_frame: usize,
    frame_dirty: bool,
}

impl PlayerScreen {
    /// Attach with a source path. An empty source fails fast: nothing is
    /// spawned or constructed, the screen stays inert.
    pub fn attach(source: PathBuf) -> Self {
        let mut screen = Self {
            source: source.clone(),
            phase: Phase::Loading,
            failure: None,
            transport: Transport::default(),
            seek_value: 0.0,
            fullscreen: false,
            controls: ControlsVisibility::new(),
            sampler: SeekSampler::new(),
            loader: None,
            clip: None,
            renderer: None,
            current_frame: 0,
            frame_dirty: false,
        };
        if source.as_os_str().is_empty() {
            screen.fail(MediaError::MissingSource.to_string());
        } else {
            log::info!("player attached: {}", source.display());
            screen.loader = Some(ClipLoader::spawn(source));
        }
        screen
    }

    /// Release everything acquired since attach: the rendering context, the
    /// decoded clip and transport, the decode worker, and both timers.
    pub fn detach(&mut self) {
        if let Some(loader) = self.loader.take() {
            loader.cancel();
        }
        self.renderer = None;
        self.clip = None;
        self.transport = Transport::default();
        self.sampler.stop();
        self.controls.reset();
        self.seek_value = 0.0;
        self.current_frame = 0;
        self.frame_dirty = false;
        log::info!("player detached: {}", self.source.display());
    }

    /// Per-frame work: poll the decode worker, advance playback, refresh the
    /// seek display, age the control overlay. Returns true the moment a clip
    /// became ready so the caller can build the rendering context.
    pub fn update(&mut self, now: Instant, dt_secs: f64) -> bool {
        let mut became_ready = false;
        if self.phase == Phase::Loading {
            if let Some(outcome) = self.loader.as_ref().and_then(ClipLoader::poll) {
                match outcome {
                    LoadOutcome::Ready(clip) => {
                        self.complete_load(clip, now);
                        became_ready = true;
                    }
                    LoadOutcome::Failed(e) => self.fail(e.to_string()),
                }
            }
        }
        if self.phase == Phase::Ready {
            self.transport.advance(dt_secs);
            self.sync_frame();
            if self.sampler.should_sample(now) {
                self.seek_value = self.transport.percent();
            }
        }
        self.controls.tick(now);
        became_ready
    }

    /// Media is ready: adopt the clip, start playback and the position
    /// sampler. Also the test seam for injecting clips without ffmpeg.
    pub fn complete_load(&mut self, clip: VideoClip, now: Instant) {
        self.loader = None;
        self.transport = Transport {
            playing: true,
            looping: true,
            position: 0.0,
            duration: clip.duration_secs(),
        };
        self.seek_value = 0.0;
        self.current_frame = 0;
        self.frame_dirty = true;
        log::info!(
            "media ready: {}x{}, {} frames, {:.1}s",
            clip.width,
            clip.height,
            clip.frames.len(),
            clip.duration_secs()
        );
        self.clip = Some(clip);
        self.phase = Phase::Ready;
        self.sampler.start(now);
    }

    fn fail(&mut self, message: String) {
        log::error!("player setup failed: {message}");
        self.loader = None;
        self.failure = Some(message);
        self.phase = Phase::Failed;
    }

    fn sync_frame(&mut self) {
        if let Some(clip) = &self.clip {
            let idx = clip.frame_at(self.transport.position);
            if idx != self.current_frame {
                self.current_frame = idx;
                self.frame_dirty = true;
            }
        }
    }

    // --- controls: pure state transitions -------------------------------

    pub fn toggle_play_pause(&mut self) {
        if self.phase == Phase::Ready {
            self.transport.playing = !self.transport.playing;
        }
    }

    pub fn restart(&mut self) {
        if self.phase == Phase::Ready {
            self.transport.position = 0.0;
            self.transport.playing = true;
            self.seek_value = 0.0;
            self.sync_frame();
        }
    }

    /// Seek to a percentage of duration. The displayed value updates
    /// immediately instead of waiting for the next sampler tick.
    pub fn seek_to_percent(&mut self, percent: f32) {
        if self.phase != Phase::Ready || self.transport.duration <= 0.0 {
            return;
        }
        let percent = percent.clamp(0.0, 100.0);
        self.transport
            .seek_to_secs(f64::from(percent) / 100.0 * self.transport.duration);
        self.seek_value = percent;
        self.sync_frame();
    }

    pub fn note_activity(&mut self, now: Instant) {
        self.controls.note_activity(now);
    }

    // --- rendering context ----------------------------------------------

    pub fn clip(&self) -> Option<&VideoClip> {
        self.clip.as_ref()
    }

    pub fn renderer(&self) -> Option<&PanoramaRenderer> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> Option<&mut PanoramaRenderer> {
        self.renderer.as_mut()
    }

    /// Adopt the rendering context built by the app once media is ready.
    /// Any previous context is released first.
    pub fn set_renderer(&mut self, renderer: PanoramaRenderer) {
        self.renderer = Some(renderer);
        self.frame_dirty = true;
    }

    /// Upload the current frame if playback moved since the last upload.
    pub fn upload_if_dirty(&mut self, queue: &wgpu::Queue) {
        if !self.frame_dirty {
            return;
        }
        if let (Some(renderer), Some(clip)) = (&self.renderer, &self.clip) {
            if let Some(frame) = clip.frames.get(self.current_frame) {
                renderer.upload_frame(queue, frame);
                self.frame_dirty = false;
            }
        }
    }

    pub fn decode_active(&self) -> bool {
        self.loader.is_some()
    }

    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            phase: self.phase,
            failure: self.failure.clone(),
            playing: self.transport.playing,
            seek_value: self.seek_value,
            fullscreen: self.fullscreen,
            stereo: self.renderer.as_ref().map(PanoramaRenderer::is_stereo),
            position_secs: self.transport.position,
            duration_secs: self.transport.duration,
            controls_visible: self.controls.visible(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::test_clip;
    use std::time::Duration;

    fn ready_player(duration_secs: usize) -> (PlayerScreen, Instant) {
        let now = Instant::now();
        let mut p = PlayerScreen::attach(PathBuf::from("clip.mp4"));
        p.complete_load(test_clip(duration_secs * 30, 30.0), now);
        (p, now)
    }

    #[test]
    fn empty_source_fails_fast() {
        let p = PlayerScreen::attach(PathBuf::new());
        assert_eq!(p.phase, Phase::Failed);
        assert!(!p.decode_active());
        assert!(p.renderer().is_none());
        assert!(p.clip().is_none());
        assert!(p.failure.as_deref().unwrap_or("").contains("no video source"));
    }

    #[test]
    fn attach_spawns_exactly_one_decode_worker() {
        let mut p = PlayerScreen::attach(PathBuf::from("does-not-exist.mp4"));
        assert_eq!(p.phase, Phase::Loading);
        assert!(p.decode_active());
        p.detach();
        assert!(!p.decode_active());
    }

    #[test]
    fn media_ready_starts_playback() {
        let (p, _) = ready_player(10);
        assert_eq!(p.phase, Phase::Ready);
        assert!(p.transport.playing);
        assert!((p.transport.duration - 10.0).abs() < 1e-9);
        assert!(!p.decode_active());
    }

    #[test]
    fn play_pause_inverts_and_is_idempotent_over_two() {
        let (mut p, _) = ready_player(10);
        let initial = p.transport.playing;
        p.toggle_play_pause();
        assert_eq!(p.transport.playing, !initial);
        p.toggle_play_pause();
        assert_eq!(p.transport.playing, initial);
    }

    #[test]
    fn restart_from_any_state() {
        let (mut p, _) = ready_player(10);
        p.toggle_play_pause(); // paused
        p.transport.position = 7.0;
        p.restart();
        assert!((p.transport.position - 0.0).abs() < 1e-10);
        assert!(p.transport.playing);
        assert!((p.seek_value - 0.0).abs() < 1e-6);
    }

    #[test]
    fn seek_sets_position_and_display() {
        let (mut p, _) = ready_player(10);
        for percent in [0.0_f32, 25.0, 50.0, 100.0] {
            p.seek_to_percent(percent);
            assert!((p.seek_value - percent).abs() < 1e-5);
            let want = f64::from(percent) / 100.0 * 10.0;
            assert!((p.transport.position - want).abs() < 1e-6);
        }
    }

    #[test]
    fn seek_clamps_out_of_range() {
        let (mut p, _) = ready_player(10);
        p.seek_to_percent(150.0);
        assert!((p.seek_value - 100.0).abs() < 1e-5);
        p.seek_to_percent(-20.0);
        assert!((p.seek_value - 0.0).abs() < 1e-5);
    }

    #[test]
    fn seek_before_ready_is_inert() {
        let mut p = PlayerScreen::attach(PathBuf::from("x.mp4"));
        p.seek_to_percent(50.0);
        assert!((p.seek_value - 0.0).abs() < 1e-6);
        assert!((p.transport.position - 0.0).abs() < 1e-10);
    }

    #[test]
    fn sampler_refreshes_seek_display() {
        let (mut p, t0) = ready_player(10);
        // 1.5s of playback across two updates; the sampler fires once.
        p.update(t0 + Duration::from_millis(900), 0.9);
        assert!((p.seek_value - 0.0).abs() < 1e-6);
        p.update(t0 + Duration::from_millis(1500), 0.6);
        assert!((p.seek_value - 15.0).abs() < 0.5);
    }

    #[test]
    fn controls_follow_activity_and_idle() {
        let (mut p, t0) = ready_player(10);
        assert!(!p.controls.visible());
        p.note_activity(t0);
        assert!(p.controls.visible());
        p.update(t0 + Duration::from_secs(2), 0.0);
        assert!(p.controls.visible());
        p.update(t0 + Duration::from_secs(3), 0.0);
        assert!(!p.controls.visible());
    }

    #[test]
    fn detach_releases_everything() {
        let (mut p, t0) = ready_player(10);
        p.note_activity(t0);
        p.seek_to_percent(50.0);
        p.detach();
        assert!(p.clip().is_none());
        assert!(p.renderer().is_none());
        assert!(!p.decode_active());
        assert!(!p.controls.visible());
        assert!((p.transport.duration - 0.0).abs() < 1e-10);
        assert!(!p.transport.playing);
    }

    #[test]
    fn end_to_end_lifecycle() {
        // Select an entry, attach, media becomes ready, playback starts.
        let t0 = Instant::now();
        let mut p = PlayerScreen::attach(PathBuf::from("virtual-tour.mp4"));
        assert_eq!(p.phase, Phase::Loading);
        p.complete_load(test_clip(300, 30.0), t0);
        assert!(p.transport.playing);

        // Mouse movement shows the controls, 3s of inactivity hides them.
        p.note_activity(t0 + Duration::from_secs(1));
        p.update(t0 + Duration::from_secs(2), 0.0);
        assert!(p.controls.visible());
        p.update(t0 + Duration::from_secs(4), 0.0);
        assert!(!p.controls.visible());

        // Seek to half of the reported duration.
        p.seek_to_percent(50.0);
        assert!((p.transport.position - 5.0).abs() < 1e-6);

        // Detach leaves no clip, no renderer, no worker.
        p.detach();
        assert!(p.clip().is_none());
        assert!(p.renderer().is_none());
        assert!(!p.decode_active());
    }
}
