//! Viewer camera: fixed at eye height in the sphere's center, looking down
//! the -Z axis. Stereo rendering shifts each eye along X by half the
//! inter-pupillary distance.

use glam::{Mat4, Vec3};

/// Average human inter-pupillary distance, meters.
pub const IPD: f32 = 0.063;
pub const EYE_HEIGHT: f32 = 1.6;
pub const FOV_Y_DEG: f32 = 75.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    Mono,
    Left,
    Right,
}

impl Eye {
    fn x_offset(self) -> f32 {
        match self {
            Eye::Mono => 0.0,
            Eye::Left => -IPD / 2.0,
            Eye::Right => IPD / 2.0,
        }
    }
}

pub struct Camera {
    aspect: f32,
}

impl Camera {
    pub fn new(viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            aspect: aspect_ratio(viewport_width, viewport_height),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// View-projection matrix for one eye. Stereo eyes render into half the
    /// viewport, so their aspect is halved too.
    pub fn view_proj(&self, eye: Eye) -> Mat4 {
        let aspect = match eye {
            Eye::Mono => self.aspect,
            Eye::Left | Eye::Right => (self.aspect / 2.0).max(0.1),
        };
        let proj = Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect, Z_NEAR, Z_FAR);
        let eye_pos = Vec3::new(eye.x_offset(), EYE_HEIGHT, 0.0);
        let view = Mat4::look_to_rh(eye_pos, Vec3::NEG_Z, Vec3::Y);
        proj * view
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_tracks_viewport() {
        let mut cam = Camera::new(1280, 720);
        assert!((cam.aspect - 1280.0 / 720.0).abs() < 1e-6);
        cam.set_viewport(800, 800);
        assert!((cam.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_viewport_does_not_divide_by_zero() {
        let cam = Camera::new(0, 0);
        assert!(cam.aspect.is_finite());
        assert!(cam.view_proj(Eye::Mono).is_finite());
    }

    #[test]
    fn eyes_diverge_mono_does_not() {
        let cam = Camera::new(1280, 720);
        let left = cam.view_proj(Eye::Left);
        let right = cam.view_proj(Eye::Right);
        assert_ne!(left.to_cols_array(), right.to_cols_array());

        // A point straight ahead lands on opposite horizontal sides per eye.
        let p = glam::Vec4::new(0.0, EYE_HEIGHT, -10.0, 1.0);
        let l = left * p;
        let r = right * p;
        assert!(l.x / l.w > 0.0);
        assert!(r.x / r.w < 0.0);
    }

    #[test]
    fn view_proj_is_finite() {
        let cam = Camera::new(1920, 1080);
        for eye in [Eye::Mono, Eye::Left, Eye::Right] {
            assert!(cam.view_proj(eye).is_finite());
        }
    }
}
