/// A decoded frame ready for GPU upload.
pub struct DecodedFrame {
    pub data: Vec<u8>, // RGBA8
    pub width: u32,
    pub height: u32,
}

/// Transport state for video playback, in seconds of media time.
#[derive(Debug, Clone)]
pub struct Transport {
    pub playing: bool,
    pub looping: bool,
    /// Current position in seconds.
    pub position: f64,
    /// Total duration in seconds. Zero until a clip is loaded.
    pub duration: f64,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            playing: false,
            looping: true,
            position: 0.0,
            duration: 0.0,
        }
    }
}

impl Transport {
    /// Advance playback by `dt_secs`. Wraps at the end when looping,
    /// otherwise parks at the end and stops.
    pub fn advance(&mut self, dt_secs: f64) {
        if !self.playing || self.duration <= 0.0 {
            return;
        }
        self.position += dt_secs;
        if self.position >= self.duration {
            if self.looping {
                self.position %= self.duration;
            } else {
                self.position = self.duration;
                self.playing = false;
            }
        }
    }

    /// Jump to an absolute position, clamped to the clip bounds.
    pub fn seek_to_secs(&mut self, secs: f64) {
        if self.duration <= 0.0 {
            return;
        }
        self.position = secs.clamp(0.0, self.duration);
    }

    /// Position as a percentage of duration, 0–100.
    pub fn percent(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        ((self.position / self.duration) * 100.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_defaults() {
        let t = Transport::default();
        assert!(!t.playing);
        assert!(t.looping);
        assert!((t.position - 0.0).abs() < 1e-10);
        assert!((t.duration - 0.0).abs() < 1e-10);
    }

    #[test]
    fn advance_is_inert_while_paused() {
        let mut t = Transport {
            duration: 10.0,
            ..Transport::default()
        };
        t.advance(1.0);
        assert!((t.position - 0.0).abs() < 1e-10);
    }

    #[test]
    fn advance_wraps_when_looping() {
        let mut t = Transport {
            playing: true,
            looping: true,
            position: 9.5,
            duration: 10.0,
        };
        t.advance(1.0);
        assert!((t.position - 0.5).abs() < 1e-9);
        assert!(t.playing);
    }

    #[test]
    fn advance_parks_at_end_when_not_looping() {
        let mut t = Transport {
            playing: true,
            looping: false,
            position: 9.5,
            duration: 10.0,
        };
        t.advance(1.0);
        assert!((t.position - 10.0).abs() < 1e-10);
        assert!(!t.playing);
    }

    #[test]
    fn seek_clamps_to_bounds() {
        let mut t = Transport {
            duration: 10.0,
            ..Transport::default()
        };
        t.seek_to_secs(-5.0);
        assert!((t.position - 0.0).abs() < 1e-10);
        t.seek_to_secs(15.0);
        assert!((t.position - 10.0).abs() < 1e-10);
        t.seek_to_secs(5.0);
        assert!((t.position - 5.0).abs() < 1e-10);
    }

    #[test]
    fn seek_without_duration_is_a_no_op() {
        let mut t = Transport::default();
        t.seek_to_secs(5.0);
        assert!((t.position - 0.0).abs() < 1e-10);
    }

    #[test]
    fn percent_of_duration() {
        let mut t = Transport {
            duration: 20.0,
            ..Transport::default()
        };
        t.position = 5.0;
        assert!((t.percent() - 25.0).abs() < 1e-4);
        assert!((Transport::default().percent() - 0.0).abs() < 1e-6);
    }
}
