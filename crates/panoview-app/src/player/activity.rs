//! View-scoped timing state for the player overlay: the idle-hide deadline
//! and the periodic position sampler. Both take `now` as a parameter so
//! tests can fabricate time instead of sleeping.

use std::time::{Duration, Instant};

/// Controls disappear this long after the last activity signal.
pub const HIDE_DELAY: Duration = Duration::from_secs(3);

/// How often the seek display is refreshed from the transport.
pub const SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Idle-hide state for the control overlay. Hidden until the first activity
/// signal; each signal re-arms one deadline rather than stacking timers.
#[derive(Debug)]
pub struct ControlsVisibility {
    visible: bool,
    hide_at: Option<Instant>,
}

impl ControlsVisibility {
    pub fn new() -> Self {
        Self {
            visible: false,
            hide_at: None,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// An activity signal: reveal immediately, hide no sooner than
    /// `HIDE_DELAY` from now.
    pub fn note_activity(&mut self, now: Instant) {
        self.visible = true;
        self.hide_at = Some(now + HIDE_DELAY);
    }

    /// Advance to `now`, hiding once the deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.hide_at {
            if now >= deadline {
                self.visible = false;
                self.hide_at = None;
            }
        }
    }

    pub fn reset(&mut self) {
        self.visible = false;
        self.hide_at = None;
    }
}

/// Fires roughly once per `SAMPLE_INTERVAL` while started.
#[derive(Debug)]
pub struct SeekSampler {
    next_at: Option<Instant>,
}

impl SeekSampler {
    pub fn new() -> Self {
        Self { next_at: None }
    }

    pub fn start(&mut self, now: Instant) {
        self.next_at = Some(now + SAMPLE_INTERVAL);
    }

    pub fn stop(&mut self) {
        self.next_at = None;
    }

    pub fn should_sample(&mut self, now: Instant) -> bool {
        match self.next_at {
            Some(at) if now >= at => {
                self.next_at = Some(now + SAMPLE_INTERVAL);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_until_first_activity() {
        let now = Instant::now();
        let mut c = ControlsVisibility::new();
        assert!(!c.visible());
        c.tick(now + Duration::from_secs(10));
        assert!(!c.visible());
    }

    #[test]
    fn activity_reveals_and_idle_hides() {
        let t0 = Instant::now();
        let mut c = ControlsVisibility::new();
        c.note_activity(t0);
        assert!(c.visible());
        c.tick(t0 + Duration::from_millis(2999));
        assert!(c.visible());
        c.tick(t0 + HIDE_DELAY);
        assert!(!c.visible());
    }

    #[test]
    fn repeated_activity_resets_the_deadline() {
        let t0 = Instant::now();
        let mut c = ControlsVisibility::new();
        c.note_activity(t0);
        c.note_activity(t0 + Duration::from_secs(2));
        // 4s after the first signal, but only 2s after the last one.
        c.tick(t0 + Duration::from_secs(4));
        assert!(c.visible());
        c.tick(t0 + Duration::from_secs(5));
        assert!(!c.visible());
    }

    #[test]
    fn sampler_idle_until_started() {
        let now = Instant::now();
        let mut s = SeekSampler::new();
        assert!(!s.should_sample(now + Duration::from_secs(60)));
    }

    #[test]
    fn sampler_cadence() {
        let t0 = Instant::now();
        let mut s = SeekSampler::new();
        s.start(t0);
        assert!(!s.should_sample(t0 + Duration::from_millis(500)));
        assert!(s.should_sample(t0 + Duration::from_millis(1001)));
        // Re-armed relative to the fire time, not t0.
        assert!(!s.should_sample(t0 + Duration::from_millis(1500)));
        assert!(s.should_sample(t0 + Duration::from_millis(2100)));
        s.stop();
        assert!(!s.should_sample(t0 + Duration::from_secs(60)));
    }
}
