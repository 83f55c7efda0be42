//! Fade Overlay
//!
//! Transitions hide the relocation behind a full-screen fade. The overlay is
//! owned by the host; the core only starts fades and polls for completion.

/// Fade-to-color screen overlay.
pub trait FadeOverlay {
    /// Start fading to fully opaque over `duration` seconds.
    fn fade_out(&mut self, duration: f32);

    /// Start fading back to fully transparent over `duration` seconds.
    fn fade_in(&mut self, duration: f32);

    /// Advance the running fade.
    fn tick(&mut self, delta_time: f32);

    /// Whether the last started fade has finished.
    fn is_complete(&self) -> bool;
}

/// Linear fade driven by elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedFade {
    opacity: f32,
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

impl Default for TimedFade {
    fn default() -> Self {
        Self {
            opacity: 0.0,
            from: 0.0,
            to: 0.0,
            elapsed: 0.0,
            duration: 0.0,
        }
    }
}

impl TimedFade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current overlay opacity in [0, 1].
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_opaque(&self) -> bool {
        self.opacity >= 1.0
    }

    fn start(&mut self, to: f32, duration: f32) {
        self.from = self.opacity;
        self.to = to;
        self.elapsed = 0.0;
        self.duration = duration.max(0.0);
        if self.duration == 0.0 {
            self.opacity = to;
        }
    }
}

impl FadeOverlay for TimedFade {
    fn fade_out(&mut self, duration: f32) {
        self.start(1.0, duration);
    }

    fn fade_in(&mut self, duration: f32) {
        self.start(0.0, duration);
    }

    fn tick(&mut self, delta_time: f32) {
        if self.is_complete() {
            return;
        }
        self.elapsed += delta_time;
        let t = (self.elapsed / self.duration).min(1.0);
        self.opacity = self.from + (self.to - self.from) * t;
    }

    fn is_complete(&self) -> bool {
        self.opacity == self.to
    }
}
