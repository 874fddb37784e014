/// Wall-clock frame timer driven by host timestamps (`requestAnimationFrame`).
///
/// Converts absolute timestamps into clamped per-frame deltas. While
/// suspended nothing accumulates, and the first frame after a resume is a
/// fresh baseline rather than one huge delta.
#[derive(Debug, Clone)]
pub struct FrameClock {
    max_dt: f32,
    last_ms: Option<f64>,
    suspended: bool,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            max_dt,
            last_ms: None,
            suspended: false,
        }
    }

    /// Feed a host timestamp in milliseconds. Returns the clamped delta in
    /// seconds, or `None` while suspended.
    pub fn advance(&mut self, timestamp_ms: f64) -> Option<f32> {
        if self.suspended {
            return None;
        }
        let dt = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(timestamp_ms);
        Some(self.clamp(dt))
    }

    /// Clamp a raw delta into `[0, max_dt]`. Non-finite deltas become zero.
    pub fn clamp(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    pub fn suspend(&mut self) {
        self.suspended = true;
        self.last_ms = None;
    }

    pub fn resume(&mut self) {
        self.suspended = false;
        self.last_ms = None;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}

/// Rolling frame-time sampler that lowers decor quality under load.
///
/// Every `window` frames the average frame time is compared against the
/// budget; when over, the quality-reduction level steps up by one. The level
/// never goes back down within a session.
#[derive(Debug, Clone)]
pub struct FrameStats {
    window: u32,
    budget_ms: f32,
    max_level: u8,
    level: u8,
    frames: u32,
    accum_ms: f32,
    last_average_ms: f32,
}

impl FrameStats {
    pub fn new(window: u32, budget_ms: f32, max_level: u8) -> Self {
        Self {
            window: window.max(1),
            budget_ms,
            max_level,
            level: 0,
            frames: 0,
            accum_ms: 0.0,
            last_average_ms: 0.0,
        }
    }

    /// Record one frame's delta (seconds). Returns the new level when it changes.
    pub fn record(&mut self, dt: f32) -> Option<u8> {
        self.accum_ms += dt * 1000.0;
        self.frames += 1;
        if self.frames < self.window {
            return None;
        }

        let average = self.accum_ms / self.frames as f32;
        self.last_average_ms = average;
        self.frames = 0;
        self.accum_ms = 0.0;

        if average > self.budget_ms && self.level < self.max_level {
            self.level += 1;
            log::warn!(
                "frame time {:.1} ms over {:.1} ms budget, quality level -> {}",
                average,
                self.budget_ms,
                self.level
            );
            Some(self.level)
        } else {
            None
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    /// Average frame time of the most recent completed window.
    pub fn last_average_ms(&self) -> f32 {
        self.last_average_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_baseline() {
        let mut clock = FrameClock::new(0.1);
        assert_eq!(clock.advance(1000.0), Some(0.0));
        let dt = clock.advance(1016.0).unwrap();
        assert!((dt - 0.016).abs() < 1e-5);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut clock = FrameClock::new(0.1);
        clock.advance(0.0);
        assert_eq!(clock.advance(5000.0), Some(0.1));
    }

    #[test]
    fn backwards_timestamp_gives_zero() {
        let mut clock = FrameClock::new(0.1);
        clock.advance(500.0);
        assert_eq!(clock.advance(400.0), Some(0.0));
    }

    #[test]
    fn suspended_clock_ignores_frames_and_rebaselines() {
        let mut clock = FrameClock::new(0.1);
        clock.advance(0.0);
        clock.suspend();
        assert_eq!(clock.advance(16.0), None);
        assert_eq!(clock.advance(60_000.0), None);

        clock.resume();
        // Fresh baseline: no 60 s jump.
        assert_eq!(clock.advance(60_016.0), Some(0.0));
        let dt = clock.advance(60_032.0).unwrap();
        assert!((dt - 0.016).abs() < 1e-4);
    }

    #[test]
    fn nan_delta_clamps_to_zero() {
        let clock = FrameClock::new(0.1);
        assert_eq!(clock.clamp(f32::NAN), 0.0);
    }

    #[test]
    fn stats_under_budget_keep_level() {
        let mut stats = FrameStats::new(60, 25.0, 2);
        for _ in 0..300 {
            assert_eq!(stats.record(0.016), None);
        }
        assert_eq!(stats.level(), 0);
    }

    #[test]
    fn stats_over_budget_step_once_per_window() {
        let mut stats = FrameStats::new(60, 25.0, 2);
        let mut changes = Vec::new();
        for _ in 0..60 {
            if let Some(level) = stats.record(0.040) {
                changes.push(level);
            }
        }
        assert_eq!(changes, vec![1]);
        assert!((stats.last_average_ms() - 40.0).abs() < 0.01);
    }

    #[test]
    fn stats_level_is_capped() {
        let mut stats = FrameStats::new(10, 25.0, 2);
        for _ in 0..100 {
            stats.record(0.050);
        }
        assert_eq!(stats.level(), 2);
    }
}
