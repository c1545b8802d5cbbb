/// Frame timing and FPS measurement
use std::time::{Duration, Instant};

/// What one call to [`FrameClock::tick`] measured
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Time since the previous tick
    pub elapsed: Duration,
    /// `1 / elapsed`, the per-frame rate
    pub instant_fps: f32,
}

/// Tracks frame intervals plus a once-per-second average
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_tick: Instant,
    window_start: Instant,
    frame_count: u32,
    fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_tick: now,
            window_start: now,
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn tick(&mut self) -> FrameTick {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> FrameTick {
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;

        self.frame_count += 1;
        let window = now.saturating_duration_since(self.window_start);
        if window >= Duration::from_secs(1) {
            self.fps = self.frame_count as f32 / window.as_secs_f32();
            self.frame_count = 0;
            self.window_start = now;
        }

        let secs = elapsed.as_secs_f32();
        FrameTick {
            elapsed,
            instant_fps: if secs > 0.0 { 1.0 / secs } else { f32::INFINITY },
        }
    }

    /// Average frame rate over the last completed second
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instant_fps() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        let tick = clock.tick_at(start + Duration::from_millis(20));
        assert_eq!(tick.elapsed, Duration::from_millis(20));
        assert!((tick.instant_fps - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_average_updates_once_per_second() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        for frame in 1..=9 {
            clock.tick_at(start + Duration::from_millis(100 * frame));
        }
        assert_eq!(clock.fps(), 0.0);

        clock.tick_at(start + Duration::from_millis(1000));
        assert!((clock.fps() - 10.0).abs() < 1e-3);
    }
}
