//! Shared utilities

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// HSV to RGB color conversion
/// h: 0-1 (wraps), s: 0-1, v: 0-1; returns channels in 0-1
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    match sector as i32 % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

// ============================================================================
// Frame Clock
// ============================================================================

/// Largest simulation step handed to the animation, in seconds
pub const MAX_FRAME_DT: f32 = 0.1;

/// Frame timer: clamped delta time, rolling average, and frame-rate capping
pub struct FrameClock {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FrameClock {
    /// Create a clock with the given rolling-average window
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count: sample_count.max(1),
        }
    }

    /// Call once at the start of each frame.
    /// Returns the elapsed time since the previous call, clamped to `MAX_FRAME_DT`
    /// so a stall (debugger, scheduler hiccup) never produces a huge jump.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_times.push_back(raw);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }

        raw.min(MAX_FRAME_DT)
    }

    /// Start instant of the current frame (as recorded by the last `tick`)
    pub fn frame_start(&self) -> Instant {
        self.last_frame
    }

    /// Average FPS over the sample window
    pub fn avg_fps(&self) -> f32 {
        let avg_dt = self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }

    #[cfg(test)]
    pub fn frame_count(&self) -> usize {
        self.frame_times.len()
    }

    /// Spin until `1 / fps_cap` seconds have passed since `frame_start`.
    /// A cap of 0 means uncapped. Spinning instead of sleeping keeps frame
    /// jitter low at the cost of one busy core.
    pub fn pace(frame_start: Instant, fps_cap: u32) {
        if fps_cap == 0 {
            return;
        }
        let target = Duration::from_secs_f64(1.0 / f64::from(fps_cap));
        while frame_start.elapsed() < target {
            std::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_primaries() {
        let close = |a: (f32, f32, f32), b: (f32, f32, f32)| {
            (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5 && (a.2 - b.2).abs() < 1e-5
        };
        assert!(close(hsv_to_rgb(0.0, 1.0, 1.0), (1.0, 0.0, 0.0)));
        assert!(close(hsv_to_rgb(0.5, 1.0, 1.0), (0.0, 1.0, 1.0)));
        assert!(close(hsv_to_rgb(1.0, 1.0, 1.0), (1.0, 0.0, 0.0)));
        assert!(close(hsv_to_rgb(0.25, 0.0, 0.5), (0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_tick_is_clamped() {
        let mut clock = FrameClock::new(4);
        clock.last_frame = Instant::now() - Duration::from_secs(2);
        let dt = clock.tick();
        assert_eq!(dt, MAX_FRAME_DT);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_rolling_window_bounded() {
        let mut clock = FrameClock::new(3);
        for _ in 0..10 {
            clock.tick();
        }
        assert_eq!(clock.frame_count(), 3);
    }

    #[test]
    fn test_pace_waits_at_least_interval() {
        let start = Instant::now();
        FrameClock::pace(start, 200);
        assert!(start.elapsed() >= Duration::from_millis(5));

        let start = Instant::now();
        FrameClock::pace(start, 0);
        assert!(start.elapsed() < Duration::from_millis(5));
    }
}
