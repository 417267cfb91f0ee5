//! Pointer tracking with rolling-window velocity estimation
//!
//! Timestamps come from the caller (hosts forward their input-event clock,
//! in milliseconds), which keeps velocity math deterministic under test.

/// Window over which instantaneous velocity is estimated.
const VELOCITY_WINDOW_MS: f64 = 50.0;

/// Snapshot of the tracked pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub start_x: f32,
    pub start_y: f32,
    pub current_x: f32,
    pub current_y: f32,
    /// Velocity in position units per millisecond
    pub velocity_x: f32,
    pub velocity_y: f32,
    /// Timestamp of the most recent sample, in milliseconds
    pub timestamp_ms: f64,
}

#[derive(Clone, Copy, Debug)]
struct VelocitySample {
    x: f32,
    y: f32,
    time_ms: f64,
}

/// Tracks the live pointer position and a short sample window for velocity.
#[derive(Default)]
pub struct PointerTracker {
    samples: Vec<VelocitySample>,
    state: PointerState,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    /// Horizontal displacement since `start`
    pub fn delta_x(&self) -> f32 {
        self.state.current_x - self.state.start_x
    }

    /// Vertical displacement since `start`
    pub fn delta_y(&self) -> f32 {
        self.state.current_y - self.state.start_y
    }

    /// Reset tracking to a new origin
    pub fn start(&mut self, x: f32, y: f32, now_ms: f64) {
        self.state = PointerState {
            start_x: x,
            start_y: y,
            current_x: x,
            current_y: y,
            velocity_x: 0.0,
            velocity_y: 0.0,
            timestamp_ms: now_ms,
        };
        self.samples.clear();
        self.samples.push(VelocitySample {
            x,
            y,
            time_ms: now_ms,
        });
    }

    /// Append a sample, prune stale ones, and recompute velocity
    pub fn move_to(&mut self, x: f32, y: f32, now_ms: f64) {
        self.samples.push(VelocitySample {
            x,
            y,
            time_ms: now_ms,
        });
        self.samples
            .retain(|s| now_ms - s.time_ms < VELOCITY_WINDOW_MS * 2.0);

        let (velocity_x, velocity_y) = self.compute_velocity(now_ms);
        self.state.current_x = x;
        self.state.current_y = y;
        self.state.velocity_x = velocity_x;
        self.state.velocity_y = velocity_y;
        self.state.timestamp_ms = now_ms;
    }

    /// Final sample snapshot at release
    pub fn end(&self) -> PointerState {
        self.state
    }

    /// Clear all tracking state
    pub fn reset(&mut self) {
        self.samples.clear();
        self.state = PointerState::default();
    }

    fn compute_velocity(&self, now_ms: f64) -> (f32, f32) {
        let mut recent = self
            .samples
            .iter()
            .filter(|s| now_ms - s.time_ms < VELOCITY_WINDOW_MS);

        let Some(first) = recent.next() else {
            return (0.0, 0.0);
        };
        let Some(last) = recent.last() else {
            // Fewer than two samples inside the window
            return (0.0, 0.0);
        };

        let dt_ms = (last.time_ms - first.time_ms) as f32;
        if dt_ms == 0.0 {
            return (0.0, 0.0);
        }
        ((last.x - first.x) / dt_ms, (last.y - first.y) / dt_ms)
    }
}
