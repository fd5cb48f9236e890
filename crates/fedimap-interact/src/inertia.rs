//! Pan inertia: decaying camera velocity after a drag release.

use std::time::Duration;

use fedimap_util::ResettableTask;
use tokio::sync::mpsc;

/// Tunables for the inertia feel.
#[derive(Debug, Clone)]
pub struct InertiaConfig {
    /// Velocity multiplier per animation frame.
    pub friction: f64,
    /// Below this speed, motion stops exactly (no asymptotic creep).
    pub min_speed: f64,
    /// Animation frame interval.
    pub frame_interval: Duration,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            friction: 0.95,
            min_speed: 0.1,
            frame_interval: Duration::from_millis(16),
        }
    }
}

/// Pure decaying-velocity state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inertia {
    vx: f64,
    vy: f64,
}

impl Inertia {
    /// Start from a release velocity.
    pub fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    /// Current speed magnitude.
    pub fn speed(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Advance one frame: decay, then report the frame's pan delta.
    ///
    /// Returns `None` once speed falls below `min_speed`, at which point the
    /// velocity is clamped to exactly zero.
    pub fn step(&mut self, friction: f64, min_speed: f64) -> Option<(f64, f64)> {
        self.vx *= friction;
        self.vy *= friction;
        if self.speed() < min_speed {
            self.vx = 0.0;
            self.vy = 0.0;
            return None;
        }
        Some((self.vx, self.vy))
    }
}

/// Converts drag events into inertial camera motion.
///
/// During a drag the renderer pans directly; this controller only tracks the
/// last per-frame delta and, on release, replays it with decay. A new drag
/// start zeroes any in-flight inertia immediately.
pub struct PanController {
    config: InertiaConfig,
    last_delta: (f64, f64),
    animation: ResettableTask,
    pan_tx: mpsc::UnboundedSender<(f64, f64)>,
}

impl PanController {
    /// Create a controller and the channel its pan deltas arrive on.
    pub fn new(config: InertiaConfig) -> (Self, mpsc::UnboundedReceiver<(f64, f64)>) {
        let (pan_tx, pan_rx) = mpsc::unbounded_channel();
        let controller = Self {
            config,
            last_delta: (0.0, 0.0),
            animation: ResettableTask::new(),
            pan_tx,
        };
        (controller, pan_rx)
    }

    /// Drag started: cancel any in-flight inertia.
    pub fn begin_drag(&mut self) {
        self.animation.cancel();
        self.last_delta = (0.0, 0.0);
    }

    /// A drag frame moved the camera by this delta.
    pub fn drag_delta(&mut self, dx: f64, dy: f64) {
        self.last_delta = (dx, dy);
    }

    /// Drag released: run the decay animation from the last observed delta.
    pub fn end_drag(&mut self) {
        let (vx, vy) = self.last_delta;
        self.last_delta = (0.0, 0.0);

        let mut inertia = Inertia::new(vx, vy);
        let config = self.config.clone();
        let pan_tx = self.pan_tx.clone();
        self.animation.arm(async move {
            loop {
                tokio::time::sleep(config.frame_interval).await;
                match inertia.step(config.friction, config.min_speed) {
                    Some(delta) => {
                        if pan_tx.send(delta).is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        });
    }

    /// Cancel any running animation. The teardown path.
    pub fn stop(&mut self) {
        self.animation.cancel();
    }
}

impl Drop for PanController {
    fn drop(&mut self) {
        self.animation.cancel();
    }
}
