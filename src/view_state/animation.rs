//! Clock-driven scalar animations.
//!
//! The host owns the clock: every call that starts or advances an animation
//! receives the current [`Timestamp`]. An animation only changes its value on
//! [`Animation::tick`], so repeated reads between ticks are stable.

/// Milliseconds on the host's monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Wrap a raw millisecond count.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Raw millisecond count.
    pub fn millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, saturating at 0.
    pub fn since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// This timestamp moved forward by `ms`.
    pub fn plus(&self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

/// Progress remapping applied to an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Identity.
    #[default]
    Linear,
    /// Sine ease-in-out: slow start, slow finish.
    SineInOut,
}

impl Easing {
    /// Map linear progress in `[0, 1]` to eased progress.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SineInOut => -(t * std::f64::consts::PI).cos() / 2.0 + 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Running {
    from: f64,
    to: f64,
    started_at: Timestamp,
    duration_ms: u64,
    easing: Easing,
}

/// A single `from → to` transition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Animation {
    running: Option<Running>,
    current: f64,
}

impl Animation {
    /// Idle animation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the transition at `now`.
    pub fn start(&mut self, from: f64, to: f64, duration_ms: u64, easing: Easing, now: Timestamp) {
        self.running = Some(Running {
            from,
            to,
            started_at: now,
            duration_ms,
            easing,
        });
        self.current = from;
    }

    /// Advance to `now`. Returns `true` when the animation was running and
    /// produced a frame; the frame that reaches the end also stops it.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        let Some(running) = self.running else {
            return false;
        };
        let elapsed = now.since(running.started_at);
        let progress = if running.duration_ms == 0 {
            1.0
        } else {
            (elapsed as f64 / running.duration_ms as f64).min(1.0)
        };
        self.current = running.from + (running.to - running.from) * running.easing.apply(progress);
        if progress >= 1.0 {
            self.running = None;
        }
        true
    }

    /// Current value while running, `default` otherwise.
    pub fn value(&self, default: f64) -> f64 {
        if self.running.is_some() {
            self.current
        } else {
            default
        }
    }

    /// Whether the final frame has not been produced yet.
    pub fn animating(&self) -> bool {
        self.running.is_some()
    }

    /// Stop without producing a final frame.
    pub fn stop(&mut self) {
        self.running = None;
    }
}
