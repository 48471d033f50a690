//! Expansion state machine.
//!
//! Two inputs move the strip between its compact and full shapes: the
//! boolean expanded flag (animated by the toggle animation) and the height
//! the chat list above reports while the user pulls it open. Momentum
//! scrolling that starts pulling from zero is ignored until a direct
//! (non-momentum) update arrives; that update starts a short catch-up
//! animation so the strip grows smoothly instead of jumping.

use crate::view_state::animation::{Animation, Easing, Timestamp};
use crate::view_state::constants::{
    COLLAPSE_AFTER_RATIO, EXPAND_AFTER_RATIO, EXPAND_CATCH_UP_DURATION_MS,
};
use tracing::debug;

/// Geometry the widget currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryState {
    /// Compact row only.
    #[default]
    Small,
    /// Union of compact and full rectangles, content shifted between them.
    Changing,
    /// Fully expanded panel.
    Full,
}

/// Result of [`Expansion::set_expanded_height`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightUpdate {
    /// Same height, or momentum input while ignored.
    Ignored,
    /// Momentum started from zero; further momentum is ignored.
    Latched,
    /// Height stored and state updated.
    Applied,
}

/// Expanded flag, external ratio and geometry state.
#[derive(Debug, Clone)]
pub struct Expansion {
    expanded: bool,
    last_ratio: f64,
    last_expanded_height: i32,
    expand_ignored: bool,
    state: GeometryState,
    toggle: Animation,
    catch_up: Animation,
    full_height: i32,
    toggle_duration_ms: u64,
}

impl Expansion {
    /// Collapsed machine for a panel of `full_height` pixels.
    pub fn new(full_height: i32, toggle_duration_ms: u64) -> Self {
        Self {
            expanded: false,
            last_ratio: 0.0,
            last_expanded_height: 0,
            expand_ignored: false,
            state: GeometryState::Small,
            toggle: Animation::new(),
            catch_up: Animation::new(),
            full_height,
            toggle_duration_ms,
        }
    }

    /// Current expanded flag (the animation target).
    pub fn expanded(&self) -> bool {
        self.expanded
    }

    /// Last external expansion ratio.
    pub fn last_ratio(&self) -> f64 {
        self.last_ratio
    }

    /// Last applied expanded height.
    pub fn last_expanded_height(&self) -> i32 {
        self.last_expanded_height
    }

    /// Whether momentum-driven height updates are being ignored.
    pub fn expand_ignored(&self) -> bool {
        self.expand_ignored
    }

    /// Current geometry state.
    pub fn state(&self) -> GeometryState {
        self.state
    }

    /// Toggle animation progress: 0 collapsed, 1 expanded.
    pub fn toggle_progress(&self) -> f64 {
        self.toggle
            .value(if self.expanded { 1.0 } else { 0.0 })
    }

    /// Whether either animation still needs ticks.
    pub fn is_animating(&self) -> bool {
        self.toggle.animating() || self.catch_up.animating()
    }

    /// Whether the toggle animation is running.
    pub fn is_toggling(&self) -> bool {
        self.toggle.animating()
    }

    /// Height to feed back into [`Expansion::update_expanding`] on every
    /// layout pass, scaled by the catch-up animation.
    pub fn catch_up_height(&self) -> i32 {
        (f64::from(self.last_expanded_height) * self.catch_up.value(1.0)) as i32
    }

    /// Set the expanded flag; starts the toggle animation when it flips.
    ///
    /// Returns whether the flag changed.
    pub fn set_expanded(&mut self, expanded: bool, now: Timestamp) -> bool {
        if self.expanded == expanded {
            return false;
        }
        self.expanded = expanded;
        let (from, to) = if expanded { (0.0, 1.0) } else { (1.0, 0.0) };
        self.toggle
            .start(from, to, self.toggle_duration_ms, Easing::SineInOut, now);
        debug!(expanded, "Stories toggle animation started");
        true
    }

    /// Classify an external height report.
    ///
    /// Returns the flag the caller should request when the ratio crossed a
    /// threshold in the matching direction: above 0.72 while rising and
    /// collapsed, or below 0.68 while not rising and expanded.
    pub fn update_expanding(&mut self, expanding_height: i32, expanded_height: i32) -> Option<bool> {
        debug_assert!(
            expanding_height == 0 || expanded_height > 0,
            "nonzero expanding height requires a positive expanded height"
        );
        let ratio = if expanding_height == 0 || expanded_height <= 0 {
            0.0
        } else {
            f64::from(expanding_height) / f64::from(expanded_height)
        };
        if self.last_ratio == ratio {
            return None;
        }
        let expanding = ratio > self.last_ratio;
        self.last_ratio = ratio;
        let change = if self.expanded {
            !expanding && ratio < COLLAPSE_AFTER_RATIO
        } else {
            expanding && ratio > EXPAND_AFTER_RATIO
        };
        change.then_some(!self.expanded)
    }

    /// Apply the height reported by the chat list.
    pub fn set_expanded_height(&mut self, height: i32, momentum: bool, now: Timestamp) -> HeightUpdate {
        let height = height.clamp(0, self.full_height.max(0));
        if self.last_expanded_height == height {
            return HeightUpdate::Ignored;
        } else if momentum && self.expand_ignored {
            return HeightUpdate::Ignored;
        } else if momentum && height > 0 && self.last_expanded_height == 0 {
            self.expand_ignored = true;
            debug!(height, "Momentum expansion ignored until released");
            return HeightUpdate::Latched;
        } else if !momentum && self.expand_ignored && height > 0 {
            self.expand_ignored = false;
            self.catch_up.start(
                0.0,
                1.0,
                EXPAND_CATCH_UP_DURATION_MS,
                Easing::Linear,
                now,
            );
            debug!(height, "Expansion catch-up started");
        } else if height == 0 && self.catch_up.animating() {
            self.catch_up.stop();
        }
        self.last_expanded_height = height;
        if !self.check_for_full_state() {
            self.set_state(if height == 0 {
                GeometryState::Small
            } else {
                GeometryState::Changing
            });
        }
        HeightUpdate::Applied
    }

    /// Enter Full once nothing animates and the panel is fully pulled open.
    pub fn check_for_full_state(&mut self) -> bool {
        if self.catch_up.animating()
            || self.toggle.animating()
            || self.last_expanded_height < self.full_height
        {
            return false;
        }
        self.set_state(GeometryState::Full);
        true
    }

    /// Advance the toggle animation. Returns whether it produced a frame.
    pub fn tick_toggle(&mut self, now: Timestamp) -> bool {
        self.toggle.tick(now)
    }

    /// Advance the catch-up animation. Returns whether it produced a frame.
    pub fn tick_catch_up(&mut self, now: Timestamp) -> bool {
        self.catch_up.tick(now)
    }

    fn set_state(&mut self, state: GeometryState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "Stories geometry state changed");
            self.state = state;
        }
    }
}

#[cfg(test)]
#[path = "expansion_tests.rs"]
mod tests;
