//! Tuning constants of the stories strip.
//!
//! Centralized so layout, paint and the expansion state machine agree on
//! the same thresholds.

/// Maximum number of avatars in the compact row.
pub const SMALL_THUMBS_SHOWN: i32 = 3;

/// Load more once fewer than this many viewport widths remain to scroll.
pub const PRELOAD_PAGES: i32 = 2;

/// While collapsed, an external ratio rising above this requests expansion.
pub const EXPAND_AFTER_RATIO: f64 = 0.72;

/// While expanded, an external ratio falling below this requests collapse.
pub const COLLAPSE_AFTER_RATIO: f64 = 0.68;

/// Share of the external ratio applied to geometry while collapsed.
pub const FRICTION_RATIO: f64 = 0.15;

/// Duration of the momentum catch-up animation.
pub const EXPAND_CATCH_UP_DURATION_MS: u64 = 200;
