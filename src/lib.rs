//! Stories strip (storystrip)
//!
//! Layout, paint and interaction core of a horizontal stories strip that
//! morphs between a compact row of overlapping avatars and a full,
//! scrollable panel with names, plus a terminal host to try it out.
//!
//! Pure Core / Impure Shell: `model`, `view_state` and `state` never touch
//! the terminal or the clock; `view`, `config` and `logging` do.

pub mod config;
pub mod logging;
pub mod model;
pub mod state;
pub mod view;
pub mod view_state;

#[cfg(test)]
mod test_harness;
