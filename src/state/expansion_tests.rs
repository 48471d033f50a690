//! Tests for the expansion state machine.

use super::*;

const FULL: i32 = 85;

fn at(ms: u64) -> Timestamp {
    Timestamp::from_millis(ms)
}

fn machine() -> Expansion {
    Expansion::new(FULL, 150)
}

/// Feed ratios (as percent of 100) and apply every requested flip.
fn feed(machine: &mut Expansion, percents: &[i32]) -> Vec<bool> {
    let mut flips = Vec::new();
    for &p in percents {
        if let Some(flag) = machine.update_expanding(p, 100) {
            machine.set_expanded(flag, at(0));
            flips.push(flag);
        }
    }
    flips
}

// ===== Threshold classification =====

#[test]
fn rising_ratio_expands_once_past_threshold() {
    let mut m = machine();
    assert_eq!(feed(&mut m, &[0, 50]), Vec::<bool>::new());
    assert_eq!(feed(&mut m, &[80]), vec![true]);
    assert!(m.expanded());
    assert_eq!(feed(&mut m, &[90, 100]), Vec::<bool>::new());
}

#[test]
fn falling_ratio_collapses_once_below_threshold() {
    let mut m = machine();
    m.set_expanded(true, at(0));
    assert_eq!(feed(&mut m, &[100, 70]), Vec::<bool>::new());
    assert_eq!(feed(&mut m, &[60]), vec![false]);
    assert_eq!(feed(&mut m, &[30, 0]), Vec::<bool>::new());
}

#[test]
fn exactly_at_threshold_does_not_flip() {
    let mut m = machine();
    assert_eq!(feed(&mut m, &[72]), Vec::<bool>::new());
}

#[test]
fn rising_while_expanded_never_collapses() {
    let mut m = machine();
    feed(&mut m, &[50]);
    // Jump straight to a high ratio while collapsed.
    assert_eq!(feed(&mut m, &[100]), vec![true]);
    // Rising further while expanded never collapses.
    assert_eq!(feed(&mut m, &[99, 100]), Vec::<bool>::new());
}

#[test]
fn unchanged_ratio_is_ignored() {
    let mut m = machine();
    feed(&mut m, &[80]);
    assert_eq!(m.update_expanding(80, 100), None);
}

#[test]
fn zero_expanded_height_yields_zero_ratio() {
    let mut m = machine();
    assert_eq!(m.update_expanding(0, 0), None);
    assert_eq!(m.last_ratio(), 0.0);
}

// ===== Toggle =====

#[test]
fn set_expanded_starts_toggle_animation() {
    let mut m = machine();
    assert!(m.set_expanded(true, at(0)));
    assert!(m.is_toggling());
    assert_eq!(m.toggle_progress(), 0.0);
    m.tick_toggle(at(75));
    assert!((m.toggle_progress() - 0.5).abs() < 1e-9);
    m.tick_toggle(at(150));
    assert!(!m.is_toggling());
    assert_eq!(m.toggle_progress(), 1.0);
}

#[test]
fn set_expanded_to_same_value_is_noop() {
    let mut m = machine();
    assert!(!m.set_expanded(false, at(0)));
    assert!(!m.is_toggling());
}

// ===== Height updates =====

#[test]
fn height_moves_between_small_and_changing() {
    let mut m = machine();
    assert_eq!(m.set_expanded_height(40, false, at(0)), HeightUpdate::Applied);
    assert_eq!(m.state(), GeometryState::Changing);
    assert_eq!(m.set_expanded_height(0, false, at(0)), HeightUpdate::Applied);
    assert_eq!(m.state(), GeometryState::Small);
}

#[test]
fn full_height_without_animation_is_full_state() {
    let mut m = machine();
    m.set_expanded_height(FULL, false, at(0));
    assert_eq!(m.state(), GeometryState::Full);
}

#[test]
fn height_is_clamped_to_full_height() {
    let mut m = machine();
    m.set_expanded_height(FULL * 3, false, at(0));
    assert_eq!(m.last_expanded_height(), FULL);
    assert_eq!(m.state(), GeometryState::Full);
}

#[test]
fn full_state_waits_for_toggle_animation() {
    let mut m = machine();
    m.set_expanded(true, at(0));
    m.set_expanded_height(FULL, false, at(0));
    assert_eq!(m.state(), GeometryState::Changing);
    m.tick_toggle(at(200));
    assert!(m.check_for_full_state());
    assert_eq!(m.state(), GeometryState::Full);
}

#[test]
fn same_height_is_ignored() {
    let mut m = machine();
    m.set_expanded_height(40, false, at(0));
    assert_eq!(m.set_expanded_height(40, false, at(0)), HeightUpdate::Ignored);
}

// ===== Momentum latch =====

#[test]
fn momentum_from_zero_latches_and_is_ignored() {
    let mut m = machine();
    assert_eq!(m.set_expanded_height(10, true, at(0)), HeightUpdate::Latched);
    assert!(m.expand_ignored());
    assert_eq!(m.last_expanded_height(), 0);
    assert_eq!(m.state(), GeometryState::Small);
    assert_eq!(m.set_expanded_height(30, true, at(10)), HeightUpdate::Ignored);
    assert_eq!(m.last_expanded_height(), 0);
}

#[test]
fn direct_update_releases_latch_and_catches_up() {
    let mut m = machine();
    m.set_expanded_height(10, true, at(0));
    assert_eq!(m.set_expanded_height(40, false, at(100)), HeightUpdate::Applied);
    assert!(!m.expand_ignored());
    assert!(m.is_animating());
    assert_eq!(m.state(), GeometryState::Changing);
    assert_eq!(m.catch_up_height(), 0, "catch-up starts from zero");

    m.tick_catch_up(at(200));
    assert_eq!(m.catch_up_height(), 20);

    m.tick_catch_up(at(300));
    assert!(!m.is_animating());
    assert_eq!(m.catch_up_height(), 40);
}

#[test]
fn catch_up_defers_full_state() {
    let mut m = machine();
    m.set_expanded_height(10, true, at(0));
    m.set_expanded_height(FULL, false, at(0));
    assert_eq!(m.state(), GeometryState::Changing);
    m.tick_catch_up(at(200));
    assert!(m.check_for_full_state());
}

#[test]
fn collapsing_to_zero_stops_catch_up() {
    let mut m = machine();
    m.set_expanded_height(10, true, at(0));
    m.set_expanded_height(40, false, at(0));
    m.set_expanded_height(0, false, at(50));
    assert!(!m.is_animating());
    assert_eq!(m.state(), GeometryState::Small);
}

#[test]
fn direct_zero_keeps_latch_set() {
    let mut m = machine();
    m.set_expanded_height(10, true, at(0));
    // Same height as stored (0): ignored entirely, latch untouched.
    assert_eq!(m.set_expanded_height(0, false, at(10)), HeightUpdate::Ignored);
    assert!(m.expand_ignored());
}

#[test]
fn momentum_after_nonzero_height_is_applied() {
    let mut m = machine();
    m.set_expanded_height(20, false, at(0));
    assert_eq!(m.set_expanded_height(50, true, at(10)), HeightUpdate::Applied);
    assert_eq!(m.last_expanded_height(), 50);
}
