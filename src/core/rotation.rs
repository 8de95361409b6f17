//! Continuous rotation of dials.
//!
//! A dial turns so that the label for its current value sits at the reference
//! point (3 o'clock). Rather than jumping to the absolute angle of the new
//! value, which would spin a dial backwards through a full turn when seconds
//! wrap from 59 to 00, each update moves the dial by the shortest signed step
//! and accumulates it into an unbounded angle. The surface applies
//! `rotate(-angle)`.
//!
//! The per-dial angles live in an [`AngleLedger`] owned by whoever drives the
//! frame loop; nothing here keeps global state.

use std::collections::HashMap;

use crate::common::constants::DEGREES_IN_CIRCLE;

/// Angle, in degrees, at which `value` sits on a dial with `divisions` positions.
///
/// Always in `[0, 360)` for `value < divisions`. A dial with zero divisions has
/// no positions; every value maps to 0.
pub fn target_angle(divisions: u32, value: u32) -> f64 {
    if divisions == 0 {
        return 0.0;
    }
    (DEGREES_IN_CIRCLE / f64::from(divisions)) * f64::from(value)
}

/// Smallest signed rotation taking `from` onto `to`, in `(-180, 180]`.
///
/// `from` may be any accumulated angle; only its position modulo 360 matters.
/// A half-turn is reported as `+180`.
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let delta = (to - from + 540.0).rem_euclid(DEGREES_IN_CIRCLE) - 180.0;
    // rem_euclid can round up to exactly 360 for tiny negative inputs, giving +180
    if delta <= -180.0 { 180.0 } else { delta }
}

/// Outcome of moving one dial to a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Where the value sits on the dial, in `[0, 360)`.
    pub target: f64,
    /// Step applied this tick, in `(-180, 180]`.
    pub delta: f64,
    /// New accumulated angle.
    pub angle: f64,
}

/// Move a dial whose last rendered angle is `last_angle` to `value`.
pub fn rotate_towards(last_angle: f64, divisions: u32, value: u32) -> Rotation {
    let target = target_angle(divisions, value);
    let delta = shortest_delta(last_angle, target);
    Rotation {
        target,
        delta,
        angle: last_angle + delta,
    }
}

/// What the frame loop remembers about a dial between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DialState {
    /// Accumulated rotation in degrees; 0 before the first update.
    pub angle: f64,
    /// Index of the label currently marked active.
    pub active: Option<usize>,
}

/// Explicit map from dial identity to its [`DialState`].
#[derive(Debug, Clone, Default)]
pub struct AngleLedger {
    states: HashMap<String, DialState>,
}

impl AngleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for `dial_id`, or the zero baseline if it was never updated.
    pub fn get(&self, dial_id: &str) -> DialState {
        self.states.get(dial_id).copied().unwrap_or_default()
    }

    pub fn record(&mut self, dial_id: &str, state: DialState) {
        self.states.insert(dial_id.to_string(), state);
    }

    /// Forget the active marker of a dial whose labels were rebuilt, keeping its angle.
    pub fn clear_active(&mut self, dial_id: &str) {
        if let Some(state) = self.states.get_mut(dial_id) {
            state.active = None;
        }
    }

    /// Drop every dial not listed in `keep`.
    pub fn retain_dials<'a>(&mut self, keep: impl IntoIterator<Item = &'a str>) {
        let keep: std::collections::HashSet<&str> = keep.into_iter().collect();
        self.states.retain(|id, _| keep.contains(id.as_str()));
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
