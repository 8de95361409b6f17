//! The set of dials shown together and the two phases that drive them.
//!
//! [`DialBoard::layout`] mounts every ring with its placed labels.
//! [`DialBoard::update`] runs once per frame: it rotates each ring towards its
//! current value through the [`AngleLedger`] and moves the active marker.
//! Labels are built when a ring is mounted. A ring whose label key changed
//! since then (the day-of-month dial when the month changes length) is laid
//! out again first, keeping its angle.

use anyhow::Result;
use chrono::Locale;
use std::collections::{HashMap, HashSet};

use crate::common::constants::BASE_RADIUS;
use crate::config::Config;
use crate::core::dial::{ClockFields, Dial, DialKind};
use crate::core::layout::place_labels;
use crate::core::locale::resolve_locale;
use crate::core::rotation::{AngleLedger, DialState, Rotation, rotate_towards};
use crate::surface::DialSurface;

/// What one dial shows after an update.
#[derive(Debug, Clone, PartialEq)]
pub struct DialReading {
    pub dial_id: String,
    pub kind: DialKind,
    /// Zero-based rotation index.
    pub value: u32,
    pub divisions: u32,
    pub label: String,
    pub rotation: Rotation,
}

/// Labels a ring was last mounted with.
struct MountedRing {
    divisions: u32,
    label_key: u32,
    labels: Vec<String>,
}

pub struct DialBoard {
    dials: Vec<Dial>,
    locale: Locale,
    ring_spacing: u16,
    mounted: HashMap<String, MountedRing>,
}

impl DialBoard {
    pub fn new(dials: Vec<Dial>, locale: Locale, ring_spacing: u16) -> Self {
        Self {
            dials,
            locale,
            ring_spacing,
            mounted: HashMap::new(),
        }
    }

    /// Resolve every `[[dial]]` marker of `config`.
    ///
    /// Broken markers and repeated ids are reported and skipped; the remaining
    /// dials are unaffected.
    pub fn from_config(config: &Config) -> Self {
        let mut dials = Vec::new();
        let mut seen = HashSet::new();

        for spec in &config.dials {
            match Dial::from_spec(spec) {
                Ok(dial) if !seen.insert(dial.id.clone()) => {
                    log_warning!("Dial id '{}' is used twice, skipping the second", dial.id);
                }
                Ok(dial) => dials.push(dial),
                Err(e) => log_warning!("{e}, skipping this dial"),
            }
        }

        if dials.is_empty() {
            log_warning!("No usable dials configured, nothing to show");
        }

        Self::new(
            dials,
            resolve_locale(config.locale.as_deref()),
            config.ring_spacing(),
        )
    }

    pub fn dials(&self) -> &[Dial] {
        &self.dials
    }

    pub fn dial_ids(&self) -> impl Iterator<Item = &str> {
        self.dials.iter().map(|dial| dial.id.as_str())
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Radius of the ring at `position`, the first dial being outermost.
    fn radius_for(&self, position: usize, dial: &Dial) -> u16 {
        dial.radius.unwrap_or_else(|| {
            let rings_inside = (self.dials.len() - 1 - position) as u16;
            BASE_RADIUS.saturating_add(self.ring_spacing.saturating_mul(rings_inside))
        })
    }

    fn mount_ring(
        &mut self,
        position: usize,
        fields: &ClockFields,
        ledger: &mut AngleLedger,
        surface: &mut dyn DialSurface,
    ) -> Result<()> {
        let dial = &self.dials[position];
        let divisions = dial.divisions(fields);
        let labels = dial.labels(fields, self.locale);
        let radius = self.radius_for(position, dial);
        surface.mount(&dial.id, radius, &place_labels(&labels, divisions))?;
        // The surface dropped its markers along with the old labels
        ledger.clear_active(&dial.id);
        self.mounted.insert(
            dial.id.clone(),
            MountedRing {
                divisions,
                label_key: dial.label_key(fields),
                labels,
            },
        );
        Ok(())
    }

    /// Layout phase: mount every ring from scratch.
    pub fn layout(
        &mut self,
        fields: &ClockFields,
        ledger: &mut AngleLedger,
        surface: &mut dyn DialSurface,
    ) -> Result<()> {
        self.mounted.clear();
        for position in 0..self.dials.len() {
            self.mount_ring(position, fields, ledger, surface)?;
        }
        Ok(())
    }

    /// Update phase: rotate every ring to the value in `fields`.
    pub fn update(
        &mut self,
        fields: &ClockFields,
        ledger: &mut AngleLedger,
        surface: &mut dyn DialSurface,
    ) -> Result<Vec<DialReading>> {
        let mut readings = Vec::with_capacity(self.dials.len());

        for position in 0..self.dials.len() {
            let dial = &self.dials[position];
            let divisions = dial.divisions(fields);
            let label_key = dial.label_key(fields);

            let stale = self
                .mounted
                .get(&dial.id)
                .is_none_or(|ring| ring.divisions != divisions || ring.label_key != label_key);
            if stale {
                self.mount_ring(position, fields, ledger, surface)?;
            }

            let dial = &self.dials[position];
            let value = dial.value(fields);
            let index = value as usize;
            let state = ledger.get(&dial.id);
            let rotation = rotate_towards(state.angle, divisions, value);

            surface.set_rotation(&dial.id, rotation.angle)?;
            if state.active != Some(index) {
                if let Some(previous) = state.active {
                    surface.set_active(&dial.id, previous, false)?;
                }
                surface.set_active(&dial.id, index, true)?;
            }

            ledger.record(
                &dial.id,
                DialState {
                    angle: rotation.angle,
                    active: Some(index),
                },
            );

            let label = self
                .mounted
                .get(&dial.id)
                .and_then(|ring| ring.labels.get(index))
                .cloned()
                .unwrap_or_default();

            readings.push(DialReading {
                dial_id: dial.id.clone(),
                kind: dial.kind,
                value,
                divisions,
                label,
                rotation,
            });
        }

        Ok(readings)
    }
}
