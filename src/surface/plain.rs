//! Log-only surface for runs without a terminal (pipes, services).
//!
//! Rotation is not visible in a log, so only active label changes are printed.

use anyhow::Result;
use std::collections::HashMap;

use super::DialSurface;
use crate::core::layout::LabelPlacement;

#[derive(Default)]
pub struct PlainSurface {
    labels: HashMap<String, Vec<String>>,
    rotations: HashMap<String, f64>,
    changed: Vec<(String, usize)>,
}

impl PlainSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DialSurface for PlainSurface {
    fn mount(&mut self, dial_id: &str, _radius: u16, placements: &[LabelPlacement]) -> Result<()> {
        self.labels.insert(
            dial_id.to_string(),
            placements.iter().map(|p| p.text.clone()).collect(),
        );
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.labels.clear();
        self.changed.clear();
        Ok(())
    }

    fn set_rotation(&mut self, dial_id: &str, degrees: f64) -> Result<()> {
        self.rotations.insert(dial_id.to_string(), degrees);
        Ok(())
    }

    fn set_active(&mut self, dial_id: &str, index: usize, active: bool) -> Result<()> {
        if active {
            self.changed.push((dial_id.to_string(), index));
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        for (dial_id, index) in self.changed.drain(..) {
            let label = self
                .labels
                .get(&dial_id)
                .and_then(|labels| labels.get(index))
                .map_or("?", String::as_str);
            let angle = self.rotations.get(&dial_id).copied().unwrap_or_default();
            log_decorated!("{dial_id}: {label} ({angle:.1}°)");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "plain"
    }
}
