//! Surface that keeps the applied effects in memory.

use anyhow::{Result, bail};
use std::collections::{BTreeSet, HashMap};

use super::DialSurface;
use crate::core::layout::LabelPlacement;

#[derive(Debug, Clone, Default)]
pub struct HeadlessRing {
    pub radius: u16,
    pub placements: Vec<LabelPlacement>,
    pub rotation: f64,
    pub active: BTreeSet<usize>,
}

impl HeadlessRing {
    /// Text of the single active label, if exactly one is active.
    pub fn active_label(&self) -> Option<&str> {
        if self.active.len() != 1 {
            return None;
        }
        let index = *self.active.iter().next()?;
        self.placements.get(index).map(|p| p.text.as_str())
    }
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    rings: HashMap<String, HeadlessRing>,
    mount_count: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ring(&self, dial_id: &str) -> Option<&HeadlessRing> {
        self.rings.get(dial_id)
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// How many times any ring was mounted.
    pub fn mount_count(&self) -> usize {
        self.mount_count
    }

    fn ring_mut(&mut self, dial_id: &str) -> Result<&mut HeadlessRing> {
        match self.rings.get_mut(dial_id) {
            Some(ring) => Ok(ring),
            None => bail!("Dial '{dial_id}' was never mounted"),
        }
    }
}

impl DialSurface for HeadlessSurface {
    fn mount(&mut self, dial_id: &str, radius: u16, placements: &[LabelPlacement]) -> Result<()> {
        let rotation = self.rings.get(dial_id).map_or(0.0, |ring| ring.rotation);
        self.rings.insert(
            dial_id.to_string(),
            HeadlessRing {
                radius,
                placements: placements.to_vec(),
                rotation,
                active: BTreeSet::new(),
            },
        );
        self.mount_count += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.rings.clear();
        Ok(())
    }

    fn set_rotation(&mut self, dial_id: &str, degrees: f64) -> Result<()> {
        self.ring_mut(dial_id)?.rotation = degrees;
        Ok(())
    }

    fn set_active(&mut self, dial_id: &str, index: usize, active: bool) -> Result<()> {
        let ring = self.ring_mut(dial_id)?;
        if active {
            ring.active.insert(index);
        } else {
            ring.active.remove(&index);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "headless"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::place_labels;

    #[test]
    fn test_remount_keeps_rotation_and_drops_markers() {
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut surface = HeadlessSurface::new();
        surface.mount("ring", 4, &place_labels(&labels, 3)).unwrap();
        surface.set_rotation("ring", 480.0).unwrap();
        surface.set_active("ring", 1, true).unwrap();
        assert_eq!(surface.ring("ring").unwrap().active_label(), Some("b"));

        surface.mount("ring", 4, &place_labels(&labels, 3)).unwrap();
        let ring = surface.ring("ring").unwrap();
        assert_eq!(ring.rotation, 480.0);
        assert!(ring.active.is_empty());
        assert_eq!(surface.mount_count(), 2);
    }

    #[test]
    fn test_updates_to_unmounted_ring_fail() {
        let mut surface = HeadlessSurface::new();
        assert!(surface.set_rotation("ghost", 10.0).is_err());
        assert!(surface.set_active("ghost", 0, true).is_err());
    }
}
