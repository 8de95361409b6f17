//! Layout phase: where each label sits on its ring.
//!
//! Labels are spread evenly, index 0 at the reference point (3 o'clock) and
//! increasing clockwise in screen coordinates (y grows downwards). Each label
//! carries the angle it was placed at so a surface can pre-rotate the text to
//! read along the ring.

use crate::core::rotation::target_angle;

/// One label position on a ring, relative to the ring's center.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub index: usize,
    pub text: String,
    /// Placement angle in degrees, also the text's upright rotation.
    pub angle: f64,
    /// Offset from the center on the unit circle.
    pub x: f64,
    pub y: f64,
}

impl LabelPlacement {
    /// Offset of the label after the dial is rotated by `-dial_angle`.
    pub fn rotated_offset(&self, dial_angle: f64) -> (f64, f64) {
        let radians = (self.angle - dial_angle).to_radians();
        (radians.cos(), radians.sin())
    }
}

/// Place `labels` around a ring with `divisions` positions.
///
/// Labels beyond `divisions` have no slot and are dropped.
pub fn place_labels(labels: &[String], divisions: u32) -> Vec<LabelPlacement> {
    labels
        .iter()
        .take(divisions as usize)
        .enumerate()
        .map(|(index, text)| {
            let angle = target_angle(divisions, index as u32);
            let radians = angle.to_radians();
            LabelPlacement {
                index,
                text: text.clone(),
                angle,
                x: radians.cos(),
                y: radians.sin(),
            }
        })
        .collect()
}
