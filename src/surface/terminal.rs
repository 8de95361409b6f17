//! Concentric rings drawn in the terminal with crossterm.
//!
//! Ring radii are in rows; columns are stretched by [`CELL_ASPECT_RATIO`] so
//! rings look round. When the rings do not fit, all of them are scaled down
//! together. Inactive labels are cut to three columns to limit overlap on
//! crowded rings; the active label is shown in full, highlighted, next to the
//! reference marker at 3 o'clock.

use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyModifiers},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, Clear, ClearType},
};
use std::collections::BTreeSet;
use std::io::{Stdout, Write, stdout};
use std::time::Duration;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::DialSurface;
use crate::common::constants::CELL_ASPECT_RATIO;
use crate::core::layout::LabelPlacement;

/// Columns an inactive label may take.
const INACTIVE_LABEL_WIDTH: usize = 3;
const REFERENCE_MARKER: &str = "◀";

struct Ring {
    id: String,
    radius: u16,
    placements: Vec<LabelPlacement>,
    rotation: f64,
    active: BTreeSet<usize>,
}

pub struct TerminalSurface {
    rings: Vec<Ring>,
    out: Stdout,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            rings: Vec::new(),
            out: stdout(),
        }
    }

    fn ring_mut(&mut self, dial_id: &str) -> Option<&mut Ring> {
        self.rings.iter_mut().find(|ring| ring.id == dial_id)
    }
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Label text as drawn; wide characters count as two columns.
fn shorten(text: &str, active: bool) -> String {
    if active {
        return text.to_string();
    }

    let mut width = 0;
    text.chars()
        .take_while(|ch| {
            width += ch.width().unwrap_or(0);
            width <= INACTIVE_LABEL_WIDTH
        })
        .collect()
}

/// Scale applied to every radius so the outermost ring fits in `cols` x `rows`.
fn fit_scale(max_radius: f64, cols: f64, rows: f64) -> f64 {
    if max_radius <= 0.0 {
        return 1.0;
    }
    let vertical = (rows / 2.0 - 1.0) / max_radius;
    // Leave room for the widest labels and the marker on the right
    let horizontal = (cols / 2.0 - 8.0) / (max_radius * CELL_ASPECT_RATIO);
    vertical.min(horizontal).clamp(0.1, 1.0)
}

impl DialSurface for TerminalSurface {
    fn mount(&mut self, dial_id: &str, radius: u16, placements: &[LabelPlacement]) -> Result<()> {
        let ring = Ring {
            id: dial_id.to_string(),
            radius,
            placements: placements.to_vec(),
            rotation: 0.0,
            active: BTreeSet::new(),
        };
        match self.ring_mut(dial_id) {
            Some(existing) => {
                let rotation = existing.rotation;
                *existing = ring;
                existing.rotation = rotation;
            }
            None => self.rings.push(ring),
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.rings.clear();
        Ok(())
    }

    fn set_rotation(&mut self, dial_id: &str, degrees: f64) -> Result<()> {
        if let Some(ring) = self.ring_mut(dial_id) {
            ring.rotation = degrees;
        }
        Ok(())
    }

    fn set_active(&mut self, dial_id: &str, index: usize, active: bool) -> Result<()> {
        if let Some(ring) = self.ring_mut(dial_id) {
            if active {
                ring.active.insert(index);
            } else {
                ring.active.remove(&index);
            }
        }
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        let (cols, rows) = terminal::size().context("failed to read terminal size")?;
        let (width, height) = (f64::from(cols), f64::from(rows));
        let (cx, cy) = (width / 2.0, height / 2.0);

        let max_radius = self
            .rings
            .iter()
            .map(|ring| f64::from(ring.radius))
            .fold(0.0, f64::max);
        let scale = fit_scale(max_radius, width, height);

        queue!(self.out, Clear(ClearType::All))?;

        // Inactive labels first so active ones are drawn on top
        for draw_active in [false, true] {
            for ring in &self.rings {
                let radius = f64::from(ring.radius) * scale;
                for placement in &ring.placements {
                    let active = ring.active.contains(&placement.index);
                    if active != draw_active {
                        continue;
                    }

                    let text = shorten(&placement.text, active);
                    let text_width = text.width() as f64;
                    let (dx, dy) = placement.rotated_offset(ring.rotation);
                    let col = (cx + dx * radius * CELL_ASPECT_RATIO - text_width / 2.0).round();
                    let row = (cy + dy * radius).round();

                    if col < 0.0 || row < 0.0 || col + text_width > width || row >= height - 1.0 {
                        continue;
                    }

                    queue!(self.out, MoveTo(col as u16, row as u16))?;
                    if active {
                        queue!(
                            self.out,
                            SetAttribute(Attribute::Reverse),
                            Print(&text),
                            SetAttribute(Attribute::Reset)
                        )?;
                    } else {
                        queue!(self.out, Print(&text))?;
                    }
                }
            }
        }

        let marker_col = (cx + max_radius * scale * CELL_ASPECT_RATIO + 6.0).round();
        if marker_col < width {
            queue!(
                self.out,
                MoveTo(marker_col as u16, cy.round() as u16),
                Print(REFERENCE_MARKER)
            )?;
        }

        queue!(
            self.out,
            MoveTo(0, rows.saturating_sub(1)),
            Print("q / Esc: quit")
        )?;
        self.out.flush()?;
        Ok(())
    }

    fn should_close(&mut self) -> Result<bool> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(true),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true);
                    }
                    _ => {}
                }
            }
        }
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "terminal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_inactive_labels() {
        assert_eq!(shorten("September", false), "Sep");
        assert_eq!(shorten("September", true), "September");
        assert_eq!(shorten("07", false), "07");
    }

    #[test]
    fn test_wide_labels_measured_in_columns() {
        assert_eq!("日曜日".width(), 6);
        assert_eq!(shorten("日曜日", false), "日");
        assert_eq!(shorten("日曜日", false).width(), 2);
        assert_eq!(shorten("1月", false), "1月");
    }

    #[test]
    fn test_fit_scale_shrinks_large_rings() {
        // 24 rows fit a radius of 11, not 15
        let scale = fit_scale(15.0, 200.0, 24.0);
        assert!((scale - 11.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_scale_never_grows() {
        assert_eq!(fit_scale(3.0, 200.0, 60.0), 1.0);
        assert_eq!(fit_scale(0.0, 80.0, 24.0), 1.0);
    }
}
