//! Where dials are drawn.
//!
//! The core only talks to a [`DialSurface`]: it mounts each ring's label
//! placements once (layout phase) and then, every frame, sets the ring's
//! rotation and toggles active markers (update phase). Everything about how
//! the result looks belongs to the implementation.
//!
//! - [`terminal::TerminalSurface`] draws the rings with crossterm.
//! - [`plain::PlainSurface`] logs active label changes when stdout is not a terminal.
//! - [`headless::HeadlessSurface`] only remembers what it was told; used by
//!   the `show` command and tests.

pub mod headless;
pub mod plain;
pub mod terminal;

use anyhow::Result;

use crate::core::layout::LabelPlacement;

/// Effects the frame loop applies to a visual surface.
#[cfg_attr(test, mockall::automock)]
pub trait DialSurface {
    /// Create or replace the ring `dial_id` with its placed labels.
    fn mount(&mut self, dial_id: &str, radius: u16, placements: &[LabelPlacement]) -> Result<()>;

    /// Remove every ring, before a full layout.
    fn clear(&mut self) -> Result<()>;

    /// Turn ring `dial_id` by `-degrees`.
    fn set_rotation(&mut self, dial_id: &str, degrees: f64) -> Result<()>;

    /// Mark or unmark the label at `index` of ring `dial_id` as the current value.
    fn set_active(&mut self, dial_id: &str, index: usize, active: bool) -> Result<()>;

    /// Show the frame built by the calls since the last present.
    fn present(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether the user asked to close the surface.
    fn should_close(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn name(&self) -> &'static str;
}
