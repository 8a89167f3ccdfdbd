// SPDX-License-Identifier: GPL-3.0-only

//! Drag-to-select over a popup's candidate cells.

use crate::popup::geometry::Rect;

/// Returns the index of the cell whose horizontal span contains `x`.
///
/// Cells are ordered left to right in popup-local space. A point left of the
/// first cell selects the first, a point right of the last selects the last,
/// and a point in the gap between two cells selects the right-hand one. The
/// result is `None` only when there are no cells.
///
/// Only the x coordinate matters: dragging above or below the popup keeps
/// selecting by column.
pub fn select_candidate(cells: &[Rect], x: f32) -> Option<usize> {
    let last = cells.len().checked_sub(1)?;
    Some(
        cells
            .iter()
            .position(|cell| x < cell.max_x())
            .unwrap_or(last),
    )
}
