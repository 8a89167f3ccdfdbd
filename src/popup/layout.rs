// SPDX-License-Identifier: GPL-3.0-only

//! The laid-out contents of one active popup.

use crate::layout::types::{KeyAction, KeyCap};
use crate::popup::geometry::{Point, PopupDirection, Rect};
use crate::popup::selection::select_candidate;

/// One active popup: its candidates, placement and cells.
///
/// Created when a popup is armed and dropped when the gesture ends. The frame
/// is in container coordinates; the cells are in popup-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupLayout {
    candidates: Vec<KeyCap>,
    direction: PopupDirection,
    frame: Rect,
    anchor_offset: f32,
    cells: Vec<Rect>,
}

impl PopupLayout {
    /// Creates a popup layout. `candidates` and `cells` must have the same length.
    pub(crate) fn new(
        candidates: Vec<KeyCap>,
        direction: PopupDirection,
        frame: Rect,
        anchor_offset: f32,
        cells: Vec<Rect>,
    ) -> Self {
        debug_assert_eq!(candidates.len(), cells.len());
        Self {
            candidates,
            direction,
            frame,
            anchor_offset,
            cells,
        }
    }

    /// Moves the popup after a layout pass. Candidates and direction are kept.
    pub(crate) fn reposition(&mut self, frame: Rect, anchor_offset: f32, cells: Vec<Rect>) {
        debug_assert_eq!(self.candidates.len(), cells.len());
        self.frame = frame;
        self.anchor_offset = anchor_offset;
        self.cells = cells;
    }

    /// Candidates in presentation order.
    pub fn candidates(&self) -> &[KeyCap] {
        &self.candidates
    }

    /// Number of candidates. Never zero.
    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    /// Returns the candidate at `index`.
    pub fn candidate(&self, index: usize) -> Option<&KeyCap> {
        self.candidates.get(index)
    }

    /// Returns the action of the candidate at `index`.
    pub fn action_at(&self, index: usize) -> Option<&KeyAction> {
        self.candidate(index).map(|candidate| &candidate.action)
    }

    /// Expansion direction chosen for this popup.
    pub fn direction(&self) -> PopupDirection {
        self.direction
    }

    /// Final, clamped frame in container coordinates.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Distance from the popup's left edge to the owning key's left edge, after clamping.
    pub fn anchor_offset(&self) -> f32 {
        self.anchor_offset
    }

    /// Candidate cells in popup-local coordinates.
    pub fn cells(&self) -> &[Rect] {
        &self.cells
    }

    /// Converts a container point into popup-local coordinates.
    pub fn to_local(&self, point: Point) -> Point {
        self.frame.to_local(point)
    }

    /// Returns the index of the candidate under a popup-local point.
    pub fn select(&self, point: Point) -> usize {
        select_candidate(&self.cells, point.x).unwrap_or(0)
    }
}
