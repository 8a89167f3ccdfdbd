// SPDX-License-Identifier: GPL-3.0-only

//! Popup direction selection and frame placement.
//!
//! Everything here is pure: a [`PopupGeometry`] is an immutable snapshot of
//! the active [`LayoutProfile`] and the engine's placement settings, and its
//! methods compute the same output for the same input.
//!
//! All frames are in the container's coordinate space unless noted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{EdgeClampPolicy, EngineConfig};
use crate::layout::profile::LayoutProfile;
use crate::layout::types::KeyCap;
use crate::popup::layout::PopupLayout;

// ============================================================================
// Primitives
// ============================================================================

/// A point in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A size in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Creates a new size.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: f32,
    /// Y coordinate of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle at the origin.
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn min_x(&self) -> f32 {
        self.x
    }

    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn mid_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn min_y(&self) -> f32 {
        self.y
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn mid_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Returns the center point.
    pub fn center(&self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Returns the size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns `true` if the point is inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom exclusive,
    /// so two abutting rectangles never both contain a point.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x()
            && point.x < self.max_x()
            && point.y >= self.min_y()
            && point.y < self.max_y()
    }

    /// Returns the rectangle moved by `(dx, dy)`.
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Converts a point in the enclosing space into this rectangle's local space.
    pub fn to_local(&self, point: Point) -> Point {
        Point::new(point.x - self.x, point.y - self.y)
    }
}

// ============================================================================
// Direction
// ============================================================================

/// Horizontal expansion policy of a popup relative to its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupDirection {
    /// Key is near the right edge; the popup grows leftward.
    Left,
    /// Key is near the left edge; the popup grows rightward.
    Right,
    /// Key is in the left half; the popup starts at the key.
    Middle,
    /// Key is in the right half; the popup starts one cell left of the key.
    MiddleExtendLeft,
}

impl fmt::Display for PopupDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Middle => "middle",
            Self::MiddleExtendLeft => "middleExtendLeft",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Geometry Engine
// ============================================================================

/// Placement engine for one layout profile.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupGeometry {
    profile: LayoutProfile,
    edge_clamp: EdgeClampPolicy,
    edge_threshold_keys: f32,
    content_inset: f32,
}

impl PopupGeometry {
    /// Creates a geometry engine for `profile` with the config's placement settings.
    pub fn new(profile: LayoutProfile, config: &EngineConfig) -> Self {
        Self {
            profile,
            edge_clamp: config.edge_clamp,
            edge_threshold_keys: config.edge_threshold_keys,
            content_inset: config.popup_content_inset,
        }
    }

    /// Returns the active profile.
    pub fn profile(&self) -> &LayoutProfile {
        &self.profile
    }

    /// Replaces the active profile, keeping the placement settings.
    pub fn set_profile(&mut self, profile: LayoutProfile) {
        self.profile = profile;
    }

    /// Returns the edge clamp policy.
    pub fn edge_clamp(&self) -> EdgeClampPolicy {
        self.edge_clamp
    }

    /// Distance from a container edge under which a key counts as "at the edge".
    pub fn edge_threshold(&self) -> f32 {
        self.profile.key_button_width() * self.edge_threshold_keys
    }

    /// Chooses the popup's expansion direction.
    ///
    /// Rules are evaluated in order and the first match wins:
    ///
    /// 1. left edge closer than the threshold to the container's left edge: `Right`
    /// 2. right edge closer than the threshold to the container's right edge: `Left`
    /// 3. key center at or left of the container midline: `Middle`
    /// 4. otherwise: `MiddleExtendLeft`
    ///
    /// A margin of exactly one threshold counts as interior.
    pub fn direction(&self, key_frame: Rect, container: Rect) -> PopupDirection {
        let threshold = self.edge_threshold();

        let direction = if key_frame.min_x() - container.min_x() < threshold {
            PopupDirection::Right
        } else if container.max_x() - key_frame.max_x() < threshold {
            PopupDirection::Left
        } else if key_frame.mid_x() <= container.mid_x() {
            PopupDirection::Middle
        } else {
            PopupDirection::MiddleExtendLeft
        };

        tracing::debug!(
            "Popup direction {} for key at x={:.1}..{:.1} in {:.1}..{:.1}",
            direction,
            key_frame.min_x(),
            key_frame.max_x(),
            container.min_x(),
            container.max_x()
        );

        direction
    }

    /// Width of one candidate cell.
    pub fn cell_width(&self) -> f32 {
        self.profile.key_button_width()
    }

    /// Horizontal distance between the left edges of adjacent cells.
    pub fn cell_pitch(&self) -> f32 {
        self.cell_width() + self.profile.button_gap()
    }

    /// Content-driven size of a popup showing `count` candidates in one row.
    pub fn natural_size(&self, count: usize) -> Size {
        let count = count as f32;
        let gaps = (count - 1.0).max(0.0);
        Size::new(
            count * self.cell_width() + gaps * self.profile.button_gap() + 2.0 * self.content_inset,
            self.profile.key_height() + 2.0 * self.content_inset,
        )
    }

    /// Candidate cells in popup-local coordinates, left to right.
    pub fn cells(&self, count: usize) -> Vec<Rect> {
        (0..count)
            .map(|index| {
                Rect::new(
                    self.content_inset + index as f32 * self.cell_pitch(),
                    self.content_inset,
                    self.cell_width(),
                    self.profile.key_height(),
                )
            })
            .collect()
    }

    /// Distance from the popup's left edge to the key's left edge before clamping.
    ///
    /// `Right` and `Middle` align the popup with the key's left edge. `Left`
    /// aligns the right edges. `MiddleExtendLeft` reaches one cell further left.
    pub fn anchor_offset(&self, direction: PopupDirection, popup_width: f32, key_width: f32) -> f32 {
        let max_offset = (popup_width - key_width).max(0.0);
        match direction {
            PopupDirection::Right | PopupDirection::Middle => 0.0,
            PopupDirection::Left => max_offset,
            PopupDirection::MiddleExtendLeft => self.cell_pitch().min(max_offset),
        }
    }

    /// Places a popup of `natural_size` directly above the key and clamps it
    /// horizontally into the container.
    ///
    /// The left edge is always clamped. With [`EdgeClampPolicy::Symmetric`] the
    /// right edge is clamped too; when the popup is wider than the container
    /// the left edge wins.
    pub fn place(
        &self,
        natural_size: Size,
        key_frame: Rect,
        container: Rect,
        direction: PopupDirection,
    ) -> Rect {
        let offset = self.anchor_offset(direction, natural_size.width, key_frame.width);
        let mut frame = Rect::new(
            key_frame.min_x() - offset,
            key_frame.min_y() - natural_size.height,
            natural_size.width,
            natural_size.height,
        );

        if self.edge_clamp == EdgeClampPolicy::Symmetric && frame.max_x() > container.max_x() {
            let overflow = frame.max_x() - container.max_x();
            tracing::debug!("Popup overflows right edge by {:.1}; shifting left", overflow);
            frame = frame.offset(-overflow, 0.0);
        }

        if frame.min_x() < container.min_x() {
            let overflow = container.min_x() - frame.min_x();
            tracing::debug!("Popup overflows left edge by {:.1}; shifting right", overflow);
            frame = frame.offset(overflow, 0.0);
        }

        frame
    }

    /// Re-places an existing popup for a new key frame, container or profile.
    ///
    /// The direction chosen when the popup was armed is kept; only the size,
    /// cells and clamped frame are recomputed.
    pub fn relayout(&self, popup: &mut PopupLayout, key_frame: Rect, container: Rect) {
        let count = popup.candidate_count();
        let frame = self.place(self.natural_size(count), key_frame, container, popup.direction());
        popup.reposition(frame, key_frame.min_x() - frame.min_x(), self.cells(count));
    }

    /// Lays out a popup for `candidates` above `key_frame`.
    ///
    /// Returns `None` when there are no candidates.
    pub fn layout(&self, candidates: Vec<KeyCap>, key_frame: Rect, container: Rect) -> Option<PopupLayout> {
        if candidates.is_empty() {
            return None;
        }

        let direction = self.direction(key_frame, container);
        let natural_size = self.natural_size(candidates.len());
        let frame = self.place(natural_size, key_frame, container, direction);
        let cells = self.cells(candidates.len());

        Some(PopupLayout::new(
            candidates,
            direction,
            frame,
            key_frame.min_x() - frame.min_x(),
            cells,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
