// SPDX-License-Identifier: GPL-3.0-only

//! Per-device geometry profiles.
//!
//! A [`LayoutProfile`] holds the geometry constants for one screen size and
//! orientation. The provided constants come from a [`ProfileSpec`]; the key
//! width, key-view height and row gap are derived once at construction using
//! the fixed policy in [`crate::app_settings`]:
//!
//! - key width = (keyboard width − 2 × edge inset − 9 × gap) / 10
//! - key-view height = keyboard height − autocomplete bar − top inset − bottom inset
//! - row gap = (key-view height − 4 × key height) / 3

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::app_settings;
use crate::layout::types::ValidationIssue;
use crate::popup::geometry::Size;

/// Integer screen size in points, the key of the layout table.
///
/// Portrait and landscape are distinct keys: `375x812` and `812x375` map to
/// different profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Width in points
    pub width: u32,
    /// Height in points
    pub height: u32,
}

impl ScreenSize {
    /// Creates a new screen size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Converts an observed size in (fractional) points, truncating toward zero.
    ///
    /// Negative and NaN components become zero.
    pub fn from_points(size: Size) -> Self {
        Self {
            width: size.width.max(0.0) as u32,
            height: size.height.max(0.0) as u32,
        }
    }

    /// Returns `true` if the screen is wider than tall.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    /// Squared distance to another screen size, used for nearest matching.
    pub fn distance_squared(&self, other: &ScreenSize) -> u64 {
        let dw = u64::from(self.width.abs_diff(other.width));
        let dh = u64::from(self.height.abs_diff(other.height));
        dw * dw + dh * dh
    }
}

impl fmt::Display for ScreenSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Provided constants for one profile, as written in a layout table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSpec {
    /// Screen size this profile applies to
    pub screen: ScreenSize,

    /// Device models this profile was measured on (provenance only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// Keyboard canvas width
    pub keyboard_width: f32,

    /// Keyboard canvas height, including the autocomplete bar
    pub keyboard_height: f32,

    /// Horizontal gap between adjacent keys
    pub button_gap: f32,

    /// Width of system keys (keyboard switch, return)
    pub system_key_width: f32,

    /// Width of the shift key
    pub shift_key_width: f32,

    /// Height of one key
    pub key_height: f32,

    /// Height of the autocomplete bar above the keys
    pub autocomplete_bar_height: f32,

    /// Inset between the keyboard edge and the outermost keys
    pub edge_horizontal_inset: f32,
}

/// Immutable geometry constants for one screen size and orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutProfile {
    screen: ScreenSize,
    device: Option<String>,
    keyboard_size: Size,
    button_gap: f32,
    system_key_width: f32,
    shift_key_width: f32,
    key_height: f32,
    autocomplete_bar_height: f32,
    edge_horizontal_inset: f32,

    // Derived
    key_button_width: f32,
    key_view_height: f32,
    key_row_gap: f32,
}

impl LayoutProfile {
    /// Builds a profile and computes its derived values.
    ///
    /// An undersized canvas still builds; the negative row gap is logged.
    pub fn new(spec: ProfileSpec) -> Self {
        let keys_per_row = app_settings::KEYS_PER_ROW as f32;
        let rows = app_settings::KEY_ROWS as f32;

        let key_button_width = (spec.keyboard_width
            - 2.0 * spec.edge_horizontal_inset
            - (keys_per_row - 1.0) * spec.button_gap)
            / keys_per_row;
        let key_view_height = spec.keyboard_height
            - spec.autocomplete_bar_height
            - app_settings::KEY_VIEW_TOP_INSET
            - app_settings::KEY_VIEW_BOTTOM_INSET;
        let key_row_gap = (key_view_height - rows * spec.key_height) / (rows - 1.0);

        if key_row_gap < 0.0 {
            tracing::warn!(
                "Layout profile {}: row gap is {:.2}; four rows of {} do not fit in {}",
                spec.screen,
                key_row_gap,
                spec.key_height,
                spec.keyboard_height
            );
        }

        Self {
            screen: spec.screen,
            device: spec.device,
            keyboard_size: Size::new(spec.keyboard_width, spec.keyboard_height),
            button_gap: spec.button_gap,
            system_key_width: spec.system_key_width,
            shift_key_width: spec.shift_key_width,
            key_height: spec.key_height,
            autocomplete_bar_height: spec.autocomplete_bar_height,
            edge_horizontal_inset: spec.edge_horizontal_inset,
            key_button_width,
            key_view_height,
            key_row_gap,
        }
    }

    /// Screen size this profile is declared for.
    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Device provenance, if recorded.
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    /// Keyboard canvas size.
    pub fn keyboard_size(&self) -> Size {
        self.keyboard_size
    }

    /// Horizontal gap between adjacent keys.
    pub fn button_gap(&self) -> f32 {
        self.button_gap
    }

    /// Width of system keys.
    pub fn system_key_width(&self) -> f32 {
        self.system_key_width
    }

    /// Width of the shift key.
    pub fn shift_key_width(&self) -> f32 {
        self.shift_key_width
    }

    /// Height of one key.
    pub fn key_height(&self) -> f32 {
        self.key_height
    }

    /// Height of the autocomplete bar.
    pub fn autocomplete_bar_height(&self) -> f32 {
        self.autocomplete_bar_height
    }

    /// Inset between the keyboard edge and the outermost keys.
    pub fn edge_horizontal_inset(&self) -> f32 {
        self.edge_horizontal_inset
    }

    /// Width of a regular input key in a 10-key row.
    pub fn key_button_width(&self) -> f32 {
        self.key_button_width
    }

    /// Height available to the four key rows.
    pub fn key_view_height(&self) -> f32 {
        self.key_view_height
    }

    /// Vertical gap between key rows. May be negative for undersized canvases.
    pub fn key_row_gap(&self) -> f32 {
        self.key_row_gap
    }

    /// Returns `true` if the canvas is too short for four rows of keys.
    pub fn has_negative_row_gap(&self) -> bool {
        self.key_row_gap < 0.0
    }

    /// Checks the profile for impossible or degenerate geometry.
    ///
    /// Non-positive provided sizes and a non-positive key width are errors;
    /// a negative key-view height or row gap is a warning.
    pub fn validate(&self, field_path: &str) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.screen.width == 0 || self.screen.height == 0 {
            issues.push(ValidationIssue::error(
                format!("Screen size {} has a zero dimension", self.screen),
                format!("{}.screen", field_path),
            ));
        }

        let positive = [
            ("keyboard_width", self.keyboard_size.width),
            ("keyboard_height", self.keyboard_size.height),
            ("key_height", self.key_height),
            ("system_key_width", self.system_key_width),
            ("shift_key_width", self.shift_key_width),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                issues.push(ValidationIssue::error(
                    format!("{} must be positive, got {}", name, value),
                    format!("{}.{}", field_path, name),
                ));
            }
        }

        let non_negative = [
            ("button_gap", self.button_gap),
            ("autocomplete_bar_height", self.autocomplete_bar_height),
            ("edge_horizontal_inset", self.edge_horizontal_inset),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                issues.push(ValidationIssue::error(
                    format!("{} must not be negative, got {}", name, value),
                    format!("{}.{}", field_path, name),
                ));
            }
        }

        if !(self.key_button_width > 0.0) {
            issues.push(
                ValidationIssue::error(
                    format!("Computed key width is {:.2}", self.key_button_width),
                    format!("{}.keyboard_width", field_path),
                )
                .with_suggestion("Widen the keyboard or reduce button_gap/edge_horizontal_inset"),
            );
        }

        if self.key_view_height < 0.0 {
            issues.push(ValidationIssue::warning(
                format!("Computed key-view height is {:.2}", self.key_view_height),
                format!("{}.keyboard_height", field_path),
            ));
        }

        if self.has_negative_row_gap() {
            issues.push(
                ValidationIssue::warning(
                    format!(
                        "Computed row gap is {:.2}; four rows of {} do not fit",
                        self.key_row_gap, self.key_height
                    ),
                    format!("{}.key_height", field_path),
                )
                .with_suggestion("Reduce key_height or enlarge keyboard_height"),
            );
        }

        issues
    }
}

impl From<ProfileSpec> for LayoutProfile {
    fn from(spec: ProfileSpec) -> Self {
        Self::new(spec)
    }
}

// ============================================================================
// Tests
// ============================================================================
