// SPDX-License-Identifier: GPL-3.0-only

//! Centralized layout policy constants.
//!
//! These values are fixed policy for every layout profile and are not
//! configurable per call.

/// Inset between the autocomplete bar and the first key row, in points.
pub const KEY_VIEW_TOP_INSET: f32 = 8.0;

/// Inset below the last key row, in points.
pub const KEY_VIEW_BOTTOM_INSET: f32 = 3.0;

/// Number of input keys assumed in the widest row.
pub const KEYS_PER_ROW: u32 = 10;

/// Number of key rows assumed in the key view.
pub const KEY_ROWS: u32 = 4;

/// Width of the canonical screen used when no profile matches.
pub const DEFAULT_SCREEN_WIDTH: u32 = 375;

/// Height of the canonical screen used when no profile matches.
pub const DEFAULT_SCREEN_HEIGHT: u32 = 812;

/// Padding around the popup's candidate cells, in points.
pub const POPUP_CONTENT_INSET: f32 = 0.0;

/// Default tracing directive for the binary.
pub const LOG_DIRECTIVE: &str = "keypopup=info";
