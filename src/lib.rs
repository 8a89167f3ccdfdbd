// SPDX-License-Identifier: GPL-3.0-only

//! Keypopup - Key popup interaction engine for a soft keyboard
//!
//! Each key on a soft keyboard either commits a single glyph or, depending on
//! the gesture, shows a popup of related glyphs (diacritics, symbols,
//! alternate keyboard types) that the user picks from by dragging. This crate
//! implements that behavior independently of any rendering toolkit.
//!
//! # Architecture
//!
//! 1. **Layout constant table** (`layout`): per-device geometry profiles keyed
//!    by screen size, with an explicit default/nearest fallback.
//!
//! 2. **Geometry engine** (`popup::geometry`): picks the direction a popup
//!    expands in and places it above its key, clamped into the keyboard.
//!
//! 3. **Selection model** (`popup::selection`): maps a drag position to the
//!    candidate under it.
//!
//! 4. **Key state machine** (`popup::state`): one per key, arming and tearing
//!    down popups and reporting the committed action.
//!
//! A [`popup::KeyboardContainer`] ties these together: it receives raw pointer
//! events, finds the key that owns the gesture and routes events to it.
//!
//! # Modules
//!
//! - `app_settings`: Fixed layout policy constants
//! - `config`: Engine settings loaded from JSON
//! - `layout`: Key caps, device profiles and the layout constant table
//! - `popup`: Popup geometry, selection, per-key state and event dispatch

pub mod app_settings;
pub mod config;
pub mod layout;
pub mod popup;

// ============================================================================
// Integration Tests
// ============================================================================
