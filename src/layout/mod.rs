// SPDX-License-Identifier: GPL-3.0-only

//! Key caps and the layout constant table.
//!
//! This module holds the data model shared by the popup engine and the
//! per-device geometry it is placed with.
//!
//! # Features
//!
//! - **Key caps**: [`KeyCap`] describes a key's primary action, its long-press
//!   variants and how it is drawn
//! - **Device profiles**: [`LayoutProfile`] holds the geometry constants for one
//!   screen size and orientation, with derived key width and row gap
//! - **Explicit table**: [`LayoutTable`] maps screen sizes to profiles and falls
//!   back to a designated default (or the nearest entry) on a miss
//! - **JSON tables**: Replacement tables load from JSON with permissive
//!   validation, collecting warnings
//!
//! # Example Usage
//!
//! ## Built-in Table
//!
//! ```rust,ignore
//! use keypopup::layout::LayoutTable;
//! use keypopup::popup::Size;
//!
//! let table = LayoutTable::builtin();
//! let profile = table.layout_profile_for(Size::new(390.0, 844.0));
//! println!("Key width on {}: {:.1}", profile.screen(), profile.key_button_width());
//! ```
//!
//! ## Loading a Table
//!
//! ```rust,ignore
//! use keypopup::layout::parse_layout_table_file;
//!
//! match parse_layout_table_file("profiles.json") {
//!     Ok(result) => {
//!         if result.has_warnings() {
//!             println!("Loaded with {} warnings:", result.warning_count());
//!             for warning in &result.warnings {
//!                 println!("  {}", warning);
//!             }
//!         }
//!         let table = result.value;
//!         println!("{} profiles", table.len());
//!     }
//!     Err(e) => {
//!         eprintln!("Failed to load table: {}", e);
//!     }
//! }
//! ```
//!
//! # Table JSON Format
//!
//! ```json
//! {
//!     "default_screen": {"width": 375, "height": 812},
//!     "profiles": [
//!         {
//!             "screen": {"width": 375, "height": 812},
//!             "device": "iPhone 12 mini, 11 Pro, X, Xs (portrait)",
//!             "keyboard_width": 375,
//!             "keyboard_height": 261,
//!             "button_gap": 6,
//!             "system_key_width": 40,
//!             "shift_key_width": 42,
//!             "key_height": 42,
//!             "autocomplete_bar_height": 45,
//!             "edge_horizontal_inset": 3
//!         }
//!     ]
//! }
//! ```

pub mod parser;
pub mod profile;
pub mod table;
pub mod types;
pub mod validation;

pub use parser::{parse_layout_table_file, parse_layout_table_from_string};
pub use profile::{LayoutProfile, ProfileSpec, ScreenSize};
pub use table::{builtin_specs, FallbackPolicy, LayoutTable};
pub use types::{
    KeyAction, KeyCap, KeyCapDisplay, KeyboardType, ParseError, ParseResult, Severity,
    ValidationIssue,
};
pub use validation::{validate_table, TableFile};
