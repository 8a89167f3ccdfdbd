// SPDX-License-Identifier: GPL-3.0-only

//! Key popup interaction engine.
//!
//! This module turns gestures on a key into committed actions, showing a
//! popup of candidate glyphs when the key offers more than one.
//!
//! # Architecture
//!
//! - **geometry**: Points, rectangles, and [`PopupGeometry`], which picks a
//!   popup's [`PopupDirection`] and places its frame inside the container.
//! - **layout**: [`PopupLayout`], the candidates and cells of one active popup.
//! - **selection**: Maps a drag position to a candidate index.
//! - **state**: [`KeyInteraction`], the per-key state machine.
//! - **message**: [`GestureEvent`] and [`GestureOutcome`].
//! - **container**: [`KeyboardContainer`], which hit-tests touches and routes
//!   each gesture to the key that owns it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use keypopup::config::EngineConfig;
//! use keypopup::layout::{KeyCap, LayoutTable};
//! use keypopup::popup::{GestureEvent, KeyboardContainer, Point, Rect, Size};
//!
//! let table = LayoutTable::builtin();
//! let config = EngineConfig::default();
//! let mut keyboard = KeyboardContainer::for_screen(&table, Size::new(375.0, 812.0), &config);
//!
//! let e = keyboard.add_key(
//!     KeyCap::character("e").with_children(vec![KeyCap::character("é"), KeyCap::character("è")]),
//!     Rect::new(78.0, 53.0, 31.5, 42.0),
//! );
//!
//! keyboard.dispatch(GestureEvent::Down { point: Point::new(90.0, 70.0) });
//! keyboard.dispatch(GestureEvent::LongPress);
//! keyboard.dispatch(GestureEvent::Move { point: Point::new(120.0, 20.0) });
//! let outcome = keyboard.dispatch(GestureEvent::Up);
//! println!("{:?}", outcome.committed_action());
//! ```

pub mod container;
pub mod geometry;
pub mod layout;
pub mod message;
pub mod selection;
pub mod state;

pub use container::KeyboardContainer;
pub use geometry::{Point, PopupDirection, PopupGeometry, Rect, Size};
pub use layout::PopupLayout;
pub use message::{GestureEvent, GestureOutcome, KeyId};
pub use selection::select_candidate;
pub use state::{KeyInteraction, KeyInteractionState, KeyMode};
