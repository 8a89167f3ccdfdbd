// SPDX-License-Identifier: GPL-3.0-only

//! Gesture events delivered to a keyboard container and what they produced.

use serde::{Deserialize, Serialize};

use crate::layout::types::KeyAction;
use crate::popup::geometry::{Point, PopupDirection};

/// Index of a key within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(pub usize);

/// Raw pointer events, in container coordinates.
///
/// Tap vs. long-press timing belongs to the caller: it sends `LongPress` once
/// its hold threshold has passed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    /// A touch started.
    Down { point: Point },

    /// The active touch has been held long enough to count as a long press.
    LongPress,

    /// The active touch moved.
    Move { point: Point },

    /// The active touch ended normally.
    Up,

    /// The active touch was cancelled by the system.
    Cancel,
}

/// Result of dispatching one [`GestureEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureOutcome {
    /// No key owns the event.
    Ignored,

    /// A key owns the gesture but shows no popup.
    Pressed { key: KeyId },

    /// A key's popup is armed.
    PopupArmed {
        key: KeyId,
        direction: PopupDirection,
        candidates: usize,
        long_press: bool,
    },

    /// The selection inside an armed popup was re-evaluated.
    Selected { key: KeyId, index: usize },

    /// The gesture ended and produced an action.
    Committed { key: KeyId, action: KeyAction },

    /// The gesture was cancelled; nothing is committed.
    Cancelled { key: KeyId },
}

impl GestureOutcome {
    /// Returns the committed action, if any.
    pub fn committed_action(&self) -> Option<&KeyAction> {
        match self {
            Self::Committed { action, .. } => Some(action),
            _ => None,
        }
    }

    /// Returns the key that handled the event.
    pub fn key(&self) -> Option<KeyId> {
        match self {
            Self::Ignored => None,
            Self::Pressed { key }
            | Self::PopupArmed { key, .. }
            | Self::Selected { key, .. }
            | Self::Committed { key, .. }
            | Self::Cancelled { key } => Some(*key),
        }
    }
}
