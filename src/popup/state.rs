// SPDX-License-Identifier: GPL-3.0-only

//! Per-key gesture state machine.
//!
//! Each key owns exactly one [`KeyInteraction`]. Gesture events for a key are
//! strictly ordered (down, zero or more moves, then exactly one of up or
//! cancel) and arrive on the thread that owns the key. Nothing here is shared
//! between keys.
//!
//! ```text
//! Idle ──arm(tap)──▶ PopupArmedTap ──arm(long press)──▶ PopupArmedLongPress
//!   │                                                          ▲
//!   └──────────────────────arm(long press)─────────────────────┘
//!
//! any armed mode ──commit / cancel──▶ Idle
//! ```

use serde::{Deserialize, Serialize};

use crate::layout::types::{KeyAction, KeyCap};
use crate::popup::geometry::{Point, PopupGeometry, Rect};
use crate::popup::layout::PopupLayout;

/// Which gesture, if any, armed the key's popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyMode {
    /// No popup
    #[default]
    Idle,
    /// Popup armed by a tap, previewing the key itself
    PopupArmedTap,
    /// Popup armed by a long press, offering the key's variants
    PopupArmedLongPress,
}

impl KeyMode {
    fn for_gesture(is_long_press: bool) -> Self {
        if is_long_press {
            Self::PopupArmedLongPress
        } else {
            Self::PopupArmedTap
        }
    }
}

/// Mode, popup and selection of one key.
///
/// A popup and a selection exist exactly when the mode is not `Idle`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyInteractionState {
    mode: KeyMode,
    popup: Option<PopupLayout>,
    selected_index: Option<usize>,
}

impl KeyInteractionState {
    /// Returns the current mode.
    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    /// Returns the armed popup, if any.
    pub fn popup(&self) -> Option<&PopupLayout> {
        self.popup.as_ref()
    }

    /// Returns the selected candidate index while a popup is armed.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    fn is_armed(&self) -> bool {
        self.mode != KeyMode::Idle
    }
}

/// A key cap plus its interaction state.
#[derive(Debug, Clone)]
pub struct KeyInteraction {
    key_cap: KeyCap,
    state: KeyInteractionState,
}

impl KeyInteraction {
    /// Creates an idle key.
    pub fn new(key_cap: KeyCap) -> Self {
        Self {
            key_cap,
            state: KeyInteractionState::default(),
        }
    }

    /// Returns the assigned key cap.
    pub fn key_cap(&self) -> &KeyCap {
        &self.key_cap
    }

    /// Returns the full interaction state.
    pub fn state(&self) -> &KeyInteractionState {
        &self.state
    }

    /// Returns the current mode.
    pub fn mode(&self) -> KeyMode {
        self.state.mode
    }

    /// Returns the armed popup, if any.
    pub fn popup(&self) -> Option<&PopupLayout> {
        self.state.popup()
    }

    /// Returns the selected candidate index while a popup is armed.
    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected_index
    }

    /// Returns `true` if a popup is armed.
    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    /// Assigns a new key cap.
    ///
    /// An equal cap (same action) is a no-op. A different cap tears down any
    /// active popup first.
    ///
    /// # Returns
    ///
    /// `true` if the cap was replaced.
    pub fn set_key_cap(&mut self, key_cap: KeyCap) -> bool {
        if key_cap == self.key_cap {
            return false;
        }

        if self.state.is_armed() {
            tracing::debug!("Key cap replaced while armed; tearing down popup");
        }
        self.teardown();
        self.key_cap = key_cap;
        true
    }

    /// Starts a gesture on this key.
    ///
    /// A popup left over from an unfinished gesture is discarded.
    ///
    /// # Returns
    ///
    /// `true` if the key may arm a popup during this gesture.
    pub fn touch_down(&mut self) -> bool {
        if self.state.is_armed() {
            tracing::debug!("Touch down on armed key {}; discarding stale popup", self.key_cap.action);
            self.teardown();
        }
        self.key_cap.has_popup
    }

    /// Arms or re-arms the popup for a tap (`is_long_press == false`) or long press.
    ///
    /// A tap previews the key cap itself; a long press offers its children.
    /// Re-entering the current mode keeps the existing popup untouched.
    /// Switching from tap to long press replaces the popup.
    ///
    /// # Returns
    ///
    /// The armed popup, or `None` when the key cannot show one for this
    /// gesture. Commit then falls back to the key's primary action.
    pub fn arm_popup(
        &mut self,
        geometry: &PopupGeometry,
        key_frame: Rect,
        container_bounds: Rect,
        is_long_press: bool,
    ) -> Option<&PopupLayout> {
        if !self.key_cap.has_popup {
            return None;
        }

        if !is_long_press && self.key_cap.is_tap_popup_excluded() {
            tracing::debug!("{} does not preview on tap", self.key_cap.action);
            return None;
        }

        let target = KeyMode::for_gesture(is_long_press);
        if self.state.mode == target {
            tracing::debug!("Already in {:?}; keeping popup", target);
            return self.state.popup.as_ref();
        }

        let candidates = self.key_cap.popup_candidates(is_long_press);
        let Some(popup) = geometry.layout(candidates, key_frame, container_bounds) else {
            tracing::debug!("{} has no popup candidates for {:?}", self.key_cap.action, target);
            self.teardown();
            return None;
        };

        if self.state.is_armed() {
            tracing::debug!("Popup replaced: {:?} -> {:?}", self.state.mode, target);
        } else {
            tracing::debug!(
                "Popup armed: {:?} with {} candidate(s), direction {}",
                target,
                popup.candidate_count(),
                popup.direction()
            );
        }

        self.state = KeyInteractionState {
            mode: target,
            popup: Some(popup),
            selected_index: Some(0),
        };
        self.state.popup.as_ref()
    }

    /// Re-places the armed popup after a layout pass.
    ///
    /// Mode, candidates, direction and selection are kept. Does nothing when idle.
    ///
    /// # Returns
    ///
    /// The re-placed popup, or `None` if no popup is armed.
    pub fn relayout_popup(
        &mut self,
        geometry: &PopupGeometry,
        key_frame: Rect,
        container_bounds: Rect,
    ) -> Option<&PopupLayout> {
        let popup = self.state.popup.as_mut()?;
        geometry.relayout(popup, key_frame, container_bounds);
        tracing::debug!("Popup re-placed at x={:.1}", popup.frame().min_x());
        Some(&*popup)
    }

    /// Re-evaluates the selection for a touch point in popup-local coordinates.
    ///
    /// # Returns
    ///
    /// The selected candidate index, or `None` if no popup is armed.
    pub fn update_selection(&mut self, point: Point) -> Option<usize> {
        let index = self.state.popup.as_ref()?.select(point);
        self.state.selected_index = Some(index);
        Some(index)
    }

    /// Ends the gesture and returns the action to commit.
    ///
    /// With a popup armed this is the selected candidate's action; otherwise
    /// the key's primary action.
    pub fn commit_and_teardown(&mut self) -> KeyAction {
        let selected = self
            .state
            .popup
            .as_ref()
            .zip(self.state.selected_index)
            .and_then(|(popup, index)| popup.action_at(index))
            .cloned();

        let action = selected.unwrap_or_else(|| self.key_cap.action.clone());
        tracing::debug!("Commit from {:?}: {}", self.state.mode, action);

        self.teardown();
        action
    }

    /// Ends the gesture without committing anything.
    pub fn cancel_and_teardown(&mut self) {
        tracing::debug!("Cancel from {:?}", self.state.mode);
        self.teardown();
    }

    fn teardown(&mut self) {
        self.state = KeyInteractionState::default();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::layout::table::LayoutTable;
    use crate::layout::types::KeyboardType;

    fn geometry() -> PopupGeometry {
        PopupGeometry::new(
            LayoutTable::builtin().default_profile().clone(),
            &EngineConfig::default(),
        )
    }

    fn container() -> Rect {
        Rect::new(0.0, 0.0, 375.0, 261.0)
    }

    fn key_frame() -> Rect {
        Rect::new(150.0, 100.0, 31.5, 42.0)
    }

    fn e_key() -> KeyCap {
        KeyCap::character("e").with_children(vec![
            KeyCap::character("è"),
            KeyCap::character("é"),
            KeyCap::character("ê"),
            KeyCap::character("ë"),
        ])
    }

    /// Test 1: New keys are idle with nothing selected
    #[test]
    fn test_new_is_idle() {
        let key = KeyInteraction::new(e_key());
        assert_eq!(key.mode(), KeyMode::Idle);
        assert!(key.popup().is_none());
        assert!(key.selected_index().is_none());
    }

    /// Test 2: Tap arms a single-cell preview of the key itself
    #[test]
    fn test_tap_arms_preview() {
        let mut key = KeyInteraction::new(e_key());
        assert!(key.touch_down());

        let popup = key
            .arm_popup(&geometry(), key_frame(), container(), false)
            .expect("tap should arm");
        assert_eq!(popup.candidate_count(), 1);
        assert_eq!(popup.action_at(0), Some(&KeyAction::character("e")));

        assert_eq!(key.mode(), KeyMode::PopupArmedTap);
        assert_eq!(key.selected_index(), Some(0));
    }

    /// Test 3: Long press replaces the tap popup instead of stacking
    #[test]
    fn test_long_press_replaces_tap() {
        let geometry = geometry();
        let mut key = KeyInteraction::new(e_key());
        key.arm_popup(&geometry, key_frame(), container(), false);
        key.update_selection(Point::new(5.0, 5.0));

        let popup = key
            .arm_popup(&geometry, key_frame(), container(), true)
            .expect("long press should arm");
        assert_eq!(popup.candidate_count(), 4);
        assert_eq!(key.mode(), KeyMode::PopupArmedLongPress);
        assert_eq!(key.selected_index(), Some(0));
    }

    /// Test 4: Re-entering the same mode keeps the popup and selection
    #[test]
    fn test_same_mode_is_noop() {
        let geometry = geometry();
        let mut key = KeyInteraction::new(e_key());
        key.arm_popup(&geometry, key_frame(), container(), true);
        key.update_selection(Point::new(80.0, 5.0));
        let before = key.state().clone();

        // Different frame: a re-layout would move the popup
        let moved = key_frame().offset(40.0, 0.0);
        key.arm_popup(&geometry, moved, container(), true);

        assert_eq!(key.state(), &before, "No-op re-entry must not re-layout");
        assert_eq!(key.selected_index(), Some(2));
    }

    /// Test 5: Keys without popup capability stay idle
    #[test]
    fn test_no_popup_capability() {
        let mut key = KeyInteraction::new(KeyCap::new(KeyAction::Backspace));
        assert!(!key.touch_down());
        assert!(key.arm_popup(&geometry(), key_frame(), container(), true).is_none());
        assert_eq!(key.mode(), KeyMode::Idle);
        assert_eq!(key.commit_and_teardown(), KeyAction::Backspace);
    }

    /// Test 6: The emoji key arms on long press only
    #[test]
    fn test_emoji_key_tap_exclusion() {
        let geometry = geometry();
        let emoji = KeyCap::keyboard_type(KeyboardType::Emojis)
            .with_popup(true)
            .with_children(vec![
                KeyCap::keyboard_type(KeyboardType::Emojis),
                KeyCap::new(KeyAction::NextKeyboard),
            ]);
        let mut key = KeyInteraction::new(emoji);

        assert!(key.arm_popup(&geometry, key_frame(), container(), false).is_none());
        assert_eq!(key.mode(), KeyMode::Idle);

        assert!(key.arm_popup(&geometry, key_frame(), container(), true).is_some());
        assert_eq!(key.mode(), KeyMode::PopupArmedLongPress);
    }

    /// Test 7: Long press with no children falls back to the primary action
    #[test]
    fn test_empty_children_fall_back() {
        let geometry = geometry();
        let mut key = KeyInteraction::new(KeyCap::character("q"));

        key.arm_popup(&geometry, key_frame(), container(), false);
        assert_eq!(key.mode(), KeyMode::PopupArmedTap);

        assert!(key.arm_popup(&geometry, key_frame(), container(), true).is_none());
        assert_eq!(key.mode(), KeyMode::Idle, "Empty long press tears the preview down");
        assert_eq!(key.commit_and_teardown(), KeyAction::character("q"));
    }

    /// Test 8: Selection follows the drag and commit returns it
    #[test]
    fn test_drag_and_commit() {
        let mut key = KeyInteraction::new(e_key());
        key.arm_popup(&geometry(), key_frame(), container(), true);

        // Cells start at 0, 37.5, 75, 112.5
        assert_eq!(key.update_selection(Point::new(40.0, 0.0)), Some(1));
        assert_eq!(key.update_selection(Point::new(-100.0, 0.0)), Some(0));
        assert_eq!(key.update_selection(Point::new(1000.0, 0.0)), Some(3));

        assert_eq!(key.commit_and_teardown(), KeyAction::character("ë"));
        assert_eq!(key.mode(), KeyMode::Idle);
        assert!(key.popup().is_none());
        assert!(key.selected_index().is_none());
    }

    /// Test 9: Selection without a popup reports nothing
    #[test]
    fn test_update_selection_idle() {
        let mut key = KeyInteraction::new(e_key());
        assert_eq!(key.update_selection(Point::new(10.0, 10.0)), None);
        assert!(key.selected_index().is_none());
    }

    /// Test 10: Cancel tears down from every mode
    #[test]
    fn test_cancel_from_every_mode() {
        let geometry = geometry();
        for arm in [None, Some(false), Some(true)] {
            let mut key = KeyInteraction::new(e_key());
            if let Some(is_long_press) = arm {
                key.arm_popup(&geometry, key_frame(), container(), is_long_press);
            }
            key.cancel_and_teardown();
            assert_eq!(key.state(), &KeyInteractionState::default());
        }
    }

    /// Test 11: Replacing the key cap
    #[test]
    fn test_set_key_cap() {
        let mut key = KeyInteraction::new(e_key());
        key.arm_popup(&geometry(), key_frame(), container(), true);

        let same_action = KeyCap::character("e");
        assert!(!key.set_key_cap(same_action), "Equal cap is a no-op");
        assert_eq!(key.mode(), KeyMode::PopupArmedLongPress);

        assert!(key.set_key_cap(KeyCap::character("E")));
        assert_eq!(key.mode(), KeyMode::Idle);
        assert_eq!(key.key_cap().action, KeyAction::character("E"));
    }

    /// Test 12: Touch down discards a stale popup
    #[test]
    fn test_touch_down_discards_stale_popup() {
        let mut key = KeyInteraction::new(e_key());
        key.arm_popup(&geometry(), key_frame(), container(), true);

        assert!(key.touch_down());
        assert_eq!(key.mode(), KeyMode::Idle);
    }
}
