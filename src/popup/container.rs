// SPDX-License-Identifier: GPL-3.0-only

//! Explicit event dispatch across the keys of one keyboard.
//!
//! The container receives raw pointer events in its own coordinate space,
//! hit-tests a touch-down to find the owning key, and routes every later
//! event of that gesture to the same key until it ends. Keys never see each
//! other's events.

use crate::config::EngineConfig;
use crate::layout::profile::LayoutProfile;
use crate::layout::table::LayoutTable;
use crate::layout::types::KeyCap;
use crate::popup::geometry::{Point, PopupGeometry, Rect, Size};
use crate::popup::layout::PopupLayout;
use crate::popup::message::{GestureEvent, GestureOutcome, KeyId};
use crate::popup::state::KeyInteraction;

#[derive(Debug, Clone)]
struct KeySlot {
    interaction: KeyInteraction,
    frame: Rect,
    hit_test_frame: Option<Rect>,
    enabled: bool,
}

impl KeySlot {
    fn hit_frame(&self) -> Rect {
        self.hit_test_frame.unwrap_or(self.frame)
    }
}

/// The keys of one keyboard plus the gesture currently in progress.
#[derive(Debug, Clone)]
pub struct KeyboardContainer {
    bounds: Rect,
    geometry: PopupGeometry,
    keys: Vec<KeySlot>,
    active: Option<KeyId>,
}

impl KeyboardContainer {
    /// Creates an empty container.
    pub fn new(bounds: Rect, profile: LayoutProfile, config: &EngineConfig) -> Self {
        Self {
            bounds,
            geometry: PopupGeometry::new(profile, config),
            keys: Vec::new(),
            active: None,
        }
    }

    /// Creates an empty container sized to the keyboard canvas of the profile
    /// matching `screen_size`.
    pub fn for_screen(table: &LayoutTable, screen_size: Size, config: &EngineConfig) -> Self {
        let profile = table.layout_profile_for(screen_size).clone();
        let bounds = Rect::from_size(profile.keyboard_size());
        Self::new(bounds, profile, config)
    }

    /// Returns the container bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Returns the geometry engine for the active profile.
    pub fn geometry(&self) -> &PopupGeometry {
        &self.geometry
    }

    /// Updates the container bounds on a layout pass.
    ///
    /// An armed popup is re-placed inside the new bounds.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.relayout_active();
    }

    /// Switches to a new profile, e.g. after rotation.
    ///
    /// An armed popup is resized and re-placed with the new profile.
    pub fn set_profile(&mut self, profile: LayoutProfile) {
        self.geometry.set_profile(profile);
        self.relayout_active();
    }

    /// Adds a key with its visual frame in container coordinates.
    pub fn add_key(&mut self, key_cap: KeyCap, frame: Rect) -> KeyId {
        self.keys.push(KeySlot {
            interaction: KeyInteraction::new(key_cap),
            frame,
            hit_test_frame: None,
            enabled: true,
        });
        KeyId(self.keys.len() - 1)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns a key's interaction state.
    pub fn key(&self, id: KeyId) -> Option<&KeyInteraction> {
        self.keys.get(id.0).map(|slot| &slot.interaction)
    }

    /// Returns a key's visual frame.
    pub fn key_frame(&self, id: KeyId) -> Option<Rect> {
        self.keys.get(id.0).map(|slot| slot.frame)
    }

    /// Moves a key. Returns `false` for an unknown key.
    ///
    /// Moving the active key re-places its popup.
    pub fn set_key_frame(&mut self, id: KeyId, frame: Rect) -> bool {
        let Some(slot) = self.keys.get_mut(id.0) else {
            return false;
        };
        slot.frame = frame;
        if self.active == Some(id) {
            self.relayout_active();
        }
        true
    }

    /// Sets or clears the frame used for hit testing instead of the visual frame.
    pub fn set_hit_test_frame(&mut self, id: KeyId, frame: Option<Rect>) -> bool {
        match self.keys.get_mut(id.0) {
            Some(slot) => {
                slot.hit_test_frame = frame;
                true
            }
            None => false,
        }
    }

    /// Replaces a key's cap. See [`KeyInteraction::set_key_cap`].
    pub fn set_key_cap(&mut self, id: KeyId, key_cap: KeyCap) -> bool {
        let Some(slot) = self.keys.get_mut(id.0) else {
            return false;
        };
        let replaced = slot.interaction.set_key_cap(key_cap);
        if replaced && self.active == Some(id) {
            self.active = None;
        }
        replaced
    }

    /// Enables or disables a key. Disabling the active key cancels its gesture.
    pub fn set_key_enabled(&mut self, id: KeyId, enabled: bool) -> bool {
        let Some(slot) = self.keys.get_mut(id.0) else {
            return false;
        };
        slot.enabled = enabled;
        if !enabled && self.active == Some(id) {
            slot.interaction.cancel_and_teardown();
            self.active = None;
        }
        true
    }

    pub fn is_key_enabled(&self, id: KeyId) -> bool {
        self.keys.get(id.0).is_some_and(|slot| slot.enabled)
    }

    /// Key owning the gesture in progress.
    pub fn active_key(&self) -> Option<KeyId> {
        self.active
    }

    /// Popup of the key owning the gesture in progress.
    pub fn active_popup(&self) -> Option<&PopupLayout> {
        self.active
            .and_then(|id| self.keys.get(id.0))
            .and_then(|slot| slot.interaction.popup())
    }

    /// Finds the enabled key under a container point.
    ///
    /// When hit-test frames overlap, the key whose visual center is closest wins.
    pub fn key_at(&self, point: Point) -> Option<KeyId> {
        self.keys
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.enabled && slot.hit_frame().contains(point))
            .min_by(|(_, a), (_, b)| {
                distance_squared(a.frame.center(), point).total_cmp(&distance_squared(b.frame.center(), point))
            })
            .map(|(index, _)| KeyId(index))
    }

    /// Converts a container point into the active popup's local space.
    pub fn to_popup_space(&self, point: Point) -> Option<Point> {
        self.active_popup().map(|popup| popup.to_local(point))
    }

    /// Routes one pointer event to the key that owns it.
    pub fn dispatch(&mut self, event: GestureEvent) -> GestureOutcome {
        match event {
            GestureEvent::Down { point } => self.touch_down(point),
            GestureEvent::LongPress => self.long_press(),
            GestureEvent::Move { point } => self.touch_move(point),
            GestureEvent::Up => self.touch_up(),
            GestureEvent::Cancel => self.touch_cancel(),
        }
    }

    fn relayout_active(&mut self) {
        let Some(slot) = self.active.and_then(|id| self.keys.get_mut(id.0)) else {
            return;
        };
        let frame = slot.frame;
        slot.interaction.relayout_popup(&self.geometry, frame, self.bounds);
    }

    fn touch_down(&mut self, point: Point) -> GestureOutcome {
        if let Some(stale) = self.active.take() {
            tracing::debug!("Touch down while {:?} was active; cancelling stale gesture", stale);
            if let Some(slot) = self.keys.get_mut(stale.0) {
                slot.interaction.cancel_and_teardown();
            }
        }

        let Some(id) = self.key_at(point) else {
            return GestureOutcome::Ignored;
        };
        self.active = Some(id);

        let slot = &mut self.keys[id.0];
        if !slot.interaction.touch_down() {
            return GestureOutcome::Pressed { key: id };
        }
        self.arm(id, false)
    }

    fn long_press(&mut self) -> GestureOutcome {
        match self.active {
            Some(id) => self.arm(id, true),
            None => GestureOutcome::Ignored,
        }
    }

    fn arm(&mut self, id: KeyId, is_long_press: bool) -> GestureOutcome {
        let Some(slot) = self.keys.get_mut(id.0) else {
            return GestureOutcome::Ignored;
        };
        let frame = slot.frame;
        match slot
            .interaction
            .arm_popup(&self.geometry, frame, self.bounds, is_long_press)
        {
            Some(popup) => GestureOutcome::PopupArmed {
                key: id,
                direction: popup.direction(),
                candidates: popup.candidate_count(),
                long_press: is_long_press,
            },
            None => GestureOutcome::Pressed { key: id },
        }
    }

    fn touch_move(&mut self, point: Point) -> GestureOutcome {
        let Some(id) = self.active else {
            return GestureOutcome::Ignored;
        };
        let Some(slot) = self.keys.get_mut(id.0) else {
            return GestureOutcome::Ignored;
        };

        let Some(local) = slot.interaction.popup().map(|popup| popup.to_local(point)) else {
            return GestureOutcome::Pressed { key: id };
        };
        match slot.interaction.update_selection(local) {
            Some(index) => GestureOutcome::Selected { key: id, index },
            None => GestureOutcome::Pressed { key: id },
        }
    }

    fn touch_up(&mut self) -> GestureOutcome {
        let Some(id) = self.active.take() else {
            return GestureOutcome::Ignored;
        };
        match self.keys.get_mut(id.0) {
            Some(slot) => GestureOutcome::Committed {
                key: id,
                action: slot.interaction.commit_and_teardown(),
            },
            None => GestureOutcome::Ignored,
        }
    }

    fn touch_cancel(&mut self) -> GestureOutcome {
        let Some(id) = self.active.take() else {
            return GestureOutcome::Ignored;
        };
        match self.keys.get_mut(id.0) {
            Some(slot) => {
                slot.interaction.cancel_and_teardown();
                GestureOutcome::Cancelled { key: id }
            }
            None => GestureOutcome::Ignored,
        }
    }
}

fn distance_squared(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::KeyAction;
    use crate::popup::geometry::PopupDirection;
    use crate::popup::state::KeyMode;

    /// One row of three keys on the canonical 375x812 keyboard
    fn container() -> (KeyboardContainer, KeyId, KeyId, KeyId) {
        let mut container = KeyboardContainer::for_screen(
            &LayoutTable::builtin(),
            Size::new(375.0, 812.0),
            &EngineConfig::default(),
        );
        let q = container.add_key(KeyCap::character("q"), Rect::new(3.0, 53.0, 31.5, 42.0));
        let e = container.add_key(
            KeyCap::character("e").with_children(vec![
                KeyCap::character("è"),
                KeyCap::character("é"),
                KeyCap::character("ê"),
            ]),
            Rect::new(78.0, 53.0, 31.5, 42.0),
        );
        let backspace = container.add_key(
            KeyCap::new(KeyAction::Backspace),
            Rect::new(320.0, 200.0, 52.0, 42.0),
        );
        (container, q, e, backspace)
    }

    /// Test 1: Bounds come from the profile's keyboard canvas
    #[test]
    fn test_for_screen_bounds() {
        let (container, ..) = container();
        assert_eq!(container.bounds(), Rect::new(0.0, 0.0, 375.0, 261.0));
        assert_eq!(container.len(), 3);
    }

    /// Test 2: Hit testing honors frames, hit-test frames and enabled flags
    #[test]
    fn test_hit_testing() {
        let (mut container, q, e, _) = container();

        assert_eq!(container.key_at(Point::new(10.0, 60.0)), Some(q));
        assert_eq!(container.key_at(Point::new(40.0, 60.0)), None, "Gap between keys");

        assert!(container.set_hit_test_frame(q, Some(Rect::new(0.0, 50.0, 40.0, 48.0))));
        assert_eq!(container.key_at(Point::new(37.0, 60.0)), Some(q));

        assert!(container.set_key_enabled(e, false));
        assert_eq!(container.key_at(Point::new(90.0, 60.0)), None);
        assert!(!container.is_key_enabled(e));
    }

    /// Test 3: Overlapping hit-test frames resolve to the closest key
    #[test]
    fn test_overlapping_hit_frames() {
        let (mut container, q, e, _) = container();
        container.set_hit_test_frame(q, Some(Rect::new(0.0, 50.0, 80.0, 48.0)));
        container.set_hit_test_frame(e, Some(Rect::new(40.0, 50.0, 80.0, 48.0)));

        assert_eq!(container.key_at(Point::new(45.0, 70.0)), Some(q));
        assert_eq!(container.key_at(Point::new(70.0, 70.0)), Some(e));
    }

    /// Test 4: A full long-press gesture routed through the container
    #[test]
    fn test_long_press_gesture() {
        let (mut container, _, e, _) = container();

        let outcome = container.dispatch(GestureEvent::Down {
            point: Point::new(90.0, 70.0),
        });
        assert!(matches!(
            outcome,
            GestureOutcome::PopupArmed { key, candidates: 1, long_press: false, .. } if key == e
        ));

        let outcome = container.dispatch(GestureEvent::LongPress);
        assert_eq!(
            outcome,
            GestureOutcome::PopupArmed {
                key: e,
                direction: PopupDirection::Middle,
                candidates: 3,
                long_press: true,
            }
        );

        // Popup starts at x=78; the third cell starts 75pt in
        let outcome = container.dispatch(GestureEvent::Move {
            point: Point::new(160.0, 20.0),
        });
        assert_eq!(outcome, GestureOutcome::Selected { key: e, index: 2 });

        let outcome = container.dispatch(GestureEvent::Up);
        assert_eq!(outcome.committed_action(), Some(&KeyAction::character("ê")));
        assert_eq!(container.active_key(), None);
        assert_eq!(container.key(e).map(|k| k.mode()), Some(KeyMode::Idle));
    }

    /// Test 5: Keys without popups commit their primary action
    #[test]
    fn test_plain_key_commit() {
        let (mut container, _, _, backspace) = container();

        let outcome = container.dispatch(GestureEvent::Down {
            point: Point::new(330.0, 210.0),
        });
        assert_eq!(outcome, GestureOutcome::Pressed { key: backspace });
        assert_eq!(
            container.dispatch(GestureEvent::LongPress),
            GestureOutcome::Pressed { key: backspace }
        );
        assert_eq!(
            container.dispatch(GestureEvent::Move { point: Point::new(0.0, 0.0) }),
            GestureOutcome::Pressed { key: backspace }
        );
        assert_eq!(
            container.dispatch(GestureEvent::Up),
            GestureOutcome::Committed {
                key: backspace,
                action: KeyAction::Backspace,
            }
        );
    }

    /// Test 6: Cancel commits nothing and frees the gesture
    #[test]
    fn test_cancel() {
        let (mut container, _, e, _) = container();
        container.dispatch(GestureEvent::Down { point: Point::new(90.0, 70.0) });
        container.dispatch(GestureEvent::LongPress);

        assert_eq!(container.dispatch(GestureEvent::Cancel), GestureOutcome::Cancelled { key: e });
        assert!(container.active_popup().is_none());
        assert_eq!(container.dispatch(GestureEvent::Up), GestureOutcome::Ignored);
    }

    /// Test 7: Events with no owning key are ignored
    #[test]
    fn test_events_without_owner() {
        let (mut container, ..) = container();
        assert_eq!(
            container.dispatch(GestureEvent::Down { point: Point::new(200.0, 5.0) }),
            GestureOutcome::Ignored
        );
        assert_eq!(container.dispatch(GestureEvent::LongPress), GestureOutcome::Ignored);
        assert_eq!(
            container.dispatch(GestureEvent::Move { point: Point::new(1.0, 1.0) }),
            GestureOutcome::Ignored
        );
        assert_eq!(container.dispatch(GestureEvent::Cancel), GestureOutcome::Ignored);
    }

    /// Test 8: A new touch-down cancels a gesture that never ended
    #[test]
    fn test_new_down_cancels_stale_gesture() {
        let (mut container, q, e, _) = container();
        container.dispatch(GestureEvent::Down { point: Point::new(90.0, 70.0) });
        container.dispatch(GestureEvent::LongPress);

        container.dispatch(GestureEvent::Down { point: Point::new(10.0, 60.0) });
        assert_eq!(container.active_key(), Some(q));
        assert_eq!(container.key(e).map(|k| k.mode()), Some(KeyMode::Idle));
    }

    /// Test 9: Disabling the active key cancels its gesture
    #[test]
    fn test_disable_active_key() {
        let (mut container, _, e, _) = container();
        container.dispatch(GestureEvent::Down { point: Point::new(90.0, 70.0) });

        container.set_key_enabled(e, false);
        assert_eq!(container.active_key(), None);
        assert_eq!(container.dispatch(GestureEvent::Up), GestureOutcome::Ignored);
    }

    /// Test 10: Popup-space conversion follows the active popup's frame
    #[test]
    fn test_to_popup_space() {
        let (mut container, ..) = container();
        assert!(container.to_popup_space(Point::new(0.0, 0.0)).is_none());

        container.dispatch(GestureEvent::Down { point: Point::new(90.0, 70.0) });
        let frame = container.active_popup().map(|p| p.frame()).expect("armed");
        assert_eq!(
            container.to_popup_space(Point::new(frame.x + 5.0, frame.y + 6.0)),
            Some(Point::new(5.0, 6.0))
        );
    }

    /// Test 11: A layout pass re-places the armed popup inside the new bounds
    #[test]
    fn test_set_bounds_replaces_armed_popup() {
        let (mut container, _, e, _) = container();
        container.dispatch(GestureEvent::Down { point: Point::new(90.0, 70.0) });
        container.dispatch(GestureEvent::LongPress);
        container.dispatch(GestureEvent::Move { point: Point::new(160.0, 20.0) });

        // 3 cells: 106.5pt wide, placed at the key's left edge x=78
        let before = container.active_popup().map(|p| p.frame()).expect("armed");
        assert!((before.max_x() - 184.5).abs() < 1e-4);

        container.set_bounds(Rect::new(0.0, 0.0, 150.0, 261.0));
        let popup = container.active_popup().expect("still armed");
        assert!(
            (popup.frame().max_x() - 150.0).abs() < 1e-4,
            "Popup {:?} should be clamped into the new bounds",
            popup.frame()
        );
        assert_eq!(popup.direction(), PopupDirection::Middle, "Direction is kept");
        assert_eq!(popup.candidate_count(), 3);
        assert_eq!(container.key(e).and_then(|k| k.selected_index()), Some(2));
        assert_eq!(container.key(e).map(|k| k.mode()), Some(KeyMode::PopupArmedLongPress));
    }

    /// Test 12: New profiles and moved keys re-place the armed popup
    #[test]
    fn test_profile_and_key_frame_replace_armed_popup() {
        let (mut container, _, e, _) = container();
        container.dispatch(GestureEvent::Down { point: Point::new(90.0, 70.0) });
        container.dispatch(GestureEvent::LongPress);

        let landscape = LayoutTable::builtin()
            .layout_profile_for(Size::new(812.0, 375.0))
            .clone();
        container.set_profile(landscape);
        let frame = container.active_popup().map(|p| p.frame()).expect("armed");
        assert!((frame.height - 30.0).abs() < f32::EPSILON, "Landscape key height");

        assert!(container.set_key_frame(e, Rect::new(100.0, 60.0, 31.5, 42.0)));
        let frame = container.active_popup().map(|p| p.frame()).expect("armed");
        assert!((frame.min_x() - 100.0).abs() < 1e-4);
        assert!((frame.max_y() - 60.0).abs() < 1e-4, "Popup sits on the moved key");
    }

    /// Test 13: Unknown key ids are rejected
    #[test]
    fn test_unknown_key_id() {
        let (mut container, ..) = container();
        let missing = KeyId(99);
        assert!(!container.set_key_frame(missing, Rect::default()));
        assert!(!container.set_hit_test_frame(missing, None));
        assert!(!container.set_key_cap(missing, KeyCap::character("x")));
        assert!(!container.set_key_enabled(missing, true));
        assert!(container.key(missing).is_none());
    }
}
