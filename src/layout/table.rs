// SPDX-License-Identifier: GPL-3.0-only

//! The layout constant table: screen size to geometry profile.
//!
//! The table is an explicitly constructed, immutable lookup object. It is
//! built once at startup (from the built-in device list or a JSON file) and
//! handed to whoever needs a [`LayoutProfile`].
//!
//! # Fallback
//!
//! A lookup miss is a degraded mode, never an error. Depending on the
//! [`FallbackPolicy`], the table returns the designated default profile or
//! the closest profile of the same orientation, and logs a warning either way.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::app_settings;
use crate::layout::profile::{LayoutProfile, ProfileSpec, ScreenSize};
use crate::layout::types::{ParseError, ValidationIssue};
use crate::popup::geometry::Size;

/// What the table returns when no profile matches a screen size exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Return the designated default profile
    #[default]
    Default,
    /// Return the same-orientation profile closest in size, else the default
    Nearest,
}

/// Immutable mapping from screen size to layout profile.
#[derive(Debug, Clone)]
pub struct LayoutTable {
    profiles: HashMap<ScreenSize, LayoutProfile>,
    default_profile: LayoutProfile,
    fallback: FallbackPolicy,
}

impl LayoutTable {
    /// Builds a table from profiles.
    ///
    /// # Errors
    ///
    /// Returns a validation error if two profiles share a screen size or if
    /// `default_screen` has no profile.
    pub fn new(
        profiles: Vec<LayoutProfile>,
        default_screen: ScreenSize,
    ) -> Result<Self, ParseError> {
        let mut issues = Vec::new();
        let mut map = HashMap::with_capacity(profiles.len());

        for (index, profile) in profiles.into_iter().enumerate() {
            let screen = profile.screen();
            if map.insert(screen, profile).is_some() {
                issues.push(
                    ValidationIssue::error(
                        format!("Duplicate screen size {}", screen),
                        format!("profiles[{}].screen", index),
                    )
                    .with_suggestion("Each orientation of each device needs its own entry"),
                );
            }
        }

        let default_profile = map.get(&default_screen).cloned();
        if default_profile.is_none() {
            issues.push(
                ValidationIssue::error(
                    format!("No profile for the default screen {}", default_screen),
                    "default_screen",
                )
                .with_suggestion("Add a profile for the default screen or change default_screen"),
            );
        }

        match default_profile {
            Some(default_profile) if issues.is_empty() => Ok(Self {
                profiles: map,
                default_profile,
                fallback: FallbackPolicy::Default,
            }),
            _ => Err(ParseError::validation_error(issues)),
        }
    }

    /// Returns the built-in table of known device classes.
    ///
    /// The default profile is the canonical 375x812 portrait screen.
    pub fn builtin() -> Self {
        let profiles: HashMap<ScreenSize, LayoutProfile> = builtin_specs()
            .into_iter()
            .map(|spec| (spec.screen, LayoutProfile::new(spec)))
            .collect();

        let default_profile = LayoutProfile::new(canonical_spec());

        Self {
            profiles,
            default_profile,
            fallback: FallbackPolicy::Default,
        }
    }

    /// Sets the fallback policy.
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Changes the designated default profile.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the table has no profile for `screen`.
    pub fn with_default_screen(mut self, screen: ScreenSize) -> Result<Self, ParseError> {
        match self.profiles.get(&screen) {
            Some(profile) => {
                self.default_profile = profile.clone();
                Ok(self)
            }
            None => Err(ParseError::validation_error(vec![ValidationIssue::error(
                format!("No profile for the default screen {}", screen),
                "default_screen",
            )])),
        }
    }

    /// Returns the profile for an observed screen size.
    ///
    /// The size is truncated to integer points before matching. A miss falls
    /// back according to the table's [`FallbackPolicy`] and never fails.
    pub fn layout_profile_for(&self, screen_size: Size) -> &LayoutProfile {
        let screen = ScreenSize::from_points(screen_size);
        if let Some(profile) = self.profiles.get(&screen) {
            return profile;
        }

        let fallback = match self.fallback {
            FallbackPolicy::Default => &self.default_profile,
            FallbackPolicy::Nearest => self.nearest(screen).unwrap_or(&self.default_profile),
        };

        tracing::warn!(
            "No layout constants for {}; falling back to {} ({:?} policy)",
            screen,
            fallback.screen(),
            self.fallback
        );

        fallback
    }

    /// Returns the profile declared for exactly this screen size.
    pub fn get(&self, screen: ScreenSize) -> Option<&LayoutProfile> {
        self.profiles.get(&screen)
    }

    /// Returns the designated default profile.
    pub fn default_profile(&self) -> &LayoutProfile {
        &self.default_profile
    }

    /// Returns the fallback policy.
    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Returns every declared screen size in ascending order.
    pub fn screens(&self) -> Vec<ScreenSize> {
        let mut screens: Vec<ScreenSize> = self.profiles.keys().copied().collect();
        screens.sort();
        screens
    }

    /// Returns the number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns `true` if the table has no profiles.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn nearest(&self, screen: ScreenSize) -> Option<&LayoutProfile> {
        self.profiles
            .iter()
            .filter(|(candidate, _)| candidate.is_landscape() == screen.is_landscape())
            .min_by_key(|(candidate, _)| (candidate.distance_squared(&screen), **candidate))
            .map(|(_, profile)| profile)
    }
}

impl Default for LayoutTable {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// Built-in Device Table
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn spec(
    device: &str,
    screen: (u32, u32),
    keyboard: (f32, f32),
    button_gap: f32,
    system_key_width: f32,
    shift_key_width: f32,
    key_height: f32,
    autocomplete_bar_height: f32,
    edge_horizontal_inset: f32,
) -> ProfileSpec {
    ProfileSpec {
        screen: ScreenSize::new(screen.0, screen.1),
        device: Some(device.to_string()),
        keyboard_width: keyboard.0,
        keyboard_height: keyboard.1,
        button_gap,
        system_key_width,
        shift_key_width,
        key_height,
        autocomplete_bar_height,
        edge_horizontal_inset,
    }
}

fn canonical_spec() -> ProfileSpec {
    spec(
        "iPhone 12 mini, 11 Pro, X, Xs (portrait)",
        (app_settings::DEFAULT_SCREEN_WIDTH, app_settings::DEFAULT_SCREEN_HEIGHT),
        (375.0, 216.0 + 45.0),
        6.0,
        40.0,
        42.0,
        42.0,
        45.0,
        3.0,
    )
}

/// Provided constants for every known device class and orientation.
pub fn builtin_specs() -> Vec<ProfileSpec> {
    vec![
        spec("iPhone 12 Pro Max (portrait)", (428, 926), (428.0, 175.0 + 49.0 + 45.0), 6.0, 48.0, 47.0, 45.0, 45.0, 3.0),
        spec("iPhone 12 Pro Max (landscape)", (926, 428), (692.0, 160.0 + 38.0), 5.0, 62.0, 84.0, 32.0, 36.0, 3.0),
        spec("iPhone 12, 12 Pro (portrait)", (390, 844), (390.0, 216.0 + 45.0), 6.0, 43.0, 44.0, 42.0, 45.0, 3.0),
        spec("iPhone 12, 12 Pro (landscape)", (844, 390), (694.0, 160.0 + 38.0), 5.0, 62.0, 84.0, 32.0, 36.0, 3.0),
        canonical_spec(),
        spec("iPhone 12 mini, 11 Pro, X, Xs (landscape)", (812, 375), (662.0, 150.0 + 38.0), 5.0, 59.0, 80.0, 30.0, 36.0, 3.0),
        spec("iPhone 11 Pro Max, Xs Max, 11, Xr (portrait)", (414, 896), (414.0, 226.0 + 45.0), 6.0, 46.0, 46.0, 45.0, 45.0, 4.0),
        spec("iPhone 11 Pro Max, Xs Max, 11, Xr (landscape)", (896, 414), (662.0, 150.0 + 38.0), 5.0, 59.0, 80.0, 30.0, 107.0 / 3.0, 4.0),
        spec("iPhone 8+, 7+, 6s+, 6+ (portrait)", (414, 736), (414.0, 226.0 + 45.0), 6.0, 46.0, 45.0, 45.0, 45.0, 4.0),
        spec("iPhone 8+, 7+, 6s+, 6+ (landscape)", (736, 414), (588.0, 162.0 + 38.0), 6.0, 69.0, 69.0, 32.0, 36.0, 2.0),
        spec("iPhone SE (2nd gen), 8, 7, 6s, 6 (portrait)", (375, 667), (375.0, 216.0 + 44.0), 6.0, 40.0, 42.0, 42.0, 44.0, 3.0),
        spec("iPhone SE (2nd gen), 8, 7, 6s, 6 (landscape)", (667, 375), (526.0, 162.0 + 38.0), 6.0, 63.0, 63.0, 32.0, 36.0, 2.0),
        spec("iPhone SE (1st gen), 5c, 5s, 5 (portrait)", (320, 568), (320.0, 216.0 + 38.0), 6.0, 34.0, 36.0, 38.0, 42.0, 3.0),
        spec("iPhone SE (1st gen), 5c, 5s, 5 (landscape)", (568, 320), (568.0, 162.0 + 38.0), 5.0, 50.0, 68.0, 32.0, 36.0, 2.0),
    ]
}

// ============================================================================
// Tests
// ============================================================================
