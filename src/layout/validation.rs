// SPDX-License-Identifier: GPL-3.0-only

//! Validation for layout tables loaded from JSON.
//!
//! Validation is permissive: a profile whose canvas is too small for four
//! rows still loads, with a warning. Only geometry that cannot produce a
//! usable key (non-positive sizes, a non-positive key width) or a table that
//! cannot answer lookups (duplicate entries, missing default) is fatal.

use serde::{Deserialize, Serialize};

use crate::app_settings;
use crate::layout::profile::{LayoutProfile, ProfileSpec, ScreenSize};
use crate::layout::table::LayoutTable;
use crate::layout::types::{ParseError, ParseResult, ValidationIssue};

fn default_screen() -> ScreenSize {
    ScreenSize::new(
        app_settings::DEFAULT_SCREEN_WIDTH,
        app_settings::DEFAULT_SCREEN_HEIGHT,
    )
}

/// On-disk form of a layout table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableFile {
    /// Screen whose profile is returned on a lookup miss
    #[serde(default = "default_screen")]
    pub default_screen: ScreenSize,

    /// One entry per device class per orientation
    pub profiles: Vec<ProfileSpec>,
}

/// Validates a parsed table file and builds the lookup table.
///
/// # Returns
///
/// The table plus every non-fatal warning, or a `ParseError::ValidationError`
/// listing every fatal issue.
pub fn validate_table(file: TableFile) -> Result<ParseResult<LayoutTable>, ParseError> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if file.profiles.is_empty() {
        errors.push(
            ValidationIssue::error("Table has no profiles", "profiles")
                .with_suggestion("Add at least the default screen's profile"),
        );
    }

    let profiles: Vec<LayoutProfile> = file.profiles.into_iter().map(LayoutProfile::new).collect();

    for (index, profile) in profiles.iter().enumerate() {
        for issue in profile.validate(&format!("profiles[{}]", index)) {
            if issue.is_error() {
                errors.push(issue);
            } else {
                warnings.push(issue);
            }
        }
    }

    if !errors.is_empty() {
        return Err(ParseError::validation_error(errors));
    }

    let table = LayoutTable::new(profiles, file.default_screen)?;
    Ok(ParseResult::with_warnings(table, warnings))
}

// ============================================================================
// Tests
// ============================================================================
