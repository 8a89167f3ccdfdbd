// SPDX-License-Identifier: GPL-3.0-only

use std::fs;

use serde::{Deserialize, Serialize};

use crate::app_settings;
use crate::layout::profile::ScreenSize;
use crate::layout::table::{FallbackPolicy, LayoutTable};
use crate::layout::types::{ParseError, ParseResult, ValidationIssue};

/// Which container edges a popup is clamped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeClampPolicy {
    /// Clamp against both the left and the right edge.
    #[default]
    Symmetric,
    /// Clamp against the left edge only; a popup may overflow on the right.
    LeftOnly,
}

/// Engine settings, loaded once at startup.
///
/// Every field is optional in JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Edges a popup is clamped against.
    pub edge_clamp: EdgeClampPolicy,
    /// Profile returned when no profile matches a screen size.
    pub fallback: FallbackPolicy,
    /// Screen whose profile becomes the fallback default. When unset, the
    /// table keeps the default it was built or loaded with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_screen: Option<ScreenSize>,
    /// Distance from a container edge, in key widths, under which a popup
    /// expands away from that edge.
    pub edge_threshold_keys: f32,
    /// Padding around the popup's candidate cells, in points.
    pub popup_content_inset: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            edge_clamp: EdgeClampPolicy::default(),
            fallback: FallbackPolicy::default(),
            default_screen: None,
            edge_threshold_keys: 1.0,
            popup_content_inset: app_settings::POPUP_CONTENT_INSET,
        }
    }
}

impl EngineConfig {
    /// Loads the config from a JSON file.
    pub fn load(path: &str) -> Result<ParseResult<Self>, ParseError> {
        let json = fs::read_to_string(path).map_err(|e| ParseError::io_error_with_path(e, path))?;
        let config: Self =
            serde_json::from_str(&json).map_err(|e| ParseError::json_error_with_path(e, path))?;
        config.checked().map_err(|e| e.with_file_path(path))
    }

    /// Parses the config from a JSON string.
    pub fn from_json_str(json: &str) -> Result<ParseResult<Self>, ParseError> {
        let config: Self = serde_json::from_str(json)?;
        config.checked()
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if !(self.edge_threshold_keys >= 0.0) {
            issues.push(ValidationIssue::error(
                format!("edge_threshold_keys must not be negative, got {}", self.edge_threshold_keys),
                "edge_threshold_keys",
            ));
        } else if self.edge_threshold_keys == 0.0 {
            issues.push(
                ValidationIssue::warning(
                    "edge_threshold_keys is 0; popups never expand away from an edge",
                    "edge_threshold_keys",
                )
                .with_suggestion("Use 1.0 to treat the outermost key on each side as an edge key"),
            );
        }

        if !(self.popup_content_inset >= 0.0) {
            issues.push(ValidationIssue::error(
                format!("popup_content_inset must not be negative, got {}", self.popup_content_inset),
                "popup_content_inset",
            ));
        }

        if let Some(screen) = self
            .default_screen
            .filter(|screen| screen.width == 0 || screen.height == 0)
        {
            issues.push(ValidationIssue::error(
                format!("default_screen {} has a zero dimension", screen),
                "default_screen",
            ));
        }

        issues
    }

    /// Applies the fallback settings to a table.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `default_screen` is set and the table has
    /// no profile for it.
    pub fn apply_to(&self, table: LayoutTable) -> Result<LayoutTable, ParseError> {
        let table = match self.default_screen {
            Some(screen) => table.with_default_screen(screen)?,
            None => table,
        };
        Ok(table.with_fallback(self.fallback))
    }

    fn checked(self) -> Result<ParseResult<Self>, ParseError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(|issue| issue.is_error());

        if !errors.is_empty() {
            return Err(ParseError::validation_error(errors));
        }
        for warning in &warnings {
            tracing::warn!("Engine config: {}", warning);
        }
        Ok(ParseResult::with_warnings(self, warnings))
    }
}

// ============================================================================
// Tests
// ============================================================================
