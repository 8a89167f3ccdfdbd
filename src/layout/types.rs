// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for key caps, actions, and table/config loading errors.
//!
//! This module defines the key identity model consumed by the interaction
//! engine and the error, warning, and result types shared by every JSON
//! loader in the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Error Handling Types
// ============================================================================

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal error that prevents the table or config from being used
    Error,
    /// Non-fatal issue that should be addressed
    Warning,
}

/// A validation issue discovered while loading a table or config.
///
/// Contains the severity, the offending field, and an optional suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Severity level (Error or Warning)
    pub severity: Severity,
    /// Human-readable description of the issue
    pub message: String,
    /// Path to the field that caused the issue (e.g., "profiles[3].key_height")
    pub field_path: String,
    /// Optional suggestion for how to fix the issue
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Creates a new validation issue.
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        field_path: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            field_path: field_path.into(),
            suggestion: None,
        }
    }

    /// Creates an error-level issue.
    pub fn error(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self::new(Severity::Error, message, field_path)
    }

    /// Creates a warning-level issue.
    pub fn warning(message: impl Into<String>, field_path: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message, field_path)
    }

    /// Adds a suggestion to the validation issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Returns `true` if this issue is fatal.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity_str = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };

        write!(f, "[{}] {}: {}", severity_str, self.field_path, self.message)?;

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {}", suggestion)?;
        }

        Ok(())
    }
}

/// Error type for table and config loading.
///
/// Wraps the different failure sources with file path, line number and
/// suggestion context for helpful messages.
#[derive(Debug)]
pub enum ParseError {
    /// I/O error occurred while reading a file
    IoError {
        /// The underlying I/O error
        source: std::io::Error,
        /// Optional file path that caused the error
        file_path: Option<String>,
        /// Optional suggestion for fixing the error
        suggestion: Option<String>,
    },

    /// JSON parsing error
    JsonError {
        /// The underlying JSON parsing error
        source: serde_json::Error,
        /// Optional file path being parsed
        file_path: Option<String>,
        /// Line number where the error occurred (from serde_json)
        line_number: Option<usize>,
        /// Optional suggestion for fixing the error
        suggestion: Option<String>,
    },

    /// Validation errors found after parsing
    ValidationError {
        /// List of validation issues found
        issues: Vec<ValidationIssue>,
        /// Optional file path being validated
        file_path: Option<String>,
    },
}

impl ParseError {
    /// Creates an I/O error with file path.
    pub fn io_error_with_path(source: std::io::Error, file_path: impl Into<String>) -> Self {
        Self::IoError {
            source,
            file_path: Some(file_path.into()),
            suggestion: Some("Check that the file exists and you have read permissions".into()),
        }
    }

    /// Creates a JSON parsing error with context.
    pub fn json_error(source: serde_json::Error) -> Self {
        let line_number = Some(source.line());
        Self::JsonError {
            source,
            file_path: None,
            line_number,
            suggestion: Some("Check the JSON syntax at the indicated line".into()),
        }
    }

    /// Creates a JSON parsing error with file path.
    pub fn json_error_with_path(source: serde_json::Error, file_path: impl Into<String>) -> Self {
        let line_number = Some(source.line());
        Self::JsonError {
            source,
            file_path: Some(file_path.into()),
            line_number,
            suggestion: Some("Check the JSON syntax at the indicated line".into()),
        }
    }

    /// Creates a validation error from a list of issues.
    pub fn validation_error(issues: Vec<ValidationIssue>) -> Self {
        Self::ValidationError {
            issues,
            file_path: None,
        }
    }

    /// Attaches a file path to a validation error that has none yet.
    pub fn with_file_path(self, path: &str) -> Self {
        match self {
            Self::ValidationError {
                issues,
                file_path: None,
            } => Self::ValidationError {
                issues,
                file_path: Some(path.to_string()),
            },
            other => other,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::IoError {
                source,
                file_path,
                suggestion,
            } => {
                write!(f, "I/O error")?;
                if let Some(path) = file_path {
                    write!(f, " reading file '{}'", path)?;
                }
                write!(f, ": {}", source)?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            ParseError::JsonError {
                source,
                file_path,
                line_number,
                suggestion,
            } => {
                write!(f, "JSON parsing error")?;
                if let Some(path) = file_path {
                    write!(f, " in file '{}'", path)?;
                }
                if let Some(line) = line_number {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", source)?;
                if let Some(hint) = suggestion {
                    write!(f, "\n  Suggestion: {}", hint)?;
                }
            }
            ParseError::ValidationError { issues, file_path } => {
                write!(f, "Validation failed")?;
                if let Some(path) = file_path {
                    write!(f, " for file '{}'", path)?;
                }
                writeln!(f, " with {} issue(s):", issues.len())?;
                for (i, issue) in issues.iter().enumerate() {
                    write!(f, "  {}. {}", i + 1, issue)?;
                    if i + 1 < issues.len() {
                        writeln!(f)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::IoError { source, .. } => Some(source),
            ParseError::JsonError { source, .. } => Some(source),
            ParseError::ValidationError { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::json_error(err)
    }
}

// ============================================================================
// ParseResult Type
// ============================================================================

/// Result of a successful load with optional non-fatal warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    /// The successfully loaded value
    pub value: T,
    /// Non-fatal validation warnings
    pub warnings: Vec<ValidationIssue>,
}

impl<T> ParseResult<T> {
    /// Creates a new parse result with no warnings.
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    /// Creates a new parse result with warnings.
    pub fn with_warnings(value: T, warnings: Vec<ValidationIssue>) -> Self {
        Self { value, warnings }
    }

    /// Returns true if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Returns the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Consumes the result and returns the value, discarding warnings.
    pub fn into_value(self) -> T {
        self.value
    }
}

// ============================================================================
// Key Identity Types
// ============================================================================

/// Keyboard types a key can switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardType {
    /// Letter layout
    Alphabetic,
    /// Digits layout
    Numeric,
    /// Punctuation and symbols layout
    Symbolic,
    /// Emoji picker
    Emojis,
}

/// Action committed when a key or a popup candidate is selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Insert a glyph (may be more than one code point, e.g. "ü" or "👍🏽")
    Character(String),
    /// Switch the active keyboard type
    KeyboardType(KeyboardType),
    /// Delete backwards
    Backspace,
    /// Insert a space
    Space,
    /// Insert a line break
    Newline,
    /// Toggle shift
    Shift,
    /// Switch to the next system keyboard
    NextKeyboard,
}

impl KeyAction {
    /// Creates a character action.
    pub fn character(glyph: impl Into<String>) -> Self {
        Self::Character(glyph.into())
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAction::Character(glyph) => write!(f, "'{}'", glyph),
            KeyAction::KeyboardType(kind) => write!(f, "KeyboardType({:?})", kind),
            KeyAction::Backspace => write!(f, "Backspace"),
            KeyAction::Space => write!(f, "Space"),
            KeyAction::Newline => write!(f, "Newline"),
            KeyAction::Shift => write!(f, "Shift"),
            KeyAction::NextKeyboard => write!(f, "NextKeyboard"),
        }
    }
}

/// How a key cap is drawn by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCapDisplay {
    /// A text label
    Text(String),
    /// A named icon
    Icon(String),
}

impl Default for KeyCapDisplay {
    fn default() -> Self {
        KeyCapDisplay::Text(String::new())
    }
}

/// Identity of one key: its primary action, long-press variants, and display form.
///
/// Equality compares only the primary action. Two caps that draw differently
/// but commit the same action are the same key cap.
///
/// # Popup Behavior
///
/// - `has_popup: false`: the key never arms a popup.
/// - `has_popup: true`: a tap previews the cap itself; a long press offers
///   `children` in presentation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyCap {
    /// Action committed when the key is tapped
    pub action: KeyAction,

    /// Variants offered on long press, left to right
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<KeyCap>,

    /// Display form
    #[serde(default)]
    pub display: KeyCapDisplay,

    /// Whether this key may show a popup at all
    #[serde(default)]
    pub has_popup: bool,
}

impl KeyCap {
    /// Creates a key cap without variants or popup.
    pub fn new(action: KeyAction) -> Self {
        let display = match &action {
            KeyAction::Character(glyph) => KeyCapDisplay::Text(glyph.clone()),
            KeyAction::KeyboardType(KeyboardType::Alphabetic) => KeyCapDisplay::Text("ABC".into()),
            KeyAction::KeyboardType(KeyboardType::Numeric) => KeyCapDisplay::Text("123".into()),
            KeyAction::KeyboardType(KeyboardType::Symbolic) => KeyCapDisplay::Text("#+=".into()),
            KeyAction::KeyboardType(KeyboardType::Emojis) => KeyCapDisplay::Icon("face-smile".into()),
            KeyAction::Backspace => KeyCapDisplay::Icon("backspace".into()),
            KeyAction::Space => KeyCapDisplay::Text("space".into()),
            KeyAction::Newline => KeyCapDisplay::Icon("return".into()),
            KeyAction::Shift => KeyCapDisplay::Icon("shift".into()),
            KeyAction::NextKeyboard => KeyCapDisplay::Icon("globe".into()),
        };
        Self {
            action,
            children: Vec::new(),
            display,
            has_popup: false,
        }
    }

    /// Creates a character key cap that previews itself on tap.
    pub fn character(glyph: impl Into<String>) -> Self {
        Self::new(KeyAction::character(glyph)).with_popup(true)
    }

    /// Creates a keyboard-type switching key cap.
    pub fn keyboard_type(kind: KeyboardType) -> Self {
        Self::new(KeyAction::KeyboardType(kind))
    }

    /// Sets the long-press variants.
    pub fn with_children(mut self, children: Vec<KeyCap>) -> Self {
        self.children = children;
        self
    }

    /// Sets the popup capability flag.
    pub fn with_popup(mut self, has_popup: bool) -> Self {
        self.has_popup = has_popup;
        self
    }

    /// Sets the display form.
    pub fn with_display(mut self, display: KeyCapDisplay) -> Self {
        self.display = display;
        self
    }

    /// Returns `true` if a tap on this cap must not arm a popup.
    ///
    /// The emoji keyboard key offers its options on long press only.
    pub fn is_tap_popup_excluded(&self) -> bool {
        self.action == KeyAction::KeyboardType(KeyboardType::Emojis)
    }

    /// Returns the candidates a popup offers for the given gesture.
    pub fn popup_candidates(&self, is_long_press: bool) -> Vec<KeyCap> {
        if is_long_press {
            self.children.clone()
        } else {
            vec![self.clone()]
        }
    }
}

impl PartialEq for KeyCap {
    fn eq(&self, other: &Self) -> bool {
        self.action == other.action
    }
}

impl Eq for KeyCap {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Test 1: JSON parse error includes line number and path
    #[test]
    fn test_json_error_includes_line_number() {
        let invalid_json = r#"{
  "edge_clamp": "symmetric",
  "fallback":
}"#;

        let result: Result<serde_json::Value, _> = serde_json::from_str(invalid_json);
        let json_err = result.unwrap_err();

        let parse_err = ParseError::json_error_with_path(json_err, "engine.json");

        let display_str = format!("{}", parse_err);
        assert!(display_str.contains("line"), "Error message should include line number");
        assert!(display_str.contains("engine.json"), "Error message should include file path");
        assert!(display_str.contains("Suggestion"), "Error message should include suggestion");
    }

    /// Test 2: Validation issue display format
    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue::warning("Row gap is negative", "profiles[2].key_height")
            .with_suggestion("Reduce key_height or enlarge keyboard_height");

        assert!(!issue.is_error());
        let display_str = format!("{}", issue);
        assert!(display_str.contains("WARNING"));
        assert!(display_str.contains("profiles[2].key_height"));
        assert!(display_str.contains("Suggestion: Reduce key_height"));
    }

    /// Test 3: Validation error lists every issue and the attached path
    #[test]
    fn test_validation_error_display() {
        let err = ParseError::validation_error(vec![
            ValidationIssue::error("Duplicate screen size 375x812", "profiles[1]"),
            ValidationIssue::error("Key width must be positive", "profiles[4]"),
        ])
        .with_file_path("table.json");

        let display_str = format!("{}", err);
        assert!(display_str.contains("Validation failed for file 'table.json'"));
        assert!(display_str.contains("2 issue(s)"));
        assert!(display_str.contains("1. [ERROR] profiles[1]"));
        assert!(display_str.contains("2. [ERROR] profiles[4]"));
    }

    /// Test 4: I/O error exposes its source
    #[test]
    fn test_io_error_with_context() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let parse_err = ParseError::io_error_with_path(io_err, "/path/to/table.json");

        let display_str = format!("{}", parse_err);
        assert!(display_str.contains("I/O error"));
        assert!(display_str.contains("/path/to/table.json"));
        assert!(parse_err.source().is_some());
    }

    /// Test 5: ParseResult with and without warnings
    #[test]
    fn test_parse_result_warnings() {
        let result = ParseResult::with_warnings(
            "table",
            vec![ValidationIssue::warning("Row gap is negative", "profiles[0]")],
        );
        assert!(result.has_warnings());
        assert_eq!(result.warning_count(), 1);

        let clean = ParseResult::new("table");
        assert!(!clean.has_warnings());
        assert_eq!(clean.into_value(), "table");
    }

    /// Test 6: Key cap equality ignores display state
    #[test]
    fn test_key_cap_equality_by_action() {
        let plain = KeyCap::character("a");
        let decorated = KeyCap::character("a")
            .with_display(KeyCapDisplay::Text("A".to_string()))
            .with_children(vec![KeyCap::character("á")])
            .with_popup(false);

        assert_eq!(plain, decorated, "Caps with the same action should be equal");
        assert_ne!(plain, KeyCap::character("b"));
    }

    /// Test 7: Popup candidates depend on the gesture
    #[test]
    fn test_popup_candidates() {
        let key = KeyCap::character("e").with_children(vec![
            KeyCap::character("è"),
            KeyCap::character("é"),
            KeyCap::character("ê"),
        ]);

        let tap = key.popup_candidates(false);
        assert_eq!(tap.len(), 1);
        assert_eq!(tap[0], key);

        let long_press = key.popup_candidates(true);
        assert_eq!(long_press.len(), 3);
        assert_eq!(long_press[1].action, KeyAction::character("é"));
    }

    /// Test 8: Only the emoji keyboard key is excluded from tap popups
    #[test]
    fn test_tap_popup_exclusion() {
        assert!(KeyCap::keyboard_type(KeyboardType::Emojis).is_tap_popup_excluded());
        assert!(!KeyCap::keyboard_type(KeyboardType::Numeric).is_tap_popup_excluded());
        assert!(!KeyCap::character("a").is_tap_popup_excluded());
    }

    /// Test 9: Key cap JSON deserialization with defaults
    #[test]
    fn test_key_cap_json_deserialization() {
        let json = r#"{
            "action": {"character": "u"},
            "has_popup": true,
            "children": [
                {"action": {"character": "ü"}},
                {"action": {"character": "ú"}}
            ]
        }"#;
        let key: KeyCap = serde_json::from_str(json).expect("Should parse key cap");
        assert!(key.has_popup);
        assert_eq!(key.children.len(), 2);
        assert!(!key.children[0].has_popup, "has_popup should default to false");
        assert_eq!(key.children[0].display, KeyCapDisplay::default());

        let switch: KeyCap =
            serde_json::from_str(r#"{"action": {"keyboard_type": "emojis"}}"#).expect("Should parse");
        assert!(switch.is_tap_popup_excluded());

        let backspace: KeyCap =
            serde_json::from_str(r#"{"action": "backspace"}"#).expect("Should parse unit action");
        assert_eq!(backspace.action, KeyAction::Backspace);
    }

    /// Test 10: KeyAction Display implementation
    #[test]
    fn test_key_action_display() {
        assert_eq!(format!("{}", KeyAction::character("x")), "'x'");
        assert_eq!(format!("{}", KeyAction::Backspace), "Backspace");
        assert!(format!("{}", KeyAction::KeyboardType(KeyboardType::Emojis)).contains("Emojis"));
    }
}
