// SPDX-License-Identifier: GPL-3.0-only

//! Loading layout tables from JSON files and strings.

use std::fs;

use crate::layout::table::LayoutTable;
use crate::layout::types::{ParseError, ParseResult};
use crate::layout::validation::{validate_table, TableFile};

/// Parses a layout table from a JSON file.
///
/// Distinguishes I/O errors (missing file, permissions) from JSON errors
/// (syntax, unknown or missing fields) and validation errors.
///
/// # Example
///
/// ```rust,ignore
/// use keypopup::layout::parse_layout_table_file;
///
/// match parse_layout_table_file("profiles.json") {
///     Ok(result) => {
///         for warning in &result.warnings {
///             eprintln!("{}", warning);
///         }
///         let table = result.value;
///     }
///     Err(e) => eprintln!("Failed to load layout table: {}", e),
/// }
/// ```
pub fn parse_layout_table_file(path: &str) -> Result<ParseResult<LayoutTable>, ParseError> {
    let json_str = fs::read_to_string(path).map_err(|e| ParseError::io_error_with_path(e, path))?;

    let file: TableFile =
        serde_json::from_str(&json_str).map_err(|e| ParseError::json_error_with_path(e, path))?;

    validate_table(file).map_err(|e| e.with_file_path(path))
}

/// Parses a layout table from a JSON string.
pub fn parse_layout_table_from_string(json: &str) -> Result<ParseResult<LayoutTable>, ParseError> {
    let file: TableFile = serde_json::from_str(json)?;
    validate_table(file)
}

// ============================================================================
// Tests
// ============================================================================
