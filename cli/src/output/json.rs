//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, and a pretty printer for successful results.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::domain::{ProvisionError, SettingsError, TargetError};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any serializable result.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_value<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("JSON serialization failed")
}

/// Stable `code` for a failed command: the `ProvisionError` kind when there
/// is one anywhere in the chain, otherwise a coarse category.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ProvisionError>() {
            return e.code();
        }
        if cause.is::<TargetError>() {
            return "invalid_target";
        }
        if cause.is::<SettingsError>() {
            return "invalid_settings";
        }
    }
    "internal"
}
