//! This module defines logic to serialize/deserialize a planning snapshot from json input and
//! create and write a dispatch plan.

use serde::Serialize;
use std::fmt;

pub mod plan;
pub mod snapshot;

/// A format error.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FormatError {
    /// An error code in registry.
    pub code: String,
    /// A possible error cause.
    pub cause: String,
    /// An action to take in order to recover from error.
    pub action: String,
    /// A details about exception.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl FormatError {
    /// Creates a new instance of `FormatError` action without details.
    pub fn new(code: String, cause: String, action: String) -> Self {
        Self { code, cause, action, details: None }
    }

    /// Creates a new instance of `FormatError` action.
    pub fn new_with_details(code: String, cause: String, action: String, details: String) -> Self {
        Self { code, cause, action, details: Some(details) }
    }

    /// Serializes error into json string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_string())
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}, cause: '{}', action: '{}'.", self.code, self.cause, self.action)
    }
}

/// Keeps multiple format errors.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MultiFormatError {
    /// Inner errors.
    pub errors: Vec<FormatError>,
}

impl MultiFormatError {
    /// Formats multiple format errors into json string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.errors).unwrap_or_else(|_| self.to_string())
    }

    /// Returns codes of inner errors.
    pub fn codes(&self) -> Vec<&str> {
        self.errors.iter().map(|err| err.code.as_str()).collect()
    }
}

impl fmt::Display for MultiFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.errors.iter().map(|err| err.to_string()).collect::<Vec<_>>().join("\n"))
    }
}

impl std::error::Error for MultiFormatError {}

impl From<Vec<FormatError>> for MultiFormatError {
    fn from(errors: Vec<FormatError>) -> Self {
        MultiFormatError { errors }
    }
}

impl From<FormatError> for MultiFormatError {
    fn from(error: FormatError) -> Self {
        MultiFormatError { errors: vec![error] }
    }
}

impl IntoIterator for MultiFormatError {
    type Item = FormatError;
    type IntoIter = std::vec::IntoIter<FormatError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
