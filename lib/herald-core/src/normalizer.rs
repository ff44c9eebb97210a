//! Error message normalization.
//!
//! Failures come in several shapes (the fail-commit wrapper, a raw transport
//! error, an application error payload). [`Normalizer::render_message`] picks a
//! single display string out of any of them, consulting in order:
//!
//! 1. the server message inside the error's response body,
//! 2. the [`StatusMessageTable`] entry for the resolved status code,
//! 3. the error's generic `message`,
//! 4. [`FALLBACK_MESSAGE`].
//!
//! Every probe is an optional lookup; a missing or mistyped field moves on to
//! the next tier.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

/// Status code used when no HTTP status can be resolved from an error.
pub const UNKNOWN_STATUS: u16 = 999;

/// Status code of a field-validation failure.
pub const UNPROCESSABLE_ENTITY: u16 = 422;

/// Last-resort message.
pub const FALLBACK_MESSAGE: &str = "An error occurred";

// ============================================================================
// Status table
// ============================================================================

/// Static mapping from HTTP status code to display message.
///
/// Deserializes from a JSON object keyed by status-code strings:
///
/// ```
/// use herald_core::StatusMessageTable;
///
/// let table: StatusMessageTable =
///     serde_json::from_str(r#"{"404": "Nothing here", "999": "Offline?"}"#).unwrap();
/// assert_eq!(table.get(404), Some("Nothing here"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusMessageTable {
    entries: HashMap<u16, String>,
}

impl Default for StatusMessageTable {
    fn default() -> Self {
        [
            (400, "The server cannot or will not process the request"),
            (401, "Your login credentials have expired, please sign in again"),
            (403, "You do not have permission to perform this action"),
            (404, "The requested resource does not exist"),
            (405, "The request method is not supported for this resource"),
            (408, "The request timed out"),
            (419, "Your session has expired, please refresh the page"),
            (422, "Some fields failed validation"),
            (500, "A system error occurred, please contact the administrator"),
            (UNKNOWN_STATUS, "A client-side problem occurred"),
        ]
        .into_iter()
        .collect()
    }
}

impl StatusMessageTable {
    /// A table with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Message for a status code.
    #[must_use]
    pub fn get(&self, status: u16) -> Option<&str> {
        self.entries.get(&status).map(String::as_str)
    }

    /// Add or replace an entry.
    #[must_use]
    pub fn with(mut self, status: u16, message: impl Into<String>) -> Self {
        self.insert(status, message);
        self
    }

    /// Add or replace an entry in place.
    pub fn insert(&mut self, status: u16, message: impl Into<String>) -> Option<String> {
        self.entries.insert(status, message.into())
    }

    /// Drop an entry.
    pub fn remove(&mut self, status: u16) -> Option<String> {
        self.entries.remove(&status)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(u16, S)> for StatusMessageTable {
    fn from_iter<I: IntoIterator<Item = (u16, S)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(status, message)| (status, message.into()))
                .collect(),
        }
    }
}

impl<S: Into<String>> Extend<(u16, S)> for StatusMessageTable {
    fn extend<I: IntoIterator<Item = (u16, S)>>(&mut self, iter: I) {
        self.entries.extend(
            iter.into_iter()
                .map(|(status, message)| (status, message.into())),
        );
    }
}

// ============================================================================
// Strategy & options
// ============================================================================

/// Where the normalizer looks for the error's response.
///
/// The two layouts classify different values as "having a response", so they
/// are kept apart rather than tried one after the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnwrapStrategy {
    /// Fail-commit wrapper layout: `{"data": {"message", "error": {"response"}}}`.
    #[default]
    Nested,
    /// Raw error layout: `{"message", "response": {"status", "data"}}`.
    Direct,
}

impl UnwrapStrategy {
    const fn response_pointer(self) -> &'static str {
        match self {
            Self::Nested => "/data/error/response",
            Self::Direct => "/response",
        }
    }

    const fn message_pointer(self) -> &'static str {
        match self {
            Self::Nested => "/data/message",
            Self::Direct => "/message",
        }
    }
}

/// Per-call rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    /// Skip the status table so the error's own message wins over it.
    pub force_origin_message: bool,
}

impl RenderOptions {
    /// Options that skip the status table.
    #[must_use]
    pub const fn force_origin_message() -> Self {
        Self {
            force_origin_message: true,
        }
    }
}

// ============================================================================
// Normalizer
// ============================================================================

/// Turns opaque error values into display messages.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    table: StatusMessageTable,
    strategy: UnwrapStrategy,
}

impl Normalizer {
    /// A normalizer with the default table and [`UnwrapStrategy::Nested`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the status table.
    #[must_use]
    pub fn with_table(mut self, table: StatusMessageTable) -> Self {
        self.table = table;
        self
    }

    /// Replace the unwrap strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: UnwrapStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The status table in use.
    #[must_use]
    pub const fn table(&self) -> &StatusMessageTable {
        &self.table
    }

    /// The unwrap strategy in use.
    #[must_use]
    pub const fn strategy(&self) -> UnwrapStrategy {
        self.strategy
    }

    /// Display message for `error`, or `None` when there is no error.
    #[must_use]
    pub fn render_message(&self, error: Option<&Value>, options: RenderOptions) -> Option<String> {
        let error = error.filter(|error| !error.is_null())?;

        if let Some(message) = self.server_message(error) {
            trace!("rendering server message");
            return Some(message.to_string());
        }

        if !options.force_origin_message {
            let status = self.resolve_status_code(error);
            if let Some(message) = self.table.get(status).filter(|m| !m.is_empty()) {
                trace!(status, "rendering status table message");
                return Some(message.to_string());
            }
        }

        if let Some(message) = self.generic_message(error) {
            trace!("rendering generic message");
            return Some(message.to_string());
        }

        Some(FALLBACK_MESSAGE.to_string())
    }

    /// [`render_message`](Self::render_message) with default options.
    #[must_use]
    pub fn render(&self, error: &Value) -> String {
        self.render_message(Some(error), RenderOptions::default())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
    }

    /// The error's response object, if the strategy finds one.
    #[must_use]
    pub fn response_of<'a>(&self, error: &'a Value) -> Option<&'a Value> {
        error
            .pointer(self.strategy.response_pointer())
            .filter(|response| !response.is_null())
    }

    /// `true` if the error carries a response.
    #[must_use]
    pub fn has_response(&self, error: &Value) -> bool {
        self.response_of(error).is_some()
    }

    /// The response status, or [`UNKNOWN_STATUS`] when none can be resolved.
    #[must_use]
    pub fn resolve_status_code(&self, error: &Value) -> u16 {
        self.response_of(error)
            .and_then(|response| response.get("status"))
            .and_then(Value::as_u64)
            .and_then(|status| u16::try_from(status).ok())
            .unwrap_or(UNKNOWN_STATUS)
    }

    /// `true` iff the resolved status is 422.
    #[must_use]
    pub fn is_unprocessable_entity(&self, error: &Value) -> bool {
        self.resolve_status_code(error) == UNPROCESSABLE_ENTITY
    }

    /// Non-empty `message` inside the response body.
    #[must_use]
    pub fn server_message<'a>(&self, error: &'a Value) -> Option<&'a str> {
        self.response_of(error)
            .and_then(|response| response.pointer("/data/message"))
            .and_then(non_empty_str)
    }

    /// Non-empty generic `message` on the error itself.
    #[must_use]
    pub fn generic_message<'a>(&self, error: &'a Value) -> Option<&'a str> {
        error
            .pointer(self.strategy.message_pointer())
            .and_then(non_empty_str)
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|text| !text.is_empty())
}
