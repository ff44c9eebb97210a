//! Request lifecycle tracking.
//!
//! A caller keeps one [`RequestState`] per request site and moves it through
//! `None → Executed → Completed → None` by merging the [`StatePatch`] values
//! produced here. The constructors are unconditional: they never look at the
//! payload and never check the current status, ordering is the caller's job.
//!
//! ```
//! use herald_core::lifecycle::{self, RequestState, RequestStatus};
//!
//! let state: RequestState<&str, &str> = RequestState::default();
//! let state = state.merge(lifecycle::to_executed());
//! assert_eq!(state.status, RequestStatus::Executed);
//!
//! let state = state.merge(lifecycle::to_success("done"));
//! assert_eq!(state.status, RequestStatus::Completed);
//! assert_eq!(state.success, Some("done"));
//! assert_eq!(state.error, None);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Response;

/// Where a request site is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Idle, nothing issued yet (or reset).
    #[default]
    None,
    /// In flight.
    Executed,
    /// Settled; either `success` or `error` is populated.
    Completed,
}

impl RequestStatus {
    /// Numeric code: 0, 1 or 2.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Executed => 1,
            Self::Completed => 2,
        }
    }
}

/// Caller-owned lifecycle record for a single request site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestState<T = Response<Value>, E = Value> {
    /// Current lifecycle status.
    pub status: RequestStatus,
    /// Failure payload once completed with an error.
    pub error: Option<E>,
    /// Success payload once completed successfully.
    pub success: Option<T>,
}

impl<T, E> Default for RequestState<T, E> {
    fn default() -> Self {
        Self {
            status: RequestStatus::None,
            error: None,
            success: None,
        }
    }
}

impl<T, E> RequestState<T, E> {
    /// Apply a patch, returning the merged state.
    ///
    /// Fields the patch leaves untouched keep their current value.
    #[must_use]
    pub fn merge(self, patch: StatePatch<T, E>) -> Self {
        Self {
            status: patch.status,
            error: patch.error.unwrap_or(self.error),
            success: patch.success.unwrap_or(self.success),
        }
    }

    /// `true` while a request is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Executed
    }

    /// `true` once settled with a success payload.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RequestStatus::Completed && self.success.is_some()
    }

    /// `true` once settled with an error payload.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status == RequestStatus::Completed && self.error.is_some()
    }
}

/// Initial lifecycle record: idle, no payloads.
#[must_use]
pub fn request_schema<T, E>() -> RequestState<T, E> {
    RequestState::default()
}

/// Replacement field-set for a [`RequestState`].
///
/// `None` in `error` / `success` means "leave the field as it is";
/// `Some(None)` clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatePatch<T = Response<Value>, E = Value> {
    status: RequestStatus,
    error: Option<Option<E>>,
    success: Option<Option<T>>,
}

impl<T, E> StatePatch<T, E> {
    /// Target status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Error field replacement, if the patch touches it.
    #[must_use]
    pub const fn error(&self) -> Option<&Option<E>> {
        self.error.as_ref()
    }

    /// Success field replacement, if the patch touches it.
    #[must_use]
    pub const fn success(&self) -> Option<&Option<T>> {
        self.success.as_ref()
    }
}

/// `{status: Executed, success: null, error: null}`.
#[must_use]
pub fn to_executed<T, E>() -> StatePatch<T, E> {
    StatePatch {
        status: RequestStatus::Executed,
        error: Some(None),
        success: Some(None),
    }
}

/// `{status: Completed, success: result}`.
#[must_use]
pub fn to_success<T, E>(result: T) -> StatePatch<T, E> {
    StatePatch {
        status: RequestStatus::Completed,
        error: None,
        success: Some(Some(result)),
    }
}

/// `{status: Completed, error: err}`.
#[must_use]
pub fn to_error<T, E>(err: E) -> StatePatch<T, E> {
    StatePatch {
        status: RequestStatus::Completed,
        error: Some(Some(err)),
        success: None,
    }
}

/// `{status: None}`.
#[must_use]
pub fn to_reset<T, E>() -> StatePatch<T, E> {
    StatePatch {
        status: RequestStatus::None,
        error: None,
        success: None,
    }
}
