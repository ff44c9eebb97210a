//! Core of herald: request lifecycle tracking and error normalization.
//!
//! This crate holds the whole decision logic, independent of any HTTP stack:
//! - [`lifecycle`] - [`RequestState`] and the `to_*` patch constructors
//! - [`Executor`] - one transport call, routed to exactly one [`Commit`] callback
//! - [`Normalizer`] - picks a display message out of any failure value
//! - [`offset_to_page`] / [`to_server_query`] - grid offset/limit to API page/per-page
//! - [`Fetched`] - container for paginated listing results
//! - [`HttpClient`] - the transport seam, with [`Request`], [`Response`] and [`Error`]
//!
//! # Example
//!
//! ```ignore
//! use herald_core::prelude::*;
//!
//! let mut state = RequestState::default().merge(lifecycle::to_executed());
//! let mut failure = None;
//! let outcome = executor
//!     .get("todos", &query, commits(|_| {}, |f| failure = Some(f.to_value())))
//!     .await;
//! state = match (outcome, failure) {
//!     (Ok(response), _) => state.merge(lifecycle::to_success(response)),
//!     (Err(_), failure) => state.merge(lifecycle::to_error(failure.unwrap_or_default())),
//! };
//! // The fail-commit value has the layout the default (nested) strategy reads.
//! let message = Normalizer::new().render_message(state.error.as_ref(), RenderOptions::default());
//! ```

pub mod body;
mod client;
mod error;
pub mod executor;
pub mod lifecycle;
mod listing;
mod method;
pub mod normalizer;
mod pagination;
pub mod prelude;
mod request;
mod response;

pub use body::{from_json, is_truthy, to_json, to_query_string};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use executor::{
    Callbacks, Commit, EnvelopeMode, Executor, ExecutorConfig, ExecutorConfigBuilder, Failure,
    Rejection, commits,
};
pub use lifecycle::{RequestState, RequestStatus, StatePatch};
pub use listing::{Fetched, PageMeta, Pagination};
pub use method::Method;
pub use normalizer::{
    Normalizer, RenderOptions, StatusMessageTable, UNKNOWN_STATUS, UnwrapStrategy,
};
pub use pagination::{DataTableQuery, ServerQuery, offset_to_page, to_server_query};
pub use request::{Request, RequestBuilder};
pub use response::Response;
