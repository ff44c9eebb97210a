//! Uniform request lifecycle and error messages for async HTTP calls.
//!
//! herald issues GET/POST/PUT/DELETE requests, reports each outcome through
//! exactly one commit callback, tracks it as a three-state lifecycle record
//! and turns any failure into one display message.
//!
//! # Example
//!
//! ```ignore
//! use herald::prelude::*;
//!
//! let executor = Executor::new(HyperClient::builder().with_logging().build())
//!     .with_base_url("https://api.example.com/")?;
//! let normalizer = Normalizer::new();
//!
//! let mut state = RequestState::default().merge(lifecycle::to_executed());
//! let query = to_server_query(DataTableQuery::new(20, 10));
//! let mut failure = None;
//! let outcome = executor
//!     .get("todos", &query, commits(|_| {}, |f| failure = Some(f.to_value())))
//!     .await;
//! match (outcome, failure) {
//!     (Ok(response), _) => state = state.merge(lifecycle::to_success(response)),
//!     (Err(_), failure) => {
//!         let error = failure.unwrap_or_default();
//!         eprintln!("{}", normalizer.render(&error));
//!         state = state.merge(lifecycle::to_error(error));
//!     }
//! }
//! ```
//!
//! The rejection itself has the raw error layout; render it with
//! `Normalizer::new().with_strategy(UnwrapStrategy::Direct)`.

mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;

pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use herald_core::{
    Callbacks, Commit, DataTableQuery, EnvelopeMode, Error, Executor, ExecutorConfig,
    ExecutorConfigBuilder, Failure, Fetched, HttpClient, Method, Normalizer, PageMeta, Pagination,
    Rejection, RenderOptions, Request, RequestBuilder, RequestState, RequestStatus, Response,
    Result, ServerQuery, StatePatch, StatusMessageTable, UNKNOWN_STATUS, UnwrapStrategy, commits,
    from_json, is_truthy, lifecycle, offset_to_page, to_json, to_query_string, to_server_query,
};

pub use url;
