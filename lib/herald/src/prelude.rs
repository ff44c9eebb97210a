//! Prelude module for convenient imports.
//!
//! ```ignore
//! use herald::prelude::*;
//! ```

pub use crate::{
    ClientConfig, Commit, DataTableQuery, EnvelopeMode, Error, Executor, ExecutorConfig, Failure,
    Fetched, HttpClient, HyperClient, Method, Normalizer, Rejection, RenderOptions, RequestState,
    RequestStatus, Response, Result, StatusMessageTable, UnwrapStrategy, commits, lifecycle,
    offset_to_page, to_server_query,
};
pub use serde::{Deserialize, Serialize};
pub use serde_json::{Value, json};
