//! Prelude module for convenient imports.
//!
//! ```ignore
//! use herald_core::prelude::*;
//! ```

pub use crate::{
    Commit, DataTableQuery, EnvelopeMode, Error, Executor, ExecutorConfig, Failure, Fetched,
    HttpClient, Method, Normalizer, RenderOptions, Rejection, RequestState, RequestStatus,
    Response, Result, StatusMessageTable, UnwrapStrategy, commits, lifecycle, offset_to_page,
    to_server_query,
};
