//! HTTP transport trait.
//!
//! The executor never talks to the network itself: it hands a [`Request`] to
//! an [`HttpClient`] and interprets what comes back. `herald::HyperClient` is
//! the stock implementation; tests plug in in-memory fakes.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP transport trait.
///
/// Implementations resolve with whatever the server answered, whatever its
/// status, and reject only when no response could be obtained (connection,
/// TLS, timeout). Status-based rejection is the executor's decision.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<T: HttpClient> HttpClient for Arc<T> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        (**self).execute(request)
    }
}
