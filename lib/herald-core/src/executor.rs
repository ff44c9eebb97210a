//! Request execution with commit callbacks.
//!
//! [`Executor::execute`] issues exactly one transport call and reports the
//! outcome twice: once through the caller's [`Commit`] (exactly one of
//! `succeed` / `fail`) and once through the returned `Result`, with
//! `Ok` iff `succeed` fired.
//!
//! # Example
//!
//! ```ignore
//! use herald_core::{Executor, Method, executor::commits};
//!
//! let executor = Executor::new(client).with_base_url("https://api.example.com/")?;
//! let result = executor
//!     .execute(
//!         Method::Get,
//!         "todos",
//!         &[("page", 1)],
//!         commits(
//!             |response| store.set_success(response.clone()),
//!             |failure| store.set_error(failure.to_value()),
//!         ),
//!     )
//!     .await;
//! ```

use bytes::Bytes;
use derive_more::{Display, Error};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{Instrument, debug, debug_span, warn};
use url::Url;

use crate::{HttpClient, Method, Request, Response, Result, to_query_string};

/// Commit message used when a transport error carries no message of its own.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Whoops! An error occurred!";

// ============================================================================
// Configuration
// ============================================================================

/// How an application-level failure (a 2xx body with a truthy `error`) is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EnvelopeMode {
    /// Commit and reject with the whole response.
    #[default]
    Envelope,
    /// Commit and reject with the body's `error` member only.
    Exception,
}

/// Configuration for the [`Executor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Reporting of application-level failures.
    pub envelope: EnvelopeMode,
    /// Treat non-2xx responses as transport rejections.
    pub reject_error_status: bool,
    /// Fail-commit message for transport errors without a message.
    pub default_failure_message: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            envelope: EnvelopeMode::default(),
            reject_error_status: true,
            default_failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl ExecutorConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> ExecutorConfigBuilder {
        ExecutorConfigBuilder::default()
    }
}

/// Builder for [`ExecutorConfig`].
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfigBuilder {
    envelope: Option<EnvelopeMode>,
    reject_error_status: Option<bool>,
    default_failure_message: Option<String>,
}

impl ExecutorConfigBuilder {
    /// Set the application-failure reporting mode.
    #[must_use]
    pub const fn envelope(mut self, mode: EnvelopeMode) -> Self {
        self.envelope = Some(mode);
        self
    }

    /// Set whether non-2xx responses are rejected.
    #[must_use]
    pub const fn reject_error_status(mut self, reject: bool) -> Self {
        self.reject_error_status = Some(reject);
        self
    }

    /// Set the default fail-commit message.
    #[must_use]
    pub fn default_failure_message(mut self, message: impl Into<String>) -> Self {
        self.default_failure_message = Some(message.into());
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ExecutorConfig {
        let defaults = ExecutorConfig::default();
        ExecutorConfig {
            envelope: self.envelope.unwrap_or(defaults.envelope),
            reject_error_status: self
                .reject_error_status
                .unwrap_or(defaults.reject_error_status),
            default_failure_message: self
                .default_failure_message
                .unwrap_or(defaults.default_failure_message),
        }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// What the fail commit receives.
#[derive(Debug, Clone, Copy)]
pub enum Failure<'a> {
    /// Application failure, [`EnvelopeMode::Envelope`]: the whole response.
    Envelope(&'a Response<Value>),
    /// Application failure, [`EnvelopeMode::Exception`]: the body's `error` member.
    Application(&'a Value),
    /// Transport failure wrapper around the raw error.
    Transport {
        /// The error's message, or the configured default.
        message: &'a str,
        /// The raw error, which is also what the call rejects with.
        error: &'a crate::Error,
    },
}

impl Failure<'_> {
    /// Owned JSON view, suitable for a [`RequestState`](crate::RequestState)
    /// and for [`UnwrapStrategy::Nested`](crate::UnwrapStrategy::Nested).
    ///
    /// Transport and envelope failures become `{"data": {"message": ..., "error": <raw error>}}`,
    /// an envelope's raw error being [`Response::to_error_value`].
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Envelope(response) => json!({
                "data": { "message": response.message(), "error": response.to_error_value() }
            }),
            Self::Application(error) => (*error).clone(),
            Self::Transport { message, error } => json!({
                "data": { "message": message, "error": error.to_value() }
            }),
        }
    }
}

/// What a failed [`Executor::execute`] call returns.
#[derive(Debug, Display, Error)]
pub enum Rejection {
    /// Application failure reported with the whole response.
    #[display("application error in {} response", _0.status())]
    Envelope(#[error(not(source))] Response<Value>),
    /// Application failure reported with the body's `error` member.
    #[display("application error: {_0}")]
    Application(#[error(not(source))] Value),
    /// The raw transport error.
    #[display("{_0}")]
    Transport(crate::Error),
}

impl Rejection {
    /// The transport error, if this is a transport rejection.
    #[must_use]
    pub const fn transport_error(&self) -> Option<&crate::Error> {
        match self {
            Self::Transport(error) => Some(error),
            _ => None,
        }
    }

    /// Owned JSON view, suitable for [`UnwrapStrategy::Direct`](crate::UnwrapStrategy::Direct).
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Envelope(response) => response.to_error_value(),
            Self::Application(error) => error.clone(),
            Self::Transport(error) => error.to_value(),
        }
    }
}

// ============================================================================
// Commit callbacks
// ============================================================================

/// Receiver of a request's outcome.
///
/// Both methods consume the commit, so at most one can run; the executor
/// always runs exactly one.
pub trait Commit {
    /// Called with the response when the request succeeded.
    fn succeed(self, response: &Response<Value>);

    /// Called when the request failed.
    fn fail(self, failure: &Failure<'_>);
}

/// A [`Commit`] made of two closures.
#[derive(Debug, Clone, Copy)]
pub struct Callbacks<S, F> {
    success: S,
    fail: F,
}

impl<S, F> Commit for Callbacks<S, F>
where
    S: FnOnce(&Response<Value>),
    F: FnOnce(&Failure<'_>),
{
    fn succeed(self, response: &Response<Value>) {
        (self.success)(response);
    }

    fn fail(self, failure: &Failure<'_>) {
        (self.fail)(failure);
    }
}

/// Pair a success commit with a fail commit.
pub const fn commits<S, F>(success: S, fail: F) -> Callbacks<S, F>
where
    S: FnOnce(&Response<Value>),
    F: FnOnce(&Failure<'_>),
{
    Callbacks { success, fail }
}

// ============================================================================
// Executor
// ============================================================================

/// Issues requests through an [`HttpClient`] and routes their outcome.
#[derive(Debug, Clone)]
pub struct Executor<C> {
    client: C,
    base_url: Option<Url>,
    config: ExecutorConfig,
}

impl<C> Executor<C> {
    /// Create an executor with the default configuration.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            base_url: None,
            config: ExecutorConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve relative request URLs against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(base_url.as_ref())?);
        Ok(self)
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// The underlying transport.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    fn resolve_url(&self, url: &str) -> Result<Url> {
        if url.is_empty() {
            return Err(crate::Error::invalid_request("empty URL"));
        }
        let resolved = match &self.base_url {
            Some(base) => base.join(url)?,
            None => Url::parse(url)?,
        };
        Ok(resolved)
    }

    fn build_request<P>(&self, method: Method, url: &str, params: &P) -> Result<Request<Bytes>>
    where
        P: Serialize + ?Sized,
    {
        let builder = Request::builder(method, self.resolve_url(url)?)
            .header("Accept", "application/json");

        let body = serde_json::to_value(params)?;
        if body.is_null() {
            return Ok(builder.build());
        }

        if method.sends_query() {
            Ok(builder.query_string(&to_query_string(params)?).build())
        } else {
            Ok(builder.json(&body)?.build())
        }
    }
}

impl<C: HttpClient> Executor<C> {
    /// Issue one request and report its outcome.
    ///
    /// `params` becomes the query string for GET and DELETE and the JSON body
    /// for POST and PUT; a value serializing to `null` sends nothing.
    ///
    /// Never panics and never fails outside the returned `Result`: even
    /// invalid URLs or params go through the fail commit.
    pub async fn execute<P, K>(
        &self,
        method: Method,
        url: &str,
        params: &P,
        commit: K,
    ) -> std::result::Result<Response<Value>, Rejection>
    where
        P: Serialize + ?Sized,
        K: Commit,
    {
        let span = debug_span!("herald.execute", %method, url);
        async move {
            let outcome = self.dispatch(method, url, params).await;
            self.settle(outcome, commit)
        }
        .instrument(span)
        .await
    }

    /// GET with `params` as query string.
    pub async fn get<P, K>(
        &self,
        url: &str,
        params: &P,
        commit: K,
    ) -> std::result::Result<Response<Value>, Rejection>
    where
        P: Serialize + ?Sized,
        K: Commit,
    {
        self.execute(Method::Get, url, params, commit).await
    }

    /// POST with `body` as JSON.
    pub async fn post<P, K>(
        &self,
        url: &str,
        body: &P,
        commit: K,
    ) -> std::result::Result<Response<Value>, Rejection>
    where
        P: Serialize + ?Sized,
        K: Commit,
    {
        self.execute(Method::Post, url, body, commit).await
    }

    /// PUT with `body` as JSON.
    pub async fn put<P, K>(
        &self,
        url: &str,
        body: &P,
        commit: K,
    ) -> std::result::Result<Response<Value>, Rejection>
    where
        P: Serialize + ?Sized,
        K: Commit,
    {
        self.execute(Method::Put, url, body, commit).await
    }

    /// DELETE with `params` as query string.
    pub async fn delete<P, K>(
        &self,
        url: &str,
        params: &P,
        commit: K,
    ) -> std::result::Result<Response<Value>, Rejection>
    where
        P: Serialize + ?Sized,
        K: Commit,
    {
        self.execute(Method::Delete, url, params, commit).await
    }

    async fn dispatch<P>(&self, method: Method, url: &str, params: &P) -> Result<Response<Value>>
    where
        P: Serialize + ?Sized,
    {
        let request = self.build_request(method, url, params)?;
        let response = self.client.execute(request).await?;

        if self.config.reject_error_status && !response.is_success() {
            let status = response.status();
            return Err(crate::Error::http_with_body(
                status,
                format!("Request failed with status code {status}"),
                response.into_body(),
            ));
        }

        Ok(response.into_data())
    }

    fn settle<K: Commit>(
        &self,
        outcome: Result<Response<Value>>,
        commit: K,
    ) -> std::result::Result<Response<Value>, Rejection> {
        let response = match outcome {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "request failed");
                let message = error
                    .message()
                    .unwrap_or_else(|| self.config.default_failure_message.clone());
                commit.fail(&Failure::Transport {
                    message: &message,
                    error: &error,
                });
                return Err(Rejection::Transport(error));
            }
        };

        if response.error_flag().is_none() {
            debug!(status = response.status(), "request succeeded");
            commit.succeed(&response);
            return Ok(response);
        }

        warn!(status = response.status(), "response flagged as application error");
        match self.config.envelope {
            EnvelopeMode::Envelope => {
                commit.fail(&Failure::Envelope(&response));
                Err(Rejection::Envelope(response))
            }
            EnvelopeMode::Exception => {
                let error = match response.into_body() {
                    Value::Object(mut body) => body.remove("error").unwrap_or_default(),
                    _ => Value::Null,
                };
                commit.fail(&Failure::Application(&error));
                Err(Rejection::Application(error))
            }
        }
    }
}
