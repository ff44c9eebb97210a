//! Transport error type for herald.
//!
//! [`Error`] is what an [`HttpClient`](crate::HttpClient) rejects with. It is
//! also the *raw* error a failed [`execute`](crate::Executor::execute) call
//! rejects with, while the fail commit receives a wrapper around it.

use bytes::Bytes;
use derive_more::{Display, Error, From};
use serde_json::{Value, json};

/// Main error type for herald transport operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// HTTP-level errors (non-2xx status codes).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if available.
        #[error(not(source))]
        body: Option<Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "meta.current_page").
        path: String,
        /// Error message.
        message: String,
    },

    /// Query string serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an HTTP error from status code and message.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns the HTTP status code if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// The error's own message, without the category prefix.
    ///
    /// Returns `None` when the error carries an empty message, so callers can
    /// substitute a default.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let message = match self {
            Self::Http { message, .. }
            | Self::Connection(message)
            | Self::Tls(message)
            | Self::InvalidRequest(message) => message.clone(),
            other => other.to_string(),
        };
        (!message.is_empty()).then_some(message)
    }

    /// JSON view of this error, as probed by the [`Normalizer`](crate::Normalizer).
    ///
    /// The shape is `{"message": ..., "response": {"status": ..., "data": ...}}`;
    /// `response` is only present for [`Error::Http`], and `message` only when
    /// [`Error::message`] is non-empty.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut value = json!({});
        if let Some(message) = self.message() {
            value["message"] = Value::String(message);
        }
        if let Self::Http { status, body, .. } = self {
            let data = body
                .as_ref()
                .map_or(Value::Null, |body| crate::body::decode_data(body));
            value["response"] = json!({ "status": status, "data": data });
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;

    use super::*;

    #[test]
    fn error_display() {
        let err = Error::http(404, "Not Found");
        assert_eq!(err.to_string(), "HTTP error 404: Not Found");

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::json_deserialization("meta.total", "invalid type");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'meta.total': invalid type"
        );
    }

    #[test]
    fn error_status() {
        let err = Error::http(422, "Unprocessable Entity");
        check!(err.status() == Some(422));
        check!(err.is_client_error());
        check!(!err.is_server_error());

        let err = Error::http(500, "Internal Server Error");
        check!(err.is_server_error());

        let err = Error::connection("Network Error");
        check!(err.status() == None);
        check!(err.is_connection());
        check!(!err.is_timeout());
    }

    #[test]
    fn message_strips_the_category_prefix() {
        check!(Error::connection("Network Error").message() == Some("Network Error".to_string()));
        check!(Error::Timeout.message() == Some("request timeout".to_string()));
        check!(Error::connection("").message() == None);
    }

    #[test]
    fn to_value_without_response() {
        let value = Error::connection("Network Error").to_value();
        assert_eq!(value, json!({ "message": "Network Error" }));
    }

    #[test]
    fn to_value_with_json_body() {
        let body = Bytes::from(r#"{"message":"name is required"}"#);
        let value = Error::http_with_body(422, "Unprocessable Entity", body).to_value();

        assert_eq!(
            value,
            json!({
                "message": "Unprocessable Entity",
                "response": { "status": 422, "data": { "message": "name is required" } }
            })
        );
    }

    #[test]
    fn to_value_with_empty_message() {
        let value = Error::http(500, "").to_value();
        assert_eq!(value, json!({ "response": { "status": 500, "data": null } }));
    }
}
