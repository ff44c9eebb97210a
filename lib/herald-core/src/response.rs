//! HTTP response handling.
//!
//! The transport hands back a [`Response<Bytes>`]; the executor decodes it into
//! a [`Response<Value>`] whose body is the `data` the caller commits.

use std::collections::HashMap;

use bytes::Bytes;
use serde_json::{Value, json};

/// HTTP response with status, headers, and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<B = Bytes> {
    status: u16,
    headers: HashMap<String, String>,
    body: B,
}

impl<B> Response<B> {
    /// Creates a new response.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: B) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &B {
        &self.body
    }

    /// Consume into body.
    #[must_use]
    pub fn into_body(self) -> B {
        self.body
    }

    /// Consume into (status, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (u16, HashMap<String, String>, B) {
        (self.status, self.headers, self.body)
    }

    /// Status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Status is 4xx.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status is 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Transform the body with a function.
    pub fn map_body<F, B2>(self, f: F) -> Response<B2>
    where
        F: FnOnce(B) -> B2,
    {
        Response {
            status: self.status,
            headers: self.headers,
            body: f(self.body),
        }
    }
}

impl Response<Bytes> {
    /// Deserialize the response body as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn json<T: serde::de::DeserializeOwned>(self) -> crate::Result<T> {
        crate::from_json(&self.body)
    }

    /// Get the response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid UTF-8.
    pub fn text(self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.to_vec())
    }

    /// Decode the body into loose JSON, see [`decode_data`](crate::body::decode_data).
    #[must_use]
    pub fn into_data(self) -> Response<Value> {
        self.map_body(|body| crate::body::decode_data(&body))
    }
}

impl Response<Value> {
    /// The decoded body.
    #[must_use]
    pub const fn data(&self) -> &Value {
        &self.body
    }

    /// The payload nested under `data.data`, as served by paginated APIs.
    #[must_use]
    pub fn package_data(&self) -> Option<&Value> {
        self.body.get("data")
    }

    /// The `data.message` string, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    /// The `data.error` member when it is truthy.
    #[must_use]
    pub fn error_flag(&self) -> Option<&Value> {
        self.body.get("error").filter(|flag| crate::is_truthy(flag))
    }

    /// JSON view `{"data": ..., "status": ..., "headers": ...}`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "data": self.body,
            "status": self.status,
            "headers": self.headers,
        })
    }

    /// JSON view in the raw error layout, `{"message": ..., "response": {"status", "data", "headers"}}`.
    ///
    /// Same shape as [`Error::to_value`](crate::Error::to_value) for an error
    /// status, so a normalizer finds the status and the body's `message`.
    #[must_use]
    pub fn to_error_value(&self) -> Value {
        let mut value = json!({ "response": self.to_value() });
        if let Some(message) = self.message().filter(|message| !message.is_empty()) {
            value["message"] = Value::String(message.to_string());
        }
        value
    }
}
