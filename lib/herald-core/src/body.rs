//! Body serialization utilities.

use bytes::Bytes;
use serde_json::Value;

use crate::Result;

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use herald_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Todo { title: String }
///
/// let todo = Todo { title: "write docs".to_string() };
/// let bytes = to_json(&todo).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"title":"write docs"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to a query string.
///
/// Uses `serde_html_form` which supports `Vec<T>` for repeated query parameters
/// (e.g., `?tags=a&tags=b&tags=c`).
///
/// # Errors
///
/// Returns an error if query serialization fails.
///
/// # Example
///
/// ```
/// use herald_core::to_query_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Search {
///     q: String,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     page: Option<u32>,
/// }
///
/// let search = Search { q: "rust".to_string(), page: Some(1) };
/// let query = to_query_string(&search).expect("serialize");
/// assert_eq!(query, "q=rust&page=1");
/// ```
pub fn to_query_string<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_html_form::to_string(value).map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "meta.total").
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}

/// Decode a response body into a JSON value, never failing.
///
/// An empty body is `null`; a body that is not JSON is kept as a string.
#[must_use]
pub fn decode_data(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy, everything else is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
