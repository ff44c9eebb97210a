//! HTTP method types.

use derive_more::Display;

/// HTTP verb supported by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// GET method - retrieve a resource.
    #[display("GET")]
    Get,
    /// POST method - create a resource.
    #[display("POST")]
    Post,
    /// PUT method - replace a resource.
    #[display("PUT")]
    Put,
    /// DELETE method - remove a resource.
    #[display("DELETE")]
    Delete,
}

impl Method {
    /// Returns `true` if params travel in the query string rather than the body.
    #[must_use]
    pub const fn sends_query(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
        }
    }
}

impl TryFrom<http::Method> for Method {
    type Error = crate::Error;

    fn try_from(method: http::Method) -> Result<Self, Self::Error> {
        match method {
            http::Method::GET => Ok(Self::Get),
            http::Method::POST => Ok(Self::Post),
            http::Method::PUT => Ok(Self::Put),
            http::Method::DELETE => Ok(Self::Delete),
            other => Err(crate::Error::InvalidRequest(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Put.to_string(), "PUT");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn method_sends_query() {
        assert!(Method::Get.sends_query());
        assert!(Method::Delete.sends_query());
        assert!(!Method::Post.sends_query());
        assert!(!Method::Put.sends_query());
    }

    #[test]
    fn method_from_http() {
        assert_eq!(
            Method::try_from(http::Method::PUT).expect("PUT"),
            Method::Put
        );
        assert!(Method::try_from(http::Method::PATCH).is_err());
    }
}
