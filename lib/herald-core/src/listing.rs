//! Container for paginated listing results.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Response, Result};

/// Pagination metadata as served by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMeta {
    /// 1-based current page.
    pub current_page: u64,
    /// Page size.
    pub per_page: u64,
    /// Last page number, 0 when empty.
    pub last_page: u64,
    /// Total number of records.
    pub total: u64,
    /// 1-based index of the first record on this page, 0 when empty.
    pub from: u64,
    /// 1-based index of the last record on this page, 0 when empty.
    pub to: u64,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            per_page: 10,
            last_page: 0,
            total: 0,
            from: 0,
            to: 0,
        }
    }
}

/// One page of records with its metadata and navigation links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "R: serde::de::DeserializeOwned"))]
pub struct Pagination<R> {
    /// Records on this page.
    #[serde(default = "Vec::new")]
    pub data: Vec<R>,
    /// Page metadata.
    #[serde(default)]
    pub meta: PageMeta,
    /// Navigation links (`first`, `last`, `prev`, `next`).
    #[serde(default)]
    pub links: Map<String, Value>,
}

impl<R> Default for Pagination<R> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta::default(),
            links: Map::new(),
        }
    }
}

impl<R: serde::de::DeserializeOwned> Pagination<R> {
    /// Decode a page from a response body.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending path when the body does not match.
    pub fn from_response(response: &Response<Value>) -> Result<Self> {
        serde_path_to_error::deserialize(response.data().clone()).map_err(|e| {
            Error::json_deserialization(e.path().to_string(), e.inner().to_string())
        })
    }
}

/// A listing as held by a caller: the current query context and the last page fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "R: serde::de::DeserializeOwned"))]
pub struct Fetched<R> {
    /// Filter conditions the page was fetched with.
    pub conditions: Option<Value>,
    /// The last page fetched.
    pub pagination: Pagination<R>,
    /// Sort order the page was fetched with.
    #[serde(rename = "orderBy")]
    pub order_by: Map<String, Value>,
}

impl<R> Default for Fetched<R> {
    fn default() -> Self {
        Self {
            conditions: None,
            pagination: Pagination::default(),
            order_by: Map::new(),
        }
    }
}

impl<R> Fetched<R> {
    /// Replace the page wholesale.
    #[must_use]
    pub fn with_pagination(mut self, pagination: Pagination<R>) -> Self {
        self.pagination = pagination;
        self
    }
}

impl<R: serde::de::DeserializeOwned> Fetched<R> {
    /// Replace the page with the one decoded from `response`.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a page of `R`; `self` is then dropped.
    pub fn refreshed(self, response: &Response<Value>) -> Result<Self> {
        Ok(self.with_pagination(Pagination::from_response(response)?))
    }
}
