//! Offset/limit to page/per-page conversion.
//!
//! Data grids page with `offset` + `limit`; paginated APIs expect `page` +
//! `per_page`. [`to_server_query`] bridges the two and passes every other
//! field (sorting, filters) through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page number (1-based) containing the row at `offset`.
///
/// `offset == 0` is always page 1; otherwise `offset / limit + 1`.
///
/// # Panics
///
/// `limit` must be positive; a zero limit with a non-zero offset divides by zero.
///
/// ```
/// use herald_core::offset_to_page;
///
/// assert_eq!(offset_to_page(0, 10), 1);
/// assert_eq!(offset_to_page(19, 10), 2);
/// assert_eq!(offset_to_page(20, 10), 3);
/// ```
#[must_use]
pub fn offset_to_page(offset: u64, limit: u64) -> u64 {
    debug_assert!(limit > 0, "limit must be positive");
    if offset == 0 {
        return 1;
    }
    offset / limit + 1
}

/// Query as sent by a data grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTableQuery {
    /// Index of the first row.
    pub offset: u64,
    /// Rows per page; must be positive.
    pub limit: u64,
    /// Any other criteria (sort, filters), passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataTableQuery {
    /// A query with no extra criteria.
    #[must_use]
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit,
            extra: Map::new(),
        }
    }

    /// Add a pass-through criterion.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// [`DataTableQuery`] plus the `page` / `per_page` pair a paginated API expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerQuery {
    /// The original query, without any `page` / `per_page` extra fields.
    #[serde(flatten)]
    pub query: DataTableQuery,
    /// 1-based page number.
    pub page: u64,
    /// Page size, equal to the query's `limit`.
    pub per_page: u64,
}

/// Convert a grid query into a server query.
///
/// Any `page` / `per_page` already among the extra fields is replaced.
///
/// ```
/// use herald_core::{DataTableQuery, to_server_query};
///
/// let query = to_server_query(DataTableQuery::new(25, 10).with("sort", "title"));
/// assert_eq!((query.page, query.per_page), (3, 10));
/// assert_eq!(query.query.extra["sort"], "title");
/// ```
#[must_use]
pub fn to_server_query(mut query: DataTableQuery) -> ServerQuery {
    query.extra.remove("page");
    query.extra.remove("per_page");
    ServerQuery {
        page: offset_to_page(query.offset, query.limit),
        per_page: query.limit,
        query,
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use serde_json::json;

    use super::*;

    #[test]
    fn first_offset_is_page_one() {
        for limit in [1, 5, 10, 25, 100] {
            check!(offset_to_page(0, limit) == 1);
        }
    }

    #[test]
    fn page_boundaries() {
        check!(offset_to_page(25, 10) == 3);
        check!(offset_to_page(20, 10) == 3);
        check!(offset_to_page(19, 10) == 2);
        check!(offset_to_page(10, 10) == 2);
        check!(offset_to_page(9, 10) == 1);
        check!(offset_to_page(3, 1) == 4);
    }

    #[test]
    fn server_query_passes_extra_fields_through() {
        let query = DataTableQuery::new(20, 10)
            .with("sort", "-created_at")
            .with("status", json!(["open", "closed"]));

        let server = to_server_query(query.clone());

        check!(server.page == 3);
        check!(server.per_page == 10);
        check!(server.query == query);
    }

    #[test]
    fn server_query_replaces_stale_page_fields() {
        let query = DataTableQuery::new(20, 10)
            .with("page", 1)
            .with("per_page", 50)
            .with("sort", "title");

        let server = to_server_query(query);

        check!(server.query.extra == Map::from_iter([("sort".to_string(), json!("title"))]));
        check!(
            crate::to_query_string(&server).expect("serialize")
                == "offset=20&limit=10&sort=title&page=3&per_page=10"
        );
    }

    #[test]
    fn server_query_serializes_flat() {
        let server = to_server_query(DataTableQuery::new(0, 25).with("q", "milk"));
        let value = serde_json::to_value(&server).expect("serialize");

        assert_eq!(
            value,
            json!({ "offset": 0, "limit": 25, "q": "milk", "page": 1, "per_page": 25 })
        );
    }

    #[test]
    fn server_query_as_query_string() {
        let server = to_server_query(DataTableQuery::new(30, 15).with("sort", "title"));
        let query = crate::to_query_string(&server).expect("query string");

        assert_eq!(query, "offset=30&limit=15&sort=title&page=3&per_page=15");
    }

    #[test]
    fn grid_query_deserializes_with_extras() {
        let query: DataTableQuery =
            serde_json::from_value(json!({ "offset": 10, "limit": 5, "sort": "id" }))
                .expect("deserialize");

        check!(query.offset == 10);
        check!(query.limit == 5);
        check!(query.extra.get("sort") == Some(&json!("id")));
    }
}
