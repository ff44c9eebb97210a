//! Listing demo
//!
//! Fetches one page of a paginated listing the way a data table would,
//! tracking the request lifecycle and printing a normalized error message
//! when it fails.
//!
//! ```text
//! cargo run -p herald-demo-listing -- https://api.example.com/ todos 20 10
//! ```

// Demo-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(clippy::print_stderr)]

use std::cell::RefCell;

use herald::prelude::*;
use herald::StatusMessageTable;

// ============================================================================
// Data Types
// ============================================================================

/// A listed record; everything but `id` is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

struct Args {
    base_url: String,
    resource: String,
    offset: u64,
    limit: u64,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let base_url = args
            .next()
            .unwrap_or_else(|| "https://api.example.com/".to_string());
        let resource = args.next().unwrap_or_else(|| "todos".to_string());
        let offset = args.next().and_then(|v| v.parse().ok()).unwrap_or(0);
        let limit = args
            .next()
            .and_then(|v| v.parse().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(10);
        Self {
            base_url,
            resource,
            offset,
            limit,
        }
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> herald::Result<()> {
    let args = Args::parse();

    let executor = Executor::new(HyperClient::builder().with_logging().build())
        .with_base_url(&args.base_url)?;
    let normalizer = Normalizer::new().with_table(
        StatusMessageTable::default().with(404, format!("No such listing: {}", args.resource)),
    );

    let query = to_server_query(DataTableQuery::new(args.offset, args.limit));
    println!(
        "Fetching {} page {} ({} per page)",
        args.resource, query.page, query.per_page
    );

    // The commits write into the same lifecycle record a UI store would hold.
    let state = RefCell::new(RequestState::default().merge(lifecycle::to_executed()));
    let outcome = executor
        .get(
            &args.resource,
            &query,
            commits(
                |response: &Response<Value>| {
                    state.replace_with(|s| s.clone().merge(lifecycle::to_success(response.clone())));
                },
                |failure: &Failure<'_>| {
                    state.replace_with(|s| s.clone().merge(lifecycle::to_error(failure.to_value())));
                },
            ),
        )
        .await;
    let state = state.into_inner();
    println!("Lifecycle: {:?}", state.status);

    match outcome {
        Ok(response) => match Fetched::<Record>::default().refreshed(&response) {
            Ok(listing) => {
                let meta = listing.pagination.meta;
                println!(
                    "Page {}/{}: records {}-{} of {}",
                    meta.current_page, meta.last_page, meta.from, meta.to, meta.total
                );
                for record in &listing.pagination.data {
                    println!("  #{} {:?}", record.id, record.fields);
                }
            }
            Err(e) => eprintln!("Unexpected listing body: {e}"),
        },
        Err(_) => {
            let error = state.error.unwrap_or_default();
            eprintln!("Request failed: {}", normalizer.render(&error));
            if normalizer.is_unprocessable_entity(&error) {
                eprintln!("Check the query parameters.");
            }
        }
    }

    Ok(())
}
