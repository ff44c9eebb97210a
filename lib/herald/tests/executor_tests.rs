//! End-to-end tests for `Executor` over `HyperClient` using wiremock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use assert2::{check, let_assert};
use herald::prelude::*;
use herald::{DataTableQuery, Pagination, UNKNOWN_STATUS};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Todo {
    id: u64,
    title: String,
}

/// Counts commits and keeps what the fail commit saw.
#[derive(Default)]
struct Recorder {
    successes: AtomicUsize,
    failures: Mutex<Vec<Value>>,
}

impl Recorder {
    fn commit(&self) -> impl Commit + '_ {
        commits(
            |_: &Response<Value>| {
                self.successes.fetch_add(1, Ordering::SeqCst);
            },
            |failure: &Failure<'_>| {
                self.failures.lock().expect("lock").push(failure.to_value());
            },
        )
    }

    fn success_count(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }

    fn failures(&self) -> Vec<Value> {
        self.failures.lock().expect("lock").clone()
    }
}

fn executor_for(server: &MockServer) -> Executor<HyperClient> {
    Executor::new(HyperClient::new())
        .with_base_url(format!("{}/api/", server.uri()))
        .expect("base url")
}

#[tokio::test]
async fn get_listing_commits_success_with_full_response() {
    let server = MockServer::start().await;
    let body = json!({
        "data": [{ "id": 21, "title": "milk" }],
        "meta": { "current_page": 3, "per_page": 10, "last_page": 3, "total": 21, "from": 21, "to": 21 },
        "links": {}
    });

    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .and(query_param("page", "3"))
        .and(query_param("per_page", "10"))
        .and(query_param("sort", "title"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let recorder = Recorder::default();
    let query = to_server_query(DataTableQuery::new(25, 10).with("sort", "title"));

    let result = executor.get("todos", &query, recorder.commit()).await;

    let_assert!(Ok(response) = result);
    check!(response.status() == 200);
    check!(response.data() == &body);
    check!(recorder.success_count() == 1);
    check!(recorder.failures().is_empty());

    let page = Pagination::<Todo>::from_response(&response).expect("page");
    check!(page.meta.current_page == 3);
    check!(page.data == vec![Todo { id: 21, title: "milk".to_string() }]);
}

#[tokio::test]
async fn post_sends_body_and_resolves() {
    let server = MockServer::start().await;
    let input = json!({ "title": "bread" });

    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 9, "title": "bread" })))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let recorder = Recorder::default();

    let result = executor.post("todos", &input, recorder.commit()).await;

    let_assert!(Ok(response) = result);
    check!(response.status() == 201);
    check!(recorder.success_count() == 1);
}

#[tokio::test]
async fn connection_failure_commits_wrapper_and_rejects_raw_error() {
    let executor = Executor::new(HyperClient::new())
        .with_base_url("http://127.0.0.1:1/")
        .expect("base url");
    let recorder = Recorder::default();

    let result = executor.post("todos", &json!({ "title": "x" }), recorder.commit()).await;

    let_assert!(Err(Rejection::Transport(error)) = result);
    check!(error.is_connection());
    check!(recorder.success_count() == 0);

    let failures = recorder.failures();
    let_assert!([failure] = failures.as_slice());
    let_assert!(Some(message) = error.message());
    check!(failure == &json!({ "data": { "message": message, "error": error.to_value() } }));

    // No response: the sentinel entry is rendered and it is not a 422.
    let normalizer = Normalizer::new();
    check!(!normalizer.has_response(failure));
    check!(normalizer.resolve_status_code(failure) == UNKNOWN_STATUS);
    check!(!normalizer.is_unprocessable_entity(failure));
    check!(normalizer.render(failure) == "A client-side problem occurred");
    check!(
        normalizer.render_message(Some(failure), RenderOptions::force_origin_message())
            == Some(message)
    );
}

#[tokio::test]
async fn unprocessable_entity_without_body_message_renders_table_entry() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/todos/1"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "errors": { "title": ["required"] } })),
        )
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let recorder = Recorder::default();

    let result = executor.put("todos/1", &json!({ "title": "" }), recorder.commit()).await;

    let_assert!(Err(rejection) = result);
    check!(rejection.transport_error().and_then(Error::status) == Some(422));

    let failures = recorder.failures();
    let_assert!([failure] = failures.as_slice());
    let normalizer = Normalizer::new();
    check!(normalizer.is_unprocessable_entity(failure));
    check!(normalizer.render(failure) == "Some fields failed validation");
    check!(
        failure.pointer("/data/error/response/data/errors/title/0") == Some(&json!("required"))
    );
}

#[tokio::test]
async fn server_message_wins_over_status_table() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/todos/1"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "Only owners can delete" })),
        )
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let recorder = Recorder::default();

    let result = executor.delete("todos/1", &(), recorder.commit()).await;

    let_assert!(Err(rejection) = result);
    let failures = recorder.failures();
    let_assert!([failure] = failures.as_slice());

    check!(Normalizer::new().render(failure) == "Only owners can delete");

    // The raw rejection carries the same response at the top level.
    let direct = Normalizer::new().with_strategy(UnwrapStrategy::Direct);
    check!(direct.render(&rejection.to_value()) == "Only owners can delete");
    check!(direct.resolve_status_code(&rejection.to_value()) == 403);
}

#[tokio::test]
async fn envelope_error_flag_rejects_with_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": true, "message": "Quota exceeded" })),
        )
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let recorder = Recorder::default();

    let result = executor.post("todos", &json!({}), recorder.commit()).await;

    let_assert!(Err(Rejection::Envelope(response)) = result);
    check!(response.message() == Some("Quota exceeded"));
    check!(recorder.success_count() == 0);

    let failures = recorder.failures();
    let_assert!([failure] = failures.as_slice());
    check!(failure == &Failure::Envelope(&response).to_value());

    let normalizer = Normalizer::new();
    check!(normalizer.resolve_status_code(failure) == 200);
    check!(normalizer.render(failure) == "Quota exceeded");

    let direct = Normalizer::new().with_strategy(UnwrapStrategy::Direct);
    check!(direct.render(&Rejection::Envelope(response).to_value()) == "Quota exceeded");
}

#[tokio::test]
async fn exception_mode_rejects_with_error_member() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "error": { "message": "Listing disabled" } })),
        )
        .mount(&server)
        .await;

    let executor = executor_for(&server)
        .with_config(ExecutorConfig::builder().envelope(EnvelopeMode::Exception).build());
    let recorder = Recorder::default();

    let result = executor.get("todos", &(), recorder.commit()).await;

    let_assert!(Err(Rejection::Application(error)) = result);
    check!(error == json!({ "message": "Listing disabled" }));
    check!(recorder.failures() == vec![json!({ "message": "Listing disabled" })]);

    let direct = Normalizer::new().with_strategy(UnwrapStrategy::Direct);
    check!(
        direct.render_message(Some(&error), RenderOptions::force_origin_message())
            == Some("Listing disabled".to_string())
    );
}

#[tokio::test]
async fn lifecycle_follows_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let normalizer = Normalizer::new();

    let state: RequestState = RequestState::default().merge(lifecycle::to_executed());
    check!(state.status == RequestStatus::Executed);

    let recorder = Recorder::default();
    let state = match executor.get("todos", &(), recorder.commit()).await {
        Ok(response) => state.merge(lifecycle::to_success(response)),
        Err(_) => state.merge(lifecycle::to_error(recorder.failures().remove(0))),
    };
    check!(state.is_success());
    check!(normalizer.render_message(state.error.as_ref(), RenderOptions::default()) == None);

    let state = state.merge(lifecycle::to_reset()).merge(lifecycle::to_executed());
    check!(state.success == None);

    let recorder = Recorder::default();
    let state = match executor.get("missing", &(), recorder.commit()).await {
        Ok(response) => state.merge(lifecycle::to_success(response)),
        Err(_) => {
            let failures = recorder.failures();
            let_assert!([failure] = failures.as_slice());
            state.merge(lifecycle::to_error(failure.clone()))
        }
    };
    check!(state.is_error());
    check!(
        normalizer.render_message(state.error.as_ref(), RenderOptions::default())
            == Some("The requested resource does not exist".to_string())
    );
}

#[tokio::test]
async fn stored_failures_classify_unprocessable_entity() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/todos"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let recorder = Recorder::default();

    let result = executor.post("todos", &json!({}), recorder.commit()).await;
    let_assert!(Err(rejection) = result);

    // The stored fail-commit value reads with the default strategy...
    let state: RequestState = RequestState::default()
        .merge(lifecycle::to_executed())
        .merge(lifecycle::to_error(recorder.failures().remove(0)));
    let_assert!(Some(error) = state.error.as_ref());
    let normalizer = Normalizer::new();
    check!(normalizer.is_unprocessable_entity(error));
    check!(normalizer.render(error) == "Some fields failed validation");

    // ...and the rejection with the direct one.
    let direct = Normalizer::new().with_strategy(UnwrapStrategy::Direct);
    check!(direct.is_unprocessable_entity(&rejection.to_value()));
    check!(direct.render(&rejection.to_value()) == "Some fields failed validation");
}

#[tokio::test]
async fn concurrent_requests_settle_independently() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "slow": true }))
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let executor = executor_for(&server);
    let slow_recorder = Recorder::default();
    let broken_recorder = Recorder::default();

    let (slow, broken) = tokio::join!(
        executor.get("slow", &(), slow_recorder.commit()),
        executor.get("broken", &(), broken_recorder.commit()),
    );

    check!(slow.is_ok());
    check!(slow_recorder.success_count() == 1);
    check!(slow_recorder.failures().is_empty());

    check!(broken.is_err());
    check!(broken_recorder.success_count() == 0);
    check!(broken_recorder.failures().len() == 1);
}

#[tokio::test]
async fn transport_timeout_is_a_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = HyperClient::builder()
        .timeout(std::time::Duration::from_millis(100))
        .build();
    let executor = Executor::new(client)
        .with_base_url(format!("{}/api/", server.uri()))
        .expect("base url");
    let recorder = Recorder::default();

    let result = executor.get("slow", &(), recorder.commit()).await;

    let_assert!(Err(Rejection::Transport(error)) = result);
    check!(error.is_timeout());
    check!(
        recorder.failures()
            == vec![json!({ "data": { "message": "request timeout", "error": { "message": "request timeout" } } })]
    );
}
