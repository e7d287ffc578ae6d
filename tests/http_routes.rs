//! HTTP integration tests for the board routes.
//!
//! Requests are driven through the router with `tower::ServiceExt::oneshot`
//! against the in-memory store, so no listener is bound.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use boardwalk::board::{
    adapters::{
        http::{BoardHttpState, board_router},
        memory::InMemoryBoardStore,
    },
    domain::{Column, ColumnTitle, Position, ProjectId, SwimlaneId, TaskLimit, TaskPlacement},
    services::{BoardSyncService, ColumnManager},
};
use boardwalk::config::BoardConfig;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tower::ServiceExt;

const PROJECT: ProjectId = ProjectId::new(5);

struct TestApp {
    store: Arc<InMemoryBoardStore>,
    router: Router,
}

impl TestApp {
    fn seed_column(&self, title: &str, position: u32) -> Column {
        self.store
            .seed_column(
                PROJECT,
                ColumnTitle::new(title).expect("valid title"),
                Position::new(position).expect("valid position"),
                TaskLimit::UNLIMITED,
            )
            .expect("seed column")
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("route request");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }
}

#[fixture]
fn app() -> TestApp {
    let store = Arc::new(InMemoryBoardStore::new());
    let config = Arc::new(BoardConfig::default().with_poll_interval_secs(5));
    let clock = Arc::new(DefaultClock);
    let state = BoardHttpState::new(
        ColumnManager::new(Arc::clone(&store), Arc::clone(&clock), Arc::clone(&config)),
        BoardSyncService::new(Arc::clone(&store), clock, config),
    );
    TestApp {
        router: board_router(Arc::new(state)),
        store,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .expect("build request")
}

fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_columns_are_listed_in_order(app: TestApp) {
    let (created, first) = app
        .send(post_json(
            "/projects/5/columns",
            &json!({ "title": "Todo" }),
        ))
        .await;
    app.send(post_json(
        "/projects/5/columns",
        &json!({ "title": "Done", "task_limit": 2 }),
    ))
    .await;

    assert_eq!(created, StatusCode::CREATED);
    assert_eq!(first["position"], 1);

    let (status, listed) = app.send(get("/projects/5/columns")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["title"], "Todo");
    assert_eq!(listed[1]["title"], "Done");
    assert_eq!(listed[1]["task_limit"], 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_column_is_unprocessable(app: TestApp) {
    let (status, body) = app
        .send(post_json("/projects/5/columns", &json!({ "title": "   " })))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");
}

#[rstest]
#[case::non_numeric_project(get("/projects/five/board"), StatusCode::BAD_REQUEST)]
#[case::non_numeric_column(
    empty(Method::POST, "/projects/5/columns/first/up"),
    StatusCode::BAD_REQUEST
)]
#[case::move_without_position(
    post_json("/projects/5/board/moves", &json!({ "task_id": 1, "column_id": 1 })),
    StatusCode::UNPROCESSABLE_ENTITY
)]
#[case::unparseable_json(
    Request::builder()
        .method(Method::POST)
        .uri("/projects/5/columns")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\":"))
        .expect("build request"),
    StatusCode::BAD_REQUEST
)]
#[case::bulk_without_form_content_type(
    empty(Method::POST, "/projects/5/columns/bulk"),
    StatusCode::UNSUPPORTED_MEDIA_TYPE
)]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_requests_get_the_json_error_body(
    app: TestApp,
    #[case] request: Request<Body>,
    #[case] expected: StatusCode,
) {
    let (status, body) = app.send(request).await;

    assert_eq!(status, expected);
    assert_eq!(body["error"], "validation");
    assert!(body["message"].as_str().is_some_and(|message| !message.is_empty()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn column_reorder_routes_report_whether_anything_moved(app: TestApp) {
    let a = app.seed_column("A", 1);
    let b = app.seed_column("B", 2);

    let (_, moved) = app
        .send(empty(
            Method::POST,
            &format!("/projects/5/columns/{}/up", b.id()),
        ))
        .await;
    let (_, stuck) = app
        .send(empty(
            Method::POST,
            &format!("/projects/5/columns/{}/up", b.id()),
        ))
        .await;

    assert_eq!(moved, json!({ "moved": true }));
    assert_eq!(stuck, json!({ "moved": false }));
    let (_, listed) = app.send(get("/projects/5/columns")).await;
    assert_eq!(listed[1]["id"], a.id().value());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_column_is_not_found(app: TestApp) {
    let (status, body) = app
        .send(empty(Method::POST, "/projects/5/columns/404/down"))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_column_and_renumbers(app: TestApp) {
    let a = app.seed_column("A", 1);
    app.seed_column("B", 2);

    let (status, _) = app
        .send(empty(
            Method::DELETE,
            &format!("/projects/5/columns/{}", a.id()),
        ))
        .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, listed) = app.send(get("/projects/5/columns")).await;
    assert_eq!(listed[0]["title"], "B");
    assert_eq!(listed[0]["position"], 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_form_updates_columns(app: TestApp) {
    let a = app.seed_column("A", 1);
    let form = format!("title%5B{id}%5D=Ready&task_limit%5B{id}%5D=3", id = a.id());

    let (status, updated) = app.send(post_form("/projects/5/columns/bulk", &form)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated[0]["title"], "Ready");
    assert_eq!(updated[0]["task_limit"], 3);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_form_rejects_malformed_keys(app: TestApp) {
    let (status, body) = app
        .send(post_form("/projects/5/columns/bulk", "title%5Bx%5D=Ready"))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_check_returns_not_modified_for_current_version(app: TestApp) {
    let todo = app.seed_column("Todo", 1);
    let done = app.seed_column("Done", 2);
    let task = app
        .store
        .seed_task(
            PROJECT,
            "ship",
            TaskPlacement::new(todo.id(), SwimlaneId::DEFAULT, Position::FIRST),
            true,
        )
        .expect("seed task");

    let (_, board) = app.send(get("/projects/5/board")).await;
    let version = board["version"].as_str().expect("version token").to_owned();
    assert_eq!(board["poll_interval_secs"], 5);

    let (unchanged, _) = app
        .send(get(&format!("/projects/5/board/check?version={version}")))
        .await;
    assert_eq!(unchanged, StatusCode::NOT_MODIFIED);

    let (moved, after) = app
        .send(post_json(
            "/projects/5/board/moves",
            &json!({ "task_id": task.id(), "column_id": done.id(), "position": 1 }),
        ))
        .await;
    assert_eq!(moved, StatusCode::OK);
    assert_ne!(after["version"], board["version"]);

    let (changed, fresh) = app
        .send(get(&format!("/projects/5/board/check?version={version}")))
        .await;
    assert_eq!(changed, StatusCode::OK);
    assert_eq!(fresh["version"], after["version"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_unknown_task_is_not_found(app: TestApp) {
    let todo = app.seed_column("Todo", 1);

    let (status, _) = app
        .send(post_json(
            "/projects/5/board/moves",
            &json!({ "task_id": 77, "column_id": todo.id(), "position": 1 }),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stats_count_tasks_per_column(app: TestApp) {
    let todo = app.seed_column("Todo", 1);
    app.seed_column("Done", 2);
    app.store
        .seed_task(
            PROJECT,
            "one",
            TaskPlacement::new(todo.id(), SwimlaneId::DEFAULT, Position::FIRST),
            true,
        )
        .expect("seed task");

    let (status, stats) = app.send(get("/projects/5/columns/stats")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats[0]["column_id"], todo.id().value());
    assert_eq!(stats[0]["total"], 1);
    assert_eq!(stats[1]["total"], 0);
}
