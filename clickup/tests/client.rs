//! Exercises `ClickUpClient` against a local axum server that mimics the
//! ClickUp time tracking endpoints.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use clickup::{ClickUpClient, ClickUpError, ClickUpURL, Credentials};
use serde_json::{json, Value};

const TOKEN: &str = "pk_test_token";

#[derive(Default)]
struct Fixture {
    running: Option<Value>,
    tasks: Vec<Value>,
    start_bodies: Vec<Value>,
    search_queries: Vec<String>,
    next_entry_id: u64,
}

type Shared = Arc<Mutex<Fixture>>;
type Reply = (StatusCode, Json<Value>);

fn authorized(headers: &HeaderMap) -> Result<(), Reply> {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(TOKEN) => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "err": "Token invalid", "ECODE": "OAUTH_025" })),
        )),
    }
}

async fn user(headers: HeaderMap) -> Reply {
    if let Err(reply) = authorized(&headers) {
        return reply;
    }
    (
        StatusCode::OK,
        Json(json!({ "user": { "id": 42, "username": "ada", "email": "ada@example.com" } })),
    )
}

async fn teams(headers: HeaderMap) -> Reply {
    if let Err(reply) = authorized(&headers) {
        return reply;
    }
    (
        StatusCode::OK,
        Json(json!({ "teams": [{ "id": "900", "name": "Acme", "color": "#000" }] })),
    )
}

async fn spaces(Path(_team_id): Path<String>) -> Reply {
    (StatusCode::OK, Json(json!({})))
}

async fn lists(Path(_space_id): Path<String>) -> Reply {
    (StatusCode::OK, Json(json!({ "lists": null })))
}

async fn list_tasks(State(state): State<Shared>, Path(_list_id): Path<String>) -> Reply {
    let tasks = state.lock().unwrap().tasks.clone();
    (StatusCode::OK, Json(json!({ "tasks": tasks })))
}

async fn current(State(state): State<Shared>, Path(_team_id): Path<String>) -> Reply {
    let running = state.lock().unwrap().running.clone();
    (StatusCode::OK, Json(json!({ "data": running })))
}

async fn start(
    State(state): State<Shared>,
    Path(_team_id): Path<String>,
    Json(body): Json<Value>,
) -> Reply {
    let mut fixture = state.lock().unwrap();
    fixture.start_bodies.push(body.clone());
    if fixture.running.is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "err": "Timer already running", "ECODE": "TIMEENTRY_054" })),
        );
    }

    fixture.next_entry_id += 1;
    let mut entry = json!({
        "id": fixture.next_entry_id.to_string(),
        "start": "1718000000000",
        "duration": "-1718000000000",
        "billable": body["billable"],
        "description": body["description"],
    });
    if let Some(tid) = body.get("tid").and_then(Value::as_str) {
        entry["task"] = json!({ "id": tid, "name": "Linked task" });
    }
    fixture.running = Some(entry.clone());
    (StatusCode::OK, Json(json!({ "data": entry })))
}

async fn stop(State(state): State<Shared>, Path(_team_id): Path<String>) -> Reply {
    let mut fixture = state.lock().unwrap();
    match fixture.running.take() {
        Some(mut entry) => {
            entry["end"] = json!("1718000060000");
            entry["duration"] = json!("60000");
            (StatusCode::OK, Json(json!({ "data": entry })))
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "err": "No timer running", "ECODE": "TIMEENTRY_055" })),
        ),
    }
}

async fn task(State(state): State<Shared>, Path(task_id): Path<String>) -> Reply {
    let fixture = state.lock().unwrap();
    match fixture.tasks.iter().find(|task| task["id"] == task_id.as_str()) {
        Some(task) => (StatusCode::OK, Json(task.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "err": "Task not found", "ECODE": "ITEM_013" })),
        ),
    }
}

async fn search(
    State(state): State<Shared>,
    Path(_team_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let mut fixture = state.lock().unwrap();
    let query = params.get("search").cloned().unwrap_or_default();
    fixture.search_queries.push(query.clone());
    let needle = query.to_lowercase();
    let matches: Vec<Value> = fixture
        .tasks
        .iter()
        .filter(|task| {
            task["name"]
                .as_str()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    (StatusCode::OK, Json(json!({ "tasks": matches })))
}

async fn spawn_fixture(fixture: Fixture) -> (ClickUpURL, Shared) {
    let state: Shared = Arc::new(Mutex::new(fixture));
    let app = Router::new()
        .route("/api/v2/user", get(user))
        .route("/api/v2/team", get(teams))
        .route("/api/v2/team/:team_id/space", get(spaces))
        .route("/api/v2/space/:space_id/list", get(lists))
        .route("/api/v2/list/:list_id/task", get(list_tasks))
        .route("/api/v2/team/:team_id/time_entries/current", get(current))
        .route("/api/v2/team/:team_id/time_entries/start", post(start))
        .route("/api/v2/team/:team_id/time_entries/stop", post(stop))
        .route("/api/v2/team/:team_id/task", get(search))
        .route("/api/v2/task/:task_id", get(task))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (ClickUpURL::new(format!("http://{}/api/v2", addr)), state)
}

fn client(base_url: ClickUpURL, token: &str) -> ClickUpClient {
    ClickUpClient::with_base_url(Credentials::new(token).unwrap(), base_url).unwrap()
}

fn sample_tasks() -> Vec<Value> {
    vec![
        json!({ "id": "86a1", "name": "Write release notes", "status": { "status": "open" } }),
        json!({ "id": "86a2", "name": "Review release branch" }),
        json!({ "id": "86a3", "name": "Plan sprint" }),
    ]
}

#[tokio::test]
async fn authenticated_user_and_teams() {
    let (base_url, _) = spawn_fixture(Fixture::default()).await;
    let client = client(base_url, TOKEN);

    let user = client.get_authenticated_user().await.unwrap();
    assert_eq!(user.id, 42);
    assert_eq!(user.display_name(), "ada");

    let teams = client.list_teams().await.unwrap();
    assert_eq!(teams.len(), 1);
    assert_eq!(teams[0].id, "900");
}

#[tokio::test]
async fn rejected_token_surfaces_status_and_body() {
    let (base_url, _) = spawn_fixture(Fixture::default()).await;
    let client = client(base_url, "pk_wrong");

    let err = client.get_authenticated_user().await.unwrap_err();
    assert!(err.is_unauthorized());
    match err {
        ClickUpError::Status { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("OAUTH_025"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn absent_collections_are_empty() {
    let (base_url, _) = spawn_fixture(Fixture::default()).await;
    let client = client(base_url, TOKEN);

    assert!(client.list_spaces("900").await.unwrap().is_empty());
    assert!(client.list_lists("100").await.unwrap().is_empty());
    assert!(client.list_tasks("200").await.unwrap().is_empty());
}

#[tokio::test]
async fn nothing_running_is_none() {
    let (base_url, _) = spawn_fixture(Fixture::default()).await;
    let client = client(base_url, TOKEN);

    assert!(client.get_running_time_entry("900").await.unwrap().is_none());
}

#[tokio::test]
async fn start_then_current_reports_the_task() {
    let (base_url, state) = spawn_fixture(Fixture {
        tasks: sample_tasks(),
        ..Fixture::default()
    })
    .await;
    let client = client(base_url, TOKEN);

    let started = client
        .start_time_entry("900", Some("86a1"), None)
        .await
        .unwrap();
    assert_eq!(started.task_id(), Some("86a1"));

    let running = client.get_running_time_entry("900").await.unwrap().unwrap();
    assert_eq!(running.task_id(), Some("86a1"));
    assert!(running.is_running());

    let body = state.lock().unwrap().start_bodies[0].clone();
    assert_eq!(
        body,
        json!({ "description": "", "billable": false, "tid": "86a1" })
    );
}

#[tokio::test]
async fn start_without_task_omits_tid() {
    let (base_url, state) = spawn_fixture(Fixture::default()).await;
    let client = client(base_url, TOKEN);

    let started = client
        .start_time_entry("900", None, Some("standup"))
        .await
        .unwrap();
    assert_eq!(started.task_id(), None);

    let body = state.lock().unwrap().start_bodies[0].clone();
    assert!(body.get("tid").is_none());
    assert_eq!(body["billable"], json!(false));
    assert_eq!(body["description"], json!("standup"));
}

#[tokio::test]
async fn start_while_running_is_a_remote_error() {
    let (base_url, _) = spawn_fixture(Fixture::default()).await;
    let client = client(base_url, TOKEN);

    client.start_time_entry("900", None, None).await.unwrap();
    let err = client.start_time_entry("900", None, None).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn stop_then_current_is_none() {
    let (base_url, _) = spawn_fixture(Fixture::default()).await;
    let client = client(base_url, TOKEN);

    client.start_time_entry("900", None, None).await.unwrap();
    let stopped = client.stop_time_entry("900").await.unwrap();
    assert!(!stopped.is_running());

    assert!(client.get_running_time_entry("900").await.unwrap().is_none());

    let err = client.stop_time_entry("900").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn unknown_task_is_not_found() {
    let (base_url, _) = spawn_fixture(Fixture {
        tasks: sample_tasks(),
        ..Fixture::default()
    })
    .await;
    let client = client(base_url, TOKEN);

    let task = client.get_task("86a3").await.unwrap();
    assert_eq!(task.name, "Plan sprint");

    let err = client.get_task("nope").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn search_sends_query_and_allows_empty_results() {
    let (base_url, state) = spawn_fixture(Fixture {
        tasks: sample_tasks(),
        ..Fixture::default()
    })
    .await;
    let client = client(base_url, TOKEN);

    let found = client.search_tasks("900", "release notes").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "86a1");
    assert_eq!(
        found[0].extra.get("status").cloned(),
        Some(json!({ "status": "open" }))
    );

    let none = client.search_tasks("900", "deploy").await.unwrap();
    assert!(none.is_empty());

    assert_eq!(
        state.lock().unwrap().search_queries,
        vec!["release notes".to_string(), "deploy".to_string()]
    );
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let client = client(ClickUpURL::new("http://127.0.0.1:9/api/v2"), TOKEN);

    let err = client.get_running_time_entry("900").await.unwrap_err();
    assert!(matches!(err, ClickUpError::Transport(_)));
    assert_eq!(err.status(), None);
}
