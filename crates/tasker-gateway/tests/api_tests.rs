// SPDX-FileCopyrightText: 2026 Social Tasker Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router tests driving the full HTTP surface against a temporary database.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use tasker_config::model::{ScoringConfig, StorageConfig};
use tasker_gateway::{AuthConfig, GatewayState, HealthState, build_router};
use tasker_scoring::CompletionOrchestrator;
use tasker_storage::SqliteStore;

const KEY: &str = "test-key";

struct TestApp {
    router: Router,
    db_path: String,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        Self::with_key(Some(KEY)).await
    }

    async fn with_key(api_key: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("api.db").to_string_lossy().into_owned();
        let config = StorageConfig {
            database_path: db_path.clone(),
            wal_mode: true,
        };
        let store = Arc::new(SqliteStore::open(config).await.unwrap());
        let orchestrator =
            CompletionOrchestrator::new(store.clone(), store.clone(), &ScoringConfig::default());
        let state = GatewayState {
            records: store.clone(),
            graph: store.clone(),
            requests: store,
            orchestrator: Arc::new(orchestrator),
            auth: AuthConfig {
                api_key: api_key.map(str::to_string),
            },
            health: HealthState {
                start_time: std::time::Instant::now(),
                prometheus_render: Some(Arc::new(|| "# metrics\n".to_string())),
            },
        };
        Self {
            router: build_router(state),
            db_path,
            _dir: dir,
        }
    }

    /// Run SQL against the database file directly, bypassing the store.
    fn raw_sql(&self, sql: &str) {
        let conn = rusqlite::Connection::open(&self.db_path).unwrap();
        conn.execute_batch(sql).unwrap();
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_with_key(method, uri, body, Some(KEY)).await
    }

    async fn send_with_key(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        key: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header("x-api-key", key);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn create_user(&self, id: &str, name: &str) {
        let (status, _) = self
            .send(
                Method::POST,
                "/api/create-user",
                Some(json!({ "user_id": id, "name": name, "email": format!("{id}@example.com") })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    async fn create_task(&self, user_id: &str, title: &str, priority: &str, due_in_days: i64) -> String {
        let due = (Utc::now() + Duration::days(due_in_days)).timestamp_millis();
        let (status, body) = self
            .send(
                Method::POST,
                "/api/new-task",
                Some(json!({
                    "user_id": user_id,
                    "title": title,
                    "description": "desc",
                    "details": "details",
                    "status": "incomplete",
                    "priority": priority,
                    "due_date": due,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["task"], title);
        body["docId"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn api_requires_the_key() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send_with_key(Method::GET, "/api/user/u1", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = app
        .send_with_key(Method::GET, "/api/user/u1", None, Some("wrong"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_key_config_fails_closed() {
    let app = TestApp::with_key(None).await;
    let (status, _) = app.send(Method::GET, "/api/user/u1", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_and_metrics_are_public() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send_with_key(Method::GET, "/health", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "sqlite");

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_lifecycle() {
    let app = TestApp::new().await;
    app.create_user("u1", "Ada").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/create-user",
            Some(json!({ "user_id": "u1", "name": "Ada", "email": "ada@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    let (status, body) = app.send(Method::GET, "/api/user/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ada");
    assert_eq!(body["score"], Value::Null);
    assert_eq!(body["task_day_streak"], 0);
    assert_eq!(body["task_week_streak"], 0);
    assert!(body.get("last_task_completed_date").is_some());
    assert!(body.get("revision").is_none());

    let (status, _) = app.send(Method::DELETE, "/api/user/u1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = app.send(Method::GET, "/api/user/u1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    let (status, _) = app.send(Method::DELETE, "/api/user/u1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_edit_renames_everywhere() {
    let app = TestApp::new().await;
    app.create_user("u1", "Ada").await;

    let (status, body) = app
        .send(Method::PUT, "/api/user/u1", Some(json!({ "name": " Grace " })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Grace");
    assert_eq!(body["email"], "u1@example.com");

    let (_, found) = app.send(Method::GET, "/api/search-friend/grace", None).await;
    assert_eq!(found[0]["user_id"], "u1");
    assert_eq!(found[0]["name"], "Grace");

    let (status, body) = app
        .send(Method::PUT, "/api/user/u1", Some(json!({ "email": "nope" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid email"));

    let (status, _) = app
        .send(Method::PUT, "/api/user/ghost", Some(json!({ "name": "Nobody" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_user_clears_graph_and_requests() {
    let app = TestApp::new().await;
    for (id, name) in [("a", "Ada"), ("b", "Bob"), ("c", "Cy")] {
        app.create_user(id, name).await;
    }
    app.send(
        Method::POST,
        "/api/add-friend",
        Some(json!({ "userId": "a", "friendId": "b" })),
    )
    .await;
    app.send(
        Method::POST,
        "/api/accept-friend",
        Some(json!({ "userId": "b", "requesterId": "a" })),
    )
    .await;
    app.send(
        Method::POST,
        "/api/add-friend",
        Some(json!({ "userId": "a", "friendId": "c" })),
    )
    .await;

    let (status, _) = app.send(Method::DELETE, "/api/user/a", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, friends) = app.send(Method::GET, "/api/friends/b", None).await;
    assert!(friends.as_array().unwrap().is_empty());
    let (_, pending) = app.send(Method::GET, "/api/friend-requests/c", None).await;
    assert!(pending.as_array().unwrap().is_empty());
    let (_, found) = app.send(Method::GET, "/api/search-friend/ada", None).await;
    assert!(found.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn failed_graph_cleanup_keeps_the_user_for_a_retry() {
    let app = TestApp::new().await;
    app.create_user("u1", "Ada").await;
    app.raw_sql(
        "CREATE TRIGGER refuse_node_delete BEFORE DELETE ON graph_users
         BEGIN SELECT RAISE(ABORT, 'graph offline'); END;",
    );

    let (status, body) = app.send(Method::DELETE, "/api/user/u1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "storage error");
    let (status, _) = app.send(Method::GET, "/api/user/u1", None).await;
    assert_eq!(status, StatusCode::OK);

    app.raw_sql("DROP TRIGGER refuse_node_delete;");
    let (status, _) = app.send(Method::DELETE, "/api/user/u1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::GET, "/api/user/u1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_user_validates_input() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/create-user",
            Some(json!({ "user_id": "u1", "name": "", "email": "not-an-email" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("name cannot be empty"));
    assert!(message.contains("invalid email"));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new().await;
    let request = Request::post("/api/new-task")
        .header("x-api-key", KEY)
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn task_crud() {
    let app = TestApp::new().await;
    app.create_user("u1", "Ada").await;
    let late = app.create_task("u1", "later", "low", 5).await;
    let soon = app.create_task("u1", "sooner", "high", 1).await;

    let (status, body) = app.send(Method::GET, "/api/tasks/user/u1", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![soon.as_str(), late.as_str()]);
    assert_eq!(body[0]["status"], "open");
    assert_eq!(body[0]["priority"], "high");
    assert_eq!(body[0]["user_id"], "u1");

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/task/{late}/user/u1"),
            Some(json!({ "title": "renamed", "status": "complete" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "renamed");
    assert_eq!(body["status"], "open");

    let (status, body) = app
        .send(Method::GET, &format!("/api/task/{late}/user/u1"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "renamed");

    let (status, _) = app
        .send(Method::GET, &format!("/api/task/{late}/user/other"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::DELETE, &format!("/api/user/u1/task/{late}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .send(Method::DELETE, &format!("/api/user/u1/task/{late}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn new_task_for_unknown_user_is_not_found() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/new-task",
            Some(json!({
                "user_id": "ghost", "title": "t", "priority": "low",
                "due_date": "2030-01-01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn complete_task_scores_once() {
    let app = TestApp::new().await;
    app.create_user("u1", "Ada").await;
    let task = app.create_task("u1", "ship it", "high", 3).await;

    let uri = format!("/api/user/u1/complete-task/{task}");
    let (status, body) = app.send(Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("completed"));
    assert_eq!(body["task_day_streak"], 1);
    assert_eq!(body["mirror"], "synced");
    let score = body["score"].as_i64().unwrap();
    // 25 + 50 + ~6 depending on sub-second creation skew
    assert!((80..=81).contains(&score), "score {score}");

    let (status, body) = app.send(Method::PUT, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already completed"));

    let (_, user) = app.send(Method::GET, "/api/user/u1", None).await;
    assert_eq!(user["score"], score);

    let (status, _) = app
        .send(Method::PUT, "/api/user/u1/complete-task/missing", None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn corrupt_stored_task_is_unprocessable() {
    let app = TestApp::new().await;
    app.create_user("u1", "Ada").await;
    let bad_priority = app.create_task("u1", "legacy", "high", 3).await;
    let bad_due = app.create_task("u1", "garbled", "low", 3).await;
    app.raw_sql(&format!(
        "UPDATE tasks SET priority = 3 WHERE id = '{bad_priority}';
         UPDATE tasks SET due_date = 'not a date' WHERE id = '{bad_due}';"
    ));

    for task in [&bad_priority, &bad_due] {
        let uri = format!("/api/user/u1/complete-task/{task}");
        let (status, body) = app.send(Method::PUT, &uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        assert!(body["error"].is_string());

        let (_, stored) = app
            .send(Method::GET, &format!("/api/task/{task}/user/u1"), None)
            .await;
        assert_eq!(stored["status"], "open");
    }

    let (_, user) = app.send(Method::GET, "/api/user/u1", None).await;
    assert_eq!(user["score"], Value::Null);
    assert_eq!(user["task_day_streak"], 0);
}

#[tokio::test]
async fn accepting_a_request_from_a_deleted_node_changes_nothing() {
    let app = TestApp::new().await;
    app.create_user("a", "Ada").await;
    app.create_user("b", "Bob").await;
    app.send(
        Method::POST,
        "/api/add-friend",
        Some(json!({ "userId": "a", "friendId": "b" })),
    )
    .await;
    app.raw_sql("DELETE FROM graph_users WHERE user_id = 'a';");

    let accept = json!({ "userId": "b", "requesterId": "a" });
    let (status, _) = app.send(Method::POST, "/api/accept-friend", Some(accept)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, pending) = app.send(Method::GET, "/api/friend-requests/b", None).await;
    assert_eq!(pending[0]["requester_id"], "a");
    let (_, friends) = app.send(Method::GET, "/api/friends/b", None).await;
    assert!(friends.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn friend_request_flow() {
    let app = TestApp::new().await;
    app.create_user("a", "Ada").await;
    app.create_user("b", "Bob").await;
    app.create_user("c", "Cy").await;

    let (status, body) = app.send(Method::GET, "/api/search-friend/BO", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["user_id"], "b");
    assert!(body[0].get("score").is_some());

    let add = json!({ "userId": "a", "friendId": "b" });
    let (status, _) = app.send(Method::POST, "/api/add-friend", Some(add.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.send(Method::POST, "/api/add-friend", Some(add)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/add-friend",
            Some(json!({ "userId": "a", "friendId": "a" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .send(
            Method::POST,
            "/api/add-friend",
            Some(json!({ "userId": "a", "friendId": "ghost" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, pending) = app.send(Method::GET, "/api/friend-requests/b", None).await;
    assert_eq!(pending[0]["requester_id"], "a");

    let accept = json!({ "userId": "b", "requesterId": "a" });
    let (status, _) = app
        .send(Method::POST, "/api/accept-friend", Some(accept.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app.send(Method::POST, "/api/accept-friend", Some(accept)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, friends) = app.send(Method::GET, "/api/friends/a", None).await;
    assert_eq!(friends[0]["user_id"], "b");
    let (_, friends) = app.send(Method::GET, "/api/friends/b", None).await;
    assert_eq!(friends[0]["user_id"], "a");

    let (status, _) = app
        .send(
            Method::POST,
            "/api/add-friend",
            Some(json!({ "userId": "c", "friendId": "a" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let reject = json!({ "userId": "a", "requesterId": "c" });
    let (status, _) = app
        .send(Method::POST, "/api/reject-friend", Some(reject.clone()))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.send(Method::POST, "/api/reject-friend", Some(reject)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, friends) = app.send(Method::GET, "/api/friends/a", None).await;
    assert_eq!(friends.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn leaderboard_and_dashboard_reflect_mirrored_scores() {
    let app = TestApp::new().await;
    app.create_user("a", "Ada").await;
    app.create_user("b", "Bob").await;
    app.send(
        Method::POST,
        "/api/add-friend",
        Some(json!({ "userId": "a", "friendId": "b" })),
    )
    .await;
    app.send(
        Method::POST,
        "/api/accept-friend",
        Some(json!({ "userId": "b", "requesterId": "a" })),
    )
    .await;

    let task = app.create_task("b", "win", "high", 3).await;
    app.send(Method::PUT, &format!("/api/user/b/complete-task/{task}"), None)
        .await;
    for i in 0..7 {
        app.create_task("a", &format!("todo {i}"), "low", i + 1).await;
    }

    let (status, board) = app.send(Method::GET, "/api/leaderboard/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board[0]["user_id"], "b");
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[1]["user_id"], "a");
    assert_eq!(board[1]["is_self"], true);

    let (status, dash) = app.send(Method::GET, "/api/dashboard/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["user"]["user_id"], "a");
    assert_eq!(dash["open_task_count"], 7);
    assert_eq!(dash["upcoming_tasks"].as_array().unwrap().len(), 5);
    assert_eq!(dash["upcoming_tasks"][0]["title"], "todo 0");
    assert_eq!(dash["leaderboard"][0]["user_id"], "b");
}
