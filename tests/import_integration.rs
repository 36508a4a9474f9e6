//! End-to-end pipeline tests against a mock board API
//!
//! These tests drive the import pipeline and the bootstrap exporter through
//! the library API with the client pointed at a wiremock server, verifying
//! exactly which HTTP calls a run produces.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use planport::board::BoardClient;
use planport::cli::{import, setup, Output};
use planport::storage::Config;

fn test_config(extra: serde_json::Value) -> Config {
    let mut base = serde_json::json!({
        "api": { "key": "k", "token": "t" },
        "board": "b1",
        "targetList": "l1",
    });
    base.as_object_mut()
        .unwrap()
        .extend(extra.as_object().unwrap().clone());
    serde_json::from_value(base).unwrap()
}

fn write_tasks(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("tasks.csv");
    fs::write(&path, content).unwrap();
    path
}

async fn mount_empty_card_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/lists/l1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn single_card_end_to_end() {
    let server = MockServer::start().await;
    mount_empty_card_list(&server).await;

    Mock::given(method("POST"))
        .and(path("/cards"))
        .and(body_string_contains("name=Fix+urgent+bug"))
        .and(body_string_contains("idLabels=lbl1"))
        .and(body_string_contains("idMembers=m1"))
        .and(body_string_contains("idList=l1"))
        .and(body_string_contains("pos=top"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "c1"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(serde_json::json!({
        "labels": [{ "id": "lbl1", "keywords": ["urgent"] }],
        "users": { "Alice": "m1" },
    }));

    let dir = TempDir::new().unwrap();
    let tasks = write_tasks(&dir, "Cat1;;;\nCat1;Fix urgent bug;2d;Alice\n");

    let client = BoardClient::with_base_url(server.uri(), "k", "t");
    import::run(&client, &config, &tasks, &Output::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_card_is_not_created() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lists/l1/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
            "name": "Fix urgent bug",
            "idMembers": ["m1"],
            "labels": [{ "id": "lbl1" }],
        }])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(serde_json::json!({
        "labels": [{ "id": "lbl1", "keywords": ["urgent"] }],
        "users": { "Alice": "m1" },
    }));

    let dir = TempDir::new().unwrap();
    let tasks = write_tasks(&dir, "Cat1;Fix urgent bug;2d;Alice\n");

    let client = BoardClient::with_base_url(server.uri(), "k", "t");
    import::run(&client, &config, &tasks, &Output::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn skip_keyword_suppresses_the_request() {
    let server = MockServer::start().await;
    mount_empty_card_list(&server).await;

    Mock::given(method("POST"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(serde_json::json!({
        "skip": ["internal"],
        "users": { "Alice": "m1" },
    }));

    let dir = TempDir::new().unwrap();
    let tasks = write_tasks(&dir, "internal ops;;;\nOps;Rotate keys;1d;Alice\n");

    let client = BoardClient::with_base_url(server.uri(), "k", "t");
    import::run(&client, &config, &tasks, &Output::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn unknown_user_aborts_without_dispatching() {
    let server = MockServer::start().await;
    mount_empty_card_list(&server).await;

    Mock::given(method("POST"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config(serde_json::json!({
        "users": { "Alice": "m1" },
    }));

    let dir = TempDir::new().unwrap();
    // The unknown name is on the first leaf; the valid row after it must
    // never be reached.
    let tasks = write_tasks(&dir, "Cat1;First;1d;Mallory\nCat1;Second;1d;Alice\n");

    let client = BoardClient::with_base_url(server.uri(), "k", "t");
    let err = import::run(&client, &config, &tasks, &Output::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Mallory"));
}

#[tokio::test]
async fn fatal_row_still_settles_in_flight_requests() {
    let server = MockServer::start().await;
    mount_empty_card_list(&server).await;

    let delay = std::time::Duration::from_millis(300);
    Mock::given(method("POST"))
        .and(path("/cards"))
        .and(body_string_contains("name=First"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "c1"}))
                .set_delay(delay),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(serde_json::json!({
        "users": { "Alice": "m1" },
    }));

    let dir = TempDir::new().unwrap();
    // The first row's request is already in flight when the second row's
    // unknown name aborts the stream; the run must wait for its outcome
    // before returning the error.
    let tasks = write_tasks(&dir, "Cat1;First;1d;Alice\nCat1;Second;1d;Mallory\n");

    let client = BoardClient::with_base_url(server.uri(), "k", "t");
    let started = std::time::Instant::now();
    let err = import::run(&client, &config, &tasks, &Output::new())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Mallory"));
    assert!(started.elapsed() >= delay);
}

#[tokio::test]
async fn failed_creation_does_not_abort_the_run() {
    let server = MockServer::start().await;
    mount_empty_card_list(&server).await;

    // Every creation fails, yet the run completes and attempts both cards.
    Mock::given(method("POST"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(serde_json::json!({
        "users": { "Alice": "m1" },
    }));

    let dir = TempDir::new().unwrap();
    let tasks = write_tasks(&dir, "Cat1;First;1d;Alice\nCat1;Second;1d;Alice\n");

    let client = BoardClient::with_base_url(server.uri(), "k", "t");
    import::run(&client, &config, &tasks, &Output::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn repeated_tasks_in_one_run_are_both_created() {
    let server = MockServer::start().await;
    mount_empty_card_list(&server).await;

    // The snapshot is never refreshed mid-run, so identical rows each
    // produce a card.
    Mock::given(method("POST"))
        .and(path("/cards"))
        .and(body_string_contains("name=Same+task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "c"})))
        .expect(2)
        .mount(&server)
        .await;

    let config = test_config(serde_json::json!({
        "users": { "Alice": "m1" },
    }));

    let dir = TempDir::new().unwrap();
    let tasks = write_tasks(&dir, "Cat1;Same task;1d;Alice\nCat1;Same task;1d;Alice\n");

    let client = BoardClient::with_base_url(server.uri(), "k", "t");
    import::run(&client, &config, &tasks, &Output::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn setup_mode_writes_board_metadata() {
    let server = MockServer::start().await;

    let members = serde_json::json!([{ "id": "m1", "fullName": "Alice" }]);
    let labels = serde_json::json!([{ "id": "lbl1", "name": "urgent", "color": "red" }]);
    let lists = serde_json::json!([{ "id": "l1", "name": "Backlog" }]);

    for (resource, body) in [("members", &members), ("labels", &labels), ("lists", &lists)] {
        Mock::given(method("GET"))
            .and(path(format!("/boards/b1/{}", resource)))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let config = test_config(serde_json::json!({}));
    let dir = TempDir::new().unwrap();
    let out_dir = dir.path().join("outputs");

    let client = BoardClient::with_base_url(server.uri(), "k", "t");
    setup::run(&client, &config, &out_dir, &Output::new())
        .await
        .unwrap();

    for (file, expected) in [
        ("members.json", &members),
        ("labels.json", &labels),
        ("lists.json", &lists),
    ] {
        let written = fs::read_to_string(out_dir.join(file)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(&parsed, expected);
        // 4-space indentation
        assert!(written.contains("\n    {"));
    }
}

#[tokio::test]
async fn setup_mode_fails_on_fetch_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let config = test_config(serde_json::json!({}));
    let dir = TempDir::new().unwrap();

    let client = BoardClient::with_base_url(server.uri(), "k", "t");
    let err = setup::run(&client, &config, &dir.path().join("outputs"), &Output::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("401"));
}
