#![deny(clippy::all, clippy::pedantic)]

use std::io::Write;

use assert_cmd::Command;
use httpmock::MockServer;
use predicates::str::contains;
use serde_json::json;
use tempfile::NamedTempFile;
use uuid::Uuid;

fn event_file(document: &serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(document.to_string().as_bytes())
        .expect("write event");
    file
}

fn article_document(category_override: Option<Uuid>) -> serde_json::Value {
    let category = Uuid::new_v4();
    let mut document = json!({
        "entity": {
            "id": Uuid::new_v4(),
            "type": "article",
            "slug": "article-1",
            "lifecycle_state": "published",
            "primary_category": { "id": category },
        },
        "category_links": { category.to_string(): "/news" },
    });
    if let Some(chosen) = category_override {
        document["category_override"] = json!({ "id": chosen });
        document["category_links"][chosen.to_string()] = json!("/travel");
    }
    document
}

fn bridge() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cache-bridge"));
    cmd.env_remove("CACHE_MANAGER_HOST")
        .env_remove("CACHE_BRIDGE_CONFIG_FILE")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn notify_create_works_end_to_end() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/v1/update")
            .json_body(json!({ "url": "/news/article-1" }));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"status":200}"#);
    });

    let file = event_file(&article_document(None));
    bridge()
        .env("CACHE_MANAGER_HOST", server.base_url())
        .arg("notify")
        .arg("create")
        .arg("--event-file")
        .arg(file.path())
        .assert()
        .success()
        .stdout(contains("true"));

    mock.assert();
}

#[test]
fn notify_update_reads_stdin_and_uses_override() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/v1/update")
            .json_body(json!({ "url": "/travel/article-1" }));
        then.status(200).body(r#"{"status":200}"#);
    });

    let document = article_document(Some(Uuid::new_v4()));
    bridge()
        .arg("--cache-manager-host")
        .arg(server.base_url())
        .arg("notify")
        .arg("update")
        .write_stdin(document.to_string())
        .assert()
        .success()
        .stdout(contains("true"));

    mock.assert();
}

#[test]
fn notify_update_without_override_is_not_acknowledged() {
    let server = MockServer::start();
    let file = event_file(&article_document(None));

    bridge()
        .env("CACHE_MANAGER_HOST", server.base_url())
        .arg("notify")
        .arg("update")
        .arg("--event-file")
        .arg(file.path())
        .assert()
        .code(2)
        .stdout(contains("false"));
}

#[test]
fn notify_without_host_is_not_acknowledged() {
    let file = event_file(&article_document(None));

    bridge()
        .arg("notify")
        .arg("create")
        .arg("--event-file")
        .arg(file.path())
        .assert()
        .code(2)
        .stdout(contains("false"));
}

#[test]
fn notify_autosave_without_slug_is_a_no_op() {
    let server = MockServer::start();
    let file = event_file(&json!({
        "entity": {
            "id": Uuid::new_v4(),
            "type": "article",
            "slug": "",
            "lifecycle_state": "autosave",
        },
    }));

    bridge()
        .env("CACHE_MANAGER_HOST", server.base_url())
        .arg("notify")
        .arg("create")
        .arg("--event-file")
        .arg(file.path())
        .assert()
        .code(2)
        .stdout(contains("false"));
}

#[test]
fn status_prints_payload() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method("POST")
            .path("/api/v1/status")
            .json_body(json!({ "url": "/news/article-1" }));
        then.status(200).body(r#"{"status":200,"cached":true}"#);
    });

    let assert = bridge()
        .env("CACHE_MANAGER_HOST", server.base_url())
        .arg("status")
        .arg("/news/article-1")
        .assert()
        .success();

    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    let payload: serde_json::Value = serde_json::from_str(&output).expect("json output");
    assert_eq!(payload, json!({ "status": 200, "cached": true }));
    mock.assert();
}

#[test]
fn malformed_event_document_fails() {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(b"{ not json").expect("write event");

    bridge()
        .arg("--cache-manager-host")
        .arg("http://127.0.0.1:9")
        .arg("notify")
        .arg("create")
        .arg("--event-file")
        .arg(file.path())
        .assert()
        .code(65)
        .stderr(contains("invalid event document"));
}

#[test]
fn invalid_host_fails_fast() {
    bridge()
        .arg("--cache-manager-host")
        .arg("ftp://cache.internal")
        .arg("check-config")
        .assert()
        .code(78)
        .stderr(contains("cache_manager.host"));
}
