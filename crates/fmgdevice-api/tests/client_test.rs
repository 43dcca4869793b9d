#![allow(clippy::unwrap_used)]
// Integration tests for `FmgClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fmgdevice_api::{AuthStrategy, Error, FmgClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, FmgClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client =
        FmgClient::with_client(reqwest::Client::new(), base_url, AuthStrategy::Session).unwrap();
    (server, client)
}

fn ok(url: &str, data: serde_json::Value) -> serde_json::Value {
    json!({
        "result": [{
            "status": { "code": 0, "message": "OK" },
            "url": url,
            "data": data
        }]
    })
}

fn status(url: &str, code: i64, message: &str) -> serde_json::Value {
    json!({
        "result": [{
            "status": { "code": code, "message": message },
            "url": url
        }]
    })
}

async fn login(server: &MockServer, client: &FmgClient) {
    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({"method": "exec", "params": [{"url": "/sys/login/user"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [{"status": {"code": 0, "message": "OK"}, "url": "/sys/login/user"}],
            "session": "s3ss10n"
        })))
        .mount(server)
        .await;

    let secret: secrecy::SecretString = "admin-password".to_string().into();
    client.login("admin", &secret).await.unwrap();
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_stores_session() {
    let (server, client) = setup().await;
    login(&server, &client).await;
    assert!(client.has_session());
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(status(
                "/sys/login/user",
                -22,
                "Login fail",
            )),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.has_session());
}

#[tokio::test]
async fn test_requests_carry_session_token() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({"method": "get", "session": "s3ss10n"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok("/sys/status", json!({"Hostname": "fmg-lab"}))),
        )
        .mount(&server)
        .await;

    let status = client.system_status().await.unwrap();
    assert_eq!(status.hostname.as_deref(), Some("fmg-lab"));
}

#[tokio::test]
async fn test_logout_clears_session() {
    let (server, client) = setup().await;
    login(&server, &client).await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({"params": [{"url": "/sys/logout"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok("/sys/logout", json!(null))))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();
    assert!(!client.has_session());
}

// ── CRUD tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_get_returns_data() {
    let (server, client) = setup().await;
    let url = "/pm/config/device/fgt1/vdom/root/switch-controller/qos/dot1p-map/voice";

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({"method": "get", "params": [{"url": url}]})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(url, json!({"name": "voice", "priority-0": "queue-0"}))),
        )
        .mount(&server)
        .await;

    let data = client.get(url).await.unwrap().unwrap();
    assert_eq!(data["name"], "voice");
}

#[tokio::test]
async fn test_add_sends_data() {
    let (server, client) = setup().await;
    let url = "/pm/config/device/fgt1/vdom/root/router/static";

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .and(body_partial_json(json!({
            "method": "add",
            "params": [{"url": url, "data": {"seq-num": 4, "dst": "10.0.0.0/8"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(url, json!({"seq-num": 4}))))
        .expect(1)
        .mount(&server)
        .await;

    let data = client
        .add(url, json!({"seq-num": 4, "dst": "10.0.0.0/8"}))
        .await
        .unwrap();
    assert_eq!(data, Some(json!({"seq-num": 4})));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_object_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status(
            "/pm/config/device/fgt1/vdom/root/router/static/9",
            -3,
            "Object does not exist",
        )))
        .mount(&server)
        .await;

    let result = client
        .get("/pm/config/device/fgt1/vdom/root/router/static/9")
        .await;
    match result {
        Err(ref e @ Error::ObjectNotFound { ref url }) => {
            assert!(e.is_not_found());
            assert!(url.ends_with("/static/9"));
        }
        other => panic!("expected ObjectNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_carries_code_and_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jsonrpc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status(
            "/pm/config/device/fgt1/global/system/dns",
            -10,
            "The data is invalid for selected url",
        )))
        .mount(&server)
        .await;

    let result = client
        .set(
            "/pm/config/device/fgt1/global/system/dns",
            json!({"primary": "nope"}),
        )
        .await;
    match result {
        Err(Error::Api { code, ref message, .. }) => {
            assert_eq!(code, -10);
            assert!(message.contains("invalid"), "got: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_maps_to_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.get("/sys/status").await;
    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.get("/sys/status").await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert!(body.contains("maintenance")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_gateway_error_is_retried() {
    let (server, client) = setup().await;
    client.set_retries(1);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok("/sys/status", json!({}))))
        .mount(&server)
        .await;

    let data = client.get("/sys/status").await.unwrap();
    assert_eq!(data, Some(json!({})));
}

#[tokio::test]
async fn test_gateway_error_without_retries_fails() {
    let (server, client) = setup().await;
    client.set_retries(0);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let result = client.get("/sys/status").await;
    assert!(
        matches!(result, Err(Error::Http { status: 502, .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_add_is_not_resent_after_gateway_error() {
    let (server, client) = setup().await;
    client.set_retries(2);

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(504))
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .add("/pm/config/device/fgt1/vdom/root/router/static", json!({"dst": "10.0.0.0 255.0.0.0"}))
        .await;
    assert!(
        matches!(result, Err(Error::Http { status: 504, .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_add_is_not_resent_after_timeout() {
    let server = MockServer::start().await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client =
        FmgClient::with_client(http, Url::parse(&server.uri()).unwrap(), AuthStrategy::Session)
            .unwrap();
    client.set_retries(2);

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok("/pm/config/device/fgt1/vdom/root/router/static", json!({"seq-num": 1})))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client
        .add("/pm/config/device/fgt1/vdom/root/router/static", json!({"dst": "10.0.0.0 255.0.0.0"}))
        .await;
    assert!(
        matches!(result, Err(ref e) if e.is_transient()),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_get_is_resent_after_timeout() {
    let server = MockServer::start().await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client =
        FmgClient::with_client(http, Url::parse(&server.uri()).unwrap(), AuthStrategy::Session)
            .unwrap();
    client.set_retries(1);

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok("/sys/status", json!({})))
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok("/sys/status", json!({}))))
        .mount(&server)
        .await;

    let data = client.get("/sys/status").await.unwrap();
    assert_eq!(data, Some(json!({})));
}

// ── Workspace tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_workspace_lock_commit_unlock() {
    let (server, client) = setup().await;

    for action in ["lock", "commit", "unlock"] {
        let url = format!("/dvmdb/adom/root/workspace/{action}");
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "exec", "params": [{"url": url}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok(&url, json!(null))))
            .expect(1)
            .mount(&server)
            .await;
    }

    client.lock_adom("root").await.unwrap();
    client.commit_adom("root").await.unwrap();
    client.unlock_adom("root").await.unwrap();
}
