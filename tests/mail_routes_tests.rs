use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use base64::Engine;
use serde_json::json;
use std::{
    fs,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zmail_relay::config::Config;
use zmail_relay::db::models::NewAccount;
use zmail_relay::db::sqlite::AccountStorage;
use zmail_relay::router::{RelayState, relay_router};
use zmail_relay::zoom_oauth::service::{TokenLifecycle, build_http_client};
use zmail_relay::MailApi;

fn make_jwt(exp: i64) -> String {
    let engine = &base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = engine.encode(json!({ "exp": exp }).to_string());
    format!("{header}.{payload}.sig")
}

fn temp_database_url(tag: &str) -> (String, std::path::PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "zmail-relay-routes-{tag}-{}-{nanos}.sqlite",
        std::process::id()
    ));
    (format!("sqlite:{}", temp_path.display()), temp_path)
}

async fn relay_app(server: &MockServer, database_url: &str) -> (axum::Router, AccountStorage) {
    let storage = AccountStorage::connect(database_url)
        .await
        .expect("open test db");
    let cfg = Arc::new(Config {
        client_id: "client".into(),
        client_secret: "secret".into(),
        redirect_uri: Url::parse("http://localhost:3000/oauth").expect("redirect uri"),
        auth_base_url: Url::parse(&server.uri()).expect("auth base"),
        api_base_url: Url::parse(&format!("{}/v2", server.uri())).expect("api base"),
        database_url: database_url.to_string(),
        listen_addr: "127.0.0.1:0".into(),
        loglevel: "info".into(),
        seed_enabled: false,
        seed_mailbox: "seed@zmail.com".into(),
        seed_to_email: "seed-to@example.com".into(),
    });

    let http = build_http_client();
    let lifecycle = Arc::new(TokenLifecycle::new(cfg.clone(), storage.clone(), http.clone()));
    let mail = Arc::new(MailApi::new(cfg, lifecycle.clone(), http));
    let app = relay_router(RelayState::new(lifecycle, mail));
    (app, storage)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("response body was not utf-8")
}

#[tokio::test]
async fn send_missing_to_email_is_a_client_error() {
    let server = MockServer::start().await;
    let (database_url, temp_path) = temp_database_url("missing-to");
    let (app, _storage) = relay_app(&server, &database_url).await;

    let resp = app
        .oneshot(post_json("/mail/a@x.com/messages/send", json!({})))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // Nothing reached the provider.
    assert!(
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .is_empty()
    );

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn label_missing_name_is_a_client_error() {
    let server = MockServer::start().await;
    let (database_url, temp_path) = temp_database_url("missing-label");
    let (app, _storage) = relay_app(&server, &database_url).await;

    let resp = app
        .oneshot(post_json(
            "/mail/a@x.com/labels",
            json!({ "toEmail": "b@y.com" }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn oauth_callback_without_code_is_a_client_error() {
    let server = MockServer::start().await;
    let (database_url, temp_path) = temp_database_url("no-code");
    let (app, _storage) = relay_app(&server, &database_url).await;

    let resp = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/oauth")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn unknown_mailbox_maps_to_generic_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let (database_url, temp_path) = temp_database_url("unknown-mailbox");
    let (app, _storage) = relay_app(&server, &database_url).await;

    let resp = app
        .oneshot(post_json(
            "/mail/ghost@x.com/messages/send",
            json!({ "toEmail": "b@y.com" }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_string(resp).await;
    assert!(body.contains("NO_SUCH_ACCOUNT"));
    // Generic message only; no token or alias leakage in the body.
    assert!(!body.contains("ghost@x.com"));

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn send_forwards_with_stored_bearer_token() {
    let server = MockServer::start().await;
    let fresh = make_jwt(4_000_000_000);

    Mock::given(method("POST"))
        .and(path("/v2/emails/mailboxes/a@x.com/messages/send"))
        .and(header("authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let (database_url, temp_path) = temp_database_url("send-ok");
    let (app, storage) = relay_app(&server, &database_url).await;
    storage
        .create(NewAccount {
            user_id: "usr_1".into(),
            email: "owner@example.com".into(),
            zmail_address: "a@x.com".into(),
            access_token: fresh.clone(),
            refresh_token: "rt-stored".into(),
        })
        .await
        .expect("seed account");

    let resp = app
        .oneshot(post_json(
            "/mail/a@x.com/messages/send",
            json!({ "toEmail": "b@y.com" }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("msg_1"));

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn trash_creation_sets_deleted_query_flag() {
    let server = MockServer::start().await;
    let fresh = make_jwt(4_000_000_000);

    Mock::given(method("POST"))
        .and(path("/v2/emails/mailboxes/a@x.com/messages"))
        .and(query_param("deleted", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg_trash" })))
        .expect(1)
        .mount(&server)
        .await;

    let (database_url, temp_path) = temp_database_url("trash-ok");
    let (app, storage) = relay_app(&server, &database_url).await;
    storage
        .create(NewAccount {
            user_id: "usr_1".into(),
            email: "owner@example.com".into(),
            zmail_address: "a@x.com".into(),
            access_token: fresh,
            refresh_token: "rt-stored".into(),
        })
        .await
        .expect("seed account");

    let resp = app
        .oneshot(post_json(
            "/mail/a@x.com/messages/trash",
            json!({ "toEmail": "b@y.com" }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let _ = fs::remove_file(&temp_path);
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway_with_generic_body() {
    let server = MockServer::start().await;
    let fresh = make_jwt(4_000_000_000);

    Mock::given(method("POST"))
        .and(path("/v2/emails/mailboxes/a@x.com/messages/send"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": 200, "message": "forbidden",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (database_url, temp_path) = temp_database_url("upstream-fail");
    let (app, storage) = relay_app(&server, &database_url).await;
    storage
        .create(NewAccount {
            user_id: "usr_1".into(),
            email: "owner@example.com".into(),
            zmail_address: "a@x.com".into(),
            access_token: fresh,
            refresh_token: "rt-stored".into(),
        })
        .await
        .expect("seed account");

    let resp = app
        .oneshot(post_json(
            "/mail/a@x.com/messages/send",
            json!({ "toEmail": "b@y.com" }),
        ))
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body = body_string(resp).await;
    assert!(body.contains("BAD_GATEWAY"));
    assert!(!body.contains("forbidden"));

    let _ = fs::remove_file(&temp_path);
}
