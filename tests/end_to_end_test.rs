use rureq::compose::{ApiKeyLocation, AuthConfig, BodyType, RequestDraft};
use rureq::config::Settings;
use rureq::http::{Method, ResponseBody};
use rureq::session::Session;
use rureq::variable::{Environment, EnvironmentSet};
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_string, body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_with_env(env: Environment) -> Session {
    let name = env.name.clone();
    let mut environments = EnvironmentSet::new();
    environments.upsert(env);
    environments.activate(&name).unwrap();
    Session::with_settings(Settings::default(), environments).unwrap()
}

/// 变量替换 + 查询参数 + 请求头，收到 200 JSON 并记录历史
#[tokio::test]
async fn test_compose_and_send_scenario() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("limit", "10"))
        .and(header("X-Key", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = session_with_env(
        Environment::new("dev")
            .with_var("baseUrl", mock_server.uri())
            .with_var("key", "abc123"),
    );

    let draft = RequestDraft::new(Method::Get, "{{baseUrl}}/users")
        .with_param("limit", "10")
        .with_header("X-Key", "{{key}}");

    let record = session.send(&draft).await;
    let response = record.response().expect("response received");

    assert!(response.ok());
    assert_eq!(response.status.code(), 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(response.data(), json!({"users": []}));
    assert_eq!(response.size(), response.raw_text.len());

    assert_eq!(session.history().len(), 1);
    let entry = session.history().latest().unwrap();
    assert_eq!(entry.url, format!("{}/users?limit=10", mock_server.uri()));
    assert_eq!(entry.status, 200);
}

/// JSON Content-Type 但内容不是 JSON：data 为原始字符串
#[tokio::test]
async fn test_malformed_json_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&mock_server)
        .await;

    let mut session = Session::new().unwrap();
    let draft = RequestDraft::new(Method::Get, format!("{}/broken", mock_server.uri()));
    let record = session.send(&draft).await;
    let response = record.response().unwrap();

    assert_eq!(response.data(), json!("not json"));
    assert!(matches!(response.body, ResponseBody::InvalidJson { .. }));
}

/// 网络层失败不抛错，也不写历史
#[tokio::test]
async fn test_transport_failure_not_recorded() {
    let mut session = Session::new().unwrap();
    let draft = RequestDraft::new(Method::Get, "http://127.0.0.1:1/unreachable");

    let record = session.send(&draft).await;
    assert!(record.is_failed());
    assert!(!record.error_message().unwrap().is_empty());
    assert!(session.history().is_empty());
}

/// 响应体读到一半连接断开：整体视为网络层失败，不写历史
#[tokio::test]
async fn test_truncated_body_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 1024];
        let _ = socket.read(&mut buf).await.unwrap();
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 100\r\n\r\nhello world")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let mut session = Session::new().unwrap();
    let record = session
        .send(&RequestDraft::new(Method::Get, format!("http://{}/partial", addr)))
        .await;
    server.await.unwrap();

    assert!(record.is_failed());
    assert!(record.status().is_none());
    assert!(!record.error_message().unwrap().is_empty());
    assert!(session.history().is_empty());
}

#[tokio::test]
async fn test_invalid_url_is_transport_failure() {
    let mut session = Session::new().unwrap();
    let record = session.send(&RequestDraft::new(Method::Get, "{{baseUrl}}/users")).await;
    assert!(record.is_failed());
    assert!(session.history().is_empty());
}

/// form 请求体解析失败时原样发送
#[tokio::test]
async fn test_form_fallback_reaches_server() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(body_string("{bad json"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = Session::new().unwrap();
    let draft = RequestDraft::new(Method::Post, format!("{}/submit", mock_server.uri()))
        .with_body(BodyType::Form, "{bad json");

    let record = session.send(&draft).await;
    assert_eq!(record.status(), Some(201));
}

/// form 请求体以 multipart 发送，Content-Type 由传输层生成
#[tokio::test]
async fn test_multipart_form() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("alice"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = Session::new().unwrap();
    let draft = RequestDraft {
        method: Method::Post,
        url: format!("{}/upload", mock_server.uri()),
        ..RequestDraft::default()
    }
    .with_body(BodyType::Form, r#"{"name":"alice"}"#);

    assert!(session.send(&draft).await.is_ok());
}

#[tokio::test]
async fn test_bearer_overrides_header() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = Session::new().unwrap();
    let draft = RequestDraft::new(Method::Get, mock_server.uri())
        .with_header("Authorization", "Foo")
        .with_auth(AuthConfig::bearer("T"));

    assert!(session.send(&draft).await.is_ok());
}

#[tokio::test]
async fn test_api_key_in_query() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("api_key", "k-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = Session::new().unwrap();
    let draft = RequestDraft::new(Method::Get, format!("{}/items", mock_server.uri()))
        .with_auth(AuthConfig::api_key("api_key", "k-1", ApiKeyLocation::Query));

    assert!(session.send(&draft).await.is_ok());
}

/// 配置的超时作为网络层失败返回
#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let settings = Settings {
        timeout_secs: Some(1),
        ..Settings::default()
    };
    let mut session = Session::with_settings(settings, EnvironmentSet::new()).unwrap();
    let record = session.send(&RequestDraft::new(Method::Get, mock_server.uri())).await;

    assert!(record.is_failed());
    assert!(record.duration() >= Duration::from_secs(1));
}

/// 保存到集合后再加载，重新发送得到同样的请求
#[tokio::test]
async fn test_collection_round_trip() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/users/1"))
        .and(body_string(r#"{"name":"bob"}"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut session = Session::new().unwrap();
    let collection_id = session.create_collection("Users");
    let saved = RequestDraft::new(Method::Put, format!("{}/users/1", mock_server.uri()))
        .with_body(BodyType::Json, r#"{"name":"bob"}"#);
    let request_id = session.save_to_collection(&collection_id, &saved, None).unwrap();

    let collection = session.collections().get(&collection_id).unwrap();
    assert!(collection.expanded);
    assert_eq!(collection.requests[0].name, "PUT Request");

    let mut draft = RequestDraft::default();
    session.load_request(&mut draft, &collection_id, &request_id).unwrap();
    assert!(session.send(&draft).await.is_ok());
}
