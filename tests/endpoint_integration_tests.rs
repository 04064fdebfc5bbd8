use chatui::client::{
    ChatEndpoint, ChatReply, ChatRequest, FetchOptions, HttpEndpoint, RequestError, fetch_json,
};
use chatui::core::state::Turn;
use reqwest::Method;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn endpoint(server: &MockServer) -> HttpEndpoint {
    HttpEndpoint::new(format!("{}/chat", server.uri()), vec![], None).unwrap()
}

fn hello_request() -> ChatRequest {
    ChatRequest {
        messages: vec![Turn::user("hi")],
    }
}

// ============================================================================
// fetch_json
// ============================================================================

#[tokio::test]
async fn test_fetch_json_parses_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/echo"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"q": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": 42})))
        .mount(&mock_server)
        .await;

    let http = reqwest::Client::new();
    let result: Option<Value> = fetch_json(
        &http,
        FetchOptions::post(format!("{}/echo", mock_server.uri()), json!({"q": 1})),
    )
    .await
    .unwrap();

    assert_eq!(result, Some(json!({"answer": 42})));
}

#[tokio::test]
async fn test_fetch_json_get_sends_no_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let http = reqwest::Client::new();
    let result: Option<Value> = fetch_json(
        &http,
        FetchOptions::new(Method::GET, format!("{}/status", mock_server.uri())),
    )
    .await
    .unwrap();
    assert_eq!(result, Some(json!({"ok": true})));

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(received[0].headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_fetch_json_no_content_is_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let http = reqwest::Client::new();
    let result: Option<Value> = fetch_json(
        &http,
        FetchOptions::new(Method::DELETE, format!("{}/item", mock_server.uri())),
    )
    .await
    .unwrap();

    assert_eq!(result, None);
}

#[tokio::test]
async fn test_fetch_json_caller_content_type_overrides_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("content-type", "application/vnd.chat+json"))
        .and(header("x-api-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let http = reqwest::Client::new();
    let options = FetchOptions::post(mock_server.uri(), json!({}))
        .with_header("Content-Type", "application/vnd.chat+json")
        .with_header("X-Api-Key", "secret");
    let result: Option<Value> = fetch_json(&http, options).await.unwrap();

    assert_eq!(result, Some(json!({})));
}

#[tokio::test]
async fn test_fetch_json_invalid_header_fails_before_sending() {
    let mock_server = MockServer::start().await;

    let http = reqwest::Client::new();
    let options = FetchOptions::post(mock_server.uri(), json!({})).with_header("Bad Header", "x");
    let result: Result<Option<Value>, _> = fetch_json(&http, options).await;

    assert!(matches!(result, Err(RequestError::InvalidHeader(_))));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// HttpEndpoint
// ============================================================================

#[tokio::test]
async fn test_endpoint_successful_reply() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "messages": [{"role": "USER", "message": "hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "Hello"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let reply = tokio_test::assert_ok!(endpoint(&mock_server).exchange(&hello_request()).await);

    assert_eq!(
        reply,
        Some(ChatReply {
            output: Some("Hello".into())
        })
    );
}

#[tokio::test]
async fn test_endpoint_http_error_keeps_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&mock_server)
        .await;

    let result = endpoint(&mock_server).exchange(&hello_request()).await;

    match result {
        Err(RequestError::Http { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, json!({"error": "boom"}));
        }
        other => panic!("expected Http error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_endpoint_html_response_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>login</html>", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let result = endpoint(&mock_server).exchange(&hello_request()).await;

    match result {
        Err(RequestError::NonJsonResponse {
            status,
            content_type,
        }) => {
            assert_eq!(status, 200);
            assert_eq!(content_type.as_deref(), Some("text/html"));
        }
        other => panic!("expected NonJsonResponse, got {:?}", other),
    }
}

#[tokio::test]
async fn test_endpoint_html_error_page_is_non_json_not_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_raw("Bad Gateway", "text/plain"))
        .mount(&mock_server)
        .await;

    let result = endpoint(&mock_server).exchange(&hello_request()).await;
    assert!(matches!(
        result,
        Err(RequestError::NonJsonResponse { status: 502, .. })
    ));
}

#[tokio::test]
async fn test_endpoint_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let reply = endpoint(&mock_server)
        .exchange(&hello_request())
        .await
        .unwrap();
    assert_eq!(reply, None);
}

#[tokio::test]
async fn test_endpoint_malformed_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&mock_server)
        .await;

    let result = endpoint(&mock_server).exchange(&hello_request()).await;
    assert!(matches!(result, Err(RequestError::Decode(_))));
}

#[tokio::test]
async fn test_endpoint_unreachable_is_transport_error() {
    // Port 1 is reserved and nothing listens there
    let endpoint = HttpEndpoint::new("http://127.0.0.1:1/chat", vec![], None).unwrap();

    let error = tokio_test::assert_err!(endpoint.exchange(&hello_request()).await);
    assert!(matches!(error, RequestError::Transport(_)));
}

#[tokio::test]
async fn test_endpoint_sends_configured_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("authorization", "Bearer abc"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": "ok"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let endpoint = HttpEndpoint::new(
        format!("{}/chat", mock_server.uri()),
        vec![("Authorization".into(), "Bearer abc".into())],
        None,
    )
    .unwrap();

    let reply = endpoint.exchange(&hello_request()).await.unwrap();
    assert_eq!(reply.and_then(|r| r.output), Some("ok".into()));
}
