use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use llm_gateway_api::{routes, AppState, OpenAiCompatibleClient, UpstreamConfig};
use llm_gateway_core::{
    Channel, ChannelService, ChannelStatus, ChannelStore, ChannelType, ServiceConfig,
};
use llm_gateway_storage::InMemoryChannelStore;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{header as header_match, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ===== Test Helper Functions =====

fn create_test_app() -> (Router, Arc<InMemoryChannelStore>) {
    let store = Arc::new(InMemoryChannelStore::new());
    let upstream = OpenAiCompatibleClient::new(UpstreamConfig::default()).unwrap();
    let service = ChannelService::new(store.clone(), Arc::new(upstream), ServiceConfig::default());

    (Router::new().nest("/api", routes(AppState::new(service))), store)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Value {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn seed(store: &InMemoryChannelStore, channels: Vec<Channel>) {
    store.batch_insert(channels).await.unwrap();
}

fn tagged(name: &str, tag: &str, priority: i64) -> Channel {
    Channel::new(ChannelType::OpenAI, name, format!("sk-{}", name))
        .with_tag(tag)
        .with_priority(priority)
}

// ===== Create / Read Tests =====

#[tokio::test]
async fn test_create_expands_multi_line_key() {
    let (app, store) = create_test_app();

    let body = send(
        &app,
        "POST",
        "/api/channel/",
        Some(json!({
            "type": "openai",
            "name": "pool",
            "key": "sk-a\nsk-b\n\nsk-c",
            "models": "gpt-4o,gpt-4o-mini",
            "tag": "team"
        })),
    )
    .await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["count"], json!(3));
    assert_eq!(store.channels_by_tag("team").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_create_regional_without_default_fails() {
    let (app, store) = create_test_app();

    let body = send(
        &app,
        "POST",
        "/api/channel/",
        Some(json!({
            "type": "vertexai",
            "name": "vertex",
            "key": "{\"type\": \"service_account\"}",
            "other": "{\"claude-3-5-sonnet\": \"us-east5\"}"
        })),
    )
    .await;

    assert_eq!(body["success"], json!(false));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_get_never_echoes_key() {
    let (app, store) = create_test_app();
    seed(&store, vec![Channel::new(ChannelType::OpenAI, "solo", "sk-secret")]).await;

    let body = send(&app, "GET", "/api/channel/1", None).await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("solo"));
    assert!(body["data"].get("key").is_none());
    assert!(!body.to_string().contains("sk-secret"));
}

#[tokio::test]
async fn test_get_unknown_id_is_failure_envelope() {
    let (app, _) = create_test_app();

    let body = send(&app, "GET", "/api/channel/404", None).await;

    assert_eq!(body["success"], json!(false));
    assert!(body.get("data").is_none());
}

// ===== Envelope Tests =====

#[tokio::test]
async fn test_malformed_json_is_failure_envelope() {
    let (app, _) = create_test_app();

    let request = Request::builder()
        .uri("/api/channel/")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(false));
}

#[rstest]
#[case("/api/channel/abc")]
#[case("/api/channel/?p=first")]
#[case("/api/channel/search?id_sort=maybe")]
#[case("/api/channel/fetch_models/-x")]
#[tokio::test]
async fn test_bad_request_is_failure_envelope(#[case] uri: &str) {
    let (app, _) = create_test_app();

    let body = send(&app, "GET", uri, None).await;

    assert_eq!(body["success"], json!(false));
}

#[rstest]
#[case("GET", "/api/channel/disabled")]
#[case("GET", "/api/channel/batch")]
#[case("POST", "/api/channel/tag")]
#[case("PATCH", "/api/channel/1")]
#[case("GET", "/api/channel/tag/unknown")]
#[tokio::test]
async fn test_unrouted_request_is_failure_envelope(#[case] verb: &str, #[case] uri: &str) {
    let (app, _) = create_test_app();

    let body = send(&app, verb, uri, None).await;

    assert_eq!(body["success"], json!(false));
    assert!(!body["message"].as_str().unwrap().is_empty());
}

// ===== Listing Tests =====

#[tokio::test]
async fn test_listing_pulls_in_whole_tag_group() {
    let (app, store) = create_test_app();
    seed(
        &store,
        vec![
            tagged("a1", "A", 1),
            tagged("a2", "A", 1),
            Channel::new(ChannelType::OpenAI, "top", "sk-top").with_priority(9),
            tagged("a3", "A", 1),
        ],
    )
    .await;

    let body = send(&app, "GET", "/api/channel/?p=0&page_size=2", None).await;

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"top"));
    for member in ["a1", "a2", "a3"] {
        assert!(names.contains(&member), "missing {}", member);
    }
    assert_eq!(names.len(), 4);
}

#[tokio::test]
async fn test_search_by_keyword() {
    let (app, store) = create_test_app();
    seed(
        &store,
        vec![
            Channel::new(ChannelType::OpenAI, "Primary OpenAI", "sk-1"),
            Channel::new(ChannelType::Anthropic, "claude", "sk-2"),
        ],
    )
    .await;

    let body = send(&app, "GET", "/api/channel/search?keyword=primary", None).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], json!("Primary OpenAI"));
}

// ===== Update / Delete Tests =====

#[tokio::test]
async fn test_update_merges_present_fields() {
    let (app, store) = create_test_app();
    seed(&store, vec![Channel::new(ChannelType::OpenAI, "before", "sk-keep").with_priority(3)]).await;

    let body = send(
        &app,
        "PUT",
        "/api/channel/",
        Some(json!({"id": 1, "name": "after", "key": ""})),
    )
    .await;

    assert_eq!(body["success"], json!(true));
    let stored = store.get_channel(1.into()).await.unwrap().unwrap();
    assert_eq!(stored.name, "after");
    assert_eq!(stored.key, "sk-keep");
    assert_eq!(stored.priority, 3);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let (app, store) = create_test_app();
    seed(&store, vec![Channel::new(ChannelType::OpenAI, "gone", "sk")]).await;

    let first = send(&app, "DELETE", "/api/channel/1", None).await;
    let second = send(&app, "DELETE", "/api/channel/1", None).await;

    assert_eq!(first["success"], json!(true));
    assert_eq!(second["success"], json!(false));
}

#[tokio::test]
async fn test_batch_delete_requires_ids() {
    let (app, _) = create_test_app();

    let body = send(&app, "POST", "/api/channel/batch", Some(json!({"ids": []}))).await;

    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_delete_disabled_channels() {
    let (app, store) = create_test_app();
    let mut disabled = Channel::new(ChannelType::OpenAI, "off", "sk-off");
    disabled.status = ChannelStatus::AutoDisabled;
    seed(&store, vec![disabled, Channel::new(ChannelType::OpenAI, "on", "sk-on")]).await;

    let body = send(&app, "DELETE", "/api/channel/disabled", None).await;

    assert_eq!(body["data"]["count"], json!(1));
    assert_eq!(store.len().await, 1);
}

// ===== Tag Tests =====

#[tokio::test]
async fn test_disable_and_enable_tag() {
    let (app, store) = create_test_app();
    seed(&store, vec![tagged("a1", "A", 0), tagged("a2", "A", 0), tagged("b1", "B", 0)]).await;

    let body = send(&app, "POST", "/api/channel/tag/disabled", Some(json!({"tag": "A"}))).await;
    assert_eq!(body["data"]["count"], json!(2));
    assert!(store.channels_by_tag("A").await.unwrap().iter().all(|c| !c.is_enabled()));
    assert!(store.channels_by_tag("B").await.unwrap()[0].is_enabled());

    send(&app, "POST", "/api/channel/tag/enabled", Some(json!({"tag": "A"}))).await;
    assert!(store.channels_by_tag("A").await.unwrap().iter().all(|c| c.is_enabled()));
}

#[tokio::test]
async fn test_blank_tag_is_rejected() {
    let (app, _) = create_test_app();

    let body = send(&app, "POST", "/api/channel/tag/disabled", Some(json!({"tag": "  "}))).await;

    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_edit_tag_priority_only() {
    let (app, store) = create_test_app();
    seed(&store, vec![tagged("a1", "A", 1), tagged("a2", "A", 2)]).await;

    let body = send(&app, "PUT", "/api/channel/tag", Some(json!({"tag": "A", "priority": 5}))).await;

    assert_eq!(body["data"]["count"], json!(2));
    let group = store.channels_by_tag("A").await.unwrap();
    assert!(group.iter().all(|c| c.priority == 5));
    assert_eq!(group[0].key, "sk-a1");
}

// ===== Discovery Tests =====

#[tokio::test]
async fn test_fetch_models_from_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header_match("authorization", "Bearer sk-live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": "gpt-4o"}, {"id": "gpt-4o-mini"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (app, store) = create_test_app();
    seed(
        &store,
        vec![Channel::new(ChannelType::OpenAI, "live", "sk-live").with_base_url(server.uri())],
    )
    .await;

    let body = send(&app, "GET", "/api/channel/fetch_models/1", None).await;

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!(["gpt-4o", "gpt-4o-mini"]));
}

#[tokio::test]
async fn test_fetch_models_unsupported_provider() {
    let (app, store) = create_test_app();
    seed(&store, vec![Channel::new(ChannelType::Anthropic, "claude", "sk")]).await;

    let body = send(&app, "GET", "/api/channel/fetch_models/1", None).await;

    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_fix_reports_indexed_channels() {
    let (app, store) = create_test_app();
    seed(&store, vec![tagged("a1", "A", 0), tagged("a2", "A", 0)]).await;

    let body = send(&app, "POST", "/api/channel/fix", None).await;

    assert_eq!(body["data"]["count"], json!(2));
}
