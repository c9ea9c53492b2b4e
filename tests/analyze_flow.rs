use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use baitcheck::{
    api,
    app_state::AppState,
    config::Config,
    settings::{OllamaSettings, SettingsUpdate},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Build an app wired to a mock Ollama server, with setup already complete.
fn test_app(provider_uri: &str, data_dir: &std::path::Path) -> (Router, AppState) {
    let config = Config::new("127.0.0.1:0", data_dir);
    let state = AppState::new(&config).expect("Failed to build app state");
    state
        .update_settings(SettingsUpdate {
            ollama: Some(OllamaSettings {
                base_url: provider_uri.to_string(),
                ..OllamaSettings::default()
            }),
            ..SettingsUpdate::default()
        })
        .unwrap();
    state.settings.mark_setup_complete().unwrap();
    (api::router(state.clone()), state)
}

fn page_html(title: &str, content_chars: usize) -> String {
    format!(
        "<html><head><title>{title}</title></head><body><article>{}</article></body></html>",
        "lorem ".repeat(content_chars / 6 + 1)
    )
}

async fn mount_healthy_provider(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn analyze_end_to_end_clickbait_verdict() {
    let provider = MockServer::start().await;
    mount_healthy_provider(&provider).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "CLICKBAIT: because it withholds the payoff."
        })))
        .mount(&provider)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&provider.uri(), dir.path());

    let response = app
        .oneshot(post_json(
            "/api/tabs/5/analyze",
            json!({
                "url": "https://news.example/article",
                "html": page_html("You Won't Believe This!", 300),
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["cached"], json!(false));
    assert_eq!(body["result"]["is_clickbait"], json!(true));
    assert_eq!(
        body["result"]["explanation"],
        json!("because it withholds the payoff.")
    );
    assert_eq!(body["result"]["url"], json!("https://news.example/article"));
}

#[tokio::test]
async fn second_analyze_hits_cache_without_network() {
    let provider = MockServer::start().await;
    mount_healthy_provider(&provider).await;
    // A second generation call would trip the expect(1).
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "NOT CLICKBAIT: accurate title."
        })))
        .expect(1)
        .mount(&provider)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&provider.uri(), dir.path());

    let payload = json!({
        "url": "https://news.example/a",
        "html": page_html("Quarterly results", 400),
    });

    let first = app
        .clone()
        .oneshot(post_json("/api/tabs/5/analyze", payload.clone()))
        .await
        .unwrap();
    assert_eq!(body_json(first).await["cached"], json!(false));

    let second = app
        .oneshot(post_json("/api/tabs/5/analyze", payload))
        .await
        .unwrap();
    let body = body_json(second).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["cached"], json!(true));
}

#[tokio::test]
async fn provider_error_reports_status_and_error_badge() {
    let provider = MockServer::start().await;
    mount_healthy_provider(&provider).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&provider)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&provider.uri(), dir.path());

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/tabs/7/analyze",
            json!({
                "url": "https://news.example/b",
                "html": page_html("Some Title", 300),
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("500"));

    let badge = app.oneshot(get("/api/tabs/7/badge")).await.unwrap();
    let badge = body_json(badge).await;
    assert_eq!(badge["status"], json!("error"));
    assert_eq!(badge["text"], json!("ERR"));
    assert_eq!(badge["color"], json!("#FF9800"));
}

#[tokio::test]
async fn unavailable_provider_fails_fast() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&provider)
        .await;
    // No /api/generate mock: reaching it would 404 and fail differently.

    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&provider.uri(), dir.path());

    let response = app
        .oneshot(post_json(
            "/api/tabs/1/analyze",
            json!({
                "url": "https://news.example/c",
                "html": page_html("Title", 300),
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Local LLM is not available")
    );
}

#[tokio::test]
async fn navigation_clears_result_and_badge() {
    let provider = MockServer::start().await;
    mount_healthy_provider(&provider).await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "CLICKBAIT: bait."
        })))
        .mount(&provider)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&provider.uri(), dir.path());

    app.clone()
        .oneshot(post_json(
            "/api/tabs/5/analyze",
            json!({
                "url": "https://news.example/old",
                "html": page_html("Old Page", 300),
            }),
        ))
        .await
        .unwrap();

    let navigated = app
        .clone()
        .oneshot(post_json(
            "/api/tabs/5/navigated",
            json!({ "url": "https://news.example/new" }),
        ))
        .await
        .unwrap();
    assert_eq!(navigated.status(), StatusCode::OK);

    let result = app
        .clone()
        .oneshot(get("/api/tabs/5/result"))
        .await
        .unwrap();
    let result = body_json(result).await;
    assert_eq!(result["result"], Value::Null);
    assert_eq!(result["is_analyzing"], json!(false));

    let badge = app.oneshot(get("/api/tabs/5/badge")).await.unwrap();
    assert_eq!(body_json(badge).await["status"], json!("idle"));
}

#[tokio::test]
async fn navigation_on_never_analyzed_tab_is_fine() {
    let provider = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&provider.uri(), dir.path());

    let response = app
        .oneshot(post_json(
            "/api/tabs/42/navigated",
            json!({ "url": "https://example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn analyze_requires_completed_setup() {
    let provider = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new("127.0.0.1:0", dir.path());
    let state = AppState::new(&config).unwrap();
    state
        .update_settings(SettingsUpdate {
            ollama: Some(OllamaSettings {
                base_url: provider.uri(),
                ..OllamaSettings::default()
            }),
            ..SettingsUpdate::default()
        })
        .unwrap();
    let app = api::router(state);

    let response = app
        .oneshot(post_json(
            "/api/tabs/1/analyze",
            json!({
                "url": "https://news.example/d",
                "html": page_html("Title", 300),
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Please complete the setup wizard first"));
}

#[tokio::test]
async fn auto_analyze_hint_follows_settings_and_scheme() {
    let provider = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, state) = test_app(&provider.uri(), dir.path());

    // Disabled by default.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/tabs/1/ready",
            json!({ "url": "https://example.com" }),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["schedule_analysis"], json!(false));

    state
        .update_settings(SettingsUpdate {
            options: Some(baitcheck::settings::AnalysisOptions {
                auto_analyze: true,
                show_notifications: true,
            }),
            ..SettingsUpdate::default()
        })
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/tabs/1/ready",
            json!({ "url": "https://example.com" }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["schedule_analysis"], json!(true));
    assert_eq!(body["delay_ms"], json!(500));

    // Non-http schemes are never auto-analyzed.
    let response = app
        .oneshot(post_json(
            "/api/tabs/1/ready",
            json!({ "url": "about:blank" }),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["schedule_analysis"], json!(false));
}

#[tokio::test]
async fn settings_round_trip_over_http() {
    let provider = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&provider.uri(), dir.path());

    let update = Request::builder()
        .method("PUT")
        .uri("/api/settings")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "provider": "koboldai" }).to_string(),
        ))
        .unwrap();
    let response = app.clone().oneshot(update).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["settings"]["provider"], json!("koboldai"));

    let response = app.oneshot(get("/api/settings")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["settings"]["provider"], json!("koboldai"));
    // Untouched sections keep defaults.
    assert_eq!(body["settings"]["ollama"]["model"], json!("llama2"));
}

#[tokio::test]
async fn availability_and_models_endpoints() {
    let provider = MockServer::start().await;
    mount_healthy_provider(&provider).await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [ { "name": "llama2" } ]
        })))
        .mount(&provider)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&provider.uri(), dir.path());

    let response = app
        .clone()
        .oneshot(get("/api/provider/availability"))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["available"], json!(true));

    let response = app.oneshot(get("/api/provider/models")).await.unwrap();
    assert_eq!(body_json(response).await["models"], json!(["llama2"]));
}

#[tokio::test]
async fn setup_endpoints_flip_the_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new("127.0.0.1:0", dir.path());
    let state = AppState::new(&config).unwrap();
    let app = api::router(state);

    let response = app.clone().oneshot(get("/api/setup")).await.unwrap();
    assert_eq!(body_json(response).await["setup_complete"], json!(false));

    let response = app
        .clone()
        .oneshot(post_json("/api/setup/complete", json!({})))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["setup_complete"], json!(true));

    let response = app.oneshot(get("/api/setup")).await.unwrap();
    assert_eq!(body_json(response).await["setup_complete"], json!(true));
}

#[tokio::test]
async fn extract_endpoint_returns_page_data() {
    let provider = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (app, _) = test_app(&provider.uri(), dir.path());

    let response = app
        .oneshot(post_json(
            "/api/extract",
            json!({
                "url": "https://news.example/e",
                "html": page_html("A Plain Title", 300),
            }),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["title"], json!("A Plain Title"));
    assert_eq!(body["data"]["url"], json!("https://news.example/e"));
    assert!(body["data"]["content"].as_str().unwrap().len() > 200);
}
