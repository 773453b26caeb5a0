use actix_web::{test, web, App};
use chrono::{Duration as ChronoDuration, Utc};
use newsdesk_server::db::DbOperations;
use newsdesk_server::error::AppError;
use newsdesk_server::news::handlers::{news_by_category, single_news_by_category};
use newsdesk_server::{AppState, Settings};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// State pointed at the mock upstream. The pool is lazy: none of these
/// routes touch the database.
fn state_for(mock_uri: &str) -> AppState {
    let mut config = Settings::new_for_test().expect("Failed to load test config");
    config.news.base_url = mock_uri.to_string();
    build_state(config)
}

fn build_state(config: Settings) -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database.url)
        .expect("Failed to create lazy pool");
    AppState::with_db(config, DbOperations::new(Arc::new(pool))).expect("Failed to build state")
}

fn bearer(state: &AppState) -> String {
    let token = state
        .auth
        .generate_token(1, "reader@example.com")
        .expect("Failed to generate token");
    format!("Bearer {}", token)
}

macro_rules! news_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::JsonConfig::default().error_handler(|_err, _req| {
                    AppError::ValidationError("Invalid input".to_string()).into()
                }))
                .route("/api/newsByCategory", web::post().to(news_by_category))
                .route(
                    "/api/SingleNewsByCategory",
                    web::post().to(single_news_by_category),
                ),
        )
        .await
    };
}

fn articles_body(articles: serde_json::Value) -> serde_json::Value {
    json!({
        "status": "ok",
        "totalResults": articles.as_array().map(Vec::len).unwrap_or(0),
        "articles": articles
    })
}

#[actix_web::test]
async fn test_news_requires_valid_token() {
    let state = state_for("http://127.0.0.1:9");
    let app = news_app!(state);

    // No Authorization header
    let response = test::TestRequest::post()
        .uri("/api/newsByCategory")
        .set_json(json!({ "category": ["tech"] }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Unauthorized");

    // Garbage bearer token
    let response = test::TestRequest::post()
        .uri("/api/newsByCategory")
        .insert_header(("Authorization", "Bearer not.a.token"))
        .set_json(json!({ "category": ["tech"] }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 403);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Invalid token");
}

#[actix_web::test]
async fn test_news_by_category_rejects_bad_categories() {
    let state = state_for("http://127.0.0.1:9");
    let token = bearer(&state);
    let app = news_app!(state);

    for body in [
        json!({}),
        json!({ "category": [] }),
        json!({ "category": "tech" }),
        json!({ "category": ["tech", 42] }),
    ] {
        let response = test::TestRequest::post()
            .uri("/api/newsByCategory")
            .insert_header(("Authorization", token.clone()))
            .set_json(body)
            .send_request(&app)
            .await;
        assert_eq!(response.status(), 400);
        let parsed: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(
            parsed["message"],
            "Categories array is required and must not be empty"
        );
    }
}

#[actix_web::test]
async fn test_fan_out_merges_in_request_order_and_skips_failures() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "alpha"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body(json!([
            { "title": "a1" },
            { "title": "a2" }
        ]))))
        .mount(&mock)
        .await;
    // One topic failing upstream must not take the others down
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "beta"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "gamma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body(json!([
            { "title": "c1" }
        ]))))
        .mount(&mock)
        .await;

    let state = state_for(&mock.uri());
    let token = bearer(&state);
    let app = news_app!(state);

    let response = test::TestRequest::post()
        .uri("/api/newsByCategory")
        .insert_header(("Authorization", token))
        .set_json(json!({ "category": ["alpha", "beta", "gamma"] }))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "success");
    assert_eq!(
        body["news"],
        json!([{ "title": "a1" }, { "title": "a2" }, { "title": "c1" }])
    );
}

#[actix_web::test]
async fn test_fan_out_keeps_duplicate_articles() {
    let mock = MockServer::start().await;
    let shared = json!([{ "title": "same story", "url": "https://example.com/s" }]);

    for topic in ["rust", "rustlang"] {
        Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .and(query_param("q", topic))
            .respond_with(ResponseTemplate::new(200).set_body_json(articles_body(shared.clone())))
            .mount(&mock)
            .await;
    }

    let state = state_for(&mock.uri());
    let token = bearer(&state);
    let app = news_app!(state);

    let response = test::TestRequest::post()
        .uri("/api/newsByCategory")
        .insert_header(("Authorization", token))
        .set_json(json!({ "category": ["rust", "rustlang"] }))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    // Merge concatenates; it does not deduplicate across topics
    assert_eq!(body["news"].as_array().map(Vec::len), Some(2));
}

#[actix_web::test]
async fn test_missing_api_key_fails_whole_request() {
    let mut config = Settings::new_for_test().expect("Failed to load test config");
    config.news.api_key = String::new();
    let state = build_state(config);
    let token = bearer(&state);
    let app = news_app!(state);

    let response = test::TestRequest::post()
        .uri("/api/newsByCategory")
        .insert_header(("Authorization", token.clone()))
        .set_json(json!({ "category": ["tech"] }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 500);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "News API key missing");

    let response = test::TestRequest::post()
        .uri("/api/SingleNewsByCategory")
        .set_json(json!({ "category": "tech" }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 500);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "News API key missing");
}

#[actix_web::test]
async fn test_single_news_sends_full_query() {
    let mock = MockServer::start().await;
    let from_date = (Utc::now() - ChronoDuration::days(7))
        .format("%Y-%m-%d")
        .to_string();

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "solar"))
        .and(query_param("from", from_date.as_str()))
        .and(query_param("sortBy", "publishedAt"))
        .and(query_param("apiKey", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body(json!([
            { "title": "s1" }
        ]))))
        .expect(1)
        .mount(&mock)
        .await;

    let state = state_for(&mock.uri());
    let app = news_app!(state);

    let response = test::TestRequest::post()
        .uri("/api/SingleNewsByCategory")
        .set_json(json!({ "category": "solar" }))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "success");
    assert_eq!(body["news"], json!([{ "title": "s1" }]));
}

#[actix_web::test]
async fn test_single_news_failure_and_validation() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock)
        .await;

    let state = state_for(&mock.uri());
    let app = news_app!(state);

    // Unlike the fan-out, a single-topic failure is surfaced
    let response = test::TestRequest::post()
        .uri("/api/SingleNewsByCategory")
        .set_json(json!({ "category": "tech" }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 500);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Failed to fetch news");

    for bad in [json!({}), json!({ "category": "" })] {
        let response = test::TestRequest::post()
            .uri("/api/SingleNewsByCategory")
            .set_json(bad)
            .send_request(&app)
            .await;
        assert_eq!(response.status(), 400);
        let parsed: serde_json::Value = test::read_body_json(response).await;
        assert_eq!(parsed["message"], "Category is required");
    }
}

#[actix_web::test]
async fn test_slow_upstream_degrades_topic_to_empty() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(articles_body(json!([{ "title": "never seen" }])))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .and(query_param("q", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles_body(json!([
            { "title": "f1" }
        ]))))
        .mount(&mock)
        .await;

    let mut config = Settings::new_for_test().expect("Failed to load test config");
    config.news.base_url = mock.uri();
    config.news.timeout_seconds = 1;
    let state = build_state(config);
    let token = bearer(&state);
    let app = news_app!(state);

    let response = test::TestRequest::post()
        .uri("/api/newsByCategory")
        .insert_header(("Authorization", token))
        .set_json(json!({ "category": ["slow", "fast"] }))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["news"], json!([{ "title": "f1" }]));
}

#[actix_web::test]
async fn test_2xx_without_articles_field_is_empty() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/everything"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&mock)
        .await;

    let state = state_for(&mock.uri());
    let token = bearer(&state);
    let app = news_app!(state);

    let response = test::TestRequest::post()
        .uri("/api/newsByCategory")
        .insert_header(("Authorization", token))
        .set_json(json!({ "category": ["tech"] }))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["news"], json!([]));
    assert_eq!(body["message"], "success");
}
