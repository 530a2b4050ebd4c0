use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use configuration::Settings;
use core_types::Session;
use database::MemoryStore;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use web_server::{AppState, build_router};

const KEY: &str = "test-key";

fn sessions() -> Vec<Session> {
    serde_json::from_value(json!([
        {
            "date": "2024-03-01", "type": "cash", "stakes": "NL50", "gameType": "NLHE",
            "duration": 90, "profitBB": 40, "profitDollars": 20, "hands": 200
        },
        {
            "date": "2024-03-05", "type": "cash", "stakes": "NL50", "gameType": "NLHE",
            "durationMinutes": 45, "profitUnits": -10, "profitMoney": -5, "handsPlayed": 100
        },
        {
            "date": "2024-02-20", "type": "tournament", "gameType": "MTT",
            "duration": 240, "buyIn": 20, "cashOut": 100
        }
    ]))
    .unwrap()
}

fn app_with(api_key: Option<&str>) -> Router {
    let mut settings = Settings::default();
    settings.auth.api_key = api_key.map(str::to_string);
    let state = AppState::new(&settings, MemoryStore::from_sessions(sessions())).unwrap();
    build_router(Arc::new(state), "*").unwrap()
}

fn app() -> Router {
    app_with(Some(KEY))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {KEY}"))
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {KEY}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn number(value: &Value) -> f64 {
    value.as_f64().unwrap_or_else(|| panic!("not a number: {value}"))
}

#[tokio::test]
async fn health_is_public() {
    let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();
    let (status, body) = call(&app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn protected_routes_check_the_bearer_token() {
    let app = app();

    let missing = Request::builder().uri("/api/stats/summary").body(Body::empty()).unwrap();
    let (status, body) = call(&app, missing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing Authorization header");

    let malformed = Request::builder()
        .uri("/api/stats/summary")
        .header(header::AUTHORIZATION, KEY)
        .body(Body::empty())
        .unwrap();
    assert_eq!(call(&app, malformed).await.0, StatusCode::UNAUTHORIZED);

    let wrong = Request::builder()
        .uri("/api/stats/summary")
        .header(header::AUTHORIZATION, "Bearer other-key")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, wrong).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn missing_server_key_is_reported_as_misconfiguration() {
    let (status, body) = call(&app_with(None), get("/api/stats/summary")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Server misconfigured");
}

#[tokio::test]
async fn summary_applies_filters_and_reports_meta() {
    let (status, body) = call(&app(), get("/api/stats/summary?type=cash&from=2024-03-01")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalSessions"], 2);
    assert_eq!(body["data"]["tournamentSessions"], 0);
    assert_eq!(number(&body["data"]["cash"]["totalProfitUnits"]), 30.0);
    assert_eq!(number(&body["data"]["cash"]["unitsPer100"]), 10.0);

    let meta = &body["meta"];
    assert_eq!(meta["totalSessions"], 3);
    assert_eq!(meta["filteredSessions"], 2);
    assert_eq!(meta["filters"], json!({ "from": "2024-03-01", "type": "cash" }));
    assert!(meta["cacheAgeSeconds"].is_u64());
}

#[tokio::test]
async fn invalid_filters_are_bad_requests() {
    let (status, body) = call(&app(), get("/api/stats/summary?from=yesterday")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("from"));
}

#[tokio::test]
async fn duration_buckets_fall_back_to_defaults() {
    let app = app();

    let (_, body) = call(&app, get("/api/stats/by-duration?buckets=abc,60")).await;
    let buckets = body["data"]["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 6);
    assert_eq!(buckets[5]["range"], "240min+");

    let (_, body) = call(&app, get("/api/stats/by-duration?buckets=0,60")).await;
    let buckets = body["data"]["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0]["sessions"], 1);
    assert_eq!(buckets[1]["sessions"], 2);
    assert_eq!(buckets[1]["maxMinutes"], Value::Null);
}

#[tokio::test]
async fn trend_window_is_defaulted_and_clamped() {
    let app = app();

    let (_, body) = call(&app, get("/api/stats/trends")).await;
    assert_eq!(body["data"]["windowSize"], 20);
    assert_eq!(body["data"]["dataPoints"].as_array().unwrap().len(), 3);

    let (_, body) = call(&app, get("/api/stats/trends?window=5000")).await;
    assert_eq!(body["data"]["windowSize"], 200);

    let (_, body) = call(&app, get("/api/stats/trends?window=-4")).await;
    assert_eq!(body["data"]["windowSize"], 1);

    let (_, body) = call(&app, get("/api/stats/trends?window=2")).await;
    let points = body["data"]["dataPoints"].as_array().unwrap();
    assert_eq!(points[0]["date"], "2024-02-20");
    assert_eq!(number(&points[2]["cumulativeProfitMoney"]), 95.0);
}

#[tokio::test]
async fn day_and_game_type_views() {
    let app = app();

    let (_, body) = call(&app, get("/api/stats/by-day")).await;
    assert_eq!(body["data"]["days"].as_array().unwrap().len(), 7);

    let (_, body) = call(&app, get("/api/stats/by-game-type")).await;
    let groups = body["data"]["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["type"], "cash");
    assert_eq!(groups[0]["sessions"], 2);
    assert_eq!(groups[1]["gameType"], "MTT");
}

#[tokio::test]
async fn sessions_are_paged_most_recent_first() {
    let (status, body) = call(&app(), get("/api/sessions?limit=2")).await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["date"], "2024-03-05");
    assert_eq!(data[1]["date"], "2024-03-01");
    assert_eq!(
        body["pagination"],
        json!({ "total": 3, "limit": 2, "offset": 0, "hasMore": true })
    );
}

#[tokio::test]
async fn writes_derive_money_and_refresh_the_cache() {
    let app = app();
    call(&app, get("/api/stats/summary")).await;

    let (status, body) = call(
        &app,
        send_json(
            "POST",
            "/api/sessions",
            json!({ "date": "2024-04-01", "type": "cash", "stakes": "NL200", "profitBB": 50, "hands": 300 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(number(&body["data"]["profitMoney"]), 100.0);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, summary) = call(&app, get("/api/stats/summary")).await;
    assert_eq!(summary["data"]["totalSessions"], 4);

    let (status, body) = call(
        &app,
        send_json(
            "PUT",
            &format!("/api/sessions/{id}"),
            json!({ "date": "2024-04-01", "type": "cash", "stakes": "NL10", "profitBB": 50 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(number(&body["data"]["profitMoney"]), 5.0);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/sessions/{id}"))
        .header(header::AUTHORIZATION, format!("Bearer {KEY}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(call(&app, delete).await.0, StatusCode::OK);

    let (_, summary) = call(&app, get("/api/stats/summary")).await;
    assert_eq!(summary["data"]["totalSessions"], 3);
}

#[tokio::test]
async fn write_errors_map_to_client_statuses() {
    let app = app();
    let session = json!({ "date": "2024-04-01", "type": "tournament", "buyIn": 10 });

    let missing = format!("/api/sessions/{}", uuid::Uuid::new_v4());
    let (status, body) = call(&app, send_json("PUT", &missing, session.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");

    let (status, _) = call(&app, send_json("PUT", "/api/sessions/not-a-uuid", session)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, send_json("POST", "/api/sessions", json!({ "type": "poker" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn writes_reject_negative_tournament_money_and_oversized_amounts() {
    let app = app();

    let (status, body) = call(
        &app,
        send_json(
            "POST",
            "/api/sessions",
            json!({ "date": "2024-04-01", "type": "tournament", "buyIn": -20, "cashOut": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("buyIn"));

    let (status, body) = call(
        &app,
        send_json(
            "POST",
            "/api/sessions",
            json!({ "date": "2024-04-01", "type": "cash", "stakes": "NL50", "profitUnits": 1e27, "hands": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("profitUnits"));

    let (_, summary) = call(&app, get("/api/stats/summary")).await;
    assert_eq!(summary["data"]["totalSessions"], 3);
}

#[tokio::test]
async fn stats_survive_oversized_stored_sessions() {
    let mut stored = sessions();
    stored.push(
        serde_json::from_value(json!({
            "date": "2024-03-10", "type": "cash", "stakes": "NL50",
            "profitUnits": 1e27, "profitMoney": 5e26, "hands": 1
        }))
        .unwrap(),
    );
    let mut settings = Settings::default();
    settings.auth.api_key = Some(KEY.to_string());
    let state = AppState::new(&settings, MemoryStore::from_sessions(stored)).unwrap();
    let app = build_router(Arc::new(state), "*").unwrap();

    for uri in [
        "/api/stats/summary",
        "/api/stats/by-duration",
        "/api/stats/by-game-type",
        "/api/stats/by-day",
        "/api/stats/trends",
    ] {
        let (status, _) = call(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn cache_can_be_cleared() {
    let app = app();
    call(&app, get("/api/stats/summary")).await;

    let clear = Request::builder()
        .method("POST")
        .uri("/api/cache/clear")
        .header(header::AUTHORIZATION, format!("Bearer {KEY}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, clear).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cache cleared");
}

#[tokio::test]
async fn unknown_routes_list_the_endpoints_to_authenticated_clients() {
    let app = app();

    let (status, body) = call(&app, get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["availableEndpoints"].as_array().unwrap().len(), 11);

    let anonymous = Request::builder().uri("/api/nope").body(Body::empty()).unwrap();
    assert_eq!(call(&app, anonymous).await.0, StatusCode::UNAUTHORIZED);
}
