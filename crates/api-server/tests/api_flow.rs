//! End-to-end flow over the in-process router: sign up, walk the wizard to
//! handoff, and pay at the checkout boundary.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use linkbloom_api::handlers::AppState;
use linkbloom_api::{app_router, AppStore};
use linkbloom_auth::IdentityService;
use linkbloom_core::config::AuthConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_router() -> Router {
    let state = AppState {
        store: Arc::new(AppStore::new()),
        identity: Arc::new(IdentityService::new(&AuthConfig::default())),
        // No artificial delay in tests.
        payment_delay: Duration::from_millis(0),
        start_time: Instant::now(),
    };
    app_router(state)
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let resp = router.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body, location)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request build"),
        None => builder.body(Body::empty()).expect("request build"),
    }
}

async fn sign_up(router: &Router, email: &str) -> String {
    let (status, body, _) = send(
        router,
        request(
            "POST",
            "/api/v1/auth/signup",
            None,
            Some(json!({ "email": email, "password": "hunter2" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().expect("token").to_string()
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let router = test_router();

    let (status, _, _) = send(&router, request("GET", "/api/v1/dashboard", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Browser navigations are redirected to the login view instead.
    let req = Request::builder()
        .method("GET")
        .uri("/api/v1/dashboard")
        .header(header::ACCEPT, "text/html")
        .body(Body::empty())
        .expect("request build");
    let (status, _, location) = send(&router, req).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/auth"));

    // Health probes stay public.
    let (status, _, _) = send(&router, request("GET", "/health", None, None)).await;
    assert_eq!(status, StatusCode::OK);

    // The not-found fallback is public too.
    let (status, body, _) = send(&router, request("GET", "/bogus", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn login_rejection_is_a_401_with_a_message() {
    let router = test_router();
    let (status, body, _) = send(
        &router,
        request(
            "POST",
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "nope" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_failed");
}

#[tokio::test]
async fn oauth_start_returns_the_provider_redirect() {
    let router = test_router();
    let (status, body, _) = send(
        &router,
        request("POST", "/api/v1/auth/oauth/google", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let redirect = body["redirect_to"].as_str().expect("redirect url");
    assert!(redirect.ends_with("?provider=google"));
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let router = test_router();
    let token = sign_up(&router, "user@example.com").await;

    let (status, _, _) = send(
        &router,
        request("GET", "/api/v1/dashboard", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(
        &router,
        request("POST", "/api/v1/auth/logout", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = send(
        &router,
        request("GET", "/api/v1/dashboard", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wizard_flow_to_payment() {
    let router = test_router();
    let token = sign_up(&router, "buyer@example.com").await;

    // Start the wizard.
    let (status, body, _) = send(
        &router,
        request("POST", "/api/v1/wizard", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["step"], "sites");
    assert_eq!(body["can_advance"], false);

    // Advancing an empty sites step stays put.
    let (status, body, _) = send(
        &router,
        request("POST", "/api/v1/wizard/advance", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "sites");

    // Name + sites.
    send(
        &router,
        request(
            "PUT",
            "/api/v1/wizard/name",
            Some(&token),
            Some(json!({ "campaign_name": "Spring Push" })),
        ),
    )
    .await;
    for site in ["site1", "site4"] {
        send(
            &router,
            request(
                "POST",
                "/api/v1/wizard/sites",
                Some(&token),
                Some(json!({ "site_id": site, "included": true })),
            ),
        )
        .await;
    }
    let (_, body, _) = send(&router, request("GET", "/api/v1/wizard", Some(&token), None)).await;
    assert_eq!(body["total_price"], 350.0);
    assert_eq!(body["can_advance"], true);

    // Sites -> links.
    let (_, body, _) = send(
        &router,
        request("POST", "/api/v1/wizard/advance", Some(&token), None),
    )
    .await;
    assert_eq!(body["step"], "links");

    // One complete link.
    let (_, body, _) = send(
        &router,
        request("POST", "/api/v1/wizard/links", Some(&token), None),
    )
    .await;
    let link_id = body["links"][0]["id"].as_u64().expect("link id");
    assert_eq!(body["links"][0]["site_id"], "site1");
    for (field, value) in [("anchor_text", "click here"), ("url", "https://example.com")] {
        send(
            &router,
            request(
                "PUT",
                &format!("/api/v1/wizard/links/{link_id}"),
                Some(&token),
                Some(json!({ "field": field, "value": value })),
            ),
        )
        .await;
    }

    // Links -> review -> handoff.
    let (_, body, _) = send(
        &router,
        request("POST", "/api/v1/wizard/advance", Some(&token), None),
    )
    .await;
    assert_eq!(body["step"], "review");

    let (_, body, _) = send(
        &router,
        request("POST", "/api/v1/wizard/advance", Some(&token), None),
    )
    .await;
    let handoff_id = body["handoff_id"].as_str().expect("handoff id").to_string();
    let snapshot = &body["snapshot"];
    assert_eq!(snapshot["campaign_name"], "Spring Push");
    assert_eq!(snapshot["selected_sites"], json!(["site1", "site4"]));
    assert_eq!(snapshot["total_price"], 350.0);
    assert_eq!(snapshot["links"].as_array().map(|l| l.len()), Some(1));

    // Checkout renders the snapshot, then payment consumes it.
    let (status, body, _) = send(
        &router,
        request(
            "GET",
            &format!("/api/v1/checkout/{handoff_id}"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["snapshot"]["campaign_name"], "Spring Push");

    let (status, body, _) = send(
        &router,
        request(
            "POST",
            &format!("/api/v1/checkout/{handoff_id}/pay"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payment_success"], true);
    assert_eq!(body["campaign_name"], "Spring Push");
    assert_eq!(body["redirect_to"], "/");

    // The handoff is consumed: paying again redirects like direct access.
    let (status, _, location) = send(
        &router,
        request(
            "POST",
            &format!("/api/v1/checkout/{handoff_id}/pay"),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/campaign/new"));

    // The purchased campaign shows up in the list.
    let (_, body, _) = send(
        &router,
        request("GET", "/api/v1/campaigns", Some(&token), None),
    )
    .await;
    let titles: Vec<&str> = body
        .as_array()
        .expect("campaign list")
        .iter()
        .filter_map(|c| c["title"].as_str())
        .collect();
    assert!(titles.contains(&"Spring Push"));
}

#[tokio::test]
async fn checkout_without_a_handoff_redirects_to_the_wizard() {
    let router = test_router();
    let token = sign_up(&router, "direct@example.com").await;

    let (status, _, location) = send(
        &router,
        request(
            "GET",
            "/api/v1/checkout/00000000-0000-0000-0000-000000000000",
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/campaign/new"));
}

#[tokio::test]
async fn wizard_ops_without_a_session_wizard_are_not_found() {
    let router = test_router();
    let token = sign_up(&router, "fresh@example.com").await;

    let (status, body, _) = send(&router, request("GET", "/api/v1/wizard", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no_wizard");

    let (status, _, _) = send(
        &router,
        request("POST", "/api/v1/wizard/retreat", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_lists_the_demo_sites() {
    let router = test_router();
    let token = sign_up(&router, "browse@example.com").await;

    let (status, body, _) = send(
        &router,
        request("GET", "/api/v1/catalog/sites", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let sites = body.as_array().expect("site list");
    assert_eq!(sites.len(), 8);
    assert_eq!(sites[0]["id"], "site1");
    assert_eq!(sites[0]["price"], 150.0);
}
