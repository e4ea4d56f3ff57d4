//! API router — mounts all endpoints under /api/v1 behind the session guard.

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use linkbloom_auth::{session_guard, GuardState};

use crate::handlers::{self, AppState};

/// Build the application router. Everything except the auth endpoints and
/// health probes sits behind the session guard.
pub fn app_router(state: AppState) -> Router {
    let guard = GuardState {
        identity: state.identity.clone(),
    };

    Router::new()
        // Auth (public)
        .route("/api/v1/auth/signup", post(handlers::signup))
        .route("/api/v1/auth/login", post(handlers::login))
        .route("/api/v1/auth/oauth/:provider", post(handlers::oauth_start))
        .route("/api/v1/auth/logout", post(handlers::logout))
        // Catalog
        .route("/api/v1/catalog/sites", get(handlers::catalog_sites))
        // Dashboard and campaign list
        .route("/api/v1/dashboard", get(handlers::dashboard))
        .route("/api/v1/campaigns", get(handlers::list_campaigns))
        // Wizard
        .route(
            "/api/v1/wizard",
            post(handlers::create_wizard).get(handlers::get_wizard),
        )
        .route("/api/v1/wizard/name", put(handlers::set_campaign_name))
        .route("/api/v1/wizard/sites", post(handlers::select_site))
        .route("/api/v1/wizard/links", post(handlers::add_link))
        .route(
            "/api/v1/wizard/links/:id",
            put(handlers::update_link).delete(handlers::remove_link),
        )
        .route("/api/v1/wizard/advance", post(handlers::advance))
        .route("/api/v1/wizard/retreat", post(handlers::retreat))
        // Checkout
        .route("/api/v1/checkout/:id", get(handlers::checkout_view))
        .route("/api/v1/checkout/:id/pay", post(handlers::checkout_pay))
        // Operational endpoints
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness))
        .route("/live", get(handlers::liveness))
        .fallback(handlers::not_found)
        // Middleware
        .layer(middleware::from_fn_with_state(guard, session_guard))
        .with_state(state)
}
