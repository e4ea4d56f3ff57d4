//! Session guard middleware — gates every protected route on a live session.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use linkbloom_core::types::ErrorResponse;

use crate::identity::IdentityService;

/// Route the guard sends unauthenticated visitors to.
pub const LOGIN_PATH: &str = "/auth";

/// State handed to the guard middleware.
#[derive(Clone)]
pub struct GuardState {
    pub identity: Arc<IdentityService>,
}

/// Axum middleware that requires a valid bearer session on protected paths.
///
/// Auth endpoints and health checks pass through. Unauthenticated browser
/// navigations get a one-way redirect to the login view before any protected
/// content is produced; API clients get 401 JSON.
pub async fn session_guard(State(state): State<GuardState>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    if is_public(&path) {
        return next.run(req).await;
    }

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match token.and_then(|t| state.identity.session_for_token(t)) {
        Some(session) => {
            // Handlers read the session from request extensions.
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        None => unauthenticated_response(&req),
    }
}

// Auth endpoints, health probes, and non-API routes (the client shell's own
// paths, including the not-found fallback) skip the guard.
fn is_public(path: &str) -> bool {
    path.starts_with("/api/v1/auth/")
        || path == "/health"
        || path == "/ready"
        || path == "/live"
        || !path.starts_with("/api/v1/")
}

fn unauthenticated_response(req: &Request) -> Response {
    let wants_html = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if req.method() == Method::GET && wants_html {
        Redirect::to(LOGIN_PATH).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "unauthenticated".to_string(),
                message: "Valid bearer session required".to_string(),
            }),
        )
            .into_response()
    }
}
