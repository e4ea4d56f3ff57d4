//! Axum REST handlers for auth, catalog, wizard, checkout, and dashboard.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::{Extension, Json};
use linkbloom_auth::{IdentityService, Session};
use linkbloom_core::types::{Campaign, CatalogSite, ErrorResponse};
use linkbloom_wizard::CampaignWizard;
use tracing::warn;
use uuid::Uuid;

use crate::models::*;
use crate::store::{AdvanceOutcome, AppStore};

/// Route the checkout boundary redirects to when accessed without a pending
/// handoff.
const WIZARD_ROUTE: &str = "/campaign/new";

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AppStore>,
    pub identity: Arc<IdentityService>,
    /// Artificial delay applied by the simulated payment.
    pub payment_delay: Duration,
    pub start_time: Instant,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, message: String) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message,
        }),
    )
}

// ─── Auth ──────────────────────────────────────────────────────────────────

pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    match state.identity.sign_up(&req.email, &req.password) {
        Ok(session) => {
            metrics::counter!("auth.signups").increment(1);
            Ok((StatusCode::CREATED, Json(auth_response(session))))
        }
        Err(e) => Err(api_error(StatusCode::BAD_REQUEST, "signup_failed", e.to_string())),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    match state.identity.sign_in(&req.email, &req.password) {
        Ok(session) => {
            metrics::counter!("auth.logins").increment(1);
            Ok(Json(auth_response(session)))
        }
        Err(e) => {
            warn!(email = %req.email, "Login rejected");
            Err(api_error(StatusCode::UNAUTHORIZED, "auth_failed", e.to_string()))
        }
    }
}

pub async fn oauth_start(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Json<OAuthResponse> {
    Json(OAuthResponse {
        redirect_to: state.identity.sign_in_with_provider(&provider),
    })
}

/// Sign-out is on a public path; the bearer token is read directly.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> StatusCode {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = token {
        state.identity.sign_out(token);
    }
    StatusCode::NO_CONTENT
}

fn auth_response(session: Session) -> AuthResponse {
    AuthResponse {
        token: session.access_token,
        user_id: session.user_id,
        email: session.email,
        expires_at: session.expires_at,
    }
}

// ─── Catalog ───────────────────────────────────────────────────────────────

pub async fn catalog_sites(State(state): State<AppState>) -> Json<Vec<CatalogSite>> {
    Json(state.store.catalog().sites().to_vec())
}

// ─── Dashboard / campaigns ─────────────────────────────────────────────────

pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardSummary> {
    Json(DashboardSummary {
        active_campaigns: state.store.active_count(),
        completed_campaigns: state.store.completed_count(),
        total_links: state.store.total_links(),
    })
}

pub async fn list_campaigns(State(state): State<AppState>) -> Json<Vec<Campaign>> {
    Json(state.store.list_campaigns())
}

// ─── Wizard ────────────────────────────────────────────────────────────────

fn wizard_view(state: &AppState, wizard: &CampaignWizard) -> WizardView {
    let draft = wizard.draft();
    WizardView {
        step: wizard.step(),
        campaign_name: draft.campaign_name.clone(),
        selected_sites: draft.selected_sites.clone(),
        links: draft.links.clone(),
        total_price: draft.total_price(state.store.catalog()),
        can_advance: wizard.step_complete(),
        dangling_links: draft.dangling_links(),
    }
}

fn no_wizard() -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        "no_wizard",
        "No wizard session; start one first".to_string(),
    )
}

pub async fn create_wizard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> (StatusCode, Json<WizardView>) {
    let wizard = state.store.create_wizard(session.user_id);
    metrics::counter!("wizard.created").increment(1);
    (StatusCode::CREATED, Json(wizard_view(&state, &wizard)))
}

pub async fn get_wizard(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<WizardView>, ApiError> {
    state
        .store
        .get_wizard(session.user_id)
        .map(|w| Json(wizard_view(&state, &w)))
        .ok_or_else(no_wizard)
}

pub async fn set_campaign_name(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<CampaignNameRequest>,
) -> Result<Json<WizardView>, ApiError> {
    mutate(&state, session.user_id, |w| {
        w.draft_mut().set_campaign_name(req.campaign_name.clone())
    })
}

pub async fn select_site(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(req): Json<SiteSelectionRequest>,
) -> Result<Json<WizardView>, ApiError> {
    if req.included && !state.store.catalog().contains(&req.site_id) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "unknown_site",
            format!("site '{}' is not in the catalog", req.site_id),
        ));
    }
    mutate(&state, session.user_id, |w| {
        w.draft_mut().select_site(&req.site_id, req.included)
    })
}

/// Appends a link defaulting to the first selected site. With no selection
/// this is a no-op, mirroring the disabled affordance client-side.
pub async fn add_link(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<WizardView>, ApiError> {
    mutate(&state, session.user_id, |w| {
        w.draft_mut().add_link();
    })
}

/// Stale link ids are silently ignored; the response reflects whatever the
/// draft currently holds.
pub async fn update_link(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<u64>,
    Json(req): Json<LinkUpdateRequest>,
) -> Result<Json<WizardView>, ApiError> {
    mutate(&state, session.user_id, |w| {
        w.draft_mut().update_link(id, req.field, req.value.clone())
    })
}

pub async fn remove_link(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<u64>,
) -> Result<Json<WizardView>, ApiError> {
    mutate(&state, session.user_id, |w| w.draft_mut().remove_link(id))
}

pub async fn advance(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<AdvanceResponse>, ApiError> {
    let outcome = state
        .store
        .advance_wizard(session.user_id)
        .ok_or_else(no_wizard)?;

    let response = match outcome {
        AdvanceOutcome::Stayed(step) | AdvanceOutcome::Moved(step) => AdvanceResponse {
            step,
            handoff_id: None,
            snapshot: None,
        },
        AdvanceOutcome::Handoff {
            handoff_id,
            snapshot,
        } => {
            metrics::counter!("wizard.handoffs").increment(1);
            AdvanceResponse {
                step: linkbloom_wizard::WizardStep::Review,
                handoff_id: Some(handoff_id),
                snapshot: Some(snapshot),
            }
        }
    };
    Ok(Json(response))
}

pub async fn retreat(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Json<WizardView>, ApiError> {
    state.store.retreat_wizard(session.user_id).ok_or_else(no_wizard)?;
    state
        .store
        .get_wizard(session.user_id)
        .map(|w| Json(wizard_view(&state, &w)))
        .ok_or_else(no_wizard)
}

fn mutate(
    state: &AppState,
    user_id: Uuid,
    f: impl FnOnce(&mut CampaignWizard),
) -> Result<Json<WizardView>, ApiError> {
    state
        .store
        .with_wizard(user_id, |w| {
            f(w);
            wizard_view(state, w)
        })
        .map(Json)
        .ok_or_else(no_wizard)
}

// ─── Checkout ──────────────────────────────────────────────────────────────

/// Direct access without a pending handoff redirects back to the wizard's
/// initial route rather than operating on absent data.
pub async fn checkout_view(
    State(state): State<AppState>,
    Path(handoff_id): Path<Uuid>,
) -> Result<Json<CheckoutView>, Redirect> {
    match state.store.checkout_snapshot(handoff_id) {
        Some(snapshot) => Ok(Json(CheckoutView {
            handoff_id,
            snapshot,
        })),
        None => {
            warn!(handoff_id = %handoff_id, "Checkout accessed without a pending handoff");
            Err(Redirect::to(WIZARD_ROUTE))
        }
    }
}

/// Simulated payment: an artificial delay, then the handoff is consumed and
/// the campaign recorded. No real payment processing exists here.
pub async fn checkout_pay(
    State(state): State<AppState>,
    Path(handoff_id): Path<Uuid>,
) -> Result<Json<PaymentResponse>, Redirect> {
    if state.store.checkout_snapshot(handoff_id).is_none() {
        return Err(Redirect::to(WIZARD_ROUTE));
    }

    tokio::time::sleep(state.payment_delay).await;

    match state.store.complete_payment(handoff_id) {
        Some(snapshot) => {
            metrics::counter!("checkout.payments").increment(1);
            Ok(Json(PaymentResponse {
                payment_success: true,
                campaign_name: snapshot.campaign_name,
                redirect_to: "/".to_string(),
            }))
        }
        None => Err(Redirect::to(WIZARD_ROUTE)),
    }
}

// ─── Ops ───────────────────────────────────────────────────────────────────

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    api_error(
        StatusCode::NOT_FOUND,
        "not_found",
        "No such route".to_string(),
    )
}
