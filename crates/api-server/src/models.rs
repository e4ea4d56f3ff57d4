//! Request/response bodies for the REST API.

use chrono::{DateTime, Utc};
use linkbloom_core::types::{CampaignSnapshot, LinkRecord};
use linkbloom_wizard::{LinkField, WizardStep};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Auth ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthResponse {
    pub redirect_to: String,
}

// ─── Wizard ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CampaignNameRequest {
    pub campaign_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSelectionRequest {
    pub site_id: String,
    pub included: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkUpdateRequest {
    pub field: LinkField,
    pub value: String,
}

/// Full wizard state as the client renders it: the step, the draft, and the
/// derived values (total price, forward-action enablement).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardView {
    pub step: WizardStep,
    pub campaign_name: String,
    pub selected_sites: Vec<String>,
    pub links: Vec<LinkRecord>,
    pub total_price: f64,
    /// Whether the forward action should be enabled.
    pub can_advance: bool,
    /// Links whose referenced site is no longer selected.
    pub dangling_links: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub step: WizardStep,
    /// Set only when the review step handed off to checkout.
    pub handoff_id: Option<Uuid>,
    pub snapshot: Option<CampaignSnapshot>,
}

// ─── Checkout ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutView {
    pub handoff_id: Uuid,
    pub snapshot: CampaignSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment_success: bool,
    pub campaign_name: String,
    /// Where the client should navigate after payment.
    pub redirect_to: String,
}

// ─── Dashboard ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub active_campaigns: usize,
    pub completed_campaigns: usize,
    pub total_links: u64,
}

// ─── Ops ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}
