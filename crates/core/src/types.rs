//! Shared domain types — catalog sites, link records, campaigns, snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Catalog ───────────────────────────────────────────────────────────────

/// A partner site available for link placement. Static reference data,
/// immutable for the duration of a wizard session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogSite {
    pub id: String,
    pub name: String,
    /// Domain authority score.
    pub authority: u32,
    /// Unit price for a placement on this site.
    pub price: f64,
}

// ─── Links ─────────────────────────────────────────────────────────────────

/// A single link definition inside a campaign draft. Identifiers are
/// generated locally, monotonically increasing per wizard session. Anchor
/// and URL may be empty while the link is still being edited.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkRecord {
    pub id: u64,
    pub anchor_text: String,
    pub url: String,
    pub site_id: String,
}

impl LinkRecord {
    /// A link is complete once both anchor text and destination URL are set.
    pub fn is_complete(&self) -> bool {
        !self.anchor_text.is_empty() && !self.url.is_empty()
    }
}

// ─── Snapshot ──────────────────────────────────────────────────────────────

/// Immutable copy of an accumulated campaign draft, handed to checkout at
/// the review step. Checkout never mutates the originating wizard state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignSnapshot {
    pub campaign_name: String,
    pub selected_sites: Vec<String>,
    pub links: Vec<LinkRecord>,
    pub total_price: f64,
}

// ─── Campaigns ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Completed,
}

/// A purchased campaign as shown on the dashboard and campaign list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub title: String,
    pub status: CampaignStatus,
    pub sites: u32,
    pub links: u32,
    /// Fulfilment progress, 0-100.
    pub progress: u8,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

// ─── API errors ────────────────────────────────────────────────────────────

/// JSON error body returned by handlers and middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
