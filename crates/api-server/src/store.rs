//! In-memory application store backed by DashMap.
//!
//! Holds per-user wizard sessions, one-shot checkout handoffs, and the
//! campaign list shown on the dashboard. Everything is ephemeral; swap for a
//! real database in production.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use linkbloom_core::catalog::SiteCatalog;
use linkbloom_core::types::{Campaign, CampaignSnapshot, CampaignStatus};
use linkbloom_wizard::{Advance, CampaignWizard, WizardStep};
use tracing::info;
use uuid::Uuid;

/// Outcome of advancing a stored wizard.
#[derive(Debug, Clone)]
pub enum AdvanceOutcome {
    Stayed(WizardStep),
    Moved(WizardStep),
    Handoff {
        handoff_id: Uuid,
        snapshot: CampaignSnapshot,
    },
}

pub struct AppStore {
    catalog: SiteCatalog,
    /// One wizard session per user.
    wizards: DashMap<Uuid, CampaignWizard>,
    /// Pending checkout snapshots, consumed by payment.
    handoffs: DashMap<Uuid, CampaignSnapshot>,
    campaigns: DashMap<Uuid, Campaign>,
}

impl AppStore {
    pub fn new() -> Self {
        info!("Application store initialized (in-memory, development mode)");
        let store = Self {
            catalog: SiteCatalog::with_default_sites(),
            wizards: DashMap::new(),
            handoffs: DashMap::new(),
            campaigns: DashMap::new(),
        };
        store.seed_demo_campaigns();
        store
    }

    pub fn catalog(&self) -> &SiteCatalog {
        &self.catalog
    }

    // ─── Wizard sessions ───────────────────────────────────────────────────

    /// Start (or restart) the user's wizard with an empty draft.
    pub fn create_wizard(&self, user_id: Uuid) -> CampaignWizard {
        let wizard = CampaignWizard::new();
        self.wizards.insert(user_id, wizard.clone());
        wizard
    }

    pub fn get_wizard(&self, user_id: Uuid) -> Option<CampaignWizard> {
        self.wizards.get(&user_id).map(|w| w.value().clone())
    }

    /// Run a mutation against the user's wizard, returning its result, or
    /// `None` when no wizard session exists.
    pub fn with_wizard<R>(
        &self,
        user_id: Uuid,
        f: impl FnOnce(&mut CampaignWizard) -> R,
    ) -> Option<R> {
        self.wizards.get_mut(&user_id).map(|mut w| f(w.value_mut()))
    }

    /// Advance the user's wizard. On handoff, the snapshot is parked for
    /// checkout and the wizard session ends.
    pub fn advance_wizard(&self, user_id: Uuid) -> Option<AdvanceOutcome> {
        let advance = self
            .wizards
            .get_mut(&user_id)
            .map(|mut w| (w.advance(&self.catalog), w.step()))?;

        match advance {
            (Advance::Stayed, step) => Some(AdvanceOutcome::Stayed(step)),
            (Advance::Moved(step), _) => Some(AdvanceOutcome::Moved(step)),
            (Advance::Handoff(snapshot), _) => {
                let handoff_id = Uuid::new_v4();
                self.handoffs.insert(handoff_id, snapshot.clone());
                self.wizards.remove(&user_id);
                info!(handoff_id = %handoff_id, campaign = %snapshot.campaign_name, "Draft handed off to checkout");
                Some(AdvanceOutcome::Handoff {
                    handoff_id,
                    snapshot,
                })
            }
        }
    }

    pub fn retreat_wizard(&self, user_id: Uuid) -> Option<WizardStep> {
        self.wizards.get_mut(&user_id).map(|mut w| w.retreat())
    }

    // ─── Checkout ──────────────────────────────────────────────────────────

    /// Peek at a pending handoff without consuming it.
    pub fn checkout_snapshot(&self, handoff_id: Uuid) -> Option<CampaignSnapshot> {
        self.handoffs.get(&handoff_id).map(|s| s.value().clone())
    }

    /// Consume a handoff and record the purchased campaign.
    pub fn complete_payment(&self, handoff_id: Uuid) -> Option<CampaignSnapshot> {
        let (_, snapshot) = self.handoffs.remove(&handoff_id)?;
        let campaign = Campaign {
            id: Uuid::new_v4(),
            title: snapshot.campaign_name.clone(),
            status: CampaignStatus::Active,
            sites: snapshot.selected_sites.len() as u32,
            links: snapshot.links.len() as u32,
            progress: 0,
            started_at: Utc::now(),
            completed_at: None,
        };
        info!(campaign_id = %campaign.id, title = %campaign.title, "Payment recorded, campaign activated");
        self.campaigns.insert(campaign.id, campaign);
        Some(snapshot)
    }

    // ─── Campaigns ─────────────────────────────────────────────────────────

    pub fn list_campaigns(&self) -> Vec<Campaign> {
        let mut campaigns: Vec<Campaign> =
            self.campaigns.iter().map(|r| r.value().clone()).collect();
        campaigns.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        campaigns
    }

    pub fn active_count(&self) -> usize {
        self.campaigns
            .iter()
            .filter(|r| r.value().status == CampaignStatus::Active)
            .count()
    }

    pub fn completed_count(&self) -> usize {
        self.campaigns
            .iter()
            .filter(|r| r.value().status == CampaignStatus::Completed)
            .count()
    }

    pub fn total_links(&self) -> u64 {
        self.campaigns.iter().map(|r| r.value().links as u64).sum()
    }

    // ─── Demo data ─────────────────────────────────────────────────────────

    fn seed_demo_campaigns(&self) {
        let now = Utc::now();
        let rows = [
            ("Tech Blog Outreach", CampaignStatus::Active, 12, 24, 45, 14, None),
            ("Finance Sites", CampaignStatus::Active, 8, 16, 65, 27, None),
            ("Creative Portfolio", CampaignStatus::Active, 5, 10, 30, 19, None),
            ("Nutrition E-commerce", CampaignStatus::Completed, 15, 30, 100, 65, Some(35)),
            ("Fitness Blogs", CampaignStatus::Completed, 7, 14, 100, 72, Some(42)),
        ];

        for (title, status, sites, links, progress, started_days_ago, completed_days_ago) in rows {
            let id = Uuid::new_v4();
            self.campaigns.insert(
                id,
                Campaign {
                    id,
                    title: title.to_string(),
                    status,
                    sites,
                    links,
                    progress,
                    started_at: now - Duration::days(started_days_ago),
                    completed_at: completed_days_ago.map(|d| now - Duration::days(d)),
                },
            );
        }
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkbloom_wizard::LinkField;

    fn complete_wizard(store: &AppStore, user: Uuid) {
        store.create_wizard(user);
        store.with_wizard(user, |w| {
            w.draft_mut().set_campaign_name("Spring Push");
            w.draft_mut().select_site("site1", true);
            w.draft_mut().select_site("site4", true);
        });
        store.advance_wizard(user); // sites -> links
        store.with_wizard(user, |w| {
            let id = w.draft_mut().add_link().unwrap();
            w.draft_mut().update_link(id, LinkField::AnchorText, "click here");
            w.draft_mut().update_link(id, LinkField::Url, "https://example.com");
        });
        store.advance_wizard(user); // links -> review
    }

    #[test]
    fn handoff_parks_the_snapshot_and_ends_the_session() {
        let store = AppStore::new();
        let user = Uuid::new_v4();
        complete_wizard(&store, user);

        let outcome = store.advance_wizard(user).unwrap();
        let (handoff_id, snapshot) = match outcome {
            AdvanceOutcome::Handoff {
                handoff_id,
                snapshot,
            } => (handoff_id, snapshot),
            other => panic!("expected handoff, got {:?}", other),
        };
        assert_eq!(snapshot.total_price, 350.0);
        assert!(store.get_wizard(user).is_none());
        assert!(store.checkout_snapshot(handoff_id).is_some());
    }

    #[test]
    fn payment_consumes_the_handoff_exactly_once() {
        let store = AppStore::new();
        let user = Uuid::new_v4();
        complete_wizard(&store, user);
        let outcome = store.advance_wizard(user).unwrap();
        let handoff_id = match outcome {
            AdvanceOutcome::Handoff { handoff_id, .. } => handoff_id,
            other => panic!("expected handoff, got {:?}", other),
        };

        let active_before = store.active_count();
        let snapshot = store.complete_payment(handoff_id).unwrap();
        assert_eq!(snapshot.campaign_name, "Spring Push");
        assert_eq!(store.active_count(), active_before + 1);

        // Consumed: a second payment attempt finds nothing.
        assert!(store.complete_payment(handoff_id).is_none());
        assert!(store.checkout_snapshot(handoff_id).is_none());
    }

    #[test]
    fn unknown_handoff_yields_nothing() {
        let store = AppStore::new();
        assert!(store.checkout_snapshot(Uuid::new_v4()).is_none());
        assert!(store.complete_payment(Uuid::new_v4()).is_none());
    }

    #[test]
    fn demo_campaigns_are_seeded() {
        let store = AppStore::new();
        assert_eq!(store.active_count(), 3);
        assert_eq!(store.completed_count(), 2);
        assert_eq!(store.total_links(), 94);
        let campaigns = store.list_campaigns();
        assert_eq!(campaigns.len(), 5);
        // Sorted newest first.
        assert!(campaigns[0].started_at >= campaigns[1].started_at);
    }

    #[test]
    fn wizard_ops_without_a_session_are_none() {
        let store = AppStore::new();
        let user = Uuid::new_v4();
        assert!(store.get_wizard(user).is_none());
        assert!(store.advance_wizard(user).is_none());
        assert!(store.retreat_wizard(user).is_none());
        assert!(store.with_wizard(user, |_| ()).is_none());
    }
}
