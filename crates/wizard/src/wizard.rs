//! The wizard state machine: forward-progress gating over the draft and the
//! review-step handoff to checkout.

use linkbloom_core::catalog::SiteCatalog;
use linkbloom_core::types::CampaignSnapshot;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draft::CampaignDraft;
use crate::step::WizardStep;

/// Outcome of an `advance` attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Validation failed; the wizard did not change state.
    Stayed,
    /// Moved forward to the given step.
    Moved(WizardStep),
    /// Terminal step: the accumulated draft was packaged for checkout.
    /// The wizard itself is left untouched.
    Handoff(CampaignSnapshot),
}

/// Drives the three-step flow. Created empty when a wizard session starts;
/// discarded with the session, no persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignWizard {
    step: WizardStep,
    draft: CampaignDraft,
}

impl CampaignWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &CampaignDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut CampaignDraft {
        &mut self.draft
    }

    /// Whether the current step's completeness requirements are met, i.e.
    /// whether `advance` would move forward (or hand off, at review).
    pub fn step_complete(&self) -> bool {
        match self.step {
            WizardStep::Sites => {
                !self.draft.campaign_name.is_empty() && self.draft.has_selection()
            }
            WizardStep::Links => self.draft.links_complete(),
            WizardStep::Review => true,
        }
    }

    /// Validate the current step and move forward. Invalid steps are a
    /// no-op, not an error — the UI disables the action pre-emptively, and
    /// a direct call simply stays put. From `Review`, packages the draft
    /// into an immutable snapshot instead of transitioning.
    pub fn advance(&mut self, catalog: &SiteCatalog) -> Advance {
        if !self.step_complete() {
            debug!(step = ?self.step, "Advance blocked by incomplete step");
            return Advance::Stayed;
        }

        match self.step.next() {
            Some(next) => {
                debug!(from = ?self.step, to = ?next, "Wizard advanced");
                self.step = next;
                Advance::Moved(next)
            }
            None => Advance::Handoff(self.snapshot(catalog)),
        }
    }

    /// Move to the previous step unconditionally, keeping all accumulated
    /// data. No-op at the initial step.
    pub fn retreat(&mut self) -> WizardStep {
        if let Some(prev) = self.step.previous() {
            debug!(from = ?self.step, to = ?prev, "Wizard retreated");
            self.step = prev;
        }
        self.step
    }

    /// Immutable copy of the accumulated draft with the derived total.
    pub fn snapshot(&self, catalog: &SiteCatalog) -> CampaignSnapshot {
        CampaignSnapshot {
            campaign_name: self.draft.campaign_name.clone(),
            selected_sites: self.draft.selected_sites.clone(),
            links: self.draft.links.clone(),
            total_price: self.draft.total_price(catalog),
        }
    }
}
