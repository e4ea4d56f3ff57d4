//! Campaign creation wizard — the three-step linear flow (sites → links →
//! review) that accumulates a campaign draft, recomputes the derived total
//! price, and hands an immutable snapshot to checkout.

pub mod draft;
pub mod step;
pub mod wizard;

pub use draft::{CampaignDraft, LinkField};
pub use step::WizardStep;
pub use wizard::{Advance, CampaignWizard};
