//! The accumulated, not-yet-submitted campaign data.

use linkbloom_core::catalog::SiteCatalog;
use linkbloom_core::types::LinkRecord;
use serde::{Deserialize, Serialize};

/// Mutable field of a [`LinkRecord`], named for field-by-field updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkField {
    AnchorText,
    Url,
    SiteId,
}

/// Everything the wizard accumulates before handoff: campaign name, the
/// selected site set, and the ordered link list.
///
/// The total price is a pure function of the selected sites and the catalog;
/// it is recomputed on every read and never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub campaign_name: String,
    /// Selected site ids. Uniqueness enforced; selection order preserved
    /// for display.
    pub selected_sites: Vec<String>,
    pub links: Vec<LinkRecord>,
    #[serde(default)]
    next_link_id: u64,
}

impl CampaignDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_campaign_name(&mut self, name: impl Into<String>) {
        self.campaign_name = name.into();
    }

    /// Add or remove a site from the selection. Adding an already-selected
    /// site is a no-op. Removing a site leaves any links that reference it
    /// pointing at a now-unselected site; see [`Self::dangling_links`].
    pub fn select_site(&mut self, id: &str, included: bool) {
        if included {
            if !self.selected_sites.iter().any(|s| s == id) {
                self.selected_sites.push(id.to_string());
            }
        } else {
            self.selected_sites.retain(|s| s != id);
        }
    }

    /// Append a new link defaulting its site to the first selected site.
    /// Returns the new link's id, or `None` when no site is selected.
    pub fn add_link(&mut self) -> Option<u64> {
        let first_site = self.selected_sites.first()?.clone();
        self.next_link_id += 1;
        let id = self.next_link_id;
        self.links.push(LinkRecord {
            id,
            anchor_text: String::new(),
            url: String::new(),
            site_id: first_site,
        });
        Some(id)
    }

    /// Replace one field of the link with the given id. A stale id is
    /// silently ignored.
    pub fn update_link(&mut self, id: u64, field: LinkField, value: impl Into<String>) {
        if let Some(link) = self.links.iter_mut().find(|l| l.id == id) {
            let value = value.into();
            match field {
                LinkField::AnchorText => link.anchor_text = value,
                LinkField::Url => link.url = value,
                LinkField::SiteId => link.site_id = value,
            }
        }
    }

    /// Remove the link with the given id. A stale id is silently ignored.
    pub fn remove_link(&mut self, id: u64) {
        self.links.retain(|l| l.id != id);
    }

    /// Derived total: sum of catalog prices for the currently selected
    /// sites. Per-site, not per-link. Recomputed on every call.
    pub fn total_price(&self, catalog: &SiteCatalog) -> f64 {
        catalog.total_for(&self.selected_sites)
    }

    /// Ids of links whose referenced site is no longer selected. The
    /// selection step performs no cascading cleanup, so these can exist
    /// after a deselect.
    pub fn dangling_links(&self) -> Vec<u64> {
        self.links
            .iter()
            .filter(|l| !self.selected_sites.iter().any(|s| *s == l.site_id))
            .map(|l| l.id)
            .collect()
    }

    pub fn has_selection(&self) -> bool {
        !self.selected_sites.is_empty()
    }

    /// True when the link list is non-empty and every link is complete.
    pub fn links_complete(&self) -> bool {
        !self.links.is_empty() && self.links.iter().all(|l| l.is_complete())
    }
}
