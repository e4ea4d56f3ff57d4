//! Static site catalog — read-only reference data for the wizard.
//!
//! Provided wholesale as fixture data in this version; swap for a network
//! catalog source in production.

use crate::types::CatalogSite;

/// Read-only lookup over the available partner sites.
#[derive(Debug, Clone)]
pub struct SiteCatalog {
    sites: Vec<CatalogSite>,
}

impl SiteCatalog {
    /// Catalog pre-loaded with the demo partner sites.
    pub fn with_default_sites() -> Self {
        let sites = vec![
            site("site1", "Tech Blog", 70, 150.0),
            site("site2", "Finance News", 85, 300.0),
            site("site3", "Digital Marketing Blog", 65, 120.0),
            site("site4", "Lifestyle Magazine", 78, 200.0),
            site("site5", "Health & Fitness", 72, 180.0),
            site("site6", "Travel Guide", 68, 160.0),
            site("site7", "Food & Cooking", 63, 130.0),
            site("site8", "Business Insider", 82, 280.0),
        ];
        Self { sites }
    }

    pub fn sites(&self) -> &[CatalogSite] {
        &self.sites
    }

    pub fn get(&self, id: &str) -> Option<&CatalogSite> {
        self.sites.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn price_of(&self, id: &str) -> Option<f64> {
        self.get(id).map(|s| s.price)
    }

    /// Sum of unit prices for the given site ids. Unknown ids contribute
    /// nothing rather than failing the aggregation.
    pub fn total_for<I, S>(&self, ids: I) -> f64
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.price_of(id.as_ref()))
            .sum()
    }
}

impl Default for SiteCatalog {
    fn default() -> Self {
        Self::with_default_sites()
    }
}

fn site(id: &str, name: &str, authority: u32, price: f64) -> CatalogSite {
    CatalogSite {
        id: id.to_string(),
        name: name.to_string(),
        authority,
        price,
    }
}
