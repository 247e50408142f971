use super::client::SiteService;
use super::domain::{FilterQuery, Site, SiteListing};
use super::error::AssessmentError;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// The current site set together with the query that produced it.
#[derive(Debug, Clone)]
pub struct SiteSnapshot {
    pub sites: Arc<[Site]>,
    pub query: Option<FilterQuery>,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Default for SiteSnapshot {
    fn default() -> Self {
        Self {
            sites: Arc::from(Vec::new()),
            query: None,
            loaded_at: None,
        }
    }
}

/// In-memory site set backed by the remote listing endpoint.
///
/// The snapshot is swapped wholesale on every successful load, so a renderer never sees
/// the sites of one query paired with another query.
pub struct SiteRepository<S> {
    service: Arc<S>,
    current: RwLock<SiteSnapshot>,
}

impl<S: SiteService> SiteRepository<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            current: RwLock::new(SiteSnapshot::default()),
        }
    }

    /// Fetch one page of sites and make it the current set.
    ///
    /// On failure the previous set is left in place.
    pub async fn load(&self, query: &FilterQuery) -> Result<Arc<[Site]>, AssessmentError> {
        let response = self.service.fetch_sites(query).await?;
        if !response.is_success() {
            warn!(status = response.status, "site listing request was refused");
            return Err(AssessmentError::Transport(format!(
                "site listing request failed with status {}",
                response.status
            )));
        }

        let listing: SiteListing = response.decode()?;
        let sites: Arc<[Site]> = Arc::from(listing.items);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = SiteSnapshot {
            sites: Arc::clone(&sites),
            query: Some(query.clone()),
            loaded_at: Some(Utc::now()),
        };

        info!(
            count = sites.len(),
            region = query.region().unwrap_or("all"),
            sort = query.sort_field.as_str(),
            dir = query.sort_direction.as_str(),
            "site listing loaded"
        );
        Ok(sites)
    }
}

impl<S> SiteRepository<S> {
    pub fn snapshot(&self) -> SiteSnapshot {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn sites(&self) -> Arc<[Site]> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner).sites)
    }

    /// Distinct region labels of the current set, sorted.
    pub fn regions(&self) -> BTreeSet<String> {
        self.sites()
            .iter()
            .map(|site| site.region.clone())
            .collect()
    }

    pub fn find(&self, name: &str) -> Option<Site> {
        self.sites().iter().find(|site| site.name == name).cloned()
    }

    pub fn clear(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = SiteSnapshot::default();
    }
}
