use super::client::SiteService;
use super::dashboard::{DashboardAggregator, DashboardSummary};
use super::domain::{AssessmentResult, FilterQuery, SchemaVersion, Site, SiteParameters};
use super::error::AssessmentError;
use super::estimator::RegionalEstimator;
use super::form::FormSubmission;
use super::gateway::ScoreGateway;
use super::repository::SiteRepository;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::future::{pending, Future};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Where the parameters of an assessment came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentOrigin {
    /// Estimated from an existing site's location and region.
    Site { name: String, region: String },
    /// Entered explicitly by the user.
    Form,
}

/// Display-ready outcome of one scoring round trip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub origin: AssessmentOrigin,
    pub parameters: SiteParameters,
    pub result: AssessmentResult,
    pub assessed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct SessionState {
    last_record: Option<AssessmentRecord>,
    stored_ticket: u64,
    in_flight: BTreeSet<u64>,
}

/// Withdraws a ticket from the in-flight set however its assessment ends.
struct InFlight<'a> {
    state: &'a RwLock<SessionState>,
    ticket: u64,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .remove(&self.ticket);
    }
}

/// Context object for one user's interaction with the site service.
///
/// Holds the current site set, the last listing query and the last assessment. Each
/// assessment is an independent estimate/validate-then-score round trip; the stored
/// record only feeds display.
pub struct AssessmentSession<S> {
    repository: SiteRepository<S>,
    gateway: ScoreGateway<S>,
    estimator: RegionalEstimator,
    state: RwLock<SessionState>,
    issued: AtomicU64,
}

impl<S: SiteService> AssessmentSession<S> {
    pub fn new(service: Arc<S>, schema: SchemaVersion) -> Self {
        Self::with_estimator(service, RegionalEstimator::new(schema))
    }

    pub fn with_estimator(service: Arc<S>, estimator: RegionalEstimator) -> Self {
        Self {
            repository: SiteRepository::new(Arc::clone(&service)),
            gateway: ScoreGateway::new(service),
            estimator,
            state: RwLock::new(SessionState::default()),
            issued: AtomicU64::new(0),
        }
    }

    /// Load a page of sites and remember the query that produced it.
    pub async fn refresh(&self, query: FilterQuery) -> Result<Arc<[Site]>, AssessmentError> {
        self.repository.load(&query).await
    }

    /// Estimate parameters for `site` and score them.
    ///
    /// The site's stored score is never reused.
    pub async fn inspect_site(&self, site: &Site) -> Result<AssessmentRecord, AssessmentError> {
        self.inspect_site_until(site, pending()).await
    }

    pub async fn inspect_site_until<C>(
        &self,
        site: &Site,
        cancel: C,
    ) -> Result<AssessmentRecord, AssessmentError>
    where
        C: Future<Output = ()> + Send,
    {
        let parameters = self
            .estimator
            .estimate(site.latitude, site.longitude, &site.region);
        let origin = AssessmentOrigin::Site {
            name: site.name.clone(),
            region: site.region.clone(),
        };
        self.assess(origin, parameters, cancel).await
    }

    /// Inspect a site of the current set by name.
    pub async fn inspect_site_named(&self, name: &str) -> Result<AssessmentRecord, AssessmentError> {
        let site = self.repository.find(name).ok_or_else(|| {
            AssessmentError::validation("name", format!("no site named '{name}' in the current listing"))
        })?;
        self.inspect_site(&site).await
    }

    /// Validate user-entered values and score them. Nothing is sent if validation fails.
    pub async fn submit_form(
        &self,
        form: &FormSubmission,
    ) -> Result<AssessmentRecord, AssessmentError> {
        self.submit_form_until(form, pending()).await
    }

    pub async fn submit_form_until<C>(
        &self,
        form: &FormSubmission,
        cancel: C,
    ) -> Result<AssessmentRecord, AssessmentError>
    where
        C: Future<Output = ()> + Send,
    {
        let parameters = form.parse(self.estimator.schema())?;
        self.assess(AssessmentOrigin::Form, parameters, cancel).await
    }

    /// Score an already typed parameter set, rejecting the first out-of-range field.
    pub async fn submit_parameters(
        &self,
        parameters: SiteParameters,
    ) -> Result<AssessmentRecord, AssessmentError> {
        if let Some((field, reason)) = parameters.first_violation() {
            return Err(AssessmentError::validation(field.name(), reason));
        }
        self.assess(AssessmentOrigin::Form, parameters, pending()).await
    }

    async fn assess<C>(
        &self,
        origin: AssessmentOrigin,
        parameters: SiteParameters,
        cancel: C,
    ) -> Result<AssessmentRecord, AssessmentError>
    where
        C: Future<Output = ()> + Send,
    {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .insert(ticket);
        let _in_flight = InFlight {
            state: &self.state,
            ticket,
        };

        let result = tokio::select! {
            result = self.gateway.score(&parameters) => result?,
            _ = cancel => {
                info!(ticket, "site assessment cancelled");
                return Err(AssessmentError::Cancelled);
            }
        };

        let record = AssessmentRecord {
            origin,
            parameters,
            result,
            assessed_at: Utc::now(),
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.in_flight.remove(&ticket);
        let newer_pending = state.in_flight.last().is_some_and(|live| *live > ticket);
        if ticket > state.stored_ticket && !newer_pending {
            state.stored_ticket = ticket;
            state.last_record = Some(record.clone());
        } else {
            debug!(ticket, "newer assessment pending or stored; not replacing last result");
        }
        drop(state);

        Ok(record)
    }
}

impl<S> AssessmentSession<S> {
    pub fn schema(&self) -> SchemaVersion {
        self.estimator.schema()
    }

    pub fn estimator(&self) -> &RegionalEstimator {
        &self.estimator
    }

    pub fn sites(&self) -> Arc<[Site]> {
        self.repository.sites()
    }

    pub fn regions(&self) -> BTreeSet<String> {
        self.repository.regions()
    }

    pub fn dashboard(&self) -> DashboardSummary {
        DashboardAggregator::summarize(&self.repository.sites())
    }

    pub fn last_query(&self) -> Option<FilterQuery> {
        self.repository.snapshot().query
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.repository.snapshot().loaded_at
    }

    pub fn last_record(&self) -> Option<AssessmentRecord> {
        self.read_state().last_record.clone()
    }

    /// Drop the site set and every remembered query or result.
    ///
    /// Assessments already in flight keep their tickets, so one that started before the
    /// reset cannot restore an older result.
    pub fn reset(&self) {
        self.repository.clear();
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .last_record = None;
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
