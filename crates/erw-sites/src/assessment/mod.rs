//! Client-side pipeline for assessing enhanced rock weathering candidate sites.
//!
//! A [`SiteRepository`] loads the filtered site set, a [`RegionalEstimator`] fills in
//! parameters for an existing site, a [`ScoreGateway`] submits parameters to the remote
//! scoring service and a [`DashboardAggregator`] summarises whatever set is loaded.
//! [`AssessmentSession`] ties them together for one user.

pub mod client;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod estimator;
pub mod form;
pub mod gateway;
pub mod repository;
pub mod session;
pub mod views;

#[cfg(test)]
mod tests;

pub use client::{HttpSiteService, ServiceResponse, SiteService, SCORE_PATH, SITES_PATH};
pub use dashboard::{
    DashboardAggregator, DashboardStats, DashboardSummary, ScoreDistribution, TierCount,
};
pub use domain::{
    AdvancedParameters, AssessmentResult, FilterQuery, ParameterField, ParameterGroup,
    SchemaVersion, Site, SiteListing, SiteParameters, SortDirection, SortField,
};
pub use error::AssessmentError;
pub use estimator::{RegionRule, RegionalEstimator, BASIC_RULES, EXTENDED_RULES};
pub use form::FormSubmission;
pub use gateway::{ScoreGateway, GENERIC_SCORING_FAILURE};
pub use repository::{SiteRepository, SiteSnapshot};
pub use session::{AssessmentOrigin, AssessmentRecord, AssessmentSession};
pub use views::{breakdown_label, BreakdownEntry, GradeBand, ScoreTier, PRIMARY_COMPONENTS};
