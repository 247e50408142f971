use crate::infra::AppState;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use erw_sites::assessment::{
    AssessmentRecord, AssessmentSession, BreakdownEntry, DashboardSummary, FilterQuery,
    FormSubmission, GradeBand, ScoreTier, Site, SiteService, SortDirection, SortField,
};
use erw_sites::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SitesQuery {
    #[serde(default)]
    pub(crate) region: Option<String>,
    #[serde(default)]
    pub(crate) sort: Option<SortField>,
    #[serde(default)]
    pub(crate) dir: Option<SortDirection>,
    #[serde(default)]
    pub(crate) size: Option<u32>,
}

impl SitesQuery {
    fn into_filter(self) -> FilterQuery {
        let defaults = FilterQuery::default();
        FilterQuery {
            region: self.region,
            sort_field: self.sort.unwrap_or(defaults.sort_field),
            sort_direction: self.dir.unwrap_or(defaults.sort_direction),
            page_size: self.size.unwrap_or(defaults.page_size),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SitesResponse {
    pub(crate) region: Option<String>,
    pub(crate) sort: SortField,
    pub(crate) dir: SortDirection,
    pub(crate) size: u32,
    pub(crate) count: usize,
    pub(crate) items: Vec<Site>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SiteAssessmentRequest {
    pub(crate) name: String,
}

/// Assessment record plus the classifications a front end needs to style it.
#[derive(Debug, Serialize)]
pub(crate) struct AssessmentView {
    #[serde(flatten)]
    pub(crate) record: AssessmentRecord,
    pub(crate) tier: ScoreTier,
    pub(crate) tier_label: &'static str,
    pub(crate) grade_band: GradeBand,
    pub(crate) primary_components: Vec<BreakdownEntry>,
    pub(crate) detailed_factors: Vec<BreakdownEntry>,
}

impl From<AssessmentRecord> for AssessmentView {
    fn from(record: AssessmentRecord) -> Self {
        let tier = record.result.tier();
        Self {
            tier,
            tier_label: tier.label(),
            grade_band: record.result.grade_band(),
            primary_components: record.result.primary_components(),
            detailed_factors: record.result.detailed_factors(),
            record,
        }
    }
}

/// JSON endpoints over one shared assessment session.
pub(crate) fn assessment_router<S>(session: Arc<AssessmentSession<S>>) -> Router
where
    S: SiteService + 'static,
{
    Router::new()
        .route("/api/v1/sites", get(list_sites::<S>))
        .route("/api/v1/regions", get(list_regions::<S>))
        .route("/api/v1/dashboard", get(dashboard::<S>))
        .route("/api/v1/assessments/site", post(assess_site::<S>))
        .route("/api/v1/assessments/form", post(assess_form::<S>))
        .route("/api/v1/assessments/latest", get(latest_assessment::<S>))
        .with_state(session)
}

pub(crate) fn with_console_routes<S>(session: Arc<AssessmentSession<S>>) -> Router
where
    S: SiteService + 'static,
{
    assessment_router(session)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn list_sites<S>(
    State(session): State<Arc<AssessmentSession<S>>>,
    Query(params): Query<SitesQuery>,
) -> Result<Json<SitesResponse>, AppError>
where
    S: SiteService + 'static,
{
    let query = params.into_filter();
    let sites = session.refresh(query.clone()).await?;

    Ok(Json(SitesResponse {
        region: query.region().map(str::to_string),
        sort: query.sort_field,
        dir: query.sort_direction,
        size: query.effective_page_size(),
        count: sites.len(),
        items: sites.to_vec(),
    }))
}

pub(crate) async fn list_regions<S>(
    State(session): State<Arc<AssessmentSession<S>>>,
) -> Json<serde_json::Value>
where
    S: SiteService + 'static,
{
    Json(json!({ "regions": session.regions() }))
}

pub(crate) async fn dashboard<S>(
    State(session): State<Arc<AssessmentSession<S>>>,
) -> Json<DashboardSummary>
where
    S: SiteService + 'static,
{
    Json(session.dashboard())
}

pub(crate) async fn assess_site<S>(
    State(session): State<Arc<AssessmentSession<S>>>,
    Json(request): Json<SiteAssessmentRequest>,
) -> Result<Json<AssessmentView>, AppError>
where
    S: SiteService + 'static,
{
    let record = session.inspect_site_named(request.name.trim()).await?;
    Ok(Json(AssessmentView::from(record)))
}

pub(crate) async fn assess_form<S>(
    State(session): State<Arc<AssessmentSession<S>>>,
    Json(values): Json<serde_json::Map<String, serde_json::Value>>,
) -> Result<Json<AssessmentView>, AppError>
where
    S: SiteService + 'static,
{
    let form = FormSubmission::from_json_object(&values);
    let record = session.submit_form(&form).await?;
    Ok(Json(AssessmentView::from(record)))
}

pub(crate) async fn latest_assessment<S>(
    State(session): State<Arc<AssessmentSession<S>>>,
) -> Response
where
    S: SiteService + 'static,
{
    match session.last_record() {
        Some(record) => Json(AssessmentView::from(record)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no site has been assessed yet" })),
        )
            .into_response(),
    }
}
