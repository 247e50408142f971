use erw_sites::assessment::{AssessmentSession, HttpSiteService};
use erw_sites::config::SiteServiceConfig;
use erw_sites::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ConsoleSession = AssessmentSession<HttpSiteService>;

/// Build a session talking to the configured site service.
pub(crate) fn connect(config: &SiteServiceConfig) -> Result<Arc<ConsoleSession>, AppError> {
    let service = HttpSiteService::new(config.base_url.as_str(), config.request_timeout)?;
    debug!(
        base_url = service.base_url(),
        schema = config.schema.label(),
        "site service client ready"
    );
    Ok(Arc::new(AssessmentSession::new(
        Arc::new(service),
        config.schema,
    )))
}
