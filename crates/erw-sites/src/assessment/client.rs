use super::domain::{FilterQuery, SiteParameters};
use super::error::AssessmentError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

pub const SITES_PATH: &str = "/api/sites";
pub const SCORE_PATH: &str = "/api/sitescore";

/// Status and raw body of a site service call, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ServiceResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, AssessmentError> {
        serde_json::from_slice(&self.body).map_err(AssessmentError::from)
    }
}

/// Network boundary to the remote site service.
///
/// Implementations only move bytes; status handling and decoding belong to
/// [`SiteRepository`](super::SiteRepository) and [`ScoreGateway`](super::ScoreGateway).
pub trait SiteService: Send + Sync {
    fn fetch_sites(
        &self,
        query: &FilterQuery,
    ) -> impl Future<Output = Result<ServiceResponse, AssessmentError>> + Send;

    fn submit_score(
        &self,
        parameters: &SiteParameters,
    ) -> impl Future<Output = Result<ServiceResponse, AssessmentError>> + Send;
}

/// `reqwest` client for the site service's HTTP API.
#[derive(Clone)]
pub struct HttpSiteService {
    client: Client,
    base_url: String,
}

impl HttpSiteService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AssessmentError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                AssessmentError::Transport(format!("failed to create HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read(response: reqwest::Response) -> Result<ServiceResponse, AssessmentError> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| AssessmentError::Transport(err.to_string()))?;
        Ok(ServiceResponse::new(status, body.to_vec()))
    }
}

impl SiteService for HttpSiteService {
    async fn fetch_sites(&self, query: &FilterQuery) -> Result<ServiceResponse, AssessmentError> {
        let pairs = query.to_pairs();
        debug!(?pairs, "requesting site listing");
        let response = self
            .client
            .get(self.url(SITES_PATH))
            .query(&pairs)
            .send()
            .await?;
        Self::read(response).await
    }

    async fn submit_score(
        &self,
        parameters: &SiteParameters,
    ) -> Result<ServiceResponse, AssessmentError> {
        let response = self
            .client
            .post(self.url(SCORE_PATH))
            .json(parameters)
            .send()
            .await?;
        Self::read(response).await
    }
}
