use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;

use crate::assessment::client::{ServiceResponse, SiteService};
use crate::assessment::domain::{FilterQuery, Site, SiteParameters};
use crate::assessment::error::AssessmentError;

pub(crate) fn site(name: &str, latitude: f64, longitude: f64, region: &str, score: f64) -> Site {
    Site {
        id: None,
        name: name.to_string(),
        latitude,
        longitude,
        region: region.to_string(),
        score,
    }
}

pub(crate) fn sample_sites() -> Vec<Site> {
    vec![
        site("Ames North", 42.03, -93.62, "Iowa, USA", 0.81),
        site("Kolar Belt", 13.13, 78.13, "Karnataka, India", 0.64),
        site("Cerrado East", -15.6, -47.7, "Goias, Brazil", 0.38),
        site("Darling Downs", -27.5, 151.9, "Queensland, Australia", 0.72),
    ]
}

pub(crate) fn listing_response(sites: &[Site]) -> ServiceResponse {
    let body = json!({ "page": 0, "size": 100, "total": sites.len(), "items": sites });
    ServiceResponse::new(200, body.to_string())
}

pub(crate) fn score_response(score: f64) -> ServiceResponse {
    let body = json!({
        "score": score,
        "breakdown": {
            "environmental": 0.82,
            "logistics": 0.71,
            "economic": 0.64,
            "soilPh": 0.9,
            "roadAccess": 0.75
        },
        "sustainabilityGrade": "A-",
        "projectCapacityHectares": 4200.0,
        "carbonRemovalKgPerYear": 1_260_000.0,
        "co2EmissionsKgPerYear": 210_000.0,
        "netCarbonImpactKgPerYear": 1_050_000.0,
        "carbonEfficiencyRatio": 6.0,
        "basaltMaterialCostUsdPerYear": 84_000.0,
        "transportCostUsdPerYear": 52_000.0,
        "laborCostUsdPerYear": 31_000.0,
        "equipmentCostUsdPerYear": 18_000.0,
        "totalCostUsdPerYear": 185_000.0,
        "costPerTonCo2Removed": 176.19
    });
    ServiceResponse::new(200, body.to_string())
}

/// Scriptable in-memory site service that records every call it receives.
#[derive(Default)]
pub(crate) struct RecordingService {
    listing: Mutex<Option<ServiceResponse>>,
    score_responses: Mutex<VecDeque<(Duration, ServiceResponse)>>,
    listing_queries: Mutex<Vec<FilterQuery>>,
    score_bodies: Mutex<Vec<String>>,
}

impl RecordingService {
    pub(crate) fn listing(response: ServiceResponse) -> Self {
        let service = Self::default();
        service.set_listing(response);
        service
    }

    pub(crate) fn scoring(response: ServiceResponse) -> Self {
        let service = Self::default();
        service.push_score(Duration::ZERO, response);
        service
    }

    pub(crate) fn set_listing(&self, response: ServiceResponse) {
        *self.listing.lock().expect("listing mutex poisoned") = Some(response);
    }

    /// Queue a score response. The last queued response is reused for later calls.
    pub(crate) fn push_score(&self, delay: Duration, response: ServiceResponse) {
        self.score_responses
            .lock()
            .expect("score mutex poisoned")
            .push_back((delay, response));
    }

    pub(crate) fn listing_calls(&self) -> usize {
        self.listing_queries.lock().expect("query mutex poisoned").len()
    }

    pub(crate) fn listing_queries(&self) -> Vec<FilterQuery> {
        self.listing_queries.lock().expect("query mutex poisoned").clone()
    }

    pub(crate) fn score_calls(&self) -> usize {
        self.score_bodies.lock().expect("body mutex poisoned").len()
    }

    pub(crate) fn score_bodies(&self) -> Vec<String> {
        self.score_bodies.lock().expect("body mutex poisoned").clone()
    }
}

impl SiteService for RecordingService {
    async fn fetch_sites(&self, query: &FilterQuery) -> Result<ServiceResponse, AssessmentError> {
        self.listing_queries
            .lock()
            .expect("query mutex poisoned")
            .push(query.clone());
        let listing = self.listing.lock().expect("listing mutex poisoned").clone();
        listing.ok_or_else(|| AssessmentError::Transport("connection refused".to_string()))
    }

    async fn submit_score(
        &self,
        parameters: &SiteParameters,
    ) -> Result<ServiceResponse, AssessmentError> {
        let body = serde_json::to_string(parameters).expect("parameters serialize");
        self.score_bodies
            .lock()
            .expect("body mutex poisoned")
            .push(body);

        let next = {
            let mut queue = self.score_responses.lock().expect("score mutex poisoned");
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };

        match next {
            Some((delay, response)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(response)
            }
            None => Err(AssessmentError::Transport("connection refused".to_string())),
        }
    }
}
