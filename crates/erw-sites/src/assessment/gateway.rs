use super::client::{ServiceResponse, SiteService};
use super::domain::{AssessmentResult, SiteParameters};
use super::error::AssessmentError;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Message reported when the scoring endpoint fails without explaining why.
pub const GENERIC_SCORING_FAILURE: &str = "Calculation failed";

#[derive(Debug, Deserialize)]
struct FailureBody {
    #[serde(default)]
    message: Option<String>,
}

/// Single-shot client of the scoring endpoint. Never retries.
pub struct ScoreGateway<S> {
    service: Arc<S>,
}

impl<S: SiteService> ScoreGateway<S> {
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    pub async fn score(
        &self,
        parameters: &SiteParameters,
    ) -> Result<AssessmentResult, AssessmentError> {
        debug!(
            schema = parameters.schema().label(),
            latitude = parameters.latitude,
            longitude = parameters.longitude,
            "submitting site score request"
        );

        let response = self.service.submit_score(parameters).await?;
        if !response.is_success() {
            let message = failure_message(&response);
            warn!(status = response.status, %message, "site score request rejected");
            return Err(AssessmentError::Scoring {
                status: response.status,
                message,
            });
        }

        let result: AssessmentResult = response.decode()?;
        check_result(&result)?;
        debug!(score = result.score, "site score received");
        Ok(result)
    }
}

fn failure_message(response: &ServiceResponse) -> String {
    serde_json::from_slice::<FailureBody>(&response.body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_SCORING_FAILURE.to_string())
}

fn check_result(result: &AssessmentResult) -> Result<(), AssessmentError> {
    if !result.score.is_finite() {
        return Err(AssessmentError::Decode(
            "score is not a finite number".to_string(),
        ));
    }

    if let Some((key, _)) = result.breakdown.iter().find(|(_, value)| !value.is_finite()) {
        return Err(AssessmentError::Decode(format!(
            "breakdown component '{key}' is not a finite number"
        )));
    }

    Ok(())
}
