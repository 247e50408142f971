use crate::assessment::AssessmentError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Csv(csv::Error),
    Assessment(AssessmentError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Assessment(err) => match err {
                AssessmentError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                AssessmentError::Scoring { .. } | AssessmentError::Decode(_) => {
                    StatusCode::BAD_GATEWAY
                }
                AssessmentError::Transport(_) | AssessmentError::Cancelled => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
            },
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Csv(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Csv(err) => write!(f, "csv error: {}", err),
            // Shown to users as-is; scoring messages come straight from the service.
            AppError::Assessment(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Csv(err) => Some(err),
            AppError::Assessment(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Assessment(err) => {
                Json(json!({ "error": self.to_string(), "kind": err.kind() }))
            }
            _ => Json(json!({ "error": self.to_string() })),
        };
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<AssessmentError> for AppError {
    fn from(value: AssessmentError) -> Self {
        Self::Assessment(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_failures_map_to_gateway_statuses() {
        let cases = [
            (
                AssessmentError::Validation {
                    field: "soilPh".to_string(),
                    reason: "a value is required".to_string(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AssessmentError::Scoring {
                    status: 500,
                    message: "invalid soilPh".to_string(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AssessmentError::Decode("missing field `score`".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AssessmentError::Transport("connection refused".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AssessmentError::Cancelled, StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).status(), expected);
        }
    }

    #[test]
    fn scoring_message_is_not_rewrapped() {
        let err = AppError::from(AssessmentError::Scoring {
            status: 500,
            message: "invalid soilPh".to_string(),
        });
        assert_eq!(err.to_string(), "invalid soilPh");
    }

    #[test]
    fn io_errors_are_internal() {
        let err = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "io error: disk full");
    }
}
