/// Failure taxonomy of the assessment pipeline.
///
/// None of these are retried by the pipeline and none of them disturb previously loaded
/// sites or the last successful result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssessmentError {
    /// The site service could not be reached, or refused a listing request.
    #[error("site service unavailable: {0}")]
    Transport(String),
    /// A response body did not have the expected shape.
    #[error("unexpected response from site service: {0}")]
    Decode(String),
    /// The scoring endpoint rejected the request or failed to compute a score.
    #[error("{message}")]
    Scoring { status: u16, message: String },
    /// User input was rejected before any request was made.
    #[error("invalid value for '{field}': {reason}")]
    Validation { field: String, reason: String },
    #[error("request cancelled before the site service responded")]
    Cancelled,
}

impl AssessmentError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::Scoring { .. } => "scoring",
            Self::Validation { .. } => "validation",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<reqwest::Error> for AssessmentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AssessmentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
