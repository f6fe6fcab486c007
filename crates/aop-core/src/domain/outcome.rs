//! Result of one delivery attempt.

use serde::{Deserialize, Serialize};

/// What came back from the endpoint. The relay does not interpret the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub status: u16,
    pub body: String,
}

impl ResponseSummary {
    pub fn is_http_error(&self) -> bool {
        self.status >= 400
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryOutcome {
    Success { response: ResponseSummary },
    Failure { reason: String },
}

impl DeliveryOutcome {
    pub fn success(response: ResponseSummary) -> Self {
        DeliveryOutcome::Success { response }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        DeliveryOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Success { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            DeliveryOutcome::Failure { reason } => Some(reason),
            DeliveryOutcome::Success { .. } => None,
        }
    }
}
