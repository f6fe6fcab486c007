//! Transport port - the single outbound HTTP call.

use async_trait::async_trait;

use crate::domain::ResponseSummary;
use crate::error::TransportError;

/// A form POST to the webhook endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    pub url: String,
    pub form: Vec<(String, String)>,
}

impl DeliveryRequest {
    pub fn new(url: impl Into<String>, form: Vec<(String, String)>) -> Self {
        Self {
            url: url.into(),
            form,
        }
    }
}

/// `Err` only when no response was obtained. Any HTTP status is `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: DeliveryRequest) -> Result<ResponseSummary, TransportError>;
}
