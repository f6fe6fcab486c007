//! Delivery agent: envelope the records, POST them once, log what happened.

mod http;
mod log;

pub use self::http::ReqwestTransport;
pub use self::log::TracingDeliveryLog;

use std::sync::Arc;

use tracing::{instrument, warn};

use crate::config::StatusPolicy;
use crate::domain::{DeliveryEnvelope, DeliveryOutcome, ReportRecord};
use crate::ports::{DeliveryLog, DeliveryRequest, LogEntry, SiteInfo, Transport};
use crate::source::extract_source;

pub struct DeliveryAgent {
    transport: Arc<dyn Transport>,
    site: Arc<dyn SiteInfo>,
    log: Arc<dyn DeliveryLog>,
    status_policy: StatusPolicy,
}

impl DeliveryAgent {
    pub fn new(
        transport: Arc<dyn Transport>,
        site: Arc<dyn SiteInfo>,
        log: Arc<dyn DeliveryLog>,
    ) -> Self {
        Self {
            transport,
            site,
            log,
            status_policy: StatusPolicy::default(),
        }
    }

    pub fn with_status_policy(mut self, status_policy: StatusPolicy) -> Self {
        self.status_policy = status_policy;
        self
    }

    /// Single attempt. Retrying is the queue's business, not ours.
    #[instrument(skip(self, records), fields(records = records.len(), destination = %destination_url))]
    pub async fn deliver(&self, records: &[ReportRecord], destination_url: &str) -> DeliveryOutcome {
        let origin = extract_source(&self.site.site_url());
        let envelope = match DeliveryEnvelope::new(origin, records) {
            Ok(envelope) => envelope,
            Err(err) => {
                let reason = format!("could not serialize report: {err}");
                self.log.record(LogEntry::Error(reason.clone()));
                return DeliveryOutcome::failure(reason);
            }
        };

        self.log.record(LogEntry::DataToSend(envelope.data().to_string()));

        let request = DeliveryRequest::new(destination_url, envelope.form_fields());
        let response = match self.transport.post(request).await {
            Ok(response) => response,
            Err(err) => {
                let reason = err.to_string();
                self.log.record(LogEntry::Error(reason.clone()));
                return DeliveryOutcome::failure(reason);
            }
        };

        let summary = serde_json::to_string(&response)
            .unwrap_or_else(|_| format!("{{\"status\":{}}}", response.status));
        self.log.record(LogEntry::Response(summary));

        match self.status_policy {
            StatusPolicy::RejectHttpErrors if response.is_http_error() => {
                warn!(status = response.status, "endpoint rejected delivery");
                DeliveryOutcome::failure(format!("endpoint answered HTTP {}", response.status))
            }
            _ => DeliveryOutcome::success(response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LineItem, Order, OrderId, OrderStatus, ProductId, ResponseSummary, SourceTag};
    use crate::error::TransportError;
    use crate::impls::{MemoryDeliveryLog, StaticSite};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    /// Transport that answers from a script and remembers requests.
    struct ScriptedTransport {
        answer: fn() -> Result<ResponseSummary, TransportError>,
        seen: Mutex<Vec<DeliveryRequest>>,
    }

    impl ScriptedTransport {
        fn new(answer: fn() -> Result<ResponseSummary, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<DeliveryRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post(&self, request: DeliveryRequest) -> Result<ResponseSummary, TransportError> {
            self.seen.lock().unwrap().push(request);
            (self.answer)()
        }
    }

    fn ok_200() -> Result<ResponseSummary, TransportError> {
        Ok(ResponseSummary { status: 200, body: "ok".into() })
    }

    fn server_500() -> Result<ResponseSummary, TransportError> {
        Ok(ResponseSummary { status: 500, body: "boom".into() })
    }

    fn refused() -> Result<ResponseSummary, TransportError> {
        Err(TransportError::Connect("connection refused".into()))
    }

    fn records() -> Vec<ReportRecord> {
        let mut order = Order::new(OrderId::new(123), OrderStatus::Completed);
        order.items.push(LineItem::new(ProductId::new(55), "a/b", 2));
        vec![ReportRecord::from_line(
            &order,
            &order.items[0],
            SourceTag::Label("example".into()),
            None,
            Decimal::ZERO,
        )]
    }

    fn agent(transport: Arc<ScriptedTransport>, log: Arc<MemoryDeliveryLog>) -> DeliveryAgent {
        DeliveryAgent::new(transport, Arc::new(StaticSite::new("https://shop.example.com")), log)
    }

    #[tokio::test]
    async fn posts_origin_and_unescaped_data() {
        let transport = ScriptedTransport::new(ok_200);
        let log = Arc::new(MemoryDeliveryLog::new());

        let outcome = agent(transport.clone(), log.clone())
            .deliver(&records(), "https://hooks.example.net/orders")
            .await;

        assert!(outcome.is_success());
        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "https://hooks.example.net/orders");
        assert_eq!(sent[0].form[0], ("origin".to_string(), "example".to_string()));
        assert_eq!(sent[0].form[1].0, "data");
        assert!(sent[0].form[1].1.contains("\"ITEM_NAME\":\"a/b\""));

        let tags: Vec<_> = log.entries().iter().map(|e| e.tag()).collect();
        assert_eq!(tags, ["data_to_send", "response"]);
    }

    #[tokio::test]
    async fn transport_failure_is_logged_and_not_retried() {
        let transport = ScriptedTransport::new(refused);
        let log = Arc::new(MemoryDeliveryLog::new());

        let outcome = agent(transport.clone(), log.clone())
            .deliver(&records(), "http://127.0.0.1:1/")
            .await;

        assert_eq!(outcome.failure_reason(), Some("connection failed: connection refused"));
        assert_eq!(transport.requests().len(), 1);
        let errors = log.tagged("error");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("Something went wrong: "));
        assert!(log.tagged("response").is_empty());
    }

    #[tokio::test]
    async fn http_error_counts_as_success_by_default() {
        let transport = ScriptedTransport::new(server_500);
        let log = Arc::new(MemoryDeliveryLog::new());

        let outcome = agent(transport, log.clone()).deliver(&records(), "https://x.io").await;

        assert!(outcome.is_success());
        let responses = log.tagged("response");
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].to_string(), r#"Response: {"status":500,"body":"boom"}"#);
    }

    #[tokio::test]
    async fn http_error_fails_when_policy_rejects() {
        let transport = ScriptedTransport::new(server_500);
        let log = Arc::new(MemoryDeliveryLog::new());

        let outcome = agent(transport, log)
            .with_status_policy(StatusPolicy::RejectHttpErrors)
            .deliver(&records(), "https://x.io")
            .await;

        assert_eq!(outcome.failure_reason(), Some("endpoint answered HTTP 500"));
    }

    #[tokio::test]
    async fn unknown_site_sends_zero_origin() {
        let transport = ScriptedTransport::new(ok_200);
        let log = Arc::new(MemoryDeliveryLog::new());
        let agent = DeliveryAgent::new(transport.clone(), Arc::new(StaticSite::new("http://localhost")), log);

        agent.deliver(&records(), "https://x.io").await;

        assert_eq!(transport.requests()[0].form[0].1, "0");
    }
}
