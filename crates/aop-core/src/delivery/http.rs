use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, Version};
use tracing::{debug, warn};

use crate::config::DeliveryConfig;
use crate::domain::ResponseSummary;
use crate::error::TransportError;
use crate::ports::{DeliveryRequest, Transport};

/// `reqwest` transport: form POST, HTTP/1.0, fixed timeout and redirect cap,
/// no custom headers.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialised.
    pub fn new(config: &DeliveryConfig) -> Result<Self, TransportError> {
        if !config.verify_tls {
            warn!("TLS certificate verification is disabled for webhook delivery");
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, request: DeliveryRequest) -> Result<ResponseSummary, TransportError> {
        let response = self
            .client
            .post(&request.url)
            .version(Version::HTTP_10)
            .form(&request.form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "webhook responded");

        Ok(ResponseSummary { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(&DeliveryConfig::default()).unwrap()
    }

    fn form(origin: &str, data: &str) -> Vec<(String, String)> {
        vec![
            ("origin".to_string(), origin.to_string()),
            ("data".to_string(), data.to_string()),
        ]
    }

    #[tokio::test]
    async fn posts_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .respond_with(ResponseTemplate::new(200).set_body_string("accepted"))
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/hook", server.uri());
        let summary = transport()
            .post(DeliveryRequest::new(url, form("example", r#"[{"ITEM_NAME":"a/b"}]"#)))
            .await
            .unwrap();

        assert_eq!(summary.status, 200);
        assert_eq!(summary.body, "accepted");

        let received = server.received_requests().await.unwrap();
        let fields: HashMap<String, String> = url::form_urlencoded::parse(&received[0].body)
            .into_owned()
            .collect();
        assert_eq!(fields["origin"], "example");
        assert_eq!(fields["data"], r#"[{"ITEM_NAME":"a/b"}]"#);
    }

    #[tokio::test]
    async fn http_error_status_is_a_response_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let summary = transport()
            .post(DeliveryRequest::new(server.uri(), form("0", "[]")))
            .await
            .unwrap();
        assert_eq!(summary.status, 503);
    }

    #[tokio::test]
    async fn follows_redirects() {
        let server = MockServer::start().await;
        Mock::given(path("/old"))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", format!("{}/new", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(path("/new"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let summary = transport()
            .post(DeliveryRequest::new(format!("{}/old", server.uri()), form("0", "[]")))
            .await
            .unwrap();
        assert_eq!(summary.status, 200);
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let config = DeliveryConfig {
            timeout: Duration::from_millis(100),
            ..DeliveryConfig::default()
        };
        let err = ReqwestTransport::new(&config)
            .unwrap()
            .post(DeliveryRequest::new(server.uri(), form("0", "[]")))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout(_)));
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = transport()
            .post(DeliveryRequest::new(format!("http://127.0.0.1:{port}/"), form("0", "[]")))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)));
    }

    #[tokio::test]
    async fn invalid_url_fails_at_transport() {
        let err = transport()
            .post(DeliveryRequest::new("not-a-url", form("0", "[]")))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
