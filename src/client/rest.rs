use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::client::{BoxFuture, HttpTransport, ReqwestTransport, SmsError, SmsGateway};
use crate::domain::{Message, Recipient, RestConfig, ValidationError};
use crate::transport::rest;

const DEFAULT_API_BASE: &str = "https://api.gateway360.com/api/3.0";
const SEND_PATH: &str = "/sms/send";
const BALANCE_PATH: &str = "/account/get-balance";

#[derive(Debug, Clone)]
/// Builder for [`RestClient`].
///
/// Use this when you need to point the client at a different API base or
/// customize the HTTP timeout / user-agent.
pub struct RestClientBuilder {
    config: RestConfig,
    api_base: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl RestClientBuilder {
    /// Create a builder with the production API base and no overrides.
    pub fn new(config: RestConfig) -> Self {
        Self {
            config,
            api_base: DEFAULT_API_BASE.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API base URL. The `sms/send` and `account/get-balance`
    /// paths are appended to it.
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`RestClient`], validating the endpoint URLs.
    pub fn build(self) -> Result<RestClient, SmsError> {
        let send_endpoint = endpoint(&self.api_base, SEND_PATH)?;
        let balance_endpoint = endpoint(&self.api_base, BALANCE_PATH)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let client = builder
            .build()
            .map_err(|err| SmsError::Transport(Box::new(err)))?;

        Ok(RestClient {
            config: self.config,
            send_endpoint,
            balance_endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn endpoint(base: &str, path: &str) -> Result<String, SmsError> {
    let url = Url::parse(&format!("{}{path}", base.trim_end_matches('/')))
        .map_err(|err| SmsError::Transport(Box::new(err)))?;
    Ok(String::from(url))
}

#[derive(Clone)]
/// Client for the Gateway360 REST API (3.0).
///
/// Sends message batches as one JSON envelope and reads the account balance
/// from the `account/get-balance` endpoint. The gateway acknowledges sends
/// out of band, so the send response is logged but not interpreted.
pub struct RestClient {
    config: RestConfig,
    send_endpoint: String,
    balance_endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("config", &self.config)
            .field("send_endpoint", &self.send_endpoint)
            .field("balance_endpoint", &self.balance_endpoint)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Create a client against the production endpoints.
    pub fn new(config: RestConfig) -> Self {
        Self {
            config,
            send_endpoint: format!("{DEFAULT_API_BASE}{SEND_PATH}"),
            balance_endpoint: format!("{DEFAULT_API_BASE}{BALANCE_PATH}"),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(config: RestConfig) -> RestClientBuilder {
        RestClientBuilder::new(config)
    }

    /// Send a batch of messages in one request.
    ///
    /// Errors:
    /// - [`SmsError::NotConfigured`] before any network call if the config
    ///   is incomplete,
    /// - [`SmsError::Validation`] for an empty batch,
    /// - [`SmsError::Transport`] for serialization or HTTP failures.
    pub async fn send_batch(&self, messages: &[Message]) -> Result<(), SmsError> {
        self.config.validate()?;
        if messages.is_empty() {
            return Err(ValidationError::NoMessages.into());
        }

        info!(
            count = messages.len(),
            sender = %self.config.sender_name,
            "sending SMS batch"
        );

        let payload = rest::encode_send_request(&self.config.api_key, messages)
            .map_err(|err| SmsError::Transport(Box::new(err)))?;
        let response = self
            .http
            .post_json(&self.send_endpoint, payload)
            .await
            .map_err(SmsError::Transport)?;

        debug!(status = response.status, body = %response.body, "gateway send response");
        Ok(())
    }

    /// Send one text to each bare number, prefixed with the configured
    /// phone prefix and labeled with the configured sender name.
    pub async fn send_single(&self, text: &str, numbers: &[&str]) -> Result<(), SmsError> {
        self.config.validate()?;
        if numbers.is_empty() {
            return Err(ValidationError::NoRecipients.into());
        }
        if text.trim().is_empty() {
            return Err(ValidationError::Empty { field: "text" }.into());
        }

        let messages = numbers
            .iter()
            .map(|number| {
                Message::new(
                    &self.config.sender_name,
                    format!("{}{number}", self.config.phone_prefix),
                    text,
                )
            })
            .collect::<Vec<_>>();

        self.send_batch(&messages).await
    }

    /// Remaining credit balance on the account.
    ///
    /// Errors with [`SmsError::Transport`] when the response body is not the
    /// expected JSON shape.
    pub async fn check_credits(&self) -> Result<f64, SmsError> {
        self.config.validate()?;

        let payload = rest::encode_balance_request(&self.config.api_key)
            .map_err(|err| SmsError::Transport(Box::new(err)))?;
        let response = self
            .http
            .post_json(&self.balance_endpoint, payload)
            .await
            .map_err(SmsError::Transport)?;

        let credits = rest::decode_balance_response(&response.body)
            .map_err(|err| SmsError::Transport(Box::new(err)))?;
        info!(credits, "gateway credit balance");
        Ok(credits)
    }
}

impl SmsGateway for RestClient {
    fn send_batch<'a>(
        &'a self,
        messages: &'a [Message],
        _recipients: &'a [Recipient],
    ) -> BoxFuture<'a, Result<(), SmsError>> {
        Box::pin(self.send_batch(messages))
    }

    fn send_single<'a>(
        &'a self,
        text: &'a str,
        numbers: &'a [&'a str],
    ) -> BoxFuture<'a, Result<(), SmsError>> {
        Box::pin(self.send_single(text, numbers))
    }

    fn check_credits<'a>(&'a self) -> BoxFuture<'a, Result<f64, SmsError>> {
        Box::pin(self.check_credits())
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::{FakeTransport, SentBody};
    use crate::domain::ConfigError;

    use super::*;

    fn make_client(config: RestConfig, transport: FakeTransport) -> RestClient {
        RestClient {
            config,
            send_endpoint: "https://example.invalid/api/3.0/sms/send".to_owned(),
            balance_endpoint: "https://example.invalid/api/3.0/account/get-balance".to_owned(),
            http: Arc::new(transport),
        }
    }

    fn configured() -> RestConfig {
        RestConfig::new("secret-key", "+34").sender_name("ACME")
    }

    fn json_body(body: &SentBody) -> serde_json::Value {
        match body {
            SentBody::Json(raw) => serde_json::from_str(raw).unwrap(),
            SentBody::Form(params) => panic!("expected JSON body, got form: {params:?}"),
        }
    }

    #[tokio::test]
    async fn send_batch_posts_envelope_to_send_endpoint() {
        let transport = FakeTransport::new(200, r#"{"status":"ok"}"#);
        let client = make_client(configured(), transport.clone());

        let messages = vec![Message::new("ACME", "+34600111222", "hi")];
        client.send_batch(&messages).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://example.invalid/api/3.0/sms/send");

        let body = json_body(&requests[0].body);
        assert_eq!(body["api_key"], "secret-key");
        assert_eq!(body["report_url"], "");
        assert_eq!(body["concat"], 0);
        assert_eq!(body["fake"], 0);
        assert_eq!(body["messages"][0]["to"], "+34600111222");
        assert_eq!(body["messages"][0]["send_at"], "");
    }

    #[tokio::test]
    async fn send_batch_rejects_empty_batch_without_network() {
        let transport = FakeTransport::new(200, "");
        let client = make_client(configured(), transport.clone());

        let err = client.send_batch(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            SmsError::Validation(ValidationError::NoMessages)
        ));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn operations_fail_before_network_when_unconfigured() {
        let transport = FakeTransport::new(200, "");
        let client = make_client(RestConfig::new("", "+34"), transport.clone());

        let messages = vec![Message::new("", "+34600111222", "hi")];
        let err = client.send_batch(&messages).await.unwrap_err();
        assert!(matches!(
            err,
            SmsError::NotConfigured(ConfigError::MissingField { field: "api_key" })
        ));

        let err = client.check_credits().await.unwrap_err();
        assert!(matches!(err, SmsError::NotConfigured(_)));

        let client = make_client(RestConfig::new("key", ""), transport.clone());
        let err = client.send_single("hi", &["600111222"]).await.unwrap_err();
        assert!(matches!(
            err,
            SmsError::NotConfigured(ConfigError::MissingField {
                field: "phone_prefix"
            })
        ));

        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn send_single_expands_numbers_with_prefix_and_sender() {
        let transport = FakeTransport::new(200, "");
        let client = make_client(configured(), transport.clone());

        client
            .send_single("hola", &["600111222", "600333444"])
            .await
            .unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let body = json_body(&requests[0].body);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["from"], "ACME");
        assert_eq!(messages[0]["to"], "+34600111222");
        assert_eq!(messages[1]["to"], "+34600333444");
        assert_eq!(messages[0]["text"], "hola");
    }

    #[tokio::test]
    async fn send_single_validates_text_and_recipients() {
        let transport = FakeTransport::new(200, "");
        let client = make_client(configured(), transport.clone());

        let err = client.send_single("", &["600111222"]).await.unwrap_err();
        assert!(matches!(
            err,
            SmsError::Validation(ValidationError::Empty { field: "text" })
        ));

        let err = client.send_single("hi", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            SmsError::Validation(ValidationError::NoRecipients)
        ));

        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn check_credits_posts_token_and_parses_balance() {
        let transport = FakeTransport::new(200, r#"{"result":{"balance":12.5}}"#);
        let client = make_client(configured(), transport.clone());

        let credits = client.check_credits().await.unwrap();
        assert_eq!(credits, 12.5);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url,
            "https://example.invalid/api/3.0/account/get-balance"
        );
        assert_eq!(
            requests[0].body,
            SentBody::Json(r#"{"api_key":"secret-key"}"#.to_owned())
        );
    }

    #[tokio::test]
    async fn check_credits_maps_malformed_json_to_transport_error() {
        let transport = FakeTransport::new(200, "{ not json }");
        let client = make_client(configured(), transport);

        let err = client.check_credits().await.unwrap_err();
        assert!(matches!(err, SmsError::Transport(_)));
    }

    #[tokio::test]
    async fn trait_object_ignores_recipients() {
        let transport = FakeTransport::new(200, "");
        let client = make_client(configured(), transport.clone());
        let gateway: &dyn SmsGateway = &client;

        let messages = vec![Message::new("ACME", "+34600111222", "hi")];
        let recipients = vec![Recipient::new("Bob", "600999888").unwrap()];
        gateway.send_batch(&messages, &recipients).await.unwrap();

        let body = json_body(&transport.requests()[0].body);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["to"], "+34600111222");
    }

    #[test]
    fn builder_applies_api_base_override() {
        let client = RestClient::builder(configured())
            .api_base("https://example.invalid/api/3.0/")
            .build()
            .unwrap();
        assert_eq!(
            client.send_endpoint,
            "https://example.invalid/api/3.0/sms/send"
        );
        assert_eq!(
            client.balance_endpoint,
            "https://example.invalid/api/3.0/account/get-balance"
        );
    }

    #[test]
    fn builder_rejects_unparseable_api_base() {
        let err = RestClient::builder(configured())
            .api_base("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, SmsError::Transport(_)));
    }

    #[test]
    fn default_endpoints_point_at_production() {
        let client = RestClient::new(configured());
        assert_eq!(
            client.send_endpoint,
            "https://api.gateway360.com/api/3.0/sms/send"
        );
        assert_eq!(
            client.balance_endpoint,
            "https://api.gateway360.com/api/3.0/account/get-balance"
        );
    }
}
