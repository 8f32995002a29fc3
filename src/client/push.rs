use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::client::{
    BoxFuture, HttpTransport, ReqwestTransport, SmsError, SmsGateway, optional_body,
};
use crate::domain::{Message, PushConfig, Recipient, ValidationError};
use crate::transport::push;

const DEFAULT_SEND_ENDPOINT: &str = "http://sms1.gateway360.com/api/push/";
const DEFAULT_CREDITS_ENDPOINT: &str = "http://www.smspubli.com/api/others/get_credits.php";

/// The (recipient, message) cross-product in delivery order: each recipient
/// receives every message before the next recipient is started.
fn delivery_pairs<'a>(
    recipients: &'a [Recipient],
    messages: &'a [Message],
) -> impl Iterator<Item = (&'a Recipient, &'a Message)> {
    recipients
        .iter()
        .flat_map(move |recipient| messages.iter().map(move |message| (recipient, message)))
}

#[derive(Debug, Clone)]
/// Builder for [`PushClient`].
pub struct PushClientBuilder {
    config: PushConfig,
    send_endpoint: String,
    credits_endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl PushClientBuilder {
    /// Create a builder with the production endpoints and no overrides.
    pub fn new(config: PushConfig) -> Self {
        Self {
            config,
            send_endpoint: DEFAULT_SEND_ENDPOINT.to_owned(),
            credits_endpoint: DEFAULT_CREDITS_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the push send endpoint URL.
    pub fn send_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.send_endpoint = endpoint.into();
        self
    }

    /// Override the credit-check endpoint URL.
    pub fn credits_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.credits_endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`PushClient`], validating the endpoint URLs.
    pub fn build(self) -> Result<PushClient, SmsError> {
        let send_endpoint = checked_endpoint(self.send_endpoint)?;
        let credits_endpoint = checked_endpoint(self.credits_endpoint)?;

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

        Ok(PushClient {
            config: self.config,
            send_endpoint,
            credits_endpoint,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn checked_endpoint(endpoint: String) -> Result<String, SmsError> {
    Url::parse(&endpoint).map_err(|err| SmsError::Transport(Box::new(err)))?;
    Ok(endpoint)
}

#[derive(Clone)]
/// Client for the legacy HTTPV3 push gateway.
///
/// Every (recipient, message) pair is one form POST; the plain-text response
/// body carries the delivery verdict. A batch stops at the first failed
/// pair — deliveries already accepted by the gateway stay accepted, and no
/// partial-success report is produced.
pub struct PushClient {
    config: PushConfig,
    send_endpoint: String,
    credits_endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for PushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushClient")
            .field("config", &self.config)
            .field("send_endpoint", &self.send_endpoint)
            .field("credits_endpoint", &self.credits_endpoint)
            .finish_non_exhaustive()
    }
}

impl PushClient {
    /// Create a client against the production endpoints.
    pub fn new(config: PushConfig) -> Self {
        Self {
            config,
            send_endpoint: DEFAULT_SEND_ENDPOINT.to_owned(),
            credits_endpoint: DEFAULT_CREDITS_ENDPOINT.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(config: PushConfig) -> PushClientBuilder {
        PushClientBuilder::new(config)
    }

    /// Deliver every message to every recipient, sequentially, aborting the
    /// batch at the first failed pair.
    ///
    /// Errors:
    /// - [`SmsError::NotConfigured`] before any network call if the config
    ///   is incomplete,
    /// - [`SmsError::Validation`] for an empty message or recipient set,
    /// - [`SmsError::HttpStatus`] for HTTP status ≥ 300,
    /// - [`SmsError::AccountBlocked`], [`SmsError::NoCreditsLeft`],
    ///   [`SmsError::InvalidRecipient`], or [`SmsError::UnknownResponse`]
    ///   per the gateway's response markers.
    pub async fn send_batch(
        &self,
        messages: &[Message],
        recipients: &[Recipient],
    ) -> Result<(), SmsError> {
        self.config.validate()?;
        if messages.is_empty() {
            return Err(ValidationError::NoMessages.into());
        }
        if recipients.is_empty() {
            return Err(ValidationError::NoRecipients.into());
        }

        info!(
            messages = messages.len(),
            recipients = recipients.len(),
            sender = %self.config.sender_name,
            "sending SMS batch"
        );

        for (recipient, message) in delivery_pairs(recipients, messages) {
            self.deliver(recipient, message).await?;
        }
        Ok(())
    }

    async fn deliver(&self, recipient: &Recipient, message: &Message) -> Result<(), SmsError> {
        let params = push::encode_send_form(
            &self.config.username,
            &self.config.password,
            &self.config.sender_name,
            recipient,
            message,
        );
        let response = self
            .http
            .post_form(&self.send_endpoint, params)
            .await
            .map_err(SmsError::Transport)?;

        if response.status >= 300 {
            return Err(SmsError::HttpStatus {
                status: response.status,
                body: optional_body(response.body),
            });
        }

        push::interpret_send_response(&response.body, recipient.mobile_number())?;
        debug!(
            number = recipient.mobile_number(),
            "message accepted by gateway"
        );
        Ok(())
    }

    /// Send one text to each bare number. Numbers are validated as digit-only
    /// recipients; the gateway adds the country code on the wire.
    pub async fn send_single(&self, text: &str, numbers: &[&str]) -> Result<(), SmsError> {
        self.config.validate()?;
        if numbers.is_empty() {
            return Err(ValidationError::NoRecipients.into());
        }
        if text.trim().is_empty() {
            return Err(ValidationError::Empty { field: "text" }.into());
        }

        let recipients = numbers
            .iter()
            .map(|number| Recipient::new("", *number))
            .collect::<Result<Vec<_>, _>>()?;
        let messages = vec![Message::new(&self.config.sender_name, "", text)];

        self.send_batch(&messages, &recipients).await
    }

    /// Remaining credit balance on the account.
    ///
    /// Errors:
    /// - [`SmsError::HttpStatus`] for HTTP status above 300 (the legacy
    ///   endpoint treats 300 itself as deliverable),
    /// - [`SmsError::EmptyResponse`] for a blank body,
    /// - [`SmsError::Parse`] for a non-numeric body.
    pub async fn check_credits(&self) -> Result<f64, SmsError> {
        self.config.validate()?;

        let params = push::encode_credits_form(&self.config.username, &self.config.password);
        let response = self
            .http
            .post_form(&self.credits_endpoint, params)
            .await
            .map_err(SmsError::Transport)?;

        if response.status > 300 {
            return Err(SmsError::HttpStatus {
                status: response.status,
                body: optional_body(response.body),
            });
        }

        let credits = push::parse_credits(&response.body)?;
        info!(credits, "gateway credit balance");
        Ok(credits)
    }
}

impl SmsGateway for PushClient {
    fn send_batch<'a>(
        &'a self,
        messages: &'a [Message],
        recipients: &'a [Recipient],
    ) -> BoxFuture<'a, Result<(), SmsError>> {
        Box::pin(self.send_batch(messages, recipients))
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
