//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod push;
mod rest;

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;

use crate::domain::{ConfigError, Message, PushConfig, Recipient, RestConfig, ValidationError};
use crate::transport::push::{CreditsError, DeliveryFault};

pub use push::{PushClient, PushClientBuilder};
pub use rest::{RestClient, RestClientBuilder};

/// Boxed future used by the object-safe traits in this module.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) type TransportResult =
    Result<HttpResponse, Box<dyn StdError + Send + Sync>>;

pub(crate) trait HttpTransport: Send + Sync {
    fn post_json<'a>(&'a self, url: &'a str, body: String) -> BoxFuture<'a, TransportResult>;

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, TransportResult>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    pub(crate) client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(&'a self, url: &'a str, body: String) -> BoxFuture<'a, TransportResult> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }

    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, TransportResult> {
        Box::pin(async move {
            let response = self.client.post(url).form(&params).send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by the gateway clients and the [`SmsService`] facade.
///
/// Configuration and validation failures are raised before any network call;
/// everything else maps one gateway response condition to one variant. The
/// push variant's per-delivery faults keep their specific kind all the way
/// to the caller.
pub enum SmsError {
    /// A required gateway configuration field is absent or empty.
    #[error("gateway not configured: {0}")]
    NotConfigured(#[from] ConfigError),

    /// One of the domain constructors or operation preconditions rejected the input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// HTTP client / transport failure, including JSON (de)serialization.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the push gateway.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The push gateway reports the account as blocked.
    #[error("account is blocked at the gateway")]
    AccountBlocked,

    /// The push gateway reports no remaining credits.
    #[error("no credits left on the gateway account")]
    NoCreditsLeft,

    /// The push gateway rejected one recipient number.
    #[error("gateway rejected recipient number: {number}")]
    InvalidRecipient { number: String },

    /// The push gateway answered with a body this client does not recognize.
    #[error("unexpected gateway response for {number}: {body}")]
    UnknownResponse { number: String, body: String },

    /// The credit-check endpoint returned an empty body.
    #[error("gateway returned an empty response body")]
    EmptyResponse,

    /// The credit-check response body could not be parsed as a number.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),
}

impl From<DeliveryFault> for SmsError {
    fn from(fault: DeliveryFault) -> Self {
        match fault {
            DeliveryFault::AccountBlocked => Self::AccountBlocked,
            DeliveryFault::NoCreditsLeft => Self::NoCreditsLeft,
            DeliveryFault::InvalidRecipient { number } => Self::InvalidRecipient { number },
            DeliveryFault::Unknown { number, body } => Self::UnknownResponse { number, body },
        }
    }
}

impl From<CreditsError> for SmsError {
    fn from(err: CreditsError) -> Self {
        match err {
            CreditsError::Empty => Self::EmptyResponse,
            err @ CreditsError::NotNumeric { .. } => Self::Parse(Box::new(err)),
        }
    }
}

pub(crate) fn optional_body(body: String) -> Option<String> {
    if body.trim().is_empty() { None } else { Some(body) }
}

/// Common contract of the two gateway backends.
///
/// `RestClient` ignores `recipients` in [`SmsGateway::send_batch`]; its
/// messages already carry their destinations. The push variant crosses every
/// recipient with every message.
pub trait SmsGateway: Send + Sync {
    fn send_batch<'a>(
        &'a self,
        messages: &'a [Message],
        recipients: &'a [Recipient],
    ) -> BoxFuture<'a, Result<(), SmsError>>;

    fn send_single<'a>(
        &'a self,
        text: &'a str,
        numbers: &'a [&'a str],
    ) -> BoxFuture<'a, Result<(), SmsError>>;

    fn check_credits<'a>(&'a self) -> BoxFuture<'a, Result<f64, SmsError>>;
}

/// Single entry point for host applications.
///
/// Wraps whichever gateway backend was selected at construction time and
/// delegates; it holds no logic of its own.
pub struct SmsService {
    gateway: Box<dyn SmsGateway>,
}

impl SmsService {
    /// Wrap an already-built gateway backend.
    pub fn new(gateway: Box<dyn SmsGateway>) -> Self {
        Self { gateway }
    }

    /// Service backed by the Gateway360 REST API.
    pub fn rest(config: RestConfig) -> Self {
        Self::new(Box::new(RestClient::new(config)))
    }

    /// Service backed by the legacy HTTPV3 push gateway.
    pub fn push(config: PushConfig) -> Self {
        Self::new(Box::new(PushClient::new(config)))
    }

    /// Send a batch of messages; see [`SmsGateway::send_batch`].
    pub async fn send_batch(
        &self,
        messages: &[Message],
        recipients: &[Recipient],
    ) -> Result<(), SmsError> {
        self.gateway.send_batch(messages, recipients).await
    }

    /// Send one text to each of the given bare mobile numbers.
    pub async fn send_single(&self, text: &str, numbers: &[&str]) -> Result<(), SmsError> {
        self.gateway.send_single(text, numbers).await
    }

    /// Remaining credit balance on the gateway account.
    pub async fn check_credits(&self) -> Result<f64, SmsError> {
        self.gateway.check_credits().await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) enum SentBody {
        Json(String),
        Form(Vec<(String, String)>),
    }

    #[derive(Debug, Clone)]
    pub(crate) struct RecordedRequest {
        pub(crate) url: String,
        pub(crate) body: SentBody,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        requests: Vec<RecordedRequest>,
        responses: VecDeque<HttpResponse>,
        fallback: HttpResponse,
    }

    #[derive(Debug, Clone)]
    pub(crate) struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    impl FakeTransport {
        pub(crate) fn new(status: u16, body: impl Into<String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    requests: Vec::new(),
                    responses: VecDeque::new(),
                    fallback: HttpResponse {
                        status,
                        body: body.into(),
                    },
                })),
            }
        }

        /// Queue one response per expected request; the last one repeats.
        pub(crate) fn with_responses(responses: Vec<(u16, &str)>) -> Self {
            let mut queue = responses
                .into_iter()
                .map(|(status, body)| HttpResponse {
                    status,
                    body: body.to_owned(),
                })
                .collect::<VecDeque<_>>();
            let fallback = queue.back().cloned().unwrap_or(HttpResponse {
                status: 200,
                body: String::new(),
            });
            queue.pop_back();
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    requests: Vec::new(),
                    responses: queue,
                    fallback,
                })),
            }
        }

        pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
            self.state.lock().unwrap().requests.clone()
        }

        fn record(&self, url: &str, body: SentBody) -> HttpResponse {
            let mut state = self.state.lock().unwrap();
            state.requests.push(RecordedRequest {
                url: url.to_owned(),
                body,
            });
            state
                .responses
                .pop_front()
                .unwrap_or_else(|| state.fallback.clone())
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_json<'a>(&'a self, url: &'a str, body: String) -> BoxFuture<'a, TransportResult> {
            Box::pin(async move { Ok(self.record(url, SentBody::Json(body))) })
        }

        fn post_form<'a>(
            &'a self,
            url: &'a str,
            params: Vec<(String, String)>,
        ) -> BoxFuture<'a, TransportResult> {
            Box::pin(async move { Ok(self.record(url, SentBody::Form(params))) })
        }
    }
}
