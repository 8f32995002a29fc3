//! Typed Rust client for the Gateway360 and legacy SMSPubli SMS gateways.
//!
//! Two interchangeable backends share one contract: the Gateway360 REST API
//! (3.0, JSON envelopes) and the legacy HTTPV3 push gateway (one form POST
//! per recipient/message pair). The design is layered: a domain layer of
//! strong types, a transport layer for wire-format quirks, and a client
//! layer orchestrating requests behind the [`SmsService`] facade.
//!
//! ```rust,no_run
//! use gateway360::{RestConfig, SmsService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gateway360::SmsError> {
//!     let config = RestConfig::new("api-key", "+34").sender_name("ACME");
//!     let service = SmsService::rest(config);
//!
//!     service.send_single("hello", &["600111222"]).await?;
//!     let credits = service.check_credits().await?;
//!     println!("credits left: {credits}");
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    BoxFuture, PushClient, PushClientBuilder, RestClient, RestClientBuilder, SmsError, SmsGateway,
    SmsService,
};
pub use domain::{ConfigError, Message, PushConfig, Recipient, RestConfig, ValidationError};
