use serde::{Deserialize, Serialize};

use crate::domain::Message;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct SendEnvelope<'a> {
    api_key: &'a str,
    report_url: &'a str,
    concat: u8,
    fake: u8,
    messages: &'a [Message],
}

#[derive(Debug, Serialize)]
struct TokenEnvelope<'a> {
    api_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct BalanceJsonResponse {
    #[serde(default)]
    result: BalanceResult,
}

#[derive(Debug, Default, Deserialize)]
struct BalanceResult {
    #[serde(default)]
    balance: f64,
}

/// Encode the `sms/send` request envelope.
///
/// `report_url`, `concat`, and `fake` are fixed by the account contract:
/// no delivery reports, no concatenation, real sends.
pub fn encode_send_request(
    api_key: &str,
    messages: &[Message],
) -> Result<String, TransportError> {
    let envelope = SendEnvelope {
        api_key,
        report_url: "",
        concat: 0,
        fake: 0,
        messages,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Encode the `account/get-balance` request body (the API key as a token object).
pub fn encode_balance_request(api_key: &str) -> Result<String, TransportError> {
    Ok(serde_json::to_string(&TokenEnvelope { api_key })?)
}

/// Decode the balance response at `result.balance`.
///
/// Missing fields default to `0.0`, matching the gateway's sparse responses;
/// only a malformed body is an error.
pub fn decode_balance_response(json: &str) -> Result<f64, TransportError> {
    let parsed: BalanceJsonResponse = serde_json::from_str(json)?;
    Ok(parsed.result.balance)
}
