use crate::domain::{Message, Recipient};

/// Protocol revision expected by the push endpoint (`V`).
pub const PROTOCOL_VERSION: &str = "HTTPV3";
/// Delivery route code (`R`). Route 2 is the standard quality route.
pub const ROUTE: &str = "2";
/// Country code the push endpoint expects on every destination (`DA`).
/// Fixed by the wire format; not the configured phone prefix.
pub const COUNTRY_CODE: &str = "34";

const OK_MARKER: &str = "OK";
const ACCOUNT_BLOCKED_MARKER: &str = "ACCOUNT BLOCKED";
const NO_CREDITS_CODE: &str = "-5";
const INVALID_RECIPIENT_CODE: &str = "-3";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Per-delivery failure reported by the push gateway in its response body.
pub enum DeliveryFault {
    #[error("account is blocked at the gateway")]
    AccountBlocked,

    #[error("no credits left on the gateway account")]
    NoCreditsLeft,

    #[error("gateway rejected recipient number: {number}")]
    InvalidRecipient { number: String },

    #[error("unexpected gateway response for {number}: {body}")]
    Unknown { number: String, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Failure to read a credit balance out of the raw response body.
pub enum CreditsError {
    #[error("gateway returned an empty response body")]
    Empty,

    #[error("could not parse credit balance from response: {body}")]
    NotNumeric { body: String },
}

/// Encode one (recipient, message) delivery as push form fields.
pub fn encode_send_form(
    username: &str,
    password: &str,
    sender_name: &str,
    recipient: &Recipient,
    message: &Message,
) -> Vec<(String, String)> {
    vec![
        ("V".to_owned(), PROTOCOL_VERSION.to_owned()),
        ("UN".to_owned(), username.to_owned()),
        ("PWD".to_owned(), password.to_owned()),
        ("R".to_owned(), ROUTE.to_owned()),
        ("SA".to_owned(), sender_name.to_owned()),
        (
            "DA".to_owned(),
            format!("{COUNTRY_CODE}{}", recipient.mobile_number()),
        ),
        ("M".to_owned(), message.text().to_owned()),
    ]
}

/// Encode the credit-check form fields.
pub fn encode_credits_form(username: &str, password: &str) -> Vec<(String, String)> {
    vec![
        ("UN".to_owned(), username.to_owned()),
        ("PWD".to_owned(), password.to_owned()),
    ]
}

/// Interpret a push send response body for one delivery.
///
/// Marker precedence: account blocked, then the `-5` no-credits code, then
/// the `-3` invalid-recipient code, then the generic `OK` marker. A body
/// without `OK` is an unknown fault carrying the raw response.
pub fn interpret_send_response(body: &str, number: &str) -> Result<(), DeliveryFault> {
    if body.contains(ACCOUNT_BLOCKED_MARKER) {
        return Err(DeliveryFault::AccountBlocked);
    }
    if body.contains(NO_CREDITS_CODE) {
        return Err(DeliveryFault::NoCreditsLeft);
    }
    if body.contains(INVALID_RECIPIENT_CODE) {
        return Err(DeliveryFault::InvalidRecipient {
            number: number.to_owned(),
        });
    }
    if !body.contains(OK_MARKER) {
        return Err(DeliveryFault::Unknown {
            number: number.to_owned(),
            body: body.to_owned(),
        });
    }
    Ok(())
}

/// Parse the raw credit-check response body as a numeric balance.
pub fn parse_credits(body: &str) -> Result<f64, CreditsError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(CreditsError::Empty);
    }
    trimmed
        .parse::<f64>()
        .map_err(|_| CreditsError::NotNumeric {
            body: body.to_owned(),
        })
}
