use serde::Serialize;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single outbound SMS as the Gateway360 REST API models it.
///
/// Field order matters: the struct serializes to the wire shape
/// `{"from":...,"to":...,"text":...,"send_at":...}`. A blank `from` lets the
/// gateway substitute its default sender; `send_at` stays empty for immediate
/// delivery.
pub struct Message {
    from: String,
    to: String,
    text: String,
    send_at: String,
}

impl Message {
    /// Create a message for immediate delivery (`send_at` empty).
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            text: text.into(),
            send_at: String::new(),
        }
    }

    /// Schedule delivery at a gateway-formatted timestamp (`YYYY-MM-DD hh:mm:ss`).
    pub fn with_send_at(mut self, send_at: impl Into<String>) -> Self {
        self.send_at = send_at.into();
        self
    }

    /// Sender label, possibly blank.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Destination address as sent to the gateway.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Message body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Scheduled-send timestamp, empty for immediate delivery.
    pub fn send_at(&self) -> &str {
        &self.send_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A delivery target for the push gateway: display name plus mobile number.
///
/// Invariant: the mobile number is non-empty and ASCII digits only after
/// trimming. The gateway prepends the country code itself, so the number
/// carries no prefix.
pub struct Recipient {
    name: String,
    mobile_number: String,
}

impl Recipient {
    /// Create a validated [`Recipient`]. The name may be blank.
    pub fn new(
        name: impl Into<String>,
        mobile_number: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let mobile_number = mobile_number.into();
        let trimmed = mobile_number.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidMobileNumber {
                input: mobile_number,
            });
        }
        Ok(Self {
            name: name.into(),
            mobile_number: trimmed.to_owned(),
        })
    }

    /// Display name, possibly blank.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated mobile number, digits only, no country prefix.
    pub fn mobile_number(&self) -> &str {
        &self.mobile_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_to_wire_shape() {
        let message = Message::new("ACME", "600111222", "hi");
        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"from":"ACME","to":"600111222","text":"hi","send_at":""}"#
        );
    }

    #[test]
    fn message_send_at_is_settable() {
        let message = Message::new("", "600111222", "hi").with_send_at("2026-01-01 10:00:00");
        assert_eq!(message.send_at(), "2026-01-01 10:00:00");

        let json = serde_json::to_string(&message).unwrap();
        assert_eq!(
            json,
            r#"{"from":"","to":"600111222","text":"hi","send_at":"2026-01-01 10:00:00"}"#
        );
    }

    #[test]
    fn recipient_requires_digits_only_number() {
        let recipient = Recipient::new("Bob", " 600111222 ").unwrap();
        assert_eq!(recipient.name(), "Bob");
        assert_eq!(recipient.mobile_number(), "600111222");

        assert!(Recipient::new("", "600111222").is_ok());
        assert!(matches!(
            Recipient::new("Bob", ""),
            Err(ValidationError::InvalidMobileNumber { .. })
        ));
        assert!(matches!(
            Recipient::new("Bob", "600-111-222"),
            Err(ValidationError::InvalidMobileNumber { .. })
        ));
        assert!(matches!(
            Recipient::new("Bob", "+34600111222"),
            Err(ValidationError::InvalidMobileNumber { .. })
        ));
    }
}
