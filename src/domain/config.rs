use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A required gateway configuration field is absent or empty.
pub enum ConfigError {
    MissingField { field: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "{field} has not been provided")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn require(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::MissingField { field });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
/// Credentials and wiring for the Gateway360 REST API (3.0).
///
/// Fields are plain strings so a partially wired instance is representable;
/// [`RestConfig::validate`] runs before every network operation and reports
/// the first missing field. `sender_name` may stay blank.
pub struct RestConfig {
    pub api_key: String,
    pub sender_name: String,
    pub phone_prefix: String,
}

impl RestConfig {
    /// Create a config with a blank sender name.
    ///
    /// The prefix is the international dialing prefix prepended to bare
    /// numbers by [`send_single`](crate::RestClient::send_single), e.g. `+34`.
    pub fn new(api_key: impl Into<String>, phone_prefix: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            sender_name: String::new(),
            phone_prefix: phone_prefix.into(),
        }
    }

    /// Set the sender name shown to recipients.
    pub fn sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = sender_name.into();
        self
    }

    /// Check that all required fields are present, reporting the first gap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("api_key", &self.api_key)?;
        require("phone_prefix", &self.phone_prefix)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// Credentials and wiring for the legacy HTTPV3 push gateway.
///
/// Same representable-when-incomplete contract as [`RestConfig`]. The
/// `phone_prefix` is required by the account wiring even though the push
/// wire format carries its own fixed country code.
pub struct PushConfig {
    pub username: String,
    pub password: String,
    pub sender_name: String,
    pub phone_prefix: String,
}

impl PushConfig {
    /// Create a config with a blank sender name.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        phone_prefix: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            sender_name: String::new(),
            phone_prefix: phone_prefix.into(),
        }
    }

    /// Set the sender name shown to recipients.
    pub fn sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = sender_name.into();
        self
    }

    /// Check that all required fields are present, reporting the first gap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("username", &self.username)?;
        require("password", &self.password)?;
        require("phone_prefix", &self.phone_prefix)?;
        Ok(())
    }
}
