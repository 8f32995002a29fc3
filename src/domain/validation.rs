use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    NoMessages,
    NoRecipients,
    InvalidMobileNumber { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::NoMessages => write!(f, "no messages to send"),
            Self::NoRecipients => write!(f, "no recipients specified"),
            Self::InvalidMobileNumber { input } => {
                write!(f, "invalid mobile number: {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
