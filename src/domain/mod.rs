//! Domain layer: strong types with validation and invariants (no I/O).

mod config;
mod validation;
mod value;

pub use config::{ConfigError, PushConfig, RestConfig};
pub use validation::ValidationError;
pub use value::{Message, Recipient};
