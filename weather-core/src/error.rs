use serde_json::{Value, json};
use thiserror::Error;

/// Failure of a single upstream weather call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream answered, but with a non-2xx status.
    #[error("upstream responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be sent or the body could not be read.
    #[error("failed to reach upstream: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 2xx body that does not have the expected shape.
    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

/// A rejected search input, reported per field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// JSON body sent back to the client along with a 422 status.
    ///
    /// ```json
    /// { "message": "The city field is required.",
    ///   "errors": { "city": ["The city field is required."] } }
    /// ```
    pub fn to_body(&self) -> Value {
        json!({
            "message": self.message,
            "errors": { self.field: [self.message] },
        })
    }
}
