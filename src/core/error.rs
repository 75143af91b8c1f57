use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

/// Everything that can abandon a single polling cycle.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("request to status API failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("status API returned HTTP {status}")]
    Endpoint { status: u16 },

    #[error("status API body is not valid JSON: {0}")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("missing or empty field `{field}`")]
    MissingField { field: &'static str },

    #[error("unknown homework status `{status}`")]
    UnknownStatus { status: String },
}

impl BotError {
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::Transport(_) => "transport",
            BotError::Endpoint { .. } => "endpoint",
            BotError::MalformedResponse(_) => "malformed_response",
            BotError::Shape(_) => "shape",
            BotError::MissingField { .. } => "missing_field",
            BotError::UnknownStatus { .. } => "unknown_status",
        }
    }
}
