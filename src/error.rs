use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("service rejected request: {reason}")]
    Api { status: u16, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    Validation(String),
}

impl AppError {
    /// Reason string suitable for a user-facing notice. Mutation failures
    /// carry the service-provided reason when present, everything else
    /// collapses to a generic message.
    pub fn user_reason(&self) -> String {
        match self {
            AppError::Api { reason, .. } if !reason.is_empty() => reason.clone(),
            AppError::Validation(msg) => msg.clone(),
            _ => "Request failed".to_string(),
        }
    }
}
