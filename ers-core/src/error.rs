use thiserror::Error;

/// Unified error type for the ERS service.
#[derive(Error, Debug)]
pub enum ErsError {
    /// A platform variable was set but did not hold the expected JSON shape.
    #[error("Failed to decode {var}: {source}")]
    EnvDecode {
        var: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Attendee id space exhausted")]
    IdsExhausted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T, E = ErsError> = std::result::Result<T, E>;

impl ErsError {
    /// Map to HTTP status code. Every variant is a server-side failure.
    pub fn status_code(&self) -> u16 {
        match self {
            ErsError::EnvDecode { .. }
            | ErsError::Config(_)
            | ErsError::IdsExhausted
            | ErsError::Io(_)
            | ErsError::Serde(_) => 500,
        }
    }

    /// JSON error body.
    pub fn to_json_body(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "status": self.status_code(),
        })
    }
}
