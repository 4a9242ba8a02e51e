use thiserror::Error;

/// Errors raised while configuring or calling the completion API
#[derive(Error, Debug)]
pub enum JarvisError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("API key missing for {0}")]
    MissingApiKey(String),

    #[error("Transport Error: {0}")]
    Transport(String),

    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("HTTP Error: {status_code} - {message}")]
    Http { status_code: u16, message: String },

    #[error("Parsing Error: {0}")]
    Parsing(String),

    #[error("Empty response from completion API")]
    EmptyResponse,
}

impl JarvisError {
    /// True when the failure came from missing or rejected credentials
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Self::MissingApiKey(_) | Self::Auth(_))
    }
}

/// Result type for J.A.R.V.I.S operations
pub type JarvisResult<T> = Result<T, JarvisError>;
