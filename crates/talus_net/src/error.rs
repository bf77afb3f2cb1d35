use thiserror::Error;

/// Failures from the external lookup providers.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("no geocoding match for '{0}'")]
    NoMatch(String),

    #[error("missing inference API key")]
    MissingApiKey,

    #[error("malformed provider payload: {0}")]
    Payload(String),
}
