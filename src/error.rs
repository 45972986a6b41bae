use thiserror::Error;

/// Errors that can occur while producing, translating or configuring a recipe
#[derive(Error, Debug)]
pub enum CookscaleError {
    /// HTTP request to a collaborator failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A collaborator answered with malformed JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The extraction collaborator produced no recipe
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The translation collaborator produced no usable result
    #[error("Translation failed: {0}")]
    Translation(String),

    /// A collaborator answered with an unexpected payload
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No API key in configuration or environment
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),

    /// No async runtime available to run background work
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
