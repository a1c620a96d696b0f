use thiserror::Error;

/// Errors surfaced by the filter registry.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested key is not registered.
    #[error("filter '{0}' not found")]
    NotFound(String),

    /// A filter definition was rejected by `add`.
    #[error("invalid filter definition: {0}")]
    Validation(String),

    /// Declarative filter configuration could not be parsed.
    #[error("invalid filter configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
