use craft_http::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A CSS selector failed to parse.
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    /// The page did not contain what the helper scrapes for.
    #[error("page has no {0}")]
    MissingElement(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
