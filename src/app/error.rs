use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TesseraError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Text decoding error: {0}")]
    TextDecode(#[from] std::string::FromUtf8Error),

    #[error("Image decoding error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure of a coalesced fetch, shared verbatim by every caller
    /// that awaited the same in-flight request.
    #[error(transparent)]
    InFlight(Arc<TesseraError>),
}

impl TesseraError {
    /// True for connectivity-shaped failures (timeout, refused/unreachable
    /// connection) that are worth retrying automatically once the network
    /// comes back. Bad HTTP statuses and decode failures are not transient.
    pub fn is_transient(&self) -> bool {
        match self {
            TesseraError::Http(e) => e.is_timeout() || e.is_connect(),
            TesseraError::InFlight(inner) => inner.is_transient(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TesseraError>;
