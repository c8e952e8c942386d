use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoverError>;

#[derive(Debug, Error)]
pub enum CoverError {
    #[error("Discogs token is missing. Please provide it via options or .env file (DISCOGS_TOKEN).")]
    MissingCredential,

    #[error("Either \"artist\" and \"title\" or \"releaseId\" must be provided.")]
    MissingSearchTerms,

    #[error("Invalid releaseId format: \"{0}\"")]
    InvalidIdentifierFormat(String),

    #[error("Discogs API error: {status} {status_text}")]
    Api { status: u16, status_text: String },

    #[error("No results found for \"{artist} - {title}\"")]
    NoResultsFound { artist: String, title: String },

    #[error("Invalid choice: {0:?}")]
    InvalidChoice(String),

    #[error("No primary image found for {0}.")]
    NoPrimaryImage(String),

    #[error("Failed to download image: {status} {status_text}")]
    Download { status: u16, status_text: String },

    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

/// Classification of a [`CoverError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingCredential,
    MissingSearchTerms,
    InvalidIdentifierFormat,
    ApiError,
    NoResultsFound,
    InvalidChoice,
    NoPrimaryImage,
    DownloadError,
    Decode,
    Transport,
    Configuration,
}

impl CoverError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoverError::MissingCredential => ErrorKind::MissingCredential,
            CoverError::MissingSearchTerms => ErrorKind::MissingSearchTerms,
            CoverError::InvalidIdentifierFormat(_) => ErrorKind::InvalidIdentifierFormat,
            CoverError::Api { .. } => ErrorKind::ApiError,
            CoverError::NoResultsFound { .. } => ErrorKind::NoResultsFound,
            CoverError::InvalidChoice(_) => ErrorKind::InvalidChoice,
            CoverError::NoPrimaryImage(_) => ErrorKind::NoPrimaryImage,
            CoverError::Download { .. } => ErrorKind::DownloadError,
            CoverError::Decode { .. } => ErrorKind::Decode,
            CoverError::Http(_) => ErrorKind::Transport,
            CoverError::Url(_) | CoverError::NotConfigured(_) => ErrorKind::Configuration,
        }
    }
}
