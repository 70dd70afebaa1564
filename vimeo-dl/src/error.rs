use std::io;
use thiserror::Error;

/// One or more required external tools are not installed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{} couldn't be found in PATH, it is required to continue further", .missing.join(", "))]
pub struct DependencyError {
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("{0:?} doesn't look like a vimeo player url (expected {1})")]
    NotPlayer(String, &'static str),
    #[error("{0:?} is not a valid url: {1}")]
    Malformed(String, url::ParseError),
    #[error("{0:?} must be an absolute http(s) url")]
    NotHttp(String),
}

/// Every candidate cookie source was tried and none of them worked.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct DownloadError {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    #[error(transparent)]
    Url(#[from] UrlError),
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error("aborted")]
    Cancelled,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<requestty::ErrorKind> for Error {
    fn from(value: requestty::ErrorKind) -> Self {
        match value {
            requestty::ErrorKind::IoError(e) => Self::Io(e),
            _ => Self::Cancelled,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
