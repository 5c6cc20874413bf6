//! Error types for origin request signing.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Broad classes of failure, so callers can separate deployment problems from bad
/// requests and from bugs in the signing path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credentials or origin configuration are unusable.
    Configuration,
    /// The inbound request cannot be signed as received.
    Request,
    /// The signer rejected an otherwise valid request.
    Signing,
}

/// Errors that can occur while signing an origin request
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot extract a region from origin domain `{domain}`")]
    RegionExtraction { domain: String },

    #[error("credential value `{variable}` is missing or empty")]
    MissingCredentials { variable: &'static str },

    #[error("no credential source configured")]
    MissingCredentialSource,

    #[error("request body is not valid base64: {0}")]
    InvalidBodyEncoding(#[from] base64::DecodeError),

    #[error("request body was truncated by the edge and cannot be signed")]
    TruncatedBody,

    #[error("origin request event contains no records")]
    EventWithoutRecords,

    #[error("failed to sign request: {0}")]
    Signing(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Classifies the error for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::RegionExtraction { .. }
            | Error::MissingCredentials { .. }
            | Error::MissingCredentialSource => ErrorKind::Configuration,
            Error::InvalidBodyEncoding(_) | Error::TruncatedBody | Error::EventWithoutRecords => {
                ErrorKind::Request
            }
            Error::Signing(_) => ErrorKind::Signing,
        }
    }
}
