use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The current url is not valid: {0}")]
    InvalidUrl(String),

    #[error("Invalid header {name}: {reason}")]
    InvalidHeaderValue { name: String, reason: String },

    #[error("Request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Response body was already consumed")]
    UnreadableBody,

    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    #[error("Could not build the transport: {0}")]
    Transport(#[source] reqwest::Error),
}

impl Error {
    pub(crate) fn invalid_header(name: &str, reason: impl fmt::Display) -> Error {
        Error::InvalidHeaderValue {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for failures raised before any I/O took place.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidUrl(_) | Error::InvalidHeaderValue { .. } | Error::InvalidCertificate(_)
        )
    }
}
