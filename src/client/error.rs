//! Resource client errors

use reqwest::{Method, StatusCode};

/// Error returned by every resource client call
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure, non-2xx status or undecodable payload
    #[error("Request failed: {method} {url}: {cause}")]
    RequestFailed {
        method: Method,
        url: String,
        #[source]
        cause: FailureCause,
    },

    /// The client could not be constructed
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Underlying cause of a failed request
#[derive(Debug, thiserror::Error)]
pub enum FailureCause {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded with {0}")]
    Status(StatusCode),

    #[error("unexpected payload: {0}")]
    Payload(String),
}

impl ClientError {
    pub fn request_failed(method: Method, url: impl Into<String>, cause: impl Into<FailureCause>) -> Self {
        ClientError::RequestFailed {
            method,
            url: url.into(),
            cause: cause.into(),
        }
    }

    /// HTTP status of the failed response, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::RequestFailed {
                cause: FailureCause::Status(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }
}
