use std::error::Error;
use std::fmt;

use warp::reject::Reject;

use crate::constants::{
    ERROR_CANCELLED, ERROR_INTERNAL, ERROR_MISSING_CREDENTIAL, ERROR_TIMEOUT,
};

/// Error type for the relay server
#[derive(Debug, Clone)]
pub struct RelayError {
    pub message: String,
    pub status_code: u16,
    kind: RelayErrorKind,
}

#[derive(Debug, Clone)]
enum RelayErrorKind {
    MissingCredential,
    BadRequest,
    UpstreamUnavailable,
    UpstreamRejected,
    StreamTimeout,
    RequestCancelled,
    Internal,
}

impl RelayError {
    pub fn missing_credential() -> Self {
        Self {
            message: ERROR_MISSING_CREDENTIAL.to_string(),
            status_code: 400,
            kind: RelayErrorKind::MissingCredential,
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status_code: 400,
            kind: RelayErrorKind::BadRequest,
        }
    }

    pub fn upstream_unavailable(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status_code: 502,
            kind: RelayErrorKind::UpstreamUnavailable,
        }
    }

    /// Categorizes a non-success upstream status. The raw upstream body is
    /// never carried here so no credential hint or stack detail can reach the
    /// caller.
    pub fn upstream_rejected(upstream_status: u16) -> Self {
        let message = match upstream_status {
            401 | 403 => "completion API rejected the request (authentication)".to_string(),
            429 => "completion API rejected the request (rate limited)".to_string(),
            status => format!("completion API rejected the request (status {})", status),
        };
        Self {
            message,
            status_code: 502,
            kind: RelayErrorKind::UpstreamRejected,
        }
    }

    pub fn stream_timeout() -> Self {
        Self {
            message: ERROR_TIMEOUT.to_string(),
            status_code: 504,
            kind: RelayErrorKind::StreamTimeout,
        }
    }

    pub fn request_cancelled() -> Self {
        Self {
            message: ERROR_CANCELLED.to_string(),
            status_code: 499,
            kind: RelayErrorKind::RequestCancelled,
        }
    }

    pub fn internal(message: &str) -> Self {
        log::error!("internal error: {}", message);
        Self {
            message: ERROR_INTERNAL.to_string(),
            status_code: 500,
            kind: RelayErrorKind::Internal,
        }
    }

    pub fn is_missing_credential(&self) -> bool {
        matches!(self.kind, RelayErrorKind::MissingCredential)
    }

    pub fn is_bad_request(&self) -> bool {
        matches!(self.kind, RelayErrorKind::BadRequest)
    }

    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self.kind, RelayErrorKind::UpstreamUnavailable)
    }

    pub fn is_upstream_rejected(&self) -> bool {
        matches!(self.kind, RelayErrorKind::UpstreamRejected)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.kind, RelayErrorKind::StreamTimeout)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, RelayErrorKind::RequestCancelled)
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RelayError {}: {}", self.status_code, self.message)
    }
}

impl Error for RelayError {}

impl Reject for RelayError {}

#[macro_export]
macro_rules! check_cancelled {
    ($token:expr) => {
        if $token.is_cancelled() {
            return Err($crate::error::RelayError::request_cancelled());
        }
    };
}
