//! Typed errors for rentahuman API operations.

use std::time::Duration;

use thiserror::Error;

/// Classified outcome of a failed API operation.
///
/// Callers branch on these variants; the client never downgrades one
/// classification into another. Retryable variants (rate limits, 5xx
/// server errors, transport failures) are retried internally up to the
/// configured ceiling and surface wrapped in [`Error::RetriesExhausted`]
/// once the budget is spent. Everything else surfaces on the first
/// occurrence.
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any request was sent, a server-side 400/422
    /// rejection, or a 2xx body that did not match the expected shape.
    #[error("validation error: {0}")]
    Validation(String),

    /// HTTP 401 or 403.
    #[error("authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    /// HTTP 404.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// HTTP 429. `retry_after` is the server's advisory wait.
    #[error("rate limited, retry after {}s", .retry_after.as_secs_f64())]
    RateLimit { retry_after: Duration },

    /// HTTP 5xx, or a status outside the documented contract.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Transport-level failure: connect, TLS, timeout.
    #[error("connection error: {0}")]
    Connection(String),

    /// A retryable failure that survived every attempt in the budget.
    /// Carries the last classified error as its source.
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },
}

/// Convenience alias for client results.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The HTTP status associated with this error, when one applies.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::RateLimit { .. } => Some(429),
            Self::RetriesExhausted { source, .. } => source.status(),
            Self::Validation(_) | Self::Connection(_) => None,
        }
    }

    /// Whether another attempt could reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimit { .. } | Self::Connection(_) => true,
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Advisory wait carried by a rate-limit error, including one wrapped
    /// by [`Error::RetriesExhausted`].
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after } => Some(*retry_after),
            Self::RetriesExhausted { source, .. } => source.retry_after(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Connection(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_variants_are_not_retryable() {
        let fatal = [
            Error::Validation("bad input".to_string()),
            Error::Authentication {
                status: 401,
                message: "missing key".to_string(),
            },
            Error::NotFound {
                message: "no such human".to_string(),
            },
            Error::Server {
                status: 418,
                message: "teapot".to_string(),
            },
        ];
        for error in fatal {
            assert!(!error.is_retryable(), "{error} should be fatal");
        }
    }

    #[test]
    fn transient_variants_are_retryable() {
        assert!(Error::RateLimit {
            retry_after: Duration::from_secs(1)
        }
        .is_retryable());
        assert!(Error::Server {
            status: 503,
            message: "overloaded".to_string()
        }
        .is_retryable());
        assert!(Error::Connection("reset by peer".to_string()).is_retryable());
    }

    #[test]
    fn retry_after_is_readable_through_the_exhausted_wrapper() {
        let exhausted = Error::RetriesExhausted {
            attempts: 4,
            source: Box::new(Error::RateLimit {
                retry_after: Duration::from_secs(7),
            }),
        };
        assert_eq!(exhausted.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(exhausted.status(), Some(429));
    }
}
