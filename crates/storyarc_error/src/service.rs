//! Language model provider errors.

/// Provider failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ServiceErrorKind {
    /// Transport-level failure (connection, TLS, timeout)
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// Provider returned a non-success status
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Response body could not be decoded
    #[display("Failed to parse response: {}", _0)]
    Parse(String),
    /// Response decoded but contained no text
    #[display("Response contained no text content")]
    EmptyResponse,
    /// Request could not be assembled
    #[display("Failed to build request: {}", _0)]
    Builder(String),
    /// Every attempt failed
    #[display("API call failed after {} attempts: {}", attempts, last_error)]
    RetriesExhausted {
        /// Number of attempts made
        attempts: usize,
        /// Message of the final failure
        last_error: String,
    },
}

/// Error returned by a completion transport.
///
/// # Examples
///
/// ```
/// use storyarc_error::{ServiceError, ServiceErrorKind};
///
/// let err = ServiceError::new(ServiceErrorKind::Api {
///     status: 429,
///     message: "Too many requests".to_string(),
/// });
/// assert!(format!("{}", err).contains("status 429"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Service Error: {} at line {} in {}", kind, line, file)]
pub struct ServiceError {
    /// The kind of failure
    pub kind: ServiceErrorKind,
    /// Line number where the error was created
    pub line: u32,
    /// File where the error was created
    pub file: &'static str,
}

impl ServiceError {
    /// Create a new ServiceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
