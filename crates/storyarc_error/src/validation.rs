//! Validation error types for user-supplied input.

/// Specific validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ValidationErrorKind {
    /// A required text field was empty or whitespace-only
    #[display("{} must not be empty", field)]
    EmptyInput {
        /// Name of the offending field
        field: String,
    },
    /// A request body could not be decoded
    #[display("Invalid request body: {}", reason)]
    InvalidBody {
        /// Decoder message
        reason: String,
    },
    /// A target character count fell outside the supported range
    #[display("Target count {} for act '{}' is outside [{}, {}]", value, act, min, max)]
    TargetOutOfRange {
        /// Act the target belongs to
        act: String,
        /// Rejected value
        value: usize,
        /// Inclusive lower bound
        min: usize,
        /// Inclusive upper bound
        max: usize,
    },
}

/// Error raised when user input is rejected before any work is done.
///
/// # Examples
///
/// ```
/// use storyarc_error::{ValidationError, ValidationErrorKind};
///
/// let err = ValidationError::new(ValidationErrorKind::EmptyInput {
///     field: "feedback".to_string(),
/// });
/// assert!(format!("{}", err).contains("feedback must not be empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Validation Error: {} at line {} in {}", kind, line, file)]
pub struct ValidationError {
    /// The specific error condition
    pub kind: ValidationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl ValidationError {
    /// Create a new ValidationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ValidationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for [`ValidationErrorKind::EmptyInput`].
    #[track_caller]
    pub fn empty(field: impl Into<String>) -> Self {
        Self::new(ValidationErrorKind::EmptyInput {
            field: field.into(),
        })
    }
}
