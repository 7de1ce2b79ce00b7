//! Top-level error wrapper types.

use crate::{ConfigError, PrerequisiteError, ServiceError, ValidationError};

/// Every failure a Storyarc operation can report.
///
/// # Examples
///
/// ```
/// use storyarc_error::{StoryError, ServiceError, ServiceErrorKind};
///
/// let err: StoryError = ServiceError::new(ServiceErrorKind::EmptyResponse).into();
/// assert!(format!("{}", err).contains("Service Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryErrorKind {
    /// Rejected user input
    #[from(ValidationError)]
    Validation(ValidationError),
    /// Stage requested out of order
    #[from(PrerequisiteError)]
    Prerequisite(PrerequisiteError),
    /// Provider failure
    #[from(ServiceError)]
    Service(ServiceError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Storyarc error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyarc Error: {}", _0)]
pub struct StoryError(Box<StoryErrorKind>);

impl StoryError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryErrorKind {
        &self.0
    }

    /// True for rejected user input.
    pub fn is_validation(&self) -> bool {
        matches!(self.kind(), StoryErrorKind::Validation(_))
    }

    /// True for stages requested out of order.
    pub fn is_prerequisite(&self) -> bool {
        matches!(self.kind(), StoryErrorKind::Prerequisite(_))
    }

    /// True for provider failures.
    pub fn is_service(&self) -> bool {
        matches!(self.kind(), StoryErrorKind::Service(_))
    }

    /// Short status label shown next to an output field.
    ///
    /// ```
    /// use storyarc_error::{StoryError, PrerequisiteError, PrerequisiteErrorKind};
    ///
    /// let err: StoryError = PrerequisiteError::new(PrerequisiteErrorKind::MissingAnalysis).into();
    /// assert_eq!(err.status_label(), "대기 중");
    /// ```
    pub fn status_label(&self) -> &'static str {
        match self.kind() {
            StoryErrorKind::Prerequisite(_) => "대기 중",
            StoryErrorKind::Validation(_) => "입력 필요",
            StoryErrorKind::Service(_) | StoryErrorKind::Config(_) => "오류",
        }
    }
}

// Generic From implementation for any type that converts to StoryErrorKind
impl<T> From<T> for StoryError
where
    T: Into<StoryErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyarc operations.
pub type StoryResult<T> = std::result::Result<T, StoryError>;
