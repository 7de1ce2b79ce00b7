//! Errors for pipeline stages requested out of order.

/// The stage that had to complete first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PrerequisiteErrorKind {
    /// The script has not been analyzed yet
    #[display("Script analysis must be completed first")]
    MissingAnalysis,
    /// No revised story proposal exists yet
    #[display("Feedback must be submitted before acts can be generated")]
    MissingRevision,
    /// An earlier act is still empty
    #[display("Act '{}' requires act '{}' to be generated first", requested, missing)]
    MissingAct {
        /// Act that was requested
        requested: String,
        /// Earliest act that is still empty
        missing: String,
    },
}

/// Error raised when a stage is requested before its prerequisite.
///
/// # Examples
///
/// ```
/// use storyarc_error::{PrerequisiteError, PrerequisiteErrorKind};
///
/// let err = PrerequisiteError::new(PrerequisiteErrorKind::MissingAct {
///     requested: "Twist".to_string(),
///     missing: "Development".to_string(),
/// });
/// assert!(format!("{}", err).contains("'Development'"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Prerequisite Error: {} at line {} in {}", kind, line, file)]
pub struct PrerequisiteError {
    /// The missing prerequisite
    pub kind: PrerequisiteErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PrerequisiteError {
    /// Create a new PrerequisiteError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PrerequisiteErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
