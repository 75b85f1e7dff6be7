//! Story error types.

/// Specific error conditions for story generation and retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoryErrorKind {
    /// Model output did not match the story schema
    #[display("Story validation failed: {}", _0)]
    Validation(String),
    /// Caller supplied unusable input
    #[display("Invalid input: {}", _0)]
    InvalidInput(String),
    /// No story with the given id
    #[display("Story {} not found", _0)]
    StoryNotFound(i32),
    /// No job with the given id
    #[display("Job '{}' not found", _0)]
    JobNotFound(String),
    /// Story exists but has no root node
    #[display("Root node not found for story {}", _0)]
    RootNotFound(i32),
    /// Persisted tree violates a structural invariant
    #[display("Story integrity error: {}", _0)]
    Integrity(String),
    /// Store refused a write that would exceed its capacity
    #[display("Store capacity of {} nodes exceeded", _0)]
    CapacityExceeded(usize),
    /// Job has not produced a story yet
    #[display("Job '{}' is {}, story not available", job_id, status)]
    JobNotReady {
        /// Job identifier
        job_id: String,
        /// Current job status
        status: String,
    },
}

/// Error type for story operations.
///
/// # Examples
///
/// ```
/// use branchtale_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::RootNotFound(3));
/// assert!(format!("{}", err).contains("Root node not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a schema validation failure.
    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StoryErrorKind::Validation(message.into()))
    }

    /// Whether this error means the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            StoryErrorKind::StoryNotFound(_) | StoryErrorKind::JobNotFound(_)
        )
    }
}
