//! Job lifecycle error types.

/// Job state machine violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum JobErrorKind {
    /// The requested status change is not an edge of the lifecycle
    #[display("Illegal job transition from {} to {}", from, to)]
    IllegalTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
    /// Stored status changed underneath the caller
    #[display("Job '{}' expected status {} but found {}", job_id, expected, found)]
    Conflict {
        /// Job identifier
        job_id: String,
        /// Status the caller transitioned from
        expected: String,
        /// Status actually stored
        found: String,
    },
}

/// Job error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Job Error: {} at line {} in {}", kind, line, file)]
pub struct JobError {
    /// The error kind
    pub kind: JobErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl JobError {
    /// Create a new JobError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: JobErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
