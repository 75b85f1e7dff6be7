//! Top-level error wrapper types.

use crate::{ConfigError, JobError, JsonError, ProviderError, StoryError};
#[cfg(feature = "database")]
use crate::DatabaseError;

/// Every error condition a Branchtale operation can surface.
///
/// # Examples
///
/// ```
/// use branchtale_error::{BranchtaleError, ConfigError};
///
/// let config_err = ConfigError::new("missing provider section");
/// let err: BranchtaleError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum BranchtaleErrorKind {
    /// Story validation, lookup, or integrity error
    #[from(StoryError)]
    Story(StoryError),
    /// Job lifecycle error
    #[from(JobError)]
    Job(JobError),
    /// LLM provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
}

/// Branchtale error with kind discrimination.
///
/// # Examples
///
/// ```
/// use branchtale_error::{BranchtaleErrorKind, BranchtaleResult, StoryError, StoryErrorKind};
///
/// fn might_fail() -> BranchtaleResult<()> {
///     Err(StoryError::new(StoryErrorKind::Validation("no title".into())))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), BranchtaleErrorKind::Story(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Branchtale Error: {}", _0)]
pub struct BranchtaleError(Box<BranchtaleErrorKind>);

impl BranchtaleError {
    /// Create a new error from a kind.
    pub fn new(kind: BranchtaleErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BranchtaleErrorKind {
        &self.0
    }

    /// The story error kind, if this is a story error.
    pub fn story_kind(&self) -> Option<&crate::StoryErrorKind> {
        match self.kind() {
            BranchtaleErrorKind::Story(e) => Some(&e.kind),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to BranchtaleErrorKind
impl<T> From<T> for BranchtaleError
where
    T: Into<BranchtaleErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Branchtale operations.
pub type BranchtaleResult<T> = std::result::Result<T, BranchtaleError>;
