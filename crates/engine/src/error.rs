use bento_core::error::CoreError;

/// Error type for engine operations.
///
/// Domain rule violations travel as [`CoreError`]; anything the database
/// reports that is not a known constraint stays a [`sqlx::Error`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// True for `DuplicateOrder` and other conflicts.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Core(CoreError::Conflict(_)))
    }
}

/// Translate a unique violation on a known constraint into a domain error.
///
/// `classify` receives the constraint name and returns the domain error to
/// raise, or `None` to keep the database error as is.
pub(crate) fn map_unique(
    err: sqlx::Error,
    classify: impl FnOnce(&str) -> Option<CoreError>,
) -> EngineError {
    let mapped = bento_db::unique_violation(&err).and_then(classify);
    match mapped {
        Some(core) => EngineError::Core(core),
        None => EngineError::Database(err),
    }
}
