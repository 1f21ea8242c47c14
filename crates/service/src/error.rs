use kvartal_core::error::CoreError;

/// Service-level error type.
///
/// Wraps [`CoreError`] for domain errors and lets database errors propagate
/// unchanged so callers can classify them.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A domain-level error from `kvartal-core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for service return values.
pub type ServiceResult<T> = Result<T, ServiceError>;
