use jdl_core::error::CoreError;

/// Error returned by repository operations that enforce domain rules while
/// holding row locks.
///
/// Plain CRUD methods return `sqlx::Error` directly.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Rule(#[from] CoreError),
}

pub type RepoResult<T> = Result<T, RepoError>;
