use std::future::Future;
use std::time::Duration;

use crate::domain::errors::StorageError;

/// Upper bound for one store round-trip unless configured otherwise.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Run a store operation under `timeout`, translating driver failures.
pub(crate) async fn bounded<T, F>(timeout: Duration, operation: F) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result.map_err(storage_error),
        Err(_) => {
            tracing::error!(timeout_ms = timeout.as_millis() as u64, "Store operation timed out");
            Err(StorageError::Timeout(timeout))
        }
    }
}

/// Sort a driver error by its SQLSTATE code, falling back to its message.
pub(crate) fn storage_error(err: sqlx::Error) -> StorageError {
    if let Some(db_err) = err.as_database_error() {
        return match db_err.code() {
            Some(code) => StorageError::from_sqlstate(&code, db_err.constraint(), db_err.message()),
            None => StorageError::from_message(db_err.message()),
        };
    }

    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(err.to_string()),
        other => StorageError::from_message(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let result = bounded(Duration::from_secs(1), async { Ok::<_, sqlx::Error>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let timeout = Duration::from_millis(10);
        let result = bounded(timeout, async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, sqlx::Error>(())
        })
        .await;

        assert_eq!(result, Err(StorageError::Timeout(timeout)));
    }

    #[test]
    fn test_connectivity_errors_are_unavailable() {
        assert!(matches!(
            storage_error(sqlx::Error::PoolTimedOut),
            StorageError::Unavailable(_)
        ));
        assert!(matches!(
            storage_error(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "refused"
            ))),
            StorageError::Unavailable(_)
        ));
    }

    #[test]
    fn test_other_errors_fall_back_to_message() {
        let error = storage_error(sqlx::Error::Protocol(
            "duplicate key value violates unique constraint (SQLSTATE 23505)".to_string(),
        ));
        assert_eq!(
            error.constraint_kind(),
            Some(crate::domain::errors::ConstraintKind::Duplicate)
        );

        assert!(matches!(
            storage_error(sqlx::Error::RowNotFound),
            StorageError::Database(_)
        ));
    }
}
