//! Diesel and pool error mapping shared by the repositories.
//!
//! Each repository port has its own error enum with `connection` and `query`
//! constructors; these helpers take those constructors so the classification
//! lives in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map a pool checkout failure onto a repository's connection variant.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Map a Diesel failure onto a repository's query or connection variant.
pub(crate) fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error".to_owned())
        }
        _ => query("database error".to_owned()),
    }
}

/// Whether the failure is a unique constraint violation.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(String),
        Connection(String),
    }

    fn map(error: DieselError) -> Mapped {
        map_diesel_error(error, Mapped::Query, Mapped::Connection)
    }

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            map(DieselError::NotFound),
            Mapped::Query("record not found".to_owned())
        );
    }

    #[rstest]
    fn closed_connection_is_a_connection_failure() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );
        assert_eq!(
            map(error),
            Mapped::Connection("database connection error".to_owned())
        );
    }

    #[rstest]
    fn unique_violation_is_detected() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        );
        assert!(is_unique_violation(&error));
        assert!(!is_unique_violation(&DieselError::NotFound));
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".to_owned()));
    }
}
