//! Shared Diesel error mapping for the recipe repositories.
//!
//! Repositories call [`classify_diesel_error`] and translate each
//! [`StoreFailure`] into their own port error; constraint violations are the
//! only way the store reports duplicates and dangling references.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The connection dropped mid-operation.
    Connection(String),
    /// Any other failure.
    Query(String),
    /// A unique index rejected the write.
    UniqueViolation(String),
    /// A check constraint rejected the write.
    CheckViolation(String),
    /// A foreign key rejected the write.
    ForeignKeyViolation(String),
}

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Classify a Diesel error, logging the raw database detail at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> StoreFailure {
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
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => {
            StoreFailure::Query("database query error".to_owned())
        }
        DieselError::DatabaseError(kind, info) => {
            let detail = info
                .constraint_name()
                .map_or_else(|| info.message().to_owned(), ToOwned::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => StoreFailure::UniqueViolation(detail),
                DatabaseErrorKind::CheckViolation => StoreFailure::CheckViolation(detail),
                DatabaseErrorKind::ForeignKeyViolation => {
                    StoreFailure::ForeignKeyViolation(detail)
                }
                DatabaseErrorKind::ClosedConnection => {
                    StoreFailure::Connection("database connection error".to_owned())
                }
                _ => StoreFailure::Query("database error".to_owned()),
            }
        }
        _ => StoreFailure::Query("database error".to_owned()),
    }
}

/// Map Diesel errors for repositories that only distinguish query and
/// connection failures.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
{
    match classify_diesel_error(error) {
        StoreFailure::Connection(message) => connection(message),
        StoreFailure::Query(message)
        | StoreFailure::UniqueViolation(message)
        | StoreFailure::CheckViolation(message)
        | StoreFailure::ForeignKeyViolation(message) => query(message),
    }
}

/// Convert a page offset to the signed type PostgreSQL expects.
pub(crate) fn offset_to_i64<E, Q>(offset: u64, query: Q) -> Result<i64, E>
where
    Q: FnOnce(String) -> E,
{
    i64::try_from(offset).map_err(|_| query(format!("offset {offset} out of range")))
}
