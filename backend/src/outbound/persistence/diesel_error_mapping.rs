//! Shared Diesel error mapping for the marketplace repositories.
//!
//! Every repository port error has the same two shapes, `Connection` and
//! `Query`, so one mapping serves all four adapters.

use tracing::{debug, warn};

use crate::domain::ports::{
    NotificationRepositoryError, ProfileRepositoryError, RequestRepositoryError,
    ResponseRepositoryError,
};

use super::pool::PoolError;

/// Port errors that distinguish an unreachable store from a failed query.
pub(crate) trait RepositoryError {
    fn from_connection(message: String) -> Self;
    fn from_query(message: String) -> Self;
}

macro_rules! impl_repository_error {
    ($($error:ty),* $(,)?) => {
        $(
            impl RepositoryError for $error {
                fn from_connection(message: String) -> Self {
                    Self::connection(message)
                }

                fn from_query(message: String) -> Self {
                    Self::query(message)
                }
            }
        )*
    };
}

impl_repository_error!(
    ProfileRepositoryError,
    RequestRepositoryError,
    ResponseRepositoryError,
    NotificationRepositoryError,
);

pub(crate) fn map_pool_error<E: RepositoryError>(error: PoolError) -> E {
    E::from_connection(error.into_message())
}

/// Log the Diesel failure and collapse it into a port error.
///
/// Database messages stay in the debug log; callers only see a short
/// category.
pub(crate) fn map_diesel_error<E: RepositoryError>(error: diesel::result::Error) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

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
        DieselError::NotFound => E::from_query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::from_query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::from_connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            warn!(
                constraint = ?info.constraint_name(),
                "foreign key violation"
            );
            E::from_query("foreign key violation".to_owned())
        }
        _ => E::from_query("database error".to_owned()),
    }
}

/// A stored row that no longer decodes into a domain value.
pub(crate) fn corrupt_row<E: RepositoryError>(table: &'static str, reason: &str) -> E {
    warn!(table, reason, "stored row failed to decode");
    E::from_query(format!("corrupt {table} row: {reason}"))
}
