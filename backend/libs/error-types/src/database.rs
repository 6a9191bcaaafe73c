//! Conversion from sqlx errors

use crate::ServiceError;

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                tracing::debug!(
                    constraint = db_err.constraint().unwrap_or("unknown"),
                    "Unique constraint violated"
                );
                return Self::conflict("Resource already exists");
            }
        }

        if matches!(err, sqlx::Error::RowNotFound) {
            return Self::NotFound { resource: "Record" };
        }

        Self::internal(err)
    }
}
