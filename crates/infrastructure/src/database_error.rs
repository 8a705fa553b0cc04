use tasklane_core::AppError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Translates a sqlx failure into the matching application error category.
pub(crate) fn map_database_error(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        match database_error.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return AppError::Conflict(format!("failed to {operation}: record already exists"));
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return AppError::Validation(format!(
                    "failed to {operation}: referenced record does not exist"
                ));
            }
            _ => {}
        }
    }

    if matches!(error, sqlx::Error::RowNotFound) {
        return AppError::NotFound(format!("failed to {operation}: record not found"));
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

/// Returns whether the error is a foreign-key violation.
pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(database_error)
            if database_error.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    )
}

/// Converts a database counter into an unsigned count.
pub(crate) fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}
