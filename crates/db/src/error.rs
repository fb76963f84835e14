use galeria_core::error::PersistenceError;

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE class for integrity constraint violations.
const INTEGRITY_CLASS: &str = "23";

/// Classify a sqlx error into the store error taxonomy.
///
/// - `23505` maps to [`PersistenceError::Duplicate`].
/// - Any other class `23` code (foreign key, check, not-null) maps to
///   [`PersistenceError::Integrity`].
/// - Everything else is treated as a connectivity failure.
pub fn classify_sqlx_error(err: &sqlx::Error) -> PersistenceError {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code();
            match code.as_deref() {
                Some(UNIQUE_VIOLATION) => PersistenceError::Duplicate(format!(
                    "{} (constraint {})",
                    db_err.message(),
                    db_err.constraint().unwrap_or("unknown")
                )),
                Some(c) if c.starts_with(INTEGRITY_CLASS) => {
                    PersistenceError::Integrity(db_err.message().to_string())
                }
                _ => PersistenceError::Connectivity(db_err.to_string()),
            }
        }
        other => PersistenceError::Connectivity(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn pool_timeout_is_connectivity() {
        let err = classify_sqlx_error(&sqlx::Error::PoolTimedOut);
        assert_matches!(err, PersistenceError::Connectivity(_));
    }

    #[test]
    fn row_not_found_is_connectivity() {
        let err = classify_sqlx_error(&sqlx::Error::RowNotFound);
        assert_matches!(err, PersistenceError::Connectivity(_));
    }
}
