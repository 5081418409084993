//! Mapping of database errors into ledger errors.

use hoegye_core::LedgerError;
use sea_orm::{DbErr, SqlErr};

/// Wraps a database error as an infrastructure failure.
pub(crate) fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}

/// Returns true for a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().to_lowercase().contains("unique constraint")
}

/// Returns true for lock or serialization conflicts that a fresh attempt can
/// resolve.
pub(crate) fn is_lock_conflict(err: &DbErr) -> bool {
    let message = err.to_string().to_lowercase();
    ["database is locked", "could not serialize", "deadlock detected"]
        .iter()
        .any(|needle| message.contains(needle))
}

/// Converts an integer column into the unsigned domain value.
pub(crate) fn to_u32(value: i32, column: &str) -> Result<u32, LedgerError> {
    u32::try_from(value)
        .map_err(|_| LedgerError::Internal(format!("negative value {value} in column {column}")))
}

/// Converts an unsigned domain value into an integer column.
pub(crate) fn to_i32(value: u32, column: &str) -> Result<i32, LedgerError> {
    i32::try_from(value)
        .map_err(|_| LedgerError::InvalidInput(format!("{column} {value} is out of range")))
}

#[cfg(test)]
mod tests {
    use sea_orm::RuntimeErr;

    use super::*;

    #[test]
    fn test_lock_conflicts_are_detected_by_message() {
        let locked = DbErr::Exec(RuntimeErr::Internal("database is locked".into()));
        assert!(is_lock_conflict(&locked));

        let other = DbErr::Custom("syntax error".into());
        assert!(!is_lock_conflict(&other));
        assert!(!is_unique_violation(&other));
    }

    #[test]
    fn test_integer_conversions() {
        assert_eq!(to_u32(7, "level").unwrap(), 7);
        assert!(to_u32(-1, "level").is_err());
        assert_eq!(to_i32(12, "month").unwrap(), 12);
        assert!(to_i32(u32::MAX, "month").is_err());
    }
}
