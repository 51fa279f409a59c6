//! The module contains the errors the engine can throw.
//!
//! Input errors ([`InvalidAmount`], [`InvalidSplitStrategy`],
//! [`InvalidParticipants`]) are terminal: the caller must fix the request.
//! Persistence errors ([`PersistenceConflict`], [`PersistenceUnavailable`]) are
//! reported as-is and never retried: writes carry no idempotency key.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidSplitStrategy`]: EngineError::InvalidSplitStrategy
//!  [`InvalidParticipants`]: EngineError::InvalidParticipants
//!  [`PersistenceConflict`]: EngineError::PersistenceConflict
//!  [`PersistenceUnavailable`]: EngineError::PersistenceUnavailable
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid split strategy: \"{0}\"")]
    InvalidSplitStrategy(String),
    #[error("Invalid participants: {0}")]
    InvalidParticipants(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Persistence conflict: {0}")]
    PersistenceConflict(String),
    #[error("Persistence unavailable: {0}")]
    PersistenceUnavailable(String),
    #[error(transparent)]
    Database(DbErr),
}

impl From<DbErr> for EngineError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg))
            | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                return Self::PersistenceConflict(msg);
            }
            _ => {}
        }
        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                Self::PersistenceUnavailable(err.to_string())
            }
            other => Self::Database(other),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidSplitStrategy(a), Self::InvalidSplitStrategy(b)) => a == b,
            (Self::InvalidParticipants(a), Self::InvalidParticipants(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::PersistenceConflict(a), Self::PersistenceConflict(b)) => a == b,
            (Self::PersistenceUnavailable(a), Self::PersistenceUnavailable(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::RuntimeErr;

    use super::*;

    #[test]
    fn connection_errors_are_unavailable() {
        let err = EngineError::from(DbErr::Conn(RuntimeErr::Internal("refused".to_string())));
        assert!(matches!(err, EngineError::PersistenceUnavailable(_)));
    }

    #[test]
    fn other_db_errors_stay_generic() {
        let err = EngineError::from(DbErr::RecordNotFound("tx".to_string()));
        assert!(matches!(err, EngineError::Database(_)));
    }
}
