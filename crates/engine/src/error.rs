//! The module contains the error the engine can throw.
//!
//! Every failure of a core operation falls in one of five classes:
//!
//! - [`Validation`] malformed input (bad date string, non-positive amount).
//! - [`NotFound`] a referenced property/booking/expense/ownership is absent,
//!   or the caller has no membership that would let them see it.
//! - [`Conflict`] a business-rule clash: overlapping dates, voting on an
//!   item that already left `pending`.
//! - [`Forbidden`] the caller is a member but lacks a required capability.
//! - [`Database`] an unexpected store failure; the transaction rolls back.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`Conflict`]: EngineError::Conflict
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
