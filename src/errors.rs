//! Unified error types for the budgeting core.
//!
//! All fallible operations return [`Result`]. The [`Error::kind`] method
//! classifies every variant into one of four [`ErrorKind`]s so a serving
//! layer can map errors 1:1 to response statuses.

use crate::core::month::Month;
use rust_decimal::Decimal;
use sea_orm::DbErr;
use thiserror::Error;

/// Broad classification of an [`Error`], mirroring the status families a
/// request handler would answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced budget, account, category, or envelope does not exist.
    NotFound,
    /// The request itself is malformed: bad month, bad mode, bad amount.
    BadRequest,
    /// The operation would violate a uniqueness rule.
    Conflict,
    /// Storage or configuration failure outside the caller's control.
    Internal,
}

/// All errors produced by the budgeting core.
#[derive(Debug, Error)]
pub enum Error {
    /// No budget with the given id.
    #[error("budget {id} not found")]
    BudgetNotFound {
        /// Requested budget id
        id: i64,
    },

    /// No account with the given id, or the account belongs to another budget.
    #[error("account {id} not found")]
    AccountNotFound {
        /// Requested account id
        id: i64,
    },

    /// No category with the given id.
    #[error("category {id} not found")]
    CategoryNotFound {
        /// Requested category id
        id: i64,
    },

    /// No envelope with the given id.
    #[error("envelope {id} not found")]
    EnvelopeNotFound {
        /// Requested envelope id
        id: i64,
    },

    /// A month string did not parse as `YYYY-MM`.
    #[error("invalid month {input:?}, expected YYYY-MM")]
    InvalidMonth {
        /// The rejected input
        input: String,
    },

    /// The zero/unset month sentinel was passed where a real month is required.
    #[error("month is unset")]
    UnsetMonth,

    /// An allocation mode string outside the accepted enumeration.
    #[error(
        "invalid allocation mode {mode:?}, expected ALLOCATE_LAST_MONTH_BUDGET or ALLOCATE_LAST_MONTH_SPEND"
    )]
    InvalidAllocationMode {
        /// The rejected input
        mode: String,
    },

    /// An allocation already exists for this (envelope, month) key.
    #[error("allocation for envelope {envelope_id} in {month} already exists")]
    AllocationExists {
        /// Envelope holding the conflicting allocation
        envelope_id: i64,
        /// Month of the conflicting allocation
        month: Month,
    },

    /// A monetary amount outside the accepted range (e.g. a non-positive
    /// transaction magnitude).
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Request payload fails a structural rule.
    #[error("validation error: {message}")]
    Validation {
        /// What was wrong
        message: String,
    },

    /// Configuration error (environment, seed file).
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Database error from the storage layer.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl Error {
    /// Classifies this error for status mapping by a serving layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BudgetNotFound { .. }
            | Self::AccountNotFound { .. }
            | Self::CategoryNotFound { .. }
            | Self::EnvelopeNotFound { .. } => ErrorKind::NotFound,
            Self::InvalidMonth { .. }
            | Self::UnsetMonth
            | Self::InvalidAllocationMode { .. }
            | Self::InvalidAmount { .. }
            | Self::Validation { .. } => ErrorKind::BadRequest,
            Self::AllocationExists { .. } => ErrorKind::Conflict,
            Self::Config { .. } | Self::Database(_) => ErrorKind::Internal,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::BudgetNotFound { id: 1 }.kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::EnvelopeNotFound { id: 7 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Error::InvalidMonth {
                input: "December-2020".to_string()
            }
            .kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(Error::UnsetMonth.kind(), ErrorKind::BadRequest);
        assert_eq!(
            Error::AllocationExists {
                envelope_id: 3,
                month: Month::new(2024, 2)
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            Error::Database(DbErr::Custom("boom".to_string())).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_mode_error_names_both_accepted_values() {
        let message = Error::InvalidAllocationMode {
            mode: "ALLOCATE_EVERYTHING".to_string(),
        }
        .to_string();
        assert!(message.contains("ALLOCATE_LAST_MONTH_BUDGET"));
        assert!(message.contains("ALLOCATE_LAST_MONTH_SPEND"));
    }
}
