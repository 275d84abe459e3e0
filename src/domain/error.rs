//! Domain validation errors.
//!
//! Returned when user-facing input (filter names, dates, order types) does
//! not map onto a domain value.
//!
//! # Examples
//!
//! ```
//! use orderdesk::domain::error::DomainError;
//! use orderdesk::domain::filter::DateFilter;
//!
//! let result: Result<DateFilter, _> = "last-week".parse();
//! assert!(matches!(result, Err(DomainError::UnknownDateFilter { .. })));
//! ```

use thiserror::Error;

/// Errors that occur when domain values cannot be constructed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Date filter must be one of all, today, yesterday, custom.
    #[error("unknown date filter '{value}' (expected all, today, yesterday or custom)")]
    UnknownDateFilter {
        /// The rejected input.
        value: String,
    },

    /// Type filter must be one of all, pickup, delivery.
    #[error("unknown order type filter '{value}' (expected all, pickup or delivery)")]
    UnknownTypeFilter {
        /// The rejected input.
        value: String,
    },

    /// Order type must be pickup or delivery.
    #[error("unknown order type '{value}'")]
    UnknownOrderType {
        /// The rejected input.
        value: String,
    },

    /// Custom dates are calendar dates in `YYYY-MM-DD` form.
    #[error("invalid custom date '{value}': {reason}")]
    InvalidCustomDate {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },
}
