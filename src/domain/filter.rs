//! Listing filters and the memo-table key derived from them.
//!
//! A [`FilterState`] scopes an order listing query. Together with a page
//! number it yields a [`CacheKey`]: `"{date}-{customDate|none}-{type}-{page}"`.
//! Every field has a fixed format (enum names, `none`, or `YYYY-MM-DD`), so
//! distinct tuples never produce the same key.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Date range applied to the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    /// No date restriction.
    All,
    /// Orders created since local midnight.
    #[default]
    Today,
    /// Orders created during the previous calendar day.
    Yesterday,
    /// Orders created on [`FilterState::custom_date`].
    Custom,
}

impl DateFilter {
    /// Wire name used in query strings and cache keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "custom" => Ok(Self::Custom),
            _ => Err(DomainError::UnknownDateFilter {
                value: s.to_string(),
            }),
        }
    }
}

/// Order-type restriction applied to the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Pickup,
    Delivery,
}

impl TypeFilter {
    /// Wire name used in query strings and cache keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pickup => "pickup",
            Self::Delivery => "delivery",
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pickup" => Ok(Self::Pickup),
            "delivery" => Ok(Self::Delivery),
            _ => Err(DomainError::UnknownTypeFilter {
                value: s.to_string(),
            }),
        }
    }
}

/// The tuple of (date filter, custom date, order-type filter).
///
/// The custom date is kept even when the date filter is not
/// [`DateFilter::Custom`]; it still takes part in the cache key but is only
/// sent to the server for custom listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub date: DateFilter,
    pub custom_date: Option<NaiveDate>,
    pub order_type: TypeFilter,
}

impl FilterState {
    #[must_use]
    pub const fn new(date: DateFilter, order_type: TypeFilter) -> Self {
        Self {
            date,
            custom_date: None,
            order_type,
        }
    }

    /// Filter for a single calendar day.
    #[must_use]
    pub const fn on(day: NaiveDate, order_type: TypeFilter) -> Self {
        Self {
            date: DateFilter::Custom,
            custom_date: Some(day),
            order_type,
        }
    }

    #[must_use]
    pub fn with_custom_date(mut self, day: Option<NaiveDate>) -> Self {
        self.custom_date = day;
        self
    }

    /// The custom date to send upstream, present only for custom listings.
    #[must_use]
    pub fn effective_custom_date(&self) -> Option<NaiveDate> {
        match self.date {
            DateFilter::Custom => self.custom_date,
            _ => None,
        }
    }
}

/// Parse a `YYYY-MM-DD` custom date.
pub fn parse_custom_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        DomainError::InvalidCustomDate {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Memo-table index for a (filters, page) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn new(filters: &FilterState, page: u32) -> Self {
        let custom = filters
            .custom_date
            .map_or_else(|| "none".to_string(), |d| d.format("%Y-%m-%d").to_string());
        Self(format!(
            "{}-{}-{}-{}",
            filters.date, custom, filters.order_type, page
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
