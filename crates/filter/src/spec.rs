//! Filter vocabulary for narrowing a record snapshot.

use adboard_core::types::parse_calendar_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar-date window over a record's `date_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse user-supplied bounds. Malformed or missing input yields `None`,
    /// which callers treat as "no date filter" rather than an error.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(Self {
            start: parse_calendar_date(start)?,
            end: parse_calendar_date(end)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Inclusive numeric window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The full set of dashboard filters. Every predicate is optional; an unset
/// or empty predicate matches all records, and set predicates combine with
/// logical AND.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    pub date_range: Option<DateRange>,
    /// Exact campaign names; a record must match one when non-empty.
    pub campaigns: Vec<String>,
    /// Case-insensitive substrings matched against the partner field.
    pub partners: Vec<String>,
    /// Case-insensitive substrings matched against the order id.
    pub order_ids: Vec<String>,
    /// Case-insensitive substring matched against the objective.
    pub objective: Option<String>,
    /// Case-insensitive substring matched against the customer name.
    pub customer: Option<String>,
    pub spend: Option<NumericRange>,
    pub frequency: Option<NumericRange>,
}

impl FilterSpec {
    /// True when no predicate is set, i.e. the spec matches every record.
    pub fn is_empty(&self) -> bool {
        self.date_range.is_none()
            && self.campaigns.is_empty()
            && self.partners.is_empty()
            && self.order_ids.is_empty()
            && self.objective.is_none()
            && self.customer.is_none()
            && self.spend.is_none()
            && self.frequency.is_none()
    }
}
