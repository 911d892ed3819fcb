use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Symbolic range a caller asks for before it is resolved to concrete dates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RangeKey {
    Today,
    Yesterday,
    LastBusinessDay,
    Week,
    Month,
    Weekly,
    All,
}

impl RangeKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeKey::Today => "today",
            RangeKey::Yesterday => "yesterday",
            RangeKey::LastBusinessDay => "last_business_day",
            RangeKey::Week => "week",
            RangeKey::Month => "month",
            RangeKey::Weekly => "weekly",
            RangeKey::All => "all",
        }
    }
}

impl Default for RangeKey {
    fn default() -> Self {
        RangeKey::Weekly
    }
}

/// Inclusive `[start, end]` date interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        let period = Self { start, end };
        period.ensure_valid()?;
        Ok(period)
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Periods can also arrive through deserialization, so the ordering is
    /// re-checked wherever one is consumed.
    pub fn ensure_valid(&self) -> AppResult<()> {
        if self.start > self.end {
            return Err(AppError::invalid_period(format!(
                "start {} is after end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Pulls the end back to `today` when the period runs into the future.
    /// A period that starts after `today` collapses to `[today, today]`.
    pub fn clamped_to(&self, today: NaiveDate) -> Self {
        let end = self.end.min(today);
        let start = self.start.min(end);
        Self { start, end }
    }
}
