use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use serde_json::json;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::period::{Period, RangeKey};
use crate::models::settings::{DEFAULT_ROLLING_MONTH_DAYS, DEFAULT_ROLLING_WEEK_DAYS};

const CYCLE_LENGTH_DAYS: i64 = 7;
/// Upper bound for the configurable rolling window lengths (about ten years).
pub const MAX_ROLLING_DAYS: u32 = 3660;

/// Converts the caller-supplied instant into the calendar date the engine
/// treats as "today". The engine itself never reads the clock.
pub fn reference_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

pub fn parse_timezone(name: &str) -> AppResult<Tz> {
    name.parse::<Tz>().map_err(|err| {
        AppError::validation_with_details(
            "unknown timezone",
            json!({"value": name, "error": err.to_string()}),
        )
    })
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Most recent weekday strictly before `today`.
pub fn last_business_day(today: NaiveDate) -> NaiveDate {
    let offset = match today.weekday() {
        Weekday::Sun => 2,
        Weekday::Mon => 3,
        _ => 1,
    };
    today - Duration::days(offset)
}

fn days_since_friday(date: NaiveDate) -> i64 {
    // Monday = 0 .. Sunday = 6, Friday = 4.
    (i64::from(date.weekday().num_days_from_monday()) + 3) % CYCLE_LENGTH_DAYS
}

/// Friday that opens the Friday..Thursday cycle containing `today`, shifted by
/// whole cycles. Future cycles (`week_offset > 0`) are rejected.
pub fn weekly_cycle_start(today: NaiveDate, week_offset: i32) -> AppResult<NaiveDate> {
    if week_offset > 0 {
        return Err(AppError::invalid_period(format!(
            "week offset {week_offset} points to a future cycle"
        )));
    }

    let current = days_before(today, days_since_friday(today))?;
    let shift = Duration::days(i64::from(week_offset) * CYCLE_LENGTH_DAYS);
    current
        .checked_add_signed(shift)
        .ok_or_else(|| {
            AppError::invalid_period(format!("week offset {week_offset} is out of range"))
        })
}

/// Thursday closing the cycle. May lie after `today` for the current cycle.
pub fn weekly_cycle_end(start: NaiveDate) -> NaiveDate {
    start + Duration::days(CYCLE_LENGTH_DAYS - 1)
}

/// Business day number within the cycle: Friday (and the weekend after it)
/// is day 1, Thursday is day 5.
pub fn weekday_index_in_cycle(today: NaiveDate) -> u8 {
    match today.weekday() {
        Weekday::Fri | Weekday::Sat | Weekday::Sun => 1,
        Weekday::Mon => 2,
        Weekday::Tue => 3,
        Weekday::Wed => 4,
        Weekday::Thu => 5,
    }
}

pub fn clamp(date: NaiveDate, today: NaiveDate) -> NaiveDate {
    date.min(today)
}

pub fn business_days(period: &Period) -> Vec<NaiveDate> {
    period
        .start
        .iter_days()
        .take_while(|date| *date <= period.end)
        .filter(|date| is_business_day(*date))
        .collect()
}

/// Resolves symbolic ranges into concrete periods. Only the rolling window
/// lengths are configurable; everything else is fixed calendar arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    rolling_week_days: u32,
    rolling_month_days: u32,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self {
            rolling_week_days: DEFAULT_ROLLING_WEEK_DAYS,
            rolling_month_days: DEFAULT_ROLLING_MONTH_DAYS,
        }
    }
}

impl BusinessCalendar {
    pub fn new(rolling_week_days: u32, rolling_month_days: u32) -> AppResult<Self> {
        if rolling_week_days == 0 || rolling_month_days == 0 {
            return Err(AppError::validation(
                "rolling window lengths must be at least one day",
            ));
        }
        if rolling_week_days > MAX_ROLLING_DAYS || rolling_month_days > MAX_ROLLING_DAYS {
            return Err(AppError::validation_with_details(
                "rolling window length exceeds the supported maximum",
                json!({
                    "rollingWeekDays": rolling_week_days,
                    "rollingMonthDays": rolling_month_days,
                    "max": MAX_ROLLING_DAYS,
                }),
            ));
        }
        Ok(Self {
            rolling_week_days,
            rolling_month_days,
        })
    }

    pub fn resolve_window(
        &self,
        range: RangeKey,
        today: NaiveDate,
        week_offset: i32,
    ) -> AppResult<Period> {
        let period = match range {
            RangeKey::Today => Period::single_day(today),
            RangeKey::Yesterday => Period::single_day(days_before(today, 1)?),
            RangeKey::LastBusinessDay => Period::single_day(last_business_day(today)),
            RangeKey::Week => rolling_window(today, self.rolling_week_days)?,
            RangeKey::Month => rolling_window(today, self.rolling_month_days)?,
            RangeKey::Weekly => {
                let start = weekly_cycle_start(today, week_offset)?;
                Period::new(start, weekly_cycle_end(start))?
            }
            RangeKey::All => Period::new(NaiveDate::MIN, today)?,
        };

        debug!(
            target: "app::calendar",
            range = range.as_str(),
            %today,
            week_offset,
            start = %period.start,
            end = %period.end,
            "resolved window"
        );

        Ok(period)
    }

    /// The period a resolved window is compared against for trend purposes.
    /// `All` has nothing before it.
    pub fn previous_window(
        &self,
        range: RangeKey,
        today: NaiveDate,
        week_offset: i32,
    ) -> AppResult<Option<Period>> {
        let previous = match range {
            RangeKey::Today => Some(Period::single_day(days_before(today, 1)?)),
            RangeKey::Yesterday => Some(Period::single_day(days_before(today, 2)?)),
            RangeKey::LastBusinessDay => Some(Period::single_day(last_business_day(
                last_business_day(today),
            ))),
            RangeKey::Week | RangeKey::Month => {
                let current = self.resolve_window(range, today, week_offset)?;
                let end = days_before(current.start, 1)?;
                let start = days_before(end, current.num_days() - 1)?;
                Some(Period::new(start, end)?)
            }
            RangeKey::Weekly => {
                let previous_offset = week_offset.checked_sub(1).ok_or_else(|| {
                    AppError::invalid_period(format!("week offset {week_offset} is out of range"))
                })?;
                let start = weekly_cycle_start(today, previous_offset)?;
                Some(Period::new(start, weekly_cycle_end(start))?)
            }
            RangeKey::All => None,
        };
        Ok(previous)
    }
}

fn days_before(date: NaiveDate, days: i64) -> AppResult<NaiveDate> {
    date.checked_sub_signed(Duration::days(days)).ok_or_else(|| {
        AppError::invalid_period(format!("{days} days before {date} is out of range"))
    })
}

fn rolling_window(today: NaiveDate, days: u32) -> AppResult<Period> {
    let start = days_before(today, i64::from(days.max(1)) - 1)?;
    Period::new(start, today)
}
