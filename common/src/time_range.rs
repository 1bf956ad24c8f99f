//! Expansion of the date-range and time-of-day dropdown tokens into the
//! concrete bounds sent to the report endpoints.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};

/// Relative date window ending now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Last24Hours,
    Last7Days,
    Last30Days,
}

impl DateRange {
    pub const ALL: [DateRange; 3] = [DateRange::Last24Hours, DateRange::Last7Days, DateRange::Last30Days];

    pub fn token(self) -> &'static str {
        match self {
            DateRange::Last24Hours => "last24",
            DateRange::Last7Days => "last7days",
            DateRange::Last30Days => "last30days",
        }
    }

    fn span(self) -> Duration {
        match self {
            DateRange::Last24Hours => Duration::hours(24),
            DateRange::Last7Days => Duration::days(7),
            DateRange::Last30Days => Duration::days(30),
        }
    }
}

/// Slice of the day a report is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    AllDay,
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::AllDay,
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
    ];

    pub fn token(self) -> &'static str {
        match self {
            TimeOfDay::AllDay => "allDay",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }

    /// `(start, end)` wall-clock bounds.
    ///
    /// Evening ends at midnight of the same day, so `end < start`. The
    /// backend receives it unchanged.
    pub fn bounds(self) -> (NaiveTime, NaiveTime) {
        let hms = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
        match self {
            TimeOfDay::AllDay => (NaiveTime::MIN, all_day_end()),
            TimeOfDay::Morning => (hms(6), hms(12)),
            TimeOfDay::Afternoon => (hms(12), hms(18)),
            TimeOfDay::Evening => (hms(18), NaiveTime::MIN),
        }
    }
}

fn all_day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Returned when a token is not one of the known spellings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{token}` (expected one of: {expected})")]
pub struct UnknownToken {
    kind: &'static str,
    token: String,
    expected: String,
}

macro_rules! token_enum_impls {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = UnknownToken;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.token() == s)
                    .ok_or_else(|| UnknownToken {
                        kind: $kind,
                        token: s.to_string(),
                        expected: <$ty>::ALL.map(|v| v.token()).join(", "),
                    })
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

token_enum_impls!(DateRange, "date range");
token_enum_impls!(TimeOfDay, "time of day");

/// Concrete bounds for a report request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl ResolvedRange {
    pub fn start_time_str(&self) -> String {
        self.start_time.format("%H:%M:%S").to_string()
    }

    pub fn end_time_str(&self) -> String {
        self.end_time.format("%H:%M:%S").to_string()
    }
}

/// Expand optional tokens relative to `now`.
///
/// Dates are the calendar dates of `now` and `now - span` in the time zone
/// carried by `now`. A missing date range yields no dates; a missing time of
/// day covers the whole day.
pub fn resolve<Tz: TimeZone>(
    date_range: Option<DateRange>,
    time_of_day: Option<TimeOfDay>,
    now: &DateTime<Tz>,
) -> ResolvedRange {
    let (start_date, end_date) = match date_range {
        Some(range) => {
            let start = now.clone() - range.span();
            (Some(start.date_naive()), Some(now.date_naive()))
        }
        None => (None, None),
    };
    let (start_time, end_time) = time_of_day
        .map(TimeOfDay::bounds)
        .unwrap_or((NaiveTime::MIN, all_day_end()));

    ResolvedRange {
        start_date,
        end_date,
        start_time,
        end_time,
    }
}

/// Like [`resolve`], but from raw tokens; unknown or empty tokens count as
/// absent.
pub fn resolve_tokens<Tz: TimeZone>(date_range: &str, time_of_day: &str, now: &DateTime<Tz>) -> ResolvedRange {
    resolve(date_range.parse().ok(), time_of_day.parse().ok(), now)
}
