//! Sweep schedule parsing
//!
//! Supports the cron shorthands the sweeper needs and nothing more:
//! `@hourly`, `@daily`, `@midnight`, `@weekly`, `@every <n><s|m|h|d>`,
//! `M * * * *` and `M H * * *`. All times are UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc, Weekday};
use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::errors::DomainError;

/// When the expired-token sweep runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepSchedule {
    /// Fixed interval between runs, first run one interval after start
    Every(StdDuration),
    /// Every hour at the given minute
    Hourly { minute: u32 },
    /// Every day at the given time
    Daily { hour: u32, minute: u32 },
    /// Every week on the given day and time
    Weekly { weekday: Weekday, hour: u32, minute: u32 },
}

impl Default for SweepSchedule {
    fn default() -> Self {
        SweepSchedule::Daily { hour: 0, minute: 0 }
    }
}

impl SweepSchedule {
    /// Time to wait from `now` until the next run
    pub fn next_delay(&self, now: DateTime<Utc>) -> StdDuration {
        let next = match *self {
            SweepSchedule::Every(interval) => return interval,
            SweepSchedule::Hourly { minute } => {
                let candidate = at(now.date_naive(), now.hour(), minute);
                roll_forward(candidate, now, Duration::hours(1))
            }
            SweepSchedule::Daily { hour, minute } => {
                let candidate = at(now.date_naive(), hour, minute);
                roll_forward(candidate, now, Duration::days(1))
            }
            SweepSchedule::Weekly {
                weekday,
                hour,
                minute,
            } => {
                let days_ahead = (7 + weekday.num_days_from_sunday()
                    - now.weekday().num_days_from_sunday())
                    % 7;
                let candidate = at(now.date_naive(), hour, minute)
                    .map(|c| c + Duration::days(i64::from(days_ahead)));
                roll_forward(candidate, now, Duration::weeks(1))
            }
        };

        (next - now).to_std().unwrap_or(StdDuration::from_secs(1))
    }
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    date.and_hms_opt(hour, minute, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn roll_forward(candidate: Option<DateTime<Utc>>, now: DateTime<Utc>, step: Duration) -> DateTime<Utc> {
    match candidate {
        Some(c) if c > now => c,
        Some(c) => c + step,
        None => now + step,
    }
}

fn invalid(expr: &str, reason: &str) -> DomainError {
    DomainError::configuration(format!("Invalid sweep schedule '{}': {}", expr, reason))
}

fn parse_interval(expr: &str, spec: &str) -> Result<StdDuration, DomainError> {
    let spec = spec.trim();
    let unit_at = spec
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| invalid(expr, "missing unit (s, m, h or d)"))?;
    let (number, unit) = spec.split_at(unit_at);

    let n: u64 = number
        .parse()
        .map_err(|_| invalid(expr, "interval must start with a whole number"))?;
    if n == 0 {
        return Err(invalid(expr, "interval must be positive"));
    }

    let seconds = match unit {
        "s" => Some(n),
        "m" => n.checked_mul(60),
        "h" => n.checked_mul(3600),
        "d" => n.checked_mul(86_400),
        _ => return Err(invalid(expr, "unit must be s, m, h or d")),
    }
    .ok_or_else(|| invalid(expr, "interval is too large"))?;

    Ok(StdDuration::from_secs(seconds))
}

fn parse_field(expr: &str, field: &str, max: u32, name: &str) -> Result<u32, DomainError> {
    match field.parse::<u32>() {
        Ok(value) if value <= max => Ok(value),
        _ => Err(invalid(expr, &format!("{} must be 0-{}", name, max))),
    }
}

impl FromStr for SweepSchedule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expr = s.trim();

        match expr {
            "@hourly" => return Ok(SweepSchedule::Hourly { minute: 0 }),
            "@daily" | "@midnight" => return Ok(SweepSchedule::Daily { hour: 0, minute: 0 }),
            "@weekly" => {
                return Ok(SweepSchedule::Weekly {
                    weekday: Weekday::Sun,
                    hour: 0,
                    minute: 0,
                })
            }
            _ => {}
        }

        if let Some(spec) = expr.strip_prefix("@every") {
            return parse_interval(expr, spec).map(SweepSchedule::Every);
        }

        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(invalid(expr, "expected a shorthand or five cron fields"));
        }
        if fields[2..].iter().any(|f| *f != "*") {
            return Err(invalid(expr, "day, month and weekday fields must be '*'"));
        }

        let minute = parse_field(expr, fields[0], 59, "minute")?;
        if fields[1] == "*" {
            return Ok(SweepSchedule::Hourly { minute });
        }
        let hour = parse_field(expr, fields[1], 23, "hour")?;

        Ok(SweepSchedule::Daily { hour, minute })
    }
}

impl fmt::Display for SweepSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepSchedule::Every(interval) => write!(f, "@every {}s", interval.as_secs()),
            SweepSchedule::Hourly { minute } => write!(f, "{} * * * *", minute),
            SweepSchedule::Daily { hour, minute } => write!(f, "{} {} * * *", minute, hour),
            SweepSchedule::Weekly {
                weekday,
                hour,
                minute,
            } => write!(f, "{} {} * * {}", minute, hour, weekday.num_days_from_sunday()),
        }
    }
}
