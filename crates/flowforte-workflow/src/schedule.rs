//! Schedule normalization.
//!
//! A schedule is either a single absolute instant or a recurring cadence with
//! an optional time of day. Both are reduced to a first-execution Unix
//! timestamp plus a recurrence interval in seconds.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Result, WorkflowError};

/// Delay before the first run of a recurring task without a time of day.
pub const FIRST_RUN_DELAY_SECS: i64 = 60;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Named recurrence interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cadence {
    Hourly,
    Daily,
    Weekly,
    /// Fixed 30 days; does not follow calendar months, so long-running
    /// monthly tasks drift against month boundaries.
    Monthly,
}

impl Cadence {
    pub const ALL: [Cadence; 4] = [Self::Hourly, Self::Daily, Self::Weekly, Self::Monthly];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn interval_secs(self) -> u64 {
        match self {
            Self::Hourly => 3_600,
            Self::Daily => 86_400,
            Self::Weekly => 604_800,
            Self::Monthly => 2_592_000,
        }
    }

    /// Case-insensitive lookup; `None` for unrecognized names.
    pub fn parse_strict(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cadence| cadence.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Case-insensitive lookup that falls back to [`Cadence::Daily`] for any
    /// unrecognized name. A typo therefore schedules a daily task.
    pub fn from_name(name: &str) -> Self {
        Self::parse_strict(name).unwrap_or_else(|| {
            warn!(cadence = %name, "unrecognized cadence, falling back to daily");
            Self::Daily
        })
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// When a task first runs and how it repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSpec {
    /// Run once at an absolute instant.
    Once { execute_at: String },
    /// Repeat at `cadence`.
    ///
    /// The first run is `first_run` when given, else the next `time` of day
    /// (UTC), else one minute from now.
    Recurring {
        cadence: Cadence,
        time: Option<String>,
        first_run: Option<String>,
    },
}

/// Schedule reduced to scheduler-contract parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedSchedule {
    /// Unix seconds of the first execution.
    pub execute_at: u64,
    pub recurring: bool,
    /// Interval in seconds; 0 exactly when not recurring.
    pub frequency: u64,
}

pub fn normalize(spec: &ScheduleSpec, now: DateTime<Utc>) -> Result<NormalizedSchedule> {
    let normalized = match spec {
        ScheduleSpec::Once { execute_at } => NormalizedSchedule {
            execute_at: parse_instant(execute_at)?,
            recurring: false,
            frequency: 0,
        },
        ScheduleSpec::Recurring {
            cadence,
            time,
            first_run,
        } => {
            let execute_at = match (first_run, time) {
                (Some(instant), _) => parse_instant(instant)?,
                (None, Some(time)) => to_unix(next_occurrence(parse_time_of_day(time)?, now))?,
                (None, None) => to_unix(now + Duration::seconds(FIRST_RUN_DELAY_SECS))?,
            };
            NormalizedSchedule {
                execute_at,
                recurring: true,
                frequency: cadence.interval_secs(),
            }
        }
    };

    debug!(
        execute_at = normalized.execute_at,
        recurring = normalized.recurring,
        frequency = normalized.frequency,
        "normalized schedule"
    );
    Ok(normalized)
}

/// Parse an ISO-8601-like instant into whole Unix seconds.
///
/// Accepts RFC 3339 with an offset, a naive date-time (read as UTC), or a bare
/// date (UTC midnight).
pub fn parse_instant(value: &str) -> Result<u64> {
    let text = value.trim();
    let instant = DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
        .ok_or_else(|| WorkflowError::InvalidSchedule(format!("unparseable executeAt `{value}`")))?;

    to_unix(instant)
}

fn to_unix(instant: DateTime<Utc>) -> Result<u64> {
    match u64::try_from(instant.timestamp()) {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(WorkflowError::InvalidSchedule(format!(
            "{} is not after the Unix epoch",
            instant.to_rfc3339()
        ))),
    }
}

fn time_of_day_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{1,2}):(\d{2})(?:\s*(?i:UTC|Z))?$").expect("static time-of-day pattern")
    })
}

/// Parse `"HH:MM"` with an optional `UTC` marker.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    let invalid = || WorkflowError::InvalidTimeFormat(value.to_string());

    let captures = time_of_day_pattern()
        .captures(value.trim())
        .ok_or_else(invalid)?;
    let hours: u32 = captures[1].parse().map_err(|_| invalid())?;
    let minutes: u32 = captures[2].parse().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(invalid)
}

/// Next instant at or after `now` whose UTC clock reads `time`.
///
/// Rolls forward at most one day.
pub fn next_occurrence(time: NaiveTime, now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive().and_time(time).and_utc();
    if today < now {
        today + Duration::days(1)
    } else {
        today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc)
    }

    fn recurring(cadence: Cadence, time: Option<&str>) -> ScheduleSpec {
        ScheduleSpec::Recurring {
            cadence,
            time: time.map(str::to_string),
            first_run: None,
        }
    }

    #[test]
    fn test_time_already_passed_rolls_to_next_day() {
        let now = at("2024-01-01T12:00:00Z");
        let result = normalize(&recurring(Cadence::Daily, Some("10:00 UTC")), now).unwrap();
        assert_eq!(result.execute_at, at("2024-01-02T10:00:00Z").timestamp() as u64);
        assert!(result.recurring);
        assert_eq!(result.frequency, 86_400);
    }

    #[test]
    fn test_time_not_yet_passed_stays_today() {
        let now = at("2024-01-01T08:00:00Z");
        let result = normalize(&recurring(Cadence::Daily, Some("10:00 UTC")), now).unwrap();
        assert_eq!(result.execute_at, at("2024-01-01T10:00:00Z").timestamp() as u64);
    }

    #[test]
    fn test_time_equal_to_now_is_not_rolled() {
        let now = at("2024-01-01T10:00:00Z");
        assert_eq!(next_occurrence(parse_time_of_day("10:00").unwrap(), now), now);

        let just_after = at("2024-01-01T10:00:00.500Z");
        assert_eq!(
            next_occurrence(parse_time_of_day("10:00").unwrap(), just_after),
            at("2024-01-02T10:00:00Z")
        );
    }

    #[test]
    fn test_roll_over_crosses_month_and_year() {
        let now = at("2023-12-31T23:30:00Z");
        let result = normalize(&recurring(Cadence::Hourly, Some("9:05")), now).unwrap();
        assert_eq!(result.execute_at, at("2024-01-01T09:05:00Z").timestamp() as u64);
    }

    #[test]
    fn test_cadence_without_time_uses_grace_delay() {
        let now = at("2024-03-10T15:42:17.900Z");
        for cadence in Cadence::ALL {
            let result = normalize(&recurring(cadence, None), now).unwrap();
            assert_eq!(result.execute_at, now.timestamp() as u64 + 60);
            assert_eq!(result.frequency, cadence.interval_secs());
            assert!(result.recurring);
        }
    }

    #[test]
    fn test_cadence_table() {
        assert_eq!(Cadence::from_name("hourly").interval_secs(), 3_600);
        assert_eq!(Cadence::from_name("DAILY").interval_secs(), 86_400);
        assert_eq!(Cadence::from_name("Weekly").interval_secs(), 604_800);
        assert_eq!(Cadence::from_name("monthly").interval_secs(), 2_592_000);
    }

    #[test]
    fn test_unknown_cadence_falls_back_to_daily() {
        assert_eq!(Cadence::from_name("fortnightly"), Cadence::Daily);
        assert_eq!(Cadence::from_name("dialy").interval_secs(), 86_400);
        assert_eq!(Cadence::parse_strict("dialy"), None);
    }

    #[test]
    fn test_absolute_instant() {
        let now = at("2024-01-01T00:00:00Z");
        let spec = ScheduleSpec::Once {
            execute_at: "2024-06-01T12:30:45.999Z".to_string(),
        };
        let result = normalize(&spec, now).unwrap();
        assert_eq!(result.execute_at, at("2024-06-01T12:30:45Z").timestamp() as u64);
        assert!(!result.recurring);
        assert_eq!(result.frequency, 0);
    }

    #[test]
    fn test_parse_instant_formats() {
        let expected = at("2024-06-01T12:30:00Z").timestamp() as u64;
        assert_eq!(parse_instant("2024-06-01T12:30:00Z").unwrap(), expected);
        assert_eq!(parse_instant("2024-06-01T14:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_instant("2024-06-01T12:30:00").unwrap(), expected);
        assert_eq!(parse_instant("2024-06-01T12:30").unwrap(), expected);
        assert_eq!(parse_instant("2024-06-01 12:30:00").unwrap(), expected);
        assert_eq!(
            parse_instant("2024-06-01").unwrap(),
            at("2024-06-01T00:00:00Z").timestamp() as u64
        );
    }

    #[test]
    fn test_parse_instant_rejects_garbage_and_epoch() {
        assert!(matches!(parse_instant("tomorrow"), Err(WorkflowError::InvalidSchedule(_))));
        assert!(matches!(
            parse_instant("1970-01-01T00:00:00Z"),
            Err(WorkflowError::InvalidSchedule(_))
        ));
        assert!(matches!(
            parse_instant("1969-07-20T20:17:00Z"),
            Err(WorkflowError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn test_first_run_overrides_time() {
        let spec = ScheduleSpec::Recurring {
            cadence: Cadence::Weekly,
            time: Some("10:00 UTC".to_string()),
            first_run: Some("2024-02-01T00:00:00Z".to_string()),
        };
        let result = normalize(&spec, at("2024-01-01T00:00:00Z")).unwrap();
        assert_eq!(result.execute_at, at("2024-02-01T00:00:00Z").timestamp() as u64);
        assert_eq!(result.frequency, 604_800);
    }

    #[test]
    fn test_time_formats() {
        assert_eq!(parse_time_of_day("10:00 UTC").unwrap(), NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(parse_time_of_day("7:45").unwrap(), NaiveTime::from_hms_opt(7, 45, 0).unwrap());
        assert_eq!(parse_time_of_day("23:59utc").unwrap(), NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        assert_eq!(parse_time_of_day("00:00Z").unwrap(), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_malformed_time_rejected() {
        for bad in ["25:99", "24:00", "10:60", "10", "10:0", "ten o'clock", "10:00 PST", "at 10:00"] {
            assert_eq!(
                parse_time_of_day(bad),
                Err(WorkflowError::InvalidTimeFormat(bad.to_string())),
                "{bad}"
            );
        }
        let err = normalize(&recurring(Cadence::Daily, Some("25:99")), Utc::now()).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTimeFormat(_)));
    }
}
