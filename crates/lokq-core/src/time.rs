//! Normalization of user-entered times into the RFC3339 form logcli accepts.

use crate::error::QueryError;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone};

/// Convert a user-friendly time string into an RFC3339 timestamp in the
/// local timezone, rendered with an explicit numeric offset (never `Z`).
///
/// Two shapes are accepted, tried in order: `YYYY-MM-DD HH:MM` (seconds
/// fixed at `:00`) and `YYYY-MM-DD`. A date-only range start resolves to
/// midnight, a date-only range end to 23:59:59, so the same date given for
/// both ends covers the whole day.
pub fn normalize(raw: &str, is_range_start: bool) -> Result<String, QueryError> {
    let input = raw.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M") {
        return render_local(dt, input);
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let time = if is_range_start {
            NaiveTime::MIN
        } else {
            end_of_day()?
        };
        return render_local(date.and_time(time), input);
    }

    Err(QueryError::InvalidTimeFormat {
        input: input.to_string(),
    })
}

fn end_of_day() -> Result<NaiveTime, QueryError> {
    NaiveTime::from_hms_opt(23, 59, 59).ok_or(QueryError::InvalidTimeFormat {
        input: "23:59:59".to_string(),
    })
}

fn render_local(dt: NaiveDateTime, input: &str) -> Result<String, QueryError> {
    // A wall-clock time skipped by a DST transition has no local mapping.
    let local = Local
        .from_local_datetime(&dt)
        .earliest()
        .ok_or_else(|| QueryError::InvalidTimeFormat {
            input: input.to_string(),
        })?;
    Ok(local.to_rfc3339_opts(SecondsFormat::Secs, false))
}
