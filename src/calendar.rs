//! Calendar helpers: day length across DST transitions and season lookup.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{PriceDataError, Result};
use crate::models::Season;

/// Season boundaries as inclusive `(month, day)` pairs.
///
/// Winter wraps the year end, so its start sorts after its end.
const SEASON_RANGES: [(Season, (u32, u32), (u32, u32)); 4] = [
    (Season::Spring, (3, 20), (6, 20)),
    (Season::Summer, (6, 21), (9, 22)),
    (Season::Autumn, (9, 23), (12, 20)),
    (Season::Winter, (12, 21), (3, 19)),
];

/// Parse an IANA timezone name such as `"Europe/London"`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>().map_err(|e| {
        PriceDataError::InvalidArgument(format!("unknown timezone '{}': {}", name, e))
    })
}

/// Number of wall-clock hours between local midnight of `date` and local
/// midnight of the following day in `timezone`.
///
/// 24 on ordinary days, 23 when clocks spring forward, 25 when they fall back.
pub fn hours_in_day(date: NaiveDate, timezone: &str) -> Result<u32> {
    let tz = parse_timezone(timezone)?;
    hours_in_day_tz(date, tz)
}

/// [`hours_in_day`] with an already-parsed timezone.
pub fn hours_in_day_tz(date: NaiveDate, tz: Tz) -> Result<u32> {
    let next = date.succ_opt().ok_or_else(|| {
        PriceDataError::InvalidArgument(format!("no calendar day follows {}", date))
    })?;

    let start = local_midnight(date, tz)?;
    let end = local_midnight(next, tz)?;
    let seconds = (end - start).num_seconds();

    u32::try_from(seconds / 3600).map_err(|_| {
        PriceDataError::Internal(format!("negative day length for {} in {}", date, tz.name()))
    })
}

/// Classify a date into its season.
pub fn season_of(date: NaiveDate) -> Result<Season> {
    let key = (date.month(), date.day());

    for (season, start, end) in SEASON_RANGES {
        let matched = if start <= end {
            start <= key && key <= end
        } else {
            key >= start || key <= end
        };
        if matched {
            return Ok(season);
        }
    }

    Err(PriceDataError::Lookup(format!("no season covers {}", date)))
}

/// First instant of the local calendar day.
///
/// Ambiguous midnights resolve to the earlier offset. Where a DST gap swallows
/// midnight itself, the first valid local time after it is used.
fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<Tz>> {
    let naive = date.and_time(NaiveTime::MIN);

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => {
            for step in 1..=12 {
                let shifted = naive + Duration::minutes(15 * step);
                if let Some(dt) = tz.from_local_datetime(&shifted).earliest() {
                    return Ok(dt);
                }
            }
            Err(PriceDataError::Internal(format!(
                "local midnight of {} does not exist in {}",
                date, tz.name()
            )))
        }
    }
}
