//! Tests for day length across DST transitions and season lookup.

mod common;

use chrono::Duration;
use common::date;
use price_data_sdk::calendar::{hours_in_day, parse_timezone, season_of};
use price_data_sdk::{PriceDataError, Season};

const LONDON: &str = "Europe/London";

// ---------------------------------------------------------------------------
// hours_in_day
// ---------------------------------------------------------------------------

#[test]
fn ordinary_day_has_24_hours() {
    assert_eq!(hours_in_day(date(2025, 3, 29), LONDON).unwrap(), 24);
    assert_eq!(hours_in_day(date(2025, 7, 15), LONDON).unwrap(), 24);
}

#[test]
fn spring_forward_day_has_23_hours() {
    assert_eq!(hours_in_day(date(2025, 3, 30), LONDON).unwrap(), 23);
}

#[test]
fn fall_back_day_has_25_hours() {
    assert_eq!(hours_in_day(date(2025, 10, 26), LONDON).unwrap(), 25);
}

#[test]
fn transitions_follow_the_timezone() {
    // Continental Europe switches on the same days as the UK
    assert_eq!(hours_in_day(date(2025, 3, 30), "Europe/Paris").unwrap(), 23);
    // US switches earlier in March
    assert_eq!(hours_in_day(date(2025, 3, 9), "America/New_York").unwrap(), 23);
    assert_eq!(hours_in_day(date(2025, 3, 30), "America/New_York").unwrap(), 24);
    // No DST at all
    assert_eq!(hours_in_day(date(2025, 3, 30), "UTC").unwrap(), 24);
}

#[test]
fn midnight_dst_gap_still_measures_the_day() {
    // Clocks jumped from 00:00 to 01:00 in Santiago on this date
    assert_eq!(hours_in_day(date(2024, 9, 8), "America/Santiago").unwrap(), 23);
}

#[test]
fn unknown_timezone_is_a_validation_error() {
    let err = hours_in_day(date(2025, 1, 1), "Mars/Olympus").unwrap_err();
    assert!(matches!(err, PriceDataError::InvalidArgument(_)));
    assert!(err.is_validation());
    assert!(parse_timezone(LONDON).is_ok());
}

// ---------------------------------------------------------------------------
// season_of
// ---------------------------------------------------------------------------

#[test]
fn one_date_per_season() {
    assert_eq!(season_of(date(2025, 4, 15)).unwrap(), Season::Spring);
    assert_eq!(season_of(date(2025, 7, 15)).unwrap(), Season::Summer);
    assert_eq!(season_of(date(2025, 10, 15)).unwrap(), Season::Autumn);
    assert_eq!(season_of(date(2025, 1, 15)).unwrap(), Season::Winter);
}

#[test]
fn season_starts_in_2022() {
    assert_eq!(season_of(date(2022, 3, 21)).unwrap(), Season::Spring);
    assert_eq!(season_of(date(2022, 6, 21)).unwrap(), Season::Summer);
    assert_eq!(season_of(date(2022, 9, 23)).unwrap(), Season::Autumn);
    assert_eq!(season_of(date(2022, 12, 21)).unwrap(), Season::Winter);
}

#[test]
fn boundaries_are_inclusive() {
    assert_eq!(season_of(date(2025, 3, 20)).unwrap(), Season::Spring);
    assert_eq!(season_of(date(2025, 6, 20)).unwrap(), Season::Spring);
    assert_eq!(season_of(date(2025, 6, 21)).unwrap(), Season::Summer);
    assert_eq!(season_of(date(2025, 9, 22)).unwrap(), Season::Summer);
    assert_eq!(season_of(date(2025, 9, 23)).unwrap(), Season::Autumn);
    assert_eq!(season_of(date(2025, 12, 20)).unwrap(), Season::Autumn);
    assert_eq!(season_of(date(2025, 12, 21)).unwrap(), Season::Winter);
}

#[test]
fn winter_wraps_the_year_end() {
    assert_eq!(season_of(date(2025, 12, 31)).unwrap(), Season::Winter);
    assert_eq!(season_of(date(2026, 1, 1)).unwrap(), Season::Winter);
    assert_eq!(season_of(date(2025, 3, 19)).unwrap(), Season::Winter);
    assert_eq!(season_of(date(2024, 2, 29)).unwrap(), Season::Winter);
}

#[test]
fn every_day_of_a_leap_year_has_a_season() {
    let mut day = date(2024, 1, 1);
    let end = date(2024, 12, 31);
    let mut seen = 0;
    while day <= end {
        assert!(season_of(day).is_ok(), "no season for {day}");
        seen += 1;
        day += Duration::days(1);
    }
    assert_eq!(seen, 366);
}
