//! Calendar-day ranges for stays and blackouts.
//!
//! All dates in the engine are UTC calendar days (`YYYY-MM-DD`), and every
//! range is half-open `[start, end)`: the end day is the checkout day and is
//! free for a new check-in. Two ranges that merely touch at a boundary do
//! not overlap.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Parses an ISO `YYYY-MM-DD` string into a calendar day.
pub fn parse_day(raw: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| EngineError::Validation(format!("invalid date: {raw}")))
}

/// A half-open range of calendar days `[start, end)`.
///
/// `end > start` is enforced at construction, so a range always covers at
/// least one night.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ResultEngine<Self> {
        if end <= start {
            return Err(EngineError::Validation(
                "end date must be after start date".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two ISO `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> ResultEngine<Self> {
        Self::new(parse_day(start)?, parse_day(end)?)
    }

    /// Number of nights covered by the range (always >= 1).
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Half-open interval overlap: `A.start < B.end && A.end > B.start`.
    #[must_use]
    pub fn overlaps(&self, other: &DayRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether a single day falls inside the range.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day < self.end
    }

    /// Iterates the days of the range, start inclusive, end exclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let mut current = self.start;
        let end = self.end;
        std::iter::from_fn(move || {
            if current >= end {
                return None;
            }
            let day = current;
            current = current.succ_opt()?;
            Some(day)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn parse_day_accepts_iso_only() {
        assert_eq!(day("2026-07-01").to_string(), "2026-07-01");
        assert!(parse_day("07/01/2026").is_err());
        assert!(parse_day("2026-13-01").is_err());
        assert!(parse_day("").is_err());
    }

    #[test]
    fn range_rejects_inverted_or_empty() {
        assert!(DayRange::parse("2026-07-05", "2026-07-05").is_err());
        assert!(DayRange::parse("2026-07-05", "2026-07-01").is_err());
    }

    #[test]
    fn nights_counts_whole_days() {
        assert_eq!(DayRange::parse("2026-07-01", "2026-07-02").unwrap().nights(), 1);
        assert_eq!(DayRange::parse("2026-07-01", "2026-07-04").unwrap().nights(), 3);
    }

    #[test]
    fn touching_ranges_do_not_overlap() {
        let first = DayRange::parse("2026-07-01", "2026-07-05").unwrap();
        let second = DayRange::parse("2026-07-05", "2026-07-08").unwrap();
        // Checkout day doubles as the next guest's check-in day.
        assert!(!first.overlaps(&second));
        assert!(!second.overlaps(&first));
    }

    #[test]
    fn one_shared_night_overlaps() {
        let first = DayRange::parse("2026-07-01", "2026-07-05").unwrap();
        let second = DayRange::parse("2026-07-04", "2026-07-08").unwrap();
        assert!(first.overlaps(&second));
        assert!(second.overlaps(&first));
    }

    #[test]
    fn contains_is_half_open() {
        let range = DayRange::parse("2026-07-01", "2026-07-03").unwrap();
        assert!(range.contains(day("2026-07-01")));
        assert!(range.contains(day("2026-07-02")));
        assert!(!range.contains(day("2026-07-03")));
    }

    #[test]
    fn days_iterates_start_inclusive_end_exclusive() {
        let range = DayRange::parse("2026-07-01", "2026-07-04").unwrap();
        let days: Vec<String> = range.days().map(|d| d.to_string()).collect();
        assert_eq!(days, vec!["2026-07-01", "2026-07-02", "2026-07-03"]);
    }
}
