//! Inclusive date range shown on the schedule.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date range with both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub until: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, until: NaiveDate) -> Result<Self, String> {
        if until < from {
            return Err(format!("Range ends ({until}) before it starts ({from})"));
        }
        Ok(DateRange { from, until })
    }

    /// Parse user input into a range.
    /// - `from`: YYYY-MM-DD, or YYYY-MM for that month and the next one
    /// - `until`: YYYY-MM-DD, required unless `from` is a month
    pub fn from_args(from: &str, until: Option<&str>) -> Result<Self, String> {
        if let Ok(first) = NaiveDate::parse_from_str(&format!("{from}-01"), "%Y-%m-%d") {
            if until.is_none() {
                let last = first
                    .checked_add_months(Months::new(2))
                    .and_then(|d| d.pred_opt())
                    .ok_or_else(|| format!("Month out of range: '{from}'"))?;
                return DateRange::new(first, last);
            }
        }

        let from = parse_date(from)?;
        let until = until.ok_or_else(|| "Missing end date".to_string())?;
        DateRange::new(from, parse_date(until)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.until
    }

    /// Number of days in the range.
    pub fn len_days(&self) -> u32 {
        days_between(self.from, self.until) as u32 + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let until = self.until;
        self.from.iter_days().take_while(move |d| *d <= until)
    }

    /// The date `offset` days after `from`, if still in range.
    pub fn nth_day(&self, offset: u32) -> Option<NaiveDate> {
        self.from
            .checked_add_days(Days::new(offset.into()))
            .filter(|d| self.contains(*d))
    }
}

/// Signed number of days from `a` to `b`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days()
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_input_spans_two_months() {
        let range = DateRange::from_args("2019-05", None).unwrap();
        assert_eq!(range.from, date(2019, 5, 1));
        assert_eq!(range.until, date(2019, 6, 30));
    }

    #[test]
    fn test_explicit_dates() {
        let range = DateRange::from_args("2019-05-23", Some("2019-06-26")).unwrap();
        assert_eq!(range.len_days(), 35);
        assert!(DateRange::from_args("2019-05-23", None).is_err());
        assert!(DateRange::from_args("2019-06-26", Some("2019-05-23")).is_err());
        assert!(DateRange::from_args("tomorrow", Some("2019-05-23")).is_err());
    }

    #[test]
    fn test_days_and_nth_day() {
        let range = DateRange::new(date(2019, 5, 30), date(2019, 6, 2)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(
            days,
            vec![date(2019, 5, 30), date(2019, 5, 31), date(2019, 6, 1), date(2019, 6, 2)]
        );
        assert_eq!(range.nth_day(2), Some(date(2019, 6, 1)));
        assert_eq!(range.nth_day(4), None);
    }
}
