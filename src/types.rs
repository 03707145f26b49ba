use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::table::normalize_cell;

// ── Bare (year-less) date ──────────────────────────────────────────
//
// Real data examples (after normalization):
//   1月15日
//   12月31日
//   2月29日
//   ""          (onset unknown)
//   調査中       (under investigation, treated as no date)

static RE_BARE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<month>\d{1,2})月(?P<day>\d{1,2})日").unwrap());

/// A month/day pair as published, with no year.
///
/// Only the pattern is checked here. Whether the pair exists in some year
/// (no 13月, no 4月31日) is decided when a year is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BareDate {
    pub month: u32,
    pub day: u32,
}

impl BareDate {
    pub fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    /// Parse "<M>月<D>日" from the start of a cell.
    ///
    /// Returns `None` for empty or non-date text; that is the "no date
    /// recorded" case, not an error.
    pub fn parse(text: &str) -> Option<Self> {
        let cell = normalize_cell(text);
        let caps = RE_BARE_DATE.captures(&cell)?;
        let month = caps["month"].parse().ok()?;
        let day = caps["day"].parse().ok()?;
        Some(Self::new(month, day))
    }

    /// Attach a year. `None` if the combination is not a calendar date.
    pub fn with_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
    }
}

impl fmt::Display for BareDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}月{}日", self.month, self.day)
    }
}

/// Format an absolute date as `YYYY/MM/DD`.
pub fn format_ymd(date: NaiveDate) -> String {
    date.format("%Y/%m/%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_plain() {
        assert_eq!(BareDate::parse("1月15日"), Some(BareDate::new(1, 15)));
        assert_eq!(BareDate::parse("12月31日"), Some(BareDate::new(12, 31)));
    }

    #[test]
    fn test_parse_full_width_and_spaces() {
        assert_eq!(BareDate::parse("１２月　３日"), Some(BareDate::new(12, 3)));
        assert_eq!(BareDate::parse(" 7月20日 "), Some(BareDate::new(7, 20)));
    }

    #[test]
    fn test_parse_trailing_text_ignored() {
        assert_eq!(BareDate::parse("3月1日頃"), Some(BareDate::new(3, 1)));
    }

    #[test]
    fn test_parse_no_date() {
        assert_eq!(BareDate::parse(""), None);
        assert_eq!(BareDate::parse("調査中"), None);
        assert_eq!(BareDate::parse("リリース日"), None);
        assert_eq!(BareDate::parse("不明1月2日"), None);
    }

    #[test]
    fn test_with_year_rejects_impossible() {
        assert!(BareDate::new(2, 29).with_year(2021).is_none());
        assert!(BareDate::new(2, 29).with_year(2020).is_some());
        assert!(BareDate::new(13, 1).with_year(2020).is_none());
        assert!(BareDate::new(4, 31).with_year(2020).is_none());
    }

    #[test]
    fn test_format_then_reparse_recovers_month_day() {
        let bare = BareDate::new(3, 7);
        let date = bare.with_year(2021).unwrap();
        let text = format_ymd(date);
        assert_eq!(text, "2021/03/07");
        let back = NaiveDate::parse_from_str(&text, "%Y/%m/%d").unwrap();
        assert_eq!(BareDate::new(back.month(), back.day()), bare);
    }

    #[test]
    fn test_display() {
        assert_eq!(BareDate::new(1, 2).to_string(), "1月2日");
    }
}
