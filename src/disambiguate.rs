//! Year completion for secondary dates (onset, confirmation).
//!
//! A secondary date has no ordering of its own, so its year is taken from
//! whichever of `anchor.year - 1`, `anchor.year`, `anchor.year + 1` puts it
//! closest to the row's release date. Candidates are generated in that
//! order and the first minimum wins, so a tie goes to the earlier year.

use chrono::{Datelike, NaiveDate};

use crate::types::BareDate;

const YEAR_OFFSETS: [i32; 3] = [-1, 0, 1];

/// A secondary date with its year chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub date: NaiveDate,
    /// Absolute distance to the anchor in days.
    pub distance_days: i64,
    /// Distance exceeded the warning threshold.
    pub low_confidence: bool,
}

/// No candidate year turns the month/day into a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoCandidate {
    pub first_year: i32,
    pub last_year: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct Disambiguator {
    warn_threshold_days: i64,
}

impl Disambiguator {
    pub fn new(warn_threshold_days: i64) -> Self {
        Self {
            warn_threshold_days,
        }
    }

    /// Pick the candidate year nearest to `anchor`.
    ///
    /// `None` in (or month 0) means no date was recorded and gives `Ok(None)`.
    pub fn resolve(
        &self,
        anchor: NaiveDate,
        bare: Option<BareDate>,
    ) -> Result<Option<Resolution>, NoCandidate> {
        // Month 0 is the "no date" placeholder, same as an absent cell.
        let Some(bare) = bare.filter(|b| b.month != 0) else {
            return Ok(None);
        };

        let nearest = YEAR_OFFSETS
            .iter()
            .filter_map(|offset| bare.with_year(anchor.year() + offset))
            .map(|date| (date, (date - anchor).num_days().abs()))
            .min_by_key(|&(_, distance)| distance);

        let Some((date, distance_days)) = nearest else {
            return Err(NoCandidate {
                first_year: anchor.year() + YEAR_OFFSETS[0],
                last_year: anchor.year() + YEAR_OFFSETS[2],
            });
        };

        Ok(Some(Resolution {
            date,
            distance_days,
            low_confidence: distance_days > self.warn_threshold_days,
        }))
    }
}

impl Default for Disambiguator {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_WARN_THRESHOLD_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn resolve(anchor: NaiveDate, m: u32, d: u32) -> Resolution {
        Disambiguator::default()
            .resolve(anchor, Some(BareDate::new(m, d)))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_no_date_is_empty() {
        let r = Disambiguator::default().resolve(ymd(2020, 5, 1), None);
        assert_eq!(r, Ok(None));
    }

    #[test]
    fn test_zero_month_is_empty() {
        let r = Disambiguator::default().resolve(ymd(2020, 5, 1), Some(BareDate::new(0, 5)));
        assert_eq!(r, Ok(None));
        let r = Disambiguator::default().resolve(ymd(2020, 5, 1), Some(BareDate::new(0, 0)));
        assert_eq!(r, Ok(None));
    }

    #[test]
    fn test_same_day_picks_anchor_year() {
        let r = resolve(ymd(2021, 1, 1), 1, 1);
        assert_eq!(r.date, ymd(2021, 1, 1));
        assert_eq!(r.distance_days, 0);
        assert!(!r.low_confidence);
    }

    #[test]
    fn test_onset_before_new_year() {
        // Released in January, onset in late December of the prior year.
        let r = resolve(ymd(2021, 1, 4), 12, 28);
        assert_eq!(r.date, ymd(2020, 12, 28));
        assert_eq!(r.distance_days, 7);
    }

    #[test]
    fn test_date_after_new_year_from_december_anchor() {
        let r = resolve(ymd(2020, 12, 30), 1, 2);
        assert_eq!(r.date, ymd(2021, 1, 2));
    }

    #[test]
    fn test_nearest_not_tied() {
        // 2020-07-02 is 183 days back, 2021-07-02 is 182 days ahead.
        let r = resolve(ymd(2021, 1, 1), 7, 2);
        assert_eq!(r.date, ymd(2021, 7, 2));
        assert_eq!(r.distance_days, 182);
    }

    #[test]
    fn test_tie_prefers_earlier_year() {
        // 2019-07-02 and 2020-07-02 are both 183 days from 2020-01-01.
        let r = resolve(ymd(2020, 1, 1), 7, 2);
        assert_eq!(r.date, ymd(2019, 7, 2));
        assert_eq!(r.distance_days, 183);
    }

    #[test]
    fn test_month_day_preserved_and_minimal() {
        let anchor = ymd(2020, 6, 15);
        for (m, d) in [(1, 1), (3, 31), (6, 15), (9, 30), (12, 31)] {
            let r = resolve(anchor, m, d);
            assert_eq!((r.date.month(), r.date.day()), (m, d));
            for offset in YEAR_OFFSETS {
                if let Some(other) = BareDate::new(m, d).with_year(anchor.year() + offset) {
                    assert!(r.distance_days <= (other - anchor).num_days().abs());
                }
            }
        }
    }

    #[test]
    fn test_far_date_warns_but_resolves() {
        // 2019-07-20 is 179 days away, 2020-07-20 is 187.
        let r = resolve(ymd(2020, 1, 15), 7, 20);
        assert_eq!(r.date, ymd(2019, 7, 20));
        assert_eq!(r.distance_days, 179);
        assert!(r.low_confidence);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let d = Disambiguator::new(7);
        let r = d
            .resolve(ymd(2021, 1, 4), Some(BareDate::new(12, 28)))
            .unwrap()
            .unwrap();
        assert!(!r.low_confidence);
        let d = Disambiguator::new(6);
        let r = d
            .resolve(ymd(2021, 1, 4), Some(BareDate::new(12, 28)))
            .unwrap()
            .unwrap();
        assert!(r.low_confidence);
    }

    #[test]
    fn test_leap_day_skips_invalid_candidates() {
        let r = resolve(ymd(2021, 1, 10), 2, 29);
        assert_eq!(r.date, ymd(2020, 2, 29));
    }

    #[test]
    fn test_no_valid_candidate() {
        let r = Disambiguator::default().resolve(ymd(2022, 6, 1), Some(BareDate::new(2, 29)));
        assert_eq!(
            r,
            Err(NoCandidate {
                first_year: 2021,
                last_year: 2023
            })
        );
        let r = Disambiguator::default().resolve(ymd(2022, 6, 1), Some(BareDate::new(13, 1)));
        assert!(r.is_err());
    }
}
