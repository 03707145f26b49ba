//! Year reconstruction for the release-date column.
//!
//! Release dates are published in ascending order but without a year. The
//! running year starts at a configured base and advances by one each time
//! the month/day goes backwards between consecutive rows (12月31日 → 1月2日).

use chrono::NaiveDate;

use crate::types::BareDate;

/// A release date with its year attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub date: NaiveDate,
    /// This row is the first one after a December → January wrap.
    pub rolled_over: bool,
}

/// Carried state for one left-to-right pass over a file.
#[derive(Debug, Clone)]
pub struct RunningYearState {
    current_year: i32,
    previous: Option<BareDate>,
}

impl RunningYearState {
    pub fn new(base_year: i32) -> Self {
        Self {
            current_year: base_year,
            previous: None,
        }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Assign a year to the release date of the next row.
    ///
    /// Returns `None` if the month/day does not exist in the running year
    /// (or is the zero placeholder); the caller treats that as fatal.
    pub fn resolve_anchor(&mut self, bare: BareDate) -> Option<Anchor> {
        if bare.month == 0 {
            return None;
        }

        let rolled_over = self.previous.is_some_and(|prev| bare < prev);
        if rolled_over {
            self.current_year += 1;
        }
        self.previous = Some(bare);

        let date = bare.with_year(self.current_year)?;
        Some(Anchor { date, rolled_over })
    }
}
