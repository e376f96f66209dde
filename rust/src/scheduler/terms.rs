//! Teaching period sequencing.

use chrono::{Datelike, NaiveDate};

use crate::config::TermCycle;
use crate::models::{Period, Semester};

impl TermCycle {
    /// Periods visited by this cycle, in calendar order within a year.
    pub fn periods(&self) -> &'static [Period] {
        match self {
            TermCycle::Standard => &[Period::S1, Period::S2],
            TermCycle::WithIntensive => &[Period::Summer, Period::S1, Period::Winter, Period::S2],
        }
    }

    /// The teaching period after `current`.
    ///
    /// Standard: S1 -> S2 -> S1 of the next year; a Summer or Winter start
    /// rejoins at S1 or S2 of the same year. WithIntensive: Summer -> S1 ->
    /// Winter -> S2 -> Summer of the next year.
    pub fn next(&self, current: Semester) -> Semester {
        let Semester { year, period } = current;
        match (self, period) {
            (TermCycle::Standard, Period::S1) => Semester::new(year, Period::S2),
            (TermCycle::Standard, Period::S2) => Semester::new(year + 1, Period::S1),
            (TermCycle::Standard, Period::Summer) => Semester::new(year, Period::S1),
            (TermCycle::Standard, Period::Winter) => Semester::new(year, Period::S2),
            (TermCycle::WithIntensive, Period::Summer) => Semester::new(year, Period::S1),
            (TermCycle::WithIntensive, Period::S1) => Semester::new(year, Period::Winter),
            (TermCycle::WithIntensive, Period::Winter) => Semester::new(year, Period::S2),
            (TermCycle::WithIntensive, Period::S2) => Semester::new(year + 1, Period::Summer),
        }
    }
}

impl Semester {
    /// First standard semester a student could still start on `date`.
    ///
    /// Before March: S1 of that year. Before August: S2. Otherwise S1 of the
    /// following year.
    pub fn starting_after(date: NaiveDate) -> Self {
        match date.month() {
            1..=2 => Semester::new(date.year(), Period::S1),
            3..=7 => Semester::new(date.year(), Period::S2),
            _ => Semester::new(date.year() + 1, Period::S1),
        }
    }

    /// This semester if it is S1 or S2, otherwise the next standard one
    /// (Summer -> S1, Winter -> S2 of the same year).
    pub fn standard_start(self) -> Self {
        match self.period {
            Period::S1 | Period::S2 => self,
            Period::Summer | Period::Winter => TermCycle::Standard.next(self),
        }
    }
}
