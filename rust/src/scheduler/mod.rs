//! Semester scheduling.
//!
//! Assigns a set of units to a chronological sequence of teaching periods,
//! honoring in-set prerequisite ordering, offering windows and a per-semester
//! unit cap. Units that can never be placed are reported, not raised.

mod core;
mod inputs;
mod terms;

pub use core::{schedule, ScheduleOutcome, ScheduleUnit, SemesterScheduler};
pub use inputs::{units_from_pathway, units_from_plan};
