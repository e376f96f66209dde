//! Greedy round-based semester scheduler.

use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::config::{ConfigError, PlannerConfig, TermCycle};
use crate::models::{Period, SatisfiedSet, ScheduledSemester, Semester};
use crate::{log_changes, log_checks, log_debug};

/// A unit waiting to be placed, with its in-set dependencies and offering windows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleUnit {
    pub code: String,
    /// Codes that must be placed in an earlier semester (or be seeded).
    pub depends_on: BTreeSet<String>,
    /// Periods the unit runs in. Empty means unknown, treated as always offered.
    pub offered_periods: BTreeSet<Period>,
}

impl ScheduleUnit {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            ..Self::default()
        }
    }

    pub fn depending_on(mut self, codes: &[&str]) -> Self {
        self.depends_on.extend(codes.iter().map(|c| c.to_string()));
        self
    }

    pub fn offered_in(mut self, periods: &[Period]) -> Self {
        self.offered_periods.extend(periods.iter().copied());
        self
    }

    pub fn is_offered_in(&self, period: Period) -> bool {
        self.offered_periods.is_empty() || self.offered_periods.contains(&period)
    }
}

/// Result of a scheduling run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleOutcome {
    /// Non-empty semesters in chronological order.
    pub semesters: Vec<ScheduledSemester>,
    /// Units still unplaced when the round cap was hit, in input order.
    pub unscheduled: Vec<String>,
}

impl ScheduleOutcome {
    /// Semester index of each placed unit.
    pub fn placement(&self, code: &str) -> Option<usize> {
        self.semesters
            .iter()
            .position(|s| s.assigned_units.iter().any(|c| c == code))
    }

    pub fn scheduled_count(&self) -> usize {
        self.semesters.iter().map(|s| s.assigned_units.len()).sum()
    }
}

/// Places units into semesters one round at a time.
///
/// Each round is one teaching period. A unit is eligible when every code in
/// its `depends_on` was placed in an earlier round (or seeded) and it is
/// offered in the current period. Eligible units are taken in input order up
/// to the per-semester cap. Rounds with nothing eligible still advance the
/// period. After `max_rounds` rounds whatever is left is reported as
/// unscheduled.
#[derive(Clone, Debug)]
pub struct SemesterScheduler {
    units_per_semester: usize,
    max_rounds: usize,
    term_cycle: TermCycle,
    verbosity: u8,
}

impl SemesterScheduler {
    pub fn new(config: &PlannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            units_per_semester: config.units_per_semester,
            max_rounds: config.max_rounds,
            term_cycle: config.term_cycle,
            verbosity: config.verbosity,
        })
    }

    pub fn with_term_cycle(mut self, term_cycle: TermCycle) -> Self {
        self.term_cycle = term_cycle;
        self
    }

    pub fn term_cycle(&self) -> TermCycle {
        self.term_cycle
    }

    /// Schedule `units` starting at `start`.
    ///
    /// Codes in `seed` count as already placed: their dependents can go in the
    /// first round, and seeded codes appearing in `units` are skipped. Repeated
    /// codes keep their first occurrence.
    pub fn schedule(
        &self,
        units: &[ScheduleUnit],
        start: Semester,
        seed: &SatisfiedSet,
    ) -> ScheduleOutcome {
        let verbosity = self.verbosity;
        let mut scheduled: FxHashSet<&str> = seed.iter().map(String::as_str).collect();

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut remaining: Vec<&ScheduleUnit> = Vec::with_capacity(units.len());
        for unit in units {
            if scheduled.contains(unit.code.as_str()) {
                log_debug!(verbosity, "  {} already taken, skipping", unit.code);
                continue;
            }
            if seen.insert(unit.code.as_str()) {
                remaining.push(unit);
            }
        }

        let mut semesters = Vec::new();
        let mut current = start;

        for round in 0..self.max_rounds {
            if remaining.is_empty() {
                break;
            }
            log_changes!(
                verbosity,
                "Round {}: {} ({} units remaining)",
                round,
                current,
                remaining.len()
            );

            let mut placed: Vec<&str> = Vec::new();
            for unit in remaining.iter().copied() {
                if placed.len() >= self.units_per_semester {
                    break;
                }
                if !unit.is_offered_in(current.period) {
                    log_debug!(verbosity, "  {} not offered in {}", unit.code, current.period);
                    continue;
                }
                if let Some(missing) = unit
                    .depends_on
                    .iter()
                    .find(|code| !scheduled.contains(code.as_str()))
                {
                    log_debug!(verbosity, "  {} waiting on {}", unit.code, missing);
                    continue;
                }
                log_checks!(verbosity, "  Placing {} in {}", unit.code, current);
                placed.push(unit.code.as_str());
            }

            if placed.is_empty() {
                log_checks!(verbosity, "  Nothing eligible in {}", current);
            } else {
                scheduled.extend(placed.iter().copied());
                remaining.retain(|unit| !placed.contains(&unit.code.as_str()));
                semesters.push(ScheduledSemester {
                    year: current.year,
                    period: current.period,
                    assigned_units: placed.iter().map(|code| code.to_string()).collect(),
                });
            }

            current = self.term_cycle.next(current);
        }

        let unscheduled: Vec<String> = remaining.iter().map(|unit| unit.code.clone()).collect();
        if !unscheduled.is_empty() {
            log_changes!(
                verbosity,
                "Round cap {} reached, dropping: {}",
                self.max_rounds,
                unscheduled.join(", ")
            );
        }

        ScheduleOutcome {
            semesters,
            unscheduled,
        }
    }
}

/// Schedule units on the standard S1/S2 cycle with default round cap and no seed.
///
/// A Summer or Winter start moves forward to the next S1 or S2.
pub fn schedule(
    units: &[ScheduleUnit],
    start_year: i32,
    start_period: Period,
    units_per_semester: usize,
) -> Result<ScheduleOutcome, ConfigError> {
    let config = PlannerConfig::default().with_units_per_semester(units_per_semester);
    let scheduler = SemesterScheduler::new(&config)?.with_term_cycle(TermCycle::Standard);
    Ok(scheduler.schedule(
        units,
        Semester::new(start_year, start_period).standard_start(),
        &SatisfiedSet::default(),
    ))
}
