//! PyO3 bindings.
//!
//! Periods cross the boundary as their short names ("S1", "S2", "Summer",
//! "Winter"); results are returned as plain tuples and lists.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashSet;

use crate::catalog::{Catalog, ProgramCatalog};
use crate::config::{PlannerConfig, RelatedPrefixes, TermCycle};
use crate::models::{Period, SatisfiedSet, Semester};
use crate::planner::Planner;
use crate::satisfaction::Availability;
use crate::scheduler::ScheduleOutcome;

type SemesterTuple = (i32, String, Vec<String>);

fn to_satisfied(codes: HashSet<String>) -> SatisfiedSet {
    codes.into_iter().collect()
}

fn parse_period(period: &str) -> PyResult<Period> {
    period
        .parse::<Period>()
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

fn start_semester(
    year: Option<i32>,
    period: Option<&str>,
    today: Option<NaiveDate>,
) -> PyResult<Semester> {
    match (year, period) {
        (Some(year), Some(period)) => Ok(Semester::new(year, parse_period(period)?)),
        (None, None) => Ok(Semester::starting_after(
            today.unwrap_or_else(|| chrono::Local::now().date_naive()),
        )),
        _ => Err(PyValueError::new_err(
            "start_year and start_period must be given together",
        )),
    }
}

fn outcome_tuples(outcome: ScheduleOutcome) -> (Vec<SemesterTuple>, Vec<String>) {
    let semesters = outcome
        .semesters
        .into_iter()
        .map(|s| (s.year, s.period.to_string(), s.assigned_units))
        .collect();
    (semesters, outcome.unscheduled)
}

fn availability_name(availability: Availability) -> &'static str {
    match availability {
        Availability::FullyAvailable => "fully_available",
        Availability::PartiallyAvailable => "partially_available",
        Availability::Unavailable => "unavailable",
    }
}

/// Catalog planner exposed to Python as `Planner`.
#[pyclass(name = "Planner")]
pub struct PyPlanner {
    inner: Planner,
}

#[pymethods]
impl PyPlanner {
    #[new]
    #[pyo3(signature = (catalog_json, prefixes_json=None, programs_json=None, units_per_semester=4, max_rounds=24, with_intensive=false, verbosity=0))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        catalog_json: &str,
        prefixes_json: Option<&str>,
        programs_json: Option<&str>,
        units_per_semester: usize,
        max_rounds: usize,
        with_intensive: bool,
        verbosity: u8,
    ) -> PyResult<Self> {
        let invalid = |e: serde_json::Error| PyValueError::new_err(e.to_string());
        let catalog = Catalog::from_json_str(catalog_json).map_err(invalid)?;
        let prefixes: RelatedPrefixes = match prefixes_json {
            Some(text) => serde_json::from_str(text).map_err(invalid)?,
            None => RelatedPrefixes::default(),
        };
        let programs = match programs_json {
            Some(text) => ProgramCatalog::from_json_str(text).map_err(invalid)?,
            None => ProgramCatalog::default(),
        };
        let config = PlannerConfig {
            units_per_semester,
            max_rounds,
            term_cycle: if with_intensive {
                TermCycle::WithIntensive
            } else {
                TermCycle::Standard
            },
            verbosity,
        };
        let inner = Planner::new(catalog, prefixes, config)
            .map_err(|e| PyValueError::new_err(e.to_string()))?
            .with_programs(programs);
        Ok(Self { inner })
    }

    /// Minimal pathway as (code, depth_from_leaves, alternatives, prerequisites) tuples.
    #[pyo3(signature = (target, satisfied=HashSet::new()))]
    fn pathway(
        &self,
        target: &str,
        satisfied: HashSet<String>,
    ) -> Vec<(String, u32, Vec<String>, Vec<String>)> {
        self.inner
            .pathway(target, &to_satisfied(satisfied))
            .into_iter()
            .map(|n| (n.code, n.depth_from_leaves, n.alternatives, n.prerequisites))
            .collect()
    }

    /// Pathway laid out over S1/S2 semesters.
    ///
    /// Without an explicit start, begins at the next standard semester after
    /// `today` (default: the local date).
    #[pyo3(signature = (target, satisfied=HashSet::new(), units_per_semester=4, start_year=None, start_period=None, today=None))]
    fn pathway_schedule(
        &self,
        target: &str,
        satisfied: HashSet<String>,
        units_per_semester: usize,
        start_year: Option<i32>,
        start_period: Option<&str>,
        today: Option<NaiveDate>,
    ) -> PyResult<(Vec<SemesterTuple>, Vec<String>)> {
        let start = start_semester(start_year, start_period, today)?;
        let outcome = self
            .inner
            .pathway_query(target, &to_satisfied(satisfied), units_per_semester, start)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(outcome_tuples(outcome))
    }

    /// (unlocks, requires) for a unit, or None if unknown.
    fn unlocks(&self, code: &str) -> Option<(Vec<String>, Vec<String>)> {
        self.inner
            .unlock_query(code)
            .map(|view| (view.unlocks, view.requires))
    }

    /// (satisfied, availability, unmet groups as (still_needed, options)), or None if unknown.
    #[pyo3(signature = (code, satisfied=HashSet::new()))]
    fn satisfaction(
        &self,
        code: &str,
        satisfied: HashSet<String>,
    ) -> Option<(bool, &'static str, Vec<(u32, Vec<String>)>)> {
        self.inner
            .satisfaction_query(code, &to_satisfied(satisfied))
            .map(|report| {
                let availability = availability_name(report.availability());
                let unmet = report
                    .unmet_groups
                    .into_iter()
                    .map(|g| (g.still_needed, g.remaining_options))
                    .collect();
                (report.satisfied, availability, unmet)
            })
    }

    /// Schedule planned units after the completed ones.
    #[pyo3(signature = (planned, completed=HashSet::new(), start_year=None, start_period=None, today=None))]
    fn schedule_plan(
        &self,
        planned: Vec<String>,
        completed: HashSet<String>,
        start_year: Option<i32>,
        start_period: Option<&str>,
        today: Option<NaiveDate>,
    ) -> PyResult<(Vec<SemesterTuple>, Vec<String>)> {
        let start = start_semester(start_year, start_period, today)?;
        let outcome = self
            .inner
            .schedule_plan(&planned, &to_satisfied(completed), start);
        Ok(outcome_tuples(outcome))
    }

    /// Whether a program's requirements are met, or None if unknown.
    #[pyo3(signature = (code, satisfied=HashSet::new()))]
    fn program_satisfied(&self, code: &str, satisfied: HashSet<String>) -> Option<bool> {
        self.inner
            .program_progress(code, &to_satisfied(satisfied))
            .map(|progress| progress.satisfied)
    }

    fn program_units(&self, code: &str) -> Vec<String> {
        self.inner.program_units(code)
    }

    fn __len__(&self) -> usize {
        self.inner.catalog().len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Planner(units={}, units_per_semester={})",
            self.inner.catalog().len(),
            self.inner.config().units_per_semester
        )
    }
}

/// The unitplan.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPlanner>()?;
    Ok(())
}
