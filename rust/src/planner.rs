//! Query surface over a loaded catalog.
//!
//! A `Planner` holds the read-only catalog, its dependency graph and the
//! related-prefix table. Every query takes the caller's satisfied set fresh,
//! so a single planner can be shared between callers.

use crate::catalog::{Catalog, ProgramCatalog};
use crate::config::{ConfigError, PlannerConfig, RelatedPrefixes, TermCycle};
use crate::graph::{DependencyGraph, UnlockView};
use crate::log_changes;
use crate::models::{PathwayNode, SatisfiedSet, Semester};
use crate::pathway::PathwayResolver;
use crate::program::{evaluate_program, program_unit_codes, ProgramProgress};
use crate::satisfaction::{check_satisfaction, Availability, SatisfactionReport};
use crate::scheduler::{units_from_pathway, units_from_plan, ScheduleOutcome, SemesterScheduler};

pub struct Planner {
    catalog: Catalog,
    graph: DependencyGraph,
    prefixes: RelatedPrefixes,
    programs: ProgramCatalog,
    config: PlannerConfig,
    scheduler: SemesterScheduler,
}

impl Planner {
    pub fn new(
        catalog: Catalog,
        prefixes: RelatedPrefixes,
        config: PlannerConfig,
    ) -> Result<Self, ConfigError> {
        let scheduler = SemesterScheduler::new(&config)?;
        let graph = DependencyGraph::build(&catalog);
        log_changes!(
            config.verbosity,
            "Planner ready: {} units, {} prefix rules",
            catalog.len(),
            prefixes.len()
        );
        Ok(Self {
            catalog,
            graph,
            prefixes,
            programs: ProgramCatalog::default(),
            config,
            scheduler,
        })
    }

    pub fn with_programs(mut self, programs: ProgramCatalog) -> Self {
        self.programs = programs;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Minimal ordered pathway to `target`.
    pub fn pathway(&self, target: &str, satisfied: &SatisfiedSet) -> Vec<PathwayNode> {
        PathwayResolver::new(&self.catalog, &self.prefixes, satisfied)
            .with_verbosity(self.config.verbosity)
            .resolve(target)
    }

    /// Resolve the pathway to `target` and lay it out over S1/S2 semesters.
    ///
    /// A Summer or Winter `start` moves forward to the next S1 or S2.
    pub fn pathway_query(
        &self,
        target: &str,
        satisfied: &SatisfiedSet,
        units_per_semester: usize,
        start: Semester,
    ) -> Result<ScheduleOutcome, ConfigError> {
        let config = self.config.with_units_per_semester(units_per_semester);
        let scheduler = SemesterScheduler::new(&config)?.with_term_cycle(TermCycle::Standard);
        let pathway = self.pathway(target, satisfied);
        let units = units_from_pathway(&pathway, &self.catalog);
        Ok(scheduler.schedule(&units, start.standard_start(), satisfied))
    }

    pub fn unlock_query(&self, code: &str) -> Option<UnlockView> {
        self.graph.unlock_view(code)
    }

    /// Check a catalog unit's requisites. `None` for an unknown code.
    pub fn satisfaction_query(
        &self,
        code: &str,
        satisfied: &SatisfiedSet,
    ) -> Option<SatisfactionReport> {
        self.catalog
            .get(code)
            .map(|unit| check_satisfaction(unit.requisites.as_ref(), satisfied))
    }

    pub fn availability(&self, code: &str, satisfied: &SatisfiedSet) -> Option<Availability> {
        self.satisfaction_query(code, satisfied)
            .map(|report| report.availability())
    }

    /// Schedule a student's planned units after what they have completed,
    /// using the configured term cycle.
    pub fn schedule_plan(
        &self,
        planned: &[String],
        completed: &SatisfiedSet,
        start: Semester,
    ) -> ScheduleOutcome {
        let units = units_from_plan(planned, completed, &self.catalog, &self.graph);
        self.scheduler.schedule(&units, start, completed)
    }

    pub fn program_progress(&self, code: &str, satisfied: &SatisfiedSet) -> Option<ProgramProgress> {
        evaluate_program(code, &self.programs, satisfied)
    }

    pub fn program_units(&self, code: &str) -> Vec<String> {
        program_unit_codes(code, &self.programs)
    }
}
