//! Prerequisite resolution and semester planning over a university unit catalog.
//!
//! The catalog and its dependency graph are built once and shared read-only;
//! every query takes the caller's satisfied set fresh. Python bindings are
//! available behind the `python` feature.

pub mod catalog;
pub mod codes;
pub mod config;
pub mod graph;
pub mod logging;
pub mod models;
pub mod pathway;
pub mod planner;
pub mod program;
pub mod satisfaction;
pub mod scheduler;

#[cfg(feature = "python")]
mod python;

pub use catalog::{
    Catalog, CatalogError, CatalogLoader, DocumentCache, DocumentSource, FsSource, ProgramCatalog,
};
pub use config::{ConfigError, PlannerConfig, RelatedPrefixes, TermCycle};
pub use graph::{build_graph, DependencyGraph, UnlockView};
pub use models::{
    DependencyGraphNode, PathwayNode, Period, RequisiteGroup, RequisiteSet, SatisfiedSet,
    ScheduledSemester, Semester, UnitRecord,
};
pub use pathway::{resolve_pathway, PathwayResolver};
pub use planner::Planner;
pub use program::{evaluate_program, ProgramProgress, RequirementTree};
pub use satisfaction::{check_satisfaction, Availability, SatisfactionReport};
pub use scheduler::{schedule, ScheduleOutcome, ScheduleUnit, SemesterScheduler};
