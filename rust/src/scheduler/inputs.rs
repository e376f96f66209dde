//! Building scheduler input from a resolved pathway or a student's plan.

use rustc_hash::FxHashSet;

use crate::catalog::Catalog;
use crate::graph::DependencyGraph;
use crate::models::{PathwayNode, SatisfiedSet};

use super::core::ScheduleUnit;

/// One schedule unit per pathway step, depending on its chosen prerequisites.
pub fn units_from_pathway(pathway: &[PathwayNode], catalog: &Catalog) -> Vec<ScheduleUnit> {
    let on_pathway: FxHashSet<&str> = pathway.iter().map(|node| node.code.as_str()).collect();
    pathway
        .iter()
        .map(|node| ScheduleUnit {
            code: node.code.clone(),
            depends_on: node
                .prerequisites
                .iter()
                .filter(|code| on_pathway.contains(code.as_str()))
                .cloned()
                .collect(),
            offered_periods: catalog
                .get(&node.code)
                .map(|unit| unit.offered_periods())
                .unwrap_or_default(),
        })
        .collect()
}

/// Schedule units for a full plan.
///
/// Keeps the caller's order, drops repeats and anything in `completed`.
/// Dependencies are the unit's catalog prerequisites that are also planned;
/// corequisites never force an ordering.
pub fn units_from_plan(
    planned: &[String],
    completed: &SatisfiedSet,
    catalog: &Catalog,
    graph: &DependencyGraph,
) -> Vec<ScheduleUnit> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let codes: Vec<&str> = planned
        .iter()
        .map(String::as_str)
        .filter(|code| !completed.contains(*code))
        .filter(|code| seen.insert(*code))
        .collect();
    let in_plan: FxHashSet<&str> = codes.iter().copied().collect();

    codes
        .iter()
        .map(|&code| ScheduleUnit {
            code: code.to_string(),
            depends_on: graph
                .node(code)
                .map(|node| {
                    node.prerequisites
                        .iter()
                        .filter(|p| in_plan.contains(p.as_str()))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
            offered_periods: catalog
                .get(code)
                .map(|unit| unit.offered_periods())
                .unwrap_or_default(),
        })
        .collect()
}
