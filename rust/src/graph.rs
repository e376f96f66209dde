//! Unit dependency graph derived from catalog requisites.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::models::DependencyGraphNode;

/// Answer to "what does this unit unlock, and what does it need".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UnlockView {
    pub unlocks: Vec<String>,
    pub requires: Vec<String>,
}

/// Per-unit unlock/require adjacency for a whole catalog.
///
/// Pure function of the catalog; build once per load and share read-only.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    nodes: FxHashMap<String, DependencyGraphNode>,
}

impl DependencyGraph {
    /// Record an edge `r -> u` for every option `r` in `u`'s prerequisite or
    /// corequisite groups. Self references and codes absent from the catalog
    /// are dropped.
    pub fn build(catalog: &Catalog) -> Self {
        let mut nodes: FxHashMap<String, DependencyGraphNode> =
            FxHashMap::with_capacity_and_hasher(catalog.len(), Default::default());
        for unit in catalog.iter() {
            nodes.insert(
                unit.code.clone(),
                DependencyGraphNode {
                    code: unit.code.clone(),
                    display_name: unit.title.clone(),
                    school: unit.school.clone(),
                    ..DependencyGraphNode::default()
                },
            );
        }

        for unit in catalog.iter() {
            let prereq_options = unit
                .prerequisite_groups()
                .iter()
                .flat_map(|g| g.options.iter().map(move |code| (code, true)));
            let coreq_options = unit
                .corequisite_groups()
                .iter()
                .flat_map(|g| g.options.iter().map(move |code| (code, false)));

            for (required, is_prerequisite) in prereq_options.chain(coreq_options) {
                if *required == unit.code || !catalog.contains(required) {
                    continue;
                }
                if let Some(node) = nodes.get_mut(required) {
                    node.unlocks.insert(unit.code.clone());
                }
                if let Some(node) = nodes.get_mut(&unit.code) {
                    node.requires.insert(required.clone());
                    if is_prerequisite {
                        node.prerequisites.insert(required.clone());
                    }
                }
            }
        }

        Self { nodes }
    }

    pub fn node(&self, code: &str) -> Option<&DependencyGraphNode> {
        self.nodes.get(code)
    }

    /// Sorted unlocks and requires of `code`, `None` if it is not in the catalog.
    pub fn unlock_view(&self, code: &str) -> Option<UnlockView> {
        self.nodes.get(code).map(|node| UnlockView {
            unlocks: node.unlocks.iter().cloned().collect(),
            requires: node.requires.iter().cloned().collect(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyGraphNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Build the dependency graph for a catalog.
pub fn build_graph(catalog: &Catalog) -> DependencyGraph {
    DependencyGraph::build(catalog)
}
