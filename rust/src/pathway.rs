//! Minimal pathway resolution.
//!
//! Walks a target's prerequisite groups depth first, picking representatives
//! for each group with a heuristic score, and returns the units needed in
//! dependency order (deepest prerequisites first, target last).
//!
//! Score of a candidate option `o` for parent `p`:
//!
//! `100 * (10 - rank(o, p)) - 10 * depth(o) - level(o)`
//!
//! where `rank` is the position of `o`'s prefix in the related-prefix table of
//! `p`'s prefix (no bonus when unranked), `depth` is the prerequisite chain
//! length below `o`, and `level` is the unit level. Ties keep option order.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::catalog::Catalog;
use crate::codes::unit_level;
use crate::config::RelatedPrefixes;
use crate::models::{PathwayNode, RequisiteGroup, SatisfiedSet};
use crate::{log_changes, log_checks, log_debug};

/// Ranks at or beyond this index earn no prefix bonus.
const RANKED_PREFIX_SLOTS: usize = 10;
const PREFIX_WEIGHT: i64 = 100;
const DEPTH_WEIGHT: i64 = 10;

/// Working state for one resolution call.
#[derive(Default)]
struct Resolution {
    /// Units entered during this call, finished or not.
    visited: FxHashSet<String>,
    nodes: Vec<PathwayNode>,
    /// Index into `nodes` of every finished unit.
    positions: FxHashMap<String, usize>,
}

impl Resolution {
    fn on_pathway(&self, code: &str) -> bool {
        self.positions.contains_key(code)
    }
}

/// Representatives picked for one group.
struct Selection {
    /// Options already on the pathway that count toward the group.
    reused: Vec<String>,
    /// New options to resolve, each with its unchosen siblings.
    chosen: Vec<(String, Vec<String>)>,
}

/// Resolves minimal prerequisite pathways over a read-only catalog.
pub struct PathwayResolver<'a> {
    catalog: &'a Catalog,
    prefixes: &'a RelatedPrefixes,
    satisfied: &'a SatisfiedSet,
    verbosity: u8,
}

impl<'a> PathwayResolver<'a> {
    pub fn new(
        catalog: &'a Catalog,
        prefixes: &'a RelatedPrefixes,
        satisfied: &'a SatisfiedSet,
    ) -> Self {
        Self {
            catalog,
            prefixes,
            satisfied,
            verbosity: 0,
        }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Units needed to reach `target`, deepest prerequisites first and the
    /// target last.
    ///
    /// Empty when the target is unknown or already satisfied.
    pub fn resolve(&self, target: &str) -> Vec<PathwayNode> {
        let mut resolution = Resolution::default();
        self.visit(target, Vec::new(), &mut resolution);
        resolution.nodes
    }

    fn visit(&self, code: &str, alternatives: Vec<String>, res: &mut Resolution) {
        if self.satisfied.contains(code) || res.visited.contains(code) {
            return;
        }
        let Some(unit) = self.catalog.get(code) else {
            log_checks!(self.verbosity, "  Skipping {}: not in catalog", code);
            return;
        };
        res.visited.insert(code.to_string());

        let mut prerequisites: Vec<String> = Vec::new();
        for group in unit.prerequisite_groups() {
            let selection = self.select(group, code, res);
            for reused in selection.reused {
                if !prerequisites.contains(&reused) {
                    prerequisites.push(reused);
                }
            }
            for (choice, siblings) in selection.chosen {
                self.visit(&choice, siblings, res);
                // A choice still in progress is a cycle back-edge and adds nothing.
                if res.on_pathway(&choice) && !prerequisites.contains(&choice) {
                    prerequisites.push(choice);
                }
            }
        }

        let depth_from_leaves = prerequisites
            .iter()
            .filter_map(|p| res.positions.get(p))
            .map(|&pos| res.nodes[pos].depth_from_leaves + 1)
            .max()
            .unwrap_or(0);

        log_changes!(
            self.verbosity,
            "  Pathway step {}: {} (depth {}, after {:?})",
            res.nodes.len() + 1,
            code,
            depth_from_leaves,
            prerequisites
        );
        res.positions.insert(code.to_string(), res.nodes.len());
        res.nodes.push(PathwayNode {
            code: code.to_string(),
            depth_from_leaves,
            alternatives,
            prerequisites,
        });
    }

    /// Pick as many representatives as the group still needs.
    fn select(&self, group: &RequisiteGroup, parent: &str, res: &Resolution) -> Selection {
        let options = group.distinct_options();
        let already = options
            .iter()
            .filter(|code| self.satisfied.contains(**code))
            .count();
        let mut needed = (group.minimum_required as usize).saturating_sub(already);

        let mut selection = Selection {
            reused: Vec::new(),
            chosen: Vec::new(),
        };
        for code in &options {
            if needed == 0 {
                return selection;
            }
            if res.on_pathway(code) {
                selection.reused.push(code.to_string());
                needed -= 1;
            }
        }
        if needed == 0 {
            return selection;
        }

        let candidates: Vec<&str> = options
            .iter()
            .copied()
            .filter(|code| !self.satisfied.contains(*code) && !res.on_pathway(code))
            .collect();
        let picked = self.rank_candidates(&candidates, parent);
        let picked: Vec<&str> = picked.into_iter().take(needed).collect();

        for choice in &picked {
            let siblings = options
                .iter()
                .filter(|code| !picked.contains(*code))
                .map(|code| code.to_string())
                .collect();
            selection.chosen.push((choice.to_string(), siblings));
        }
        selection
    }

    /// Known candidates in descending score order, ties in option order.
    ///
    /// Options missing from the catalog cannot be resolved and are left out.
    fn rank_candidates<'o>(&self, candidates: &[&'o str], parent: &str) -> Vec<&'o str> {
        let mut scored: Vec<(&'o str, i64)> = candidates
            .iter()
            .filter(|code| self.catalog.contains(code))
            .map(|&code| (code, self.score(code, parent)))
            .collect();
        for (code, score) in &scored {
            log_checks!(self.verbosity, "    Option {} for {}: score {}", code, parent, score);
        }
        // Stable sort keeps the first-encountered option on ties.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(code, _)| code).collect()
    }

    /// Pick one representative from an OR-group of options.
    ///
    /// An option already satisfied wins outright. Otherwise the highest-scoring
    /// catalog option is returned; `None` when no option is in the catalog.
    pub fn choose_best_option(&self, options: &[String], parent: &str) -> Option<String> {
        if let Some(done) = options.iter().find(|code| self.satisfied.contains(*code)) {
            return Some(done.clone());
        }
        let candidates: Vec<&str> = options.iter().map(|s| s.as_str()).collect();
        self.rank_candidates(&candidates, parent)
            .first()
            .map(|code| code.to_string())
    }

    /// Heuristic preference for `option` as a prerequisite of `parent`.
    pub fn score(&self, option: &str, parent: &str) -> i64 {
        let prefix_bonus = match self.prefixes.rank(parent, option) {
            Some(rank) if rank < RANKED_PREFIX_SLOTS => {
                PREFIX_WEIGHT * (RANKED_PREFIX_SLOTS - rank) as i64
            }
            _ => 0,
        };
        prefix_bonus - DEPTH_WEIGHT * self.prereq_depth(option) as i64 - unit_level(option) as i64
    }

    /// Prerequisite chain length below `code`.
    ///
    /// 0 for units already satisfied, unknown, or without prerequisites.
    /// Otherwise 1 plus, over all groups, the largest of each group's
    /// shallowest option. A unit met again on the current chain counts as 0.
    /// Each unit's depth is computed once per call.
    pub fn prereq_depth(&self, code: &str) -> u32 {
        let mut chain: FxHashSet<String> = FxHashSet::default();
        let mut memo: FxHashMap<String, u32> = FxHashMap::default();
        self.depth_below(code, &mut chain, &mut memo)
    }

    fn depth_below(
        &self,
        code: &str,
        chain: &mut FxHashSet<String>,
        memo: &mut FxHashMap<String, u32>,
    ) -> u32 {
        if self.satisfied.contains(code) || chain.contains(code) {
            return 0;
        }
        if let Some(&depth) = memo.get(code) {
            return depth;
        }
        let Some(unit) = self.catalog.get(code) else {
            return 0;
        };
        let groups = unit.prerequisite_groups();
        if groups.is_empty() {
            memo.insert(code.to_string(), 0);
            return 0;
        }

        chain.insert(code.to_string());
        let deepest_group = groups
            .iter()
            .map(|group| {
                group
                    .options
                    .iter()
                    .map(|option| self.depth_below(option, chain, memo))
                    .min()
                    .unwrap_or(0)
            })
            .max()
            .unwrap_or(0);
        chain.remove(code);

        let depth = deepest_group + 1;
        log_debug!(self.verbosity, "      depth({}) = {}", code, depth);
        memo.insert(code.to_string(), depth);
        depth
    }
}

/// Resolve the minimal pathway to `target` given the units already satisfied.
pub fn resolve_pathway(
    target: &str,
    catalog: &Catalog,
    satisfied: &SatisfiedSet,
    prefixes: &RelatedPrefixes,
) -> Vec<PathwayNode> {
    PathwayResolver::new(catalog, prefixes, satisfied).resolve(target)
}
