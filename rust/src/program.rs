//! Program and area-of-study requirement trees.
//!
//! The source data is a flat list of groups linked by `parentId`. It is held as
//! an arena keyed by group id plus a children index derived once at build time,
//! so the structure stays plain data and can be shared read-only.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::catalog::ProgramCatalog;
use crate::models::SatisfiedSet;

/// How a requirement group combines its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKind {
    #[serde(rename = "AND", alias = "and", alias = "And")]
    And,
    #[serde(rename = "OR", alias = "or", alias = "Or")]
    Or,
}

fn id_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_value(Value::deserialize(deserializer)?)
        .ok_or_else(|| serde::de::Error::custom("group id must be a string or number"))
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(id_from_value(Value::deserialize(deserializer)?))
}

/// One node of a program's requirement tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementGroup {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub parent_id: Option<String>,
    pub kind: GroupKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub credit_points: u32,
    /// Members needed when `kind` is OR; 1 when absent.
    #[serde(default)]
    pub num_required: Option<u32>,
    /// Unit codes or nested area-of-study codes.
    #[serde(default)]
    pub unit_or_sub_area_codes: Vec<String>,
}

/// Requirement groups indexed by id, with derived child lists.
#[derive(Clone, Debug, Default)]
pub struct RequirementTree {
    groups: FxHashMap<String, RequirementGroup>,
    children: FxHashMap<String, Vec<String>>,
    roots: Vec<String>,
}

impl RequirementTree {
    /// Build the arena and children index from the flat list.
    ///
    /// The first group with a given id wins. Groups whose parent is not in the
    /// list become roots, as does the first group of any `parentId` cycle
    /// that no root reaches.
    pub fn build(groups: Vec<RequirementGroup>) -> Self {
        let mut tree = Self::default();
        let mut order: Vec<String> = Vec::with_capacity(groups.len());

        for group in groups {
            if tree.groups.contains_key(&group.id) {
                continue;
            }
            order.push(group.id.clone());
            tree.groups.insert(group.id.clone(), group);
        }

        for id in &order {
            let parent = tree.groups[id]
                .parent_id
                .clone()
                .filter(|p| p != id && tree.groups.contains_key(p));
            match parent {
                Some(parent_id) => tree.children.entry(parent_id).or_default().push(id.clone()),
                None => tree.roots.push(id.clone()),
            }
        }

        let mut reached: FxHashSet<String> = FxHashSet::default();
        for root in tree.roots.clone() {
            tree.mark_reached(&root, &mut reached);
        }
        for id in order {
            if !reached.contains(&id) {
                tree.mark_reached(&id, &mut reached);
                tree.roots.push(id);
            }
        }
        tree
    }

    fn mark_reached(&self, id: &str, reached: &mut FxHashSet<String>) {
        let mut stack = vec![id.to_string()];
        while let Some(id) = stack.pop() {
            if reached.insert(id.clone()) {
                stack.extend(self.children(&id).iter().cloned());
            }
        }
    }

    pub fn group(&self, id: &str) -> Option<&RequirementGroup> {
        self.groups.get(id)
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.children.get(id).map(|c| c.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Program document shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramRecord {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub requirement_groups: Vec<RequirementGroup>,
}

/// A course or area of study with its built requirement tree.
#[derive(Clone, Debug)]
pub struct Program {
    pub code: String,
    pub title: String,
    pub tree: RequirementTree,
}

impl Program {
    pub fn from_record(record: ProgramRecord) -> Self {
        Self {
            code: record.code,
            title: record.title,
            tree: RequirementTree::build(record.requirement_groups),
        }
    }
}

/// Whether a single unit or nested area counts toward its group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberStatus {
    pub code: String,
    pub satisfied: bool,
}

/// Evaluated state of one requirement group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProgress {
    pub id: String,
    pub title: String,
    pub kind: GroupKind,
    pub satisfied: bool,
    /// Satisfied members (child groups plus codes).
    pub completed: usize,
    pub required: usize,
    pub members: Vec<MemberStatus>,
    pub children: Vec<GroupProgress>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProgramProgress {
    pub code: String,
    pub satisfied: bool,
    pub groups: Vec<GroupProgress>,
}

struct Evaluator<'a> {
    programs: &'a ProgramCatalog,
    satisfied: &'a SatisfiedSet,
    visiting: FxHashSet<String>,
}

impl Evaluator<'_> {
    fn program(&mut self, code: &str) -> Option<ProgramProgress> {
        let programs = self.programs;
        let program = programs.get(code)?;
        self.visiting.insert(code.to_string());
        let mut visited_groups = FxHashSet::default();
        let groups: Vec<GroupProgress> = program
            .tree
            .roots()
            .iter()
            .filter_map(|id| self.group(&program.tree, id, &mut visited_groups))
            .collect();
        self.visiting.remove(code);

        Some(ProgramProgress {
            code: code.to_string(),
            satisfied: groups.iter().all(|g| g.satisfied),
            groups,
        })
    }

    fn member(&mut self, code: &str) -> bool {
        if self.satisfied.contains(code) {
            return true;
        }
        if self.visiting.contains(code) {
            return false;
        }
        self.program(code).map(|p| p.satisfied).unwrap_or(false)
    }

    fn group(
        &mut self,
        tree: &RequirementTree,
        id: &str,
        visited: &mut FxHashSet<String>,
    ) -> Option<GroupProgress> {
        let group = tree.group(id)?;
        if !visited.insert(id.to_string()) {
            return None;
        }

        let children: Vec<GroupProgress> = tree
            .children(id)
            .iter()
            .filter_map(|child| self.group(tree, child, visited))
            .collect();
        let members: Vec<MemberStatus> = group
            .unit_or_sub_area_codes
            .iter()
            .map(|code| MemberStatus {
                code: code.clone(),
                satisfied: self.member(code),
            })
            .collect();

        let total = children.len() + members.len();
        let completed = children.iter().filter(|c| c.satisfied).count()
            + members.iter().filter(|m| m.satisfied).count();
        let required = match group.kind {
            GroupKind::And => total,
            GroupKind::Or => group.num_required.unwrap_or(1) as usize,
        };

        Some(GroupProgress {
            id: group.id.clone(),
            title: group.title.clone(),
            kind: group.kind,
            satisfied: completed >= required,
            completed,
            required,
            members,
            children,
        })
    }
}

/// Evaluate a program's requirement tree against the acquired units.
///
/// Nested area codes are looked up in `programs` and evaluated recursively;
/// unknown codes and cyclic area references count as unmet. Returns `None`
/// for an unknown program code.
pub fn evaluate_program(
    code: &str,
    programs: &ProgramCatalog,
    satisfied: &SatisfiedSet,
) -> Option<ProgramProgress> {
    Evaluator {
        programs,
        satisfied,
        visiting: FxHashSet::default(),
    }
    .program(code)
}

/// Every unit code reachable from a program, nested areas expanded, in
/// first-seen order.
pub fn program_unit_codes(code: &str, programs: &ProgramCatalog) -> Vec<String> {
    fn walk_program(
        code: &str,
        programs: &ProgramCatalog,
        seen_areas: &mut FxHashSet<String>,
        seen_units: &mut FxHashSet<String>,
        out: &mut Vec<String>,
    ) {
        let Some(program) = programs.get(code) else {
            return;
        };
        if !seen_areas.insert(code.to_string()) {
            return;
        }
        let mut stack: Vec<&str> = program.tree.roots().iter().rev().map(|s| s.as_str()).collect();
        let mut seen_groups: FxHashSet<&str> = FxHashSet::default();
        while let Some(id) = stack.pop() {
            if !seen_groups.insert(id) {
                continue;
            }
            let Some(group) = program.tree.group(id) else {
                continue;
            };
            for member in &group.unit_or_sub_area_codes {
                if programs.contains(member) {
                    walk_program(member, programs, seen_areas, seen_units, out);
                } else if seen_units.insert(member.clone()) {
                    out.push(member.clone());
                }
            }
            stack.extend(program.tree.children(id).iter().rev().map(|s| s.as_str()));
        }
    }

    let mut out = Vec::new();
    walk_program(
        code,
        programs,
        &mut FxHashSet::default(),
        &mut FxHashSet::default(),
        &mut out,
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(
        id: &str,
        parent: Option<&str>,
        kind: GroupKind,
        num_required: Option<u32>,
        codes: &[&str],
    ) -> RequirementGroup {
        RequirementGroup {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            kind,
            title: format!("group {}", id),
            credit_points: 0,
            num_required,
            unit_or_sub_area_codes: codes.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn record(code: &str, groups: Vec<RequirementGroup>) -> ProgramRecord {
        ProgramRecord {
            code: code.to_string(),
            title: code.to_string(),
            requirement_groups: groups,
        }
    }

    fn satisfied(codes: &[&str]) -> SatisfiedSet {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn sample_programs() -> ProgramCatalog {
        ProgramCatalog::new(vec![
            record(
                "C2001",
                vec![
                    group("1", None, GroupKind::And, None, &[]),
                    group("2", Some("1"), GroupKind::And, None, &["FIT1045", "FIT1008"]),
                    group("3", Some("1"), GroupKind::Or, Some(1), &["MAJ01", "MAJ02"]),
                ],
            ),
            record(
                "MAJ01",
                vec![group("10", None, GroupKind::Or, Some(2), &["FIT2004", "FIT2014", "FIT2099"])],
            ),
            record("MAJ02", vec![group("20", None, GroupKind::And, None, &["ENG1005"])]),
        ])
    }

    #[test]
    fn test_tree_children_index() {
        let tree = RequirementTree::build(vec![
            group("1", None, GroupKind::And, None, &[]),
            group("2", Some("1"), GroupKind::And, None, &[]),
            group("3", Some("1"), GroupKind::Or, Some(1), &[]),
            group("4", Some("99"), GroupKind::And, None, &[]),
            group("2", None, GroupKind::Or, None, &[]),
        ]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.roots(), &["1".to_string(), "4".to_string()]);
        assert_eq!(tree.children("1"), &["2".to_string(), "3".to_string()]);
        assert!(tree.children("2").is_empty());
        assert_eq!(tree.group("2").map(|g| g.kind), Some(GroupKind::And));
    }

    #[test]
    fn test_parent_cycle_still_evaluated() {
        let tree = RequirementTree::build(vec![
            group("1", Some("2"), GroupKind::And, None, &["FIT1045"]),
            group("2", Some("1"), GroupKind::And, None, &["FIT1008"]),
        ]);
        assert_eq!(tree.roots(), &["1".to_string()]);
        assert_eq!(tree.children("1"), &["2".to_string()]);

        let programs = ProgramCatalog::new(vec![record(
            "C3001",
            vec![
                group("1", Some("2"), GroupKind::And, None, &["FIT1045"]),
                group("2", Some("1"), GroupKind::And, None, &["FIT1008"]),
            ],
        )]);
        let progress = evaluate_program("C3001", &programs, &satisfied(&["FIT1045"])).unwrap();
        assert!(!progress.satisfied);
        assert_eq!(progress.groups.len(), 1);
        assert_eq!(progress.groups[0].children.len(), 1);
        assert!(!progress.groups[0].children[0].satisfied);
        assert_eq!(program_unit_codes("C3001", &programs), vec!["FIT1045", "FIT1008"]);

        let progress =
            evaluate_program("C3001", &programs, &satisfied(&["FIT1045", "FIT1008"])).unwrap();
        assert!(progress.satisfied);
    }

    #[test]
    fn test_numeric_ids_deserialise() {
        let g: RequirementGroup = serde_json::from_str(
            r#"{"id": 7, "parentId": 3, "kind": "OR", "numRequired": 2, "unitOrSubAreaCodes": []}"#,
        )
        .unwrap();
        assert_eq!(g.id, "7");
        assert_eq!(g.parent_id.as_deref(), Some("3"));
        assert_eq!(g.num_required, Some(2));
    }

    #[test]
    fn test_evaluate_nested_major() {
        let programs = sample_programs();

        let progress =
            evaluate_program("C2001", &programs, &satisfied(&["FIT1045", "FIT1008"])).unwrap();
        assert!(!progress.satisfied);
        let root = &progress.groups[0];
        assert_eq!(root.completed, 1);
        assert_eq!(root.required, 2);

        let progress = evaluate_program(
            "C2001",
            &programs,
            &satisfied(&["FIT1045", "FIT1008", "FIT2004", "FIT2099"]),
        )
        .unwrap();
        assert!(progress.satisfied);
        let majors = &progress.groups[0].children[1];
        assert_eq!(majors.members[0], MemberStatus { code: "MAJ01".to_string(), satisfied: true });
        assert!(!majors.members[1].satisfied);
    }

    #[test]
    fn test_unknown_program_is_none() {
        assert!(evaluate_program("C9999", &sample_programs(), &satisfied(&[])).is_none());
    }

    #[test]
    fn test_cyclic_area_reference_terminates() {
        let programs = ProgramCatalog::new(vec![
            record("A1", vec![group("1", None, GroupKind::Or, Some(1), &["A2"])]),
            record("A2", vec![group("1", None, GroupKind::Or, Some(1), &["A1"])]),
        ]);
        let progress = evaluate_program("A1", &programs, &satisfied(&[])).unwrap();
        assert!(!progress.satisfied);
        assert_eq!(program_unit_codes("A1", &programs), Vec::<String>::new());
    }

    #[test]
    fn test_program_unit_codes_expands_areas() {
        let codes = program_unit_codes("C2001", &sample_programs());
        assert_eq!(
            codes,
            vec!["FIT1045", "FIT1008", "FIT2004", "FIT2014", "FIT2099", "ENG1005"]
        );
    }
}
