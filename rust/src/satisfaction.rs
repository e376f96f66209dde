//! Requisite satisfaction checks.
//!
//! A unit's prerequisite groups are combined by AND; each group is an N-of-M
//! choice. Corequisites, prohibitions and the credit-point gate are reported
//! alongside but never gate `satisfied`.

use serde::Serialize;

use crate::models::{RequisiteGroup, RequisiteSet, SatisfiedSet};

/// A requisite group that the satisfied set does not yet meet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmetGroup {
    /// How many more distinct options are needed.
    pub still_needed: u32,
    /// Options not yet satisfied, in source order.
    pub remaining_options: Vec<String>,
}

/// How close a unit is to being takeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    FullyAvailable,
    PartiallyAvailable,
    Unavailable,
}

/// Result of checking a requisite set against a satisfied set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SatisfactionReport {
    /// True when every prerequisite group is met.
    pub satisfied: bool,
    pub unmet_groups: Vec<UnmetGroup>,
    pub unmet_corequisites: Vec<UnmetGroup>,
    /// Prohibited codes already present in the satisfied set.
    pub prohibited_taken: Vec<String>,
    pub permission_required: bool,
    pub credit_points_required: u32,
    /// Prerequisite groups with at least one option satisfied.
    pub groups_started: usize,
}

impl SatisfactionReport {
    fn trivially_satisfied() -> Self {
        Self {
            satisfied: true,
            ..Self::default()
        }
    }

    pub fn availability(&self) -> Availability {
        if !self.prohibited_taken.is_empty() {
            Availability::Unavailable
        } else if self.satisfied {
            Availability::FullyAvailable
        } else if self.groups_started > 0 {
            Availability::PartiallyAvailable
        } else {
            Availability::Unavailable
        }
    }
}

/// Check one group, returning the unmet record if it falls short.
///
/// A group demanding more options than it lists is reported as unmet forever.
pub fn check_group(group: &RequisiteGroup, satisfied: &SatisfiedSet) -> Option<UnmetGroup> {
    let options = group.distinct_options();
    let count = options.iter().filter(|code| satisfied.contains(**code)).count() as u32;

    if count >= group.minimum_required {
        return None;
    }

    Some(UnmetGroup {
        still_needed: group.minimum_required - count,
        remaining_options: options
            .into_iter()
            .filter(|code| !satisfied.contains(*code))
            .map(str::to_string)
            .collect(),
    })
}

fn unmet_groups(groups: &[RequisiteGroup], satisfied: &SatisfiedSet) -> Vec<UnmetGroup> {
    groups
        .iter()
        .filter_map(|group| check_group(group, satisfied))
        .collect()
}

/// Check a unit's requisites against the codes already acquired.
///
/// Pure function of its inputs. An absent requisite set, or one with no
/// prerequisite groups, is trivially satisfied.
pub fn check_satisfaction(
    requisites: Option<&RequisiteSet>,
    satisfied: &SatisfiedSet,
) -> SatisfactionReport {
    let Some(req) = requisites else {
        return SatisfactionReport::trivially_satisfied();
    };

    let unmet = unmet_groups(&req.prerequisite_groups, satisfied);
    let groups_started = req
        .prerequisite_groups
        .iter()
        .filter(|group| group.satisfied_count(satisfied) > 0)
        .count();

    SatisfactionReport {
        satisfied: unmet.is_empty(),
        unmet_groups: unmet,
        unmet_corequisites: unmet_groups(&req.corequisite_groups, satisfied),
        prohibited_taken: req
            .prohibitions
            .iter()
            .filter(|code| satisfied.contains(*code))
            .cloned()
            .collect(),
        permission_required: req.permission_required,
        credit_points_required: req.credit_points_required,
        groups_started,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn satisfied(codes: &[&str]) -> SatisfiedSet {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn prereqs(groups: Vec<RequisiteGroup>) -> RequisiteSet {
        RequisiteSet {
            prerequisite_groups: groups,
            ..RequisiteSet::default()
        }
    }

    #[test]
    fn test_absent_requisites_satisfied() {
        let report = check_satisfaction(None, &satisfied(&[]));
        assert!(report.satisfied);
        assert!(report.unmet_groups.is_empty());
        assert_eq!(report.availability(), Availability::FullyAvailable);

        let empty = RequisiteSet::default();
        assert!(check_satisfaction(Some(&empty), &satisfied(&[])).satisfied);
    }

    #[test]
    fn test_single_or_group_met_by_one_option() {
        let req = prereqs(vec![RequisiteGroup::any_of(&["FIT1045", "FIT1008"])]);
        let report = check_satisfaction(Some(&req), &satisfied(&["FIT1045"]));
        assert!(report.satisfied);
        assert!(report.unmet_groups.is_empty());
    }

    #[test]
    fn test_unmet_group_reports_remaining() {
        let req = prereqs(vec![
            RequisiteGroup::any_of(&["FIT1008", "FIT1054", "FIT2085"]),
            RequisiteGroup::new(2, &["MAT1830", "MTH1030", "ENG1005"]),
        ]);
        let report = check_satisfaction(Some(&req), &satisfied(&["FIT1054", "MTH1030"]));

        assert!(!report.satisfied);
        assert_eq!(
            report.unmet_groups,
            vec![UnmetGroup {
                still_needed: 1,
                remaining_options: vec!["MAT1830".to_string(), "ENG1005".to_string()],
            }]
        );
        assert_eq!(report.groups_started, 2);
        assert_eq!(report.availability(), Availability::PartiallyAvailable);
    }

    #[test]
    fn test_and_group_needs_all() {
        let req = prereqs(vec![RequisiteGroup::all_of(&["MAT1830", "FIT1045"])]);
        let report = check_satisfaction(Some(&req), &satisfied(&["MAT1830"]));
        assert!(!report.satisfied);
        assert_eq!(report.unmet_groups[0].still_needed, 1);
        assert_eq!(report.unmet_groups[0].remaining_options, vec!["FIT1045"]);
    }

    #[test]
    fn test_duplicate_options_count_once() {
        let req = prereqs(vec![RequisiteGroup::new(2, &["FIT1045", "FIT1045", "FIT1053"])]);
        let report = check_satisfaction(Some(&req), &satisfied(&["FIT1045"]));
        assert!(!report.satisfied);
        assert_eq!(report.unmet_groups[0].still_needed, 1);
    }

    #[test]
    fn test_malformed_group_permanently_unmet() {
        let req = prereqs(vec![RequisiteGroup::new(3, &["FIT1045", "FIT1053"])]);
        let report = check_satisfaction(Some(&req), &satisfied(&["FIT1045", "FIT1053"]));
        assert!(!report.satisfied);
        assert_eq!(report.unmet_groups[0].still_needed, 1);
        assert!(report.unmet_groups[0].remaining_options.is_empty());
    }

    #[test]
    fn test_corequisites_reported_but_not_gating() {
        let req = RequisiteSet {
            corequisite_groups: vec![RequisiteGroup::any_of(&["FIT1047"])],
            credit_points_required: 24,
            permission_required: true,
            ..RequisiteSet::default()
        };
        let report = check_satisfaction(Some(&req), &satisfied(&[]));
        assert!(report.satisfied);
        assert_eq!(report.unmet_corequisites.len(), 1);
        assert_eq!(report.credit_points_required, 24);
        assert!(report.permission_required);
    }

    #[test]
    fn test_prohibition_makes_unit_unavailable() {
        let mut req = prereqs(vec![RequisiteGroup::any_of(&["FIT1045"])]);
        req.prohibitions.insert("FIT1053".to_string());
        let report = check_satisfaction(Some(&req), &satisfied(&["FIT1045", "FIT1053"]));
        assert!(report.satisfied);
        assert_eq!(report.prohibited_taken, vec!["FIT1053"]);
        assert_eq!(report.availability(), Availability::Unavailable);
    }

    #[test]
    fn test_nothing_started_is_unavailable() {
        let req = prereqs(vec![RequisiteGroup::any_of(&["FIT1008", "FIT1054"])]);
        let report = check_satisfaction(Some(&req), &satisfied(&["MAT1830"]));
        assert_eq!(report.availability(), Availability::Unavailable);
    }

    const POOL: [&str; 6] = ["A1000", "B1000", "C1000", "D1000", "E1000", "F1000"];

    fn arb_group() -> impl Strategy<Value = RequisiteGroup> {
        (1u32..4, proptest::sample::subsequence(POOL.to_vec(), 1..=POOL.len()))
            .prop_map(|(n, opts)| RequisiteGroup::new(n, &opts))
    }

    fn arb_codes() -> impl Strategy<Value = Vec<&'static str>> {
        proptest::sample::subsequence(POOL.to_vec(), 0..=POOL.len())
    }

    proptest! {
        #[test]
        fn prop_check_is_idempotent(groups in prop::collection::vec(arb_group(), 0..4), codes in arb_codes()) {
            let req = prereqs(groups);
            let set = satisfied(&codes);
            prop_assert_eq!(check_satisfaction(Some(&req), &set), check_satisfaction(Some(&req), &set));
        }

        #[test]
        fn prop_adding_units_never_unsatisfies(
            groups in prop::collection::vec(arb_group(), 0..4),
            base in arb_codes(),
            extra in arb_codes(),
        ) {
            let small = satisfied(&base);
            let mut large = small.clone();
            large.extend(extra.iter().map(|c| c.to_string()));

            for group in &groups {
                if check_group(group, &small).is_none() {
                    prop_assert!(check_group(group, &large).is_none());
                }
            }
            let req = prereqs(groups);
            if check_satisfaction(Some(&req), &small).satisfied {
                prop_assert!(check_satisfaction(Some(&req), &large).satisfied);
            }
        }
    }
}
