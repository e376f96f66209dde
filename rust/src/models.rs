//! Core data types for the unit catalog and planning results.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unit codes the caller considers done or in progress.
///
/// Supplied fresh on every query; the core never caches it.
pub type SatisfiedSet = FxHashSet<String>;

/// Credit points assumed for a unit when the catalog omits them.
pub const DEFAULT_CREDIT_POINTS: u32 = 6;

fn default_credit_points() -> u32 {
    DEFAULT_CREDIT_POINTS
}

fn default_minimum_required() -> u32 {
    1
}

/// A teaching period within an academic year.
///
/// Variant order is the display order used for offered-period sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    S1,
    S2,
    Summer,
    Winter,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown teaching period: {0}")]
pub struct ParsePeriodError(pub String);

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::S1 => "S1",
            Period::S2 => "S2",
            Period::Summer => "Summer",
            Period::Winter => "Winter",
        }
    }

    /// Map a catalog offering label ("S1-01", "Second semester", "Summer semester A",
    /// "Full year", ...) to the periods it runs in.
    ///
    /// Unknown labels map to no period at all.
    pub fn from_offering_label(label: &str) -> Vec<Period> {
        let norm = label.trim().to_ascii_lowercase();

        if norm.starts_with("fy") || norm.contains("full year") {
            return vec![Period::S1, Period::S2];
        }
        if norm.starts_with("ss") || norm.contains("summer") {
            return vec![Period::Summer];
        }
        if norm.starts_with("ws") || norm.contains("winter") {
            return vec![Period::Winter];
        }
        if norm.starts_with("s1")
            || norm.contains("first semester")
            || norm.contains("semester 1")
        {
            return vec![Period::S1];
        }
        if norm.starts_with("s2")
            || norm.contains("second semester")
            || norm.contains("semester 2")
        {
            return vec![Period::S2];
        }
        Vec::new()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s1" => Ok(Period::S1),
            "s2" => Ok(Period::S2),
            "summer" => Ok(Period::Summer),
            "winter" => Ok(Period::Winter),
            _ => Err(ParsePeriodError(s.to_string())),
        }
    }
}

/// A concrete teaching period: year plus period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Semester {
    pub year: i32,
    pub period: Period,
}

impl Semester {
    pub fn new(year: i32, period: Period) -> Self {
        Self { year, period }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.period)
    }
}

/// Where, how and when a unit runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub period: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "type")]
    pub kind: String,
}

/// An N-of-M requirement over unit codes.
///
/// Satisfied when at least `minimum_required` distinct codes from `options`
/// are present in the satisfied set. `options` keeps source order, which is
/// the tie-break order for pathway selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisiteGroup {
    #[serde(default = "default_minimum_required", alias = "NumReq")]
    pub minimum_required: u32,
    #[serde(default, alias = "units")]
    pub options: Vec<String>,
}

impl RequisiteGroup {
    pub fn new(minimum_required: u32, options: &[&str]) -> Self {
        Self {
            minimum_required,
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// One of the listed units.
    pub fn any_of(options: &[&str]) -> Self {
        Self::new(1, options)
    }

    /// Every listed unit.
    pub fn all_of(options: &[&str]) -> Self {
        Self::new(options.len() as u32, options)
    }

    /// Options with duplicates removed, first occurrence kept.
    pub fn distinct_options(&self) -> Vec<&str> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        self.options
            .iter()
            .map(|s| s.as_str())
            .filter(|code| seen.insert(*code))
            .collect()
    }

    /// Number of distinct options present in `satisfied`.
    pub fn satisfied_count(&self, satisfied: &SatisfiedSet) -> usize {
        self.distinct_options()
            .into_iter()
            .filter(|code| satisfied.contains(*code))
            .count()
    }
}

/// Prerequisite, corequisite and prohibition rules for a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisiteSet {
    #[serde(default)]
    pub permission_required: bool,
    #[serde(default)]
    pub prohibitions: BTreeSet<String>,
    #[serde(default)]
    pub corequisite_groups: Vec<RequisiteGroup>,
    #[serde(default)]
    pub prerequisite_groups: Vec<RequisiteGroup>,
    /// Credit-point gate. Advisory only, never resolved into units.
    #[serde(default)]
    pub credit_points_required: u32,
}

/// A single enrollable unit as read from the catalog snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_credit_points")]
    pub credit_points: u32,
    #[serde(default)]
    pub cost_band: Option<String>,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub offerings: Vec<Offering>,
    #[serde(default)]
    pub assessments: Vec<Assessment>,
    #[serde(default)]
    pub requisites: Option<RequisiteSet>,
}

impl UnitRecord {
    pub fn new(code: &str, title: &str) -> Self {
        Self {
            code: code.to_string(),
            title: title.to_string(),
            credit_points: DEFAULT_CREDIT_POINTS,
            cost_band: None,
            school: String::new(),
            offerings: Vec::new(),
            assessments: Vec::new(),
            requisites: None,
        }
    }

    /// Builder: replace the prerequisite groups, keeping other requisites.
    pub fn with_prerequisites(mut self, groups: Vec<RequisiteGroup>) -> Self {
        self.requisites
            .get_or_insert_with(RequisiteSet::default)
            .prerequisite_groups = groups;
        self
    }

    /// Builder: replace the corequisite groups, keeping other requisites.
    pub fn with_corequisites(mut self, groups: Vec<RequisiteGroup>) -> Self {
        self.requisites
            .get_or_insert_with(RequisiteSet::default)
            .corequisite_groups = groups;
        self
    }

    /// Builder: add an offering in the given period label.
    pub fn offered_in(mut self, period_label: &str) -> Self {
        self.offerings.push(Offering {
            location: String::new(),
            mode: String::new(),
            period: period_label.to_string(),
        });
        self
    }

    pub fn prerequisite_groups(&self) -> &[RequisiteGroup] {
        self.requisites
            .as_ref()
            .map(|r| r.prerequisite_groups.as_slice())
            .unwrap_or(&[])
    }

    pub fn corequisite_groups(&self) -> &[RequisiteGroup] {
        self.requisites
            .as_ref()
            .map(|r| r.corequisite_groups.as_slice())
            .unwrap_or(&[])
    }

    /// Distinct periods this unit is offered in. Empty means unknown.
    pub fn offered_periods(&self) -> BTreeSet<Period> {
        self.offerings
            .iter()
            .flat_map(|o| Period::from_offering_label(&o.period))
            .collect()
    }
}

/// "What does this unit unlock / require" view of a single catalog unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyGraphNode {
    pub code: String,
    pub display_name: String,
    pub school: String,
    /// Units whose prerequisite or corequisite groups mention this code.
    pub unlocks: BTreeSet<String>,
    /// Flattened prerequisite and corequisite options of this unit.
    pub requires: BTreeSet<String>,
    /// Prerequisite-only subset of `requires`.
    pub prerequisites: BTreeSet<String>,
}

/// One step of a resolved pathway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathwayNode {
    pub code: String,
    /// 0 for units with no chosen prerequisite on the pathway.
    pub depth_from_leaves: u32,
    /// Sibling options of the same group that were not chosen.
    pub alternatives: Vec<String>,
    /// Chosen prerequisites that appear earlier on the pathway.
    pub prerequisites: Vec<String>,
}

/// Units assigned to one teaching period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSemester {
    pub year: i32,
    pub period: Period,
    pub assigned_units: Vec<String>,
}

impl ScheduledSemester {
    pub fn semester(&self) -> Semester {
        Semester::new(self.year, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offering_labels() {
        assert_eq!(Period::from_offering_label("S1-01"), vec![Period::S1]);
        assert_eq!(
            Period::from_offering_label("Second semester"),
            vec![Period::S2]
        );
        assert_eq!(
            Period::from_offering_label("Summer semester A"),
            vec![Period::Summer]
        );
        assert_eq!(Period::from_offering_label("SSB-01"), vec![Period::Summer]);
        assert_eq!(
            Period::from_offering_label("Winter semester"),
            vec![Period::Winter]
        );
        assert_eq!(
            Period::from_offering_label("Full year"),
            vec![Period::S1, Period::S2]
        );
        assert!(Period::from_offering_label("Term 3").is_empty());
    }

    #[test]
    fn test_period_parse() {
        assert_eq!("s2".parse::<Period>(), Ok(Period::S2));
        assert_eq!(" Summer ".parse::<Period>(), Ok(Period::Summer));
        assert!("T1".parse::<Period>().is_err());
    }

    #[test]
    fn test_offered_periods_distinct_and_ordered() {
        let unit = UnitRecord::new("FIT1045", "Introduction to programming")
            .offered_in("S2-01")
            .offered_in("S1-01")
            .offered_in("S1-02")
            .offered_in("Teaching period 5");
        let periods: Vec<Period> = unit.offered_periods().into_iter().collect();
        assert_eq!(periods, vec![Period::S1, Period::S2]);
    }

    #[test]
    fn test_distinct_options_keeps_first() {
        let group = RequisiteGroup::any_of(&["FIT1008", "FIT1054", "FIT1008"]);
        assert_eq!(group.distinct_options(), vec!["FIT1008", "FIT1054"]);
    }

    #[test]
    fn test_unit_record_json_defaults_and_aliases() {
        let json = r#"{
            "title": "Algorithms and data structures",
            "requisites": {
                "prerequisiteGroups": [
                    {"NumReq": 1, "units": ["FIT1008", "FIT2085"]}
                ],
                "prohibitions": ["FIT2009"]
            }
        }"#;
        let unit: UnitRecord = serde_json::from_str(json).unwrap();
        assert_eq!(unit.credit_points, DEFAULT_CREDIT_POINTS);
        assert!(unit.code.is_empty());
        let req = unit.requisites.unwrap();
        assert_eq!(req.prerequisite_groups[0].minimum_required, 1);
        assert_eq!(req.prerequisite_groups[0].options.len(), 2);
        assert!(req.prohibitions.contains("FIT2009"));
        assert!(!req.permission_required);
    }
}
