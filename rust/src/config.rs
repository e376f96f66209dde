//! Configuration types for pathway resolution and semester scheduling.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codes::subject_prefix;

/// Errors raised when a configuration cannot drive a schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Which teaching periods the scheduler cycles through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCycle {
    /// S1 -> S2 -> S1 of the next year.
    #[default]
    Standard,
    /// Summer -> S1 -> Winter -> S2 -> Summer of the next year.
    WithIntensive,
}

/// Configuration for pathway scheduling and full-planner scheduling.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Maximum units placed in a single teaching period.
    pub units_per_semester: usize,
    /// Hard cap on scheduling rounds; units still unplaced are dropped.
    pub max_rounds: usize,
    /// Period cycle used for full-planner scheduling.
    pub term_cycle: TermCycle,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    pub verbosity: u8,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            units_per_semester: 4,
            max_rounds: 24,
            term_cycle: TermCycle::Standard,
            verbosity: 0,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.units_per_semester == 0 {
            return Err(ConfigError::InvalidConfig(
                "units_per_semester must be at least 1".to_string(),
            ));
        }
        if self.max_rounds == 0 {
            return Err(ConfigError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy of this config with a different per-semester cap.
    pub fn with_units_per_semester(&self, units_per_semester: usize) -> Self {
        Self {
            units_per_semester,
            ..self.clone()
        }
    }
}

/// Preference table of subject prefixes, keyed by a parent unit's prefix.
///
/// `FIT -> [FIT, MAT, MTH]` means that, when resolving prerequisites of a FIT
/// unit, FIT options rank first, then MAT, then MTH. Prefixes missing from the
/// list are unranked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "FxHashMap<String, Vec<String>>",
    into = "FxHashMap<String, Vec<String>>"
)]
pub struct RelatedPrefixes {
    table: FxHashMap<String, Vec<String>>,
}

impl RelatedPrefixes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the ranked prefixes for `parent`.
    pub fn with(mut self, parent: &str, ranked: &[&str]) -> Self {
        self.insert(parent, ranked.iter().map(|s| s.to_string()));
        self
    }

    pub fn insert<I>(&mut self, parent: &str, ranked: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.table.insert(
            parent.trim().to_ascii_uppercase(),
            ranked
                .into_iter()
                .map(|p| p.trim().to_ascii_uppercase())
                .collect(),
        );
    }

    /// Position of `option_code`'s prefix in the list for `parent_code`'s prefix.
    pub fn rank(&self, parent_code: &str, option_code: &str) -> Option<usize> {
        let ranked = self.table.get(&subject_prefix(parent_code))?;
        let option_prefix = subject_prefix(option_code);
        ranked.iter().position(|p| *p == option_prefix)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl From<FxHashMap<String, Vec<String>>> for RelatedPrefixes {
    fn from(raw: FxHashMap<String, Vec<String>>) -> Self {
        let mut prefixes = Self::new();
        for (parent, ranked) in raw {
            prefixes.insert(&parent, ranked);
        }
        prefixes
    }
}

impl From<RelatedPrefixes> for FxHashMap<String, Vec<String>> {
    fn from(prefixes: RelatedPrefixes) -> Self {
        prefixes.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.units_per_semester, 4);
        assert_eq!(config.max_rounds, 24);
        assert_eq!(config.term_cycle, TermCycle::Standard);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_cap_rejected() {
        let config = PlannerConfig::default().with_units_per_semester(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig(_))
        ));

        let config = PlannerConfig {
            max_rounds: 0,
            ..PlannerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_related_prefix_rank() {
        let prefixes = RelatedPrefixes::new().with("FIT", &["FIT", "MAT", "MTH"]);
        assert_eq!(prefixes.rank("FIT2004", "FIT1008"), Some(0));
        assert_eq!(prefixes.rank("FIT2004", "MTH1030"), Some(2));
        assert_eq!(prefixes.rank("FIT2004", "ENG1005"), None);
        assert_eq!(prefixes.rank("ENG1005", "FIT1008"), None);
    }

    #[test]
    fn test_related_prefixes_from_json_normalises_case() {
        let prefixes: RelatedPrefixes =
            serde_json::from_str(r#"{"fit": ["fit", "mat"]}"#).unwrap();
        assert_eq!(prefixes.len(), 1);
        assert_eq!(prefixes.rank("FIT2004", "MAT1830"), Some(1));
    }

    #[test]
    fn test_planner_config_partial_json() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{"units_per_semester": 3, "term_cycle": "with_intensive"}"#)
                .unwrap();
        assert_eq!(config.units_per_semester, 3);
        assert_eq!(config.max_rounds, 24);
        assert_eq!(config.term_cycle, TermCycle::WithIntensive);
    }
}
