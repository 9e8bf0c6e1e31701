//! Disease-stage protocol models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coverage assumed for stages that declare no core components.
pub const DEFAULT_CORE_COVERAGE: f64 = 0.5;

/// Disease stage identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum StageId {
    Acute,
    Chronic,
    Calcified,
    Severe,
}

impl StageId {
    pub const ALL: [StageId; 4] = [
        StageId::Acute,
        StageId::Chronic,
        StageId::Calcified,
        StageId::Severe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StageId::Acute => "acute",
            StageId::Chronic => "chronic",
            StageId::Calcified => "calcified",
            StageId::Severe => "severe",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown stage '{s}'"))
    }
}

/// A follow-up checkpoint in a stage's monitoring schedule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitoringCheckpoint {
    /// When the checkpoint happens (e.g., "week 6", "month 3")
    pub timepoint: String,
    pub assessments: Vec<String>,
}

/// Per-stage protocol record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub name: String,
    pub timeframe: String,
    /// Duration range, e.g. "3-6"
    pub duration: String,
    /// Unit of `duration` ("weeks", "months", "years")
    pub duration_unit: String,
    pub description: String,
    #[serde(default)]
    pub characteristics: Vec<String>,
    /// Components expected for the full success rate, in protocol order
    pub core_components: Vec<String>,
    #[serde(default)]
    pub optional_components: Vec<String>,
    /// Components that must not be used in this stage
    #[serde(default)]
    pub contraindicated: Vec<String>,
    /// Expected success percentage under full core coverage
    pub success_base: f64,
    #[serde(default)]
    pub special_considerations: Vec<String>,
    #[serde(default)]
    pub monitoring: Vec<MonitoringCheckpoint>,
}

impl Stage {
    /// Every component id the stage refers to.
    pub fn referenced_components(&self) -> impl Iterator<Item = &String> {
        self.core_components
            .iter()
            .chain(&self.optional_components)
            .chain(&self.contraindicated)
    }

    /// Fraction of the core list present in a selection, `None` when the
    /// stage declares no core components.
    pub fn coverage_ratio<S: AsRef<str>>(&self, selected: &[S]) -> Option<f64> {
        if self.core_components.is_empty() {
            return None;
        }
        let covered = self
            .core_components
            .iter()
            .filter(|core| selected.iter().any(|s| s.as_ref() == core.as_str()))
            .count();
        Some(covered as f64 / self.core_components.len() as f64)
    }

    /// Coverage ratio, or [`DEFAULT_CORE_COVERAGE`] without a core list.
    pub fn coverage_or_default<S: AsRef<str>>(&self, selected: &[S]) -> f64 {
        self.coverage_ratio(selected).unwrap_or(DEFAULT_CORE_COVERAGE)
    }

    pub fn is_contraindicated(&self, id: &str) -> bool {
        self.contraindicated.iter().any(|c| c == id)
    }

    /// Upper bound of the declared duration in months.
    pub fn duration_months(&self) -> Option<f64> {
        duration_upper_months(&self.duration, &self.duration_unit)
    }
}

/// Upper bound of a duration range such as `"6-24"` converted to months.
pub fn duration_upper_months(duration: &str, unit: &str) -> Option<f64> {
    let upper = duration
        .split('-')
        .filter_map(|part| part.trim().parse::<f64>().ok())
        .last()?;

    let unit = unit.trim().to_lowercase();
    let months = if unit.starts_with("week") {
        upper / 4.345
    } else if unit.starts_with("year") {
        upper * 12.0
    } else if unit.starts_with("day") {
        upper / 30.44
    } else {
        upper
    };
    Some(months)
}
