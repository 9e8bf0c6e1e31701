//! Full calculation report and safety warnings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::results::{
    AdherenceEstimate, DoseRangeCheck, DoseResult, Effectiveness, ProgressPrediction, Schedule,
    StageRecommendation, SynergyMap,
};

/// Warning severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Info,
    Caution,
    Critical,
}

/// What triggered a warning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    Elderly,
    Obesity,
    RenalImpairment,
    HepaticImpairment,
    AcuteWithLesion,
    ComponentCaution,
    StageContraindication,
    DoseOutOfRange,
    NoEstablishedRange,
}

/// A safety warning. Warnings are data, never errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Warning {
    pub code: WarningCode,
    pub severity: WarningSeverity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

impl Warning {
    pub fn new(code: WarningCode, severity: WarningSeverity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            component_id: None,
        }
    }

    pub fn for_component(mut self, id: impl Into<String>) -> Self {
        self.component_id = Some(id.into());
        self
    }
}

/// Per-component entry of a calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDose {
    pub dose: DoseResult,
    pub daily_dose: f64,
    pub range_check: DoseRangeCheck,
}

/// Result of `Calculator::calculate_dosing`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalculationResult {
    pub component_doses: BTreeMap<String, ComponentDose>,
    pub synergy_effects: SynergyMap,
    pub effectiveness: Effectiveness,
    pub stage_recommendations: StageRecommendation,
    pub adherence: AdherenceEstimate,
    pub progress: ProgressPrediction,
    pub schedule: Schedule,
    pub warnings: Vec<Warning>,
}

impl CalculationResult {
    /// Highest warning severity present, if any.
    pub fn max_severity(&self) -> Option<WarningSeverity> {
        self.warnings.iter().map(|w| w.severity).max()
    }

    pub fn has_critical_warnings(&self) -> bool {
        self.max_severity() == Some(WarningSeverity::Critical)
    }
}
