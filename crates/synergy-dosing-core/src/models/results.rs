//! Engine output models.
//!
//! Every value here is built fresh by an engine call; nothing is shared or
//! mutated between calculations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::component::{AdjustmentFactor, CautionSeverity, Frequency, Route, SafeRange, TimeSlot};
use super::interaction::{CiBucket, InteractionKind, PairKey, Significance};
use super::stage::{MonitoringCheckpoint, StageId};

/// Per-component dose computation. Values are unrounded; see [`DoseResult::display`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoseResult {
    pub component_id: String,
    pub base_dose: f64,
    pub adjustment_factor: f64,
    /// Factors whose predicate held and that the component declares
    pub applied_adjustments: Vec<AdjustmentFactor>,
    pub adjusted_dose: f64,
    pub effective_dose: f64,
    pub plasma_concentration: f64,
    pub tissue_dose: f64,
    pub frequency: Frequency,
    pub timing: Vec<TimeSlot>,
    pub unit: String,
    pub route: Route,
}

/// Display form of a [`DoseResult`]: whole units for amounts, two decimals for factors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayDose {
    pub component_id: String,
    pub base_dose: f64,
    pub adjustment_factor: f64,
    pub adjusted_dose: f64,
    pub effective_dose: f64,
    pub tissue_dose: f64,
    pub frequency: Frequency,
    pub timing: Vec<TimeSlot>,
    pub unit: String,
    pub route: Route,
}

impl DoseResult {
    pub fn display(&self) -> DisplayDose {
        DisplayDose {
            component_id: self.component_id.clone(),
            base_dose: self.base_dose.round(),
            adjustment_factor: round2(self.adjustment_factor),
            adjusted_dose: self.adjusted_dose.round(),
            effective_dose: self.effective_dose.round(),
            tissue_dose: round2(self.tissue_dose),
            frequency: self.frequency,
            timing: self.timing.clone(),
            unit: self.unit.clone(),
            route: self.route,
        }
    }

    /// Total amount per day.
    pub fn daily_dose(&self) -> f64 {
        self.adjusted_dose * self.frequency.times_per_day() as f64
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Where the bounds of a dose-range check came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RangeSource {
    /// The component record's `safeRange`
    Reference,
    /// Built-in table for legacy records
    Fallback,
    /// No range known
    None,
}

/// Outcome of comparing an adjusted dose against its safe range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoseRangeCheck {
    pub component_id: String,
    pub valid: bool,
    pub dose: f64,
    pub range: Option<SafeRange>,
    pub source: RangeSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Interpreted combination index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CiInterpretation {
    pub bucket: CiBucket,
    pub range: String,
    pub label: String,
}

/// A documented interaction found in a selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SynergyResult {
    pub pair: PairKey,
    pub kind: InteractionKind,
    pub factor: f64,
    pub mechanism: String,
    pub significance: Significance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci_interpretation: Option<CiInterpretation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regeneration_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regeneration_factor: Option<f64>,
}

/// Synergies keyed by canonical pair.
pub type SynergyMap = BTreeMap<PairKey, SynergyResult>;

/// Verdict of a Chou-Talalay combination index computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CiVerdict {
    Synergistic,
    Additive,
    Antagonistic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CombinationIndex {
    pub value: f64,
    pub verdict: CiVerdict,
}

/// Component/patient contraindication finding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContraindicationFinding {
    pub component_id: String,
    pub severity: CautionSeverity,
    pub message: String,
}

/// The five per-patient outcome metrics, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct EffectivenessMetrics {
    pub tgf_reduction: f64,
    pub collagen_reduction: f64,
    pub curvature_reduction: f64,
    pub plaque_reduction: f64,
    pub pain_relief: f64,
}

impl EffectivenessMetrics {
    /// Apply `f` to every metric.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            tgf_reduction: f(self.tgf_reduction),
            collagen_reduction: f(self.collagen_reduction),
            curvature_reduction: f(self.curvature_reduction),
            plaque_reduction: f(self.plaque_reduction),
            pain_relief: f(self.pain_relief),
        }
    }

    pub fn values(&self) -> [f64; 5] {
        [
            self.tgf_reduction,
            self.collagen_reduction,
            self.curvature_reduction,
            self.plaque_reduction,
            self.pain_relief,
        ]
    }

    /// Clamp every metric into `[0, 100]`.
    pub fn clamped(self) -> Self {
        self.map(|v| v.clamp(0.0, 100.0))
    }
}

/// Stage-specific adjustment applied to the effectiveness metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StageEffectiveness {
    pub multiplier: f64,
    pub metrics: EffectivenessMetrics,
}

/// Aggregated effectiveness of a selection for a patient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Effectiveness {
    #[serde(flatten)]
    pub metrics: EffectivenessMetrics,
    /// Population-level expected success, `[0, 95]`
    pub response_potential: f64,
    pub stage_multiplier: f64,
    /// Bounded synergy factor used to blend the metrics, `[0.5, 1.8]`
    pub blend_synergy_factor: f64,
    /// Reporting synergy factor, `<= 3.0`
    pub overall_synergy_factor: f64,
}

/// Stage protocol tailored to a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageRecommendation {
    pub stage: StageId,
    pub name: String,
    pub timeframe: String,
    pub duration: String,
    pub duration_unit: String,
    pub description: String,
    pub characteristics: Vec<String>,
    pub core_components: Vec<String>,
    pub optional_components: Vec<String>,
    pub contraindicated: Vec<String>,
    pub success_base: f64,
    pub special_considerations: Vec<String>,
    pub monitoring: Vec<MonitoringCheckpoint>,
}

/// Estimated protocol adherence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdherenceEstimate {
    /// Probability of adherence, never below 0.5
    pub score: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Milestone {
    pub month: f64,
    pub expected_improvement: f64,
}

/// Expected progress over the course of a stage protocol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressPrediction {
    pub coverage: f64,
    pub adjusted_success_rate: f64,
    pub milestones: Vec<Milestone>,
}

/// Components grouped by time slot, in day order.
pub type Schedule = BTreeMap<TimeSlot, Vec<String>>;
