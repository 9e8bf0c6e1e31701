//! Therapeutic component reference models.

use serde::{Deserialize, Serialize};

use super::patient::{LiverFunction, PatientProfile};

/// Dosing frequency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Once daily
    QD,
    /// Twice daily
    BID,
    /// Three times daily
    TID,
    /// Four times daily
    QID,
}

impl Frequency {
    /// Number of administrations per day.
    pub fn times_per_day(self) -> u32 {
        match self {
            Frequency::QD => 1,
            Frequency::BID => 2,
            Frequency::TID => 3,
            Frequency::QID => 4,
        }
    }
}

/// Route of administration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Oral,
    Topical,
}

/// Time-of-day slot a dose can be taken in.
///
/// Variants are declared in day order, so the derived `Ord` sorts a schedule
/// from morning to bedtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Breakfast,
    Lunch,
    Afternoon,
    Dinner,
    Evening,
    Bedtime,
}

impl TimeSlot {
    /// The meal slot that co-occurs with a generic slot, if any.
    pub fn paired_meal(self) -> Option<TimeSlot> {
        match self {
            TimeSlot::Morning => Some(TimeSlot::Breakfast),
            TimeSlot::Evening => Some(TimeSlot::Dinner),
            _ => None,
        }
    }
}

/// Pharmacokinetic parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pharmacokinetics {
    /// Absorption rate constant (1/h); absent for most topical preparations
    #[serde(default)]
    pub ka: Option<f64>,
    /// Time to peak concentration (h)
    pub tmax: f64,
    /// Bioavailability (percent, 0-100)
    pub f: f64,
    /// Volume of distribution (L/kg)
    pub vd: f64,
    /// Elimination half-life (h)
    pub half_life: f64,
    /// Tissue partition coefficient
    pub kp: f64,
}

/// Maximal achievable effects at full exposure, each a percentage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Pharmacodynamics {
    pub tgf_reduction: f64,
    pub collagen_reduction: f64,
    pub curvature_reduction: f64,
    pub plaque_reduction: f64,
    pub pain_relief: f64,
    pub success_rate: f64,
}

/// Patient factor that can trigger a dose adjustment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum AdjustmentFactor {
    /// Age of 65 or more
    Age65,
    /// BMI of 30 or more
    Bmi30,
    /// Active smoker
    Smoking,
    /// Creatinine clearance of 50 mL/min or less
    CrCl30,
    /// Child-Pugh class B liver function
    ChildB,
}

impl AdjustmentFactor {
    pub const ALL: [AdjustmentFactor; 5] = [
        AdjustmentFactor::Age65,
        AdjustmentFactor::Bmi30,
        AdjustmentFactor::Smoking,
        AdjustmentFactor::CrCl30,
        AdjustmentFactor::ChildB,
    ];

    /// Whether the predicate for this factor holds for a patient.
    pub fn applies_to(self, profile: &PatientProfile) -> bool {
        match self {
            AdjustmentFactor::Age65 => profile.age >= 65.0,
            AdjustmentFactor::Bmi30 => profile.bmi >= 30.0,
            AdjustmentFactor::Smoking => profile.smoking,
            AdjustmentFactor::CrCl30 => profile.creatinine_clearance <= 50.0,
            AdjustmentFactor::ChildB => profile.liver_function == LiverFunction::ChildB,
        }
    }
}

/// Declared multiplicative dose adjustments. Missing entries mean no adjustment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DoseAdjustments {
    #[serde(default, rename = "age65", skip_serializing_if = "Option::is_none")]
    pub age65: Option<f64>,
    #[serde(default, rename = "bmi30", skip_serializing_if = "Option::is_none")]
    pub bmi30: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoking: Option<f64>,
    #[serde(default, rename = "crCl30", skip_serializing_if = "Option::is_none")]
    pub cr_cl30: Option<f64>,
    #[serde(default, rename = "childB", skip_serializing_if = "Option::is_none")]
    pub child_b: Option<f64>,
}

impl DoseAdjustments {
    /// The declared multiplier for a factor.
    pub fn factor(&self, factor: AdjustmentFactor) -> Option<f64> {
        match factor {
            AdjustmentFactor::Age65 => self.age65,
            AdjustmentFactor::Bmi30 => self.bmi30,
            AdjustmentFactor::Smoking => self.smoking,
            AdjustmentFactor::CrCl30 => self.cr_cl30,
            AdjustmentFactor::ChildB => self.child_b,
        }
    }

    /// All declared (factor, multiplier) pairs.
    pub fn declared(&self) -> impl Iterator<Item = (AdjustmentFactor, f64)> + '_ {
        AdjustmentFactor::ALL
            .into_iter()
            .filter_map(|f| self.factor(f).map(|m| (f, m)))
    }
}

/// Safe single-dose range in the component's unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SafeRange {
    pub min: f64,
    pub max: f64,
}

impl SafeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, dose: f64) -> bool {
        dose >= self.min && dose <= self.max
    }
}

/// Patient condition a caution rule is triggered by.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum CautionTrigger {
    /// Age in years at or above the threshold
    AgeAtLeast(f64),
    /// Creatinine clearance (mL/min) strictly below the threshold
    CreatinineClearanceBelow(f64),
    /// Liver function matches the given class
    LiverFunction(LiverFunction),
}

impl CautionTrigger {
    pub fn matches(&self, profile: &PatientProfile) -> bool {
        match self {
            CautionTrigger::AgeAtLeast(age) => profile.age >= *age,
            CautionTrigger::CreatinineClearanceBelow(crcl) => profile.creatinine_clearance < *crcl,
            CautionTrigger::LiverFunction(lf) => profile.liver_function == *lf,
        }
    }
}

/// Severity of a component/patient caution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CautionSeverity {
    Caution,
    Contraindicated,
}

/// Data-driven contraindication rule attached to a component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CautionRule {
    pub when: CautionTrigger,
    pub severity: CautionSeverity,
    pub message: String,
}

/// A therapeutic component of the protocol.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Unique identifier; filled from the record key when loaded from a map
    #[serde(default)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Nominal dose per kg body weight
    pub dose_per_kg: f64,
    /// Dose unit (e.g., "mg", "IU")
    #[serde(default = "default_unit")]
    pub unit: String,
    pub frequency: Frequency,
    pub route: Route,
    /// Acceptable time-of-day slots, in order of preference
    pub timing: Vec<TimeSlot>,
    /// Whether absorption benefits from a meal
    #[serde(default)]
    pub fat_soluble: bool,
    pub pharmacokinetics: Pharmacokinetics,
    pub pharmacodynamics: Pharmacodynamics,
    #[serde(default)]
    pub adjustments: DoseAdjustments,
    #[serde(default)]
    pub safe_range: Option<SafeRange>,
    #[serde(default)]
    pub cautions: Vec<CautionRule>,
}

fn default_unit() -> String {
    "mg".into()
}

impl Component {
    /// Whether a time slot is in the component's timing set.
    pub fn allows_slot(&self, slot: TimeSlot) -> bool {
        self.timing.contains(&slot)
    }

    /// Nominal weight-based dose for a body weight.
    pub fn nominal_dose(&self, weight_kg: f64) -> f64 {
        self.dose_per_kg * weight_kg
    }
}
