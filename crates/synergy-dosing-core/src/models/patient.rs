//! Patient profile models.

use serde::{Deserialize, Serialize};

use super::stage::StageId;

/// Hepatic function class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum LiverFunction {
    #[default]
    Normal,
    /// Child-Pugh class B
    ChildB,
}

/// A transient patient profile; one per calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    /// Body weight in kg
    pub weight: f64,
    /// Height in cm
    #[serde(default)]
    pub height: Option<f64>,
    /// Age in years
    pub age: f64,
    pub bmi: f64,
    #[serde(default)]
    pub smoking: bool,
    /// Creatinine clearance in mL/min
    pub creatinine_clearance: f64,
    #[serde(default)]
    pub liver_function: LiverFunction,
    pub stage: StageId,
    #[serde(default)]
    pub has_plaque: bool,
    #[serde(default)]
    pub has_calcification: bool,
    /// Curvature in degrees
    #[serde(default)]
    pub curvature: Option<f64>,
}

impl PatientProfile {
    /// Create a profile with normal renal/hepatic function and no findings.
    pub fn new(weight: f64, age: f64, stage: StageId) -> Self {
        Self {
            weight,
            height: None,
            age,
            bmi: 22.0,
            smoking: false,
            creatinine_clearance: 90.0,
            liver_function: LiverFunction::Normal,
            stage,
            has_plaque: false,
            has_calcification: false,
            curvature: None,
        }
    }

    /// Set height and derive BMI from weight and height.
    pub fn with_height(mut self, height_cm: f64) -> Self {
        self.height = Some(height_cm);
        if let Some(bmi) = bmi_from(self.weight, height_cm) {
            self.bmi = bmi;
        }
        self
    }

    /// Plaque or calcification present.
    pub fn has_lesion(&self) -> bool {
        self.has_plaque || self.has_calcification
    }

    pub fn is_elderly(&self) -> bool {
        self.age >= 65.0
    }

    pub fn is_obese(&self) -> bool {
        self.bmi >= 30.0
    }
}

/// Body-mass index from weight (kg) and height (cm).
pub fn bmi_from(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if height_cm <= 0.0 {
        return None;
    }
    let meters = height_cm / 100.0;
    Some(weight_kg / (meters * meters))
}
