//! Per-component dose computation.
//!
//! Steps:
//! 1. Weight-based dose: `dosePerKg × weight`
//! 2. Multiply in each declared adjustment whose patient predicate holds
//! 3. Bioavailable amount: `adjusted × f / 100`
//! 4. One-compartment tissue estimate: `effective / (vd × weight) × kp`

use crate::models::{
    Component, DoseRangeCheck, DoseResult, PatientProfile, RangeSource, SafeRange,
};
use crate::reference::ReferenceData;
use crate::DosingResult;

/// Last-resort single-dose ranges for legacy records without `safeRange`.
const FALLBACK_SAFE_RANGES: &[(&str, f64, f64)] = &[
    ("pentoxifylline", 200.0, 800.0),
    ("vitamin_e", 100.0, 1000.0),
    ("coq10", 50.0, 600.0),
    ("l_arginine", 500.0, 6000.0),
    ("tadalafil", 2.5, 20.0),
    ("colchicine", 0.3, 1.2),
    ("curcumin", 250.0, 2000.0),
];

/// Computes doses for components against a patient profile.
pub struct DosingEngine<'a> {
    data: &'a ReferenceData,
}

impl<'a> DosingEngine<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        Self { data }
    }

    /// Compute the dose of a component by id.
    pub fn compute_dose(&self, component_id: &str, profile: &PatientProfile) -> DosingResult<DoseResult> {
        let component = self.data.component(component_id)?;
        Ok(dose_for(component, profile))
    }

    /// Compare a dose against the component's safe range.
    pub fn check_dose_range(&self, component_id: &str, dose: f64) -> DosingResult<DoseRangeCheck> {
        let component = self.data.component(component_id)?;
        Ok(check_range(component, dose))
    }

    /// Total daily amount of a component for a profile.
    pub fn daily_dose(&self, component_id: &str, profile: &PatientProfile) -> DosingResult<f64> {
        Ok(self.compute_dose(component_id, profile)?.daily_dose())
    }
}

/// Dose computation for an already resolved component.
pub fn dose_for(component: &Component, profile: &PatientProfile) -> DoseResult {
    let base_dose = component.nominal_dose(profile.weight);

    let mut adjustment_factor = 1.0;
    let mut applied_adjustments = Vec::new();
    for (factor, multiplier) in component.adjustments.declared() {
        if factor.applies_to(profile) {
            adjustment_factor *= multiplier;
            applied_adjustments.push(factor);
        }
    }

    let adjusted_dose = base_dose * adjustment_factor;
    let pk = &component.pharmacokinetics;
    let effective_dose = adjusted_dose * (pk.f / 100.0);

    let volume_of_distribution = pk.vd * profile.weight;
    let plasma_concentration = if volume_of_distribution > 0.0 {
        effective_dose / volume_of_distribution
    } else {
        0.0
    };
    let tissue_dose = plasma_concentration * pk.kp;

    tracing::debug!(
        component = %component.id,
        base_dose,
        adjustment_factor,
        adjusted_dose,
        "Computed dose"
    );

    DoseResult {
        component_id: component.id.clone(),
        base_dose,
        adjustment_factor,
        applied_adjustments,
        adjusted_dose,
        effective_dose,
        plasma_concentration,
        tissue_dose,
        frequency: component.frequency,
        timing: component.timing.clone(),
        unit: component.unit.clone(),
        route: component.route,
    }
}

/// Safe range for a component: its own record first, then the fallback table.
pub fn safe_range_for(component: &Component) -> (Option<SafeRange>, RangeSource) {
    if let Some(range) = component.safe_range {
        return (Some(range), RangeSource::Reference);
    }
    FALLBACK_SAFE_RANGES
        .iter()
        .find(|(id, _, _)| *id == component.id)
        .map(|(_, min, max)| (Some(SafeRange::new(*min, *max)), RangeSource::Fallback))
        .unwrap_or((None, RangeSource::None))
}

pub fn check_range(component: &Component, dose: f64) -> DoseRangeCheck {
    let (range, source) = safe_range_for(component);
    let unit = &component.unit;

    let (valid, message, warning) = match range {
        None => (
            true,
            None,
            Some(format!("No established safe range for {}", component.name)),
        ),
        Some(r) if dose < r.min => (
            false,
            Some(format!(
                "{} dose {:.1} {unit} is below the minimum of {} {unit}",
                component.name, dose, r.min
            )),
            None,
        ),
        Some(r) if dose > r.max => (
            false,
            Some(format!(
                "{} dose {:.1} {unit} exceeds the maximum of {} {unit}",
                component.name, dose, r.max
            )),
            None,
        ),
        Some(_) => (true, None, None),
    };

    DoseRangeCheck {
        component_id: component.id.clone(),
        valid,
        dose,
        range,
        source,
        message,
        warning,
    }
}
