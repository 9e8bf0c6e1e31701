//! Numeric-range validation of parsed reference records.
//!
//! Required fields and enum membership are enforced by deserialization;
//! the checks here cover what the type system cannot express. Every check
//! returns all problems found, never just the first.

use synergy_dosing_core::models::{
    duration_upper_months, AdjustmentFactor, Component, Interaction, Route, Stage, StageId,
};

fn percent(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Problems with a single component record.
pub fn validate_component(component: &Component) -> Vec<String> {
    let id = &component.id;
    let mut errors = Vec::new();

    if component.name.trim().is_empty() {
        errors.push(format!("component '{id}': name is empty"));
    }
    if !positive(component.dose_per_kg) {
        errors.push(format!("component '{id}': dosePerKg must be > 0"));
    }
    if component.timing.is_empty() {
        errors.push(format!("component '{id}': timing must list at least one slot"));
    }

    let pk = &component.pharmacokinetics;
    if !(pk.f > 0.0 && pk.f <= 100.0) {
        errors.push(format!("component '{id}': bioavailability f must be in (0, 100]"));
    }
    for (field, value) in [("vd", pk.vd), ("kp", pk.kp), ("halfLife", pk.half_life)] {
        if !positive(value) {
            errors.push(format!("component '{id}': {field} must be > 0"));
        }
    }
    if pk.tmax < 0.0 {
        errors.push(format!("component '{id}': tmax must not be negative"));
    }
    match (component.route, pk.ka) {
        (Route::Oral, None) => {
            errors.push(format!("component '{id}': oral components require ka"));
        }
        (_, Some(ka)) if !positive(ka) => {
            errors.push(format!("component '{id}': ka must be > 0"));
        }
        _ => {}
    }

    let pd = &component.pharmacodynamics;
    let effects = [
        ("tgfReduction", pd.tgf_reduction),
        ("collagenReduction", pd.collagen_reduction),
        ("curvatureReduction", pd.curvature_reduction),
        ("plaqueReduction", pd.plaque_reduction),
        ("painRelief", pd.pain_relief),
        ("successRate", pd.success_rate),
    ];
    for (field, value) in effects {
        if !percent(value) {
            errors.push(format!("component '{id}': {field} must be in [0, 100]"));
        }
    }

    for factor in AdjustmentFactor::ALL {
        if let Some(multiplier) = component.adjustments.factor(factor) {
            if !positive(multiplier) {
                errors.push(format!("component '{id}': adjustment {factor:?} must be > 0"));
            }
        }
    }

    if let Some(range) = component.safe_range {
        if range.min < 0.0 || range.min > range.max {
            errors.push(format!(
                "component '{id}': safeRange must satisfy 0 <= min <= max (got {}-{})",
                range.min, range.max
            ));
        }
    }

    errors
}

/// Problems with a single interaction record.
pub fn validate_interaction(interaction: &Interaction) -> Vec<String> {
    let pair = &interaction.pair;
    let mut errors = Vec::new();

    if !positive(interaction.factor) {
        errors.push(format!("interaction '{pair}': factor must be > 0"));
    }
    if let Some(ci) = interaction.combination_index {
        if !positive(ci) {
            errors.push(format!("interaction '{pair}': combinationIndex must be > 0"));
        }
    }
    if let Some(rate) = interaction.regeneration_rate {
        if !positive(rate) {
            errors.push(format!("interaction '{pair}': regenerationRate must be > 0"));
        }
    }

    errors
}

/// Problems with a single stage record.
pub fn validate_stage(id: StageId, stage: &Stage) -> Vec<String> {
    let mut errors = Vec::new();

    if !percent(stage.success_base) {
        errors.push(format!("stage '{id}': successBase must be in [0, 100]"));
    }
    if duration_upper_months(&stage.duration, &stage.duration_unit).is_none() {
        errors.push(format!(
            "stage '{id}': duration '{}' is not a number or range",
            stage.duration
        ));
    }
    for component in &stage.contraindicated {
        if stage.core_components.contains(component) {
            errors.push(format!(
                "stage '{id}': '{component}' is both core and contraindicated"
            ));
        }
    }

    errors
}
