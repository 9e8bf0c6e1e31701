//! Effectiveness aggregation and warning generation.
//!
//! Metrics combine as independent probabilities with diminishing returns:
//! `raw = 100 × (1 − Π(1 − cᵢ))`, where each contribution `cᵢ` is the
//! component's maximal effect scaled by its dose strength. Stacking more
//! components never pushes a metric past 100.

use crate::models::{
    CautionSeverity, Component, ContraindicationFinding, DoseRangeCheck, DoseResult,
    EffectivenessMetrics, LiverFunction, PatientProfile, Pharmacodynamics, Stage, StageId,
    SynergyMap, Warning, WarningCode, WarningSeverity,
};

use super::interaction::{combined_synergy_factor, SynergyCaps};

/// Caps used by the blending synergy factor.
pub const BLEND_CAPS: SynergyCaps = SynergyCaps {
    high: 1.6,
    moderate: 1.3,
};

/// Bounds of the blending synergy factor.
const BLEND_FACTOR_RANGE: (f64, f64) = (0.5, 1.8);

/// Maximum dose strength relative to the nominal weight-based dose.
const MAX_DOSE_STRENGTH: f64 = 2.0;

/// Ceiling of the response-potential metric.
const MAX_RESPONSE_POTENTIAL: f64 = 95.0;

/// Per-pair cap and product cap of the response-potential synergy boost.
const BOOST_PAIR_CAP: f64 = 1.5;
const BOOST_CAP: f64 = 1.6;

/// A selected component together with its computed dose.
pub struct DosedComponent<'a> {
    pub component: &'a Component,
    pub dose: &'a DoseResult,
}

/// Combines doses, synergies and stage data into effectiveness metrics.
pub struct AggregationEngine;

impl AggregationEngine {
    /// Bounded synergy factor for blending, in `[0.5, 1.8]`.
    pub fn blend_synergy_factor(synergies: &SynergyMap) -> f64 {
        let (min, max) = BLEND_FACTOR_RANGE;
        combined_synergy_factor(synergies, BLEND_CAPS).clamp(min, max)
    }

    /// Ratio of adjusted to nominal dose, in `[0, 2]`.
    pub fn dose_strength(dosed: &DosedComponent<'_>, weight_kg: f64) -> f64 {
        let nominal = dosed.component.nominal_dose(weight_kg);
        if nominal <= 0.0 {
            return 0.0;
        }
        (dosed.dose.adjusted_dose / nominal).clamp(0.0, MAX_DOSE_STRENGTH)
    }

    /// The five outcome metrics before stage modifiers.
    pub fn aggregate_metrics(
        dosed: &[DosedComponent<'_>],
        weight_kg: f64,
        synergy_factor: f64,
    ) -> EffectivenessMetrics {
        let strengths: Vec<(f64, &Pharmacodynamics)> = dosed
            .iter()
            .map(|d| {
                (
                    Self::dose_strength(d, weight_kg),
                    &d.component.pharmacodynamics,
                )
            })
            .collect();

        let metric = |select: fn(&Pharmacodynamics) -> f64| {
            let remaining: f64 = strengths
                .iter()
                .map(|(strength, pd)| 1.0 - ((select(pd) / 100.0) * strength).clamp(0.0, 1.0))
                .product();
            blend(100.0 * (1.0 - remaining), synergy_factor)
        };

        EffectivenessMetrics {
            tgf_reduction: metric(|pd| pd.tgf_reduction),
            collagen_reduction: metric(|pd| pd.collagen_reduction),
            curvature_reduction: metric(|pd| pd.curvature_reduction),
            plaque_reduction: metric(|pd| pd.plaque_reduction),
            pain_relief: metric(|pd| pd.pain_relief),
        }
    }

    /// Population-level expected success, in `[0, 95]`.
    pub fn response_potential<S: AsRef<str>>(
        stage: &Stage,
        selected: &[S],
        synergies: &SynergyMap,
        profile: &PatientProfile,
    ) -> f64 {
        let coverage = stage.coverage_or_default(selected);

        let boost = synergies
            .values()
            .map(|s| s.factor.min(BOOST_PAIR_CAP))
            .product::<f64>()
            .min(BOOST_CAP);
        let synergy_term = 0.9 + 0.1 * ((boost - 1.0) / 0.6).clamp(0.0, 1.0);

        let value = stage.success_base * coverage * synergy_term - risk_penalty(profile);
        value.clamp(0.0, MAX_RESPONSE_POTENTIAL)
    }
}

/// Apply the synergy blend to a raw metric and clamp into `[0, 100]`.
fn blend(raw: f64, synergy_factor: f64) -> f64 {
    let synergy_weight = ((synergy_factor - 1.0) / 0.8).clamp(0.0, 1.0);
    (raw.max(0.0).powf(0.9) * (0.85 + 0.15 * synergy_weight)).clamp(0.0, 100.0)
}

/// Penalty points subtracted from the response potential.
pub fn risk_penalty(profile: &PatientProfile) -> f64 {
    let mut penalty = 0.0;
    if profile.age >= 65.0 {
        penalty += 10.0;
    }
    if profile.bmi >= 30.0 {
        penalty += 5.0;
    }
    if profile.smoking {
        penalty += 5.0;
    }
    if profile.creatinine_clearance < 30.0 {
        penalty += 10.0;
    }
    if profile.liver_function != LiverFunction::Normal {
        penalty += 10.0;
    }
    penalty
}

/// Deterministic safety warnings for a profile and selection.
///
/// Order: profile rules, stage rules, component cautions, dose ranges.
pub fn generate_warnings(
    profile: &PatientProfile,
    stage: &Stage,
    components: &[&Component],
    findings: &[ContraindicationFinding],
    range_checks: &[DoseRangeCheck],
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if profile.is_elderly() {
        warnings.push(Warning::new(
            WarningCode::Elderly,
            WarningSeverity::Caution,
            "Age 65 or older: start at reduced doses and monitor tolerance",
        ));
    }
    if profile.is_obese() {
        warnings.push(Warning::new(
            WarningCode::Obesity,
            WarningSeverity::Info,
            "BMI 30 or higher: weight-based doses may overestimate requirements",
        ));
    }
    if profile.creatinine_clearance < 30.0 {
        warnings.push(Warning::new(
            WarningCode::RenalImpairment,
            WarningSeverity::Critical,
            format!(
                "Severe renal impairment (CrCl {:.0} mL/min): renally cleared components need review",
                profile.creatinine_clearance
            ),
        ));
    } else if profile.creatinine_clearance <= 50.0 {
        warnings.push(Warning::new(
            WarningCode::RenalImpairment,
            WarningSeverity::Caution,
            format!(
                "Moderate renal impairment (CrCl {:.0} mL/min): doses have been reduced where declared",
                profile.creatinine_clearance
            ),
        ));
    }
    if profile.liver_function != LiverFunction::Normal {
        warnings.push(Warning::new(
            WarningCode::HepaticImpairment,
            WarningSeverity::Caution,
            "Hepatic impairment: monitor liver enzymes during therapy",
        ));
    }
    if profile.stage == StageId::Acute && profile.has_lesion() {
        warnings.push(Warning::new(
            WarningCode::AcuteWithLesion,
            WarningSeverity::Caution,
            "Plaque or calcification in the acute stage: injection therapy should accompany oral therapy",
        ));
    }

    for component in components {
        if stage.is_contraindicated(&component.id) {
            tracing::warn!(component = %component.id, "Selected component is contraindicated for stage");
            warnings.push(
                Warning::new(
                    WarningCode::StageContraindication,
                    WarningSeverity::Critical,
                    format!("{} is contraindicated in the {} stage", component.name, stage.name),
                )
                .for_component(component.id.clone()),
            );
        }
    }

    for finding in findings {
        let severity = match finding.severity {
            CautionSeverity::Caution => WarningSeverity::Caution,
            CautionSeverity::Contraindicated => WarningSeverity::Critical,
        };
        warnings.push(
            Warning::new(WarningCode::ComponentCaution, severity, finding.message.clone())
                .for_component(finding.component_id.clone()),
        );
    }

    for check in range_checks {
        if let Some(message) = &check.message {
            warnings.push(
                Warning::new(WarningCode::DoseOutOfRange, WarningSeverity::Caution, message.clone())
                    .for_component(check.component_id.clone()),
            );
        } else if let Some(warning) = &check.warning {
            warnings.push(
                Warning::new(WarningCode::NoEstablishedRange, WarningSeverity::Info, warning.clone())
                    .for_component(check.component_id.clone()),
            );
        }
    }

    warnings
}
