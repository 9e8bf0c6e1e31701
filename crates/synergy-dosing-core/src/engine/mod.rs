//! Calculation engines and the calculator that orchestrates them.

mod aggregate;
mod dosing;
mod interaction;
mod schedule;
mod stage;

pub use aggregate::{generate_warnings, risk_penalty, AggregationEngine, DosedComponent, BLEND_CAPS};
pub use dosing::{check_range, dose_for, safe_range_for, DosingEngine};
pub use interaction::{
    combination_index, combined_synergy_factor, overall_synergy_factor, regeneration_factor,
    InteractionEngine, SynergyCaps, CI_ALPHA, REPORT_CAPS,
};
pub use schedule::{build_schedule, SCHEDULE_SYNERGY_PAIRS};
pub use stage::{
    estimate_adherence, recommendation_months, StageEngine, ACUTE_ANTIOXIDANTS,
    ACUTE_CALCIFIED_DURATION, ACUTE_PLAQUE_DURATION, INJECTION_THERAPY_CONSIDERATION,
    RHEOLOGY_MODIFIER,
};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{
    CalculationResult, Component, ComponentDose, DoseRangeCheck, DoseResult, Effectiveness,
    PatientProfile,
};
use crate::reference::ReferenceData;
use crate::{DosingError, DosingResult};

/// Duration assumed when a recommendation's duration cannot be parsed.
const FALLBACK_COURSE_MONTHS: f64 = 12.0;

/// Entry point for full dosing calculations.
///
/// A calculator starts uninitialized; every operation fails with
/// [`DosingError::NotInitialized`] until reference data is supplied.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    reference: Option<Arc<ReferenceData>>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(reference: ReferenceData) -> Self {
        Self {
            reference: Some(Arc::new(reference)),
        }
    }

    /// Install reference data. Replaces any previously loaded set.
    pub fn initialize(&mut self, reference: ReferenceData) {
        tracing::info!(
            components = reference.component_count(),
            "Calculator initialized"
        );
        self.reference = Some(Arc::new(reference));
    }

    pub fn is_initialized(&self) -> bool {
        self.reference.is_some()
    }

    pub fn reference(&self) -> DosingResult<&ReferenceData> {
        self.reference.as_deref().ok_or(DosingError::NotInitialized)
    }

    pub fn dosing(&self) -> DosingResult<DosingEngine<'_>> {
        Ok(DosingEngine::new(self.reference()?))
    }

    pub fn interactions(&self) -> DosingResult<InteractionEngine<'_>> {
        Ok(InteractionEngine::new(self.reference()?))
    }

    pub fn stages(&self) -> DosingResult<StageEngine<'_>> {
        Ok(StageEngine::new(self.reference()?))
    }

    /// Full calculation for a profile and a selection of component ids.
    ///
    /// Duplicate ids are ignored. Unknown ids fail with `NotFound`; safety
    /// findings are returned as warnings.
    pub fn calculate_dosing<S: AsRef<str>>(
        &self,
        profile: &PatientProfile,
        selected: &[S],
    ) -> DosingResult<CalculationResult> {
        let data = self.reference()?;
        let ids = interaction::dedup_ids(selected);
        let components = ids
            .iter()
            .map(|id| data.component(id))
            .collect::<DosingResult<Vec<&Component>>>()?;
        let stage = data.stage(profile.stage)?;

        tracing::debug!(stage = %profile.stage, selected = ids.len(), "Calculating dosing");

        let doses: Vec<DoseResult> = components.iter().map(|c| dose_for(c, profile)).collect();
        let range_checks: Vec<DoseRangeCheck> = components
            .iter()
            .zip(&doses)
            .map(|(c, d)| check_range(c, d.adjusted_dose))
            .collect();

        let interaction_engine = InteractionEngine::new(data);
        let synergies = interaction_engine.compute_synergies(&ids)?;
        let findings = interaction_engine.check_contraindications(&ids, profile)?;

        let dosed: Vec<DosedComponent<'_>> = components
            .iter()
            .zip(&doses)
            .map(|(&component, dose)| DosedComponent { component, dose })
            .collect();
        let blend_factor = AggregationEngine::blend_synergy_factor(&synergies);
        let base_metrics = AggregationEngine::aggregate_metrics(&dosed, profile.weight, blend_factor);

        let stage_engine = StageEngine::new(data);
        let stage_effect = stage_engine.calculate_stage_specific_effectiveness(
            profile.stage,
            &ids,
            profile,
            base_metrics,
        )?;

        let effectiveness = Effectiveness {
            metrics: stage_effect.apply(),
            response_potential: AggregationEngine::response_potential(stage, &ids, &synergies, profile),
            stage_multiplier: stage_effect.multiplier,
            blend_synergy_factor: blend_factor,
            overall_synergy_factor: overall_synergy_factor(&synergies),
        };

        let recommendation = stage_engine.get_recommendations(profile.stage, profile)?;
        let months = recommendation_months(&recommendation).unwrap_or(FALLBACK_COURSE_MONTHS);
        let adherence = estimate_adherence(ids.len(), months);
        let progress = stage_engine.predict_progress(profile.stage, &ids, Some(months))?;

        let schedule = build_schedule(&components);
        let warnings = generate_warnings(profile, stage, &components, &findings, &range_checks);

        let component_doses: BTreeMap<String, ComponentDose> = doses
            .into_iter()
            .zip(range_checks)
            .map(|(dose, range_check)| {
                let daily_dose = dose.daily_dose();
                (
                    dose.component_id.clone(),
                    ComponentDose {
                        dose,
                        daily_dose,
                        range_check,
                    },
                )
            })
            .collect();

        tracing::info!(
            stage = %profile.stage,
            components = component_doses.len(),
            synergies = synergies.len(),
            warnings = warnings.len(),
            "Dosing calculation complete"
        );

        Ok(CalculationResult {
            component_doses,
            synergy_effects: synergies,
            effectiveness,
            stage_recommendations: recommendation,
            adherence,
            progress,
            schedule,
            warnings,
        })
    }
}
