//! Stage-specific recommendations and effectiveness modifiers.

use crate::models::{
    duration_upper_months, AdherenceEstimate, EffectivenessMetrics, Milestone, PatientProfile,
    ProgressPrediction, StageEffectiveness, StageId, StageRecommendation,
};
use crate::reference::ReferenceData;
use crate::DosingResult;

/// Antioxidants that lift acute-stage response.
pub const ACUTE_ANTIOXIDANTS: [&str; 2] = ["vitamin_e", "coq10"];

/// Rheology modifier that enhances response in calcified disease.
pub const RHEOLOGY_MODIFIER: &str = "pentoxifylline";

/// Acute-stage duration when calcification is present.
pub const ACUTE_CALCIFIED_DURATION: &str = "18-36";

/// Acute-stage duration when plaque is present.
pub const ACUTE_PLAQUE_DURATION: &str = "6-24";

pub const INJECTION_THERAPY_CONSIDERATION: &str = "Intralesional injection therapy required: \
     every 2 weeks for 6 months, then monthly for 12 months";

/// Milestone months and the share of the adjusted success rate reached by each.
const MILESTONES: [(f64, f64); 3] = [(1.0, 0.10), (3.0, 0.30), (6.0, 0.60)];

/// Duration assumed when a stage's duration cannot be parsed.
const DEFAULT_DURATION_MONTHS: f64 = 12.0;

/// Supplies stage protocols and stage-specific modifiers.
pub struct StageEngine<'a> {
    data: &'a ReferenceData,
}

impl<'a> StageEngine<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        Self { data }
    }

    /// Stage protocol tailored to the profile's findings.
    pub fn get_recommendations(
        &self,
        stage_id: StageId,
        profile: &PatientProfile,
    ) -> DosingResult<StageRecommendation> {
        let stage = self.data.stage(stage_id)?;

        let mut duration = stage.duration.clone();
        let mut special_considerations = stage.special_considerations.clone();

        if stage_id == StageId::Acute {
            if profile.has_calcification {
                duration = ACUTE_CALCIFIED_DURATION.to_string();
            } else if profile.has_plaque {
                duration = ACUTE_PLAQUE_DURATION.to_string();
            }
            if profile.has_lesion() {
                special_considerations.push(INJECTION_THERAPY_CONSIDERATION.to_string());
            }
        }

        Ok(StageRecommendation {
            stage: stage_id,
            name: stage.name.clone(),
            timeframe: stage.timeframe.clone(),
            duration,
            duration_unit: stage.duration_unit.clone(),
            description: stage.description.clone(),
            characteristics: stage.characteristics.clone(),
            core_components: stage.core_components.clone(),
            optional_components: stage.optional_components.clone(),
            contraindicated: stage.contraindicated.clone(),
            success_base: stage.success_base,
            special_considerations,
            monitoring: stage.monitoring.clone(),
        })
    }

    /// Stage and patient-factor modifiers applied to effectiveness metrics.
    ///
    /// Returns the multiplier together with the sub-metrics after in-place
    /// scaling and the `<= 100` clamp. The multiplier itself is not yet applied
    /// to the metrics; see [`StageEffectiveness::apply`].
    pub fn calculate_stage_specific_effectiveness<S: AsRef<str>>(
        &self,
        stage_id: StageId,
        selected: &[S],
        profile: &PatientProfile,
        metrics: EffectivenessMetrics,
    ) -> DosingResult<StageEffectiveness> {
        let stage = self.data.stage(stage_id)?;
        let has = |id: &str| selected.iter().any(|s| s.as_ref() == id);

        let mut multiplier = 1.0;
        let mut m = metrics;

        match stage_id {
            StageId::Acute => {
                if ACUTE_ANTIOXIDANTS.iter().any(|&id| has(id)) {
                    multiplier *= 1.25;
                }
                // Acute tissue is less fibrotic
                m.collagen_reduction *= 0.8;
                m.plaque_reduction *= 0.7;
                if profile.has_lesion() {
                    multiplier *= 1.3;
                    m.plaque_reduction *= 1.2;
                }
            }
            StageId::Chronic => {
                let coverage = stage.coverage_or_default(selected);
                multiplier *= if coverage >= 0.8 { 1.15 } else { 0.9 };
            }
            StageId::Calcified | StageId::Severe => {}
        }

        if profile.has_calcification && has(RHEOLOGY_MODIFIER) {
            m.plaque_reduction *= 1.5;
            m.curvature_reduction *= 1.3;
            multiplier *= 1.2;
        }

        if profile.curvature.is_some_and(|c| c > 60.0) {
            let distinct = super::interaction::dedup_ids(selected).len();
            multiplier *= if distinct >= 10 { 1.1 } else { 0.85 };
            m.pain_relief *= 1.2;
        }

        tracing::debug!(stage = %stage_id, multiplier, "Stage multiplier");

        Ok(StageEffectiveness {
            multiplier,
            metrics: m.map(|v| v.min(100.0)),
        })
    }

    /// Progress expected over the stage's course for a selection.
    pub fn predict_progress<S: AsRef<str>>(
        &self,
        stage_id: StageId,
        selected: &[S],
        duration_months: Option<f64>,
    ) -> DosingResult<ProgressPrediction> {
        let stage = self.data.stage(stage_id)?;
        let coverage = stage.coverage_or_default(selected);
        let adjusted_success_rate = stage.success_base * coverage;

        let final_month = duration_months
            .or_else(|| stage.duration_months())
            .unwrap_or(DEFAULT_DURATION_MONTHS);

        let milestones = MILESTONES
            .iter()
            .map(|(month, share)| Milestone {
                month: *month,
                expected_improvement: adjusted_success_rate * share,
            })
            .chain(std::iter::once(Milestone {
                month: final_month,
                expected_improvement: adjusted_success_rate,
            }))
            .collect();

        Ok(ProgressPrediction {
            coverage,
            adjusted_success_rate,
            milestones,
        })
    }
}

impl StageEffectiveness {
    /// Scale every metric by the multiplier and clamp into `[0, 100]`.
    pub fn apply(&self) -> EffectivenessMetrics {
        let multiplier = self.multiplier;
        self.metrics.map(|v| v * multiplier).clamped()
    }
}

/// Duration in months of a (possibly overridden) recommendation.
pub fn recommendation_months(recommendation: &StageRecommendation) -> Option<f64> {
    duration_upper_months(&recommendation.duration, &recommendation.duration_unit)
}

/// Probability of sticking with a protocol of a given size and length.
pub fn estimate_adherence(component_count: usize, duration_months: f64) -> AdherenceEstimate {
    let long_course = if duration_months > 12.0 { 0.1 } else { 0.0 };
    let score = (0.85 - 0.1 * component_count as f64 - long_course).max(0.5);

    let mut recommendations = Vec::new();
    if score < 0.7 {
        recommendations.push("Use a pill organizer and daily reminders".to_string());
        recommendations.push("Combine doses into shared time slots where possible".to_string());
    }
    if score < 0.6 {
        recommendations.push("Consider prioritizing core components only".to_string());
        recommendations.push("Schedule monthly follow-up to review adherence".to_string());
    }

    AdherenceEstimate {
        score,
        recommendations,
    }
}
