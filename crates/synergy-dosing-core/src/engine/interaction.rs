//! Pairwise interaction and synergy analysis.

use crate::models::{
    CiBucket, CiInterpretation, CiVerdict, CombinationIndex, ContraindicationFinding,
    Interaction, InteractionKind, PatientProfile, Significance, SynergyMap, SynergyResult,
};
use crate::reference::ReferenceData;
use crate::DosingResult;

/// Interaction parameter α of the combination index formula.
pub const CI_ALPHA: f64 = 0.5;

/// Upper bound of the reporting synergy factor.
const REPORT_FACTOR_CAP: f64 = 3.0;

/// Per-pair caps and diminishing-returns bases for an overall synergy factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynergyCaps {
    pub high: f64,
    pub moderate: f64,
}

/// Caps used by the reporting factor.
pub const REPORT_CAPS: SynergyCaps = SynergyCaps {
    high: 2.0,
    moderate: 1.5,
};

/// Finds documented interactions among selected components.
pub struct InteractionEngine<'a> {
    data: &'a ReferenceData,
}

impl<'a> InteractionEngine<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        Self { data }
    }

    /// Every documented interaction among the selection, keyed by canonical pair.
    ///
    /// Undocumented pairs are omitted. Unknown ids fail with `NotFound`.
    pub fn compute_synergies<S: AsRef<str>>(&self, selected: &[S]) -> DosingResult<SynergyMap> {
        let ids = dedup_ids(selected);
        for id in &ids {
            self.data.component(id)?;
        }

        let mut synergies = SynergyMap::new();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                if let Some(interaction) = self.data.interaction(a, b) {
                    synergies.insert(interaction.pair.clone(), self.describe(interaction));
                }
            }
        }

        tracing::debug!(selected = ids.len(), found = synergies.len(), "Computed synergies");
        Ok(synergies)
    }

    /// Reporting variant of the overall synergy factor, at most 3.0.
    pub fn overall_synergy_factor(&self, synergies: &SynergyMap) -> f64 {
        overall_synergy_factor(synergies)
    }

    /// Component-specific cautions triggered by the patient profile.
    pub fn check_contraindications<S: AsRef<str>>(
        &self,
        selected: &[S],
        profile: &PatientProfile,
    ) -> DosingResult<Vec<ContraindicationFinding>> {
        let mut findings = Vec::new();
        for id in dedup_ids(selected) {
            let component = self.data.component(id)?;
            for rule in &component.cautions {
                if rule.when.matches(profile) {
                    findings.push(ContraindicationFinding {
                        component_id: component.id.clone(),
                        severity: rule.severity,
                        message: rule.message.clone(),
                    });
                }
            }
        }
        Ok(findings)
    }

    fn describe(&self, interaction: &Interaction) -> SynergyResult {
        let ci_interpretation = interaction.combination_index.map(|ci| {
            let bucket = CiBucket::classify(ci);
            CiInterpretation {
                bucket,
                range: bucket.range().to_string(),
                label: self.data.ci_scale().label(bucket).to_string(),
            }
        });

        let regeneration_factor = match (interaction.kind, interaction.regeneration_rate) {
            (InteractionKind::Regeneration, Some(rate)) => Some(regeneration_factor(rate)),
            _ => None,
        };

        SynergyResult {
            pair: interaction.pair.clone(),
            kind: interaction.kind,
            factor: interaction.factor,
            mechanism: interaction.mechanism.clone(),
            significance: interaction.significance,
            combination_index: interaction.combination_index,
            ci_interpretation,
            regeneration_rate: interaction.regeneration_rate,
            regeneration_factor,
        }
    }
}

/// Selected ids with duplicates removed, first occurrence kept.
pub(crate) fn dedup_ids<S: AsRef<str>>(selected: &[S]) -> Vec<&str> {
    let mut ids: Vec<&str> = Vec::with_capacity(selected.len());
    for id in selected {
        let id = id.as_ref();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Regeneration factor for a documented regeneration rate.
pub fn regeneration_factor(rate: f64) -> f64 {
    if rate > 100_000.0 {
        2.5
    } else if rate > 10_000.0 {
        2.0
    } else if rate > 1_000.0 {
        1.5
    } else if rate > 100.0 {
        1.2
    } else {
        1.1
    }
}

/// Product of capped high/moderate factors with diminishing returns.
///
/// Low-significance pairs do not contribute. The result is not bounded here.
pub fn combined_synergy_factor(synergies: &SynergyMap, caps: SynergyCaps) -> f64 {
    let mut factor = 1.0;
    let mut high_count = 0;
    let mut moderate_count = 0;

    for synergy in synergies.values() {
        match synergy.significance {
            Significance::High => {
                factor *= synergy.factor.min(caps.high);
                high_count += 1;
            }
            Significance::Moderate => {
                factor *= synergy.factor.min(caps.moderate);
                moderate_count += 1;
            }
            Significance::Low => {}
        }
    }

    if high_count > 1 {
        factor *= 0.9_f64.powi(high_count - 1);
    }
    if moderate_count > 2 {
        factor *= 0.95_f64.powi(moderate_count - 2);
    }
    factor
}

/// Reporting synergy factor, capped at 3.0.
pub fn overall_synergy_factor(synergies: &SynergyMap) -> f64 {
    combined_synergy_factor(synergies, REPORT_CAPS).min(REPORT_FACTOR_CAP)
}

/// Chou-Talalay combination index for two agents with α = 0.5.
///
/// `d1`/`d2` are the doses used in combination, `dx1`/`dx2` the doses of each
/// agent alone producing the same effect (e.g. IC50).
pub fn combination_index(d1: f64, dx1: f64, d2: f64, dx2: f64) -> CombinationIndex {
    let value = d1 / dx1 + d2 / dx2 + CI_ALPHA * (d1 * d2) / (dx1 * dx2);
    let verdict = if value < 0.7 {
        CiVerdict::Synergistic
    } else if value > 1.1 {
        CiVerdict::Antagonistic
    } else {
        CiVerdict::Additive
    };
    CombinationIndex { value, verdict }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CautionRule, CautionSeverity, CautionTrigger, CiScale, Component, DoseAdjustments,
        Frequency, PairKey, Pharmacodynamics, Pharmacokinetics, Route, StageId, TimeSlot,
    };
    use std::collections::BTreeMap;

    fn make_component(id: &str) -> Component {
        Component {
            id: id.into(),
            name: id.into(),
            dose_per_kg: 1.0,
            unit: "mg".into(),
            frequency: Frequency::QD,
            route: Route::Oral,
            timing: vec![TimeSlot::Morning],
            fat_soluble: false,
            pharmacokinetics: Pharmacokinetics {
                ka: Some(1.0),
                tmax: 1.0,
                f: 50.0,
                vd: 1.0,
                half_life: 1.0,
                kp: 1.0,
            },
            pharmacodynamics: Pharmacodynamics::default(),
            adjustments: DoseAdjustments::default(),
            safe_range: None,
            cautions: vec![],
        }
    }

    fn make_interaction(
        a: &str,
        b: &str,
        kind: InteractionKind,
        factor: f64,
        significance: Significance,
    ) -> Interaction {
        Interaction {
            pair: PairKey::new(a, b),
            kind,
            factor,
            mechanism: "test mechanism".into(),
            significance,
            combination_index: None,
            regeneration_rate: None,
        }
    }

    fn setup_data() -> ReferenceData {
        let mut ptx = make_component("pentoxifylline");
        ptx.cautions = vec![
            CautionRule {
                when: CautionTrigger::AgeAtLeast(75.0),
                severity: CautionSeverity::Caution,
                message: "Elderly patients: monitor for bleeding".into(),
            },
            CautionRule {
                when: CautionTrigger::CreatinineClearanceBelow(15.0),
                severity: CautionSeverity::Contraindicated,
                message: "Contraindicated in end-stage renal disease".into(),
            },
        ];

        let mut synergy = make_interaction(
            "pentoxifylline",
            "l_arginine",
            InteractionKind::Synergy,
            1.6,
            Significance::High,
        );
        synergy.combination_index = Some(0.45);

        let mut regen = make_interaction(
            "l_arginine",
            "coq10",
            InteractionKind::Regeneration,
            1.15,
            Significance::Moderate,
        );
        regen.regeneration_rate = Some(5000.0);

        let mut labels = BTreeMap::new();
        labels.insert(CiBucket::Synergism, "Synergy".to_string());

        ReferenceData::new(
            vec![
                ptx,
                make_component("l_arginine"),
                make_component("coq10"),
                make_component("vitamin_e"),
            ],
            vec![synergy, regen],
            BTreeMap::new(),
        )
        .unwrap()
        .with_ci_scale(CiScale::new(labels))
    }

    fn synergy_map(entries: &[(f64, Significance)]) -> SynergyMap {
        entries
            .iter()
            .enumerate()
            .map(|(i, (factor, significance))| {
                let interaction = make_interaction(
                    &format!("a{i}"),
                    &format!("b{i}"),
                    InteractionKind::Synergy,
                    *factor,
                    *significance,
                );
                let result = SynergyResult {
                    pair: interaction.pair.clone(),
                    kind: interaction.kind,
                    factor: interaction.factor,
                    mechanism: interaction.mechanism,
                    significance: interaction.significance,
                    combination_index: None,
                    ci_interpretation: None,
                    regeneration_rate: None,
                    regeneration_factor: None,
                };
                (interaction.pair, result)
            })
            .collect()
    }

    #[test]
    fn test_compute_synergies_finds_documented_pairs() {
        let data = setup_data();
        let engine = InteractionEngine::new(&data);

        let synergies = engine
            .compute_synergies(&["l_arginine", "pentoxifylline", "coq10", "vitamin_e"])
            .unwrap();
        assert_eq!(synergies.len(), 2);

        let ptx = &synergies[&PairKey::new("pentoxifylline", "l_arginine")];
        let interp = ptx.ci_interpretation.as_ref().unwrap();
        assert_eq!(interp.bucket, CiBucket::Synergism);
        assert_eq!(interp.label, "Synergy");
        assert!(ptx.regeneration_factor.is_none());

        let regen = &synergies[&PairKey::new("coq10", "l_arginine")];
        assert_eq!(regen.regeneration_factor, Some(1.5));
        assert!(regen.ci_interpretation.is_none());
    }

    #[test]
    fn test_selection_order_does_not_matter() {
        let data = setup_data();
        let engine = InteractionEngine::new(&data);

        let forward = engine.compute_synergies(&["pentoxifylline", "l_arginine"]).unwrap();
        let reverse = engine.compute_synergies(&["l_arginine", "pentoxifylline"]).unwrap();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_unknown_selected_id() {
        let data = setup_data();
        let engine = InteractionEngine::new(&data);
        assert!(engine.compute_synergies(&["pentoxifylline", "nope"]).is_err());
    }

    #[test]
    fn test_regeneration_thresholds() {
        assert_eq!(regeneration_factor(200_000.0), 2.5);
        assert_eq!(regeneration_factor(100_000.0), 2.0);
        assert_eq!(regeneration_factor(10_001.0), 2.0);
        assert_eq!(regeneration_factor(1_000.0), 1.2);
        assert_eq!(regeneration_factor(101.0), 1.2);
        assert_eq!(regeneration_factor(100.0), 1.1);
    }

    #[test]
    fn test_overall_factor_single_high() {
        let map = synergy_map(&[(2.5, Significance::High)]);
        assert_eq!(overall_synergy_factor(&map), 2.0);
    }

    #[test]
    fn test_overall_factor_diminishing_returns() {
        let map = synergy_map(&[(1.5, Significance::High), (1.5, Significance::High)]);
        assert!((overall_synergy_factor(&map) - 1.5 * 1.5 * 0.9).abs() < 1e-12);

        let map = synergy_map(&[
            (1.2, Significance::Moderate),
            (1.2, Significance::Moderate),
            (1.2, Significance::Moderate),
            (3.0, Significance::Low),
        ]);
        let expected = 1.2_f64.powi(3) * 0.95;
        assert!((overall_synergy_factor(&map) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_overall_factor_capped_at_three() {
        let map = synergy_map(&[
            (2.0, Significance::High),
            (2.0, Significance::High),
            (2.0, Significance::High),
        ]);
        assert_eq!(overall_synergy_factor(&map), 3.0);
    }

    #[test]
    fn test_contraindications_are_data_driven() {
        let data = setup_data();
        let engine = InteractionEngine::new(&data);

        let mut profile = PatientProfile::new(70.0, 78.0, StageId::Chronic);
        profile.creatinine_clearance = 12.0;

        let findings = engine
            .check_contraindications(&["pentoxifylline", "coq10"], &profile)
            .unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, CautionSeverity::Caution);
        assert_eq!(findings[1].severity, CautionSeverity::Contraindicated);

        let healthy = PatientProfile::new(70.0, 50.0, StageId::Chronic);
        assert!(engine
            .check_contraindications(&["pentoxifylline"], &healthy)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_combination_index() {
        // 10/40 + 5/20 + 0.5 × 50/800 = 0.53125
        let ci = combination_index(10.0, 40.0, 5.0, 20.0);
        assert!((ci.value - 0.53125).abs() < 1e-12);
        assert_eq!(ci.verdict, CiVerdict::Synergistic);

        let ci = combination_index(20.0, 40.0, 8.0, 20.0);
        assert!((ci.value - 1.0).abs() < 1e-12);
        assert_eq!(ci.verdict, CiVerdict::Additive);

        let ci = combination_index(40.0, 40.0, 10.0, 20.0);
        assert_eq!(ci.verdict, CiVerdict::Antagonistic);
    }
}
