//! Property-based tests for calculation bounds and determinism.

mod common;

use std::collections::BTreeMap;

use proptest::prelude::*;
use synergy_dosing_core::engine::estimate_adherence;
use synergy_dosing_core::models::{
    Component, DoseAdjustments, Frequency, Interaction, InteractionKind, LiverFunction, PairKey,
    Pharmacodynamics, Pharmacokinetics, Route, Significance, Stage, StageId, TimeSlot,
};
use synergy_dosing_core::{Calculator, PatientProfile, ReferenceData};

fn saturated_component(index: usize, multiplier: f64) -> Component {
    Component {
        id: format!("c{index:02}"),
        name: format!("Compound {index}"),
        dose_per_kg: 10.0,
        unit: "mg".into(),
        frequency: Frequency::TID,
        route: Route::Oral,
        timing: vec![TimeSlot::Breakfast, TimeSlot::Lunch, TimeSlot::Dinner],
        fat_soluble: index % 2 == 0,
        pharmacokinetics: Pharmacokinetics {
            ka: Some(1.0),
            tmax: 1.0,
            f: 100.0,
            vd: 1.0,
            half_life: 4.0,
            kp: 1.0,
        },
        pharmacodynamics: Pharmacodynamics {
            tgf_reduction: 100.0,
            collagen_reduction: 100.0,
            curvature_reduction: 100.0,
            plaque_reduction: 100.0,
            pain_relief: 100.0,
            success_rate: 100.0,
        },
        adjustments: DoseAdjustments {
            age65: Some(multiplier),
            bmi30: Some(multiplier),
            smoking: Some(multiplier),
            cr_cl30: Some(multiplier),
            child_b: Some(multiplier),
        },
        safe_range: None,
        cautions: vec![],
    }
}

/// Twelve maximal components, every adjacent pair a high-significance synergy.
fn saturated_reference(multiplier: f64) -> ReferenceData {
    let components: Vec<Component> = (0..12).map(|i| saturated_component(i, multiplier)).collect();
    let interactions: Vec<Interaction> = (0..11)
        .map(|i| Interaction {
            pair: PairKey::new(format!("c{i:02}"), format!("c{:02}", i + 1)),
            kind: InteractionKind::Synergy,
            factor: 3.0,
            mechanism: "test".into(),
            significance: Significance::High,
            combination_index: Some(0.2),
            regeneration_rate: None,
        })
        .collect();

    let core: Vec<String> = components.iter().map(|c| c.id.clone()).collect();
    let stages: BTreeMap<StageId, Stage> = StageId::ALL
        .into_iter()
        .map(|id| {
            let stage = Stage {
                name: id.to_string(),
                timeframe: "any".into(),
                duration: "6-12".into(),
                duration_unit: "months".into(),
                description: String::new(),
                characteristics: vec![],
                core_components: core.clone(),
                optional_components: vec![],
                contraindicated: vec![],
                success_base: 100.0,
                special_considerations: vec![],
                monitoring: vec![],
            };
            (id, stage)
        })
        .collect();

    ReferenceData::new(components, interactions, stages).unwrap()
}

fn arb_stage() -> impl Strategy<Value = StageId> {
    prop_oneof![
        Just(StageId::Acute),
        Just(StageId::Chronic),
        Just(StageId::Calcified),
        Just(StageId::Severe),
    ]
}

prop_compose! {
    fn arb_profile()(
        weight in 40.0f64..160.0,
        age in 18.0f64..95.0,
        bmi in 17.0f64..45.0,
        smoking in any::<bool>(),
        creatinine_clearance in 5.0f64..130.0,
        child_b in any::<bool>(),
        stage in arb_stage(),
        has_plaque in any::<bool>(),
        has_calcification in any::<bool>(),
        curvature in proptest::option::of(0.0f64..90.0),
    ) -> PatientProfile {
        PatientProfile {
            weight,
            height: None,
            age,
            bmi,
            smoking,
            creatinine_clearance,
            liver_function: if child_b { LiverFunction::ChildB } else { LiverFunction::Normal },
            stage,
            has_plaque,
            has_calcification,
            curvature,
        }
    }
}

proptest! {
    #[test]
    fn prop_metrics_stay_in_bounds(
        profile in arb_profile(),
        multiplier in 0.5f64..3.0,
        count in 1usize..=12,
    ) {
        let calc = Calculator::with_reference(saturated_reference(multiplier));
        let selected: Vec<String> = (0..count).map(|i| format!("c{i:02}")).collect();

        let result = calc.calculate_dosing(&profile, &selected).unwrap();
        let eff = &result.effectiveness;
        for value in eff.metrics.values() {
            prop_assert!((0.0..=100.0).contains(&value), "metric {} out of range", value);
        }
        prop_assert!((0.0..=95.0).contains(&eff.response_potential));
        prop_assert!((0.5..=1.8).contains(&eff.blend_synergy_factor));
        prop_assert!(eff.overall_synergy_factor <= 3.0);
    }

    #[test]
    fn prop_adherence_never_below_half(count in 0usize..50, months in 0.0f64..60.0) {
        let estimate = estimate_adherence(count, months);
        prop_assert!(estimate.score >= 0.5);
        prop_assert!(estimate.score <= 0.85);
    }

    #[test]
    fn prop_interaction_lookup_order_independent(a in 0usize..12, b in 0usize..12) {
        let data = saturated_reference(1.0);
        let (x, y) = (format!("c{a:02}"), format!("c{b:02}"));
        prop_assert_eq!(data.interaction(&x, &y), data.interaction(&y, &x));
    }

    #[test]
    fn prop_calculation_is_deterministic(profile in arb_profile(), count in 1usize..=12) {
        let calc = common::calculator();
        let ids = ["pentoxifylline", "vitamin_e", "coq10", "l_arginine", "tadalafil", "verapamil_topical"];
        let selected = &ids[..count.min(ids.len())];

        let first = calc.calculate_dosing(&profile, selected);
        let second = calc.calculate_dosing(&profile, selected);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            // Only the severe stage is absent from the fixture
            (Err(_), Err(_)) => prop_assert_eq!(profile.stage, StageId::Severe),
            _ => prop_assert!(false, "results diverged"),
        }
    }
}
