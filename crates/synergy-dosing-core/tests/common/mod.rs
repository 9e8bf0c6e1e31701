//! Shared reference-data fixture for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use serde_json::json;
use synergy_dosing_core::models::{Component, Interaction, Stage, StageId};
use synergy_dosing_core::{Calculator, PatientProfile, ReferenceData};

pub const CHRONIC_CORE: [&str; 5] = [
    "pentoxifylline",
    "l_arginine",
    "tadalafil",
    "verapamil_topical",
    "vitamin_e",
];

fn components() -> Vec<Component> {
    let records = json!([
        {
            "id": "pentoxifylline",
            "name": "Pentoxifylline",
            "dosePerKg": 5.33,
            "frequency": "TID",
            "route": "oral",
            "timing": ["breakfast", "lunch", "dinner"],
            "pharmacokinetics": {"ka": 1.4, "tmax": 1.0, "f": 20, "vd": 4.2, "halfLife": 0.8, "kp": 1.5},
            "pharmacodynamics": {
                "tgfReduction": 35, "collagenReduction": 30, "curvatureReduction": 25,
                "plaqueReduction": 20, "painRelief": 15, "successRate": 40
            },
            "adjustments": {"age65": 1.1, "bmi30": 1.2, "smoking": 1.15, "crCl30": 0.8},
            "safeRange": {"min": 200, "max": 800},
            "cautions": [
                {"when": {"ageAtLeast": 75}, "severity": "caution", "message": "Increased bleeding risk after 75"},
                {"when": {"creatinineClearanceBelow": 15}, "severity": "contraindicated", "message": "Avoid in end-stage renal disease"}
            ]
        },
        {
            "id": "vitamin_e",
            "name": "Vitamin E",
            "dosePerKg": 5.33,
            "unit": "IU",
            "frequency": "BID",
            "route": "oral",
            "timing": ["morning", "evening", "breakfast", "dinner"],
            "fatSoluble": true,
            "pharmacokinetics": {"ka": 0.5, "tmax": 4.0, "f": 50, "vd": 0.4, "halfLife": 48, "kp": 2.0},
            "pharmacodynamics": {
                "tgfReduction": 20, "collagenReduction": 15, "curvatureReduction": 10,
                "plaqueReduction": 10, "painRelief": 10, "successRate": 25
            }
        },
        {
            "id": "coq10",
            "name": "Coenzyme Q10",
            "dosePerKg": 4.0,
            "frequency": "BID",
            "route": "oral",
            "timing": ["breakfast", "dinner"],
            "fatSoluble": true,
            "pharmacokinetics": {"ka": 0.3, "tmax": 6.0, "f": 5, "vd": 5.0, "halfLife": 33, "kp": 1.2},
            "pharmacodynamics": {
                "tgfReduction": 15, "collagenReduction": 10, "curvatureReduction": 10,
                "plaqueReduction": 5, "painRelief": 10, "successRate": 20
            },
            "safeRange": {"min": 50, "max": 600}
        },
        {
            "id": "l_arginine",
            "name": "L-Arginine",
            "dosePerKg": 33.3,
            "frequency": "TID",
            "route": "oral",
            "timing": ["morning", "breakfast", "lunch", "dinner"],
            "pharmacokinetics": {"ka": 1.2, "tmax": 1.0, "f": 68, "vd": 0.5, "halfLife": 1.5, "kp": 1.1},
            "pharmacodynamics": {
                "tgfReduction": 25, "collagenReduction": 20, "curvatureReduction": 15,
                "plaqueReduction": 15, "painRelief": 5, "successRate": 30
            },
            "safeRange": {"min": 500, "max": 6000}
        },
        {
            "id": "tadalafil",
            "name": "Tadalafil",
            "dosePerKg": 0.067,
            "frequency": "QD",
            "route": "oral",
            "timing": ["bedtime", "evening"],
            "pharmacokinetics": {"ka": 0.9, "tmax": 2.0, "f": 80, "vd": 0.9, "halfLife": 17.5, "kp": 1.3},
            "pharmacodynamics": {
                "tgfReduction": 20, "collagenReduction": 25, "curvatureReduction": 15,
                "plaqueReduction": 10, "painRelief": 5, "successRate": 30
            },
            "adjustments": {"age65": 0.75, "crCl30": 0.5}
        },
        {
            "id": "verapamil_topical",
            "name": "Verapamil Gel",
            "dosePerKg": 0.2,
            "frequency": "BID",
            "route": "topical",
            "timing": ["morning", "bedtime"],
            "pharmacokinetics": {"tmax": 2.0, "f": 10, "vd": 3.8, "halfLife": 6, "kp": 3.0},
            "pharmacodynamics": {
                "tgfReduction": 15, "collagenReduction": 20, "curvatureReduction": 20,
                "plaqueReduction": 25, "painRelief": 20, "successRate": 35
            }
        }
    ]);
    serde_json::from_value(records).expect("fixture components")
}

fn interactions() -> Vec<Interaction> {
    let records = json!([
        {
            "pair": "pentoxifylline+l_arginine",
            "type": "synergy",
            "factor": 1.4,
            "mechanism": "Improved microcirculation and NO availability",
            "significance": "high",
            "combinationIndex": 0.7
        },
        {
            "pair": "vitamin_e+coq10",
            "type": "synergy",
            "factor": 1.3,
            "mechanism": "Antioxidant recycling",
            "significance": "moderate",
            "combinationIndex": 0.70001
        },
        {
            "pair": "l_arginine+tadalafil",
            "type": "synergy",
            "factor": 1.5,
            "mechanism": "NO-cGMP pathway amplification",
            "significance": "high"
        },
        {
            "pair": "tadalafil+verapamil_topical",
            "type": "additive",
            "factor": 1.05,
            "mechanism": "Independent pathways",
            "significance": "low"
        }
    ]);
    serde_json::from_value(records).expect("fixture interactions")
}

fn stages() -> BTreeMap<StageId, Stage> {
    let records = json!({
        "acute": {
            "name": "Acute Phase",
            "timeframe": "0-12 months",
            "duration": "3-6",
            "durationUnit": "months",
            "description": "Active inflammation",
            "coreComponents": ["vitamin_e", "coq10", "pentoxifylline"],
            "optionalComponents": ["l_arginine"],
            "successBase": 65
        },
        "chronic": {
            "name": "Chronic Phase",
            "timeframe": "> 12 months",
            "duration": "6-12",
            "durationUnit": "months",
            "description": "Stable deformity",
            "coreComponents": CHRONIC_CORE,
            "optionalComponents": ["coq10"],
            "successBase": 55
        },
        "calcified": {
            "name": "Calcified Plaque",
            "timeframe": "any",
            "duration": "1-2",
            "durationUnit": "years",
            "description": "Calcified plaque present",
            "coreComponents": ["pentoxifylline", "vitamin_e"],
            "contraindicated": ["verapamil_topical"],
            "successBase": 35
        }
    });
    serde_json::from_value(records).expect("fixture stages")
}

pub fn reference() -> ReferenceData {
    ReferenceData::new(components(), interactions(), stages()).expect("fixture is consistent")
}

pub fn calculator() -> Calculator {
    Calculator::with_reference(reference())
}

/// Healthy 45-year-old adult, 75 kg.
pub fn healthy_profile(stage: StageId) -> PatientProfile {
    let mut profile = PatientProfile::new(75.0, 45.0, stage);
    profile.bmi = 24.5;
    profile
}
