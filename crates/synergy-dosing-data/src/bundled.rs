//! Seed reference data compiled into the binary.

use crate::loader::ReferenceSources;

pub const COMPONENTS_JSON: &str = include_str!("../data/components.json");
pub const INTERACTIONS_JSON: &str = include_str!("../data/interactions.json");
pub const STAGES_JSON: &str = include_str!("../data/stages.json");
pub const CI_SCALE_JSON: &str = include_str!("../data/ci_scale.json");

pub fn sources() -> ReferenceSources {
    ReferenceSources {
        components: COMPONENTS_JSON.to_string(),
        interactions: INTERACTIONS_JSON.to_string(),
        stages: STAGES_JSON.to_string(),
        ci_scale: Some(CI_SCALE_JSON.to_string()),
    }
}
