//! Immutable reference data store.
//!
//! Built once from validated records and shared read-only by every engine.
//! Integrity rules (known ids, one record per unordered pair) are enforced
//! here, at construction, rather than at query time.

use std::collections::BTreeMap;

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::models::{CiScale, Component, Interaction, PairKey, Stage, StageId};
use crate::{DosingError, DosingResult, RecordKind};

/// Minimum similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Components, interactions, stage protocols and the CI label scale.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    components: BTreeMap<String, Component>,
    interactions: BTreeMap<PairKey, Interaction>,
    stages: BTreeMap<StageId, Stage>,
    ci_scale: CiScale,
}

impl ReferenceData {
    /// Build a store, checking referential integrity.
    ///
    /// All problems are collected and reported together as `ValidationFailed`.
    pub fn new(
        components: Vec<Component>,
        interactions: Vec<Interaction>,
        stages: BTreeMap<StageId, Stage>,
    ) -> DosingResult<Self> {
        let mut errors = Vec::new();

        let mut component_map = BTreeMap::new();
        for component in components {
            if component.id.trim().is_empty() {
                errors.push(format!("component '{}' has an empty id", component.name));
                continue;
            }
            if let Some(previous) = component_map.insert(component.id.clone(), component) {
                errors.push(format!("duplicate component id '{}'", previous.id));
            }
        }

        let mut interaction_map = BTreeMap::new();
        for interaction in interactions {
            let pair = interaction.pair.clone();
            if pair.is_self_pair() {
                errors.push(format!("interaction '{pair}' pairs a component with itself"));
            }
            for id in [pair.first(), pair.second()] {
                if !component_map.contains_key(id) {
                    errors.push(format!("interaction '{pair}' references unknown component '{id}'"));
                }
            }
            if interaction_map.insert(pair.clone(), interaction).is_some() {
                errors.push(format!("more than one interaction record for pair '{pair}'"));
            }
        }

        for (stage_id, stage) in &stages {
            for id in stage.referenced_components() {
                if !component_map.contains_key(id) {
                    errors.push(format!("stage '{stage_id}' references unknown component '{id}'"));
                }
            }
        }

        if !errors.is_empty() {
            return Err(DosingError::ValidationFailed(errors));
        }

        tracing::debug!(
            components = component_map.len(),
            interactions = interaction_map.len(),
            stages = stages.len(),
            "Reference data assembled"
        );

        Ok(Self {
            components: component_map,
            interactions: interaction_map,
            stages,
            ci_scale: CiScale::default(),
        })
    }

    /// Replace the CI label scale.
    pub fn with_ci_scale(mut self, ci_scale: CiScale) -> Self {
        self.ci_scale = ci_scale;
        self
    }

    /// Look up a component, failing with `NotFound` (with a suggestion) if unknown.
    pub fn component(&self, id: &str) -> DosingResult<&Component> {
        self.components.get(id).ok_or_else(|| DosingError::NotFound {
            kind: RecordKind::Component,
            id: id.to_string(),
            suggestion: self.suggest_component(id),
        })
    }

    pub fn has_component(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Look up a stage protocol.
    pub fn stage(&self, id: StageId) -> DosingResult<&Stage> {
        self.stages.get(&id).ok_or_else(|| DosingError::NotFound {
            kind: RecordKind::Stage,
            id: id.to_string(),
            suggestion: None,
        })
    }

    pub fn stages(&self) -> impl Iterator<Item = (StageId, &Stage)> {
        self.stages.iter().map(|(id, stage)| (*id, stage))
    }

    /// Interaction record for an unordered pair, if one is documented.
    pub fn interaction(&self, a: &str, b: &str) -> Option<&Interaction> {
        self.interactions.get(&PairKey::new(a, b))
    }

    pub fn interactions(&self) -> impl Iterator<Item = &Interaction> {
        self.interactions.values()
    }

    pub fn ci_scale(&self) -> &CiScale {
        &self.ci_scale
    }

    /// Components ranked by similarity of id or name to a query, best first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<(&Component, f64)> {
        let query = query.trim().to_lowercase();
        let mut scored: Vec<(&Component, f64)> = self
            .components
            .values()
            .map(|c| {
                let name_score = name_similarity(&query, &c.name.to_lowercase());
                let id_score = name_similarity(&query, &c.id.to_lowercase());
                (c, name_score.max(id_score))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        scored.truncate(limit);
        scored
    }

    fn suggest_component(&self, id: &str) -> Option<String> {
        self.search(id, 1)
            .into_iter()
            .find(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .map(|(c, _)| c.id.clone())
    }
}

/// Similarity of two lowercase strings, 0.0 - 1.0.
fn name_similarity(a: &str, b: &str) -> f64 {
    if !a.is_empty() && b.contains(a) {
        return 1.0;
    }
    // Jaro-Winkler favours shared prefixes, Levenshtein overall edit distance
    jaro_winkler(a, b) * 0.6 + normalized_levenshtein(a, b) * 0.4
}
