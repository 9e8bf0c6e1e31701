//! Reference data loader.
//!
//! Record sets are JSON objects keyed by id:
//!
//! - components: `{ "<id>": Component }`; the key becomes the component id
//! - interactions: `{ "<a>+<b>": Interaction }`, or a legacy `"<a>_<b>"` key,
//!   or any key with an explicit `"components": [a, b]` field
//! - stages: `{ "<stage id>": Stage }`
//! - CI scale (optional): `{ "<bucket>": "<label>" }`

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use synergy_dosing_core::models::{
    CiScale, Component, Interaction, InteractionKind, PairKey, Significance, Stage, StageId,
    PAIR_SEPARATOR,
};
use synergy_dosing_core::reference::ReferenceData;
use synergy_dosing_core::DosingError;

use crate::validation::{validate_component, validate_interaction, validate_stage};
use crate::{bundled, DataConfig, DataError, DataResult};

/// Raw text of the four record sets.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSources {
    pub components: String,
    pub interactions: String,
    pub stages: String,
    pub ci_scale: Option<String>,
}

/// Interaction record as stored on disk; the pair comes from the key.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InteractionRecord {
    #[serde(default)]
    components: Option<[String; 2]>,
    #[serde(rename = "type")]
    kind: InteractionKind,
    factor: f64,
    #[serde(default)]
    mechanism: String,
    significance: Significance,
    #[serde(default)]
    combination_index: Option<f64>,
    #[serde(default)]
    regeneration_rate: Option<f64>,
}

/// Loads and validates reference data according to a [`DataConfig`].
pub struct ReferenceLoader<'a> {
    config: &'a DataConfig,
}

impl<'a> ReferenceLoader<'a> {
    pub fn new(config: &'a DataConfig) -> Self {
        Self { config }
    }

    /// Load from the configured directory, or the bundled set if none.
    pub fn load(&self) -> DataResult<ReferenceData> {
        let sources = match &self.config.data_dir {
            Some(dir) => self.read_sources(dir)?,
            None => {
                tracing::debug!("No data directory configured, using bundled reference data");
                bundled::sources()
            }
        };
        parse_sources(&sources)
    }

    /// Read the record files from a directory. The CI scale file may be absent.
    pub fn read_sources(&self, dir: &Path) -> DataResult<ReferenceSources> {
        tracing::info!(dir = %dir.display(), "Reading reference data");

        let ci_path = dir.join(&self.config.ci_scale_file);
        let ci_scale = if ci_path.is_file() {
            Some(read_file(&ci_path)?)
        } else {
            tracing::debug!(path = %ci_path.display(), "No CI scale file, using default labels");
            None
        };

        Ok(ReferenceSources {
            components: read_file(&dir.join(&self.config.components_file))?,
            interactions: read_file(&dir.join(&self.config.interactions_file))?,
            stages: read_file(&dir.join(&self.config.stages_file))?,
            ci_scale,
        })
    }
}

fn read_file(path: &Path) -> DataResult<String> {
    std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse_json<'de, T: Deserialize<'de>>(file: &str, text: &'de str) -> DataResult<T> {
    serde_json::from_str(text).map_err(|source| DataError::Json {
        file: file.to_string(),
        source,
    })
}

/// Parse, validate and assemble reference data from raw record sets.
///
/// Every record-level problem is collected before failing with
/// [`DataError::Validation`].
pub fn parse_sources(sources: &ReferenceSources) -> DataResult<ReferenceData> {
    let mut errors = Vec::new();

    let raw_components: BTreeMap<String, Component> =
        parse_json("components", &sources.components)?;
    let mut components = Vec::with_capacity(raw_components.len());
    for (key, mut component) in raw_components {
        if component.id.is_empty() {
            component.id = key;
        } else if component.id != key {
            errors.push(format!(
                "component key '{key}' does not match its id '{}'",
                component.id
            ));
            continue;
        }
        errors.extend(validate_component(&component));
        components.push(component);
    }

    let known: BTreeSet<String> = components.iter().map(|c| c.id.clone()).collect();
    let raw_interactions: BTreeMap<String, InteractionRecord> =
        parse_json("interactions", &sources.interactions)?;
    let mut interactions = Vec::with_capacity(raw_interactions.len());
    for (key, record) in raw_interactions {
        let pair = match resolve_pair_key(&key, record.components.as_ref(), |id| known.contains(id)) {
            Ok(pair) => pair,
            Err(message) => {
                errors.push(message);
                continue;
            }
        };
        let interaction = Interaction {
            pair,
            kind: record.kind,
            factor: record.factor,
            mechanism: record.mechanism,
            significance: record.significance,
            combination_index: record.combination_index,
            regeneration_rate: record.regeneration_rate,
        };
        errors.extend(validate_interaction(&interaction));
        interactions.push(interaction);
    }

    let raw_stages: BTreeMap<String, Stage> = parse_json("stages", &sources.stages)?;
    let mut stages = BTreeMap::new();
    for (key, stage) in raw_stages {
        match key.parse::<StageId>() {
            Ok(id) => {
                errors.extend(validate_stage(id, &stage));
                stages.insert(id, stage);
            }
            Err(message) => errors.push(message),
        }
    }

    let ci_scale = match &sources.ci_scale {
        Some(text) => parse_json::<CiScale>("ci_scale", text)?,
        None => CiScale::default(),
    };

    if !errors.is_empty() {
        tracing::warn!(count = errors.len(), "Reference data failed validation");
        return Err(DataError::Validation(errors));
    }

    let (component_count, interaction_count, stage_count) =
        (components.len(), interactions.len(), stages.len());
    let reference = ReferenceData::new(components, interactions, stages)
        .map_err(|err| match err {
            DosingError::ValidationFailed(errors) => DataError::Validation(errors),
            other => DataError::Core(other),
        })?
        .with_ci_scale(ci_scale);

    tracing::info!(
        components = component_count,
        interactions = interaction_count,
        stages = stage_count,
        "Reference data loaded"
    );
    Ok(reference)
}

/// Canonical pair for an interaction record key.
///
/// An explicit component list wins. Otherwise `a+b` is split on the
/// separator, and a legacy `a_b` key is split at whichever underscore leaves
/// two known component ids. Exactly one such split must exist.
pub fn resolve_pair_key(
    key: &str,
    explicit: Option<&[String; 2]>,
    is_known: impl Fn(&str) -> bool,
) -> Result<PairKey, String> {
    if let Some([a, b]) = explicit {
        return Ok(PairKey::new(a.as_str(), b.as_str()));
    }

    if key.contains(PAIR_SEPARATOR) {
        return PairKey::try_from(key.to_string());
    }

    let splits: Vec<PairKey> = key
        .match_indices('_')
        .map(|(i, _)| (&key[..i], &key[i + 1..]))
        .filter(|(a, b)| is_known(a) && is_known(b))
        .map(|(a, b)| PairKey::new(a, b))
        .collect();

    match splits.as_slice() {
        [pair] => {
            tracing::debug!(key, pair = %pair, "Resolved legacy interaction key");
            Ok(pair.clone())
        }
        [] => Err(format!(
            "interaction key '{key}' does not name two known components"
        )),
        _ => Err(format!(
            "interaction key '{key}' is ambiguous; use 'a{PAIR_SEPARATOR}b' or a components field"
        )),
    }
}
