//! Pairwise interaction models.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator used in the string form of a [`PairKey`].
pub const PAIR_SEPARATOR: char = '+';

/// Canonical unordered pair of component ids.
///
/// The two ids are stored sorted, so `PairKey::new("a", "b") == PairKey::new("b", "a")`.
/// Serializes as `"a+b"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, id: &str) -> bool {
        self.first == id || self.second == id
    }

    pub fn is_self_pair(&self) -> bool {
        self.first == self.second
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.first, PAIR_SEPARATOR, self.second)
    }
}

impl From<PairKey> for String {
    fn from(key: PairKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for PairKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.split_once(PAIR_SEPARATOR) {
            Some((a, b)) if !a.is_empty() && !b.is_empty() && !b.contains(PAIR_SEPARATOR) => {
                Ok(PairKey::new(a, b))
            }
            _ => Err(format!("invalid pair key '{value}', expected 'a{PAIR_SEPARATOR}b'")),
        }
    }
}

/// Kind of documented interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Synergy,
    Regeneration,
    Additive,
    Antagonism,
    /// Any type string not listed above
    #[serde(other)]
    Other,
}

/// Clinical significance of an interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Low,
    Moderate,
    High,
}

/// A documented interaction between two components.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub pair: PairKey,
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    /// Multiplicative effectiveness modifier (> 0)
    pub factor: f64,
    pub mechanism: String,
    pub significance: Significance,
    /// Chou-Talalay combination index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regeneration_rate: Option<f64>,
}

/// Combination-index interpretation bucket.
///
/// The first bucket is strict (`CI < 0.1`); every other bucket includes its
/// upper bound, so `CI = 0.7` falls in [`CiBucket::Synergism`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum CiBucket {
    /// CI < 0.1
    VeryStrongSynergism,
    /// 0.1 - 0.3
    StrongSynergism,
    /// 0.3 - 0.7
    Synergism,
    /// 0.7 - 0.85
    ModerateSynergism,
    /// 0.85 - 0.90
    SlightSynergism,
    /// 0.90 - 1.10
    NearlyAdditive,
    /// 1.10 - 1.20
    SlightAntagonism,
    /// 1.20 - 1.45
    ModerateAntagonism,
    /// 1.45 - 3.3
    Antagonism,
    /// CI > 3.3
    StrongAntagonism,
}

impl CiBucket {
    pub const ALL: [CiBucket; 10] = [
        CiBucket::VeryStrongSynergism,
        CiBucket::StrongSynergism,
        CiBucket::Synergism,
        CiBucket::ModerateSynergism,
        CiBucket::SlightSynergism,
        CiBucket::NearlyAdditive,
        CiBucket::SlightAntagonism,
        CiBucket::ModerateAntagonism,
        CiBucket::Antagonism,
        CiBucket::StrongAntagonism,
    ];

    /// Classify a combination index.
    pub fn classify(ci: f64) -> CiBucket {
        if ci < 0.1 {
            CiBucket::VeryStrongSynergism
        } else if ci <= 0.3 {
            CiBucket::StrongSynergism
        } else if ci <= 0.7 {
            CiBucket::Synergism
        } else if ci <= 0.85 {
            CiBucket::ModerateSynergism
        } else if ci <= 0.90 {
            CiBucket::SlightSynergism
        } else if ci <= 1.10 {
            CiBucket::NearlyAdditive
        } else if ci <= 1.20 {
            CiBucket::SlightAntagonism
        } else if ci <= 1.45 {
            CiBucket::ModerateAntagonism
        } else if ci <= 3.3 {
            CiBucket::Antagonism
        } else {
            CiBucket::StrongAntagonism
        }
    }

    /// Range label, e.g. `"0.3-0.7"`.
    pub fn range(self) -> &'static str {
        match self {
            CiBucket::VeryStrongSynergism => "<0.1",
            CiBucket::StrongSynergism => "0.1-0.3",
            CiBucket::Synergism => "0.3-0.7",
            CiBucket::ModerateSynergism => "0.7-0.85",
            CiBucket::SlightSynergism => "0.85-0.90",
            CiBucket::NearlyAdditive => "0.90-1.10",
            CiBucket::SlightAntagonism => "1.10-1.20",
            CiBucket::ModerateAntagonism => "1.20-1.45",
            CiBucket::Antagonism => "1.45-3.3",
            CiBucket::StrongAntagonism => ">3.3",
        }
    }

    /// Standard Chou-Talalay wording, used when reference data has no label.
    pub fn default_label(self) -> &'static str {
        match self {
            CiBucket::VeryStrongSynergism => "Very strong synergism",
            CiBucket::StrongSynergism => "Strong synergism",
            CiBucket::Synergism => "Synergism",
            CiBucket::ModerateSynergism => "Moderate synergism",
            CiBucket::SlightSynergism => "Slight synergism",
            CiBucket::NearlyAdditive => "Nearly additive",
            CiBucket::SlightAntagonism => "Slight antagonism",
            CiBucket::ModerateAntagonism => "Moderate antagonism",
            CiBucket::Antagonism => "Antagonism",
            CiBucket::StrongAntagonism => "Strong antagonism",
        }
    }
}

/// Synergy-strength labels per CI bucket, supplied by reference data.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CiScale {
    labels: BTreeMap<CiBucket, String>,
}

impl CiScale {
    pub fn new(labels: BTreeMap<CiBucket, String>) -> Self {
        Self { labels }
    }

    pub fn label(&self, bucket: CiBucket) -> &str {
        self.labels
            .get(&bucket)
            .map(String::as_str)
            .unwrap_or_else(|| bucket.default_label())
    }
}
