//! Synergy-Dosing Core Library
//!
//! Calculation engine for an educational multimodal therapy protocol dosing
//! calculator. Everything here is a pure function of immutable reference data
//! and a single patient profile.
//!
//! # Architecture
//!
//! ```text
//!          Patient profile + selected component ids
//!                             │
//!              ┌──────────────┴──────────────┐
//!              ▼                             ▼
//!        Dosing Engine               Interaction Engine
//!     (per-component doses)        (pairwise synergies, CI)
//!              │                             │
//!              └──────────────┬──────────────┘
//!                             ▼
//!                    Aggregation Engine ◄──── Stage Engine
//!                    (Calculator)             (durations, multipliers,
//!                             │                adherence, progress)
//!                             ▼
//!        doses · synergies · effectiveness · recommendations · warnings
//! ```
//!
//! # Core Principle
//!
//! **Reference data is loaded once and never mutated.** A [`Calculator`]
//! refuses to compute anything until it has been initialized with a
//! [`ReferenceData`] value, and every calculation builds fresh result values.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Component, Interaction, Stage, PatientProfile, results)
//! - [`reference`]: Immutable reference data store with integrity checks
//! - [`engine`]: Dosing, interaction, stage and aggregation engines

pub mod engine;
pub mod models;
pub mod reference;

// Re-export commonly used types
pub use engine::{
    combination_index, AggregationEngine, Calculator, DosingEngine, InteractionEngine,
    StageEngine,
};
pub use models::{
    CalculationResult, Component, DoseResult, Effectiveness, Interaction, PairKey,
    PatientProfile, Stage, StageId, SynergyResult, Warning,
};
pub use reference::ReferenceData;

use std::fmt;

/// Kind of record a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Component,
    Stage,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Component => f.write_str("Component"),
            RecordKind::Stage => f.write_str("Stage"),
        }
    }
}

/// Core error taxonomy.
///
/// Dose-range violations are not errors: they are reported as
/// [`models::DoseRangeCheck`] values and warnings.
#[derive(Debug, thiserror::Error)]
pub enum DosingError {
    #[error("{} not found: {}{}", .kind, .id, did_you_mean(.suggestion))]
    NotFound {
        kind: RecordKind,
        id: String,
        suggestion: Option<String>,
    },

    #[error("Calculator not initialized: reference data has not been loaded")]
    NotInitialized,

    #[error("Reference data failed validation: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

pub type DosingResult<T> = Result<T, DosingError>;
