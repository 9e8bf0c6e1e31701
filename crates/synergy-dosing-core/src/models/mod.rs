//! Domain models for the synergy-dosing system.

mod component;
mod interaction;
mod patient;
mod report;
mod results;
mod stage;

pub use component::*;
pub use interaction::*;
pub use patient::*;
pub use report::*;
pub use results::*;
pub use stage::*;
