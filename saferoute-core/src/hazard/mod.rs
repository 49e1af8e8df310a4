//! Hazard penalties for flooded segments near incidents and emergency services

mod penalize;

pub use penalize::{HazardPenalty, penalize, penalize_with};
