#![forbid(unsafe_code)]

//! Core domain model and calculators for the Vitality progression engine.
//!
//! This crate provides:
//! - Domain types (conditions, stats, workout effects, daily metrics)
//! - Condition evaluation and daily health impact
//! - Workout effect tables and condition modifiers
//! - Level progression
//! - Recovery scoring
//! - Full-history replay with checkpointing

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod condition;
pub mod health;
pub mod catalog;
pub mod modifiers;
pub mod workout;
pub mod progression;
pub mod recovery;
pub mod history;
pub mod checkpoint;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use condition::{evaluate_day, evaluate_energy, evaluate_hunger, evaluate_sleepiness, evaluate_thirst};
pub use health::{apply_health_change, calculate_health_impact};
pub use workout::{apply_workout_effect, calculate_workout_effect};
pub use progression::{
    check_level_up, create_initial_stats, level_from_xp, level_progress, max_health, xp_for_level,
};
pub use recovery::calculate_recovery;
pub use history::History;
pub use checkpoint::Checkpoint;
pub use engine::{
    conditions_for, recovery_for, ConditionPolicy, ProgressionEngine, RecomputeOptions,
    ReplaySummary, Snapshot,
};
