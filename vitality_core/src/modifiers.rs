//! Condition multiplier tables.
//!
//! Three constant tables, one per condition dimension, map
//! `ConditionLevel x PhysicalStat` to a multiplier applied to a workout's
//! base physical gains.

use crate::{ConditionLevel, Conditions, PhysicalStat};

/// Condition dimensions that modulate workout gains
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModifierDimension {
    Sleepiness,
    Hunger,
    Thirst,
}

impl ModifierDimension {
    pub const ALL: [ModifierDimension; 3] = [
        ModifierDimension::Sleepiness,
        ModifierDimension::Hunger,
        ModifierDimension::Thirst,
    ];
}

// Rows: low, medium, high, critical
// Columns: strength, endurance, flexibility, agility, speed, reflex

const SLEEPINESS_MULTIPLIERS: [[f64; 6]; 4] = [
    [1.05, 1.05, 1.0, 1.05, 1.05, 1.05],
    [0.95, 0.95, 0.95, 0.9, 0.9, 0.9],
    [0.8, 0.8, 0.85, 0.75, 0.75, 0.7],
    [0.6, 0.6, 0.7, 0.55, 0.55, 0.5],
];

const HUNGER_MULTIPLIERS: [[f64; 6]; 4] = [
    [1.05, 1.0, 1.0, 1.0, 1.0, 1.0],
    [0.9, 0.9, 1.0, 0.95, 0.95, 1.0],
    [0.75, 0.75, 0.9, 0.85, 0.85, 0.9],
    [0.5, 0.55, 0.8, 0.7, 0.7, 0.8],
];

const THIRST_MULTIPLIERS: [[f64; 6]; 4] = [
    [1.0, 1.05, 1.0, 1.0, 1.0, 1.0],
    [0.95, 0.9, 0.95, 0.95, 0.95, 0.95],
    [0.85, 0.75, 0.85, 0.85, 0.8, 0.85],
    [0.7, 0.5, 0.7, 0.7, 0.6, 0.7],
];

/// Multiplier for one stat under one condition dimension
pub fn multiplier(dimension: ModifierDimension, level: ConditionLevel, stat: PhysicalStat) -> f64 {
    let table = match dimension {
        ModifierDimension::Sleepiness => &SLEEPINESS_MULTIPLIERS,
        ModifierDimension::Hunger => &HUNGER_MULTIPLIERS,
        ModifierDimension::Thirst => &THIRST_MULTIPLIERS,
    };
    table[level.index()][stat.index()]
}

/// Product of the sleepiness, hunger and thirst multipliers for a stat
pub fn combined_multiplier(conditions: &Conditions, stat: PhysicalStat) -> f64 {
    multiplier(ModifierDimension::Sleepiness, conditions.sleepiness, stat)
        * multiplier(ModifierDimension::Hunger, conditions.hunger, stat)
        * multiplier(ModifierDimension::Thirst, conditions.thirst, stat)
}

/// Mean of the six combined multipliers, used to scale XP
pub fn mean_combined_multiplier(conditions: &Conditions) -> f64 {
    let sum: f64 = PhysicalStat::ALL
        .iter()
        .map(|stat| combined_multiplier(conditions, *stat))
        .sum();
    sum / PhysicalStat::ALL.len() as f64
}
