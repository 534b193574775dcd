//! Daily health impact from physiological conditions.
//!
//! Each condition factor has a constant table mapping a severity level to a
//! `{min, max}` range of daily health change. A factor contributes the midpoint
//! of its range.

use crate::{ConditionLevel, Conditions, HealthImpact};
use serde::Serialize;

/// Inclusive range of daily health change for one severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ImpactRange {
    pub min: i32,
    pub max: i32,
}

impl ImpactRange {
    const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f64 {
        f64::from(self.min + self.max) / 2.0
    }
}

/// Condition dimensions that carry a health impact
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HealthFactor {
    Hunger,
    Sleepiness,
    Thirst,
    Energy,
}

impl HealthFactor {
    pub const ALL: [HealthFactor; 4] = [
        HealthFactor::Hunger,
        HealthFactor::Sleepiness,
        HealthFactor::Thirst,
        HealthFactor::Energy,
    ];
}

// Rows indexed by ConditionLevel::index(): low, medium, high, critical

const HUNGER_IMPACT: [ImpactRange; 4] = [
    ImpactRange::new(5, 5),
    ImpactRange::new(-5, 0),
    ImpactRange::new(-10, -5),
    ImpactRange::new(-20, -10),
];

const SLEEPINESS_IMPACT: [ImpactRange; 4] = [
    ImpactRange::new(5, 5),
    ImpactRange::new(-5, 0),
    ImpactRange::new(-15, -5),
    ImpactRange::new(-25, -15),
];

const THIRST_IMPACT: [ImpactRange; 4] = [
    ImpactRange::new(3, 3),
    ImpactRange::new(-5, -1),
    ImpactRange::new(-10, -5),
    ImpactRange::new(-20, -10),
];

const ENERGY_IMPACT: [ImpactRange; 4] = [
    ImpactRange::new(2, 2),
    ImpactRange::new(-2, 0),
    ImpactRange::new(-8, -4),
    ImpactRange::new(-15, -10),
];

/// Look up the impact range for a factor at a severity level
pub fn impact_range(factor: HealthFactor, level: ConditionLevel) -> ImpactRange {
    let table = match factor {
        HealthFactor::Hunger => &HUNGER_IMPACT,
        HealthFactor::Sleepiness => &SLEEPINESS_IMPACT,
        HealthFactor::Thirst => &THIRST_IMPACT,
        HealthFactor::Energy => &ENERGY_IMPACT,
    };
    table[level.index()]
}

/// Convert a day's conditions into a health delta
pub fn calculate_health_impact(conditions: &Conditions) -> HealthImpact {
    let hunger = impact_range(HealthFactor::Hunger, conditions.hunger).midpoint();
    let sleepiness = impact_range(HealthFactor::Sleepiness, conditions.sleepiness).midpoint();
    let thirst = impact_range(HealthFactor::Thirst, conditions.thirst).midpoint();
    let energy = impact_range(HealthFactor::Energy, conditions.energy).midpoint();

    HealthImpact {
        hunger,
        sleepiness,
        thirst,
        energy,
        total: hunger + sleepiness + thirst + energy,
    }
}

/// Apply a health delta, keeping the result in `[1, max_health]`.
///
/// Health never reaches zero.
pub fn apply_health_change(current: i32, max_health: i32, delta: i32) -> i32 {
    current.saturating_add(delta).clamp(1, max_health.max(1))
}
