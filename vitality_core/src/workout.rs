//! Workout effect calculation.
//!
//! A workout's effect is its base table entry with the six physical gains
//! scaled by the day's condition multipliers. Physiological and health deltas
//! are taken from the table verbatim.

use crate::catalog;
use crate::modifiers::{combined_multiplier, mean_combined_multiplier};
use crate::{Conditions, PhysicalStat, PhysiologicalStat, Stats, WorkoutEffect};

/// Condition-adjusted effect of one workout.
///
/// Returns `None` for an unknown workout type; callers skip such workouts.
pub fn calculate_workout_effect(
    kind: &str,
    minutes: f64,
    conditions: &Conditions,
) -> Option<WorkoutEffect> {
    let base = catalog::base_effect(kind, minutes)?;
    Some(adjust_for_conditions(base, conditions))
}

/// Scale a base effect by the condition multiplier tables
pub fn adjust_for_conditions(base: &WorkoutEffect, conditions: &Conditions) -> WorkoutEffect {
    let mut adjusted = base.clone();

    for stat in PhysicalStat::ALL {
        let scaled = f64::from(base.physical(stat)) * combined_multiplier(conditions, stat);
        *adjusted.physical_mut(stat) = scaled.round() as i32;
    }

    adjusted.xp = (f64::from(base.xp) * mean_combined_multiplier(conditions)).round() as u32;

    adjusted
}

/// Apply a workout effect to a snapshot.
///
/// Stats are floored at zero, health is kept in `[1, max_health]` and the XP
/// delta is added. Level-ups are not resolved here; see
/// [`crate::progression::apply_level_ups`].
pub fn apply_workout_effect(current: &Stats, effect: &WorkoutEffect) -> Stats {
    let mut next = current.clone();

    for stat in PhysicalStat::ALL {
        let value = current.physical(stat).saturating_add(effect.physical(stat));
        *next.physical_mut(stat) = value.max(0);
    }

    for stat in PhysiologicalStat::ALL {
        let value = current
            .physiological(stat)
            .saturating_add(effect.physiological(stat));
        *next.physiological_mut(stat) = value.max(0);
    }

    next.health = crate::health::apply_health_change(current.health, current.max_health, effect.health);
    next.xp = current.xp.saturating_add(u64::from(effect.xp));

    next
}
