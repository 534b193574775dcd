//! Condition evaluation for daily physiological metrics.
//!
//! Each evaluator maps a raw daily measurement onto a [`ConditionLevel`]:
//! - Hunger: calorie intake against target
//! - Sleepiness: sleep duration and quality
//! - Thirst: water intake against target
//! - Energy: derived from the other three

use crate::{ConditionLevel, Conditions, DailyMetrics, Error, Result};

/// Calorie shortfall beyond which hunger is at least `High`
const HUNGER_SEVERE_DEFICIT: f64 = -500.0;
/// Calorie shortfall beyond which hunger is at least `Medium`
const HUNGER_MILD_DEFICIT: f64 = -200.0;
/// Relative deviation from target still considered on track
const HUNGER_TOLERANCE: f64 = 0.10;

/// Number of consecutive bad days that escalates a condition to `Critical`
const CRITICAL_STREAK_DAYS: u32 = 3;

/// Sleep quality at or below this (1-5 scale) is at least `High` sleepiness
const POOR_SLEEP_QUALITY: u8 = 2;

fn check_target(name: &str, target: f64) -> Result<()> {
    if !target.is_finite() || target <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "{} target must be a positive number, got {}",
            name, target
        )));
    }
    Ok(())
}

/// Classify hunger from calorie intake.
///
/// `target <= 0` is rejected rather than producing a meaningless ratio.
pub fn evaluate_hunger(
    target_calories: f64,
    actual_calories: f64,
    consecutive_deficit_days: u32,
) -> Result<ConditionLevel> {
    check_target("calorie", target_calories)?;

    let diff = actual_calories - target_calories;

    let level = if diff < HUNGER_SEVERE_DEFICIT && consecutive_deficit_days >= CRITICAL_STREAK_DAYS
    {
        ConditionLevel::Critical
    } else if diff < HUNGER_SEVERE_DEFICIT {
        ConditionLevel::High
    } else if diff < HUNGER_MILD_DEFICIT {
        ConditionLevel::Medium
    } else if (diff / target_calories).abs() <= HUNGER_TOLERANCE {
        ConditionLevel::Low
    } else {
        // Small deficits and any surplus beyond tolerance
        ConditionLevel::Medium
    };

    Ok(level)
}

/// Classify sleepiness from last night's sleep.
///
/// `quality` is on a 1-5 scale; `None` means it was not reported.
pub fn evaluate_sleepiness(
    sleep_minutes: u32,
    quality: Option<u8>,
    consecutive_low_sleep_days: u32,
) -> ConditionLevel {
    let hours = f64::from(sleep_minutes) / 60.0;
    let poor_quality = quality.is_some_and(|q| q <= POOR_SLEEP_QUALITY);

    if hours < 5.0 || consecutive_low_sleep_days >= CRITICAL_STREAK_DAYS {
        ConditionLevel::Critical
    } else if hours < 6.0 || poor_quality {
        ConditionLevel::High
    } else if (6.0..7.0).contains(&hours) || (hours > 9.0 && hours <= 10.0) {
        ConditionLevel::Medium
    } else if (7.0..=9.0).contains(&hours) {
        ConditionLevel::Low
    } else {
        // Oversleeping past ten hours
        ConditionLevel::Medium
    }
}

/// Classify thirst from water intake.
pub fn evaluate_thirst(
    target_water_ml: f64,
    actual_water_ml: f64,
    consecutive_deficit_days: u32,
) -> Result<ConditionLevel> {
    check_target("water", target_water_ml)?;

    let percent = actual_water_ml / target_water_ml * 100.0;

    let level = if percent < 70.0 && consecutive_deficit_days >= CRITICAL_STREAK_DAYS {
        ConditionLevel::Critical
    } else if percent < 70.0 {
        ConditionLevel::High
    } else if percent < 90.0 {
        ConditionLevel::Medium
    } else if percent <= 120.0 {
        ConditionLevel::Low
    } else {
        ConditionLevel::Medium
    };

    Ok(level)
}

/// Derive the (inverted) energy level from the other three conditions.
///
/// Never returns `Critical`: a fully depleted day tops out at `High`.
pub fn evaluate_energy(
    hunger: ConditionLevel,
    sleepiness: ConditionLevel,
    thirst: ConditionLevel,
) -> ConditionLevel {
    let inputs = [hunger, sleepiness, thirst];

    if inputs.contains(&ConditionLevel::Critical)
        || (hunger == ConditionLevel::High && sleepiness == ConditionLevel::High)
    {
        return ConditionLevel::High;
    }

    let strained = inputs
        .iter()
        .filter(|level| matches!(level, ConditionLevel::High | ConditionLevel::Medium))
        .count();

    if strained >= 2 {
        ConditionLevel::Medium
    } else {
        ConditionLevel::Low
    }
}

/// Run all four evaluators for one day.
///
/// A dimension with no data (missing target, intake or sleep record) is
/// neutral (`Low`). A present but non-positive target is an error.
pub fn evaluate_day(metrics: &DailyMetrics) -> Result<Conditions> {
    let hunger = match (metrics.calories_target, metrics.calories_actual) {
        (Some(target), Some(actual)) => {
            evaluate_hunger(target, actual, metrics.consecutive_deficit_days.unwrap_or(0))
                .map_err(|e| Error::InvalidInput(format!("{}: {}", metrics.date, e)))?
        }
        (Some(target), None) => {
            check_target("calorie", target)?;
            ConditionLevel::Low
        }
        _ => ConditionLevel::Low,
    };

    let thirst = match (metrics.water_target_ml, metrics.water_actual_ml) {
        (Some(target), Some(actual)) => {
            evaluate_thirst(target, actual, metrics.consecutive_water_deficit_days.unwrap_or(0))
                .map_err(|e| Error::InvalidInput(format!("{}: {}", metrics.date, e)))?
        }
        (Some(target), None) => {
            check_target("water", target)?;
            ConditionLevel::Low
        }
        _ => ConditionLevel::Low,
    };

    let sleepiness = match metrics.sleep_minutes {
        Some(minutes) => evaluate_sleepiness(
            minutes,
            metrics.sleep_quality.map(|q| q.score()),
            metrics.consecutive_low_sleep_days.unwrap_or(0),
        ),
        None => ConditionLevel::Low,
    };

    let energy = evaluate_energy(hunger, sleepiness, thirst);

    tracing::debug!(
        "{}: hunger={:?} sleepiness={:?} thirst={:?} energy={:?}",
        metrics.date,
        hunger,
        sleepiness,
        thirst,
        energy
    );

    Ok(Conditions {
        hunger,
        sleepiness,
        thirst,
        energy,
    })
}
