//! Level progression: XP curve, level-ups and the max-health formula.
//!
//! Progression rules:
//! - XP needed to reach level `n` grows quadratically: `100 * (n - 1)^2`
//! - Max health grows linearly with level: `100 + (level - 1) * 5`
//! - Each level gained grants +10 health, capped at the new max

use crate::Stats;
use serde::Serialize;

/// Highest reachable level; the level search stops here
pub const MAX_LEVEL: u32 = 100;

const BASE_MAX_HEALTH: i32 = 100;
const MAX_HEALTH_PER_LEVEL: i32 = 5;
const LEVEL_UP_HEAL: i32 = 10;
const XP_CURVE_FACTOR: u64 = 100;

/// Max health for a level
pub fn max_health(level: u32) -> i32 {
    let steps = i64::from(level.max(1) - 1);
    let value = i64::from(BASE_MAX_HEALTH) + steps * i64::from(MAX_HEALTH_PER_LEVEL);
    value.min(i64::from(i32::MAX)) as i32
}

/// Total XP required to reach `level`
pub fn xp_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let steps = u64::from(level - 1);
    XP_CURVE_FACTOR.saturating_mul(steps).saturating_mul(steps)
}

/// Level for a total XP amount.
///
/// Linear ascent from level 1. XP at or beyond the start of the level after
/// [`MAX_LEVEL`] means the input is malformed; it is logged and capped.
pub fn level_from_xp(total_xp: u64) -> u32 {
    let level = search_level(total_xp);
    if exceeds_level_cap(total_xp) {
        tracing::warn!(
            "XP total {} exceeds the level {} range; capping level",
            total_xp,
            MAX_LEVEL
        );
    }
    level
}

/// True when `total_xp` lies past the top of the level curve
pub fn exceeds_level_cap(total_xp: u64) -> bool {
    total_xp >= xp_for_level(MAX_LEVEL + 1)
}

fn search_level(total_xp: u64) -> u32 {
    (1..=MAX_LEVEL)
        .find(|&level| total_xp < xp_for_level(level + 1))
        .unwrap_or(MAX_LEVEL)
}

/// Fraction of the way from `current_level` to the next level, in `[0, 1]`
pub fn level_progress(current_xp: u64, current_level: u32) -> f64 {
    if current_level >= MAX_LEVEL {
        return 1.0;
    }

    let floor = xp_for_level(current_level);
    let ceiling = xp_for_level(current_level + 1);
    let span = ceiling.saturating_sub(floor);

    if span == 0 {
        return 1.0;
    }

    let earned = current_xp as f64 - floor as f64;
    (earned / span as f64).clamp(0.0, 1.0)
}

/// Result of a single level-up check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelUp {
    pub level: u32,
    pub health: i32,
    pub max_health: i32,
    pub leveled_up: bool,
}

/// Advance one level if the XP total has earned it.
///
/// Grants +10 health capped at the new level's max health. Call repeatedly
/// until `leveled_up` is false so that a large XP jump cascades one level at
/// a time.
///
/// XP past the level cap is not logged here; the replay reports it once.
pub fn check_level_up(current_level: u32, current_xp: u64, current_health: i32) -> LevelUp {
    let earned_level = search_level(current_xp);

    if earned_level > current_level {
        let level = current_level + 1;
        let cap = max_health(level);
        let health = current_health.saturating_add(LEVEL_UP_HEAL).clamp(1, cap);

        tracing::debug!(
            "Level up: {} -> {} (health {} / {})",
            current_level,
            level,
            health,
            cap
        );

        return LevelUp {
            level,
            health,
            max_health: cap,
            leveled_up: true,
        };
    }

    LevelUp {
        level: current_level,
        health: current_health,
        max_health: max_health(current_level),
        leveled_up: false,
    }
}

/// Resolve every pending level-up on a snapshot.
///
/// Returns the number of levels gained.
pub fn apply_level_ups(stats: &mut Stats) -> u32 {
    let mut gained = 0;

    loop {
        let outcome = check_level_up(stats.level, stats.xp, stats.health);
        stats.level = outcome.level;
        stats.max_health = outcome.max_health;
        stats.health = outcome.health.clamp(1, outcome.max_health);

        if !outcome.leveled_up {
            break;
        }
        gained += 1;
    }

    gained
}

/// Fresh character: level 1, no XP, full health, every stat at zero
pub fn create_initial_stats() -> Stats {
    Stats {
        strength: 0,
        endurance: 0,
        flexibility: 0,
        agility: 0,
        speed: 0,
        reflex: 0,
        hunger: 0,
        thirst: 0,
        sleepiness: 0,
        energy: 0,
        health: BASE_MAX_HEALTH,
        max_health: max_health(1),
        level: 1,
        xp: 0,
    }
}

/// One row of the level curve
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LevelRow {
    pub level: u32,
    pub xp_required: u64,
    pub max_health: i32,
}

/// Level curve from level 1 through `up_to` (capped at [`MAX_LEVEL`])
pub fn level_table(up_to: u32) -> Vec<LevelRow> {
    (1..=up_to.clamp(1, MAX_LEVEL))
        .map(|level| LevelRow {
            level,
            xp_required: xp_for_level(level),
            max_health: max_health(level),
        })
        .collect()
}
