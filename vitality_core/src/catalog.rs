//! Base workout effect tables.
//!
//! Each workout type maps ascending duration breakpoints (minutes) to the
//! unadjusted effect of a session of at least that length. Condition
//! modifiers are applied later by the workout calculator.

use crate::WorkoutEffect;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashMap};

/// One tabulated row: breakpoint minutes, physical deltas
/// (strength, endurance, flexibility, agility, speed, reflex),
/// physiological deltas (hunger, thirst, sleepiness, energy), health, xp.
type Row = (u32, [i32; 6], [i32; 4], i32, u32);

const STRENGTH: &[Row] = &[
    (15, [2, 0, 0, 0, 0, 0], [5, 5, 2, -5], 0, 10),
    (30, [4, 1, 0, 0, 0, 0], [10, 10, 4, -10], 1, 20),
    (45, [6, 1, 1, 0, 0, 0], [15, 15, 6, -15], 1, 30),
    (60, [8, 2, 1, 1, 0, 0], [20, 20, 8, -20], 0, 40),
    (90, [10, 3, 1, 1, 0, 0], [30, 30, 12, -30], -2, 55),
];

const RUNNING: &[Row] = &[
    (10, [0, 1, 0, 0, 1, 0], [3, 6, 1, -4], 0, 8),
    (20, [0, 2, 0, 1, 1, 0], [6, 12, 2, -8], 1, 15),
    (30, [0, 3, 0, 1, 2, 0], [9, 18, 3, -12], 1, 22),
    (45, [1, 5, 0, 1, 3, 0], [14, 26, 5, -18], 1, 32),
    (60, [1, 6, 1, 2, 4, 0], [18, 34, 7, -24], 0, 42),
    (90, [1, 8, 1, 2, 5, 1], [26, 48, 10, -34], -2, 58),
];

const CYCLING: &[Row] = &[
    (15, [1, 1, 0, 0, 1, 0], [4, 6, 1, -4], 0, 8),
    (30, [1, 3, 0, 0, 2, 0], [8, 12, 2, -8], 1, 18),
    (60, [2, 5, 0, 1, 3, 0], [16, 24, 5, -16], 1, 35),
    (90, [3, 7, 0, 1, 4, 0], [24, 36, 8, -24], -1, 50),
];

const SWIMMING: &[Row] = &[
    (15, [1, 1, 1, 1, 0, 0], [5, 2, 2, -5], 0, 10),
    (30, [1, 3, 1, 1, 1, 1], [10, 4, 4, -10], 1, 20),
    (45, [2, 4, 2, 1, 2, 1], [15, 6, 6, -15], 1, 30),
    (60, [2, 6, 2, 2, 2, 1], [20, 8, 8, -20], 1, 40),
];

const ELLIPTICAL: &[Row] = &[
    (15, [0, 1, 0, 0, 1, 0], [3, 5, 1, -3], 0, 7),
    (30, [0, 2, 0, 1, 1, 0], [6, 10, 2, -6], 1, 15),
    (45, [0, 3, 0, 1, 2, 0], [9, 15, 3, -9], 1, 22),
    (60, [1, 4, 0, 1, 2, 0], [12, 20, 4, -12], 1, 30),
];

const HIIT: &[Row] = &[
    (10, [1, 1, 0, 1, 1, 1], [5, 8, 2, -8], 0, 12),
    (20, [2, 2, 0, 2, 2, 2], [10, 15, 4, -15], 0, 25),
    (30, [3, 3, 0, 3, 3, 2], [15, 22, 6, -22], -1, 35),
    (45, [4, 4, 0, 3, 4, 3], [22, 30, 9, -30], -3, 48),
];

const WALKING: &[Row] = &[
    (15, [0, 1, 0, 0, 0, 0], [2, 2, 0, 0], 1, 4),
    (30, [0, 1, 0, 0, 0, 0], [3, 4, 0, 0], 1, 8),
    (60, [0, 2, 0, 1, 0, 0], [6, 8, 1, -2], 2, 15),
    (90, [0, 3, 0, 1, 0, 0], [9, 12, 2, -4], 2, 22),
];

const YOGA: &[Row] = &[
    (15, [0, 0, 2, 1, 0, 0], [1, 1, 0, 2], 1, 5),
    (30, [0, 0, 3, 1, 0, 1], [2, 2, 0, 3], 2, 10),
    (60, [1, 1, 5, 2, 0, 1], [4, 4, 0, 4], 3, 20),
];

const STRETCHING: &[Row] = &[
    (10, [0, 0, 1, 0, 0, 0], [0, 1, 0, 1], 1, 3),
    (20, [0, 0, 2, 0, 0, 0], [1, 1, 0, 2], 1, 6),
    (30, [0, 0, 3, 1, 0, 0], [1, 2, 0, 2], 1, 9),
];

const PILATES: &[Row] = &[
    (15, [1, 0, 1, 1, 0, 0], [2, 2, 1, 0], 1, 6),
    (30, [1, 1, 2, 1, 0, 1], [4, 4, 1, -2], 1, 12),
    (45, [2, 1, 3, 2, 0, 1], [6, 6, 2, -4], 2, 18),
    (60, [2, 2, 3, 2, 0, 1], [8, 8, 3, -6], 2, 24),
];

const BREATHING: &[Row] = &[
    (5, [0, 0, 0, 0, 0, 1], [0, 0, -1, 2], 1, 2),
    (15, [0, 0, 0, 0, 0, 1], [0, 0, -2, 4], 2, 4),
];

const RAW_TABLES: &[(&str, &[Row])] = &[
    ("strength", STRENGTH),
    ("running", RUNNING),
    ("cycling", CYCLING),
    ("swimming", SWIMMING),
    ("elliptical", ELLIPTICAL),
    ("hiit", HIIT),
    ("walking", WALKING),
    ("yoga", YOGA),
    ("stretching", STRETCHING),
    ("pilates", PILATES),
    ("breathing", BREATHING),
];

/// Duration-bucketed base effects for one workout type
#[derive(Clone, Debug)]
pub struct EffectTable {
    buckets: BTreeMap<u32, WorkoutEffect>,
}

impl EffectTable {
    fn from_rows(rows: &[Row]) -> Self {
        let buckets = rows
            .iter()
            .map(|(minutes, physical, physiological, health, xp)| {
                let effect = WorkoutEffect {
                    strength: physical[0],
                    endurance: physical[1],
                    flexibility: physical[2],
                    agility: physical[3],
                    speed: physical[4],
                    reflex: physical[5],
                    hunger: physiological[0],
                    thirst: physiological[1],
                    sleepiness: physiological[2],
                    energy: physiological[3],
                    health: *health,
                    xp: *xp,
                };
                (*minutes, effect)
            })
            .collect();
        Self { buckets }
    }

    /// Effect for a session of `minutes`.
    ///
    /// Picks the largest breakpoint not above `minutes`; sessions shorter than
    /// every breakpoint get the smallest bucket.
    pub fn lookup(&self, minutes: f64) -> Option<&WorkoutEffect> {
        // Breakpoints are whole minutes, so flooring preserves the comparison
        let whole = if minutes.is_finite() && minutes > 0.0 {
            minutes.floor().min(f64::from(u32::MAX)) as u32
        } else {
            0
        };

        self.buckets
            .range(..=whole)
            .next_back()
            .or_else(|| self.buckets.iter().next())
            .map(|(_, effect)| effect)
    }

    /// Breakpoints in ascending order
    pub fn breakpoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.buckets.keys().copied()
    }
}

/// Cached base tables - built once and reused across all replays
static BASE_TABLES: Lazy<HashMap<&'static str, EffectTable>> = Lazy::new(|| {
    RAW_TABLES
        .iter()
        .map(|(kind, rows)| (*kind, EffectTable::from_rows(rows)))
        .collect()
});

/// Normalise a free-form workout type string to a table key.
///
/// Lowercases, trims, and folds common short forms ("run", "bike", "stretch").
pub fn canonical_workout_type(kind: &str) -> String {
    let lowered = kind.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    let canonical = match lowered.as_str() {
        "run" | "jog" | "jogging" => "running",
        "bike" | "cycle" | "biking" => "cycling",
        "swim" => "swimming",
        "walk" => "walking",
        "stretch" => "stretching",
        "weights" | "weight_training" | "strength_training" => "strength",
        "breath" | "breathwork" => "breathing",
        other => other,
    };
    canonical.to_string()
}

/// Base table for a workout type, or `None` if the type is not tabulated
pub fn effect_table(kind: &str) -> Option<&'static EffectTable> {
    BASE_TABLES.get(canonical_workout_type(kind).as_str())
}

/// Unadjusted effect for a session, or `None` for an unknown workout type
pub fn base_effect(kind: &str, minutes: f64) -> Option<&'static WorkoutEffect> {
    effect_table(kind).and_then(|table| table.lookup(minutes))
}

/// All tabulated workout types, sorted
pub fn known_workout_types() -> Vec<&'static str> {
    let mut kinds: Vec<_> = BASE_TABLES.keys().copied().collect();
    kinds.sort_unstable();
    kinds
}

/// Validate the raw tables
///
/// Returns a list of validation errors (empty if valid).
pub fn validate_tables() -> Vec<String> {
    let mut errors = Vec::new();

    for (kind, rows) in RAW_TABLES {
        if rows.is_empty() {
            errors.push(format!("Workout '{}' has no duration buckets", kind));
            continue;
        }

        if rows.windows(2).any(|w| w[0].0 >= w[1].0) {
            errors.push(format!(
                "Workout '{}': breakpoints are not strictly ascending",
                kind
            ));
        }

        for (minutes, physical, _, _, xp) in rows.iter() {
            if *minutes == 0 {
                errors.push(format!("Workout '{}': zero-minute breakpoint", kind));
            }
            if physical.iter().any(|delta| *delta < 0) {
                errors.push(format!(
                    "Workout '{}' @ {}min: negative physical delta",
                    kind, minutes
                ));
            }
            if *xp == 0 {
                errors.push(format!("Workout '{}' @ {}min: zero xp", kind, minutes));
            }
        }
    }

    errors
}
