//! Core domain types for the progression engine.
//!
//! This module defines the value types shared by every calculator:
//! - Severity levels and the stat keys used by the lookup tables
//! - The character snapshot (`Stats`) and per-workout deltas
//! - Daily input metrics supplied by the caller
//! - Recovery output

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Severity and Stat Keys
// ============================================================================

/// Four-step severity classification for a daily condition.
///
/// Ordered `Low < Medium < High < Critical`. For energy the scale is inverted:
/// `Low` means plenty of energy, `High` means depleted.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConditionLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ConditionLevel {
    pub const ALL: [ConditionLevel; 4] = [
        ConditionLevel::Low,
        ConditionLevel::Medium,
        ConditionLevel::High,
        ConditionLevel::Critical,
    ];

    /// Row index into the constant lookup tables
    pub fn index(self) -> usize {
        match self {
            ConditionLevel::Low => 0,
            ConditionLevel::Medium => 1,
            ConditionLevel::High => 2,
            ConditionLevel::Critical => 3,
        }
    }
}

/// Physical stats trained by workouts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalStat {
    Strength,
    Endurance,
    Flexibility,
    Agility,
    Speed,
    Reflex,
}

impl PhysicalStat {
    pub const ALL: [PhysicalStat; 6] = [
        PhysicalStat::Strength,
        PhysicalStat::Endurance,
        PhysicalStat::Flexibility,
        PhysicalStat::Agility,
        PhysicalStat::Speed,
        PhysicalStat::Reflex,
    ];

    /// Column index into the constant lookup tables
    pub fn index(self) -> usize {
        match self {
            PhysicalStat::Strength => 0,
            PhysicalStat::Endurance => 1,
            PhysicalStat::Flexibility => 2,
            PhysicalStat::Agility => 3,
            PhysicalStat::Speed => 4,
            PhysicalStat::Reflex => 5,
        }
    }
}

/// Physiological stats accumulated by workouts
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PhysiologicalStat {
    Hunger,
    Thirst,
    Sleepiness,
    Energy,
}

impl PhysiologicalStat {
    pub const ALL: [PhysiologicalStat; 4] = [
        PhysiologicalStat::Hunger,
        PhysiologicalStat::Thirst,
        PhysiologicalStat::Sleepiness,
        PhysiologicalStat::Energy,
    ];
}

/// The four condition levels evaluated for one day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Conditions {
    pub hunger: ConditionLevel,
    pub sleepiness: ConditionLevel,
    pub thirst: ConditionLevel,
    pub energy: ConditionLevel,
}

impl Default for Conditions {
    /// Neutral conditions: every dimension at `Low`
    fn default() -> Self {
        Self {
            hunger: ConditionLevel::Low,
            sleepiness: ConditionLevel::Low,
            thirst: ConditionLevel::Low,
            energy: ConditionLevel::Low,
        }
    }
}

// ============================================================================
// Character Snapshot
// ============================================================================

/// Full character-progression state at a point in time.
///
/// `max_health` is always `progression::max_health(level)` and `health` stays in
/// `[1, max_health]`. Physical and physiological stats never drop below zero.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub strength: i32,
    pub endurance: i32,
    pub flexibility: i32,
    pub agility: i32,
    pub speed: i32,
    pub reflex: i32,

    pub hunger: i32,
    pub thirst: i32,
    pub sleepiness: i32,
    pub energy: i32,

    pub health: i32,
    pub max_health: i32,
    pub level: u32,
    pub xp: u64,
}

impl Default for Stats {
    fn default() -> Self {
        crate::progression::create_initial_stats()
    }
}

impl Stats {
    pub fn physical(&self, stat: PhysicalStat) -> i32 {
        match stat {
            PhysicalStat::Strength => self.strength,
            PhysicalStat::Endurance => self.endurance,
            PhysicalStat::Flexibility => self.flexibility,
            PhysicalStat::Agility => self.agility,
            PhysicalStat::Speed => self.speed,
            PhysicalStat::Reflex => self.reflex,
        }
    }

    pub fn physical_mut(&mut self, stat: PhysicalStat) -> &mut i32 {
        match stat {
            PhysicalStat::Strength => &mut self.strength,
            PhysicalStat::Endurance => &mut self.endurance,
            PhysicalStat::Flexibility => &mut self.flexibility,
            PhysicalStat::Agility => &mut self.agility,
            PhysicalStat::Speed => &mut self.speed,
            PhysicalStat::Reflex => &mut self.reflex,
        }
    }

    pub fn physiological(&self, stat: PhysiologicalStat) -> i32 {
        match stat {
            PhysiologicalStat::Hunger => self.hunger,
            PhysiologicalStat::Thirst => self.thirst,
            PhysiologicalStat::Sleepiness => self.sleepiness,
            PhysiologicalStat::Energy => self.energy,
        }
    }

    pub fn physiological_mut(&mut self, stat: PhysiologicalStat) -> &mut i32 {
        match stat {
            PhysiologicalStat::Hunger => &mut self.hunger,
            PhysiologicalStat::Thirst => &mut self.thirst,
            PhysiologicalStat::Sleepiness => &mut self.sleepiness,
            PhysiologicalStat::Energy => &mut self.energy,
        }
    }
}

/// One workout's contribution to the snapshot, already condition-adjusted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutEffect {
    pub strength: i32,
    pub endurance: i32,
    pub flexibility: i32,
    pub agility: i32,
    pub speed: i32,
    pub reflex: i32,

    pub hunger: i32,
    pub thirst: i32,
    pub sleepiness: i32,
    pub energy: i32,

    pub health: i32,
    pub xp: u32,
}

impl WorkoutEffect {
    pub fn physical(&self, stat: PhysicalStat) -> i32 {
        match stat {
            PhysicalStat::Strength => self.strength,
            PhysicalStat::Endurance => self.endurance,
            PhysicalStat::Flexibility => self.flexibility,
            PhysicalStat::Agility => self.agility,
            PhysicalStat::Speed => self.speed,
            PhysicalStat::Reflex => self.reflex,
        }
    }

    pub fn physical_mut(&mut self, stat: PhysicalStat) -> &mut i32 {
        match stat {
            PhysicalStat::Strength => &mut self.strength,
            PhysicalStat::Endurance => &mut self.endurance,
            PhysicalStat::Flexibility => &mut self.flexibility,
            PhysicalStat::Agility => &mut self.agility,
            PhysicalStat::Speed => &mut self.speed,
            PhysicalStat::Reflex => &mut self.reflex,
        }
    }

    pub fn physiological(&self, stat: PhysiologicalStat) -> i32 {
        match stat {
            PhysiologicalStat::Hunger => self.hunger,
            PhysiologicalStat::Thirst => self.thirst,
            PhysiologicalStat::Sleepiness => self.sleepiness,
            PhysiologicalStat::Energy => self.energy,
        }
    }
}

/// One day's physiology-driven health change
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HealthImpact {
    pub hunger: f64,
    pub sleepiness: f64,
    pub thirst: f64,
    pub energy: f64,
    pub total: f64,
}

impl HealthImpact {
    /// Total rounded to a whole health point
    pub fn rounded_total(&self) -> i32 {
        self.total.round() as i32
    }
}

// ============================================================================
// Daily Input Metrics
// ============================================================================

/// Self-reported sleep quality
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SleepQuality {
    Excellent,
    Good,
    Poor,
    VeryPoor,
}

impl SleepQuality {
    /// Position on the 1-5 scale used by the sleepiness evaluator
    pub fn score(self) -> u8 {
        match self {
            SleepQuality::Excellent => 5,
            SleepQuality::Good => 4,
            SleepQuality::Poor => 2,
            SleepQuality::VeryPoor => 1,
        }
    }
}

/// Subjective feeling of rest after waking
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SleepRest {
    Fully,
    Enough,
    NotEnough,
    VeryTired,
}

/// A single logged workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub category: String,
    pub minutes: f64,
}

impl WorkoutEntry {
    pub fn new(kind: impl Into<String>, category: impl Into<String>, minutes: f64) -> Self {
        Self {
            kind: kind.into(),
            category: category.into(),
            minutes,
        }
    }
}

/// Everything the engine knows about one calendar date.
///
/// Absent optional fields mean "no data" and contribute neutrally.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyMetrics {
    pub date: NaiveDate,

    #[serde(default)]
    pub sleep_minutes: Option<u32>,
    #[serde(default)]
    pub sleep_quality: Option<SleepQuality>,
    #[serde(default)]
    pub sleep_rest: Option<SleepRest>,

    #[serde(default)]
    pub workouts: Vec<WorkoutEntry>,

    #[serde(default)]
    pub calories_target: Option<f64>,
    #[serde(default)]
    pub calories_actual: Option<f64>,
    #[serde(default)]
    pub water_target_ml: Option<f64>,
    #[serde(default)]
    pub water_actual_ml: Option<f64>,

    #[serde(default)]
    pub consecutive_deficit_days: Option<u32>,
    #[serde(default)]
    pub consecutive_low_sleep_days: Option<u32>,
    #[serde(default)]
    pub consecutive_water_deficit_days: Option<u32>,

    #[serde(default)]
    pub fatigue_7_days_minutes: Option<f64>,
}

impl DailyMetrics {
    /// Empty record for a date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            sleep_minutes: None,
            sleep_quality: None,
            sleep_rest: None,
            workouts: Vec::new(),
            calories_target: None,
            calories_actual: None,
            water_target_ml: None,
            water_actual_ml: None,
            consecutive_deficit_days: None,
            consecutive_low_sleep_days: None,
            consecutive_water_deficit_days: None,
            fatigue_7_days_minutes: None,
        }
    }

    /// Total minutes of all workouts logged on this day
    pub fn workout_minutes(&self) -> f64 {
        self.workouts.iter().map(|w| w.minutes).sum()
    }

    /// Check the numeric contract of the record.
    ///
    /// Percentage targets are checked by the evaluators themselves.
    pub fn validate(&self) -> Result<()> {
        for workout in &self.workouts {
            if !workout.minutes.is_finite() || workout.minutes <= 0.0 {
                return Err(Error::InvalidInput(format!(
                    "{}: workout '{}' has non-positive duration {}",
                    self.date, workout.kind, workout.minutes
                )));
            }
        }

        if let Some(minutes) = self.fatigue_7_days_minutes {
            if !minutes.is_finite() || minutes < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "{}: rolling workout minutes must be >= 0, got {}",
                    self.date, minutes
                )));
            }
        }

        Ok(())
    }

    /// Fold a later record for the same date into this one.
    ///
    /// Values present on `later` win; workouts are appended.
    pub fn merge(&mut self, later: DailyMetrics) {
        self.sleep_minutes = later.sleep_minutes.or(self.sleep_minutes);
        self.sleep_quality = later.sleep_quality.or(self.sleep_quality);
        self.sleep_rest = later.sleep_rest.or(self.sleep_rest);
        self.workouts.extend(later.workouts);
        self.calories_target = later.calories_target.or(self.calories_target);
        self.calories_actual = later.calories_actual.or(self.calories_actual);
        self.water_target_ml = later.water_target_ml.or(self.water_target_ml);
        self.water_actual_ml = later.water_actual_ml.or(self.water_actual_ml);
        self.consecutive_deficit_days =
            later.consecutive_deficit_days.or(self.consecutive_deficit_days);
        self.consecutive_low_sleep_days =
            later.consecutive_low_sleep_days.or(self.consecutive_low_sleep_days);
        self.consecutive_water_deficit_days =
            later.consecutive_water_deficit_days.or(self.consecutive_water_deficit_days);
        self.fatigue_7_days_minutes = later.fatigue_7_days_minutes.or(self.fatigue_7_days_minutes);
    }
}

// ============================================================================
// Recovery Output
// ============================================================================

/// Readiness classification for a recovery total
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStatus {
    Recovered,
    Normal,
    OnEdge,
    NotRecovered,
}

/// Recovery score and the components it was built from
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecoveryBreakdown {
    pub sleep: i32,
    pub workload: i32,
    pub fatigue: i32,
    pub total: i32,
    pub status: RecoveryStatus,
}
