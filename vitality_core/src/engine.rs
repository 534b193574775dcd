//! Progression orchestrator.
//!
//! The character snapshot is never mutated incrementally. Every recompute
//! starts from the initial stats and replays the whole history in ascending
//! date order:
//!
//! 1. Evaluate the day's conditions (or the uniform conditions, by policy)
//! 2. For each workout: condition-adjusted effect, apply, resolve level-ups
//! 3. Optionally apply the day's health impact
//!
//! Replaying the same history always yields the same snapshot. A
//! [`Checkpoint`] lets the engine skip an unchanged history prefix.

use crate::checkpoint::{fingerprint, Checkpoint};
use crate::condition::evaluate_day;
use crate::config::EngineConfig;
use crate::health::{apply_health_change, calculate_health_impact};
use crate::progression::{apply_level_ups, create_initial_stats, exceeds_level_cap, MAX_LEVEL};
use crate::recovery::{calculate_recovery, RecoveryInput};
use crate::workout::{apply_workout_effect, calculate_workout_effect};
use crate::{Conditions, DailyMetrics, History, RecoveryBreakdown, Result, Stats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days in the rolling workload window used for the fatigue penalty
pub const FATIGUE_WINDOW_DAYS: u32 = 7;

/// Which condition levels modulate a historical day's workouts
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ConditionPolicy {
    /// Each day's workouts use that day's own conditions
    #[default]
    PerDay,
    /// Every workout uses the conditions of the latest replayed day.
    ///
    /// Appending a day with worse conditions re-weights every earlier
    /// workout, so XP and level can drop after an append under this policy.
    UniformLatest,
}

/// Options for a replay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecomputeOptions {
    pub policy: ConditionPolicy,
    /// Apply each day's health impact after its workouts
    pub apply_daily_health: bool,
    /// Ignore days after this date; `None` replays everything
    pub as_of: Option<NaiveDate>,
}

impl RecomputeOptions {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            policy: config.condition_policy,
            apply_daily_health: config.apply_daily_health,
            as_of: None,
        }
    }

    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }
}

/// Counters collected during a replay
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReplaySummary {
    pub days_replayed: usize,
    pub workouts_applied: usize,
    pub workouts_skipped: usize,
    pub level_ups: u32,
    /// XP ran past the top of the level curve during the replay
    #[serde(default)]
    pub level_capped: bool,
}

/// Result of a recompute
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Snapshot {
    pub stats: Stats,
    pub summary: ReplaySummary,
    #[serde(skip)]
    pub checkpoint: Checkpoint,
}

/// Replays history into a character snapshot
#[derive(Clone, Debug, Default)]
pub struct ProgressionEngine {
    options: RecomputeOptions,
}

impl ProgressionEngine {
    pub fn new(options: RecomputeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RecomputeOptions {
        &self.options
    }

    /// Rebuild the snapshot from scratch over the whole history
    pub fn recompute(&self, history: &History) -> Result<Snapshot> {
        let Some(as_of) = self.effective_as_of(history) else {
            tracing::info!("Empty history, returning initial stats");
            return self.finish(history, None, create_initial_stats(), ReplaySummary::default(), None);
        };

        let uniform = self.uniform_conditions(history, as_of)?;
        let (stats, summary) = self.replay(
            create_initial_stats(),
            ReplaySummary::default(),
            history.up_to(as_of),
            uniform,
        )?;

        tracing::info!(
            "Recomputed {} days through {}: level {}, {} xp",
            summary.days_replayed,
            as_of,
            stats.level,
            stats.xp
        );

        let through = history.up_to(as_of).next_back().map(|day| day.date);
        self.finish(history, through, stats, summary, uniform)
    }

    /// Continue from a checkpoint, replaying only days after it.
    ///
    /// Falls back to [`recompute`](Self::recompute) when the checkpoint no
    /// longer matches the history or the options.
    pub fn resume(&self, checkpoint: &Checkpoint, history: &History) -> Result<Snapshot> {
        let Some(as_of) = self.effective_as_of(history) else {
            return self.recompute(history);
        };

        let Some(through) = checkpoint.through else {
            tracing::debug!("Checkpoint is empty, recomputing");
            return self.recompute(history);
        };

        if checkpoint.policy != self.options.policy
            || checkpoint.apply_daily_health != self.options.apply_daily_health
        {
            tracing::debug!("Checkpoint options differ, recomputing");
            return self.recompute(history);
        }

        if through > as_of {
            tracing::debug!("Checkpoint at {} is past {}, recomputing", through, as_of);
            return self.recompute(history);
        }

        if fingerprint(history.digests_up_to(through)) != checkpoint.fingerprint {
            tracing::info!("History changed on or before {}, recomputing", through);
            return self.recompute(history);
        }

        let uniform = self.uniform_conditions(history, as_of)?;
        if uniform != checkpoint.uniform_conditions {
            tracing::debug!("Uniform conditions changed, recomputing");
            return self.recompute(history);
        }

        let (stats, summary) = self.replay(
            checkpoint.stats.clone(),
            checkpoint.summary,
            history.between(through, as_of),
            uniform,
        )?;

        tracing::info!(
            "Resumed from {} through {}: level {}, {} xp",
            through,
            as_of,
            stats.level,
            stats.xp
        );

        let latest = history.up_to(as_of).next_back().map(|day| day.date);
        self.finish(history, latest, stats, summary, uniform)
    }

    fn effective_as_of(&self, history: &History) -> Option<NaiveDate> {
        let last = history.last_date()?;
        Some(match self.options.as_of {
            Some(as_of) => as_of.min(last),
            None => last,
        })
    }

    /// Conditions of the latest day on or before `as_of`, under the uniform policy
    fn uniform_conditions(&self, history: &History, as_of: NaiveDate) -> Result<Option<Conditions>> {
        match self.options.policy {
            ConditionPolicy::PerDay => Ok(None),
            ConditionPolicy::UniformLatest => match history.up_to(as_of).next_back() {
                Some(latest) => Ok(Some(evaluate_day(latest)?)),
                None => Ok(None),
            },
        }
    }

    fn replay<'a, I>(
        &self,
        mut stats: Stats,
        mut summary: ReplaySummary,
        days: I,
        uniform: Option<Conditions>,
    ) -> Result<(Stats, ReplaySummary)>
    where
        I: IntoIterator<Item = &'a DailyMetrics>,
    {
        let was_capped = summary.level_capped;

        for day in days {
            day.validate()?;

            let conditions = match uniform {
                Some(conditions) => conditions,
                None => evaluate_day(day)?,
            };

            for workout in &day.workouts {
                match calculate_workout_effect(&workout.kind, workout.minutes, &conditions) {
                    Some(effect) => {
                        stats = apply_workout_effect(&stats, &effect);
                        summary.level_ups += apply_level_ups(&mut stats);
                        summary.level_capped |= exceeds_level_cap(stats.xp);
                        summary.workouts_applied += 1;
                    }
                    None => {
                        tracing::warn!(
                            "{}: no effect table for workout type '{}', skipping",
                            day.date,
                            workout.kind
                        );
                        summary.workouts_skipped += 1;
                    }
                }
            }

            if self.options.apply_daily_health {
                let impact = calculate_health_impact(&conditions);
                stats.health =
                    apply_health_change(stats.health, stats.max_health, impact.rounded_total());
            }

            summary.days_replayed += 1;
            tracing::debug!(
                "{}: level {} xp {} health {}/{}",
                day.date,
                stats.level,
                stats.xp,
                stats.health,
                stats.max_health
            );
        }

        if summary.level_capped && !was_capped {
            tracing::warn!(
                "XP total {} exceeds the level {} range; level capped",
                stats.xp,
                MAX_LEVEL
            );
        }

        Ok((stats, summary))
    }

    fn finish(
        &self,
        history: &History,
        through: Option<NaiveDate>,
        stats: Stats,
        summary: ReplaySummary,
        uniform: Option<Conditions>,
    ) -> Result<Snapshot> {
        let prefix = match through {
            Some(date) => fingerprint(history.digests_up_to(date)),
            None => fingerprint(std::iter::empty()),
        };

        let checkpoint = Checkpoint {
            through,
            fingerprint: prefix,
            policy: self.options.policy,
            apply_daily_health: self.options.apply_daily_health,
            uniform_conditions: uniform,
            stats: stats.clone(),
            summary,
        };

        Ok(Snapshot {
            stats,
            summary,
            checkpoint,
        })
    }
}

/// Conditions for a recorded date, `None` if the date has no record
pub fn conditions_for(history: &History, date: NaiveDate) -> Result<Option<Conditions>> {
    history.get(date).map(evaluate_day).transpose()
}

/// Recovery breakdown for a recorded date, `None` if the date has no record.
///
/// When the day carries no rolling workload figure it is derived from the
/// history's trailing seven days.
pub fn recovery_for(history: &History, date: NaiveDate) -> Result<Option<RecoveryBreakdown>> {
    let Some(day) = history.get(date) else {
        return Ok(None);
    };
    day.validate()?;

    let rolling_minutes = day
        .fatigue_7_days_minutes
        .unwrap_or_else(|| history.rolling_workout_minutes(date, FATIGUE_WINDOW_DAYS));

    let input = RecoveryInput {
        sleep_minutes: day.sleep_minutes.unwrap_or(0),
        quality: day.sleep_quality,
        rest: day.sleep_rest,
        workouts: &day.workouts,
        rolling_minutes,
    };

    Ok(Some(calculate_recovery(&input)))
}
