//! Property tests for the progression engine invariants.
//!
//! These verify, over generated histories:
//! - Health stays in `[1, max_health]` and stats never go negative
//! - Max health tracks level
//! - Recompute is idempotent and independent of arrival order
//! - Appending workouts never lowers XP or level
//! - Resuming from a checkpoint equals a full recompute

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use vitality_core::*;

const KINDS: &[&str] = &[
    "strength", "running", "cycling", "swimming", "elliptical", "hiit", "walking", "yoga",
    "stretching", "pilates", "breathing", "rowing",
];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn workout_strategy() -> impl Strategy<Value = WorkoutEntry> {
    (prop::sample::select(KINDS), 1u32..180).prop_map(|(kind, minutes)| {
        WorkoutEntry::new(kind, "", f64::from(minutes))
    })
}

fn day_strategy() -> impl Strategy<Value = DailyMetrics> {
    (
        0i64..60,
        prop::option::of(0u32..720),
        prop::collection::vec(workout_strategy(), 0..4),
        prop::option::of(1000.0f64..3000.0),
        0.0f64..4000.0,
        prop::option::of(1000.0f64..3500.0),
        0.0f64..4000.0,
        0u32..5,
        0u32..5,
    )
        .prop_map(
            |(offset, sleep, workouts, cal_target, cal_actual, water_target, water_actual, deficit, low_sleep)| {
                let mut day = DailyMetrics::new(base_date() + Duration::days(offset));
                day.sleep_minutes = sleep;
                day.workouts = workouts;
                day.calories_target = cal_target;
                day.calories_actual = cal_target.map(|_| cal_actual);
                day.water_target_ml = water_target;
                day.water_actual_ml = water_target.map(|_| water_actual);
                day.consecutive_deficit_days = Some(deficit);
                day.consecutive_low_sleep_days = Some(low_sleep);
                day
            },
        )
}

fn history_strategy() -> impl Strategy<Value = Vec<DailyMetrics>> {
    prop::collection::vec(day_strategy(), 0..25)
}

fn options_strategy() -> impl Strategy<Value = RecomputeOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(uniform, daily_health)| RecomputeOptions {
        policy: if uniform {
            ConditionPolicy::UniformLatest
        } else {
            ConditionPolicy::PerDay
        },
        apply_daily_health: daily_health,
        as_of: None,
    })
}

/// Split a day into the partial records separate sources would send
fn split_by_source(day: &DailyMetrics) -> Vec<DailyMetrics> {
    let mut nutrition = DailyMetrics::new(day.date);
    nutrition.calories_target = day.calories_target;
    nutrition.calories_actual = day.calories_actual;
    nutrition.consecutive_deficit_days = day.consecutive_deficit_days;

    let mut water = DailyMetrics::new(day.date);
    water.water_target_ml = day.water_target_ml;
    water.water_actual_ml = day.water_actual_ml;
    water.consecutive_water_deficit_days = day.consecutive_water_deficit_days;

    let mut sleep = DailyMetrics::new(day.date);
    sleep.sleep_minutes = day.sleep_minutes;
    sleep.sleep_quality = day.sleep_quality;
    sleep.sleep_rest = day.sleep_rest;
    sleep.consecutive_low_sleep_days = day.consecutive_low_sleep_days;

    let mut activity = DailyMetrics::new(day.date);
    activity.workouts = day.workouts.clone();
    activity.fatigue_7_days_minutes = day.fatigue_7_days_minutes;

    vec![nutrition, water, sleep, activity]
}

fn assert_snapshot_in_range(stats: &Stats) {
    assert!(stats.level >= 1);
    assert_eq!(stats.max_health, max_health(stats.level));
    assert!(stats.health >= 1, "health {} below 1", stats.health);
    assert!(
        stats.health <= stats.max_health,
        "health {} above max {}",
        stats.health,
        stats.max_health
    );
    for stat in PhysicalStat::ALL {
        assert!(stats.physical(stat) >= 0, "{:?} negative", stat);
    }
    for stat in PhysiologicalStat::ALL {
        assert!(stats.physiological(stat) >= 0, "{:?} negative", stat);
    }
}

proptest! {
    #[test]
    fn max_health_formula_holds(level in 1u32..=100) {
        prop_assert_eq!(max_health(level), 100 + (level as i32 - 1) * 5);
        prop_assert!(max_health(level + 1) >= max_health(level));
    }

    #[test]
    fn level_matches_xp_curve(xp in 0u64..1_000_000) {
        let level = level_from_xp(xp);
        prop_assert!(xp >= xp_for_level(level));
        prop_assert!(xp < xp_for_level(level + 1));

        let progress = level_progress(xp, level);
        prop_assert!((0.0..=1.0).contains(&progress));
    }

    #[test]
    fn reachable_snapshots_stay_in_range(days in history_strategy(), options in options_strategy()) {
        let history = History::from_days(days);
        let snapshot = ProgressionEngine::new(options).recompute(&history).unwrap();
        assert_snapshot_in_range(&snapshot.stats);
    }

    #[test]
    fn recompute_is_idempotent(days in history_strategy(), options in options_strategy()) {
        let history = History::from_days(days);
        let engine = ProgressionEngine::new(options);
        prop_assert_eq!(engine.recompute(&history).unwrap(), engine.recompute(&history).unwrap());
    }

    #[test]
    fn arrival_order_is_irrelevant(days in history_strategy(), options in options_strategy()) {
        let engine = ProgressionEngine::new(options);
        let history = History::from_days(days);

        let fragments: Vec<DailyMetrics> = history.iter().flat_map(split_by_source).collect();
        let forward = History::from_days(fragments.clone());
        let reversed = History::from_days(fragments.into_iter().rev());

        prop_assert_eq!(&forward, &history);
        prop_assert_eq!(&reversed, &history);

        let expected = engine.recompute(&history).unwrap();
        prop_assert_eq!(engine.recompute(&forward).unwrap().stats, expected.stats.clone());
        prop_assert_eq!(engine.recompute(&reversed).unwrap().stats, expected.stats);
    }

    #[test]
    fn appending_a_workout_never_lowers_xp_or_level(
        days in history_strategy(),
        extra in workout_strategy(),
    ) {
        let engine = ProgressionEngine::default();
        let mut history = History::from_days(days);
        let before = engine.recompute(&history).unwrap().stats;

        let date = history
            .last_date()
            .map(|d| d + Duration::days(1))
            .unwrap_or_else(base_date);
        history.add_workout(date, extra);

        let after = engine.recompute(&history).unwrap().stats;
        prop_assert!(after.xp >= before.xp);
        prop_assert!(after.level >= before.level);
    }

    #[test]
    fn resume_equals_recompute(
        prefix in history_strategy(),
        suffix in prop::collection::vec(day_strategy(), 0..10),
        options in options_strategy(),
    ) {
        let engine = ProgressionEngine::new(options);
        let mut history = History::from_days(prefix);
        let checkpoint = engine.recompute(&history).unwrap().checkpoint;

        for day in suffix {
            history.insert(day);
        }

        prop_assert_eq!(
            engine.resume(&checkpoint, &history).unwrap(),
            engine.recompute(&history).unwrap()
        );
    }

    #[test]
    fn recovery_total_stays_in_range(
        sleep in 0u32..900,
        workouts in prop::collection::vec(workout_strategy(), 0..6),
        rolling in 0.0f64..2000.0,
    ) {
        let input = recovery::RecoveryInput {
            sleep_minutes: sleep,
            quality: None,
            rest: None,
            workouts: &workouts,
            rolling_minutes: rolling,
        };
        let breakdown = calculate_recovery(&input);

        prop_assert!((0..=100).contains(&breakdown.sleep));
        prop_assert!((0..=30).contains(&breakdown.workload));
        prop_assert!((0..=20).contains(&breakdown.fatigue));
        prop_assert!((0..=100).contains(&breakdown.total));
    }
}
