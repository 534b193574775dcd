//! Daily recovery score.
//!
//! The score is independent of the character snapshot:
//!
//! ```text
//! total = clamp(sleep - workload - fatigue, 0, 100)
//! ```
//!
//! - **sleep**: duration step function plus quality and subjective rest
//! - **workload**: per-session penalty for the day's workouts, capped at 30
//! - **fatigue**: penalty on the 7-day rolling workout minutes, capped at 20

use crate::catalog::canonical_workout_type;
use crate::{RecoveryBreakdown, RecoveryStatus, SleepQuality, SleepRest, WorkoutEntry};

const MAX_SCORE: i32 = 100;
const WORKLOAD_CAP: i32 = 30;
const FATIGUE_CAP: i32 = 20;

/// Inputs to the recovery pipeline for one day
#[derive(Clone, Copy, Debug)]
pub struct RecoveryInput<'a> {
    pub sleep_minutes: u32,
    pub quality: Option<SleepQuality>,
    pub rest: Option<SleepRest>,
    pub workouts: &'a [WorkoutEntry],
    /// Workout minutes over the trailing 7 days
    pub rolling_minutes: f64,
}

/// Recovery load class of a workout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkloadClass {
    Strength,
    Hiit,
    Cardio,
    Restorative,
    Other,
}

impl WorkloadClass {
    /// Classify by workout type, falling back to the category string
    pub fn classify(kind: &str, category: &str) -> Self {
        match canonical_workout_type(kind).as_str() {
            "strength" => WorkloadClass::Strength,
            "hiit" => WorkloadClass::Hiit,
            "running" | "cycling" | "elliptical" => WorkloadClass::Cardio,
            "walking" | "stretching" | "yoga" | "pilates" | "breathing" => {
                WorkloadClass::Restorative
            }
            _ => match category.trim().to_ascii_lowercase().as_str() {
                "strength" => WorkloadClass::Strength,
                "hiit" => WorkloadClass::Hiit,
                "cardio" => WorkloadClass::Cardio,
                "mobility" | "flexibility" | "recovery" | "mindfulness" => {
                    WorkloadClass::Restorative
                }
                _ => WorkloadClass::Other,
            },
        }
    }
}

/// Points for sleep duration, plateauing at 7:00-8:30
pub fn duration_base(sleep_minutes: u32) -> i32 {
    match sleep_minutes {
        0..=269 => 0,
        270..=299 => 10,
        300..=329 => 20,
        330..=359 => 30,
        360..=389 => 45,
        390..=419 => 60,
        420..=509 => 70,
        510..=569 => 65,
        570..=599 => 60,
        _ => 55,
    }
}

pub fn quality_score(quality: Option<SleepQuality>) -> i32 {
    match quality {
        Some(SleepQuality::Excellent) => 15,
        Some(SleepQuality::Good) | None => 0,
        Some(SleepQuality::Poor) => -15,
        Some(SleepQuality::VeryPoor) => -20,
    }
}

pub fn rest_score(rest: Option<SleepRest>) -> i32 {
    match rest {
        Some(SleepRest::Fully) => 15,
        Some(SleepRest::Enough) | None => 0,
        Some(SleepRest::NotEnough) => -15,
        Some(SleepRest::VeryTired) => -25,
    }
}

/// Sleep score in `[0, 100]`
pub fn sleep_score(
    sleep_minutes: u32,
    quality: Option<SleepQuality>,
    rest: Option<SleepRest>,
) -> i32 {
    (duration_base(sleep_minutes) + quality_score(quality) + rest_score(rest)).clamp(0, MAX_SCORE)
}

/// Penalty for a single session
pub fn session_penalty(workout: &WorkoutEntry) -> i32 {
    let minutes = workout.minutes;

    match WorkloadClass::classify(&workout.kind, &workout.category) {
        WorkloadClass::Strength => {
            if minutes > 45.0 {
                15
            } else if minutes > 30.0 {
                12
            } else {
                8
            }
        }
        WorkloadClass::Hiit => {
            if minutes > 20.0 {
                18
            } else {
                12
            }
        }
        WorkloadClass::Cardio => {
            if minutes > 60.0 {
                10
            } else if minutes > 30.0 {
                7
            } else {
                4
            }
        }
        WorkloadClass::Restorative => 0,
        WorkloadClass::Other => {
            if minutes > 45.0 {
                8
            } else if minutes > 30.0 {
                5
            } else {
                3
            }
        }
    }
}

/// Summed session penalties, capped at 30
pub fn workload_penalty(workouts: &[WorkoutEntry]) -> i32 {
    workouts
        .iter()
        .map(session_penalty)
        .sum::<i32>()
        .min(WORKLOAD_CAP)
}

/// Penalty for the 7-day rolling workout minutes, capped at 20
pub fn fatigue_penalty(rolling_minutes: f64) -> i32 {
    let m = if rolling_minutes.is_finite() {
        rolling_minutes.max(0.0)
    } else {
        0.0
    };

    let penalty = if m < 60.0 {
        0
    } else if m < 120.0 {
        ((m - 60.0) / 12.0).round() as i32
    } else if m < 180.0 {
        5 + ((m - 120.0) / 12.0).round() as i32
    } else if m < 240.0 {
        10 + ((m - 180.0) / 12.0).round() as i32
    } else {
        15 + ((m - 240.0) / 24.0).round().min(f64::from(FATIGUE_CAP)) as i32
    };

    penalty.min(FATIGUE_CAP)
}

/// Status band for a recovery total
pub fn classify_recovery(total: i32) -> RecoveryStatus {
    if total >= 80 {
        RecoveryStatus::Recovered
    } else if total >= 60 {
        RecoveryStatus::Normal
    } else if total >= 40 {
        RecoveryStatus::OnEdge
    } else {
        RecoveryStatus::NotRecovered
    }
}

/// Full recovery breakdown for one day
pub fn calculate_recovery(input: &RecoveryInput<'_>) -> RecoveryBreakdown {
    let sleep = sleep_score(input.sleep_minutes, input.quality, input.rest);
    let workload = workload_penalty(input.workouts);
    let fatigue = fatigue_penalty(input.rolling_minutes);
    let total = (sleep - workload - fatigue).clamp(0, MAX_SCORE);

    RecoveryBreakdown {
        sleep,
        workload,
        fatigue,
        total,
        status: classify_recovery(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(sleep_minutes: u32, workouts: &'a [WorkoutEntry]) -> RecoveryInput<'a> {
        RecoveryInput {
            sleep_minutes,
            quality: None,
            rest: None,
            workouts,
            rolling_minutes: 0.0,
        }
    }

    #[test]
    fn test_perfect_night_caps_at_100() {
        let score = sleep_score(450, Some(SleepQuality::Excellent), Some(SleepRest::Fully));
        assert_eq!(score, 100);
    }

    #[test]
    fn test_short_bad_night_floors_at_zero() {
        assert_eq!(duration_base(240), 0);
        let score = sleep_score(240, Some(SleepQuality::VeryPoor), Some(SleepRest::VeryTired));
        assert_eq!(score, 0);
    }

    #[test]
    fn test_duration_plateau_edges() {
        assert_eq!(duration_base(269), 0);
        assert_eq!(duration_base(270), 10);
        assert_eq!(duration_base(359), 30);
        assert_eq!(duration_base(360), 45);
        assert_eq!(duration_base(419), 60);
        assert_eq!(duration_base(420), 70);
        assert_eq!(duration_base(509), 70);
        assert_eq!(duration_base(510), 65);
        assert_eq!(duration_base(570), 60);
        assert_eq!(duration_base(600), 55);
        assert_eq!(duration_base(900), 55);
    }

    #[test]
    fn test_unset_quality_and_rest_are_neutral() {
        assert_eq!(sleep_score(450, None, None), 70);
    }

    #[test]
    fn test_forty_minute_strength_session() {
        let workouts = [WorkoutEntry::new("strength", "strength", 40.0)];
        assert_eq!(workload_penalty(&workouts), 12);
    }

    #[test]
    fn test_session_penalty_buckets() {
        let cases = [
            ("strength", 30.0, 8),
            ("strength", 46.0, 15),
            ("hiit", 20.0, 12),
            ("hiit", 25.0, 18),
            ("running", 30.0, 4),
            ("cycling", 45.0, 7),
            ("elliptical", 61.0, 10),
            ("walking", 120.0, 0),
            ("stretch", 30.0, 0),
            ("yoga", 60.0, 0),
            ("pilates", 60.0, 0),
            ("breathing", 10.0, 0),
            ("climbing", 30.0, 3),
            ("climbing", 40.0, 5),
            ("climbing", 50.0, 8),
        ];

        for (kind, minutes, expected) in cases {
            let workout = WorkoutEntry::new(kind, "", minutes);
            assert_eq!(
                session_penalty(&workout),
                expected,
                "{} for {} minutes",
                kind,
                minutes
            );
        }
    }

    #[test]
    fn test_category_fallback() {
        let workout = WorkoutEntry::new("rowing", "cardio", 45.0);
        assert_eq!(session_penalty(&workout), 7);
    }

    #[test]
    fn test_workload_capped_at_30() {
        let workouts = vec![
            WorkoutEntry::new("hiit", "", 30.0),
            WorkoutEntry::new("strength", "", 60.0),
            WorkoutEntry::new("running", "", 90.0),
        ];
        assert_eq!(workload_penalty(&workouts), 30);
    }

    #[test]
    fn test_fatigue_curve() {
        assert_eq!(fatigue_penalty(0.0), 0);
        assert_eq!(fatigue_penalty(59.0), 0);
        assert_eq!(fatigue_penalty(60.0), 0);
        assert_eq!(fatigue_penalty(90.0), 3); // 2.5 rounds up
        assert_eq!(fatigue_penalty(120.0), 5);
        assert_eq!(fatigue_penalty(150.0), 8); // 5 + round(2.5)
        assert_eq!(fatigue_penalty(180.0), 10);
        assert_eq!(fatigue_penalty(240.0), 15);
        assert_eq!(fatigue_penalty(360.0), 20);
        assert_eq!(fatigue_penalty(10_000.0), 20);
    }

    #[test]
    fn test_status_bands() {
        assert_eq!(classify_recovery(85), RecoveryStatus::Recovered);
        assert_eq!(classify_recovery(80), RecoveryStatus::Recovered);
        assert_eq!(classify_recovery(79), RecoveryStatus::Normal);
        assert_eq!(classify_recovery(60), RecoveryStatus::Normal);
        assert_eq!(classify_recovery(40), RecoveryStatus::OnEdge);
        assert_eq!(classify_recovery(39), RecoveryStatus::NotRecovered);
        assert_eq!(classify_recovery(0), RecoveryStatus::NotRecovered);
    }

    #[test]
    fn test_total_combines_components() {
        let workouts = [WorkoutEntry::new("strength", "", 40.0)];
        let mut day = input(450, &workouts);
        day.quality = Some(SleepQuality::Good);
        day.rolling_minutes = 150.0;

        let breakdown = calculate_recovery(&day);
        assert_eq!(breakdown.sleep, 70);
        assert_eq!(breakdown.workload, 12);
        assert_eq!(breakdown.fatigue, 8);
        assert_eq!(breakdown.total, 50);
        assert_eq!(breakdown.status, RecoveryStatus::OnEdge);
    }

    #[test]
    fn test_total_never_negative() {
        let workouts = [
            WorkoutEntry::new("hiit", "", 45.0),
            WorkoutEntry::new("hiit", "", 45.0),
        ];
        let mut day = input(200, &workouts);
        day.rolling_minutes = 500.0;

        let breakdown = calculate_recovery(&day);
        assert_eq!(breakdown.total, 0);
        assert_eq!(breakdown.status, RecoveryStatus::NotRecovered);
    }
}
