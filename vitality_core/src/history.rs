//! Chronological history of daily metrics.
//!
//! Days may arrive in any order (e.g. from parallel fetches); `History` keeps
//! them keyed by date so replay always runs in ascending order. Loaders read a
//! JSON-lines metrics file and an optional CSV workout log.

use crate::checkpoint::{day_digest, DayDigest};
use crate::{DailyMetrics, Error, Result, WorkoutEntry};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Bound;
use std::path::Path;

/// Ordered, de-duplicated daily metrics
#[derive(Clone, Debug, Default, PartialEq)]
pub struct History {
    days: BTreeMap<NaiveDate, DailyMetrics>,
    /// Digest of each day, refreshed whenever the day changes
    digests: BTreeMap<NaiveDate, DayDigest>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records in any order; records for the same date are merged
    pub fn from_days<I>(days: I) -> Self
    where
        I: IntoIterator<Item = DailyMetrics>,
    {
        let mut history = Self::new();
        for day in days {
            history.insert(day);
        }
        history
    }

    /// Insert a day, merging into any existing record for the same date
    pub fn insert(&mut self, metrics: DailyMetrics) {
        let date = metrics.date;
        let day = match self.days.entry(date) {
            Entry::Occupied(entry) => {
                let existing = entry.into_mut();
                existing.merge(metrics);
                existing
            }
            Entry::Vacant(entry) => entry.insert(metrics),
        };
        self.digests.insert(date, day_digest(day));
    }

    /// Append a workout to a date, creating the day if needed
    pub fn add_workout(&mut self, date: NaiveDate, workout: WorkoutEntry) {
        let day = self
            .days
            .entry(date)
            .or_insert_with(|| DailyMetrics::new(date));
        day.workouts.push(workout);
        self.digests.insert(date, day_digest(day));
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyMetrics> {
        self.days.get(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.keys().next_back().copied()
    }

    /// All days in ascending date order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DailyMetrics> {
        self.days.values()
    }

    /// Days on or before `as_of`, ascending
    pub fn up_to(&self, as_of: NaiveDate) -> impl DoubleEndedIterator<Item = &DailyMetrics> {
        self.days.range(..=as_of).map(|(_, day)| day)
    }

    /// Per-day digests on or before `as_of`, ascending
    pub fn digests_up_to(&self, as_of: NaiveDate) -> impl Iterator<Item = &DayDigest> {
        self.digests.range(..=as_of).map(|(_, digest)| digest)
    }

    /// Days strictly after `after` and on or before `as_of`, ascending
    pub fn between(
        &self,
        after: NaiveDate,
        as_of: NaiveDate,
    ) -> impl DoubleEndedIterator<Item = &DailyMetrics> {
        let after = after.min(as_of);
        self.days
            .range((Bound::Excluded(after), Bound::Included(as_of)))
            .map(|(_, day)| day)
    }

    /// Total workout minutes over the `days`-day window ending at `date`
    pub fn rolling_workout_minutes(&self, date: NaiveDate, days: u32) -> f64 {
        if days == 0 {
            return 0.0;
        }
        let start = date
            .checked_sub_signed(Duration::days(i64::from(days) - 1))
            .unwrap_or(NaiveDate::MIN);
        self.days
            .range(start..=date)
            .map(|(_, day)| day.workout_minutes())
            .sum()
    }

    /// Load a JSON-lines file with one `DailyMetrics` per line.
    ///
    /// Blank lines are ignored. Malformed lines are logged and skipped.
    pub fn load_jsonl(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::History(format!(
                "history file not found: {}",
                path.display()
            )));
        }

        let reader = BufReader::new(File::open(path)?);
        let mut history = Self::new();
        let mut skipped = 0;

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<DailyMetrics>(&line) {
                Ok(day) => history.insert(day),
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(
                        "Skipping malformed history line {} in {:?}: {}",
                        line_num + 1,
                        path,
                        e
                    );
                }
            }
        }

        tracing::info!(
            "Loaded {} days from {:?} ({} lines skipped)",
            history.len(),
            path,
            skipped
        );

        Ok(history)
    }

    /// Merge workouts from a CSV log with `date,type,category,minutes` columns
    pub fn merge_workouts_csv(&mut self, path: &Path) -> Result<usize> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut merged = 0;
        for result in reader.deserialize::<WorkoutRow>() {
            match result {
                Ok(row) => {
                    self.add_workout(
                        row.date,
                        WorkoutEntry::new(row.kind, row.category.unwrap_or_default(), row.minutes),
                    );
                    merged += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to deserialize workout CSV row: {}", e);
                }
            }
        }

        tracing::debug!("Merged {} workouts from {:?}", merged, path);
        Ok(merged)
    }
}

impl FromIterator<DailyMetrics> for History {
    fn from_iter<I: IntoIterator<Item = DailyMetrics>>(iter: I) -> Self {
        Self::from_days(iter)
    }
}

/// CSV row format for workout logs
#[derive(Debug, Deserialize)]
struct WorkoutRow {
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: String,
    category: Option<String>,
    minutes: f64,
}
