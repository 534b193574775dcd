//! Replay checkpoints.
//!
//! A checkpoint caches the snapshot produced by replaying history through a
//! given date, together with a fingerprint of that history prefix. The engine
//! only resumes from it when the prefix and replay options are unchanged, so
//! resuming always yields the same snapshot as a full recompute.
//!
//! Fingerprints are SHA-256 over per-day digests, so they stay valid across
//! builds and checking one never re-serializes the history.
//!
//! Checkpoints can be saved to disk; a missing or unreadable file is treated
//! as "no checkpoint".

use crate::engine::{ConditionPolicy, ReplaySummary};
use crate::{Conditions, DailyMetrics, Error, Result, Stats};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Cached replay state
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Checkpoint {
    /// Last replayed date, `None` if nothing has been replayed
    pub through: Option<NaiveDate>,
    /// Hex fingerprint of every day up to and including `through`
    pub fingerprint: String,
    pub policy: ConditionPolicy,
    pub apply_daily_health: bool,
    /// Conditions applied to every day under `ConditionPolicy::UniformLatest`
    pub uniform_conditions: Option<Conditions>,
    pub stats: Stats,
    pub summary: ReplaySummary,
}

/// SHA-256 digest of one day's record
pub type DayDigest = [u8; 32];

/// Digest every field of a day in a fixed layout
pub fn day_digest(day: &DailyMetrics) -> DayDigest {
    let mut hasher = Sha256::new();

    hasher.update(day.date.to_string().as_bytes());
    update_opt(&mut hasher, day.sleep_minutes.map(u64::from));
    update_opt(&mut hasher, day.sleep_quality.map(|q| u64::from(q.score())));
    update_opt(&mut hasher, day.sleep_rest.map(|r| r as u64));

    hasher.update((day.workouts.len() as u64).to_le_bytes());
    for workout in &day.workouts {
        update_str(&mut hasher, &workout.kind);
        update_str(&mut hasher, &workout.category);
        hasher.update(workout.minutes.to_bits().to_le_bytes());
    }

    for value in [
        day.calories_target,
        day.calories_actual,
        day.water_target_ml,
        day.water_actual_ml,
        day.fatigue_7_days_minutes,
    ] {
        update_opt(&mut hasher, value.map(f64::to_bits));
    }
    for counter in [
        day.consecutive_deficit_days,
        day.consecutive_low_sleep_days,
        day.consecutive_water_deficit_days,
    ] {
        update_opt(&mut hasher, counter.map(u64::from));
    }

    hasher.finalize().into()
}

fn update_opt(hasher: &mut Sha256, value: Option<u64>) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            hasher.update(v.to_le_bytes());
        }
        None => hasher.update([0u8]),
    }
}

fn update_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// Fold per-day digests into a hex fingerprint
pub fn fingerprint<'a, I>(digests: I) -> String
where
    I: IntoIterator<Item = &'a DayDigest>,
{
    let mut hasher = Sha256::new();
    for digest in digests {
        hasher.update(digest);
    }
    format!("{:x}", hasher.finalize())
}

impl Checkpoint {
    /// Load a checkpoint from a file with shared locking
    ///
    /// Returns `None` if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No checkpoint found at {:?}", path);
            return Ok(None);
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open checkpoint {:?}: {}. Ignoring.", path, e);
                return Ok(None);
            }
        };

        if let Err(e) = file.lock_shared() {
            tracing::warn!("Unable to lock checkpoint {:?}: {}. Ignoring.", path, e);
            return Ok(None);
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!("Failed to read checkpoint {:?}: {}. Ignoring.", path, e);
            return Ok(None);
        }

        file.unlock()?;

        match serde_json::from_str::<Checkpoint>(&contents) {
            Ok(checkpoint) => {
                tracing::debug!("Loaded checkpoint through {:?}", checkpoint.through);
                Ok(Some(checkpoint))
            }
            Err(e) => {
                tracing::warn!("Failed to parse checkpoint {:?}: {}. Ignoring.", path, e);
                Ok(None)
            }
        }
    }

    /// Save the checkpoint atomically (temp file + rename) under an exclusive lock
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("checkpoint path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved checkpoint through {:?} to {:?}", self.through, path);
        Ok(())
    }
}
