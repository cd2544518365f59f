//! Best score / best distance bookkeeping
//!
//! Records are kept in a key → integer store. Store trouble is never fatal:
//! a failed read counts as "no record yet" and a failed write just means the
//! new best is not remembered after this run. Both are reported back to the
//! caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Store key for the best score
pub const BEST_SCORE_KEY: &str = "espresso-dash-best-score";
/// Store key for the best distance (whole metres)
pub const BEST_DISTANCE_KEY: &str = "espresso-dash-best-distance";

/// Durable key → integer storage
pub trait BestRecordStore {
    /// `Ok(None)` when the key has never been written
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError>;

    fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError>;
}

/// Volatile store, for tests and platforms without storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestRecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<u64>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Personal bests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BestRecord {
    pub best_score: u64,
    pub best_distance: u64,
}

impl BestRecord {
    /// Read both bests. Unreadable values count as zero.
    pub fn load(store: &dyn BestRecordStore) -> (Self, Vec<StoreError>) {
        let mut errors = Vec::new();
        let mut read = |key: &str| match store.get(key) {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                log::warn!("Could not read {key}: {e}");
                errors.push(e);
                0
            }
        };

        let record = Self {
            best_score: read(BEST_SCORE_KEY),
            best_distance: read(BEST_DISTANCE_KEY),
        };
        (record, errors)
    }

    /// Field-wise maximum
    pub fn merge(&self, other: &BestRecord) -> BestRecord {
        BestRecord {
            best_score: self.best_score.max(other.best_score),
            best_distance: self.best_distance.max(other.best_distance),
        }
    }

    /// Has there ever been a finished run worth showing
    pub fn is_empty(&self) -> bool {
        self.best_score == 0 && self.best_distance == 0
    }
}

/// Result of comparing a finished run against the bests
#[derive(Debug)]
pub struct RecordUpdate {
    pub previous: BestRecord,
    pub current: BestRecord,
    pub new_best_score: bool,
    pub new_best_distance: bool,
    /// Non-fatal store failures hit while persisting
    pub errors: Vec<StoreError>,
}

impl RecordUpdate {
    /// Either record was beaten
    pub fn is_new_best(&self) -> bool {
        self.new_best_score || self.new_best_distance
    }

    /// Every improved record reached the store
    pub fn persisted(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compare a run against `known`, writing whichever records it beats.
/// Score and distance are judged independently.
pub fn submit(
    store: &mut dyn BestRecordStore,
    known: BestRecord,
    score: u64,
    distance: u64,
) -> RecordUpdate {
    let mut current = known;
    let mut errors = Vec::new();

    let new_best_score = score > known.best_score;
    if new_best_score {
        current.best_score = score;
        if let Err(e) = store.set(BEST_SCORE_KEY, score) {
            log::warn!("Best score {score} not saved: {e}");
            errors.push(e);
        }
    }

    let new_best_distance = distance > known.best_distance;
    if new_best_distance {
        current.best_distance = distance;
        if let Err(e) = store.set(BEST_DISTANCE_KEY, distance) {
            log::warn!("Best distance {distance} not saved: {e}");
            errors.push(e);
        }
    }

    if new_best_score || new_best_distance {
        log::info!(
            "New best (score {} -> {}, distance {} -> {})",
            known.best_score,
            current.best_score,
            known.best_distance,
            current.best_distance
        );
    }

    RecordUpdate {
        previous: known,
        current,
        new_best_score,
        new_best_distance,
        errors,
    }
}
