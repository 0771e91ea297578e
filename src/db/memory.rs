// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process progression store.
//!
//! The snapshot map's entry lock is held for the whole read-modify-write,
//! so updates for one athlete never interleave.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::db::{ProgressionStore, ProgressionUpdate};
use crate::error::AppError;
use crate::models::{AwardRecord, ProgressionSnapshot};

#[derive(Clone, Default)]
pub struct MemoryStore {
    snapshots: Arc<DashMap<u64, ProgressionSnapshot>>,
    awards: Arc<DashMap<u64, Vec<AwardRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of athletes with a stored snapshot.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl ProgressionStore for MemoryStore {
    async fn get_progression(
        &self,
        athlete_id: u64,
    ) -> Result<Option<ProgressionSnapshot>, AppError> {
        Ok(self.snapshots.get(&athlete_id).map(|s| s.clone()))
    }

    async fn update_progression<F>(
        &self,
        athlete_id: u64,
        update: F,
    ) -> Result<ProgressionUpdate, AppError>
    where
        F: Fn(Option<ProgressionSnapshot>) -> ProgressionUpdate + Send + Sync,
    {
        let result = match self.snapshots.entry(athlete_id) {
            Entry::Occupied(mut slot) => {
                let result = update(Some(slot.get().clone()));
                slot.insert(result.outcome.snapshot.clone());
                self.record_award(athlete_id, &result.record);
                result
            }
            Entry::Vacant(slot) => {
                let result = update(None);
                slot.insert(result.outcome.snapshot.clone());
                self.record_award(athlete_id, &result.record);
                result
            }
        };

        Ok(result)
    }

    async fn get_awards_for_user(
        &self,
        athlete_id: u64,
        limit: u32,
    ) -> Result<Vec<AwardRecord>, AppError> {
        Ok(self
            .awards
            .get(&athlete_id)
            .map(|records| {
                records
                    .iter()
                    .rev()
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl MemoryStore {
    fn record_award(&self, athlete_id: u64, record: &AwardRecord) {
        self.awards
            .entry(athlete_id)
            .or_default()
            .push(record.clone());
    }
}
