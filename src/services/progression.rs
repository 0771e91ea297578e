// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progression service.
//!
//! Handles the per-activity workflow:
//! 1. Validate the activity record
//! 2. Serialize with any other processing for the same athlete
//! 3. Read-modify-write the snapshot through the store, applying the engine
//! 4. Log the award

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::{ProgressionStore, ProgressionUpdate};
use crate::engine::{apply_activity, EngineConfig};
use crate::error::Result;
use crate::models::{ActivityRecord, AwardRecord, ProgressionSnapshot, XpAward};
use crate::time_utils::format_utc_rfc3339;

/// Per-athlete locks serializing snapshot updates within this process.
pub type UserLocks = Arc<DashMap<u64, Arc<Mutex<()>>>>;

/// Applies activities to stored progression.
#[derive(Clone)]
pub struct ProgressionService<S> {
    store: S,
    config: Arc<EngineConfig>,
    user_locks: UserLocks,
}

/// Result of processing an activity.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub award: XpAward,
    pub snapshot: ProgressionSnapshot,
    pub leveled_up: bool,
    pub rejected: bool,
}

impl<S: ProgressionStore> ProgressionService<S> {
    pub fn new(store: S, config: Arc<EngineConfig>) -> Self {
        Self {
            store,
            config,
            user_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current progression, or the initial snapshot for a new athlete.
    pub async fn get_progression(&self, athlete_id: u64) -> Result<ProgressionSnapshot> {
        Ok(self
            .store
            .get_progression(athlete_id)
            .await?
            .unwrap_or_else(|| ProgressionSnapshot::initial(&self.config)))
    }

    /// Number of athletes with a lock entry, i.e. with processing in flight.
    pub fn locked_athletes(&self) -> usize {
        self.user_locks.len()
    }

    /// Drop the athlete's lock entry once no other task holds a handle to it.
    ///
    /// Handles are only cloned under the map's shard lock, which `remove_if`
    /// also holds, so a waiter can never be left with an orphaned mutex.
    fn release_lock(&self, athlete_id: u64) {
        self.user_locks
            .remove_if(&athlete_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Most recent awards, newest first.
    pub async fn recent_awards(&self, athlete_id: u64, limit: u32) -> Result<Vec<AwardRecord>> {
        self.store.get_awards_for_user(athlete_id, limit).await
    }

    /// Process an activity for an athlete.
    ///
    /// `now` is the processing time; it decides daily-cap and quest
    /// rollover and whether the activity counts as today's.
    pub async fn process_activity(
        &self,
        athlete_id: u64,
        activity: &ActivityRecord,
        now: DateTime<Utc>,
    ) -> Result<ProcessResult> {
        activity.check()?;

        tracing::info!(
            athlete_id,
            activity_id = activity.id,
            sport_type = %activity.sport_type,
            "Processing activity"
        );

        let lock = self
            .user_locks
            .entry(athlete_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let config = &self.config;
        let update = {
            let _guard = lock.lock().await;
            self.store
                .update_progression(athlete_id, |current| {
                    let snapshot =
                        current.unwrap_or_else(|| ProgressionSnapshot::initial(config));
                    let outcome = apply_activity(config, &snapshot, activity, now);
                    let record = AwardRecord {
                        athlete_id,
                        activity_id: activity.id,
                        sport_type: activity.sport_type.clone(),
                        start_date: activity.start_date,
                        award: outcome.award.clone(),
                        rejected: outcome.rejected,
                        level_after: outcome.snapshot.level,
                        total_xp_after: outcome.snapshot.total_xp,
                        processed_at: format_utc_rfc3339(now),
                    };
                    ProgressionUpdate { outcome, record }
                })
                .await
        };
        drop(lock);
        self.release_lock(athlete_id);
        let ProgressionUpdate { outcome, .. } = update?;

        if outcome.rejected {
            tracing::warn!(
                athlete_id,
                activity_id = activity.id,
                speed_kmh = activity.speed_kmh().unwrap_or_default(),
                "Activity rejected by anti-cheat filter"
            );
        } else {
            tracing::info!(
                athlete_id,
                activity_id = activity.id,
                base_xp = outcome.award.base_xp,
                streak_bonus_xp = outcome.award.streak_bonus_xp,
                quest_bonus_xp = outcome.award.quest_bonus_xp,
                total_awarded_xp = outcome.award.total_awarded_xp,
                was_capped = outcome.award.was_capped,
                quests = ?outcome.award.completed_quest_ids,
                "XP awarded"
            );
        }

        let leveled_up = outcome.leveled_up();
        if leveled_up {
            tracing::info!(
                athlete_id,
                previous_level = outcome.previous_level,
                level = outcome.snapshot.level,
                tier = ?outcome.snapshot.tier,
                "Level up"
            );
        }

        Ok(ProcessResult {
            award: outcome.award,
            snapshot: outcome.snapshot,
            leveled_up,
            rejected: outcome.rejected,
        })
    }
}
