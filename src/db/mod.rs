// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore, plus an in-memory store for tests and local runs).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use std::future::Future;

use crate::engine::ProgressionOutcome;
use crate::error::AppError;
use crate::models::{AwardRecord, ProgressionSnapshot};

/// Collection names as constants.
pub mod collections {
    /// Progression snapshots (keyed by athlete_id)
    pub const PROGRESSION: &str = "progression";
    /// Award history (keyed by activity_id)
    pub const XP_AWARDS: &str = "xp_awards";
}

/// Everything written for one processed activity.
#[derive(Debug, Clone)]
pub struct ProgressionUpdate {
    pub outcome: ProgressionOutcome,
    pub record: AwardRecord,
}

/// Persistence for progression snapshots.
///
/// `update_progression` is a read-modify-write: the store reads the current
/// snapshot (`None` for a new athlete), runs `update`, and writes the new
/// snapshot and award record together. A store may call `update` again
/// when it retries after contention; only the committed result counts.
pub trait ProgressionStore: Send + Sync {
    fn get_progression(
        &self,
        athlete_id: u64,
    ) -> impl Future<Output = Result<Option<ProgressionSnapshot>, AppError>> + Send;

    fn update_progression<F>(
        &self,
        athlete_id: u64,
        update: F,
    ) -> impl Future<Output = Result<ProgressionUpdate, AppError>> + Send
    where
        F: Fn(Option<ProgressionSnapshot>) -> ProgressionUpdate + Send + Sync;

    /// Award history for an athlete, newest first.
    fn get_awards_for_user(
        &self,
        athlete_id: u64,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<AwardRecord>, AppError>> + Send;
}
