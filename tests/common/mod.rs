// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use chrono::{DateTime, TimeZone, Utc};
use endurance_rpg::db::{FirestoreDb, MemoryStore};
use endurance_rpg::engine::EngineConfig;
use endurance_rpg::models::ActivityRecord;
use endurance_rpg::services::ProgressionService;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Progression service over a fresh in-memory store.
#[allow(dead_code)]
pub fn memory_service(config: EngineConfig) -> ProgressionService<MemoryStore> {
    ProgressionService::new(MemoryStore::new(), Arc::new(config))
}

/// Generate a unique athlete ID for test isolation.
#[allow(dead_code)]
pub fn unique_athlete_id() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64
}

/// UTC timestamp helper.
#[allow(dead_code)]
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// Build an activity record with no elevation gain.
#[allow(dead_code)]
pub fn activity(
    id: u64,
    sport_type: &str,
    distance_meters: f64,
    moving_time_seconds: u32,
    start_date: DateTime<Utc>,
) -> ActivityRecord {
    ActivityRecord {
        id,
        sport_type: sport_type.to_string(),
        distance_meters,
        moving_time_seconds,
        elevation_gain_meters: 0.0,
        start_date,
    }
}
