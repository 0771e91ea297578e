// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progression service tests against the in-memory store.

use chrono::Duration;
use endurance_rpg::db::{MemoryStore, ProgressionStore};
use endurance_rpg::engine::EngineConfig;
use endurance_rpg::error::AppError;
use endurance_rpg::models::{ProgressionSnapshot, Tier};
use endurance_rpg::services::ProgressionService;
use std::sync::Arc;

mod common;
use common::{activity, at, memory_service, test_db_offline};

const NUM_CONCURRENT_ACTIVITIES: u64 = 10;

#[tokio::test]
async fn test_new_athlete_gets_initial_snapshot() {
    let service = memory_service(EngineConfig::default());

    let snapshot = service.get_progression(1).await.unwrap();

    assert_eq!(snapshot, ProgressionSnapshot::initial(service.config()));
    assert_eq!(snapshot.level, 1);
    assert_eq!(snapshot.next_level_xp_required, 1000);
    assert_eq!(snapshot.tier, Tier::Novice);
    assert!(service.store().is_empty());
}

#[tokio::test]
async fn test_process_activity_persists_snapshot() {
    let service = memory_service(EngineConfig::default());
    let now = at(2024, 1, 15, 9);

    let result = service
        .process_activity(7, &activity(100, "Run", 4_000.0, 1500, now), now)
        .await
        .unwrap();

    assert_eq!(result.award.total_awarded_xp, 400);
    assert!(!result.rejected);
    assert!(!result.leveled_up);

    let stored = service.get_progression(7).await.unwrap();
    assert_eq!(stored, result.snapshot);
    assert_eq!(stored.total_xp, 400);
    assert_eq!(stored.streak_count, 1);
}

#[tokio::test]
async fn test_invalid_activity_rejected_without_write() {
    let service = memory_service(EngineConfig::default());
    let now = at(2024, 1, 15, 9);

    let mut bad = activity(101, "Run", 4_000.0, 1500, now);
    bad.elevation_gain_meters = -12.0;

    let err = service.process_activity(7, &bad, now).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidActivity {
            activity_id: 101,
            ..
        }
    ));
    assert!(err.is_input_error());
    assert!(service.store().is_empty());
}

#[tokio::test]
async fn test_anti_cheat_rejection_recorded_with_zero_award() {
    let service = memory_service(EngineConfig::default());
    let now = at(2024, 1, 15, 9);

    let result = service
        .process_activity(8, &activity(102, "Run", 21_097.0, 2800, now), now)
        .await
        .unwrap();

    assert!(result.rejected);
    assert_eq!(result.award.total_awarded_xp, 0);
    assert_eq!(result.snapshot.streak_count, 0);
    assert_eq!(result.snapshot.last_activity_date, None);

    let awards = service.recent_awards(8, 10).await.unwrap();
    assert_eq!(awards.len(), 1);
    assert!(awards[0].rejected);
}

#[tokio::test]
async fn test_level_up_across_multiple_activities() {
    let service = memory_service(EngineConfig::default());
    let start = at(2024, 1, 15, 9);

    let mut leveled = false;
    for n in 0..3 {
        let when = start + Duration::days(n);
        let result = service
            .process_activity(9, &activity(200 + n as u64, "Run", 4_000.0, 1500, when), when)
            .await
            .unwrap();
        leveled |= result.leveled_up;
    }

    // 400 + 400 + 400 (streak activates on the third day, bonus starts after)
    let snapshot = service.get_progression(9).await.unwrap();
    assert_eq!(snapshot.total_xp, 1200);
    assert_eq!(snapshot.level, 2);
    assert!(snapshot.streak_active);
    assert!(leveled);
}

#[tokio::test]
async fn test_awards_listed_newest_first() {
    let service = memory_service(EngineConfig::default());
    let start = at(2024, 1, 15, 9);

    for n in 0..5u64 {
        let when = start + Duration::hours(n as i64);
        service
            .process_activity(10, &activity(300 + n, "Walk", 1_000.0, 900, when), when)
            .await
            .unwrap();
    }

    let awards = service.recent_awards(10, 3).await.unwrap();
    let ids: Vec<u64> = awards.iter().map(|a| a.activity_id).collect();
    assert_eq!(ids, vec![304, 303, 302]);
    assert_eq!(awards[0].processed_at, "2024-01-15T13:00:00Z");
}

#[tokio::test]
async fn test_concurrent_processing_loses_no_updates() {
    // Ten activities for one athlete processed at once must all land.
    // A lost read-modify-write would leave total_xp short.
    let mut config = EngineConfig::default();
    config.daily_xp_cap = 0;
    config.quests.clear();
    let service = memory_service(config);
    let athlete_id = 123_456_789;
    let now = at(2024, 1, 15, 9);

    let mut handles = vec![];
    for i in 0..NUM_CONCURRENT_ACTIVITIES {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let run = activity(1000 + i, "Run", 1_000.0, 300, now);
            service.process_activity(athlete_id, &run, now).await
        }));
    }

    for handle in handles {
        handle
            .await
            .expect("Task join failed")
            .expect("Activity processing failed");
    }

    let snapshot = service.get_progression(athlete_id).await.unwrap();
    assert_eq!(snapshot.total_xp, NUM_CONCURRENT_ACTIVITIES * 100);
    assert_eq!(
        service
            .recent_awards(athlete_id, 100)
            .await
            .unwrap()
            .len() as u64,
        NUM_CONCURRENT_ACTIVITIES
    );
}

#[tokio::test]
async fn test_store_update_is_atomic_across_services() {
    // Two services share one store but not a lock map, like two worker
    // instances. The store's own read-modify-write must keep every award.
    let mut config = EngineConfig::default();
    config.daily_xp_cap = 0;
    config.quests.clear();
    let config = Arc::new(config);
    let store = MemoryStore::new();
    let services = [
        ProgressionService::new(store.clone(), config.clone()),
        ProgressionService::new(store.clone(), config),
    ];
    let athlete_id = 55;
    let now = at(2024, 1, 15, 9);

    let mut handles = vec![];
    for i in 0..NUM_CONCURRENT_ACTIVITIES {
        let service = services[(i % 2) as usize].clone();
        handles.push(tokio::spawn(async move {
            let run = activity(2000 + i, "Run", 1_000.0, 300, now);
            service.process_activity(athlete_id, &run, now).await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("Task join failed")
            .expect("Activity processing failed");
    }

    let snapshot = services[0].get_progression(athlete_id).await.unwrap();
    assert_eq!(snapshot.total_xp, NUM_CONCURRENT_ACTIVITIES * 100);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_lock_entries_released_after_processing() {
    let service = memory_service(EngineConfig::default());
    let now = at(2024, 1, 15, 9);

    let mut handles = vec![];
    for i in 0..NUM_CONCURRENT_ACTIVITIES {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let run = activity(3000 + i, "Run", 1_000.0, 300, now);
            service.process_activity(i % 3, &run, now).await
        }));
    }
    for handle in handles {
        handle
            .await
            .expect("Task join failed")
            .expect("Activity processing failed");
    }
    assert_eq!(service.locked_athletes(), 0);

    // Failed store writes release the entry too
    let offline = ProgressionService::new(test_db_offline(), Arc::new(EngineConfig::default()));
    let run = activity(4000, "Run", 1_000.0, 300, now);
    assert!(offline.process_activity(1, &run, now).await.is_err());
    assert_eq!(offline.locked_athletes(), 0);
}

#[tokio::test]
async fn test_offline_firestore_returns_database_error() {
    let service = ProgressionService::new(test_db_offline(), Arc::new(EngineConfig::default()));
    let now = at(2024, 1, 15, 9);

    let err = service
        .process_activity(11, &activity(400, "Run", 4_000.0, 1500, now), now)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
    assert!(!err.is_input_error());

    let err = service.store().get_progression(11).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
}
