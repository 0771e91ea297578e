// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! EnduranceRPG progression replay
//!
//! Replays a JSON array of activity records for one athlete through the
//! progression engine, oldest first, and logs every award.
//!
//! Usage: `endurance-rpg-replay <athlete_id> <activities.json>`

use anyhow::{bail, Context};
use endurance_rpg::{
    config::{Config, StoreBackend},
    db::{FirestoreDb, MemoryStore, ProgressionStore},
    engine::EngineConfig,
    models::ActivityRecord,
    services::ProgressionService,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let (Some(athlete_arg), Some(activities_path)) = (args.next(), args.next()) else {
        bail!("usage: endurance-rpg-replay <athlete_id> <activities.json>");
    };
    let athlete_id: u64 = athlete_arg
        .parse()
        .with_context(|| format!("invalid athlete id: {}", athlete_arg))?;

    let config = Config::from_env().context("Failed to load configuration")?;

    let engine_config = match &config.engine_config_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading engine config");
            EngineConfig::load_from_file(path).context("Failed to load engine config")?
        }
        None => EngineConfig::default(),
    };
    let engine_config = Arc::new(engine_config);

    let json = std::fs::read_to_string(&activities_path)
        .with_context(|| format!("Failed to read {}", activities_path))?;
    let mut activities: Vec<ActivityRecord> =
        serde_json::from_str(&json).context("Failed to parse activity records")?;
    activities.sort_by_key(|a| a.start_date);

    tracing::info!(
        athlete_id,
        count = activities.len(),
        backend = ?config.backend,
        "Replaying activities"
    );

    match config.backend {
        StoreBackend::Firestore => {
            let db = FirestoreDb::new(&config.gcp_project_id).await?;
            replay(ProgressionService::new(db, engine_config), athlete_id, &activities).await
        }
        StoreBackend::Memory => {
            let store = MemoryStore::new();
            replay(ProgressionService::new(store, engine_config), athlete_id, &activities).await
        }
    }
}

async fn replay<S: ProgressionStore>(
    service: ProgressionService<S>,
    athlete_id: u64,
    activities: &[ActivityRecord],
) -> anyhow::Result<()> {
    let mut skipped = 0;
    for activity in activities {
        match service
            .process_activity(athlete_id, activity, chrono::Utc::now())
            .await
        {
            Ok(_) => {}
            Err(e) if e.is_input_error() => {
                tracing::warn!(activity_id = activity.id, error = %e, "Skipping invalid activity");
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let snapshot = service.get_progression(athlete_id).await?;
    tracing::info!(
        athlete_id,
        total_xp = snapshot.total_xp,
        level = snapshot.level,
        tier = ?snapshot.tier,
        streak_count = snapshot.streak_count,
        skipped,
        "Replay complete"
    );
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("endurance_rpg=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
