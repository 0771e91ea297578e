// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Progression snapshots (one document per athlete)
//! - XP award history (one document per processed activity)

use crate::db::{collections, ProgressionStore, ProgressionUpdate};
use crate::error::AppError;
use crate::models::{AwardRecord, ProgressionSnapshot};

/// Attempts at a progression transaction before giving up.
const MAX_COMMIT_ATTEMPTS: u32 = 5;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    /// Store a progression snapshot outside of activity processing.
    pub async fn set_progression(
        &self,
        athlete_id: u64,
        snapshot: &ProgressionSnapshot,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROGRESSION)
            .document_id(athlete_id.to_string())
            .object(snapshot)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// One read-modify-write attempt.
    ///
    /// Returns `Ok(None)` when the commit was refused, which is how
    /// Firestore reports contention on the snapshot.
    async fn try_update_progression<F>(
        &self,
        athlete_id: u64,
        update: &F,
    ) -> Result<Option<ProgressionUpdate>, AppError>
    where
        F: Fn(Option<ProgressionSnapshot>) -> ProgressionUpdate + Send + Sync,
    {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // 1. Read the current snapshot inside the transaction
        let tx_client = client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        );
        let read = tx_client
            .fluent()
            .select()
            .by_id_in(collections::PROGRESSION)
            .obj::<ProgressionSnapshot>()
            .one(&athlete_id.to_string())
            .await;
        let current = match read {
            Ok(current) => current,
            Err(e) => {
                let _ = transaction.rollback().await;
                return Err(AppError::Database(format!(
                    "Failed to read progression in transaction: {}",
                    e
                )));
            }
        };

        // 2. Apply the activity in memory
        let result = update(current);

        // 3. Add snapshot and award record writes to the transaction
        let staged = client
            .fluent()
            .update()
            .in_col(collections::PROGRESSION)
            .document_id(athlete_id.to_string())
            .object(&result.outcome.snapshot)
            .add_to_transaction(&mut transaction)
            .and_then(|tx| {
                client
                    .fluent()
                    .update()
                    .in_col(collections::XP_AWARDS)
                    .document_id(result.record.activity_id.to_string())
                    .object(&result.record)
                    .add_to_transaction(tx)
            })
            .map(|_| ());
        if let Err(e) = staged {
            let _ = transaction.rollback().await;
            return Err(AppError::Database(format!(
                "Failed to add progression writes to transaction: {}",
                e
            )));
        }

        // 4. Commit
        if let Err(e) = transaction.commit().await {
            tracing::debug!(athlete_id, error = %e, "Progression commit refused");
            return Ok(None);
        }

        tracing::debug!(
            athlete_id,
            activity_id = result.record.activity_id,
            "Progression written atomically"
        );

        Ok(Some(result))
    }
}

impl ProgressionStore for FirestoreDb {
    /// Get the progression snapshot for an athlete.
    ///
    /// Stored in `progression` collection, keyed by athlete_id.
    async fn get_progression(
        &self,
        athlete_id: u64,
    ) -> Result<Option<ProgressionSnapshot>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROGRESSION)
            .obj()
            .one(&athlete_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Read the snapshot, apply `update`, and write the new snapshot plus
    /// the award record in one transaction.
    ///
    /// The read goes through the transaction, so a concurrent commit for the
    /// same athlete makes ours fail. A failed commit is retried from a fresh
    /// read, up to `MAX_COMMIT_ATTEMPTS` times.
    async fn update_progression<F>(
        &self,
        athlete_id: u64,
        update: F,
    ) -> Result<ProgressionUpdate, AppError>
    where
        F: Fn(Option<ProgressionSnapshot>) -> ProgressionUpdate + Send + Sync,
    {
        for attempt in 1..=MAX_COMMIT_ATTEMPTS {
            if let Some(result) = self.try_update_progression(athlete_id, &update).await? {
                return Ok(result);
            }
            if attempt < MAX_COMMIT_ATTEMPTS {
                tracing::warn!(athlete_id, attempt, "Progression commit failed, retrying");
            }
        }

        Err(AppError::Database(format!(
            "Progression commit failed after {} attempts",
            MAX_COMMIT_ATTEMPTS
        )))
    }

    async fn get_awards_for_user(
        &self,
        athlete_id: u64,
        limit: u32,
    ) -> Result<Vec<AwardRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::XP_AWARDS)
            .filter(move |q| q.field("athlete_id").eq(athlete_id))
            .order_by([(
                "processed_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
