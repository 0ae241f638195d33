// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Adventures (catalogue records with running averages)
//! - Zones and users (field edits)
//! - Completed / todo join collections

use crate::db::{collections, swap_averages, AdventureStore, AverageSwap};
use crate::error::AppError;
use crate::models::{
    Adventure, CompletionRecord, FieldOwner, FieldUpdate, TodoRecord, User, Zone,
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

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

    // ─── Generic Document Helpers ────────────────────────────────

    async fn get_doc<T>(&self, collection: &str, doc_id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_doc<T>(&self, collection: &str, doc_id: &str, object: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(object)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Read a document, modify it in memory, and write it back in one transaction.
    ///
    /// The closure decides whether the write happens; an error from it rolls
    /// the transaction back and is returned unchanged. A rejected commit means
    /// a concurrent transaction wrote the document first, so the whole
    /// read-modify-write is retried against the fresh copy.
    async fn modify_doc<T, F>(&self, collection: &str, doc_id: &str, modify: F) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
        F: Fn(&mut T) -> Result<(), AppError> + Send + Sync,
    {
        let mut attempt = 1;
        loop {
            match self.modify_doc_once(collection, doc_id, &modify).await {
                Ok(()) => return Ok(()),
                Err(TxError::Failed(err)) => return Err(err),
                Err(TxError::CommitRejected(msg)) if attempt < MAX_TX_ATTEMPTS => {
                    tracing::warn!(
                        collection,
                        doc_id,
                        attempt,
                        error = %msg,
                        "Transaction commit rejected, retrying"
                    );
                    attempt += 1;
                }
                Err(TxError::CommitRejected(msg)) => {
                    return Err(AppError::Database(format!(
                        "Transaction commit failed after {} attempts: {}",
                        attempt, msg
                    )))
                }
            }
        }
    }

    async fn modify_doc_once<T, F>(
        &self,
        collection: &str,
        doc_id: &str,
        modify: &F,
    ) -> Result<(), TxError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
        F: Fn(&mut T) -> Result<(), AppError> + Send + Sync,
    {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        // Reads through this view join the transaction, so a concurrent
        // commit to the same document aborts ours.
        let tx_view = client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        );

        let current: Option<T> = tx_view
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to read {} in transaction: {}", collection, e))
            })?;

        let Some(mut document) = current else {
            let _ = transaction.rollback().await;
            return Err(AppError::NotFound(format!(
                "{} document {} not found",
                collection, doc_id
            ))
            .into());
        };

        if let Err(err) = modify(&mut document) {
            let _ = transaction.rollback().await;
            return Err(err.into());
        }

        client
            .fluent()
            .update()
            .in_col(collection)
            .document_id(doc_id)
            .object(&document)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add {} to transaction: {}", collection, e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| TxError::CommitRejected(e.to_string()))?;

        Ok(())
    }
}

/// Read-modify-write attempts before a contended document is reported as a
/// database error.
const MAX_TX_ATTEMPTS: u32 = 3;

/// Why one transaction attempt did not commit.
enum TxError {
    /// The commit was refused, typically because another transaction wrote
    /// the document after our read.
    CommitRejected(String),
    Failed(AppError),
}

impl From<AppError> for TxError {
    fn from(err: AppError) -> Self {
        TxError::Failed(err)
    }
}

#[async_trait]
impl AdventureStore for FirestoreDb {
    // ─── Adventure Operations ────────────────────────────────────

    async fn get_adventure(&self, adventure_id: &str) -> Result<Option<Adventure>, AppError> {
        self.get_doc(collections::ADVENTURES, adventure_id).await
    }

    async fn put_adventure(&self, adventure: &Adventure) -> Result<(), AppError> {
        self.set_doc(collections::ADVENTURES, &adventure.id, adventure)
            .await
    }

    async fn delete_adventure(&self, adventure_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ADVENTURES)
            .document_id(adventure_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        tracing::info!(adventure_id, "Adventure deleted");
        Ok(())
    }

    async fn apply_field_mutation(&self, update: &FieldUpdate) -> Result<(), AppError> {
        let name = update.name.as_str();
        let value = &update.value;

        match &update.owner {
            FieldOwner::Adventure { adventure_id, .. } => {
                self.modify_doc(collections::ADVENTURES, adventure_id, |a: &mut Adventure| {
                    a.apply(name, value).map_err(AppError::from)
                })
                .await?
            }
            FieldOwner::Zone { zone_id } => {
                self.modify_doc(collections::ZONES, zone_id, |z: &mut Zone| {
                    z.apply(name, value).map_err(AppError::from)
                })
                .await?
            }
            FieldOwner::User { user_id } => {
                self.modify_doc(collections::USERS, &user_id.to_string(), |u: &mut User| {
                    u.apply(name, value).map_err(AppError::from)
                })
                .await?
            }
        }

        tracing::debug!(field = name, owner = ?update.owner, "Field update applied");
        Ok(())
    }

    /// Compare and write both averages inside a single transaction.
    ///
    /// If another completion commits first, Firestore rejects this commit.
    /// The retry re-reads the winner's averages and fails with
    /// [`crate::error::FieldError::StaleAverage`].
    async fn confirm_and_swap(
        &self,
        adventure_id: &str,
        swaps: &[AverageSwap],
    ) -> Result<(), AppError> {
        self.modify_doc(collections::ADVENTURES, adventure_id, |a: &mut Adventure| {
            swap_averages(a, swaps).map_err(AppError::from)
        })
        .await?;

        tracing::info!(adventure_id, swaps = swaps.len(), "Averages swapped");
        Ok(())
    }

    // ─── Join Records ────────────────────────────────────────────

    async fn record_completion(&self, record: &CompletionRecord) -> Result<(), AppError> {
        self.set_doc(collections::COMPLETED, &record.document_id(), record)
            .await
    }

    async fn record_todo(&self, record: &TodoRecord) -> Result<(), AppError> {
        self.set_doc(collections::TODO, &record.document_id(), record)
            .await
    }

    // ─── Zone / User Operations ──────────────────────────────────

    async fn get_zone(&self, zone_id: &str) -> Result<Option<Zone>, AppError> {
        self.get_doc(collections::ZONES, zone_id).await
    }

    async fn put_zone(&self, zone: &Zone) -> Result<(), AppError> {
        self.set_doc(collections::ZONES, &zone.id, zone).await
    }

    async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, &user_id.to_string()).await
    }

    async fn put_user(&self, user: &User) -> Result<(), AppError> {
        self.set_doc(collections::USERS, &user.id.to_string(), user)
            .await
    }
}
