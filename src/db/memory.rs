// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store backed by concurrent maps.
//!
//! Each record is mutated while holding its map entry, so a
//! compare-and-swap cannot interleave with another write to the same record.

use crate::db::{swap_averages, AdventureStore, AverageSwap};
use crate::error::AppError;
use crate::models::{
    Adventure, CompletionRecord, FieldOwner, FieldUpdate, TodoRecord, User, Zone,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    adventures: Arc<DashMap<String, Adventure>>,
    zones: Arc<DashMap<String, Zone>>,
    users: Arc<DashMap<u64, User>>,
    completed: Arc<DashMap<String, CompletionRecord>>,
    todo: Arc<DashMap<String, TodoRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completion records for one adventure.
    pub fn completions_for(&self, adventure_id: &str) -> Vec<CompletionRecord> {
        self.completed
            .iter()
            .filter(|entry| entry.adventure_id == adventure_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Todo records for one user.
    pub fn todos_for(&self, user_id: u64) -> Vec<TodoRecord> {
        self.todo
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

#[async_trait]
impl AdventureStore for MemoryStore {
    async fn get_adventure(&self, adventure_id: &str) -> Result<Option<Adventure>, AppError> {
        Ok(self
            .adventures
            .get(adventure_id)
            .map(|entry| entry.value().clone()))
    }

    async fn put_adventure(&self, adventure: &Adventure) -> Result<(), AppError> {
        self.adventures
            .insert(adventure.id.clone(), adventure.clone());
        Ok(())
    }

    async fn delete_adventure(&self, adventure_id: &str) -> Result<(), AppError> {
        self.adventures.remove(adventure_id);
        Ok(())
    }

    async fn apply_field_mutation(&self, update: &FieldUpdate) -> Result<(), AppError> {
        match &update.owner {
            FieldOwner::Adventure { adventure_id, .. } => {
                let mut adventure = self.adventures.get_mut(adventure_id).ok_or_else(|| {
                    AppError::NotFound(format!("Adventure {} not found", adventure_id))
                })?;
                adventure.apply(&update.name, &update.value)?;
            }
            FieldOwner::Zone { zone_id } => {
                let mut zone = self
                    .zones
                    .get_mut(zone_id)
                    .ok_or_else(|| AppError::NotFound(format!("Zone {} not found", zone_id)))?;
                zone.apply(&update.name, &update.value)?;
            }
            FieldOwner::User { user_id } => {
                let mut user = self
                    .users
                    .get_mut(user_id)
                    .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
                user.apply(&update.name, &update.value)?;
            }
        }
        Ok(())
    }

    async fn confirm_and_swap(
        &self,
        adventure_id: &str,
        swaps: &[AverageSwap],
    ) -> Result<(), AppError> {
        let mut adventure = self.adventures.get_mut(adventure_id).ok_or_else(|| {
            AppError::NotFound(format!("Adventure {} not found", adventure_id))
        })?;
        swap_averages(&mut adventure, swaps)?;
        Ok(())
    }

    async fn record_completion(&self, record: &CompletionRecord) -> Result<(), AppError> {
        self.completed.insert(record.document_id(), record.clone());
        Ok(())
    }

    async fn record_todo(&self, record: &TodoRecord) -> Result<(), AppError> {
        self.todo.insert(record.document_id(), record.clone());
        Ok(())
    }

    async fn get_zone(&self, zone_id: &str) -> Result<Option<Zone>, AppError> {
        Ok(self.zones.get(zone_id).map(|entry| entry.value().clone()))
    }

    async fn put_zone(&self, zone: &Zone) -> Result<(), AppError> {
        self.zones.insert(zone.id.clone(), zone.clone());
        Ok(())
    }

    async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&user_id).map(|entry| entry.value().clone()))
    }

    async fn put_user(&self, user: &User) -> Result<(), AppError> {
        self.users.insert(user.id, user.clone());
        Ok(())
    }
}
