// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer.
//!
//! [`AdventureStore`] is the interface the handlers and the completion
//! averager are written against. [`FirestoreDb`] is the production backend and
//! [`MemoryStore`] backs local development and tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use crate::error::{AppError, FieldError};
use crate::models::{
    Adventure, AverageField, CompletionRecord, EncodedAverage, FieldUpdate, TodoRecord, User, Zone,
};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const ADVENTURES: &str = "adventures";
    pub const ZONES: &str = "zones";
    pub const USERS: &str = "users";
    /// User-adventure completion join records
    pub const COMPLETED: &str = "completed";
    /// User-adventure todo join records
    pub const TODO: &str = "todo";
}

/// One compare-and-swap of a running average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageSwap {
    pub field: AverageField,
    /// Value the caller believes is stored
    pub expected: EncodedAverage,
    /// Value to store if the expectation holds
    pub replacement: EncodedAverage,
}

/// Storage operations needed by the API.
#[async_trait]
pub trait AdventureStore: Send + Sync {
    async fn get_adventure(&self, adventure_id: &str) -> Result<Option<Adventure>, AppError>;

    async fn put_adventure(&self, adventure: &Adventure) -> Result<(), AppError>;

    /// Remove an adventure. Removing an absent adventure succeeds.
    async fn delete_adventure(&self, adventure_id: &str) -> Result<(), AppError>;

    /// Read one running average of an adventure.
    async fn get_current_average(
        &self,
        adventure_id: &str,
        field: AverageField,
    ) -> Result<EncodedAverage, AppError> {
        let adventure = self
            .get_adventure(adventure_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Adventure {} not found", adventure_id)))?;
        Ok(adventure.average(field))
    }

    /// Set one field on the record the update targets.
    async fn apply_field_mutation(&self, update: &FieldUpdate) -> Result<(), AppError>;

    /// Atomically check every `expected` value and write every `replacement`.
    ///
    /// Either all swaps are written or none is, in which case the first
    /// mismatch is returned as [`FieldError::StaleAverage`].
    async fn confirm_and_swap(
        &self,
        adventure_id: &str,
        swaps: &[AverageSwap],
    ) -> Result<(), AppError>;

    async fn record_completion(&self, record: &CompletionRecord) -> Result<(), AppError>;

    async fn record_todo(&self, record: &TodoRecord) -> Result<(), AppError>;

    async fn get_zone(&self, zone_id: &str) -> Result<Option<Zone>, AppError>;

    async fn put_zone(&self, zone: &Zone) -> Result<(), AppError>;

    async fn get_user(&self, user_id: u64) -> Result<Option<User>, AppError>;

    async fn put_user(&self, user: &User) -> Result<(), AppError>;
}

/// Check every swap against the stored adventure, then apply them all.
pub(crate) fn swap_averages(
    adventure: &mut Adventure,
    swaps: &[AverageSwap],
) -> Result<(), FieldError> {
    for swap in swaps {
        let actual = adventure.average(swap.field);
        if !actual.same_state(&swap.expected) {
            return Err(FieldError::StaleAverage {
                field: swap.field.as_str().to_string(),
                expected: swap.expected.encode(),
                actual: actual.encode(),
            });
        }
    }

    for swap in swaps {
        adventure.set_average(swap.field, swap.replacement);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap(field: AverageField, expected: &str, replacement: &str) -> AverageSwap {
        AverageSwap {
            field,
            expected: EncodedAverage::decode(expected).unwrap(),
            replacement: EncodedAverage::decode(replacement).unwrap(),
        }
    }

    #[test]
    fn test_swap_all_or_nothing() {
        let mut adventure = Adventure::new("1", "ski");
        adventure.rating = EncodedAverage::new(4.0, 1);
        adventure.difficulty = EncodedAverage::new(2.0, 1);

        let err = swap_averages(
            &mut adventure,
            &[
                swap(AverageField::Rating, "4:1", "5:2"),
                swap(AverageField::Difficulty, "3:1", "3:2"),
            ],
        )
        .unwrap_err();

        assert!(matches!(err, FieldError::StaleAverage { ref field, .. } if field == "difficulty"));
        assert_eq!(adventure.rating, EncodedAverage::new(4.0, 1));
    }

    #[test]
    fn test_swap_applies_both() {
        let mut adventure = Adventure::new("1", "ski");
        swap_averages(
            &mut adventure,
            &[
                swap(AverageField::Rating, "0:0", "5:1"),
                swap(AverageField::Difficulty, "0:0", "2:1"),
            ],
        )
        .unwrap();

        assert_eq!(adventure.rating, EncodedAverage::new(5.0, 1));
        assert_eq!(adventure.difficulty, EncodedAverage::new(2.0, 1));
    }
}
