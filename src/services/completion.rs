// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Adventure completion: request decoding and running-average updates.
//!
//! Clients submit `rating` and `difficulty` as `"<new>:<old>:<oldTally>"`,
//! where `<old>:<oldTally>` is the encoded average they last read. The new
//! averages are written with a compare-and-swap against those old values, so
//! two completions racing on the same adventure can never both fold into the
//! same starting point.

use crate::db::{AdventureStore, AverageSwap};
use crate::error::{AppError, FieldError};
use crate::models::average::parse_tally;
use crate::models::{AverageField, EncodedAverage};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

/// `<new>:<old>:<oldTally>`, each an unsigned decimal.
static SCORE_TRIPLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9]*\.)?[0-9]+:(?:[0-9]*\.)?[0-9]+:(?:[0-9]*\.)?[0-9]+$")
        .expect("valid score triplet pattern")
});

/// Body of `POST /adventures/complete`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteAdventureRequest {
    #[serde(default)]
    pub adventure_id: Option<Value>,
    #[serde(default)]
    pub adventure_type: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
}

/// A decoded completion, ready for averaging.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionEvent {
    pub adventure_id: String,
    pub adventure_type: String,
    pub user_rating: f64,
    pub user_difficulty: f64,
    pub old_rating: EncodedAverage,
    pub old_difficulty: EncodedAverage,
    pub public: bool,
}

/// The averages written by a completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOutcome {
    pub new_rating: EncodedAverage,
    pub new_difficulty: EncodedAverage,
}

/// Split a score triplet into the submitted value and the old average.
pub fn decode_score(raw: &str) -> Result<(f64, EncodedAverage), FieldError> {
    let malformed = || FieldError::MalformedEncoding(raw.to_string());

    if !SCORE_TRIPLET.is_match(raw) {
        return Err(malformed());
    }

    let mut parts = raw.splitn(2, ':');
    let submitted = parts
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(malformed)?;
    let old = parts.next().ok_or_else(malformed)?;

    let (average, tally) = old.split_once(':').ok_or_else(malformed)?;
    let average = average.parse::<f64>().map_err(|_| malformed())?;
    let tally = parse_tally(tally).ok_or_else(malformed)?;

    Ok((submitted, EncodedAverage::new(average, tally)))
}

impl CompleteAdventureRequest {
    /// Check presence of every member and decode both score triplets.
    pub fn into_event(self) -> Result<CompletionEvent, FieldError> {
        let adventure_id = self
            .adventure_id
            .as_ref()
            .and_then(crate::models::mutation::id_from_value)
            .ok_or_else(|| FieldError::MissingRequiredFields("adventure_id".to_string()))?;
        let rating = self
            .rating
            .filter(|r| !r.is_empty())
            .ok_or_else(|| FieldError::MissingRequiredFields("rating".to_string()))?;
        let difficulty = self
            .difficulty
            .filter(|d| !d.is_empty())
            .ok_or_else(|| FieldError::MissingRequiredFields("difficulty".to_string()))?;
        let public = self
            .public
            .ok_or_else(|| FieldError::MissingRequiredFields("public".to_string()))?;

        let (user_rating, old_rating) = decode_score(&rating)?;
        let (user_difficulty, old_difficulty) = decode_score(&difficulty)?;

        Ok(CompletionEvent {
            adventure_id,
            adventure_type: self.adventure_type.unwrap_or_default(),
            user_rating,
            user_difficulty,
            old_rating,
            old_difficulty,
            public,
        })
    }
}

/// Fold one completion into both averages without touching storage.
pub fn fold_completion(event: &CompletionEvent) -> CompletionOutcome {
    CompletionOutcome {
        new_rating: event.old_rating.fold_in(event.user_rating),
        new_difficulty: event.old_difficulty.fold_in(event.user_difficulty),
    }
}

/// Applies completions to stored adventures.
pub struct CompletionAverager<'a> {
    store: &'a dyn AdventureStore,
}

impl<'a> CompletionAverager<'a> {
    pub fn new(store: &'a dyn AdventureStore) -> Self {
        Self { store }
    }

    /// Fold the submitted scores into the adventure's averages.
    ///
    /// Fails with [`FieldError::StaleAverage`] and writes nothing when either
    /// stored average differs from the one the caller supplied.
    pub async fn complete_adventure(
        &self,
        event: &CompletionEvent,
    ) -> Result<CompletionOutcome, AppError> {
        let outcome = fold_completion(event);

        let swaps = [
            AverageSwap {
                field: AverageField::Rating,
                expected: event.old_rating,
                replacement: outcome.new_rating,
            },
            AverageSwap {
                field: AverageField::Difficulty,
                expected: event.old_difficulty,
                replacement: outcome.new_difficulty,
            },
        ];

        self.store
            .confirm_and_swap(&event.adventure_id, &swaps)
            .await?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::Adventure;
    use serde_json::json;
    use std::sync::Arc;

    fn event(adventure_id: &str, rating: &str, difficulty: &str) -> CompletionEvent {
        CompleteAdventureRequest {
            adventure_id: Some(json!(adventure_id)),
            adventure_type: Some("hike".to_string()),
            rating: Some(rating.to_string()),
            difficulty: Some(difficulty.to_string()),
            public: Some(true),
        }
        .into_event()
        .unwrap()
    }

    async fn store_with(adventure_id: &str, rating: &str, difficulty: &str) -> MemoryStore {
        let store = MemoryStore::new();
        let mut adventure = Adventure::new(adventure_id, "hike");
        adventure.rating = EncodedAverage::decode(rating).unwrap();
        adventure.difficulty = EncodedAverage::decode(difficulty).unwrap();
        store.put_adventure(&adventure).await.unwrap();
        store
    }

    #[test]
    fn test_decode_score() {
        let (submitted, old) = decode_score("5:4.5:2").unwrap();
        assert_eq!(submitted, 5.0);
        assert_eq!(old, EncodedAverage::new(4.5, 2));
    }

    #[test]
    fn test_decode_score_rejects_malformed() {
        for raw in ["", "5", "5:4", "5:4:2:1", "a:4:2", "-1:4:2", "5:4:2.5", " 5:4:2"] {
            assert!(
                matches!(decode_score(raw), Err(FieldError::MalformedEncoding(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_missing_members() {
        let request = CompleteAdventureRequest {
            adventure_id: Some(json!(1)),
            rating: Some("5:0:0".to_string()),
            difficulty: Some("2:0:0".to_string()),
            ..Default::default()
        };
        assert_eq!(
            request.into_event().unwrap_err(),
            FieldError::MissingRequiredFields("public".to_string())
        );
    }

    #[test]
    fn test_fold_completion() {
        let outcome = fold_completion(&event("1", "8:4:3", "6:4:1"));
        assert_eq!(outcome.new_rating, EncodedAverage::new(5.0, 4));
        assert_eq!(outcome.new_difficulty, EncodedAverage::new(5.0, 2));
    }

    #[tokio::test]
    async fn test_first_completion() {
        let store = store_with("1", "0:0", "0:0").await;
        let averager = CompletionAverager::new(&store);

        let outcome = averager
            .complete_adventure(&event("1", "5:0:0", "3:0:0"))
            .await
            .unwrap();

        assert_eq!(outcome.new_rating.encode(), "5:1");
        assert_eq!(outcome.new_difficulty.encode(), "3:1");

        let stored = store.get_adventure("1").await.unwrap().unwrap();
        assert_eq!(stored.rating, EncodedAverage::new(5.0, 1));
        assert_eq!(stored.difficulty, EncodedAverage::new(3.0, 1));
    }

    #[tokio::test]
    async fn test_stale_rating_writes_nothing() {
        let store = store_with("1", "4:1", "2:1").await;
        let averager = CompletionAverager::new(&store);

        let err = averager
            .complete_adventure(&event("1", "5:3:1", "2:2:1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_field_error(),
            Some(FieldError::StaleAverage { .. })
        ));

        let stored = store.get_adventure("1").await.unwrap().unwrap();
        assert_eq!(stored.rating, EncodedAverage::new(4.0, 1));
        assert_eq!(stored.difficulty, EncodedAverage::new(2.0, 1));
    }

    #[tokio::test]
    async fn test_unknown_adventure() {
        let store = MemoryStore::new();
        let averager = CompletionAverager::new(&store);
        assert!(matches!(
            averager.complete_adventure(&event("9", "5:0:0", "3:0:0")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_completions_from_same_read() {
        let store = Arc::new(store_with("1", "4:1", "2:1").await);

        let mut handles = vec![];
        for rating in ["6:4:1", "2:4:1"] {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                CompletionAverager::new(store.as_ref())
                    .complete_adventure(&event("1", rating, "2:2:1"))
                    .await
            }));
        }

        let mut succeeded = 0;
        let mut stale = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => succeeded += 1,
                Err(err) => {
                    assert!(matches!(
                        err.as_field_error(),
                        Some(FieldError::StaleAverage { .. })
                    ));
                    stale += 1;
                }
            }
        }

        assert_eq!(succeeded, 1);
        assert_eq!(stale, 1);

        let stored = store.get_adventure("1").await.unwrap().unwrap();
        assert_eq!(stored.rating.tally, 2);
        assert_eq!(stored.difficulty, EncodedAverage::new(2.0, 2));
    }
}
