// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! User-adventure join records for completions and todos.

use serde::{Deserialize, Serialize};

/// A user finishing an adventure, with the scores they submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub user_id: u64,
    pub adventure_id: String,
    pub adventure_type: String,
    /// Whether the completion shows on the user's public profile
    pub public: bool,
    /// Rating the user submitted (not the running average)
    pub rating: f64,
    /// Difficulty the user submitted (not the running average)
    pub difficulty: f64,
    /// ISO 8601
    pub completed_at: String,
}

impl CompletionRecord {
    /// Document ID: one completion per user and adventure.
    pub fn document_id(&self) -> String {
        format!("{}_{}", self.user_id, self.adventure_id)
    }
}

/// A user bookmarking an adventure to do later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoRecord {
    pub user_id: u64,
    pub adventure_id: String,
    pub public: bool,
    /// ISO 8601
    pub created_at: String,
}

impl TodoRecord {
    pub fn document_id(&self) -> String {
        format!("{}_{}", self.user_id, self.adventure_id)
    }
}
