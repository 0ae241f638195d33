// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Trailhead: backend API for a catalogue of outdoor adventures.
//!
//! Users edit adventure, zone and profile fields, and record completions that
//! fold their rating and difficulty into running averages stored on each
//! adventure.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;

use config::Config;
use db::AdventureStore;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn AdventureStore>,
}
