// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request middleware: bearer-token auth and response security headers.

pub mod auth;
pub mod security;

pub use auth::{require_auth, AuthUser};
