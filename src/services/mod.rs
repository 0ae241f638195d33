// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod completion;
pub mod field_sanitizer;
pub mod field_validator;
pub mod user_fields;
pub mod zone_fields;

pub use completion::{CompleteAdventureRequest, CompletionAverager, CompletionEvent, CompletionOutcome};
pub use field_validator::{EditRequest, PathEdit, RawPathEdit};
pub use user_fields::UserEditRequest;
pub use zone_fields::{CreateZoneRequest, NewZone, ZoneEditRequest};
