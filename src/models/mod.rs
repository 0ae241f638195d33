// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod adventure;
pub mod average;
pub mod completion;
pub mod mutation;
pub mod user;
pub mod zone;

pub use adventure::{Adventure, AverageField};
pub use average::EncodedAverage;
pub use completion::{CompletionRecord, TodoRecord};
pub use mutation::{CheckedValue, FieldMutation, FieldOwner, FieldUpdate, FieldValue, RawFieldMutation};
pub use user::User;
pub use zone::Zone;
