// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conversion of validated adventure mutations into store updates.
//!
//! Sanitizing cannot fail: it works from the [`CheckedValue`] recorded by
//! [`crate::services::field_validator`].

use crate::models::mutation::{CheckedValue, FieldMutation, FieldUpdate, FieldValue};
use crate::services::field_validator::{PathEdit, DISTANCE, ELEVATIONS, PATH};
use serde_json::Value;

const SKI: &str = "ski";
const APPROACH_DISTANCE: &str = "approach_distance";
const TRAIL_PATH: &str = "trail_path";

/// Sanitize a validated batch, preserving order.
///
/// `coordinates` expands to two updates, so the output may be longer than
/// the input.
pub fn sanitize_all(mutations: &[FieldMutation]) -> Vec<FieldUpdate> {
    mutations.iter().flat_map(sanitize).collect()
}

/// Sanitize one validated mutation.
pub fn sanitize(mutation: &FieldMutation) -> Vec<FieldUpdate> {
    let id = mutation.adventure_id.as_str();
    let kind = mutation.adventure_type.as_str();
    let name = mutation.name.as_str();

    match mutation.checked {
        CheckedValue::Coordinates { lng, lat } => vec![
            FieldUpdate::for_adventure(id, kind, "coordinates_lng", FieldValue::Number(lng)),
            FieldUpdate::for_adventure(id, kind, "coordinates_lat", FieldValue::Number(lat)),
        ],
        CheckedValue::Number(number) if name == DISTANCE && kind == SKI => {
            vec![FieldUpdate::for_adventure(
                id,
                kind,
                APPROACH_DISTANCE,
                FieldValue::Text(number.to_string()),
            )]
        }
        CheckedValue::Number(number) => vec![FieldUpdate::for_adventure(
            id,
            kind,
            name,
            FieldValue::Number(number),
        )],
        CheckedValue::Plain if name == PATH => vec![FieldUpdate::for_adventure(
            id,
            kind,
            TRAIL_PATH,
            serialize_json(&mutation.value),
        )],
        CheckedValue::Plain if name == ELEVATIONS => vec![FieldUpdate::for_adventure(
            id,
            kind,
            ELEVATIONS,
            serialize_json(&mutation.value),
        )],
        CheckedValue::Plain => vec![FieldUpdate::for_adventure(
            id,
            kind,
            name,
            FieldValue::from_json(mutation.value.clone()),
        )],
    }
}

/// Sanitize a path edit into its `trail_path` and `elevations` updates.
pub fn sanitize_path_edit(edit: &PathEdit) -> Vec<FieldUpdate> {
    vec![
        FieldUpdate::for_adventure(
            &edit.adventure_id,
            &edit.adventure_type,
            TRAIL_PATH,
            serialize_json(&edit.path),
        ),
        FieldUpdate::for_adventure(
            &edit.adventure_id,
            &edit.adventure_type,
            ELEVATIONS,
            serialize_json(&edit.elevations),
        ),
    ]
}

/// The update that clears an adventure's path.
pub fn clear_path(adventure_id: &str, adventure_type: &str) -> FieldUpdate {
    FieldUpdate::for_adventure(
        adventure_id,
        adventure_type,
        TRAIL_PATH,
        serialize_json(&Value::Array(Vec::new())),
    )
}

/// Canonical text form of a path or elevation sequence.
fn serialize_json(value: &Value) -> FieldValue {
    FieldValue::Text(value.to_string())
}
