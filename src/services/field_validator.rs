// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Validation of adventure field edits.
//!
//! Rules are checked in priority order and the first failure wins:
//! 1. `name`, `value`, `adventure_id` and `adventure_type` are present
//! 2. `rating` is never directly editable
//! 3. `difficulty` must be an encoded average with a tally of at most 1
//! 4. numeric columns hold numbers
//! 5. `path`, `elevations` and `coordinates` have the expected shape
//!
//! Nothing here mutates its input. A batch is rejected as a whole when any
//! element fails.

use crate::error::FieldError;
use crate::models::adventure::MAX_EDITABLE_DIFFICULTY_TALLY;
use crate::models::average::{parse_finite, parse_tally};
use crate::models::mutation::{id_from_value, CheckedValue, FieldMutation, RawFieldMutation};
use serde::Deserialize;
use serde_json::Value;

pub const RATING: &str = "rating";
pub const DIFFICULTY: &str = "difficulty";
pub const PATH: &str = "path";
pub const ELEVATIONS: &str = "elevations";
pub const COORDINATES: &str = "coordinates";
pub const DISTANCE: &str = "distance";

/// Columns that are coerced to numbers before storage.
pub const NUMERIC_FIELDS: [&str; 4] = ["distance", "exposure", "summit_elevation", "base_elevation"];

/// Body of an adventure edit: a single `field` or a `fields` batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub field: Option<RawFieldMutation>,
    #[serde(default)]
    pub fields: Option<Vec<RawFieldMutation>>,
}

/// Body member of a path edit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPathEdit {
    #[serde(default)]
    pub path: Option<Value>,
    #[serde(default)]
    pub elevations: Option<Value>,
    #[serde(default)]
    pub adventure_id: Option<Value>,
    #[serde(default)]
    pub adventure_type: Option<Value>,
}

/// A path edit that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PathEdit {
    pub path: Value,
    pub elevations: Value,
    pub adventure_id: String,
    pub adventure_type: String,
}

/// Validate an edit body, preferring `fields` when both forms are present.
pub fn validate_edit_request(request: &EditRequest) -> Result<Vec<FieldMutation>, FieldError> {
    match (&request.fields, &request.field) {
        (Some(fields), _) => validate_batch(fields),
        (None, Some(field)) => Ok(vec![validate_field(field)?]),
        (None, None) => Err(FieldError::MissingRequiredFields(
            "field object containing name, value, adventure_id, and adventure_type".to_string(),
        )),
    }
}

/// Validate every mutation of a batch before any of them is used.
pub fn validate_batch(fields: &[RawFieldMutation]) -> Result<Vec<FieldMutation>, FieldError> {
    if fields.is_empty() {
        return Err(FieldError::MissingRequiredFields(
            "fields must contain at least one edit".to_string(),
        ));
    }
    fields.iter().map(validate_field).collect()
}

/// Validate one adventure field mutation.
pub fn validate_field(raw: &RawFieldMutation) -> Result<FieldMutation, FieldError> {
    let mut mutation = require_shape(raw)?;

    mutation.checked = match mutation.name.as_str() {
        RATING => return Err(FieldError::ImmutableField(RATING.to_string())),
        DIFFICULTY => {
            check_difficulty(&mutation.value)?;
            CheckedValue::Plain
        }
        PATH => {
            check_path(&mutation.value)?;
            CheckedValue::Plain
        }
        ELEVATIONS => {
            check_elevations(&mutation.value)?;
            CheckedValue::Plain
        }
        COORDINATES => {
            let (lng, lat) = check_coordinates(&mutation.value)?;
            CheckedValue::Coordinates { lng, lat }
        }
        name if NUMERIC_FIELDS.contains(&name) => {
            CheckedValue::Number(check_numeric(name, &mutation.value)?)
        }
        _ => CheckedValue::Plain,
    };

    Ok(mutation)
}

/// Validate the body of a path + elevations edit.
pub fn validate_path_edit(raw: &RawPathEdit) -> Result<PathEdit, FieldError> {
    let missing = [
        (PATH, raw.path.is_none()),
        (ELEVATIONS, raw.elevations.is_none()),
        ("adventure_id", raw.adventure_id.is_none()),
        ("adventure_type", raw.adventure_type.is_none()),
    ];
    if let Some((name, _)) = missing.iter().find(|(_, absent)| *absent) {
        return Err(FieldError::MissingRequiredFields(format!(
            "path edit is missing {name}"
        )));
    }

    let (adventure_id, adventure_type) =
        require_owner(raw.adventure_id.as_ref(), raw.adventure_type.as_ref(), PATH)?;
    let path = raw.path.clone().unwrap_or(Value::Null);
    let elevations = raw.elevations.clone().unwrap_or(Value::Null);

    check_path(&path)?;
    check_elevations(&elevations)?;

    Ok(PathEdit {
        path,
        elevations,
        adventure_id,
        adventure_type,
    })
}

fn require_shape(raw: &RawFieldMutation) -> Result<FieldMutation, FieldError> {
    let name = raw.name.as_ref().and_then(Value::as_str).map(str::to_string);
    let label = name.as_deref().unwrap_or("<unnamed>");

    let Some(name) = name.clone() else {
        return Err(FieldError::MissingRequiredFields(
            "name must be a string".to_string(),
        ));
    };
    let Some(value) = raw.value.clone() else {
        return Err(FieldError::MissingRequiredFields(format!(
            "value is missing for property: {label}"
        )));
    };
    let (adventure_id, adventure_type) =
        require_owner(raw.adventure_id.as_ref(), raw.adventure_type.as_ref(), label)?;

    Ok(FieldMutation {
        name,
        value,
        adventure_id,
        adventure_type,
        checked: CheckedValue::Plain,
    })
}

fn require_owner(
    adventure_id: Option<&Value>,
    adventure_type: Option<&Value>,
    label: &str,
) -> Result<(String, String), FieldError> {
    let adventure_id = adventure_id.and_then(id_from_value).ok_or_else(|| {
        FieldError::MissingRequiredFields(format!("adventure_id is missing for property: {label}"))
    })?;
    let adventure_type = adventure_type
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            FieldError::MissingRequiredFields(format!(
                "adventure_type is missing for property: {label}"
            ))
        })?;
    Ok((adventure_id, adventure_type))
}

/// Difficulty edits carry the full `"<number>:<iterations>"` encoding.
fn check_difficulty(value: &Value) -> Result<(), FieldError> {
    let raw = value
        .as_str()
        .ok_or_else(|| FieldError::MalformedEncoding(value.to_string()))?;
    let malformed = || FieldError::MalformedEncoding(raw.to_string());

    let (difficulty, iterations) = raw.split_once(':').ok_or_else(malformed)?;
    if iterations.contains(':') {
        return Err(malformed());
    }
    let iterations = parse_tally(iterations).ok_or_else(malformed)?;

    if iterations > MAX_EDITABLE_DIFFICULTY_TALLY {
        return Err(FieldError::FieldLocked(DIFFICULTY.to_string()));
    }
    if parse_finite(difficulty).is_none() {
        return Err(FieldError::InvalidNumericFormat(DIFFICULTY.to_string()));
    }
    Ok(())
}

fn check_numeric(name: &str, value: &Value) -> Result<f64, FieldError> {
    json_number(value).ok_or_else(|| FieldError::InvalidNumericFormat(name.to_string()))
}

/// Only the first pair is inspected; coordinate ranges are checked downstream.
pub(crate) fn check_path(value: &Value) -> Result<(), FieldError> {
    let expected = "an array of [lng, lat] pairs";
    let points = value
        .as_array()
        .ok_or_else(|| FieldError::shape(PATH, expected))?;

    match points.first() {
        None => Ok(()),
        Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(FieldError::shape(PATH, expected)),
    }
}

pub(crate) fn check_elevations(value: &Value) -> Result<(), FieldError> {
    if value.is_array() {
        Ok(())
    } else {
        Err(FieldError::shape(ELEVATIONS, "an array of numbers"))
    }
}

/// Returns `(lng, lat)` of a `[lng, lat]` pair.
fn check_coordinates(value: &Value) -> Result<(f64, f64), FieldError> {
    let shape = || FieldError::shape(COORDINATES, "a [lng, lat] pair of numbers");
    match value.as_array().map(Vec::as_slice) {
        Some([lng, lat]) => {
            let lng = json_number(lng).ok_or_else(shape)?;
            let lat = json_number(lat).ok_or_else(shape)?;
            Ok((lng, lat))
        }
        _ => Err(shape()),
    }
}

/// A JSON number, or a string holding one.
pub(crate) fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_finite(s.trim()),
        _ => None,
    }
}
