// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Field mutations: raw requests, validated mutations, and the
//! persistence-ready updates produced by sanitization.

use crate::error::FieldError;
use crate::models::average::parse_finite;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single-field edit exactly as it arrives in a request body.
///
/// Every member is optional so that missing or `null` members surface as
/// [`FieldError::MissingRequiredFields`] instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFieldMutation {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub adventure_id: Option<Value>,
    #[serde(default)]
    pub adventure_type: Option<Value>,
}

/// An adventure field mutation that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMutation {
    pub name: String,
    pub value: Value,
    pub adventure_id: String,
    pub adventure_type: String,
    /// Typed reading of `value` established by the validator
    pub checked: CheckedValue,
}

/// What validation learned about a mutation's value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CheckedValue {
    /// Passed through as received
    #[default]
    Plain,
    /// A numeric column, parsed
    Number(f64),
    /// A `[lng, lat]` pair
    Coordinates { lng: f64, lat: f64 },
}

/// The record a field update targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldOwner {
    Adventure {
        adventure_id: String,
        adventure_type: String,
    },
    Zone {
        zone_id: String,
    },
    User {
        user_id: u64,
    },
}

/// A sanitized value in the representation the store expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Json(Value),
}

impl FieldValue {
    /// Convert a validated JSON value without renaming or coercion.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => FieldValue::Text(s),
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => FieldValue::Number(f),
                None => FieldValue::Json(Value::Number(n)),
            },
            other => FieldValue::Json(other),
        }
    }

    /// Numeric view; numeric strings are accepted.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => parse_finite(s.trim()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Boolean view; `0`/`1` are accepted for legacy clients.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Number(n) if *n == 0.0 => Some(false),
            FieldValue::Number(n) if *n == 1.0 => Some(true),
            _ => None,
        }
    }
}

/// A persistence-ready instruction to set one field on one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldUpdate {
    pub name: String,
    pub value: FieldValue,
    #[serde(flatten)]
    pub owner: FieldOwner,
}

impl FieldUpdate {
    pub fn for_adventure(
        adventure_id: &str,
        adventure_type: &str,
        name: impl Into<String>,
        value: FieldValue,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            owner: FieldOwner::Adventure {
                adventure_id: adventure_id.to_string(),
                adventure_type: adventure_type.to_string(),
            },
        }
    }

    pub fn for_zone(zone_id: &str, name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
            owner: FieldOwner::Zone {
                zone_id: zone_id.to_string(),
            },
        }
    }

    pub fn for_user(user_id: u64, name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
            owner: FieldOwner::User { user_id },
        }
    }
}

/// Normalise a JSON id member (string or integer) into a string id.
///
/// Returns `None` for absent, empty, or non-scalar ids.
pub fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.is_u64() || n.is_i64() => Some(n.to_string()),
        _ => None,
    }
}

/// Typed setters shared by the stored record models.
pub(crate) fn set_text(field: &str, value: &FieldValue) -> Result<String, FieldError> {
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| FieldError::shape(field, "a string"))
}

pub(crate) fn set_number(field: &str, value: &FieldValue) -> Result<f64, FieldError> {
    value
        .as_f64()
        .ok_or_else(|| FieldError::InvalidNumericFormat(field.to_string()))
}

pub(crate) fn set_bool(field: &str, value: &FieldValue) -> Result<bool, FieldError> {
    value
        .as_bool()
        .ok_or_else(|| FieldError::shape(field, "a boolean"))
}
