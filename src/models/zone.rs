// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Zone model: a named geographic grouping of adventures and subzones.

use crate::error::FieldError;
use crate::models::mutation::{set_bool, set_number, set_text, FieldValue};
use serde::{Deserialize, Serialize};

/// Stored zone record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Document ID
    pub id: String,
    pub adventure_type: String,
    #[serde(default)]
    pub zone_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub nearest_city: String,
    #[serde(default)]
    pub coordinates_lat: f64,
    #[serde(default)]
    pub coordinates_lng: f64,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub creator_id: Option<u64>,
    /// Adventure IDs directly inside this zone
    #[serde(default)]
    pub adventures: Vec<String>,
    /// Child zone IDs
    #[serde(default)]
    pub subzones: Vec<String>,
}

impl Zone {
    pub fn new(id: impl Into<String>, adventure_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            adventure_type: adventure_type.into(),
            zone_name: String::new(),
            bio: String::new(),
            nearest_city: String::new(),
            coordinates_lat: 0.0,
            coordinates_lng: 0.0,
            public: false,
            creator_id: None,
            adventures: Vec::new(),
            subzones: Vec::new(),
        }
    }

    /// Set one editable column from a sanitized update.
    pub fn apply(&mut self, name: &str, value: &FieldValue) -> Result<(), FieldError> {
        match name {
            "zone_name" => self.zone_name = set_text(name, value)?,
            "bio" => self.bio = set_text(name, value)?,
            "nearest_city" => self.nearest_city = set_text(name, value)?,
            "coordinates_lat" => self.coordinates_lat = set_number(name, value)?,
            "coordinates_lng" => self.coordinates_lng = set_number(name, value)?,
            "public" => self.public = set_bool(name, value)?,
            "id" | "adventure_type" | "creator_id" | "adventures" | "subzones" => {
                return Err(FieldError::ImmutableField(name.to_string()))
            }
            _ => return Err(FieldError::UnknownField(name.to_string())),
        }
        Ok(())
    }
}
