// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Adventure model for storage and API.

use crate::error::FieldError;
use crate::models::average::EncodedAverage;
use crate::models::mutation::{set_bool, set_number, set_text, FieldValue};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Adventure types accepted by the catalogue.
pub const ADVENTURE_TYPES: [&str; 5] = ["ski", "hike", "bike", "skiApproach", "climb"];

/// Difficulty is frozen once more than this many completions were folded in.
pub const MAX_EDITABLE_DIFFICULTY_TALLY: u32 = 1;

/// Which running average a swap or lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AverageField {
    Rating,
    Difficulty,
}

impl AverageField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AverageField::Rating => "rating",
            AverageField::Difficulty => "difficulty",
        }
    }
}

/// Stored adventure record.
///
/// Ski approach distance is kept as text, every other distance is numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Adventure {
    /// Document ID
    pub id: String,
    /// One of [`ADVENTURE_TYPES`]
    pub adventure_type: String,
    #[serde(default)]
    pub adventure_name: String,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub creator_id: Option<u64>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub nearest_city: String,
    #[serde(default)]
    pub coordinates_lat: f64,
    #[serde(default)]
    pub coordinates_lng: f64,

    // ─── Route Metrics ───────────────────────────────────────────
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub approach_distance: String,
    #[serde(default)]
    pub exposure: f64,
    #[serde(default)]
    pub summit_elevation: f64,
    #[serde(default)]
    pub base_elevation: f64,
    #[serde(default)]
    pub avg_angle: f64,
    #[serde(default)]
    pub max_angle: f64,
    #[serde(default)]
    pub pitches: f64,
    #[serde(default)]
    pub climb: f64,
    #[serde(default)]
    pub descent: f64,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub gear: String,

    // ─── Running Averages ────────────────────────────────────────
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub rating: EncodedAverage,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub difficulty: EncodedAverage,

    // ─── Route Geometry ──────────────────────────────────────────
    /// JSON-encoded `[[lng, lat], ...]`
    #[serde(default = "empty_json_array")]
    pub trail_path: String,
    /// JSON-encoded `[number, ...]`
    #[serde(default = "empty_json_array")]
    pub elevations: String,
}

fn empty_json_array() -> String {
    "[]".to_string()
}

impl Adventure {
    /// A blank adventure with no ratings and no path.
    pub fn new(id: impl Into<String>, adventure_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            adventure_type: adventure_type.into(),
            adventure_name: String::new(),
            creator_id: None,
            public: false,
            bio: String::new(),
            nearest_city: String::new(),
            coordinates_lat: 0.0,
            coordinates_lng: 0.0,
            distance: 0.0,
            approach_distance: String::new(),
            exposure: 0.0,
            summit_elevation: 0.0,
            base_elevation: 0.0,
            avg_angle: 0.0,
            max_angle: 0.0,
            pitches: 0.0,
            climb: 0.0,
            descent: 0.0,
            grade: String::new(),
            season: String::new(),
            gear: String::new(),
            rating: EncodedAverage::UNRATED,
            difficulty: EncodedAverage::UNRATED,
            trail_path: empty_json_array(),
            elevations: empty_json_array(),
        }
    }

    pub fn average(&self, field: AverageField) -> EncodedAverage {
        match field {
            AverageField::Rating => self.rating,
            AverageField::Difficulty => self.difficulty,
        }
    }

    pub fn set_average(&mut self, field: AverageField, value: EncodedAverage) {
        match field {
            AverageField::Rating => self.rating = value,
            AverageField::Difficulty => self.difficulty = value,
        }
    }

    /// Set one column from a sanitized update.
    ///
    /// `rating` only changes through completions and is rejected here.
    /// A `difficulty` edit replaces the average only; the stored tally never
    /// decreases, and the edit is refused once the stored tally is locked.
    pub fn apply(&mut self, name: &str, value: &FieldValue) -> Result<(), FieldError> {
        match name {
            "adventure_name" => self.adventure_name = set_text(name, value)?,
            "bio" => self.bio = set_text(name, value)?,
            "nearest_city" => self.nearest_city = set_text(name, value)?,
            "approach_distance" => self.approach_distance = set_text(name, value)?,
            "grade" => self.grade = set_text(name, value)?,
            "season" => self.season = set_text(name, value)?,
            "gear" => self.gear = set_text(name, value)?,
            "trail_path" => self.trail_path = set_text(name, value)?,
            "elevations" => self.elevations = set_text(name, value)?,
            "public" => self.public = set_bool(name, value)?,
            "coordinates_lat" => self.coordinates_lat = set_number(name, value)?,
            "coordinates_lng" => self.coordinates_lng = set_number(name, value)?,
            "distance" => self.distance = set_number(name, value)?,
            "exposure" => self.exposure = set_number(name, value)?,
            "summit_elevation" => self.summit_elevation = set_number(name, value)?,
            "base_elevation" => self.base_elevation = set_number(name, value)?,
            "avg_angle" => self.avg_angle = set_number(name, value)?,
            "max_angle" => self.max_angle = set_number(name, value)?,
            "pitches" => self.pitches = set_number(name, value)?,
            "climb" => self.climb = set_number(name, value)?,
            "descent" => self.descent = set_number(name, value)?,
            "difficulty" => {
                if self.difficulty.tally > MAX_EDITABLE_DIFFICULTY_TALLY {
                    return Err(FieldError::FieldLocked(name.to_string()));
                }
                let edited = EncodedAverage::decode(&set_text(name, value)?)?;
                self.difficulty =
                    EncodedAverage::new(edited.average, self.difficulty.tally.max(edited.tally));
            }
            "rating" | "id" | "adventure_type" | "creator_id" => {
                return Err(FieldError::ImmutableField(name.to_string()))
            }
            _ => return Err(FieldError::UnknownField(name.to_string())),
        }
        Ok(())
    }
}
