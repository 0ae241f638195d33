// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Zone creation and edits: validation and sanitization of `POST /zones`
//! and `PUT /zones` bodies.

use crate::error::FieldError;
use crate::models::adventure::ADVENTURE_TYPES;
use crate::models::mutation::{id_from_value, FieldUpdate, FieldValue};
use crate::models::Zone;
use crate::services::field_validator::json_number;
use serde::Deserialize;
use serde_json::Value;

/// Columns a zone edit may target.
pub const EDITABLE_ZONE_FIELDS: [&str; 5] =
    ["zone_name", "bio", "coordinates", "nearest_city", "public"];

/// Members every new zone must carry.
pub const REQUIRED_ZONE_PROPERTIES: [&str; 5] = [
    "adventure_type",
    "zone_name",
    "coordinates",
    "public",
    "nearest_city",
];

/// Request body of `POST /zones`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateZoneRequest {
    #[serde(default)]
    pub zone: Option<Value>,
}

/// A validated new zone, before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewZone {
    pub adventure_type: String,
    pub zone_name: String,
    pub nearest_city: String,
    pub bio: String,
    pub coordinates_lat: f64,
    pub coordinates_lng: f64,
    pub public: bool,
}

impl NewZone {
    pub fn into_zone(self, id: impl Into<String>, creator_id: u64) -> Zone {
        Zone {
            zone_name: self.zone_name,
            bio: self.bio,
            nearest_city: self.nearest_city,
            coordinates_lat: self.coordinates_lat,
            coordinates_lng: self.coordinates_lng,
            public: self.public,
            creator_id: Some(creator_id),
            ..Zone::new(id, self.adventure_type)
        }
    }
}

/// Validate a zone creation body.
///
/// Checks run in order: the `zone` object, required members, the adventure
/// type, then the shape of each member.
pub fn validate_new_zone(request: &CreateZoneRequest) -> Result<NewZone, FieldError> {
    let zone = request
        .zone
        .as_ref()
        .and_then(Value::as_object)
        .ok_or_else(|| FieldError::MissingRequiredFields("zone".to_string()))?;

    let missing: Vec<&str> = REQUIRED_ZONE_PROPERTIES
        .iter()
        .copied()
        .filter(|name| zone.get(*name).is_none_or(Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(FieldError::MissingRequiredFields(missing.join(", ")));
    }

    let adventure_type = zone
        .get("adventure_type")
        .and_then(Value::as_str)
        .filter(|kind| ADVENTURE_TYPES.contains(kind))
        .ok_or_else(|| {
            FieldError::shape("adventure_type", "one of ski, hike, bike, skiApproach, climb")
        })?;

    let (lat, lng) = zone_coordinates(&zone["coordinates"])?;
    let public = coerce_public(&zone["public"])?;

    let text = |name: &str| {
        zone.get(name)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| FieldError::shape(name, "a string"))
    };
    let bio = match zone.get("bio") {
        None | Some(Value::Null) => String::new(),
        Some(_) => text("bio")?,
    };

    Ok(NewZone {
        adventure_type: adventure_type.to_string(),
        zone_name: text("zone_name")?,
        nearest_city: text("nearest_city")?,
        bio,
        coordinates_lat: lat,
        coordinates_lng: lng,
        public,
    })
}

/// One field of a zone edit as received.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawZoneMutation {
    #[serde(default)]
    pub field_name: Option<Value>,
    #[serde(default)]
    pub field_value: Option<Value>,
    #[serde(default)]
    pub zone_id: Option<Value>,
}

/// Request body of `PUT /zones`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneEditRequest {
    #[serde(default)]
    pub field: Option<RawZoneMutation>,
}

/// A validated zone edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneMutation {
    pub zone_id: String,
    pub field_name: String,
    pub field_value: Value,
}

pub fn validate_zone_edit(request: &ZoneEditRequest) -> Result<ZoneMutation, FieldError> {
    let raw = request
        .field
        .as_ref()
        .ok_or_else(|| FieldError::MissingRequiredFields("field".to_string()))?;

    let field_name = match &raw.field_name {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        _ => return Err(FieldError::MissingRequiredFields("field_name".to_string())),
    };
    let field_value = match &raw.field_value {
        Some(value) if !value.is_null() => value.clone(),
        _ => return Err(FieldError::MissingRequiredFields("field_value".to_string())),
    };
    let zone_id = raw
        .zone_id
        .as_ref()
        .and_then(id_from_value)
        .ok_or_else(|| FieldError::MissingRequiredFields("zone_id".to_string()))?;

    if !EDITABLE_ZONE_FIELDS.contains(&field_name.as_str()) {
        return Err(FieldError::ImmutableField(field_name));
    }

    match field_name.as_str() {
        "coordinates" => {
            zone_coordinates(&field_value)?;
        }
        "public" => {
            coerce_public(&field_value)?;
        }
        _ => {}
    }

    Ok(ZoneMutation {
        zone_id,
        field_name,
        field_value,
    })
}

/// Produce the store updates for a validated zone edit.
pub fn sanitize_zone_edit(mutation: &ZoneMutation) -> Result<Vec<FieldUpdate>, FieldError> {
    let zone_id = mutation.zone_id.as_str();

    let updates = match mutation.field_name.as_str() {
        "coordinates" => {
            let (lat, lng) = zone_coordinates(&mutation.field_value)?;
            vec![
                FieldUpdate::for_zone(zone_id, "coordinates_lat", FieldValue::Number(lat)),
                FieldUpdate::for_zone(zone_id, "coordinates_lng", FieldValue::Number(lng)),
            ]
        }
        "public" => vec![FieldUpdate::for_zone(
            zone_id,
            "public",
            FieldValue::Bool(coerce_public(&mutation.field_value)?),
        )],
        name => vec![FieldUpdate::for_zone(
            zone_id,
            name,
            FieldValue::from_json(mutation.field_value.clone()),
        )],
    };

    Ok(updates)
}

/// `{ lat, lng }` with numeric members, as `(lat, lng)`.
fn zone_coordinates(value: &Value) -> Result<(f64, f64), FieldError> {
    let shape = || FieldError::shape("coordinates", "an object with numeric lat and lng");
    let object = value.as_object().ok_or_else(shape)?;
    let lat = object.get("lat").and_then(json_number).ok_or_else(shape)?;
    let lng = object.get("lng").and_then(json_number).ok_or_else(shape)?;
    Ok((lat, lng))
}

fn coerce_public(value: &Value) -> Result<bool, FieldError> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) if n.as_u64() == Some(0) => Ok(false),
        Value::Number(n) if n.as_u64() == Some(1) => Ok(true),
        Value::String(s) => match s.as_str() {
            "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            _ => Err(FieldError::shape("public", "a boolean")),
        },
        _ => Err(FieldError::shape("public", "a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: Value) -> ZoneEditRequest {
        serde_json::from_value(body).unwrap()
    }

    fn new_zone(zone: Value) -> Result<NewZone, FieldError> {
        validate_new_zone(&serde_json::from_value(json!({ "zone": zone })).unwrap())
    }

    #[test]
    fn test_new_zone() {
        let zone = new_zone(json!({
            "adventure_type": "climb",
            "zone_name": "Cathedral Group",
            "coordinates": { "lat": 43.74, "lng": -110.8 },
            "public": 1,
            "nearest_city": "Jackson"
        }))
        .unwrap();
        assert_eq!(zone.coordinates_lat, 43.74);
        assert!(zone.public);
        assert_eq!(zone.bio, "");

        let stored = zone.into_zone("z9", 77);
        assert_eq!(stored.id, "z9");
        assert_eq!(stored.adventure_type, "climb");
        assert_eq!(stored.creator_id, Some(77));
        assert!(stored.adventures.is_empty());
    }

    #[test]
    fn test_new_zone_lists_missing_members() {
        assert_eq!(
            validate_new_zone(&CreateZoneRequest::default()).unwrap_err(),
            FieldError::MissingRequiredFields("zone".to_string())
        );
        assert_eq!(
            new_zone(json!({ "adventure_type": "ski", "zone_name": "Teton Pass", "public": null }))
                .unwrap_err(),
            FieldError::MissingRequiredFields("coordinates, public, nearest_city".to_string())
        );
    }

    #[test]
    fn test_new_zone_adventure_type() {
        let err = new_zone(json!({
            "adventure_type": "kayak",
            "zone_name": "Snake River",
            "coordinates": { "lat": 43.5, "lng": -110.7 },
            "public": true,
            "nearest_city": "Wilson"
        }))
        .unwrap_err();
        assert!(matches!(err, FieldError::InvalidFieldShape { ref field, .. } if field == "adventure_type"));
    }

    #[test]
    fn test_public_coerced_to_bool() {
        let mutation = validate_zone_edit(&request(json!({
            "field": { "field_name": "public", "field_value": "1", "zone_id": 4 }
        })))
        .unwrap();
        assert_eq!(mutation.zone_id, "4");

        let updates = sanitize_zone_edit(&mutation).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].value, FieldValue::Bool(true));
    }

    #[test]
    fn test_public_rejects_other_values() {
        let err = validate_zone_edit(&request(json!({
            "field": { "field_name": "public", "field_value": "yes", "zone_id": "4" }
        })))
        .unwrap_err();
        assert!(matches!(err, FieldError::InvalidFieldShape { .. }));
    }

    #[test]
    fn test_non_editable_field() {
        let err = validate_zone_edit(&request(json!({
            "field": { "field_name": "rating", "field_value": "5:1", "zone_id": "4" }
        })))
        .unwrap_err();
        assert_eq!(err, FieldError::ImmutableField("rating".to_string()));
    }

    #[test]
    fn test_missing_members() {
        assert_eq!(
            validate_zone_edit(&request(json!({}))).unwrap_err(),
            FieldError::MissingRequiredFields("field".to_string())
        );
        assert_eq!(
            validate_zone_edit(&request(json!({
                "field": { "field_name": 3, "field_value": "x", "zone_id": "4" }
            })))
            .unwrap_err(),
            FieldError::MissingRequiredFields("field_name".to_string())
        );
        assert_eq!(
            validate_zone_edit(&request(json!({
                "field": { "field_name": "bio", "field_value": null, "zone_id": "4" }
            })))
            .unwrap_err(),
            FieldError::MissingRequiredFields("field_value".to_string())
        );
        assert_eq!(
            validate_zone_edit(&request(json!({
                "field": { "field_name": "bio", "field_value": "x" }
            })))
            .unwrap_err(),
            FieldError::MissingRequiredFields("zone_id".to_string())
        );
    }

    #[test]
    fn test_falsy_values_are_present() {
        let mutation = validate_zone_edit(&request(json!({
            "field": { "field_name": "bio", "field_value": "", "zone_id": "4" }
        })))
        .unwrap();
        let updates = sanitize_zone_edit(&mutation).unwrap();
        assert_eq!(updates[0].value, FieldValue::Text(String::new()));
    }

    #[test]
    fn test_coordinates_fan_out() {
        let mutation = validate_zone_edit(&request(json!({
            "field": {
                "field_name": "coordinates",
                "field_value": { "lat": 43.7, "lng": "-110.8" },
                "zone_id": "z1"
            }
        })))
        .unwrap();

        let updates = sanitize_zone_edit(&mutation).unwrap();
        assert_eq!(updates[0].name, "coordinates_lat");
        assert_eq!(updates[0].value, FieldValue::Number(43.7));
        assert_eq!(updates[1].name, "coordinates_lng");
        assert_eq!(updates[1].value, FieldValue::Number(-110.8));
    }

    #[test]
    fn test_coordinates_shape() {
        let err = validate_zone_edit(&request(json!({
            "field": { "field_name": "coordinates", "field_value": [1, 2], "zone_id": "z1" }
        })))
        .unwrap_err();
        assert!(matches!(err, FieldError::InvalidFieldShape { ref field, .. } if field == "coordinates"));
    }
}
