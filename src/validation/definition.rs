//! Externally-authored waypoint definitions
//!
//! Quest content arrives as camelCase JSON with string-typed coordinates.
//! Everything is validated here, at registration time; malformed input
//! fails with a descriptive error instead of silently defaulting to 0,
//! and nothing past this boundary ever re-validates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::GeoPosition;
use crate::quest::waypoint::Waypoint;

/// One authored quest stop, as serialized by the content pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointDefinition {
    /// Select this stop as the initial navigation target
    #[serde(default)]
    pub active: bool,
    /// Latitude in decimal degrees, string-typed in the authoring format
    pub latitude: String,
    /// Longitude in decimal degrees, string-typed in the authoring format
    pub longitude: String,
    pub label: String,
    pub activation_radius_meters: f64,
    #[serde(default)]
    pub appearance_token: Option<String>,
}

/// Registration-time validation failures
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("invalid latitude '{value}' for waypoint '{label}': {source}")]
    InvalidLatitude {
        label: String,
        value: String,
        source: std::num::ParseFloatError,
    },
    #[error("invalid longitude '{value}' for waypoint '{label}': {source}")]
    InvalidLongitude {
        label: String,
        value: String,
        source: std::num::ParseFloatError,
    },
    #[error("latitude {value} out of range [-90, 90] for waypoint '{label}'")]
    LatitudeOutOfRange { label: String, value: f64 },
    #[error("longitude {value} out of range [-180, 180] for waypoint '{label}'")]
    LongitudeOutOfRange { label: String, value: f64 },
    #[error("activation radius must be positive, got {value} for waypoint '{label}'")]
    InvalidRadius { label: String, value: f64 },
    #[error("waypoint definition has an empty label")]
    EmptyLabel,
    #[error("malformed waypoint definition set: {0}")]
    Format(#[from] serde_json::Error),
}

/// Validate one definition and build the waypoint it describes.
pub fn parse_definition(definition: &WaypointDefinition) -> Result<Waypoint, DefinitionError> {
    let label = definition.label.trim();
    if label.is_empty() {
        return Err(DefinitionError::EmptyLabel);
    }

    let latitude: f64 =
        definition
            .latitude
            .trim()
            .parse()
            .map_err(|source| DefinitionError::InvalidLatitude {
                label: label.to_string(),
                value: definition.latitude.clone(),
                source,
            })?;
    let longitude: f64 =
        definition
            .longitude
            .trim()
            .parse()
            .map_err(|source| DefinitionError::InvalidLongitude {
                label: label.to_string(),
                value: definition.longitude.clone(),
                source,
            })?;

    // "NaN" and "inf" parse as valid f64 and must not slip through
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(DefinitionError::LatitudeOutOfRange {
            label: label.to_string(),
            value: latitude,
        });
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(DefinitionError::LongitudeOutOfRange {
            label: label.to_string(),
            value: longitude,
        });
    }
    if !definition.activation_radius_meters.is_finite() || definition.activation_radius_meters <= 0.0
    {
        return Err(DefinitionError::InvalidRadius {
            label: label.to_string(),
            value: definition.activation_radius_meters,
        });
    }

    let mut waypoint = Waypoint::new(
        label,
        GeoPosition::new(latitude, longitude, 0.0),
        definition.activation_radius_meters,
    );
    if let Some(token) = &definition.appearance_token {
        waypoint = waypoint.with_appearance_token(token.clone());
    }
    Ok(waypoint)
}

/// Parse a whole authored definition set from JSON.
pub fn load_definitions(json: &str) -> Result<Vec<WaypointDefinition>, DefinitionError> {
    Ok(serde_json::from_str(json)?)
}
