//! Static map data: paths, water zones and map-level behavior flags.
//!
//! A default catalog is embedded from `data/maps.json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::SpecialFeatureKind;
use crate::error::ConfigError;
use crate::types::NormPoint;

const BUILTIN_MAPS: &str = include_str!("../data/maps.json");

/// A special spot on the map that overrides default placement rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpecialFeature {
    pub kind: SpecialFeatureKind,
    pub x: f64,
    pub y: f64,
}

/// One playable map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub name: String,
    /// Ordered normalized waypoints; enemies walk from the first to the last.
    pub paths: Vec<Vec<NormPoint>>,
    /// Water polygons in normalized coordinates.
    #[serde(default)]
    pub water_zones: Vec<Vec<NormPoint>>,
    /// Only one quadrant of the board is open for building.
    #[serde(default)]
    pub covered: bool,
    /// The whole board counts as water, but land towers may build on it.
    #[serde(default)]
    pub glass_floor: bool,
    #[serde(default)]
    pub special_feature: Option<SpecialFeature>,
    #[serde(default = "unit_multiplier")]
    pub enemy_health_multiplier: f64,
    #[serde(default = "unit_multiplier")]
    pub enemy_speed_multiplier: f64,
}

fn unit_multiplier() -> f64 {
    1.0
}

/// All maps keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapCatalog {
    pub maps: BTreeMap<String, MapData>,
}

impl MapData {
    /// Every path must have at least one segment.
    pub fn validate(&self, key: &str) -> Result<(), ConfigError> {
        if self.paths.is_empty() || self.paths.iter().any(|p| p.len() < 2) {
            return Err(ConfigError::EmptyPath(key.to_string()));
        }
        Ok(())
    }
}

impl MapCatalog {
    /// The map catalog bundled with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_MAPS)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            what: "map catalog",
            source,
        })
    }

    /// Look up a map, surfacing the missing key.
    pub fn get(&self, key: &str) -> Result<&MapData, ConfigError> {
        self.maps
            .get(key)
            .ok_or_else(|| ConfigError::MissingMap(key.to_string()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.maps.keys().map(String::as_str)
    }
}
