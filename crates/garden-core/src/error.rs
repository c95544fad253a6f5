//! Configuration errors.

use thiserror::Error;

/// A session cannot start because its static data is incomplete.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration for map '{0}'")]
    MissingMap(String),

    #[error("missing configuration for difficulty '{0}'")]
    MissingDifficulty(String),

    #[error("missing configuration for tower type '{0}'")]
    MissingTowerType(String),

    #[error("missing configuration for enemy type '{id}' (referenced by {referenced_by})")]
    MissingEnemyType { id: String, referenced_by: String },

    #[error("map '{0}' has no usable path (needs at least two waypoints)")]
    EmptyPath(String),

    #[error("spawn pool '{0}' is invalid: {1}")]
    InvalidSpawnPool(String, String),

    #[error("failed to parse {what}: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
