//! Runtime faults raised inside a simulation tick.

use thiserror::Error;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// A tick could not complete. The engine stops advancing once one is raised.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// An enemy references a path the map does not have.
    #[error("enemy {enemy_id} references missing path {path_index}")]
    InvalidPath { enemy_id: u32, path_index: usize },

    /// An enemy's waypoint index ran past its path.
    #[error("enemy {enemy_id} has waypoint {waypoint_index} on a path of {path_len} points")]
    InvalidWaypoint {
        enemy_id: u32,
        waypoint_index: usize,
        path_len: usize,
    },

    /// A position or health value became NaN or infinite.
    #[error("non-finite {what} on entity {id}")]
    NonFiniteState { what: &'static str, id: u32 },
}
