//! Error types raised while building a deformable object.
//!
//! Steady-state updates never fail; only construction-time validation of
//! meshes and configuration reports errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeformError {
    #[error("mesh has no vertices")]
    EmptyMesh,

    #[error("triangle {triangle} references vertex {index}, mesh has {vertex_count}")]
    TriangleIndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

impl DeformError {
    pub fn invalid_config(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidConfig { field, reason }
    }
}

pub type Result<T> = std::result::Result<T, DeformError>;
