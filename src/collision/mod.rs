//! Ray queries against the object's own hit surface and arbitrary planes.

pub mod queries;

pub use queries::{Raycast, RaycastHit, RaycastQuery};
