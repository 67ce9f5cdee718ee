//! Mesh write-back of the simulated vertex state.

pub mod writer;

pub use writer::MeshDeformationWriter;
