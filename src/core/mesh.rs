use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::types::Transform;
use crate::error::{DeformError, Result};

/// Axis-aligned bounding box used for mesh bounds and the height falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.extend(p);
        }
        bounds
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// Persisted form of a mesh: the rest pose and its triangles.
///
/// Loading goes back through [`DeformableMesh::new`], so a stored mesh is
/// validated exactly like a freshly built one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

/// Triangle mesh whose vertices are displaced every fixed step.
///
/// The rest buffer is captured at construction and never changes. The working
/// buffer is what a renderer reads; normals are rebuilt only when requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MeshData", into = "MeshData")]
pub struct DeformableMesh {
    rest_vertices: Vec<Vec3>,
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<[u32; 3]>,
    rest_bounds: Aabb,
    normals_dirty: bool,
    normal_rebuilds: u64,
}

impl DeformableMesh {
    pub fn new(vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Result<Self> {
        if vertices.is_empty() {
            return Err(DeformError::EmptyMesh);
        }
        for (triangle, tri) in indices.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(DeformError::TriangleIndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        let rest_bounds = Aabb::from_points(vertices.iter().copied());
        let mut mesh = Self {
            rest_vertices: vertices.clone(),
            normals: vec![Vec3::ZERO; vertices.len()],
            vertices,
            indices,
            rest_bounds,
            normals_dirty: true,
            normal_rebuilds: 0,
        };
        mesh.recalculate_normals();
        Ok(mesh)
    }

    /// Axis-aligned grid in the XY plane, `columns x rows` quads, centred on the origin.
    pub fn grid(columns: usize, rows: usize, size: f32) -> Result<Self> {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let mut vertices = Vec::with_capacity((columns + 1) * (rows + 1));
        let mut indices = Vec::with_capacity(columns * rows * 2);
        let half = size * 0.5;

        for y in 0..=rows {
            for x in 0..=columns {
                vertices.push(Vec3::new(
                    -half + size * x as f32 / columns as f32,
                    -half + size * y as f32 / rows as f32,
                    0.0,
                ));
            }
        }

        let width = columns + 1;
        for y in 0..rows {
            for x in 0..columns {
                let i = y * width + x;
                let a = i as u32;
                let b = (i + 1) as u32;
                let c = (i + width) as u32;
                let d = (i + width + 1) as u32;
                indices.push([a, b, c]);
                indices.push([b, d, c]);
            }
        }

        Self::new(vertices, indices)
    }

    pub fn vertex_count(&self) -> usize {
        self.rest_vertices.len()
    }

    pub fn rest_vertices(&self) -> &[Vec3] {
        &self.rest_vertices
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn rest_bounds(&self) -> Aabb {
        self.rest_bounds
    }

    /// World-space bounds of the rest pose under `transform`.
    pub fn world_bounds(&self, transform: &Transform) -> Aabb {
        Aabb::from_points(
            self.rest_vertices
                .iter()
                .map(|&local| transform.transform_point(local)),
        )
    }

    /// Resets the working buffer to the rest pose.
    pub fn reset_to_rest(&mut self) {
        self.vertices.copy_from_slice(&self.rest_vertices);
        self.normals_dirty = true;
    }

    /// Rebuilds the working buffer from the rest pose, vertex by vertex.
    ///
    /// `blend` receives the vertex id and its rest position and returns the
    /// working position. Normals are flagged for recomputation.
    pub fn rewrite_from_rest<F>(&mut self, mut blend: F)
    where
        F: FnMut(usize, Vec3) -> Vec3,
    {
        for (id, (out, &rest)) in self
            .vertices
            .iter_mut()
            .zip(self.rest_vertices.iter())
            .enumerate()
        {
            *out = blend(id, rest);
        }
        self.normals_dirty = true;
    }

    pub fn normals_dirty(&self) -> bool {
        self.normals_dirty
    }

    /// Number of times normals have been rebuilt since construction.
    pub fn normal_rebuilds(&self) -> u64 {
        self.normal_rebuilds
    }

    /// Rebuilds area-weighted vertex normals from the working buffer.
    pub fn recalculate_normals(&mut self) {
        for normal in &mut self.normals {
            *normal = Vec3::ZERO;
        }
        for tri in &self.indices {
            let [a, b, c] = tri.map(|i| i as usize);
            let face = (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }
        for normal in &mut self.normals {
            *normal = normal.normalize_or_zero();
        }
        self.normals_dirty = false;
        self.normal_rebuilds += 1;
    }

    /// World-space triangles of the rest pose, used for mesh hit-testing.
    pub fn world_triangles<'a>(
        &'a self,
        transform: &'a Transform,
    ) -> impl Iterator<Item = [Vec3; 3]> + 'a {
        self.indices.iter().map(move |tri| {
            tri.map(|i| transform.transform_point(self.rest_vertices[i as usize]))
        })
    }
}

impl TryFrom<MeshData> for DeformableMesh {
    type Error = DeformError;

    fn try_from(data: MeshData) -> Result<Self> {
        Self::new(data.vertices, data.indices)
    }
}

impl From<DeformableMesh> for MeshData {
    fn from(mesh: DeformableMesh) -> Self {
        Self {
            vertices: mesh.rest_vertices,
            indices: mesh.indices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_out_of_range_meshes() {
        assert_eq!(
            DeformableMesh::new(Vec::new(), Vec::new()).unwrap_err(),
            DeformError::EmptyMesh
        );

        let err = DeformableMesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 3]])
            .unwrap_err();
        assert_eq!(
            err,
            DeformError::TriangleIndexOutOfRange {
                triangle: 0,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn stored_meshes_are_validated_on_load() {
        let bad = MeshData {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            indices: vec![[0, 1, 7]],
        };
        assert!(matches!(
            DeformableMesh::try_from(bad),
            Err(DeformError::TriangleIndexOutOfRange { index: 7, .. })
        ));

        let mut mesh = DeformableMesh::grid(2, 1, 1.0).unwrap();
        mesh.rewrite_from_rest(|_, rest| rest + Vec3::Z);
        let reloaded = DeformableMesh::try_from(MeshData::from(mesh.clone())).unwrap();
        // Only the rest pose is stored; the working buffer restarts from it.
        assert_eq!(reloaded.rest_vertices(), mesh.rest_vertices());
        assert_eq!(reloaded.vertices(), mesh.rest_vertices());
        assert_eq!(reloaded.normals().len(), reloaded.vertex_count());
        assert_eq!(reloaded.indices(), mesh.indices());
    }

    #[test]
    fn grid_normals_face_positive_z() {
        let mesh = DeformableMesh::grid(2, 2, 1.0).unwrap();
        assert_eq!(mesh.vertex_count(), 9);
        for normal in mesh.normals() {
            assert!((normal.z - 1.0).abs() < 1e-5, "normal = {normal:?}");
        }
    }

    #[test]
    fn world_bounds_follow_transform() {
        let mesh = DeformableMesh::grid(1, 1, 2.0).unwrap();
        let bounds = mesh.world_bounds(&Transform::from_position(Vec3::new(0.0, 3.0, 0.0)));
        assert!((bounds.min.y - 2.0).abs() < 1e-6);
        assert!((bounds.max.y - 4.0).abs() < 1e-6);
        assert!((bounds.height() - 2.0).abs() < 1e-6);
    }
}
