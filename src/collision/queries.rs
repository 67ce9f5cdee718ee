use glam::Vec3;

use crate::core::{
    collider::{Collider, ColliderShape},
    mesh::DeformableMesh,
    types::{Plane, Ray, Transform},
};

/// Result of a ray cast against the object's hit surface or a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct RaycastQuery {
    pub ray: Ray,
    pub max_distance: f32,
}

impl RaycastQuery {
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32) -> Self {
        Self {
            ray: Ray::new(origin, direction),
            max_distance,
        }
    }

    pub fn unbounded(ray: Ray) -> Self {
        Self {
            ray,
            max_distance: f32::INFINITY,
        }
    }
}

pub struct Raycast;

impl Raycast {
    /// Casts against a single collider attached to a body at `body_transform`.
    ///
    /// `mesh` supplies triangles for [`ColliderShape::Mesh`]; without it a mesh
    /// collider never reports a hit.
    pub fn cast(
        query: &RaycastQuery,
        collider: &Collider,
        body_transform: &Transform,
        mesh: Option<&DeformableMesh>,
    ) -> Option<RaycastHit> {
        if query.ray.direction == Vec3::ZERO {
            return None;
        }
        let world_transform = collider.world_transform(body_transform);

        match &collider.shape {
            ColliderShape::Sphere { radius } => {
                let scale = world_transform.scale.abs().max_element();
                Self::ray_sphere(query, world_transform.position, *radius * scale).map(
                    |(point, distance)| RaycastHit {
                        point,
                        normal: (point - world_transform.position).normalize_or_zero(),
                        distance,
                    },
                )
            }
            ColliderShape::Box { half_extents } => {
                Self::ray_obb(query, &world_transform, *half_extents)
            }
            ColliderShape::Mesh => {
                let mesh = mesh?;
                mesh.world_triangles(&world_transform)
                    .filter_map(|tri| Self::ray_triangle(query, tri))
                    .min_by(|a, b| a.distance.total_cmp(&b.distance))
            }
        }
    }

    pub fn cast_plane(query: &RaycastQuery, plane: &Plane) -> Option<RaycastHit> {
        let t = plane.intersect_ray(&query.ray)?;
        if t > query.max_distance {
            return None;
        }
        Some(RaycastHit {
            point: query.ray.at(t),
            normal: plane.normal,
            distance: t,
        })
    }

    fn ray_sphere(query: &RaycastQuery, center: Vec3, radius: f32) -> Option<(Vec3, f32)> {
        let oc = query.ray.origin - center;
        let dir = query.ray.direction;
        let b = oc.dot(dir);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_disc = discriminant.sqrt();
        let mut t = -b - sqrt_disc;
        if t < 0.0 {
            // Origin inside the sphere.
            t = -b + sqrt_disc;
        }
        if t < 0.0 || t > query.max_distance {
            return None;
        }
        Some((query.ray.at(t), t))
    }

    /// Slab test in the box's local frame.
    fn ray_obb(
        query: &RaycastQuery,
        transform: &Transform,
        half_extents: Vec3,
    ) -> Option<RaycastHit> {
        let half_extents = half_extents * transform.scale.abs();
        let inv_rotation = transform.rotation.inverse();
        let origin = inv_rotation * (query.ray.origin - transform.position);
        let dir = inv_rotation * query.ray.direction;

        let mut t_min = 0.0;
        let mut t_max = query.max_distance;
        let mut normal = Vec3::ZERO;

        for i in 0..3 {
            let origin_component = origin[i];
            let dir_component = dir[i];
            let min = -half_extents[i];
            let max = half_extents[i];

            if dir_component.abs() < 1e-6 {
                if origin_component < min || origin_component > max {
                    return None;
                }
            } else {
                let inv_dir = 1.0 / dir_component;
                let mut t1 = (min - origin_component) * inv_dir;
                let mut t2 = (max - origin_component) * inv_dir;
                let mut axis_normal = Vec3::ZERO;
                axis_normal[i] = -dir_component.signum();

                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }

                if t1 > t_min {
                    t_min = t1;
                    normal = axis_normal;
                }

                t_max = t_max.min(t2);
                if t_min > t_max {
                    return None;
                }
            }
        }

        Some(RaycastHit {
            point: query.ray.at(t_min),
            normal: transform.rotation * normal,
            distance: t_min,
        })
    }

    /// Möller–Trumbore, two-sided.
    fn ray_triangle(query: &RaycastQuery, [a, b, c]: [Vec3; 3]) -> Option<RaycastHit> {
        let edge1 = b - a;
        let edge2 = c - a;
        let dir = query.ray.direction;
        let p = dir.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < 1e-8 {
            return None;
        }
        let inv_det = 1.0 / det;
        let s = query.ray.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let q = s.cross(edge1);
        let v = dir.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(q) * inv_det;
        if t < 0.0 || t > query.max_distance {
            return None;
        }

        let mut normal = edge1.cross(edge2).normalize_or_zero();
        if normal.dot(dir) > 0.0 {
            normal = -normal;
        }
        Some(RaycastHit {
            point: query.ray.at(t),
            normal,
            distance: t,
        })
    }
}
