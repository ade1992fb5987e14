//! Ray casting against the scene.
//!
//! Hit-regions and solids live in model space; rays are moved into model
//! space by subtracting the root offset before testing.

use bookcase_core::Cell;
use glam::Vec3;

use crate::builder::PrimitiveRole;
use crate::geometry::BoundingBox;
use crate::scene::SceneGraph;

/// Half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Same ray shifted by `-offset`.
    pub fn relative_to(&self, offset: Vec3) -> Ray {
        Ray {
            origin: self.origin - offset,
            direction: self.direction,
        }
    }

    /// Distance to the nearest intersection with `bounds` (slab method).
    ///
    /// A ray starting inside the box hits it at distance zero.
    pub fn intersect_box(&self, bounds: &BoundingBox) -> Option<f32> {
        let inv = self.direction.recip();
        let t1 = (bounds.min - self.origin) * inv;
        let t2 = (bounds.max - self.origin) * inv;

        let t_near = t1.min(t2).max_element();
        let t_far = t1.max(t2).min_element();

        if t_near.is_nan() || t_far.is_nan() || t_far < t_near.max(0.0) {
            return None;
        }
        Some(t_near.max(0.0))
    }

    /// Intersection with the horizontal plane at height `y`.
    pub fn intersect_horizontal_plane(&self, y: f32) -> Option<Vec3> {
        if self.direction.y.abs() < 1e-6 {
            return None;
        }
        let t = (y - self.origin.y) / self.direction.y;
        (t >= 0.0).then(|| {
            let mut point = self.at(t);
            point.y = y;
            point
        })
    }
}

/// Where a ray met something.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray.
    pub distance: f32,
    /// World-space point.
    pub point: Vec3,
}

/// A compartment hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionHit {
    pub cell: Cell,
    pub hit: RayHit,
}

/// A solid hit by a ray.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidHit {
    pub index: usize,
    pub name: String,
    pub role: PrimitiveRole,
    pub hit: RayHit,
}

/// Nearest compartment hit-region along a world-space ray.
pub fn pick_hit_region(scene: &SceneGraph, ray: &Ray) -> Option<RegionHit> {
    let local = ray.relative_to(scene.root_position());
    scene
        .hit_regions()
        .iter()
        .filter_map(|region| {
            local.intersect_box(&region.bounds).map(|distance| RegionHit {
                cell: region.cell,
                hit: RayHit {
                    distance,
                    point: ray.at(distance),
                },
            })
        })
        .min_by(|a, b| a.hit.distance.total_cmp(&b.hit.distance))
}

/// Nearest visible solid along a world-space ray.
pub fn pick_solid(scene: &SceneGraph, ray: &Ray) -> Option<SolidHit> {
    let local = ray.relative_to(scene.root_position());
    scene
        .solids()
        .iter()
        .enumerate()
        .filter_map(|(index, node)| {
            let distance = local.intersect_box(&node.primitive().shape.bounding_box())?;
            Some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, distance)| {
            let primitive = scene.solids()[index].primitive();
            SolidHit {
                index,
                name: primitive.name.clone(),
                role: primitive.role,
                hit: RayHit {
                    distance,
                    point: ray.at(distance),
                },
            }
        })
}
