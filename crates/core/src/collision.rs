//! Collision oracle for level geometry.
//!
//! Level geometry is a flat list of tagged boxes. Each box may be rotated
//! about Y; its world-space AABB is computed once at construction and every
//! query runs against that AABB:
//! - Movement blocking: sphere vs AABB ([`is_blocked`])
//! - Shots: ray vs AABB, slab method ([`Aabb::ray_distance`])
//!
//! Colliders without a precomputed AABB (the floor plane) never block.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Unique identifier for a collider. Never reused across level generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// Role of a collider in the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderKind {
    Wall,
    Door,
    Floor,
}

impl ColliderKind {
    /// Whether actors and the player are stopped by this kind.
    /// The floor is handled by the ground clamp instead.
    #[inline]
    pub fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall | Self::Door)
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Bounds of a box of `half_extents` rotated by `yaw` about its centre.
    pub fn from_oriented_box(center: Vec3, half_extents: Vec3, yaw: f32) -> Self {
        let (sin, cos) = yaw.sin_cos();
        let (sin, cos) = (sin.abs(), cos.abs());
        let extents = Vec3::new(
            half_extents.x * cos + half_extents.z * sin,
            half_extents.y,
            half_extents.x * sin + half_extents.z * cos,
        );
        Self::from_center_half_extents(center, extents)
    }

    /// Sphere test: the closest point of the box lies within `radius`.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        let closest = center.clamp(self.min, self.max);
        closest.distance_squared(center) <= radius * radius
    }

    /// Distance along `ray` to the first intersection, or None if missed
    /// or beyond `max_dist`. Rays starting inside the box report the exit.
    pub fn ray_distance(&self, ray: &Ray, max_dist: f32) -> Option<f32> {
        let dir = ray.direction;
        let inv_dir = Vec3::new(
            if dir.x.abs() > 1e-6 { 1.0 / dir.x } else { f32::MAX },
            if dir.y.abs() > 1e-6 { 1.0 / dir.y } else { f32::MAX },
            if dir.z.abs() > 1e-6 { 1.0 / dir.z } else { f32::MAX },
        );

        let t1 = (self.min - ray.origin) * inv_dir;
        let t2 = (self.max - ray.origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        if tmax < 0.0 || tmin > tmax {
            return None;
        }
        let t = if tmin >= 0.0 { tmin } else { tmax };
        (t <= max_dist).then_some(t)
    }
}

/// A ray with a unit-length direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray; `direction` is normalized (zero stays zero).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray from `origin` passing through `target`.
    pub fn towards(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }

    #[inline]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// A piece of level geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub id: ColliderId,
    pub kind: ColliderKind,
    /// Centre of the box in world space.
    pub center: Vec3,
    /// Half-size of the box before rotation.
    pub half_extents: Vec3,
    /// Rotation about +Y, radians.
    pub yaw: f32,
    /// Precomputed world-space bounds; `None` means the collider has no
    /// volume and is ignored by every query.
    pub bounds: Option<Aabb>,
}

impl Collider {
    pub fn new(id: ColliderId, kind: ColliderKind, center: Vec3, half_extents: Vec3, yaw: f32) -> Self {
        Self {
            id,
            kind,
            center,
            half_extents,
            yaw,
            bounds: Some(Aabb::from_oriented_box(center, half_extents, yaw)),
        }
    }

    /// The ground plane. It has no thickness, hence no bounds.
    pub fn floor(id: ColliderId, half_size: f32) -> Self {
        Self {
            id,
            kind: ColliderKind::Floor,
            center: Vec3::ZERO,
            half_extents: Vec3::new(half_size, 0.0, half_size),
            yaw: 0.0,
            bounds: None,
        }
    }

    #[inline]
    pub fn is_door(&self) -> bool {
        self.kind == ColliderKind::Door
    }
}

/// True if a sphere of `radius` at `position` touches any blocking collider.
///
/// The radius is per caller: the player, enemies and the boss all probe with
/// their own size.
pub fn is_blocked(position: Vec3, colliders: &[Collider], radius: f32) -> bool {
    colliders
        .iter()
        .filter(|c| c.kind.blocks_movement())
        .filter_map(|c| c.bounds.as_ref())
        .any(|bounds| bounds.intersects_sphere(position, radius))
}
