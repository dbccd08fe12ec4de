//! Ray queries against static level geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin along the normalised direction.
    pub distance: f32,
    pub point: Vec2,
    /// Zero when the ray started inside the collider.
    pub normal: Vec2,
}

/// Answers "is there a surface within `max_distance` along `direction`".
pub trait SpatialProbe {
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit>;
}

impl<F> SpatialProbe for F
where
    F: Fn(Vec2, Vec2, f32) -> Option<RayHit>,
{
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        self(origin, direction, max_distance)
    }
}

/// An axis-aligned solid box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxCollider {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl BoxCollider {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self::new((a + b) * 0.5, (a - b).abs() * 0.5)
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Slab test. `direction` need not be normalised.
    pub fn raycast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        let direction = direction.try_normalize()?;
        let local = origin - self.center;

        let mut t_min = 0.0_f32;
        let mut t_max = max_distance;
        let mut normal = Vec2::ZERO;

        for axis in 0..2 {
            let o = local[axis];
            let d = direction[axis];
            let extent = self.half_extents[axis];

            if d.abs() < 1e-8 {
                // Parallel to this slab.
                if o < -extent || o > extent {
                    return None;
                }
                continue;
            }

            let inv = d.recip();
            let t1 = (-extent - o) * inv;
            let t2 = (extent - o) * inv;
            let (t_near, t_far, sign) = if t1 < t2 {
                (t1, t2, -1.0)
            } else {
                (t2, t1, 1.0)
            };

            if t_near > t_min {
                t_min = t_near;
                normal = Vec2::ZERO;
                normal[axis] = sign;
            }
            t_max = t_max.min(t_far);

            if t_min > t_max {
                return None;
            }
        }

        Some(RayHit {
            distance: t_min,
            point: origin + direction * t_min,
            normal,
        })
    }
}

/// A flat list of box colliders; reports the nearest hit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Colliders {
    pub boxes: Vec<BoxCollider>,
}

impl Colliders {
    pub fn new(boxes: Vec<BoxCollider>) -> Self {
        Self { boxes }
    }
}

impl SpatialProbe for Colliders {
    fn cast(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        self.boxes
            .iter()
            .filter_map(|b| b.raycast(origin, direction, max_distance))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
