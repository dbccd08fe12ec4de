//! Rigid vertex shapes and the tree that propagates transforms through them.

pub mod kind;
pub mod tree;

pub use self::kind::ShapeKind;
pub use self::tree::{ShapeId, ShapeTree};

use crate::math::{Affine2D, Affine3D};
use glam::Vec3;
use smallvec::SmallVec;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("a {kind} needs {expected} vertices, got {found}")]
    VertexCount {
        kind: ShapeKind,
        expected: usize,
        found: usize,
    },
    #[error("a circle needs at least {min} segments, got {found}")]
    TooFewSegments { min: usize, found: usize },
    #[error("shape {0:?} is not part of this tree")]
    UnknownShape(ShapeId),
    #[error("shape {child:?} already has a parent")]
    AlreadyAttached { child: ShapeId },
    #[error("attaching {child:?} under {parent:?} would form a cycle")]
    Cycle { parent: ShapeId, child: ShapeId },
}

/// Geometry of a single node: its vertices, the point it rotates about, and
/// the rotation it has accumulated since creation.
#[derive(Clone, Debug)]
pub struct Shape {
    kind: ShapeKind,
    vertices: SmallVec<[Vec3; 8]>,
    pivot: Vec3,
    angle: f32,
}

impl Shape {
    /// Checks the vertex count against `kind`. The pivot starts at the centroid.
    pub fn new(kind: ShapeKind, vertices: &[Vec3]) -> Result<Self, ShapeError> {
        if let ShapeKind::Circle { segments } = kind {
            if segments < ShapeKind::MIN_CIRCLE_SEGMENTS {
                return Err(ShapeError::TooFewSegments {
                    min: ShapeKind::MIN_CIRCLE_SEGMENTS,
                    found: segments,
                });
            }
        }

        let expected = kind.vertex_count();
        if vertices.len() != expected {
            return Err(ShapeError::VertexCount {
                kind,
                expected,
                found: vertices.len(),
            });
        }

        let pivot = vertices.iter().sum::<Vec3>() / expected as f32;
        Ok(Self {
            kind,
            vertices: vertices.iter().copied().collect(),
            pivot,
            angle: 0.0,
        })
    }

    pub fn triangle(vertices: [Vec3; 3]) -> Self {
        Self::from_array(ShapeKind::Triangle, vertices)
    }

    pub fn quad(vertices: [Vec3; 4]) -> Self {
        Self::from_array(ShapeKind::Quad, vertices)
    }

    fn from_array<const N: usize>(kind: ShapeKind, vertices: [Vec3; N]) -> Self {
        let pivot = vertices.iter().sum::<Vec3>() / N as f32;
        Self {
            kind,
            vertices: vertices.into_iter().collect(),
            pivot,
            angle: 0.0,
        }
    }

    /// An axis-aligned cube with edge `size`, centred on `center`.
    pub fn cube(size: f32, center: Vec3) -> Self {
        let corners = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ];
        let mut cube = Self::from_array(ShapeKind::Cube, corners.map(|c| c * size));
        cube.transform_3d(&Affine3D::translate(center - Vec3::splat(size * 0.5)));
        cube
    }

    /// A fan of `segments` triangles around `center`, pivoting on the centre.
    pub fn circle(center: Vec3, radius: f32, segments: usize) -> Result<Self, ShapeError> {
        let step = 360.0 / segments.max(1) as f32;
        let rim = (0..segments).map(|i| {
            let (sn, cs) = (i as f32 * step).to_radians().sin_cos();
            Vec3::new(center.x + cs * radius, center.y + sn * radius, center.z)
        });
        let vertices: Vec<Vec3> = std::iter::once(center).chain(rim).collect();
        let mut circle = Self::new(ShapeKind::Circle { segments }, &vertices)?;
        circle.pivot = center;
        Ok(circle)
    }

    pub fn with_pivot(mut self, pivot: Vec3) -> Self {
        self.pivot = pivot;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    /// Signed degrees accumulated through pivot rotations.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn triangles(&self, offset: u32) -> Vec<u32> {
        self.kind.triangles(offset)
    }

    /// Moves this shape alone. The tree handles the descendants.
    pub(crate) fn transform(&mut self, m: &Affine2D) {
        m.apply_points(&mut self.vertices);
    }

    pub(crate) fn finish_transform(&mut self, m: &Affine2D, delta_angle: f32) {
        self.pivot = m.transform_point(self.pivot);
        self.angle += delta_angle;
    }

    pub(crate) fn transform_3d(&mut self, m: &Affine3D) {
        m.apply_points(&mut self.vertices);
        self.pivot = m.transform_point(self.pivot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_vertex_count_is_rejected() {
        let err = Shape::new(ShapeKind::Quad, &[Vec3::ZERO; 3]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::VertexCount {
                kind: ShapeKind::Quad,
                expected: 4,
                found: 3
            }
        );
        assert_eq!(err.to_string(), "a quad needs 4 vertices, got 3");

        assert!(Shape::new(ShapeKind::Cube, &[Vec3::ZERO; 7]).is_err());
        assert!(Shape::new(ShapeKind::Triangle, &[Vec3::ZERO; 3]).is_ok());
    }

    #[test]
    fn degenerate_circle_is_rejected() {
        assert_eq!(
            Shape::circle(Vec3::ZERO, 1.0, 3).unwrap_err(),
            ShapeError::TooFewSegments { min: 4, found: 3 }
        );
    }

    #[test]
    fn circle_rim_sits_on_radius() {
        let center = Vec3::new(2.0, -1.0, 0.5);
        let circle = Shape::circle(center, 3.0, 12).unwrap();
        assert_eq!(circle.vertices().len(), 13);
        assert_eq!(circle.pivot(), center);
        for v in &circle.vertices()[1..] {
            assert!(((*v - center).length() - 3.0).abs() < 1e-5);
            assert_eq!(v.z, center.z);
        }
    }

    #[test]
    fn cube_is_centred() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let cube = Shape::cube(2.0, center);
        let mean = cube.vertices().iter().sum::<Vec3>() / 8.0;
        assert!((mean - center).length() < 1e-5);
        assert!((cube.pivot() - center).length() < 1e-5);
        assert_eq!(cube.vertices()[0], Vec3::new(0.0, 1.0, 2.0));
    }

    #[test]
    fn triangle_has_one_face() {
        let tri = Shape::triangle([
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
        ]);
        assert_eq!(tri.kind(), ShapeKind::Triangle);
        assert_eq!(tri.pivot(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(tri.triangles(6), vec![6, 7, 8]);
    }

    #[test]
    fn pivot_defaults_to_centroid() {
        let quad = Shape::quad([
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(4.0, 2.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        ]);
        assert_eq!(quad.pivot(), Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(quad.angle(), 0.0);
    }
}
