use super::{dot, MathError};
use crate::util::approx_eq;
use glam::{Vec2, Vec3};

/// A 3×3 homogeneous transform for the xy plane.
///
/// The third coordinate of a [`Vec3`] passed through [`Affine2D::transform_point`]
/// is a draw layer, not a homogeneous weight, and survives untouched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2D {
    pub rows: [[f32; 3]; 3],
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2D {
    pub const IDENTITY: Self = Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
    pub const ZERO: Self = Self::from_rows([[0.0; 3]; 3]);

    pub const fn from_rows(rows: [[f32; 3]; 3]) -> Self {
        Self { rows }
    }

    pub fn translate(offset: Vec2) -> Self {
        Self::from_rows([[1.0, 0.0, offset.x], [0.0, 1.0, offset.y], [0.0, 0.0, 1.0]])
    }

    /// Counter-clockwise rotation by `degrees` about the origin.
    pub fn rotate(degrees: f32) -> Self {
        let (sn, cs) = degrees.to_radians().sin_cos();
        Self::from_rows([[cs, -sn, 0.0], [sn, cs, 0.0], [0.0, 0.0, 1.0]])
    }

    pub fn scale(factor: Vec2) -> Self {
        Self::from_rows([[factor.x, 0.0, 0.0], [0.0, factor.y, 0.0], [0.0, 0.0, 1.0]])
    }

    /// `T(origin) · S · T(-origin)`
    pub fn scale_about(factor: Vec2, origin: Vec2) -> Self {
        Self::translate(origin)
            .append(Self::scale(factor))
            .append(Self::translate(-origin))
    }

    /// `T(pivot) · R · T(-pivot)`
    pub fn rotate_about(degrees: f32, pivot: Vec2) -> Self {
        Self::translate(pivot)
            .append(Self::rotate(degrees))
            .append(Self::translate(-pivot))
    }

    pub fn row(&self, index: usize) -> [f32; 3] {
        self.rows[index]
    }

    pub fn column(&self, index: usize) -> [f32; 3] {
        [self.rows[0][index], self.rows[1][index], self.rows[2][index]]
    }

    pub fn transpose(&self) -> Self {
        Self::from_rows([self.column(0), self.column(1), self.column(2)])
    }

    /// Appends the given matrix to this one: `self · rhs`.
    pub fn append(self, rhs: Self) -> Self {
        Self::concat(self, rhs)
    }

    /// Prepends the given matrix to this one: `lhs · self`.
    pub fn prepend(self, lhs: Self) -> Self {
        Self::concat(lhs, self)
    }

    #[inline(always)]
    fn concat(lhs: Self, rhs: Self) -> Self {
        let mut rows = [[0.0; 3]; 3];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = dot(lhs.rows[r], rhs.column(c));
            }
        }
        Self { rows }
    }

    /// Multiplies `[x, y, 1]` and keeps the incoming `z`.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        let p = [point.x, point.y, 1.0];
        Vec3::new(dot(self.rows[0], p), dot(self.rows[1], p), point.z)
    }

    pub fn transform_point2(&self, point: Vec2) -> Vec2 {
        self.transform_point(point.extend(0.0)).truncate()
    }

    pub fn apply_points(&self, points: &mut [Vec3]) {
        for p in points {
            *p = self.transform_point(*p);
        }
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Adjugate over determinant.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(MathError::Singular { determinant });
        }

        let m = &self.rows;
        let cofactors = [
            [
                m[1][1] * m[2][2] - m[1][2] * m[2][1],
                -(m[1][0] * m[2][2] - m[1][2] * m[2][0]),
                m[1][0] * m[2][1] - m[1][1] * m[2][0],
            ],
            [
                -(m[0][1] * m[2][2] - m[0][2] * m[2][1]),
                m[0][0] * m[2][2] - m[0][2] * m[2][0],
                -(m[0][0] * m[2][1] - m[0][1] * m[2][0]),
            ],
            [
                m[0][1] * m[1][2] - m[0][2] * m[1][1],
                -(m[0][0] * m[1][2] - m[0][2] * m[1][0]),
                m[0][0] * m[1][1] - m[0][1] * m[1][0],
            ],
        ];

        let inv = determinant.recip();
        let adjugate = Self::from_rows(cofactors).transpose();
        Ok(adjugate.scaled(inv))
    }

    fn scaled(mut self, factor: f32) -> Self {
        for cell in self.rows.iter_mut().flatten() {
            *cell *= factor;
        }
        self
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Bottom row is `[0, 0, 1]`.
    pub fn is_affine(&self) -> bool {
        self.rows[2] == [0.0, 0.0, 1.0]
    }

    pub fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(&a, &b)| approx_eq(a, b, epsilon))
    }
}
