use super::{dot, MathError};
use crate::util::approx_eq;
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A 4×4 homogeneous transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine3D {
    pub rows: [[f32; 4]; 4],
}

impl Default for Affine3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine3D {
    pub const IDENTITY: Self = Self::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    pub const ZERO: Self = Self::from_rows([[0.0; 4]; 4]);

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    pub fn translate(offset: Vec3) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, offset.x],
            [0.0, 1.0, 0.0, offset.y],
            [0.0, 0.0, 1.0, offset.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation by `degrees` about a single axis. X and Z are right-handed;
    /// Y turns +Z towards -X.
    pub fn rotate(degrees: f32, axis: Axis) -> Self {
        let (sn, cs) = degrees.to_radians().sin_cos();
        match axis {
            Axis::X => Self::from_rows([
                [1.0, 0.0, 0.0, 0.0],
                [0.0, cs, -sn, 0.0],
                [0.0, sn, cs, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            Axis::Y => Self::from_rows([
                [cs, 0.0, -sn, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [sn, 0.0, cs, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
            Axis::Z => Self::from_rows([
                [cs, -sn, 0.0, 0.0],
                [sn, cs, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ]),
        }
    }

    /// `Rz · Ry · Rx`, angles in degrees. X is applied to a point first.
    pub fn rotate_euler(degrees: Vec3) -> Self {
        Self::rotate(degrees.z, Axis::Z)
            .append(Self::rotate(degrees.y, Axis::Y))
            .append(Self::rotate(degrees.x, Axis::X))
    }

    pub fn scale(factor: Vec3) -> Self {
        Self::from_rows([
            [factor.x, 0.0, 0.0, 0.0],
            [0.0, factor.y, 0.0, 0.0],
            [0.0, 0.0, factor.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// `T(origin) · S · T(-origin)`
    pub fn scale_about(factor: Vec3, origin: Vec3) -> Self {
        Self::translate(origin)
            .append(Self::scale(factor))
            .append(Self::translate(-origin))
    }

    /// `T(pivot) · Rz·Ry·Rx · T(-pivot)`
    pub fn rotate_about(degrees: Vec3, pivot: Vec3) -> Self {
        Self::translate(pivot)
            .append(Self::rotate_euler(degrees))
            .append(Self::translate(-pivot))
    }

    pub fn row(&self, index: usize) -> [f32; 4] {
        self.rows[index]
    }

    pub fn column(&self, index: usize) -> [f32; 4] {
        [
            self.rows[0][index],
            self.rows[1][index],
            self.rows[2][index],
            self.rows[3][index],
        ]
    }

    pub fn transpose(&self) -> Self {
        Self::from_rows([self.column(0), self.column(1), self.column(2), self.column(3)])
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
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = dot(lhs.rows[r], rhs.column(c));
            }
        }
        Self { rows }
    }

    pub fn transform_vec4(&self, v: Vec4) -> Vec4 {
        let v = v.to_array();
        Vec4::new(
            dot(self.rows[0], v),
            dot(self.rows[1], v),
            dot(self.rows[2], v),
            dot(self.rows[3], v),
        )
    }

    /// Transforms a position (`w = 1`).
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.transform_vec4(point.extend(1.0)).truncate()
    }

    /// Transforms a direction (`w = 0`), ignoring translation.
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.transform_vec4(vector.extend(0.0)).truncate()
    }

    pub fn apply_points(&self, points: &mut [Vec3]) {
        for p in points {
            *p = self.transform_point(*p);
        }
    }

    /// Determinant of the upper-left 3×3 block. Equal to the full
    /// determinant while the matrix is affine.
    pub fn determinant(&self) -> f32 {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverts an affine matrix: `[A t] -> [A⁻¹  -A⁻¹t]`.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let determinant = self.determinant();
        if determinant == 0.0 || !determinant.is_finite() {
            return Err(MathError::Singular { determinant });
        }

        let m = &self.rows;
        let inv = determinant.recip();
        let a = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv,
                -(m[0][1] * m[2][2] - m[0][2] * m[2][1]) * inv,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv,
            ],
            [
                -(m[1][0] * m[2][2] - m[1][2] * m[2][0]) * inv,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv,
                -(m[0][0] * m[1][2] - m[0][2] * m[1][0]) * inv,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv,
                -(m[0][0] * m[2][1] - m[0][1] * m[2][0]) * inv,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv,
            ],
        ];

        let t = [m[0][3], m[1][3], m[2][3]];
        let mut rows = Self::IDENTITY.rows;
        for r in 0..3 {
            rows[r][..3].copy_from_slice(&a[r]);
            rows[r][3] = -dot(a[r], t);
        }
        Ok(Self { rows })
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Bottom row is `[0, 0, 0, 1]`.
    pub fn is_affine(&self) -> bool {
        self.rows[3] == [0.0, 0.0, 0.0, 1.0]
    }

    pub fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(&a, &b)| approx_eq(a, b, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn near(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() <= EPS
    }

    #[test]
    fn translate_point_but_not_vector() {
        let m = Affine3D::translate(Vec3::new(0.0, 5.0, 5.0));
        assert!(near(m.transform_point(Vec3::ONE), Vec3::new(1.0, 6.0, 6.0)));
        assert!(near(m.transform_vector(Vec3::ONE), Vec3::ONE));
    }

    #[test]
    fn full_product_matches_hand_computed_result() {
        let a = Affine3D::from_rows([
            [10.0, 948.0, 23.0, 5.0],
            [1.0, 948.0, 23.0, 5.0],
            [10.0, 948.0, 23.0, 5.0],
            [1.0, 948.0, 23.0, 5.0],
        ]);
        let b = Affine3D::from_rows([
            [10.0, 1.0, 948.0, 5.0],
            [1.0, 948.0, 23.0, 5.0],
            [10.0, 948.0, 23.0, 5.0],
            [1.0, 948.0, 23.0, 5.0],
        ]);
        let expected = Affine3D::from_rows([
            [1283.0, 925_258.0, 31_928.0, 4930.0],
            [1193.0, 925_249.0, 23_396.0, 4885.0],
            [1283.0, 925_258.0, 31_928.0, 4930.0],
            [1193.0, 925_249.0, 23_396.0, 4885.0],
        ]);
        assert_eq!(a.append(b), expected);
        assert_eq!(Affine3D::IDENTITY.append(Affine3D::IDENTITY), Affine3D::IDENTITY);
    }

    #[test]
    fn single_axis_rotation_directions() {
        let x = Affine3D::rotate(90.0, Axis::X).transform_point(Vec3::Y);
        let y = Affine3D::rotate(90.0, Axis::Y).transform_point(Vec3::Z);
        let z = Affine3D::rotate(90.0, Axis::Z).transform_point(Vec3::X);
        assert!(near(x, Vec3::Z));
        assert!(near(y, Vec3::NEG_X));
        assert!(near(z, Vec3::Y));

        let m = Affine3D::rotate(30.0, Axis::Y);
        let (sn, cs) = 30.0_f32.to_radians().sin_cos();
        assert_eq!(m.row(0), [cs, 0.0, -sn, 0.0]);
        assert_eq!(m.row(2), [sn, 0.0, cs, 0.0]);
    }

    #[test]
    fn euler_order_is_z_y_x() {
        let angles = Vec3::new(90.0, 90.0, 0.0);
        let composed = Affine3D::rotate(angles.z, Axis::Z)
            .append(Affine3D::rotate(angles.y, Axis::Y))
            .append(Affine3D::rotate(angles.x, Axis::X));
        assert!(Affine3D::rotate_euler(angles).abs_diff_eq(&composed, EPS));

        // X first: Y -> Z, then Y: Z -> -X.
        let p = Affine3D::rotate_euler(angles).transform_point(Vec3::Y);
        assert!(near(p, Vec3::NEG_X));

        let reversed = Affine3D::rotate(angles.x, Axis::X)
            .append(Affine3D::rotate(angles.y, Axis::Y))
            .transform_point(Vec3::Y);
        assert!(!near(reversed, p));
    }

    #[test]
    fn rotation_about_pivot_fixes_the_pivot() {
        let pivot = Vec3::new(0.5, 0.5, 0.5);
        let m = Affine3D::rotate_about(Vec3::new(10.0, 20.0, 30.0), pivot);
        assert!(near(m.transform_point(pivot), pivot));
    }

    #[test]
    fn inverse_round_trips_affine_matrices() {
        let m = Affine3D::translate(Vec3::new(1.0, -2.0, 3.0))
            .append(Affine3D::rotate_euler(Vec3::new(12.0, -40.0, 75.0)))
            .append(Affine3D::scale(Vec3::new(2.0, 1.0, 0.5)));
        let inv = m.inverse().unwrap();
        assert!(m.append(inv).abs_diff_eq(&Affine3D::IDENTITY, 1e-4));
        assert!(inv.is_affine());
    }

    #[test]
    fn zero_matrix_has_no_inverse() {
        assert!(!Affine3D::ZERO.is_affine());
        assert_eq!(Affine3D::ZERO.transform_vector(Vec3::ONE), Vec3::ZERO);
        assert!(matches!(
            Affine3D::ZERO.inverse(),
            Err(MathError::Singular { .. })
        ));
    }

    #[test]
    fn flattened_scale_is_singular() {
        let m = Affine3D::scale(Vec3::new(1.0, 1.0, 0.0));
        assert!(matches!(m.inverse(), Err(MathError::Singular { .. })));
    }
}
