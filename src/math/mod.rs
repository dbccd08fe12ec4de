//! Hand-rolled homogeneous affine matrices.
//!
//! Both matrix types act on column vectors: a point `p` is transformed as
//! `M · p`, so `a.append(b)` applies `b` first and `a` second.

pub mod affine2;
pub mod affine3;

pub use self::affine2::Affine2D;
pub use self::affine3::{Affine3D, Axis};

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    #[error("matrix is singular (determinant {determinant}) and has no inverse")]
    Singular { determinant: f32 },
}

#[inline]
pub(crate) fn dot<const N: usize>(a: [f32; N], b: [f32; N]) -> f32 {
    a.iter().zip(b).fold(0.0, |acc, (&x, y)| x.mul_add(y, acc))
}
