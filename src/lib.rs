//! A small articulated figure driven by hand-rolled affine transforms.
//!
//! [`math`] holds the 2D and 3D matrices, [`shape`] propagates them through a
//! tree of vertex shapes, and [`locomotion`] animates the [`scene::Figure`]
//! one frame at a time. [`app`] hosts it in a bevy window.

pub mod app;
pub mod config;
pub mod input;
pub mod locomotion;
pub mod math;
pub mod probe;
pub mod scene;
pub mod shape;
pub mod util;
