#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Line and ray geometry.
pub mod geometry;

/// Polynomial and Fourier series evaluation.
pub mod polynomial;

/// Euler angle conversion and row-major matrix helpers.
pub mod rotation;

/// so(3) logarithm and exponential maps.
pub mod so3;

/// Rigid transforms applied to points.
pub mod transform;

/// A 2d point in double precision.
pub type Point2 = glam::DVec2;

/// A 3d point or ray direction in double precision.
pub type Point3 = glam::DVec3;

/// A 3x3 double precision matrix, used for rotations.
///
/// NOTE: orthonormality is not enforced, callers must supply valid rotations
/// wherever the inverse is taken as the transpose.
pub type Matrix3x3 = glam::DMat3;

pub use geometry::line_line_intersect;
pub use polynomial::{
    evaluate_fourier, evaluate_polynomial, evaluate_unit_polynomial, is_active, is_zero,
};
pub use rotation::{element, euler_to_rot, from_rows, rotation_inverse};
pub use so3::{matrix_exp3, matrix_log3, so3_to_vec, vec_to_so3};
pub use transform::{rotate_point, rotate_points, transform_point, transform_points};
