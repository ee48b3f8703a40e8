use crate::rotation::{element, from_rows};
use crate::{Matrix3x3, Point3};

/// Tolerance under which a value is treated as zero by the so(3) maps.
const NEAR_ZERO: f64 = 1e-6;

fn near_zero(x: f64) -> bool {
    x.abs() < NEAR_ZERO
}

/// Vector space -> Lie algebra
///
/// Builds the skew-symmetric matrix of `w`.
pub fn vec_to_so3(w: &Point3) -> Matrix3x3 {
    from_rows(
        Point3::new(0.0, -w.z, w.y),
        Point3::new(w.z, 0.0, -w.x),
        Point3::new(-w.y, w.x, 0.0),
    )
}

/// Lie algebra -> vector space
pub fn so3_to_vec(so3: &Matrix3x3) -> Point3 {
    Point3::new(
        element(so3, 2, 1),
        element(so3, 0, 2),
        element(so3, 1, 0),
    )
}

/// Logarithm of a rotation matrix.
///
/// Returns the skew-symmetric matrix `[w]` such that `exp([w]) == rotation`.
/// Three cases are handled: the identity maps to zero, a rotation by pi
/// extracts the axis from the diagonal term furthest from `-1`, and the
/// general case uses `theta / (2 sin(theta))` times the antisymmetric part.
pub fn matrix_log3(rotation: &Matrix3x3) -> Matrix3x3 {
    let r = |i, j| element(rotation, i, j);
    let acos_input = (r(0, 0) + r(1, 1) + r(2, 2) - 1.0) / 2.0;

    if acos_input >= 1.0 {
        return Matrix3x3::ZERO;
    }

    if acos_input <= -1.0 {
        let omega = if !near_zero(1.0 + r(2, 2)) {
            Point3::new(r(0, 2), r(1, 2), 1.0 + r(2, 2)) / (2.0 * (1.0 + r(2, 2))).sqrt()
        } else if !near_zero(1.0 + r(1, 1)) {
            Point3::new(r(0, 1), 1.0 + r(1, 1), r(2, 1)) / (2.0 * (1.0 + r(1, 1))).sqrt()
        } else {
            Point3::new(1.0 + r(0, 0), r(1, 0), r(2, 0)) / (2.0 * (1.0 + r(0, 0))).sqrt()
        };
        return vec_to_so3(&(std::f64::consts::PI * omega));
    }

    let theta = acos_input.acos();
    let scale = theta / (2.0 * theta.sin());
    (*rotation - rotation.transpose()) * scale
}

/// Exponential of a skew-symmetric matrix, i.e. Rodrigues' formula.
pub fn matrix_exp3(so3: &Matrix3x3) -> Matrix3x3 {
    let omega = so3_to_vec(so3);
    let theta = omega.length();

    if theta.abs() < f64::EPSILON {
        return Matrix3x3::IDENTITY;
    }

    let omega_hat = *so3 * (1.0 / theta);
    Matrix3x3::IDENTITY + omega_hat * theta.sin() + (omega_hat * omega_hat) * (1.0 - theta.cos())
}
