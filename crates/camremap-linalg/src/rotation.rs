use crate::{Matrix3x3, Point3};

/// Build a matrix from its rows.
///
/// glam stores matrices column-major, the camera math is written by rows.
pub fn from_rows(r0: Point3, r1: Point3, r2: Point3) -> Matrix3x3 {
    Matrix3x3::from_cols(r0, r1, r2).transpose()
}

/// Read the element at `row`, `col` of a matrix.
///
/// PRECONDITION: `row` and `col` are in `0..3`.
#[inline]
pub fn element(m: &Matrix3x3, row: usize, col: usize) -> f64 {
    m.col(col)[row]
}

/// Convert Euler angles to a rotation matrix.
///
/// The angles `(rx, ry, rz)` are in radians. The element layout is fixed and
/// must not be replaced by a generic axis composition, model files depend on it:
///
/// ```text
/// | cy*cz             -cy*sz              sy     |
/// | cx*sz + sx*sy*cz   cx*cz - sx*sy*sz  -sx*cy  |
/// | sx*sz - cx*sy*cz   sx*cz + cx*sy*sz   cx*cy  |
/// ```
///
/// # Example
///
/// ```
/// use camremap_linalg::{euler_to_rot, Matrix3x3, Point3};
///
/// let r = euler_to_rot(&Point3::ZERO);
/// assert_eq!(r, Matrix3x3::IDENTITY);
/// ```
pub fn euler_to_rot(rotation: &Point3) -> Matrix3x3 {
    let (sx, cx) = rotation.x.sin_cos();
    let (sy, cy) = rotation.y.sin_cos();
    let (sz, cz) = rotation.z.sin_cos();

    from_rows(
        Point3::new(cy * cz, -cy * sz, sy),
        Point3::new(cx * sz + sx * sy * cz, cx * cz - sx * sy * sz, -sx * cy),
        Point3::new(sx * sz - cx * sy * cz, sx * cz + cx * sy * sz, cx * cy),
    )
}

/// Invert a rotation matrix by transposition.
///
/// Only valid for pure rotations.
pub fn rotation_inverse(rotation: &Matrix3x3) -> Matrix3x3 {
    rotation.transpose()
}
