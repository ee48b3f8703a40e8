use camremap_linalg::{euler_to_rot, rotation_inverse, Matrix3x3, Point3};

use crate::error::CameraError;

/// Represents the extrinsic parameters of a camera
///
/// The pose maps world coordinates into camera coordinates. The rotation is
/// given as Euler angles `(rx, ry, rz)` in radians, the derived matrices are
/// cached and refreshed together every time the rotation or translation changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraExtrinsic {
    rotation: Point3,
    translation: Point3,
    rotation_matrix: Matrix3x3,
    inv_rotation_matrix: Matrix3x3,
    inv_translation: Point3,
}

impl Default for CameraExtrinsic {
    fn default() -> Self {
        Self::new(Point3::ZERO, Point3::ZERO)
    }
}

/// Read a parameter that must hold exactly three values.
pub(crate) fn triple(values: &[f64], name: &str) -> Result<Point3, CameraError> {
    match values {
        [x, y, z] => Ok(Point3::new(*x, *y, *z)),
        _ => Err(CameraError::invalid(format!(
            "{name} must have exactly 3 elements, got {}",
            values.len()
        ))),
    }
}

impl CameraExtrinsic {
    /// Create the extrinsics from Euler angles and a translation.
    pub fn new(rotation: Point3, translation: Point3) -> Self {
        let mut extrinsic = Self {
            rotation,
            translation,
            rotation_matrix: Matrix3x3::IDENTITY,
            inv_rotation_matrix: Matrix3x3::IDENTITY,
            inv_translation: Point3::ZERO,
        };
        extrinsic.refresh();
        extrinsic
    }

    /// Create the extrinsics from two three element vectors.
    ///
    /// # Errors
    ///
    /// Both vectors must have exactly three elements.
    pub fn from_slices(rotation: &[f64], translation: &[f64]) -> Result<Self, CameraError> {
        Ok(Self::new(
            triple(rotation, "rotation")?,
            triple(translation, "translation")?,
        ))
    }

    fn refresh(&mut self) {
        self.rotation_matrix = euler_to_rot(&self.rotation);
        self.inv_rotation_matrix = rotation_inverse(&self.rotation_matrix);
        self.inv_translation = -(self.inv_rotation_matrix * self.translation);
    }

    /// The Euler angles of the rotation.
    pub fn rotation(&self) -> Point3 {
        self.rotation
    }

    /// The translation.
    pub fn translation(&self) -> Point3 {
        self.translation
    }

    /// The world to camera rotation matrix.
    pub fn rotation_matrix(&self) -> Matrix3x3 {
        self.rotation_matrix
    }

    /// The camera to world rotation matrix.
    pub fn inv_rotation_matrix(&self) -> Matrix3x3 {
        self.inv_rotation_matrix
    }

    /// The camera to world translation, i.e. the camera center in world coordinates.
    pub fn inv_translation(&self) -> Point3 {
        self.inv_translation
    }

    /// Set the Euler angles and refresh the derived matrices.
    pub fn set_rotation(&mut self, rotation: Point3) {
        self.rotation = rotation;
        self.refresh();
    }

    /// Set the translation and refresh the derived matrices.
    pub fn set_translation(&mut self, translation: Point3) {
        self.translation = translation;
        self.refresh();
    }
}
