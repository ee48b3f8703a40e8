use camremap_linalg::Point2;

use crate::camera::SENTINEL;
use crate::error::CameraError;

/// Represents the intrinsic parameters shared by every lens model
///
/// # Fields
///
/// * `fx` - The focal length in the x direction
/// * `fy` - The focal length in the y direction
/// * `cx` - The x coordinate of the principal point
/// * `cy` - The y coordinate of the principal point
/// * `skew` - The skew between the x and y pixel axes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraIntrinsic {
    /// The focal length in the x direction
    pub fx: f64,
    /// The focal length in the y direction
    pub fy: f64,
    /// The x coordinate of the principal point
    pub cx: f64,
    /// The y coordinate of the principal point
    pub cy: f64,
    /// The skew between the x and y pixel axes
    pub skew: f64,
}

impl Default for CameraIntrinsic {
    fn default() -> Self {
        Self {
            fx: 1.0,
            fy: 1.0,
            cx: 0.0,
            cy: 0.0,
            skew: 0.0,
        }
    }
}

/// Read a parameter that must hold exactly two values.
pub(crate) fn pair(values: &[f64], name: &str) -> Result<[f64; 2], CameraError> {
    match values {
        [a, b] => Ok([*a, *b]),
        _ => Err(CameraError::invalid(format!(
            "{name} must have exactly 2 elements, got {}",
            values.len()
        ))),
    }
}

/// Read a parameter that must hold exactly one value.
pub(crate) fn scalar(values: &[f64], name: &str) -> Result<f64, CameraError> {
    match values {
        [a] => Ok(*a),
        _ => Err(CameraError::invalid(format!(
            "{name} must have exactly 1 element, got {}",
            values.len()
        ))),
    }
}

impl CameraIntrinsic {
    /// Create the intrinsics from the focal length and principal point vectors.
    ///
    /// # Errors
    ///
    /// Both vectors must have exactly two elements.
    pub fn from_slices(
        focal_length: &[f64],
        principal_point: &[f64],
        skew: f64,
    ) -> Result<Self, CameraError> {
        let [fx, fy] = pair(focal_length, "focal_length")?;
        let [cx, cy] = pair(principal_point, "principal_point")?;
        Ok(Self {
            fx,
            fy,
            cx,
            cy,
            skew,
        })
    }

    /// The focal length as `[fx, fy]`.
    pub fn focal_length(&self) -> [f64; 2] {
        [self.fx, self.fy]
    }

    /// The principal point as `[cx, cy]`.
    pub fn principal_point(&self) -> [f64; 2] {
        [self.cx, self.cy]
    }

    /// Set the focal length from a two element vector.
    pub fn set_focal_length(&mut self, focal_length: &[f64]) -> Result<(), CameraError> {
        [self.fx, self.fy] = pair(focal_length, "focal_length")?;
        Ok(())
    }

    /// Set the principal point from a two element vector.
    pub fn set_principal_point(&mut self, principal_point: &[f64]) -> Result<(), CameraError> {
        [self.cx, self.cy] = pair(principal_point, "principal_point")?;
        Ok(())
    }

    /// Map a point of the normalized image plane to pixel coordinates.
    #[inline]
    pub fn to_pixel(&self, point: Point2) -> Point2 {
        Point2::new(
            self.fx * point.x + self.skew * point.y + self.cx,
            self.fy * point.y + self.cy,
        )
    }

    /// Map pixel coordinates back to the normalized image plane.
    ///
    /// A zero focal length yields [`SENTINEL`] for the affected component.
    #[inline]
    pub fn to_normalized(&self, pixel: &Point2) -> Point2 {
        let y = if self.fy != 0.0 {
            (pixel.y - self.cy) / self.fy
        } else {
            SENTINEL
        };
        let x = if self.fx != 0.0 {
            (pixel.x - self.cx - self.skew * y) / self.fx
        } else {
            SENTINEL
        };
        Point2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrinsic_default() {
        let k = CameraIntrinsic::default();
        assert_eq!(k.focal_length(), [1.0, 1.0]);
        assert_eq!(k.principal_point(), [0.0, 0.0]);
        assert_eq!(k.skew, 0.0);
    }

    #[test]
    fn intrinsic_from_slices() -> Result<(), CameraError> {
        let k = CameraIntrinsic::from_slices(&[2.0, 3.0], &[1.0, 0.5], 0.25)?;
        assert_eq!(k.focal_length(), [2.0, 3.0]);
        assert_eq!(k.principal_point(), [1.0, 0.5]);
        assert_eq!(k.skew, 0.25);

        assert!(CameraIntrinsic::from_slices(&[2.0], &[1.0, 0.5], 0.0).is_err());
        assert!(CameraIntrinsic::from_slices(&[2.0, 2.0], &[1.0, 0.5, 0.0], 0.0).is_err());
        Ok(())
    }

    #[test]
    fn intrinsic_setters_keep_state_on_error() -> Result<(), CameraError> {
        let mut k = CameraIntrinsic::from_slices(&[2.0, 3.0], &[1.0, 0.5], 0.0)?;
        assert!(k.set_focal_length(&[4.0]).is_err());
        assert!(k.set_principal_point(&[]).is_err());
        assert_eq!(k.focal_length(), [2.0, 3.0]);
        assert_eq!(k.principal_point(), [1.0, 0.5]);
        Ok(())
    }

    #[test]
    fn intrinsic_round_trip() -> Result<(), CameraError> {
        let k = CameraIntrinsic::from_slices(&[600.0, 400.0], &[300.0, 200.0], 0.5)?;
        let p = Point2::new(0.1, -0.2);
        let back = k.to_normalized(&k.to_pixel(p));
        assert!((back - p).length() < 1e-12);
        Ok(())
    }

    #[test]
    fn intrinsic_zero_focal_length() {
        let k = CameraIntrinsic {
            fx: 0.0,
            fy: 0.0,
            ..Default::default()
        };
        assert_eq!(k.to_normalized(&Point2::ZERO), Point2::splat(SENTINEL));
    }
}
