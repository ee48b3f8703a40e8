use camremap_image::ImageSize;
use camremap_linalg::{Point2, Point3};

use crate::camera::{check_parameter_count, to_image_plane, CameraModel, SENTINEL};
use crate::error::CameraError;
use crate::extrinsic::CameraExtrinsic;
use crate::intrinsic::{scalar, CameraIntrinsic};

/// An ideal pinhole camera without lens distortion.
///
/// # Example
///
/// ```
/// use camremap_camera::{CameraIntrinsic, CameraModel, Pinhole};
/// use camremap_linalg::Point3;
///
/// let intrinsic = CameraIntrinsic { cx: 0.5, cy: 0.5, ..Default::default() };
/// let pinhole = Pinhole::new(intrinsic, Default::default(), Default::default());
///
/// let pixel = pinhole.project(&Point3::new(1.0, 1.0, 1.0));
/// assert_eq!(pixel.to_array(), [1.5, 1.5]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pinhole {
    intrinsic: CameraIntrinsic,
    image_size: ImageSize,
    extrinsic: CameraExtrinsic,
}

impl Pinhole {
    /// The name reported by [`CameraModel::model_name`].
    pub const MODEL_NAME: &'static str = "Pinhole";

    const PARAMETER_NAMES: &'static [&'static str] = &["Focal Length", "Principal Point", "Skew"];

    const PARAMETER_LABELS: &'static [&'static str] =
        &["focal_distance", "principal_point", "skew"];

    /// Create a new pinhole camera.
    pub fn new(
        intrinsic: CameraIntrinsic,
        image_size: ImageSize,
        extrinsic: CameraExtrinsic,
    ) -> Self {
        Self {
            intrinsic,
            image_size,
            extrinsic,
        }
    }

    /// The focal length, principal point and skew.
    pub fn intrinsic(&self) -> &CameraIntrinsic {
        &self.intrinsic
    }

    /// Replace the focal length, principal point and skew.
    pub fn set_intrinsic(&mut self, intrinsic: CameraIntrinsic) {
        self.intrinsic = intrinsic;
    }

    /// The focal length as `[fx, fy]`.
    pub fn focal_length(&self) -> [f64; 2] {
        self.intrinsic.focal_length()
    }

    /// The principal point as `[cx, cy]`.
    pub fn principal_point(&self) -> [f64; 2] {
        self.intrinsic.principal_point()
    }

    /// The skew.
    pub fn skew(&self) -> f64 {
        self.intrinsic.skew
    }

    /// Set the focal length, must have exactly two elements.
    pub fn set_focal_length(&mut self, focal_length: &[f64]) -> Result<(), CameraError> {
        self.intrinsic.set_focal_length(focal_length)
    }

    /// Set the principal point, must have exactly two elements.
    pub fn set_principal_point(&mut self, principal_point: &[f64]) -> Result<(), CameraError> {
        self.intrinsic.set_principal_point(principal_point)
    }

    /// Set the skew.
    pub fn set_skew(&mut self, skew: f64) {
        self.intrinsic.skew = skew;
    }
}

impl CameraModel for Pinhole {
    fn model_name(&self) -> &'static str {
        Self::MODEL_NAME
    }

    fn extrinsic(&self) -> &CameraExtrinsic {
        &self.extrinsic
    }

    fn extrinsic_mut(&mut self) -> &mut CameraExtrinsic {
        &mut self.extrinsic
    }

    fn image_size(&self) -> ImageSize {
        self.image_size
    }

    fn set_image_size(&mut self, image_size: ImageSize) {
        self.image_size = image_size;
    }

    fn project(&self, point: &Point3) -> Point2 {
        match to_image_plane(point) {
            Some(p) => self.intrinsic.to_pixel(p),
            None => Point2::splat(SENTINEL),
        }
    }

    fn backproject(&self, point: &Point2) -> Point3 {
        self.intrinsic.to_normalized(point).extend(1.0)
    }

    fn pinhole(&self) -> Pinhole {
        self.clone()
    }

    fn parameters(&self) -> Vec<Vec<f64>> {
        vec![
            self.focal_length().to_vec(),
            self.principal_point().to_vec(),
            vec![self.skew()],
        ]
    }

    fn set_parameters(&mut self, parameters: &[Vec<f64>]) -> Result<(), CameraError> {
        check_parameter_count(parameters, Self::PARAMETER_LABELS)?;
        self.intrinsic = CameraIntrinsic::from_slices(
            &parameters[0],
            &parameters[1],
            scalar(&parameters[2], "skew")?,
        )?;
        Ok(())
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        Self::PARAMETER_NAMES
    }

    fn parameter_labels(&self) -> &'static [&'static str] {
        Self::PARAMETER_LABELS
    }
}
