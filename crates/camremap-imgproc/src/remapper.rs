use camremap_camera::{Camera, CameraModel};
use camremap_image::{Image, ImageError};
use camremap_linalg::{rotate_point, Matrix3x3};

use crate::interpolation::{grid::meshgrid_from_fn, interp2};

/// Resample images between the pixel grids of two camera models.
///
/// The forward maps, sized to the target image, hold for every target pixel the
/// source pixel seeing the same ray. The inverse maps, sized to the source
/// image, hold the opposite lookup. Both are computed once on construction and
/// never change, so one remapper can serve many images from many threads.
///
/// # Example
///
/// ```
/// use camremap_camera::{BrownConrady, CameraIntrinsic, CameraModel};
/// use camremap_image::Image;
/// use camremap_imgproc::Remapper;
///
/// let intrinsic = CameraIntrinsic { fx: 200.0, fy: 200.0, cx: 32.0, cy: 24.0, skew: 0.0 };
/// let mut lens = BrownConrady::new(intrinsic, [64, 48].into(), Default::default());
/// lens.set_radial_coeffs(&[-0.1]);
///
/// let remapper = Remapper::new(lens).unwrap();
/// let image = Image::<f64, 1>::from_size_val([64, 48].into(), 1.0).unwrap();
/// let undistorted = remapper.undistort(&image).unwrap();
///
/// assert_eq!(undistorted.size(), remapper.target().image_size());
/// ```
#[derive(Clone, Debug)]
pub struct Remapper {
    source: Camera,
    target: Camera,
    rotation: Matrix3x3,
    map_x: Image<f64, 1>,
    map_y: Image<f64, 1>,
    inv_map_x: Image<f64, 1>,
    inv_map_y: Image<f64, 1>,
}

impl Remapper {
    /// Remap from a camera to its pinhole equivalent.
    pub fn new(source: impl Into<Camera>) -> Result<Self, ImageError> {
        let source = source.into();
        let target = Camera::from(source.pinhole());
        Self::with_rotation(source, target, Matrix3x3::IDENTITY)
    }

    /// Remap between two cameras sharing the same orientation.
    pub fn with_target(
        source: impl Into<Camera>,
        target: impl Into<Camera>,
    ) -> Result<Self, ImageError> {
        Self::with_rotation(source, target, Matrix3x3::IDENTITY)
    }

    /// Remap between two cameras where `rotation` takes rays of the source camera
    /// frame into the target camera frame.
    ///
    /// # Arguments
    ///
    /// * `source` - The model of the images passed to [`Remapper::undistort`].
    /// * `target` - The model of the images produced by [`Remapper::undistort`].
    /// * `rotation` - The rotation from the source to the target frame, e.g. a
    ///   rectifying rotation. Must be orthonormal.
    pub fn with_rotation(
        source: impl Into<Camera>,
        target: impl Into<Camera>,
        rotation: Matrix3x3,
    ) -> Result<Self, ImageError> {
        let source = source.into();
        let target = target.into();
        let inv_rotation = rotation.transpose();

        let (map_x, map_y) = meshgrid_from_fn(target.image_size(), |x, y| {
            let ray = target.backproject(&[x as f64, y as f64].into());
            source.project(&rotate_point(&inv_rotation, &ray))
        })?;

        let (inv_map_x, inv_map_y) = meshgrid_from_fn(source.image_size(), |x, y| {
            let ray = source.backproject(&[x as f64, y as f64].into());
            target.project(&rotate_point(&rotation, &ray))
        })?;

        log::info!(
            "remapping {} {} to {} {}",
            source.model_name(),
            source.image_size(),
            target.model_name(),
            target.image_size()
        );

        Ok(Self {
            source,
            target,
            rotation,
            map_x,
            map_y,
            inv_map_x,
            inv_map_y,
        })
    }

    /// Resample an image of the source camera into the target camera.
    ///
    /// The output has the target image size.
    pub fn undistort<const C: usize>(
        &self,
        image: &Image<f64, C>,
    ) -> Result<Image<f64, C>, ImageError> {
        self.check_input(image, &self.source);
        interp2(image, &self.map_x, &self.map_y)
    }

    /// Resample an image of the target camera back into the source camera.
    ///
    /// The output has the source image size.
    pub fn distort<const C: usize>(
        &self,
        image: &Image<f64, C>,
    ) -> Result<Image<f64, C>, ImageError> {
        self.check_input(image, &self.target);
        interp2(image, &self.inv_map_x, &self.inv_map_y)
    }

    fn check_input<const C: usize>(&self, image: &Image<f64, C>, camera: &Camera) {
        if image.size() != camera.image_size() {
            log::warn!(
                "image size {} differs from the {} model size {}",
                image.size(),
                camera.model_name(),
                camera.image_size()
            );
        }
    }

    /// The model of the input images of [`Remapper::undistort`].
    pub fn source(&self) -> &Camera {
        &self.source
    }

    /// The model of the output images of [`Remapper::undistort`].
    pub fn target(&self) -> &Camera {
        &self.target
    }

    /// The rotation from the source to the target camera frame.
    pub fn rotation(&self) -> &Matrix3x3 {
        &self.rotation
    }

    /// The forward maps `(map_x, map_y)`, sized to the target image.
    pub fn maps(&self) -> (&Image<f64, 1>, &Image<f64, 1>) {
        (&self.map_x, &self.map_y)
    }

    /// The inverse maps `(map_x, map_y)`, sized to the source image.
    pub fn inverse_maps(&self) -> (&Image<f64, 1>, &Image<f64, 1>) {
        (&self.inv_map_x, &self.inv_map_y)
    }
}
