use std::fmt::Write;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use camremap_image::ImageSize;
use camremap_linalg::{transform_point, transform_points, Matrix3x3, Point2, Point3};

use crate::error::CameraError;
use crate::extrinsic::CameraExtrinsic;
use crate::models::{BrownConrady, GenFTanTheta, GenFTheta, Kannala, Pinhole};

/// Value returned for coordinates that cannot be computed, e.g. a ray with zero depth
/// or a model with zero focal length.
pub const SENTINEL: f64 = 1.0e12;

/// Convergence settings of the iterative backprojection solvers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackprojectSettings {
    /// Largest per-axis step, in normalized image coordinates, that counts as converged.
    pub threshold: f64,
    /// Maximum number of fixed-point iterations per point.
    pub iterations: usize,
}

impl Default for BackprojectSettings {
    fn default() -> Self {
        Self {
            threshold: 1e-6,
            iterations: 20,
        }
    }
}

impl BackprojectSettings {
    /// Create validated settings.
    ///
    /// # Errors
    ///
    /// The threshold must be greater than zero and at least one iteration is required.
    pub fn new(threshold: f64, iterations: usize) -> Result<Self, CameraError> {
        if !(threshold > 0.0) {
            return Err(CameraError::invalid(
                "threshold must be a number greater than zero",
            ));
        }
        if iterations == 0 {
            return Err(CameraError::invalid(
                "iterations must be an integer greater than zero",
            ));
        }
        Ok(Self {
            threshold,
            iterations,
        })
    }

    /// Run the fixed-point iteration `p <- step(p)` starting at `start`.
    ///
    /// The step runs at least once and stops when both coordinates move by at most
    /// the threshold or the iteration budget is spent.
    pub(crate) fn solve(&self, start: Point2, step: impl Fn(Point2) -> Point2) -> Point2 {
        let mut p = start;
        for _ in 0..self.iterations {
            let next = step(p);
            let delta = (next - p).abs();
            p = next;
            if delta.x <= self.threshold && delta.y <= self.threshold {
                break;
            }
        }
        p
    }
}

/// Turn a point of the undistorted normalized plane into a ray with unit depth.
pub(crate) fn ray_from_tan_theta(p: Point2) -> Point3 {
    let theta = p.length().atan();
    let phi = p.y.atan2(p.x);
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Point3::new(
        sin_theta * cos_phi / cos_theta,
        sin_theta * sin_phi / cos_theta,
        1.0,
    )
}

/// Project a ray onto the plane at unit depth, `None` for zero depth.
pub(crate) fn to_image_plane(point: &Point3) -> Option<Point2> {
    (point.z != 0.0).then(|| Point2::new(point.x / point.z, point.y / point.z))
}

/// The interface shared by all lens models.
///
/// A model maps rays in camera coordinates to pixels (`project`) and pixels back
/// to rays with unit depth (`backproject`). Both are total: degenerate input
/// yields [`SENTINEL`] or NaN values rather than an error, so batch operations
/// never abort on a single bad point.
pub trait CameraModel: Send + Sync {
    /// The human readable name of the model, e.g. `"Brown Conrady"`.
    fn model_name(&self) -> &'static str;

    /// The extrinsic pose of the camera.
    fn extrinsic(&self) -> &CameraExtrinsic;

    /// Mutable access to the extrinsic pose of the camera.
    fn extrinsic_mut(&mut self) -> &mut CameraExtrinsic;

    /// The image size, `0x0` when unset.
    fn image_size(&self) -> ImageSize;

    /// Set the image size.
    fn set_image_size(&mut self, image_size: ImageSize);

    /// Project a ray in camera coordinates to pixel coordinates.
    fn project(&self, point: &Point3) -> Point2;

    /// Backproject pixel coordinates to a ray with unit depth.
    fn backproject(&self, point: &Point2) -> Point3;

    /// The ideal pinhole model with the same focal length, principal point,
    /// skew, image size and extrinsics.
    fn pinhole(&self) -> Pinhole;

    /// The intrinsic parameters in the order of [`CameraModel::parameter_labels`].
    fn parameters(&self) -> Vec<Vec<f64>>;

    /// Set all intrinsic parameters in the order of [`CameraModel::parameter_labels`].
    fn set_parameters(&mut self, parameters: &[Vec<f64>]) -> Result<(), CameraError>;

    /// Display names of the parameters.
    fn parameter_names(&self) -> &'static [&'static str];

    /// Labels of the parameters in model files.
    fn parameter_labels(&self) -> &'static [&'static str];

    /// The Euler angles of the world to camera rotation.
    fn rotation(&self) -> Point3 {
        self.extrinsic().rotation()
    }

    /// Set the Euler angles of the world to camera rotation.
    fn set_rotation(&mut self, rotation: Point3) {
        self.extrinsic_mut().set_rotation(rotation);
    }

    /// The world to camera translation.
    fn translation(&self) -> Point3 {
        self.extrinsic().translation()
    }

    /// Set the world to camera translation.
    fn set_translation(&mut self, translation: Point3) {
        self.extrinsic_mut().set_translation(translation);
    }

    /// The world to camera rotation matrix.
    fn rotation_matrix(&self) -> Matrix3x3 {
        self.extrinsic().rotation_matrix()
    }

    /// The camera to world rotation matrix.
    fn inv_rotation_matrix(&self) -> Matrix3x3 {
        self.extrinsic().inv_rotation_matrix()
    }

    /// The camera to world translation.
    fn inv_translation(&self) -> Point3 {
        self.extrinsic().inv_translation()
    }

    /// Project a set of rays in parallel.
    fn project_points(&self, points: &[Point3]) -> Vec<Point2> {
        points.par_iter().map(|p| self.project(p)).collect()
    }

    /// Backproject a set of pixels in parallel.
    fn backproject_points(&self, points: &[Point2]) -> Vec<Point3> {
        points.par_iter().map(|p| self.backproject(p)).collect()
    }

    /// Transform a world point into camera coordinates.
    fn world_to_camera(&self, point: &Point3) -> Point3 {
        transform_point(&self.rotation_matrix(), &self.translation(), point)
    }

    /// Transform a camera point into world coordinates.
    fn camera_to_world(&self, point: &Point3) -> Point3 {
        transform_point(&self.inv_rotation_matrix(), &self.inv_translation(), point)
    }

    /// Transform a set of world points into camera coordinates in parallel.
    fn world_to_camera_points(&self, points: &[Point3]) -> Vec<Point3> {
        transform_points(&self.rotation_matrix(), &self.translation(), points)
    }

    /// Transform a set of camera points into world coordinates in parallel.
    fn camera_to_world_points(&self, points: &[Point3]) -> Vec<Point3> {
        transform_points(&self.inv_rotation_matrix(), &self.inv_translation(), points)
    }

    /// A multi-line description of the model and its parameters.
    fn display_string(&self) -> String {
        let mut out = format!("{} Camera Model\n", self.model_name());

        for (name, values) in self.parameter_names().iter().zip(self.parameters()) {
            let _ = writeln!(out, "{name}: [{}]", join_values(&values));
        }

        let t = self.translation();
        let r = self.rotation();
        let _ = writeln!(out, "Translation (tx, ty, tz): [{}, {}, {}]", t.x, t.y, t.z);
        let _ = writeln!(out, "Rotation (rx, ry, rz): [{}, {}, {}]", r.x, r.y, r.z);

        out
    }
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check the number of parameter groups handed to `set_parameters`.
pub(crate) fn check_parameter_count(
    parameters: &[Vec<f64>],
    labels: &[&str],
) -> Result<(), CameraError> {
    if parameters.len() != labels.len() {
        return Err(CameraError::invalid(format!(
            "expected {} parameter groups, got {}",
            labels.len(),
            parameters.len()
        )));
    }
    Ok(())
}

/// A camera of any of the supported lens models.
///
/// This is what model files load into. It implements [`CameraModel`] by
/// forwarding to the wrapped model.
#[derive(Clone, Debug, PartialEq)]
pub enum Camera {
    /// An ideal pinhole camera.
    Pinhole(Pinhole),
    /// A Brown-Conrady radial and tangential distortion model.
    BrownConrady(BrownConrady),
    /// The general rational tan(theta) distortion model.
    GenFTanTheta(GenFTanTheta),
    /// The general fisheye theta distortion model.
    GenFTheta(GenFTheta),
    /// A Kannala fisheye model.
    Kannala(Kannala),
}

macro_rules! dispatch {
    ($self:expr, $model:ident => $body:expr) => {
        match $self {
            Camera::Pinhole($model) => $body,
            Camera::BrownConrady($model) => $body,
            Camera::GenFTanTheta($model) => $body,
            Camera::GenFTheta($model) => $body,
            Camera::Kannala($model) => $body,
        }
    };
}

impl Camera {
    /// The type tag written to the `class_name` field of model files.
    pub fn class_name(&self) -> &'static str {
        match self {
            Camera::Pinhole(_) => "PinholeModel",
            Camera::BrownConrady(_) => "BrownConradyModel",
            Camera::GenFTanTheta(_) => "GenFTanThetaModel",
            Camera::GenFTheta(_) => "GenFThetaModel",
            Camera::Kannala(_) => "KannalaModel",
        }
    }

    /// Create a default model from a `class_name` type tag.
    ///
    /// # Errors
    ///
    /// The tag must name one of the supported models.
    pub fn from_class_name(class_name: &str) -> Result<Self, CameraError> {
        match class_name {
            "PinholeModel" => Ok(Camera::Pinhole(Pinhole::default())),
            "BrownConradyModel" => Ok(Camera::BrownConrady(BrownConrady::default())),
            "GenFTanThetaModel" | "GeneralFTanThetaModel" => {
                Ok(Camera::GenFTanTheta(GenFTanTheta::default()))
            }
            "GenFThetaModel" | "GeneralFThetaModel" => Ok(Camera::GenFTheta(GenFTheta::default())),
            "KannalaModel" => Ok(Camera::Kannala(Kannala::default())),
            other => Err(CameraError::invalid(format!(
                "Model contained in the imported file is not a valid model: {other}"
            ))),
        }
    }
}

impl CameraModel for Camera {
    fn model_name(&self) -> &'static str {
        dispatch!(self, m => m.model_name())
    }

    fn extrinsic(&self) -> &CameraExtrinsic {
        dispatch!(self, m => m.extrinsic())
    }

    fn extrinsic_mut(&mut self) -> &mut CameraExtrinsic {
        dispatch!(self, m => m.extrinsic_mut())
    }

    fn image_size(&self) -> ImageSize {
        dispatch!(self, m => m.image_size())
    }

    fn set_image_size(&mut self, image_size: ImageSize) {
        dispatch!(self, m => m.set_image_size(image_size))
    }

    fn project(&self, point: &Point3) -> Point2 {
        dispatch!(self, m => m.project(point))
    }

    fn backproject(&self, point: &Point2) -> Point3 {
        dispatch!(self, m => m.backproject(point))
    }

    fn pinhole(&self) -> Pinhole {
        dispatch!(self, m => m.pinhole())
    }

    fn parameters(&self) -> Vec<Vec<f64>> {
        dispatch!(self, m => m.parameters())
    }

    fn set_parameters(&mut self, parameters: &[Vec<f64>]) -> Result<(), CameraError> {
        dispatch!(self, m => m.set_parameters(parameters))
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        dispatch!(self, m => m.parameter_names())
    }

    fn parameter_labels(&self) -> &'static [&'static str] {
        dispatch!(self, m => m.parameter_labels())
    }
}

impl std::fmt::Display for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.display_string())
    }
}

macro_rules! impl_camera_conversions {
    ($($model:ident),*) => {
        $(
            impl From<$model> for Camera {
                fn from(model: $model) -> Self {
                    Camera::$model(model)
                }
            }

            impl TryFrom<Camera> for $model {
                type Error = CameraError;

                fn try_from(camera: Camera) -> Result<Self, Self::Error> {
                    match camera {
                        Camera::$model(model) => Ok(model),
                        other => Err(CameraError::invalid(format!(
                            "Model contained in the imported file is not a {} Model, found {}",
                            $model::MODEL_NAME,
                            other.model_name()
                        ))),
                    }
                }
            }

            impl std::fmt::Display for $model {
                fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    write!(f, "{}", self.display_string())
                }
            }
        )*
    };
}

impl_camera_conversions!(Pinhole, BrownConrady, GenFTanTheta, GenFTheta, Kannala);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_validation() {
        assert!(BackprojectSettings::new(1e-8, 50).is_ok());
        assert!(BackprojectSettings::new(0.0, 20).is_err());
        assert!(BackprojectSettings::new(-1.0, 20).is_err());
        assert!(BackprojectSettings::new(f64::NAN, 20).is_err());
        assert!(BackprojectSettings::new(1e-6, 0).is_err());
        assert_eq!(
            BackprojectSettings::default(),
            BackprojectSettings {
                threshold: 1e-6,
                iterations: 20
            }
        );
    }

    #[test]
    fn solve_stops_at_budget() {
        let settings = BackprojectSettings::new(1e-12, 3).unwrap();
        // diverging step never converges, the budget bounds the number of steps
        let p = settings.solve(Point2::ONE, |p| p * 2.0);
        assert_eq!(p, Point2::splat(8.0));
    }

    #[test]
    fn solve_converges() {
        let settings = BackprojectSettings::default();
        // contraction towards (1, 2)
        let target = Point2::new(1.0, 2.0);
        let p = settings.solve(Point2::ZERO, |p| p + (target - p) * 0.5);
        assert!((p - target).abs().max_element() < 1e-5);
    }

    #[test]
    fn ray_reconstruction_has_unit_depth() {
        let ray = ray_from_tan_theta(Point2::new(0.3, -0.4));
        assert!((ray.x - 0.3).abs() < 1e-12);
        assert!((ray.y + 0.4).abs() < 1e-12);
        assert_eq!(ray.z, 1.0);
        assert_eq!(ray_from_tan_theta(Point2::ZERO), Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn class_names_round_trip() -> Result<(), CameraError> {
        for name in [
            "PinholeModel",
            "BrownConradyModel",
            "GenFTanThetaModel",
            "GenFThetaModel",
            "KannalaModel",
        ] {
            assert_eq!(Camera::from_class_name(name)?.class_name(), name);
        }
        assert_eq!(
            Camera::from_class_name("GeneralFThetaModel")?.class_name(),
            "GenFThetaModel"
        );
        assert!(Camera::from_class_name("OrthographicModel").is_err());
        Ok(())
    }

    #[test]
    fn typed_conversion() {
        let camera = Camera::from(Kannala::default());
        assert!(Pinhole::try_from(camera.clone()).is_err());
        assert!(Kannala::try_from(camera).is_ok());
    }
}
