use camremap_image::ImageSize;
use camremap_linalg::{Point2, Point3};

use crate::camera::{check_parameter_count, BackprojectSettings, CameraModel};
use crate::error::CameraError;
use crate::extrinsic::CameraExtrinsic;
use crate::intrinsic::CameraIntrinsic;

use super::{GenFTheta, Pinhole};

/// The Kannala fisheye lens model.
///
/// A zero skew view over an inner [`GenFTheta`] model that does all the math.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Kannala {
    inner: GenFTheta,
}

impl Kannala {
    /// The name reported by [`CameraModel::model_name`].
    pub const MODEL_NAME: &'static str = "Kannala";

    const PARAMETER_NAMES: &'static [&'static str] = &[
        "Focal Length",
        "Principal Point",
        "Radial Distortion Symmetric Coefficients",
        "Radial Distortion Asymmetric Coefficients",
        "Radial Distortion Fourier Coefficients",
        "Tangential Distortion Asymmetric Coefficients",
        "Tangential Distortion Fourier Coefficients",
    ];

    const PARAMETER_LABELS: &'static [&'static str] = &[
        "mu_mv",
        "principal_point",
        "radial_distortion_coeff",
        "radial_asym_poly",
        "radial_asym_fourier",
        "tangential_asym_poly",
        "tangential_asym_fourier",
    ];

    /// Create a model without distortion. The skew of `intrinsic` is ignored.
    pub fn new(
        intrinsic: CameraIntrinsic,
        image_size: ImageSize,
        extrinsic: CameraExtrinsic,
    ) -> Self {
        let intrinsic = CameraIntrinsic {
            skew: 0.0,
            ..intrinsic
        };
        Self {
            inner: GenFTheta::new(intrinsic, image_size, extrinsic),
        }
    }

    /// The general model doing the math.
    pub fn as_gen_ftheta(&self) -> &GenFTheta {
        &self.inner
    }

    /// The focal length as `[fx, fy]`.
    pub fn focal_length(&self) -> [f64; 2] {
        self.inner.focal_length()
    }

    /// The principal point as `[cx, cy]`.
    pub fn principal_point(&self) -> [f64; 2] {
        self.inner.principal_point()
    }

    /// The symmetric radial coefficients.
    pub fn radial_sym_coeffs(&self) -> &[f64] {
        self.inner.radial_sym_coeffs()
    }

    /// The asymmetric radial polynomial coefficients.
    pub fn radial_asym_coeffs(&self) -> &[f64] {
        self.inner.radial_asym_coeffs()
    }

    /// The asymmetric radial Fourier coefficients.
    pub fn radial_fourier_coeffs(&self) -> &[f64] {
        self.inner.radial_fourier_coeffs()
    }

    /// The asymmetric tangential polynomial coefficients.
    pub fn tangential_asym_coeffs(&self) -> &[f64] {
        self.inner.tangential_asym_coeffs()
    }

    /// The asymmetric tangential Fourier coefficients.
    pub fn tangential_fourier_coeffs(&self) -> &[f64] {
        self.inner.tangential_fourier_coeffs()
    }

    /// The convergence settings of [`CameraModel::backproject`].
    pub fn backproject_settings(&self) -> BackprojectSettings {
        self.inner.backproject_settings()
    }

    /// Set the focal length, must have exactly two elements.
    pub fn set_focal_length(&mut self, focal_length: &[f64]) -> Result<(), CameraError> {
        self.inner.set_focal_length(focal_length)
    }

    /// Set the principal point, must have exactly two elements.
    pub fn set_principal_point(&mut self, principal_point: &[f64]) -> Result<(), CameraError> {
        self.inner.set_principal_point(principal_point)
    }

    /// Set the symmetric radial coefficients.
    pub fn set_radial_sym_coeffs(&mut self, coeffs: &[f64]) {
        self.inner.set_radial_sym_coeffs(coeffs);
    }

    /// Set the asymmetric radial polynomial coefficients.
    pub fn set_radial_asym_coeffs(&mut self, coeffs: &[f64]) {
        self.inner.set_radial_asym_coeffs(coeffs);
    }

    /// Set the asymmetric radial Fourier coefficients, the length must be even.
    pub fn set_radial_fourier_coeffs(&mut self, coeffs: &[f64]) -> Result<(), CameraError> {
        self.inner.set_radial_fourier_coeffs(coeffs)
    }

    /// Set the asymmetric tangential polynomial coefficients.
    pub fn set_tangential_asym_coeffs(&mut self, coeffs: &[f64]) {
        self.inner.set_tangential_asym_coeffs(coeffs);
    }

    /// Set the asymmetric tangential Fourier coefficients, the length must be even.
    pub fn set_tangential_fourier_coeffs(&mut self, coeffs: &[f64]) -> Result<(), CameraError> {
        self.inner.set_tangential_fourier_coeffs(coeffs)
    }

    /// Set the convergence settings of [`CameraModel::backproject`].
    pub fn set_backproject_settings(
        &mut self,
        threshold: f64,
        iterations: usize,
    ) -> Result<(), CameraError> {
        self.inner.set_backproject_settings(threshold, iterations)
    }
}

impl CameraModel for Kannala {
    fn model_name(&self) -> &'static str {
        Self::MODEL_NAME
    }

    fn extrinsic(&self) -> &CameraExtrinsic {
        self.inner.extrinsic()
    }

    fn extrinsic_mut(&mut self) -> &mut CameraExtrinsic {
        self.inner.extrinsic_mut()
    }

    fn image_size(&self) -> ImageSize {
        self.inner.image_size()
    }

    fn set_image_size(&mut self, image_size: ImageSize) {
        self.inner.set_image_size(image_size);
    }

    fn project(&self, point: &Point3) -> Point2 {
        self.inner.project(point)
    }

    fn backproject(&self, point: &Point2) -> Point3 {
        self.inner.backproject(point)
    }

    fn pinhole(&self) -> Pinhole {
        self.inner.pinhole()
    }

    fn parameters(&self) -> Vec<Vec<f64>> {
        vec![
            self.focal_length().to_vec(),
            self.principal_point().to_vec(),
            self.radial_sym_coeffs().to_vec(),
            self.radial_asym_coeffs().to_vec(),
            self.radial_fourier_coeffs().to_vec(),
            self.tangential_asym_coeffs().to_vec(),
            self.tangential_fourier_coeffs().to_vec(),
        ]
    }

    fn set_parameters(&mut self, parameters: &[Vec<f64>]) -> Result<(), CameraError> {
        check_parameter_count(parameters, Self::PARAMETER_LABELS)?;

        let mut inner = self.inner.clone();
        inner.set_focal_length(&parameters[0])?;
        inner.set_principal_point(&parameters[1])?;
        inner.set_radial_sym_coeffs(&parameters[2]);
        inner.set_radial_asym_coeffs(&parameters[3]);
        inner.set_radial_fourier_coeffs(&parameters[4])?;
        inner.set_tangential_asym_coeffs(&parameters[5]);
        inner.set_tangential_fourier_coeffs(&parameters[6])?;

        self.inner = inner;
        Ok(())
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        Self::PARAMETER_NAMES
    }

    fn parameter_labels(&self) -> &'static [&'static str] {
        Self::PARAMETER_LABELS
    }
}
