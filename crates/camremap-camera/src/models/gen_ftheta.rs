use camremap_image::ImageSize;
use camremap_linalg::{
    evaluate_fourier, evaluate_polynomial, evaluate_unit_polynomial, is_active, Point2, Point3,
};

use crate::camera::{
    check_parameter_count, ray_from_tan_theta, to_image_plane, BackprojectSettings, CameraModel,
    SENTINEL,
};
use crate::error::CameraError;
use crate::extrinsic::CameraExtrinsic;
use crate::intrinsic::{scalar, CameraIntrinsic};

use super::Pinhole;

/// The distortion evaluated at a point of the normalized image plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FThetaDistortion {
    /// The radial scaling factor.
    pub radial: f64,
    /// The tangential scaling factor, zero unless an asymmetric term is active.
    pub tangential: f64,
    /// The `theta / tan(theta)` factor mapping the pinhole plane to the fisheye plane.
    pub ftheta: f64,
}

/// The general fisheye lens model, radial distance proportional to the incidence angle.
///
/// The symmetric radial term is a polynomial in `theta^2` with an implicit
/// leading one. The asymmetric radial and tangential terms are each the product
/// of a polynomial in `theta^2` and a Fourier series in the azimuth. They are
/// only evaluated when at least one of their coefficient vectors is active.
#[derive(Clone, Debug, PartialEq)]
pub struct GenFTheta {
    intrinsic: CameraIntrinsic,
    radial_sym: Vec<f64>,
    radial_asym: Vec<f64>,
    radial_fourier: Vec<f64>,
    tangential_asym: Vec<f64>,
    tangential_fourier: Vec<f64>,
    full: bool,
    settings: BackprojectSettings,
    image_size: ImageSize,
    extrinsic: CameraExtrinsic,
}

impl Default for GenFTheta {
    fn default() -> Self {
        Self::new(
            CameraIntrinsic::default(),
            ImageSize::default(),
            CameraExtrinsic::default(),
        )
    }
}

fn check_fourier(coeffs: &[f64], name: &str) -> Result<(), CameraError> {
    if coeffs.len() % 2 != 0 {
        return Err(CameraError::invalid(format!(
            "{name} must have a length that is a multiple of 2, got {}",
            coeffs.len()
        )));
    }
    Ok(())
}

impl GenFTheta {
    /// The name reported by [`CameraModel::model_name`].
    pub const MODEL_NAME: &'static str = "General FTheta";

    const PARAMETER_NAMES: &'static [&'static str] = &[
        "Focal Length",
        "Principal Point",
        "Skew",
        "Radial Distortion Symmetric Coefficients",
        "Radial Distortion Asymmetric Coefficients",
        "Radial Distortion Fourier Coefficients",
        "Tangential Distortion Asymmetric Coefficients",
        "Tangential Distortion Fourier Coefficients",
    ];

    const PARAMETER_LABELS: &'static [&'static str] = &[
        "mu_mv",
        "principal_point",
        "skew",
        "radial_distortion_coeff",
        "radial_asym_poly",
        "radial_asym_fourier",
        "tangential_asym_poly",
        "tangential_asym_fourier",
    ];

    /// Create an equidistant fisheye model without distortion terms.
    pub fn new(
        intrinsic: CameraIntrinsic,
        image_size: ImageSize,
        extrinsic: CameraExtrinsic,
    ) -> Self {
        Self {
            intrinsic,
            radial_sym: Vec::new(),
            radial_asym: Vec::new(),
            radial_fourier: Vec::new(),
            tangential_asym: Vec::new(),
            tangential_fourier: Vec::new(),
            full: false,
            settings: BackprojectSettings::default(),
            image_size,
            extrinsic,
        }
    }

    fn refresh_full(&mut self) {
        self.full = [
            &self.radial_asym,
            &self.radial_fourier,
            &self.tangential_asym,
            &self.tangential_fourier,
        ]
        .iter()
        .any(|coeffs| is_active(coeffs));
    }

    /// The focal length, principal point and skew.
    pub fn intrinsic(&self) -> &CameraIntrinsic {
        &self.intrinsic
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

    /// The symmetric radial coefficients of `theta^2, theta^4, ...`.
    pub fn radial_sym_coeffs(&self) -> &[f64] {
        &self.radial_sym
    }

    /// The asymmetric radial polynomial coefficients, constant term first.
    pub fn radial_asym_coeffs(&self) -> &[f64] {
        &self.radial_asym
    }

    /// The asymmetric radial Fourier coefficients as `(cos, sin)` pairs.
    pub fn radial_fourier_coeffs(&self) -> &[f64] {
        &self.radial_fourier
    }

    /// The asymmetric tangential polynomial coefficients, constant term first.
    pub fn tangential_asym_coeffs(&self) -> &[f64] {
        &self.tangential_asym
    }

    /// The asymmetric tangential Fourier coefficients as `(cos, sin)` pairs.
    pub fn tangential_fourier_coeffs(&self) -> &[f64] {
        &self.tangential_fourier
    }

    /// Whether the asymmetric terms take part in the evaluation.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// The convergence settings of [`CameraModel::backproject`].
    pub fn backproject_settings(&self) -> BackprojectSettings {
        self.settings
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

    /// Set the symmetric radial coefficients.
    pub fn set_radial_sym_coeffs(&mut self, coeffs: &[f64]) {
        self.radial_sym = coeffs.to_vec();
    }

    /// Set the asymmetric radial polynomial coefficients.
    pub fn set_radial_asym_coeffs(&mut self, coeffs: &[f64]) {
        self.radial_asym = coeffs.to_vec();
        self.refresh_full();
    }

    /// Set the asymmetric radial Fourier coefficients, the length must be even.
    pub fn set_radial_fourier_coeffs(&mut self, coeffs: &[f64]) -> Result<(), CameraError> {
        check_fourier(coeffs, "radial_distortion_four")?;
        self.radial_fourier = coeffs.to_vec();
        self.refresh_full();
        Ok(())
    }

    /// Set the asymmetric tangential polynomial coefficients.
    pub fn set_tangential_asym_coeffs(&mut self, coeffs: &[f64]) {
        self.tangential_asym = coeffs.to_vec();
        self.refresh_full();
    }

    /// Set the asymmetric tangential Fourier coefficients, the length must be even.
    pub fn set_tangential_fourier_coeffs(&mut self, coeffs: &[f64]) -> Result<(), CameraError> {
        check_fourier(coeffs, "tangential_distortion_four")?;
        self.tangential_fourier = coeffs.to_vec();
        self.refresh_full();
        Ok(())
    }

    /// Set the convergence settings of [`CameraModel::backproject`].
    ///
    /// # Errors
    ///
    /// The threshold must be positive and the iterations non-zero.
    pub fn set_backproject_settings(
        &mut self,
        threshold: f64,
        iterations: usize,
    ) -> Result<(), CameraError> {
        self.settings = BackprojectSettings::new(threshold, iterations)?;
        Ok(())
    }

    /// Evaluate the distortion at a point of the undistorted pinhole plane.
    pub fn evaluate_distortion(&self, point: Point2) -> FThetaDistortion {
        let r_xy = point.length();
        let theta = r_xy.atan();
        let theta2 = theta * theta;

        let ftheta = if r_xy != 0.0 { theta / r_xy } else { 0.0 };

        let mut radial = evaluate_unit_polynomial(&self.radial_sym, theta2);
        let mut tangential = 0.0;
        if self.full {
            let phi = point.y.atan2(point.x);
            radial += evaluate_polynomial(&self.radial_asym, theta2)
                * evaluate_fourier(&self.radial_fourier, phi);
            tangential = evaluate_polynomial(&self.tangential_asym, theta2)
                * evaluate_fourier(&self.tangential_fourier, phi);
        }

        FThetaDistortion {
            radial,
            tangential,
            ftheta,
        }
    }
}

impl CameraModel for GenFTheta {
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
        let Some(p) = to_image_plane(point) else {
            return Point2::splat(SENTINEL);
        };

        let d = self.evaluate_distortion(p);
        let p = p * d.ftheta;

        let distorted = Point2::new(
            p.x * d.radial - p.y * d.tangential,
            p.y * d.radial + p.x * d.tangential,
        );
        self.intrinsic.to_pixel(distorted)
    }

    fn backproject(&self, point: &Point2) -> Point3 {
        let distorted = self.intrinsic.to_normalized(point);
        if distorted == Point2::ZERO {
            return Point3::new(0.0, 0.0, 1.0);
        }

        let undistorted = self.settings.solve(distorted, |p| {
            let d = self.evaluate_distortion(p);
            let scale =
                (d.radial * d.radial + d.tangential * d.tangential) * d.ftheta;
            Point2::new(
                (d.radial * distorted.x + d.tangential * distorted.y) / scale,
                (d.radial * distorted.y - d.tangential * distorted.x) / scale,
            )
        });

        ray_from_tan_theta(undistorted)
    }

    fn pinhole(&self) -> Pinhole {
        Pinhole::new(self.intrinsic, self.image_size, self.extrinsic)
    }

    fn parameters(&self) -> Vec<Vec<f64>> {
        vec![
            self.focal_length().to_vec(),
            self.principal_point().to_vec(),
            vec![self.skew()],
            self.radial_sym.clone(),
            self.radial_asym.clone(),
            self.radial_fourier.clone(),
            self.tangential_asym.clone(),
            self.tangential_fourier.clone(),
        ]
    }

    fn set_parameters(&mut self, parameters: &[Vec<f64>]) -> Result<(), CameraError> {
        check_parameter_count(parameters, Self::PARAMETER_LABELS)?;

        let mut model = self.clone();
        model.set_focal_length(&parameters[0])?;
        model.set_principal_point(&parameters[1])?;
        model.set_skew(scalar(&parameters[2], "skew")?);
        model.set_radial_sym_coeffs(&parameters[3]);
        model.set_radial_asym_coeffs(&parameters[4]);
        model.set_radial_fourier_coeffs(&parameters[5])?;
        model.set_tangential_asym_coeffs(&parameters[6]);
        model.set_tangential_fourier_coeffs(&parameters[7])?;

        *self = model;
        Ok(())
    }

    fn parameter_names(&self) -> &'static [&'static str] {
        Self::PARAMETER_NAMES
    }

    fn parameter_labels(&self) -> &'static [&'static str] {
        Self::PARAMETER_LABELS
    }
}
