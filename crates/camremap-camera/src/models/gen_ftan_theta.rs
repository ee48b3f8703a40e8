use camremap_image::ImageSize;
use camremap_linalg::{evaluate_unit_polynomial, is_active, Point2, Point3};

use crate::camera::{
    check_parameter_count, ray_from_tan_theta, to_image_plane, BackprojectSettings, CameraModel,
    SENTINEL,
};
use crate::error::CameraError;
use crate::extrinsic::CameraExtrinsic;
use crate::intrinsic::{scalar, CameraIntrinsic};

use super::Pinhole;

/// The optional distortion terms of a [`GenFTanTheta`] model that take part in the evaluation.
///
/// Derived from the coefficient vectors every time one of them changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActiveTerms {
    /// The radial denominator polynomial divides the numerator.
    pub radial_denominator: bool,
    /// The `p1, p2` tangential distortion is applied.
    pub tangential: bool,
    /// The tangential distortion is scaled by the tangential polynomial.
    pub tangential_polynomial: bool,
    /// The per-axis OpenCV style tangential terms are added.
    pub tangential_ocv: bool,
}

/// The distortion evaluated at a point of the normalized image plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TanThetaDistortion {
    /// The radial scaling factor.
    pub radial: f64,
    /// The tangential shift along x.
    pub delta_x: f64,
    /// The tangential shift along y.
    pub delta_y: f64,
}

/// The general rational tan(theta) lens model.
///
/// The radial distortion is a ratio of two polynomials in `r^2` and the
/// tangential distortion combines the classic `p1, p2` terms, a polynomial
/// multiplier and OpenCV style per-axis terms. All polynomials except the OpenCV
/// ones carry an implicit leading coefficient of one that is not stored.
#[derive(Clone, Debug, PartialEq)]
pub struct GenFTanTheta {
    intrinsic: CameraIntrinsic,
    radial_num: Vec<f64>,
    radial_den: Vec<f64>,
    tangential: Vec<f64>,
    tangential_poly: Vec<f64>,
    tangential_ocv: Vec<f64>,
    active: ActiveTerms,
    settings: BackprojectSettings,
    image_size: ImageSize,
    extrinsic: CameraExtrinsic,
}

impl Default for GenFTanTheta {
    fn default() -> Self {
        Self::new(
            CameraIntrinsic::default(),
            ImageSize::default(),
            CameraExtrinsic::default(),
        )
    }
}

fn check_len(values: &[f64], name: &str, allowed: usize) -> Result<(), CameraError> {
    if values.is_empty() || values.len() == allowed {
        Ok(())
    } else {
        Err(CameraError::invalid(format!(
            "{name} must have either 0 or {allowed} elements, got {}",
            values.len()
        )))
    }
}

impl GenFTanTheta {
    /// The name reported by [`CameraModel::model_name`].
    pub const MODEL_NAME: &'static str = "General FTan Theta";

    const PARAMETER_NAMES: &'static [&'static str] = &[
        "Focal Length",
        "Principal Point",
        "Skew",
        "Radial Distortion Numerator Coefficients",
        "Radial Distortion Denominator Coefficients",
        "Tangential Distortion Coefficients",
        "Tangential Distortion Polynomial Coefficients",
        "Tangential Distortion OCV Coefficients",
    ];

    const PARAMETER_LABELS: &'static [&'static str] = &[
        "EFL",
        "principal_point",
        "skew",
        "radial_distortion_num_coeff",
        "radial_distortion_denom_coeff",
        "tangential_distortion_coeff",
        "tangential_distortion_poly_coeff",
        "tangential_distortion_ocv_coeff",
    ];

    /// Create a model without distortion.
    pub fn new(
        intrinsic: CameraIntrinsic,
        image_size: ImageSize,
        extrinsic: CameraExtrinsic,
    ) -> Self {
        Self {
            intrinsic,
            radial_num: Vec::new(),
            radial_den: Vec::new(),
            tangential: Vec::new(),
            tangential_poly: Vec::new(),
            tangential_ocv: Vec::new(),
            active: ActiveTerms::default(),
            settings: BackprojectSettings::default(),
            image_size,
            extrinsic,
        }
    }

    fn refresh_active_terms(&mut self) {
        self.active = ActiveTerms {
            radial_denominator: is_active(&self.radial_den),
            tangential: is_active(&self.tangential),
            tangential_polynomial: is_active(&self.tangential_poly),
            tangential_ocv: is_active(&self.tangential_ocv),
        };
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

    /// The radial numerator coefficients of `r^2, r^4, ...`.
    pub fn radial_num_coeffs(&self) -> &[f64] {
        &self.radial_num
    }

    /// The radial denominator coefficients of `r^2, r^4, ...`.
    pub fn radial_den_coeffs(&self) -> &[f64] {
        &self.radial_den
    }

    /// The tangential coefficients `[p1, p2]`, or empty.
    pub fn tangential_coeffs(&self) -> &[f64] {
        &self.tangential
    }

    /// The tangential polynomial coefficients of `r^2, r^4, ...`.
    pub fn tangential_poly_coeffs(&self) -> &[f64] {
        &self.tangential_poly
    }

    /// The OpenCV style tangential coefficients `[c0, c1, c2, c3]`, or empty.
    pub fn tangential_ocv_coeffs(&self) -> &[f64] {
        &self.tangential_ocv
    }

    /// The distortion terms that currently take part in the evaluation.
    pub fn active_terms(&self) -> ActiveTerms {
        self.active
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

    /// Set the radial numerator coefficients.
    pub fn set_radial_num_coeffs(&mut self, coeffs: &[f64]) {
        self.radial_num = coeffs.to_vec();
    }

    /// Set the radial denominator coefficients, empty or all zero disables the denominator.
    pub fn set_radial_den_coeffs(&mut self, coeffs: &[f64]) {
        self.radial_den = coeffs.to_vec();
        self.refresh_active_terms();
    }

    /// Set the tangential coefficients `[p1, p2]`.
    ///
    /// The terms are scaled by the tangential polynomial and vanish while it is
    /// inactive.
    ///
    /// # Errors
    ///
    /// The coefficients must be empty or have exactly two elements.
    pub fn set_tangential_coeffs(&mut self, coeffs: &[f64]) -> Result<(), CameraError> {
        check_len(coeffs, "tangential_distortion", 2)?;
        self.tangential = coeffs.to_vec();
        self.refresh_active_terms();
        Ok(())
    }

    /// Set the tangential polynomial coefficients.
    pub fn set_tangential_poly_coeffs(&mut self, coeffs: &[f64]) {
        self.tangential_poly = coeffs.to_vec();
        self.refresh_active_terms();
    }

    /// Set the OpenCV style tangential coefficients `[c0, c1, c2, c3]`.
    ///
    /// # Errors
    ///
    /// The coefficients must be empty or have exactly four elements.
    pub fn set_tangential_ocv_coeffs(&mut self, coeffs: &[f64]) -> Result<(), CameraError> {
        check_len(coeffs, "tangential_dist_ocv", 4)?;
        self.tangential_ocv = coeffs.to_vec();
        self.refresh_active_terms();
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

    /// Evaluate the distortion at a point of the undistorted normalized image plane.
    pub fn evaluate_distortion(&self, point: Point2) -> TanThetaDistortion {
        let Point2 { x, y } = point;
        let r2 = x * x + y * y;

        let mut radial = evaluate_unit_polynomial(&self.radial_num, r2);
        if self.active.radial_denominator {
            radial /= evaluate_unit_polynomial(&self.radial_den, r2);
        }

        let tan_poly = if self.active.tangential_polynomial {
            evaluate_unit_polynomial(&self.tangential_poly, r2)
        } else {
            0.0
        };

        let (ocv_x, ocv_y) = match self.tangential_ocv.as_slice() {
            [c0, c1, c2, c3] if self.active.tangential_ocv => (c0 + c1 * r2, c2 + c3 * r2),
            _ => (0.0, 0.0),
        };

        let (delta_x, delta_y) = match self.tangential.as_slice() {
            [p1, p2] if self.active.tangential => (
                (2.0 * p1 * x * y + p2 * (r2 + 2.0 * x * x)) * tan_poly + ocv_x,
                (p1 * (r2 + 2.0 * y * y) + 2.0 * p2 * x * y) * tan_poly + ocv_y,
            ),
            _ => (ocv_x, ocv_y),
        };

        TanThetaDistortion {
            radial,
            delta_x,
            delta_y,
        }
    }
}

impl CameraModel for GenFTanTheta {
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
        let distorted = Point2::new(p.x * d.radial + d.delta_x, p.y * d.radial + d.delta_y);
        self.intrinsic.to_pixel(distorted)
    }

    fn backproject(&self, point: &Point2) -> Point3 {
        let distorted = self.intrinsic.to_normalized(point);

        let undistorted = self.settings.solve(distorted, |p| {
            let d = self.evaluate_distortion(p);
            Point2::new(
                (distorted.x - d.delta_x) / d.radial,
                (distorted.y - d.delta_y) / d.radial,
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
            self.radial_num.clone(),
            self.radial_den.clone(),
            self.tangential.clone(),
            self.tangential_poly.clone(),
            self.tangential_ocv.clone(),
        ]
    }

    fn set_parameters(&mut self, parameters: &[Vec<f64>]) -> Result<(), CameraError> {
        check_parameter_count(parameters, Self::PARAMETER_LABELS)?;

        let mut model = self.clone();
        model.set_focal_length(&parameters[0])?;
        model.set_principal_point(&parameters[1])?;
        model.set_skew(scalar(&parameters[2], "skew")?);
        model.set_radial_num_coeffs(&parameters[3]);
        model.set_radial_den_coeffs(&parameters[4]);
        model.set_tangential_coeffs(&parameters[5])?;
        model.set_tangential_poly_coeffs(&parameters[6]);
        model.set_tangential_ocv_coeffs(&parameters[7])?;

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
