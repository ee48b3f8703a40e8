use camremap_image::ImageSize;
use camremap_linalg::{Point2, Point3};

use crate::camera::{check_parameter_count, BackprojectSettings, CameraModel};
use crate::error::CameraError;
use crate::extrinsic::CameraExtrinsic;
use crate::intrinsic::CameraIntrinsic;

use super::{GenFTanTheta, Pinhole};

/// The Brown-Conrady lens model with radial and tangential distortion.
///
/// All the math is done by an inner [`GenFTanTheta`] model with zero skew and
/// without denominator or OpenCV style terms, so both models agree exactly when
/// configured alike.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrownConrady {
    inner: GenFTanTheta,
}

impl BrownConrady {
    /// The name reported by [`CameraModel::model_name`].
    pub const MODEL_NAME: &'static str = "Brown Conrady";

    const PARAMETER_NAMES: &'static [&'static str] = &[
        "Focal Length",
        "Principal Point",
        "Radial Distortion Coefficients",
        "Tangential Distortion Coefficients",
        "Tangential Distortion Polynomial Coefficients",
    ];

    const PARAMETER_LABELS: &'static [&'static str] = &[
        "EFL",
        "principal_point",
        "radial_distortion_coeff",
        "tangential_distortion_coeff",
        "tangential_distortion_poly_coeff",
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
            inner: GenFTanTheta::new(intrinsic, image_size, extrinsic),
        }
    }

    /// The general model doing the math.
    pub fn as_gen_ftan_theta(&self) -> &GenFTanTheta {
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

    /// The radial coefficients `[k1, k2, ...]` of `r^2, r^4, ...`.
    pub fn radial_coeffs(&self) -> &[f64] {
        self.inner.radial_num_coeffs()
    }

    /// The tangential coefficients `[p1, p2]`, or empty.
    pub fn tangential_coeffs(&self) -> &[f64] {
        self.inner.tangential_coeffs()
    }

    /// The tangential polynomial coefficients.
    pub fn tangential_poly_coeffs(&self) -> &[f64] {
        self.inner.tangential_poly_coeffs()
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

    /// Set the radial coefficients.
    pub fn set_radial_coeffs(&mut self, coeffs: &[f64]) {
        self.inner.set_radial_num_coeffs(coeffs);
    }

    /// Set the tangential coefficients, must be empty or have exactly two elements.
    ///
    /// The `p1, p2` terms are scaled by the tangential polynomial and have no
    /// effect while that polynomial is empty or all zero. A coefficient as small
    /// as `[f64::MIN_POSITIVE]` applies them unscaled.
    pub fn set_tangential_coeffs(&mut self, coeffs: &[f64]) -> Result<(), CameraError> {
        self.inner.set_tangential_coeffs(coeffs)
    }

    /// Set the tangential polynomial coefficients.
    pub fn set_tangential_poly_coeffs(&mut self, coeffs: &[f64]) {
        self.inner.set_tangential_poly_coeffs(coeffs);
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

impl CameraModel for BrownConrady {
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
            self.radial_coeffs().to_vec(),
            self.tangential_coeffs().to_vec(),
            self.tangential_poly_coeffs().to_vec(),
        ]
    }

    fn set_parameters(&mut self, parameters: &[Vec<f64>]) -> Result<(), CameraError> {
        check_parameter_count(parameters, Self::PARAMETER_LABELS)?;

        let mut inner = self.inner.clone();
        inner.set_focal_length(&parameters[0])?;
        inner.set_principal_point(&parameters[1])?;
        inner.set_radial_num_coeffs(&parameters[2]);
        inner.set_tangential_coeffs(&parameters[3])?;
        inner.set_tangential_poly_coeffs(&parameters[4]);

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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model() -> Result<BrownConrady, CameraError> {
        let intrinsic = CameraIntrinsic {
            fx: 800.0,
            fy: 800.0,
            cx: 400.0,
            cy: 300.0,
            skew: 0.0,
        };
        let mut model = BrownConrady::new(intrinsic, [800, 600].into(), CameraExtrinsic::default());
        model.set_radial_coeffs(&[-0.1, 0.02]);
        model.set_tangential_coeffs(&[0.001, 0.002])?;
        model.set_tangential_poly_coeffs(&[0.05]);
        Ok(model)
    }

    #[test]
    fn brown_conrady_project() -> Result<(), CameraError> {
        let intrinsic = CameraIntrinsic {
            cx: 0.5,
            cy: 0.5,
            ..Default::default()
        };
        let mut model = BrownConrady::new(intrinsic, ImageSize::default(), Default::default());
        model.set_radial_coeffs(&[0.1]);
        model.set_tangential_coeffs(&[0.1, 0.1])?;
        model.set_tangential_poly_coeffs(&[0.0]);

        // r2 = 2, the radial factor is 1.2 and the tangential terms are disabled
        let p = model.project(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p.x, 1.7, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.7, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn brown_conrady_tangential_needs_polynomial() -> Result<(), CameraError> {
        let intrinsic = CameraIntrinsic {
            cx: 0.5,
            cy: 0.5,
            ..Default::default()
        };
        let mut model = BrownConrady::new(intrinsic, ImageSize::default(), Default::default());
        model.set_radial_coeffs(&[0.1]);
        model.set_tangential_coeffs(&[0.1, 0.1])?;

        // without a tangential polynomial only the radial term applies
        let p = model.project(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p.x, 1.7, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.7, epsilon = 1e-12);

        // a negligible coefficient enables the classic p1, p2 shift of 0.6
        model.set_tangential_poly_coeffs(&[f64::MIN_POSITIVE]);
        let p = model.project(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p.x, 2.3, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.3, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn brown_conrady_ignores_skew() {
        let intrinsic = CameraIntrinsic {
            skew: 3.0,
            ..Default::default()
        };
        let model = BrownConrady::new(intrinsic, ImageSize::default(), Default::default());
        assert_eq!(model.as_gen_ftan_theta().skew(), 0.0);
        assert_eq!(model.pinhole().skew(), 0.0);
    }

    #[test]
    fn brown_conrady_matches_general_model() -> Result<(), CameraError> {
        let model = model()?;
        let mut general = GenFTanTheta::new(
            *model.as_gen_ftan_theta().intrinsic(),
            model.image_size(),
            *model.extrinsic(),
        );
        general.set_radial_num_coeffs(&[-0.1, 0.02]);
        general.set_tangential_coeffs(&[0.001, 0.002])?;
        general.set_tangential_poly_coeffs(&[0.05]);

        for ray in [
            Point3::new(0.1, 0.2, 1.0),
            Point3::new(-0.3, 0.25, 1.5),
            Point3::new(0.0, 0.0, 2.0),
        ] {
            assert_eq!(model.project(&ray), general.project(&ray));
        }
        let pixel = Point2::new(123.0, 456.0);
        assert_eq!(model.backproject(&pixel), general.backproject(&pixel));
        Ok(())
    }

    #[test]
    fn brown_conrady_round_trip() -> Result<(), CameraError> {
        let mut model = model()?;
        model.set_backproject_settings(1e-10, 50)?;
        for pixel in [
            Point2::new(10.0, 10.0),
            Point2::new(400.0, 300.0),
            Point2::new(790.0, 20.0),
            Point2::new(200.0, 580.0),
        ] {
            let back = model.project(&model.backproject(&pixel));
            assert!((back - pixel).length() < 1e-4, "{pixel:?} came back as {back:?}");
        }
        Ok(())
    }

    #[test]
    fn brown_conrady_parameters() -> Result<(), CameraError> {
        let mut model = model()?;
        let params = model.parameters();
        assert_eq!(
            params,
            vec![
                vec![800.0, 800.0],
                vec![400.0, 300.0],
                vec![-0.1, 0.02],
                vec![0.001, 0.002],
                vec![0.05],
            ]
        );

        model.set_parameters(&params)?;
        assert_eq!(model.parameters(), params);
        assert!(model.set_parameters(&params[..4]).is_err());
        Ok(())
    }

    #[test]
    fn brown_conrady_copy_and_pose() -> Result<(), CameraError> {
        let mut model = model()?;
        model.set_translation(Point3::new(0.0, 0.0, 1.0));

        let mut copy = model.clone();
        copy.set_radial_coeffs(&[]);
        copy.set_translation(Point3::ZERO);
        assert_eq!(model.radial_coeffs(), &[-0.1, 0.02]);
        assert_eq!(model.translation(), Point3::new(0.0, 0.0, 1.0));
        assert_eq!(model.pinhole().translation(), Point3::new(0.0, 0.0, 1.0));
        Ok(())
    }

    #[test]
    fn brown_conrady_display() -> Result<(), CameraError> {
        let text = model()?.to_string();
        assert!(text.starts_with("Brown Conrady Camera Model\n"));
        assert!(text.contains("Radial Distortion Coefficients: [-0.1, 0.02]\n"));
        assert!(text.contains("Rotation (rx, ry, rz): [0, 0, 0]\n"));
        Ok(())
    }
}
