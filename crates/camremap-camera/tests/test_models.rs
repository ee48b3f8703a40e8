use camremap_camera::stereo::intersect_rays;
use camremap_camera::{
    BrownConrady, Camera, CameraError, CameraExtrinsic, CameraIntrinsic, CameraModel,
    GenFTanTheta, GenFTheta, Kannala, Pinhole,
};
use camremap_linalg::{Point2, Point3};

fn intrinsic() -> CameraIntrinsic {
    CameraIntrinsic {
        fx: 200.0,
        fy: 200.0,
        cx: 320.0,
        cy: 240.0,
        skew: 0.0,
    }
}

fn kannala(translation: Point3) -> Result<Kannala, CameraError> {
    let mut model = Kannala::new(
        intrinsic(),
        [640, 480].into(),
        CameraExtrinsic::new(Point3::ZERO, translation),
    );
    model.set_radial_sym_coeffs(&[0.1]);
    model.set_backproject_settings(1e-12, 50)?;
    Ok(model)
}

fn cube(half: f64, steps: usize) -> Vec<Point3> {
    let coord = |i: usize| -half + 2.0 * half * i as f64 / (steps - 1) as f64;
    let mut points = Vec::with_capacity(steps * steps * steps);
    for i in 0..steps {
        for j in 0..steps {
            for k in 0..steps {
                points.push(Point3::new(coord(i), coord(j), coord(k)));
            }
        }
    }
    points
}

#[test]
fn save_and_load_every_model() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let extrinsic = CameraExtrinsic::new(
        Point3::new(0.01, -0.02, 0.03),
        Point3::new(0.5, -0.25, 1.0 / 3.0),
    );

    let mut brown_conrady = BrownConrady::new(intrinsic(), [640, 480].into(), extrinsic);
    brown_conrady.set_radial_coeffs(&[-0.3, 0.1]);
    brown_conrady.set_tangential_coeffs(&[0.001, -0.002])?;

    let mut gen_ftan_theta = GenFTanTheta::new(intrinsic(), [640, 480].into(), extrinsic);
    gen_ftan_theta.set_radial_den_coeffs(&[0.05]);
    gen_ftan_theta.set_tangential_ocv_coeffs(&[0.001, 0.0, 0.0, 0.002])?;

    let mut gen_ftheta = GenFTheta::new(intrinsic(), [640, 480].into(), extrinsic);
    gen_ftheta.set_radial_sym_coeffs(&[0.02, -0.001]);
    gen_ftheta.set_radial_fourier_coeffs(&[0.01, 0.02])?;

    // solver settings are not part of the file
    let mut kannala = Kannala::new(intrinsic(), [640, 480].into(), extrinsic);
    kannala.set_radial_sym_coeffs(&[0.1]);
    kannala.set_tangential_asym_coeffs(&[0.0, 0.01]);

    let cameras: Vec<Camera> = vec![
        Pinhole::new(intrinsic(), [640, 480].into(), extrinsic).into(),
        brown_conrady.into(),
        gen_ftan_theta.into(),
        gen_ftheta.into(),
        kannala.into(),
    ];

    for camera in cameras {
        let path = tmp_dir.path().join(format!("{}.json", camera.class_name()));
        camera.save(&path)?;
        assert!(path.exists(), "File does not exist: {path:?}");

        let loaded = Camera::load(&path)?;
        assert_eq!(loaded, camera);
    }
    Ok(())
}

#[test]
fn typed_load_checks_the_model() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;
    let path = tmp_dir.path().join("pinhole.json");

    let pinhole = Pinhole::new(intrinsic(), [640, 480].into(), CameraExtrinsic::default());
    pinhole.save(&path)?;

    assert_eq!(Pinhole::load(&path)?, pinhole);
    assert!(matches!(
        Kannala::load(&path),
        Err(CameraError::InvalidArgument(_))
    ));
    Ok(())
}

#[test]
fn load_missing_or_unsupported_files() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempfile::tempdir()?;

    let missing = tmp_dir.path().join("missing.json");
    assert!(matches!(
        Camera::load(&missing),
        Err(CameraError::InvalidArgument(_))
    ));

    let yaml = tmp_dir.path().join("model.yaml");
    std::fs::write(&yaml, "class_name: PinholeModel")?;
    assert!(matches!(
        Camera::load(&yaml),
        Err(CameraError::InvalidArgument(_))
    ));

    let pinhole = Pinhole::default();
    assert!(pinhole.save(tmp_dir.path().join("model.xml")).is_err());
    Ok(())
}

#[test]
fn pinhole_equivalent_keeps_pose() -> Result<(), CameraError> {
    let model = kannala(Point3::new(0.1, 0.0, 3.0))?;
    let pinhole = model.pinhole();

    assert_eq!(pinhole.focal_length(), model.focal_length());
    assert_eq!(pinhole.principal_point(), model.principal_point());
    assert_eq!(pinhole.image_size(), model.image_size());
    assert_eq!(pinhole.translation(), model.translation());
    assert_eq!(pinhole.rotation(), model.rotation());
    Ok(())
}

#[test]
fn kannala_stereo_reconstruction() -> Result<(), CameraError> {
    let left = kannala(Point3::new(0.1, 0.0, 3.0))?;
    let right = kannala(Point3::new(-0.1, 0.0, 3.0))?;

    let points = cube(0.5, 5);

    let pixels_left = left.project_points(&left.world_to_camera_points(&points));
    let pixels_right = right.project_points(&right.world_to_camera_points(&points));

    // every point of the cube lands inside both images
    for pixel in pixels_left.iter().chain(&pixels_right) {
        assert!(pixel.x >= 0.0 && pixel.x < 640.0, "{pixel:?}");
        assert!(pixel.y >= 0.0 && pixel.y < 480.0, "{pixel:?}");
    }

    let rays_left = left.backproject_points(&pixels_left);
    let rays_right = right.backproject_points(&pixels_right);
    for ray in rays_left.iter().chain(&rays_right) {
        assert_eq!(ray.z, 1.0);
    }

    let recovered = intersect_rays(&left, &right, &rays_left, &rays_right)?;
    assert_eq!(recovered.len(), points.len());
    for (p, q) in points.iter().zip(&recovered) {
        assert!((*p - *q).length() < 1e-6, "{p:?} recovered as {q:?}");
    }
    Ok(())
}

#[test]
fn camera_enum_dispatch() -> Result<(), CameraError> {
    let model = kannala(Point3::new(0.1, 0.0, 3.0))?;
    let camera = Camera::from(model.clone());

    let ray = Point3::new(0.1, -0.2, 1.0);
    assert_eq!(camera.project(&ray), model.project(&ray));

    let pixel = Point2::new(400.0, 100.0);
    assert_eq!(camera.backproject(&pixel), model.backproject(&pixel));
    assert_eq!(camera.parameters(), model.parameters());
    assert_eq!(camera.to_string(), model.to_string());

    let boxed: Box<dyn CameraModel> = Box::new(camera);
    assert_eq!(boxed.model_name(), "Kannala");
    Ok(())
}
