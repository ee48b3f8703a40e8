use argh::FromArgs;

use camremap::{
    camera::{stereo::intersect_rays, CameraExtrinsic, CameraIntrinsic, CameraModel, Kannala},
    linalg::Point3,
};

#[derive(FromArgs)]
/// Project a cube into two fisheye cameras and triangulate it back
struct Args {
    /// half the side of the cube in world units
    #[argh(option, default = "1.0")]
    half_size: f64,

    /// distance between the two cameras
    #[argh(option, default = "0.2")]
    baseline: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let intrinsic = CameraIntrinsic {
        fx: 200.0,
        fy: 200.0,
        cx: 320.0,
        cy: 240.0,
        skew: 0.0,
    };

    let mut left = Kannala::new(
        intrinsic,
        [640, 480].into(),
        CameraExtrinsic::new(Point3::ZERO, Point3::new(args.baseline / 2.0, 0.0, 3.0)),
    );
    left.set_radial_sym_coeffs(&[0.1]);

    // the right camera is a copy of the left one moved along the baseline
    let mut right = left.clone();
    right.set_translation(Point3::new(-args.baseline / 2.0, 0.0, 3.0));

    println!("Left Camera Model:\n{left}");
    println!("Right Camera Model:\n{right}");

    let h = args.half_size;
    let vertices = [
        Point3::new(-h, -h, -h),
        Point3::new(-h, -h, h),
        Point3::new(-h, h, -h),
        Point3::new(-h, h, h),
        Point3::new(h, -h, -h),
        Point3::new(h, -h, h),
        Point3::new(h, h, -h),
        Point3::new(h, h, h),
    ];

    let pixels_left = left.project_points(&left.world_to_camera_points(&vertices));
    let pixels_right = right.project_points(&right.world_to_camera_points(&vertices));

    let rays_left = left.backproject_points(&pixels_left);
    let rays_right = right.backproject_points(&pixels_right);

    let recovered = intersect_rays(&left, &right, &rays_left, &rays_right)?;

    for (((vertex, point), pl), pr) in vertices
        .iter()
        .zip(&recovered)
        .zip(&pixels_left)
        .zip(&pixels_right)
    {
        println!(
            "vertex {vertex:?} -> left {pl:?} right {pr:?} -> recovered {point:?} (error {:.3e})",
            (*vertex - *point).length()
        );
    }

    let max_error = vertices
        .iter()
        .zip(&recovered)
        .map(|(v, p)| (*v - *p).length())
        .fold(0.0, f64::max);
    log::info!("largest reconstruction error: {max_error:.3e}");

    Ok(())
}
