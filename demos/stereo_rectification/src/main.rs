use argh::FromArgs;
use std::path::PathBuf;

use camremap::{
    camera::{stereo::stereo_rectify, Camera, CameraModel},
    imgproc::Remapper,
    io::functional as F,
};

#[derive(FromArgs)]
/// Rectify a stereo pair of images with their camera model files
struct Args {
    /// path to the left camera model
    #[argh(option)]
    left_model: PathBuf,

    /// path to the right camera model
    #[argh(option)]
    right_model: PathBuf,

    /// path to the left image
    #[argh(option)]
    left_image: PathBuf,

    /// path to the right image
    #[argh(option)]
    right_image: PathBuf,

    /// directory where the rectified images are written
    #[argh(option, default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let model_left = Camera::load(&args.left_model)?;
    let model_right = Camera::load(&args.right_model)?;

    println!("Left Camera Model:\n{model_left}");
    println!("Right Camera Model:\n{model_right}");

    let image_left = F::read_image_f64(&args.left_image)?;
    let image_right = F::read_image_f64(&args.right_image)?;

    // the normalized pinholes become the targets of the rectification
    let mut pinhole_left = model_left.pinhole();
    let mut pinhole_right = model_right.pinhole();
    let (rect_left, rect_right) = stereo_rectify(&mut pinhole_left, &mut pinhole_right);

    let remapper_left = Remapper::with_rotation(model_left, pinhole_left, rect_left)?;
    let remapper_right = Remapper::with_rotation(model_right, pinhole_right, rect_right)?;

    let rectified_left = remapper_left.undistort(&image_left)?;
    let rectified_right = remapper_right.undistort(&image_right)?;

    let path_left = args.output_dir.join("imageLRect.png");
    let path_right = args.output_dir.join("imageRRect.png");
    F::write_image_f64(&path_left, &rectified_left)?;
    F::write_image_f64(&path_right, &rectified_right)?;

    log::info!(
        "wrote {} and {}",
        path_left.display(),
        path_right.display()
    );

    Ok(())
}
