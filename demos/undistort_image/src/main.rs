use argh::FromArgs;
use std::path::PathBuf;

use camremap::{
    camera::{Camera, CameraModel},
    imgproc::Remapper,
    io::functional as F,
};

#[derive(FromArgs)]
/// Undistort an image with a camera model file
struct Args {
    /// path to the input image
    #[argh(positional)]
    input_image: PathBuf,

    /// path to the output image, the extension selects the encoder
    #[argh(positional)]
    output_image: PathBuf,

    /// path to the model of the input image
    #[argh(positional)]
    input_model: PathBuf,

    /// path to the model of the output image, the pinhole equivalent of the input
    /// model when omitted
    #[argh(positional)]
    output_model: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let input_model = Camera::load(&args.input_model)?;
    println!("Input Model:\n{input_model}");

    let remapper = match &args.output_model {
        Some(path) => {
            let output_model = Camera::load(path)?;
            println!("Output Model:\n{output_model}");
            Remapper::with_target(input_model, output_model)?
        }
        None => {
            println!("Output Model: (not provided)\n");
            Remapper::new(input_model)?
        }
    };

    let image = F::read_image_f64(&args.input_image)?;
    log::info!(
        "undistorting {} into {}",
        args.input_image.display(),
        remapper.target().image_size()
    );

    let undistorted = remapper.undistort(&image)?;
    F::write_image_f64(&args.output_image, &undistorted)?;

    println!("Saved the undistorted image to {}", args.output_image.display());

    Ok(())
}
