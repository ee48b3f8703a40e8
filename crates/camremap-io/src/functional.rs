use std::path::Path;

use camremap_image::{Image, ImageSize};

use crate::error::IoError;

fn check_exists(file_path: &Path) -> Result<(), IoError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }
    Ok(())
}

/// The encoder matching the lowercased extension of a file.
fn image_format(file_path: &Path) -> Result<image::ImageFormat, IoError> {
    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("bmp") => Ok(image::ImageFormat::Bmp),
        Some("png") => Ok(image::ImageFormat::Png),
        Some("jpg") | Some("jpeg") => Ok(image::ImageFormat::Jpeg),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

/// Reads an image from the given file path as 8-bit RGB.
///
/// The method tries to read from any image format supported by the image crate
/// and converts grayscale or alpha images to RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    check_exists(file_path)?;

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };
    log::debug!("read {} image from {}", size, file_path.display());

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Reads an image as RGB with double precision values in `[0, 255]`.
pub fn read_image_f64(file_path: impl AsRef<Path>) -> Result<Image<f64, 3>, IoError> {
    Ok(read_image_any_rgb8(file_path)?.cast::<f64>()?)
}

/// Writes a double precision image with one or three channels.
///
/// Values are clamped to `[0, 255]` and rounded to 8 bits. The encoder follows
/// the lowercased extension: `bmp`, `png`, `jpg` or `jpeg`.
///
/// # Arguments
///
/// * `file_path` - The path of the image file to write.
/// * `image` - The image to encode.
///
/// # Errors
///
/// An unsupported extension gives [`IoError::InvalidFileExtension`], any channel
/// count other than one or three gives [`IoError::UnsupportedChannels`].
pub fn write_image_f64<const C: usize>(
    file_path: impl AsRef<Path>,
    image: &Image<f64, C>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let format = image_format(file_path)?;

    let color_type = match C {
        1 => image::ExtendedColorType::L8,
        3 => image::ExtendedColorType::Rgb8,
        _ => return Err(IoError::UnsupportedChannels(C)),
    };

    let data = image
        .as_slice()
        .iter()
        .map(|v| v.clamp(0.0, 255.0).round() as u8)
        .collect::<Vec<_>>();

    image::save_buffer_with_format(
        file_path,
        &data,
        image.width() as u32,
        image.height() as u32,
        color_type,
        format,
    )?;
    log::debug!("wrote {} image to {}", image.size(), file_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> Image<f64, 3> {
        Image::from_fn([8, 6].into(), |x, y| {
            let v = (x * 20 + y * 10) as f64;
            [v, 255.0 - v, 100.0]
        })
    }

    #[test]
    fn write_read_png() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gradient.png");

        let image = gradient();
        write_image_f64(&file_path, &image)?;
        assert!(file_path.exists(), "File does not exist: {file_path:?}");

        let image_back = read_image_f64(&file_path)?;
        assert_eq!(image_back, image);

        let image_u8 = read_image_any_rgb8(&file_path)?;
        assert_eq!(image_u8.cols(), 8);
        assert_eq!(image_u8.rows(), 6);
        assert_eq!(image_u8.num_channels(), 3);
        Ok(())
    }

    #[test]
    fn write_clamps_and_rounds() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("mono.BMP");

        let image = Image::<f64, 1>::new([4, 1].into(), vec![-20.0, 10.4, 10.6, 300.0])?;
        write_image_f64(&file_path, &image)?;

        // grayscale images come back as rgb
        let image_back = read_image_any_rgb8(&file_path)?;
        assert_eq!(
            image_back.as_slice(),
            &[0, 0, 0, 10, 10, 10, 11, 11, 11, 255, 255, 255]
        );
        Ok(())
    }

    #[test]
    fn write_jpeg() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        for name in ["gradient.jpg", "gradient.jpeg"] {
            let file_path = tmp_dir.path().join(name);
            write_image_f64(&file_path, &gradient())?;
            assert_eq!(read_image_f64(&file_path)?.size(), ImageSize::from([8, 6]));
        }
        Ok(())
    }

    #[test]
    fn invalid_files() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;

        let missing = tmp_dir.path().join("missing.png");
        assert!(matches!(
            read_image_f64(&missing),
            Err(IoError::FileDoesNotExist(_))
        ));

        let tiff = tmp_dir.path().join("gradient.tiff");
        assert!(matches!(
            write_image_f64(&tiff, &gradient()),
            Err(IoError::InvalidFileExtension(_))
        ));

        let no_extension = tmp_dir.path().join("gradient");
        assert!(write_image_f64(&no_extension, &gradient()).is_err());

        let two_channels = Image::<f64, 2>::from_size_val([2, 2].into(), 1.0)?;
        assert!(matches!(
            write_image_f64(tmp_dir.path().join("la.png"), &two_channels),
            Err(IoError::UnsupportedChannels(2))
        ));
        Ok(())
    }
}
