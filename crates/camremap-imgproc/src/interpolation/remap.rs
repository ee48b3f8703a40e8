use camremap_image::{Image, ImageError};

use super::bilinear::bilinear_interpolate;
use crate::parallel;

/// Apply generic geometric transformation to an image.
///
/// Every channel is resampled independently with bilinear interpolation at the
/// coordinates of the maps.
///
/// # Arguments
///
/// * `src` - The input image container with shape (height, width, C).
/// * `dst` - The output image container with shape (height, width, C).
/// * `map_x` - The x coordinates of the pixels to interpolate.
/// * `map_y` - The y coordinates of the pixels to interpolate.
///
/// # Errors
///
/// * The mapx and mapy must have the same size.
/// * The output image must have the same size as the mapx and mapy.
pub fn remap<const C: usize>(
    src: &Image<f64, C>,
    dst: &mut Image<f64, C>,
    map_x: &Image<f64, 1>,
    map_y: &Image<f64, 1>,
) -> Result<(), ImageError> {
    if map_x.size() != map_y.size() {
        return Err(ImageError::InvalidImageSize(
            map_x.cols(),
            map_x.rows(),
            map_y.cols(),
            map_y.rows(),
        ));
    }

    if dst.size() != map_x.size() {
        return Err(ImageError::InvalidImageSize(
            map_x.cols(),
            map_x.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    // parallelize the remap operation by rows
    parallel::par_iter_rows_resample(dst, map_x, map_y, |&x, &y, dst_pixel| {
        dst_pixel.iter_mut().enumerate().for_each(|(c, pixel)| {
            *pixel = bilinear_interpolate(src, x, y, c);
        });
    });

    Ok(())
}

/// Resample an image into a new image sized to the coordinate maps.
///
/// An empty source image or empty maps give an empty image.
///
/// # Errors
///
/// The maps must have the same size.
pub fn interp2<const C: usize>(
    src: &Image<f64, C>,
    map_x: &Image<f64, 1>,
    map_y: &Image<f64, 1>,
) -> Result<Image<f64, C>, ImageError> {
    if src.is_empty() || map_x.is_empty() || map_y.is_empty() {
        return Ok(Image::empty());
    }

    let mut dst = Image::from_size_val(map_x.size(), 0.0)?;
    remap(src, &mut dst, map_x, map_y)?;

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolation::grid::meshgrid;
    use camremap_image::ImageSize;

    #[test]
    fn remap_smoke() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 3,
                height: 3,
            },
            vec![0f64, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        )?;

        let new_size = [2, 2].into();

        let map_x = Image::new(new_size, vec![0.0, 2.0, 0.0, 2.0])?;
        let map_y = Image::new(new_size, vec![0.0, 0.0, 2.0, 2.0])?;

        let expected = [0.0, 2.0, 6.0, 8.0];

        let mut image_transformed = Image::<_, 1>::from_size_val(new_size, 0.0)?;

        remap(&image, &mut image_transformed, &map_x, &map_y)?;

        assert_eq!(image_transformed.num_channels(), 1);
        assert_eq!(image_transformed.size().width, 2);
        assert_eq!(image_transformed.size().height, 2);

        for (a, b) in image_transformed.as_slice().iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }

        Ok(())
    }

    #[test]
    fn remap_identity_multichannel() -> Result<(), ImageError> {
        let image = Image::<f64, 3>::from_fn([5, 4].into(), |x, y| {
            let v = (x + y) as f64;
            [v, v + 1.0, v + 2.0]
        });
        let (map_x, map_y) = meshgrid(image.size())?;

        let out = interp2(&image, &map_x, &map_y)?;
        assert_eq!(out, image);
        Ok(())
    }

    #[test]
    fn remap_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<f64, 1>::from_size_val([3, 3].into(), 1.0)?;
        let (map_x, _) = meshgrid([3, 3].into())?;
        let (_, map_y) = meshgrid([2, 3].into())?;

        let mut dst = Image::<f64, 1>::from_size_val([3, 3].into(), 0.0)?;
        assert!(matches!(
            remap(&image, &mut dst, &map_x, &map_y),
            Err(ImageError::InvalidImageSize(3, 3, 2, 3))
        ));

        let mut dst = Image::<f64, 1>::from_size_val([4, 3].into(), 0.0)?;
        assert!(remap(&image, &mut dst, &map_x, &map_x).is_err());
        assert!(interp2(&image, &map_x, &map_y).is_err());
        Ok(())
    }

    #[test]
    fn interp2_empty_inputs() -> Result<(), ImageError> {
        let (map_x, map_y) = meshgrid([3, 3].into())?;
        let empty = Image::<f64, 2>::empty();
        assert!(interp2(&empty, &map_x, &map_y)?.is_empty());

        let image = Image::<f64, 2>::from_size_val([3, 3].into(), 1.0)?;
        let no_map = Image::<f64, 1>::empty();
        assert!(interp2(&image, &no_map, &no_map)?.is_empty());
        Ok(())
    }

    #[test]
    fn remap_outside_is_zero() -> Result<(), ImageError> {
        let image = Image::<f64, 1>::from_size_val([3, 3].into(), 7.0)?;
        let size = [3, 1].into();
        let map_x = Image::new(size, vec![-1.0, 1.0, 3.5])?;
        let map_y = Image::new(size, vec![0.0, 1.0, 0.0])?;

        let out = interp2(&image, &map_x, &map_y)?;
        assert_eq!(out.as_slice(), &[0.0, 7.0, 0.0]);
        Ok(())
    }
}
