use camremap_image::Image;

/// Kernel for bilinear interpolation
///
/// Coordinates with `x < 0`, `y < 0`, `x > width` or `y > height` are outside
/// the image and yield zero, as does an empty image. Inside, the four corner
/// indices are clamped to the valid range before blending, so the last column
/// and row extend up to `width` and `height`.
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `x` - The x coordinate of the pixel to interpolate.
/// * `y` - The y coordinate of the pixel to interpolate.
/// * `c` - The channel of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel value.
pub fn bilinear_interpolate<const C: usize>(
    image: &Image<f64, C>,
    x: f64,
    y: f64,
    c: usize,
) -> f64 {
    let (rows, cols) = (image.rows(), image.cols());

    if rows == 0 || cols == 0 {
        return 0.0;
    }

    // NaN coordinates fail every comparison, reject them here as well
    if !(x >= 0.0 && y >= 0.0 && x <= cols as f64 && y <= rows as f64) {
        return 0.0;
    }

    let x0 = x.floor();
    let y0 = y.floor();

    let frac_x = x - x0;
    let frac_y = y - y0;

    let ix0 = (x0 as usize).min(cols - 1);
    let iy0 = (y0 as usize).min(rows - 1);
    let ix1 = (ix0 + 1).min(cols - 1);
    let iy1 = (iy0 + 1).min(rows - 1);

    let data = image.as_slice();
    let at = |ix: usize, iy: usize| data[(iy * cols + ix) * C + c];

    let q11 = at(ix0, iy0);
    let q21 = at(ix1, iy0);
    let q12 = at(ix0, iy1);
    let q22 = at(ix1, iy1);

    (1.0 - frac_y) * ((1.0 - frac_x) * q11 + frac_x * q21)
        + frac_y * ((1.0 - frac_x) * q12 + frac_x * q22)
}
