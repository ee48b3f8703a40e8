use camremap_image::{Image, ImageError, ImageSize};
use camremap_linalg::Point2;

use crate::parallel;

/// Create a meshgrid of x and y coordinates
///
/// # Arguments
///
/// * `size` - The size of the grid.
///
/// # Returns
///
/// The maps `(map_x, map_y)` holding the 0-based column and row of each pixel.
pub fn meshgrid(size: ImageSize) -> Result<(Image<f64, 1>, Image<f64, 1>), ImageError> {
    meshgrid_from_fn(size, |x, y| Point2::new(x as f64, y as f64))
}

/// Create a pair of coordinate maps by evaluating a function at every pixel.
///
/// The function receives the 0-based column and row of a pixel and is evaluated
/// in parallel over the rows of the grid.
///
/// # Arguments
///
/// * `size` - The size of the maps.
/// * `f` - The function returning the coordinates stored at each pixel.
pub fn meshgrid_from_fn(
    size: ImageSize,
    f: impl Fn(usize, usize) -> Point2 + Send + Sync,
) -> Result<(Image<f64, 1>, Image<f64, 1>), ImageError> {
    let mut map_x = Image::from_size_val(size, 0.0)?;
    let mut map_y = Image::from_size_val(size, 0.0)?;

    parallel::par_iter_rows_grid(&mut map_x, &mut map_y, f);

    Ok((map_x, map_y))
}
