use rayon::prelude::*;

use camremap_image::Image;
use camremap_linalg::Point2;

/// Apply a function to each pixel for grid sampling in parallel.
///
/// The rows of `dst` and of both maps are processed together, `f` receives the
/// sampling coordinates of a pixel and writes all its channels.
pub fn par_iter_rows_resample<const C: usize>(
    dst: &mut Image<f64, C>,
    map_x: &Image<f64, 1>,
    map_y: &Image<f64, 1>,
    f: impl Fn(&f64, &f64, &mut [f64]) + Send + Sync,
) {
    let cols = dst.cols();
    if cols == 0 {
        return;
    }

    dst.as_slice_mut()
        .par_chunks_exact_mut(C * cols)
        .zip(map_x.as_slice().par_chunks_exact(cols))
        .zip(map_y.as_slice().par_chunks_exact(cols))
        .for_each(|((dst_chunk, map_x_chunk), map_y_chunk)| {
            dst_chunk
                .chunks_exact_mut(C)
                .zip(map_x_chunk.iter().zip(map_y_chunk.iter()))
                .for_each(|(dst_pixel, (x, y))| {
                    f(x, y, dst_pixel);
                });
        });
}

/// Fill a pair of coordinate maps in parallel over rows.
///
/// `f` receives the 0-based column and row of each pixel and returns the
/// coordinates to store at that pixel.
pub fn par_iter_rows_grid(
    map_x: &mut Image<f64, 1>,
    map_y: &mut Image<f64, 1>,
    f: impl Fn(usize, usize) -> Point2 + Send + Sync,
) {
    let cols = map_x.cols();
    if cols == 0 {
        return;
    }

    map_x
        .as_slice_mut()
        .par_chunks_exact_mut(cols)
        .zip(map_y.as_slice_mut().par_chunks_exact_mut(cols))
        .enumerate()
        .for_each(|(row, (map_x_chunk, map_y_chunk))| {
            map_x_chunk
                .iter_mut()
                .zip(map_y_chunk.iter_mut())
                .enumerate()
                .for_each(|(col, (x, y))| {
                    let p = f(col, row);
                    *x = p.x;
                    *y = p.y;
                });
        });
}
