use rayon::prelude::*;

use camremap_linalg::{
    from_rows, line_line_intersect, matrix_exp3, matrix_log3, rotate_points, Matrix3x3, Point3,
};

use crate::camera::CameraModel;
use crate::error::CameraError;
use crate::intrinsic::CameraIntrinsic;
use crate::models::Pinhole;

/// Compute the rectifying rotations of a stereo pair.
///
/// Both pinholes are normalized in place: they get the average focal length and
/// the principal point `(w / 2 - 1, h / 2 - 1)` of the left image size. The
/// relative rotation is split in two halves so both cameras turn by the same
/// amount, then the common frame is aligned with the baseline.
///
/// # Arguments
///
/// * `left` - The left camera, usually the pinhole equivalent of a lens model.
/// * `right` - The right camera.
///
/// # Returns
///
/// The rotations `(rect_left, rect_right)` to pass to a remapper for each camera.
pub fn stereo_rectify(left: &mut Pinhole, right: &mut Pinhole) -> (Matrix3x3, Matrix3x3) {
    let [flx, fly] = left.focal_length();
    let [frx, fry] = right.focal_length();
    let focal_length = [(flx + frx) / 2.0, (fly + fry) / 2.0];

    let size = left.image_size();
    let principal_point = [
        size.width as f64 / 2.0 - 1.0,
        size.height as f64 / 2.0 - 1.0,
    ];

    for camera in [&mut *left, &mut *right] {
        let skew = camera.skew();
        camera.set_intrinsic(CameraIntrinsic {
            fx: focal_length[0],
            fy: focal_length[1],
            cx: principal_point[0],
            cy: principal_point[1],
            skew,
        });
    }

    // pose of the right camera in the left camera frame
    let rotation = left.rotation_matrix() * right.inv_rotation_matrix();
    let translation = left.rotation_matrix() * right.inv_translation() + left.translation();

    let half = matrix_exp3(&(matrix_log3(&rotation) * 0.5));
    let rot_left = half.transpose();
    let rot_right = rot_left.transpose();

    let t = rot_left * translation;
    let e1 = t.normalize();
    let n1 = t.x.hypot(t.y);
    let e2 = Point3::new(-t.y / n1, t.x / n1, 0.0);
    let e3 = e1.cross(e2);
    let rect = from_rows(e1, e2, e3);

    log::debug!("stereo baseline in the rectified frame: {}", t.length());

    (rect * rot_left, rect * rot_right)
}

/// Triangulate world points from pairs of corresponding rays.
///
/// Each pair of rays, given in the frames of their cameras, is moved to the
/// world frame and the midpoint of the shortest segment between the two lines is
/// returned. Parallel or degenerate pairs yield a NaN point.
///
/// # Errors
///
/// Both ray lists must have the same length.
pub fn intersect_rays<L, R>(
    left: &L,
    right: &R,
    rays_left: &[Point3],
    rays_right: &[Point3],
) -> Result<Vec<Point3>, CameraError>
where
    L: CameraModel + ?Sized,
    R: CameraModel + ?Sized,
{
    if rays_left.len() != rays_right.len() {
        return Err(CameraError::invalid(format!(
            "the number of rays differ: {} != {}",
            rays_left.len(),
            rays_right.len()
        )));
    }

    let center_left = left.inv_translation();
    let center_right = right.inv_translation();

    let world_left = rotate_points(&left.inv_rotation_matrix(), rays_left);
    let world_right = rotate_points(&right.inv_rotation_matrix(), rays_right);

    let points = world_left
        .par_iter()
        .zip(world_right.par_iter())
        .map(|(ray_left, ray_right)| {
            match line_line_intersect(
                center_left,
                center_left + *ray_left,
                center_right,
                center_right + *ray_right,
            ) {
                Some((pa, pb)) => (pa + pb) * 0.5,
                None => Point3::splat(f64::NAN),
            }
        })
        .collect();

    Ok(points)
}
