use rayon::prelude::*;

use crate::{Matrix3x3, Point3};

/// Rotate a point.
#[inline]
pub fn rotate_point(rotation: &Matrix3x3, point: &Point3) -> Point3 {
    *rotation * *point
}

/// Apply a rigid transform `rotation * point + translation` to a point.
#[inline]
pub fn transform_point(rotation: &Matrix3x3, translation: &Point3, point: &Point3) -> Point3 {
    *rotation * *point + *translation
}

/// Rotate a set of points in parallel.
///
/// # Arguments
///
/// * `rotation` - A rotation matrix.
/// * `points` - The points to rotate.
///
/// # Returns
///
/// The rotated points, in the same order as the input.
pub fn rotate_points(rotation: &Matrix3x3, points: &[Point3]) -> Vec<Point3> {
    points
        .par_iter()
        .map(|p| rotate_point(rotation, p))
        .collect()
}

/// Transform a set of points in parallel.
///
/// # Arguments
///
/// * `rotation` - A rotation matrix.
/// * `translation` - A translation vector.
/// * `points` - The points to transform.
///
/// # Returns
///
/// The transformed points, in the same order as the input.
///
/// Example:
///
/// ```
/// use camremap_linalg::{transform_points, Matrix3x3, Point3};
///
/// let points = vec![Point3::new(2.0, 2.0, 2.0), Point3::new(3.0, 4.0, 5.0)];
/// let translation = Point3::new(1.0, 0.0, 0.0);
/// let moved = transform_points(&Matrix3x3::IDENTITY, &translation, &points);
/// assert_eq!(moved[1], Point3::new(4.0, 4.0, 5.0));
/// ```
pub fn transform_points(
    rotation: &Matrix3x3,
    translation: &Point3,
    points: &[Point3],
) -> Vec<Point3> {
    points
        .par_iter()
        .map(|p| transform_point(rotation, translation, p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_rows;

    fn quarter_turn_z() -> Matrix3x3 {
        from_rows(
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn rotate_single() {
        let p = rotate_point(&quarter_turn_z(), &Point3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Point3::new(-2.0, 1.0, 3.0));
    }

    #[test]
    fn transform_single() {
        let p = transform_point(
            &quarter_turn_z(),
            &Point3::new(1.0, 1.0, 1.0),
            &Point3::new(1.0, 2.0, 3.0),
        );
        assert_eq!(p, Point3::new(-1.0, 2.0, 4.0));
    }

    #[test]
    fn batch_matches_single() {
        let rotation = quarter_turn_z();
        let translation = Point3::new(0.5, -0.5, 2.0);
        let points = (0..100)
            .map(|i| Point3::new(i as f64, -(i as f64), 0.5 * i as f64))
            .collect::<Vec<_>>();

        let rotated = rotate_points(&rotation, &points);
        let transformed = transform_points(&rotation, &translation, &points);

        for (i, p) in points.iter().enumerate() {
            assert_eq!(rotated[i], rotate_point(&rotation, p));
            assert_eq!(transformed[i], transform_point(&rotation, &translation, p));
        }
    }

    #[test]
    fn empty_batch() {
        assert!(transform_points(&Matrix3x3::IDENTITY, &Point3::ZERO, &[]).is_empty());
    }
}
