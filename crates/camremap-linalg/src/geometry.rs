use crate::Point3;

fn is_degenerate(v: &Point3) -> bool {
    v.abs().max_element() < f64::EPSILON
}

/// Compute the shortest segment between two 3d lines.
///
/// The first line passes through `p1` and `p2`, the second through `p3` and `p4`.
/// The returned points satisfy `pa = p1 + mua * (p2 - p1)` and
/// `pb = p3 + mub * (p4 - p3)`, where `pa - pb` is perpendicular to both lines.
///
/// # Returns
///
/// `Some((pa, pb))`, or `None` when a line is degenerate or the lines are parallel.
///
/// # Example
///
/// ```
/// use camremap_linalg::{line_line_intersect, Point3};
///
/// let (pa, pb) = line_line_intersect(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 1.0),
///     Point3::new(0.0, 2.0, 1.0),
/// )
/// .unwrap();
///
/// assert_eq!(pa, Point3::new(0.0, 0.0, 0.0));
/// assert_eq!(pb, Point3::new(0.0, 0.0, 1.0));
/// ```
pub fn line_line_intersect(
    p1: Point3,
    p2: Point3,
    p3: Point3,
    p4: Point3,
) -> Option<(Point3, Point3)> {
    let p13 = p1 - p3;
    let p43 = p4 - p3;
    if is_degenerate(&p43) {
        return None;
    }

    let p21 = p2 - p1;
    if is_degenerate(&p21) {
        return None;
    }

    let d1343 = p13.dot(p43);
    let d4321 = p43.dot(p21);
    let d1321 = p13.dot(p21);
    let d4343 = p43.dot(p43);
    let d2121 = p21.dot(p21);

    let denom = d2121 * d4343 - d4321 * d4321;
    if denom.abs() < f64::EPSILON {
        return None;
    }

    let numer = d1343 * d4321 - d1321 * d4343;
    let mua = numer / denom;
    let mub = (d1343 + d4321 * mua) / d4343;

    Some((p1 + mua * p21, p3 + mub * p43))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn intersecting_lines() {
        let (pa, pb) = line_line_intersect(
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(-1.0, 1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(pa.distance(Point3::ZERO), 0.0, epsilon = 1e-12);
        assert_relative_eq!(pb.distance(Point3::ZERO), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn skew_lines_segment_is_perpendicular() {
        let p1 = Point3::new(0.0, 0.0, 0.0);
        let p2 = Point3::new(1.0, 0.2, 0.1);
        let p3 = Point3::new(0.0, 1.0, 2.0);
        let p4 = Point3::new(-0.3, 2.0, 2.5);

        let (pa, pb) = line_line_intersect(p1, p2, p3, p4).unwrap();
        let segment = pb - pa;
        assert_relative_eq!(segment.dot(p2 - p1), 0.0, epsilon = 1e-12);
        assert_relative_eq!(segment.dot(p4 - p3), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn parallel_lines() {
        let res = line_line_intersect(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        );
        assert!(res.is_none());
    }

    #[test]
    fn degenerate_line() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!(line_line_intersect(p, p, Point3::ZERO, Point3::X).is_none());
        assert!(line_line_intersect(Point3::ZERO, Point3::X, p, p).is_none());
    }
}
