use stereo_core::nalgebra::{Matrix2xX, Matrix3xX};

/// Marks every column whose depth (third row) is strictly positive and finite.
pub fn positive_depth_mask(points_3d: &Matrix3xX<f64>) -> Vec<bool> {
    points_3d
        .row(2)
        .iter()
        .map(|&depth| depth > 0.0 && depth.is_finite())
        .collect()
}

/// Keeps the columns selected by `mask` in both point sets.
///
/// The filter is stable: surviving columns keep their relative order, and the original index of
/// each one is returned alongside the points.
///
/// # Panics
///
/// Panics if the column counts of `points_2d`, `points_3d` and `mask` differ.
pub fn retain(
    points_2d: &Matrix2xX<f64>,
    points_3d: &Matrix3xX<f64>,
    mask: &[bool],
) -> (Matrix2xX<f64>, Matrix3xX<f64>, Vec<usize>) {
    assert_eq!(points_2d.ncols(), points_3d.ncols());
    assert_eq!(points_3d.ncols(), mask.len());
    let indices: Vec<usize> = mask
        .iter()
        .enumerate()
        .filter(|&(_, &keep)| keep)
        .map(|(ix, _)| ix)
        .collect();
    let points_2d = Matrix2xX::from_fn(indices.len(), |row, col| points_2d[(row, indices[col])]);
    let points_3d = Matrix3xX::from_fn(indices.len(), |row, col| points_3d[(row, indices[col])]);
    (points_2d, points_3d, indices)
}

/// Discards every point that is not in front of the camera.
///
/// ```
/// use stereo_core::nalgebra::{Matrix2xX, Matrix3xX};
/// use stereo_init::retain_positive_depth;
///
/// let points_2d = Matrix2xX::from_column_slice(&[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
/// let points_3d = Matrix3xX::from_column_slice(&[0.0, 0.0, 4.0, 0.0, 0.0, -1.0, 0.0, 0.0, 0.0]);
/// let (points_2d, points_3d, indices) = retain_positive_depth(&points_2d, &points_3d);
/// assert_eq!(indices, vec![0]);
/// assert_eq!(points_2d.ncols(), 1);
/// assert_eq!(points_3d[(2, 0)], 4.0);
/// ```
pub fn retain_positive_depth(
    points_2d: &Matrix2xX<f64>,
    points_3d: &Matrix3xX<f64>,
) -> (Matrix2xX<f64>, Matrix3xX<f64>, Vec<usize>) {
    retain(points_2d, points_3d, &positive_depth_mask(points_3d))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn non_finite_depths_are_invalid() {
        let points = Matrix3xX::from_column_slice(&[
            0.0,
            0.0,
            f64::INFINITY,
            0.0,
            0.0,
            f64::NAN,
            0.0,
            0.0,
            1e-300,
        ]);
        assert_eq!(positive_depth_mask(&points), vec![false, false, true]);
    }

    #[test]
    fn filter_is_stable() {
        let points_2d = Matrix2xX::from_fn(6, |row, col| (10 * col + row) as f64);
        let points_3d = Matrix3xX::from_fn(6, |row, col| {
            if row == 2 && col % 2 == 1 {
                -1.0
            } else {
                col as f64 + 1.0
            }
        });
        let (kept_2d, kept_3d, indices) = retain_positive_depth(&points_2d, &points_3d);
        assert_eq!(indices, vec![0, 2, 4]);
        for (col, &ix) in indices.iter().enumerate() {
            assert_eq!(kept_2d.column(col), points_2d.column(ix));
            assert_eq!(kept_3d.column(col), points_3d.column(ix));
        }
    }

    #[test]
    fn empty_sets_stay_empty() {
        let (kept_2d, kept_3d, indices) =
            retain_positive_depth(&Matrix2xX::zeros(0), &Matrix3xX::zeros(0));
        assert_eq!((kept_2d.ncols(), kept_3d.ncols(), indices.len()), (0, 0, 0));
    }
}
