use stereo_core::{
    nalgebra::{Matrix2xX, Matrix3xX},
    ImagePoint, PixelIndex,
};

/// Converts `(row, col)` keypoints into the two layouts used downstream.
///
/// Returns the keypoints unchanged as a `2×N` matrix of `(row, col)` columns, and the same keypoints
/// as a `3×N` matrix of homogeneous `(col, row, 1)` columns for the triangulation engine.
///
/// ```
/// use stereo_core::{nalgebra::{Vector2, Vector3}, PixelIndex};
/// use stereo_init::adapt_keypoints;
///
/// let (pixels, homogeneous) = adapt_keypoints(&[PixelIndex::new(240.0, 320.0)]);
/// assert_eq!(pixels.column(0), Vector2::new(240.0, 320.0));
/// assert_eq!(homogeneous.column(0), Vector3::new(320.0, 240.0, 1.0));
///
/// let (pixels, homogeneous) = adapt_keypoints(&[]);
/// assert_eq!((pixels.ncols(), homogeneous.ncols()), (0, 0));
/// ```
pub fn adapt_keypoints(keypoints: &[PixelIndex]) -> (Matrix2xX<f64>, Matrix3xX<f64>) {
    let pixels = Matrix2xX::from_fn(keypoints.len(), |row, col| {
        let keypoint = keypoints[col];
        if row == 0 {
            keypoint.row
        } else {
            keypoint.col
        }
    });
    let homogeneous = Matrix3xX::from_fn(keypoints.len(), |row, col| {
        keypoints[col].homogeneous()[row]
    });
    (pixels, homogeneous)
}
