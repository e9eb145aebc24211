use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::{Point2, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Allows the retrieval of the point on the image the feature came from.
pub trait ImagePoint {
    /// Retrieves the point on the image in `(x, y)` order.
    fn image_point(&self) -> Point2<f64>;

    /// Retrieves the image point with a `1.0` appended, ready for projective formulas.
    fn homogeneous(&self) -> Vector3<f64> {
        self.image_point().to_homogeneous()
    }
}

/// A point on an image frame in `(x, y)` pixel coordinates, where X points right
/// and Y points down. The keypoint is neither undistorted nor normalized.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct KeyPoint(pub Point2<f64>);

impl KeyPoint {
    /// Converts the keypoint into the `(row, column)` convention.
    ///
    /// ```
    /// use stereo_core::{KeyPoint, PixelIndex};
    /// use stereo_core::nalgebra::Point2;
    /// let kp = KeyPoint(Point2::new(320.0, 240.0));
    /// assert_eq!(kp.to_pixel_index(), PixelIndex::new(240.0, 320.0));
    /// ```
    pub fn to_pixel_index(self) -> PixelIndex {
        PixelIndex {
            row: self.0.y,
            col: self.0.x,
        }
    }
}

impl ImagePoint for KeyPoint {
    fn image_point(&self) -> Point2<f64> {
        self.0
    }
}

/// A pixel location in `(row, column)` order.
///
/// This is the convention used by correspondence searches that index images as matrices.
/// The row grows downwards and the column grows to the right, so the row is the Y coordinate
/// and the column is the X coordinate of the equivalent [`KeyPoint`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PixelIndex {
    pub row: f64,
    pub col: f64,
}

impl PixelIndex {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    /// Swaps the pair into the `(x, y)` convention.
    pub fn to_keypoint(self) -> KeyPoint {
        KeyPoint(Point2::new(self.col, self.row))
    }
}

impl ImagePoint for PixelIndex {
    fn image_point(&self) -> Point2<f64> {
        Point2::new(self.col, self.row)
    }
}

impl From<(f64, f64)> for PixelIndex {
    fn from((row, col): (f64, f64)) -> Self {
        Self { row, col }
    }
}
