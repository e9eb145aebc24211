use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::{Point3, Vector3, Vector4};
use num_traits::Float;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// This trait is implemented for homogeneous projective 3d coordinate.
pub trait Projective: From<Vector4<f64>> + Clone + Copy {
    /// Retrieve the homogeneous vector.
    ///
    /// No constraints are put on this vector. All components can move freely and it is not normalized.
    /// However, this vector may be normalized if desired and it will still be equivalent to the original.
    fn homogeneous(self) -> Vector4<f64>;

    /// Retrieve the euclidean 3d point by normalizing the homogeneous coordinate.
    ///
    /// This may fail, as a homogeneous coordinate can exist at infinity, whereas a 3d
    /// euclidean point cannot.
    fn point(self) -> Option<Point3<f64>> {
        Point3::from_homogeneous(self.homogeneous())
    }

    /// Convert the euclidean 3d point into homogeneous coordinates.
    fn from_point(point: Point3<f64>) -> Self {
        point.to_homogeneous().into()
    }

    /// Divides through by the homogeneous component without checking it.
    ///
    /// Points at (or numerically near) infinity produce very large, infinite or NaN components.
    fn euclidean(self) -> Vector3<f64> {
        let homogeneous = self.homogeneous();
        homogeneous.xyz() / homogeneous.w
    }

    /// The Z component of the euclidean point, which is the distance in front of the camera.
    fn depth(self) -> f64 {
        let homogeneous = self.homogeneous();
        homogeneous.z / homogeneous.w
    }

    /// Checks if the homogeneous component is negligible compared to the direction.
    ///
    /// This happens when the rays that produced the point were (nearly) parallel.
    fn is_near_infinity(self, epsilon: f64) -> bool {
        let homogeneous = self.homogeneous();
        Float::abs(homogeneous.w) <= epsilon * homogeneous.xyz().norm()
    }

    /// Retrieve the unnormalized bearing of the coordinate.
    fn bearing_unnormalized(self) -> Vector3<f64> {
        self.homogeneous().xyz()
    }
}

/// A 3d point which is relative to the left camera's optical center and orientation where
/// the positive X axis is right (towards the right camera), positive Y axis is down, and
/// positive Z axis is forwards. The unit of distance is the unit of the baseline.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraPoint(pub Vector4<f64>);

impl Projective for CameraPoint {
    fn homogeneous(self) -> Vector4<f64> {
        self.into()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn depth_ignores_homogeneous_scale() {
        let point = CameraPoint(Vector4::new(-1.0, 2.0, -6.0, -2.0));
        assert_eq!(point.depth(), 3.0);
        assert_eq!(point.euclidean(), Vector3::new(0.5, -1.0, 3.0));
        assert!(!point.is_near_infinity(1e-9));
    }

    #[test]
    fn zero_weight_is_at_infinity() {
        let point = CameraPoint(Vector4::new(0.0, 0.0, 1.0, 0.0));
        assert!(point.is_near_infinity(1e-9));
        assert!(point.point().is_none());
        assert!(!point.depth().is_finite());
    }
}
