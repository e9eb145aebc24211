use crate::{CameraPoint, KeyPoint, Projective};
use nalgebra::Vector3;

/// Allows conversion between homogeneous pixels and rays out of the camera.
pub trait CameraModel {
    /// Back-projects a homogeneous pixel `(x, y, w)` into an unnormalized ray.
    ///
    /// The ray X axis points right, Y axis points down, and Z axis points forwards.
    /// The pixel uses the same frame. Its Y is down and its X is right.
    fn calibrate(&self, pixel: Vector3<f64>) -> Vector3<f64>;

    /// Projects a ray (or any point along it) back into pixel coordinates.
    ///
    /// Rays parallel to the image plane have no pixel, so this operation is fallible.
    fn uncalibrate(&self, ray: Vector3<f64>) -> Option<KeyPoint>;

    /// Projects a point expressed in this camera's frame into the image.
    fn project(&self, point: CameraPoint) -> Option<KeyPoint> {
        self.uncalibrate(point.bearing_unnormalized())
    }
}
