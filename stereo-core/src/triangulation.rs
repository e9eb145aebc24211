use crate::{CameraModel, CameraPoint};
use nalgebra::{Matrix3, Matrix3x4, Vector3};

/// A calibrated stereo rig whose two cameras share one intrinsic matrix and differ only by a
/// translation of [`StereoCamera::baseline`] along the X axis of the left camera.
///
/// The left camera frame is the world frame. [`CameraModel`] is implemented for the shared intrinsics.
pub trait StereoCamera: CameraModel {
    /// The distance between the two optical centers.
    fn baseline(&self) -> f64;

    /// The shared intrinsic matrix `K`.
    fn intrinsics(&self) -> Matrix3<f64>;

    /// The position of the right optical center in the left camera frame.
    fn right_center(&self) -> Vector3<f64> {
        Vector3::new(self.baseline(), 0.0, 0.0)
    }

    /// The left camera pose `[I | 0]`.
    #[rustfmt::skip]
    fn left_pose(&self) -> Matrix3x4<f64> {
        Matrix3x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
        )
    }

    /// The right camera pose `[I | -baseline·e_x]`.
    #[rustfmt::skip]
    fn right_pose(&self) -> Matrix3x4<f64> {
        Matrix3x4::new(
            1.0, 0.0, 0.0, -self.baseline(),
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
        )
    }

    /// The left projection matrix `K·[I | 0]`.
    fn left_projection(&self) -> Matrix3x4<f64> {
        self.intrinsics() * self.left_pose()
    }

    /// The right projection matrix `K·[I | -baseline·e_x]`.
    fn right_projection(&self) -> Matrix3x4<f64> {
        self.intrinsics() * self.right_pose()
    }
}

/// This trait is for algorithms which triangulate a point in the left camera frame from one
/// homogeneous pixel `(x, y, 1)` in each image of a [`StereoCamera`].
///
/// The returned point is not filtered in any way. It may lie behind the cameras or at infinity
/// when the rays are (nearly) parallel. `None` is only returned when an iterative solver fails
/// to converge.
pub trait TriangulatorStereo {
    fn triangulate_stereo<S: StereoCamera>(
        &self,
        rig: &S,
        left: Vector3<f64>,
        right: Vector3<f64>,
    ) -> Option<CameraPoint>;
}
