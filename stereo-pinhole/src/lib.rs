//! This crate plugs into `stereo-core` and provides the pinhole model of a calibrated stereo rig.
//! It converts homogeneous pixels into rays out of the left or right camera (through `K⁻¹`) and
//! projects points in the left camera frame back into both images. The rig is the input every
//! triangulator in `stereo-geom` works on.

#![no_std]

use stereo_core::nalgebra::{Matrix3, Point2, Vector2, Vector3};
use stereo_core::{
    CameraModel, CameraPoint, FeatureMatch, ImagePoint, KeyPoint, StereoCamera, TriangulatorStereo,
};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// This contains intrinsic camera parameters as per
/// [this Wikipedia page](https://en.wikipedia.org/wiki/Camera_resectioning#Intrinsic_parameters).
///
/// It is a convenient way to build the intrinsic matrix consumed by [`PinholeStereo`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraIntrinsics {
    pub focals: Vector2<f64>,
    pub principal_point: Point2<f64>,
    pub skew: f64,
}

impl CameraIntrinsics {
    /// Creates camera intrinsics that would create an identity intrinsic matrix.
    /// This would imply that the pixel positions have an origin at `0,0`,
    /// the pixel distance unit is the focal length, pixels are square,
    /// and there is no skew.
    pub fn identity() -> Self {
        Self {
            focals: Vector2::new(1.0, 1.0),
            skew: 0.0,
            principal_point: Point2::new(0.0, 0.0),
        }
    }

    #[must_use]
    pub fn focal(self, focal: f64) -> Self {
        Self {
            focals: Vector2::new(focal, focal),
            ..self
        }
    }

    #[must_use]
    pub fn principal_point(self, principal_point: Point2<f64>) -> Self {
        Self {
            principal_point,
            ..self
        }
    }

    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.focals.x,  self.skew,      self.principal_point.x,
            0.0,            self.focals.y,  self.principal_point.y,
            0.0,            0.0,            1.0,
        )
    }
}

/// Two pinhole cameras sharing the intrinsic matrix `K`, with the right camera translated by
/// `baseline` along the X axis of the left camera and no rotation between them.
///
/// ```
/// use stereo_core::{CameraModel, KeyPoint, StereoCamera, ImagePoint};
/// use stereo_core::nalgebra::Point2;
/// use stereo_pinhole::{CameraIntrinsics, PinholeStereo};
///
/// let intrinsics = CameraIntrinsics::identity()
///     .focal(700.0)
///     .principal_point(Point2::new(320.0, 240.0));
/// let rig = PinholeStereo::new(intrinsics.matrix(), 0.5).unwrap();
/// let kp = KeyPoint(Point2::new(471.0, 322.0));
/// let ray = rig.calibrate(kp.homogeneous());
/// let back = rig.uncalibrate(ray).unwrap();
/// assert!((kp.0 - back.0).norm() < 1e-9);
/// assert_eq!(rig.baseline(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PinholeStereo {
    intrinsics: Matrix3<f64>,
    inverse_intrinsics: Matrix3<f64>,
    baseline: f64,
}

impl PinholeStereo {
    /// Creates the rig, returning `None` if the intrinsic matrix is not invertible.
    ///
    /// A zero baseline is accepted, but it makes triangulation degenerate.
    pub fn new(intrinsics: Matrix3<f64>, baseline: f64) -> Option<Self> {
        let inverse_intrinsics = intrinsics.try_inverse()?;
        Some(Self {
            intrinsics,
            inverse_intrinsics,
            baseline,
        })
    }

    /// Projects a point in the left camera frame into the left image.
    pub fn project_left(&self, point: CameraPoint) -> Option<KeyPoint> {
        self.project(point)
    }

    /// Projects a point in the left camera frame into the right image.
    pub fn project_right(&self, point: CameraPoint) -> Option<KeyPoint> {
        self.uncalibrate(self.right_pose() * point.0)
    }

    /// Projects a point in the left camera frame into both images.
    ///
    /// ```
    /// use stereo_core::{CameraPoint, Projective, FeatureMatch};
    /// use stereo_core::nalgebra::{Point2, Point3};
    /// use stereo_pinhole::{CameraIntrinsics, PinholeStereo};
    ///
    /// let intrinsics = CameraIntrinsics::identity()
    ///     .focal(700.0)
    ///     .principal_point(Point2::new(320.0, 240.0));
    /// let rig = PinholeStereo::new(intrinsics.matrix(), 0.5).unwrap();
    /// let point = CameraPoint::from_point(Point3::new(0.0, 0.0, 10.9375));
    /// let FeatureMatch(left, right) = rig.project_match(point).unwrap();
    /// assert!((left.0 - Point2::new(320.0, 240.0)).norm() < 1e-9);
    /// assert!((right.0 - Point2::new(288.0, 240.0)).norm() < 1e-9);
    /// ```
    pub fn project_match(&self, point: CameraPoint) -> Option<FeatureMatch<KeyPoint>> {
        Some(FeatureMatch(
            self.project_left(point)?,
            self.project_right(point)?,
        ))
    }
}

impl CameraModel for PinholeStereo {
    fn calibrate(&self, pixel: Vector3<f64>) -> Vector3<f64> {
        self.inverse_intrinsics * pixel
    }

    fn uncalibrate(&self, ray: Vector3<f64>) -> Option<KeyPoint> {
        Point2::from_homogeneous(self.intrinsics * ray).map(KeyPoint)
    }
}

impl StereoCamera for PinholeStereo {
    fn baseline(&self) -> f64 {
        self.baseline
    }

    fn intrinsics(&self) -> Matrix3<f64> {
        self.intrinsics
    }
}

/// Find the reprojection error in pixels of a stereo match using the given triangulator.
///
/// The point is triangulated in the left camera frame and projected back into both images.
/// The returned errors are `[left, right]`.
///
/// ```
/// use stereo_core::{CameraPoint, Projective};
/// use stereo_core::nalgebra::{Point2, Point3};
/// use stereo_pinhole::{CameraIntrinsics, PinholeStereo};
///
/// let intrinsics = CameraIntrinsics::identity()
///     .focal(500.0)
///     .principal_point(Point2::new(320.0, 240.0));
/// let rig = PinholeStereo::new(intrinsics.matrix(), 0.2).unwrap();
/// let point = CameraPoint::from_point(Point3::new(0.4, -0.25, 5.0));
/// let m = rig.project_match(point).unwrap();
///
/// let triangulator = stereo_geom::DltTriangulator::new();
///
/// // Since the keypoints were computed exactly, there should be no reprojection error.
/// let errors = stereo_pinhole::stereo_reprojection_error(&rig, m, triangulator).unwrap();
/// let average_error = errors.iter().map(|v| v.norm()).sum::<f64>() * 0.5;
/// assert!(average_error < 1e-6);
/// ```
pub fn stereo_reprojection_error(
    rig: &PinholeStereo,
    m: FeatureMatch<KeyPoint>,
    triangulator: impl TriangulatorStereo,
) -> Option<[Vector2<f64>; 2]> {
    let FeatureMatch(left, right) = m;
    triangulator
        .triangulate_stereo(rig, left.homogeneous(), right.homogeneous())
        .and_then(|point| {
            let FeatureMatch(reproject_left, reproject_right) = rig.project_match(point)?;
            Some([left.0 - reproject_left.0, right.0 - reproject_right.0])
        })
}

/// See [`stereo_reprojection_error`].
///
/// This is a convenience function that simply finds the average reprojection error rather than all components.
pub fn average_stereo_reprojection_error(
    rig: &PinholeStereo,
    m: FeatureMatch<KeyPoint>,
    triangulator: impl TriangulatorStereo,
) -> Option<f64> {
    stereo_reprojection_error(rig, m, triangulator)
        .map(|errors| errors.iter().map(|v| v.norm()).sum::<f64>() * 0.5)
}

#[cfg(test)]
mod test {
    use super::*;
    use stereo_core::{nalgebra::Point3, Projective};
    use stereo_geom::{DisparityRayTriangulator, DltTriangulator};

    fn rig() -> PinholeStereo {
        let intrinsics = CameraIntrinsics::identity()
            .focal(700.0)
            .principal_point(Point2::new(320.0, 240.0));
        PinholeStereo::new(intrinsics.matrix(), 0.5).unwrap()
    }

    #[test]
    fn exact_match_has_no_average_error() {
        let rig = rig();
        let point = CameraPoint::from_point(Point3::new(-0.6, 0.2, 7.0));
        let m = rig.project_match(point).unwrap();
        let error = average_stereo_reprojection_error(&rig, m, DltTriangulator::new()).unwrap();
        assert!(error < 1e-6, "error: {}", error);
    }

    #[test]
    fn vertical_offset_has_average_error_of_at_least_half_a_pixel() {
        let rig = rig();
        let point = CameraPoint::from_point(Point3::new(0.3, -0.4, 5.0));
        let FeatureMatch(left, mut right) = rig.project_match(point).unwrap();
        right.0.y += 1.0;
        // Both cameras reproject any point onto the same row, so the two row residuals
        // always add up to the one pixel offset.
        for error in [
            average_stereo_reprojection_error(
                &rig,
                FeatureMatch(left, right),
                DltTriangulator::new(),
            ),
            average_stereo_reprojection_error(
                &rig,
                FeatureMatch(left, right),
                DisparityRayTriangulator,
            ),
        ] {
            let error = error.unwrap();
            assert!(error >= 0.5 - 1e-9, "error: {}", error);
            assert!(error < 2.0, "error: {}", error);
        }
    }

    #[test]
    fn singular_intrinsics_have_no_rig() {
        assert!(PinholeStereo::new(Matrix3::zeros(), 0.5).is_none());
    }
}
