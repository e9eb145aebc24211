use float_ord::FloatOrd;
use stereo_core::{
    nalgebra::{zero, Matrix3x2, Matrix4, Vector3},
    CameraPoint, StereoCamera, TriangulatorStereo,
};

/// Based on algorithm 12.1 from "Multiple View Geometry in Computer Vision, Second Edition".
///
/// Each homogeneous pixel `x` and its projection matrix `P` contribute the two rows of `x × (P·X) = 0`
/// that are linear in the unknown homogeneous point `X`. The four rows form a 4x4 design matrix whose
/// right-singular vector with the smallest singular value is the point.
///
/// This is the reference triangulator. It is deterministic and robust to moderate noise.
///
/// ```
/// use stereo_core::nalgebra::{Point2, Point3};
/// use stereo_core::{CameraPoint, ImagePoint, Projective, TriangulatorStereo, FeatureMatch};
/// use stereo_pinhole::{CameraIntrinsics, PinholeStereo};
/// use stereo_geom::DltTriangulator;
///
/// let intrinsics = CameraIntrinsics::identity().focal(700.0).principal_point(Point2::new(320.0, 240.0));
/// let rig = PinholeStereo::new(intrinsics.matrix(), 0.5).unwrap();
/// let point = CameraPoint::from_point(Point3::new(0.3, 0.1, 2.0));
/// let FeatureMatch(left, right) = rig.project_match(point).unwrap();
/// let triangulated = DltTriangulator::new()
///     .triangulate_stereo(&rig, left.homogeneous(), right.homogeneous())
///     .unwrap();
/// let distance = (point.point().unwrap() - triangulated.point().unwrap()).norm();
/// assert!(distance < 1e-6);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct DltTriangulator {
    epsilon: f64,
    max_iterations: usize,
}

impl DltTriangulator {
    /// Creates a `DltTriangulator` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the epsilon used in the SVD solver.
    ///
    /// Default is `1e-12`.
    #[must_use]
    pub fn epsilon(self, epsilon: f64) -> Self {
        Self { epsilon, ..self }
    }

    /// Set the maximum number of iterations for the SVD solver.
    ///
    /// Default is `1000`.
    #[must_use]
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}

impl Default for DltTriangulator {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            max_iterations: 1000,
        }
    }
}

impl TriangulatorStereo for DltTriangulator {
    fn triangulate_stereo<S: StereoCamera>(
        &self,
        rig: &S,
        left: Vector3<f64>,
        right: Vector3<f64>,
    ) -> Option<CameraPoint> {
        let left_projection = rig.left_projection();
        let right_projection = rig.right_projection();
        let mut design = Matrix4::zeros();
        design
            .row_mut(0)
            .copy_from(&(left.x * left_projection.row(2) - left.z * left_projection.row(0)));
        design
            .row_mut(1)
            .copy_from(&(left.y * left_projection.row(2) - left.z * left_projection.row(1)));
        design
            .row_mut(2)
            .copy_from(&(right.x * right_projection.row(2) - right.z * right_projection.row(0)));
        design
            .row_mut(3)
            .copy_from(&(right.y * right_projection.row(2) - right.z * right_projection.row(1)));

        let svd = design.try_svd(false, true, self.epsilon, self.max_iterations)?;

        // The row of V* paired with the smallest singular value spans the (near) null space.
        let smallest = svd.singular_values.imin();
        Some(CameraPoint(svd.v_t?.row(smallest).transpose()))
    }
}

/// Minimizes the squared reprojection residual of both observations in normalized camera space.
///
/// Referred to as the Linear-Eigen method by Hartley and Sturm in the paper
/// ["Triangulation"](https://users.cecs.anu.edu.au/~hartley/Papers/triangulation/triangulation.pdf).
///
/// For each camera pose `P` and unit bearing `u = normalize(K⁻¹·x)`, the residual `(P - u·uᵀ·P)·X`
/// is the component of the reprojected point orthogonal to the observed bearing. Summing
/// `(P - u·uᵀ·P)ᵀ(P - u·uᵀ·P)` over both cameras gives a symmetric 4x4 matrix whose eigenvector with
/// the smallest eigenvalue minimizes the total squared residual.
///
/// Unlike [`DltTriangulator`], residuals are weighed by bearing angle instead of pixel-scaled algebraic
/// error, so the two produce different points on noisy data.
///
/// ```
/// use stereo_core::nalgebra::{Point2, Point3};
/// use stereo_core::{CameraPoint, ImagePoint, Projective, TriangulatorStereo, FeatureMatch};
/// use stereo_pinhole::{CameraIntrinsics, PinholeStereo};
/// use stereo_geom::LeastSquaresTriangulator;
///
/// let intrinsics = CameraIntrinsics::identity().focal(700.0).principal_point(Point2::new(320.0, 240.0));
/// let rig = PinholeStereo::new(intrinsics.matrix(), 0.5).unwrap();
/// let point = CameraPoint::from_point(Point3::new(0.3, 0.1, 2.0));
/// let FeatureMatch(left, right) = rig.project_match(point).unwrap();
/// let triangulated = LeastSquaresTriangulator::new()
///     .triangulate_stereo(&rig, left.homogeneous(), right.homogeneous())
///     .unwrap();
/// let distance = (point.point().unwrap() - triangulated.point().unwrap()).norm();
/// assert!(distance < 1e-6);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct LeastSquaresTriangulator {
    epsilon: f64,
    max_iterations: usize,
}

impl LeastSquaresTriangulator {
    /// Creates a `LeastSquaresTriangulator` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the epsilon used in the symmetric eigen solver.
    ///
    /// Default is `1e-12`.
    #[must_use]
    pub fn epsilon(self, epsilon: f64) -> Self {
        Self { epsilon, ..self }
    }

    /// Set the maximum number of iterations for the symmetric eigen solver.
    ///
    /// Default is `1000`.
    #[must_use]
    pub fn max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }
}

impl Default for LeastSquaresTriangulator {
    fn default() -> Self {
        Self {
            epsilon: 1e-12,
            max_iterations: 1000,
        }
    }
}

impl TriangulatorStereo for LeastSquaresTriangulator {
    fn triangulate_stereo<S: StereoCamera>(
        &self,
        rig: &S,
        left: Vector3<f64>,
        right: Vector3<f64>,
    ) -> Option<CameraPoint> {
        let mut a: Matrix4<f64> = zero();
        for (pose, pixel) in [(rig.left_pose(), left), (rig.right_pose(), right)] {
            let bearing = rig.calibrate(pixel).normalize();
            // Set up the least squares problem.
            let term = pose - bearing * bearing.transpose() * pose;
            a += term.transpose() * term;
        }

        let se = a.try_symmetric_eigen(self.epsilon, self.max_iterations)?;

        // Find the smallest eigenvalue where our point will lie in the null space homogeneous vector.
        se.eigenvalues
            .iter()
            .enumerate()
            .min_by_key(|&(_, &n)| FloatOrd(n))
            .map(|(ix, _)| CameraPoint(se.eigenvectors.column(ix).into_owned()))
    }
}

/// Intersects the back-projected rays of a rig with no rotation between its cameras.
///
/// The left ray `l = K⁻¹·x_l` and the right ray `r = K⁻¹·x_r` meet where `λ_l·l - λ_r·r = t`, with `t`
/// the position of the right optical center. These are three equations in two unknowns, solved in the
/// least squares sense through the normal equations `(AᵀA)·λ = Aᵀt` with `A = [l, -r]`. The output is
/// `λ_l·l`.
///
/// The normal equations are solved with Cramer's rule and the determinant becomes the homogeneous
/// component of the output. Parallel rays therefore produce a point at infinity (the zero vector when
/// the rays coincide exactly) instead of dividing by zero, and a zero baseline produces the optical
/// center.
///
/// This is cheaper than the projective triangulators, but it is only valid for a translation-only rig.
///
/// ```
/// use stereo_core::nalgebra::{Point2, Vector3};
/// use stereo_core::{Projective, TriangulatorStereo};
/// use stereo_pinhole::{CameraIntrinsics, PinholeStereo};
/// use stereo_geom::DisparityRayTriangulator;
///
/// let intrinsics = CameraIntrinsics::identity().focal(700.0).principal_point(Point2::new(320.0, 240.0));
/// let rig = PinholeStereo::new(intrinsics.matrix(), 0.5).unwrap();
/// // A disparity of 32 pixels at the principal point.
/// let triangulated = DisparityRayTriangulator
///     .triangulate_stereo(&rig, Vector3::new(320.0, 240.0, 1.0), Vector3::new(288.0, 240.0, 1.0))
///     .unwrap();
/// assert!((triangulated.depth() - 700.0 * 0.5 / 32.0).abs() < 1e-9);
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DisparityRayTriangulator;

impl TriangulatorStereo for DisparityRayTriangulator {
    fn triangulate_stereo<S: StereoCamera>(
        &self,
        rig: &S,
        left: Vector3<f64>,
        right: Vector3<f64>,
    ) -> Option<CameraPoint> {
        let left_ray = rig.calibrate(left);
        let right_ray = rig.calibrate(right);
        let design = Matrix3x2::from_columns(&[left_ray, -right_ray]);
        let normal = design.tr_mul(&design);
        let rhs = design.tr_mul(&rig.right_center());

        // Cramer's rule for the scale of the left ray, multiplied through by the determinant.
        let determinant = normal.determinant();
        let scaled_left = rhs.x * normal.m22 - normal.m12 * rhs.y;
        Some(CameraPoint((left_ray * scaled_left).push(determinant)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use stereo_core::{
        nalgebra::{Point2, Point3},
        FeatureMatch, ImagePoint, Projective,
    };
    use stereo_pinhole::{CameraIntrinsics, PinholeStereo};

    fn rig(baseline: f64) -> PinholeStereo {
        let intrinsics = CameraIntrinsics::identity()
            .focal(700.0)
            .principal_point(Point2::new(320.0, 240.0));
        PinholeStereo::new(intrinsics.matrix(), baseline).unwrap()
    }

    fn random_point() -> CameraPoint {
        let mut point = Point3::from(Vector3::new_random() * 2.0);
        point.x -= 1.0;
        point.y -= 1.0;
        point.z += 2.0;
        CameraPoint::from_point(point)
    }

    fn observe(rig: &PinholeStereo, point: CameraPoint) -> (Vector3<f64>, Vector3<f64>) {
        let FeatureMatch(left, right) = rig.project_match(point).unwrap();
        (left.homogeneous(), right.homogeneous())
    }

    fn assert_recovers(triangulator: impl TriangulatorStereo) {
        let rig = rig(0.3);
        for _ in 0..100 {
            let real_point = random_point();
            let (left, right) = observe(&rig, real_point);
            let triangulated = triangulator
                .triangulate_stereo(&rig, left, right)
                .unwrap()
                .euclidean();
            let distance = (real_point.euclidean() - triangulated).norm();
            assert!(
                distance < 1e-6,
                "real: {}\ntriangulated: {}",
                real_point.euclidean(),
                triangulated
            );
        }
    }

    #[test]
    fn dlt_recovers_noiseless_points() {
        assert_recovers(DltTriangulator::new());
    }

    #[test]
    fn least_squares_recovers_noiseless_points() {
        assert_recovers(LeastSquaresTriangulator::new());
    }

    #[test]
    fn disparity_ray_recovers_noiseless_points() {
        assert_recovers(DisparityRayTriangulator);
    }

    #[test]
    fn disparity_of_32_pixels() {
        let rig = rig(0.5);
        let left = Vector3::new(320.0, 240.0, 1.0);
        let right = Vector3::new(288.0, 240.0, 1.0);
        let expected = 700.0 * 0.5 / 32.0;
        let depths = [
            DltTriangulator::new().triangulate_stereo(&rig, left, right),
            LeastSquaresTriangulator::new().triangulate_stereo(&rig, left, right),
            DisparityRayTriangulator.triangulate_stereo(&rig, left, right),
        ]
        .map(|point| point.unwrap().depth());
        for depth in depths {
            assert!((depth - expected).abs() < 1e-6, "depth: {}", depth);
        }
    }

    #[test]
    fn projective_variants_diverge_on_noise() {
        let rig = rig(0.3);
        let real_point = CameraPoint::from_point(Point3::new(0.4, -0.3, 6.0));
        let (left, right) = observe(&rig, real_point);
        let left = left + Vector3::new(0.7, -0.4, 0.0);
        let right = right + Vector3::new(-0.5, 0.6, 0.0);

        let dlt = DltTriangulator::new()
            .triangulate_stereo(&rig, left, right)
            .unwrap()
            .euclidean();
        let least_squares = LeastSquaresTriangulator::new()
            .triangulate_stereo(&rig, left, right)
            .unwrap()
            .euclidean();

        assert!((dlt - least_squares).norm() > 0.0);
        for point in [dlt, least_squares] {
            let relative = (point - real_point.euclidean()).norm() / real_point.euclidean().norm();
            assert!(relative < 0.2, "point: {}", point);
        }
    }

    #[test]
    fn parallel_rays_are_at_infinity() {
        let rig = rig(0.3);
        let pixel = Vector3::new(400.0, 100.0, 1.0);
        let points = [
            DltTriangulator::new().triangulate_stereo(&rig, pixel, pixel),
            LeastSquaresTriangulator::new().triangulate_stereo(&rig, pixel, pixel),
            DisparityRayTriangulator.triangulate_stereo(&rig, pixel, pixel),
        ];
        for point in points {
            assert!(point.unwrap().is_near_infinity(1e-9), "{:?}", point);
        }
    }

    #[test]
    fn zero_baseline_is_defined() {
        let rig = rig(0.0);
        let left = Vector3::new(320.0, 240.0, 1.0);
        let right = Vector3::new(288.0, 240.0, 1.0);
        let point = DisparityRayTriangulator
            .triangulate_stereo(&rig, left, right)
            .unwrap();
        assert_eq!(point.euclidean(), Vector3::zeros());
        // The projective variants must not panic, whatever they return.
        let _ = DltTriangulator::new().triangulate_stereo(&rig, left, right);
        let _ = LeastSquaresTriangulator::new().triangulate_stereo(&rig, left, right);
    }

    #[test]
    fn points_behind_the_camera_are_not_filtered() {
        let rig = rig(0.3);
        let real_point = CameraPoint::from_point(Point3::new(0.2, 0.1, -4.0));
        let (left, right) = observe(&rig, real_point);
        let point = DltTriangulator::new()
            .triangulate_stereo(&rig, left, right)
            .unwrap();
        assert!((point.depth() + 4.0).abs() < 1e-6);
        let point = DisparityRayTriangulator
            .triangulate_stereo(&rig, left, right)
            .unwrap();
        assert!((point.depth() + 4.0).abs() < 1e-6);
    }
}
