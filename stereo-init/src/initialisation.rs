use crate::{
    adapt_keypoints, retain, triangulate, ConfigurationError, CorrespondenceProvider, Observer,
    Result, Stage, StereoSettings,
};
use log::*;
use nalgebra::{DMatrix, Matrix2xX, Matrix3, Matrix3xX, Point3};
use std::time::Instant;
use stereo_core::PixelIndex;
use stereo_pinhole::PinholeStereo;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The surviving points of a stereo initialisation.
///
/// Column `i` of `points_2d` and `points_3d` belong to the correspondence `indices[i]` of the input.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct StereoInitialisation {
    /// Left image keypoints in `(row, col)` order
    pub points_2d: Matrix2xX<f64>,
    /// Points in the left camera frame
    pub points_3d: Matrix3xX<f64>,
    /// Original correspondence index of every surviving column, strictly increasing
    pub indices: Vec<usize>,
    /// Original indices of correspondences whose rays were nearly parallel, kept or not
    pub degenerate: Vec<usize>,
}

impl StereoInitialisation {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates over the surviving keypoints and their 3d points.
    pub fn iter(&self) -> impl Iterator<Item = (PixelIndex, Point3<f64>)> + '_ {
        self.points_2d
            .column_iter()
            .zip(self.points_3d.column_iter())
            .map(|(keypoint, point)| {
                (
                    PixelIndex::new(keypoint.x, keypoint.y),
                    Point3::from(point.into_owned()),
                )
            })
    }
}

/// Recovers 3d points from keypoint matches of a calibrated, horizontally displaced stereo pair.
///
/// ```
/// use stereo_core::PixelIndex;
/// use stereo_init::{Algorithm, StereoInitialiser, StereoSettings};
/// use nalgebra::Matrix3;
///
/// let intrinsics = Matrix3::new(700.0, 0.0, 320.0, 0.0, 700.0, 240.0, 0.0, 0.0, 1.0);
/// let initialiser =
///     StereoInitialiser::new(intrinsics, 0.5, StereoSettings::new(Algorithm::Dlt)).unwrap();
/// let result = initialiser
///     .initialise_matches(&[PixelIndex::new(240.0, 320.0)], &[PixelIndex::new(240.0, 288.0)])
///     .unwrap();
/// assert_eq!(result.len(), 1);
/// assert!((result.points_3d[(2, 0)] - 10.9375).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct StereoInitialiser<O = ()> {
    rig: PinholeStereo,
    settings: StereoSettings,
    observer: O,
}

impl StereoInitialiser {
    /// Fails with [`ConfigurationError::SingularIntrinsics`] if `intrinsics` has no inverse.
    pub fn new(intrinsics: Matrix3<f64>, baseline: f64, settings: StereoSettings) -> Result<Self> {
        let rig = PinholeStereo::new(intrinsics, baseline)
            .ok_or(ConfigurationError::SingularIntrinsics)?;
        Ok(Self {
            rig,
            settings,
            observer: (),
        })
    }
}

impl<O: Observer> StereoInitialiser<O> {
    /// Replaces the observer notified of stage timings and degenerate points.
    pub fn observer<N: Observer>(self, observer: N) -> StereoInitialiser<N> {
        StereoInitialiser {
            rig: self.rig,
            settings: self.settings,
            observer,
        }
    }

    /// Asks `provider` for the matches between `left` and `right`, then triangulates them.
    pub fn initialise<P: CorrespondenceProvider + ?Sized>(
        &self,
        provider: &P,
        left: &P::Image,
        right: &P::Image,
    ) -> Result<StereoInitialisation> {
        let start = Instant::now();
        let (left_keypoints, right_keypoints) = provider.correspondences(left, right);
        self.stage_finished(Stage::Correspondence, start);
        self.initialise_matches(&left_keypoints, &right_keypoints)
    }

    /// Triangulates index-aligned `(row, col)` keypoints and discards the invalid points.
    pub fn initialise_matches(
        &self,
        left: &[PixelIndex],
        right: &[PixelIndex],
    ) -> Result<StereoInitialisation> {
        if left.len() != right.len() {
            return Err(ConfigurationError::MismatchedCorrespondences {
                left: left.len(),
                right: right.len(),
            });
        }
        trace!(
            "initialising {} correspondences with {}",
            left.len(),
            self.settings.algorithm
        );

        let start = Instant::now();
        let (points_2d, left_homogeneous) = adapt_keypoints(left);
        let (_, right_homogeneous) = adapt_keypoints(right);
        self.stage_finished(Stage::Adapt, start);

        let start = Instant::now();
        let triangulation = triangulate(
            &left_homogeneous,
            &right_homogeneous,
            &self.rig,
            &self.settings,
            &self.observer,
        )?;
        self.stage_finished(Stage::Triangulate, start);

        let start = Instant::now();
        // Valid points are always solved, so the depth filter subsumes the solved mask.
        let mask = if self.settings.filters_depth() {
            &triangulation.valid
        } else {
            &triangulation.solved
        };
        let (points_2d, points_3d, indices) = retain(&points_2d, &triangulation.points, mask);
        self.stage_finished(Stage::Filter, start);

        info!(
            "kept {} of {} stereo points ({} degenerate)",
            indices.len(),
            left.len(),
            triangulation.degenerate.len()
        );
        Ok(StereoInitialisation {
            points_2d,
            points_3d,
            indices,
            degenerate: triangulation.degenerate,
        })
    }

    fn stage_finished(&self, stage: Stage, start: Instant) {
        let elapsed = start.elapsed();
        debug!("{:?} stage took {:?}", stage, elapsed);
        self.observer.stage_finished(stage, elapsed);
    }
}

/// Runs a complete stereo initialisation with the algorithm named by `algorithm`.
///
/// Every setting except the algorithm keeps its default. Use [`StereoInitialiser`] for more control.
pub fn stereo_initialisation<P: CorrespondenceProvider + ?Sized>(
    provider: &P,
    left: &P::Image,
    right: &P::Image,
    intrinsics: &Matrix3<f64>,
    baseline: f64,
    algorithm: &str,
) -> Result<StereoInitialisation> {
    let settings = StereoSettings::new(algorithm.parse()?);
    StereoInitialiser::new(*intrinsics, baseline, settings)?.initialise(provider, left, right)
}

/// Converts a dynamically sized intrinsic matrix, checking that it is 3x3.
///
/// ```
/// use nalgebra::DMatrix;
/// use stereo_init::{intrinsics_from_dmatrix, ConfigurationError};
///
/// let identity = DMatrix::<f64>::identity(3, 3);
/// assert!(intrinsics_from_dmatrix(&identity).unwrap().is_identity(0.0));
/// assert_eq!(
///     intrinsics_from_dmatrix(&DMatrix::zeros(3, 4)),
///     Err(ConfigurationError::IntrinsicsShape { rows: 3, cols: 4 })
/// );
/// ```
pub fn intrinsics_from_dmatrix(intrinsics: &DMatrix<f64>) -> Result<Matrix3<f64>> {
    match intrinsics.shape() {
        (3, 3) => Ok(Matrix3::from_iterator(intrinsics.iter().copied())),
        (rows, cols) => Err(ConfigurationError::IntrinsicsShape { rows, cols }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::Algorithm;
    use std::cell::RefCell;
    use std::time::Duration;

    #[derive(Default)]
    struct Stages(RefCell<Vec<Stage>>);

    impl Observer for Stages {
        fn stage_finished(&self, stage: Stage, _: Duration) {
            self.0.borrow_mut().push(stage);
        }
    }

    fn intrinsics() -> Matrix3<f64> {
        Matrix3::new(700.0, 0.0, 320.0, 0.0, 700.0, 240.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn singular_intrinsics_are_rejected() {
        let error = StereoInitialiser::new(
            Matrix3::zeros(),
            0.5,
            StereoSettings::new(Algorithm::DisparityRay),
        )
        .unwrap_err();
        assert_eq!(error, ConfigurationError::SingularIntrinsics);
    }

    #[test]
    fn stages_are_reported_in_order() {
        let stages = Stages::default();
        let initialiser =
            StereoInitialiser::new(intrinsics(), 0.5, StereoSettings::new(Algorithm::Dlt))
                .unwrap()
                .observer(&stages);
        let matches = crate::PrecomputedMatches {
            left: vec![PixelIndex::new(240.0, 320.0)],
            right: vec![PixelIndex::new(240.0, 288.0)],
        };
        initialiser.initialise(&matches, &(), &()).unwrap();
        assert_eq!(
            *stages.0.borrow(),
            vec![
                Stage::Correspondence,
                Stage::Adapt,
                Stage::Triangulate,
                Stage::Filter
            ]
        );
    }

    #[test]
    fn mismatch_is_detected_before_any_stage() {
        let stages = Stages::default();
        let initialiser =
            StereoInitialiser::new(intrinsics(), 0.5, StereoSettings::new(Algorithm::Dlt))
                .unwrap()
                .observer(&stages);
        let left = vec![PixelIndex::new(1.0, 1.0); 5];
        let right = vec![PixelIndex::new(1.0, 1.0); 4];
        assert_eq!(
            initialiser.initialise_matches(&left, &right),
            Err(ConfigurationError::MismatchedCorrespondences { left: 5, right: 4 })
        );
        assert!(stages.0.borrow().is_empty());
    }

    #[test]
    fn dmatrix_is_read_in_row_major_layout() {
        let k = DMatrix::from_row_slice(
            3,
            3,
            &[700.0, 0.0, 320.0, 0.0, 700.0, 240.0, 0.0, 0.0, 1.0],
        );
        assert_eq!(intrinsics_from_dmatrix(&k), Ok(intrinsics()));
        assert_eq!(
            intrinsics_from_dmatrix(&DMatrix::zeros(4, 4)),
            Err(ConfigurationError::IntrinsicsShape { rows: 4, cols: 4 })
        );
    }
}
